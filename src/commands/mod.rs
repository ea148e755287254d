pub mod check;
pub mod reorg;
