use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const WEDDING: &str = "37EFA83C36884C46D5B09514B86AD6063555253060678E1773E3E13883313F1E";
const RALLY: &str = "252F2D6C07AE83BCD39C055288044B7624416A835C7F3856042051D80F35E5B8";
const BEACH: &str = "9A1C6B1F3E0D4C2B8A7F6E5D4C3B2A19081726354453627180918A7B6C5D4E3F";

fn write_library(managed: &Path) {
    fs::create_dir_all(managed.join("3/7")).expect("mkdir managed");
    fs::write(managed.join(format!("3/7/{}.JPG", WEDDING)), b"wedding").expect("write");
    fs::write(managed.join(format!("3/7/{}.JPG", BEACH)), b"beach").expect("write");
    fs::write(managed.join("3/7/rally.JPG"), b"rally").expect("write");

    let db = format!(
        r#"{wedding}:
  sha256: {wedding}
  extensions: [jpg]
  paths:
    - /Volumes/Backup/2011/Wedding/CZ-251.jpg
  earliestDate: 1316754000000
  storedAt: 3/7/{wedding}.JPG
  tags: ['event:Wedding']
  reviewDone: true
{beach}:
  sha256: {beach}
  extensions: [jpg]
  paths:
    - C:\Pictures\Beach\CZ-251.jpg
  earliestDate: 1316757600000
  storedAt: 3/7/{beach}.JPG
  tags: []
{rally}:
  sha256: {rally}
  extensions: [jpg]
  paths:
    - /Volumes/Backup/2011/Rally/DSC_0891.JPG
  earliestDate: 1304830800000
  storedAt: 3/7/rally.JPG
  reviewDone: true
  ignore: true
"#,
        wedding = WEDDING,
        beach = BEACH,
        rally = RALLY
    );
    fs::write(managed.join("pic-man.db"), db).expect("write db");
}

fn pic_reorg() -> Command {
    Command::cargo_bin("pic_reorg").expect("binary")
}

#[test]
fn reorg_moves_files_into_date_layout() {
    let tmp = tempdir().expect("tempdir");
    let managed = tmp.path().join("managed");
    let target = tmp.path().join("target");
    write_library(&managed);

    pic_reorg()
        .arg("reorg")
        .arg("-m")
        .arg(&managed)
        .arg("-t")
        .arg(&target)
        .assert()
        .success();

    // WEDDING sorts before BEACH by hash, so it keeps the plain name
    assert_eq!(
        fs::read(target.join("2011/09/23/CZ-251.jpg")).expect("wedding"),
        b"wedding"
    );
    assert_eq!(
        fs::read(target.join("2011/09/23/CZ-251_1.jpg")).expect("beach"),
        b"beach"
    );
    assert!(managed.join("3/7/rally.JPG").exists());

    let db = fs::read_to_string(target.join("pic-man.db")).expect("db");
    assert!(db.contains("storedAt: 2011/09/23/CZ-251.jpg"));
    assert!(db.contains("storedAt: 2011/09/23/CZ-251_1.jpg"));
    assert!(db.contains("storedAt: 3/7/rally.JPG"));
    assert!(db.contains("updated:"));
}

#[test]
fn dry_run_leaves_everything_in_place() {
    let tmp = tempdir().expect("tempdir");
    let managed = tmp.path().join("managed");
    let target = tmp.path().join("target");
    write_library(&managed);

    pic_reorg()
        .args(["reorg", "--dryrun", "-m"])
        .arg(&managed)
        .arg("-t")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would move"))
        .stdout(predicate::str::contains("2011/09/23/CZ-251_1.jpg"));

    assert!(!target.exists());
    assert!(managed.join(format!("3/7/{}.JPG", WEDDING)).exists());
    assert!(managed.join(format!("3/7/{}.JPG", BEACH)).exists());
}

#[test]
fn existing_target_is_refused() {
    let tmp = tempdir().expect("tempdir");
    let managed = tmp.path().join("managed");
    let target = tmp.path().join("target");
    write_library(&managed);
    fs::create_dir_all(&target).expect("mkdir target");

    pic_reorg()
        .arg("reorg")
        .arg("-m")
        .arg(&managed)
        .arg("-t")
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not exist"));

    assert!(managed.join(format!("3/7/{}.JPG", WEDDING)).exists());
}

#[test]
fn record_pointing_at_directory_is_refused() {
    let tmp = tempdir().expect("tempdir");
    let managed = tmp.path().join("managed");
    let target = tmp.path().join("target");
    write_library(&managed);
    fs::remove_file(managed.join(format!("3/7/{}.JPG", BEACH))).expect("rm");
    fs::create_dir(managed.join(format!("3/7/{}.JPG", BEACH))).expect("mkdir");

    pic_reorg()
        .arg("reorg")
        .arg("-m")
        .arg(&managed)
        .arg("-t")
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("directory instead of a file"));

    assert!(!target.exists());
}

#[test]
fn empty_database_is_refused() {
    let tmp = tempdir().expect("tempdir");
    let managed = tmp.path().join("managed");
    fs::create_dir_all(&managed).expect("mkdir");
    fs::write(managed.join("pic-man.db"), "{}\n").expect("write db");

    pic_reorg()
        .arg("reorg")
        .arg("-m")
        .arg(&managed)
        .arg("-t")
        .arg(tmp.path().join("target"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("holds no records"));
}

#[test]
fn reorganized_library_can_be_reorganized_again() {
    let tmp = tempdir().expect("tempdir");
    let managed = tmp.path().join("managed");
    let first = tmp.path().join("first");
    let second = tmp.path().join("second");
    write_library(&managed);
    // the ignored file travels by hand
    fs::create_dir_all(first.join("3/7")).expect("mkdir");
    fs::rename(managed.join("3/7/rally.JPG"), first.join("3/7/rally.JPG")).expect("mv");

    pic_reorg()
        .arg("reorg")
        .arg("-m")
        .arg(&managed)
        .arg("-t")
        .arg(tmp.path().join("staging"))
        .assert()
        .success();
    fs::rename(tmp.path().join("staging/2011"), first.join("2011")).expect("mv");
    fs::rename(tmp.path().join("staging/pic-man.db"), first.join("pic-man.db")).expect("mv");

    pic_reorg()
        .arg("reorg")
        .arg("-m")
        .arg(&first)
        .arg("-t")
        .arg(&second)
        .arg("--prune-empty")
        .assert()
        .success();

    assert!(second.join("2011/09/23/CZ-251.jpg").exists());
    assert!(second.join("2011/09/23/CZ-251_1.jpg").exists());
    assert!(!first.join("2011").exists());
    assert!(first.join("3/7/rally.JPG").exists());
}

#[test]
fn check_reports_plan_summary() {
    let tmp = tempdir().expect("tempdir");
    let managed = tmp.path().join("managed");
    write_library(&managed);

    pic_reorg()
        .arg("check")
        .arg("-m")
        .arg(&managed)
        .assert()
        .success()
        .stdout(predicate::str::contains("eligible: 2"))
        .stdout(predicate::str::contains("ignored:  1"))
        .stdout(predicate::str::contains("renamed:  1"));
}
