use assert_cmd::Command;
use assert_fs::{
    prelude::{FileWriteStr, PathChild},
    NamedTempFile, TempDir,
};
use predicates::prelude::predicate;
use std::fs;

const MATCHES: &str = "\
m1\talice\tbob\t2\t2024-03-01T10:00:00Z\t2024-03-01T10:12:00Z\t2-0
m2\tcarol\tdave\t1\t2024-03-01T14:00:00Z\t2024-03-01T14:10:00Z
";

const REPLAYS: &str = "\
g2\tstream\t2024-03-01T10:06:00Z\t2024-03-01T10:11:00Z\t1:fox:W\t2:marth:L
g1\tstream\t2024-03-01T10:01:00Z\t2024-03-01T10:05:00Z\t1:fox:W\t2:marth:L
";

const PROFILES: &str = "\
TAG,Main,Secondaries
alice,Fox,Falco
bob,Marth,
";

fn temp_file(name: &str, content: &str) -> NamedTempFile {
    let file = NamedTempFile::new(name).unwrap();
    file.write_str(content).unwrap();
    file
}

fn label_command(
    matches: &NamedTempFile,
    replays: &NamedTempFile,
    output_dir: &TempDir,
) -> Command {
    let mut cmd = Command::cargo_bin("replabel").unwrap();
    cmd.arg("label")
        .arg("-m")
        .arg(matches.path())
        .arg("-r")
        .arg(replays.path())
        .arg("-o")
        .arg(output_dir.path());
    cmd
}

#[test]
fn test_label_tsv() {
    let matches = temp_file("matches.tsv", MATCHES);
    let replays = temp_file("replays.tsv", REPLAYS);
    let profiles = temp_file("profiles.csv", PROFILES);
    let output_dir = TempDir::new().unwrap();
    let mut cmd = label_command(&matches, &replays, &output_dir);
    cmd.arg("-p")
        .arg(profiles.path())
        .arg("--output-format")
        .arg("tsv");
    cmd.assert().success();
    let full = fs::read_to_string(output_dir.child("full_output.txt").path()).unwrap();
    assert!(full.starts_with("match_id\trank\tscore\tpregame_gap\tpostgame_gap\tsetup\treplay_ids\n"));
    assert!(full.contains("m1\t1\t"));
    assert!(full.contains("\tstream\tg1,g2\n"));
    let single = fs::read_to_string(output_dir.child("single_output.txt").path()).unwrap();
    let lines = single.lines().collect::<Vec<&str>>();
    assert_eq!(3, lines.len());
    assert_eq!("match_id\tsetup\treplay_ids\tscore", lines[0]);
    assert!(lines[1].starts_with("m1\tstream\tg1,g2\t"));
    assert_eq!("m2\tNO_LABEL\t\t", lines[2]);
}

#[test]
fn test_label_text() {
    let matches = temp_file("matches.tsv", MATCHES);
    let replays = temp_file("replays.tsv", REPLAYS);
    let output_dir = TempDir::new().unwrap();
    let mut cmd = label_command(&matches, &replays, &output_dir);
    cmd.arg("--time-budget").arg("60");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ILP solver ended with result OPTIMAL"));
    let single = fs::read_to_string(output_dir.child("single_output.txt").path()).unwrap();
    assert!(single.contains("Match 0 (m1): alice vs bob"));
    assert!(single.contains("Missed 1 matches:"));
    assert!(single.contains("(1 matches labelled out of 2)"));
}

#[test]
fn test_label_invalid_config() {
    let matches = temp_file("matches.tsv", MATCHES);
    let replays = temp_file("replays.tsv", REPLAYS);
    let output_dir = TempDir::new().unwrap();
    let mut cmd = label_command(&matches, &replays, &output_dir);
    cmd.arg("--pregame-sd").arg("0");
    cmd.assert().failure().stdout(predicate::str::contains(
        "the standard deviation of the pregame gap distribution must be positive",
    ));
    assert!(!output_dir.child("full_output.txt").path().exists());
}

#[test]
fn test_label_empty_replays() {
    let matches = temp_file("matches.tsv", MATCHES);
    let replays = temp_file("replays.tsv", "");
    let output_dir = TempDir::new().unwrap();
    let mut cmd = label_command(&matches, &replays, &output_dir);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("the replay collection is empty"));
    assert!(!output_dir.child("single_output.txt").path().exists());
}
