use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::{predicate, PredicateBooleanExt};

const MATCHES: &str = "\
# id\tplayer 1\tplayer 2\tgames\tstarted\treported\tscore
m1\talice\tbob\t2\t2024-03-01T10:00:00Z\t2024-03-01T10:12:00Z\t2-0
m2\tcarol\tdave\t1\t2024-03-01T14:00:00Z\t2024-03-01T14:10:00Z
";

const REPLAYS: &str = "\
g1\tstream\t2024-03-01T10:01:00Z\t2024-03-01T10:05:00Z\t1:fox:W\t2:marth:L
g2\tstream\t2024-03-01T10:06:00Z\t2024-03-01T10:11:00Z\t1:fox:W\t2:marth:L
h1\tside\t2024-03-01T11:00:00Z\t2024-03-01T11:04:00Z\t1:peach\t2:sheik
";

fn temp_file(name: &str, content: &str) -> NamedTempFile {
    let file = NamedTempFile::new(name).unwrap();
    file.write_str(content).unwrap();
    file
}

#[test]
fn test_check_ok() {
    let matches = temp_file("matches.tsv", MATCHES);
    let replays = temp_file("replays.tsv", REPLAYS);
    let mut cmd = Command::cargo_bin("replabel").unwrap();
    cmd.arg("check")
        .arg("-m")
        .arg(matches.path())
        .arg("-r")
        .arg(replays.path());
    cmd.assert().success().stdout(
        predicate::str::contains("read 2 matches")
            .and(predicate::str::contains("read 3 replays recorded on 2 setups"))
            .and(predicate::str::contains(
                "the bracket has 3 games for 3 recorded replays",
            )),
    );
}

#[test]
fn test_check_warns_on_malformed_lines() {
    let matches = temp_file(
        "matches.tsv",
        &format!("{}m3\terin\tfrank\tthree\t2024-03-01T10:00:00Z\t2024-03-01T10:12:00Z\n", MATCHES),
    );
    let replays = temp_file("replays.tsv", REPLAYS);
    let mut cmd = Command::cargo_bin("replabel").unwrap();
    cmd.arg("check")
        .arg("-m")
        .arg(matches.path())
        .arg("-r")
        .arg(replays.path());
    cmd.assert().success().stdout(
        predicate::str::contains("at line 4")
            .and(predicate::str::contains("read 2 matches")),
    );
}

#[test]
fn test_check_empty_matches() {
    let matches = temp_file("matches.tsv", "# no match yet\n");
    let replays = temp_file("replays.tsv", REPLAYS);
    let mut cmd = Command::cargo_bin("replabel").unwrap();
    cmd.arg("check")
        .arg("-m")
        .arg(matches.path())
        .arg("-r")
        .arg(replays.path());
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("the match collection is empty"));
}

#[test]
fn test_check_missing_file() {
    let replays = temp_file("replays.tsv", REPLAYS);
    let mut cmd = Command::cargo_bin("replabel").unwrap();
    cmd.arg("check")
        .arg("-m")
        .arg("/this/file/does/not/exist.tsv")
        .arg("-r")
        .arg(replays.path());
    cmd.assert().failure();
}
