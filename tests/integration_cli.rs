use assert_cmd::Command;
use tempfile::TempDir;

fn tango(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tango").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("TANGO_LOG");
    cmd
}

#[test]
fn list_decks_prints_builtin_names() {
    let home = tempfile::tempdir().unwrap();
    let out = tango(&home).arg("--list-decks").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let names: Vec<&str> = stdout.lines().collect();
    assert!(names.contains(&"japanese"));
    assert!(names.contains(&"numbers"));
}

#[test]
fn history_on_fresh_home_is_empty() {
    let home = tempfile::tempdir().unwrap();
    let out = tango(&home).arg("--history").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("No finished sessions yet."));
    assert!(stdout.contains("0 sessions"));
}

#[test]
fn plain_session_is_recorded_in_history() {
    let home = tempfile::tempdir().unwrap();

    // Window "0 1" holds only the first word of the default deck.
    let out = tango(&home)
        .args(["--plain", "--csv-log"])
        .write_stdin("0 1\n水\nq\n")
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Select difficulty"));
    assert!(stdout.contains("water"));
    assert!(stdout.contains("Correct"));
    assert!(stdout.contains("You have learned 1 words with 100% accuracy. Congratulations!"));

    let csv = std::fs::read_to_string(
        home.path()
            .join(".local")
            .join("state")
            .join("tango")
            .join("user_data.csv"),
    )
    .unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,Difficulty,Success %,Mistakes,Total words");
    assert!(lines[1].ends_with(",1,100,0,1"));

    let out = tango(&home).arg("--history").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("1 sessions"));
    assert!(stdout.contains("100%"));
}

#[test]
fn plain_rejects_bad_window_and_reprompts() {
    let home = tempfile::tempdir().unwrap();
    let out = tango(&home)
        .arg("--plain")
        .write_stdin("5 2\n")
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("Select difficulty").count(), 2);
    assert!(stdout.contains("! "));
}

#[test]
fn unknown_deck_fails() {
    let home = tempfile::tempdir().unwrap();
    tango(&home)
        .args(["--plain", "--deck", "klingon"])
        .write_stdin("")
        .assert()
        .failure();
}
