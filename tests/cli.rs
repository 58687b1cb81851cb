//! CLI contract tests for `blt`.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Command bound to a log file and date, isolated from the user's config.
fn blt(root: &Path, log: &Path, date: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("blt");
    cmd.current_dir(root)
        .env("BULLETLOG_FILE", log)
        .env("BULLETLOG_DATE", date)
        .env("XDG_CONFIG_HOME", root.join("config"))
        .env("HOME", root)
        .env("NO_COLOR", "1")
        .env_remove("BULLETLOG_QUIET")
        .env_remove("BULLETLOG_LOG");
    cmd
}

fn setup() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let log = tmp.path().join(".BULLETLOG");
    (tmp, log)
}

#[test]
fn add_note_to_empty_log() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .args(["add", "buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added note to new section 20240101"));

    assert_eq!(
        fs::read_to_string(&log).expect("read log"),
        "## 20240101\n\n* buy milk\n\n"
    );
}

#[test]
fn aliases_and_multi_word_text() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .args(["a", "buy", "oat", "milk"])
        .assert()
        .success();
    blt(tmp.path(), &log, "20240101")
        .args(["t", "call", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task to 20240101"));

    assert_eq!(
        fs::read_to_string(&log).expect("read log"),
        "## 20240101\n\n* buy oat milk\n- call bob\n\n"
    );
}

#[test]
fn newer_date_opens_section_on_top() {
    let (tmp, log) = setup();
    fs::write(&log, "## 20240101\n\n* old\n\n").expect("seed");

    blt(tmp.path(), &log, "20240102")
        .args(["task", "fresh"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&log).expect("read log"),
        "## 20240102\n\n- fresh\n\n## 20240101\n\n* old\n\n"
    );
}

#[test]
fn date_flag_overrides_env() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .args(["--date", "20231231", "add", "late"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&log).expect("read log"),
        "## 20231231\n\n* late\n\n"
    );
}

#[test]
fn file_flag_overrides_env() {
    let (tmp, log) = setup();
    let other = tmp.path().join("other.log");

    blt(tmp.path(), &log, "20240101")
        .args(["add", "--file", other.to_str().unwrap(), "elsewhere"])
        .assert()
        .success();

    assert!(fs::read_to_string(&other).unwrap().contains("* elsewhere"));
    // The env-named log is never touched
    assert!(!log.exists());
}

#[test]
fn list_notes_and_tasks_plain() {
    let (tmp, log) = setup();
    fs::write(
        &log,
        "## 20240102\n\n* n1\n- t0\n\n## 20240101\n\nx done\n- t1\n* n2\n\n",
    )
    .expect("seed");

    blt(tmp.path(), &log, "20240102")
        .arg("notes")
        .assert()
        .success()
        .stdout("* n1\n* n2\n");

    blt(tmp.path(), &log, "20240102")
        .arg("ts")
        .assert()
        .success()
        .stdout("0: t0\n1: t1\n");
}

#[test]
fn list_tasks_json() {
    let (tmp, log) = setup();
    fs::write(&log, "## 20240101\n\n- ship it\n\n").expect("seed");

    let out = blt(tmp.path(), &log, "20240101")
        .args(["tasks", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
    assert_eq!(value[0]["body"], "ship it");
    assert_eq!(value[0]["index"], 0);
    assert_eq!(value[0]["mark"], "task");
    assert_eq!(value[0]["date"], "20240101");
}

#[test]
fn complete_task_by_index() {
    let (tmp, log) = setup();
    fs::write(&log, "## 20240101\n\n- a\n* note\n- b\n- c\n\n").expect("seed");

    blt(tmp.path(), &log, "20240101")
        .args(["complete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed task 1: b"));

    assert_eq!(
        fs::read_to_string(&log).expect("read log"),
        "## 20240101\n\n- a\n* note\nx b\n- c\n\n"
    );
}

#[test]
fn complete_out_of_range_is_silent_noop() {
    let (tmp, log) = setup();
    let content = "## 20240101\n\n- a\n- b\n- c\n\n";
    fs::write(&log, content).expect("seed");

    blt(tmp.path(), &log, "20240101")
        .args(["comp", "99"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("no pending task at index 99"));

    assert_eq!(fs::read_to_string(&log).expect("read log"), content);
}

#[test]
fn complete_rejects_bad_index() {
    let (tmp, log) = setup();
    let content = "## 20240101\n\n- a\n\n";
    fs::write(&log, content).expect("seed");

    blt(tmp.path(), &log, "20240101")
        .args(["complete", "first"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid task index \"first\""));

    assert_eq!(fs::read_to_string(&log).expect("read log"), content);
}

#[test]
fn malformed_log_aborts_add() {
    let (tmp, log) = setup();
    let content = "not a header\n* a\n";
    fs::write(&log, content).expect("seed");

    blt(tmp.path(), &log, "20240101")
        .args(["add", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed log"));

    assert_eq!(fs::read_to_string(&log).expect("read log"), content);
}

#[test]
fn invalid_date_override_fails() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "2024-01-01")
        .args(["add", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected YYYYMMDD"));

    assert!(!log.exists());
}

#[test]
fn empty_text_is_usage_error() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .arg("add")
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: blt add"));
}

#[test]
fn add_reads_text_from_stdin() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .arg("task")
        .write_stdin("piped\ntask\n")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&log).expect("read log"),
        "## 20240101\n\n- piped task\n\n"
    );
}

#[test]
fn quiet_suppresses_confirmation() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .env("BULLETLOG_QUIET", "1")
        .args(["add", "shh"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn quiet_source_is_reported() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .env("BULLETLOG_QUIET", "true")
        .args(["config", "show", "--effective"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quiet: true  # $BULLETLOG_QUIET"));
}

#[test]
fn crlf_log_keeps_its_bytes() {
    let (tmp, log) = setup();
    fs::write(&log, b"## 20240101\r\n\r\n- caf\xe9\r\n- b\r\n\r\n").expect("seed");

    blt(tmp.path(), &log, "20240102")
        .args(["add", "new"])
        .assert()
        .success();
    blt(tmp.path(), &log, "20240102")
        .args(["complete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed task 1: b"));

    assert_eq!(
        fs::read(&log).expect("read log"),
        b"## 20240102\r\n\r\n* new\r\n\r\n## 20240101\r\n\r\n- caf\xe9\r\nx b\r\n\r\n"
    );
}

#[test]
fn validate_reports_issues() {
    let (tmp, log) = setup();
    fs::write(&log, "## 20240101\n\n* a\n\n## 20240105\n\n## bad\n").expect("seed");

    blt(tmp.path(), &log, "20240101")
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("W001"))
        .stdout(predicate::str::contains("E002"));

    fs::write(&log, "## 20240105\n\n* a\n\n## 20240101\n\n- b\n\n").expect("seed");
    blt(tmp.path(), &log, "20240101")
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 2 sections, 2 entries"));
}

#[test]
fn validate_flags_invalid_utf8_without_failing() {
    let (tmp, log) = setup();
    fs::write(&log, b"## 20240101\n\n* caf\xe9\n").expect("seed");

    blt(tmp.path(), &log, "20240101")
        .args(["validate", "-f", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("W004"));
}

#[test]
fn path_prints_resolved_file() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains(".BULLETLOG"));
}

#[test]
fn config_show_reports_sources() {
    let (tmp, log) = setup();

    blt(tmp.path(), &log, "20240101")
        .args(["config", "show", "--effective"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$BULLETLOG_FILE"))
        .stdout(predicate::str::contains("date: 20240101  # $BULLETLOG_DATE"));

    blt(tmp.path(), &log, "20240101")
        .args(["config", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BULLETLOG_DATE"));
}

// dirs only honours XDG_CONFIG_HOME on Linux
#[cfg(target_os = "linux")]
#[test]
fn user_config_supplies_default_file() {
    let (tmp, _log) = setup();
    let cfg_dir = tmp.path().join("config").join("bulletlog");
    fs::create_dir_all(&cfg_dir).expect("config dir");
    let configured = tmp.path().join("configured.log");
    fs::write(
        cfg_dir.join("config.yaml"),
        format!("file: {}\n", configured.display()),
    )
    .expect("config");

    let mut cmd = cargo_bin_cmd!("blt");
    cmd.current_dir(tmp.path())
        .env_remove("BULLETLOG_FILE")
        .env("BULLETLOG_DATE", "20240101")
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .env("HOME", tmp.path())
        .args(["add", "from config"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&configured).expect("read log"),
        "## 20240101\n\n* from config\n\n"
    );
}
