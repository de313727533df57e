use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn summary_prints_name_and_estimate() {
    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.arg("#warmup 10:00 + 4x500m/1:00r");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[w]10:00 + 4x500m/1:00r"))
        .stdout(predicate::str::contains("time: "))
        .stderr(predicate::str::contains("info[LegacyTagPresent]"));
}

#[test]
fn canonical_format() {
    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.arg("4X500M/1:00R").arg("--format").arg("canonical");

    cmd.assert().success().stdout("4x500m/1:00r\n");
}

#[test]
fn syntax_error_exits_with_diagnostics_status() {
    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.arg("4x500m/1:00");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("error[MalformedRest]"));
}

#[test]
fn json_format_serializes_ast() {
    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.args(["3x(750m/3:00r + 500m/3:00r)", "-f", "json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"Group\""))
        .stdout(predicate::str::contains("\"repeats\": 3"));
}

#[test]
fn yaml_and_treeviz_formats() {
    cargo_bin_cmd!("rwn")
        .args(["2000m@r20", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type: Steady"));

    cargo_bin_cmd!("rwn")
        .args(["2000m@r20", "-f", "treeviz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("≡ Row: 2000m @r20"));
}

#[test]
fn tokens_format_lists_spans() {
    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.args(["4x500m", "--format", "tokens"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0..1"))
        .stdout(predicate::str::contains("'x'"));
}

#[test]
fn tokens_format_respects_max_length() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[limits]\nmax_input_length = 5").unwrap();

    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.args(["4x500m/1:00r", "--format", "tokens", "--config"])
        .arg(config.path());

    cmd.assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("error[InputTooLong]"));
}

#[test]
fn split_override_changes_estimate() {
    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.args(["2000m", "--split", "row=1:45"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("time: 7:00"));
}

#[test]
fn reference_override_resolves_relative_pace() {
    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.args(["2000m@2k+5", "--reference", "2k=1:40"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("time: 7:00"));
}

#[test]
fn reads_notation_and_config_from_files() {
    let mut notation = tempfile::NamedTempFile::new().unwrap();
    writeln!(notation, "1000m").unwrap();
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[estimate.splits]\nrow = \"2:30\"").unwrap();

    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.arg("--file")
        .arg(notation.path())
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("time: 5:00"));
}

#[test]
fn bad_options_exit_with_usage_status() {
    cargo_bin_cmd!("rwn")
        .args(["2000m", "--split", "row"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));

    cargo_bin_cmd!("rwn")
        .args(["2000m", "--format", "pdf"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown format 'pdf'"));

    cargo_bin_cmd!("rwn")
        .args(["2000m", "--reference", "3k=1:40"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("rwn");
    cmd.arg("--list-formats");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("treeviz"))
        .stdout(predicate::str::contains("yaml"));
}
