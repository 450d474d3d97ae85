use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn config_file_sets_html_options() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.lyx");
    fs::write(&input, "\\begin_layout Standard\nBody\n\\end_layout\n").unwrap();

    let config_path = dir.path().join("lyxconv.toml");
    fs::write(
        &config_path,
        r#"[convert]
filter_header_footer = true

[convert.html]
custom_css = "p { color: teal; }"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg(input.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<p>Body</p>"))
        .stdout(predicate::str::contains("<html").not());
}

#[test]
fn config_file_adds_container_kinds() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.lyx");
    fs::write(
        &input,
        "\\begin_layout Standard\nkept\n\\begin_inset Greyedout\nstatus open\n\n\\begin_layout Plain Layout\nhidden\n\\end_layout\n\n\\end_inset\n\n\\end_layout\n",
    )
    .unwrap();

    let config_path = dir.path().join("lyxconv.toml");
    fs::write(
        &config_path,
        r#"[[containers.extra_kinds]]
kind = "note"
starts = ['\begin_inset Greyedout']
ending = '\end_inset'
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg(input.as_os_str())
        .arg("--filter-header-footer")
        .arg("--config")
        .arg(config_path.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<p>kept"))
        .stdout(predicate::str::contains("hidden").not());
}

#[test]
fn ambiguous_markers_are_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.lyx");
    fs::write(&input, "\\begin_layout Standard\nBody\n\\end_layout\n").unwrap();

    let config_path = dir.path().join("lyxconv.toml");
    fs::write(
        &config_path,
        r#"[[containers.extra_kinds]]
kind = "note"
starts = ['\begin_layout Standard']
ending = '\end_layout'
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg(input.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid container configuration"));
}

#[test]
fn missing_config_file_fails() {
    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("doc.lyx").arg("--config").arg("no-such-config.toml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
