use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const DOC: &str = "\\begin_layout Standard\nSee \n\\begin_inset CommandInset ref\nLatexCommand ref\nreference \"sec:a\"\n\n\\end_inset\n\n\\end_layout\n";

#[test]
fn inspect_defaults_to_final_tree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.lyx");
    fs::write(&input, DOC).unwrap();

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("inspect").arg(input.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("001 ¶ \\begin_layout Standard"))
        .stdout(predicate::str::contains("\\begin_inset CommandInset ref"));
}

#[test]
fn inspect_tree_full_lists_parameters() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.lyx");
    fs::write(&input, DOC).unwrap();

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("inspect")
        .arg(input.as_os_str())
        .arg("parse-treeviz")
        .arg("--extra-tree-full");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("reference=sec:a"));
}

#[test]
fn inspect_line_dispatch() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.lyx");
    fs::write(&input, DOC).unwrap();

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("inspect").arg(input.as_os_str()).arg("line-dispatch");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("003 reference"));
}

#[test]
fn inspect_rejects_unknown_transform() {
    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("inspect").arg("doc.lyx").arg("ast-tag");

    cmd.assert().failure();
}

#[test]
fn list_commands() {
    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("--list-formats");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("html"))
        .stdout(predicate::str::contains("treeviz"));

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("--list-kinds");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("heading"))
        .stdout(predicate::str::contains("\\begin_layout Section*"));

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("--list-transforms");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("parse-order"));
}

#[test]
fn generate_css_prints_the_stylesheet() {
    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("generate-css");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("footnote"));
}

#[test]
fn inspect_final_tree_honours_the_filter() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.lyx");
    fs::write(
        &input,
        "\\begin_header\n\\textclass article\n\\end_header\n\\begin_layout Standard\nBody\n\\end_layout\n\\end_document\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("lyxconv");
    cmd.arg("inspect").arg(input.as_os_str()).arg("--extra-filter");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\\begin_layout Standard"))
        .stdout(predicate::str::contains("\\begin_header").not())
        .stdout(predicate::str::contains("\\end_document").not());
}
