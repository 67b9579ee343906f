use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy fixtures into `dir` and return the path of the first one.
fn stage(dir: &Path, names: &[&str]) -> PathBuf {
    for name in names {
        fs::copy(fixture_path(name), dir.join(name)).unwrap();
    }
    dir.join(names[0])
}

#[test]
fn links_in_page_to_stdout() {
    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(fixture_path("chapter.html"));

    let output_pred = predicate::str::contains(r#"<a name="main"><span class="lpdefine">(main)</span></a>"#)
        .and(predicate::str::contains(
            r##"<a href="#body">body.0</a><a href="#body">body.1</a>"##,
        ))
        .and(predicate::str::contains(r##"<a href="#io">=io</a>"##))
        .and(predicate::str::contains(
            r#"<meta name="generator" content="nanolp-pub">"#,
        ));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn map_selects_mapped_policy() {
    let dir = tempdir().unwrap();
    let input = stage(dir.path(), &["chapter.html", "commands.json"]);

    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.current_dir(dir.path())
        .arg(&input)
        .arg("--map")
        .arg("commands.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r##"<a href="io.html#io">=io</a>"##));
}

#[test]
fn mapped_policy_with_base_url() {
    let dir = tempdir().unwrap();
    let input = stage(dir.path(), &["chapter.html", "commands.json"]);

    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.current_dir(dir.path())
        .arg(&input)
        .args(["-m", "commands.json", "--base-url", "example.org/src"]);

    cmd.assert().success().stdout(
        predicate::str::contains(r##"<a href="http://example.org/src/io.html#io">=io</a>"##)
            .and(predicate::str::contains(r##"<a href="#body">body.0</a>"##)),
    );
}

#[test]
fn mapped_policy_without_map_fails() {
    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(fixture_path("chapter.html")).args(["--policy", "mapped"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("command map"));
}

#[test]
fn writes_output_file_and_stylesheet() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("site").join("chapter.html");
    fs::create_dir_all(output.parent().unwrap()).unwrap();

    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(fixture_path("chapter.html"))
        .arg("-o")
        .arg(&output)
        .args(["--stylesheet", "nanolp-pub.css", "--write-css"]);

    cmd.assert().success().stdout(predicate::str::is_empty());

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains(r#"<link rel="stylesheet" type="text/css" href="nanolp-pub.css">"#));
    let css = fs::read_to_string(dir.path().join("site").join("nanolp-pub.css")).unwrap();
    assert!(css.contains(".lpdefine"));
}

#[test]
fn in_place_refuses_second_run_unless_forced() {
    let dir = tempdir().unwrap();
    let input = stage(dir.path(), &["chapter.html"]);

    cargo_bin_cmd!("nanolp-pub")
        .arg(&input)
        .arg("--in-place")
        .assert()
        .success();
    let once = fs::read_to_string(&input).unwrap();
    assert!(once.contains(r#"<a name="body.0">"#));

    cargo_bin_cmd!("nanolp-pub")
        .arg(&input)
        .arg("--in-place")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already processed"));

    cargo_bin_cmd!("nanolp-pub")
        .arg(&input)
        .args(["--in-place", "--force"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&input).unwrap(), once);
}

#[test]
fn custom_delimiters_from_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nanolp.toml");
    fs::write(&config, "[delimiters]\nleft = \"{{\"\nright = \"}}\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(fixture_path("braces.html")).arg("-c").arg(&config);

    cmd.assert().success().stdout(
        predicate::str::contains(r#"<a name="start">"#)
            .and(predicate::str::contains(r##"<a href="#start">=start</a>"##)),
    );
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nanolp.toml");
    fs::write(&config, "[resolve]\npolicy = \"everywhere\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(fixture_path("chapter.html")).arg("-c").arg(&config);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error:"));
}

#[test]
fn delimiter_flags_override_config() {
    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(fixture_path("braces.html"))
        .args(["--left", "{{", "--right", "}}"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r##"<a href="#start">=start</a>"##));
}

#[test]
fn empty_delimiter_is_rejected() {
    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(fixture_path("braces.html")).args(["--left", ""]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("left delimiter is empty"));
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(dir.path().join("absent.html"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("absent.html"));
}

#[test]
fn output_conflicts_with_in_place() {
    let mut cmd = cargo_bin_cmd!("nanolp-pub");
    cmd.arg(fixture_path("chapter.html"))
        .args(["-o", "out.html", "--in-place"]);

    cmd.assert().failure();
}
