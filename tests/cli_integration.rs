use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VALID: &str = "# changelog\n\
    ## [Unreleased]\n\
    ### Added\n\
    - pending\n\
    ## [1.0.0] - 2020-01-01\n\
    ### Added\n\
    - first\n";

const INVALID: &str = "## [1.0.0] - 2020-01-01\n### Added\n- first\n";

// runs from an empty directory so no stray clq.toml is picked up
fn clq(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clq").unwrap();
    cmd.current_dir(dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    fs::write(dir.path().join(name), contents).unwrap();
    name.to_string()
}

#[test]
fn test_valid_stdin_prints_nothing() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .write_stdin(VALID)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_query_from_stdin() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .args(["-q", "releases[1].version"])
        .write_stdin(VALID)
        .assert()
        .success()
        .stdout("1.0.0\n");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .args(["-v", "-q", "title"])
        .write_stdin(VALID)
        .assert()
        .success()
        .stdout("changelog\n")
        .stderr(predicate::str::contains("compiled query"));
}

#[test]
fn test_quiet_by_default() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .args(["-q", "title"])
        .write_stdin(VALID)
        .assert()
        .success()
        .stderr("");
}

#[test]
fn test_invalid_document_fails() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .write_stdin(INVALID)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("❗️ validation error: introduction's title must be defined"));
}

#[test]
fn test_bad_query_is_invalid_argument() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .args(["-q", "releases[x]"])
        .write_stdin(VALID)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("parsing error"));
}

#[test]
fn test_unknown_output_format_is_invalid_argument() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .args(["-o", "yaml"])
        .write_stdin(VALID)
        .assert()
        .code(2);
}

#[test]
fn test_file_with_filename() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "CHANGELOG.md", VALID);
    clq(&dir)
        .args(["--with-filename", &file])
        .assert()
        .success()
        .stdout("✅ CHANGELOG.md\n");

    clq(&dir)
        .args(["--with-filename", "-q", "title", &file])
        .assert()
        .success()
        .stdout("✅ CHANGELOG.md: changelog\n");
}

#[test]
fn test_multiple_files_are_prefixed() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.md", VALID);
    let bad = write(&dir, "bad.md", INVALID);
    clq(&dir)
        .args(["-q", "title", &good, &bad])
        .assert()
        .code(1)
        .stdout("✅ good.md: changelog\n")
        .stderr(predicate::str::contains("❗️ bad.md: validation error"));
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .arg("missing.md")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read file"));
}

#[test]
fn test_markdown_output() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .args(["-o", "md", "-q", "releases[1]/"])
        .write_stdin(VALID)
        .assert()
        .success()
        .stdout("## [1.0.0] - 2020-01-01\n### Added\n- first\n");
}

#[test]
fn test_release_mode() {
    let dir = TempDir::new().unwrap();
    clq(&dir)
        .arg("--release")
        .write_stdin(VALID)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not supported in release mode"));
}

#[test]
fn test_change_map() {
    let dir = TempDir::new().unwrap();
    let map = write(
        &dir,
        "kinds.json",
        r#"[{"name": "Features", "increment": "minor", "emoji": "✨"}]"#,
    );
    let source = "# changelog\n## [1.0.0] - 2020-01-01\n### Features\n- first\n";
    clq(&dir)
        .args(["--change-map", &map, "-q", "releases[0].changes[].title"])
        .write_stdin(source)
        .assert()
        .success()
        .stdout("[\"✨ Features\"]\n");

    // the default kinds are still in use without the flag
    clq(&dir).write_stdin(source).assert().code(1);
}

#[test]
fn test_broken_change_map_is_invalid_argument() {
    let dir = TempDir::new().unwrap();
    let map = write(&dir, "kinds.json", "{not json");
    clq(&dir)
        .args(["--change-map", &map])
        .write_stdin(VALID)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load change kinds"));
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = TempDir::new().unwrap();
    write(&dir, "clq.toml", "release = true\n");
    clq(&dir)
        .write_stdin(VALID)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not supported in release mode"));
}

#[test]
fn test_explicit_config_file() {
    let dir = TempDir::new().unwrap();
    let config = write(
        &dir,
        "custom.toml",
        "output = \"md\"\nwith_filename = true\n\n[[change_kinds]]\nname = \"Added\"\nincrement = \"major\"\n",
    );
    let file = write(&dir, "CHANGELOG.md", VALID);
    clq(&dir)
        .args(["--config", &config, "-q", "releases[1].version", &file])
        .assert()
        .success()
        .stdout("✅ CHANGELOG.md: ## 1.0.0\n");
}

#[test]
fn test_broken_config_is_invalid_argument() {
    let dir = TempDir::new().unwrap();
    write(&dir, "clq.toml", "release = \"maybe\"\n");
    clq(&dir)
        .write_stdin(VALID)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load configuration"));
}
