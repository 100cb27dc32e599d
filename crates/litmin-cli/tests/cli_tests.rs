//! Integration tests for the `litmin` binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

const SOURCE: &str = "const t = html`<div>  <span>${x}</span>  </div>`;\n";
const MINIFIED: &str = "const t = html`<div><span>${x}</span></div>`;\n";

fn litmin(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("litmin");
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.js"), SOURCE).unwrap();
    dir
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    litmin(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("minify"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    litmin(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_minify_in_place_writes_map() {
    let dir = workspace();
    litmin(dir.path())
        .args(["minify", "app.js"])
        .assert()
        .success();

    let code = fs::read_to_string(dir.path().join("app.js")).unwrap();
    assert_eq!(
        code,
        format!("{MINIFIED}\n//# sourceMappingURL=app.js.map\n")
    );
    let map = fs::read_to_string(dir.path().join("app.js.map")).unwrap();
    assert!(map.contains("\"version\":3"));
    assert!(map.contains("app.js"));
}

#[test]
fn test_minify_without_source_map() {
    let dir = workspace();
    litmin(dir.path())
        .args(["minify", "app.js", "--no-source-map"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("app.js")).unwrap(),
        MINIFIED
    );
    assert!(!dir.path().join("app.js.map").exists());
}

#[test]
fn test_minify_directory_into_out_dir() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src/views")).unwrap();
    fs::write(dir.path().join("src/views/page.ts"), SOURCE).unwrap();
    fs::write(dir.path().join("src/readme.md"), "# docs").unwrap();

    litmin(dir.path())
        .args(["minify", "src", "--out-dir", "dist", "--no-source-map"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("dist/views/page.ts")).unwrap(),
        MINIFIED
    );
    assert!(!dir.path().join("dist/readme.md").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("src/views/page.ts")).unwrap(),
        SOURCE
    );
}

#[test]
fn test_stdout_prints_without_writing() {
    let dir = workspace();
    litmin(dir.path())
        .args(["minify", "app.js", "--stdout"])
        .assert()
        .success()
        .stdout(MINIFIED);

    assert_eq!(
        fs::read_to_string(dir.path().join("app.js")).unwrap(),
        SOURCE
    );
}

#[test]
fn test_check_reports_pending_changes() {
    let dir = workspace();
    litmin(dir.path())
        .args(["minify", "app.js", "--check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("would be changed"));

    litmin(dir.path())
        .args(["minify", "app.js", "--no-source-map"])
        .assert()
        .success();

    litmin(dir.path())
        .args(["minify", "app.js", "--check"])
        .assert()
        .success();
}

#[test]
fn test_missing_input_is_not_found() {
    let dir = TempDir::new().unwrap();
    litmin(dir.path())
        .args(["minify", "missing.js"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing.js"));
}

#[test]
fn test_no_css_keeps_style_templates() {
    let dir = TempDir::new().unwrap();
    let source = "css`.a {  color: red; }`;\nhtml`<p>  x  </p>`;\n";
    fs::write(dir.path().join("s.js"), source).unwrap();

    litmin(dir.path())
        .args(["minify", "s.js", "--no-css", "--stdout"])
        .assert()
        .success()
        .stdout("css`.a {  color: red; }`;\nhtml`<p>x</p>`;\n");
}

#[test]
fn test_config_file_and_get() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("custom.toml"),
        "[markup]\nremove_comments = false\n",
    )
    .unwrap();

    litmin(dir.path())
        .args(["--config", "custom.toml", "config", "get", "markup.remove_comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markup.remove_comments = false"));
}

#[test]
fn test_environment_overrides_config() {
    let dir = TempDir::new().unwrap();
    litmin(dir.path())
        .env("LITMIN_SOURCE_MAPS__ENABLED", "false")
        .args(["config", "get", "source_maps.enabled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

#[test]
fn test_unknown_config_key_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    litmin(dir.path())
        .args(["config", "get", "nope.nothing"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_init_local_writes_config() {
    let dir = TempDir::new().unwrap();
    litmin(dir.path())
        .args(["init", "--local"])
        .assert()
        .success();

    let written = fs::read_to_string(dir.path().join(".litmin.toml")).unwrap();
    assert!(written.contains("[markup]"));
    assert!(written.contains("collapse_whitespace = true"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    litmin(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("litmin"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let dir = TempDir::new().unwrap();
    litmin(dir.path())
        .args(["-q", "-v", "config", "path"])
        .assert()
        .code(2);
}
