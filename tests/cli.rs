//! `gateway-cli` run as a subprocess against a temporary route file.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

struct Cli {
    _dir: TempDir,
    routes: PathBuf,
}

impl Cli {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("routes.json");
        Self { _dir: dir, routes }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gateway-cli"))
            .arg("--routes")
            .arg(&self.routes)
            .args(args)
            .env_remove("GATEWAY_ROUTES")
            .output()
            .unwrap()
    }

    fn on_disk(&self) -> Value {
        read_json(&self.routes)
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_list_empty() {
    let cli = Cli::new();
    let output = cli.run(&["list"]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Configured Routes:"), "{}", out);
    assert!(out.contains("No routes configured."), "{}", out);
    assert!(!cli.routes.exists());
}

#[test]
fn test_add_joins_name_words_and_persists() {
    let cli = Cli::new();
    let output = cli.run(&["add", "/blog", "http://localhost:3001", "My", "Blog"]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(
        stdout(&output).trim(),
        "Added route: /blog -> http://localhost:3001 (My Blog)"
    );

    let file = cli.on_disk();
    assert_eq!(file["routes"][0]["name"], "My Blog");
    assert_eq!(file["routes"][0]["enabled"], true);

    let out = stdout(&cli.run(&["list"]));
    assert!(out.contains("1. [✓] /blog -> http://localhost:3001 (My Blog)"), "{}", out);
}

#[test]
fn test_duplicate_add_exits_1_and_keeps_file() {
    let cli = Cli::new();
    cli.run(&["add", "/blog", "http://localhost:3001", "Blog"]);
    let before = std::fs::read_to_string(&cli.routes).unwrap();

    let output = cli.run(&["add", "/blog", "http://other:9999", "Other"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("Route with path \"/blog\" already exists."),
        "{}",
        stderr(&output)
    );
    assert_eq!(std::fs::read_to_string(&cli.routes).unwrap(), before);
}

#[test]
fn test_invalid_route_exits_1() {
    let cli = Cli::new();
    let output = cli.run(&["add", "blog", "http://localhost:3001", "Blog"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("must start with '/'"), "{}", stderr(&output));

    let output = cli.run(&["add", "/blog", "localhost:3001", "Blog"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!cli.routes.exists());
}

#[test]
fn test_unknown_path_exits_1() {
    let cli = Cli::new();
    for command in ["remove", "toggle"] {
        let output = cli.run(&[command, "/missing"]);
        assert_eq!(output.status.code(), Some(1), "{}", command);
        assert!(
            stderr(&output).contains("Route with path \"/missing\" not found."),
            "{}",
            stderr(&output)
        );
    }
    assert!(!cli.routes.exists());
}

#[test]
fn test_toggle_and_remove() {
    let cli = Cli::new();
    cli.run(&["add", "/api", "http://localhost:4000", "API Server"]);

    let output = cli.run(&["toggle", "/api"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "Route /api is now disabled");
    assert_eq!(cli.on_disk()["routes"][0]["enabled"], false);

    let out = stdout(&cli.run(&["list"]));
    assert!(out.contains("1. [✗] /api -> http://localhost:4000 (API Server)"), "{}", out);

    let output = cli.run(&["remove", "/api"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "Removed route: /api (API Server)");
    assert_eq!(cli.on_disk()["routes"], serde_json::json!([]));
}

#[test]
fn test_missing_arguments_exit_1() {
    let cli = Cli::new();
    for args in [&["add", "/blog"][..], &["add", "/blog", "http://localhost:3001"], &["remove"]] {
        let output = cli.run(args);
        assert_eq!(output.status.code(), Some(1), "{:?}", args);
        assert!(!stderr(&output).is_empty());
    }
    assert!(!cli.routes.exists());
}

#[test]
fn test_no_or_unknown_command_prints_help() {
    let cli = Cli::new();
    for args in [&[][..], &["bogus"]] {
        let output = cli.run(args);
        assert_eq!(output.status.code(), Some(0), "{:?}", args);
        let out = stdout(&output);
        assert!(out.contains("Usage:"), "{}", out);
        assert!(out.contains("toggle"), "{}", out);
    }
}
