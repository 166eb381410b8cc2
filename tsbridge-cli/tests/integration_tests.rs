//! Integration tests for tsbridge-cli.
//!
//! These tests cover end-to-end generation from a graph file, both through
//! the library and through the `tsbridge` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use tsbridge_cli::{
    config::{CliArgs, Config, ConfigManager},
    generator::Generator,
    loader::GraphLoader,
    writer::{self, FileWriter, WriteResult},
};

const EXPECTED: &str = "\
// Code generated by tsbridge. DO NOT EDIT.

/**
 * Order placed by a customer
 *
 * @api Used in the following endpoints:
 * - POST /orders (Request)
 */
export interface Order {
  /**
   * @validation
   *   - binding: required
   */
  id: number;
  note?: string | null;
  customer: Customer;
}

export interface Customer {
  email: string;
}
";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn tsbridge(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tsbridge"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run tsbridge")
}

// =============================================================================
// Library Integration Tests
// =============================================================================

#[test]
fn test_generate_from_fixture() {
    let graph = GraphLoader::new(fixture("shop.json")).load().unwrap();
    assert_eq!(graph.len(), 2);

    let output = Generator::new(Config::default()).generate(&graph).unwrap();
    assert_eq!(output.content, EXPECTED);
    assert_eq!(output.declarations, 2);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_generate_with_groups_from_toml() {
    let toml = r#"
[output]
docs = false

[[run.group]]
id = "customers"
roots = ["Customer"]

[[run.group]]
id = "orders"
roots = ["Order"]
"#;
    let config = ConfigManager::parse(Path::new("tsbridge.toml"), toml).unwrap();
    let graph = GraphLoader::new(fixture("shop.json")).load().unwrap();

    let output = Generator::new(config).generate(&graph).unwrap();
    assert_eq!(output.groups, 2);
    assert_eq!(
        output.content,
        "// Code generated by tsbridge. DO NOT EDIT.\n\n\
         export interface Customer {\n  email: string;\n}\n\n\
         export interface Order {\n  id: number;\n  note?: string | null;\n  \
         customer: Customer;\n}\n"
    );
}

#[test]
fn test_generate_write_and_check() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("web/api.ts");

    let config = ConfigManager::merge_cli_args(
        Config::default(),
        &CliArgs {
            output: Some(out.clone()),
            ..Default::default()
        },
    );
    let graph = GraphLoader::new(fixture("shop.json")).load().unwrap();
    let output = Generator::new(config.clone()).generate(&graph).unwrap();

    let writer = FileWriter::new(false);
    let result = writer.write(&config.output.path, &output.content).unwrap();
    assert!(matches!(result, WriteResult::Written { .. }));
    assert!(writer::is_up_to_date(&out, &output.content).unwrap());

    let again = writer.write(&config.output.path, &output.content).unwrap();
    assert!(matches!(again, WriteResult::Unchanged { .. }));
}

// =============================================================================
// Binary Tests
// =============================================================================

#[test]
fn test_cli_generate_and_check() {
    let dir = TempDir::new().unwrap();
    let graph = fixture("shop.json");
    let graph = graph.to_str().unwrap();

    let generate = tsbridge(
        dir.path(),
        &["generate", "--graph", graph, "--output", "api.ts"],
    );
    assert!(generate.status.success(), "{generate:?}");
    assert_eq!(
        fs::read_to_string(dir.path().join("api.ts")).unwrap(),
        EXPECTED
    );

    let check = tsbridge(dir.path(), &["check", "--graph", graph, "--path", "api.ts"]);
    assert_eq!(check.status.code(), Some(0), "{check:?}");

    fs::write(dir.path().join("api.ts"), "export interface Stale {}\n").unwrap();
    let stale = tsbridge(dir.path(), &["check", "--graph", graph, "--path", "api.ts"]);
    assert_eq!(stale.status.code(), Some(2), "{stale:?}");
}

#[test]
fn test_cli_exclude_unexported() {
    let dir = TempDir::new().unwrap();
    let graph = r#"{
  "definitions": [
    {
      "kind": "Struct",
      "name": "Account",
      "fields": [
        { "identifier": "Email", "source_type": { "type": "Text" } },
        { "identifier": "secret", "source_type": { "type": "Text" }, "exported": false }
      ]
    }
  ]
}"#;
    fs::write(dir.path().join("graph.json"), graph).unwrap();

    let mut args = vec!["generate", "--graph", "graph.json", "--output", "api.ts"];
    let all = tsbridge(dir.path(), &args);
    assert!(all.status.success(), "{all:?}");
    let content = fs::read_to_string(dir.path().join("api.ts")).unwrap();
    assert!(content.contains("  secret: string;"));

    args.push("--exclude-unexported");
    let exported = tsbridge(dir.path(), &args);
    assert!(exported.status.success(), "{exported:?}");
    let content = fs::read_to_string(dir.path().join("api.ts")).unwrap();
    assert!(content.contains("  email: string;"));
    assert!(!content.contains("secret"));
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let graph = fixture("shop.json");

    let output = tsbridge(
        dir.path(),
        &["generate", "--graph", graph.to_str().unwrap(), "--dry-run"],
    );
    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("export interface Order {"));
    assert!(!dir.path().join("generated").exists());
}

#[test]
fn test_cli_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();

    let first = tsbridge(dir.path(), &["init"]);
    assert!(first.status.success(), "{first:?}");
    let content = fs::read_to_string(dir.path().join("tsbridge.toml")).unwrap();
    assert_eq!(content, ConfigManager::default_config_content());

    let second = tsbridge(dir.path(), &["init"]);
    assert_eq!(second.status.code(), Some(2));

    let forced = tsbridge(dir.path(), &["init", "--force"]);
    assert!(forced.status.success(), "{forced:?}");
}

#[test]
fn test_cli_reports_missing_graph() {
    let dir = TempDir::new().unwrap();

    let output = tsbridge(dir.path(), &["generate", "--graph", "missing.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Graph file not found"));
}
