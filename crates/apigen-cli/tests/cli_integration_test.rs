//! Integration tests for the apigen command-line workflow.

use apigen_cli::Cli;
use apigen_cli::commands::config::load_config;
use apigen_cli::runner;
use apigen_core::cli::ExitCode;
use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BOOKSTORE_YAML: &str = r#"
openapi: 3.0.3
info:
  title: Bookstore
  version: "2.1"
servers:
  - url: https://books.example.com/v2/{stage}
paths:
  /books:
    get:
      operationId: listBooks
      parameters:
        - name: pageSize
          in: query
          schema:
            type: integer
    post:
      operationId: addBook
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              properties:
                title:
                  type: string
  /books/{bookId}:
    get:
      operationId: getBook
      parameters:
        - name: bookId
          in: path
          schema:
            type: string
"#;

fn write_schema(dir: &Path) -> String {
    let path = dir.join("bookstore.yaml");
    fs::write(&path, BOOKSTORE_YAML).unwrap();
    path.to_str().unwrap().to_string()
}

/// Runs a command line against an isolated config file.
fn run(dir: &Path, args: &[&str]) -> ExitCode {
    let config = dir.join("config.toml");
    let mut argv = vec!["apigen", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    runner::run(Cli::parse_from(argv)).unwrap()
}

#[test]
fn test_generate_writes_module() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());
    let output = dir.path().join("out/bookstore_app.py");
    run(dir.path(), &["config", "init"]);

    let code = run(
        dir.path(),
        &["--format", "json", "generate", &schema, "-o", output.to_str().unwrap()],
    );
    assert_eq!(code, ExitCode::SUCCESS);

    let source = fs::read_to_string(&output).unwrap();
    assert!(source.contains("class Bookstore(APIApplication):"));
    assert!(source.contains("def list_books(self, page_size: Optional[int] = None) -> Any:"));
    assert!(source.contains("def get_book(self, book_id: str) -> Any:"));
    assert!(source.contains("\"https://books.example.com/v2\""));
}

#[test]
fn test_generator_section_changes_collaborators() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());
    let output = dir.path().join("bookstore_app.py");
    fs::write(
        dir.path().join("config.toml"),
        "[generator]\nbase_module = \"myapp.http\"\nbase_class = \"BaseClient\"\n",
    )
    .unwrap();

    run(dir.path(), &["generate", &schema, "-o", output.to_str().unwrap()]);

    let source = fs::read_to_string(&output).unwrap();
    assert!(source.contains("from myapp.http import BaseClient"));
    assert!(source.contains("class Bookstore(BaseClient):"));
}

#[test]
fn test_missing_schema_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    run(dir.path(), &["config", "init"]);
    let missing = dir.path().join("missing.yaml");

    let code = run(dir.path(), &["generate", missing.to_str().unwrap()]);
    assert_eq!(code, ExitCode::INVALID_INPUT);
}

#[test]
fn test_unsupported_extension_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    run(dir.path(), &["config", "init"]);
    let schema = dir.path().join("api.txt");
    fs::write(&schema, "openapi: 3.0.0").unwrap();

    let code = run(dir.path(), &["inspect", schema.to_str().unwrap()]);
    assert_eq!(code, ExitCode::INVALID_INPUT);
}

#[test]
fn test_inspect_succeeds() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());
    run(dir.path(), &["config", "init"]);

    assert_eq!(
        run(dir.path(), &["--format", "text", "inspect", &schema]),
        ExitCode::SUCCESS
    );
    assert_eq!(
        run(dir.path(), &["--format", "json", "inspect", &schema, "--manifest"]),
        ExitCode::SUCCESS
    );
}

#[test]
fn test_config_init_creates_default_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    assert!(!config.exists());

    assert_eq!(run(dir.path(), &["config", "init"]), ExitCode::SUCCESS);
    assert!(config.exists());

    let loaded = load_config(Some(&config)).unwrap();
    assert_eq!(loaded.generator.base_class, "APIApplication");
    assert_eq!(run(dir.path(), &["config", "show"]), ExitCode::SUCCESS);
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());
    let config = dir.path().join("absent.toml");

    let cli = Cli::parse_from(["apigen", "--config", config.to_str().unwrap(), "inspect", &schema]);
    assert!(runner::run(cli).is_err());
}
