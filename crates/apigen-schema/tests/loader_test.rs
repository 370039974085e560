//! Integration tests for loading schema documents from disk.

use apigen_core::{DiagnosticKind, HttpMethod};
use apigen_schema::load;
use std::fs;
use tempfile::TempDir;

const PETSTORE_YAML: &str = r#"
openapi: 3.0.3
info:
  title: Swagger Petstore
  version: 1.0.0
  description: A sample API
servers:
  - url: https://petstore.example.com/v1
paths:
  /pets:
    get:
      operationId: listPets
      summary: List all pets
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
      responses:
        200:
          description: A paged array of pets
    post:
      operationId: createPets
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
  /pets/{petId}:
    parameters:
      - name: petId
        in: path
        required: true
        schema:
          type: string
    get:
      operationId: showPetById
components:
  schemas:
    Pet:
      type: object
      properties:
        name:
          type: string
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_yaml_document() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "petstore.yaml", PETSTORE_YAML);

    let doc = load(&path).unwrap();

    assert_eq!(doc.openapi.as_deref(), Some("3.0.3"));
    assert_eq!(doc.info.title.as_deref(), Some("Swagger Petstore"));
    assert_eq!(doc.info.version.as_deref(), Some("1.0.0"));
    assert_eq!(doc.servers[0].url, "https://petstore.example.com/v1");
    assert_eq!(doc.paths.len(), 2);
    assert_eq!(doc.operation_count(), 3);

    let pets = &doc.paths[0];
    assert_eq!(pets.template, "/pets");
    assert_eq!(pets.operations[0].method, HttpMethod::Get);
    assert_eq!(pets.operations[1].method, HttpMethod::Post);

    let by_id = &doc.paths[1];
    assert_eq!(by_id.parameters[0].name.as_deref(), Some("petId"));
    assert!(doc.diagnostics.is_empty());
}

#[test]
fn test_load_yml_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "petstore.yml", PETSTORE_YAML);
    assert_eq!(load(&path).unwrap().operation_count(), 3);
}

#[test]
fn test_load_json_document() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "api.json",
        r#"{
            "openapi": "3.1.0",
            "info": {"title": "Json API", "version": "2"},
            "paths": {"/ping": {"get": {"operationId": "ping"}}}
        }"#,
    );

    let doc = load(&path).unwrap();
    assert_eq!(doc.info.title.as_deref(), Some("Json API"));
    assert_eq!(
        doc.paths[0].operations[0].operation_id.as_deref(),
        Some("ping")
    );
}

#[test]
fn test_body_schema_ref_is_kept_for_later_resolution() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "petstore.yaml", PETSTORE_YAML);
    let doc = load(&path).unwrap();

    let body = doc.paths[0].operations[1].request_body.as_ref().unwrap();
    let schema = body.content[0].schema.as_ref().unwrap();
    let resolved = doc.resolve(schema).unwrap();
    assert_eq!(resolved["type"], "object");
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_missing_file_wins_over_extension() {
    let dir = TempDir::new().unwrap();
    let err = load(&dir.path().join("absent.txt")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "schema.toml", "openapi = '3.0.0'");
    let err = load(&path).unwrap_err();
    assert!(err.is_unsupported_format());
    assert!(err.to_string().contains("toml"));
}

#[test]
fn test_malformed_content_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", "{\"openapi\": \"3.0.0\",");
    let err = load(&path).unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_empty_paths_loads() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "empty.yaml",
        "openapi: 3.0.0\ninfo:\n  title: Empty\n  version: '0'\npaths: {}\n",
    );
    let doc = load(&path).unwrap();
    assert!(doc.paths.is_empty());
    assert_eq!(doc.operation_count(), 0);
}

#[test]
fn test_unresolved_path_item_ref_is_diagnosed() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "refs.yaml",
        "paths:\n  /a:\n    $ref: '#/components/pathItems/A'\n  /b:\n    get: {}\n",
    );
    let doc = load(&path).unwrap();
    assert_eq!(doc.paths.len(), 1);
    assert_eq!(doc.diagnostics.len(), 1);
    assert_eq!(doc.diagnostics[0].kind, DiagnosticKind::UnresolvedReference);
}
