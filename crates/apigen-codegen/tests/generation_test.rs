//! End-to-end generation tests.
//!
//! Each test loads or builds a schema, runs the full pipeline, and checks
//! the compiled operations, the manifest, and the rendered Python source.

use apigen_codegen::{ClientGenerator, GeneratedClient, to_identifier};
use apigen_core::{DiagnosticKind, GeneratorConfig, ParameterLocation};
use apigen_schema::SchemaDocument;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const PETSTORE_YAML: &str = r#"
openapi: 3.0.3
info:
  title: Swagger Petstore
  version: 1.0.0
  description: A sample pet store.
servers:
  - url: https://petstore.example.com/v1/
paths:
  /pets:
    get:
      operationId: listPets
      summary: List all pets
      parameters:
        - name: limit
          in: query
          description: How many items to return at one time
          schema:
            type: integer
            default: 20
        - name: tags
          in: query
          schema:
            type: array
            items:
              type: string
    post:
      operationId: createPet
      summary: Create a pet
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/NewPet'
  /pets/{petId}:
    parameters:
      - name: petId
        in: path
        required: true
        schema:
          type: string
    get:
      operationId: showPetById
      summary: Info for a specific pet
    delete:
      summary: Delete a pet
      responses:
        '204':
          description: deleted
components:
  schemas:
    NewPet:
      type: object
      required: [name]
      properties:
        name:
          type: string
        tag:
          type: string
"#;

fn generate(doc: serde_json::Value) -> GeneratedClient {
    ClientGenerator::new(GeneratorConfig::default())
        .unwrap()
        .generate(&SchemaDocument::from_value(doc))
        .unwrap()
}

fn petstore() -> GeneratedClient {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("petstore.yaml");
    fs::write(&path, PETSTORE_YAML).unwrap();
    ClientGenerator::new(GeneratorConfig::default())
        .unwrap()
        .generate_file(&path)
        .unwrap()
}

#[test]
fn test_petstore_from_file() {
    let client = petstore();

    assert_eq!(client.class_name, "SwaggerPetstore");
    assert_eq!(client.base_url, "https://petstore.example.com/v1");
    assert!(client.diagnostics.is_empty());

    let names: Vec<_> = client.operations.iter().map(|o| o.function_name.as_str()).collect();
    assert_eq!(
        names,
        ["list_pets", "create_pet", "show_pet_by_id", "delete_pets_by_pet_id"]
    );

    assert!(client.source.contains("class SwaggerPetstore(APIApplication):"));
    assert!(client.source.contains(
        "    def list_pets(self, limit: Optional[int] = None, tags: Optional[List[str]] = None) -> Any:"
    ));
    assert!(client.source.contains(
        "    def create_pet(self, request_body: Dict[str, Any]) -> Any:"
    ));
    assert!(client.source.contains("self._post(_url, json=request_body)"));
    assert!(client.source.contains("self._delete(_url)"));
}

#[test]
fn test_petstore_manifest() {
    let client = petstore();
    assert_eq!(client.manifest.len(), 4);

    let list = &client.manifest[0];
    assert_eq!(list.name, "list_pets");
    assert_eq!(list.description, "List all pets");
    assert_eq!(
        list.parameters["properties"]["limit"],
        json!({
            "type": "integer",
            "description": "How many items to return at one time",
            "default": 20
        })
    );
    assert!(list.required().is_empty());

    let create = &client.manifest[1];
    assert_eq!(create.required(), ["request_body"]);
    assert_eq!(
        create.parameters["properties"]["request_body"]["required"],
        json!(["name"])
    );

    let show = &client.manifest[2];
    assert_eq!(show.required(), ["pet_id"]);
}

#[test]
fn test_manifest_never_exceeds_operation_count() {
    let doc = SchemaDocument::from_value(json!({
        "paths": {
            "/a": {"get": {}, "head": {}, "options": {}},
            "/b": {"post": {"operationId": "makeB"}, "trace": {}}
        }
    }));
    let client = ClientGenerator::new(GeneratorConfig::default())
        .unwrap()
        .generate(&doc)
        .unwrap();

    assert_eq!(doc.operation_count(), 5);
    assert_eq!(client.method_count(), 2);
    assert!(client.manifest.len() <= doc.operation_count());
    assert_eq!(client.manifest.len(), client.method_count());
}

#[test]
fn test_path_parameter_required_despite_flag() {
    let client = generate(json!({
        "servers": [{"url": "https://api.example.com"}],
        "paths": {"/users/{user_id}": {"get": {
            "operationId": "getUser",
            "parameters": [{"name": "user_id", "in": "path", "required": false}]
        }}}
    }));

    let op = &client.operations[0];
    assert!(op.arguments[0].required);
    assert_eq!(client.manifest[0].required(), ["user_id"]);

    let source = op.method_source();
    assert!(source.starts_with("    def get_user(self, user_id: str) -> Any:"));
    assert!(source.contains(
        "        if user_id is None:\n            raise MissingRequiredParameter(argument=\"user_id\", wire_name=\"user_id\")"
    ));
}

#[test]
fn test_shared_wire_name_across_locations() {
    let client = generate(json!({
        "paths": {"/items/{id}": {"get": {
            "operationId": "getItem",
            "parameters": [
                {"name": "id", "in": "path", "schema": {"type": "integer"}},
                {"name": "id", "in": "query", "schema": {"type": "string"}},
                {"name": "id", "in": "header"}
            ]
        }}}
    }));

    let op = &client.operations[0];
    let args: Vec<_> = op.arguments.iter().map(|a| a.arg_name.as_str()).collect();
    assert_eq!(args, ["id", "id_query", "id_header"]);

    let keys = client.manifest[0].property_names();
    assert_eq!(keys, args);
    for argument in &op.arguments {
        assert_eq!(argument.wire_name, "id");
    }
    assert_eq!(op.arguments[1].location, ParameterLocation::Query);

    let source = op.method_source();
    assert!(source.contains("_path_params = {\"id\": id}"));
    assert!(source.contains("_query = {k: v for k, v in [(\"id\", id_query)] if v is not None}"));
    assert!(source.contains("_headers = {k: v for k, v in [(\"id\", id_header)] if v is not None}"));
}

#[test]
fn test_normalizer_is_idempotent() {
    let inputs = [
        "getUserById",
        "HTTPServer",
        "list-all_the.things",
        "123start",
        "__private__",
        "class",
        "",
        "already_snake_case",
        "Ünïcödé",
    ];
    for input in inputs {
        let once = to_identifier(input);
        assert_eq!(to_identifier(&once), once, "not idempotent for {input:?}");
        assert!(!once.is_empty());
    }
}

#[test]
fn test_base_url_round_trip() {
    let client = generate(json!({
        "servers": [{"url": "https://api.example.com/v1"}],
        "paths": {}
    }));
    assert_eq!(client.base_url, "https://api.example.com/v1");
    assert!(client
        .source
        .contains("self.api_base_url = api_base_url if api_base_url is not None else \"https://api.example.com/v1\""));
}

#[test]
fn test_form_body_sent_as_data() {
    let client = generate(json!({
        "paths": {"/login": {"post": {
            "operationId": "login",
            "requestBody": {
                "required": true,
                "content": {"application/x-www-form-urlencoded": {"schema": {
                    "type": "object",
                    "properties": {"username": {"type": "string"}}
                }}}
            }
        }}}
    }));

    let op = &client.operations[0];
    let body = op.body.as_ref().unwrap();
    assert_eq!(body.media_type, "application/x-www-form-urlencoded");
    assert!(body.required);

    let source = op.method_source();
    assert!(source.contains("self._post(_url, data=request_body)"));
    assert!(!source.contains("json=request_body"));
    assert!(source.contains("raise MissingRequiredBody(argument=\"request_body\")"));
}

#[test]
fn test_zero_paths_yields_empty_client() {
    let client = generate(json!({
        "openapi": "3.0.0",
        "info": {"title": "Empty"},
        "servers": [{"url": "https://empty.test"}],
        "paths": {}
    }));

    assert_eq!(client.method_count(), 0);
    assert!(client.manifest.is_empty());
    assert!(client.diagnostics.is_empty());
    assert!(client.source.contains("class Empty(APIApplication):"));
    assert!(client.source.contains(
        "    def list_tools(self) -> List[Dict[str, Any]]:\n        \"\"\"Lists the tools available in this application.\"\"\"\n        return []\n"
    ));
}

#[test]
fn test_nullable_any_of_resolves_concrete_type() {
    let client = generate(json!({
        "paths": {"/search": {"get": {
            "operationId": "search",
            "parameters": [{
                "name": "page",
                "in": "query",
                "schema": {"anyOf": [{"type": "null"}, {"type": "integer"}]}
            }]
        }}}
    }));

    let argument = &client.operations[0].arguments[0];
    assert_eq!(argument.type_tag, Some(apigen_core::TypeTag::Integer));
    assert_eq!(client.manifest[0].parameters["properties"]["page"]["type"], "integer");
    assert!(client.operations[0]
        .method_source()
        .contains("page: Optional[int] = None"));
}

#[test]
fn test_generation_is_deterministic() {
    let first = petstore();
    let second = petstore();
    assert_eq!(first.source, second.source);
    assert_eq!(first.manifest, second.manifest);
}

#[test]
fn test_manifest_literal_embedded_in_source() {
    let client = generate(json!({
        "paths": {"/ping": {"get": {"operationId": "ping", "summary": "Health check"}}}
    }));
    assert!(client.source.contains("\"name\": \"ping\""));
    assert!(client.source.contains("\"description\": \"Health check\""));
    assert!(client.source.contains("\"type\": \"object\""));
}

#[test]
fn test_missing_servers_warns_at_runtime() {
    let client = generate(json!({"info": {"title": "NoServer"}, "paths": {}}));
    assert_eq!(client.base_url, "");
    assert_eq!(client.diagnostics[0].kind, DiagnosticKind::MissingBaseUrl);
    assert!(client.source.contains("self.api_base_url = api_base_url if api_base_url is not None else \"\""));
    assert!(client.source.contains("warnings.warn(\"No base URL is known for NoServer"));
}
