//! End-to-end pipeline tests over temporary files: resolve a definition,
//! parse it, normalize its servers, and project or serialize the result.

use openapi_console::document::Document;
use openapi_console::locator;
use openapi_console::normalizer::{normalize_servers, NormalizeOptions};
use openapi_console::parser::{parse_definition, ParseMode, ParserBackend, ParserOptions, SpecEngine};
use openapi_console::reporter;
use openapi_console::serializer::{serialize_json, serialize_yaml};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PETSTORE: &str = r##"
openapi: 3.0.0
info:
  title: Petstore
  version: 1.0.0
  contact:
    name: Jo Doe
    email: jo@example.com
tags:
  - name: pets
    description: Everything about pets
paths:
  /pets:
    get:
      tags: [pets]
      summary: List pets
      operationId: listPets
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Pet"
    post:
      tags: [pets]
      operationId: createPet
      responses:
        "201": {description: created}
  /health:
    get:
      summary: Health probe
      responses:
        "200": {description: ok}
components:
  schemas:
    Pet:
      type: object
      properties:
        name: {type: string}
    Error:
      type: object
"##;

fn write_spec(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn read_pipeline_parses_normalizes_and_serializes() {
    let dir = TempDir::new().unwrap();
    let source = write_spec(&dir, "api.yaml", PETSTORE);

    let mut document =
        parse_definition(&SpecEngine, &source, ParseMode::Parse, &ParserOptions::default())
            .unwrap();
    normalize_servers(
        &mut document,
        &source,
        &NormalizeOptions {
            extra_servers: vec!["http://localhost:9000".to_string()],
            induce_servers: false,
            root: None,
        },
    );

    let yaml = serialize_yaml(&document).unwrap();
    assert!(yaml.contains("title: Petstore"));
    assert!(yaml.contains("url: http://localhost:9000"));

    let json = serialize_json(&document).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["servers"][0]["url"], "http://localhost:9000");
    // refs untouched in plain parse mode
    assert!(json.contains("#/components/schemas/Pet"));
}

#[test]
fn json_and_yaml_outputs_reparse_to_the_same_document() {
    let dir = TempDir::new().unwrap();
    let source = write_spec(&dir, "api.yaml", PETSTORE);
    let document = SpecEngine.parse(&source, &ParserOptions::default()).unwrap();

    let from_json: Document =
        serde_json::from_str(&serialize_json(&document).unwrap()).unwrap();
    let from_yaml: Document =
        serde_yaml::from_str(&serialize_yaml(&document).unwrap()).unwrap();

    assert_eq!(from_json, from_yaml);
    assert_eq!(
        from_json.paths.as_ref().unwrap().keys().collect::<Vec<_>>(),
        vec!["/pets", "/health"]
    );
    assert_eq!(
        from_json
            .components
            .as_ref()
            .unwrap()
            .schemas
            .as_ref()
            .unwrap()
            .keys()
            .collect::<Vec<_>>(),
        vec!["Pet", "Error"]
    );
}

#[test]
fn validate_mode_dereferences_and_checks_the_document() {
    let dir = TempDir::new().unwrap();
    let source = write_spec(&dir, "api.yaml", PETSTORE);

    let document =
        parse_definition(&SpecEngine, &source, ParseMode::Validate, &ParserOptions::default())
            .unwrap();
    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(
        value["paths"]["/pets"]["get"]["responses"]["200"]["content"]["application/json"]
            ["schema"]["items"]["type"],
        "object"
    );
}

#[test]
fn info_projections_cover_the_whole_summary() {
    let dir = TempDir::new().unwrap();
    let source = write_spec(&dir, "api.yaml", PETSTORE);
    let document = SpecEngine.parse(&source, &ParserOptions::default()).unwrap();

    assert_eq!(
        reporter::info_lines(&document),
        vec![
            "title: Petstore",
            "version: 1.0.0",
            "contact: Jo Doe <jo@example.com>",
        ]
    );
    assert_eq!(
        reporter::operation_lines(&document),
        vec![
            "Operations:",
            "- GET /pets - List pets (listPets)",
            "- POST /pets (createPet)",
            "- GET /health - Health probe",
        ]
    );
    assert_eq!(
        reporter::schema_lines(&document),
        vec!["Schemas (2):", "- Pet", "- Error"]
    );
}

#[test]
fn bundle_combines_files_without_expanding_local_pointers() {
    let dir = TempDir::new().unwrap();
    write_spec(
        &dir,
        "shared.yaml",
        "Problem:\n  type: object\n  properties:\n    detail: {type: string}\n",
    );
    let source = write_spec(
        &dir,
        "api.yaml",
        r##"
openapi: 3.0.0
info: {title: Split, version: "1.0"}
paths:
  /things:
    get:
      responses:
        "400":
          description: bad request
          content:
            application/json:
              schema: {$ref: "#/components/schemas/Problem"}
components:
  schemas:
    Problem: {$ref: "./shared.yaml#/Problem"}
"##,
    );

    let document =
        parse_definition(&SpecEngine, &source, ParseMode::Bundle, &ParserOptions::default())
            .unwrap();
    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(
        value["components"]["schemas"]["Problem"]["properties"]["detail"]["type"],
        "string"
    );
    assert_eq!(
        value["paths"]["/things"]["get"]["responses"]["400"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/Problem"
    );
}

#[test]
fn config_file_resolution_from_a_nested_directory() {
    let home = TempDir::new().unwrap();
    let project = home.path().join("project");
    let nested = project.join("sub").join("dir");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        project.join(locator::CONFIG_FILENAME),
        "definition: ./api.yaml\n",
    )
    .unwrap();

    let config = locator::find_config_file(&nested, home.path()).unwrap();
    assert_eq!(config, project.join(locator::CONFIG_FILENAME));
}

#[test]
fn definition_argument_beats_ambient_channels() {
    let resolved = locator::resolve_definition(Some("https://example.com/spec.json")).unwrap();
    assert_eq!(resolved, Some("https://example.com/spec.json".to_string()));
}

#[test]
fn root_override_scenario_from_a_served_definition() {
    let dir = TempDir::new().unwrap();
    let source = write_spec(
        &dir,
        "api.yaml",
        r##"
openapi: 3.0.0
info: {title: Rooted, version: "1.0"}
servers:
  - url: https://api.example.com/old
paths: {}
"##,
    );

    let mut document = SpecEngine.parse(&source, &ParserOptions::default()).unwrap();
    normalize_servers(
        &mut document,
        &source,
        &NormalizeOptions {
            root: Some("v2".to_string()),
            ..Default::default()
        },
    );

    assert_eq!(
        document.servers.as_ref().unwrap()[0].url,
        "https://api.example.com/v2"
    );
}

#[test]
fn missing_definition_file_fails_without_output() {
    let missing = PathBuf::from("/definitely/not/here.yaml");
    let result = SpecEngine.parse(missing.to_str().unwrap(), &ParserOptions::default());
    assert!(result.is_err());
}
