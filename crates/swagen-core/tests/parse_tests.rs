use swagen_core::error::ParseError;
use swagen_core::parse;
use swagen_core::parse::operation::HttpMethod;
use swagen_core::parse::parameter::ParameterLocation;
use swagen_core::parse::schema::Schema;
use swagen_core::parse::security::{ApiKeyLocation, SecuritySchemeType};

const PETSTORE: &str = include_str!("fixtures/petstore-2.0.yaml");

#[test]
fn parse_petstore_yaml() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    assert_eq!(spec.swagger, "2.0");
    assert_eq!(spec.info.title, "Petstore");
    assert_eq!(spec.base_path.as_deref(), Some("/v1"));
    assert_eq!(spec.credential_type.as_deref(), Some("Credential"));
    assert_eq!(spec.paths.len(), 4);
    assert_eq!(spec.definitions.len(), 6);

    let pets = &spec.paths["/pets"];
    let methods: Vec<HttpMethod> = pets.operations.keys().copied().collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);

    let list = &pets.operations[&HttpMethod::Get];
    assert_eq!(list.operation_id.as_deref(), Some("listPets"));
    assert_eq!(list.parameters[1].list_separator(), None);
    assert!(list.responses.contains_key("200"));
    assert!(list.responses.contains_key("default"));
}

#[test]
fn parse_security_definitions() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let api_key = &spec.security_definitions["api_key"];
    assert_eq!(api_key.scheme_type, SecuritySchemeType::ApiKey);
    assert_eq!(api_key.location, Some(ApiKeyLocation::Header));
    assert_eq!(spec.security_definitions["basic"].scheme_type, SecuritySchemeType::Basic);

    let delete = &spec.paths["/pets/{petId}"].operations[&HttpMethod::Delete];
    assert_eq!(delete.security, Some(vec![]));
}

#[test]
fn parse_path_level_parameters() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let item = &spec.paths["/pets/{petId}"];
    assert_eq!(item.parameters.len(), 1);
    assert_eq!(item.parameters[0].location, ParameterLocation::Path);
    assert!(item.parameters[0].required);
}

#[test]
fn parse_definitions_into_variants() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    assert!(matches!(spec.definitions["Pet"], Schema::Object(_)));
    assert!(matches!(spec.definitions["PetStatus"], Schema::Enum(_)));
    assert!(matches!(spec.definitions["Level"], Schema::Enum(_)));
    assert!(matches!(spec.definitions["PetIds"], Schema::Array(_)));
}

#[test]
fn parse_json_document() {
    let json = r#"{
        "swagger": "2.0",
        "info": {"title": "Tiny", "version": "0.1"},
        "paths": {"/ping": {"get": {"responses": {"200": {"description": "pong"}}}}}
    }"#;
    let spec = parse::from_json(json).unwrap();
    assert_eq!(spec.info.title, "Tiny");
    assert!(spec.paths["/ping"].operations[&HttpMethod::Get].operation_id.is_none());
}

#[test]
fn parse_invalid_version() {
    let err = parse::from_yaml("swagger: '1.2'\n").unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedVersion(_)));
}

#[test]
fn parse_invalid_reference() {
    let yaml = r#"
swagger: "2.0"
paths: {}
definitions:
  Pet:
    $ref: 'other.yaml#/Pet'
"#;
    let err = parse::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("invalid reference format"));
}

#[test]
fn normalized_document_round_trips() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let yaml = serde_yaml_ng::to_string(&spec).unwrap();
    let again = parse::from_yaml(&yaml).unwrap();
    assert_eq!(spec, again);
}
