use swagen_core::config::GeneratorConfig;
use swagen_core::{CodeGenerator, parse, transform};
use swagen_typescript::TypeScriptGenerator;

const PETSTORE: &str = include_str!("../../swagen-core/tests/fixtures/petstore-2.0.yaml");

fn types_ts(yaml: &str) -> String {
    let ir = transform::transform(parse::from_yaml(yaml).unwrap()).unwrap();
    let files = TypeScriptGenerator
        .generate(&ir, &GeneratorConfig::new("api"))
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "types.ts");
    files[0].content.clone()
}

#[test]
fn petstore_types() {
    let ts = types_ts(PETSTORE);

    assert!(ts.starts_with(
        "// Code generated by swagen. DO NOT EDIT.\n\nexport type Level = 1 | 2 | 3;\n"
    ));
    assert!(ts.contains("export type PetStatus = \"available\" | \"pending\" | \"sold\";\n"));
    assert!(ts.contains("export type PetIds = number[];\n"));
    assert!(ts.contains(
        "export interface Pet {\n  id: number;\n  name: string;\n  status?: PetStatus;\n  born?: Date;\n  tags?: string[];\n}\n"
    ));
    assert!(ts.contains(
        "export interface CreateUserBody {\n  name: string;\n  address?: CreateUserBodyAddress;\n}\n"
    ));
}

#[test]
fn petstore_api_interfaces() {
    let ts = types_ts(PETSTORE);

    assert!(ts.contains("/** Operations tagged `pets`. */\nexport interface PetsAPI {\n"));
    assert!(ts.contains(
        "  /** List all pets */\n  listPets(params?: { limit?: number; status?: string[] }): Promise<Pet[]>;\n"
    ));
    assert!(ts.contains("  showPetById(params: { petId: number }): Promise<Pet>;\n"));
    assert!(ts.contains("  deletePetsByPetid(params: { petId: number }): Promise<void>;\n"));
    assert!(ts.contains(
        "  getUsersById(params: { id: string; \"X-Request-Id\"?: string }): Promise<User>;\n"
    ));
    assert!(ts.ends_with("export interface API extends PetsAPI, UsersAPI {\n}"));
}

#[test]
fn untagged_operations_and_field_modifiers() {
    let ts = types_ts(
        r#"
swagger: "2.0"
info:
  title: Tiny
paths:
  /ping:
    get:
      operationId: ping
      deprecated: true
      responses:
        200:
          description: ok
          schema:
            type: boolean
definitions:
  Audit:
    description: "Audit record */ with a comment terminator"
    type: object
    required: [at]
    properties:
      at:
        type: string
        format: date-time
        readOnly: true
      note:
        type: string
        x-nullable: true
    additionalProperties:
      type: integer
"#,
    );

    insta::assert_snapshot!(ts, @r#"
    // Code generated by swagen. DO NOT EDIT.

    /** Audit record *\/ with a comment terminator */
    export interface Audit {
      readonly at: Date;
      note?: string | null;
      [key: string]: unknown;
    }

    /** Every operation of Tiny. */
    export interface API {
      /** @deprecated */
      ping(): Promise<boolean>;
    }
    "#);
}
