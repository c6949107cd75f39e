use indexmap::IndexMap;
use serde_json::Value;

use crate::error::TransformError;
use crate::ir::{IrOperation, IrParameter, IrSpec, IrType};
use crate::parse::parameter::ParameterLocation;
use crate::parse::schema::Schema;
use crate::parse::security::SecurityScheme;
use crate::transform::collector::security_definition;
use crate::transform::name_normalizer;
use crate::transform::schema_resolver::{self, schema_to_ir_type};

/// Target-language rendering of an [`IrType`]. Every method matches on the same
/// descriptor, so type names, defaults and string conversions cannot disagree.
pub trait TypeMapper {
    /// Type name; a `Ref` is qualified with the API package when `imported`.
    fn map_type(&self, ty: &IrType, imported: bool) -> String;

    /// Zero value of a non-reference type.
    fn zero_value(&self, ty: &IrType, imported: bool) -> String;

    /// Empty literal of the object definition `name`.
    fn object_literal(&self, name: &str, imported: bool) -> String;

    /// Expression parsing the string expression `expr` into `ty`.
    /// Unknown types pass `expr` through.
    fn from_string(&self, ty: &IrType, expr: &str) -> String;

    /// Expression formatting `expr` of type `ty` as a string.
    /// Unknown types use a generic stringify.
    fn to_string(&self, ty: &IrType, expr: &str) -> String;

    /// Default value of `ty`. A reference to an object (or to nothing) is an
    /// empty literal of that type; any other reference takes the default of
    /// the definition it points at.
    fn default_value(
        &self,
        ty: &IrType,
        definitions: &IndexMap<String, Schema>,
        imported: bool,
    ) -> String {
        let mut current = ty.clone();
        let mut visited: Vec<String> = Vec::new();
        loop {
            let name = match &current {
                IrType::Ref(name) => name.clone(),
                other => return self.zero_value(other, imported),
            };
            match definitions.get(&name) {
                None | Some(Schema::Object(_)) => return self.object_literal(&name, imported),
                Some(_) if visited.contains(&name) => {
                    return self.zero_value(&IrType::Any, imported);
                }
                Some(definition) => {
                    current = schema_to_ir_type(definition);
                    visited.push(name);
                }
            }
        }
    }
}

/// The functions a renderer may call while walking an [`IrSpec`].
pub struct Helpers<'a> {
    ir: &'a IrSpec,
    mapper: &'a dyn TypeMapper,
}

impl<'a> Helpers<'a> {
    pub fn new(ir: &'a IrSpec, mapper: &'a dyn TypeMapper) -> Self {
        Self { ir, mapper }
    }

    pub fn definitions(&self) -> &'a IndexMap<String, Schema> {
        &self.ir.spec.definitions
    }

    pub fn map_type(&self, ty: &IrType, imported: bool) -> String {
        self.mapper.map_type(ty, imported)
    }

    pub fn default_value(&self, ty: &IrType, imported: bool) -> String {
        self.mapper.default_value(ty, self.definitions(), imported)
    }

    pub fn from_string(&self, ty: &IrType, expr: &str) -> String {
        self.mapper.from_string(ty, expr)
    }

    pub fn to_string(&self, ty: &IrType, expr: &str) -> String {
        self.mapper.to_string(ty, expr)
    }

    /// Render a literal, quoted and escaped when `ty` is string-typed.
    pub fn cast(&self, value: &Value, ty: &IrType) -> String {
        let raw = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if self.underlying(ty).is_string_like() {
            Value::String(raw).to_string()
        } else {
            raw
        }
    }

    /// Prefix every line with `// `.
    pub fn comment(&self, text: &str) -> String {
        text.lines()
            .map(|line| format!("// {line}").trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn label(&self, text: &str) -> String {
        name_normalizer::label(text)
    }

    pub fn pascal(&self, text: &str) -> String {
        name_normalizer::pascal_case(text)
    }

    pub fn private(&self, text: &str) -> String {
        name_normalizer::private_case(text)
    }

    pub fn is_ref(&self, ty: &IrType) -> bool {
        ty.is_ref()
    }

    /// The definition a schema resolves to, following references.
    pub fn resolve(&self, schema: &'a Schema) -> Option<&'a Schema> {
        schema_resolver::resolve(schema, self.definitions())
    }

    /// The type a reference stands for, unless it names an object.
    pub fn underlying(&self, ty: &IrType) -> IrType {
        schema_resolver::underlying_type(ty, self.definitions())
    }

    pub fn has_body(&self, op: &IrOperation) -> bool {
        op.has_body()
    }

    pub fn has_query_params(&self, op: &IrOperation) -> bool {
        op.has_query_params()
    }

    /// Parameters of `op` in `location`.
    pub fn inside<'o>(
        &self,
        op: &'o IrOperation,
        location: ParameterLocation,
    ) -> Vec<&'o IrParameter> {
        op.parameters_in(location).collect()
    }

    pub fn secured(&self, op: &IrOperation) -> bool {
        op.secured()
    }

    pub fn sec_def(&self, name: &str) -> Result<&'a SecurityScheme, TransformError> {
        security_definition(&self.ir.spec, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IntWidth;
    use crate::parse;
    use crate::transform::transform;

    /// Spells types the way a test reader expects, without any real target.
    struct Plain;

    impl TypeMapper for Plain {
        fn map_type(&self, ty: &IrType, imported: bool) -> String {
            match ty {
                IrType::Ref(name) if imported => format!("api.{name}"),
                IrType::Ref(name) => name.clone(),
                IrType::Array(items) => format!("[]{}", self.map_type(items, imported)),
                other => format!("{other:?}"),
            }
        }

        fn zero_value(&self, ty: &IrType, _imported: bool) -> String {
            match ty {
                IrType::String => "\"\"".into(),
                IrType::Integer { .. } => "0".into(),
                _ => "nil".into(),
            }
        }

        fn object_literal(&self, name: &str, imported: bool) -> String {
            format!("{}{{}}", self.map_type(&IrType::Ref(name.into()), imported))
        }

        fn from_string(&self, _ty: &IrType, expr: &str) -> String {
            expr.to_string()
        }

        fn to_string(&self, _ty: &IrType, expr: &str) -> String {
            expr.to_string()
        }
    }

    const DOC: &str = r#"
swagger: "2.0"
securityDefinitions:
  api_key:
    type: apiKey
    name: X-API-Key
    in: header
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - name: limit
          in: query
          type: integer
definitions:
  Pet:
    type: object
  Name:
    type: string
  Alias:
    $ref: '#/definitions/Name'
  Loop:
    $ref: '#/definitions/Loop'
"#;

    fn ir() -> IrSpec {
        transform(parse::from_yaml(DOC).unwrap()).unwrap()
    }

    #[test]
    fn default_value_follows_references() {
        let ir = ir();
        let helpers = Helpers::new(&ir, &Plain);
        assert_eq!(helpers.default_value(&IrType::Ref("Pet".into()), true), "api.Pet{}");
        assert_eq!(helpers.default_value(&IrType::Ref("Alias".into()), false), "\"\"");
        assert_eq!(helpers.default_value(&IrType::Ref("Missing".into()), false), "Missing{}");
        assert_eq!(helpers.default_value(&IrType::Ref("Loop".into()), false), "nil");
        let unsigned = IrType::Integer {
            width: IntWidth::W64,
            unsigned: true,
        };
        assert_eq!(helpers.default_value(&unsigned, false), "0");
    }

    #[test]
    fn cast_quotes_string_types_only() {
        let ir = ir();
        let helpers = Helpers::new(&ir, &Plain);
        assert_eq!(
            helpers.cast(&Value::from("say \"hi\""), &IrType::String),
            r#""say \"hi\"""#
        );
        assert_eq!(helpers.cast(&Value::from("x"), &IrType::Ref("Alias".into())), "\"x\"");
        assert_eq!(helpers.cast(&Value::from(5), &IrType::Double), "5");
        assert_eq!(helpers.cast(&Value::from("5"), &IrType::Double), "5");
    }

    #[test]
    fn comment_and_identifier_helpers() {
        let ir = ir();
        let helpers = Helpers::new(&ir, &Plain);
        assert_eq!(helpers.comment("first\n\nsecond"), "// first\n//\n// second");
        assert_eq!(helpers.label("pet_id"), "PetId");
        assert_eq!(helpers.private("PetId"), "petId");
        assert_eq!(helpers.pascal("api_key"), "ApiKey");
    }

    #[test]
    fn operation_queries_and_security_lookup() {
        let ir = ir();
        let helpers = Helpers::new(&ir, &Plain);
        let op = ir.operation("listPets").unwrap();
        assert!(helpers.has_query_params(op));
        assert!(!helpers.has_body(op));
        assert!(!helpers.secured(op));
        assert_eq!(helpers.inside(op, ParameterLocation::Query).len(), 1);
        assert!(helpers.inside(op, ParameterLocation::Header).is_empty());

        assert_eq!(helpers.sec_def("api_key").unwrap().name.as_deref(), Some("X-API-Key"));
        assert!(helpers.sec_def("oauth").is_err());

        let alias = &ir.spec.definitions["Alias"];
        assert_eq!(helpers.resolve(alias).and_then(Schema::type_name), Some("string"));
        assert!(!helpers.is_ref(&op.parameters[0].param_type));
    }
}
