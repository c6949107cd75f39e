use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Prefix of every `$ref` a Swagger 2.0 schema may carry.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// The primitive `type` keywords with a concrete mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Boolean,
    Number,
    Integer,
}

impl PrimitiveType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(PrimitiveType::String),
            "boolean" => Some(PrimitiveType::Boolean),
            "number" => Some(PrimitiveType::Number),
            "integer" => Some(PrimitiveType::Integer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
        }
    }

    /// Guess the type of an untyped enum from its first literal.
    fn infer(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(PrimitiveType::String),
            Value::Bool(_) => Some(PrimitiveType::Boolean),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(PrimitiveType::Integer),
            Value::Number(_) => Some(PrimitiveType::Number),
            _ => None,
        }
    }
}

/// Keywords shared by every schema variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub default_value: Option<Value>,
    pub example: Option<Value>,
    /// `x-nullable`
    pub nullable: bool,
    pub read_only: bool,
}

/// Validation keywords for primitives and arrays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Constraints {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        *self == Constraints::default()
    }
}

/// `$ref: '#/definitions/<name>'`
#[derive(Debug, Clone, PartialEq)]
pub struct RefSchema {
    pub name: String,
    pub meta: SchemaMeta,
}

impl RefSchema {
    pub fn ref_path(&self) -> String {
        format!("{DEFINITIONS_PREFIX}{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, Schema>,
    pub required: Vec<String>,
    pub additional_properties: Option<AdditionalProperties>,
    pub meta: SchemaMeta,
}

impl ObjectSchema {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub constraints: Constraints,
    pub meta: SchemaMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSchema {
    pub primitive: PrimitiveType,
    pub format: Option<String>,
    pub constraints: Constraints,
    pub meta: SchemaMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub primitive: PrimitiveType,
    pub format: Option<String>,
    /// Allowed literals in document order; never empty.
    pub values: Vec<Value>,
    pub meta: SchemaMeta,
}

/// A node without a usable type: free-form values, `file`, or unknown type names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnySchema {
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub meta: SchemaMeta,
}

/// One node of the Swagger type tree. Exactly one variant is active and the
/// shape is validated once, when the document is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema", into = "RawSchema")]
pub enum Schema {
    Ref(RefSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Primitive(PrimitiveSchema),
    Enum(EnumSchema),
    Any(AnySchema),
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

impl Schema {
    /// A reference to the top-level definition `name`.
    pub fn reference(name: impl Into<String>) -> Self {
        Schema::Ref(RefSchema {
            name: name.into(),
            meta: SchemaMeta::default(),
        })
    }

    pub fn any() -> Self {
        Schema::Any(AnySchema::default())
    }

    pub fn primitive(primitive: PrimitiveType, format: Option<&str>) -> Self {
        Schema::Primitive(PrimitiveSchema {
            primitive,
            format: format.map(str::to_string),
            constraints: Constraints::default(),
            meta: SchemaMeta::default(),
        })
    }

    pub fn array_of(items: Schema) -> Self {
        Schema::Array(ArraySchema {
            items: Box::new(items),
            constraints: Constraints::default(),
            meta: SchemaMeta::default(),
        })
    }

    pub fn meta(&self) -> &SchemaMeta {
        match self {
            Schema::Ref(r) => &r.meta,
            Schema::Object(o) => &o.meta,
            Schema::Array(a) => &a.meta,
            Schema::Primitive(p) => &p.meta,
            Schema::Enum(e) => &e.meta,
            Schema::Any(a) => &a.meta,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.meta().description.as_deref()
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Schema::Ref(_))
    }

    pub fn ref_name(&self) -> Option<&str> {
        match self {
            Schema::Ref(r) => Some(&r.name),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Schema::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Schema::Array(_))
    }

    /// The `type` keyword this node serializes with, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Schema::Ref(_) => None,
            Schema::Object(_) => Some("object"),
            Schema::Array(_) => Some("array"),
            Schema::Primitive(p) => Some(p.primitive.as_str()),
            Schema::Enum(e) => Some(e.primitive.as_str()),
            Schema::Any(a) => a.schema_type.as_deref(),
        }
    }

    /// Validation keywords, for the variants that carry them.
    pub fn constraints(&self) -> Option<&Constraints> {
        match self {
            Schema::Array(a) => Some(&a.constraints),
            Schema::Primitive(p) => Some(&p.constraints),
            _ => None,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The wire shape of a schema: every keyword optional, exactly as written in the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawSchema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub(crate) default_value: Option<Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) properties: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) items: Option<Box<Schema>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) enum_values: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) maximum: Option<f64>,
    #[serde(rename = "exclusiveMinimum", default, skip_serializing_if = "is_false")]
    pub(crate) exclusive_minimum: bool,
    #[serde(rename = "exclusiveMaximum", default, skip_serializing_if = "is_false")]
    pub(crate) exclusive_maximum: bool,

    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub(crate) min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub(crate) max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) pattern: Option<String>,

    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub(crate) min_items: Option<u64>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub(crate) max_items: Option<u64>,
    #[serde(rename = "uniqueItems", default, skip_serializing_if = "is_false")]
    pub(crate) unique_items: bool,

    #[serde(rename = "readOnly", default, skip_serializing_if = "is_false")]
    pub(crate) read_only: bool,

    #[serde(rename = "x-nullable", default, skip_serializing_if = "is_false")]
    pub(crate) nullable: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) example: Option<Value>,
}

impl TryFrom<RawSchema> for Schema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let RawSchema {
            ref_path,
            schema_type,
            format,
            title,
            description,
            default_value,
            properties,
            required,
            additional_properties,
            items,
            enum_values,
            minimum,
            maximum,
            exclusive_minimum,
            exclusive_maximum,
            min_length,
            max_length,
            pattern,
            min_items,
            max_items,
            unique_items,
            read_only,
            nullable,
            example,
        } = raw;

        let meta = SchemaMeta {
            title,
            description,
            default_value,
            example,
            nullable,
            read_only,
        };

        if let Some(ref_path) = ref_path {
            if !properties.is_empty() {
                return Err(SchemaError::RefWithProperties(ref_path));
            }
            let name = match ref_path.strip_prefix(DEFINITIONS_PREFIX) {
                Some(name) if !name.is_empty() && !name.contains('/') => name.to_string(),
                _ => return Err(SchemaError::InvalidRefFormat(ref_path)),
            };
            return Ok(Schema::Ref(RefSchema { name, meta }));
        }

        let constraints = Constraints {
            minimum,
            maximum,
            exclusive_minimum,
            exclusive_maximum,
            min_length,
            max_length,
            pattern,
            min_items,
            max_items,
            unique_items,
        };

        match schema_type.as_deref() {
            Some("array") => {
                let items = items.unwrap_or_else(|| {
                    log::warn!("array schema without items, treating items as untyped");
                    Box::new(Schema::any())
                });
                Ok(Schema::Array(ArraySchema {
                    items,
                    constraints,
                    meta,
                }))
            }
            Some("object") => Ok(Schema::Object(ObjectSchema {
                properties,
                required,
                additional_properties,
                meta,
            })),
            None if !properties.is_empty() => Ok(Schema::Object(ObjectSchema {
                properties,
                required,
                additional_properties,
                meta,
            })),
            type_name => {
                let primitive = type_name.and_then(PrimitiveType::parse);
                let inferred = enum_values.first().and_then(PrimitiveType::infer);

                if !enum_values.is_empty() {
                    let enum_type = match type_name {
                        Some(_) => primitive,
                        None => inferred,
                    };
                    if let Some(primitive) = enum_type {
                        return Ok(Schema::Enum(EnumSchema {
                            primitive,
                            format,
                            values: enum_values,
                            meta,
                        }));
                    }
                }

                match primitive {
                    Some(primitive) => Ok(Schema::Primitive(PrimitiveSchema {
                        primitive,
                        format,
                        constraints,
                        meta,
                    })),
                    None => {
                        if let Some(unknown) = type_name {
                            log::warn!("unsupported schema type {unknown:?}, treating as untyped");
                        }
                        Ok(Schema::Any(AnySchema {
                            schema_type: schema_type.clone(),
                            format,
                            meta,
                        }))
                    }
                }
            }
        }
    }
}

impl From<Schema> for RawSchema {
    fn from(schema: Schema) -> Self {
        fn with_meta(meta: SchemaMeta) -> RawSchema {
            RawSchema {
                title: meta.title,
                description: meta.description,
                default_value: meta.default_value,
                example: meta.example,
                nullable: meta.nullable,
                read_only: meta.read_only,
                ..RawSchema::default()
            }
        }

        fn with_constraints(mut raw: RawSchema, c: Constraints) -> RawSchema {
            raw.minimum = c.minimum;
            raw.maximum = c.maximum;
            raw.exclusive_minimum = c.exclusive_minimum;
            raw.exclusive_maximum = c.exclusive_maximum;
            raw.min_length = c.min_length;
            raw.max_length = c.max_length;
            raw.pattern = c.pattern;
            raw.min_items = c.min_items;
            raw.max_items = c.max_items;
            raw.unique_items = c.unique_items;
            raw
        }

        match schema {
            Schema::Ref(r) => {
                let ref_path = r.ref_path();
                RawSchema {
                    ref_path: Some(ref_path),
                    ..with_meta(r.meta)
                }
            }
            Schema::Object(o) => RawSchema {
                schema_type: Some("object".to_string()),
                properties: o.properties,
                required: o.required,
                additional_properties: o.additional_properties,
                ..with_meta(o.meta)
            },
            Schema::Array(a) => {
                let raw = RawSchema {
                    schema_type: Some("array".to_string()),
                    items: Some(a.items),
                    ..with_meta(a.meta)
                };
                with_constraints(raw, a.constraints)
            }
            Schema::Primitive(p) => {
                let raw = RawSchema {
                    schema_type: Some(p.primitive.as_str().to_string()),
                    format: p.format,
                    ..with_meta(p.meta)
                };
                with_constraints(raw, p.constraints)
            }
            Schema::Enum(e) => RawSchema {
                schema_type: Some(e.primitive.as_str().to_string()),
                format: e.format,
                enum_values: e.values,
                ..with_meta(e.meta)
            },
            Schema::Any(a) => RawSchema {
                schema_type: a.schema_type,
                format: a.format,
                ..with_meta(a.meta)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Schema {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn classifies_reference() {
        let schema = parse("$ref: '#/definitions/Pet'");
        assert_eq!(schema.ref_name(), Some("Pet"));
    }

    #[test]
    fn rejects_non_definition_reference() {
        let err = serde_yaml_ng::from_str::<Schema>("$ref: '#/parameters/limit'").unwrap_err();
        assert!(err.to_string().contains("invalid reference format"));
    }

    #[test]
    fn rejects_reference_with_properties() {
        let yaml = r#"
$ref: '#/definitions/Pet'
properties:
  name:
    type: string
"#;
        let err = serde_yaml_ng::from_str::<Schema>(yaml).unwrap_err();
        assert!(err.to_string().contains("must not carry inline properties"));
    }

    #[test]
    fn untyped_schema_with_properties_is_object() {
        let schema = parse("properties:\n  id:\n    type: integer\n");
        match schema {
            Schema::Object(o) => assert!(o.properties.contains_key("id")),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn integer_keeps_format_and_minimum() {
        let schema = parse("type: integer\nformat: int64\nminimum: 0\n");
        match schema {
            Schema::Primitive(p) => {
                assert_eq!(p.primitive, PrimitiveType::Integer);
                assert_eq!(p.format.as_deref(), Some("int64"));
                assert_eq!(p.constraints.minimum, Some(0.0));
            }
            other => panic!("expected primitive, got {other:?}"),
        }
    }

    #[test]
    fn enum_type_is_inferred_from_values() {
        match parse("enum: [1, 2, 3]") {
            Schema::Enum(e) => {
                assert_eq!(e.primitive, PrimitiveType::Integer);
                assert_eq!(e.values.len(), 3);
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_degrades_to_any() {
        match parse("type: file") {
            Schema::Any(a) => assert_eq!(a.schema_type.as_deref(), Some("file")),
            other => panic!("expected any, got {other:?}"),
        }
        assert!(matches!(parse("description: anything"), Schema::Any(_)));
    }

    #[test]
    fn array_without_items_is_tolerated() {
        match parse("type: array") {
            Schema::Array(a) => assert!(matches!(*a.items, Schema::Any(_))),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn serializes_back_to_swagger_keywords() {
        let yaml = r#"
type: object
required: [name]
properties:
  name:
    type: string
    maxLength: 64
  tags:
    type: array
    items:
      $ref: '#/definitions/Tag'
"#;
        let schema = parse(yaml);
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string", "maxLength": 64},
                    "tags": {"type": "array", "items": {"$ref": "#/definitions/Tag"}}
                }
            })
        );
    }
}
