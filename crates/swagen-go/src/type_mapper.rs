use swagen_core::helpers::TypeMapper;
use swagen_core::ir::{IntWidth, IrType};
use swagen_core::transform::name_normalizer::{label, private_case};

/// Import alias of the generated API package inside the server and client packages.
pub const API_ALIAS: &str = "api";

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Names the generated handlers and client methods declare or import themselves.
const RESERVED_LOCALS: &[&str] = &[
    "api", "bytes", "c", "context", "cred", "ctx", "data", "err", "errors", "fmt", "form", "http",
    "io", "item", "join", "json", "out", "payload", "query", "r", "raw", "regexp", "req", "s",
    "security", "strconv", "strings", "time", "u", "url", "utf8", "v", "w",
];

/// Exported Go identifier for a document name: `pet_id` → `PetId`, `X-Request-Id` → `XRequestId`.
pub fn go_name(text: &str) -> String {
    let name = label(&identifier_words(text));
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("N{name}")
    } else {
        name
    }
}

/// Unexported Go identifier, safe to use as a local variable.
pub fn go_local(text: &str) -> String {
    let name = private_case(&identifier_words(text));
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("p{name}")
    } else if KEYWORDS.contains(&name.as_str()) || RESERVED_LOCALS.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

fn identifier_words(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Go rendering of [`IrType`].
#[derive(Debug, Clone, Default)]
pub struct GoTypeMapper;

impl GoTypeMapper {
    /// Whether [`TypeMapper::from_string`] yields a `(value, error)` pair.
    pub fn parse_is_fallible(&self, ty: &IrType) -> bool {
        matches!(
            ty,
            IrType::DateTime
                | IrType::Boolean
                | IrType::Float
                | IrType::Double
                | IrType::Integer { .. }
        )
    }
}

impl TypeMapper for GoTypeMapper {
    fn map_type(&self, ty: &IrType, imported: bool) -> String {
        match ty {
            IrType::String | IrType::Date => "string".to_string(),
            IrType::DateTime => "time.Time".to_string(),
            IrType::Boolean => "bool".to_string(),
            IrType::Float => "float32".to_string(),
            IrType::Double => "float64".to_string(),
            IrType::Integer { width, unsigned } => {
                let base = match width {
                    IntWidth::W32 => "int32",
                    IntWidth::W64 => "int64",
                    IntWidth::Platform => "int",
                };
                if *unsigned {
                    format!("u{base}")
                } else {
                    base.to_string()
                }
            }
            IrType::Array(items) => format!("[]{}", self.map_type(items, imported)),
            IrType::Ref(name) if imported => format!("{API_ALIAS}.{}", go_name(name)),
            IrType::Ref(name) => go_name(name),
            IrType::Any => "interface{}".to_string(),
        }
    }

    fn zero_value(&self, ty: &IrType, imported: bool) -> String {
        match ty {
            IrType::String | IrType::Date => "\"\"".to_string(),
            IrType::DateTime => "time.Time{}".to_string(),
            IrType::Boolean => "false".to_string(),
            IrType::Float | IrType::Double | IrType::Integer { .. } => "0".to_string(),
            IrType::Array(_) | IrType::Any => "nil".to_string(),
            IrType::Ref(name) => self.object_literal(name, imported),
        }
    }

    fn object_literal(&self, name: &str, imported: bool) -> String {
        format!("{}{{}}", self.map_type(&IrType::Ref(name.to_string()), imported))
    }

    fn from_string(&self, ty: &IrType, expr: &str) -> String {
        match ty {
            IrType::DateTime => format!("time.Parse(time.RFC3339, {expr})"),
            IrType::Boolean => format!("strconv.ParseBool({expr})"),
            IrType::Float => format!("strconv.ParseFloat({expr}, 32)"),
            IrType::Double => format!("strconv.ParseFloat({expr}, 64)"),
            IrType::Integer { width, unsigned } => {
                let bits = match width {
                    IntWidth::W32 => 32,
                    IntWidth::W64 | IntWidth::Platform => 64,
                };
                if *unsigned {
                    format!("strconv.ParseUint({expr}, 10, {bits})")
                } else {
                    format!("strconv.ParseInt({expr}, 10, {bits})")
                }
            }
            _ => expr.to_string(),
        }
    }

    fn to_string(&self, ty: &IrType, expr: &str) -> String {
        match ty {
            IrType::String | IrType::Date => expr.to_string(),
            IrType::DateTime => format!("{expr}.Format(time.RFC3339)"),
            IrType::Boolean => format!("strconv.FormatBool({expr})"),
            IrType::Float => format!("strconv.FormatFloat(float64({expr}), 'f', -1, 32)"),
            IrType::Double => format!("strconv.FormatFloat({expr}, 'f', -1, 64)"),
            IrType::Integer {
                width: IntWidth::W64,
                unsigned: false,
            } => format!("strconv.FormatInt({expr}, 10)"),
            IrType::Integer {
                unsigned: false, ..
            } => format!("strconv.FormatInt(int64({expr}), 10)"),
            IrType::Integer {
                width: IntWidth::W64,
                unsigned: true,
            } => format!("strconv.FormatUint({expr}, 10)"),
            IrType::Integer { unsigned: true, .. } => {
                format!("strconv.FormatUint(uint64({expr}), 10)")
            }
            _ => format!("fmt.Sprint({expr})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use swagen_core::parse::schema::Schema;

    use super::*;

    const U64: IrType = IrType::Integer {
        width: IntWidth::W64,
        unsigned: true,
    };

    #[test]
    fn test_primitives() {
        let m = GoTypeMapper;
        assert_eq!(m.map_type(&IrType::String, false), "string");
        assert_eq!(m.map_type(&IrType::DateTime, false), "time.Time");
        assert_eq!(m.map_type(&IrType::Boolean, false), "bool");
        assert_eq!(m.map_type(&IrType::Float, false), "float32");
        assert_eq!(m.map_type(&IrType::Double, false), "float64");
        assert_eq!(m.map_type(&U64, false), "uint64");
        assert_eq!(
            m.map_type(
                &IrType::Integer {
                    width: IntWidth::Platform,
                    unsigned: false
                },
                false
            ),
            "int"
        );
        assert_eq!(m.map_type(&IrType::Any, false), "interface{}");
    }

    #[test]
    fn test_refs_and_arrays() {
        let m = GoTypeMapper;
        let pets = IrType::Array(Box::new(IrType::Ref("createUserBody".into())));
        assert_eq!(m.map_type(&pets, false), "[]CreateUserBody");
        assert_eq!(m.map_type(&pets, true), "[]api.CreateUserBody");
    }

    #[test]
    fn test_default_values() {
        let m = GoTypeMapper;
        let mut definitions = IndexMap::new();
        definitions.insert(
            "Pet".to_string(),
            serde_json::from_str::<Schema>(r#"{"type": "object"}"#).unwrap(),
        );
        assert_eq!(m.default_value(&U64, &definitions, false), "0");
        assert_eq!(m.default_value(&IrType::DateTime, &definitions, false), "time.Time{}");
        assert_eq!(
            m.default_value(&IrType::Array(Box::new(IrType::String)), &definitions, false),
            "nil"
        );
        assert_eq!(
            m.default_value(&IrType::Ref("Pet".into()), &definitions, true),
            "api.Pet{}"
        );
    }

    #[test]
    fn test_string_conversions_agree_on_width() {
        let m = GoTypeMapper;
        let i32t = IrType::Integer {
            width: IntWidth::W32,
            unsigned: false,
        };
        assert_eq!(m.from_string(&i32t, "raw"), "strconv.ParseInt(raw, 10, 32)");
        assert_eq!(m.to_string(&i32t, "v"), "strconv.FormatInt(int64(v), 10)");
        assert_eq!(m.from_string(&U64, "raw"), "strconv.ParseUint(raw, 10, 64)");
        assert_eq!(m.to_string(&U64, "v"), "strconv.FormatUint(v, 10)");
        assert_eq!(m.from_string(&IrType::Float, "raw"), "strconv.ParseFloat(raw, 32)");
        assert_eq!(
            m.to_string(&IrType::Float, "v"),
            "strconv.FormatFloat(float64(v), 'f', -1, 32)"
        );
        assert_eq!(m.to_string(&IrType::Boolean, "ok"), "strconv.FormatBool(ok)");
        assert_eq!(m.from_string(&IrType::String, "raw"), "raw");
        assert_eq!(m.to_string(&IrType::Any, "v"), "fmt.Sprint(v)");
        assert!(!m.parse_is_fallible(&IrType::String));
        assert!(m.parse_is_fallible(&U64));
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(go_name("X-Request-Id"), "XRequestId");
        assert_eq!(go_name("pet_id"), "PetId");
        assert_eq!(go_name("2fa"), "N2fa");
        assert_eq!(go_local("X-Request-Id"), "xRequestId");
        assert_eq!(go_local("type"), "type_");
        assert_eq!(go_local("api"), "api_");
        assert_eq!(go_local("query"), "query_");
        assert_eq!(go_local("petId"), "petId");
    }
}
