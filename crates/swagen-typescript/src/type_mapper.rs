use swagen_core::helpers::TypeMapper;
use swagen_core::ir::IrType;
use swagen_core::transform::name_normalizer::label;

/// TypeScript rendering of [`IrType`]. Everything lives in one module, so
/// `imported` never changes a name.
#[derive(Debug, Clone, Default)]
pub struct TsTypeMapper;

impl TypeMapper for TsTypeMapper {
    fn map_type(&self, ty: &IrType, imported: bool) -> String {
        match ty {
            IrType::String => "string".to_string(),
            IrType::Date | IrType::DateTime => "Date".to_string(),
            IrType::Boolean => "boolean".to_string(),
            IrType::Float | IrType::Double | IrType::Integer { .. } => "number".to_string(),
            IrType::Array(items) => format!("{}[]", self.map_type(items, imported)),
            IrType::Ref(name) => label(name),
            IrType::Any => "any".to_string(),
        }
    }

    fn zero_value(&self, ty: &IrType, imported: bool) -> String {
        match ty {
            IrType::String => "\"\"".to_string(),
            IrType::Date | IrType::DateTime => "new Date(0)".to_string(),
            IrType::Boolean => "false".to_string(),
            IrType::Float | IrType::Double | IrType::Integer { .. } => "0".to_string(),
            IrType::Array(_) => "[]".to_string(),
            IrType::Any => "undefined".to_string(),
            IrType::Ref(name) => self.object_literal(name, imported),
        }
    }

    fn object_literal(&self, name: &str, _imported: bool) -> String {
        format!("{{}} as {}", label(name))
    }

    fn from_string(&self, ty: &IrType, expr: &str) -> String {
        match ty {
            IrType::Date | IrType::DateTime => format!("new Date({expr})"),
            IrType::Boolean => format!("{expr} === \"true\""),
            IrType::Float | IrType::Double | IrType::Integer { .. } => format!("Number({expr})"),
            _ => expr.to_string(),
        }
    }

    fn to_string(&self, ty: &IrType, expr: &str) -> String {
        match ty {
            IrType::String => expr.to_string(),
            IrType::DateTime => format!("{expr}.toISOString()"),
            IrType::Date => format!("{expr}.toISOString().slice(0, 10)"),
            _ => format!("String({expr})"),
        }
    }
}
