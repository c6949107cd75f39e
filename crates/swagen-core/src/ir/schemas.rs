use serde_json::Value;

use super::types::NormalizedName;
use crate::parse::schema::Constraints;

/// Width selected by an integer `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W32,
    W64,
    /// No recognised format: the target's default integer.
    Platform,
}

/// Language-neutral type descriptor of a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrType {
    String,
    /// `string` + `date`
    Date,
    /// `string` + `date-time`
    DateTime,
    Boolean,
    /// `number` + `float`
    Float,
    Double,
    Integer {
        width: IntWidth,
        unsigned: bool,
    },
    Array(Box<IrType>),
    /// Reference to a top-level definition, by its document name.
    Ref(String),
    Any,
}

impl IrType {
    pub fn is_ref(&self) -> bool {
        matches!(self, IrType::Ref(_))
    }

    pub fn ref_name(&self) -> Option<&str> {
        match self {
            IrType::Ref(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, IrType::Array(_))
    }

    /// Whether literals of this type are written as quoted strings.
    pub fn is_string_like(&self) -> bool {
        matches!(self, IrType::String | IrType::Date | IrType::DateTime)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            IrType::Float | IrType::Double | IrType::Integer { .. }
        )
    }
}

/// A top-level object definition.
#[derive(Debug, Clone)]
pub struct IrObject {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub fields: Vec<IrField>,
    pub additional_properties: Option<IrType>,
}

/// A property of an object definition.
#[derive(Debug, Clone)]
pub struct IrField {
    pub name: NormalizedName,
    pub original_name: String,
    pub field_type: IrType,
    pub required: bool,
    pub description: Option<String>,
    pub nullable: bool,
    pub read_only: bool,
    pub constraints: Constraints,
    /// Constraints of the items when the field is an array.
    pub item_constraints: Constraints,
}

/// A top-level enum definition.
#[derive(Debug, Clone)]
pub struct IrEnum {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub base: IrType,
    pub variants: Vec<IrEnumVariant>,
}

#[derive(Debug, Clone)]
pub struct IrEnumVariant {
    pub name: NormalizedName,
    pub value: Value,
}

/// A top-level definition that is neither an enum nor an object (`type Ids []int64`).
#[derive(Debug, Clone)]
pub struct IrAlias {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub target: IrType,
}
