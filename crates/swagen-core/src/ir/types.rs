use std::fmt;

use indexmap::IndexMap;

use super::operations::IrOperation;
use super::schemas::{IrAlias, IrEnum, IrObject};
use crate::parse::spec::SwaggerSpec;

/// The generator-ready model of a normalized Swagger document.
#[derive(Debug, Clone)]
pub struct IrSpec {
    /// The document after default security, operation ids and hoisting were applied.
    pub spec: SwaggerSpec,
    pub info: IrInfo,
    /// Sorted by operation id.
    pub operations: Vec<IrOperation>,
    /// Operation id → index into `operations`.
    pub operations_by_name: IndexMap<String, usize>,
    /// Sorted by name.
    pub enums: Vec<IrEnum>,
    pub objects: Vec<IrObject>,
    /// Top-level definitions that are neither enums nor objects.
    pub type_aliases: Vec<IrAlias>,
    /// Sorted by tag name.
    pub tags: Vec<IrTagGroup>,
    pub has_security: bool,
    /// `x-go-credential-type` of the document.
    pub credential_type: Option<String>,
}

impl IrSpec {
    pub fn operation(&self, name: &str) -> Option<&IrOperation> {
        self.operations_by_name
            .get(name)
            .map(|&index| &self.operations[index])
    }

    /// Operations of a tag group, in document order.
    pub fn tag_operations<'a>(
        &'a self,
        group: &'a IrTagGroup,
    ) -> impl Iterator<Item = &'a IrOperation> + 'a {
        group.operations.iter().map(|&index| &self.operations[index])
    }
}

/// API metadata.
#[derive(Debug, Clone, Default)]
pub struct IrInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
    pub host: Option<String>,
    pub base_path: Option<String>,
}

/// Operations sharing a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct IrTagGroup {
    pub name: NormalizedName,
    pub operations: Vec<usize>, // indices into IrSpec.operations
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
