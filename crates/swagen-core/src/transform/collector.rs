use crate::error::TransformError;
use crate::parse::schema::{EnumSchema, Schema};
use crate::parse::security::SecurityScheme;
use crate::parse::spec::SwaggerSpec;

/// Every top-level enum definition, in document order.
pub fn iter_enums(spec: &SwaggerSpec) -> impl Iterator<Item = (&str, &EnumSchema)> {
    spec.definitions
        .iter()
        .filter_map(|(name, schema)| match schema {
            Schema::Enum(e) => Some((name.as_str(), e)),
            _ => None,
        })
}

/// Look up a declared security scheme.
pub fn security_definition<'a>(
    spec: &'a SwaggerSpec,
    name: &str,
) -> Result<&'a SecurityScheme, TransformError> {
    spec.security_definitions
        .get(name)
        .ok_or_else(|| TransformError::UndeclaredSecurityScheme(name.to_string()))
}

/// Check that the document default and every operation only name declared schemes.
pub fn validate_security(spec: &SwaggerSpec) -> Result<(), TransformError> {
    let operation_requirements = spec
        .paths
        .values()
        .flat_map(|item| item.operations.values())
        .filter_map(|op| op.security.as_ref());

    for requirements in spec.security.iter().chain(operation_requirements) {
        for name in requirements.iter().flat_map(|r| r.keys()) {
            security_definition(spec, name)?;
        }
    }
    Ok(())
}
