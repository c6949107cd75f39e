use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::{RawSchema, Schema};
use crate::error::SchemaError;

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
    FormData,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Body => "body",
            ParameterLocation::FormData => "formData",
        }
    }
}

/// An operation parameter. The `schema` indirection of body parameters and the
/// inline `type`/`format`/`items` keywords of the other locations both end up in
/// [`Parameter::schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameter", into = "RawParameter")]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub description: Option<String>,
    pub required: bool,
    pub schema: Schema,
    /// Array serialization: `csv` (default), `ssv`, `tsv`, `pipes` or `multi`.
    pub collection_format: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, location: ParameterLocation, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: location == ParameterLocation::Path,
            schema,
            collection_format: None,
        }
    }

    pub fn is_body(&self) -> bool {
        self.location == ParameterLocation::Body
    }

    pub fn list_separator(&self) -> Option<&'static str> {
        list_separator(self.collection_format.as_deref())
    }
}

/// Separator used to join array values, `None` for `multi` (repeated keys).
pub fn list_separator(collection_format: Option<&str>) -> Option<&'static str> {
    match collection_format {
        Some("multi") => None,
        Some("ssv") => Some(" "),
        Some("tsv") => Some("\t"),
        Some("pipes") => Some("|"),
        _ => Some(","),
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawParameter {
    name: String,

    #[serde(rename = "in")]
    location: Option<ParameterLocation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<Schema>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    param_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,

    #[serde(rename = "collectionFormat", skip_serializing_if = "Option::is_none")]
    collection_format: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    enum_values: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,
    #[serde(rename = "exclusiveMinimum", default, skip_serializing_if = "is_false")]
    exclusive_minimum: bool,
    #[serde(rename = "exclusiveMaximum", default, skip_serializing_if = "is_false")]
    exclusive_maximum: bool,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    min_items: Option<u64>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    max_items: Option<u64>,
    #[serde(rename = "uniqueItems", default, skip_serializing_if = "is_false")]
    unique_items: bool,
}

impl TryFrom<RawParameter> for Parameter {
    type Error = SchemaError;

    fn try_from(raw: RawParameter) -> Result<Self, Self::Error> {
        let location = raw
            .location
            .ok_or_else(|| SchemaError::MissingParameterLocation(raw.name.clone()))?;

        let schema = if location == ParameterLocation::Body {
            raw.schema
                .ok_or_else(|| SchemaError::MissingBodySchema(raw.name.clone()))?
        } else {
            Schema::try_from(RawSchema {
                schema_type: raw.param_type,
                format: raw.format,
                items: raw.items,
                default_value: raw.default_value,
                enum_values: raw.enum_values,
                minimum: raw.minimum,
                maximum: raw.maximum,
                exclusive_minimum: raw.exclusive_minimum,
                exclusive_maximum: raw.exclusive_maximum,
                min_length: raw.min_length,
                max_length: raw.max_length,
                pattern: raw.pattern,
                min_items: raw.min_items,
                max_items: raw.max_items,
                unique_items: raw.unique_items,
                ..RawSchema::default()
            })?
        };

        Ok(Parameter {
            name: raw.name,
            location,
            description: raw.description,
            required: raw.required,
            schema,
            collection_format: raw.collection_format,
        })
    }
}

impl From<Parameter> for RawParameter {
    fn from(param: Parameter) -> Self {
        let mut raw = RawParameter {
            name: param.name,
            location: Some(param.location),
            description: param.description,
            required: param.required,
            collection_format: param.collection_format,
            ..RawParameter::default()
        };

        if param.location == ParameterLocation::Body {
            raw.schema = Some(param.schema);
            return raw;
        }

        let inline = RawSchema::from(param.schema);
        raw.param_type = inline.schema_type;
        raw.format = inline.format;
        raw.items = inline.items;
        raw.default_value = inline.default_value;
        raw.enum_values = inline.enum_values;
        raw.minimum = inline.minimum;
        raw.maximum = inline.maximum;
        raw.exclusive_minimum = inline.exclusive_minimum;
        raw.exclusive_maximum = inline.exclusive_maximum;
        raw.min_length = inline.min_length;
        raw.max_length = inline.max_length;
        raw.pattern = inline.pattern;
        raw.min_items = inline.min_items;
        raw.max_items = inline.max_items;
        raw.unique_items = inline.unique_items;
        raw
    }
}
