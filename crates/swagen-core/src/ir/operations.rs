use super::schemas::IrType;
use super::types::NormalizedName;
use crate::parse::operation::HttpMethod;
use crate::parse::parameter::{self, ParameterLocation};
use crate::parse::response::StatusCode;
use crate::parse::schema::Schema;
use crate::parse::security::SecurityRequirement;

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// One segment of a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPart {
    Literal(String),
    /// Name of the bound parameter.
    Param(String),
}

/// A fully resolved API operation.
#[derive(Debug, Clone)]
pub struct IrOperation {
    pub name: NormalizedName,
    pub method: HttpMethod,
    pub path: String,
    pub path_parts: Vec<PathPart>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<IrParameter>,
    pub responses: Vec<IrResponse>,
    /// Effective requirements, inherited from the document when the operation has none.
    pub security: Vec<SecurityRequirement>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub deprecated: bool,
}

impl IrOperation {
    /// The `200` response. Other success codes are not treated as the response.
    pub fn success(&self) -> Option<&IrResponse> {
        self.responses
            .iter()
            .find(|r| r.status.as_str() == StatusCode::SUCCESS)
    }

    pub fn has_response(&self) -> bool {
        self.success().is_some()
    }

    pub fn response_is_array(&self) -> bool {
        self.success()
            .and_then(|r| r.schema.as_ref())
            .is_some_and(Schema::is_array)
    }

    pub fn response_type(&self) -> Option<&IrType> {
        self.success().and_then(|r| r.response_type.as_ref())
    }

    pub fn secured(&self) -> bool {
        !self.security.is_empty()
    }

    /// Scheme names across all requirements, first occurrence first.
    pub fn security_schemes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for requirement in &self.security {
            for name in requirement.keys() {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn body(&self) -> Option<&IrParameter> {
        self.parameters
            .iter()
            .find(|p| p.location == ParameterLocation::Body)
    }

    pub fn has_body(&self) -> bool {
        self.body().is_some()
    }

    pub fn has_query_params(&self) -> bool {
        self.parameters_in(ParameterLocation::Query).next().is_some()
    }

    pub fn parameters_in(
        &self,
        location: ParameterLocation,
    ) -> impl Iterator<Item = &IrParameter> + '_ {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }

    pub fn param_by_name(&self, name: &str) -> Option<&IrParameter> {
        self.parameters.iter().find(|p| p.original_name == name)
    }

    pub fn consumes_json(&self) -> bool {
        self.consumes.iter().any(|c| c == JSON_MEDIA_TYPE)
    }

    pub fn consumes_text(&self) -> bool {
        self.consumes.iter().any(|c| c == TEXT_MEDIA_TYPE)
    }
}

/// A resolved parameter. Body parameters carry their (hoisted) schema too.
#[derive(Debug, Clone)]
pub struct IrParameter {
    pub name: NormalizedName,
    pub original_name: String,
    pub location: ParameterLocation,
    pub param_type: IrType,
    pub schema: Schema,
    pub required: bool,
    pub description: Option<String>,
    pub collection_format: Option<String>,
}

impl IrParameter {
    pub fn list_separator(&self) -> Option<&'static str> {
        parameter::list_separator(self.collection_format.as_deref())
    }
}

/// A declared response.
#[derive(Debug, Clone)]
pub struct IrResponse {
    pub status: StatusCode,
    pub description: String,
    pub response_type: Option<IrType>,
    pub schema: Option<Schema>,
}
