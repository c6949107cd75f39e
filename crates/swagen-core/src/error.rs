use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported Swagger version: {0}")]
    UnsupportedVersion(String),
}

/// Shape errors detected while classifying a raw schema into a [`crate::parse::schema::Schema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid reference format: {0} (expected #/definitions/<name>)")]
    InvalidRefFormat(String),

    #[error("reference {0} must not carry inline properties")]
    RefWithProperties(String),

    #[error("body parameter {0} has no schema")]
    MissingBodySchema(String),

    #[error("parameter {0} has no location (`in`)")]
    MissingParameterLocation(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("object {0} already defined")]
    NameCollision(String),

    #[error("path {path} references undefined parameter {name}")]
    MissingPathParameter { path: String, name: String },

    #[error("security scheme {0} is not declared in securityDefinitions")]
    UndeclaredSecurityScheme(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown target language: {0} (expected golang or typescript)")]
    UnknownTarget(String),
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("template rendering failed: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
