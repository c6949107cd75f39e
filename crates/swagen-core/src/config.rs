use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.swagen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwagenConfig {
    pub input: String,
    pub output: String,
    pub target: String,
    /// Overrides the document's `x-go-credential-type` extension.
    pub credential_type: Option<String>,
    /// Run the target language formatter after writing files.
    pub format: bool,
}

impl Default for SwagenConfig {
    fn default() -> Self {
        Self {
            input: "swagger.yaml".to_string(),
            output: "api".to_string(),
            target: TargetLanguage::Golang.to_string(),
            credential_type: None,
            format: true,
        }
    }
}

/// Selectable generator backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLanguage {
    Golang,
    Typescript,
}

impl FromStr for TargetLanguage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "golang" | "go" => Ok(TargetLanguage::Golang),
            "typescript" | "ts" => Ok(TargetLanguage::Typescript),
            other => Err(ConfigError::UnknownTarget(other.to_string())),
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetLanguage::Golang => write!(f, "golang"),
            TargetLanguage::Typescript => write!(f, "typescript"),
        }
    }
}

/// Per-run settings handed to a [`crate::CodeGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    /// Credential type override; falls back to the document extension.
    pub credential_type: Option<String>,
    /// Arguments echoed into the generated-code header.
    pub command_line: String,
}

impl GeneratorConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            credential_type: None,
            command_line: String::new(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swagen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwagenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SwagenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swagen configuration
input: swagger.yaml
output: api
target: golang        # golang | typescript

# Type handed to secured handlers. Overrides the document's x-go-credential-type.
# Qualify it with an import path to use your own type, e.g. github.com/acme/auth.User
# credential_type: Credential

format: true          # run goimports (or gofmt) on generated Go files
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SwagenConfig::default();
        assert_eq!(config.input, "swagger.yaml");
        assert_eq!(config.output, "api");
        assert_eq!(config.target, "golang");
        assert!(config.credential_type.is_none());
        assert!(config.format);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: petstore.yaml
output: gen
target: typescript
credential_type: github.com/acme/auth.User
format: false
"#;
        let config: SwagenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "petstore.yaml");
        assert_eq!(config.output, "gen");
        assert_eq!(
            config.target.parse::<TargetLanguage>().unwrap(),
            TargetLanguage::Typescript
        );
        assert_eq!(
            config.credential_type.as_deref(),
            Some("github.com/acme/auth.User")
        );
        assert!(!config.format);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: SwagenConfig = serde_yaml_ng::from_str("input: api.yaml\n").unwrap();
        assert_eq!(config.input, "api.yaml");
        assert_eq!(config.output, "api");
        assert_eq!(config.target, "golang");
    }

    #[test]
    fn test_default_content_parses() {
        let config: SwagenConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.input, "swagger.yaml");
        assert!(config.format);
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let err = "cobol".parse::<TargetLanguage>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTarget(ref t) if t == "cobol"));
        assert_eq!("go".parse::<TargetLanguage>().unwrap(), TargetLanguage::Golang);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "output: out/api\n").unwrap();
        let loaded = load_config(&path).unwrap().unwrap();
        assert_eq!(loaded.output, "out/api");
        assert_eq!(loaded.input, "swagger.yaml");
    }
}
