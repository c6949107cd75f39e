use crate::type_mapper::API_ALIAS;

/// Import alias of a user-supplied credential package.
pub const CREDENTIAL_ALIAS: &str = "security";

/// Name of the credential struct declared when no package is given.
pub const DEFAULT_CREDENTIAL: &str = "Credential";

/// A Go type named by an optional import path and a type name,
/// e.g. `github.com/acme/auth.User` or just `Credential`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoType {
    pub name: String,
    /// Package import path, `None` for a type declared in the API package.
    pub import_path: Option<String>,
}

impl GoType {
    /// Split `path/to/pkg.Type` at the last dot after the last slash.
    pub fn parse(qualified: &str) -> Self {
        let qualified = qualified.trim();
        let tail_start = qualified.rfind('/').map_or(0, |i| i + 1);
        match qualified[tail_start..].rfind('.') {
            Some(dot) => {
                let dot = tail_start + dot;
                Self {
                    name: qualified[dot + 1..].to_string(),
                    import_path: Some(qualified[..dot].to_string()),
                }
            }
            None => Self {
                name: qualified.to_string(),
                import_path: None,
            },
        }
    }

    /// Whether the API package has to declare this type itself.
    pub fn is_local(&self) -> bool {
        self.import_path.is_none()
    }

    /// How the type is spelled inside the API package (`in_api`) or in a
    /// package importing it.
    pub fn spelled(&self, in_api: bool) -> String {
        match (&self.import_path, in_api) {
            (Some(_), _) => format!("{CREDENTIAL_ALIAS}.{}", self.name),
            (None, true) => self.name.clone(),
            (None, false) => format!("{API_ALIAS}.{}", self.name),
        }
    }
}

impl Default for GoType {
    fn default() -> Self {
        Self::parse(DEFAULT_CREDENTIAL)
    }
}
