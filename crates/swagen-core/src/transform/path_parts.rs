use crate::error::TransformError;
use crate::ir::PathPart;
use crate::parse::parameter::Parameter;

/// Split a URL template into literal and parameter parts.
///
/// Adjacent literal segments merge, and every parameter part ends up next to
/// an explicit `/` separator:
/// - `/users/{id}` → `["/users/", {id}]`
/// - `/{a}/{b}` → `["/", {a}, "/", {b}]`
pub fn path_parts(path: &str, parameters: &[Parameter]) -> Result<Vec<PathPart>, TransformError> {
    let mut raw: Vec<PathPart> = Vec::new();

    for segment in path.trim_start_matches('/').split('/') {
        if let Some(name) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            let name = name.trim();
            if !parameters.iter().any(|p| p.name == name) {
                return Err(TransformError::MissingPathParameter {
                    path: path.to_string(),
                    name: name.to_string(),
                });
            }
            raw.push(PathPart::Param(name.to_string()));
        } else if let Some(PathPart::Literal(previous)) = raw.last_mut() {
            previous.push('/');
            previous.push_str(segment);
        } else {
            raw.push(PathPart::Literal(format!("/{segment}")));
        }
    }

    let mut parts: Vec<PathPart> = Vec::with_capacity(raw.len() * 2);
    for part in raw {
        if matches!(part, PathPart::Param(_)) {
            match parts.last_mut() {
                Some(PathPart::Literal(previous)) => previous.push('/'),
                _ => parts.push(PathPart::Literal("/".to_string())),
            }
        }
        parts.push(part);
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parameter::ParameterLocation;
    use crate::parse::schema::{PrimitiveType, Schema};

    fn params(names: &[&str]) -> Vec<Parameter> {
        names
            .iter()
            .map(|n| {
                Parameter::new(
                    *n,
                    ParameterLocation::Path,
                    Schema::primitive(PrimitiveType::String, None),
                )
            })
            .collect()
    }

    fn lit(text: &str) -> PathPart {
        PathPart::Literal(text.to_string())
    }

    fn param(name: &str) -> PathPart {
        PathPart::Param(name.to_string())
    }

    #[test]
    fn literal_then_param() {
        let parts = path_parts("/users/{id}", &params(&["id"])).unwrap();
        assert_eq!(parts, vec![lit("/users/"), param("id")]);
    }

    #[test]
    fn consecutive_params_get_separators() {
        let parts = path_parts("/{a}/{b}", &params(&["a", "b"])).unwrap();
        assert_eq!(parts, vec![lit("/"), param("a"), lit("/"), param("b")]);
    }

    #[test]
    fn literals_merge_around_param() {
        let parts = path_parts("/a/b/{id}/c", &params(&["id"])).unwrap();
        assert_eq!(parts, vec![lit("/a/b/"), param("id"), lit("/c")]);
    }

    #[test]
    fn root_path_is_single_literal() {
        assert_eq!(path_parts("/", &[]).unwrap(), vec![lit("/")]);
    }

    #[test]
    fn undefined_placeholder_is_fatal() {
        let err = path_parts("/users/{id}", &params(&["userId"])).unwrap_err();
        assert!(matches!(
            err,
            TransformError::MissingPathParameter { ref name, .. } if name == "id"
        ));
    }
}
