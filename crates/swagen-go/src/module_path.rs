use std::fs;
use std::path::{Component, Path, PathBuf};

use swagen_core::GeneratorError;

/// Go import path of `location`, derived from the closest enclosing `go.mod`.
///
/// `location` does not need to exist yet. Relative paths are taken from the
/// current directory.
pub fn detect_package(location: &Path) -> Result<String, GeneratorError> {
    let absolute = if location.is_absolute() {
        location.to_path_buf()
    } else {
        std::env::current_dir()?.join(location)
    };
    let absolute = lexical_normalize(&absolute);

    for dir in absolute.ancestors() {
        let go_mod = dir.join("go.mod");
        if !go_mod.is_file() {
            continue;
        }
        let content = fs::read_to_string(&go_mod)?;
        let module = module_name(&content).ok_or_else(|| {
            GeneratorError::Other(format!("{} has no module directive", go_mod.display()))
        })?;
        log::debug!("using module {module} from {}", go_mod.display());

        let relative: Vec<String> = absolute
            .strip_prefix(dir)
            .unwrap_or(Path::new(""))
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        return Ok(if relative.is_empty() {
            module
        } else {
            format!("{module}/{}", relative.join("/"))
        });
    }

    Err(GeneratorError::Other(format!(
        "no go.mod found above {}; Go output must live inside a Go module",
        absolute.display()
    )))
}

/// Go package name for an import path: last segment, `-` → `_`, lower-cased.
pub fn package_name(import_path: &str) -> String {
    import_path
        .rsplit('/')
        .next()
        .unwrap_or(import_path)
        .replace(['-', '.'], "_")
        .to_lowercase()
}

fn module_name(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.split("//").next().unwrap_or(rest).trim();
        let name = rest.trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_directive() {
        assert_eq!(
            module_name("// comment\nmodule github.com/acme/shop\n\ngo 1.22\n").as_deref(),
            Some("github.com/acme/shop")
        );
        assert_eq!(
            module_name("module \"example.com/quoted\" // note\n").as_deref(),
            Some("example.com/quoted")
        );
        assert_eq!(module_name("modules are fun\n"), None);
    }

    #[test]
    fn test_detects_nested_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/shop\n\ngo 1.22\n").unwrap();
        fs::create_dir_all(dir.path().join("internal")).unwrap();

        let target = dir.path().join("internal").join("..").join("gen").join("api");
        assert_eq!(detect_package(&target).unwrap(), "example.com/shop/gen/api");
        assert_eq!(detect_package(dir.path()).unwrap(), "example.com/shop");
    }

    #[test]
    fn test_missing_go_mod_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = detect_package(&dir.path().join("api")).unwrap_err();
        assert!(err.to_string().contains("no go.mod found"));
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("example.com/shop/pet-store"), "pet_store");
        assert_eq!(package_name("example.com/shop/API"), "api");
        assert_eq!(package_name("shop"), "shop");
    }
}
