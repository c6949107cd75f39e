//! Import selection for generated Go files.
//!
//! Templates never list imports. The rendered body is scanned for
//! `name.` selectors outside comments and literals, and only the packages
//! actually referenced are imported.

/// A package a generated file may import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoImport {
    /// Identifier the package is referenced by.
    pub name: String,
    pub path: String,
    /// Emit `name "path"` instead of `"path"`.
    pub aliased: bool,
}

impl GoImport {
    pub fn std(path: &str) -> Self {
        Self {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            aliased: false,
        }
    }

    pub fn aliased(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            aliased: true,
        }
    }

    pub fn is_std(&self) -> bool {
        let first = self.path.split('/').next().unwrap_or_default();
        !self.aliased && !first.contains('.')
    }

    /// Line inside an `import ( ... )` block.
    pub fn spec(&self) -> String {
        if self.aliased {
            format!("{} \"{}\"", self.name, self.path)
        } else {
            format!("\"{}\"", self.path)
        }
    }
}

/// Standard library packages generated code may use.
pub fn std_candidates() -> Vec<GoImport> {
    [
        "bytes",
        "context",
        "encoding/json",
        "errors",
        "fmt",
        "io",
        "net/http",
        "net/url",
        "regexp",
        "strconv",
        "strings",
        "time",
        "unicode/utf8",
    ]
    .into_iter()
    .map(GoImport::std)
    .collect()
}

/// Candidates referenced from `code`, standard library first, each group sorted by path.
pub fn used_imports(code: &str, candidates: &[GoImport]) -> Vec<GoImport> {
    let stripped = strip_comments_and_literals(code);
    let mut used: Vec<GoImport> = candidates
        .iter()
        .filter(|c| references(&stripped, &c.name))
        .cloned()
        .collect();
    used.sort_by(|a, b| (!a.is_std(), &a.path).cmp(&(!b.is_std(), &b.path)));
    used.dedup_by(|a, b| a.path == b.path);
    used
}

fn references(code: &str, name: &str) -> bool {
    let needle = format!("{name}.");
    code.match_indices(&needle).any(|(at, _)| {
        !code[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
    })
}

/// Blank out comments and the contents of string, raw string and rune literals.
fn strip_comments_and_literals(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut chars = code.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = ' ';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
                out.push(' ');
            }
            '"' | '\'' => {
                while let Some(next) = chars.next() {
                    if next == '\\' {
                        chars.next();
                    } else if next == c || next == '\n' {
                        break;
                    }
                }
                out.push_str("\"\"");
            }
            '`' => {
                for next in chars.by_ref() {
                    if next == '`' {
                        break;
                    }
                }
                out.push_str("``");
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(code: &str, candidates: &[GoImport]) -> Vec<String> {
        used_imports(code, candidates)
            .into_iter()
            .map(|i| i.path)
            .collect()
    }

    #[test]
    fn test_selectors_pick_packages() {
        let code = r#"
func f(ctx context.Context) (time.Time, error) {
	return time.Now(), json.Unmarshal(nil, nil)
}
"#;
        assert_eq!(
            names(code, &std_candidates()),
            vec!["context", "encoding/json", "time"]
        );
    }

    #[test]
    fn test_comments_and_literals_are_ignored() {
        let code = r#"
// fmt.Println is not called here
/* strings.Split either */
var a = "http.StatusOK"
var b = `json:"url.Values"`
var c = '\''
var d = x.time.Now
"#;
        assert!(names(code, &std_candidates()).is_empty());
    }

    #[test]
    fn test_module_packages_follow_std() {
        let mut candidates = std_candidates();
        candidates.push(GoImport::aliased("api", "example.com/shop/api"));
        candidates.push(GoImport::aliased("security", "example.com/auth"));
        let used = used_imports("var _ api.Pet\nvar _ security.User\nvar _ io.Reader", &candidates);
        let specs: Vec<String> = used.iter().map(GoImport::spec).collect();
        assert_eq!(
            specs,
            vec![
                "\"io\"",
                "security \"example.com/auth\"",
                "api \"example.com/shop/api\""
            ]
        );
    }

    #[test]
    fn test_std_detection() {
        assert!(GoImport::std("net/http").is_std());
        assert_eq!(GoImport::std("net/http").name, "http");
        assert!(!GoImport::aliased("api", "github.com/x/api").is_std());
    }
}
