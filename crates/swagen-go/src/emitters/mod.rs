pub mod client;
pub mod interfaces;
pub mod server;
pub mod validations;

use minijinja::{Environment, context};
use swagen_core::GeneratorError;
use swagen_core::helpers::Helpers;
use swagen_core::ir::{IrEnum, IrOperation, IrSpec, IrType};
use swagen_core::parse::parameter::ParameterLocation;
use swagen_core::parse::schema::Schema;

use crate::go_type::{CREDENTIAL_ALIAS, GoType};
use crate::imports::{GoImport, std_candidates, used_imports};
use crate::type_mapper::{API_ALIAS, GoTypeMapper, go_local, go_name};

/// Everything the Go emitters share for one generation run.
pub struct GoContext<'a> {
    pub ir: &'a IrSpec,
    pub helpers: Helpers<'a>,
    pub mapper: &'a GoTypeMapper,
    /// Import path of the API package.
    pub api_path: String,
    /// Package clause of the API package.
    pub api_package: String,
    pub credential: GoType,
    /// First line of every generated file.
    pub header: String,
}

/// A Go parameter of a generated API method.
pub struct GoParam {
    pub local: String,
    pub go_type: String,
}

impl<'a> GoContext<'a> {
    /// Type handed to secured operations, as spelled in the API package or elsewhere.
    pub fn credential_type(&self, in_api: bool) -> String {
        self.credential.spelled(in_api)
    }

    /// Whether `ty` names an object definition (and so has a `Validate` method).
    pub fn is_object_ref(&self, ty: &IrType) -> bool {
        ty.ref_name()
            .and_then(|name| self.helpers.definitions().get(name))
            .is_some_and(Schema::is_object)
    }

    /// Whether `ty` names an enum definition (and so has a `Valid` method).
    pub fn is_enum_ref(&self, ty: &IrType) -> bool {
        ty.ref_name()
            .and_then(|name| self.helpers.definitions().get(name))
            .is_some_and(|schema| matches!(schema, Schema::Enum(_)))
    }

    /// Zero value of `ty` typed as `ty` itself. For a named non-object
    /// definition a composite zero is converted: `api.Stamp(time.Time{})`.
    pub fn zero_value(&self, ty: &IrType, imported: bool) -> String {
        let zero = self.helpers.default_value(ty, imported);
        let named_non_object = ty
            .ref_name()
            .and_then(|name| self.helpers.definitions().get(name))
            .is_some_and(|schema| !schema.is_object());
        if named_non_object && zero.ends_with('}') {
            format!("{}({zero})", self.helpers.map_type(ty, imported))
        } else {
            zero
        }
    }

    /// Method arguments after `ctx`: the credential when secured, then the
    /// parameters in declaration order.
    pub fn params(&self, op: &IrOperation, imported: bool) -> Vec<GoParam> {
        let mut params = Vec::new();
        if op.secured() {
            params.push(GoParam {
                local: "cred".to_string(),
                go_type: self.credential_type(!imported),
            });
        }
        params.extend(op.parameters.iter().map(|p| GoParam {
            local: go_local(&p.original_name),
            go_type: self.helpers.map_type(&p.param_type, imported),
        }));
        params
    }

    /// `Name(ctx context.Context, ...) (T, error)`
    pub fn signature(&self, op: &IrOperation, imported: bool) -> String {
        let mut args = vec!["ctx context.Context".to_string()];
        args.extend(
            self.params(op, imported)
                .into_iter()
                .map(|p| format!("{} {}", p.local, p.go_type)),
        );
        let results = match op.response_type() {
            Some(ty) => format!("({}, error)", self.helpers.map_type(ty, imported)),
            None => "error".to_string(),
        };
        format!("{}({}) {results}", go_name(&op.name.original), args.join(", "))
    }

    /// Doc comment of a generated method, indented by `indent`.
    pub fn operation_doc(&self, op: &IrOperation, indent: &str) -> String {
        let method = go_name(&op.name.original);
        let mut text = match &op.summary {
            Some(summary) => summary.clone(),
            None => format!("{method} calls {} {}.", op.method, op.path),
        };
        if let Some(description) = &op.description {
            text.push_str("\n\n");
            text.push_str(description);
        }
        if op.deprecated {
            text.push_str("\n\nDeprecated: marked deprecated by the API.");
        }
        indent_lines(&self.helpers.comment(&text), indent)
    }

    /// Wrap a rendered body into a Go file with its package clause and imports.
    pub fn render_file(
        &self,
        env: &Environment<'_>,
        package: &str,
        body: &str,
        in_api: bool,
    ) -> Result<String, GeneratorError> {
        let mut candidates = std_candidates();
        if !in_api {
            candidates.push(GoImport::aliased(API_ALIAS, &self.api_path));
        }
        if let Some(path) = &self.credential.import_path {
            candidates.push(GoImport::aliased(CREDENTIAL_ALIAS, path));
        }
        let imports = used_imports(body, &candidates);
        let (std, module): (Vec<_>, Vec<_>) = imports.iter().partition(|i| i.is_std());

        render(
            env,
            "file.go.j2",
            context! {
                header => self.header.clone(),
                package => package,
                std_imports => std.iter().map(|i| i.spec()).collect::<Vec<_>>(),
                module_imports => module.iter().map(|i| i.spec()).collect::<Vec<_>>(),
                body => body.trim(),
            },
        )
    }
}

/// The Go template environment with every template registered.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    for (name, source) in [
        ("file.go.j2", include_str!("../../templates/file.go.j2")),
        ("interfaces.go.j2", include_str!("../../templates/interfaces.go.j2")),
        ("validations.go.j2", include_str!("../../templates/validations.go.j2")),
        ("server.go.j2", include_str!("../../templates/server.go.j2")),
        ("client.go.j2", include_str!("../../templates/client.go.j2")),
    ] {
        env.add_template(name, source).map_err(render_error)?;
    }
    Ok(env)
}

pub fn render(
    env: &Environment<'_>,
    template: &str,
    ctx: minijinja::Value,
) -> Result<String, GeneratorError> {
    env.get_template(template)
        .and_then(|t| t.render(ctx))
        .map_err(render_error)
}

fn render_error(err: minijinja::Error) -> GeneratorError {
    GeneratorError::Render(err.to_string())
}

/// Go string literal.
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Prefix every non-empty line with `indent`.
pub fn indent_lines(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Constant names of the variants of `e`, in variant order. A leading minus
/// is spelled `Minus`, and names that still clash get a numeric suffix.
pub fn enum_constants(e: &IrEnum) -> Vec<String> {
    let prefix = go_name(&e.name.original);
    let mut taken: Vec<String> = Vec::with_capacity(e.variants.len());
    for variant in &e.variants {
        let raw = match &variant.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let sign = if raw.trim_start().starts_with('-') { "Minus" } else { "" };
        let base = format!("{prefix}{sign}{}", variant.name.pascal_case);
        let mut name = base.clone();
        let mut n = 2;
        while taken.contains(&name) {
            name = format!("{base}{n}");
            n += 1;
        }
        taken.push(name);
    }
    taken
}

/// Source expression of a raw parameter value inside an `http.Handler`.
pub fn request_source(location: ParameterLocation, name: &str, wildcard: &str) -> String {
    match location {
        ParameterLocation::Path => format!("r.PathValue({})", quote(wildcard)),
        ParameterLocation::Query => format!("query.Get({})", quote(name)),
        ParameterLocation::Header => format!("r.Header.Get({})", quote(name)),
        ParameterLocation::FormData | ParameterLocation::Body => {
            format!("r.FormValue({})", quote(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_lines_keeps_blank_lines_bare() {
        assert_eq!(indent_lines("// a\n\n// b", "\t"), "\t// a\n\n\t// b");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("X-API-Key"), "\"X-API-Key\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_enum_constants_are_unique() {
        let ir = swagen_core::transform::transform(
            swagen_core::parse::from_yaml(
                r#"
swagger: "2.0"
definitions:
  Direction:
    type: integer
    enum: [-1, 0, 1]
  Sep:
    type: string
    enum: [a-b, a_b]
"#,
            )
            .unwrap(),
        )
        .unwrap();
        let constants: Vec<Vec<String>> = ir.enums.iter().map(enum_constants).collect();
        assert_eq!(
            constants,
            vec![
                vec!["DirectionMinus1", "Direction0", "Direction1"],
                vec!["SepAB", "SepAB2"],
            ]
        );
    }

    #[test]
    fn test_request_sources() {
        assert_eq!(
            request_source(ParameterLocation::Path, "pet-id", "petId"),
            "r.PathValue(\"petId\")"
        );
        assert_eq!(
            request_source(ParameterLocation::Header, "X-Request-Id", "xRequestId"),
            "r.Header.Get(\"X-Request-Id\")"
        );
    }
}
