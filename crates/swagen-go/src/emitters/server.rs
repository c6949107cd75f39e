use minijinja::{Environment, context};
use swagen_core::GeneratorError;
use swagen_core::helpers::TypeMapper;
use swagen_core::ir::{IrOperation, IrParameter, IrType, PathPart};
use swagen_core::parse::parameter::ParameterLocation;
use swagen_core::parse::security::{ApiKeyLocation, SecuritySchemeType};

use super::{GoContext, indent_lines, quote, render, request_source};
use crate::type_mapper::{API_ALIAS, go_local, go_name};

/// Emit `server/server.go`: an `http.Handler` decoding requests and calling the API.
pub fn emit_server(ctx: &GoContext<'_>, env: &Environment<'_>) -> Result<String, GeneratorError> {
    let ir = ctx.ir;

    let mut schemes = Vec::new();
    for (name, scheme) in &ir.spec.security_definitions {
        let extract = match scheme.scheme_type {
            SecuritySchemeType::Basic => "authorization(r, \"Basic\")".to_string(),
            SecuritySchemeType::OAuth2 => "authorization(r, \"Bearer\")".to_string(),
            SecuritySchemeType::ApiKey => {
                let key = quote(scheme.name.as_deref().unwrap_or(name));
                match scheme.location {
                    Some(ApiKeyLocation::Query) => format!("r.URL.Query().Get({key})"),
                    _ => format!("r.Header.Get({key})"),
                }
            }
        };
        schemes.push(context! {
            name => scheme_constant(name),
            extract => extract,
        });
    }

    let mut uses_split = false;
    let operations: Vec<minijinja::Value> = ir
        .operations
        .iter()
        .map(|op| operation_context(ctx, op, &mut uses_split))
        .collect();

    let body = render(
        env,
        "server.go.j2",
        context! {
            has_security => ir.has_security,
            credential => ctx.credential_type(false),
            schemes => schemes,
            operations => operations,
            uses_split => uses_split,
        },
    )?;
    ctx.render_file(env, "server", &body, false)
}

/// `api.SchemeApiKey`
pub fn scheme_constant(name: &str) -> String {
    format!("{API_ALIAS}.Scheme{}", go_name(name))
}

/// `GET /users/{id}`, prefixed with the base path. A trailing slash only
/// matches itself.
pub fn route_pattern(op: &IrOperation, base_path: Option<&str>) -> String {
    let mut pattern = base_path
        .map(|b| b.trim_end_matches('/'))
        .unwrap_or_default()
        .to_string();
    for part in &op.path_parts {
        match part {
            PathPart::Literal(text) => pattern.push_str(text),
            PathPart::Param(name) => {
                pattern.push('{');
                pattern.push_str(&go_local(name));
                pattern.push('}');
            }
        }
    }
    if pattern.is_empty() || pattern.ends_with('/') {
        if pattern.is_empty() {
            pattern.push('/');
        }
        pattern.push_str("{$}");
    }
    format!("{} {pattern}", op.method.as_str())
}

fn operation_context(
    ctx: &GoContext<'_>,
    op: &IrOperation,
    uses_split: &mut bool,
) -> minijinja::Value {
    let decodes: Vec<String> = op
        .parameters
        .iter()
        .map(|p| indent_lines(&decode(ctx, op, p, uses_split), "\t"))
        .collect();

    let mut args = vec!["r.Context()".to_string()];
    args.extend(ctx.params(op, true).into_iter().map(|p| p.local));

    let method = go_name(&op.name.original);
    let handler = format!("handle{method}");
    let schemes: Vec<String> = op
        .security_schemes()
        .into_iter()
        .map(scheme_constant)
        .collect();

    context! {
        doc => ctx.helpers.comment(&format!("{handler} serves {} {}.", op.method, op.path)),
        pattern => quote(&route_pattern(op, ctx.ir.info.base_path.as_deref())),
        handler => handler,
        method => method,
        secured => op.secured(),
        schemes => schemes.join(", "),
        has_query => op.has_query_params(),
        parses_form => op.parameters_in(ParameterLocation::FormData).next().is_some(),
        decodes => decodes,
        args => args.join(", "),
        returns => op.response_type().is_some(),
    }
}

/// Statements declaring and filling the local variable of `param`.
fn decode(
    ctx: &GoContext<'_>,
    op: &IrOperation,
    param: &IrParameter,
    uses_split: &mut bool,
) -> String {
    let local = go_local(&param.original_name);
    if param.location == ParameterLocation::Body {
        return decode_body(ctx, op, param, &local);
    }

    let go_type = ctx.helpers.map_type(&param.param_type, true);
    let source = request_source(param.location, &param.original_name, &local);
    let label = quote(&param.original_name);

    if let IrType::Array(items) = ctx.helpers.underlying(&param.param_type) {
        let iter = match (param.list_separator(), param.location) {
            (None, ParameterLocation::Query) => format!("query[{label}]"),
            (None, ParameterLocation::FormData) => format!("r.Form[{label}]"),
            (separator, _) => {
                *uses_split = true;
                format!("splitList({source}, {})", quote(separator.unwrap_or(",")))
            }
        };
        let item_type = ctx.helpers.map_type(&items, true);
        let assign = convert(ctx, &items, &item_type, &label, |value| {
            format!("{local} = append({local}, {value})")
        });
        let mut code = format!(
            "var {local} {go_type}\nfor _, raw := range {iter} {{\n{}\n}}",
            indent_lines(&assign, "\t")
        );
        if param.required {
            code.push_str(&format!(
                "\nif len({local}) == 0 {{\n\tmissing(w, {label})\n\treturn\n}}"
            ));
        }
        return code;
    }

    let declaration = match default_literal(ctx, param) {
        Some(value) => format!("var {local} {go_type} = {value}"),
        None => format!("var {local} {go_type}"),
    };
    let assign = convert(ctx, &param.param_type, &go_type, &label, |value| {
        format!("{local} = {value}")
    });
    let mut code = format!(
        "{declaration}\nif raw := {source}; raw != \"\" {{\n{}\n}}",
        indent_lines(&assign, "\t")
    );
    if param.required {
        code.push_str(&format!(" else {{\n\tmissing(w, {label})\n\treturn\n}}"));
    }
    code
}

/// Parse `raw` into `go_type` and hand the converted value to `assign`.
fn convert(
    ctx: &GoContext<'_>,
    ty: &IrType,
    go_type: &str,
    label: &str,
    assign: impl Fn(String) -> String,
) -> String {
    let underlying = ctx.helpers.underlying(ty);
    if ctx.mapper.parse_is_fallible(&underlying) {
        format!(
            "v, err := {}\nif err != nil {{\n\tbadRequest(w, {label}, err)\n\treturn\n}}\n{}",
            ctx.mapper.from_string(&underlying, "raw"),
            assign(format!("{go_type}(v)"))
        )
    } else {
        assign(format!("{go_type}({})", ctx.mapper.from_string(&underlying, "raw")))
    }
}

fn default_literal(ctx: &GoContext<'_>, param: &IrParameter) -> Option<String> {
    let value = param.schema.meta().default_value.as_ref()?;
    match ctx.helpers.underlying(&param.param_type) {
        IrType::DateTime | IrType::Array(_) | IrType::Ref(_) | IrType::Any => None,
        _ => Some(ctx.helpers.cast(value, &param.param_type)),
    }
}

fn decode_body(
    ctx: &GoContext<'_>,
    op: &IrOperation,
    param: &IrParameter,
    local: &str,
) -> String {
    let go_type = ctx.helpers.map_type(&param.param_type, true);
    let label = quote(&param.original_name);
    let underlying = ctx.helpers.underlying(&param.param_type);

    if !op.consumes_json() && op.consumes_text() && matches!(underlying, IrType::String) {
        return format!(
            "data, err := io.ReadAll(r.Body)\nif err != nil {{\n\tbadRequest(w, {label}, err)\n\treturn\n}}\n{local} := {go_type}(data)"
        );
    }

    let failed = if param.required {
        "err != nil"
    } else {
        "err != nil && !errors.Is(err, io.EOF)"
    };
    let mut code = format!(
        "var {local} {go_type}\nif err := json.NewDecoder(r.Body).Decode(&{local}); {failed} {{\n\tbadRequest(w, {label}, err)\n\treturn\n}}"
    );

    let validate = |expr: &str| {
        format!(
            "if err := {expr}.Validate(); err != nil {{\n\tbadRequest(w, {label}, err)\n\treturn\n}}"
        )
    };
    if ctx.is_object_ref(&param.param_type) {
        code.push('\n');
        code.push_str(&validate(local));
    } else if let IrType::Array(items) = &underlying
        && ctx.is_object_ref(items)
    {
        code.push_str(&format!(
            "\nfor i := range {local} {{\n{}\n}}",
            indent_lines(&validate(&format!("{local}[i]")), "\t")
        ));
    }
    code
}

#[cfg(test)]
mod tests {
    use swagen_core::parse;
    use swagen_core::transform::transform;

    use super::*;

    const DOC: &str = r#"
swagger: "2.0"
paths:
  /:
    get:
      operationId: root
  /pets/:
    get:
      operationId: listPets
  /pets/{pet-id}/photos/{photo}:
    get:
      operationId: photo
      parameters:
        - {name: pet-id, in: path, type: string, required: true}
        - {name: photo, in: path, type: integer, required: true}
"#;

    #[test]
    fn test_route_patterns() {
        let ir = transform(parse::from_yaml(DOC).unwrap()).unwrap();
        let pattern = |name: &str, base: Option<&str>| {
            route_pattern(ir.operation(name).unwrap(), base)
        };
        assert_eq!(pattern("root", None), "GET /{$}");
        assert_eq!(pattern("root", Some("/v1")), "GET /v1/{$}");
        assert_eq!(pattern("listPets", Some("/v1/")), "GET /v1/pets/{$}");
        assert_eq!(pattern("photo", None), "GET /pets/{petId}/photos/{photo}");
    }

    #[test]
    fn test_scheme_constant() {
        assert_eq!(scheme_constant("api_key"), "api.SchemeApiKey");
    }
}
