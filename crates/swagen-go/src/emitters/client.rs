use minijinja::{Environment, context};
use swagen_core::GeneratorError;
use swagen_core::ir::{
    IrOperation, IrParameter, IrType, JSON_MEDIA_TYPE, PathPart, TEXT_MEDIA_TYPE,
};
use swagen_core::parse::parameter::ParameterLocation;
use swagen_core::parse::security::{ApiKeyLocation, SecuritySchemeType};
use swagen_core::transform::name_normalizer::title_case;

use super::server::scheme_constant;
use super::{GoContext, indent_lines, quote, render};
use crate::type_mapper::go_local;

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Emit `client/client.go`: an HTTP implementation of the API interface.
pub fn emit_client(ctx: &GoContext<'_>, env: &Environment<'_>) -> Result<String, GeneratorError> {
    let ir = ctx.ir;

    let schemes: Vec<minijinja::Value> = ir
        .spec
        .security_definitions
        .iter()
        .map(|(name, scheme)| {
            let apply = match scheme.scheme_type {
                SecuritySchemeType::Basic => {
                    "req.Header.Set(\"Authorization\", \"Basic \"+cred.Value)".to_string()
                }
                SecuritySchemeType::OAuth2 => {
                    "req.Header.Set(\"Authorization\", \"Bearer \"+cred.Value)".to_string()
                }
                SecuritySchemeType::ApiKey => {
                    let key = quote(scheme.name.as_deref().unwrap_or(name));
                    match scheme.location {
                        Some(ApiKeyLocation::Query) => format!(
                            "q := req.URL.Query()\nq.Set({key}, cred.Value)\nreq.URL.RawQuery = q.Encode()"
                        ),
                        _ => format!("req.Header.Set({key}, cred.Value)"),
                    }
                }
            };
            context! {
                name => scheme_constant(name),
                apply => indent_lines(&apply, "\t\t"),
            }
        })
        .collect();

    let default_base_url = ir.info.host.as_ref().map(|host| {
        let schemes = &ir.spec.schemes;
        let scheme = if schemes.is_empty() || schemes.iter().any(|s| s == "https") {
            "https"
        } else {
            "http"
        };
        quote(&format!("{scheme}://{host}"))
    });

    let mut uses_join = false;
    let operations: Vec<minijinja::Value> = ir
        .operations
        .iter()
        .map(|op| operation_context(ctx, op, &mut uses_join))
        .collect();

    let body = render(
        env,
        "client.go.j2",
        context! {
            default_base_url => default_base_url,
            has_security => ir.has_security,
            default_signer => ir.has_security && ctx.credential.is_local(),
            credential => ctx.credential_type(false),
            schemes => schemes,
            uses_join => uses_join,
            operations => operations,
        },
    )?;
    ctx.render_file(env, "client", &body, false)
}

/// Go expression for the URL path of `op`, base path included.
pub fn url_expression(ctx: &GoContext<'_>, op: &IrOperation, uses_join: &mut bool) -> String {
    let base = ctx
        .ir
        .info
        .base_path
        .as_deref()
        .map(|b| b.trim_end_matches('/'))
        .unwrap_or_default();

    let mut pieces: Vec<String> = Vec::new();
    let mut literal = base.to_string();
    for part in &op.path_parts {
        match part {
            PathPart::Literal(text) => literal.push_str(text),
            PathPart::Param(name) => {
                if !literal.is_empty() {
                    pieces.push(quote(&std::mem::take(&mut literal)));
                }
                let param_type = op
                    .param_by_name(name)
                    .map(|p| p.param_type.clone())
                    .unwrap_or(IrType::String);
                let text = format_value(ctx, &param_type, &go_local(name), ",", uses_join);
                pieces.push(format!("url.PathEscape({text})"));
            }
        }
    }
    if !literal.is_empty() || pieces.is_empty() {
        pieces.push(quote(&literal));
    }
    pieces.join(" + ")
}

/// Go expression formatting `expr` of type `ty` as request text. Lists are
/// joined with `separator` through the generated `join` helper.
fn format_value(
    ctx: &GoContext<'_>,
    ty: &IrType,
    expr: &str,
    separator: &str,
    uses_join: &mut bool,
) -> String {
    let underlying = ctx.helpers.underlying(ty);
    match &underlying {
        IrType::Array(items) => {
            *uses_join = true;
            let item_type = ctx.helpers.map_type(items, true);
            format!(
                "join({expr}, {}, func(v {item_type}) string {{ return {} }})",
                quote(separator),
                format_value(ctx, items, "v", separator, uses_join)
            )
        }
        IrType::Ref(_) => ctx.helpers.to_string(ty, expr),
        _ if ty.is_ref() => {
            let converted = format!("{}({expr})", ctx.helpers.map_type(&underlying, true));
            ctx.helpers.to_string(&underlying, &converted)
        }
        _ => ctx.helpers.to_string(ty, expr),
    }
}

/// Statements adding `param` to `target` (`query`, `form` or `req.Header`).
fn set_value(
    ctx: &GoContext<'_>,
    param: &IrParameter,
    target: &str,
    uses_join: &mut bool,
) -> String {
    let local = go_local(&param.original_name);
    let key = quote(&param.original_name);
    let underlying = ctx.helpers.underlying(&param.param_type);

    if let IrType::Array(items) = &underlying {
        let statement = match param.list_separator() {
            None => format!(
                "for _, v := range {local} {{\n\t{target}.Add({key}, {})\n}}",
                format_value(ctx, items, "v", ",", uses_join)
            ),
            Some(separator) => format!(
                "{target}.Set({key}, {})",
                format_value(ctx, &param.param_type, &local, separator, uses_join)
            ),
        };
        return if param.required {
            statement
        } else {
            format!("if len({local}) > 0 {{\n{}\n}}", indent_lines(&statement, "\t"))
        };
    }

    let statement = format!(
        "{target}.Set({key}, {})",
        format_value(ctx, &param.param_type, &local, ",", uses_join)
    );
    if param.required || matches!(underlying, IrType::Ref(_)) {
        return statement;
    }
    let mut zero = ctx.zero_value(&param.param_type, true);
    if zero.ends_with('}') {
        zero = format!("({zero})");
    }
    format!(
        "if {local} != {zero} {{\n{}\n}}",
        indent_lines(&statement, "\t")
    )
}

fn operation_context(
    ctx: &GoContext<'_>,
    op: &IrOperation,
    uses_join: &mut bool,
) -> minijinja::Value {
    let url = url_expression(ctx, op, uses_join);
    let mut statements = |location: ParameterLocation, target: &str| -> Vec<String> {
        op.parameters_in(location)
            .map(|p| set_value(ctx, p, target, uses_join))
            .collect()
    };
    let query = statements(ParameterLocation::Query, "query");
    let headers = statements(ParameterLocation::Header, "req.Header");
    let form = statements(ParameterLocation::FormData, "form");
    let indented = |lines: &[String]| -> Vec<String> {
        lines.iter().map(|line| indent_lines(line, "\t")).collect()
    };

    let fail = match op.response_type() {
        Some(ty) => format!("{}, err", ctx.zero_value(ty, true)),
        None => "err".to_string(),
    };

    let (body, content_type) = if let Some(param) = op.body() {
        let local = go_local(&param.original_name);
        let text = !op.consumes_json()
            && op.consumes_text()
            && matches!(ctx.helpers.underlying(&param.param_type), IrType::String);
        if text {
            (
                format!("payload = strings.NewReader(string({local}))"),
                Some(TEXT_MEDIA_TYPE),
            )
        } else {
            (
                format!(
                    "data, err := json.Marshal({local})\nif err != nil {{\n\treturn {fail}\n}}\npayload = bytes.NewReader(data)"
                ),
                Some(JSON_MEDIA_TYPE),
            )
        }
    } else if !form.is_empty() {
        (
            format!(
                "form := url.Values{{}}\n{}\npayload = strings.NewReader(form.Encode())",
                form.join("\n")
            ),
            Some(FORM_MEDIA_TYPE),
        )
    } else {
        (String::new(), None)
    };

    context! {
        doc => ctx.operation_doc(op, ""),
        signature => ctx.signature(op, true),
        url => url,
        query => indented(&query),
        body => (!body.is_empty()).then(|| indent_lines(&body, "\t")),
        http_method => format!("http.Method{}", title_case(op.method.key())),
        content_type => content_type.map(quote),
        headers => indented(&headers),
        secured => op.secured(),
        scheme => op.security_schemes().first().map(|s| scheme_constant(s)),
        returns => op.response_type().is_some(),
        return_type => op.response_type().map(|ty| ctx.helpers.map_type(ty, true)),
        fail => fail,
    }
}
