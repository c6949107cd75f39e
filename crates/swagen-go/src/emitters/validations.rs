use indexmap::IndexMap;
use minijinja::{Environment, context};
use swagen_core::GeneratorError;
use swagen_core::ir::{IrObject, IrType};
use swagen_core::parse::schema::Constraints;

use super::{GoContext, enum_constants, indent_lines, quote, render};
use crate::type_mapper::go_name;

/// Emit `validations.go`: a `Validate` method per object and a `Valid`
/// method per enum.
pub fn emit_validations(
    ctx: &GoContext<'_>,
    env: &Environment<'_>,
) -> Result<String, GeneratorError> {
    let mut patterns = Patterns::default();

    let objects: Vec<minijinja::Value> = ctx
        .ir
        .objects
        .iter()
        .map(|o| {
            context! {
                name => go_name(&o.name.original),
                checks => object_checks(ctx, o, &mut patterns),
            }
        })
        .collect();

    let enums: Vec<minijinja::Value> = ctx
        .ir
        .enums
        .iter()
        .filter(|e| !e.variants.is_empty())
        .map(|e| {
            context! {
                name => go_name(&e.name.original),
                values => enum_constants(e),
            }
        })
        .collect();

    let patterns: Vec<minijinja::Value> = patterns
        .0
        .iter()
        .map(|(source, name)| context! { name => name, source => raw_string(source) })
        .collect();

    let body = render(
        env,
        "validations.go.j2",
        context! { patterns => patterns, enums => enums, objects => objects },
    )?;
    ctx.render_file(env, &ctx.api_package, &body, true)
}

/// Compiled regular expressions, one variable per distinct pattern.
#[derive(Default)]
struct Patterns(IndexMap<String, String>);

impl Patterns {
    fn variable(&mut self, pattern: &str) -> String {
        let next = format!("pattern{}", self.0.len());
        self.0.entry(pattern.to_string()).or_insert(next).clone()
    }
}

/// Who a failed check is reported against.
enum Subject<'a> {
    Field(&'a str),
    /// Element `i` of a list field.
    Item(&'a str),
}

impl Subject<'_> {
    fn error(&self, message: &str) -> String {
        match self {
            Subject::Field(name) => {
                format!("errors.New({})", quote(&format!("{name}: {message}")))
            }
            Subject::Item(name) => format!(
                "fmt.Errorf({}, i)",
                quote(&format!("{}[%d]: {}", escape_verb(name), escape_verb(message)))
            ),
        }
    }

    fn wrap(&self) -> String {
        match self {
            Subject::Field(name) => format!(
                "fmt.Errorf({}, err)",
                quote(&format!("{}: %w", escape_verb(name)))
            ),
            Subject::Item(name) => format!(
                "fmt.Errorf({}, i, err)",
                quote(&format!("{}[%d]: %w", escape_verb(name)))
            ),
        }
    }
}

fn object_checks(
    ctx: &GoContext<'_>,
    object: &IrObject,
    patterns: &mut Patterns,
) -> Vec<String> {
    let mut checks = Vec::new();

    for field in &object.fields {
        let expr = format!("o.{}", go_name(&field.original_name));
        let subject = Subject::Field(&field.original_name);
        let mut lines = Vec::new();

        // Nested objects are only checked when present, which a value field
        // cannot express unless it is required.
        if field.required && ctx.is_object_ref(&field.field_type) {
            lines.push(validate_call(&expr, &subject));
        }
        value_checks(
            ctx,
            &expr,
            &field.field_type,
            &field.constraints,
            &subject,
            patterns,
            &mut lines,
        );

        if let IrType::Array(items) = ctx.helpers.underlying(&field.field_type) {
            let item_expr = format!("{expr}[i]");
            let item_subject = Subject::Item(&field.original_name);
            let mut inner = Vec::new();
            if ctx.is_object_ref(&items) {
                inner.push(validate_call(&item_expr, &item_subject));
            }
            value_checks(
                ctx,
                &item_expr,
                &items,
                &field.item_constraints,
                &item_subject,
                patterns,
                &mut inner,
            );
            if !inner.is_empty() {
                lines.push(format!(
                    "for i := range {expr} {{\n{}\n}}",
                    indent_lines(&inner.join("\n"), "\t")
                ));
            }
        }

        if lines.is_empty() {
            continue;
        }
        let block = lines.join("\n");
        let block = match presence_guard(ctx, &expr, &field.field_type, field.required) {
            Some(guard) => format!("if {guard} {{\n{}\n}}", indent_lines(&block, "\t")),
            None => block,
        };
        checks.push(indent_lines(&block, "\t"));
    }

    if let Some(values) = &object.additional_properties
        && object.fields.is_empty()
        && ctx.is_object_ref(values)
    {
        checks.push(indent_lines(
            "for key, value := range *o {\n\tif err := value.Validate(); err != nil {\n\t\treturn fmt.Errorf(\"%s: %w\", key, err)\n\t}\n}",
            "\t",
        ));
    }

    checks
}

/// Condition under which an optional field counts as present.
fn presence_guard(
    ctx: &GoContext<'_>,
    expr: &str,
    ty: &IrType,
    required: bool,
) -> Option<String> {
    if required {
        return None;
    }
    match ctx.helpers.underlying(ty) {
        IrType::Array(_) => Some(format!("len({expr}) > 0")),
        IrType::String
        | IrType::Date
        | IrType::Boolean
        | IrType::Float
        | IrType::Double
        | IrType::Integer { .. } => Some(format!(
            "{expr} != {}",
            ctx.zero_value(ty, false)
        )),
        _ => None,
    }
}

fn validate_call(expr: &str, subject: &Subject<'_>) -> String {
    format!(
        "if err := {expr}.Validate(); err != nil {{\n\treturn {}\n}}",
        subject.wrap()
    )
}

fn value_checks(
    ctx: &GoContext<'_>,
    expr: &str,
    ty: &IrType,
    constraints: &Constraints,
    subject: &Subject<'_>,
    patterns: &mut Patterns,
    out: &mut Vec<String>,
) {
    let mut check = |condition: String, message: String| {
        out.push(format!(
            "if {condition} {{\n\treturn {}\n}}",
            subject.error(&message)
        ));
    };

    if ctx.is_enum_ref(ty) {
        check(format!("!{expr}.Valid()"), "unknown value".to_string());
    }

    let underlying = ctx.helpers.underlying(ty);
    match &underlying {
        IrType::String | IrType::Date => {
            let text = if ty.is_ref() {
                format!("string({expr})")
            } else {
                expr.to_string()
            };
            if let Some(min) = constraints.min_length {
                check(
                    format!("utf8.RuneCountInString({text}) < {min}"),
                    format!("length must be at least {min}"),
                );
            }
            if let Some(max) = constraints.max_length {
                check(
                    format!("utf8.RuneCountInString({text}) > {max}"),
                    format!("length must be at most {max}"),
                );
            }
            if let Some(pattern) = &constraints.pattern {
                let variable = patterns.variable(pattern);
                check(
                    format!("!{variable}.MatchString({text})"),
                    format!("must match {pattern}"),
                );
            }
        }
        IrType::Float | IrType::Double | IrType::Integer { .. } => {
            let unsigned = matches!(underlying, IrType::Integer { unsigned: true, .. });
            if let Some(min) = constraints.minimum
                && !(unsigned && min <= 0.0 && !constraints.exclusive_minimum)
            {
                let (op, word) = if constraints.exclusive_minimum {
                    ("<=", "greater than")
                } else {
                    ("<", "at least")
                };
                let bound = number(min);
                check(format!("{expr} {op} {bound}"), format!("must be {word} {bound}"));
            }
            if let Some(max) = constraints.maximum {
                let (op, word) = if constraints.exclusive_maximum {
                    (">=", "less than")
                } else {
                    (">", "at most")
                };
                let bound = number(max);
                check(format!("{expr} {op} {bound}"), format!("must be {word} {bound}"));
            }
        }
        IrType::Array(_) => {
            if let Some(min) = constraints.min_items {
                check(
                    format!("len({expr}) < {min}"),
                    format!("must have at least {min} items"),
                );
            }
            if let Some(max) = constraints.max_items {
                check(
                    format!("len({expr}) > {max}"),
                    format!("must have at most {max} items"),
                );
            }
        }
        _ => {}
    }
}

/// Go literal of a JSON number bound.
fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// A Go raw string, falling back to an interpreted literal when the text has a backtick.
fn raw_string(text: &str) -> String {
    if text.contains('`') {
        quote(text)
    } else {
        format!("`{text}`")
    }
}

fn escape_verb(text: &str) -> String {
    text.replace('%', "%%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_shared() {
        let mut patterns = Patterns::default();
        assert_eq!(patterns.variable("^a$"), "pattern0");
        assert_eq!(patterns.variable("^b$"), "pattern1");
        assert_eq!(patterns.variable("^a$"), "pattern0");
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(number(0.0), "0");
        assert_eq!(number(-3.0), "-3");
        assert_eq!(number(1.5), "1.5");
    }

    #[test]
    fn test_raw_string() {
        assert_eq!(raw_string(r"^\d+$"), r"`^\d+$`");
        assert_eq!(raw_string("a`b"), "\"a`b\"");
    }

    #[test]
    fn test_subject_messages() {
        assert_eq!(
            Subject::Field("name").error("length must be at least 1"),
            "errors.New(\"name: length must be at least 1\")"
        );
        assert_eq!(
            Subject::Item("tags").error("must match ^a%$"),
            "fmt.Errorf(\"tags[%d]: must match ^a%%$\", i)"
        );
        assert_eq!(Subject::Field("owner").wrap(), "fmt.Errorf(\"owner: %w\", err)");
    }
}
