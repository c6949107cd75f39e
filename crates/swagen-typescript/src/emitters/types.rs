use minijinja::{Environment, context};
use swagen_core::GeneratorError;
use swagen_core::helpers::Helpers;
use swagen_core::ir::{IrField, IrObject, IrOperation, IrSpec, IrType};
use swagen_core::transform::name_normalizer::label;

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
fn escape_jsdoc(value: &str) -> String {
    value.replace("*/", "*\\/")
}

/// JSDoc block for `text`, indented by `indent`.
fn jsdoc(text: &str, indent: &str) -> String {
    let text = escape_jsdoc(text.trim());
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() == 1 {
        return format!("{indent}/** {} */", lines[0]);
    }
    let mut out = format!("{indent}/**");
    for line in lines {
        out.push('\n');
        out.push_str(format!("{indent} * {line}").trim_end());
    }
    out.push('\n');
    out.push_str(&format!("{indent} */"));
    out
}

/// A property key, quoted unless it is a plain identifier.
fn property_key(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if plain {
        name.to_string()
    } else {
        serde_json::Value::String(name.to_string()).to_string()
    }
}

/// Emit `types.ts`: enums as string/number unions, aliases, interfaces and
/// the API interfaces.
pub fn emit_types(
    ir: &IrSpec,
    helpers: &Helpers<'_>,
    header: &str,
) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("types.ts.j2", include_str!("../../templates/types.ts.j2"))
        .map_err(|e| GeneratorError::Render(e.to_string()))?;

    let enums: Vec<minijinja::Value> = ir
        .enums
        .iter()
        .map(|e| {
            let mut values: Vec<String> = e
                .variants
                .iter()
                .map(|v| helpers.cast(&v.value, &e.base))
                .collect();
            if values.is_empty() {
                values.push("never".to_string());
            }
            context! {
                name => label(&e.name.original),
                doc => e.description.as_deref().map(|d| jsdoc(d, "")),
                values => values,
            }
        })
        .collect();

    let aliases: Vec<minijinja::Value> = ir
        .type_aliases
        .iter()
        .map(|a| {
            context! {
                name => label(&a.name.original),
                doc => a.description.as_deref().map(|d| jsdoc(d, "")),
                target => helpers.map_type(&a.target, false),
            }
        })
        .collect();

    let objects: Vec<minijinja::Value> = ir
        .objects
        .iter()
        .map(|o| {
            let fields: Vec<minijinja::Value> = o
                .fields
                .iter()
                .map(|f| {
                    context! {
                        doc => f.description.as_deref().map(|d| jsdoc(d, "  ")),
                        declaration => field_declaration(helpers, f),
                    }
                })
                .collect();
            context! {
                name => label(&o.name.original),
                doc => o.description.as_deref().map(|d| jsdoc(d, "")),
                fields => fields,
                index => o.additional_properties.as_ref().map(|v| index_type(helpers, o, v)),
            }
        })
        .collect();

    let groups: Vec<minijinja::Value> = ir
        .tags
        .iter()
        .map(|group| {
            let methods: Vec<minijinja::Value> = ir
                .tag_operations(group)
                .map(|op| method_context(helpers, op))
                .collect();
            context! {
                name => format!("{}API", group.name.pascal_case),
                tag => group.name.original.clone(),
                methods => methods,
            }
        })
        .collect();

    let extends: Vec<String> = ir
        .tags
        .iter()
        .map(|group| format!("{}API", group.name.pascal_case))
        .collect();

    let untagged: Vec<minijinja::Value> = ir
        .operations
        .iter()
        .filter(|op| op.tags.is_empty())
        .map(|op| method_context(helpers, op))
        .collect();

    let title = if ir.info.title.is_empty() {
        "the API".to_string()
    } else {
        ir.info.title.clone()
    };

    env.get_template("types.ts.j2")
        .and_then(|t| {
            t.render(context! {
                header => header,
                title => title,
                enums => enums,
                aliases => aliases,
                objects => objects,
                groups => groups,
                extends => extends,
                untagged => untagged,
            })
        })
        .map_err(|e| GeneratorError::Render(e.to_string()))
}

/// Value type of the index signature. Declared fields must fit it too.
fn index_type(helpers: &Helpers<'_>, object: &IrObject, values: &IrType) -> String {
    if object.fields.is_empty() {
        helpers.map_type(values, false)
    } else {
        "unknown".to_string()
    }
}

fn field_declaration(helpers: &Helpers<'_>, field: &IrField) -> String {
    let mut ty = helpers.map_type(&field.field_type, false);
    if field.nullable {
        ty.push_str(" | null");
    }
    format!(
        "{}{}{}: {ty}",
        if field.read_only { "readonly " } else { "" },
        property_key(&field.original_name),
        if field.required { "" } else { "?" },
    )
}

/// `listPets(params: { limit?: number }): Promise<Pet[]>`
fn method_context(helpers: &Helpers<'_>, op: &IrOperation) -> minijinja::Value {
    let params: Vec<String> = op
        .parameters
        .iter()
        .map(|p| {
            format!(
                "{}{}: {}",
                property_key(&p.original_name),
                if p.required { "" } else { "?" },
                helpers.map_type(&p.param_type, false)
            )
        })
        .collect();
    let args = if params.is_empty() {
        String::new()
    } else {
        let optional = if op.parameters.iter().any(|p| p.required) { "" } else { "?" };
        format!("params{optional}: {{ {} }}", params.join("; "))
    };
    let returns = op
        .response_type()
        .map(|ty| helpers.map_type(ty, false))
        .unwrap_or_else(|| "void".to_string());

    let mut doc = op.summary.clone().unwrap_or_default();
    if let Some(description) = &op.description {
        if !doc.is_empty() {
            doc.push_str("\n\n");
        }
        doc.push_str(description);
    }
    if op.deprecated {
        if !doc.is_empty() {
            doc.push('\n');
        }
        doc.push_str("@deprecated");
    }

    context! {
        doc => (!doc.is_empty()).then(|| jsdoc(&doc, "  ")),
        signature => format!("{}({args}): Promise<{returns}>", op.name.camel_case),
    }
}
