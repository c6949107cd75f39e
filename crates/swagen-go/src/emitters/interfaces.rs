use minijinja::{Environment, context};
use swagen_core::GeneratorError;
use swagen_core::ir::{IrEnum, IrField, IrObject, IrOperation, IrType};

use super::{GoContext, enum_constants, indent_lines, quote, render};
use crate::type_mapper::go_name;

/// Emit `interfaces.go`: models, enums, security scheme names and the API interfaces.
pub fn emit_interfaces(ctx: &GoContext<'_>, env: &Environment<'_>) -> Result<String, GeneratorError> {
    let ir = ctx.ir;
    let h = &ctx.helpers;

    let enums: Vec<minijinja::Value> = ir.enums.iter().map(|e| enum_context(ctx, e)).collect();

    let aliases: Vec<minijinja::Value> = ir
        .type_aliases
        .iter()
        .map(|a| {
            context! {
                name => go_name(&a.name.original),
                doc => a.description.as_deref().map(|d| h.comment(d)),
                target => h.map_type(&a.target, false),
                // A Go alias keeps time.Time's JSON methods.
                transparent => h.underlying(&a.target) == IrType::DateTime,
            }
        })
        .collect();

    let objects: Vec<minijinja::Value> = ir.objects.iter().map(|o| object_context(ctx, o)).collect();

    let schemes: Vec<minijinja::Value> = ir
        .spec
        .security_definitions
        .keys()
        .map(|name| {
            context! {
                name => format!("Scheme{}", go_name(name)),
                value => quote(name),
            }
        })
        .collect();

    let groups: Vec<minijinja::Value> = ir
        .tags
        .iter()
        .map(|group| {
            let methods: Vec<minijinja::Value> = ir
                .tag_operations(group)
                .map(|op| method_context(ctx, op))
                .collect();
            context! {
                name => format!("{}API", go_name(&group.name.original)),
                tag => group.name.original.clone(),
                methods => methods,
            }
        })
        .collect();

    let untagged: Vec<minijinja::Value> = ir
        .operations
        .iter()
        .filter(|op| op.tags.is_empty())
        .map(|op| method_context(ctx, op))
        .collect();

    let title = if ir.info.title.is_empty() {
        "the API".to_string()
    } else {
        ir.info.title.clone()
    };

    let body = render(
        env,
        "interfaces.go.j2",
        context! {
            title => title,
            enums => enums,
            aliases => aliases,
            objects => objects,
            declare_credential => ir.has_security && ctx.credential.is_local(),
            credential => ctx.credential.name.clone(),
            schemes => schemes,
            groups => groups,
            untagged => untagged,
        },
    )?;
    ctx.render_file(env, &ctx.api_package, &body, true)
}

fn enum_context(ctx: &GoContext<'_>, e: &IrEnum) -> minijinja::Value {
    let name = go_name(&e.name.original);
    let variants: Vec<minijinja::Value> = e
        .variants
        .iter()
        .zip(enum_constants(e))
        .map(|(v, constant)| {
            context! {
                name => constant,
                value => ctx.helpers.cast(&v.value, &e.base),
            }
        })
        .collect();
    context! {
        name => name.clone(),
        doc => e.description.as_deref().map(|d| ctx.helpers.comment(d)),
        base => ctx.helpers.map_type(&e.base, false),
        variants => variants,
    }
}

fn object_context(ctx: &GoContext<'_>, object: &IrObject) -> minijinja::Value {
    let fields: Vec<minijinja::Value> = object
        .fields
        .iter()
        .map(|f| field_context(ctx, f))
        .collect();
    context! {
        name => go_name(&object.name.original),
        doc => object.description.as_deref().map(|d| ctx.helpers.comment(d)),
        fields => fields,
        map_of => object.additional_properties.as_ref().map(|v| ctx.helpers.map_type(v, false)),
    }
}

fn field_context(ctx: &GoContext<'_>, field: &IrField) -> minijinja::Value {
    let json = if field.required {
        field.original_name.clone()
    } else {
        format!("{},omitempty", field.original_name)
    };
    context! {
        name => go_name(&field.original_name),
        doc => field.description.as_deref().map(|d| indent_lines(&ctx.helpers.comment(d), "\t")),
        go_type => ctx.helpers.map_type(&field.field_type, false),
        json => json,
    }
}

fn method_context(ctx: &GoContext<'_>, op: &IrOperation) -> minijinja::Value {
    context! {
        doc => ctx.operation_doc(op, "\t"),
        signature => ctx.signature(op, false),
    }
}
