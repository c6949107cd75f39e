use crate::error::TransformError;
use crate::ir::grouping::group_by_tag;
use crate::ir::*;
use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::parameter::Parameter;
use crate::parse::schema::{AdditionalProperties, Constraints, ObjectSchema, Schema};
use crate::parse::spec::SwaggerSpec;

use super::collector::{iter_enums, validate_security};
use super::defaults::{apply_default_security, fill_operation_ids, merge_path_parameters};
use super::hoist::hoist_anonymous_objects;
use super::name_normalizer::{calc_endpoint_name, normalize_name};
use super::path_parts::path_parts;
use super::schema_resolver::schema_to_ir_type;

/// Rewrite the document in place: default security, path-level parameters,
/// operation ids, then hoisting of anonymous objects.
pub fn normalize(spec: &mut SwaggerSpec) -> Result<(), TransformError> {
    apply_default_security(spec);
    merge_path_parameters(spec);
    fill_operation_ids(spec);
    validate_security(spec)?;
    hoist_anonymous_objects(spec)
}

/// Normalize a parsed Swagger document and build the generator model over it.
pub fn transform(mut spec: SwaggerSpec) -> Result<IrSpec, TransformError> {
    normalize(&mut spec)?;

    // Operations in document order first; tag groups are taken from this order.
    let mut operations = Vec::new();
    for (path, item) in &spec.paths {
        for (method, op) in &item.operations {
            operations.push(build_operation(*method, path, op, &spec.consumes)?);
        }
    }
    let groups = group_by_tag(&operations);

    let mut order: Vec<usize> = (0..operations.len()).collect();
    order.sort_by(|&a, &b| operations[a].name.original.cmp(&operations[b].name.original));
    let mut position = vec![0; operations.len()];
    for (sorted, &original) in order.iter().enumerate() {
        position[original] = sorted;
    }

    let mut slots: Vec<Option<IrOperation>> = operations.into_iter().map(Some).collect();
    let operations: Vec<IrOperation> = order
        .iter()
        .filter_map(|&index| slots[index].take())
        .collect();

    let tags = groups
        .into_iter()
        .map(|group| IrTagGroup {
            operations: group.operations.iter().map(|&i| position[i]).collect(),
            ..group
        })
        .collect();

    let operations_by_name = operations
        .iter()
        .enumerate()
        .map(|(i, op)| (op.name.original.clone(), i))
        .collect();

    let mut enums: Vec<IrEnum> = iter_enums(&spec)
        .map(|(name, e)| IrEnum {
            name: normalize_name(name),
            description: e.meta.description.clone(),
            base: schema_to_ir_type(&Schema::Enum(e.clone())),
            variants: e
                .values
                .iter()
                .map(|value| IrEnumVariant {
                    name: normalize_name(&enum_value_label(value)),
                    value: value.clone(),
                })
                .collect(),
        })
        .collect();
    enums.sort_by(|a, b| a.name.original.cmp(&b.name.original));

    let mut objects = Vec::new();
    let mut type_aliases = Vec::new();
    for (name, schema) in &spec.definitions {
        match schema {
            Schema::Object(object) => objects.push(build_object(name, object)),
            Schema::Enum(_) => {}
            other => type_aliases.push(IrAlias {
                name: normalize_name(name),
                description: other.description().map(str::to_string),
                target: schema_to_ir_type(other),
            }),
        }
    }

    let info = IrInfo {
        title: spec.info.title.clone(),
        description: spec.info.description.clone(),
        version: spec.info.version.clone(),
        host: spec.host.clone(),
        base_path: spec.base_path.clone(),
    };

    Ok(IrSpec {
        info,
        operations,
        operations_by_name,
        enums,
        objects,
        type_aliases,
        tags,
        has_security: !spec.security_definitions.is_empty(),
        credential_type: spec.credential_type.clone(),
        spec,
    })
}

fn build_operation(
    method: HttpMethod,
    path: &str,
    op: &Operation,
    document_consumes: &[String],
) -> Result<IrOperation, TransformError> {
    let name = op
        .operation_id
        .clone()
        .unwrap_or_else(|| calc_endpoint_name(method, path));

    let consumes = if !op.consumes.is_empty() {
        op.consumes.clone()
    } else if !document_consumes.is_empty() {
        document_consumes.to_vec()
    } else {
        vec![JSON_MEDIA_TYPE.to_string()]
    };

    // Only the first body parameter is used.
    let mut seen_body = false;
    let parameters = op
        .parameters
        .iter()
        .filter(|p| !p.is_body() || !std::mem::replace(&mut seen_body, true))
        .map(build_parameter)
        .collect();

    let responses = op
        .responses
        .iter()
        .map(|(status, response)| IrResponse {
            status: status.clone(),
            description: response.description.clone(),
            response_type: response.schema.as_ref().map(schema_to_ir_type),
            schema: response.schema.clone(),
        })
        .collect();

    Ok(IrOperation {
        name: normalize_name(&name),
        method,
        path: path.to_string(),
        path_parts: path_parts(path, &op.parameters)?,
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        parameters,
        responses,
        security: op.security.clone().unwrap_or_default(),
        consumes,
        produces: op.produces.clone(),
        deprecated: op.deprecated,
    })
}

fn build_parameter(param: &Parameter) -> IrParameter {
    IrParameter {
        name: normalize_name(&param.name),
        original_name: param.name.clone(),
        location: param.location,
        param_type: schema_to_ir_type(&param.schema),
        schema: param.schema.clone(),
        required: param.required,
        description: param.description.clone(),
        collection_format: param.collection_format.clone(),
    }
}

fn build_object(name: &str, object: &ObjectSchema) -> IrObject {
    let fields = object
        .properties
        .iter()
        .map(|(property, schema)| {
            let item_constraints = match schema {
                Schema::Array(a) => a.items.constraints().cloned().unwrap_or_default(),
                _ => Constraints::default(),
            };
            IrField {
                name: normalize_name(property),
                original_name: property.clone(),
                field_type: schema_to_ir_type(schema),
                required: object.is_required(property),
                description: schema.description().map(str::to_string),
                nullable: schema.meta().nullable,
                read_only: schema.meta().read_only,
                constraints: schema.constraints().cloned().unwrap_or_default(),
                item_constraints,
            }
        })
        .collect();

    let additional_properties = match &object.additional_properties {
        Some(AdditionalProperties::Schema(values)) => Some(schema_to_ir_type(values)),
        Some(AdditionalProperties::Bool(true)) => Some(IrType::Any),
        _ => None,
    };

    IrObject {
        name: normalize_name(name),
        description: object.meta.description.clone(),
        fields,
        additional_properties,
    }
}

fn enum_value_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
