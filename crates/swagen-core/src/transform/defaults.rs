use crate::parse::spec::SwaggerSpec;

use super::name_normalizer::calc_endpoint_name;

/// Give every operation without a `security` key the document default.
/// An explicit empty list keeps the operation unsecured.
pub fn apply_default_security(spec: &mut SwaggerSpec) {
    let Some(default) = spec.security.as_ref().filter(|s| !s.is_empty()) else {
        return;
    };

    for item in spec.paths.values_mut() {
        for op in item.operations.values_mut() {
            if op.security.is_none() {
                op.security = Some(default.clone());
            }
        }
    }
}

/// Copy path-level parameters into each operation of the path. A parameter the
/// operation already declares (same name and location) is not overridden.
pub fn merge_path_parameters(spec: &mut SwaggerSpec) {
    for item in spec.paths.values_mut() {
        let shared = std::mem::take(&mut item.parameters);
        if shared.is_empty() {
            continue;
        }
        for op in item.operations.values_mut() {
            let inherited: Vec<_> = shared
                .iter()
                .filter(|p| {
                    !op.parameters
                        .iter()
                        .any(|own| own.name == p.name && own.location == p.location)
                })
                .cloned()
                .collect();
            op.parameters.splice(0..0, inherited);
        }
    }
}

/// Derive `operationId` from method and path where it is missing.
pub fn fill_operation_ids(spec: &mut SwaggerSpec) {
    for (path, item) in spec.paths.iter_mut() {
        for (method, op) in item.operations.iter_mut() {
            if op.operation_id.is_none() {
                let name = calc_endpoint_name(*method, path);
                log::debug!("derived operation id {name} for {method} {path}");
                op.operation_id = Some(name);
            }
        }
    }
}
