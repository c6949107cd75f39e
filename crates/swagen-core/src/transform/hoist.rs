use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::TransformError;
use crate::parse::schema::{AdditionalProperties, ObjectSchema, Schema};
use crate::parse::spec::SwaggerSpec;

use super::name_normalizer::{calc_endpoint_name, title_case};

/// Move every anonymous object (body parameters, responses, properties nested
/// in definitions) into a named top-level definition and leave a reference in
/// its place.
///
/// Names are derived from the location:
/// - body parameter: `operationId + Title(param)`
/// - response: `operationId + "Response" + status`
/// - property: `parent + Title(property)`
/// - items of a top-level array definition: `name + "Item"`
///
/// New definitions are appended in hoisting order, a parent before its
/// children. A name that is already taken aborts with
/// [`TransformError::NameCollision`]. Running the pass twice changes nothing.
pub fn hoist_anonymous_objects(spec: &mut SwaggerSpec) -> Result<(), TransformError> {
    let SwaggerSpec {
        paths, definitions, ..
    } = spec;

    let mut hoister = Hoister {
        taken: definitions.keys().cloned().collect(),
        hoisted: IndexMap::new(),
    };

    for (path, item) in paths.iter_mut() {
        for (method, op) in item.operations.iter_mut() {
            let op_id = op
                .operation_id
                .clone()
                .unwrap_or_else(|| calc_endpoint_name(*method, path));

            for param in op.parameters.iter_mut().filter(|p| p.is_body()) {
                let name = format!("{op_id}{}", title_case(&param.name));
                hoister.descend(&mut param.schema, &name)?;
            }

            for (status, response) in op.responses.iter_mut() {
                if let Some(schema) = response.schema.as_mut() {
                    let name = format!("{op_id}Response{status}");
                    hoister.descend(schema, &name)?;
                }
            }
        }
    }

    for (name, definition) in definitions.iter_mut() {
        hoister.descend_definition(definition, name)?;
    }

    definitions.extend(hoister.hoisted);
    Ok(())
}

struct Hoister {
    taken: HashSet<String>,
    /// Definitions created by this pass, in creation order.
    hoisted: IndexMap<String, Schema>,
}

impl Hoister {
    /// Descend a top-level definition without hoisting the definition itself.
    fn descend_definition(&mut self, schema: &mut Schema, name: &str) -> Result<(), TransformError> {
        match schema {
            Schema::Object(object) => self.descend_properties(object, name),
            Schema::Array(array) => self.descend(&mut array.items, &format!("{name}Item")),
            _ => Ok(()),
        }
    }

    fn descend(&mut self, schema: &mut Schema, name: &str) -> Result<(), TransformError> {
        match schema {
            Schema::Array(array) => self.descend(&mut array.items, name),
            Schema::Object(_) => {
                if !self.taken.insert(name.to_string()) {
                    return Err(TransformError::NameCollision(name.to_string()));
                }
                log::debug!("hoisting anonymous object as {name}");

                // Reserve the slot so the parent precedes anything hoisted from its properties.
                self.hoisted.insert(name.to_string(), Schema::any());
                let moved = std::mem::replace(schema, Schema::reference(name));
                if let Schema::Object(mut object) = moved {
                    self.descend_properties(&mut object, name)?;
                    self.hoisted.insert(name.to_string(), Schema::Object(object));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn descend_properties(
        &mut self,
        object: &mut ObjectSchema,
        name: &str,
    ) -> Result<(), TransformError> {
        for (property, schema) in object.properties.iter_mut() {
            self.descend(schema, &format!("{name}{}", title_case(property)))?;
        }
        if let Some(AdditionalProperties::Schema(values)) = object.additional_properties.as_mut() {
            self.descend(values, &format!("{name}Value"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn hoisted(yaml: &str) -> SwaggerSpec {
        let mut spec = parse::from_yaml(yaml).unwrap();
        hoist_anonymous_objects(&mut spec).unwrap();
        spec
    }

    fn definition_names(spec: &SwaggerSpec) -> Vec<&str> {
        spec.definitions.keys().map(String::as_str).collect()
    }

    #[test]
    fn hoists_inline_body_object() {
        let spec = hoisted(
            r#"
swagger: "2.0"
paths:
  /users:
    post:
      operationId: createUser
      parameters:
        - name: body
          in: body
          schema:
            type: object
            properties:
              name:
                type: string
"#,
        );
        assert_eq!(definition_names(&spec), vec!["createUserBody"]);
        let op = &spec.paths["/users"].operations[0];
        assert_eq!(op.parameters[0].schema.ref_name(), Some("createUserBody"));
        assert!(spec.definitions["createUserBody"].is_object());
    }

    #[test]
    fn parents_precede_children_and_arrays_pass_through() {
        let spec = hoisted(
            r#"
swagger: "2.0"
paths:
  /orders:
    get:
      operationId: listOrders
      responses:
        200:
          description: ok
          schema:
            type: array
            items:
              type: object
              properties:
                customer:
                  type: object
                  properties:
                    address:
                      properties:
                        city:
                          type: string
definitions:
  Pet:
    type: object
    properties:
      owner:
        type: object
        properties:
          name:
            type: string
      tags:
        type: array
        items:
          type: object
          properties:
            label:
              type: string
  Batch:
    type: array
    items:
      type: object
      properties:
        id:
          type: integer
"#,
        );
        assert_eq!(
            definition_names(&spec),
            vec![
                "Pet",
                "Batch",
                "listOrdersResponse200",
                "listOrdersResponse200Customer",
                "listOrdersResponse200CustomerAddress",
                "PetOwner",
                "PetTags",
                "BatchItem",
            ]
        );
        match &spec.definitions["Pet"] {
            Schema::Object(pet) => {
                assert_eq!(pet.properties["owner"].ref_name(), Some("PetOwner"));
                match &pet.properties["tags"] {
                    Schema::Array(a) => assert_eq!(a.items.ref_name(), Some("PetTags")),
                    other => panic!("expected array, got {other:?}"),
                }
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn collision_is_fatal() {
        let mut spec = parse::from_yaml(
            r#"
swagger: "2.0"
paths:
  /users:
    post:
      operationId: createUser
      parameters:
        - name: body
          in: body
          schema:
            type: object
definitions:
  createUserBody:
    type: string
"#,
        )
        .unwrap();
        let err = hoist_anonymous_objects(&mut spec).unwrap_err();
        assert_eq!(err.to_string(), "object createUserBody already defined");
    }

    #[test]
    fn second_run_changes_nothing() {
        let yaml = r#"
swagger: "2.0"
paths:
  /pets:
    post:
      operationId: addPet
      parameters:
        - name: pet
          in: body
          schema:
            properties:
              collar:
                type: object
                properties:
                  size:
                    type: integer
      responses:
        default:
          description: error
          schema:
            type: object
"#;
        let once = hoisted(yaml);
        let mut twice = once.clone();
        hoist_anonymous_objects(&mut twice).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            definition_names(&once),
            vec!["addPetPet", "addPetPetCollar", "addPetResponsedefault"]
        );
    }
}
