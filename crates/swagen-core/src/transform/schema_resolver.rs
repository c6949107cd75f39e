use indexmap::IndexMap;

use crate::ir::{IntWidth, IrType};
use crate::parse::schema::{PrimitiveType, Schema};

/// Map a schema node to its language-neutral type. This is the only place the
/// primitive `type`/`format`/`minimum` switch lives; every backend maps from
/// the returned [`IrType`].
pub fn schema_to_ir_type(schema: &Schema) -> IrType {
    match schema {
        Schema::Ref(r) => IrType::Ref(r.name.clone()),
        Schema::Array(a) => IrType::Array(Box::new(schema_to_ir_type(&a.items))),
        Schema::Primitive(p) => {
            primitive_to_ir_type(p.primitive, p.format.as_deref(), p.constraints.minimum)
        }
        Schema::Enum(e) => primitive_to_ir_type(e.primitive, e.format.as_deref(), None),
        Schema::Object(_) | Schema::Any(_) => IrType::Any,
    }
}

fn primitive_to_ir_type(
    primitive: PrimitiveType,
    format: Option<&str>,
    minimum: Option<f64>,
) -> IrType {
    match primitive {
        PrimitiveType::String => match format {
            Some("date-time") => IrType::DateTime,
            Some("date") => IrType::Date,
            _ => IrType::String,
        },
        PrimitiveType::Boolean => IrType::Boolean,
        PrimitiveType::Number => match format {
            Some("float") => IrType::Float,
            _ => IrType::Double,
        },
        PrimitiveType::Integer => {
            let width = match format {
                Some("int32") => IntWidth::W32,
                Some("int64") => IntWidth::W64,
                _ => IntWidth::Platform,
            };
            IrType::Integer {
                width,
                unsigned: minimum == Some(0.0),
            }
        }
    }
}

/// Follow references until a non-reference definition is reached. Returns
/// `None` for a dangling or cyclic reference.
pub fn resolve<'a>(
    schema: &'a Schema,
    definitions: &'a IndexMap<String, Schema>,
) -> Option<&'a Schema> {
    let mut current = schema;
    let mut hops = 0;
    while let Schema::Ref(r) = current {
        if hops > definitions.len() {
            return None;
        }
        current = definitions.get(&r.name)?;
        hops += 1;
    }
    Some(current)
}

/// Like [`resolve`] but for an [`IrType`]: a `Ref` becomes the type of the
/// definition it points at. Object definitions and dangling references stay `Ref`.
pub fn underlying_type(ty: &IrType, definitions: &IndexMap<String, Schema>) -> IrType {
    let mut current = ty.clone();
    let mut hops = 0;
    while let IrType::Ref(name) = &current {
        if hops > definitions.len() {
            return IrType::Any;
        }
        match definitions.get(name) {
            Some(Schema::Object(_)) | None => break,
            Some(definition) => current = schema_to_ir_type(definition),
        }
        hops += 1;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Schema {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn unsigned_when_minimum_is_zero() {
        let ty = schema_to_ir_type(&parse("type: integer\nformat: int64\nminimum: 0\n"));
        assert_eq!(
            ty,
            IrType::Integer {
                width: IntWidth::W64,
                unsigned: true
            }
        );
        let ty = schema_to_ir_type(&parse("type: integer\nminimum: 1\n"));
        assert_eq!(
            ty,
            IrType::Integer {
                width: IntWidth::Platform,
                unsigned: false
            }
        );
    }

    #[test]
    fn strings_and_numbers_follow_format() {
        assert_eq!(
            schema_to_ir_type(&parse("type: string\nformat: date-time")),
            IrType::DateTime
        );
        assert_eq!(
            schema_to_ir_type(&parse("type: string\nformat: date")),
            IrType::Date
        );
        assert_eq!(
            schema_to_ir_type(&parse("type: string\nformat: uuid")),
            IrType::String
        );
        assert_eq!(
            schema_to_ir_type(&parse("type: number\nformat: float")),
            IrType::Float
        );
        assert_eq!(schema_to_ir_type(&parse("type: number")), IrType::Double);
    }

    #[test]
    fn arrays_refs_and_opaque_nodes() {
        assert_eq!(
            schema_to_ir_type(&parse("type: array\nitems:\n  $ref: '#/definitions/Pet'\n")),
            IrType::Array(Box::new(IrType::Ref("Pet".into())))
        );
        assert_eq!(schema_to_ir_type(&parse("type: object")), IrType::Any);
        assert_eq!(schema_to_ir_type(&parse("type: file")), IrType::Any);
        assert_eq!(
            schema_to_ir_type(&parse("type: string\nenum: [a, b]")),
            IrType::String
        );
    }

    #[test]
    fn resolves_reference_chains() {
        let mut definitions = IndexMap::new();
        definitions.insert("Id".to_string(), parse("type: integer\nformat: int32"));
        definitions.insert("PetId".to_string(), Schema::reference("Id"));
        definitions.insert("Pet".to_string(), parse("type: object"));
        definitions.insert("Loop".to_string(), Schema::reference("Loop"));

        let pet_id = Schema::reference("PetId");
        let resolved = resolve(&pet_id, &definitions).unwrap();
        assert_eq!(resolved.type_name(), Some("integer"));
        assert!(resolve(&Schema::reference("Missing"), &definitions).is_none());
        assert!(resolve(&Schema::reference("Loop"), &definitions).is_none());

        assert_eq!(
            underlying_type(&IrType::Ref("PetId".into()), &definitions),
            IrType::Integer {
                width: IntWidth::W32,
                unsigned: false
            }
        );
        assert_eq!(
            underlying_type(&IrType::Ref("Pet".into()), &definitions),
            IrType::Ref("Pet".into())
        );
        assert_eq!(
            underlying_type(&IrType::Ref("Loop".into()), &definitions),
            IrType::Any
        );
    }
}
