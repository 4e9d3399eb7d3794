//! Field classification.
//!
//! Every field declaration maps to exactly one [`FieldShape`]. The shape
//! decides both the storage slot the generated class declares and the
//! branch its parser runs when the field's tag is read.

use staxgen_schema::{FieldDecl, ItemType, RepeatedSpec, ScalarType};

/// Scalar storage and its declared default.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    String(Option<String>),
    /// `None` when no default was declared (the slot starts `false`).
    Boolean(Option<bool>),
}

/// The representation and parse logic chosen for one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldShape {
    Scalar(Scalar),
    NestedRecord { type_name: String },
    ListOfStrings { item_tag: String },
    ListOfRecords { item_tag: String, item_type: String },
    StringMap,
}

impl FieldShape {
    /// Name of the record type this shape refers to, if any.
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            Self::NestedRecord { type_name } => Some(type_name),
            Self::ListOfRecords { item_type, .. } => Some(item_type),
            Self::Scalar(_) | Self::ListOfStrings { .. } | Self::StringMap => None,
        }
    }
}

/// Boolean text conversion with `Boolean.parseBoolean` semantics:
/// exactly `true`, ignoring ASCII case, without trimming.
pub fn parse_boolean(text: &str) -> bool {
    text.eq_ignore_ascii_case("true")
}

/// Classify a field declaration. Returns `None` if no shape fits.
///
/// Scalars win over everything, then repetition, then a nested record
/// reference.
pub fn classify(field: &FieldDecl) -> Option<FieldShape> {
    match field.scalar_type {
        Some(ScalarType::String) => {
            return Some(FieldShape::Scalar(Scalar::String(
                field.default_value.clone(),
            )));
        }
        Some(ScalarType::Boolean) => {
            return Some(FieldShape::Scalar(Scalar::Boolean(
                field.default_value.as_deref().map(parse_boolean),
            )));
        }
        None => {}
    }

    match (&field.repeated, &field.nested_type_name) {
        (
            Some(RepeatedSpec::Homogeneous {
                item_tag,
                item_type,
            }),
            _,
        ) => Some(match item_type {
            ItemType::String => FieldShape::ListOfStrings {
                item_tag: item_tag.clone(),
            },
            ItemType::Record(name) => FieldShape::ListOfRecords {
                item_tag: item_tag.clone(),
                item_type: name.clone(),
            },
        }),
        (Some(RepeatedSpec::Heterogeneous), _) => Some(FieldShape::StringMap),
        (None, Some(type_name)) => Some(FieldShape::NestedRecord {
            type_name: type_name.clone(),
        }),
        (None, None) => None,
    }
}
