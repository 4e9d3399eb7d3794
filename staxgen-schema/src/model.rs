//! In-memory schema model.
//!
//! This is the shape the code generator consumes: an ordered list of record
//! types, each an ordered list of fields. The XML Schema reader produces it,
//! but it can also be built by hand, which is how most tests use it.

use miette::SourceSpan;

/// A parsed schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// Top-level complex types, in declaration order.
    pub types: Vec<RecordTypeDecl>,
}

impl Schema {
    pub fn new(types: Vec<RecordTypeDecl>) -> Self {
        Self { types }
    }

    /// Look up a record type by name.
    pub fn get(&self, name: &str) -> Option<&RecordTypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// One named record type. Compiles to one generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTypeDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub span: Option<SourceSpan>,
}

impl RecordTypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            span: None,
        }
    }

    /// Append a field (builder style).
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }
}

/// Built-in scalar types a field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Boolean,
}

/// Item type of a homogeneous repeated field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemType {
    String,
    Record(String),
}

/// Describes a collection built from repeated child tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepeatedSpec {
    /// One named child tag repeated; becomes a list.
    Homogeneous { item_tag: String, item_type: ItemType },
    /// Arbitrary child tags; becomes a string map keyed by tag name.
    Heterogeneous,
}

/// One field of a record type.
///
/// At most one of `scalar_type`, `nested_type_name` and `repeated` is
/// expected to be set. A declaration with none of them cannot be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub scalar_type: Option<ScalarType>,
    pub default_value: Option<String>,
    pub nested_type_name: Option<String>,
    pub repeated: Option<RepeatedSpec>,
    pub span: Option<SourceSpan>,
}

impl FieldDecl {
    /// A field with nothing but a name. Not classifiable on its own.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scalar_type: None,
            default_value: None,
            nested_type_name: None,
            repeated: None,
            span: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self {
            scalar_type: Some(ScalarType::String),
            ..Self::untyped(name)
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            scalar_type: Some(ScalarType::Boolean),
            ..Self::untyped(name)
        }
    }

    pub fn nested(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            nested_type_name: Some(type_name.into()),
            ..Self::untyped(name)
        }
    }

    pub fn list_of_strings(name: impl Into<String>, item_tag: impl Into<String>) -> Self {
        Self {
            repeated: Some(RepeatedSpec::Homogeneous {
                item_tag: item_tag.into(),
                item_type: ItemType::String,
            }),
            ..Self::untyped(name)
        }
    }

    pub fn list_of_records(
        name: impl Into<String>,
        item_tag: impl Into<String>,
        item_type: impl Into<String>,
    ) -> Self {
        Self {
            repeated: Some(RepeatedSpec::Homogeneous {
                item_tag: item_tag.into(),
                item_type: ItemType::Record(item_type.into()),
            }),
            ..Self::untyped(name)
        }
    }

    pub fn string_map(name: impl Into<String>) -> Self {
        Self {
            repeated: Some(RepeatedSpec::Heterogeneous),
            ..Self::untyped(name)
        }
    }

    /// Set the default value (builder style).
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
