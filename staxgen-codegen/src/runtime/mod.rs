//! Sample-document runtime.
//!
//! [`Runtime`] walks the same [`ClassPlan`]s the emitter renders and performs
//! the decision tree a generated parser encodes, over a [`PullReader`]. This
//! lets a sample document be parsed the way the generated Java would parse
//! it without compiling any Java.

mod reader;
mod value;

use indexmap::IndexMap;
use thiserror::Error;

pub use reader::{Location, PullReader};
pub use value::{Record, Value};

use crate::{
    plan::{ClassPlan, PlanSet},
    shape::{FieldShape, Scalar, parse_boolean},
};

/// Deepest record nesting a sample document may reach.
pub const MAX_DEPTH: usize = 256;

/// Failures while parsing a sample document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unexpected tag: {tag} at {location}")]
    UnexpectedTag { tag: String, location: Location },

    #[error("Expected <{expected}> but got: {found} at {location}")]
    ExpectedTag {
        expected: String,
        found: String,
        location: Location,
    },

    #[error("expected a start or end tag but found text at {location}")]
    UnexpectedText { location: Location },

    #[error("text-only element expected at {location}")]
    NotTextOnly { location: Location },

    #[error("unexpected end of document at {location}")]
    UnexpectedEof { location: Location },

    #[error("unknown entity '&{name};' at {location}")]
    UnknownEntity { name: String, location: Location },

    #[error("records nested deeper than {limit} levels at {location}")]
    TooDeep { limit: usize, location: Location },

    #[error("no class is generated for type '{0}'")]
    UnknownType(String),

    #[error("malformed XML at {location}: {message}")]
    Xml { message: String, location: Location },
}

/// Executes class plans against XML documents.
#[derive(Debug, Clone, Copy)]
pub struct Runtime<'p> {
    plans: &'p PlanSet,
}

impl<'p> Runtime<'p> {
    pub fn new(plans: &'p PlanSet) -> Self {
        Self { plans }
    }

    /// Parse a whole document as an instance of `root_type`.
    ///
    /// The reader is positioned on the document element and the root plan
    /// runs from there; the root's own tag name is not checked.
    pub fn parse_document(&self, root_type: &str, xml: &str) -> Result<Record, ParseError> {
        self.plan(root_type)?;
        let mut reader = PullReader::new(xml);
        if !reader.next_tag()? {
            return Err(ParseError::UnexpectedEof {
                location: reader.location(),
            });
        }
        self.parse(root_type, &mut reader)
    }

    /// A freshly constructed instance: defaults applied, nested records
    /// built, lists and maps empty.
    pub fn instantiate(&self, type_name: &str) -> Result<Record, ParseError> {
        let plan = self.plan(type_name)?;
        let mut fields = IndexMap::with_capacity(plan.fields.len());
        for field in &plan.fields {
            fields.insert(field.name.clone(), self.initial_value(&field.shape)?);
        }
        Ok(Record::new(type_name, fields))
    }

    /// Parse the children of the element the reader is positioned on.
    pub fn parse(
        &self,
        type_name: &str,
        reader: &mut PullReader<'_>,
    ) -> Result<Record, ParseError> {
        self.parse_at(type_name, reader, 1)
    }

    fn parse_at(
        &self,
        type_name: &str,
        reader: &mut PullReader<'_>,
        depth: usize,
    ) -> Result<Record, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                location: reader.location(),
            });
        }
        let plan = self.plan(type_name)?;
        let mut record = self.instantiate(type_name)?;

        while reader.next_tag()? {
            let tag = reader.local_name();
            let Some(field) = plan.fields.iter().find(|f| f.name == tag) else {
                return Err(ParseError::UnexpectedTag {
                    tag: tag.to_string(),
                    location: reader.location(),
                });
            };
            let slot = record.slot(&field.name);
            match &field.shape {
                FieldShape::Scalar(Scalar::String(_)) => {
                    *slot = Value::String(reader.element_text()?);
                }
                FieldShape::Scalar(Scalar::Boolean(_)) => {
                    *slot = Value::Boolean(parse_boolean(&reader.element_text()?));
                }
                FieldShape::NestedRecord { type_name } => {
                    *slot = Value::Record(self.parse_at(type_name, reader, depth + 1)?);
                }
                FieldShape::ListOfStrings { item_tag } => {
                    let mut items = take_list(slot);
                    while reader.next_tag()? {
                        expect_tag(reader, item_tag)?;
                        items.push(Value::String(reader.element_text()?));
                    }
                    *slot = Value::List(items);
                }
                FieldShape::ListOfRecords {
                    item_tag,
                    item_type,
                } => {
                    let mut items = take_list(slot);
                    while reader.next_tag()? {
                        expect_tag(reader, item_tag)?;
                        let item = self.parse_at(item_type, reader, depth + 1)?;
                        items.push(Value::Record(item));
                    }
                    *slot = Value::List(items);
                }
                FieldShape::StringMap => {
                    let mut map = match std::mem::take(slot) {
                        Value::Map(map) => map,
                        _ => IndexMap::new(),
                    };
                    while reader.next_tag()? {
                        let key = reader.local_name().to_string();
                        map.insert(key, reader.element_text()?);
                    }
                    *slot = Value::Map(map);
                }
            }
        }
        Ok(record)
    }

    fn plan(&self, type_name: &str) -> Result<&'p ClassPlan, ParseError> {
        self.plans
            .get(type_name)
            .ok_or_else(|| ParseError::UnknownType(type_name.to_string()))
    }

    fn initial_value(&self, shape: &FieldShape) -> Result<Value, ParseError> {
        Ok(match shape {
            FieldShape::Scalar(Scalar::String(default)) => {
                default.clone().map(Value::String).unwrap_or_default()
            }
            FieldShape::Scalar(Scalar::Boolean(default)) => {
                Value::Boolean(default.unwrap_or(false))
            }
            FieldShape::NestedRecord { type_name } => Value::Record(self.instantiate(type_name)?),
            FieldShape::ListOfStrings { .. } | FieldShape::ListOfRecords { .. } => {
                Value::List(Vec::new())
            }
            FieldShape::StringMap => Value::Map(IndexMap::new()),
        })
    }
}

fn take_list(slot: &mut Value) -> Vec<Value> {
    match std::mem::take(slot) {
        Value::List(items) => items,
        _ => Vec::new(),
    }
}

fn expect_tag(reader: &PullReader<'_>, expected: &str) -> Result<(), ParseError> {
    if reader.local_name() == expected {
        Ok(())
    } else {
        Err(ParseError::ExpectedTag {
            expected: expected.to_string(),
            found: reader.local_name().to_string(),
            location: reader.location(),
        })
    }
}
