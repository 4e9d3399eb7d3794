//! Schema model and XML Schema reader for staxgen.
//!
//! The [`Schema`] model is what the code generator consumes. It is normally
//! produced from an `.xsd` document by [`parse_str`] or [`SchemaFile::open`],
//! which understand the subset of XML Schema that maps onto generated
//! parser classes: named complex types holding an `xs:all` or `xs:sequence`
//! of string, boolean, record-typed and repeated elements.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod file;
mod model;
mod xml;
mod xsd;

pub use error::{Error, Result, SourceContext};
pub use file::SchemaFile;
pub use model::{FieldDecl, ItemType, RecordTypeDecl, RepeatedSpec, ScalarType, Schema};
pub use xsd::XS;

/// Parse schema source text. `filename` is only used in diagnostics.
pub fn parse_str(src: &str, filename: &str) -> Result<Schema> {
    xsd::read_schema(&SourceContext::new(src, filename))
}
