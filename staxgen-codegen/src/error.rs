//! Error types for code generation.

use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Result type for code generation.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Error type for code generation operations.
///
/// Spans point into the schema document; attach its source with
/// [`miette::Report::with_source_code`] when reporting.
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    /// A field declaration matches none of the supported shapes.
    #[error("unsupported field shape for '{field}' in type '{type_name}'")]
    #[diagnostic(
        code(staxgen::unsupported_field),
        help(
            "give the element a type (xs:string, xs:boolean or a complex type name) or an inline sequence of one repeated element or xs:any"
        )
    )]
    UnsupportedField {
        type_name: String,
        field: String,
        #[label("cannot classify this field")]
        span: Option<SourceSpan>,
    },

    /// A type or field name cannot be written into Java source.
    #[error("invalid {kind} name '{name}'")]
    #[diagnostic(
        code(staxgen::invalid_name),
        help("{reason}; rename the {kind} in the schema")
    )]
    InvalidName {
        name: String,
        kind: String,
        reason: String,
        #[label("declared here")]
        span: Option<SourceSpan>,
    },

    /// Two top-level types share a name.
    #[error("type '{name}' is declared more than once")]
    #[diagnostic(code(staxgen::duplicate_type))]
    DuplicateType {
        name: String,
        #[label("second declaration")]
        span: Option<SourceSpan>,
    },

    /// Record types that contain each other would be constructed forever.
    #[error("cyclic record reference: {cycle}")]
    #[diagnostic(
        code(staxgen::cyclic_reference),
        help("break the cycle with a repeated (list) field, which starts out empty")
    )]
    CyclicReference { cycle: String },

    /// Output could not be created or written.
    #[error("failed to write '{path}'")]
    #[diagnostic(code(staxgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
