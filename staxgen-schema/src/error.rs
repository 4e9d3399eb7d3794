use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for schema reading (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the schema text and its display name so that every error the
/// reader produces can point back into the document.
///
/// # Example
///
/// ```ignore
/// let ctx = SourceContext::new(content, "orders.xsd");
/// ctx.unsupported("xs:choice", "complex type 'Order'", span);
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create an XML syntax error at the given byte offset.
    pub fn xml_error(&self, message: impl Into<String>, offset: usize) -> Box<Error> {
        Box::new(Error::Xml {
            src: self.named_source(),
            span: Some(SourceSpan::from(offset.min(self.src.len()))),
            message: message.into(),
        })
    }

    /// Create an invalid structure error.
    pub fn structure_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidStructure {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    /// Create an unsupported construct error.
    pub fn unsupported(
        &self,
        construct: impl Into<String>,
        context: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::UnsupportedConstruct {
            src: self.named_source(),
            span: span.into(),
            construct: construct.into(),
            context: context.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(staxgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML: {message}")]
    #[diagnostic(code(staxgen::xml))]
    Xml {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("{message}")]
    #[diagnostic(code(staxgen::invalid_schema))]
    InvalidStructure {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("unsupported schema construct {construct} in {context}")]
    #[diagnostic(
        code(staxgen::unsupported_construct),
        help(
            "complex types may only contain an xs:all or xs:sequence of elements typed xs:string, xs:boolean, a named complex type, or a single-child repeated sequence"
        )
    )]
    UnsupportedConstruct {
        #[source_code]
        src: NamedSource<String>,
        #[label("not supported")]
        span: SourceSpan,
        construct: String,
        context: String,
    },
}

impl Error {
    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }
}
