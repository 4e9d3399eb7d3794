use std::path::{Path, PathBuf};

use crate::{
    Result, Schema,
    error::{Error, SourceContext},
    xsd::read_schema,
};

/// A schema file loaded from disk, with its source kept for diagnostics.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    path: PathBuf,
    source: SourceContext,
    schema: Schema,
}

impl SchemaFile {
    /// Read and parse an XML Schema file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let source = SourceContext::new(content, path.display().to_string());
        let schema = read_schema(&source)?;

        Ok(Self {
            path,
            source,
            schema,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the source text and display name.
    pub fn source(&self) -> &SourceContext {
        &self.source
    }

    /// Get the parsed schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}
