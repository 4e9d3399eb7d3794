//! Optional `staxgen.toml` run configuration.

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::Deserialize;
use staxgen_codegen::{AccessMode, GenerationMode, builder::Indent};

/// Contents of a configuration file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OutputConfig {
    /// Directory for class files; standard output when unset.
    pub dir: Option<PathBuf>,
    /// Dotted package name.
    pub package: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GenerateConfig {
    pub mode: Option<GenerationMode>,
    pub access: Option<AccessMode>,
    /// Spaces per level, or `"tab"`.
    pub indent: Option<Indent>,
}

impl Config {
    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).wrap_err_with(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
