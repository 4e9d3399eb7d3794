//! Run-wide generation settings.

use serde::Deserialize;

use crate::builder::Indent;

/// How generated classes parse themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// `public T(XMLStreamReader xml)` fills `this` in place.
    #[default]
    Constructor,
    /// `public static T parseT(XMLStreamReader xml)` returns a new instance.
    StaticMethod,
}

/// How generated code reads and writes fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    /// `obj.name = value`
    #[default]
    Field,
    /// `obj.setName(value)` / `obj.getName()`
    Accessor,
}

/// Settings fixed for a whole run.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub generation: GenerationMode,
    pub access: AccessMode,
    /// Dotted package name; adds a `package` line and nests output files.
    pub package: Option<String>,
    pub indent: Indent,
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generation(mut self, generation: GenerationMode) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_access(mut self, access: AccessMode) -> Self {
        self.access = access;
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Modes {
        generation: GenerationMode,
        access: AccessMode,
    }

    #[test]
    fn test_modes_deserialize_from_kebab_case() {
        let modes: Modes =
            serde_json::from_str(r#"{"generation":"static-method","access":"accessor"}"#).unwrap();
        assert_eq!(modes.generation, GenerationMode::StaticMethod);
        assert_eq!(modes.access, AccessMode::Accessor);
    }

    #[test]
    fn test_defaults() {
        let opts = EmitOptions::new();
        assert_eq!(opts.generation, GenerationMode::Constructor);
        assert_eq!(opts.access, AccessMode::Field);
        assert!(opts.package.is_none());
        assert_eq!(opts.indent, Indent::JAVA);
    }
}
