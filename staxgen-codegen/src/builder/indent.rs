//! Indentation unit for generated source.

use serde::{Deserialize, Deserializer, de};

const SPACES: &str = "        ";

/// One level of indentation: a run of 1 to 8 spaces, or a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(u8),
    Tab,
}

impl Indent {
    /// Four spaces, the conventional Java layout.
    pub const JAVA: Self = Self::Spaces(4);

    /// Text written once per level. Widths are clamped to `1..=8`.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Spaces(width) => &SPACES[..usize::from(width.clamp(1, 8))],
            Self::Tab => "\t",
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::JAVA
    }
}

/// Accepts a width (`indent = 2`) or the string `"tab"`.
impl<'de> Deserialize<'de> for Indent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Width(u8),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Width(width @ 1..=8) => Ok(Self::Spaces(width)),
            Raw::Width(width) => Err(de::Error::custom(format!(
                "indent width must be between 1 and 8, got {width}"
            ))),
            Raw::Name(name) if name == "tab" => Ok(Self::Tab),
            Raw::Name(name) => Err(de::Error::custom(format!(
                "expected an indent width or \"tab\", got \"{name}\""
            ))),
        }
    }
}
