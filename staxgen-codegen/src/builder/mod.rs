//! Text building blocks for the emission backend.
//!
//! - [`CodeBuilder`] - indentation-aware line buffer with block primitives
//! - [`Indent`] - indentation configuration

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
