//! Compiles schema record types into StAX pull-parser classes.
//!
//! # Module Organization
//!
//! - [`shape`] - field classification
//! - [`plan`] - classified per-class plans and whole-schema validation
//! - [`emitter`] - Java emission primitives
//! - [`compiler`] - type compiler and generation driver
//! - [`sink`] - output routing (stream, directory, memory)
//! - [`runtime`] - executes plans against sample documents
//! - [`builder`] - indentation-aware text buffer

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod builder;
pub mod compiler;
pub mod emitter;
mod error;
pub mod naming;
mod options;
pub mod plan;
pub mod runtime;
pub mod shape;
pub mod sink;

pub use compiler::{GenerateResult, Generator, TypeCompiler, java_type};
pub use emitter::Emitter;
pub use error::{CodegenError, Result};
pub use options::{AccessMode, EmitOptions, GenerationMode};
pub use plan::{ClassPlan, FieldPlan, PlanSet};
pub use runtime::{ParseError, Record, Runtime, Value};
pub use shape::{FieldShape, Scalar, classify};
pub use sink::{ClassSink, DirectorySink, GeneratedClass, MemorySink, StreamSink};
