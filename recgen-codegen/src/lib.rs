//! Generation side of recgen.
//!
//! A [`GenerationSession`] walks every file of a [`recgen_source::Package`],
//! hands each requested record to a [`RecordGenerator`], accumulates the
//! emitted text per record and finally formats and writes one output file
//! per record.
//!
//! # Module Organization
//!
//! - [`emit`] - Formatting and output path derivation
//! - [`testing`] - Test utilities (feature-gated)

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod code_builder;
pub mod emit;
mod error;
mod generator;
mod session;
mod sink;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use code_builder::{CodeBuilder, Indent};
pub use error::{Error, Result};
pub use generator::{RecordGenerator, RecordInfo};
pub use session::{GenerateReport, GenerationSession, RunReport, SessionConfig, SkippedOccurrence};
pub use sink::OutputSink;
