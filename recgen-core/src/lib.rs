//! Core utilities and types for the recgen source generator.
//!
//! This crate provides the file writing policy and naming helpers shared
//! by the rest of the workspace.

mod file;
mod utils;

// File operations
pub use file::File;
// String utilities
pub use utils::{output_file_name, to_snake_case};
