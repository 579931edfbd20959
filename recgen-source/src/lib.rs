//! Source side of recgen: loading a package of Rust files, discovering
//! record structs and recovering their fields, rendered types and tags.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod extract;
mod package;
mod render;
mod tag;

pub use config::{CONFIG_FILE_NAME, Config, GeneratorConfig, is_valid_suffix};
pub use error::{Error, Result};
pub use extract::{
    DEFAULT_TAG_ATTRIBUTE, Extraction, Extractor, FieldInfo, RecordShape, SkippedRecord,
};
pub use package::{Definition, DefinitionKind, Package, SourceFile};
pub use render::{RecordGenerics, RenderError, generics_to_strings, type_to_string};
pub use tag::{Tag, TagError, Tags};
