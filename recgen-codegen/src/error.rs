use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for generation and write-out.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("type '{type_name}' was not found in package '{package}'")]
    #[diagnostic(code(recgen::type_not_found))]
    TypeNotFound {
        type_name: String,
        package: String,
        #[help]
        help: Option<String>,
    },

    #[error("generator '{generator}' failed while generating '{type_name}'")]
    #[diagnostic(code(recgen::generator_error))]
    Generator {
        generator: String,
        type_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to format generated code for '{type_name}'")]
    #[diagnostic(
        code(recgen::format_error),
        help("the generator produced text that is not a valid Rust file; rerun with --no-format to inspect it")
    )]
    Format {
        type_name: String,
        #[source]
        source: syn::Error,
    },

    #[error("generated code for '{type_name}' is not valid UTF-8")]
    #[diagnostic(code(recgen::format_error))]
    InvalidUtf8 {
        type_name: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("failed to write '{path}'")]
    #[diagnostic(code(recgen::write_error))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
