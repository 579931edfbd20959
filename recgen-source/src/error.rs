use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for source loading (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(recgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{filename}'")]
    #[diagnostic(code(recgen::parse_error))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: syn::Error,
    },

    #[error("no Rust source files found in '{path}'")]
    #[diagnostic(
        code(recgen::no_sources),
        help("pass a directory containing .rs files, or the files themselves")
    )]
    NoSources { path: PathBuf },

    #[error("source files come from {count} different directories")]
    #[diagnostic(
        code(recgen::multiple_packages),
        help("all files must belong to a single package: {dirs}")
    )]
    MultiplePackages { count: usize, dirs: String },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(recgen::config_error))]
    Config {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value in {filename}: {message}")]
    #[diagnostic(code(recgen::invalid_config))]
    InvalidConfig { filename: String, message: String },
}

impl Error {
    /// Create a parse error from a syn error, locating its span in `src`
    pub fn parse(source: syn::Error, src: &str, filename: &str) -> Box<Self> {
        let start = source.span().start();
        let span = byte_offset(src, start.line, start.column).map(|offset| {
            let len = src[offset..].chars().next().map_or(0, char::len_utf8);
            SourceSpan::from((offset, len))
        });
        Box::new(Error::Parse {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create a config error from a toml error with source context
    pub fn config(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Config {
            filename: filename.to_string(),
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create an IO error for `path`
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }
}

/// Convert a 1-based line and 0-based character column into a byte offset.
fn byte_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let rest = src.get(line_start..)?;
    let offset = rest
        .char_indices()
        .nth(column)
        .map_or(rest.len(), |(i, _)| i);
    Some(line_start + offset)
}
