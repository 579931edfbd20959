//! Output formatting and file layout.

use std::path::{Path, PathBuf};

use recgen_core::output_file_name;

use crate::{Error, Result};

/// Reformat generated Rust source with `prettyplease`.
///
/// The parser discards plain `//` comments, so a leading block of them
/// (e.g., a "do not edit" header) is carried over verbatim. Plain
/// comments after the first item are not preserved; use doc comments.
pub fn format_source(type_name: &str, src: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(src).map_err(|source| Error::InvalidUtf8 {
        type_name: type_name.to_string(),
        source,
    })?;
    let file = syn::parse_file(text).map_err(|source| Error::Format {
        type_name: type_name.to_string(),
        source,
    })?;

    let body = prettyplease::unparse(&file);
    let mut out = String::with_capacity(text.len());
    let header = leading_comments(text).trim();
    if !header.is_empty() {
        for line in header.lines() {
            out.push_str(line.trim());
            out.push('\n');
        }
        if !body.is_empty() {
            out.push('\n');
        }
    }
    out.push_str(&body);
    Ok(out.into_bytes())
}

/// The run of blank lines and plain `//` comments at the start of `text`.
/// Doc comments (`///`, `//!`) belong to the syntax tree and end the run.
fn leading_comments(text: &str) -> &str {
    let mut end = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        let is_doc = trimmed.starts_with("///") || trimmed.starts_with("//!");
        if trimmed.is_empty() || (trimmed.starts_with("//") && !is_doc) {
            end += line.len();
        } else {
            break;
        }
    }
    &text[..end]
}

/// Where the output for `type_name` goes.
///
/// An explicit `output` wins; otherwise the file is placed in `dir` and
/// named `<snake_case type>_<suffix>.rs`.
pub fn output_path(output: Option<&Path>, dir: &Path, type_name: &str, suffix: &str) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => dir.join(output_file_name(type_name, suffix)),
    }
}
