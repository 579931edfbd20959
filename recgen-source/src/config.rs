//! Optional `recgen.toml` project configuration.

use std::{path::Path, str::FromStr};

use serde::Deserialize;

use crate::{Error, Result};

/// File name looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = "recgen.toml";

/// Project-level defaults. Command line flags take precedence.
///
/// ```toml
/// format = true
/// tag_attribute = "tag"
///
/// [getter]
/// suffix = "getter"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Run generated code through the formatter.
    pub format: Option<bool>,

    /// Field attribute carrying tag text.
    pub tag_attribute: Option<String>,

    #[serde(default)]
    pub getter: GeneratorConfig,

    #[serde(default)]
    pub setter: GeneratorConfig,

    #[serde(default)]
    pub accessors: GeneratorConfig,
}

/// Settings for one generator.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output file suffix (`<type>_<suffix>.rs`).
    pub suffix: Option<String>,
}

impl FromStr for Config {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, CONFIG_FILE_NAME)
    }
}

impl Config {
    /// Parse a config file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Load `recgen.toml` from `dir` if it exists.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!(path = %path.display(), "using config file");
        Self::from_file(&path).map(Some)
    }

    /// Parse config content with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::config(e, content, filename))?;
        config.validate(filename)?;
        Ok(config)
    }

    /// Settings for the generator called `name`, if it is a known one.
    pub fn generator(&self, name: &str) -> Option<&GeneratorConfig> {
        match name {
            "getter" => Some(&self.getter),
            "setter" => Some(&self.setter),
            "accessors" => Some(&self.accessors),
            _ => None,
        }
    }

    fn validate(&self, filename: &str) -> Result<()> {
        let invalid = |message: String| {
            Box::new(Error::InvalidConfig {
                filename: filename.to_string(),
                message,
            })
        };

        if let Some(attr) = &self.tag_attribute
            && syn::parse_str::<syn::Ident>(attr).is_err()
        {
            return Err(invalid(format!(
                "tag_attribute '{attr}' is not a valid attribute name"
            )));
        }

        for (section, generator) in [
            ("getter", &self.getter),
            ("setter", &self.setter),
            ("accessors", &self.accessors),
        ] {
            if let Some(suffix) = &generator.suffix
                && !is_valid_suffix(suffix)
            {
                return Err(invalid(format!(
                    "[{section}] suffix '{suffix}' must be non-empty and contain only letters, digits, '_' or '-'"
                )));
            }
        }

        Ok(())
    }
}

/// Returns true if `suffix` is safe to embed in a file name.
pub fn is_valid_suffix(suffix: &str) -> bool {
    !suffix.is_empty()
        && suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
