use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use recgen_accessors::{AccessorKind, generator_for};
use recgen_codegen::{GenerationSession, SessionConfig};
use recgen_source::{Config, DEFAULT_TAG_ATTRIBUTE, Package};

use super::UnwrapOrExit;
use crate::reports::{GenerateReport, Report, TerminalOutput};

#[derive(Args)]
pub struct GenerateCommand {
    /// Struct names to generate for, comma separated
    #[arg(short = 't', long = "type", required = true, value_delimiter = ',')]
    pub types: Vec<String>,

    /// Output file (defaults to <dir>/<type>_<suffix>.rs)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write generated code without formatting it
    #[arg(long)]
    pub no_format: bool,

    /// Path to recgen.toml (defaults to the one next to the sources)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source directory, or source files from one directory
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,
}

impl GenerateCommand {
    pub fn run(&self, kind: AccessorKind) -> Result<()> {
        let package = Package::load(self.paths.as_slice()).unwrap_or_exit();
        let config = match &self.config {
            Some(path) => Some(Config::from_file(path).unwrap_or_exit()),
            None => Config::discover(package.dir()).unwrap_or_exit(),
        }
        .unwrap_or_default();

        let session_config = self.session_config(kind, &config);
        tracing::info!(
            package = package.name(),
            files = package.files().len(),
            generator = kind.name(),
            "generating"
        );

        let mut session =
            GenerationSession::from_boxed(package, session_config, generator_for(kind));
        let run = session.run(self.types.as_slice()).unwrap_or_exit();

        GenerateReport {
            generator: kind.name().to_string(),
            types: self.types.clone(),
            skipped: run
                .skipped()
                .map(|s| {
                    format!(
                        "{} in {} was skipped: field '{}': {}",
                        s.record.name,
                        s.file.display(),
                        s.record.field,
                        s.record.error
                    )
                })
                .collect(),
            written: run.written,
        }
        .render(&mut TerminalOutput::new());
        Ok(())
    }

    /// Merge flags over `recgen.toml` values.
    fn session_config(&self, kind: AccessorKind, config: &Config) -> SessionConfig {
        let suffix = config
            .generator(kind.name())
            .and_then(|g| g.suffix.clone())
            .unwrap_or_else(|| kind.name().to_string());
        let tag_attribute = config
            .tag_attribute
            .clone()
            .unwrap_or_else(|| DEFAULT_TAG_ATTRIBUTE.to_string());

        SessionConfig::new("recgen", suffix)
            .with_format(!self.no_format && config.format.unwrap_or(true))
            .with_output(self.output.clone())
            .with_tag_attribute(tag_attribute)
    }
}
