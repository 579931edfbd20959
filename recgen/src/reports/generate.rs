//! Generate command report.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Files written by one generator run.
#[derive(Debug)]
pub struct GenerateReport {
    pub generator: String,
    /// Requested type names, as given.
    pub types: Vec<String>,
    /// Occurrences left out of the output, one message each.
    pub skipped: Vec<String>,
    pub written: Vec<PathBuf>,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        out.key_value("Generator", &self.generator);
        out.key_value("Types", &self.types.join(", "));
        for msg in &self.skipped {
            out.warning(msg);
        }
        out.section("Written");
        for path in &self.written {
            out.added_item(&path.display().to_string());
        }
    }
}
