use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use recgen_source::{Config, Extractor, Package};

use super::UnwrapOrExit;
use crate::reports::{ListReport, RecordEntry, Report, SkippedEntry, TerminalOutput};

#[derive(Args)]
pub struct ListCommand {
    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to recgen.toml (defaults to the one next to the sources)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source directory, or source files from one directory
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,
}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let package = Package::load(self.paths.as_slice()).unwrap_or_exit();
        let config = match &self.config {
            Some(path) => Some(Config::from_file(path).unwrap_or_exit()),
            None => Config::discover(package.dir()).unwrap_or_exit(),
        }
        .unwrap_or_default();

        let extractor = match config.tag_attribute {
            Some(attr) => Extractor::new(attr),
            None => Extractor::default(),
        };
        let report = build_report(&package, &extractor);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}

fn build_report(package: &Package, extractor: &Extractor) -> ListReport {
    let mut report = ListReport {
        package: package.name().to_string(),
        dir: package.dir().to_path_buf(),
        records: Vec::new(),
        skipped: Vec::new(),
    };

    for file in package.files() {
        let extraction = extractor.extract(file.syntax());
        for (name, shape) in extraction.records {
            report.records.push(RecordEntry {
                name,
                file: file.path().to_path_buf(),
                module_path: shape.module_path,
                generics: shape.generics,
                fields: shape.fields,
            });
        }
        for skipped in extraction.skipped {
            report.skipped.push(SkippedEntry {
                name: skipped.name,
                file: file.path().to_path_buf(),
                field: skipped.field,
                reason: skipped.error.to_string(),
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_records_per_file() {
        let package = Package::from_sources(
            "model",
            "src/model",
            [
                ("a.rs", "pub struct User { #[tag = \"json:\\\"id\\\"\"] id: u64 }"),
                ("b.rs", "mod inner { struct Point { x: i32 } }\nstruct Bad { m: m!() }"),
            ],
        )
        .unwrap();

        let report = build_report(&package, &Extractor::default());
        let names: Vec<_> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["User", "Point"]);
        assert_eq!(report.records[1].module_path, ["inner"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].field, "m");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"][0]["fields"][0]["type"], "u64");
        assert_eq!(json["records"][0]["fields"][0]["tags"][0]["key"], "json");
        assert_eq!(json["records"][0]["fields"][0]["tags"][0]["name"], "id");
    }
}
