//! List command report.

use std::path::PathBuf;

use recgen_source::{FieldInfo, RecordGenerics};
use serde::Serialize;

use super::output::{Output, Report};

/// Every record found in a package.
#[derive(Debug, Serialize)]
pub struct ListReport {
    pub package: String,
    pub dir: PathBuf,
    pub records: Vec<RecordEntry>,
    pub skipped: Vec<SkippedEntry>,
}

/// One record occurrence.
#[derive(Debug, Serialize)]
pub struct RecordEntry {
    pub name: String,
    pub file: PathBuf,
    pub module_path: Vec<String>,
    pub generics: RecordGenerics,
    pub fields: Vec<FieldInfo>,
}

/// A record that could not be extracted.
#[derive(Debug, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub file: PathBuf,
    pub field: String,
    pub reason: String,
}

impl RecordEntry {
    fn heading(&self) -> String {
        let mut path = self.module_path.join("::");
        if !path.is_empty() {
            path.push_str("::");
        }
        format!(
            "{}{}{} ({})",
            path,
            self.name,
            self.generics.impl_params,
            self.file.display()
        )
    }
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        out.key_value("Package", &format!("{} ({})", self.package, self.dir.display()));
        out.newline();

        if self.records.is_empty() {
            out.key_value("Records", "none");
        } else {
            out.section("Records");
            for record in &self.records {
                out.list_item(&record.heading());
                for field in &record.fields {
                    let line = match &field.tags {
                        Some(tags) => format!("{}: {} `{}`", field.name, field.ty, tags),
                        None => format!("{}: {}", field.name, field.ty),
                    };
                    out.sub_item(&line);
                }
            }
        }

        for skipped in &self.skipped {
            out.warning(&format!(
                "skipped {} in {}: field '{}': {}",
                skipped.name,
                skipped.file.display(),
                skipped.field,
                skipped.reason
            ));
        }
    }
}
