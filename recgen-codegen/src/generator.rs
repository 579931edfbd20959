//! The contract between the session and pluggable generators.

use std::io;

use recgen_source::{FieldInfo, Package, RecordGenerics, RecordShape, SourceFile};

use crate::OutputSink;

/// A record handed to a generator.
///
/// Built fresh for every (file, record) occurrence and only valid for the
/// duration of the generator call.
#[derive(Debug, Clone, Copy)]
pub struct RecordInfo<'a> {
    package: &'a Package,
    file: &'a SourceFile,
    name: &'a str,
    shape: &'a RecordShape,
}

impl<'a> RecordInfo<'a> {
    pub fn new(
        package: &'a Package,
        file: &'a SourceFile,
        name: &'a str,
        shape: &'a RecordShape,
    ) -> Self {
        Self {
            package,
            file,
            name,
            shape,
        }
    }

    pub fn package(&self) -> &'a Package {
        self.package
    }

    /// The file the record was declared in.
    pub fn file(&self) -> &'a SourceFile {
        self.file
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &'a [FieldInfo] {
        &self.shape.fields
    }

    /// Inline modules enclosing the record, outermost first.
    pub fn module_path(&self) -> &'a [String] {
        &self.shape.module_path
    }

    pub fn generics(&self) -> &'a RecordGenerics {
        &self.shape.generics
    }

    /// Path of the record relative to its file (e.g., `inner::Point`).
    pub fn qualified_name(&self) -> String {
        self.shape.qualified_name(self.name)
    }
}

/// Emits source text for one record at a time.
///
/// Implementations must be deterministic for a given [`RecordInfo`] and
/// must not keep the record or the sink after returning.
pub trait RecordGenerator {
    /// Short name used in diagnostics (e.g., "getter").
    fn name(&self) -> &str;

    /// Write generated code for `record` into `sink`.
    fn generate(&self, record: &RecordInfo<'_>, sink: &mut OutputSink<'_>) -> io::Result<()>;
}

impl<F> RecordGenerator for F
where
    F: Fn(&RecordInfo<'_>, &mut OutputSink<'_>) -> io::Result<()>,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn generate(&self, record: &RecordInfo<'_>, sink: &mut OutputSink<'_>) -> io::Result<()> {
        self(record, sink)
    }
}
