//! Test utilities for generators and sessions.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{cell::RefCell, io, path::PathBuf, rc::Rc};

use crate::{OutputSink, RecordGenerator, RecordInfo};

/// One generator invocation as seen by [`RecordingGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub record: String,
    pub file: PathBuf,
    /// `(name, type)` pairs in declaration order.
    pub fields: Vec<(String, String)>,
}

/// Generator that records every call and writes a marker comment.
///
/// Clones share the same call log, so a clone can be handed to a session
/// while the test keeps the original for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingGenerator {
    calls: Rc<RefCell<Vec<RecordedCall>>>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Record names in call order.
    pub fn records(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.record.clone()).collect()
    }
}

impl RecordGenerator for RecordingGenerator {
    fn name(&self) -> &str {
        "recording"
    }

    fn generate(&self, record: &RecordInfo<'_>, sink: &mut OutputSink<'_>) -> io::Result<()> {
        let file = record.file().path().to_path_buf();
        sink.print(format_args!(
            "// {} from {}\n",
            record.qualified_name(),
            file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        ))?;
        self.calls.borrow_mut().push(RecordedCall {
            record: record.name().to_string(),
            file,
            fields: record
                .fields()
                .iter()
                .map(|f| (f.name.clone(), f.ty.clone()))
                .collect(),
        });
        Ok(())
    }
}

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_content_eq(expected: &str, actual: &str) {
    if expected != actual {
        let expected_lines: Vec<&str> = expected.lines().collect();
        let actual_lines: Vec<&str> = actual.lines().collect();

        let mut diff = String::new();
        let max_lines = expected_lines.len().max(actual_lines.len());

        for i in 0..max_lines {
            let exp = expected_lines.get(i).copied().unwrap_or("<missing>");
            let act = actual_lines.get(i).copied().unwrap_or("<missing>");

            if exp != act {
                diff.push_str(&format!("Line {}:\n", i + 1));
                diff.push_str(&format!("  expected: {}\n", exp));
                diff.push_str(&format!("  actual:   {}\n", act));
            }
        }

        panic!("Content mismatch:\n{}", diff);
    }
}
