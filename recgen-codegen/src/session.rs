//! Per-type dispatch and buffered output.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use recgen_core::File;
use recgen_source::{DEFAULT_TAG_ATTRIBUTE, DefinitionKind, Extractor, Package, SkippedRecord};

use crate::{
    Error, OutputSink, RecordGenerator, RecordInfo, Result,
    emit::{format_source, output_path},
};

/// Settings for one generation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Tool name used in log output.
    pub tool_name: String,
    /// Output file suffix (`<type>_<suffix>.rs`).
    pub file_suffix: String,
    /// Run output through the formatter before writing.
    pub format: bool,
    /// Explicit output path overriding the derived one.
    pub output: Option<PathBuf>,
    /// Field attribute carrying tag text.
    pub tag_attribute: String,
}

impl SessionConfig {
    pub fn new(tool_name: impl Into<String>, file_suffix: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            file_suffix: file_suffix.into(),
            format: true,
            output: None,
            tag_attribute: DEFAULT_TAG_ATTRIBUTE.to_string(),
        }
    }

    pub fn with_format(mut self, format: bool) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_tag_attribute(mut self, tag_attribute: impl Into<String>) -> Self {
        self.tag_attribute = tag_attribute.into();
        self
    }
}

/// A record abandoned in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOccurrence {
    pub file: PathBuf,
    pub record: SkippedRecord,
}

/// What happened while generating one type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub type_name: String,
    /// Number of (file, record) occurrences dispatched to the generator.
    pub occurrences: usize,
    /// Occurrences of the type that could not be extracted.
    pub skipped: Vec<SkippedOccurrence>,
    /// The type had already been generated earlier in this session.
    pub already_generated: bool,
}

/// Outcome of [`GenerationSession::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One report per distinct requested type, in request order.
    pub reports: Vec<GenerateReport>,
    /// Files written, in request order.
    pub written: Vec<PathBuf>,
}

impl RunReport {
    /// Every skipped occurrence across all requested types.
    pub fn skipped(&self) -> impl Iterator<Item = &SkippedOccurrence> {
        self.reports.iter().flat_map(|r| r.skipped.iter())
    }
}

/// Drives a generator over a package and writes the results.
///
/// Only records whose name was requested are dispatched, and each name is
/// generated at most once per session. A record declared in several files
/// is dispatched once per file and its output accumulates in file order.
pub struct GenerationSession {
    package: Package,
    config: SessionConfig,
    generator: Box<dyn RecordGenerator>,
    extractor: Extractor,
    buffers: IndexMap<String, Vec<u8>>,
    visited: IndexSet<String>,
    skipped: Vec<SkippedOccurrence>,
}

impl GenerationSession {
    pub fn new(
        package: Package,
        config: SessionConfig,
        generator: impl RecordGenerator + 'static,
    ) -> Self {
        Self::from_boxed(package, config, Box::new(generator))
    }

    /// Like [`GenerationSession::new`] for a generator chosen at runtime.
    pub fn from_boxed(
        package: Package,
        config: SessionConfig,
        generator: Box<dyn RecordGenerator>,
    ) -> Self {
        let extractor = Extractor::new(config.tag_attribute.clone());
        Self {
            package,
            config,
            generator,
            extractor,
            buffers: IndexMap::new(),
            visited: IndexSet::new(),
            skipped: Vec::new(),
        }
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Accumulated output for `type_name`, if it was encountered.
    pub fn buffer(&self, type_name: &str) -> Option<&[u8]> {
        self.buffers.get(type_name).map(Vec::as_slice)
    }

    /// Run the generator for every occurrence of `type_name`.
    pub fn generate(&mut self, type_name: &str) -> Result<GenerateReport> {
        let mut report = GenerateReport {
            type_name: type_name.to_string(),
            ..Default::default()
        };

        if self.visited.contains(type_name) {
            tracing::debug!(type_name, "already generated");
            report.already_generated = true;
            return Ok(report);
        }

        for file in self.package.files() {
            let extraction = self.extractor.extract(file.syntax());

            for record in extraction.skipped {
                if record.name == type_name {
                    report.skipped.push(SkippedOccurrence {
                        file: file.path().to_path_buf(),
                        record,
                    });
                }
            }

            let Some((name, shape)) = extraction.records.get_key_value(type_name) else {
                continue;
            };

            tracing::debug!(
                tool = %self.config.tool_name,
                generator = self.generator.name(),
                record = %name,
                file = %file.path().display(),
                "dispatching record"
            );
            let record = RecordInfo::new(&self.package, file, name, shape);
            let buf = self.buffers.entry(name.clone()).or_default();
            let mut sink = OutputSink::new(name, buf);
            if let Err(source) = self.generator.generate(&record, &mut sink) {
                // Drop partial output so a failed type is never written.
                self.buffers.shift_remove(type_name);
                return Err(Error::Generator {
                    generator: self.generator.name().to_string(),
                    type_name: type_name.to_string(),
                    source,
                });
            }
            report.occurrences += 1;
        }

        self.visited.insert(type_name.to_string());
        self.skipped.extend(report.skipped.iter().cloned());
        Ok(report)
    }

    /// Path the output for `type_name` is written to.
    pub fn output_path(&self, type_name: &str) -> PathBuf {
        output_path(
            self.config.output.as_deref(),
            self.package.dir(),
            type_name,
            &self.config.file_suffix,
        )
    }

    /// Format (if enabled) and persist the buffer for `type_name`.
    pub fn write_out(&self, type_name: &str) -> Result<PathBuf> {
        let buf = self
            .buffers
            .get(type_name)
            .ok_or_else(|| self.type_not_found(type_name))?;

        let content = if self.config.format {
            format_source(type_name, buf)?
        } else {
            buf.clone()
        };

        let path = self.output_path(type_name);
        File::new(&path, content)
            .write()
            .map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Generate every requested type, then write each one out.
    ///
    /// Nothing is written unless every requested type was found.
    pub fn run<S: AsRef<str>>(&mut self, type_names: &[S]) -> Result<RunReport> {
        let type_names: IndexSet<&str> = type_names.iter().map(AsRef::as_ref).collect();

        let reports = type_names
            .iter()
            .map(|type_name| self.generate(type_name))
            .collect::<Result<Vec<_>>>()?;

        if let Some(missing) = type_names
            .iter()
            .find(|name| !self.buffers.contains_key(**name))
        {
            return Err(self.type_not_found(missing));
        }

        if self.config.output.is_some() && type_names.len() > 1 {
            tracing::warn!(
                path = %self.output_path(type_names[0]).display(),
                "explicit output path shared by {} types, later types overwrite earlier ones",
                type_names.len()
            );
        }

        let written = type_names
            .iter()
            .map(|type_name| self.write_out(type_name))
            .collect::<Result<Vec<_>>>()?;
        Ok(RunReport { reports, written })
    }

    fn type_not_found(&self, type_name: &str) -> Error {
        let skipped = self.skipped.iter().find(|s| s.record.name == type_name);
        let help = if let Some(skipped) = skipped {
            Some(format!(
                "'{type_name}' was skipped in {}: field '{}': {}",
                display_path(&skipped.file),
                skipped.record.field,
                skipped.record.error
            ))
        } else {
            match self.package.definition(type_name) {
                Some(def) if def.kind != DefinitionKind::Record => {
                    let kind = def.kind.to_string();
                    let article = if kind.starts_with(['a', 'e', 'i', 'o', 'u']) {
                        "an"
                    } else {
                        "a"
                    };
                    Some(format!(
                        "'{type_name}' in {} is {article} {kind}, not a struct with named fields",
                        display_path(self.package.files()[def.file].path()),
                    ))
                }
                Some(_) => None,
                None => Some(
                    "type names are case-sensitive; run `recgen list` to see the records in the package"
                        .to_string(),
                ),
            }
        };

        Error::TypeNotFound {
            type_name: type_name.to_string(),
            package: self.package.name().to_string(),
            help,
        }
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use std::{fs, io};

    use tempfile::TempDir;

    use super::*;
    use crate::testing::{RecordingGenerator, assert_content_eq};

    fn package(sources: &[(&str, &str)]) -> Package {
        Package::from_sources("model", "src/model", sources.iter().copied()).unwrap()
    }

    fn closure<F>(f: F) -> F
    where
        F: Fn(&RecordInfo<'_>, &mut OutputSink<'_>) -> io::Result<()>,
    {
        f
    }

    fn recording_session(sources: &[(&str, &str)]) -> (GenerationSession, RecordingGenerator) {
        let recorder = RecordingGenerator::new();
        let session = GenerationSession::new(
            package(sources),
            SessionConfig::new("test", "rec").with_format(false),
            recorder.clone(),
        );
        (session, recorder)
    }

    #[test]
    fn test_record_in_two_files_accumulates_in_file_order() {
        let (mut session, recorder) = recording_session(&[
            ("a.rs", "pub struct User { id: u64 }"),
            ("b.rs", "pub struct User { name: String }\npub struct Other { x: u8 }"),
        ]);

        let report = session.generate("User").unwrap();
        assert_eq!(report.occurrences, 2);
        assert!(!report.already_generated);
        assert_eq!(recorder.records(), ["User", "User"]);

        let calls = recorder.calls();
        assert_eq!(calls[0].file, Path::new("a.rs"));
        assert_eq!(calls[0].fields, [("id".to_string(), "u64".to_string())]);
        assert_eq!(calls[1].file, Path::new("b.rs"));

        let buf = std::str::from_utf8(session.buffer("User").unwrap()).unwrap();
        assert_content_eq("// User from a.rs\n// User from b.rs\n", buf);
    }

    #[test]
    fn test_only_requested_type_is_dispatched() {
        let (mut session, recorder) = recording_session(&[(
            "a.rs",
            "pub struct User { id: u64 }\npub struct Other { x: u8 }",
        )]);

        session.generate("Other").unwrap();
        assert_eq!(recorder.records(), ["Other"]);
        assert!(session.buffer("User").is_none());
    }

    #[test]
    fn test_repeated_request_generates_once() {
        let (mut session, recorder) = recording_session(&[("a.rs", "struct User { id: u64 }")]);

        session.generate("User").unwrap();
        let second = session.generate("User").unwrap();
        assert!(second.already_generated);
        assert_eq!(second.occurrences, 0);
        assert_eq!(recorder.calls().len(), 1);
    }

    #[test]
    fn test_unit_struct_gets_a_buffer() {
        let (mut session, _) = recording_session(&[("a.rs", "pub struct Marker;")]);
        session.generate("Marker").unwrap();
        assert!(session.buffer("Marker").is_some());
    }

    #[test]
    fn test_record_in_inline_module() {
        let (mut session, _) =
            recording_session(&[("a.rs", "mod inner { pub struct Point { x: i32 } }")]);
        session.generate("Point").unwrap();
        assert_eq!(
            session.buffer("Point").unwrap(),
            b"// inner::Point from a.rs\n"
        );
    }

    #[test]
    fn test_missing_type_is_reported() {
        let (mut session, _) = recording_session(&[("a.rs", "struct User { id: u64 }")]);

        match session.run(&["user"]).unwrap_err() {
            Error::TypeNotFound {
                type_name,
                package,
                help,
            } => {
                assert_eq!(type_name, "user");
                assert_eq!(package, "model");
                assert!(help.unwrap().contains("case-sensitive"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_record_type_is_reported_with_its_kind() {
        let (mut session, recorder) = recording_session(&[("a.rs", "enum Role { Admin }")]);

        let err = session.run(&["Role"]).unwrap_err();
        assert!(recorder.calls().is_empty());
        match err {
            Error::TypeNotFound { help, .. } => {
                assert_eq!(
                    help.as_deref(),
                    Some("'Role' in a.rs is an enum, not a struct with named fields")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_skipped_record_is_reported() {
        let (mut session, recorder) =
            recording_session(&[("a.rs", "struct Bad { a: u8, b: m!() }")]);

        let report = session.generate("Bad").unwrap();
        assert_eq!(report.occurrences, 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].record.field, "b");
        assert!(recorder.calls().is_empty());

        match session.run(&["Bad"]).unwrap_err() {
            Error::TypeNotFound { help, .. } => {
                assert!(help.unwrap().starts_with("'Bad' was skipped in a.rs: field 'b'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_formats_and_writes() {
        let temp = TempDir::new().unwrap();
        let package = Package::from_sources(
            "model",
            temp.path(),
            [("user.rs", "pub struct UserProfile { id: u64 }")],
        )
        .unwrap();
        let generator = closure(|record, sink| {
            let field = &record.fields()[0];
            sink.print(format_args!(
                "impl {}{{pub fn {}(&self)->&{}{{&self.{}}}}}",
                record.name(),
                field.name,
                field.ty,
                field.name
            ))
        });
        let mut session =
            GenerationSession::new(package, SessionConfig::new("test", "getter"), generator);

        let paths = session.run(&["UserProfile"]).unwrap().written;
        let expected_path = temp.path().join("user_profile_getter.rs");
        assert_eq!(paths, [expected_path.clone()]);
        assert_content_eq(
            "impl UserProfile {\n    pub fn id(&self) -> &u64 {\n        &self.id\n    }\n}\n",
            &fs::read_to_string(expected_path).unwrap(),
        );
    }

    #[test]
    fn test_nothing_written_when_any_type_is_missing() {
        let temp = TempDir::new().unwrap();
        let package =
            Package::from_sources("model", temp.path(), [("a.rs", "struct User { id: u64 }")])
                .unwrap();
        let mut session = GenerationSession::new(
            package,
            SessionConfig::new("test", "getter").with_format(false),
            RecordingGenerator::new(),
        );

        assert!(session.run(&["User", "Missing"]).is_err());
        assert!(!temp.path().join("user_getter.rs").exists());
    }

    #[test]
    fn test_explicit_output_path() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out").join("custom.rs");
        let package =
            Package::from_sources("model", temp.path(), [("a.rs", "struct User { id: u64 }")])
                .unwrap();
        let mut session = GenerationSession::new(
            package,
            SessionConfig::new("test", "getter")
                .with_format(false)
                .with_output(Some(output.clone())),
            RecordingGenerator::new(),
        );

        assert_eq!(session.run(&["User"]).unwrap().written, [output.clone()]);
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "// User from a.rs\n"
        );
    }

    #[test]
    fn test_format_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let package =
            Package::from_sources("model", temp.path(), [("a.rs", "struct User { id: u64 }")])
                .unwrap();
        let generator = closure(|_, sink| sink.write_str("impl User {"));
        let mut session =
            GenerationSession::new(package, SessionConfig::new("test", "getter"), generator);

        let err = session.run(&["User"]).unwrap_err();
        assert!(matches!(err, Error::Format { ref type_name, .. } if type_name == "User"));
        assert!(!temp.path().join("user_getter.rs").exists());
    }

    #[test]
    fn test_unformatted_output_is_written_verbatim() {
        let temp = TempDir::new().unwrap();
        let package =
            Package::from_sources("model", temp.path(), [("a.rs", "struct User { id: u64 }")])
                .unwrap();
        let generator = closure(|_, sink| sink.write_str("impl User {"));
        let mut session = GenerationSession::new(
            package,
            SessionConfig::new("test", "getter").with_format(false),
            generator,
        );

        let paths = session.run(&["User"]).unwrap().written;
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "impl User {");
    }

    #[test]
    fn test_generator_error_is_propagated() {
        let generator = closure(|_, _| Err(io::Error::other("boom")));
        let mut session = GenerationSession::new(
            package(&[("a.rs", "struct User { id: u64 }")]),
            SessionConfig::new("test", "getter"),
            generator,
        );

        match session.generate("User").unwrap_err() {
            Error::Generator {
                generator,
                type_name,
                source,
            } => {
                assert_eq!(generator, "closure");
                assert_eq!(type_name, "User");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failed_generation_leaves_no_buffer() {
        let generator = closure(|record, sink| {
            sink.write_str("// partial\n")?;
            if record.file().path() == Path::new("b.rs") {
                return Err(io::Error::other("boom"));
            }
            Ok(())
        });
        let mut session = GenerationSession::new(
            package(&[
                ("a.rs", "struct User { id: u64 }"),
                ("b.rs", "struct User { name: String }"),
            ]),
            SessionConfig::new("test", "getter").with_format(false),
            generator,
        );

        assert!(matches!(
            session.generate("User"),
            Err(Error::Generator { .. })
        ));
        assert!(session.buffer("User").is_none());

        // Not marked as generated, so a retry runs the generator again.
        assert!(matches!(
            session.generate("User"),
            Err(Error::Generator { .. })
        ));
        assert!(matches!(
            session.run(&["User"]),
            Err(Error::Generator { .. })
        ));
    }

    #[test]
    fn test_run_reports_skipped_occurrences() {
        let temp = TempDir::new().unwrap();
        let package = Package::from_sources(
            "model",
            temp.path(),
            [
                ("a.rs", "struct User { id: u64 }"),
                ("b.rs", "struct User { extra: m!() }"),
            ],
        )
        .unwrap();
        let mut session = GenerationSession::new(
            package,
            SessionConfig::new("test", "getter").with_format(false),
            RecordingGenerator::new(),
        );

        let run = session.run(&["User", "User"]).unwrap();
        assert_eq!(run.reports.len(), 1);
        assert_eq!(run.reports[0].occurrences, 1);
        assert_eq!(run.written, [temp.path().join("user_getter.rs")]);

        let skipped: Vec<_> = run.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].file, Path::new("b.rs"));
        assert_eq!(skipped[0].record.field, "extra");
    }

    #[test]
    fn test_custom_tag_attribute_reaches_generator() {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = seen.clone();
        let generator = closure(move |record, _| {
            for field in record.fields() {
                log.borrow_mut().push(field.tags.as_ref().map(ToString::to_string));
            }
            Ok(())
        });
        let mut session = GenerationSession::new(
            package(&[(
                "a.rs",
                r#"struct User { #[meta = "json:\"id\""] id: u64, #[tag = "json:\"n\""] name: String }"#,
            )]),
            SessionConfig::new("test", "getter").with_tag_attribute("meta"),
            generator,
        );

        session.generate("User").unwrap();
        assert_eq!(
            *seen.borrow(),
            [Some(r#"json:"id""#.to_string()), None]
        );
    }
}
