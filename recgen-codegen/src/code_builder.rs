//! Line-oriented builder for generated Rust source.

use std::{fmt, io};

use crate::OutputSink;

/// Indentation unit for one nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(u8),
    Tab,
}

impl Indent {
    /// Four spaces, as rustfmt does.
    pub const RUST: Self = Self::Spaces(4);

    fn write_to(self, buf: &mut String) {
        match self {
            Self::Spaces(n) => buf.extend(std::iter::repeat_n(' ', n as usize)),
            Self::Tab => buf.push('\t'),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::RUST
    }
}

/// Fluent API for building generated code with consistent indentation.
///
/// Generated files are normally reformatted before they are written, but
/// output produced with `--no-format` should still be readable, so
/// generators build their text through this type.
///
/// # Example
///
/// ```
/// use recgen_codegen::CodeBuilder;
///
/// let code = CodeBuilder::rust()
///     .block("impl User {", |b| {
///         b.line("pub fn name(&self) -> &String {")
///             .indent()
///             .line("&self.name")
///             .dedent()
///             .line("}")
///     })
///     .build();
///
/// assert_eq!(
///     code,
///     "impl User {\n    pub fn name(&self) -> &String {\n        &self.name\n    }\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Builder with four-space indentation.
    pub fn rust() -> Self {
        Self::new(Indent::RUST)
    }

    /// Add a line at the current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a formatted line at the current indentation.
    pub fn linef(mut self, args: fmt::Arguments<'_>) -> Self {
        self.write_indent();
        fmt::Write::write_fmt(&mut self.buffer, args).ok();
        self.buffer.push('\n');
        self
    }

    /// Add an empty line.
    pub fn blank(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    pub fn indent(mut self) -> Self {
        self.indent_level += 1;
        self
    }

    pub fn dedent(mut self) -> Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add `header`, the indented body, and a closing `}`.
    pub fn block<F>(self, header: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.block_with_close(header, "}", f)
    }

    /// Add `header`, the indented body, and `close`.
    pub fn block_with_close<F>(self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent().line(close)
    }

    /// Add a `///` doc comment.
    pub fn rust_doc(mut self, text: &str) -> Self {
        self.write_indent();
        self.buffer.push_str("///");
        if !text.is_empty() {
            self.buffer.push(' ');
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
        self
    }

    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    pub fn build(self) -> String {
        self.buffer
    }

    /// Append the built code to a record's output.
    pub fn write_to(self, sink: &mut OutputSink<'_>) -> io::Result<()> {
        sink.write_str(&self.buffer)
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.indent.write_to(&mut self.buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line() {
        let code = CodeBuilder::rust().line("let x = 1;").build();
        assert_eq!(code, "let x = 1;\n");
    }

    #[test]
    fn test_nested_blocks() {
        let code = CodeBuilder::rust()
            .block("impl Point {", |b| {
                b.block("pub fn x(&self) -> &i32 {", |b| b.line("&self.x"))
            })
            .build();

        assert_eq!(
            code,
            "impl Point {\n    pub fn x(&self) -> &i32 {\n        &self.x\n    }\n}\n"
        );
    }

    #[test]
    fn test_linef() {
        let code = CodeBuilder::rust()
            .indent()
            .linef(format_args!("self.{} = value;", "name"))
            .build();
        assert_eq!(code, "    self.name = value;\n");
    }

    #[test]
    fn test_tab_indent() {
        let code = CodeBuilder::new(Indent::Tab)
            .block_with_close("mod a {", "}", |b| b.line("fn f() {}"))
            .build();
        assert_eq!(code, "mod a {\n\tfn f() {}\n}\n");
    }

    #[test]
    fn test_odd_space_width() {
        let code = CodeBuilder::new(Indent::Spaces(3))
            .indent()
            .line("x")
            .build();
        assert_eq!(code, "   x\n");
    }

    #[test]
    fn test_doc_comment() {
        let code = CodeBuilder::rust()
            .rust_doc("Returns the name.")
            .rust_doc("")
            .build();
        assert_eq!(code, "/// Returns the name.\n///\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let code = CodeBuilder::rust().dedent().dedent().line("x").build();
        assert_eq!(code, "x\n");
    }

    #[test]
    fn test_when_and_each() {
        let code = CodeBuilder::rust()
            .when(false, |b| b.line("#[inline]"))
            .each(["a", "b"], |b, name| {
                b.linef(format_args!("fn {name}() {{}}"))
            })
            .blank()
            .build();
        assert_eq!(code, "fn a() {}\nfn b() {}\n\n");
    }

    #[test]
    fn test_write_to_sink() {
        let mut buf = b"// head\n".to_vec();
        let mut sink = OutputSink::new("A", &mut buf);
        CodeBuilder::rust().line("impl A {}").write_to(&mut sink).unwrap();
        assert_eq!(buf, b"// head\nimpl A {}\n");
    }
}
