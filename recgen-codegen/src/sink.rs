use std::{fmt, io};

/// Write-only handle on one record's output buffer.
///
/// Raw writes (through [`io::Write`]) and [`OutputSink::print`] append to
/// the same buffer, in call order. The sink borrows the buffer for the
/// duration of one generator call.
pub struct OutputSink<'a> {
    record: &'a str,
    buf: &'a mut Vec<u8>,
}

impl<'a> OutputSink<'a> {
    pub(crate) fn new(record: &'a str, buf: &'a mut Vec<u8>) -> Self {
        Self { record, buf }
    }

    /// Name of the record this sink writes for.
    pub fn record(&self) -> &str {
        self.record
    }

    /// Append formatted text.
    ///
    /// ```ignore
    /// sink.print(format_args!("impl {} {{}}\n", record.name()))?;
    /// ```
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        io::Write::write_fmt(self, args)
    }

    /// Append a string verbatim.
    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl io::Write for OutputSink<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
