//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod generate;
mod list;
mod output;

pub use generate::GenerateReport;
pub use list::{ListReport, RecordEntry, SkippedEntry};
pub use output::{Report, TerminalOutput};
