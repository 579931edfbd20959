mod completions;
mod generate;
mod list;

use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use list::ListCommand;
use recgen_accessors::AccessorKind;

/// Extension trait for exiting on library diagnostics with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for recgen_source::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(miette::Report::new(*e)),
        }
    }
}

impl<T> UnwrapOrExit<T> for recgen_codegen::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(miette::Report::new(e)),
        }
    }
}

fn exit_with(report: miette::Report) -> ! {
    eprintln!("{:?}", report);
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "recgen")]
#[command(version)]
#[command(about = "Generate accessor code for Rust structs from their field declarations")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Getter(cmd) => cmd.run(AccessorKind::Getter),
            Commands::Setter(cmd) => cmd.run(AccessorKind::Setter),
            Commands::Accessors(cmd) => cmd.run(AccessorKind::Both),
            Commands::List(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate getters for the given structs
    Getter(GenerateCommand),

    /// Generate setters for the given structs
    Setter(GenerateCommand),

    /// Generate getters and setters in one file
    Accessors(GenerateCommand),

    /// List the structs recgen can generate for
    List(ListCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_type_list_is_comma_separated() {
        let cli = Cli::try_parse_from(["recgen", "getter", "--type", "User,Account", "src"]).unwrap();
        let Commands::Getter(cmd) = cli.command else {
            panic!("expected getter command");
        };
        assert_eq!(cmd.types, ["User", "Account"]);
        assert_eq!(cmd.paths, [std::path::PathBuf::from("src")]);
        assert!(!cmd.no_format);
    }

    #[test]
    fn test_type_is_required() {
        let err = Cli::try_parse_from(["recgen", "setter"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["recgen", "list", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
