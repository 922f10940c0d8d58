//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Classify messages into triage categories and explain every decision.
#[derive(Parser, Debug)]
#[command(name = "mailsort", version, about)]
pub struct Cli {
    /// Rule set JSON file to use instead of the built-in rules.
    #[arg(long, global = true, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Print JSON instead of the human-readable report.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a single message given on the command line.
    Classify(ClassifyArgs),

    /// Classify a JSON array of messages from a file or stdin.
    Batch {
        /// Input file. Reads stdin when omitted or `-`.
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// List the active rules.
    Rules,

    /// List the categories in priority order.
    Categories,
}

/// A message typed in by hand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Sender, e.g. `Jo <jo@example.com>`.
    #[arg(long)]
    pub sender: String,

    /// Subject line.
    #[arg(long)]
    pub subject: String,

    /// First lines of the body. Required; an empty preview is rejected.
    #[arg(long)]
    pub preview: Option<String>,

    /// Record id. A random UUID is used when omitted.
    #[arg(long)]
    pub id: Option<String>,
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
    fn test_parse_classify() {
        let cli = Cli::try_parse_from([
            "mailsort",
            "--json",
            "classify",
            "--sender",
            "a@b.c",
            "--subject",
            "Invoice",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.json);
        match cli.command {
            Command::Classify(args) => {
                assert_eq!(args.sender, "a@b.c");
                assert_eq!(args.preview, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_batch_with_rules() {
        let cli = Cli::try_parse_from(["mailsort", "batch", "in.json", "--rules", "r.json"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.rules, Some(PathBuf::from("r.json")));
        assert!(matches!(cli.command, Command::Batch { input: Some(_) }));
    }
}
