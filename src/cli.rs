//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::quiz::Difficulty;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  quizmaster                              Play an interactive quiz
  quizmaster play -t \"Roman history\"      Play, asking only for the difficulty
  quizmaster generate -t rust -d advanced Print a generated quiz as JSON
  quizmaster serve --port 3001            Run the generation proxy
  quizmaster login Ada                    Sign in so results are saved
  quizmaster history list --limit 5       Show recent results
  quizmaster completions bash             Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Topic quizzes generated by open-source language models",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play an interactive quiz (default)
    Play {
        /// Quiz topic (asked for when omitted)
        #[arg(short, long)]
        topic: Option<String>,
        /// beginner, intermediate or advanced
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// Generate a quiz and print it as JSON
    Generate {
        #[arg(short, long)]
        topic: String,
        #[arg(short, long, default_value_t = Difficulty::Intermediate)]
        difficulty: Difficulty,
    },
    /// Run the chat-completion proxy holding the API key
    Serve {
        #[arg(short, long, default_value_t = crate::server::DEFAULT_PORT)]
        port: u16,
    },
    /// Sign in with a display name
    Login { name: String },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Quiz results of the signed-in user
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
    /// Show config paths, model, and API key status
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// List results, newest first
    List {
        /// Maximum number of results to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Filter by topic or difficulty
        #[arg(long)]
        query: Option<String>,
    },
    /// Delete all but the newest results
    Prune {
        /// Results to keep (defaults to the configured history limit)
        #[arg(short, long)]
        keep: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Store the API key (reads stdin when KEY is omitted)
    SetApiKey { key: Option<String> },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// Interactive play logs to a file so prompts stay readable.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Play { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_is_interactive() {
        let args = Args::try_parse_from(["quizmaster"]).unwrap();
        assert!(args.is_interactive());
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn generate_parses_difficulty() {
        let args =
            Args::try_parse_from(["quizmaster", "generate", "-t", "rust", "-d", "Advanced", "-vv"])
                .unwrap();
        assert!(!args.is_interactive());
        assert_eq!(args.log_level(), "debug");
        match args.command {
            Some(Commands::Generate { topic, difficulty }) => {
                assert_eq!(topic, "rust");
                assert_eq!(difficulty, Difficulty::Advanced);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        assert!(Args::try_parse_from(["quizmaster", "play", "-d", "expert"]).is_err());
    }

    #[test]
    fn serve_defaults_port() {
        let args = Args::try_parse_from(["quizmaster", "serve", "-q"]).unwrap();
        assert_eq!(args.log_level(), "error");
        assert!(matches!(args.command, Some(Commands::Serve { port: 3001 })));
    }
}
