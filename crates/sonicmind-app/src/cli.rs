use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sonicmind", about = "SonicMind: play music, tell jokes and search the web by voice or text")]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a typed command
    Run {
        #[arg(long)]
        text: String,
        /// Print the result as JSON instead of progress lines
        #[arg(long)]
        json: bool,
    },

    /// Listen for one spoken command and run it
    Speak {
        #[arg(long)]
        json: bool,
    },

    /// Prompt loop: `/speak` listens, `/quit` exits, anything else is a typed command
    Interactive,

    /// Show the classifier's ranked labels and the resolved intent
    Classify {
        #[arg(long)]
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_json() {
        let cli = Cli::parse_from(["sonicmind", "run", "--text", "play despacito", "--json"]);
        match cli.command {
            Commands::Run { text, json } => {
                assert_eq!(text, "play despacito");
                assert!(json);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn config_is_global() {
        let cli = Cli::parse_from(["sonicmind", "interactive", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Commands::Interactive));
    }

    #[test]
    fn run_requires_text() {
        assert!(Cli::try_parse_from(["sonicmind", "run"]).is_err());
    }
}
