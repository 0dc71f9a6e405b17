//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::light::Phase;

/// tl - watch a randomly cycling traffic light
#[derive(Parser)]
#[command(
    name = "tl",
    about = "Run a traffic light that toggles between stopped and clear",
    version,
    after_help = "Logs are written to: ~/.local/share/trafficlight/logs/trafficlight.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Start the light and print every phase change
    Run {
        /// Stop after this many toggles (runs until interrupted by default)
        #[arg(short, long)]
        toggles: Option<u64>,
    },

    /// Start the light and block until a phase is observed
    Wait {
        /// Phase to wait for (stopped/red, clear/green)
        #[arg(value_name = "PHASE")]
        phase: Phase,

        /// Give up after this many milliseconds
        #[arg(short, long)]
        timeout_ms: Option<u64>,
    },

    /// Print the effective configuration
    Config {
        /// Output format
        #[arg(short, long, default_value = "yaml")]
        format: OutputFormat,
    },
}

/// Output format for the config command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: yaml or json", s)),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trafficlight")
        .join("logs")
        .join("trafficlight.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_wait() {
        let cli = Cli::try_parse_from(["tl", "wait", "green", "--timeout-ms", "2500"]).unwrap();
        match cli.command {
            Some(Command::Wait { phase, timeout_ms }) => {
                assert_eq!(phase, Phase::Clear);
                assert_eq!(timeout_ms, Some(2500));
            }
            _ => panic!("expected wait command"),
        }
    }

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::try_parse_from(["tl", "run", "-t", "4", "-v", "--config", "light.yml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("light.yml")));
        assert!(matches!(cli.command, Some(Command::Run { toggles: Some(4) })));
    }

    #[test]
    fn test_rejects_unknown_phase() {
        assert!(Cli::try_parse_from(["tl", "wait", "yellow"]).is_err());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("table".parse::<OutputFormat>().is_err());
    }
}
