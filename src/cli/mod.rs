use clap::{Parser, Subcommand};

pub mod config;
pub mod run;
pub mod status;
pub mod version;

#[derive(Parser)]
#[command(name = "safefolks")]
#[command(author = "SafeFolks Project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Trust-recording Telegram bot for SafeFolks groups", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot service
    Run {
        /// Path to config file (default: ~/.local/share/safefolks/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Path to the trust data file (overrides the config file)
        #[arg(long)]
        data_file: Option<String>,
    },

    /// Summarize recorded groups and trust relationships
    Status {
        /// Path to config file (default: ~/.local/share/safefolks/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run { config, data_file } => run::execute(config, data_file).await,
        Commands::Status { config } => status::execute(config).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["safefolks", "run", "--config", "/etc/safefolks/config.toml"]);

        match cli.command {
            Commands::Run { config, data_file } => {
                assert_eq!(config, Some("/etc/safefolks/config.toml".to_string()));
                assert_eq!(data_file, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_defaults() {
        // Test that run works with no arguments (uses defaults)
        let cli = Cli::parse_from(["safefolks", "run"]);

        match cli.command {
            Commands::Run { config, data_file } => {
                assert_eq!(config, None);
                assert_eq!(data_file, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_with_data_file() {
        let cli = Cli::parse_from(["safefolks", "run", "--data-file", "/custom/trust_data.json"]);

        match cli.command {
            Commands::Run { config, data_file } => {
                assert_eq!(config, None);
                assert_eq!(data_file, Some("/custom/trust_data.json".to_string()));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["safefolks", "status"]);
        assert!(matches!(cli.command, Commands::Status { .. }));
    }

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::parse_from(["safefolks", "version"]);
        assert!(matches!(cli.command, Commands::Version));
    }
}
