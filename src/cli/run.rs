use super::config::{default_config_path, default_data_file, LoggingConfig, SafefolksConfig};
use safefolks::telegram::{BotApiClient, SafefolksBot};
use safefolks::trust::TrustStore;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run the bot service
///
/// Loads the configuration, validates the bot token against Telegram, loads
/// the trust store, and enters the long-poll update loop.
///
/// ## Configuration Loading
///
/// Configuration is loaded from one of these sources (in order of
/// precedence):
/// 1. `--config` flag if provided
/// 2. Default config at `~/.local/share/safefolks/config.toml`
///
/// If the config file doesn't exist, a default one is generated and the
/// command exits so the operator can fill in the bot token.
pub async fn execute(
    config_path: Option<String>,
    data_file: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        println!("📝 No config file found. Creating default configuration...");
        SafefolksConfig::create_default(&config_path, &default_data_file())?;
        println!("   Created: {}", config_path.display());
        println!("   Add your bot token to it, then run again.");
        return Err("bot token not configured".into());
    }

    let mut config = SafefolksConfig::load(&config_path)?;
    if let Some(data_file) = data_file {
        config.storage.data_file = PathBuf::from(data_file);
    }

    init_tracing(&config.logging)?;

    // Missing or blank token is fatal before anything touches the network.
    let token = config.telegram.token().ok_or_else(|| {
        format!(
            "no bot token configured in '{}' (set telegram.bot_token)",
            config_path.display()
        )
    })?;

    // A corrupt data file is fatal too: starting anyway would overwrite it
    // on the first recorded edge.
    let store = TrustStore::load(&config.storage.data_file)?;
    info!(
        "loaded trust data from '{}' ({} group(s), {} trust edge(s))",
        store.path().display(),
        store.group_count(),
        store.trust_count()
    );

    let client = BotApiClient::new(token)?;
    let mut bot = SafefolksBot::connect(client, store).await?;
    bot.run().await?;

    Ok(())
}

/// Initialize the tracing subscriber from config, with RUST_LOG override.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| format!("Failed to open log file '{}': {}", path.display(), e))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .ok();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_without_token_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        SafefolksConfig::create_default(&config_path, &temp_dir.path().join("trust_data.json"))
            .unwrap();

        let result = execute(Some(config_path.to_string_lossy().to_string()), None).await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("no bot token configured"));
    }

    #[tokio::test]
    async fn test_run_creates_default_config_and_exits() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let result = execute(Some(config_path.to_string_lossy().to_string()), None).await;

        assert!(result.is_err());
        assert!(config_path.exists());
    }

    #[tokio::test]
    async fn test_run_refuses_corrupt_data_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let data_file = temp_dir.path().join("trust_data.json");
        std::fs::write(&data_file, "{ not json").unwrap();

        let config_content = format!(
            "[telegram]\nbot_token = \"123:abc\"\n\n[storage]\ndata_file = \"{}\"\n",
            data_file.display()
        );
        std::fs::write(&config_path, config_content).unwrap();

        let result = execute(Some(config_path.to_string_lossy().to_string()), None).await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("corrupt"));
    }
}
