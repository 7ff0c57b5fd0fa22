use super::config::{default_config_path, SafefolksConfig};
use safefolks::trust::TrustStore;
use std::path::PathBuf;

/// Summarize recorded groups and trust relationships
///
/// Reads the trust data file directly; the bot does not need to be running.
pub async fn execute(config_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let config = SafefolksConfig::load(&config_path)?;
    let store = TrustStore::load(&config.storage.data_file)?;

    println!("📊 SafeFolks Bot Status");
    println!();
    println!("Config:    {}", config_path.display());
    println!("Data file: {}", store.path().display());
    println!();
    println!("Groups: {}", store.group_count());
    println!("Trust relationships: {}", store.trust_count());

    for (chat, group) in store.groups() {
        let edges = store.trusts_for_group(chat).len();
        println!(
            "  {} ({}): owner {}, {} trust edge(s)",
            group.name, chat, group.owner_name, edges
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use safefolks::telegram::traits::{ChatId, UserId};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_status_reports_store_contents() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let data_file = temp_dir.path().join("trust_data.json");

        let mut store = TrustStore::load(&data_file).unwrap();
        store
            .register_group(ChatId(-1), "Group", UserId(1), "Owner")
            .unwrap();
        store
            .record_trust(ChatId(-1), UserId(1), "Owner", UserId(2), "Member")
            .unwrap();

        let config_content = format!(
            "[telegram]\nbot_token = \"123:abc\"\n\n[storage]\ndata_file = \"{}\"\n",
            data_file.display()
        );
        std::fs::write(&config_path, config_content).unwrap();

        let result = execute(Some(config_path.to_string_lossy().to_string())).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_status_without_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing.toml");

        let result = execute(Some(config_path.to_string_lossy().to_string())).await;
        assert!(result.is_err());
    }
}
