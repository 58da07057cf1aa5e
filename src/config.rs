use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat endpoint URL
    pub endpoint_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Parley home directory
    pub parley_home: PathBuf,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Transcript label for user entries
    pub user_label: String,
    /// Transcript label for assistant and error entries
    pub assistant_label: String,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        let parley_home = home.join(".parley");

        Config {
            endpoint_url: "http://localhost:8000/agents/chat".to_string(),
            request_timeout_secs: 60,
            parley_home,
            ui: UiConfig {
                user_label: "You".to_string(),
                assistant_label: "AI Assistant".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from ~/.parley/config.toml, falling back to
    /// defaults when no file exists yet.
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let parley_home = home.join(".parley");
        let config_path = parley_home.join("config.toml");

        fs::create_dir_all(&parley_home)
            .context("Failed to create .parley directory")?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&content)
                .context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config.parley_home = parley_home;

        // First run: write the defaults so the file is there to edit.
        if !config_path.exists() {
            config.save()?;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = self.parley_home.join("config.toml");
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_endpoint_contract() {
        let config = Config::default();
        assert_eq!(config.endpoint_url, "http://localhost:8000/agents/chat");
        assert_eq!(config.ui.user_label, "You");
        assert_eq!(config.ui.assistant_label, "AI Assistant");
    }

    #[test]
    fn save_writes_a_loadable_file() {
        let home = std::env::temp_dir().join(format!("parley-config-{}", std::process::id()));
        std::fs::create_dir_all(&home).unwrap();

        let mut config = Config::default();
        config.parley_home = home.clone();
        config.endpoint_url = "http://example.com/chat".to_string();
        config.save().unwrap();

        let content = std::fs::read_to_string(home.join("config.toml")).unwrap();
        let restored: Config = toml::from_str(&content).unwrap();
        assert_eq!(restored.endpoint_url, "http://example.com/chat");

        std::fs::remove_dir_all(&home).unwrap();
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(restored.endpoint_url, config.endpoint_url);
        assert_eq!(restored.request_timeout_secs, config.request_timeout_secs);
    }
}
