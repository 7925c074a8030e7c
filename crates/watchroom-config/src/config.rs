use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Catalog API endpoints and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API key for the catalog service. Empty means catalog commands are
    /// unavailable.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,

    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

/// Embedded player endpoint the playback surface is pointed at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_base_url")]
    pub base_url: String,
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_player_base_url() -> String {
    "https://player.videasy.net".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: default_player_base_url(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if present, otherwise fall back to defaults.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.base_url.is_empty() {
            return Err(anyhow::anyhow!("catalog.base_url cannot be empty"));
        }
        if self.player.base_url.is_empty() {
            return Err(anyhow::anyhow!("player.base_url cannot be empty"));
        }
        Ok(())
    }

    pub fn is_catalog_configured(&self) -> bool {
        !self.catalog.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            catalog: CatalogConfig {
                api_key: "test_key".to_string(),
                ..CatalogConfig::default()
            },
            player: PlayerConfig::default(),
        };

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.catalog.api_key, "test_key");
        assert_eq!(loaded.player.base_url, default_player_base_url());
        assert!(loaded.is_catalog_configured());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_or_default(&path).unwrap();
        assert!(!config.is_catalog_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_urls() {
        let config = Config {
            catalog: CatalogConfig {
                base_url: String::new(),
                ..CatalogConfig::default()
            },
            player: PlayerConfig::default(),
        };
        assert!(config.validate().is_err());
    }
}
