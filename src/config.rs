use crate::keymap::Keymap;
use crate::utils::get_data_dir;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the locally cloned (bare) repositories
    #[serde(default = "default_repos_dir")]
    pub repos_dir: PathBuf,
    /// UI theme: "dark", "light" or "nocolor"
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub keymap: Keymap,
    /// Values the clone form starts with
    #[serde(default)]
    pub clone: CloneDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneDefaults {
    pub hostname: String,
    pub pathname: String,
    pub description: String,
}

impl Default for CloneDefaults {
    fn default() -> Self {
        Self {
            hostname: "github.com".to_string(),
            pathname: "/creationix/conquest.git".to_string(),
            description:
                "A remake of the classic Lords of Conquest for C64 implemented in JavaScript"
                    .to_string(),
        }
    }
}

fn default_repos_dir() -> PathBuf {
    get_data_dir().join("repos")
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repos_dir: default_repos_dir(),
            theme: default_theme(),
            keymap: Keymap::default(),
            clone: CloneDefaults::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, writing a default one if it is missing
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file with owner-only permissions
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(config_path)
                .with_context(|| format!("Failed to get file metadata: {:?}", config_path))?
                .permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(config_path, perms)
                .with_context(|| format!("Failed to set file permissions: {:?}", config_path))?;
        }

        Ok(())
    }
}
