//! Global gather configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{GatherError, GatherResult};
use crate::repository::FileRepository;

static DEFAULT_DATA_DIR: &str = "~/.gather";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

/// Configuration at ~/.config/gather/config.toml, overridable with
/// `GATHER_*` environment variables (e.g. `GATHER_CURRENT_USER`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatherConfig {
    /// Where events and series are stored
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    /// The user acting on this machine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user: Option<String>,

    /// IANA time zone used for display (UTC when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for GatherConfig {
    fn default() -> Self {
        GatherConfig {
            data_dir: default_data_dir(),
            current_user: None,
            timezone: None,
        }
    }
}

impl GatherConfig {
    pub fn config_path() -> GatherResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| GatherError::Config("Could not determine config directory".into()))?
            .join("gather");

        Ok(config_dir.join("config.toml"))
    }

    /// Read `path` (if present) layered with `GATHER_*` environment variables.
    pub fn load_from(path: &Path) -> GatherResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("GATHER"))
            .build()
            .map_err(|e| GatherError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| GatherError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> GatherResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| GatherError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| GatherError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> GatherResult<()> {
        let contents = format!(
            "\
# gather configuration

# Where events and series are stored:
# data_dir = \"{}\"

# Who you are:
# current_user = \"alice\"

# Time zone for displaying times:
# timezone = \"Europe/Amsterdam\"
",
            DEFAULT_DATA_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GatherError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| GatherError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Loaded configuration plus the paths derived from it.
#[derive(Debug, Clone)]
pub struct Gather {
    config: GatherConfig,
}

impl Gather {
    pub fn load() -> GatherResult<Self> {
        let config_path = GatherConfig::config_path()?;

        if !config_path.exists() {
            GatherConfig::create_default_config(&config_path)?;
        }

        Ok(Gather {
            config: GatherConfig::load_from(&config_path)?,
        })
    }

    pub fn from_config(config: GatherConfig) -> Self {
        Gather { config }
    }

    pub fn config(&self) -> &GatherConfig {
        &self.config
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.config.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The identity used for join/quit and ownership checks.
    pub fn current_user(&self) -> GatherResult<&str> {
        self.config.current_user.as_deref().ok_or_else(|| {
            GatherError::Config(
                "No current user configured. Set `current_user` in config.toml or GATHER_CURRENT_USER"
                    .into(),
            )
        })
    }

    /// A catalog over the file repository in [`Gather::data_path`].
    pub fn catalog(&self) -> Catalog {
        Catalog::new(Arc::new(FileRepository::new(self.data_path())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "current_user = \"alice\"\n").unwrap();

        let config = GatherConfig::load_from(&path).unwrap();

        assert_eq!(config.current_user.as_deref(), Some("alice"));
        assert_eq!(config.data_dir, PathBuf::from("~/.gather"));
        assert!(config.timezone.is_none());
    }

    #[test]
    fn test_default_config_file_is_all_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        GatherConfig::create_default_config(&path).unwrap();
        let config = GatherConfig::load_from(&path).unwrap();

        assert!(config.current_user.is_none());
    }

    #[test]
    fn test_save_round_trips_and_skips_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = GatherConfig {
            current_user: Some("bob".into()),
            ..GatherConfig::default()
        };

        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("data_dir"));
        assert_eq!(
            GatherConfig::load_from(&path).unwrap().current_user.as_deref(),
            Some("bob")
        );
    }

    #[test]
    fn test_missing_current_user_is_config_error() {
        let gather = Gather::from_config(GatherConfig::default());

        assert!(matches!(gather.current_user(), Err(GatherError::Config(_))));
    }
}
