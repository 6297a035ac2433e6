use super::AnalysisConfig;
use crate::error::{ErrorCode, ProcMinerError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Resolves an [`AnalysisConfig`] from defaults, a TOML file and the environment
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    use_env: bool,
}

/// Default location of the user-level configuration file
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "procminer", "procminer")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            use_env: true,
        }
    }

    /// Load from this file; it must exist
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Skip `PROCMINER_*` environment lookups
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub async fn load(&self) -> Result<AnalysisConfig> {
        let mut config = match self.resolve_path() {
            Some((path, required)) => Self::load_file(&path, required).await?,
            None => AnalysisConfig::default(),
        };

        if self.use_env {
            config.merge_env_vars()?;
        }
        config.validate()?;

        debug!(
            "Resolved configuration: unit={}, day_bucket={}, partitions={}",
            config.time_unit, config.day_bucket, config.partitions
        );
        Ok(config)
    }

    fn resolve_path(&self) -> Option<(PathBuf, bool)> {
        if let Some(path) = &self.explicit_path {
            return Some((path.clone(), true));
        }
        if self.use_env {
            if let Ok(path) = std::env::var("PROCMINER_CONFIG") {
                return Some((PathBuf::from(path), true));
            }
        }
        default_config_path().map(|path| (path, false))
    }

    async fn load_file(path: &Path, required: bool) -> Result<AnalysisConfig> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            if required {
                return Err(ProcMinerError::config_with_code(
                    ErrorCode::CONFIG_NOT_FOUND,
                    format!("configuration file not found: {}", path.display()),
                )
                .with_path(path));
            }
            return Ok(AnalysisConfig::default());
        }

        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).await.map_err(|e| {
            ProcMinerError::config("cannot read configuration file")
                .with_path(path)
                .with_source(e)
        })?;
        AnalysisConfig::from_toml_str(&content).map_err(|e| e.with_path(path))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("procminer.toml");
        std::fs::write(
            &path,
            "time_unit = \"second\"\npartitions = 2\nlog_name = \"billing\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_path(&path)
            .without_env()
            .load()
            .await
            .unwrap();
        assert_eq!(config.time_unit, TimeUnit::Second);
        assert_eq!(config.partitions, 2);
        assert_eq!(config.log_name.as_deref(), Some("billing"));
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::new()
            .with_path(dir.path().join("absent.toml"))
            .without_env()
            .load()
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_toml_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "time_unit = [").unwrap();

        let err = ConfigLoader::new()
            .with_path(&path)
            .without_env()
            .load()
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_TOML);
        assert!(err.user_message().contains("broken.toml"));
    }
}
