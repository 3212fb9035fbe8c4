//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use bundle_analytics::AnalyticsConfig;

use crate::output::Output;

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["analytics.toml", ".analytics.toml", "analytics.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Analytics configuration.
    pub config: AnalyticsConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let config = AnalyticsConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path))?;
            (config, Some(PathBuf::from(path)))
        } else {
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (AnalyticsConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(AnalyticsConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if !config_path.exists() {
                    continue;
                }
                match AnalyticsConfig::load(&config_path) {
                    Ok(config) => return Some((config, config_path)),
                    Err(e) => {
                        tracing::debug!(
                            path = %config_path.display(),
                            error = %e,
                            "skipping unreadable config"
                        );
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Read a JSON document from a file, or stdin when `path` is `-`.
    pub fn read_json(&self, path: &str) -> Result<serde_json::Value> {
        let content = if path == "-" {
            std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
        } else {
            let resolved = self.resolve_path(path);
            std::fs::read_to_string(&resolved)
                .with_context(|| format!("Failed to read {}", resolved.display()))?
        };

        serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {}", path))
    }
}
