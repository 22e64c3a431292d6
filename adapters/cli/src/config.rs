use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings read from the optional `xodex.toml` file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Where share links point.
    pub(crate) share: ShareConfig,
    /// Diagnostic output settings.
    pub(crate) logging: LoggingConfig,
}

/// Base URLs of the player and editor front ends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ShareConfig {
    /// Page that plays a level from its fragment.
    pub(crate) play_url: Option<String>,
    /// Page that re-imports a level for editing.
    pub(crate) editor_url: Option<String>,
}

/// Logging filter used when `RUST_LOG` is not set.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LoggingConfig {
    /// `tracing-subscriber` filter directive.
    pub(crate) filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl Config {
    /// Returns the configuration path consulted when none is given explicitly.
    #[must_use]
    pub(crate) fn default_path() -> PathBuf {
        PathBuf::from("xodex.toml")
    }

    /// Loads the explicit configuration file, or the default one if it exists.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let path = Self::default_path();
                if path.is_file() {
                    Self::from_path(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid configuration at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse configuration toml")?;

        for (name, url) in [
            ("share.play_url", &config.share.play_url),
            ("share.editor_url", &config.share.editor_url),
        ] {
            if let Some(url) = url {
                if url.trim().is_empty() {
                    bail!("{name} must not be empty");
                }
                if url.contains('#') {
                    bail!("{name} must not contain a fragment; the level token is appended as one");
                }
            }
        }
        if config.logging.filter.trim().is_empty() {
            bail!("logging.filter must not be empty");
        }

        Ok(config)
    }
}
