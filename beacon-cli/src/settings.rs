//! Announcement settings resolved from flags, the TOML file and host defaults
//!
//! Flags and environment variables win over the file, the file wins over
//! host defaults. The file is re-read for every cycle; when a reload fails the
//! last good snapshot stays in effect.

use beacon_agent::ConfigSource;
use beacon_core::{AnnouncementConfig, Error, Result};
use parking_lot::RwLock;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Contents of the configuration file
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub announcement: AnnouncementSection,
}

/// `[announcement]` table
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnouncementSection {
    pub system_name: Option<String>,
    pub system_description: Option<String>,
}

impl SettingsFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Invalid TOML: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overrides {
    pub system_name: Option<String>,
    pub system_description: Option<String>,
}

pub struct Settings {
    path: Option<PathBuf>,
    overrides: Overrides,
    defaults: AnnouncementConfig,
    current: RwLock<AnnouncementConfig>,
}

impl Settings {
    /// Resolve settings over the host defaults
    ///
    /// Fails when the configuration file cannot be loaded.
    pub fn load(path: Option<PathBuf>, overrides: Overrides) -> Result<Self> {
        Self::with_defaults(path, overrides, AnnouncementConfig::default())
    }

    pub fn with_defaults(
        path: Option<PathBuf>,
        overrides: Overrides,
        defaults: AnnouncementConfig,
    ) -> Result<Self> {
        let initial = resolve(path.as_deref(), &overrides, &defaults)?;
        Ok(Self {
            path,
            overrides,
            defaults,
            current: RwLock::new(initial),
        })
    }

    /// Last resolved snapshot
    pub fn snapshot(&self) -> AnnouncementConfig {
        self.current.read().clone()
    }

    /// Re-read the file and return the snapshot now in effect
    pub fn reload(&self) -> AnnouncementConfig {
        let Some(path) = self.path.as_deref() else {
            return self.snapshot();
        };

        match resolve(Some(path), &self.overrides, &self.defaults) {
            Ok(config) => {
                let mut current = self.current.write();
                if *current != config {
                    debug!(config = %config, "Announcement settings changed");
                    *current = config.clone();
                }
                config
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Keeping previous announcement settings"
                );
                self.snapshot()
            }
        }
    }
}

impl ConfigSource for Settings {
    fn current(&self) -> AnnouncementConfig {
        self.reload()
    }
}

fn resolve(
    path: Option<&Path>,
    overrides: &Overrides,
    defaults: &AnnouncementConfig,
) -> Result<AnnouncementConfig> {
    let file = match path {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };

    Ok(defaults
        .clone()
        .with_overrides(
            file.announcement.system_name.as_deref(),
            file.announcement.system_description.as_deref(),
        )
        .with_overrides(
            overrides.system_name.as_deref(),
            overrides.system_description.as_deref(),
        ))
}
