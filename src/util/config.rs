//! Configuration file support for Drydock.
//!
//! Toolchain overrides live in `toolchain.toml`:
//! - Global: `~/.drydock/toolchain.toml` - user-wide defaults
//! - Project: `.drydock/toolchain.toml` - project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Toolchain configuration for compiler overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain settings
    pub toolchain: ToolchainSettings,
}

/// Toolchain settings for compiler discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Path to the compiler (e.g. /usr/bin/clang)
    pub cc: Option<PathBuf>,

    /// Toolchain family override, skipping detection
    /// (gcc, clang, apple-clang)
    pub family: Option<String>,

    /// Path to an already-chosen linker
    pub linker: Option<PathBuf>,

    /// Extra compile arguments for probes and sanity checks
    #[serde(default)]
    pub extra_cflags: Vec<String>,
}

impl ToolchainConfig {
    /// Load toolchain configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse toolchain config: {}", path.display()))
    }

    /// Load toolchain configuration with fallback to defaults if the file
    /// doesn't exist or fails to parse.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load toolchain config from {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save toolchain configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .with_context(|| "failed to serialize toolchain config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write toolchain config: {}", path.display()))?;

        Ok(())
    }

    /// Check if any toolchain settings are configured.
    pub fn has_overrides(&self) -> bool {
        self.toolchain.cc.is_some()
            || self.toolchain.family.is_some()
            || self.toolchain.linker.is_some()
            || !self.toolchain.extra_cflags.is_empty()
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: ToolchainConfig) {
        if other.toolchain.cc.is_some() {
            self.toolchain.cc = other.toolchain.cc;
        }
        if other.toolchain.family.is_some() {
            self.toolchain.family = other.toolchain.family;
        }
        if other.toolchain.linker.is_some() {
            self.toolchain.linker = other.toolchain.linker;
        }
        if !other.toolchain.extra_cflags.is_empty() {
            self.toolchain.extra_cflags = other.toolchain.extra_cflags;
        }
    }
}

/// Load merged toolchain configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.drydock/toolchain.toml)
/// 2. Global config (~/.drydock/toolchain.toml)
/// 3. Defaults
pub fn load_toolchain_config(global_path: &Path, project_path: &Path) -> ToolchainConfig {
    let mut config = ToolchainConfig::default();

    if global_path.exists() {
        let global = ToolchainConfig::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = ToolchainConfig::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global drydock config directory (~/.drydock).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".drydock"))
}

/// Get the global toolchain config path (~/.drydock/toolchain.toml).
pub fn global_toolchain_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("toolchain.toml"))
}

/// Get the project toolchain config path (.drydock/toolchain.toml).
pub fn project_toolchain_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".drydock").join("toolchain.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("toolchain.toml");

        let mut config = ToolchainConfig::default();
        config.toolchain.cc = Some(PathBuf::from("/usr/bin/clang"));
        config.toolchain.family = Some("clang".to_string());
        config.toolchain.extra_cflags = vec!["--sysroot=/opt/sdk".to_string()];
        config.save(&path).unwrap();

        let loaded = ToolchainConfig::load(&path).unwrap();
        assert_eq!(loaded.toolchain.cc, Some(PathBuf::from("/usr/bin/clang")));
        assert_eq!(loaded.toolchain.family.as_deref(), Some("clang"));
        assert_eq!(loaded.toolchain.extra_cflags, vec!["--sysroot=/opt/sdk"]);
        assert!(loaded.has_overrides());
    }

    #[test]
    fn test_project_config_takes_precedence() {
        let tmp = tempfile::TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        let mut global = ToolchainConfig::default();
        global.toolchain.cc = Some(PathBuf::from("/usr/bin/gcc"));
        global.toolchain.extra_cflags = vec!["-g".to_string()];
        global.save(&global_path).unwrap();

        let mut project = ToolchainConfig::default();
        project.toolchain.cc = Some(PathBuf::from("/usr/bin/clang"));
        project.save(&project_path).unwrap();

        let merged = load_toolchain_config(&global_path, &project_path);
        assert_eq!(merged.toolchain.cc, Some(PathBuf::from("/usr/bin/clang")));
        // Project config did not set cflags; global value survives.
        assert_eq!(merged.toolchain.extra_cflags, vec!["-g"]);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ToolchainConfig::load_or_default(Path::new("/nonexistent/toolchain.toml"));
        assert!(!config.has_overrides());
    }
}
