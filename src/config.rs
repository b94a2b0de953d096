//! Runtime settings and, with the `config` feature, TOML persistence of settings and bindings.
//!
//! Persisting bindings stays a caller decision: the core only snapshots and restores the
//! [`BindingStore`](crate::binding::BindingStore); the helpers here write that snapshot to disk.

use crate::input::DEFAULT_TICK_RATE_HZ;
use crate::recorder::DEFAULT_AXIS_CAPTURE_WINDOW;
use std::time::Duration;

#[cfg(feature = "config")]
use crate::binding::SavedBindings;
#[cfg(feature = "config")]
use crate::error::{HotbindError, Result};
#[cfg(feature = "config")]
use std::path::{Path, PathBuf};

/// Default wait per source poll in the input loop.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HotkeysConfig {
    /// Ticks per second for velocity-driven range actions.
    pub tick_rate_hz: u32,
    /// Consecutive same-axis readings needed to accept an axis while recording.
    pub axis_capture_window: usize,
    /// Longest time the input loop blocks on its source.
    pub poll_interval_ms: u64,
}

impl Default for HotkeysConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            axis_capture_window: DEFAULT_AXIS_CAPTURE_WINDOW,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl HotkeysConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(feature = "config")]
impl HotkeysConfig {
    /// `<config dir>/hotbind/config.toml`, when the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hotbind").join("config.toml"))
    }

    /// Load settings from `path`. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| HotbindError::io(format!("failed to read {}", path.display()), e))?;
        toml::from_str(&text)
            .map_err(|e| HotbindError::config(format!("invalid config {}: {e}", path.display())))
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Write a bindings snapshot to `path` as TOML, creating parent directories.
#[cfg(feature = "config")]
pub fn save_bindings(path: &Path, bindings: &SavedBindings) -> Result<()> {
    let text = toml::to_string_pretty(bindings)
        .map_err(|e| HotbindError::config(format!("failed to encode bindings: {e}")))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
        .map_err(|e| HotbindError::io(format!("failed to write {}", path.display()), e))?;
    log::debug!("saved bindings to {}", path.display());
    Ok(())
}

/// Read a bindings snapshot written by [`save_bindings`].
#[cfg(feature = "config")]
pub fn load_bindings(path: &Path) -> Result<SavedBindings> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| HotbindError::io(format!("failed to read {}", path.display()), e))?;
    toml::from_str(&text)
        .map_err(|e| HotbindError::config(format!("invalid bindings {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HotkeysConfig::default();
        assert_eq!(config.tick_rate_hz, 10);
        assert_eq!(config.axis_capture_window, 7);
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
    }

    #[cfg(feature = "config")]
    mod persistence {
        use super::super::*;
        use crate::binding::{AxisBinding, ClickBinding};

        #[test]
        fn partial_config_fills_defaults() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.toml");
            std::fs::write(&path, "tick_rate_hz = 30\n").unwrap();

            let config = HotkeysConfig::load(&path).unwrap();
            assert_eq!(config.tick_rate_hz, 30);
            assert_eq!(config.axis_capture_window, 7);
        }

        #[test]
        fn malformed_config_is_a_config_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.toml");
            std::fs::write(&path, "tick_rate_hz = \"fast\"\n").unwrap();
            assert!(matches!(
                HotkeysConfig::load(&path),
                Err(HotbindError::ConfigError { .. })
            ));
        }

        #[test]
        fn bindings_survive_a_save_and_load() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("bindings.toml");

            let mut saved = SavedBindings::default();
            saved.clicks.insert(
                "fire".to_string(),
                ClickBinding::key("ctrl+f").unwrap(),
            );
            saved
                .clicks
                .insert("zoom.up".to_string(), ClickBinding::button(0, 12));
            saved.axes.insert(
                "zoom".to_string(),
                AxisBinding::new(0, 1).with_deadzone(-0.1, 0.1),
            );

            save_bindings(&path, &saved).unwrap();
            assert_eq!(load_bindings(&path).unwrap(), saved);
        }

        #[test]
        fn missing_bindings_file_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            assert!(matches!(
                load_bindings(&dir.path().join("absent.toml")),
                Err(HotbindError::Io { .. })
            ));
        }
    }
}
