use anyhow::{Context, Result};
use bonfire_session::StoreConfig;
use bonfire_sync::SyncConfig;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "BONFIRE_CONFIG";
pub const GRAPH_ENV: &str = "BONFIRE_GRAPH";
pub const SEED_ENV: &str = "BONFIRE_SEED";
pub const VIEWER_POLL_ENV: &str = "BONFIRE_VIEWER_POLL_MS";

/// File-backed settings for the `bonfire-viz` binary.
///
/// Every section is optional; missing keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub graph: GraphSection,
    pub layout: LayoutSection,
    pub session: SessionSection,
    pub sync: SyncSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSection {
    /// JSON graph payload; the built-in sample when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSection {
    pub seed: Option<u64>,
    pub canvas: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub expiry_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            expiry_secs: StoreConfig::default().expiry.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSection {
    pub viewer_poll_ms: u64,
    pub remote_poll_ms: u64,
    pub manual_pause_ms: u64,
    pub frame_ms: u64,
}

impl Default for SyncSection {
    fn default() -> Self {
        let defaults = SyncConfig::default();
        Self {
            viewer_poll_ms: millis(defaults.viewer_poll),
            remote_poll_ms: millis(defaults.remote_poll),
            manual_pause_ms: millis(defaults.manual_pause),
            frame_ms: millis(defaults.frame_interval),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl VizConfig {
    /// Read `path`, or the file named by `BONFIRE_CONFIG`, then apply
    /// environment overrides. No file at all means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        for warning in config.apply_overrides(|key| env::var(key).ok()) {
            warn!("{warning}");
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `BONFIRE_*` overrides read through `lookup`. Unparsable values
    /// are skipped and reported back as warnings.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(path) = lookup(GRAPH_ENV).filter(|v| !v.trim().is_empty()) {
            self.graph.path = Some(PathBuf::from(path.trim()));
        }
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse() {
                Ok(seed) => self.layout.seed = Some(seed),
                Err(_) => warnings.push(format!("Ignoring {SEED_ENV}={raw:?}: not an integer")),
            }
        }
        if let Some(raw) = lookup(VIEWER_POLL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.sync.viewer_poll_ms = ms,
                _ => warnings.push(format!(
                    "Ignoring {VIEWER_POLL_ENV}={raw:?}: expected milliseconds > 0"
                )),
            }
        }
        warnings
    }

    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            expiry: Duration::from_secs(self.session.expiry_secs),
        }
    }

    #[must_use]
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            viewer_poll: Duration::from_millis(self.sync.viewer_poll_ms.max(1)),
            remote_poll: Duration::from_millis(self.sync.remote_poll_ms.max(1)),
            manual_pause: Duration::from_millis(self.sync.manual_pause_ms),
            frame_interval: Duration::from_millis(self.sync.frame_ms.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_component_defaults() {
        let config = VizConfig::default();
        assert_eq!(config.sync_config(), SyncConfig::default());
        assert_eq!(config.store_config().expiry, Duration::from_secs(1800));
        assert_eq!(config.graph.path, None);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[layout]\nseed = 7\n\n[sync]\nviewer_poll_ms = 250\n\n[session]\nexpiry_secs = 60\n"
        )
        .unwrap();

        let config = VizConfig::from_file(file.path()).unwrap();
        assert_eq!(config.layout.seed, Some(7));
        assert_eq!(config.layout.canvas, None);
        assert_eq!(config.sync.viewer_poll_ms, 250);
        assert_eq!(config.sync.remote_poll_ms, 2000);
        assert_eq!(config.store_config().expiry, Duration::from_secs(60));
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[layout\nseed = ").unwrap();
        let err = VizConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let mut config = VizConfig::from_toml("[graph]\npath = \"a.json\"\n").unwrap();
        let warnings = config.apply_overrides(lookup(&[
            (GRAPH_ENV, "b.json"),
            (SEED_ENV, "42"),
            (VIEWER_POLL_ENV, "100"),
        ]));
        assert!(warnings.is_empty());
        assert_eq!(config.graph.path, Some(PathBuf::from("b.json")));
        assert_eq!(config.layout.seed, Some(42));
        assert_eq!(config.sync_config().viewer_poll, Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_overrides_are_warnings() {
        let mut config = VizConfig::default();
        let warnings =
            config.apply_overrides(lookup(&[(SEED_ENV, "soon"), (VIEWER_POLL_ENV, "0")]));
        assert_eq!(warnings.len(), 2);
        assert_eq!(config, VizConfig::default());
    }
}
