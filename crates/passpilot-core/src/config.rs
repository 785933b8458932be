//! passpilot configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::embedding::DEFAULT_DIMENSION;
use crate::simulation::{MasteryCurve, SimulationConfig, DEFAULT_TRIALS};

/// Top-level passpilot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassPilotConfig {
    /// Directory of JSON question files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub topics: TopicSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub pass_rules: PassRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Number of hash buckets per embedding vector.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Minimum similarity for a search hit.
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f32,
    /// Maximum number of hits.
    #[serde(default = "default_top_k")]
    pub top_k: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSettings {
    /// Minimum frequency for topic analysis.
    #[serde(default = "default_min_frequency")]
    pub min_frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_trials")]
    pub trials: u32,
    /// Fixed seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_mastery_floor")]
    pub mastery_floor: f64,
    #[serde(default = "default_mastery_ceiling")]
    pub mastery_ceiling: f64,
}

/// Marks thresholds used to derive the external-marks target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRules {
    /// Minimum marks in the external exam.
    #[serde(default = "default_external_pass")]
    pub external_pass_threshold: f64,
    /// Minimum internal + external total.
    #[serde(default = "default_overall_pass")]
    pub overall_pass_threshold: f64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./exam_data")
}
fn default_dimension() -> usize {
    DEFAULT_DIMENSION
}
fn default_threshold() -> f32 {
    0.5
}
fn default_top_k() -> i64 {
    20
}
fn default_min_frequency() -> usize {
    2
}
fn default_trials() -> u32 {
    DEFAULT_TRIALS
}
fn default_mastery_floor() -> f64 {
    MasteryCurve::default().floor
}
fn default_mastery_ceiling() -> f64 {
    MasteryCurve::default().ceiling
}
fn default_external_pass() -> f64 {
    40.0
}
fn default_overall_pass() -> f64 {
    75.0
}

impl Default for PassPilotConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            embedding: EmbeddingSettings::default(),
            search: SearchSettings::default(),
            topics: TopicSettings::default(),
            simulation: SimulationSettings::default(),
            pass_rules: PassRules::default(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: default_threshold(),
            top_k: default_top_k(),
        }
    }
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            min_frequency: default_min_frequency(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            seed: None,
            mastery_floor: default_mastery_floor(),
            mastery_ceiling: default_mastery_ceiling(),
        }
    }
}

impl Default for PassRules {
    fn default() -> Self {
        Self {
            external_pass_threshold: default_external_pass(),
            overall_pass_threshold: default_overall_pass(),
        }
    }
}

impl SimulationSettings {
    /// Simulation parameters for the analyzer.
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig {
            trials: self.trials,
            seed: self.seed,
            curve: MasteryCurve {
                floor: self.mastery_floor,
                ceiling: self.mastery_ceiling,
            },
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `passpilot.toml` in the current directory
/// 2. `~/.config/passpilot/config.toml`
///
/// `PASSPILOT_DATA_DIR` overrides `data_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<PassPilotConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("passpilot.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PassPilotConfig::default(),
    };

    if let Ok(dir) = std::env::var("PASSPILOT_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<PassPilotConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("passpilot"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_PASSPILOT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_PASSPILOT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_PASSPILOT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_PASSPILOT_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = PassPilotConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./exam_data"));
        assert_eq!(config.search.top_k, 20);
        assert_eq!(config.topics.min_frequency, 2);
        assert_eq!(config.simulation.trials, 10_000);
        assert_eq!(config.pass_rules.external_pass_threshold, 40.0);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
data_dir = "/srv/exams"

[search]
top_k = 5

[simulation]
seed = 1234
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/exams"));
        assert_eq!(config.search.top_k, 5);
        assert_eq!(config.search.similarity_threshold, 0.5);
        assert_eq!(config.simulation.seed, Some(1234));
        assert_eq!(config.simulation.to_config().curve, MasteryCurve::default());
        assert_eq!(config.embedding.dimension, DEFAULT_DIMENSION);
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let err = load_config_from(Some(Path::new("/no/such/passpilot.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passpilot.toml");
        std::fs::write(&path, "[topics]\nmin_frequency = 3\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.topics.min_frequency, 3);
    }
}
