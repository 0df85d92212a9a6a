use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Environment override for [`ShortestPathConfig::revalidate_on_run`].
pub const REVALIDATE_ENV: &str = "WAYFIND_REVALIDATE_ON_RUN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WayfindConfig {
    #[serde(default)]
    pub shortest_path: ShortestPathConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathConfig {
    /// Re-check every structural precondition (non-empty, directed, every
    /// edge weighted and non-negative) when a run starts. When `false`, a
    /// run only re-checks weights.
    #[serde(default = "default_true")]
    pub revalidate_on_run: bool,
}

impl Default for ShortestPathConfig {
    fn default() -> Self {
        Self {
            revalidate_on_run: default_true(),
        }
    }
}

/// Defaults for `wayfind-sim` campaigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub seed_start: u64,
    #[serde(default = "default_seed_count")]
    pub seed_count: u64,
    #[serde(default = "default_node_count")]
    pub node_count: usize,
    /// Chance, in percent, that any ordered node pair gets an edge.
    #[serde(default = "default_edge_percent")]
    pub edge_percent: u8,
    /// Edge weights are drawn from `0..=max_weight`.
    #[serde(default = "default_max_weight")]
    pub max_weight: u32,
    #[serde(default = "default_mutation_rounds")]
    pub mutation_rounds: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed_start: 0,
            seed_count: default_seed_count(),
            node_count: default_node_count(),
            edge_percent: default_edge_percent(),
            max_weight: default_max_weight(),
            mutation_rounds: default_mutation_rounds(),
        }
    }
}

impl WayfindConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or a key has the
    /// wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse wayfind config")
    }
}

/// Load a config file, falling back to defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<WayfindConfig> {
    if !path.exists() {
        return Ok(WayfindConfig::default());
    }

    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<WayfindConfig>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// [`load_config`] followed by environment overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the override is not a
/// recognised boolean.
pub fn resolve_config(path: &Path) -> Result<WayfindConfig> {
    let config = load_config(path)?;
    apply_overrides(config, env::var(REVALIDATE_ENV).ok())
}

fn apply_overrides(mut config: WayfindConfig, revalidate: Option<String>) -> Result<WayfindConfig> {
    if let Some(raw) = revalidate {
        config.shortest_path.revalidate_on_run = parse_flag(&raw)
            .with_context(|| format!("Invalid {REVALIDATE_ENV} value '{raw}'. Expected true or false."))?;
    }
    Ok(config)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}

const fn default_seed_count() -> u64 {
    100
}

const fn default_node_count() -> usize {
    24
}

const fn default_edge_percent() -> u8 {
    20
}

const fn default_max_weight() -> u32 {
    50
}

const fn default_mutation_rounds() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = load_config(&dir.path().join("wayfind.toml")).expect("defaults");

        assert_eq!(config, WayfindConfig::default());
        assert!(config.shortest_path.revalidate_on_run);
        assert_eq!(config.sim.seed_count, 100);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("wayfind.toml");
        std::fs::write(
            &path,
            "[shortest_path]\nrevalidate_on_run = false\n\n[sim]\nnode_count = 8\n",
        )
        .expect("write config");

        let config = load_config(&path).expect("valid config");
        assert!(!config.shortest_path.revalidate_on_run);
        assert_eq!(config.sim.node_count, 8);
        assert_eq!(config.sim.edge_percent, 20);
        assert_eq!(config.sim.mutation_rounds, 4);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[sim]\nnode_count = \"many\"\n").expect("write config");

        let err = load_config(&path).expect_err("wrong type");
        assert!(format!("{err:#}").contains("broken.toml"));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            WayfindConfig::from_toml_str("").expect("empty is valid"),
            WayfindConfig::default()
        );
    }

    #[test]
    fn env_override_accepts_common_spellings() {
        for (raw, expected) in [("1", true), ("yes", true), (" ON ", true), ("false", false), ("off", false)] {
            let config = apply_overrides(WayfindConfig::default(), Some(raw.to_string())).expect("recognised flag");
            assert_eq!(config.shortest_path.revalidate_on_run, expected, "raw value {raw:?}");
        }
    }

    #[test]
    fn env_override_rejects_garbage() {
        let err = apply_overrides(WayfindConfig::default(), Some("sometimes".into())).expect_err("not a flag");
        assert!(err.to_string().contains(REVALIDATE_ENV));
    }

    #[test]
    fn absent_override_leaves_config_alone() {
        let mut base = WayfindConfig::default();
        base.shortest_path.revalidate_on_run = false;
        let config = apply_overrides(base.clone(), None).expect("no override");
        assert_eq!(config, base);
    }
}
