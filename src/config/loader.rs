// src/config/loader.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::EngineConfig;

pub const ENV_CONFIG_PATH: &str = "REVIEW_RANK_CONFIG_PATH";
pub const ENV_CONFIDENCE: &str = "REVIEW_RANK_CONFIDENCE";
pub const ENV_TOP_N: &str = "REVIEW_RANK_TOP_N";

pub const DEFAULT_CONFIG_TOML: &str = "config/review_rank.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/review_rank.json";

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing config {}", path.display()))
}

/// Load config using env var + fallbacks, then apply env overrides:
/// 1) $REVIEW_RANK_CONFIG_PATH (must exist)
/// 2) config/review_rank.toml
/// 3) config/review_rank.json
/// 4) built-in defaults
pub fn load_config_default() -> Result<EngineConfig> {
    let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        load_config_from(&pb)?
    } else if Path::new(DEFAULT_CONFIG_TOML).exists() {
        load_config_from(Path::new(DEFAULT_CONFIG_TOML))?
    } else if Path::new(DEFAULT_CONFIG_JSON).exists() {
        load_config_from(Path::new(DEFAULT_CONFIG_JSON))?
    } else {
        info!("no config file found, using defaults");
        EngineConfig::default()
    };
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Apply `REVIEW_RANK_CONFIDENCE` / `REVIEW_RANK_TOP_N` on top of `cfg`.
/// Values that do not parse are ignored with a warning; range checks are
/// left to `EngineConfig::validate`.
pub fn apply_env_overrides(cfg: &mut EngineConfig) {
    if let Some(c) = parse_env::<f64>(ENV_CONFIDENCE) {
        cfg.scoring.confidence = c;
    }
    if let Some(n) = parse_env::<usize>(ENV_TOP_N) {
        cfg.scoring.top_n = n;
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparsable env override");
            None
        }
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<EngineConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        // No usable extension: JSON documents start with `{`.
        _ if s.trim_start().starts_with('{') => Ok(serde_json::from_str(s)?),
        _ => Ok(toml::from_str(s)?),
    }
}
