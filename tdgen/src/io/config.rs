//! Generator configuration stored in `tdgen.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::output::write_atomic;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tdgen.toml";

/// Generator configuration (TOML). Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Title used when `produce` is not given one.
    pub title: String,

    /// Indent the produced document.
    pub pretty: bool,

    /// Treat duplicate names within a section as an ingestion error.
    pub strict_names: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            title: "Thing".to_string(),
            pretty: false,
            strict_names: false,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(anyhow!("title must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GeneratorConfig::default()`.
pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    if !path.exists() {
        let cfg = GeneratorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GeneratorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

pub fn write_config(path: &Path, cfg: &GeneratorConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}
