use crate::rules::StyleRule;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub targets: Vec<Target>,
    pub rules: Vec<StyleRule>,
}

/// A file rewritten in place, and the line printed once it has been written.
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    pub label: String,
    pub path: PathBuf,
    pub notice: String,
}

// An operator file may override either section; the other keeps its default.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    targets: Option<Vec<Target>>,
    rules: Option<Vec<StyleRule>>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The built-in rule set and the two dashboard targets.
pub fn defaults() -> Result<Config, ConfigError> {
    let cfg: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(cfg)
}

/// Loads `explicit` if given, otherwise the built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => parse_raw(&fs::read_to_string(path)?),
        None => defaults(),
    }
}

pub fn parse_raw(raw: &str) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(raw)?;
    let base = defaults()?;
    Ok(Config {
        targets: file.targets.unwrap_or(base.targets),
        rules: file.rules.unwrap_or(base.rules),
    })
}
