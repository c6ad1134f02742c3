use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::extraction::skills::DictionaryMode;
use crate::matching::scoring::{ScoringStrategy, DEFAULT_TOP_N};

/// Application configuration loaded from environment variables.
/// Every variable has a default; an unparsable value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub jobs_csv_path: PathBuf,
    pub skill_dictionary_path: Option<PathBuf>,
    pub skill_dictionary_mode: DictionaryMode,
    pub scoring_strategy: ScoringStrategy,
    pub top_n: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            jobs_csv_path: PathBuf::from("data/training_data.csv"),
            skill_dictionary_path: None,
            skill_dictionary_mode: DictionaryMode::Extend,
            scoring_strategy: ScoringStrategy::Overlap,
            top_n: DEFAULT_TOP_N,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let top_n = parse_or(&lookup, "TOP_N", defaults.top_n)?;
        if top_n == 0 {
            return Err(anyhow!("TOP_N must be at least 1"));
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            jobs_csv_path: lookup("JOBS_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.jobs_csv_path),
            skill_dictionary_path: lookup("SKILL_DICTIONARY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            skill_dictionary_mode: parse_or(
                &lookup,
                "SKILL_DICTIONARY_MODE",
                defaults.skill_dictionary_mode,
            )?,
            scoring_strategy: parse_or(&lookup, "SCORING_STRATEGY", defaults.scoring_strategy)?,
            top_n,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Environment variable '{key}' has invalid value '{raw}': {e}")),
    }
}
