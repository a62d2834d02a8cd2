// src/config.rs
//! Briefed configuration: feed sources, pipeline knobs, category rules.
//!
//! Resolution order:
//! 1) `$BRIEFED_CONFIG_PATH` (must exist)
//! 2) `config/briefed.toml`
//! 3) built-in defaults
//!
//! `$BRIEFED_OUTPUT_PATH` overrides `pipeline.output_path` afterwards.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::categorize::CategoryRules;
use crate::ingest::http::DEFAULT_USER_AGENT;
use crate::ingest::types::FeedSource;
use crate::pipeline::DEFAULT_ITEMS_PER_SOURCE;
use crate::summarize::DEFAULT_SUMMARY_SENTENCES;

pub const DEFAULT_CONFIG_PATH: &str = "config/briefed.toml";
pub const ENV_CONFIG_PATH: &str = "BRIEFED_CONFIG_PATH";
pub const ENV_OUTPUT_PATH: &str = "BRIEFED_OUTPUT_PATH";

/// Startup-time problems. Fatal for the binaries.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no feed sources configured")]
    NoSources,
    #[error("source #{index} has an empty name")]
    BlankName { index: usize },
    #[error("duplicate source name `{0}`")]
    DuplicateName(String),
    #[error("source `{name}` has an invalid url `{url}`: {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },
    #[error("pipeline.{0} must be greater than zero")]
    Zero(&'static str),
}

fn default_items_per_source() -> usize {
    DEFAULT_ITEMS_PER_SOURCE
}
fn default_summary_sentences() -> usize {
    DEFAULT_SUMMARY_SENTENCES
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_output_path() -> PathBuf {
    PathBuf::from("index.html")
}
fn default_page_title() -> String {
    "Briefed".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSection {
    #[serde(default = "default_items_per_source")]
    pub items_per_source: usize,
    #[serde(default = "default_summary_sentences")]
    pub summary_sentences: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            items_per_source: default_items_per_source(),
            summary_sentences: default_summary_sentences(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            output_path: default_output_path(),
            page_title: default_page_title(),
        }
    }
}

impl PipelineSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefedConfig {
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub sources: Vec<FeedSource>,
    #[serde(default)]
    pub categories: CategoryRules,
}

impl BriefedConfig {
    /// The feed list and rules the site shipped with.
    pub fn default_seed() -> Self {
        let sources = [
            ("Marketing Dive", "https://www.marketingdive.com/feeds/news/"),
            (
                "Adweek Technology",
                "https://www.adweek.com/category/technology/feed/",
            ),
            (
                "Social Media Today",
                "https://www.socialmediatoday.com/feeds/news/",
            ),
            ("MarTech", "https://martech.org/feed/"),
            ("B2B Marketing", "https://www.b2bmarketing.net/feed/"),
            ("American Marketing Association", "https://www.ama.org/feed/"),
        ]
        .into_iter()
        .map(|(n, u)| FeedSource::new(n, u))
        .collect();

        Self {
            pipeline: PipelineSection::default(),
            sources,
            categories: CategoryRules::default_seed(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: BriefedConfig = toml::from_str(s).context("parsing briefed config toml")?;
        cfg.clean();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Trim names/urls; the rest is checked by `validate`.
    fn clean(&mut self) {
        for s in self.sources.iter_mut() {
            s.name = s.name.trim().to_string();
            s.url = s.url.trim().to_string();
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.pipeline.summary_sentences == 0 {
            return Err(ConfigError::Zero("summary_sentences"));
        }
        if self.pipeline.timeout_secs == 0 {
            return Err(ConfigError::Zero("timeout_secs"));
        }

        let mut seen = HashSet::new();
        for (index, s) in self.sources.iter().enumerate() {
            if s.name.is_empty() {
                return Err(ConfigError::BlankName { index });
            }
            if !seen.insert(s.name.to_lowercase()) {
                return Err(ConfigError::DuplicateName(s.name.clone()));
            }
            validate_url(s)?;
        }
        Ok(())
    }
}

fn validate_url(s: &FeedSource) -> std::result::Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name: s.name.clone(),
        url: s.url.clone(),
        reason,
    };
    let url = reqwest::Url::parse(&s.url).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme `{other}`"))),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".into()));
    }
    Ok(())
}

/// Load from an explicit path.
pub fn load_config_from(path: &Path) -> Result<BriefedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading briefed config from {}", path.display()))?;
    BriefedConfig::from_toml_str(&content)
        .with_context(|| format!("invalid briefed config at {}", path.display()))
}

/// Load using env var + fallbacks, then apply env overrides.
pub fn load_config_default() -> Result<BriefedConfig> {
    let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        load_config_from(&pb)?
    } else {
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            load_config_from(&default_p)?
        } else {
            tracing::info!("no config file found, using built-in feed list");
            BriefedConfig::default_seed()
        }
    };

    if let Ok(out) = std::env::var(ENV_OUTPUT_PATH) {
        if !out.trim().is_empty() {
            cfg.pipeline.output_path = PathBuf::from(out.trim());
        }
    }
    Ok(cfg)
}
