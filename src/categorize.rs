// src/categorize.rs
//! # Categorizer
//!
//! Assigns coarse topic labels to an entry:
//!
//! - Source overrides tag every item of a named source (case-insensitive).
//! - AI and Research keyword lists are matched on word boundaries.
//! - Rules are unioned; `General` only when nothing else matched.
//!
//! The keyword lists are plain data (`CategoryRules`), compiled once into a
//! `Categorizer`. Nothing here is global, so tests can inject their own lists.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Topic label. Non-exclusive: one entry may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "AI", alias = "ai")]
    Ai,
    #[serde(rename = "B2B", alias = "b2b")]
    B2b,
    #[serde(rename = "Research", alias = "research")]
    Research,
    #[serde(rename = "General", alias = "general")]
    General,
}

impl Category {
    /// Display order for tabs.
    pub const ALL: [Category; 4] = [
        Category::Ai,
        Category::B2b,
        Category::Research,
        Category::General,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Ai => "AI",
            Category::B2b => "B2B",
            Category::Research => "Research",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A source that is always tagged with `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOverride {
    pub source: String,
    pub category: Category,
}

/// Raw, uncompiled rules (config shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    #[serde(default)]
    pub source_overrides: Vec<SourceOverride>,
    #[serde(default)]
    pub ai_keywords: Vec<String>,
    #[serde(default)]
    pub research_keywords: Vec<String>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl CategoryRules {
    /// Built-in lists used when no config file provides its own.
    pub fn default_seed() -> Self {
        let ai = [
            "ai",
            "a.i.",
            "artificial intelligence",
            "machine learning",
            "deep learning",
            "generative ai",
            "genai",
            "chatgpt",
            "gpt",
            "llm",
            "large language model",
            "openai",
            "chatbot",
            "neural network",
            "copilot",
        ];
        let research = [
            "study",
            "research",
            "survey",
            "report",
            "whitepaper",
            "analysis",
            "insight",
            "insights",
            "academic",
            "institute",
            "data-driven",
            "benchmark",
            "findings",
        ];
        Self {
            source_overrides: vec![
                SourceOverride {
                    source: "B2B Marketing".into(),
                    category: Category::B2b,
                },
                SourceOverride {
                    source: "American Marketing Association".into(),
                    category: Category::Research,
                },
            ],
            ai_keywords: ai.iter().map(|s| s.to_string()).collect(),
            research_keywords: research.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Compiled rules.
#[derive(Debug, Clone)]
pub struct Categorizer {
    overrides: Vec<(String, Category)>,
    ai: Option<Regex>,
    research: Option<Regex>,
}

impl Categorizer {
    pub fn new(rules: &CategoryRules) -> anyhow::Result<Self> {
        let overrides = rules
            .source_overrides
            .iter()
            .map(|o| (o.source.trim().to_lowercase(), o.category))
            .filter(|(s, _)| !s.is_empty())
            .collect();
        Ok(Self {
            overrides,
            ai: compile_keywords("ai", &rules.ai_keywords)?,
            research: compile_keywords("research", &rules.research_keywords)?,
        })
    }

    /// Categories for `source` given the combined title + summary `text`.
    pub fn categorize(&self, source: &str, text: &str) -> HashSet<Category> {
        let mut cats = HashSet::new();

        let source_norm = source.trim().to_lowercase();
        for (name, cat) in &self.overrides {
            if *name == source_norm {
                cats.insert(*cat);
            }
        }

        let text = text.to_lowercase();
        if self.ai.as_ref().is_some_and(|re| re.is_match(&text)) {
            cats.insert(Category::Ai);
        }
        if self.research.as_ref().is_some_and(|re| re.is_match(&text)) {
            cats.insert(Category::Research);
        }

        if cats.is_empty() {
            cats.insert(Category::General);
        }
        cats
    }
}

/// One alternation per list: `(?i)(?:^|\W)(?:kw1|kw2)(?:$|\W)`.
///
/// Plain `\b` would fail on keywords that start or end in punctuation
/// (`a.i.`), so the anchors are "non-word char or edge" instead.
fn compile_keywords(list_name: &str, keywords: &[String]) -> anyhow::Result<Option<Regex>> {
    let alts: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .map(|k| regex::escape(&k))
        .collect();
    if alts.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"(?i)(?:^|\W)(?:{})(?:$|\W)", alts.join("|"));
    let re = Regex::new(&pattern)
        .map_err(|e| anyhow::anyhow!("{} keyword list regex error: {}", list_name, e))?;
    Ok(Some(re))
}
