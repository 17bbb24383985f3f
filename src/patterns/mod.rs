mod loader;
mod matcher;

use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

pub use loader::{load_builtin_v1, load_pattern_tsv, merge_defs};
pub use matcher::{GroupHit, GroupMatches, match_fields, match_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightClass {
    High,
    Medium,
    Info,
}

impl WeightClass {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternGroupDef {
    pub name: String,
    pub weight_class: WeightClass,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PatternGroup {
    pub name: String,
    pub weight_class: WeightClass,
    pub patterns: Vec<String>,
    regexes: Vec<Regex>,
}

impl PatternGroup {
    pub fn regexes(&self) -> &[Regex] {
        &self.regexes
    }
}

/// Compiled pattern groups in declaration order. Group order is also the
/// column order of every per-group output.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub version: String,
    pub groups: Vec<PatternGroup>,
}

impl PatternSet {
    pub fn compile(version: &str, defs: Vec<PatternGroupDef>) -> Result<Self> {
        if defs.is_empty() {
            bail!("pattern configuration declares no groups");
        }
        let mut groups = Vec::with_capacity(defs.len());
        for def in defs {
            if def.patterns.is_empty() {
                bail!("pattern group '{}' has no expressions", def.name);
            }
            let mut regexes = Vec::with_capacity(def.patterns.len());
            for expr in &def.patterns {
                let re = RegexBuilder::new(expr)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| {
                        format!("pattern group '{}': invalid expression '{}'", def.name, expr)
                    })?;
                regexes.push(re);
            }
            groups.push(PatternGroup {
                name: def.name,
                weight_class: def.weight_class,
                patterns: def.patterns,
                regexes,
            });
        }
        Ok(Self {
            version: version.to_string(),
            groups,
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }

    pub fn weight_classes(&self) -> Vec<WeightClass> {
        self.groups.iter().map(|g| g.weight_class).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }
}

pub fn load_builtin() -> Result<Vec<PatternGroupDef>> {
    load_builtin_v1()
}

pub fn load_user(path: &Path) -> Result<Vec<PatternGroupDef>> {
    load_pattern_tsv(path)
}

/// Built-in groups overlaid with an optional user file, compiled.
pub fn load_pattern_set(user: Option<&Path>) -> Result<PatternSet> {
    let mut defs = load_builtin()?;
    let mut version = "v1".to_string();
    if let Some(path) = user {
        let user_defs = load_user(path)?;
        defs = merge_defs(defs, user_defs);
        version = format!("v1+{}", path.display());
    }
    PatternSet::compile(&version, defs)
}
