mod eval;
mod loader;

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use eval::{AnnotatedDataset, FieldValue, ScenarioSelection, evaluate, field_value, matches};
pub use loader::{ScenarioFile, load_builtin_v1, load_scenario_json, merge_defs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Citations,
    UniqueTrials,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Citations => "citations",
            Self::UniqueTrials => "unique_trials",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    GuidelineId,
    CitedWorkId,
    ClassifiedTrial,
    PrimaryTrialId,
    TrialIds,
    RegistryMatch,
    RegistryComplete,
    EligibilitySex,
    Title,
    Abstract,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Text,
    List,
    Int,
}

impl RecordField {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::ClassifiedTrial | Self::RegistryMatch | Self::RegistryComplete => FieldKind::Bool,
            Self::GuidelineId
            | Self::CitedWorkId
            | Self::PrimaryTrialId
            | Self::EligibilitySex
            | Self::Title
            | Self::Abstract => FieldKind::Text,
            Self::TrialIds => FieldKind::List,
            Self::Score => FieldKind::Int,
        }
    }
}

/// Declarative record filter. Every primitive reads one field of one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Predicate {
    #[default]
    All,
    Equals { field: RecordField, value: Value },
    NotNull { field: RecordField },
    Contains { field: RecordField, value: String },
    And { all: Vec<Predicate> },
    Or { any: Vec<Predicate> },
    Not { inner: Box<Predicate> },
}

impl Predicate {
    pub fn check(&self) -> Result<()> {
        match self {
            Self::All => Ok(()),
            Self::Equals { field, value } => {
                let ok = match (field.kind(), value) {
                    (_, Value::Null) => true,
                    (FieldKind::Bool, Value::Bool(_)) => true,
                    (FieldKind::Text | FieldKind::List, Value::String(_)) => true,
                    (FieldKind::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
                    _ => false,
                };
                if !ok {
                    bail!("equals: value {} does not fit field {:?}", value, field);
                }
                Ok(())
            }
            Self::NotNull { .. } => Ok(()),
            Self::Contains { field, .. } => match field.kind() {
                FieldKind::Text | FieldKind::List => Ok(()),
                _ => bail!("contains: field {:?} is not text or a list", field),
            },
            Self::And { all: parts } | Self::Or { any: parts } => {
                if parts.is_empty() {
                    bail!("and/or predicate with no operands");
                }
                parts.iter().try_for_each(Predicate::check)
            }
            Self::Not { inner } => inner.check(),
        }
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioDef {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub data_source: DataSource,
    pub sex_verifiable: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub predicate: Predicate,
}

/// Scenario definitions of one run, sorted by (order, name). Built once and
/// passed explicitly to every stage that needs it.
#[derive(Debug, Clone)]
pub struct ScenarioRegistry {
    pub version: String,
    defs: Vec<ScenarioDef>,
}

impl ScenarioRegistry {
    pub fn from_defs(version: &str, mut defs: Vec<ScenarioDef>) -> Result<Self> {
        if defs.is_empty() {
            bail!("scenario configuration declares no scenarios");
        }
        let mut names = HashSet::new();
        for def in &defs {
            if def.name.trim().is_empty() {
                bail!("scenario with empty name");
            }
            // Names become output directories under scenarios/.
            if !SCENARIO_NAME_RE.is_match(&def.name) || def.name == "." || def.name == ".." {
                bail!("scenario name '{}' is not a single path segment", def.name);
            }
            if !names.insert(def.name.as_str()) {
                bail!("duplicate scenario '{}'", def.name);
            }
            def.predicate
                .check()
                .map_err(|e| anyhow::anyhow!("scenario '{}': {}", def.name, e))?;
        }
        defs.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(Self {
            version: version.to_string(),
            defs,
        })
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

static SCENARIO_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("scenario name regex"));

pub fn load_registry(user: Option<&Path>) -> Result<ScenarioRegistry> {
    let builtin = load_builtin_v1()?;
    let mut version = builtin.version.clone();
    let mut defs = builtin.scenarios;
    if let Some(path) = user {
        let file = load_scenario_json(path)?;
        version = format!("{}+{}", version, file.version);
        defs = merge_defs(defs, file.scenarios);
    }
    ScenarioRegistry::from_defs(&version, defs)
}
