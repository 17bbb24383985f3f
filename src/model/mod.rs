use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static REGISTRY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^NCT\d{8}$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guideline {
    pub id: String,
    pub title: Option<String>,
    pub publication_year: Option<u16>,
    pub specialty: Option<String>,
}

impl Guideline {
    pub fn bare(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            publication_year: None,
            specialty: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EligibilitySex {
    All,
    Male,
    Female,
    Unknown,
}

impl EligibilitySex {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" | "both" => Self::All,
            "male" | "males" | "men" => Self::Male,
            "female" | "females" | "women" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }

    pub fn includes_women(&self) -> bool {
        matches!(self, Self::All | Self::Female)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub guideline_id: String,
    pub cited_work_id: String,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub classified_trial: bool,
    pub primary_trial_id: Option<String>,
    pub all_trial_ids: Vec<String>,
}

impl Citation {
    pub fn key(&self) -> (&str, &str) {
        (&self.guideline_id, &self.cited_work_id)
    }

    /// Distinct trial ids, primary first, then in list order.
    pub fn trial_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for id in self
            .primary_trial_id
            .iter()
            .chain(self.all_trial_ids.iter())
        {
            if seen.insert(id.as_str()) {
                out.push(id.as_str());
            }
        }
        out
    }

    pub fn has_trial_id(&self) -> bool {
        self.primary_trial_id.is_some() || !self.all_trial_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    pub trial_id: String,
    pub eligibility_sex: EligibilitySex,
    pub official_title: Option<String>,
    pub description: Option<String>,
    pub eligibility_criteria: Option<String>,
    pub outcome_measures: Option<String>,
    pub registry_complete: bool,
}

impl Trial {
    pub fn text_fields(&self) -> [Option<&str>; 4] {
        [
            self.official_title.as_deref(),
            self.description.as_deref(),
            self.eligibility_criteria.as_deref(),
            self.outcome_measures.as_deref(),
        ]
    }

    pub fn filled_text_fields(&self) -> usize {
        self.text_fields()
            .iter()
            .filter(|f| f.is_some_and(|s| !s.trim().is_empty()))
            .count()
    }
}

/// One row of the exploded citation/trial view. `trial_id` is `None` for a
/// citation without any trial identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationTrialLink {
    pub citation_idx: usize,
    pub trial_id: Option<String>,
}

/// Expands every citation into its trial links. A citation with N distinct
/// trial ids yields N rows, one without ids yields a single null row.
pub fn explode(citations: &[Citation]) -> Vec<CitationTrialLink> {
    let mut links = Vec::with_capacity(citations.len());
    for (idx, citation) in citations.iter().enumerate() {
        let ids = citation.trial_ids();
        if ids.is_empty() {
            links.push(CitationTrialLink {
                citation_idx: idx,
                trial_id: None,
            });
            continue;
        }
        for id in ids {
            links.push(CitationTrialLink {
                citation_idx: idx,
                trial_id: Some(id.to_string()),
            });
        }
    }
    links
}

pub fn canonical_trial_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

pub fn split_trial_ids(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for part in raw.split(|c: char| c == ';' || c == ',' || c == '|' || c.is_whitespace()) {
        if let Some(id) = canonical_trial_id(part) {
            if seen.insert(id.clone()) {
                out.push(id);
            }
        }
    }
    out
}

pub fn is_registry_id(id: &str) -> bool {
    REGISTRY_ID.is_match(id)
}

/// Deduplicated inputs of one run. Guidelines cover every id referenced by a
/// citation, not only those present in the guideline table.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub guidelines: BTreeMap<String, Guideline>,
    pub citations: Vec<Citation>,
    pub trials: BTreeMap<String, Trial>,
}

impl Corpus {
    pub fn trial(&self, id: &str) -> Option<&Trial> {
        self.trials.get(id)
    }

    pub fn linked_trials(&self, citation: &Citation) -> Vec<&Trial> {
        citation
            .trial_ids()
            .into_iter()
            .filter_map(|id| self.trials.get(id))
            .collect()
    }

    pub fn guideline_ids(&self) -> Vec<String> {
        self.guidelines.keys().cloned().collect()
    }
}

pub fn guideline_universe(
    mut guidelines: BTreeMap<String, Guideline>,
    citations: &[Citation],
) -> BTreeMap<String, Guideline> {
    for citation in citations {
        guidelines
            .entry(citation.guideline_id.clone())
            .or_insert_with(|| Guideline::bare(&citation.guideline_id));
    }
    guidelines
}
