use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub citations: String,
    pub trials: String,
    pub guidelines: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMeta {
    pub pattern_version: String,
    pub scenario_version: String,
    pub pattern_groups: Vec<PatternGroupMeta>,
    pub snippet_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternGroupMeta {
    pub name: String,
    pub weight_class: String,
    pub patterns: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub citations_read: u64,
    pub trials_read: u64,
    pub guidelines_read: u64,
    pub excluded_malformed_citations: u64,
    pub excluded_malformed_trials: u64,
    pub excluded_malformed_guidelines: u64,
    pub duplicate_citations_removed: u64,
    pub duplicate_trials_removed: u64,
    pub duplicate_guidelines_removed: u64,
    pub guidelines: u64,
    pub citations: u64,
    pub trials: u64,
    pub exploded_links: u64,
    pub unique_trials: u64,
    pub links_without_registry: u64,
    pub citations_with_evidence: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub name: String,
    pub severity: String,
    pub passed: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EligibilityCounts {
    pub all: u64,
    pub male: u64,
    pub female: u64,
    pub unknown: u64,
    pub no_registry: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOverall {
    pub name: String,
    pub label: String,
    pub data_source: String,
    pub sex_verifiable: bool,
    pub source_records: u64,
    pub matched_records: u64,
    pub records_with_evidence: u64,
    pub evidence_pct: f64,
    pub mean_score: f64,
    pub evidence_mean_score: f64,
    pub median_score: f64,
    pub guidelines_total: u64,
    pub guidelines_with_records: u64,
    pub categories: BTreeMap<String, u64>,
    pub eligibility: EligibilityCounts,
    pub pattern_groups: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub rule_id: String,
    pub scenario: String,
    pub priority: String,
    pub guidelines: Vec<String>,
    pub rationale: String,
    pub snippets: Vec<String>,
    pub stakeholders: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SabvQcV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub config: ConfigMeta,
    pub run_summary: RunSummary,
    pub validation: Vec<ValidationEntry>,
    pub scenarios: Vec<ScenarioOverall>,
    pub recommendations: Vec<RecommendationEntry>,
}

impl SabvQcV1 {
    pub fn empty(tool_version: &str) -> Self {
        Self {
            tool: "kira-sabvqc".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input_meta: InputMeta {
                citations: String::new(),
                trials: String::new(),
                guidelines: None,
            },
            config: ConfigMeta {
                pattern_version: String::new(),
                scenario_version: String::new(),
                pattern_groups: Vec::new(),
                snippet_chars: 0,
            },
            run_summary: RunSummary::default(),
            validation: Vec::new(),
            scenarios: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}
