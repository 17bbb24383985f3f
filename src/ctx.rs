use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::aggregate::{CategoryThresholds, ScenarioResult};
use crate::model::{Citation, CitationTrialLink, Corpus, Guideline, Trial};
use crate::patterns::PatternSet;
use crate::recommend::{Recommendation, StakeholderAction};
use crate::scenario::{AnnotatedDataset, ScenarioRegistry, ScenarioSelection};
use crate::schema::v1::SabvQcV1;
use crate::scores::annotate::AnnotateOptions;
use crate::scores::{EvidenceRecord, ScoringConfig};
use crate::validate::ValidationReport;

#[derive(Debug, Clone)]
pub struct InputPaths {
    pub citations: PathBuf,
    pub trials: PathBuf,
    pub guidelines: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub scenarios_dir: PathBuf,
    pub json_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            scenarios_dir: out_dir.join("scenarios"),
            json_path: out_dir.join("report.json"),
        }
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.out_dir.join(name)
    }

    pub fn scenario_dir(&self, scenario: &str) -> PathBuf {
        self.scenarios_dir.join(scenario)
    }
}

/// Parsed input rows before deduplication.
#[derive(Debug, Clone, Default)]
pub struct LoadedInputs {
    pub citations: Vec<Citation>,
    pub trials: Vec<Trial>,
    pub guidelines: Vec<Guideline>,
}

/// Counters reported at the end of a run and in `report.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub citations_read: usize,
    pub trials_read: usize,
    pub guidelines_read: usize,
    pub excluded_malformed_citations: usize,
    pub excluded_malformed_trials: usize,
    pub excluded_malformed_guidelines: usize,
    pub duplicate_citations_removed: usize,
    pub duplicate_trials_removed: usize,
    pub duplicate_guidelines_removed: usize,
    pub guidelines: usize,
    pub citations: usize,
    pub trials: usize,
    pub exploded_links: usize,
    pub unique_trials: usize,
    pub links_without_registry: usize,
    pub citations_with_evidence: usize,
}

#[derive(Debug)]
pub struct Ctx {
    pub inputs: InputPaths,
    pub pattern_path: Option<PathBuf>,
    pub scenario_path: Option<PathBuf>,
    pub write_json: bool,
    pub threads: usize,
    pub snippet_chars: usize,
    pub scoring: ScoringConfig,
    pub thresholds: CategoryThresholds,
    pub patterns: Option<PatternSet>,
    pub scenarios: Option<ScenarioRegistry>,
    pub loaded: Option<LoadedInputs>,
    pub corpus: Corpus,
    pub links: Vec<CitationTrialLink>,
    pub unique_links: Vec<usize>,
    pub universe: Vec<EvidenceRecord>,
    pub unique_trials: Vec<EvidenceRecord>,
    pub selections: Vec<ScenarioSelection>,
    pub scenario_results: Vec<ScenarioResult>,
    pub recommendations: Vec<Recommendation>,
    pub stakeholder_actions: Vec<StakeholderAction>,
    pub validation: ValidationReport,
    pub summary: RunSummary,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: Option<SabvQcV1>,
}

impl Ctx {
    pub fn new(inputs: InputPaths, out_dir: PathBuf, write_json: bool) -> Self {
        let defaults = AnnotateOptions::default();
        Self {
            inputs,
            pattern_path: None,
            scenario_path: None,
            write_json,
            threads: defaults.threads,
            snippet_chars: defaults.snippet_chars,
            scoring: ScoringConfig::default(),
            thresholds: CategoryThresholds::default(),
            patterns: None,
            scenarios: None,
            loaded: None,
            corpus: Corpus::default(),
            links: Vec::new(),
            unique_links: Vec::new(),
            universe: Vec::new(),
            unique_trials: Vec::new(),
            selections: Vec::new(),
            scenario_results: Vec::new(),
            recommendations: Vec::new(),
            stakeholder_actions: Vec::new(),
            validation: ValidationReport::default(),
            summary: RunSummary::default(),
            warnings: Vec::new(),
            output: OutputPaths::new(&out_dir),
            report: None,
        }
    }

    pub fn patterns(&self) -> Result<&PatternSet> {
        self.patterns.as_ref().context("pattern groups not loaded")
    }

    pub fn scenarios(&self) -> Result<&ScenarioRegistry> {
        self.scenarios.as_ref().context("scenario registry not loaded")
    }

    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            snippet_chars: self.snippet_chars,
            threads: self.threads,
        }
    }

    pub fn dataset(&self) -> AnnotatedDataset<'_> {
        AnnotatedDataset {
            citations: &self.corpus.citations,
            universe: &self.universe,
            unique_trials: &self.unique_trials,
        }
    }
}
