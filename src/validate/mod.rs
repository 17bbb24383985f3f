use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::model::{CitationTrialLink, Corpus, is_registry_id};

const MAX_CITATIONS_PER_TRIAL: f64 = 10.0;
const MAX_EXAMPLES: usize = 5;
const MULTI_TRIAL_INFO: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// `severity` is what a failure of this check means; passed checks keep it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationCheck {
    pub name: String,
    pub severity: Severity,
    pub passed: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    fn push(&mut self, name: &str, severity: Severity, passed: bool, message: String) {
        self.checks.push(ValidationCheck {
            name: name.to_string(),
            severity,
            passed,
            message,
        });
    }

    pub fn failed(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn has_errors(&self) -> bool {
        self.failed().any(|c| c.severity == Severity::Error)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }
}

/// Structural checks over the deduplicated corpus, its exploded links and the
/// representative link chosen per trial id.
pub fn validate_datasets(
    corpus: &Corpus,
    links: &[CitationTrialLink],
    unique: &[usize],
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut pairs = HashSet::new();
    let dup_pairs = corpus
        .citations
        .iter()
        .filter(|c| !pairs.insert(c.key()))
        .count();
    report.push(
        "unique_citation_pairs",
        Severity::Error,
        dup_pairs == 0,
        format!("{} duplicate (guideline, cited work) pairs", dup_pairs),
    );

    let mut unique_ids = HashSet::new();
    let mut dup_unique = 0usize;
    for &i in unique {
        if let Some(id) = links[i].trial_id.as_deref() {
            if !unique_ids.insert(id) {
                dup_unique += 1;
            }
        }
    }
    report.push(
        "unique_trial_ids",
        Severity::Error,
        dup_unique == 0,
        format!("{} duplicate trial ids in the unique-trial set", dup_unique),
    );

    let distinct: BTreeSet<&str> = links.iter().filter_map(|l| l.trial_id.as_deref()).collect();
    report.push(
        "unique_trial_coverage",
        Severity::Error,
        unique.len() == distinct.len(),
        format!(
            "{} unique-trial records for {} distinct trial ids",
            unique.len(),
            distinct.len()
        ),
    );

    let mut per_citation = vec![0usize; corpus.citations.len()];
    for link in links {
        if let Some(n) = per_citation.get_mut(link.citation_idx) {
            *n += 1;
        }
    }
    let bad_rows = corpus
        .citations
        .iter()
        .zip(&per_citation)
        .filter(|(c, n)| **n != c.trial_ids().len().max(1))
        .count();
    report.push(
        "exploded_row_counts",
        Severity::Error,
        links.len() >= corpus.citations.len() && bad_rows == 0,
        format!(
            "{} exploded rows for {} citations, {} citations with unexpected row count",
            links.len(),
            corpus.citations.len(),
            bad_rows
        ),
    );

    let irregular: Vec<&str> = distinct
        .iter()
        .copied()
        .chain(corpus.trials.keys().map(|s| s.as_str()))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .filter(|id| !is_registry_id(id))
        .collect();
    let examples: Vec<&str> = irregular.iter().take(MAX_EXAMPLES).copied().collect();
    report.push(
        "trial_id_format",
        Severity::Warning,
        irregular.is_empty(),
        if irregular.is_empty() {
            "all trial ids match NCT########".to_string()
        } else {
            format!(
                "{} trial ids do not match NCT########: {}",
                irregular.len(),
                examples.join(", ")
            )
        },
    );

    let trial_links = links.iter().filter(|l| l.trial_id.is_some()).count();
    let ratio = if unique.is_empty() {
        0.0
    } else {
        trial_links as f64 / unique.len() as f64
    };
    report.push(
        "citation_trial_ratio",
        Severity::Warning,
        ratio <= MAX_CITATIONS_PER_TRIAL,
        format!(
            "{:.2} citation links per unique trial (possible cartesian product above {:.0})",
            ratio, MAX_CITATIONS_PER_TRIAL
        ),
    );

    let without_registry = distinct
        .iter()
        .filter(|id| corpus.trial(id).is_none())
        .count();
    report.push(
        "registry_coverage",
        Severity::Info,
        without_registry == 0,
        format!(
            "{} of {} linked trial ids have no registry record",
            without_registry,
            distinct.len()
        ),
    );

    let multi_trial = corpus
        .citations
        .iter()
        .filter(|c| c.trial_ids().len() >= MULTI_TRIAL_INFO)
        .count();
    report.push(
        "multi_trial_citations",
        Severity::Info,
        multi_trial == 0,
        format!(
            "{} citations name at least {} trial ids",
            multi_trial, MULTI_TRIAL_INFO
        ),
    );

    report
}
