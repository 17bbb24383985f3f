pub mod categorize;

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, bail};
use serde::Serialize;

pub use categorize::{Category, CategoryThresholds, categorize};

use crate::math::reduce_mt::{Mergeable, map_ordered, merge_all};
use crate::math::stats::{mean, median, percentage};
use crate::model::EligibilitySex;
use crate::scenario::{AnnotatedDataset, DataSource, ScenarioDef, ScenarioSelection};
use crate::scores::EvidenceRecord;

/// Additive per-guideline counters. Evidence means "score > 0", so the score
/// sum is also the sum over evidence-bearing records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GuidelineTally {
    pub matched: usize,
    pub with_evidence: usize,
    pub score_sum: u64,
}

impl GuidelineTally {
    pub fn add(&mut self, record: &EvidenceRecord) {
        self.matched += 1;
        if record.annotation.has_evidence() {
            self.with_evidence += 1;
        }
        self.score_sum += record.annotation.score as u64;
    }

    pub fn evidence_pct(&self) -> f64 {
        percentage(self.with_evidence, self.matched)
    }

    pub fn mean_score(&self) -> f64 {
        mean(self.score_sum, self.matched)
    }

    pub fn evidence_mean_score(&self) -> f64 {
        mean(self.score_sum, self.with_evidence)
    }
}

impl Mergeable for GuidelineTally {
    fn merge(&mut self, other: &Self) {
        self.matched += other.matched;
        self.with_evidence += other.with_evidence;
        self.score_sum += other.score_sum;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EligibilityBreakdown {
    pub all: usize,
    pub male: usize,
    pub female: usize,
    pub unknown: usize,
    pub no_registry: usize,
}

impl EligibilityBreakdown {
    pub fn add(&mut self, record: &EvidenceRecord) {
        match record.eligibility_sex {
            Some(EligibilitySex::All) => self.all += 1,
            Some(EligibilitySex::Male) => self.male += 1,
            Some(EligibilitySex::Female) => self.female += 1,
            Some(EligibilitySex::Unknown) => self.unknown += 1,
            None => self.no_registry += 1,
        }
    }

    pub fn registry_matched(&self) -> usize {
        self.all + self.male + self.female + self.unknown
    }
}

impl Mergeable for EligibilityBreakdown {
    fn merge(&mut self, other: &Self) {
        self.all += other.all;
        self.male += other.male;
        self.female += other.female;
        self.unknown += other.unknown;
        self.no_registry += other.no_registry;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuidelineStats {
    pub guideline_id: String,
    pub tally: GuidelineTally,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub label: String,
    pub description: String,
    pub data_source: DataSource,
    pub sex_verifiable: bool,
    pub source_size: usize,
    pub corpus: GuidelineTally,
    pub median_score: f64,
    pub eligibility: EligibilityBreakdown,
    pub group_counts: Vec<usize>,
    pub guidelines: Vec<GuidelineStats>,
    pub category_counts: BTreeMap<Category, usize>,
}

impl ScenarioResult {
    pub fn guidelines_with_records(&self) -> usize {
        self.guidelines.iter().filter(|g| g.tally.matched > 0).count()
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn guidelines_in(&self, category: Category) -> Vec<&str> {
        self.guidelines
            .iter()
            .filter(|g| g.category == category)
            .map(|g| g.guideline_id.as_str())
            .collect()
    }
}

/// Per-guideline statistics and corpus rollup for one scenario. The rollup
/// is the sum of the per-guideline tallies and must equal a direct pass over
/// the selection; category counts must cover every guideline.
pub fn aggregate_scenario(
    def: &ScenarioDef,
    selection: &ScenarioSelection,
    dataset: AnnotatedDataset<'_>,
    guideline_ids: &[String],
    thresholds: &CategoryThresholds,
    n_groups: usize,
    threads: usize,
) -> Result<ScenarioResult> {
    let known: BTreeSet<&str> = guideline_ids.iter().map(|s| s.as_str()).collect();
    let mut by_guideline: BTreeMap<&str, Vec<&EvidenceRecord>> = BTreeMap::new();
    for record in selection.records(dataset) {
        let gid = dataset.citation(record).guideline_id.as_str();
        if !known.contains(gid) {
            bail!(
                "aggregation inconsistency: scenario '{}' selected a record of unknown guideline '{}'",
                def.name,
                gid
            );
        }
        by_guideline.entry(gid).or_default().push(record);
    }

    let guidelines = map_ordered(guideline_ids, threads, |gid| {
        let mut tally = GuidelineTally::default();
        if let Some(records) = by_guideline.get(gid.as_str()) {
            for record in records {
                tally.add(record);
            }
        }
        GuidelineStats {
            guideline_id: gid.clone(),
            category: categorize(&tally, thresholds),
            tally,
        }
    })?;

    let corpus: GuidelineTally = merge_all(guidelines.iter().map(|g| &g.tally));

    let mut direct = GuidelineTally::default();
    let mut eligibility = EligibilityBreakdown::default();
    let mut group_counts = vec![0usize; n_groups];
    let mut scores = Vec::with_capacity(selection.count());
    for record in selection.records(dataset) {
        direct.add(record);
        eligibility.add(record);
        scores.push(record.annotation.score);
        for (i, flag) in record.annotation.flags.iter().enumerate() {
            if *flag && i < n_groups {
                group_counts[i] += 1;
            }
        }
    }
    reconcile(&def.name, &corpus, &direct)?;

    let mut category_counts: BTreeMap<Category, usize> =
        Category::ALL.iter().map(|c| (*c, 0usize)).collect();
    for g in &guidelines {
        *category_counts.entry(g.category).or_insert(0) += 1;
    }
    let categorized: usize = category_counts.values().sum();
    if categorized != guideline_ids.len() {
        bail!(
            "aggregation inconsistency: scenario '{}' categorized {} guidelines, corpus has {}",
            def.name,
            categorized,
            guideline_ids.len()
        );
    }

    Ok(ScenarioResult {
        scenario: def.name.clone(),
        label: def.label.clone(),
        description: def.description.clone(),
        data_source: def.data_source,
        sex_verifiable: def.sex_verifiable,
        source_size: dataset.source(def.data_source).len(),
        corpus,
        median_score: median(&mut scores),
        eligibility,
        group_counts,
        guidelines,
        category_counts,
    })
}

pub fn reconcile(scenario: &str, summed: &GuidelineTally, direct: &GuidelineTally) -> Result<()> {
    if summed != direct {
        bail!(
            "aggregation inconsistency: scenario '{}' per-guideline sums {:?} do not match corpus totals {:?}",
            scenario,
            summed,
            direct
        );
    }
    Ok(())
}
