use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::aggregate::{Category, ScenarioResult};
use crate::dedup::trial_citation_counts;
use crate::io::columns;
use crate::math::stats::percentage;
use crate::model::{Citation, CitationTrialLink, Corpus, Guideline};
use crate::patterns::PatternSet;
use crate::recommend::{Recommendation, StakeholderAction};
use crate::scores::EvidenceRecord;

const IO_BUF_CAPACITY: usize = 1 << 16;

pub(crate) fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::with_capacity(IO_BUF_CAPACITY, file))
}

/// Tabs and line breaks inside free text would break the row layout.
pub(crate) fn cell(s: &str) -> String {
    s.chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

fn opt_cell(s: Option<&str>) -> String {
    s.map(cell).unwrap_or_else(|| "NA".to_string())
}

fn flag(b: bool) -> u8 {
    b as u8
}

/// `flag\tsnippet` pairs, one per pattern group in group order.
fn group_cells(record: &EvidenceRecord) -> String {
    let a = &record.annotation;
    a.flags
        .iter()
        .zip(&a.snippets)
        .map(|(f, s)| format!("{}\t{}", flag(*f), opt_cell(s.as_deref())))
        .collect::<Vec<_>>()
        .join("\t")
}

fn eligibility_cell(record: &EvidenceRecord) -> &'static str {
    record.eligibility_sex.map(|s| s.as_str()).unwrap_or("NA")
}

/// One row per citation, ordered by (guideline_id, cited_work_id).
pub fn write_annotated_citations(
    path: &Path,
    corpus: &Corpus,
    universe: &[EvidenceRecord],
    patterns: &PatternSet,
) -> Result<()> {
    if universe.len() != corpus.citations.len() {
        bail!(
            "annotated citation count mismatch: {} != {}",
            universe.len(),
            corpus.citations.len()
        );
    }
    let mut w = create(path)?;
    writeln!(
        w,
        "{}",
        columns::header(columns::ANNOTATED_CITATIONS, Some(patterns), columns::SCORE_TAIL)
    )?;
    let mut order: Vec<usize> = (0..universe.len()).collect();
    order.sort_by(|&a, &b| {
        let ca = &corpus.citations[universe[a].citation_idx];
        let cb = &corpus.citations[universe[b].citation_idx];
        ca.key().cmp(&cb.key())
    });
    for i in order {
        let record = &universe[i];
        let citation = &corpus.citations[record.citation_idx];
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            cell(&citation.guideline_id),
            cell(&citation.cited_work_id),
            opt_cell(citation.title.as_deref()),
            opt_cell(citation.abstract_text.as_deref()),
            flag(citation.classified_trial),
            opt_cell(citation.primary_trial_id.as_deref()),
            trial_ids_cell(citation),
            flag(record.registry_match),
            flag(record.registry_complete),
            eligibility_cell(record),
            flag(record.annotation.inclusive),
            group_cells(record),
            record.annotation.score
        )?;
    }
    w.flush()?;
    Ok(())
}

fn trial_ids_cell(citation: &Citation) -> String {
    let ids = citation.trial_ids();
    if ids.is_empty() {
        "NA".to_string()
    } else {
        ids.join(";")
    }
}

/// One row per trial id, ordered by trial id.
pub fn write_unique_trials(
    path: &Path,
    corpus: &Corpus,
    links: &[CitationTrialLink],
    unique_trials: &[EvidenceRecord],
    patterns: &PatternSet,
) -> Result<()> {
    let counts = trial_citation_counts(links, &corpus.citations);
    let mut w = create(path)?;
    writeln!(
        w,
        "{}",
        columns::header(columns::UNIQUE_TRIALS, Some(patterns), columns::SCORE_TAIL)
    )?;
    for record in unique_trials {
        let Some(trial_id) = record.trial_id.as_deref() else {
            bail!("unique-trial record without trial id");
        };
        let citation = &corpus.citations[record.citation_idx];
        let count = counts.get(trial_id).copied().unwrap_or_default();
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            cell(trial_id),
            cell(&citation.guideline_id),
            cell(&citation.cited_work_id),
            flag(record.registry_match),
            flag(record.registry_complete),
            eligibility_cell(record),
            count.citations,
            count.guidelines,
            group_cells(record),
            record.annotation.score
        )?;
    }
    w.flush()?;
    Ok(())
}

fn overall_value(metric: &str, result: &ScenarioResult) -> Result<String> {
    let corpus = &result.corpus;
    let e = &result.eligibility;
    let value = match metric {
        "scenario" => cell(&result.scenario),
        "label" => cell(&result.label),
        "data_source" => result.data_source.as_str().to_string(),
        "sex_verifiable" => flag(result.sex_verifiable).to_string(),
        "source_records" => result.source_size.to_string(),
        "matched_records" => corpus.matched.to_string(),
        "records_with_evidence" => corpus.with_evidence.to_string(),
        "evidence_pct" => format!("{:.6}", corpus.evidence_pct()),
        "mean_score" => format!("{:.6}", corpus.mean_score()),
        "evidence_mean_score" => format!("{:.6}", corpus.evidence_mean_score()),
        "median_score" => format!("{:.6}", result.median_score),
        "guidelines_total" => result.guidelines.len().to_string(),
        "guidelines_with_records" => result.guidelines_with_records().to_string(),
        "eligibility_all" => e.all.to_string(),
        "eligibility_male" => e.male.to_string(),
        "eligibility_female" => e.female.to_string(),
        "eligibility_unknown" => e.unknown.to_string(),
        "eligibility_no_registry" => e.no_registry.to_string(),
        other => bail!("no value for overall metric '{}'", other),
    };
    Ok(value)
}

pub fn write_scenario_overall(
    path: &Path,
    result: &ScenarioResult,
    patterns: &PatternSet,
) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", columns::header(columns::SCENARIO_OVERALL, None, &[]))?;
    for (metric, _) in columns::OVERALL_METRICS {
        if *metric == "group_<group>" {
            for (group, n) in patterns.groups.iter().zip(&result.group_counts) {
                writeln!(w, "group_{}\t{}", group.name, n)?;
            }
            continue;
        }
        writeln!(w, "{}\t{}", metric, overall_value(metric, result)?)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_scenario_guidelines(
    path: &Path,
    result: &ScenarioResult,
    guidelines: &BTreeMap<String, Guideline>,
) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", columns::header(columns::SCENARIO_GUIDELINES, None, &[]))?;
    for g in &result.guidelines {
        let meta = guidelines.get(&g.guideline_id);
        let year = meta
            .and_then(|m| m.publication_year)
            .map(|y| y.to_string())
            .unwrap_or_else(|| "NA".to_string());
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{}",
            cell(&g.guideline_id),
            opt_cell(meta.and_then(|m| m.title.as_deref())),
            year,
            opt_cell(meta.and_then(|m| m.specialty.as_deref())),
            g.tally.matched,
            g.tally.with_evidence,
            g.tally.evidence_pct(),
            g.tally.mean_score(),
            g.tally.evidence_mean_score(),
            g.category.label()
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_scenario_categories(path: &Path, result: &ScenarioResult) -> Result<()> {
    let total = result.guidelines.len();
    let mut w = create(path)?;
    writeln!(w, "{}", columns::header(columns::SCENARIO_CATEGORIES, None, &[]))?;
    for category in Category::ALL {
        let n = result.category_count(category);
        writeln!(
            w,
            "{}\t{}\t{:.6}",
            category.label(),
            n,
            percentage(n, total)
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_scenario_comparison(path: &Path, results: &[ScenarioResult]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", columns::comparison_header())?;
    for r in results {
        let counts = Category::ALL
            .iter()
            .map(|c| r.category_count(*c).to_string())
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{}\t{}",
            cell(&r.scenario),
            cell(&r.label),
            r.data_source.as_str(),
            flag(r.sex_verifiable),
            r.corpus.matched,
            r.corpus.with_evidence,
            r.corpus.evidence_pct(),
            r.corpus.evidence_mean_score(),
            r.guidelines_with_records(),
            counts
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_recommendations(path: &Path, recommendations: &[Recommendation]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", columns::header(columns::RECOMMENDATIONS, None, &[]))?;
    for r in recommendations {
        let snippets = if r.snippets.is_empty() {
            "NA".to_string()
        } else {
            r.snippets.iter().map(|s| cell(s)).collect::<Vec<_>>().join(" | ")
        };
        let stakeholders = r
            .stakeholders
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(";");
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.rule_id,
            cell(&r.scenario),
            r.priority.as_str(),
            r.guideline_ids.len(),
            cell(&r.guideline_ids.join(";")),
            cell(&r.rationale),
            snippets,
            stakeholders
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_stakeholder_actions(path: &Path, actions: &[StakeholderAction]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", columns::header(columns::STAKEHOLDER_ACTIONS, None, &[]))?;
    for a in actions {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            a.stakeholder.as_str(),
            a.priority.as_str(),
            a.rule_id,
            cell(&a.scenario),
            a.guidelines,
            cell(&a.action)
        )?;
    }
    w.flush()?;
    Ok(())
}
