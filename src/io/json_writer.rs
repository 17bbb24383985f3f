use std::path::Path;

use anyhow::{Context, Result};

use crate::aggregate::{Category, ScenarioResult};
use crate::ctx::{Ctx, RunSummary};
use crate::math::stats::round6;
use crate::schema::v1::{
    ConfigMeta, EligibilityCounts, InputMeta, PatternGroupMeta, RecommendationEntry,
    RunSummary as RunSummaryV1, SabvQcV1, ScenarioOverall, ValidationEntry,
};

pub fn build_report(ctx: &Ctx) -> Result<SabvQcV1> {
    let patterns = ctx.patterns()?;
    let scenarios = ctx.scenarios()?;
    let group_names = patterns.names();

    let input_meta = InputMeta {
        citations: ctx.inputs.citations.display().to_string(),
        trials: ctx.inputs.trials.display().to_string(),
        guidelines: ctx.inputs.guidelines.as_ref().map(|p| p.display().to_string()),
    };

    let config = ConfigMeta {
        pattern_version: patterns.version.clone(),
        scenario_version: scenarios.version.clone(),
        pattern_groups: patterns
            .groups
            .iter()
            .map(|g| PatternGroupMeta {
                name: g.name.clone(),
                weight_class: g.weight_class.as_str().to_string(),
                patterns: g.patterns.len(),
            })
            .collect(),
        snippet_chars: ctx.snippet_chars,
    };

    let validation = ctx
        .validation
        .checks
        .iter()
        .map(|c| ValidationEntry {
            name: c.name.clone(),
            severity: c.severity.as_str().to_string(),
            passed: c.passed,
            message: c.message.clone(),
        })
        .collect();

    let scenarios_out = ctx
        .scenario_results
        .iter()
        .map(|r| scenario_overall(r, &group_names))
        .collect();

    let recommendations = ctx
        .recommendations
        .iter()
        .map(|r| RecommendationEntry {
            rule_id: r.rule_id.clone(),
            scenario: r.scenario.clone(),
            priority: r.priority.as_str().to_string(),
            guidelines: r.guideline_ids.clone(),
            rationale: r.rationale.clone(),
            snippets: r.snippets.clone(),
            stakeholders: r.stakeholders.iter().map(|s| s.as_str().to_string()).collect(),
        })
        .collect();

    Ok(SabvQcV1 {
        tool: "kira-sabvqc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input_meta,
        config,
        run_summary: run_summary(&ctx.summary),
        validation,
        scenarios: scenarios_out,
        recommendations,
    })
}

fn scenario_overall(result: &ScenarioResult, group_names: &[&str]) -> ScenarioOverall {
    let corpus = &result.corpus;
    let e = &result.eligibility;
    ScenarioOverall {
        name: result.scenario.clone(),
        label: result.label.clone(),
        data_source: result.data_source.as_str().to_string(),
        sex_verifiable: result.sex_verifiable,
        source_records: result.source_size as u64,
        matched_records: corpus.matched as u64,
        records_with_evidence: corpus.with_evidence as u64,
        evidence_pct: round6(corpus.evidence_pct()),
        mean_score: round6(corpus.mean_score()),
        evidence_mean_score: round6(corpus.evidence_mean_score()),
        median_score: round6(result.median_score),
        guidelines_total: result.guidelines.len() as u64,
        guidelines_with_records: result.guidelines_with_records() as u64,
        categories: Category::ALL
            .iter()
            .map(|c| (c.label().to_string(), result.category_count(*c) as u64))
            .collect(),
        eligibility: EligibilityCounts {
            all: e.all as u64,
            male: e.male as u64,
            female: e.female as u64,
            unknown: e.unknown as u64,
            no_registry: e.no_registry as u64,
        },
        pattern_groups: group_names
            .iter()
            .zip(&result.group_counts)
            .map(|(name, n)| (name.to_string(), *n as u64))
            .collect(),
    }
}

fn run_summary(s: &RunSummary) -> RunSummaryV1 {
    RunSummaryV1 {
        citations_read: s.citations_read as u64,
        trials_read: s.trials_read as u64,
        guidelines_read: s.guidelines_read as u64,
        excluded_malformed_citations: s.excluded_malformed_citations as u64,
        excluded_malformed_trials: s.excluded_malformed_trials as u64,
        excluded_malformed_guidelines: s.excluded_malformed_guidelines as u64,
        duplicate_citations_removed: s.duplicate_citations_removed as u64,
        duplicate_trials_removed: s.duplicate_trials_removed as u64,
        duplicate_guidelines_removed: s.duplicate_guidelines_removed as u64,
        guidelines: s.guidelines as u64,
        citations: s.citations as u64,
        trials: s.trials as u64,
        exploded_links: s.exploded_links as u64,
        unique_trials: s.unique_trials as u64,
        links_without_registry: s.links_without_registry as u64,
        citations_with_evidence: s.citations_with_evidence as u64,
    }
}

pub fn write_json(path: &Path, report: &SabvQcV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
