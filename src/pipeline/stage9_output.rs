use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{docs, json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage9Output;

impl Stage9Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage9Output {
    fn name(&self) -> &'static str {
        "stage9_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let out = &ctx.output;
        let patterns = ctx.patterns()?;

        tsv_writer::write_annotated_citations(
            &out.file("annotated_citations.tsv"),
            &ctx.corpus,
            &ctx.universe,
            patterns,
        )?;
        tsv_writer::write_unique_trials(
            &out.file("unique_trials.tsv"),
            &ctx.corpus,
            &ctx.links,
            &ctx.unique_trials,
            patterns,
        )?;

        for result in &ctx.scenario_results {
            let dir = out.scenario_dir(&result.scenario);
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            tsv_writer::write_scenario_overall(&dir.join("overall.tsv"), result, patterns)?;
            tsv_writer::write_scenario_guidelines(
                &dir.join("guidelines.tsv"),
                result,
                &ctx.corpus.guidelines,
            )?;
            tsv_writer::write_scenario_categories(&dir.join("categories.tsv"), result)?;
        }
        tsv_writer::write_scenario_comparison(
            &out.file("scenario_comparison.tsv"),
            &ctx.scenario_results,
        )?;
        tsv_writer::write_recommendations(&out.file("recommendations.tsv"), &ctx.recommendations)?;
        tsv_writer::write_stakeholder_actions(
            &out.file("stakeholder_actions.tsv"),
            &ctx.stakeholder_actions,
        )?;

        docs::write_data_dictionary(&out.file("data_dictionary.tsv"))?;
        docs::write_scoring_methodology(
            &out.file("scoring_methodology.tsv"),
            &ctx.scoring,
            &ctx.thresholds,
        )?;
        docs::write_pattern_groups(&out.file("pattern_groups.tsv"), patterns, &ctx.scoring)?;

        let report = json_writer::build_report(ctx)?;
        if ctx.write_json {
            json_writer::write_json(&ctx.output.json_path, &report)?;
        }
        ctx.report = Some(report);

        info!("stage9_output_ready");
        Ok(())
    }
}
