use anyhow::{Result, bail};
use tracing::info;

use crate::aggregate::aggregate_scenario;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage7Aggregate;

impl Stage7Aggregate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Aggregate {
    fn name(&self) -> &'static str {
        "stage7_aggregate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let scenarios = ctx.scenarios()?;
        if scenarios.len() != ctx.selections.len() {
            bail!("scenario selections missing");
        }
        let n_groups = ctx.patterns()?.len();
        let guideline_ids = ctx.corpus.guideline_ids();
        let dataset = ctx.dataset();

        let mut results = Vec::with_capacity(scenarios.len());
        for (def, selection) in scenarios.iter().zip(&ctx.selections) {
            let result = aggregate_scenario(
                def,
                selection,
                dataset,
                &guideline_ids,
                &ctx.thresholds,
                n_groups,
                ctx.threads,
            )?;
            info!(
                scenario = %result.scenario,
                matched = result.corpus.matched,
                with_evidence = result.corpus.with_evidence,
                guidelines_with_records = result.guidelines_with_records(),
                "scenario_aggregated"
            );
            results.push(result);
        }
        ctx.scenario_results = results;
        Ok(())
    }
}
