use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scenario::evaluate;

pub struct Stage6Scenarios;

impl Stage6Scenarios {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Scenarios {
    fn name(&self) -> &'static str {
        "stage6_scenarios"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let dataset = ctx.dataset();
        let mut selections = Vec::with_capacity(ctx.scenarios()?.len());
        for def in ctx.scenarios()?.iter() {
            let selection = evaluate(def, dataset);
            info!(
                scenario = %def.name,
                source = def.data_source.as_str(),
                records = selection.count(),
                "scenario_selected"
            );
            selections.push(selection);
        }
        ctx.selections = selections;
        Ok(())
    }
}
