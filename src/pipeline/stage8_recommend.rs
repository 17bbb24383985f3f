use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::recommend::{generate, stakeholder_actions};

pub struct Stage8Recommend;

impl Stage8Recommend {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage8Recommend {
    fn name(&self) -> &'static str {
        "stage8_recommend"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let group_names = ctx.patterns()?.names();
        let recommendations = generate(
            &ctx.scenario_results,
            &ctx.selections,
            ctx.dataset(),
            &group_names,
        );
        let actions = stakeholder_actions(&recommendations);
        info!(
            recommendations = recommendations.len(),
            actions = actions.len(),
            "recommendations_ready"
        );
        ctx.recommendations = recommendations;
        ctx.stakeholder_actions = actions;
        Ok(())
    }
}
