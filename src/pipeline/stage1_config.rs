use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::patterns::load_pattern_set;
use crate::pipeline::Stage;
use crate::scenario::load_registry;

/// Loads and checks every configurable input before any data is touched.
pub struct Stage1Config;

impl Stage1Config {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Config {
    fn name(&self) -> &'static str {
        "stage1_config"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.scoring.validate()?;
        let patterns = load_pattern_set(ctx.pattern_path.as_deref())?;
        let scenarios = load_registry(ctx.scenario_path.as_deref())?;
        info!(
            pattern_version = %patterns.version,
            groups = patterns.len(),
            scenario_version = %scenarios.version,
            scenarios = scenarios.len(),
            "config_loaded"
        );
        ctx.patterns = Some(patterns);
        ctx.scenarios = Some(scenarios);
        Ok(())
    }
}
