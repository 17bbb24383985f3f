use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_config;
pub mod stage2_input;
pub mod stage3_dedup;
pub mod stage4_annotate;
pub mod stage5_validate;
pub mod stage6_scenarios;
pub mod stage7_aggregate;
pub mod stage8_recommend;
pub mod stage9_output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        info!(stages = self.stages.len(), "pipeline started");
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}

/// Every stage of a `run`, in order.
pub fn full_pipeline() -> Pipeline {
    Pipeline::new(vec![
        Box::new(stage0_scaffold::Stage0Scaffold::new()),
        Box::new(stage1_config::Stage1Config::new()),
        Box::new(stage2_input::Stage2Input::new()),
        Box::new(stage3_dedup::Stage3Dedup::new()),
        Box::new(stage4_annotate::Stage4Annotate::new()),
        Box::new(stage5_validate::Stage5Validate::new()),
        Box::new(stage6_scenarios::Stage6Scenarios::new()),
        Box::new(stage7_aggregate::Stage7Aggregate::new()),
        Box::new(stage8_recommend::Stage8Recommend::new()),
        Box::new(stage9_output::Stage9Output::new()),
    ])
}

/// Loading, deduplication and validation only; writes nothing.
pub fn validation_pipeline() -> Pipeline {
    Pipeline::new(vec![
        Box::new(stage2_input::Stage2Input::new()),
        Box::new(stage3_dedup::Stage3Dedup::new()),
        Box::new(stage5_validate::Stage5Validate::new()),
    ])
}
