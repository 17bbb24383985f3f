use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::{Ctx, LoadedInputs};
use crate::io::citations::read_citations;
use crate::io::guidelines::read_guidelines;
use crate::io::trials::read_trials;
use crate::pipeline::Stage;

pub struct Stage2Input;

impl Stage2Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Input {
    fn name(&self) -> &'static str {
        "stage2_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let citations = read_citations(&ctx.inputs.citations)?;
        let trials = read_trials(&ctx.inputs.trials)?;
        let guidelines = match &ctx.inputs.guidelines {
            Some(path) => read_guidelines(path)?,
            None => Default::default(),
        };

        let s = &mut ctx.summary;
        s.citations_read = citations.records.len() + citations.malformed;
        s.trials_read = trials.records.len() + trials.malformed;
        s.guidelines_read = guidelines.records.len() + guidelines.malformed;
        s.excluded_malformed_citations = citations.malformed;
        s.excluded_malformed_trials = trials.malformed;
        s.excluded_malformed_guidelines = guidelines.malformed;

        for (what, n) in [
            ("citation", citations.malformed),
            ("trial", trials.malformed),
            ("guideline", guidelines.malformed),
        ] {
            if n > 0 {
                warn!(kind = what, rows = n, "malformed rows excluded");
                ctx.warnings.push(format!("{} malformed {} rows excluded", n, what));
            }
        }

        info!(
            citations = citations.records.len(),
            trials = trials.records.len(),
            guidelines = guidelines.records.len(),
            "inputs_loaded"
        );
        ctx.loaded = Some(LoadedInputs {
            citations: citations.records,
            trials: trials.records,
            guidelines: guidelines.records,
        });
        Ok(())
    }
}
