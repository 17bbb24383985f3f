use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::validate::validate_datasets;

pub struct Stage5Validate;

impl Stage5Validate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Validate {
    fn name(&self) -> &'static str {
        "stage5_validate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let report = validate_datasets(&ctx.corpus, &ctx.links, &ctx.unique_links);
        for check in report.failed() {
            warn!(
                check = %check.name,
                severity = check.severity.as_str(),
                message = %check.message,
                "validation check failed"
            );
            ctx.warnings
                .push(format!("validation {}: {}", check.name, check.message));
        }
        info!(
            passed = report.passed_count(),
            total = report.checks.len(),
            "validation_done"
        );
        ctx.validation = report;
        Ok(())
    }
}
