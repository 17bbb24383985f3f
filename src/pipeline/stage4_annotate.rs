use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::annotate::{annotate_citations, annotate_unique_trials};

pub struct Stage4Annotate;

impl Stage4Annotate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Annotate {
    fn name(&self) -> &'static str {
        "stage4_annotate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let patterns = ctx.patterns()?;
        let opts = ctx.annotate_options();
        let universe = annotate_citations(&ctx.corpus, patterns, &ctx.scoring, opts)?;
        let unique = annotate_unique_trials(
            &ctx.corpus,
            &ctx.links,
            &ctx.unique_links,
            patterns,
            &ctx.scoring,
            opts,
        )?;

        let with_evidence = universe
            .iter()
            .filter(|r| r.annotation.has_evidence())
            .count();
        info!(
            citations = universe.len(),
            with_evidence,
            unique_trials = unique.len(),
            "annotation_done"
        );
        ctx.summary.citations_with_evidence = with_evidence;
        ctx.universe = universe;
        ctx.unique_trials = unique;
        Ok(())
    }
}
