use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::dedup::{dedup_citations, dedup_guidelines, dedup_trials, unique_trial_links};
use crate::model::{Corpus, explode, guideline_universe};
use crate::pipeline::Stage;

pub struct Stage3Dedup;

impl Stage3Dedup {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Dedup {
    fn name(&self) -> &'static str {
        "stage3_dedup"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let loaded = ctx.loaded.take().context("inputs not loaded")?;

        let citations = dedup_citations(loaded.citations);
        let trials = dedup_trials(loaded.trials);
        let guidelines = dedup_guidelines(loaded.guidelines);
        if citations.removed > 0 {
            warn!(removed = citations.removed, "duplicate citation pairs removed");
        }
        if trials.removed > 0 {
            warn!(removed = trials.removed, "duplicate trial rows removed");
        }

        let universe = guideline_universe(guidelines.kept, &citations.kept);
        ctx.corpus = Corpus {
            guidelines: universe,
            citations: citations.kept,
            trials: trials.kept,
        };
        ctx.links = explode(&ctx.corpus.citations);
        ctx.unique_links = unique_trial_links(&ctx.links, &ctx.corpus);

        let without_registry = ctx
            .links
            .iter()
            .filter(|l| l.trial_id.as_deref().is_some_and(|id| ctx.corpus.trial(id).is_none()))
            .count();
        if without_registry > 0 {
            warn!(links = without_registry, "trial links without registry data");
            ctx.warnings.push(format!(
                "{} citation links name a trial absent from the registry",
                without_registry
            ));
        }

        let s = &mut ctx.summary;
        s.duplicate_citations_removed = citations.removed;
        s.duplicate_trials_removed = trials.removed;
        s.duplicate_guidelines_removed = guidelines.removed;
        s.guidelines = ctx.corpus.guidelines.len();
        s.citations = ctx.corpus.citations.len();
        s.trials = ctx.corpus.trials.len();
        s.exploded_links = ctx.links.len();
        s.unique_trials = ctx.unique_links.len();
        s.links_without_registry = without_registry;

        info!(
            guidelines = s.guidelines,
            citations = s.citations,
            links = s.exploded_links,
            unique_trials = s.unique_trials,
            "corpus_ready"
        );
        Ok(())
    }
}
