use std::fmt::Write;

use anyhow::Result;

use crate::aggregate::Category;
use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let s = &ctx.summary;
    let mut out = String::new();
    writeln!(out, "kira-sabvqc summary")?;
    writeln!(
        out,
        "inputs: {} citations, {} trials, {} guidelines read",
        s.citations_read, s.trials_read, s.guidelines_read
    )?;
    writeln!(
        out,
        "excluded: {} malformed citations, {} malformed trials, {} malformed guidelines",
        s.excluded_malformed_citations, s.excluded_malformed_trials, s.excluded_malformed_guidelines
    )?;
    writeln!(
        out,
        "duplicates removed: {} citations, {} trials",
        s.duplicate_citations_removed, s.duplicate_trials_removed
    )?;
    writeln!(
        out,
        "corpus: {} guidelines, {} citations, {} links, {} unique trials ({} without registry data)",
        s.guidelines, s.citations, s.exploded_links, s.unique_trials, s.links_without_registry
    )?;
    writeln!(out, "citations with evidence: {}", s.citations_with_evidence)?;

    writeln!(out, "scenarios:")?;
    for r in &ctx.scenario_results {
        let counts = Category::ALL
            .iter()
            .map(|c| format!("{}={}", c.slug(), r.category_count(*c)))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            out,
            "  {}: {} records, {:.1}% with evidence, mean {:.2} | {}",
            r.scenario,
            r.corpus.matched,
            r.corpus.evidence_pct(),
            r.corpus.evidence_mean_score(),
            counts
        )?;
    }

    writeln!(
        out,
        "validation: {}/{} checks passed",
        ctx.validation.passed_count(),
        ctx.validation.checks.len()
    )?;
    writeln!(out, "recommendations: {}", ctx.recommendations.len())?;
    writeln!(out, "output: {}", ctx.output.out_dir.display())?;
    Ok(out)
}
