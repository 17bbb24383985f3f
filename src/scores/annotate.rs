use anyhow::Result;

use crate::math::reduce_mt::map_ordered;
use crate::model::{Citation, CitationTrialLink, Corpus, Trial};
use crate::patterns::{PatternSet, match_fields};
use crate::scores::composite::composite_score;
use crate::scores::{EvidenceAnnotation, EvidenceRecord, ScoringConfig};

#[derive(Debug, Clone, Copy)]
pub struct AnnotateOptions {
    pub snippet_chars: usize,
    pub threads: usize,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            snippet_chars: 80,
            threads: 0,
        }
    }
}

/// Scores a citation against its own text and every linked trial that has
/// registry data. Trials absent from the registry contribute nothing.
pub fn annotate(
    citation: &Citation,
    trials: &[&Trial],
    patterns: &PatternSet,
    scoring: &ScoringConfig,
    snippet_chars: usize,
) -> EvidenceAnnotation {
    let mut fields: Vec<Option<&str>> = Vec::with_capacity(2 + 4 * trials.len());
    fields.push(citation.title.as_deref());
    fields.push(citation.abstract_text.as_deref());
    for trial in trials {
        fields.extend(trial.text_fields());
    }
    let matches = match_fields(patterns, fields, snippet_chars);
    let inclusive = trials.iter().any(|t| t.eligibility_sex.includes_women());
    let score = composite_score(
        scoring,
        &patterns.weight_classes(),
        &matches.flags,
        inclusive,
    );
    EvidenceAnnotation {
        flags: matches.flags,
        snippets: matches.snippets,
        inclusive,
        score,
    }
}

fn record_for(
    citation_idx: usize,
    citation: &Citation,
    trials: &[&Trial],
    trial_id: Option<String>,
    patterns: &PatternSet,
    scoring: &ScoringConfig,
    snippet_chars: usize,
) -> EvidenceRecord {
    let first = trials.first();
    EvidenceRecord {
        citation_idx,
        trial_id,
        registry_match: first.is_some(),
        registry_complete: trials.iter().any(|t| t.registry_complete),
        eligibility_sex: first.map(|t| t.eligibility_sex),
        annotation: annotate(citation, trials, patterns, scoring, snippet_chars),
    }
}

/// One record per citation, in citation order.
pub fn annotate_citations(
    corpus: &Corpus,
    patterns: &PatternSet,
    scoring: &ScoringConfig,
    opts: AnnotateOptions,
) -> Result<Vec<EvidenceRecord>> {
    let indexed: Vec<(usize, &Citation)> = corpus.citations.iter().enumerate().collect();
    map_ordered(&indexed, opts.threads, |&(idx, citation)| {
        let trials = corpus.linked_trials(citation);
        let trial_id = trials
            .first()
            .map(|t| t.trial_id.clone())
            .or_else(|| citation.trial_ids().first().map(|s| s.to_string()));
        record_for(
            idx,
            citation,
            &trials,
            trial_id,
            patterns,
            scoring,
            opts.snippet_chars,
        )
    })
}

/// One record per representative link, scored against that trial only.
pub fn annotate_unique_trials(
    corpus: &Corpus,
    links: &[CitationTrialLink],
    representatives: &[usize],
    patterns: &PatternSet,
    scoring: &ScoringConfig,
    opts: AnnotateOptions,
) -> Result<Vec<EvidenceRecord>> {
    map_ordered(representatives, opts.threads, |&link_idx| {
        let link = &links[link_idx];
        let citation = &corpus.citations[link.citation_idx];
        let trials: Vec<&Trial> = link
            .trial_id
            .as_deref()
            .and_then(|id| corpus.trial(id))
            .into_iter()
            .collect();
        record_for(
            link.citation_idx,
            citation,
            &trials,
            link.trial_id.clone(),
            patterns,
            scoring,
            opts.snippet_chars,
        )
    })
}
