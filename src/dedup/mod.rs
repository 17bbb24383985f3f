use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::model::{Citation, CitationTrialLink, Corpus, Guideline, Trial};

#[derive(Debug, Clone)]
pub struct DedupOutcome<T> {
    pub kept: T,
    pub removed: usize,
}

/// Collapses repeated (guideline, cited-work) pairs, keeping the first in
/// input order. The same work cited by two guidelines is two citations.
pub fn dedup_citations(citations: Vec<Citation>) -> DedupOutcome<Vec<Citation>> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(citations.len());
    let mut kept = Vec::with_capacity(citations.len());
    let mut removed = 0usize;
    for citation in citations {
        let key = (
            citation.guideline_id.clone(),
            citation.cited_work_id.clone(),
        );
        if seen.insert(key) {
            kept.push(citation);
        } else {
            removed += 1;
        }
    }
    DedupOutcome { kept, removed }
}

pub fn dedup_guidelines(guidelines: Vec<Guideline>) -> DedupOutcome<BTreeMap<String, Guideline>> {
    let mut kept: BTreeMap<String, Guideline> = BTreeMap::new();
    let mut removed = 0usize;
    for guideline in guidelines {
        if kept.contains_key(&guideline.id) {
            removed += 1;
            continue;
        }
        kept.insert(guideline.id.clone(), guideline);
    }
    DedupOutcome { kept, removed }
}

/// (registry complete, number of filled free-text fields).
pub fn trial_completeness(trial: &Trial) -> (bool, usize) {
    (trial.registry_complete, trial.filled_text_fields())
}

/// Whether `candidate` replaces `current` for the same trial id. Only a
/// strictly more complete record wins, so equal records keep the first seen.
pub fn prefer_more_complete(current: &Trial, candidate: &Trial) -> bool {
    trial_completeness(candidate) > trial_completeness(current)
}

pub fn dedup_trials(trials: Vec<Trial>) -> DedupOutcome<BTreeMap<String, Trial>> {
    let mut kept: BTreeMap<String, Trial> = BTreeMap::new();
    let mut removed = 0usize;
    for trial in trials {
        match kept.get_mut(&trial.trial_id) {
            Some(current) => {
                removed += 1;
                if prefer_more_complete(current, &trial) {
                    *current = trial;
                }
            }
            None => {
                kept.insert(trial.trial_id.clone(), trial);
            }
        }
    }
    DedupOutcome { kept, removed }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LinkRank {
    pub registry_match: bool,
    pub registry_complete: bool,
    pub has_abstract: bool,
    pub has_title: bool,
}

pub fn link_rank(link: &CitationTrialLink, corpus: &Corpus) -> LinkRank {
    let citation = &corpus.citations[link.citation_idx];
    let trial = link.trial_id.as_deref().and_then(|id| corpus.trial(id));
    LinkRank {
        registry_match: trial.is_some(),
        registry_complete: trial.is_some_and(|t| t.registry_complete),
        has_abstract: non_empty(citation.abstract_text.as_deref()),
        has_title: non_empty(citation.title.as_deref()),
    }
}

/// Picks one representative link per trial id: highest `link_rank`, ties go to
/// the first link in exploded order. Returned link indices are ordered by
/// trial id. Null links are skipped.
pub fn unique_trial_links(links: &[CitationTrialLink], corpus: &Corpus) -> Vec<usize> {
    let mut best: BTreeMap<&str, (LinkRank, usize)> = BTreeMap::new();
    for (idx, link) in links.iter().enumerate() {
        let Some(trial_id) = link.trial_id.as_deref() else {
            continue;
        };
        let rank = link_rank(link, corpus);
        match best.get_mut(trial_id) {
            Some(entry) => {
                if rank > entry.0 {
                    *entry = (rank, idx);
                }
            }
            None => {
                best.insert(trial_id, (rank, idx));
            }
        }
    }
    best.into_values().map(|(_, idx)| idx).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialCitationCount {
    pub citations: usize,
    pub guidelines: usize,
}

pub fn trial_citation_counts(
    links: &[CitationTrialLink],
    citations: &[Citation],
) -> BTreeMap<String, TrialCitationCount> {
    let mut guidelines: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut counts: BTreeMap<String, TrialCitationCount> = BTreeMap::new();
    for link in links {
        let Some(trial_id) = link.trial_id.as_deref() else {
            continue;
        };
        counts.entry(trial_id.to_string()).or_default().citations += 1;
        guidelines
            .entry(trial_id)
            .or_default()
            .insert(&citations[link.citation_idx].guideline_id);
    }
    for (trial_id, set) in guidelines {
        if let Some(c) = counts.get_mut(trial_id) {
            c.guidelines = set.len();
        }
    }
    counts
}

fn non_empty(s: Option<&str>) -> bool {
    s.is_some_and(|s| !s.trim().is_empty())
}
