use std::collections::BTreeMap;

use kira_sabvqc::model::{Citation, Corpus, EligibilitySex, Trial};
use kira_sabvqc::patterns::{WeightClass, load_pattern_set};
use kira_sabvqc::scores::annotate::{AnnotateOptions, annotate, annotate_citations};
use kira_sabvqc::scores::composite::{composite_score, score_breakdown};
use kira_sabvqc::scores::{SCORE_MAX, ScoringConfig};

fn citation(title: &str, trial: Option<&str>) -> Citation {
    Citation {
        guideline_id: "G1".to_string(),
        cited_work_id: "W1".to_string(),
        title: Some(title.to_string()),
        abstract_text: None,
        classified_trial: trial.is_some(),
        primary_trial_id: trial.map(str::to_string),
        all_trial_ids: Vec::new(),
    }
}

fn trial(id: &str, sex: EligibilitySex) -> Trial {
    Trial {
        trial_id: id.to_string(),
        eligibility_sex: sex,
        official_title: Some("Dose finding study".to_string()),
        description: None,
        eligibility_criteria: None,
        outcome_measures: None,
        registry_complete: true,
    }
}

#[test]
fn stratification_title_without_trial_scores_two() {
    let set = load_pattern_set(None).unwrap();
    let c = citation("outcomes stratified by sex in elderly patients", None);
    let a = annotate(&c, &[], &set, &ScoringConfig::default(), 80);
    let idx = set.index_of("sex_stratification").unwrap();
    assert!(a.flags[idx]);
    assert_eq!(a.flags.iter().filter(|f| **f).count(), 1);
    assert!(!a.inclusive);
    assert_eq!(a.score, 2);
    assert!(a.has_evidence());
}

#[test]
fn female_only_trial_without_matches_scores_one() {
    let set = load_pattern_set(None).unwrap();
    let c = citation("Dose finding", Some("NCT00000001"));
    let t = trial("NCT00000001", EligibilitySex::Female);
    let a = annotate(&c, &[&t], &set, &ScoringConfig::default(), 80);
    assert!(a.flags.iter().all(|f| !*f));
    assert!(a.inclusive);
    assert_eq!(a.score, 1);
}

#[test]
fn male_only_trial_is_not_inclusive() {
    let set = load_pattern_set(None).unwrap();
    let c = citation("Dose finding", Some("NCT00000001"));
    let t = trial("NCT00000001", EligibilitySex::Male);
    let a = annotate(&c, &[&t], &set, &ScoringConfig::default(), 80);
    assert_eq!(a.score, 0);
}

#[test]
fn class_caps_apply_before_the_total() {
    let cfg = ScoringConfig::default();
    let classes = vec![
        WeightClass::High,
        WeightClass::High,
        WeightClass::High,
        WeightClass::High,
        WeightClass::Medium,
        WeightClass::Medium,
        WeightClass::Medium,
        WeightClass::Medium,
        WeightClass::Info,
    ];
    let all = vec![true; classes.len()];
    let b = score_breakdown(&cfg, &classes, &all, true);
    assert_eq!(b.high, 6);
    assert_eq!(b.medium, 4);
    assert_eq!(b.info, 0);
    assert_eq!(b.total, 10);
}

#[test]
fn score_is_bounded_and_monotonic_in_flags() {
    let cfg = ScoringConfig::default();
    let set = load_pattern_set(None).unwrap();
    let classes = set.weight_classes();
    let n = classes.len();
    for mask in 0u32..(1 << n) {
        for inclusive in [false, true] {
            let flags: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
            let score = composite_score(&cfg, &classes, &flags, inclusive);
            assert!(score as u32 <= SCORE_MAX);
            for extra in 0..n {
                if flags[extra] {
                    continue;
                }
                let mut more = flags.clone();
                more[extra] = true;
                assert!(composite_score(&cfg, &classes, &more, inclusive) >= score);
            }
            if !inclusive {
                assert!(composite_score(&cfg, &classes, &flags, true) >= score);
            }
        }
    }
}

#[test]
fn citation_records_follow_registry_links() {
    let set = load_pattern_set(None).unwrap();
    let mut trials = BTreeMap::new();
    trials.insert(
        "NCT00000002".to_string(),
        trial("NCT00000002", EligibilitySex::All),
    );
    let mut multi = citation("Sex-specific subgroups were analysed", None);
    multi.all_trial_ids = vec!["NCT00000009".to_string(), "NCT00000002".to_string()];
    let mut unlinked = citation("No trial here", Some("NCT00000009"));
    unlinked.cited_work_id = "W2".to_string();
    let corpus = Corpus {
        guidelines: BTreeMap::new(),
        citations: vec![multi, unlinked],
        trials,
    };
    let records = annotate_citations(
        &corpus,
        &set,
        &ScoringConfig::default(),
        AnnotateOptions::default(),
    )
    .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].registry_match);
    assert_eq!(records[0].trial_id.as_deref(), Some("NCT00000002"));
    assert_eq!(records[0].eligibility_sex, Some(EligibilitySex::All));
    assert_eq!(records[0].annotation.score, 3);
    assert!(!records[1].registry_match);
    assert_eq!(records[1].trial_id.as_deref(), Some("NCT00000009"));
    assert_eq!(records[1].eligibility_sex, None);
}
