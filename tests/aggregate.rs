use kira_sabvqc::aggregate::{
    Category, CategoryThresholds, GuidelineTally, aggregate_scenario, categorize, reconcile,
};
use kira_sabvqc::model::{Citation, EligibilitySex};
use kira_sabvqc::scenario::{AnnotatedDataset, DataSource, Predicate, ScenarioDef, evaluate};
use kira_sabvqc::scores::{EvidenceAnnotation, EvidenceRecord};

fn tally(matched: usize, with_evidence: usize, score_sum: u64) -> GuidelineTally {
    GuidelineTally {
        matched,
        with_evidence,
        score_sum,
    }
}

fn citation(g: &str, w: &str) -> Citation {
    Citation {
        guideline_id: g.to_string(),
        cited_work_id: w.to_string(),
        title: None,
        abstract_text: None,
        classified_trial: true,
        primary_trial_id: None,
        all_trial_ids: Vec::new(),
    }
}

fn record(idx: usize, sex: Option<EligibilitySex>, flags: [bool; 2], score: u8) -> EvidenceRecord {
    EvidenceRecord {
        citation_idx: idx,
        trial_id: None,
        registry_match: sex.is_some(),
        registry_complete: false,
        eligibility_sex: sex,
        annotation: EvidenceAnnotation {
            flags: flags.to_vec(),
            snippets: vec![None, None],
            inclusive: false,
            score,
        },
    }
}

fn all_citations() -> ScenarioDef {
    ScenarioDef {
        name: "everything".to_string(),
        version: 1,
        label: "Everything".to_string(),
        description: String::new(),
        data_source: DataSource::Citations,
        sex_verifiable: false,
        order: 0,
        predicate: Predicate::All,
    }
}

#[test]
fn categorize_follows_threshold_order() {
    let th = CategoryThresholds::default();
    assert_eq!(categorize(&tally(10, 3, 7), &th), Category::Strong);
    assert_eq!(categorize(&tally(10, 2, 4), &th), Category::Strong);
    assert_eq!(categorize(&tally(10, 1, 1), &th), Category::Moderate);
    assert_eq!(categorize(&tally(20, 1, 3), &th), Category::Weak);
    assert_eq!(categorize(&tally(21, 1, 3), &th), Category::InadequateNoSex);
    assert_eq!(categorize(&tally(5, 0, 0), &th), Category::InadequateNoSex);
    assert_eq!(categorize(&tally(0, 0, 0), &th), Category::InadequateNoTrials);
}

#[test]
fn strong_requires_mean_as_well_as_share() {
    let th = CategoryThresholds {
        strong_mean: 3.0,
        ..CategoryThresholds::default()
    };
    // 50% with evidence, mean 2.0 over evidence records
    assert_eq!(categorize(&tally(4, 2, 4), &th), Category::Moderate);
}

#[test]
fn category_labels_keep_the_dash() {
    assert_eq!(Category::InadequateNoTrials.label(), "Inadequate – No Trials");
    assert_eq!(
        serde_json::to_string(&Category::InadequateNoSex).unwrap(),
        "\"Inadequate – No Sex\""
    );
    assert!(Category::InadequateNoSex.is_inadequate());
    assert!(!Category::Weak.is_inadequate());
}

#[test]
fn guideline_tally_means() {
    let t = tally(4, 2, 6);
    assert_eq!(t.evidence_pct(), 50.0);
    assert_eq!(t.mean_score(), 1.5);
    assert_eq!(t.evidence_mean_score(), 3.0);
    assert_eq!(tally(0, 0, 0).mean_score(), 0.0);
}

#[test]
fn scenario_rollup_covers_every_guideline() {
    let citations = vec![
        citation("G1", "W1"),
        citation("G1", "W2"),
        citation("G2", "W3"),
    ];
    let universe = vec![
        record(0, Some(EligibilitySex::All), [true, false], 4),
        record(1, Some(EligibilitySex::Male), [false, false], 0),
        record(2, None, [true, true], 3),
    ];
    let dataset = AnnotatedDataset {
        citations: &citations,
        universe: &universe,
        unique_trials: &[],
    };
    let def = all_citations();
    let selection = evaluate(&def, dataset);
    let ids = vec!["G1".to_string(), "G2".to_string(), "G3".to_string()];

    for threads in [1, 4] {
        let result = aggregate_scenario(
            &def,
            &selection,
            dataset,
            &ids,
            &CategoryThresholds::default(),
            2,
            threads,
        )
        .unwrap();

        assert_eq!(result.corpus, tally(3, 2, 7));
        assert_eq!(result.median_score, 3.0);
        assert_eq!(result.group_counts, vec![2, 1]);
        assert_eq!(result.eligibility.all, 1);
        assert_eq!(result.eligibility.male, 1);
        assert_eq!(result.eligibility.no_registry, 1);
        assert_eq!(result.eligibility.registry_matched(), 2);
        assert_eq!(result.guidelines_with_records(), 2);

        let sum: usize = result.category_counts.values().sum();
        assert_eq!(sum, ids.len());
        assert_eq!(result.guidelines[0].tally, tally(2, 1, 4));
        assert_eq!(result.guidelines[0].category, Category::Strong);
        assert_eq!(result.guidelines[1].category, Category::Strong);
        assert_eq!(result.guidelines_in(Category::InadequateNoTrials), vec!["G3"]);
        assert_eq!(result.category_count(Category::Weak), 0);
    }
}

#[test]
fn selection_outside_guideline_corpus_is_rejected() {
    let citations = vec![citation("GX", "W1")];
    let universe = vec![record(0, None, [false, false], 0)];
    let dataset = AnnotatedDataset {
        citations: &citations,
        universe: &universe,
        unique_trials: &[],
    };
    let def = all_citations();
    let selection = evaluate(&def, dataset);
    let err = aggregate_scenario(
        &def,
        &selection,
        dataset,
        &["G1".to_string()],
        &CategoryThresholds::default(),
        2,
        1,
    )
    .unwrap_err();
    assert!(err.to_string().contains("aggregation inconsistency"));
}

#[test]
fn reconcile_reports_mismatch() {
    assert!(reconcile("s", &tally(3, 1, 2), &tally(3, 1, 2)).is_ok());
    let err = reconcile("s", &tally(3, 1, 2), &tally(4, 1, 2)).unwrap_err();
    assert!(err.to_string().contains("aggregation inconsistency"));
}
