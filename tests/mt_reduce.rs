use kira_sabvqc::aggregate::GuidelineTally;
use kira_sabvqc::math::reduce_mt::{map_ordered, merge_all};

#[test]
fn map_ordered_preserves_input_order() {
    let items: Vec<u64> = (0..1000).collect();
    let single = map_ordered(&items, 1, |x| x * 3).unwrap();
    let many = map_ordered(&items, 4, |x| x * 3).unwrap();
    let auto = map_ordered(&items, 0, |x| x * 3).unwrap();
    assert_eq!(single, many);
    assert_eq!(single, auto);
    assert_eq!(single[10], 30);
}

#[test]
fn tally_merge_is_order_independent() {
    let parts = vec![
        GuidelineTally {
            matched: 3,
            with_evidence: 1,
            score_sum: 2,
        },
        GuidelineTally {
            matched: 0,
            with_evidence: 0,
            score_sum: 0,
        },
        GuidelineTally {
            matched: 5,
            with_evidence: 4,
            score_sum: 11,
        },
    ];
    let forward: GuidelineTally = merge_all(parts.iter());
    let backward: GuidelineTally = merge_all(parts.iter().rev());
    assert_eq!(forward, backward);
    assert_eq!(forward.matched, 8);
    assert_eq!(forward.with_evidence, 5);
    assert_eq!(forward.score_sum, 13);
}
