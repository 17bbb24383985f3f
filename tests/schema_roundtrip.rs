use kira_sabvqc::schema::v1::SabvQcV1;

#[test]
fn schema_roundtrip_v1() {
    let report = SabvQcV1::empty("0.0.0-test");
    let json = serde_json::to_string(&report).unwrap();
    let decoded: SabvQcV1 = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.tool, "kira-sabvqc");
    assert_eq!(decoded.schema_version, "v1");
    assert!(decoded.scenarios.is_empty());
    assert_eq!(decoded.run_summary.citations_read, 0);
}
