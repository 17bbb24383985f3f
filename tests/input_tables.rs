use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::GzEncoder;
use kira_sabvqc::io::citations::read_citations;
use kira_sabvqc::io::guidelines::read_guidelines;
use kira_sabvqc::io::table::{parse_flag, parse_tsv};
use kira_sabvqc::io::trials::read_trials;
use kira_sabvqc::model::EligibilitySex;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn citation_fixture_counts_malformed_rows() {
    let loaded = read_citations(&fixture("citations.tsv")).unwrap();
    assert_eq!(loaded.records.len(), 5);
    assert_eq!(loaded.malformed, 1);

    let w4 = &loaded.records[4];
    assert_eq!(w4.cited_work_id, "W4");
    assert_eq!(w4.primary_trial_id, None);
    assert_eq!(w4.trial_ids(), vec!["NCT00000003", "NCT00000004"]);
    assert!(w4.classified_trial);

    let w3 = &loaded.records[3];
    assert!(!w3.classified_trial);
    assert!(!w3.has_trial_id());
}

#[test]
fn trial_fixture_parses_sex_and_completeness() {
    let loaded = read_trials(&fixture("trials.tsv")).unwrap();
    assert_eq!(loaded.records.len(), 4);
    assert_eq!(loaded.malformed, 0);
    assert_eq!(loaded.records[1].eligibility_sex, EligibilitySex::Male);
    assert!(loaded.records[2].registry_complete);
    assert!(!loaded.records[3].registry_complete);
}

#[test]
fn guideline_years_tolerate_bad_values() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("guidelines.tsv");
    fs::write(
        &path,
        "guideline_id\ttitle\tpublication_year\tspecialty\nG1\tA\t2021\tcardiology\nG2\tB\tunknown\t\n\tC\t2020\tx\n",
    )
    .unwrap();
    let loaded = read_guidelines(&path).unwrap();
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.malformed, 1);
    assert_eq!(loaded.records[0].publication_year, Some(2021));
    assert_eq!(loaded.records[1].publication_year, None);
    assert_eq!(loaded.records[1].specialty, None);
}

#[test]
fn gzip_input_is_read_transparently() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("trials.tsv.gz");
    let plain = fs::read(fixture("trials.tsv")).unwrap();
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(&plain).unwrap();
    encoder.finish().unwrap();

    let loaded = read_trials(&path).unwrap();
    assert_eq!(loaded.records.len(), 4);
    assert_eq!(loaded.records[0].trial_id, "NCT00000001");
}

#[test]
fn missing_key_column_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("citations.tsv");
    fs::write(&path, "guideline_id\ttitle\nG1\tx\n").unwrap();
    let err = read_citations(&path).unwrap_err();
    assert!(err.to_string().contains("missing required column 'cited_work_id'"));
}

#[test]
fn table_skips_comments_and_lowercases_header() {
    let text = "# exported\nTrial_ID\tEligibility_Sex\n\nnct00000009\tfemale\n";
    let table = parse_tsv(text.as_bytes(), "inline").unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].line_no, 4);
    let col = table.require("trial_id").unwrap();
    assert_eq!(table.rows[0].get(Some(col)), Some("nct00000009"));
    assert!(parse_tsv("a\ta\n".as_bytes(), "inline").is_err());
    assert!(parse_tsv("\n# only comments\n".as_bytes(), "inline").is_err());
}

#[test]
fn flags_accept_common_spellings() {
    for raw in ["true", "T", "1", "yes", "Y"] {
        assert!(parse_flag(Some(raw)), "{}", raw);
    }
    for raw in ["false", "0", "no", "maybe"] {
        assert!(!parse_flag(Some(raw)), "{}", raw);
    }
    assert!(!parse_flag(None));
}
