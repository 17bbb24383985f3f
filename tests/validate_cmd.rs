use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn validate_command_ok() {
    let mut cmd = Command::cargo_bin("kira-sabvqc").unwrap();
    cmd.arg("validate")
        .arg("--citations")
        .arg(fixture("citations.tsv"))
        .arg("--trials")
        .arg(fixture("trials.tsv"))
        .arg("--guidelines")
        .arg(fixture("guidelines.tsv"));
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("kira-sabvqc validate ok"));
    assert!(text.contains("pass\terror\tunique_citation_pairs"));
    assert!(text.contains("pass\twarning\ttrial_id_format"));
    assert!(text.contains("FAIL\tinfo\tregistry_coverage"));
}

#[test]
fn validate_command_warns_on_irregular_ids() {
    let tmp = TempDir::new().unwrap();
    let citations = tmp.path().join("citations.tsv");
    let trials = tmp.path().join("trials.tsv");
    fs::write(
        &citations,
        "guideline_id\tcited_work_id\tprimary_trial_id\nG1\tW1\tISRCTN123\n",
    )
    .unwrap();
    fs::write(&trials, "trial_id\teligibility_sex\nISRCTN123\tAll\n").unwrap();

    let mut cmd = Command::cargo_bin("kira-sabvqc").unwrap();
    cmd.arg("validate")
        .arg("--citations")
        .arg(&citations)
        .arg("--trials")
        .arg(&trials);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("FAIL\twarning\ttrial_id_format"));
    assert!(text.contains("ISRCTN123"));
}

#[test]
fn validate_command_requires_key_columns() {
    let tmp = TempDir::new().unwrap();
    let citations = tmp.path().join("citations.tsv");
    let trials = tmp.path().join("trials.tsv");
    fs::write(&citations, "guideline\twork\nG1\tW1\n").unwrap();
    fs::write(&trials, "trial_id\nNCT00000001\n").unwrap();

    let mut cmd = Command::cargo_bin("kira-sabvqc").unwrap();
    cmd.arg("validate")
        .arg("--citations")
        .arg(&citations)
        .arg("--trials")
        .arg(&trials);
    cmd.assert().failure();
}
