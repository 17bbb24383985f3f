use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run_fixture(out: &Path) -> String {
    let mut cmd = Command::cargo_bin("kira-sabvqc").unwrap();
    cmd.arg("run")
        .arg("--citations")
        .arg(fixture("citations.tsv"))
        .arg("--trials")
        .arg(fixture("trials.tsv"))
        .arg("--guidelines")
        .arg(fixture("guidelines.tsv"))
        .arg("--out")
        .arg(out)
        .arg("--json")
        .arg("--threads")
        .arg("2");
    let stdout = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(stdout).unwrap()
}

fn collect_files(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).unwrap().display().to_string();
            out.insert(rel, fs::read(&path).unwrap());
        }
    }
}

#[test]
fn run_writes_every_output() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let stdout = run_fixture(&out);
    assert!(stdout.starts_with("kira-sabvqc summary"));
    assert!(stdout.contains("duplicates removed: 1 citations, 1 trials"));

    for name in [
        "annotated_citations.tsv",
        "unique_trials.tsv",
        "scenario_comparison.tsv",
        "recommendations.tsv",
        "stakeholder_actions.tsv",
        "data_dictionary.tsv",
        "scoring_methodology.tsv",
        "pattern_groups.tsv",
        "report.json",
    ] {
        assert!(out.join(name).exists(), "{} missing", name);
    }
    for scenario in [
        "classification_only",
        "classification_or_registry",
        "registry_verified",
        "any_trial_mention",
        "registry_complete",
        "unique_trials",
    ] {
        let dir = out.join("scenarios").join(scenario);
        for file in ["overall.tsv", "guidelines.tsv", "categories.tsv"] {
            assert!(dir.join(file).exists(), "{}/{} missing", scenario, file);
        }
    }
}

#[test]
fn run_scores_and_categorizes_fixture() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    run_fixture(&out);

    let verified = fs::read_to_string(out.join("scenarios/registry_verified/guidelines.tsv")).unwrap();
    let lines: Vec<&str> = verified.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        "G1\tHeart failure guideline\t2021\tcardiology\t2\t1\t50.000000\t2.500000\t5.000000\tStrong"
    );
    assert!(lines[3].starts_with("G3\t"));
    assert!(lines[3].ends_with("\tInadequate – No Trials"));

    let categories = fs::read_to_string(out.join("scenarios/registry_verified/categories.tsv")).unwrap();
    let total: usize = categories
        .lines()
        .skip(1)
        .map(|l| l.split('\t').nth(1).unwrap().parse::<usize>().unwrap())
        .sum();
    assert_eq!(total, 3);

    let annotated = fs::read_to_string(out.join("annotated_citations.tsv")).unwrap();
    let header: Vec<&str> = annotated.lines().next().unwrap().split('\t').collect();
    let score_col = header.iter().position(|c| *c == "score").unwrap();
    let scores: BTreeMap<String, String> = annotated
        .lines()
        .skip(1)
        .map(|l| {
            let cols: Vec<&str> = l.split('\t').collect();
            (cols[1].to_string(), cols[score_col].to_string())
        })
        .collect();
    assert_eq!(scores["W1"], "5");
    assert_eq!(scores["W2"], "0");
    assert_eq!(scores["W4"], "3");

    let col = |name: &str| header.iter().position(|c| *c == name).unwrap();
    let w1: Vec<&str> = annotated
        .lines()
        .find(|l| l.starts_with("G1\tW1\t"))
        .unwrap()
        .split('\t')
        .collect();
    assert_eq!(w1.len(), header.len());
    assert_eq!(w1[col("title")], "Outcomes stratified by sex in elderly patients");
    assert_eq!(w1[col("abstract")], "A randomized trial.");
    assert_eq!(w1[col("flag_sex_stratification")], "1");
    assert!(w1[col("snippet_sex_stratification")].contains("stratified by sex"));
    assert_eq!(w1[col("flag_sex_differences")], "1");
    assert!(w1[col("snippet_sex_differences")].contains("Sex differences"));
    assert_eq!(
        header[col("flag_sex_differences") + 1],
        "snippet_sex_differences"
    );

    let unique = fs::read_to_string(out.join("unique_trials.tsv")).unwrap();
    assert_eq!(unique.lines().count(), 5);
}

#[test]
fn run_report_json_has_summary_fields() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    run_fixture(&out);

    let raw = fs::read_to_string(out.join("report.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["tool"], "kira-sabvqc");
    assert_eq!(v["schema_version"], "v1");
    assert_eq!(v["config"]["pattern_version"], "v1");
    let s = &v["run_summary"];
    assert_eq!(s["duplicate_citations_removed"], 1);
    assert_eq!(s["excluded_malformed_citations"], 1);
    assert_eq!(s["duplicate_trials_removed"], 1);
    assert_eq!(s["links_without_registry"], 1);
    assert_eq!(s["unique_trials"], 4);
    assert_eq!(s["guidelines"], 3);
    assert_eq!(v["scenarios"].as_array().unwrap().len(), 6);
    assert_eq!(v["validation"].as_array().unwrap().len(), 8);
}

#[test]
fn run_output_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    run_fixture(&a);
    run_fixture(&b);

    let mut files_a = BTreeMap::new();
    let mut files_b = BTreeMap::new();
    collect_files(&a, &a, &mut files_a);
    collect_files(&b, &b, &mut files_b);
    assert_eq!(
        files_a.keys().collect::<Vec<_>>(),
        files_b.keys().collect::<Vec<_>>()
    );
    for (name, bytes) in &files_a {
        assert_eq!(Some(bytes), files_b.get(name), "{} differs", name);
    }
}
