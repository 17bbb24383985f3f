use std::collections::BTreeSet;
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

fn run_fixture(out: &Path) {
    Command::cargo_bin("kira-sabvqc")
        .unwrap()
        .arg("run")
        .arg("--citations")
        .arg(fixture("citations.tsv"))
        .arg("--trials")
        .arg(fixture("trials.tsv"))
        .arg("--guidelines")
        .arg(fixture("guidelines.tsv"))
        .arg("--out")
        .arg(out)
        .assert()
        .success();
}

fn tsv_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            tsv_files(root, &path, out);
        } else if path.extension().and_then(|e| e.to_str()) == Some("tsv") {
            let rel = path.strip_prefix(root).unwrap();
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }
}

/// `scenarios/registry_verified/overall.tsv` -> `scenarios/<name>/overall.tsv`.
fn documented_file(rel: &str) -> String {
    let parts: Vec<&str> = rel.split('/').collect();
    if parts.len() == 3 && parts[0] == "scenarios" {
        format!("scenarios/<name>/{}", parts[2])
    } else {
        rel.to_string()
    }
}

fn documented_column(column: &str, groups: &BTreeSet<String>) -> String {
    for prefix in ["flag_", "snippet_", "group_"] {
        if let Some(group) = column.strip_prefix(prefix) {
            if groups.contains(group) {
                return format!("{}<group>", prefix);
            }
        }
    }
    column.to_string()
}

#[test]
fn every_output_column_is_documented() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    run_fixture(&out);

    let dictionary = fs::read_to_string(out.join("data_dictionary.tsv")).unwrap();
    let mut lines = dictionary.lines();
    assert_eq!(lines.next().unwrap(), "file\tcolumn\tdescription");
    let documented: BTreeSet<(String, String)> = lines
        .map(|l| {
            let cols: Vec<&str> = l.split('\t').collect();
            assert_eq!(cols.len(), 3, "{}", l);
            assert!(!cols[2].is_empty(), "{}", l);
            (cols[0].to_string(), cols[1].to_string())
        })
        .collect();

    let groups: BTreeSet<String> = fs::read_to_string(out.join("pattern_groups.tsv"))
        .unwrap()
        .lines()
        .skip(1)
        .map(|l| l.split('\t').next().unwrap().to_string())
        .collect();
    assert!(groups.contains("sex_stratification"));

    let mut files = Vec::new();
    tsv_files(&out, &out, &mut files);
    assert!(files.len() > 20);

    let mut missing = Vec::new();
    for rel in &files {
        let text = fs::read_to_string(out.join(rel)).unwrap();
        let file = documented_file(rel);
        let header = text.lines().next().unwrap();
        let mut names: Vec<String> = header.split('\t').map(str::to_string).collect();
        if rel.ends_with("overall.tsv") {
            names.extend(
                text.lines()
                    .skip(1)
                    .map(|l| l.split('\t').next().unwrap().to_string()),
            );
        }
        for name in names {
            let column = documented_column(&name, &groups);
            if !documented.contains(&(file.clone(), column.clone())) {
                missing.push(format!("{}:{}", file, column));
            }
        }
    }
    assert!(missing.is_empty(), "undocumented: {:?}", missing);
}

#[test]
fn per_group_columns_pair_flag_and_snippet() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    run_fixture(&out);

    for file in ["annotated_citations.tsv", "unique_trials.tsv"] {
        let text = fs::read_to_string(out.join(file)).unwrap();
        let header: Vec<&str> = text.lines().next().unwrap().split('\t').collect();
        let flags: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_with("flag_"))
            .map(|(i, _)| i)
            .collect();
        assert!(!flags.is_empty());
        for i in flags {
            let group = header[i].trim_start_matches("flag_");
            assert_eq!(header[i + 1], format!("snippet_{}", group), "{}", file);
        }
        assert_eq!(*header.last().unwrap(), "score");
        for row in text.lines().skip(1) {
            assert_eq!(row.split('\t').count(), header.len(), "{}", file);
        }
    }
}
