use assert_cmd::Command;

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("kira-sabvqc").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn patterns_show_lists_builtin_groups() {
    let mut cmd = Command::cargo_bin("kira-sabvqc").unwrap();
    cmd.args(["patterns", "show"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("pattern groups (version v1):"));
    assert!(text.contains("sex_stratification\thigh\t"));
    assert!(text.contains("sex_reporting\tinfo\t"));
}

#[test]
fn scenarios_show_lists_builtin_scenarios_in_order() {
    let mut cmd = Command::cargo_bin("kira-sabvqc").unwrap();
    cmd.args(["scenarios", "show"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    let names: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split('\t').next().unwrap())
        .collect();
    assert_eq!(names.first(), Some(&"classification_only"));
    assert_eq!(names.last(), Some(&"unique_trials"));
    assert!(names.contains(&"registry_verified"));
}
