use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scenario::ScenarioDef;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    pub version: String,
    pub scenarios: Vec<ScenarioDef>,
}

pub fn load_builtin_v1() -> Result<ScenarioFile> {
    let content = include_str!("../../assets/scenarios/scenarios_v1.json");
    parse_scenario_json(content, "built-in v1")
}

pub fn load_scenario_json(path: &Path) -> Result<ScenarioFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    parse_scenario_json(&content, &path.display().to_string())
}

/// Same overlay rule as pattern groups: a user scenario replaces the built-in
/// one of the same name, new ones are appended.
pub fn merge_defs(builtin: Vec<ScenarioDef>, user: Vec<ScenarioDef>) -> Vec<ScenarioDef> {
    if user.is_empty() {
        return builtin;
    }
    let mut user_order = Vec::with_capacity(user.len());
    let mut user_map: HashMap<String, ScenarioDef> = HashMap::new();
    for def in user {
        user_order.push(def.name.clone());
        user_map.insert(def.name.clone(), def);
    }
    let mut merged = Vec::with_capacity(builtin.len() + user_map.len());
    for def in builtin {
        match user_map.remove(&def.name) {
            Some(user_def) => merged.push(user_def),
            None => merged.push(def),
        }
    }
    for name in user_order {
        if let Some(def) = user_map.remove(&name) {
            merged.push(def);
        }
    }
    merged
}

fn parse_scenario_json(content: &str, source: &str) -> Result<ScenarioFile> {
    serde_json::from_str(content).with_context(|| format!("{}: invalid scenario configuration", source))
}
