use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::patterns::{PatternGroupDef, WeightClass};

pub fn load_builtin_v1() -> Result<Vec<PatternGroupDef>> {
    let content = include_str!("../../assets/patterns/sex_patterns_v1.tsv");
    parse_pattern_tsv(content, "built-in v1")
}

pub fn load_pattern_tsv(path: &Path) -> Result<Vec<PatternGroupDef>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read pattern TSV {}", path.display()))?;
    parse_pattern_tsv(&content, &path.display().to_string())
}

/// A user group replaces the built-in group of the same name in place; new
/// user groups are appended in their file order.
pub fn merge_defs(mut builtin: Vec<PatternGroupDef>, user: Vec<PatternGroupDef>) -> Vec<PatternGroupDef> {
    if user.is_empty() {
        return builtin;
    }
    let mut user_order = Vec::with_capacity(user.len());
    let mut user_map: HashMap<String, PatternGroupDef> = HashMap::new();
    for def in user {
        user_order.push(def.name.clone());
        user_map.insert(def.name.clone(), def);
    }

    let mut merged = Vec::with_capacity(builtin.len() + user_map.len());
    for def in builtin.drain(..) {
        if let Some(user_def) = user_map.remove(&def.name) {
            merged.push(user_def);
        } else {
            merged.push(def);
        }
    }
    for name in user_order {
        if let Some(def) = user_map.remove(&name) {
            merged.push(def);
        }
    }
    merged
}

fn parse_pattern_tsv(content: &str, source: &str) -> Result<Vec<PatternGroupDef>> {
    let mut defs: HashMap<String, PatternGroupDef> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.splitn(3, '\t').collect();
        if parts.len() != 3 {
            bail!("{}:{} malformed TSV (expected 3 columns)", source, line_no);
        }
        let name = parts[0].trim();
        let class_str = parts[1].trim();
        let expr = parts[2].trim();
        if name.is_empty() || class_str.is_empty() || expr.is_empty() {
            bail!("{}:{} empty field in TSV", source, line_no);
        }
        let weight_class = WeightClass::parse(class_str).ok_or_else(|| {
            anyhow::anyhow!(
                "{}:{} unknown weight class '{}' (expected high, medium or info)",
                source,
                line_no,
                class_str
            )
        })?;

        let def = defs.entry(name.to_string()).or_insert_with(|| {
            order.push(name.to_string());
            PatternGroupDef {
                name: name.to_string(),
                weight_class,
                patterns: Vec::new(),
            }
        });
        if def.weight_class != weight_class {
            bail!(
                "{}:{} weight class mismatch for pattern group '{}'",
                source,
                line_no,
                name
            );
        }
        def.patterns.push(expr.to_string());
    }

    let mut out = Vec::with_capacity(order.len());
    for name in order {
        if let Some(def) = defs.remove(&name) {
            out.push(def);
        }
    }

    Ok(out)
}
