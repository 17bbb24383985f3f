use std::path::Path;

use anyhow::Result;
use tracing::warn;

use crate::io::LoadOutcome;
use crate::io::table::{TsvTable, parse_flag, read_tsv};
use crate::model::{EligibilitySex, Trial, canonical_trial_id};

pub fn read_trials(path: &Path) -> Result<LoadOutcome<Trial>> {
    let table = read_tsv(path)?;
    parse_trials(&table)
}

pub fn parse_trials(table: &TsvTable) -> Result<LoadOutcome<Trial>> {
    let id_col = table.require("trial_id")?;
    let sex_col = table.column("eligibility_sex");
    let title_col = table.column("official_title");
    let description_col = table.column("description");
    let criteria_col = table.column("eligibility_criteria");
    let outcomes_col = table.column("outcome_measures");
    let complete_col = table.column("registry_complete");

    let mut out = LoadOutcome::default();
    for row in &table.rows {
        if !table.is_well_formed(row) {
            warn!(
                source = %table.source,
                line = row.line_no,
                columns = row.width(),
                expected = table.width(),
                "skipping trial row with wrong column count"
            );
            out.malformed += 1;
            continue;
        }
        let Some(trial_id) = row.get(Some(id_col)).and_then(canonical_trial_id) else {
            warn!(source = %table.source, line = row.line_no, "skipping trial row without id");
            out.malformed += 1;
            continue;
        };
        out.records.push(Trial {
            trial_id,
            eligibility_sex: row
                .get(sex_col)
                .map(EligibilitySex::parse)
                .unwrap_or(EligibilitySex::Unknown),
            official_title: row.get(title_col).map(str::to_string),
            description: row.get(description_col).map(str::to_string),
            eligibility_criteria: row.get(criteria_col).map(str::to_string),
            outcome_measures: row.get(outcomes_col).map(str::to_string),
            registry_complete: parse_flag(row.get(complete_col)),
        });
    }
    Ok(out)
}
