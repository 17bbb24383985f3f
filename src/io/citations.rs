use std::path::Path;

use anyhow::Result;
use tracing::warn;

use crate::io::LoadOutcome;
use crate::io::table::{TsvTable, parse_flag, read_tsv};
use crate::model::{Citation, canonical_trial_id, split_trial_ids};

pub fn read_citations(path: &Path) -> Result<LoadOutcome<Citation>> {
    let table = read_tsv(path)?;
    parse_citations(&table)
}

pub fn parse_citations(table: &TsvTable) -> Result<LoadOutcome<Citation>> {
    let guideline_col = table.require("guideline_id")?;
    let work_col = table.require("cited_work_id")?;
    let title_col = table.column("title");
    let abstract_col = table.column("abstract");
    let classified_col = table.column("classified_trial");
    let primary_col = table.column("primary_trial_id");
    let all_col = table.column("all_trial_ids");

    let mut out = LoadOutcome::default();
    for row in &table.rows {
        if !table.is_well_formed(row) {
            warn!(
                source = %table.source,
                line = row.line_no,
                columns = row.width(),
                expected = table.width(),
                "skipping citation row with wrong column count"
            );
            out.malformed += 1;
            continue;
        }
        let (Some(guideline_id), Some(cited_work_id)) =
            (row.get(Some(guideline_col)), row.get(Some(work_col)))
        else {
            warn!(
                source = %table.source,
                line = row.line_no,
                "skipping citation row without guideline or cited work id"
            );
            out.malformed += 1;
            continue;
        };
        let primary_trial_id = row.get(primary_col).and_then(canonical_trial_id);
        let all_trial_ids = row.get(all_col).map(split_trial_ids).unwrap_or_default();
        out.records.push(Citation {
            guideline_id: guideline_id.to_string(),
            cited_work_id: cited_work_id.to_string(),
            title: row.get(title_col).map(str::to_string),
            abstract_text: row.get(abstract_col).map(str::to_string),
            classified_trial: parse_flag(row.get(classified_col)),
            primary_trial_id,
            all_trial_ids,
        });
    }
    Ok(out)
}
