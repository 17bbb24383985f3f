use std::path::Path;

use anyhow::Result;
use tracing::warn;

use crate::io::LoadOutcome;
use crate::io::table::{TsvTable, read_tsv};
use crate::model::Guideline;

pub fn read_guidelines(path: &Path) -> Result<LoadOutcome<Guideline>> {
    let table = read_tsv(path)?;
    parse_guidelines(&table)
}

pub fn parse_guidelines(table: &TsvTable) -> Result<LoadOutcome<Guideline>> {
    let id_col = table.require("guideline_id")?;
    let title_col = table.column("title");
    let year_col = table.column("publication_year");
    let specialty_col = table.column("specialty");

    let mut out = LoadOutcome::default();
    for row in &table.rows {
        let id = row.get(Some(id_col));
        let Some(id) = id.filter(|_| table.is_well_formed(row)) else {
            warn!(source = %table.source, line = row.line_no, "skipping malformed guideline row");
            out.malformed += 1;
            continue;
        };
        let publication_year = match row.get(year_col) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(year) => Some(year),
                Err(_) => {
                    warn!(
                        source = %table.source,
                        line = row.line_no,
                        value = raw,
                        "ignoring unparsable publication year"
                    );
                    None
                }
            },
            None => None,
        };
        out.records.push(Guideline {
            id: id.to_string(),
            title: row.get(title_col).map(str::to_string),
            publication_year,
            specialty: row.get(specialty_col).map(str::to_string),
        });
    }
    Ok(out)
}
