use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::io::open_maybe_gz;

/// A header-addressed TSV. Blank lines and `#` comments are skipped; rows keep
/// their source line number so loaders can report them.
#[derive(Debug, Clone)]
pub struct TsvTable {
    pub source: String,
    header: Vec<String>,
    index: HashMap<String, usize>,
    pub rows: Vec<TsvRow>,
}

#[derive(Debug, Clone)]
pub struct TsvRow {
    pub line_no: usize,
    fields: Vec<String>,
}

impl TsvRow {
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Trimmed field; empty values and absent columns read as `None`.
    pub fn get(&self, col: Option<usize>) -> Option<&str> {
        let value = self.fields.get(col?)?.trim();
        if value.is_empty() { None } else { Some(value) }
    }
}

impl TsvTable {
    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize> {
        match self.column(name) {
            Some(idx) => Ok(idx),
            None => bail!("{}: missing required column '{}'", self.source, name),
        }
    }

    pub fn is_well_formed(&self, row: &TsvRow) -> bool {
        row.width() == self.width()
    }
}

pub fn read_tsv(path: &Path) -> Result<TsvTable> {
    let reader = open_maybe_gz(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_tsv(BufReader::new(reader), &path.display().to_string())
}

pub fn parse_tsv<R: BufRead>(reader: R, source: &str) -> Result<TsvTable> {
    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("{}:{} read failed", source, line_no))?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let fields: Vec<String> = line.split('\t').map(|s| s.to_string()).collect();
        if header.is_none() {
            header = Some(fields.iter().map(|s| s.trim().to_ascii_lowercase()).collect());
            continue;
        }
        rows.push(TsvRow { line_no, fields });
    }
    let Some(header) = header else {
        bail!("{}: empty TSV (no header row)", source);
    };
    let mut index = HashMap::new();
    for (i, name) in header.iter().enumerate() {
        if index.insert(name.clone(), i).is_some() {
            bail!("{}: duplicate column '{}'", source, name);
        }
    }
    Ok(TsvTable {
        source: source.to_string(),
        header,
        index,
        rows,
    })
}

pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.to_ascii_lowercase()).as_deref(),
        Some("true" | "t" | "1" | "yes" | "y")
    )
}
