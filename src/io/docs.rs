use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::aggregate::{Category, CategoryThresholds};
use crate::io::columns::{self, ColumnDoc};
use crate::io::tsv_writer::{cell, create};
use crate::patterns::{PatternSet, WeightClass};
use crate::scores::ScoringConfig;

/// Documents every column of every output table, straight from the column
/// catalogue the writers build their headers from.
pub fn write_data_dictionary(path: &Path) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", columns::header(columns::DATA_DICTIONARY, None, &[]))?;
    for table in columns::OUTPUT_TABLES {
        let groups: &[ColumnDoc] = if table.per_group {
            columns::GROUP_COLUMNS
        } else {
            &[]
        };
        for (column, description) in table.columns.iter().chain(groups).chain(table.tail) {
            writeln!(w, "{}\t{}\t{}", table.file, column, description)?;
        }
        if table.columns == columns::SCENARIO_COMPARISON {
            for category in Category::ALL {
                writeln!(
                    w,
                    "{}\t{}\tGuidelines categorized {}",
                    table.file,
                    category.slug(),
                    category.label()
                )?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

pub fn write_scoring_methodology(
    path: &Path,
    scoring: &ScoringConfig,
    thresholds: &CategoryThresholds,
) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", columns::header(columns::SCORING_METHODOLOGY, None, &[]))?;
    for class in [WeightClass::High, WeightClass::Medium, WeightClass::Info] {
        let weight = scoring.weight(class);
        writeln!(
            w,
            "{}_pattern_group\tper matched group of this weight class\t{}\t{}",
            class.as_str(),
            weight.points,
            weight.cap
        )?;
    }
    writeln!(
        w,
        "inclusivity\tlinked trial enrols women (All or Female)\t{}\t{}",
        scoring.inclusivity_points, scoring.medium_total_cap
    )?;
    writeln!(w, "total\tsum of capped components\tNA\t{}", scoring.total_cap)?;
    writeln!(
        w,
        "category_strong\tevidence_pct >= {} and evidence_mean_score >= {:.1}\tNA\tNA",
        thresholds.strong_pct, thresholds.strong_mean
    )?;
    writeln!(
        w,
        "category_moderate\tevidence_pct >= {} and evidence_mean_score >= {:.1}\tNA\tNA",
        thresholds.moderate_pct, thresholds.moderate_mean
    )?;
    writeln!(
        w,
        "category_weak\tevidence_pct >= {}\tNA\tNA",
        thresholds.weak_pct
    )?;
    writeln!(w, "category_inadequate_no_sex\tmatched records without sufficient evidence\tNA\tNA")?;
    writeln!(w, "category_inadequate_no_trials\tno matched records\tNA\tNA")?;
    w.flush()?;
    Ok(())
}

pub fn write_pattern_groups(path: &Path, patterns: &PatternSet, scoring: &ScoringConfig) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", columns::header(columns::PATTERN_GROUPS, None, &[]))?;
    for group in &patterns.groups {
        let points = scoring.weight(group.weight_class).points;
        for expr in &group.patterns {
            writeln!(
                w,
                "{}\t{}\t{}\t{}",
                group.name,
                group.weight_class.as_str(),
                points,
                cell(expr)
            )?;
        }
    }
    w.flush()?;
    Ok(())
}
