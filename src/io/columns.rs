//! Column catalogue shared by the TSV writers and `data_dictionary.tsv`.
//!
//! `<group>` stands for every configured pattern group, `<name>` for every
//! scenario.

use crate::aggregate::Category;
use crate::patterns::PatternSet;

pub type ColumnDoc = (&'static str, &'static str);

pub const ANNOTATED_CITATIONS: &[ColumnDoc] = &[
    ("guideline_id", "Guideline identifier"),
    ("cited_work_id", "Identifier of the cited work, unique per guideline"),
    ("title", "Title of the cited work as read from the input, or NA"),
    ("abstract", "Abstract of the cited work as read from the input, or NA"),
    ("classified_trial", "1 if an upstream classifier labelled the work a trial"),
    ("primary_trial_id", "Primary registry identifier or NA"),
    ("trial_ids", "All distinct trial identifiers, primary first, ';' separated, or NA"),
    ("registry_match", "1 if at least one trial id has a registry record"),
    ("registry_complete", "1 if a matched registry record is flagged complete"),
    ("eligibility_sex", "Eligibility sex of the first matched trial (All, Male, Female, Unknown) or NA"),
    ("inclusive", "1 if a matched trial enrols women (All or Female)"),
];

pub const UNIQUE_TRIALS: &[ColumnDoc] = &[
    ("trial_id", "Canonical trial identifier"),
    ("guideline_id", "Guideline of the representative citation"),
    ("cited_work_id", "Representative citation chosen by link rank (registry match, complete, abstract, title)"),
    ("registry_match", "1 if the trial has a registry record"),
    ("registry_complete", "1 if the registry record is flagged complete"),
    ("eligibility_sex", "Eligibility sex from the registry record or NA"),
    ("citations", "Citation links naming this trial"),
    ("guidelines", "Distinct guidelines citing this trial"),
];

/// Repeated per pattern group, in group order, after the leading columns.
pub const GROUP_COLUMNS: &[ColumnDoc] = &[
    ("flag_<group>", "1 if any expression of the pattern group matched the record text"),
    ("snippet_<group>", "Text window around the group's first match, whitespace collapsed, or NA"),
];

pub const SCORE_TAIL: &[ColumnDoc] = &[(
    "score",
    "Composite evidence score, 0 to 10 (capped class points plus inclusivity)",
)];

pub const SCENARIO_OVERALL: &[ColumnDoc] = &[
    ("metric", "Name of a scenario-level statistic (one row per metric)"),
    ("value", "Value of the statistic"),
];

/// Metric rows of `overall.tsv`, written in this order.
pub const OVERALL_METRICS: &[ColumnDoc] = &[
    ("scenario", "Scenario name"),
    ("label", "Scenario display label"),
    ("data_source", "citations or unique_trials"),
    ("sex_verifiable", "1 if the scenario only selects records with registry sex data"),
    ("source_records", "Records in the scenario's data source before filtering"),
    ("matched_records", "Records selected by the scenario predicate"),
    ("records_with_evidence", "Selected records with score > 0"),
    ("evidence_pct", "records_with_evidence / matched_records * 100"),
    ("mean_score", "Mean score over all selected records"),
    ("evidence_mean_score", "Mean score over evidence-bearing records"),
    ("median_score", "Median score over all selected records"),
    ("guidelines_total", "Guidelines in the corpus (table plus citing guideline ids)"),
    ("guidelines_with_records", "Guidelines with at least one selected record"),
    ("eligibility_all", "Selected records whose trial enrols all sexes"),
    ("eligibility_male", "Selected records whose trial enrols men only"),
    ("eligibility_female", "Selected records whose trial enrols women only"),
    ("eligibility_unknown", "Selected records whose registry sex is unknown"),
    ("eligibility_no_registry", "Selected records without registry data"),
    ("group_<group>", "Selected records flagged by the pattern group"),
];

pub const SCENARIO_GUIDELINES: &[ColumnDoc] = &[
    ("guideline_id", "Guideline identifier"),
    ("title", "Guideline title from the guideline table, or NA"),
    ("publication_year", "Publication year from the guideline table, or NA"),
    ("specialty", "Clinical specialty from the guideline table, or NA"),
    ("matched_records", "Records of the guideline selected by the scenario"),
    ("records_with_evidence", "Selected records with score > 0"),
    ("evidence_pct", "records_with_evidence / matched_records * 100"),
    ("mean_score", "Mean score over all selected records"),
    ("evidence_mean_score", "Mean score over evidence-bearing records"),
    ("category", "Evidence category from evidence_pct and evidence_mean_score"),
];

pub const SCENARIO_CATEGORIES: &[ColumnDoc] = &[
    ("category", "Evidence category label"),
    ("guidelines", "Guidelines in the category; sums to the guideline corpus size"),
    ("pct", "guidelines / corpus guidelines * 100"),
];

/// Followed by one count column per category slug.
pub const SCENARIO_COMPARISON: &[ColumnDoc] = &[
    ("scenario", "Scenario name, one row per scenario in configuration order"),
    ("label", "Scenario display label"),
    ("data_source", "citations or unique_trials"),
    ("sex_verifiable", "1 if the scenario only selects records with registry sex data"),
    ("matched_records", "Records selected by the scenario predicate"),
    ("records_with_evidence", "Selected records with score > 0"),
    ("evidence_pct", "records_with_evidence / matched_records * 100"),
    ("evidence_mean_score", "Mean score over evidence-bearing records"),
    ("guidelines_with_records", "Guidelines with at least one selected record"),
];

pub const RECOMMENDATIONS: &[ColumnDoc] = &[
    ("rule_id", "Recommendation rule that fired"),
    ("scenario", "Scenario the rule fired for"),
    ("priority", "high, medium or low"),
    ("guidelines", "Number of affected guidelines"),
    ("guideline_ids", "Affected guideline ids, ';' separated"),
    ("rationale", "Rule template rendered with counts, scenario label and percentage"),
    ("snippets", "Up to three distinct 'group: text' snippets from affected guidelines, ' | ' separated, or NA"),
    ("stakeholders", "Stakeholders addressed by the rule, ';' separated"),
];

pub const STAKEHOLDER_ACTIONS: &[ColumnDoc] = &[
    ("stakeholder", "Audience of the action"),
    ("priority", "Priority of the originating recommendation"),
    ("rule_id", "Recommendation rule that produced the action"),
    ("scenario", "Scenario the rule fired for"),
    ("guidelines", "Number of affected guidelines"),
    ("action", "Suggested action for the stakeholder"),
];

pub const DATA_DICTIONARY: &[ColumnDoc] = &[
    ("file", "Output file, relative to the output directory"),
    ("column", "Column name, or metric name for overall.tsv rows"),
    ("description", "Meaning and derivation of the column"),
];

pub const SCORING_METHODOLOGY: &[ColumnDoc] = &[
    ("component", "Score component or category rule"),
    ("rule", "When the component applies"),
    ("points", "Points per matched group, or NA"),
    ("cap", "Upper bound of the component, or NA"),
];

pub const PATTERN_GROUPS: &[ColumnDoc] = &[
    ("group", "Pattern group name"),
    ("weight_class", "high, medium or info"),
    ("points", "Points the group contributes when matched"),
    ("pattern", "Case-insensitive regular expression, one row per expression"),
];

/// Layout of one output table: leading columns, then the per-group columns
/// when `per_group` is set, then `tail`.
#[derive(Debug, Clone, Copy)]
pub struct TableDoc {
    pub file: &'static str,
    pub columns: &'static [ColumnDoc],
    pub per_group: bool,
    pub tail: &'static [ColumnDoc],
}

const fn table(file: &'static str, columns: &'static [ColumnDoc]) -> TableDoc {
    TableDoc {
        file,
        columns,
        per_group: false,
        tail: &[],
    }
}

pub const OUTPUT_TABLES: &[TableDoc] = &[
    TableDoc {
        file: "annotated_citations.tsv",
        columns: ANNOTATED_CITATIONS,
        per_group: true,
        tail: SCORE_TAIL,
    },
    TableDoc {
        file: "unique_trials.tsv",
        columns: UNIQUE_TRIALS,
        per_group: true,
        tail: SCORE_TAIL,
    },
    table("scenarios/<name>/overall.tsv", SCENARIO_OVERALL),
    table("scenarios/<name>/overall.tsv", OVERALL_METRICS),
    table("scenarios/<name>/guidelines.tsv", SCENARIO_GUIDELINES),
    table("scenarios/<name>/categories.tsv", SCENARIO_CATEGORIES),
    table("scenario_comparison.tsv", SCENARIO_COMPARISON),
    table("recommendations.tsv", RECOMMENDATIONS),
    table("stakeholder_actions.tsv", STAKEHOLDER_ACTIONS),
    table("data_dictionary.tsv", DATA_DICTIONARY),
    table("scoring_methodology.tsv", SCORING_METHODOLOGY),
    table("pattern_groups.tsv", PATTERN_GROUPS),
];

pub fn names(cols: &[ColumnDoc]) -> Vec<&'static str> {
    cols.iter().map(|(name, _)| *name).collect()
}

/// `flag_<group>\tsnippet_<group>` for every group, in group order.
pub fn group_names(patterns: &PatternSet) -> Vec<String> {
    let mut out = Vec::with_capacity(patterns.len() * GROUP_COLUMNS.len());
    for group in &patterns.groups {
        for (name, _) in GROUP_COLUMNS {
            out.push(name.replace("<group>", &group.name));
        }
    }
    out
}

pub fn header(lead: &[ColumnDoc], patterns: Option<&PatternSet>, tail: &[ColumnDoc]) -> String {
    let mut cols: Vec<String> = names(lead).into_iter().map(str::to_string).collect();
    if let Some(patterns) = patterns {
        cols.extend(group_names(patterns));
    }
    cols.extend(names(tail).into_iter().map(str::to_string));
    cols.join("\t")
}

pub fn comparison_header() -> String {
    let mut cols = names(SCENARIO_COMPARISON);
    cols.extend(Category::ALL.iter().map(|c| c.slug()));
    cols.join("\t")
}
