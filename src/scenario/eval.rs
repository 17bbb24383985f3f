use serde_json::Value;

use crate::model::Citation;
use crate::scenario::{DataSource, Predicate, RecordField, ScenarioDef};
use crate::scores::EvidenceRecord;

/// Borrowed view over the annotated datasets of one run.
#[derive(Debug, Clone, Copy)]
pub struct AnnotatedDataset<'a> {
    pub citations: &'a [Citation],
    pub universe: &'a [EvidenceRecord],
    pub unique_trials: &'a [EvidenceRecord],
}

impl<'a> AnnotatedDataset<'a> {
    pub fn source(&self, source: DataSource) -> &'a [EvidenceRecord] {
        match source {
            DataSource::Citations => self.universe,
            DataSource::UniqueTrials => self.unique_trials,
        }
    }

    pub fn citation(&self, record: &EvidenceRecord) -> &'a Citation {
        &self.citations[record.citation_idx]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Text(&'a str),
    List(Vec<&'a str>),
    Int(i64),
}

pub fn field_value<'a>(
    field: RecordField,
    record: &'a EvidenceRecord,
    citation: &'a Citation,
) -> FieldValue<'a> {
    match field {
        RecordField::GuidelineId => FieldValue::Text(&citation.guideline_id),
        RecordField::CitedWorkId => FieldValue::Text(&citation.cited_work_id),
        RecordField::ClassifiedTrial => FieldValue::Bool(citation.classified_trial),
        RecordField::PrimaryTrialId => opt_text(citation.primary_trial_id.as_deref()),
        RecordField::TrialIds => FieldValue::List(citation.trial_ids()),
        RecordField::RegistryMatch => FieldValue::Bool(record.registry_match),
        RecordField::RegistryComplete => FieldValue::Bool(record.registry_complete),
        RecordField::EligibilitySex => match record.eligibility_sex {
            Some(sex) => FieldValue::Text(sex.as_str()),
            None => FieldValue::Null,
        },
        RecordField::Title => opt_text(citation.title.as_deref()),
        RecordField::Abstract => opt_text(citation.abstract_text.as_deref()),
        RecordField::Score => FieldValue::Int(record.annotation.score as i64),
    }
}

fn opt_text(s: Option<&str>) -> FieldValue<'_> {
    match s {
        Some(s) if !s.trim().is_empty() => FieldValue::Text(s),
        _ => FieldValue::Null,
    }
}

pub fn matches(predicate: &Predicate, record: &EvidenceRecord, citation: &Citation) -> bool {
    match predicate {
        Predicate::All => true,
        Predicate::Equals { field, value } => {
            match (field_value(*field, record, citation), value) {
                (FieldValue::Null, Value::Null) => true,
                (FieldValue::Bool(b), Value::Bool(x)) => b == *x,
                (FieldValue::Text(s), Value::String(x)) => s.eq_ignore_ascii_case(x),
                (FieldValue::List(items), Value::String(x)) => {
                    items.iter().any(|s| s.eq_ignore_ascii_case(x))
                }
                (FieldValue::Int(i), Value::Number(n)) => n.as_i64() == Some(i),
                _ => false,
            }
        }
        Predicate::NotNull { field } => match field_value(*field, record, citation) {
            FieldValue::Null => false,
            FieldValue::List(items) => !items.is_empty(),
            _ => true,
        },
        Predicate::Contains { field, value } => {
            let needle = value.to_lowercase();
            match field_value(*field, record, citation) {
                FieldValue::Text(s) => s.to_lowercase().contains(&needle),
                FieldValue::List(items) => items.iter().any(|s| s.eq_ignore_ascii_case(value)),
                _ => false,
            }
        }
        Predicate::And { all } => all.iter().all(|p| matches(p, record, citation)),
        Predicate::Or { any } => any.iter().any(|p| matches(p, record, citation)),
        Predicate::Not { inner } => !matches(inner, record, citation),
    }
}

/// Indices into the scenario's source view, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSelection {
    pub scenario: String,
    pub source: DataSource,
    pub indices: Vec<usize>,
}

impl ScenarioSelection {
    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn records<'d>(
        &'d self,
        dataset: AnnotatedDataset<'d>,
    ) -> impl Iterator<Item = &'d EvidenceRecord> + 'd {
        let source = dataset.source(self.source);
        self.indices.iter().map(move |&i| &source[i])
    }
}

pub fn evaluate(def: &ScenarioDef, dataset: AnnotatedDataset<'_>) -> ScenarioSelection {
    let source = dataset.source(def.data_source);
    let indices = source
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(&def.predicate, record, dataset.citation(record)))
        .map(|(i, _)| i)
        .collect();
    ScenarioSelection {
        scenario: def.name.clone(),
        source: def.data_source,
        indices,
    }
}
