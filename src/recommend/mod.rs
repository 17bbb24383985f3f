use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::aggregate::{Category, ScenarioResult};
use crate::math::stats::{at_least_pct, percentage};
use crate::model::EligibilitySex;
use crate::scenario::{AnnotatedDataset, ScenarioSelection};

const MAX_SNIPPETS: usize = 3;
const LOW_CORPUS_PCT: u32 = 20;
const UNKNOWN_ELIGIBILITY_PCT: u32 = 10;
const INADEQUATE_MAJORITY_PCT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stakeholder {
    GuidelineDevelopers,
    Funders,
    Researchers,
    Registries,
    PolicyMakers,
}

impl Stakeholder {
    pub const ALL: [Stakeholder; 5] = [
        Stakeholder::GuidelineDevelopers,
        Stakeholder::Funders,
        Stakeholder::Researchers,
        Stakeholder::Registries,
        Stakeholder::PolicyMakers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GuidelineDevelopers => "guideline_developers",
            Self::Funders => "funders",
            Self::Researchers => "researchers",
            Self::Registries => "registries",
            Self::PolicyMakers => "policy_makers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCondition {
    Category {
        category: Category,
        sex_verifiable_only: bool,
    },
    CorpusEvidenceBelow {
        pct: u32,
    },
    UnknownEligibilityAbove {
        pct: u32,
    },
    InadequateShareAbove {
        pct: u32,
    },
}

/// A rule fires per scenario. `template` placeholders: `{n}` affected
/// guidelines, `{scenario}` scenario label, `{pct}` the measured percentage.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub priority: Priority,
    pub condition: RuleCondition,
    pub template: &'static str,
    pub actions: &'static [(Stakeholder, &'static str)],
}

pub const RULES: &[Rule] = &[
    Rule {
        id: "no_sex_evidence",
        priority: Priority::High,
        condition: RuleCondition::Category {
            category: Category::InadequateNoSex,
            sex_verifiable_only: true,
        },
        template: "{n} guidelines cite trials ({scenario}) without any sex-related analysis; reassess these recommendations for applicability to women and men",
        actions: &[
            (
                Stakeholder::GuidelineDevelopers,
                "State explicitly whether recommendations apply to both sexes and flag the evidence gap",
            ),
            (
                Stakeholder::Researchers,
                "Report outcomes disaggregated by sex for the cited trial populations",
            ),
            (
                Stakeholder::Funders,
                "Require sex-disaggregated analysis plans in funded trials",
            ),
        ],
    },
    Rule {
        id: "no_trial_evidence",
        priority: Priority::Medium,
        condition: RuleCondition::Category {
            category: Category::InadequateNoTrials,
            sex_verifiable_only: false,
        },
        template: "{n} guidelines have no trial evidence under {scenario}; document the evidence base used instead",
        actions: &[
            (
                Stakeholder::GuidelineDevelopers,
                "Document the evidence base and its sex composition when no trials are cited",
            ),
            (
                Stakeholder::Funders,
                "Prioritise trials in clinical areas where guidelines lack trial evidence",
            ),
        ],
    },
    Rule {
        id: "weak_sex_evidence",
        priority: Priority::Medium,
        condition: RuleCondition::Category {
            category: Category::Weak,
            sex_verifiable_only: false,
        },
        template: "{n} guidelines show only weak sex-related evidence under {scenario}; strengthen sex-specific appraisal of cited trials",
        actions: &[
            (
                Stakeholder::GuidelineDevelopers,
                "Add sex-specific evidence appraisal to the guideline methodology",
            ),
            (
                Stakeholder::Researchers,
                "Prespecify sex subgroup analyses with adequate power",
            ),
        ],
    },
    Rule {
        id: "low_corpus_evidence",
        priority: Priority::High,
        condition: RuleCondition::CorpusEvidenceBelow {
            pct: LOW_CORPUS_PCT,
        },
        template: "Only {pct}% of matched records carry sex-related evidence under {scenario}; {n} guidelines fall below the corpus threshold",
        actions: &[
            (
                Stakeholder::PolicyMakers,
                "Adopt sex and gender reporting standards for guideline development",
            ),
            (
                Stakeholder::Funders,
                "Make sex as a biological variable a funding criterion",
            ),
            (
                Stakeholder::Researchers,
                "Follow SAGER reporting for trial publications",
            ),
        ],
    },
    Rule {
        id: "unknown_eligibility",
        priority: Priority::Low,
        condition: RuleCondition::UnknownEligibilityAbove {
            pct: UNKNOWN_ELIGIBILITY_PCT,
        },
        template: "{pct}% of registry-matched records have unknown eligibility sex under {scenario}; {n} guidelines are affected",
        actions: &[(
            Stakeholder::Registries,
            "Make the eligibility sex field mandatory and validated at registration",
        )],
    },
    Rule {
        id: "majority_inadequate",
        priority: Priority::High,
        condition: RuleCondition::InadequateShareAbove {
            pct: INADEQUATE_MAJORITY_PCT,
        },
        template: "{pct}% of guidelines are inadequate under {scenario}; {n} guidelines need sex-related evidence review",
        actions: &[
            (
                Stakeholder::PolicyMakers,
                "Require sex-related evidence review in guideline endorsement",
            ),
            (
                Stakeholder::GuidelineDevelopers,
                "Schedule sex-related evidence review in the next update cycle",
            ),
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub rule_id: String,
    pub scenario: String,
    pub priority: Priority,
    pub guideline_ids: Vec<String>,
    pub rationale: String,
    pub snippets: Vec<String>,
    pub stakeholders: Vec<Stakeholder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeholderAction {
    pub stakeholder: Stakeholder,
    pub rule_id: String,
    pub scenario: String,
    pub priority: Priority,
    pub guidelines: usize,
    pub action: String,
}

struct Firing {
    guidelines: Vec<String>,
    pct: f64,
}

/// Evaluates every rule against every scenario. `results` and `selections`
/// are aligned by position; output follows scenario order then rule order.
pub fn generate(
    results: &[ScenarioResult],
    selections: &[ScenarioSelection],
    dataset: AnnotatedDataset<'_>,
    group_names: &[&str],
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    for (result, selection) in results.iter().zip(selections) {
        for rule in RULES {
            let Some(firing) = evaluate_rule(rule, result, selection, dataset) else {
                continue;
            };
            let snippets = collect_snippets(&firing.guidelines, selection, dataset, group_names);
            out.push(Recommendation {
                rule_id: rule.id.to_string(),
                scenario: result.scenario.clone(),
                priority: rule.priority,
                rationale: render(rule.template, firing.guidelines.len(), &result.label, firing.pct),
                guideline_ids: firing.guidelines,
                snippets,
                stakeholders: rule.actions.iter().map(|(s, _)| *s).collect(),
            });
        }
    }
    out
}

fn evaluate_rule(
    rule: &Rule,
    result: &ScenarioResult,
    selection: &ScenarioSelection,
    dataset: AnnotatedDataset<'_>,
) -> Option<Firing> {
    let total = result.guidelines.len();
    match rule.condition {
        RuleCondition::Category {
            category,
            sex_verifiable_only,
        } => {
            if sex_verifiable_only && !result.sex_verifiable {
                return None;
            }
            let ids = owned(result.guidelines_in(category));
            if ids.is_empty() {
                return None;
            }
            let pct = percentage(ids.len(), total);
            Some(Firing { guidelines: ids, pct })
        }
        RuleCondition::CorpusEvidenceBelow { pct } => {
            let corpus = &result.corpus;
            if corpus.matched == 0 || at_least_pct(corpus.with_evidence, corpus.matched, pct) {
                return None;
            }
            let ids = result
                .guidelines
                .iter()
                .filter(|g| {
                    g.tally.matched > 0 && !at_least_pct(g.tally.with_evidence, g.tally.matched, pct)
                })
                .map(|g| g.guideline_id.clone())
                .collect();
            Some(Firing {
                guidelines: ids,
                pct: corpus.evidence_pct(),
            })
        }
        RuleCondition::UnknownEligibilityAbove { pct } => {
            let registry = result.eligibility.registry_matched();
            let unknown = result.eligibility.unknown;
            if registry == 0 || unknown as u64 * 100 <= pct as u64 * registry as u64 {
                return None;
            }
            let ids: BTreeSet<String> = selection
                .records(dataset)
                .filter(|r| r.eligibility_sex == Some(EligibilitySex::Unknown))
                .map(|r| dataset.citation(r).guideline_id.clone())
                .collect();
            Some(Firing {
                guidelines: ids.into_iter().collect(),
                pct: percentage(unknown, registry),
            })
        }
        RuleCondition::InadequateShareAbove { pct } => {
            let ids: Vec<String> = result
                .guidelines
                .iter()
                .filter(|g| g.category.is_inadequate())
                .map(|g| g.guideline_id.clone())
                .collect();
            if total == 0 || ids.len() as u64 * 100 <= pct as u64 * total as u64 {
                return None;
            }
            let share = percentage(ids.len(), total);
            Some(Firing {
                guidelines: ids,
                pct: share,
            })
        }
    }
}

fn owned(ids: Vec<&str>) -> Vec<String> {
    ids.into_iter().map(str::to_string).collect()
}

fn collect_snippets(
    guidelines: &[String],
    selection: &ScenarioSelection,
    dataset: AnnotatedDataset<'_>,
    group_names: &[&str],
) -> Vec<String> {
    let affected: BTreeSet<&str> = guidelines.iter().map(|s| s.as_str()).collect();
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for record in selection.records(dataset) {
        if out.len() >= MAX_SNIPPETS {
            break;
        }
        if !affected.contains(dataset.citation(record).guideline_id.as_str()) {
            continue;
        }
        let Some((group, text)) = record.annotation.first_snippet() else {
            continue;
        };
        if !seen.insert(text) {
            continue;
        }
        let name = group_names.get(group).copied().unwrap_or("unknown");
        out.push(format!("{}: {}", name, text));
    }
    out
}

fn render(template: &str, n: usize, scenario: &str, pct: f64) -> String {
    template
        .replace("{n}", &n.to_string())
        .replace("{scenario}", scenario)
        .replace("{pct}", &format!("{:.1}", pct))
}

/// Regroups recommendations per stakeholder, stakeholders in fixed order and
/// recommendations in generation order within each.
pub fn stakeholder_actions(recommendations: &[Recommendation]) -> Vec<StakeholderAction> {
    let rules: BTreeMap<&str, &Rule> = RULES.iter().map(|r| (r.id, r)).collect();
    let mut out = Vec::new();
    for stakeholder in Stakeholder::ALL {
        for rec in recommendations {
            let Some(rule) = rules.get(rec.rule_id.as_str()) else {
                continue;
            };
            for (who, action) in rule.actions {
                if *who != stakeholder {
                    continue;
                }
                out.push(StakeholderAction {
                    stakeholder,
                    rule_id: rec.rule_id.clone(),
                    scenario: rec.scenario.clone(),
                    priority: rec.priority,
                    guidelines: rec.guideline_ids.len(),
                    action: action.to_string(),
                });
            }
        }
    }
    out
}
