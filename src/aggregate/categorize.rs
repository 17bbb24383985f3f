use serde::Serialize;

use crate::aggregate::GuidelineTally;
use crate::math::stats::at_least_pct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Strong,
    Moderate,
    Weak,
    #[serde(rename = "Inadequate – No Sex")]
    InadequateNoSex,
    #[serde(rename = "Inadequate – No Trials")]
    InadequateNoTrials,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Strong,
        Category::Moderate,
        Category::Weak,
        Category::InadequateNoSex,
        Category::InadequateNoTrials,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
            Self::InadequateNoSex => "Inadequate – No Sex",
            Self::InadequateNoTrials => "Inadequate – No Trials",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::InadequateNoSex => "inadequate_no_sex",
            Self::InadequateNoTrials => "inadequate_no_trials",
        }
    }

    pub fn is_inadequate(&self) -> bool {
        matches!(self, Self::InadequateNoSex | Self::InadequateNoTrials)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryThresholds {
    pub strong_pct: u32,
    pub strong_mean: f64,
    pub moderate_pct: u32,
    pub moderate_mean: f64,
    pub weak_pct: u32,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            strong_pct: 20,
            strong_mean: 2.0,
            moderate_pct: 10,
            moderate_mean: 1.0,
            weak_pct: 5,
        }
    }
}

/// First matching rule wins. The mean is taken over evidence-bearing records.
pub fn categorize(tally: &GuidelineTally, th: &CategoryThresholds) -> Category {
    let matched = tally.matched;
    let evidence = tally.with_evidence;
    if matched == 0 {
        return Category::InadequateNoTrials;
    }
    let mean = tally.evidence_mean_score();
    if at_least_pct(evidence, matched, th.strong_pct) && evidence > 0 && mean >= th.strong_mean {
        Category::Strong
    } else if at_least_pct(evidence, matched, th.moderate_pct)
        && evidence > 0
        && mean >= th.moderate_mean
    {
        Category::Moderate
    } else if at_least_pct(evidence, matched, th.weak_pct) && evidence > 0 {
        Category::Weak
    } else {
        Category::InadequateNoSex
    }
}
