pub mod annotate;
pub mod composite;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::model::EligibilitySex;
use crate::patterns::WeightClass;

pub const SCORE_MAX: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassWeight {
    pub points: u32,
    pub cap: u32,
}

/// Points per weight class. Group names never appear here; a group only
/// contributes through the class it is declared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringConfig {
    pub high: ClassWeight,
    pub medium: ClassWeight,
    pub info: ClassWeight,
    pub inclusivity_points: u32,
    pub medium_total_cap: u32,
    pub total_cap: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high: ClassWeight { points: 2, cap: 6 },
            medium: ClassWeight { points: 1, cap: 3 },
            info: ClassWeight { points: 0, cap: 0 },
            inclusivity_points: 1,
            medium_total_cap: 4,
            total_cap: SCORE_MAX,
        }
    }
}

impl ScoringConfig {
    pub fn weight(&self, class: WeightClass) -> ClassWeight {
        match class {
            WeightClass::High => self.high,
            WeightClass::Medium => self.medium,
            WeightClass::Info => self.info,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_cap > SCORE_MAX {
            bail!(
                "scoring total cap {} exceeds the score ceiling {}",
                self.total_cap,
                SCORE_MAX
            );
        }
        if self.medium_total_cap < self.medium.cap {
            bail!("medium total cap must not be below the medium class cap");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceAnnotation {
    pub flags: Vec<bool>,
    pub snippets: Vec<Option<String>>,
    pub inclusive: bool,
    pub score: u8,
}

impl EvidenceAnnotation {
    pub fn has_evidence(&self) -> bool {
        self.score > 0
    }

    /// First (group index, snippet) pair in group order.
    pub fn first_snippet(&self) -> Option<(usize, &str)> {
        self.snippets
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.as_deref().map(|s| (i, s)))
    }
}

/// A scored record as seen by the scenario engine. In the citation view there
/// is one per citation; in the unique-trial view one per trial id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceRecord {
    pub citation_idx: usize,
    pub trial_id: Option<String>,
    pub registry_match: bool,
    pub registry_complete: bool,
    pub eligibility_sex: Option<EligibilitySex>,
    pub annotation: EvidenceAnnotation,
}
