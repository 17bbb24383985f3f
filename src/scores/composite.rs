use crate::patterns::WeightClass;
use crate::scores::ScoringConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub high: u32,
    pub medium: u32,
    pub info: u32,
    pub total: u32,
}

pub fn composite_score(
    config: &ScoringConfig,
    classes: &[WeightClass],
    flags: &[bool],
    inclusive: bool,
) -> u8 {
    score_breakdown(config, classes, flags, inclusive).total as u8
}

/// Each class is capped before the classes are summed, so setting another
/// flag can never lower the total.
pub fn score_breakdown(
    config: &ScoringConfig,
    classes: &[WeightClass],
    flags: &[bool],
    inclusive: bool,
) -> ScoreBreakdown {
    let mut high = 0u32;
    let mut medium = 0u32;
    let mut info = 0u32;
    for (class, &flag) in classes.iter().zip(flags.iter()) {
        if !flag {
            continue;
        }
        match class {
            WeightClass::High => high += 1,
            WeightClass::Medium => medium += 1,
            WeightClass::Info => info += 1,
        }
    }

    let high_pts = (high * config.high.points).min(config.high.cap);
    let mut medium_pts = (medium * config.medium.points).min(config.medium.cap);
    if inclusive {
        medium_pts += config.inclusivity_points;
    }
    let medium_pts = medium_pts.min(config.medium_total_cap);
    let info_pts = (info * config.info.points).min(config.info.cap);

    ScoreBreakdown {
        high: high_pts,
        medium: medium_pts,
        info: info_pts,
        total: (high_pts + medium_pts + info_pts).min(config.total_cap),
    }
}
