use serde::{Deserialize, Serialize};

use super::domain::AttemptSnapshot;
use super::policies;
use super::rubric::CompetencyDefinition;

/// Fixed qualitative bands for competency percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetencyLevel {
    Expert,
    Proficient,
    Developing,
    Novice,
}

impl CompetencyLevel {
    pub const fn label(self) -> &'static str {
        match self {
            CompetencyLevel::Expert => "expert",
            CompetencyLevel::Proficient => "proficient",
            CompetencyLevel::Developing => "developing",
            CompetencyLevel::Novice => "novice",
        }
    }

    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            CompetencyLevel::Expert
        } else if percentage >= 75.0 {
            CompetencyLevel::Proficient
        } else if percentage >= 50.0 {
            CompetencyLevel::Developing
        } else {
            CompetencyLevel::Novice
        }
    }
}

/// Point totals for one competency bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub name: String,
    pub area: String,
    pub points_earned: u32,
    pub points_possible: u32,
    pub percentage: f64,
    pub level: CompetencyLevel,
    pub is_passing: bool,
}

/// Sum earned and possible points across every answer row tagged with the
/// competency's area. A bucket with zero possible points resolves to the 0.0
/// sentinel via the shared guard.
pub(crate) fn score_competencies(
    snapshot: &AttemptSnapshot,
    competencies: &[CompetencyDefinition],
) -> Vec<CompetencyScore> {
    competencies
        .iter()
        .map(|definition| {
            let mut earned = 0u32;
            let mut possible = 0u32;
            for answer in &snapshot.answers {
                if answer.competency_area.as_deref() == Some(definition.area.as_str()) {
                    earned += answer.points_awarded;
                    possible += answer.points_possible;
                }
            }

            let percentage = policies::guarded_percentage(f64::from(earned), f64::from(possible));

            CompetencyScore {
                name: definition.name.clone(),
                area: definition.area.clone(),
                points_earned: earned,
                points_possible: possible,
                percentage,
                level: CompetencyLevel::from_percentage(percentage),
                is_passing: percentage >= definition.passing_pct,
            }
        })
        .collect()
}
