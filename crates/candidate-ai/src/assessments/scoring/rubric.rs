use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::ChoiceLabel;

/// Expected direction of the self-report vs. behavior relationship in a
/// consistency check. The directional constants are fixed, not fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationSign {
    Positive,
    Negative,
}

impl CorrelationSign {
    pub const fn expected_value(self) -> f64 {
        match self {
            CorrelationSign::Positive => 0.7,
            CorrelationSign::Negative => -0.7,
        }
    }
}

/// One ethical-dilemma scenario feeding a dimension: which choice counts as
/// aligned, and how much that scenario weighs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioIndicator {
    pub scenario: String,
    pub expected_choice: ChoiceLabel,
    pub weight: f64,
}

/// Cross-check between a subset of a dimension's Likert questions and a
/// subset of its scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    pub likert_questions: Vec<u32>,
    pub scenarios: Vec<String>,
    pub expected: CorrelationSign,
}

/// Static definition of one behavioral dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionDefinition {
    pub name: String,
    pub likert_questions: Vec<u32>,
    #[serde(default)]
    pub indicators: Vec<ScenarioIndicator>,
    #[serde(default)]
    pub consistency_checks: Vec<ConsistencyCheck>,
}

/// Point-based competency bucket keyed by the question tag `area`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyDefinition {
    pub name: String,
    pub area: String,
    pub passing_pct: f64,
}

/// Percentage thresholds for the three behavioral levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBands {
    pub high: f64,
    pub moderate: f64,
}

/// Cutoffs below which the dimension scorer raises red flags. Both are
/// fractions in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlagThresholds {
    pub alignment: f64,
    pub consistency: f64,
}

/// Relative contribution of the four integrity subscores. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrityWeights {
    pub desirability: f64,
    pub consistency: f64,
    pub patterns: f64,
    pub awareness: f64,
}

impl IntegrityWeights {
    pub fn total(&self) -> f64 {
        self.desirability + self.consistency + self.patterns + self.awareness
    }
}

/// Tunable constants for the honesty assessor. Thresholds are configuration,
/// never derived from the sample under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrityBands {
    pub consistency_high: f64,
    pub consistency_moderate: f64,
    pub desirability_self_report_pct: f64,
    pub desirability_alignment: f64,
    pub straightline_min_answers: usize,
    pub extreme_ratio_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityConfig {
    pub weights: IntegrityWeights,
    pub bands: IntegrityBands,
}

/// Hire recommendation tiers surfaced on the assembled report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    StrongHire,
    Hire,
    Consider,
    DoNotHire,
}

impl RecommendationTier {
    pub const fn label(self) -> &'static str {
        match self {
            RecommendationTier::StrongHire => "Strong Hire",
            RecommendationTier::Hire => "Hire",
            RecommendationTier::Consider => "Consider",
            RecommendationTier::DoNotHire => "Do Not Hire",
        }
    }
}

/// One row of the recommendation decision table. Rules are evaluated in
/// order; the first match wins and `DoNotHire` is the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub tier: RecommendationTier,
    pub requires_overall_pass: bool,
    pub min_competency_pass_ratio: f64,
    pub min_integrity_score: u8,
}

/// The injected, versioned scoring configuration. Everything the scorers
/// treat as a constant lives here so rubrics can be versioned and tested
/// independently of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRubric {
    pub version: String,
    /// Scenario name -> the question sequence number that presents it.
    pub scenario_questions: BTreeMap<String, u32>,
    pub dimensions: Vec<DimensionDefinition>,
    pub competencies: Vec<CompetencyDefinition>,
    pub overall_passing_pct: f64,
    /// When true, any high-severity integrity flag vetoes an overall pass.
    pub require_clean_integrity: bool,
    pub level_bands: LevelBands,
    pub flag_thresholds: FlagThresholds,
    pub integrity: IntegrityConfig,
    pub recommendation_rules: Vec<RecommendationRule>,
}

impl ScoringRubric {
    /// Built-in rubric matching the production assessment templates.
    pub fn standard() -> Self {
        let scenario_questions = BTreeMap::from([
            ("conflict_of_interest".to_string(), 21),
            ("expense_report".to_string(), 22),
            ("customer_promise".to_string(), 23),
            ("peer_shortcut".to_string(), 24),
        ]);

        Self {
            version: "2024.2".to_string(),
            scenario_questions,
            dimensions: vec![
                DimensionDefinition {
                    name: "Honesty".to_string(),
                    likert_questions: vec![1, 2, 3],
                    indicators: vec![
                        ScenarioIndicator {
                            scenario: "conflict_of_interest".to_string(),
                            expected_choice: ChoiceLabel::A,
                            weight: 1.0,
                        },
                        ScenarioIndicator {
                            scenario: "expense_report".to_string(),
                            expected_choice: ChoiceLabel::A,
                            weight: 1.5,
                        },
                    ],
                    consistency_checks: vec![ConsistencyCheck {
                        likert_questions: vec![1, 2],
                        scenarios: vec![
                            "conflict_of_interest".to_string(),
                            "expense_report".to_string(),
                        ],
                        expected: CorrelationSign::Positive,
                    }],
                },
                DimensionDefinition {
                    name: "Accountability".to_string(),
                    likert_questions: vec![4, 5, 6],
                    indicators: vec![ScenarioIndicator {
                        scenario: "peer_shortcut".to_string(),
                        expected_choice: ChoiceLabel::A,
                        weight: 1.0,
                    }],
                    consistency_checks: vec![ConsistencyCheck {
                        likert_questions: vec![4, 5],
                        scenarios: vec!["peer_shortcut".to_string()],
                        expected: CorrelationSign::Positive,
                    }],
                },
                DimensionDefinition {
                    name: "Customer Orientation".to_string(),
                    likert_questions: vec![7, 8],
                    indicators: vec![ScenarioIndicator {
                        scenario: "customer_promise".to_string(),
                        expected_choice: ChoiceLabel::B,
                        weight: 1.0,
                    }],
                    consistency_checks: vec![ConsistencyCheck {
                        likert_questions: vec![7, 8],
                        scenarios: vec!["customer_promise".to_string()],
                        expected: CorrelationSign::Positive,
                    }],
                },
            ],
            competencies: vec![
                CompetencyDefinition {
                    name: "Communication".to_string(),
                    area: "communication".to_string(),
                    passing_pct: 70.0,
                },
                CompetencyDefinition {
                    name: "Problem Solving".to_string(),
                    area: "problem_solving".to_string(),
                    passing_pct: 65.0,
                },
                CompetencyDefinition {
                    name: "Role Knowledge".to_string(),
                    area: "role_knowledge".to_string(),
                    passing_pct: 60.0,
                },
            ],
            overall_passing_pct: 70.0,
            require_clean_integrity: true,
            level_bands: LevelBands {
                high: 75.0,
                moderate: 50.0,
            },
            flag_thresholds: FlagThresholds {
                alignment: 0.6,
                consistency: 0.5,
            },
            integrity: IntegrityConfig {
                weights: IntegrityWeights {
                    desirability: 0.3,
                    consistency: 0.3,
                    patterns: 0.2,
                    awareness: 0.2,
                },
                bands: IntegrityBands {
                    consistency_high: 0.8,
                    consistency_moderate: 0.5,
                    desirability_self_report_pct: 80.0,
                    desirability_alignment: 0.6,
                    straightline_min_answers: 4,
                    extreme_ratio_threshold: 0.8,
                },
            },
            recommendation_rules: vec![
                RecommendationRule {
                    tier: RecommendationTier::StrongHire,
                    requires_overall_pass: true,
                    min_competency_pass_ratio: 1.0,
                    min_integrity_score: 80,
                },
                RecommendationRule {
                    tier: RecommendationTier::Hire,
                    requires_overall_pass: true,
                    min_competency_pass_ratio: 0.75,
                    min_integrity_score: 65,
                },
                RecommendationRule {
                    tier: RecommendationTier::Consider,
                    requires_overall_pass: false,
                    min_competency_pass_ratio: 0.5,
                    min_integrity_score: 50,
                },
            ],
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RubricError> {
        let rubric: Self = serde_json::from_str(raw)?;
        rubric.validate()?;
        Ok(rubric)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RubricError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Static checks run once at load time. Scoring itself never fails on
    /// configuration mismatches; it warns and skips instead.
    pub fn validate(&self) -> Result<(), RubricError> {
        if self.version.trim().is_empty() {
            return Err(RubricError::EmptyVersion);
        }

        let mut seen = std::collections::BTreeSet::new();
        for dimension in &self.dimensions {
            if dimension.name.trim().is_empty() {
                return Err(RubricError::EmptyDimensionName);
            }
            if !seen.insert(dimension.name.as_str()) {
                return Err(RubricError::DuplicateDimension(dimension.name.clone()));
            }

            for indicator in &dimension.indicators {
                if indicator.weight <= 0.0 {
                    return Err(RubricError::InvalidWeight {
                        dimension: dimension.name.clone(),
                        scenario: indicator.scenario.clone(),
                        weight: indicator.weight,
                    });
                }
                if !self.scenario_questions.contains_key(&indicator.scenario) {
                    return Err(RubricError::UnmappedScenario {
                        dimension: dimension.name.clone(),
                        scenario: indicator.scenario.clone(),
                    });
                }
            }

            for check in &dimension.consistency_checks {
                for scenario in &check.scenarios {
                    if !dimension
                        .indicators
                        .iter()
                        .any(|indicator| indicator.scenario == *scenario)
                    {
                        return Err(RubricError::UnknownCheckScenario {
                            dimension: dimension.name.clone(),
                            scenario: scenario.clone(),
                        });
                    }
                }
            }
        }

        for competency in &self.competencies {
            if competency.name.trim().is_empty() || competency.area.trim().is_empty() {
                return Err(RubricError::EmptyCompetencyName);
            }
            if !(0.0..=100.0).contains(&competency.passing_pct) {
                return Err(RubricError::ThresholdOutOfRange {
                    field: "competency passing_pct",
                    value: competency.passing_pct,
                });
            }
        }

        if !(0.0..=100.0).contains(&self.overall_passing_pct) {
            return Err(RubricError::ThresholdOutOfRange {
                field: "overall_passing_pct",
                value: self.overall_passing_pct,
            });
        }
        for (field, value) in [
            ("flag_thresholds.alignment", self.flag_thresholds.alignment),
            (
                "flag_thresholds.consistency",
                self.flag_thresholds.consistency,
            ),
            (
                "integrity.bands.consistency_high",
                self.integrity.bands.consistency_high,
            ),
            (
                "integrity.bands.consistency_moderate",
                self.integrity.bands.consistency_moderate,
            ),
            (
                "integrity.bands.desirability_alignment",
                self.integrity.bands.desirability_alignment,
            ),
            (
                "integrity.bands.extreme_ratio_threshold",
                self.integrity.bands.extreme_ratio_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RubricError::ThresholdOutOfRange { field, value });
            }
        }

        let weight_total = self.integrity.weights.total();
        if (weight_total - 1.0).abs() > 1e-6 {
            return Err(RubricError::WeightsNotNormalized(weight_total));
        }

        Ok(())
    }
}

/// Rubric loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum RubricError {
    #[error("failed to read rubric file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rubric JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rubric version must not be empty")]
    EmptyVersion,
    #[error("dimension name must not be empty")]
    EmptyDimensionName,
    #[error("duplicate dimension '{0}'")]
    DuplicateDimension(String),
    #[error("competency name and area must not be empty")]
    EmptyCompetencyName,
    #[error("indicator '{scenario}' in dimension '{dimension}' has non-positive weight {weight}")]
    InvalidWeight {
        dimension: String,
        scenario: String,
        weight: f64,
    },
    #[error("indicator '{scenario}' in dimension '{dimension}' has no question mapping")]
    UnmappedScenario { dimension: String, scenario: String },
    #[error("consistency check in dimension '{dimension}' names unknown scenario '{scenario}'")]
    UnknownCheckScenario { dimension: String, scenario: String },
    #[error("{field} out of range: {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },
    #[error("integrity weights must sum to 1.0, got {0}")]
    WeightsNotNormalized(f64),
}
