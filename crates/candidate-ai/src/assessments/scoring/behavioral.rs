//! Behavioral dimension scoring: self-report, ethical alignment, and the
//! consistency cross-check between the two.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ChoiceLabel, FlagCategory, FlagSeverity, RedFlag};
use super::policies;
use super::rubric::{DimensionDefinition, FlagThresholds, LevelBands, ScoringRubric};

/// Variance above this marks a consistency check as evidence-worthy.
const HIGH_VARIANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehavioralLevel {
    High,
    Moderate,
    Low,
}

impl BehavioralLevel {
    pub const fn label(self) -> &'static str {
        match self {
            BehavioralLevel::High => "high",
            BehavioralLevel::Moderate => "moderate",
            BehavioralLevel::Low => "low",
        }
    }
}

/// Derived score for one dimension. Recomputed fresh on every report, never
/// persisted or mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralScore {
    pub dimension: String,
    pub self_report_pct: f64,
    pub ethical_alignment: f64,
    pub consistency: f64,
    pub scenarios_answered: usize,
    pub scenarios_unanswered: usize,
    pub level: BehavioralLevel,
    pub interpretation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub red_flags: Vec<RedFlag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

pub(crate) fn score_dimensions(
    ratings: &BTreeMap<u32, u8>,
    choices: &BTreeMap<String, Option<ChoiceLabel>>,
    rubric: &ScoringRubric,
) -> Vec<BehavioralScore> {
    rubric
        .dimensions
        .iter()
        .map(|dimension| {
            score_dimension(
                dimension,
                ratings,
                choices,
                &rubric.level_bands,
                &rubric.flag_thresholds,
            )
        })
        .collect()
}

fn score_dimension(
    dimension: &DimensionDefinition,
    ratings: &BTreeMap<u32, u8>,
    choices: &BTreeMap<String, Option<ChoiceLabel>>,
    bands: &LevelBands,
    thresholds: &FlagThresholds,
) -> BehavioralScore {
    let dimension_ratings: Vec<Option<u8>> = dimension
        .likert_questions
        .iter()
        .map(|sequence| ratings.get(sequence).copied())
        .collect();
    let self_report_pct = policies::self_report_percentage(&dimension_ratings);

    let alignment = score_alignment(dimension, choices);
    let consistency = score_consistency(dimension, ratings, choices);

    let level = level_for(self_report_pct, alignment.fraction, bands);
    let interpretation = interpretation_for(&dimension.name, level);

    let mut red_flags = Vec::new();
    if alignment.fraction < thresholds.alignment {
        let severity = if alignment.fraction < thresholds.alignment / 2.0 {
            FlagSeverity::High
        } else {
            FlagSeverity::Medium
        };
        let mut evidence = alignment.misaligned.clone();
        if alignment.unanswered > 0 {
            evidence.push(format!(
                "{} configured scenario(s) left unanswered",
                alignment.unanswered
            ));
        }
        red_flags.push(RedFlag {
            category: FlagCategory::EthicalMisalignment,
            severity,
            description: format!(
                "Observed choices in {} scenarios diverge from the expected ethical option ({:.0}% aligned)",
                dimension.name,
                alignment.fraction * 100.0
            ),
            evidence,
            recommendation: format!(
                "Walk through the {} scenarios with the candidate and ask them to reason aloud",
                dimension.name
            ),
        });
    }
    if consistency.mean < thresholds.consistency {
        let severity = if consistency.mean < thresholds.consistency / 2.0 {
            FlagSeverity::High
        } else {
            FlagSeverity::Medium
        };
        red_flags.push(RedFlag {
            category: FlagCategory::Inconsistency,
            severity,
            description: format!(
                "Self-reported {} does not track observed behavior (consistency {:.2})",
                dimension.name, consistency.mean
            ),
            evidence: consistency.high_variance.clone(),
            recommendation: format!(
                "Verify {} claims against references before weighting the self-report",
                dimension.name
            ),
        });
    }

    let mut recommendations = Vec::new();
    match level {
        BehavioralLevel::High => {}
        BehavioralLevel::Moderate => recommendations.push(format!(
            "Probe {} with targeted follow-up questions during the interview",
            dimension.name
        )),
        BehavioralLevel::Low => recommendations.push(format!(
            "Treat {} as a primary interview focus; the assessment signal is weak",
            dimension.name
        )),
    }
    if alignment.unanswered > 0 {
        recommendations.push(format!(
            "Re-run the unanswered {} scenario(s) live before relying on this score",
            dimension.name
        ));
    }

    BehavioralScore {
        dimension: dimension.name.clone(),
        self_report_pct,
        ethical_alignment: alignment.fraction,
        consistency: consistency.mean,
        scenarios_answered: alignment.answered,
        scenarios_unanswered: alignment.unanswered,
        level,
        interpretation,
        red_flags,
        recommendations,
    }
}

struct AlignmentOutcome {
    fraction: f64,
    answered: usize,
    unanswered: usize,
    misaligned: Vec<String>,
}

/// Weighted alignment over the dimension's scenario indicators. A matched
/// choice contributes the indicator's full weight; a mismatch contributes
/// zero; an unanswered scenario contributes zero aligned weight while its
/// weight stays in the total. Indicators whose scenario has no question
/// mapping are skipped and excluded from the total entirely.
fn score_alignment(
    dimension: &DimensionDefinition,
    choices: &BTreeMap<String, Option<ChoiceLabel>>,
) -> AlignmentOutcome {
    let mut aligned_weight = 0.0;
    let mut total_weight = 0.0;
    let mut answered = 0;
    let mut unanswered = 0;
    let mut misaligned = Vec::new();

    for indicator in &dimension.indicators {
        let Some(resolved) = choices.get(&indicator.scenario) else {
            warn!(
                dimension = dimension.name.as_str(),
                scenario = indicator.scenario.as_str(),
                "indicator scenario has no question mapping; skipping"
            );
            continue;
        };

        total_weight += indicator.weight;
        match resolved {
            Some(actual) => {
                answered += 1;
                if *actual == indicator.expected_choice {
                    aligned_weight += indicator.weight;
                } else {
                    misaligned.push(format!(
                        "scenario '{}': chose {} where {} was expected",
                        indicator.scenario,
                        actual.label(),
                        indicator.expected_choice.label()
                    ));
                }
            }
            None => unanswered += 1,
        }
    }

    AlignmentOutcome {
        fraction: policies::alignment_or_optimistic(aligned_weight, total_weight),
        answered,
        unanswered,
        misaligned,
    }
}

struct ConsistencyOutcome {
    mean: f64,
    high_variance: Vec<String>,
}

/// Consistency between self-report and behavior, via the single-pair proxy
/// `1 - |likert_avg / 5 - ethical_avg|` compared against the fixed ±0.7
/// expectation. Checks whose subsets resolve empty are skipped.
fn score_consistency(
    dimension: &DimensionDefinition,
    ratings: &BTreeMap<u32, u8>,
    choices: &BTreeMap<String, Option<ChoiceLabel>>,
) -> ConsistencyOutcome {
    let expected_by_scenario: BTreeMap<&str, ChoiceLabel> = dimension
        .indicators
        .iter()
        .map(|indicator| (indicator.scenario.as_str(), indicator.expected_choice))
        .collect();

    let mut actuals = Vec::new();
    let mut high_variance = Vec::new();

    for (index, check) in dimension.consistency_checks.iter().enumerate() {
        let subset_ratings: Vec<Option<u8>> = check
            .likert_questions
            .iter()
            .filter(|sequence| dimension.likert_questions.contains(sequence))
            .map(|sequence| ratings.get(sequence).copied())
            .collect();

        let subset_scenarios: Vec<&str> = check
            .scenarios
            .iter()
            .map(String::as_str)
            .filter(|scenario| {
                expected_by_scenario.contains_key(scenario) && choices.contains_key(*scenario)
            })
            .collect();

        if subset_ratings.is_empty() || subset_scenarios.is_empty() {
            warn!(
                dimension = dimension.name.as_str(),
                check = index,
                "consistency check resolves to an empty subset; skipping"
            );
            continue;
        }

        let likert_avg = policies::neutral_filled_average(&subset_ratings);

        let mut aligned = 0usize;
        for scenario in &subset_scenarios {
            if let Some(Some(actual)) = choices.get(*scenario) {
                if Some(actual) == expected_by_scenario.get(scenario) {
                    aligned += 1;
                }
            }
        }
        let ethical_avg = aligned as f64 / subset_scenarios.len() as f64;

        let expected = check.expected.expected_value();
        let actual = 1.0 - (likert_avg / policies::LIKERT_MAX - ethical_avg).abs();
        let variance = (actual - expected.abs()).abs();

        if variance > HIGH_VARIANCE {
            high_variance.push(format!(
                "check {}: correlation proxy {:.2} vs expected {:.2} (variance {:.2})",
                index + 1,
                actual,
                expected.abs(),
                variance
            ));
        }

        actuals.push(actual);
    }

    let mean = if actuals.is_empty() {
        1.0
    } else {
        actuals.iter().sum::<f64>() / actuals.len() as f64
    };

    ConsistencyOutcome {
        mean,
        high_variance,
    }
}

/// Conservative banding: the weaker of the two headline signals drives the
/// level so a polished self-report cannot mask misaligned behavior.
fn level_for(self_report_pct: f64, alignment: f64, bands: &LevelBands) -> BehavioralLevel {
    let basis = self_report_pct.min(alignment * 100.0);
    if basis >= bands.high {
        BehavioralLevel::High
    } else if basis >= bands.moderate {
        BehavioralLevel::Moderate
    } else {
        BehavioralLevel::Low
    }
}

fn interpretation_for(dimension: &str, level: BehavioralLevel) -> String {
    match level {
        BehavioralLevel::High => format!(
            "Self-report and observed scenario choices both support a strong {dimension} standing"
        ),
        BehavioralLevel::Moderate => format!(
            "{dimension} signals are mixed; self-report and observed choices only partially agree"
        ),
        BehavioralLevel::Low => format!(
            "{dimension} signals are weak; observed choices or self-report fall well below expectations"
        ),
    }
}
