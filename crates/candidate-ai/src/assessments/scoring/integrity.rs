//! Honesty assessment: cross-dimension signals blended into one integrity
//! score plus categorized red flags.

use serde::{Deserialize, Serialize};

use super::behavioral::BehavioralScore;
use super::domain::{FlagCategory, FlagSeverity, RedFlag};
use super::rubric::IntegrityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasRating {
    Low,
    Moderate,
    High,
}

impl BiasRating {
    pub const fn label(self) -> &'static str {
        match self {
            BiasRating::Low => "low",
            BiasRating::Moderate => "moderate",
            BiasRating::High => "high",
        }
    }

    const fn subscore(self) -> f64 {
        match self {
            BiasRating::Low => 100.0,
            BiasRating::Moderate => 60.0,
            BiasRating::High => 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyRating {
    High,
    Moderate,
    Concerning,
}

impl ConsistencyRating {
    pub const fn label(self) -> &'static str {
        match self {
            ConsistencyRating::High => "high",
            ConsistencyRating::Moderate => "moderate",
            ConsistencyRating::Concerning => "concerning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfAwarenessRating {
    Strong,
    Developing,
    Limited,
}

impl SelfAwarenessRating {
    pub const fn label(self) -> &'static str {
        match self {
            SelfAwarenessRating::Strong => "strong",
            SelfAwarenessRating::Developing => "developing",
            SelfAwarenessRating::Limited => "limited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    StraightLining,
    ExtremeResponding,
}

impl PatternKind {
    pub const fn label(self) -> &'static str {
        match self {
            PatternKind::StraightLining => "straight_lining",
            PatternKind::ExtremeResponding => "extreme_responding",
        }
    }
}

/// A detected anomaly in the raw Likert sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePattern {
    pub kind: PatternKind,
    pub severity: FlagSeverity,
    pub description: String,
}

/// Aggregate honesty signals for one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityAssessment {
    /// Weighted blend of the four subscores, 0-100.
    pub score: u8,
    pub desirability_bias: BiasRating,
    pub consistency_rating: ConsistencyRating,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<ResponsePattern>,
    pub self_awareness: f64,
    pub self_awareness_rating: SelfAwarenessRating,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub red_flags: Vec<RedFlag>,
}

impl IntegrityAssessment {
    pub fn has_high_severity_flag(&self) -> bool {
        self.red_flags
            .iter()
            .any(|flag| flag.severity == FlagSeverity::High)
    }
}

pub(crate) fn assess_integrity(
    ordered_ratings: &[u8],
    behavioral: &[BehavioralScore],
    config: &IntegrityConfig,
) -> IntegrityAssessment {
    let desirability_bias = rate_desirability(behavioral, config);
    let (consistency_rating, mean_consistency) = rate_consistency(behavioral, config);
    let patterns = detect_patterns(ordered_ratings, config);
    let (self_awareness, self_awareness_rating) = rate_self_awareness(behavioral);

    let pattern_penalty: f64 = patterns
        .iter()
        .map(|pattern| match pattern.severity {
            FlagSeverity::High => 40.0,
            FlagSeverity::Medium => 25.0,
            FlagSeverity::Low => 10.0,
        })
        .sum();
    let pattern_subscore = (100.0 - pattern_penalty).max(0.0);

    let weights = &config.weights;
    let blended = desirability_bias.subscore() * weights.desirability
        + mean_consistency * 100.0 * weights.consistency
        + pattern_subscore * weights.patterns
        + self_awareness * 100.0 * weights.awareness;
    let score = blended.round().clamp(0.0, 100.0) as u8;

    let mut red_flags = Vec::new();
    match desirability_bias {
        BiasRating::High => red_flags.push(RedFlag {
            category: FlagCategory::SocialDesirability,
            severity: FlagSeverity::High,
            description:
                "Uniformly high self-report paired with low scenario alignment suggests impression management"
                    .to_string(),
            evidence: behavioral
                .iter()
                .map(|score| {
                    format!(
                        "{}: self-report {:.0}% vs alignment {:.0}%",
                        score.dimension,
                        score.self_report_pct,
                        score.ethical_alignment * 100.0
                    )
                })
                .collect(),
            recommendation: "Verify critical self-reported claims with references".to_string(),
        }),
        BiasRating::Moderate => red_flags.push(RedFlag {
            category: FlagCategory::SocialDesirability,
            severity: FlagSeverity::Medium,
            description: "Self-report runs noticeably ahead of observed scenario choices"
                .to_string(),
            evidence: Vec::new(),
            recommendation: "Weight scenario behavior over self-report when in doubt".to_string(),
        }),
        BiasRating::Low => {}
    }

    if consistency_rating == ConsistencyRating::Concerning {
        red_flags.push(RedFlag {
            category: FlagCategory::Inconsistency,
            severity: FlagSeverity::High,
            description: format!(
                "Self-report and behavior disagree across dimensions (mean consistency {:.2})",
                mean_consistency
            ),
            evidence: behavioral
                .iter()
                .filter(|score| score.consistency < config.bands.consistency_moderate)
                .map(|score| format!("{}: consistency {:.2}", score.dimension, score.consistency))
                .collect(),
            recommendation: "Discard the self-report signal and re-assess with a structured interview"
                .to_string(),
        });
    }

    for pattern in &patterns {
        red_flags.push(RedFlag {
            category: FlagCategory::ResponsePattern,
            severity: pattern.severity,
            description: pattern.description.clone(),
            evidence: Vec::new(),
            recommendation: "Treat Likert-based scores as unreliable for this attempt".to_string(),
        });
    }

    if self_awareness_rating == SelfAwarenessRating::Limited {
        red_flags.push(RedFlag {
            category: FlagCategory::SelfAwareness,
            severity: FlagSeverity::Medium,
            description: format!(
                "Self-assessment direction matches revealed preferences on only {:.0}% of dimensions",
                self_awareness * 100.0
            ),
            evidence: Vec::new(),
            recommendation: "Ask the candidate to self-critique a past decision during the interview"
                .to_string(),
        });
    }

    red_flags.sort_by(|a, b| b.severity.cmp(&a.severity));

    IntegrityAssessment {
        score,
        desirability_bias,
        consistency_rating,
        patterns,
        self_awareness,
        self_awareness_rating,
        red_flags,
    }
}

/// High self-report everywhere plus low alignment is the classic
/// social-desirability signature.
fn rate_desirability(behavioral: &[BehavioralScore], config: &IntegrityConfig) -> BiasRating {
    if behavioral.is_empty() {
        return BiasRating::Low;
    }

    let mean_self = behavioral
        .iter()
        .map(|score| score.self_report_pct)
        .sum::<f64>()
        / behavioral.len() as f64;
    let mean_alignment = behavioral
        .iter()
        .map(|score| score.ethical_alignment)
        .sum::<f64>()
        / behavioral.len() as f64;

    let bands = &config.bands;
    if mean_self >= bands.desirability_self_report_pct
        && mean_alignment < bands.desirability_alignment
    {
        BiasRating::High
    } else if mean_self >= bands.desirability_self_report_pct - 10.0
        && mean_alignment < bands.desirability_alignment + 0.1
    {
        BiasRating::Moderate
    } else {
        BiasRating::Low
    }
}

fn rate_consistency(
    behavioral: &[BehavioralScore],
    config: &IntegrityConfig,
) -> (ConsistencyRating, f64) {
    let mean = if behavioral.is_empty() {
        1.0
    } else {
        behavioral
            .iter()
            .map(|score| score.consistency)
            .sum::<f64>()
            / behavioral.len() as f64
    };

    let rating = if mean >= config.bands.consistency_high {
        ConsistencyRating::High
    } else if mean >= config.bands.consistency_moderate {
        ConsistencyRating::Moderate
    } else {
        ConsistencyRating::Concerning
    };

    (rating, mean)
}

/// Detectors over the sequence-ordered raw Likert ratings.
fn detect_patterns(ordered_ratings: &[u8], config: &IntegrityConfig) -> Vec<ResponsePattern> {
    let mut patterns = Vec::new();
    let min_answers = config.bands.straightline_min_answers;

    if ordered_ratings.len() >= min_answers {
        let first = ordered_ratings[0];
        if ordered_ratings.iter().all(|rating| *rating == first) {
            let severity = if ordered_ratings.len() >= min_answers * 2 {
                FlagSeverity::High
            } else {
                FlagSeverity::Medium
            };
            patterns.push(ResponsePattern {
                kind: PatternKind::StraightLining,
                severity,
                description: format!(
                    "All {} Likert answers carry the identical rating {}",
                    ordered_ratings.len(),
                    first
                ),
            });
        }

        let extreme = ordered_ratings
            .iter()
            .filter(|rating| **rating == 1 || **rating == 5)
            .count();
        let ratio = extreme as f64 / ordered_ratings.len() as f64;
        if ratio >= config.bands.extreme_ratio_threshold {
            let severity = if extreme == ordered_ratings.len() {
                FlagSeverity::High
            } else {
                FlagSeverity::Medium
            };
            patterns.push(ResponsePattern {
                kind: PatternKind::ExtremeResponding,
                severity,
                description: format!(
                    "{extreme} of {} Likert answers sit at the scale extremes",
                    ordered_ratings.len()
                ),
            });
        }
    }

    patterns
}

/// Direction agreement between self-report and revealed preference, per
/// dimension: high self-report should come with high alignment and low with
/// low.
fn rate_self_awareness(behavioral: &[BehavioralScore]) -> (f64, SelfAwarenessRating) {
    if behavioral.is_empty() {
        return (1.0, SelfAwarenessRating::Strong);
    }

    let agreements = behavioral
        .iter()
        .filter(|score| {
            let self_high = score.self_report_pct >= 60.0;
            let aligned_high = score.ethical_alignment >= 0.6;
            self_high == aligned_high
        })
        .count();
    let fraction = agreements as f64 / behavioral.len() as f64;

    let rating = if fraction >= 0.75 {
        SelfAwarenessRating::Strong
    } else if fraction >= 0.5 {
        SelfAwarenessRating::Developing
    } else {
        SelfAwarenessRating::Limited
    };

    (fraction, rating)
}
