//! Weighted aggregation of the three signals and threshold classification.

mod level;

pub use level::{RiskLevel, UnknownRiskLevel};

use crate::config::{RiskThresholds, ScoringConfig, SignalWeights};

/// Lower bound of every signal and of the aggregated score.
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound of every signal and of the aggregated score.
pub const SCORE_MAX: f64 = 100.0;

/// Level reported when no configured bound contains the score.
pub const FALLBACK_LEVEL: RiskLevel = RiskLevel::Critical;

/// Stateless engine combining signals with the loaded weights.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: SignalWeights,
    thresholds: RiskThresholds,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            weights: config.weights,
            thresholds: config.risk_levels,
        }
    }

    pub fn weights(&self) -> &SignalWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Weighted sum of the clamped signals, itself clamped to `[0, 100]`.
    pub fn calculate_risk_score(&self, severity: f64, confidence: f64, frequency: f64) -> f64 {
        let severity = clamp_signal(severity);
        let confidence = clamp_signal(confidence);
        let frequency = clamp_signal(frequency);

        let score = severity * self.weights.severity
            + confidence * self.weights.confidence
            + frequency * self.weights.frequency;

        score.clamp(SCORE_MIN, SCORE_MAX)
    }

    /// First declared level containing `score`; [`FALLBACK_LEVEL`] when none does.
    pub fn get_risk_level(&self, score: f64) -> RiskLevel {
        self.thresholds.classify(score).unwrap_or(FALLBACK_LEVEL)
    }
}

fn clamp_signal(value: f64) -> f64 {
    if value.is_nan() {
        SCORE_MIN
    } else {
        value.clamp(SCORE_MIN, SCORE_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelThreshold;

    fn engine() -> ScoringEngine {
        ScoringEngine::new(ScoringConfig::standard())
    }

    #[test]
    fn basic_calculation_uses_weights() {
        let score = engine().calculate_risk_score(80.0, 75.0, 90.0);
        assert!((score - 81.25).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn zero_and_max_signals_hit_the_bounds() {
        let engine = engine();
        assert_eq!(engine.calculate_risk_score(0.0, 0.0, 0.0), 0.0);
        let max = engine.calculate_risk_score(100.0, 100.0, 100.0);
        assert!((max - 100.0).abs() < 1e-9);
        assert!(max <= SCORE_MAX);
    }

    #[test]
    fn clamps_out_of_range_signals() {
        let engine = engine();
        assert_eq!(engine.calculate_risk_score(-10.0, -20.0, -50.0), 0.0);

        let above = engine.calculate_risk_score(150.0, 120.0, 110.0);
        let max = engine.calculate_risk_score(100.0, 100.0, 100.0);
        assert_eq!(above, max);

        let infinite = engine.calculate_risk_score(f64::INFINITY, f64::NEG_INFINITY, 50.0);
        assert!((0.0..=100.0).contains(&infinite));
    }

    #[test]
    fn nan_signal_counts_as_zero() {
        let engine = engine();
        assert_eq!(
            engine.calculate_risk_score(f64::NAN, 50.0, 50.0),
            engine.calculate_risk_score(0.0, 50.0, 50.0)
        );
    }

    #[test]
    fn single_signal_contributions_follow_weights() {
        let engine = engine();
        let severity_only = engine.calculate_risk_score(100.0, 0.0, 0.0);
        let confidence_only = engine.calculate_risk_score(0.0, 100.0, 0.0);
        let frequency_only = engine.calculate_risk_score(0.0, 0.0, 100.0);

        assert!((severity_only - confidence_only).abs() < 1e-9);
        assert!(frequency_only < severity_only);
        assert!((frequency_only - 30.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let engine = engine();
        let first = engine.calculate_risk_score(75.5, 82.3, 91.2);
        let second = engine.calculate_risk_score(75.5, 82.3, 91.2);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn risk_level_boundaries() {
        let engine = engine();
        let expectations = [
            (0.0, RiskLevel::Low),
            (15.0, RiskLevel::Low),
            (30.0, RiskLevel::Low),
            (31.0, RiskLevel::Medium),
            (45.0, RiskLevel::Medium),
            (60.0, RiskLevel::Medium),
            (61.0, RiskLevel::High),
            (75.0, RiskLevel::High),
            (80.0, RiskLevel::High),
            (81.0, RiskLevel::Critical),
            (90.0, RiskLevel::Critical),
            (100.0, RiskLevel::Critical),
        ];
        for (score, expected) in expectations {
            assert_eq!(engine.get_risk_level(score), expected, "score {score}");
        }
    }

    #[test]
    fn unmatched_scores_fall_back_to_critical() {
        let engine = engine();
        assert_eq!(engine.get_risk_level(30.5), RiskLevel::Critical);
        assert_eq!(engine.get_risk_level(60.25), RiskLevel::Critical);
        assert_eq!(engine.get_risk_level(-1.0), RiskLevel::Critical);
        assert_eq!(engine.get_risk_level(150.0), RiskLevel::Critical);
        assert_eq!(engine.get_risk_level(f64::NAN), RiskLevel::Critical);
    }

    #[test]
    fn empty_thresholds_always_escalate() {
        let engine = ScoringEngine::new(ScoringConfig {
            weights: ScoringConfig::standard().weights,
            risk_levels: RiskThresholds::new(Vec::new()),
        });
        assert_eq!(engine.get_risk_level(0.0), RiskLevel::Critical);
    }

    #[test]
    fn declaration_order_decides_overlaps() {
        let engine = ScoringEngine::new(ScoringConfig {
            weights: ScoringConfig::standard().weights,
            risk_levels: RiskThresholds::new(vec![
                LevelThreshold {
                    level: RiskLevel::High,
                    min: 50.0,
                    max: 100.0,
                },
                LevelThreshold {
                    level: RiskLevel::Medium,
                    min: 0.0,
                    max: 70.0,
                },
            ]),
        });
        assert_eq!(engine.get_risk_level(60.0), RiskLevel::High);
        assert_eq!(engine.get_risk_level(40.0), RiskLevel::Medium);
    }
}
