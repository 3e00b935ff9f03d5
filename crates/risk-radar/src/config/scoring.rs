use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::scoring::RiskLevel;

/// Allowed drift of the weight sum from 1.0 before the loader normalises.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Errors raised while loading the scoring document.
#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("unable to read scoring configuration at {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scoring configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("weights: missing weight for signal `{0}`")]
    MissingWeight(Signal),
    #[error("weights: unknown signal `{0}` (expected severity, confidence or frequency)")]
    UnknownSignal(String),
    #[error("weights.{signal}: must be a non-negative finite number (found {value})")]
    InvalidWeight { signal: Signal, value: f64 },
    #[error("weights: all weights are zero and cannot be normalised")]
    ZeroWeights,
    #[error("weights: sum of weights overflows and cannot be normalised")]
    UnboundedWeights,
    #[error("risk_levels: unknown level `{0}` (expected low, medium, high or critical)")]
    UnknownLevel(String),
    #[error("risk_levels: level `{0}` is defined more than once")]
    DuplicateLevel(RiskLevel),
    #[error("risk_levels.{level}: invalid bounds (min {min}, max {max})")]
    InvalidBounds { level: RiskLevel, min: f64, max: f64 },
}

/// One of the three scalar inputs combined into a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Severity,
    Confidence,
    Frequency,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Severity, Signal::Confidence, Signal::Frequency];

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Severity => "severity",
            Signal::Confidence => "confidence",
            Signal::Frequency => "frequency",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|signal| signal.as_str() == raw.trim())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-signal coefficients. Always sum to 1.0 once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalWeights {
    pub severity: f64,
    pub confidence: f64,
    pub frequency: f64,
}

impl SignalWeights {
    pub fn get(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Severity => self.severity,
            Signal::Confidence => self.confidence,
            Signal::Frequency => self.frequency,
        }
    }

    pub fn sum(&self) -> f64 {
        self.severity + self.confidence + self.frequency
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    fn normalized(self) -> Self {
        let total = self.sum();
        Self {
            severity: self.severity / total,
            confidence: self.confidence / total,
            frequency: self.frequency / total,
        }
    }

    fn from_document(raw: BTreeMap<String, f64>) -> Result<Self, ScoringConfigError> {
        let mut severity = None;
        let mut confidence = None;
        let mut frequency = None;

        for (name, value) in raw {
            let signal =
                Signal::parse(&name).ok_or_else(|| ScoringConfigError::UnknownSignal(name))?;
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringConfigError::InvalidWeight { signal, value });
            }
            match signal {
                Signal::Severity => severity = Some(value),
                Signal::Confidence => confidence = Some(value),
                Signal::Frequency => frequency = Some(value),
            }
        }

        let weights = Self {
            severity: severity.ok_or(ScoringConfigError::MissingWeight(Signal::Severity))?,
            confidence: confidence.ok_or(ScoringConfigError::MissingWeight(Signal::Confidence))?,
            frequency: frequency.ok_or(ScoringConfigError::MissingWeight(Signal::Frequency))?,
        };

        let total = weights.sum();
        if !total.is_finite() {
            return Err(ScoringConfigError::UnboundedWeights);
        }
        if total <= 0.0 {
            return Err(ScoringConfigError::ZeroWeights);
        }

        Ok(weights)
    }
}

/// Inclusive `[min, max]` bound mapped to a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelThreshold {
    pub level: RiskLevel,
    pub min: f64,
    pub max: f64,
}

impl LevelThreshold {
    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score <= self.max
    }
}

/// Level bounds in the order they were declared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RiskThresholds {
    levels: Vec<LevelThreshold>,
}

impl RiskThresholds {
    pub fn new(levels: Vec<LevelThreshold>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[LevelThreshold] {
        &self.levels
    }

    /// First declared level whose bound contains `score`, if any.
    pub fn classify(&self, score: f64) -> Option<RiskLevel> {
        self.levels
            .iter()
            .find(|threshold| threshold.contains(score))
            .map(|threshold| threshold.level)
    }

    fn from_document(raw: DeclaredLevels) -> Result<Self, ScoringConfigError> {
        let mut levels: Vec<LevelThreshold> = Vec::with_capacity(raw.0.len());
        for (name, bounds) in raw.0 {
            let level: RiskLevel = name
                .parse()
                .map_err(|_| ScoringConfigError::UnknownLevel(name))?;
            if levels.iter().any(|existing| existing.level == level) {
                return Err(ScoringConfigError::DuplicateLevel(level));
            }
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
                return Err(ScoringConfigError::InvalidBounds {
                    level,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
            levels.push(LevelThreshold {
                level,
                min: bounds.min,
                max: bounds.max,
            });
        }
        Ok(Self { levels })
    }
}

/// Weights and thresholds loaded once per process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringConfig {
    pub weights: SignalWeights,
    pub risk_levels: RiskThresholds,
}

impl ScoringConfig {
    /// Read and validate the document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoringConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ScoringConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&contents)?;
        info!(
            path = %path.display(),
            levels = config.risk_levels.levels().len(),
            "scoring configuration loaded"
        );
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ScoringConfigError> {
        let document: ScoringDocument = serde_yaml::from_str(contents)?;

        let mut weights = SignalWeights::from_document(document.weights)?;
        if !weights.is_normalized() {
            warn!(
                sum = weights.sum(),
                "signal weights do not sum to 1.0, normalizing"
            );
            weights = weights.normalized();
        }

        let risk_levels = RiskThresholds::from_document(document.risk_levels)?;

        Ok(Self {
            weights,
            risk_levels,
        })
    }

    /// Weights 0.35/0.35/0.30 with LOW 0-30, MEDIUM 31-60, HIGH 61-80, CRITICAL 81-100.
    pub fn standard() -> Self {
        Self {
            weights: SignalWeights {
                severity: 0.35,
                confidence: 0.35,
                frequency: 0.30,
            },
            risk_levels: RiskThresholds::new(vec![
                LevelThreshold {
                    level: RiskLevel::Low,
                    min: 0.0,
                    max: 30.0,
                },
                LevelThreshold {
                    level: RiskLevel::Medium,
                    min: 31.0,
                    max: 60.0,
                },
                LevelThreshold {
                    level: RiskLevel::High,
                    min: 61.0,
                    max: 80.0,
                },
                LevelThreshold {
                    level: RiskLevel::Critical,
                    min: 81.0,
                    max: 100.0,
                },
            ]),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoringDocument {
    weights: BTreeMap<String, f64>,
    risk_levels: DeclaredLevels,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclaredBounds {
    min: f64,
    max: f64,
}

/// `risk_levels` mapping with declaration order preserved.
#[derive(Debug)]
struct DeclaredLevels(Vec<(String, DeclaredBounds)>);

impl<'de> Deserialize<'de> for DeclaredLevels {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LevelsVisitor;

        impl<'de> Visitor<'de> for LevelsVisitor {
            type Value = DeclaredLevels;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of risk level names to {min, max} bounds")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut levels = Vec::with_capacity(map.size_hint().unwrap_or(4));
                while let Some((name, bounds)) = map.next_entry::<String, DeclaredBounds>()? {
                    levels.push((name, bounds));
                }
                Ok(DeclaredLevels(levels))
            }
        }

        deserializer.deserialize_map(LevelsVisitor)
    }
}
