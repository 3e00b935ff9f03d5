use serde::Serialize;

use super::context::EventContext;

const FAILED_LOGIN_LIMIT: u64 = 5;
const HIGH_SEVERITY_FLOOR: f64 = 80.0;
const HIGH_FREQUENCY_LIMIT: f64 = 85.0;
const MISMATCH_SEVERITY_FLOOR: f64 = 75.0;
const MISMATCH_CONFIDENCE_CEILING: f64 = 40.0;

/// Closed set of security heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    FailedLogins,
    HighSeverity,
    PrivilegedAccount,
    HighFrequency,
    ConfidenceSeverityMismatch,
}

impl RuleKind {
    pub fn matches(
        self,
        severity: f64,
        confidence: f64,
        frequency: f64,
        context: &EventContext,
    ) -> bool {
        match self {
            RuleKind::FailedLogins => context.failed_logins > FAILED_LOGIN_LIMIT,
            RuleKind::HighSeverity => severity >= HIGH_SEVERITY_FLOOR,
            RuleKind::PrivilegedAccount => context.is_privileged,
            RuleKind::HighFrequency => frequency > HIGH_FREQUENCY_LIMIT,
            RuleKind::ConfidenceSeverityMismatch => {
                severity >= MISMATCH_SEVERITY_FLOOR && confidence <= MISMATCH_CONFIDENCE_CEILING
            }
        }
    }
}

/// Named entry of the rule catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleDescriptor {
    pub kind: RuleKind,
    pub name: &'static str,
    pub description: &'static str,
}

/// Every rule, in evaluation and reporting order.
pub static RULE_CATALOG: [RuleDescriptor; 5] = [
    RuleDescriptor {
        kind: RuleKind::FailedLogins,
        name: "Multiple failed login attempts",
        description: "More than 5 failed login attempts detected",
    },
    RuleDescriptor {
        kind: RuleKind::HighSeverity,
        name: "High-severity event detected",
        description: "Event severity score >= 80",
    },
    RuleDescriptor {
        kind: RuleKind::PrivilegedAccount,
        name: "Privileged account activity detected",
        description: "Activity from a privileged account",
    },
    RuleDescriptor {
        kind: RuleKind::HighFrequency,
        name: "High event frequency detected",
        description: "Event frequency score > 85",
    },
    RuleDescriptor {
        kind: RuleKind::ConfidenceSeverityMismatch,
        name: "Low confidence with high severity",
        description: "Suspicious pattern: high severity but low confidence",
    },
];
