use serde::{Deserialize, Serialize};

/// Auxiliary attributes about the scored event, consumed only by rules.
///
/// Every field has a neutral default, so an absent context and
/// `EventContext::default()` evaluate identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventContext {
    pub failed_logins: u64,
    pub is_privileged: bool,
    pub user_id: Option<String>,
    pub source_ip: Option<String>,
    pub event_count: u64,
}
