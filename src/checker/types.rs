use crate::client::ClassificationResult;
use crate::config::CheckConfig;
use crate::logger::CheckAction;
use crate::verdict::{Badge, ScoreBand};
use serde::{Deserialize, Serialize};

/// Typed events delivered by browser-side collaborators.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckEvent {
    /// A tab finished loading a page.
    NavigationCompleted { tab_id: u32, url: String },
    /// The user submitted a URL for an explicit check.
    ManualCheck { url: String },
}

/// Runtime-togglable user preferences, hot-swapped without a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSettings {
    pub auto_check_enabled: bool,
    pub banner_enabled: bool,
    pub confidence_threshold: f64,
}

impl From<&CheckConfig> for CheckSettings {
    fn from(config: &CheckConfig) -> Self {
        Self {
            auto_check_enabled: config.auto_check_enabled,
            banner_enabled: config.banner_enabled,
            confidence_threshold: config.confidence_threshold,
        }
    }
}

/// What the browser-side collaborator should render after a navigation
/// check. `badge: None` means clear the indicator.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationOutcome {
    pub tab_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub badge: Option<Badge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub action: CheckAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NavigationOutcome {
    pub(crate) fn skipped(tab_id: u32, domain: Option<String>) -> Self {
        Self {
            tab_id,
            domain,
            badge: None,
            banner: None,
            action: CheckAction::Skipped,
            error: None,
        }
    }
}

/// Response to a manual check: either a reused cached verdict or the full
/// classifier payload, passed through for display.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ManualCheckResponse {
    Cache {
        domain: String,
        suspicion_score: f64,
        last_checked_ms: u64,
        band: ScoreBand,
    },
    Classifier {
        band: ScoreBand,
        explanation: &'static str,
        #[serde(flatten)]
        result: ClassificationResult,
    },
}
