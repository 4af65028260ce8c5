//! Score-band mapping for badges and banners.
//!
//! Thresholds are a deliberate design choice: a suspicion score of 6 or
//! higher is treated as confirmed phishing signal, 3..6 as ambiguous. The
//! banner fires on the same threshold as the "medium" band.

use crate::client::Prediction;
use crate::config::Variant;
use serde::Serialize;

/// Minimum suspicion score at which the warning banner is shown.
pub const BANNER_THRESHOLD: f64 = 3.0;

/// Minimum suspicion score for the "high" (confirmed phishing) band.
pub const HIGH_THRESHOLD: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
    Unknown,
}

/// Badge indicator: short text plus background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub text: &'static str,
    pub color: &'static str,
}

/// Total mapping from an optional suspicion score to exactly one band.
/// First match wins; a missing or non-numeric score maps to Unknown.
pub fn band_for_score(score: Option<f64>) -> ScoreBand {
    match score {
        Some(s) if s.is_nan() => ScoreBand::Unknown,
        Some(s) if s >= HIGH_THRESHOLD => ScoreBand::High,
        Some(s) if s >= BANNER_THRESHOLD => ScoreBand::Medium,
        Some(_) => ScoreBand::Low,
        None => ScoreBand::Unknown,
    }
}

/// Badge for a band. Unknown yields no badge (the indicator is cleared).
pub fn badge_for_band(band: ScoreBand) -> Option<Badge> {
    match band {
        ScoreBand::High => Some(Badge {
            text: "PH",
            color: "#FF0000",
        }),
        ScoreBand::Medium => Some(Badge {
            text: "??",
            color: "#FFA500",
        }),
        ScoreBand::Low => Some(Badge {
            text: "OK",
            color: "#28a745",
        }),
        ScoreBand::Unknown => None,
    }
}

/// Whether the in-page warning banner should be shown, gated by the user
/// preference toggle.
pub fn should_show_banner(score: Option<f64>, banner_enabled: bool) -> bool {
    if !banner_enabled {
        return false;
    }
    matches!(band_for_score(score), ScoreBand::High | ScoreBand::Medium)
}

/// Variant-specific banner text for a flagged page.
pub fn banner_message(variant: Variant, score: f64) -> String {
    match variant {
        Variant::Navishield => format!(
            "Navi says: \u{201c}Heads up! This site might be risky... suspicion score is {}!\u{201d}",
            score
        ),
        Variant::Phishspotter => format!(
            "Warning: this site looks suspicious (suspicion score {}).",
            score
        ),
    }
}

/// Human-readable summary for a prediction label, shown alongside the raw
/// classifier payload on manual checks.
pub fn explanation_for(prediction: Prediction) -> &'static str {
    match prediction {
        Prediction::UnsafeBlocklist => {
            "Google Safe Browsing has flagged this URL as unsafe. It may host \
             malware, phishing, or other harmful content. Avoid visiting or \
             sharing this link."
        }
        Prediction::Phishing => {
            "The model identified this URL as phishing. It may be designed to \
             steal personal information or credentials. Exercise extreme \
             caution before proceeding."
        }
        Prediction::Uncertain => {
            "The model flagged this URL as suspicious. No immediate threats \
             were found, but the URL might still be risky. Consider verifying \
             the source."
        }
        Prediction::Safe => {
            "Both the model and Safe Browsing consider this URL safe. Stay \
             alert for unexpected requests or forms on the site."
        }
        Prediction::InvalidUrl => {
            "The URL appears to be malformed or invalid. Double-check the \
             address and try again."
        }
        Prediction::Unknown => {
            "No clear decision could be made regarding this URL. Exercise \
             caution and investigate further if needed."
        }
    }
}
