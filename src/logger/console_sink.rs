use super::types::{CheckAction, CheckLogEntry, CheckLogSink};
use crate::config::LoggingConfig;
use tracing::info;

pub struct ConsoleLogSink {
    config: LoggingConfig,
}

impl ConsoleLogSink {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }
}

impl CheckLogSink for ConsoleLogSink {
    fn log(&self, entry: &CheckLogEntry) {
        if !self.config.enable {
            return;
        }

        if self.config.format == "json" {
            // Structured JSON logging via tracing
            info!(
                target: "url_check",
                domain = %entry.domain,
                url = %entry.url,
                action = ?entry.action,
                score = ?entry.score,
                attempts = ?entry.attempts,
                error = ?entry.error,
                lat = %entry.latency_ms
            );
        } else {
            let action_str = match entry.action {
                CheckAction::CachedVerdict => match entry.score {
                    Some(score) => format!("verdict from cache (score {})", score),
                    None => "verdict from cache".to_string(),
                },
                CheckAction::Classified => match entry.score {
                    Some(score) => format!("classified remotely (score {})", score),
                    None => "classified remotely (no score)".to_string(),
                },
                CheckAction::Skipped => "skipped".to_string(),
                CheckAction::Failed => match (&entry.error, entry.attempts) {
                    (Some(e), Some(n)) => format!("failed after {} attempts: {}", n, e),
                    (Some(e), None) => format!("failed: {}", e),
                    _ => "failed".to_string(),
                },
            };

            info!("{} -> {} [{}ms]", entry.domain, action_str, entry.latency_ms);
        }
    }
}
