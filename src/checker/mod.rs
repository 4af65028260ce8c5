pub mod types;

pub use self::types::{CheckEvent, CheckSettings, ManualCheckResponse, NavigationOutcome};

use crate::cache::{now_ms, ResultCache};
use crate::client::{ClassifierError, RetryingClassifierClient};
use crate::config::Variant;
use crate::logger::{CheckAction, CheckLogEntry, CheckLogger};
use crate::stats::StatsCollector;
use crate::verdict;
use arc_swap::ArcSwap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use url::Url;

/// Orchestrates a single check: event gates, domain extraction, cache
/// freshness, remote classification, cache update.
///
/// Holds no global state; every collaborator is injected. Settings are
/// swappable at runtime, so toggling auto-check or the banner takes
/// effect on the next event.
pub struct UrlChecker {
    variant: Variant,
    settings: ArcSwap<CheckSettings>,
    cache: ResultCache,
    client: RetryingClassifierClient,
    stats: Arc<StatsCollector>,
    logger: Arc<CheckLogger>,
    shutdown: CancellationToken,
}

/// Serialized result of dispatching one event.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EventOutcome {
    Navigation(NavigationOutcome),
    Manual(ManualCheckResponse),
    Failure {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        attempts: Option<u32>,
    },
}

impl UrlChecker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        variant: Variant,
        settings: CheckSettings,
        cache: ResultCache,
        client: RetryingClassifierClient,
        stats: Arc<StatsCollector>,
        logger: Arc<CheckLogger>,
        shutdown: CancellationToken,
    ) -> Arc<Self> {
        Arc::new(Self {
            variant,
            settings: ArcSwap::from_pointee(settings),
            cache,
            client,
            stats,
            logger,
            shutdown,
        })
    }

    pub fn settings(&self) -> Arc<CheckSettings> {
        self.settings.load_full()
    }

    pub fn update_settings(&self, settings: CheckSettings) {
        info!(
            "Settings updated: auto_check={}, banner={}",
            settings.auto_check_enabled, settings.banner_enabled
        );
        self.settings.store(Arc::new(settings));
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Cache key for a URL: the lowercase host of an http(s) URL. Anything
    /// else (other schemes, no host, unparsable input) is not checkable.
    pub fn domain_from_url(url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        parsed.host_str().map(|host| host.to_ascii_lowercase())
    }

    pub async fn handle_event(&self, event: CheckEvent) -> EventOutcome {
        match event {
            CheckEvent::NavigationCompleted { tab_id, url } => {
                EventOutcome::Navigation(self.handle_navigation(tab_id, &url).await)
            }
            CheckEvent::ManualCheck { url } => match self.handle_manual(&url).await {
                Ok(response) => EventOutcome::Manual(response),
                Err(e) => EventOutcome::Failure {
                    attempts: e.attempts(),
                    error: e.to_string(),
                },
            },
        }
    }

    /// Auto-check path for a completed navigation. Never fails: any error
    /// degrades to a cleared badge with the reason attached.
    pub async fn handle_navigation(&self, tab_id: u32, url: &str) -> NavigationOutcome {
        self.stats.inc_checks();
        let start = Instant::now();
        let settings = self.settings();

        if !settings.auto_check_enabled {
            self.stats.inc_skipped();
            return NavigationOutcome::skipped(tab_id, None);
        }

        let Some(domain) = Self::domain_from_url(url) else {
            self.stats.inc_skipped();
            self.log_check("", url, CheckAction::Skipped, None, start, None, None)
                .await;
            return NavigationOutcome::skipped(tab_id, None);
        };

        let now = now_ms();

        // Fresh verdict on file: reuse it, no network call.
        if let Some(record) = self.cache.has_fresh_verdict(&domain, now) {
            self.stats.inc_cache_hit();
            let score = Some(record.last_score);
            let outcome =
                self.render_outcome(tab_id, &domain, score, &settings, CheckAction::CachedVerdict);
            self.log_check(
                &domain,
                url,
                CheckAction::CachedVerdict,
                score,
                start,
                None,
                None,
            )
            .await;
            return outcome;
        }

        // Miss or expired: classify remotely.
        self.stats.inc_network_check();
        let cancel = self.shutdown.child_token();
        match self.client.classify(url, &cancel).await {
            Ok(result) => {
                let score = result.suspicion_score;
                // A verdict with no score is recorded as zero, like an
                // explicit "nothing suspicious" outcome.
                if let Err(e) = self.cache.update(&domain, score.unwrap_or(0.0), now) {
                    error!("Failed to persist verdict for {}: {}", domain, e);
                }

                let outcome =
                    self.render_outcome(tab_id, &domain, score, &settings, CheckAction::Classified);
                let band = verdict::band_for_score(score);
                if matches!(band, verdict::ScoreBand::High | verdict::ScoreBand::Medium) {
                    self.stats.inc_flagged();
                }
                self.log_check(&domain, url, CheckAction::Classified, score, start, None, None)
                    .await;
                outcome
            }
            Err(e) => {
                // Indeterminate outcome: surface the failure and leave any
                // prior verdict for this domain untouched.
                self.stats.inc_failure();
                self.log_check(
                    &domain,
                    url,
                    CheckAction::Failed,
                    None,
                    start,
                    e.attempts(),
                    Some(e.to_string()),
                )
                .await;
                NavigationOutcome {
                    tab_id,
                    domain: Some(domain),
                    badge: None,
                    banner: None,
                    action: CheckAction::Failed,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Manual check path. The cache is consulted first; on a miss the full
    /// classifier payload is fetched and returned for display.
    pub async fn handle_manual(&self, url: &str) -> Result<ManualCheckResponse, ClassifierError> {
        if url.trim().is_empty() {
            return Err(ClassifierError::InvalidInput);
        }

        self.stats.inc_checks();
        let start = Instant::now();
        let domain = Self::domain_from_url(url);
        let now = now_ms();

        if let Some(domain) = &domain {
            if let Some(record) = self.cache.has_fresh_verdict(domain, now) {
                self.stats.inc_cache_hit();
                self.log_check(
                    domain,
                    url,
                    CheckAction::CachedVerdict,
                    Some(record.last_score),
                    start,
                    None,
                    None,
                )
                .await;
                return Ok(ManualCheckResponse::Cache {
                    band: verdict::band_for_score(Some(record.last_score)),
                    domain: domain.clone(),
                    suspicion_score: record.last_score,
                    last_checked_ms: record.last_checked_ms,
                });
            }
        }

        self.stats.inc_network_check();
        let cancel = self.shutdown.child_token();
        match self.client.classify(url, &cancel).await {
            Ok(result) => {
                let score = result.suspicion_score;
                if let Some(domain) = &domain {
                    if let Err(e) = self.cache.update(domain, score.unwrap_or(0.0), now) {
                        error!("Failed to persist verdict for {}: {}", domain, e);
                    }
                }

                let band = verdict::band_for_score(score);
                if matches!(band, verdict::ScoreBand::High | verdict::ScoreBand::Medium) {
                    self.stats.inc_flagged();
                }
                self.log_check(
                    domain.as_deref().unwrap_or(""),
                    url,
                    CheckAction::Classified,
                    score,
                    start,
                    None,
                    None,
                )
                .await;

                Ok(ManualCheckResponse::Classifier {
                    band,
                    explanation: verdict::explanation_for(result.label()),
                    result,
                })
            }
            Err(e) => {
                self.stats.inc_failure();
                self.log_check(
                    domain.as_deref().unwrap_or(""),
                    url,
                    CheckAction::Failed,
                    None,
                    start,
                    e.attempts(),
                    Some(e.to_string()),
                )
                .await;
                Err(e)
            }
        }
    }

    fn render_outcome(
        &self,
        tab_id: u32,
        domain: &str,
        score: Option<f64>,
        settings: &CheckSettings,
        action: CheckAction,
    ) -> NavigationOutcome {
        let band = verdict::band_for_score(score);
        let banner = if verdict::should_show_banner(score, settings.banner_enabled) {
            score.map(|s| verdict::banner_message(self.variant, s))
        } else {
            None
        };

        NavigationOutcome {
            tab_id,
            domain: Some(domain.to_string()),
            badge: verdict::badge_for_band(band),
            banner,
            action,
            error: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn log_check(
        &self,
        domain: &str,
        url: &str,
        action: CheckAction,
        score: Option<f64>,
        start: Instant,
        attempts: Option<u32>,
        error: Option<String>,
    ) {
        self.logger
            .log(CheckLogEntry {
                domain: domain.to_string(),
                url: url.to_string(),
                action,
                score,
                latency_ms: start.elapsed().as_millis() as u64,
                attempts,
                error,
            })
            .await;
    }
}
