use phishwatch::cache::{now_ms, MemoryStore, ResultCache};
use phishwatch::checker::{CheckEvent, CheckSettings, ManualCheckResponse, UrlChecker};
use phishwatch::client::{
    ClassificationResult, ClassifierError, ClassifierTransport, RetryPolicy,
    RetryingClassifierClient,
};
use phishwatch::config::{Config, Variant};
use phishwatch::logger::{CheckAction, CheckLogger};
use phishwatch::stats::StatsCollector;
use phishwatch::verdict::ScoreBand;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

// --- Mocks ---

struct MockTransport {
    response: Result<ClassificationResult, u16>,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl ClassifierTransport for MockTransport {
    async fn predict(&self, _url: &str) -> Result<ClassificationResult, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(result) => Ok(result.clone()),
            Err(status) => Err(ClassifierError::Server { status: *status }),
        }
    }
}

fn phishing_result(score: f64) -> ClassificationResult {
    serde_json::from_value(serde_json::json!({
        "prediction": "Phishing",
        "confidence": 0.95,
        "suspicion_score": score,
    }))
    .unwrap()
}

struct Harness {
    checker: Arc<UrlChecker>,
    cache: ResultCache,
    calls: Arc<AtomicUsize>,
}

fn harness(response: Result<ClassificationResult, u16>, auto_check: bool, banner: bool) -> Harness {
    let config = Config::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = Arc::new(MockTransport {
        response,
        calls: calls.clone(),
    });

    let store = Arc::new(MemoryStore::new());
    let cache = ResultCache::new(store, config.cache_ttl());

    let client = RetryingClassifierClient::new(
        transport,
        RetryPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(5),
        },
    );

    let settings = CheckSettings {
        auto_check_enabled: auto_check,
        banner_enabled: banner,
        confidence_threshold: 0.80,
    };

    let checker = UrlChecker::new(
        Variant::Navishield,
        settings,
        cache.clone(),
        client,
        StatsCollector::new(3600),
        CheckLogger::new(config.logging.clone(), vec![]),
        CancellationToken::new(),
    );

    Harness {
        checker,
        cache,
        calls,
    }
}

// --- Navigation path ---

#[tokio::test]
async fn test_auto_check_disabled_skips_everything() {
    let h = harness(Ok(phishing_result(8.0)), false, true);
    let outcome = h
        .checker
        .handle_navigation(1, "https://example.com/")
        .await;

    assert_eq!(outcome.action, CheckAction::Skipped);
    assert!(outcome.badge.is_none());
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_http_scheme_is_skipped() {
    let h = harness(Ok(phishing_result(8.0)), true, true);
    let outcome = h.checker.handle_navigation(1, "ftp://example.com/").await;

    assert_eq!(outcome.action, CheckAction::Skipped);
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_never_checked_domain_takes_network_path() {
    let h = harness(Ok(phishing_result(8.0)), true, true);

    // lastChecked = 0 is always stale, even when a record exists
    h.cache.update("example.com", 0.0, 0).unwrap();

    let outcome = h
        .checker
        .handle_navigation(1, "https://example.com/login")
        .await;

    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.action, CheckAction::Classified);
    let badge = outcome.badge.unwrap();
    assert_eq!(badge.text, "PH");
    assert_eq!(badge.color, "#FF0000");
}

#[tokio::test]
async fn test_fresh_verdict_is_reused_without_network() {
    let h = harness(Ok(phishing_result(1.0)), true, true);

    // Checked 10 days ago with score 7, TTL is 30 days
    let now = now_ms();
    h.cache
        .update("example.com", 7.0, now - 10 * DAY_MS)
        .unwrap();

    let outcome = h
        .checker
        .handle_navigation(1, "https://example.com/anything")
        .await;

    assert_eq!(h.calls.load(Ordering::SeqCst), 0, "no network call expected");
    assert_eq!(outcome.action, CheckAction::CachedVerdict);
    let badge = outcome.badge.unwrap();
    assert_eq!(badge.text, "PH");
    assert_eq!(badge.color, "#FF0000");
    assert!(outcome.banner.is_some());
}

#[tokio::test]
async fn test_expired_verdict_triggers_recheck() {
    let h = harness(Ok(phishing_result(1.0)), true, true);

    let now = now_ms();
    h.cache
        .update("example.com", 7.0, now - 31 * DAY_MS)
        .unwrap();

    let outcome = h
        .checker
        .handle_navigation(1, "https://example.com/")
        .await;

    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.action, CheckAction::Classified);
    assert_eq!(outcome.badge.unwrap().text, "OK");

    // Cache now holds the fresh verdict
    let record = h.cache.lookup("example.com").unwrap();
    assert_eq!(record.last_score, 1.0);
    assert!(record.last_checked_ms >= now);
}

#[tokio::test]
async fn test_phishing_result_sets_badge_and_banner() {
    let h = harness(Ok(phishing_result(8.0)), true, true);
    let outcome = h
        .checker
        .handle_navigation(7, "https://examp1e.com/login")
        .await;

    assert_eq!(outcome.tab_id, 7);
    assert_eq!(outcome.badge.unwrap().text, "PH");
    let banner = outcome.banner.unwrap();
    assert!(banner.contains("Navi says"));
    assert!(banner.contains('8'));
}

#[tokio::test]
async fn test_banner_suppressed_when_disabled() {
    let h = harness(Ok(phishing_result(8.0)), true, false);
    let outcome = h
        .checker
        .handle_navigation(1, "https://examp1e.com/login")
        .await;

    // Badge still reflects the verdict; only the banner is gated
    assert_eq!(outcome.badge.unwrap().text, "PH");
    assert!(outcome.banner.is_none());
}

#[tokio::test]
async fn test_server_failure_leaves_cache_untouched() {
    let h = harness(Err(500), true, true);

    let now = now_ms();
    h.cache
        .update("example.com", 7.0, now - 31 * DAY_MS)
        .unwrap();

    let outcome = h
        .checker
        .handle_navigation(1, "https://example.com/")
        .await;

    // Exactly max_attempts calls, then give up
    assert_eq!(h.calls.load(Ordering::SeqCst), 3);
    assert_eq!(outcome.action, CheckAction::Failed);
    assert!(outcome.badge.is_none());
    let error = outcome.error.unwrap();
    assert!(error.contains("3 attempts"));
    assert!(error.contains("500"));

    // Prior verdict must not be overwritten with a placeholder score
    let record = h.cache.lookup("example.com").unwrap();
    assert_eq!(record.last_score, 7.0);
    assert_eq!(record.last_checked_ms, now - 31 * DAY_MS);
}

// --- Manual path ---

#[tokio::test]
async fn test_manual_check_empty_url_is_invalid_input() {
    let h = harness(Ok(phishing_result(8.0)), true, true);
    let err = h.checker.handle_manual("   ").await.unwrap_err();
    assert!(matches!(err, ClassifierError::InvalidInput));
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_manual_check_returns_full_payload() {
    let result: ClassificationResult = serde_json::from_value(serde_json::json!({
        "prediction": "Phishing",
        "confidence": 0.97,
        "suspicion_score": 8,
        "safe_browsing": {"matches": [{"threatType": "SOCIAL_ENGINEERING"}]},
        "whois_info": {"WhoisRecord": {"domainName": "examp1e.com"}}
    }))
    .unwrap();

    let h = harness(Ok(result), true, true);
    let response = h
        .checker
        .handle_manual("https://examp1e.com/login")
        .await
        .unwrap();

    match response {
        ManualCheckResponse::Classifier { band, result, .. } => {
            assert_eq!(band, ScoreBand::High);
            assert_eq!(result.suspicion_score, Some(8.0));
            // Supplemental payloads pass through unmodified
            assert!(result.safe_browsing.is_some());
            assert!(result.whois_info.is_some());
        }
        other => panic!("expected classifier response, got {other:?}"),
    }

    // Verdict was persisted for the domain
    let record = h.cache.lookup("examp1e.com").unwrap();
    assert_eq!(record.last_score, 8.0);
}

#[tokio::test]
async fn test_manual_check_reuses_fresh_verdict() {
    let h = harness(Ok(phishing_result(1.0)), true, true);

    let now = now_ms();
    h.cache
        .update("example.com", 4.0, now - 2 * DAY_MS)
        .unwrap();

    let response = h
        .checker
        .handle_manual("https://example.com/page")
        .await
        .unwrap();

    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    match response {
        ManualCheckResponse::Cache {
            domain,
            suspicion_score,
            band,
            ..
        } => {
            assert_eq!(domain, "example.com");
            assert_eq!(suspicion_score, 4.0);
            assert_eq!(band, ScoreBand::Medium);
        }
        other => panic!("expected cache response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_manual_check_surfaces_exhausted_retries() {
    let h = harness(Err(503), true, true);
    let err = h
        .checker
        .handle_manual("https://example.com/")
        .await
        .unwrap_err();

    assert_eq!(h.calls.load(Ordering::SeqCst), 3);
    match err {
        ClassifierError::ExhaustedRetries { attempts, cause } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*cause, ClassifierError::Server { status: 503 }));
        }
        other => panic!("expected ExhaustedRetries, got {other:?}"),
    }

    // Nothing was written for the domain
    assert!(h.cache.lookup("example.com").is_none());
}

// --- Event dispatch ---

#[tokio::test]
async fn test_event_dispatch_covers_both_kinds() {
    let h = harness(Ok(phishing_result(8.0)), true, true);

    let nav = h
        .checker
        .handle_event(CheckEvent::NavigationCompleted {
            tab_id: 3,
            url: "https://example.com/".to_string(),
        })
        .await;
    let json = serde_json::to_value(&nav).unwrap();
    assert_eq!(json["tab_id"], 3);
    assert_eq!(json["badge"]["text"], "PH");

    let manual = h
        .checker
        .handle_event(CheckEvent::ManualCheck {
            url: "https://example.com/".to_string(),
        })
        .await;
    let json = serde_json::to_value(&manual).unwrap();
    // Second event hits the verdict cached by the first
    assert_eq!(json["source"], "cache");
}

#[tokio::test]
async fn test_settings_hot_swap() {
    let h = harness(Ok(phishing_result(8.0)), false, true);

    let outcome = h
        .checker
        .handle_navigation(1, "https://example.com/")
        .await;
    assert_eq!(outcome.action, CheckAction::Skipped);

    h.checker.update_settings(CheckSettings {
        auto_check_enabled: true,
        banner_enabled: true,
        confidence_threshold: 0.80,
    });

    let outcome = h
        .checker
        .handle_navigation(1, "https://example.com/")
        .await;
    assert_eq!(outcome.action, CheckAction::Classified);
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
}
