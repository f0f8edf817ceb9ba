use arena_client::{
    BackendConfig, BookingBackend, ClientResult, FunctionCall, FunctionReply, HostedBackend,
    SiteResponse,
};
use async_trait::async_trait;
use harness::performance::{self, PerfPlan};
use harness::rate_limit::{RateLimitPlan, RateLimitProbe, Verdict};
use harness::{Outcome, TestStatus};
use mockito::Matcher;
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;

/// Booking backend with an in-memory per-email counter.
struct CountingBackend {
    /// `None` means the backend never throttles.
    limit: Option<usize>,
    seen: Mutex<Vec<(String, String)>>,
}

impl CountingBackend {
    fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BookingBackend for CountingBackend {
    async fn fetch_site(&self, _path: &str) -> ClientResult<SiteResponse> {
        Ok(SiteResponse {
            status: 404,
            body: Vec::new(),
        })
    }

    async fn query_table(&self, _table: &str, _query: &str) -> ClientResult<FunctionReply> {
        Ok(FunctionReply::from_json(404, json!(null)))
    }

    async fn call_function(&self, call: FunctionCall) -> ClientResult<FunctionReply> {
        let body = call.body.unwrap_or_default();
        let email = body["email"].as_str().unwrap_or_default().to_string();
        let slot = body["time_slot"].as_str().unwrap_or_default().to_string();

        let mut seen = self.seen.lock().unwrap();
        let previous = seen.iter().filter(|(e, _)| *e == email).count();
        seen.push((email, slot));

        if self.limit.is_some_and(|limit| previous >= limit) {
            return Ok(FunctionReply::from_json(
                500,
                json!({"error": {
                    "code": "BOOKING_CREATION_FAILED",
                    "message": "Too many booking requests. Please try again later."
                }}),
            ));
        }

        Ok(FunctionReply::from_json(
            200,
            json!({"data": {"booking": {"id": format!("booking-{}", previous + 1)}}}),
        ))
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}

fn fast_plan() -> RateLimitPlan {
    RateLimitPlan {
        pause: Duration::ZERO,
        ..RateLimitPlan::default()
    }
}

#[tokio::test]
async fn test_rate_limit_enforced_on_sixth_request() {
    let backend = CountingBackend::new(Some(5));
    let mut out = Vec::new();

    let report = RateLimitProbe::new(&backend, fast_plan())
        .run(&mut out)
        .await
        .unwrap();

    assert_eq!(report.attempts.len(), 6);
    assert!(report.attempts[..5]
        .iter()
        .all(|a| matches!(a.verdict, Verdict::Accepted { .. })));
    assert!(matches!(
        report.attempts[5].verdict,
        Verdict::Blocked { .. }
    ));
    assert!(report.passed());

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Request 6/6: ✅ BLOCKED - Rate limit enforced!"));

    let seen = backend.seen.lock().unwrap();
    assert!(seen.iter().all(|(email, _)| email == "ratelimit@test.com"));
    let slots: Vec<_> = seen.iter().map(|(_, slot)| slot.as_str()).collect();
    assert_eq!(
        slots,
        vec!["09:00", "10:00", "11:00", "12:00", "13:00", "14:00"]
    );
}

#[tokio::test]
async fn test_missing_limiter_is_reported() {
    let backend = CountingBackend::new(None);
    let mut out = Vec::new();

    let report = RateLimitProbe::new(&backend, fast_plan())
        .run(&mut out)
        .await
        .unwrap();

    assert!(!report.passed());
    assert!(matches!(
        report.attempts.last().map(|a| &a.verdict),
        Some(Verdict::NotBlocked { .. })
    ));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Request 6/6: ❌ Should have been rate limited"));
    assert!(text.contains("booking-6"));
}

#[tokio::test]
async fn test_early_throttle_fails_the_check() {
    let backend = CountingBackend::new(Some(3));
    let mut out = Vec::new();

    let report = RateLimitProbe::new(&backend, fast_plan())
        .run(&mut out)
        .await
        .unwrap();

    assert!(matches!(
        report.attempts[3].verdict,
        Verdict::ThrottledEarly { .. }
    ));
    assert!(!report.passed());
}

#[tokio::test]
async fn test_perf_run_isolates_database_failure() {
    let mut server = mockito::Server::new_async().await;
    let html = "<html>".to_string() + &"x".repeat(4096) + "</html>";

    let _page = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(html)
        .create_async()
        .await;
    let _css = server
        .mock("GET", "/styles.css")
        .with_status(200)
        .with_body("body {}")
        .create_async()
        .await;
    let _js = server
        .mock("GET", "/app.js")
        .with_status(200)
        .with_body("console.log('ok');")
        .create_async()
        .await;
    let _rest = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/bookings".to_string()))
        .with_status(500)
        .with_body(r#"{"message":"internal error"}"#)
        .create_async()
        .await;
    let availability = server
        .mock("POST", "/functions/v1/check-availability")
        .with_status(200)
        .with_body(r#"{"data":{"available":true}}"#)
        .expect(3)
        .create_async()
        .await;
    let _booking = server
        .mock("POST", "/functions/v1/create-booking")
        .with_status(200)
        .with_body(r#"{"data":{"booking":{"id":"9b1deb4d-3b7d"}}}"#)
        .create_async()
        .await;

    let config = BackendConfig::new()
        .with_site_url(server.url())
        .with_backend_url(server.url())
        .with_api_key("anon-key");
    let backend = HostedBackend::new(config).unwrap();
    let plan = PerfPlan {
        warm_pause: Duration::ZERO,
        ..PerfPlan::default()
    };

    let records = performance::run(&backend, plan).await;

    assert_eq!(records.len(), 7);
    assert!(records
        .iter()
        .all(|r| matches!(r.status, TestStatus::Pass | TestStatus::Fail)));

    let failed: Vec<_> = records.iter().filter(|r| !r.passed()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, performance::DATABASE_QUERY);
    assert!(matches!(&failed[0].outcome, Outcome::Error(e) if e.contains("500")));

    let booking = records
        .iter()
        .find(|r| r.name == performance::CREATE_BOOKING)
        .unwrap();
    assert_eq!(
        booking.outcome,
        Outcome::Result("Booking ID: 9b1deb4d-3b7d".to_string())
    );

    availability.assert_async().await;
}

#[tokio::test]
async fn test_allowance_past_end_of_day_is_refused_before_sending() {
    let backend = CountingBackend::new(Some(15));
    let plan = RateLimitPlan {
        allowance: 15,
        ..fast_plan()
    };
    let mut out = Vec::new();

    let result = RateLimitProbe::new(&backend, plan).run(&mut out).await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(err.to_string().contains("past 23:00"));
    assert!(backend.seen.lock().unwrap().is_empty());
    assert!(out.is_empty());
}
