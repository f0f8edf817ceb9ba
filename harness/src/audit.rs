//! Input-validation and access-control audit of the booking backend.
//!
//! Sends payloads the backend is expected to refuse and reports, per payload,
//! whether it did. Run only against a deployment you own: accepted payloads
//! end up as real booking rows.

use arena_client::{
    BookingBackend, BookingRequest, ClientResult, Credentials, FunctionCall, FunctionReply,
    StatusUpdate,
};
use chrono::{Days, Local, NaiveDate};
use serde_json::json;
use std::fmt;
use std::io::{self, Write};
use tracing::{info, warn};

const XSS_PAYLOADS: &[&str] = &[
    r#"<img src=x onerror=alert("XSS")>"#,
    r#""><script>document.location="http://evil.com"</script>"#,
    r#"<svg/onload=alert("XSS")>"#,
    r#"javascript:alert("XSS")"#,
    r#"<iframe src="javascript:alert('XSS')">"#,
    r#"${alert("XSS")}"#,
    r#"<body onload=alert("XSS")>"#,
];

const SQL_PAYLOADS: &[&str] = &[
    "'; DROP TABLE bookings; --",
    "1' OR '1'='1",
    "admin'--",
    "' UNION SELECT * FROM admin_users--",
    "'; DELETE FROM bookings WHERE '1'='1",
    "1' AND 1=1--",
];

/// Words that should never appear in an error returned to the public.
const LEAKY_TERMS: &[&str] = &["database", "stack trace", "file path"];

const NIL_BOOKING_ID: &str = "00000000-0000-0000-0000-000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Xss,
    SqlInjection,
    AccessControl,
    DataValidation,
    InfoDisclosure,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Xss => "XSS Injection",
            Category::SqlInjection => "SQL Injection",
            Category::AccessControl => "Authentication & Authorization",
            Category::DataValidation => "Data Validation & Business Logic",
            Category::InfoDisclosure => "Information Disclosure",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    Secure,
    Review,
    Critical,
}

impl Verdict {
    pub fn icon(&self) -> &'static str {
        match self {
            Verdict::Secure => "✅",
            Verdict::Review => "⚠️ ",
            Verdict::Critical => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub category: Category,
    pub name: String,
    pub verdict: Verdict,
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct AuditReport {
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.findings
            .iter()
            .filter(|f| f.verdict == verdict)
            .count()
    }

    pub fn worst(&self) -> Option<Verdict> {
        self.findings.iter().map(|f| f.verdict).max()
    }
}

/// A create-booking payload the backend must refuse.
#[derive(Debug, Clone)]
pub struct EdgeCase {
    pub name: &'static str,
    pub request: BookingRequest,
}

fn baseline(date: NaiveDate) -> BookingRequest {
    BookingRequest::new(
        "John Doe",
        "test@example.com",
        "0123456789",
        date,
        "10:00",
        1,
    )
}

pub fn edge_cases(date: NaiveDate) -> Vec<EdgeCase> {
    let base = baseline(date);
    let far_future = NaiveDate::from_ymd_opt(2099, 12, 31).unwrap_or(date);
    vec![
        EdgeCase {
            name: "Extremely long name (10000 chars)",
            request: base.clone().with_customer_name("A".repeat(10_000)),
        },
        EdgeCase {
            name: "Negative duration",
            request: base.clone().with_duration(-5),
        },
        EdgeCase {
            name: "Zero duration",
            request: base.clone().with_duration(0),
        },
        EdgeCase {
            name: "Invalid time slot (99:99)",
            request: base.clone().with_time_slot("99:99"),
        },
        EdgeCase {
            name: "Future year (2099)",
            request: base.clone().with_booking_date(far_future),
        },
        EdgeCase {
            name: "Unicode injection (emoji bomb)",
            request: base.clone().with_customer_name("💀".repeat(1000)),
        },
        EdgeCase {
            name: "Null byte injection",
            request: base.with_customer_name("John\u{0}DROP TABLE bookings"),
        },
    ]
}

fn preview(payload: &str) -> String {
    let short: String = payload.chars().take(30).collect();
    format!("{}...", short)
}

/// A refused payload is secure; an accepted one needs a human to check how it
/// was stored.
fn judge_payload(result: &ClientResult<FunctionReply>) -> (Verdict, String) {
    match result {
        Ok(reply) if (200..300).contains(&reply.status) => (
            Verdict::Review,
            format!(
                "Status {} - accepted{}",
                reply.status,
                if reply.has_data() {
                    "; payload stored, confirm it was escaped"
                } else {
                    ""
                }
            ),
        ),
        Ok(reply) => (Verdict::Secure, format!("Status {} - rejected", reply.status)),
        Err(e) => (Verdict::Review, format!("Error - {}", e)),
    }
}

/// Admin endpoints must refuse anonymous callers.
fn judge_admin_call(result: &ClientResult<FunctionReply>, leak: &str) -> (Verdict, String) {
    match result {
        Ok(reply) if reply.is_unauthorized() => (
            Verdict::Secure,
            format!("Status {} - access denied", reply.status),
        ),
        Ok(reply) if (200..300).contains(&reply.status) => {
            (Verdict::Critical, format!("Status {} - {}", reply.status, leak))
        }
        Ok(reply) => (
            Verdict::Review,
            format!("Unexpected response: {}", reply.status),
        ),
        Err(e) => (Verdict::Review, format!("Error - {}", e)),
    }
}

fn judge_error_body(result: &ClientResult<FunctionReply>) -> (Verdict, String) {
    match result {
        Ok(reply) => {
            let body = reply.raw.to_lowercase();
            match LEAKY_TERMS.iter().find(|t| body.contains(*t)) {
                Some(term) => (
                    Verdict::Review,
                    format!(
                        "Error mentions '{}': {}",
                        term,
                        reply.raw.chars().take(200).collect::<String>()
                    ),
                ),
                None => (Verdict::Secure, "Error messages are sanitized".to_string()),
            }
        }
        Err(e) => (Verdict::Review, format!("Error - {}", e)),
    }
}

pub struct ValidationAudit<'a> {
    backend: &'a dyn BookingBackend,
    booking_date: NaiveDate,
    report: AuditReport,
}

impl<'a> ValidationAudit<'a> {
    pub fn new(backend: &'a dyn BookingBackend) -> Self {
        let today = Local::now().date_naive();
        Self::with_date(
            backend,
            today.checked_add_days(Days::new(7)).unwrap_or(today),
        )
    }

    pub fn with_date(backend: &'a dyn BookingBackend, booking_date: NaiveDate) -> Self {
        Self {
            backend,
            booking_date,
            report: AuditReport::default(),
        }
    }

    pub async fn run(mut self) -> AuditReport {
        info!(
            "Starting validation audit against {} backend",
            self.backend.backend_name()
        );

        self.injection(Category::Xss, XSS_PAYLOADS, "10:00").await;
        self.injection(Category::SqlInjection, SQL_PAYLOADS, "14:00")
            .await;
        self.access_control().await;
        self.data_validation().await;
        self.info_disclosure().await;

        self.report
    }

    fn record(&mut self, category: Category, name: String, (verdict, detail): (Verdict, String)) {
        if verdict != Verdict::Secure {
            warn!("{} / {}: {}", category, name, detail);
        }
        self.report.findings.push(Finding {
            category,
            name,
            verdict,
            detail,
        });
    }

    async fn injection(&mut self, category: Category, payloads: &[&str], slot: &str) {
        for (i, payload) in payloads.iter().enumerate() {
            let request = baseline(self.booking_date)
                .with_customer_name(*payload)
                .with_time_slot(slot);
            let result = self.backend.create_booking(&request).await;
            self.record(
                category,
                format!("Payload {}: {}", i + 1, preview(payload)),
                judge_payload(&result),
            );
        }
    }

    async fn access_control(&mut self) {
        let result = self.backend.list_bookings_anonymously().await;
        self.record(
            Category::AccessControl,
            "get-bookings without auth".to_string(),
            judge_admin_call(&result, "admin endpoint accessible without auth"),
        );

        let update = StatusUpdate {
            booking_id: NIL_BOOKING_ID.to_string(),
            status: "confirmed".to_string(),
        };
        let result = self.backend.update_booking_status(&update).await;
        self.record(
            Category::AccessControl,
            "update-booking-status without admin rights".to_string(),
            judge_admin_call(&result, "non-admin can update booking status"),
        );
    }

    async fn data_validation(&mut self) {
        for case in edge_cases(self.booking_date) {
            let result = self.backend.create_booking(&case.request).await;
            self.record(
                Category::DataValidation,
                case.name.to_string(),
                judge_payload(&result),
            );
        }
    }

    async fn info_disclosure(&mut self) {
        let call = FunctionCall::post("create-booking", json!({"invalid": "data"}))
            .with_credentials(Credentials::ApiKeyOnly);
        let result = self.backend.call_function(call).await;
        self.record(
            Category::InfoDisclosure,
            "Error message verbosity".to_string(),
            judge_error_body(&result),
        );
    }
}

pub fn render(report: &AuditReport, out: &mut impl Write) -> io::Result<()> {
    let heavy = "═".repeat(51);
    let light = "─".repeat(49);

    writeln!(out, "{}", heavy)?;
    writeln!(out, "BOOKING BACKEND VALIDATION AUDIT")?;
    writeln!(out, "{}", heavy)?;

    let mut current = None;
    for finding in &report.findings {
        if current != Some(finding.category) {
            writeln!(out, "\n[{}]", finding.category)?;
            writeln!(out, "{}", light)?;
            current = Some(finding.category);
        }
        writeln!(out, "{} {}", finding.verdict.icon(), finding.name)?;
        writeln!(out, "   {}", finding.detail)?;
    }

    writeln!(out, "\n{}", heavy)?;
    writeln!(
        out,
        "AUDIT COMPLETE: {} secure, {} to review, {} critical",
        report.count(Verdict::Secure),
        report.count(Verdict::Review),
        report.count(Verdict::Critical)
    )?;
    writeln!(out, "{}", heavy)
}
