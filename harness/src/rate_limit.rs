//! Black-box check of the backend's per-email booking throttle.
//!
//! The backend allows five `create-booking` requests per email per hour; the
//! sixth must come back with a "Too many booking requests" error.

use arena_client::{hour_slot, BookingBackend, BookingRequest, FunctionReply};
use chrono::{Days, Local, NaiveDate};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Substring of the backend's throttle error message.
pub const RATE_LIMIT_MESSAGE: &str = "Too many booking requests";

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone)]
pub struct RateLimitPlan {
    pub email: String,
    pub booking_date: NaiveDate,
    /// Requests the backend should accept before throttling
    pub allowance: usize,
    /// Slot hour of the first request; each later request takes the next hour
    pub first_hour: u32,
    pub pause: Duration,
}

impl Default for RateLimitPlan {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            email: "ratelimit@test.com".to_string(),
            booking_date: today.checked_add_days(Days::new(14)).unwrap_or(today),
            allowance: 5,
            first_hour: 9,
            pause: Duration::from_millis(300),
        }
    }
}

impl RateLimitPlan {
    /// Allowance plus the one request that must be throttled.
    pub fn attempts(&self) -> usize {
        self.allowance.saturating_add(1)
    }

    /// Every request needs its own slot within one day, or the backend
    /// refuses the late ones as invalid and the throttle goes untested.
    pub fn validate(&self) -> Result<(), String> {
        if self.allowance == 0 {
            return Err("Allowance must be at least 1".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email cannot be empty".to_string());
        }

        let last_hour = u32::try_from(self.attempts() - 1)
            .ok()
            .and_then(|n| self.first_hour.checked_add(n));
        match last_hour {
            Some(hour) if hour <= 23 => Ok(()),
            _ => Err(format!(
                "{} requests starting at {} run past 23:00; lower the allowance",
                self.attempts(),
                hour_slot(self.first_hour)
            )),
        }
    }

    pub fn request(&self, index: usize) -> BookingRequest {
        BookingRequest::new(
            format!("Rate Test User {}", index),
            self.email.clone(),
            "0123456789",
            self.booking_date,
            hour_slot(self.first_hour + index as u32 - 1),
            1,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Within the allowance, booking created.
    Accepted { booking_id: Option<String> },
    /// Within the allowance, refused for an unrelated reason.
    Rejected { message: String },
    /// Within the allowance, but throttled already.
    ThrottledEarly { message: String },
    /// Over the allowance and throttled.
    Blocked { message: String },
    /// Over the allowance and not throttled.
    NotBlocked { response: String },
    TransportError { message: String },
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Verdict::ThrottledEarly { .. } | Verdict::NotBlocked { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub index: usize,
    pub time_slot: String,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Default)]
pub struct RateLimitReport {
    pub attempts: Vec<Attempt>,
}

impl RateLimitReport {
    /// The last request was throttled and none before it was.
    pub fn passed(&self) -> bool {
        let blocked_last = matches!(
            self.attempts.last(),
            Some(Attempt {
                verdict: Verdict::Blocked { .. },
                ..
            })
        );
        blocked_last && !self.attempts.iter().any(|a| a.verdict.is_failure())
    }
}

/// Classifies a reply to request number `index` (1-based).
pub fn classify(index: usize, allowance: usize, reply: &FunctionReply) -> Verdict {
    let message = reply.error_message().unwrap_or_default();
    let throttled = message.contains(RATE_LIMIT_MESSAGE);

    if index <= allowance {
        if throttled {
            Verdict::ThrottledEarly {
                message: message.to_string(),
            }
        } else if reply.is_success() {
            Verdict::Accepted {
                booking_id: reply.booking_id().map(str::to_string),
            }
        } else {
            Verdict::Rejected {
                message: reply
                    .error_message()
                    .unwrap_or("Unknown error")
                    .to_string(),
            }
        }
    } else if throttled {
        Verdict::Blocked {
            message: message.to_string(),
        }
    } else {
        Verdict::NotBlocked {
            response: reply.pretty_body(),
        }
    }
}

pub struct RateLimitProbe<'a> {
    backend: &'a dyn BookingBackend,
    plan: RateLimitPlan,
}

impl<'a> RateLimitProbe<'a> {
    pub fn new(backend: &'a dyn BookingBackend, plan: RateLimitPlan) -> Self {
        Self { backend, plan }
    }

    /// Sends every request in order, printing each verdict to `out` as it
    /// arrives. An invalid plan is refused before anything is sent; after
    /// that nothing aborts the run early.
    pub async fn run(&self, out: &mut impl Write) -> io::Result<RateLimitReport> {
        self.plan
            .validate()
            .map_err(|message| io::Error::new(io::ErrorKind::InvalidInput, message))?;

        let mut report = RateLimitReport::default();
        let total = self.plan.attempts();

        for index in 1..=total {
            let request = self.plan.request(index);
            let verdict = match self.backend.create_booking(&request).await {
                Ok(reply) => {
                    debug!("request {} -> {}", index, reply.status);
                    classify(index, self.plan.allowance, &reply)
                }
                Err(e) => Verdict::TransportError {
                    message: e.to_string(),
                },
            };

            if verdict.is_failure() {
                warn!("request {}/{}: {:?}", index, total, verdict);
            }

            let attempt = Attempt {
                index,
                time_slot: request.time_slot,
                verdict,
            };
            render_attempt(&attempt, total, out)?;
            report.attempts.push(attempt);

            if index < total && !self.plan.pause.is_zero() {
                tokio::time::sleep(self.plan.pause).await;
            }
        }

        info!(
            "Rate limit check {}",
            if report.passed() { "passed" } else { "failed" }
        );
        Ok(report)
    }
}

pub fn banner(plan: &RateLimitPlan, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "TESTING RATE LIMITING ({} bookings per hour per email)",
        plan.allowance
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)
}

pub fn footer(report: &RateLimitReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    if report.passed() {
        writeln!(out, "RATE LIMIT TEST COMPLETE: limiter enforced")?;
    } else {
        writeln!(out, "RATE LIMIT TEST COMPLETE: limiter NOT enforced as expected")?;
    }
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn render_attempt(attempt: &Attempt, total: usize, out: &mut impl Write) -> io::Result<()> {
    let prefix = format!("Request {}/{}:", attempt.index, total);
    let indent = " ".repeat(prefix.len() + 1);

    match &attempt.verdict {
        Verdict::Accepted { booking_id } => {
            let id = booking_id.as_deref().unwrap_or("N/A");
            let short: String = id.chars().take(8).collect();
            writeln!(out, "{} ✅ Accepted (ID: {}...)", prefix, short)
        }
        Verdict::Rejected { message } => writeln!(out, "{} ⚠️  {}", prefix, message),
        Verdict::ThrottledEarly { message } => {
            writeln!(out, "{} ❌ Rate limited too early", prefix)?;
            writeln!(out, "{}Message: {}", indent, message)
        }
        Verdict::Blocked { message } => {
            writeln!(out, "{} ✅ BLOCKED - Rate limit enforced!", prefix)?;
            writeln!(out, "{}Message: {}", indent, message)
        }
        Verdict::NotBlocked { response } => {
            writeln!(out, "{} ❌ Should have been rate limited", prefix)?;
            writeln!(out, "{}Response: {}", indent, response)
        }
        Verdict::TransportError { message } => {
            writeln!(out, "{} Error - {}", prefix, message)
        }
    }
}
