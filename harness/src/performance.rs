//! Latency probes against the site origin and the booking backend.

use crate::probe::{ProbeError, Recorder, TestRecord};
use arena_client::{AvailabilityQuery, BookingBackend, BookingRequest};
use chrono::{Days, Local, NaiveDate};
use std::time::Duration;
use tracing::info;

pub const PAGE_LOAD: &str = "Frontend Page Load Speed";
pub const STATIC_ASSETS: &str = "Static Assets (CSS/JS)";
pub const DATABASE_QUERY: &str = "Database Query Performance";
pub const CHECK_AVAILABILITY: &str = "Check Availability Endpoint";
pub const CREATE_BOOKING: &str = "Create Booking Endpoint";
pub const COLD_START: &str = "Edge Function Cold Start";
pub const WARM_RESPONSE: &str = "Edge Function Warm Response";

/// Dates and tunables for one performance run.
#[derive(Debug, Clone)]
pub struct PerfPlan {
    pub today: NaiveDate,
    /// Date used by both cold/warm calls
    pub warmup_date: NaiveDate,
    /// Pause between the cold and warm calls
    pub warm_pause: Duration,
    /// Makes the create-booking customer unique
    pub run_id: u64,
}

impl Default for PerfPlan {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            today,
            warmup_date: today.checked_add_days(Days::new(30)).unwrap_or(today),
            warm_pause: Duration::from_millis(100),
            run_id: chrono::Utc::now().timestamp().max(0) as u64,
        }
    }
}

impl PerfPlan {
    fn days_ahead(&self, days: u64) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(days))
            .unwrap_or(self.today)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColdWarm {
    pub cold_ms: u64,
    pub warm_ms: u64,
}

pub struct PerformanceProbe<'a> {
    backend: &'a dyn BookingBackend,
    plan: PerfPlan,
    recorder: Recorder,
}

impl<'a> PerformanceProbe<'a> {
    pub fn new(backend: &'a dyn BookingBackend, plan: PerfPlan) -> Self {
        Self {
            backend,
            plan,
            recorder: Recorder::new(),
        }
    }

    /// Runs every probe in order and returns the records.
    pub async fn run(mut self) -> Vec<TestRecord> {
        info!(
            "Starting performance run against {} backend",
            self.backend.backend_name()
        );

        self.page_load().await;
        self.static_assets().await;
        self.database_query().await;
        self.check_availability().await;
        self.create_booking().await;
        let cold_warm = self.cold_vs_warm().await;

        info!(
            "Cold start {}ms, warm {}ms",
            cold_warm.cold_ms, cold_warm.warm_ms
        );
        self.recorder.into_records()
    }

    pub async fn page_load(&mut self) {
        let backend = self.backend;
        self.recorder
            .measure(PAGE_LOAD, async move {
                let response = backend.fetch_site("/").await?;
                if !response.is_success() {
                    return Err(ProbeError::failed(format!(
                        "Page load failed: {}",
                        response.status
                    )));
                }
                Ok(format!("Loaded {:.2}KB HTML", response.size_kb()))
            })
            .await;
    }

    pub async fn static_assets(&mut self) {
        let backend = self.backend;
        self.recorder
            .measure(STATIC_ASSETS, async move {
                let css = backend.fetch_site("/styles.css").await?;
                let js = backend.fetch_site("/app.js").await?;
                if !css.is_success() || !js.is_success() {
                    return Err(ProbeError::failed("Assets failed to load"));
                }
                Ok(format!(
                    "CSS: {:.2}KB, JS: {:.2}KB",
                    css.size_kb(),
                    js.size_kb()
                ))
            })
            .await;
    }

    pub async fn database_query(&mut self) {
        let backend = self.backend;
        self.recorder
            .measure(DATABASE_QUERY, async move {
                let reply = backend.query_table("bookings", "select=id&limit=1").await?;
                if !reply.is_success() {
                    return Err(ProbeError::failed(format!(
                        "Database query failed: {}",
                        reply.status
                    )));
                }
                Ok("Query successful".to_string())
            })
            .await;
    }

    pub async fn check_availability(&mut self) {
        let backend = self.backend;
        let query = AvailabilityQuery::new(self.plan.days_ahead(1), "10:00", 2);
        self.recorder
            .measure(CHECK_AVAILABILITY, async move {
                let reply = backend.check_availability(&query).await?;
                if !reply.is_success() {
                    return Err(ProbeError::failed(format!(
                        "API call failed: {}",
                        reply.status
                    )));
                }
                let available = reply
                    .available()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "null".to_string());
                Ok(format!("Available: {}", available))
            })
            .await;
    }

    pub async fn create_booking(&mut self) {
        let backend = self.backend;
        let id = self.plan.run_id;
        let request = BookingRequest::new(
            format!("Performance Test {}", id),
            format!("test{}@example.com", id),
            "0812345678",
            self.plan.days_ahead(2),
            "14:00",
            2,
        );
        self.recorder
            .measure(CREATE_BOOKING, async move {
                let reply = backend.create_booking(&request).await?;
                if !reply.is_success() {
                    let reason = reply
                        .error_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| reply.status.to_string());
                    return Err(ProbeError::failed(format!("Booking failed: {}", reason)));
                }
                Ok(format!(
                    "Booking ID: {}",
                    reply.booking_id().unwrap_or("N/A")
                ))
            })
            .await;
    }

    /// Two back-to-back calls to the same function. Only an approximation of
    /// cold versus warm; nothing guarantees the first call was cold.
    pub async fn cold_vs_warm(&mut self) -> ColdWarm {
        println!("\n🔥 Testing Cold Start vs Warm Response...");

        let cold = self
            .function_ping(COLD_START, AvailabilityQuery::new(self.plan.warmup_date, "10:00", 1))
            .await;
        tokio::time::sleep(self.plan.warm_pause).await;
        let warm = self
            .function_ping(
                WARM_RESPONSE,
                AvailabilityQuery::new(self.plan.warmup_date, "11:00", 1),
            )
            .await;

        ColdWarm {
            cold_ms: cold,
            warm_ms: warm,
        }
    }

    // A non-200 reply is reported as "Failed" without failing the record.
    async fn function_ping(&mut self, name: &str, query: AvailabilityQuery) -> u64 {
        let backend = self.backend;
        self.recorder
            .measure(name, async move {
                let reply = backend.check_availability(&query).await?;
                Ok(if reply.is_success() { "Success" } else { "Failed" }.to_string())
            })
            .await
            .duration_ms
    }
}

/// Runs the full performance suite.
pub async fn run(backend: &dyn BookingBackend, plan: PerfPlan) -> Vec<TestRecord> {
    PerformanceProbe::new(backend, plan).run().await
}
