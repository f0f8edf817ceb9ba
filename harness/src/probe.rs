//! Timed probe execution
//!
//! [`Recorder::measure`] is the single place probe failures are contained:
//! whatever the action returns, a [`TestRecord`] is appended and the caller
//! carries on with the next probe.

use arena_client::ClientError;
use serde::Serialize;
use std::future::Future;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProbeError {
    /// A probe-level assertion, e.g. an unexpected status code.
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ProbeError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

pub type ProbeResult<T> = Result<T, ProbeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
}

/// Result text on success, error text on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub outcome: Outcome,
}

impl TestRecord {
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Pass
    }
}

/// What [`Recorder::measure`] hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub success: bool,
    pub duration_ms: u64,
}

/// Ordered list of records for one run.
#[derive(Debug, Default)]
pub struct Recorder {
    records: Vec<TestRecord>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Awaits `action`, timing it from the moment it is first polled, and
    /// appends a record named `name`. Errors are recorded, never returned.
    pub async fn measure<F>(&mut self, name: impl Into<String>, action: F) -> Measurement
    where
        F: Future<Output = ProbeResult<String>>,
    {
        let name = name.into();
        let start = Instant::now();
        let result = action.await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (status, outcome) = match result {
            Ok(summary) => {
                debug!("{} passed in {}ms: {}", name, duration_ms, summary);
                (TestStatus::Pass, Outcome::Result(summary))
            }
            Err(e) => {
                warn!("{} failed in {}ms: {}", name, duration_ms, e);
                (TestStatus::Fail, Outcome::Error(e.to_string()))
            }
        };

        let success = status == TestStatus::Pass;
        self.records.push(TestRecord {
            name,
            status,
            duration_ms,
            outcome,
        });

        Measurement {
            success,
            duration_ms,
        }
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TestRecord> {
        self.records
    }
}
