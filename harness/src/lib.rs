pub mod audit;
pub mod performance;
pub mod probe;
pub mod rate_limit;
pub mod report;

pub use audit::{AuditReport, Category, Finding, ValidationAudit};
pub use performance::{ColdWarm, PerfPlan, PerformanceProbe};
pub use probe::{Measurement, Outcome, ProbeError, ProbeResult, Recorder, TestRecord, TestStatus};
pub use rate_limit::{
    Attempt, RateLimitPlan, RateLimitProbe, RateLimitReport, Verdict, RATE_LIMIT_MESSAGE,
};
pub use report::{DurationBand, OverallRating, Summary};
