//! Console summary for a performance run.

use crate::probe::{Outcome, TestRecord};
use std::io::{self, Write};

const RULE_WIDTH: usize = 70;

/// Latency band of a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBand {
    Fast,
    Medium,
    Slow,
}

impl DurationBand {
    pub fn from_millis(ms: u64) -> Self {
        if ms < 1000 {
            DurationBand::Fast
        } else if ms < 3000 {
            DurationBand::Medium
        } else {
            DurationBand::Slow
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DurationBand::Fast => "🟢",
            DurationBand::Medium => "🟡",
            DurationBand::Slow => "🔴",
        }
    }
}

/// Rating of the run's average latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallRating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl OverallRating {
    pub fn from_average(avg_ms: f64) -> Self {
        if avg_ms < 500.0 {
            OverallRating::Excellent
        } else if avg_ms < 1000.0 {
            OverallRating::Good
        } else {
            OverallRating::NeedsImprovement
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            OverallRating::Excellent => "🟢 EXCELLENT: Site is very fast!",
            OverallRating::Good => "🟡 GOOD: Site performance is acceptable",
            OverallRating::NeedsImprovement => "🔴 NEEDS IMPROVEMENT: Consider optimization",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    /// `None` when nothing was recorded
    pub average_ms: Option<f64>,
}

impl Summary {
    pub fn of(records: &[TestRecord]) -> Self {
        let passed = records.iter().filter(|r| r.passed()).count();
        let average_ms = if records.is_empty() {
            None
        } else {
            let total: u64 = records.iter().map(|r| r.duration_ms).sum();
            Some(total as f64 / records.len() as f64)
        };

        Self {
            passed,
            failed: records.len() - passed,
            average_ms,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn rating(&self) -> Option<OverallRating> {
        self.average_ms.map(OverallRating::from_average)
    }
}

pub fn banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🚀 Starting Performance & Backend Sync Tests...\n")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub fn render(records: &[TestRecord], out: &mut impl Write) -> io::Result<Summary> {
    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "\n📊 TEST RESULTS SUMMARY:\n")?;

    for record in records {
        let icon = if record.passed() { "✅" } else { "❌" };
        let band = DurationBand::from_millis(record.duration_ms);

        writeln!(out, "{} {}", icon, record.name)?;
        writeln!(out, "   Duration: {} {}ms", band.icon(), record.duration_ms)?;
        match &record.outcome {
            Outcome::Result(text) => writeln!(out, "   Result: {}", text)?,
            Outcome::Error(text) => writeln!(out, "   Error: {}", text)?,
        }
        writeln!(out)?;
    }

    let summary = Summary::of(records);

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "\n📈 OVERALL: {}/{} tests passed\n",
        summary.passed,
        summary.total()
    )?;

    writeln!(out, "💡 PERFORMANCE ANALYSIS:\n")?;
    match (summary.average_ms, summary.rating()) {
        (Some(avg), Some(rating)) => {
            writeln!(out, "Average Response Time: {}ms", avg.round() as u64)?;
            writeln!(out, "{}", rating.verdict())?;
        }
        _ => writeln!(out, "No probes were recorded")?,
    }

    if summary.failed == 0 && summary.total() > 0 {
        writeln!(
            out,
            "\n✅ Frontend-Backend Sync: All endpoints responding correctly"
        )?;
        writeln!(out, "✅ No lag detected in booking flow")?;
        writeln!(out, "✅ Edge functions are performant and stable\n")?;
    } else if summary.failed > 0 {
        writeln!(
            out,
            "\n⚠️  {} probe(s) failed; see errors above\n",
            summary.failed
        )?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::TestStatus;

    fn record(name: &str, ms: u64, ok: bool) -> TestRecord {
        TestRecord {
            name: name.to_string(),
            status: if ok { TestStatus::Pass } else { TestStatus::Fail },
            duration_ms: ms,
            outcome: if ok {
                Outcome::Result("fine".to_string())
            } else {
                Outcome::Error("API call failed: 500".to_string())
            },
        }
    }

    #[test]
    fn test_duration_bands() {
        assert_eq!(DurationBand::from_millis(0), DurationBand::Fast);
        assert_eq!(DurationBand::from_millis(999), DurationBand::Fast);
        assert_eq!(DurationBand::from_millis(1000), DurationBand::Medium);
        assert_eq!(DurationBand::from_millis(2999), DurationBand::Medium);
        assert_eq!(DurationBand::from_millis(3000), DurationBand::Slow);
    }

    #[test]
    fn test_overall_rating() {
        assert_eq!(OverallRating::from_average(499.9), OverallRating::Excellent);
        assert_eq!(OverallRating::from_average(500.0), OverallRating::Good);
        assert_eq!(OverallRating::from_average(999.0), OverallRating::Good);
        assert_eq!(
            OverallRating::from_average(1000.0),
            OverallRating::NeedsImprovement
        );
    }

    #[test]
    fn test_summary_counts_and_average() {
        let records = vec![record("a", 100, true), record("b", 300, false)];
        let summary = Summary::of(&records);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.average_ms, Some(200.0));
        assert_eq!(summary.rating(), Some(OverallRating::Excellent));
    }

    #[test]
    fn test_empty_run_has_no_average() {
        let summary = Summary::of(&[]);
        assert_eq!(summary.total(), 0);
        assert!(summary.average_ms.is_none());

        let mut out = Vec::new();
        render(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("OVERALL: 0/0 tests passed"));
        assert!(text.contains("No probes were recorded"));
    }

    #[test]
    fn test_render_lines() {
        let records = vec![record("Database Query Performance", 1500, true), record("Check Availability Endpoint", 40, false)];
        let mut out = Vec::new();
        let summary = render(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(summary.failed, 1);
        assert!(text.contains("✅ Database Query Performance\n   Duration: 🟡 1500ms\n   Result: fine"));
        assert!(text.contains("❌ Check Availability Endpoint\n   Duration: 🟢 40ms\n   Error: API call failed: 500"));
        assert!(text.contains("OVERALL: 1/2 tests passed"));
        assert!(text.contains("Average Response Time: 770ms"));
        assert!(text.contains("GOOD"));
        assert!(!text.contains("All endpoints responding correctly"));
    }

    #[test]
    fn test_all_green_prints_sync_lines() {
        let records = vec![record("a", 10, true)];
        let mut out = Vec::new();
        render(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("All endpoints responding correctly"));
        assert!(text.contains("EXCELLENT"));
    }
}
