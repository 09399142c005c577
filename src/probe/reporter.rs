use crate::probe::constants::{FAST_INTERVAL_MS, INTERVAL_LABEL, SLOW_INTERVAL_MS};
use crate::probe::error::Result;
use crate::probe::measurement::ProbeSummary;
use crate::probe::statistics::Statistics;
use colored::*;
use std::io::Write;
use tracing::debug;

/// Reporter for interval lines and the end-of-run summary
pub struct Reporter;

impl Reporter {
    /// One interval line: fixed label, milliseconds to three decimals
    pub fn format_interval(interval_ms: f64) -> String {
        format!("{}: {:.3} ms", INTERVAL_LABEL, interval_ms)
    }

    pub fn format_rate(hz: f64) -> String {
        format!("reply rate: {:.2} Hz", hz)
    }

    /// Color an interval by how it compares to the fast/slow thresholds
    fn colorize_ms(value_ms: f64) -> ColoredString {
        let text = format!("{:>9.3} ms", value_ms);
        if value_ms < FAST_INTERVAL_MS {
            text.green()
        } else if value_ms < SLOW_INTERVAL_MS {
            text.yellow()
        } else {
            text.red()
        }
    }

    /// Print the session summary for a bounded run
    pub fn print_summary<W: Write>(&self, out: &mut W, summary: &ProbeSummary) -> Result<()> {
        debug!(
            cycles = summary.cycles,
            errors = summary.errors,
            empty_replies = summary.empty_replies,
            "Printing session summary"
        );

        writeln!(out)?;
        writeln!(out, "{}", "┌─────────────────────────────┐".cyan())?;
        writeln!(out, "{}", "│  RTU Probe Results          │".cyan())?;
        writeln!(out, "{}", "└─────────────────────────────┘".cyan())?;
        writeln!(out)?;

        let error_pct = if summary.cycles > 0 {
            summary.errors as f64 / summary.cycles as f64 * 100.0
        } else {
            0.0
        };
        writeln!(
            out,
            "Cycles:   {} run, {} failed ({:.2}%), {} without reply bytes",
            summary.cycles, summary.errors, error_pct, summary.empty_replies
        )?;
        writeln!(out, "Duration: {:.2}s", summary.elapsed.as_secs_f64())?;
        writeln!(out)?;

        let stats = Statistics::new(&summary.intervals_ms)?;
        if stats.count() == 0 {
            writeln!(out, "{}", "No intervals recorded.".red())?;
            return Ok(());
        }

        writeln!(out, "Send-to-receive intervals:")?;
        writeln!(out, "  Mean:  {}", Self::colorize_ms(stats.mean_ms()))?;
        writeln!(out, "  Min:   {}", Self::colorize_ms(stats.min_ms()))?;
        writeln!(out, "  Max:   {}", Self::colorize_ms(stats.max_ms()))?;
        writeln!(out, "  P50:   {}", Self::colorize_ms(stats.percentile_ms(0.5)))?;
        writeln!(out, "  P90:   {}", Self::colorize_ms(stats.percentile_ms(0.9)))?;
        writeln!(out, "  P99:   {}", Self::colorize_ms(stats.percentile_ms(0.99)))?;

        if stats.clamped_count() > 0 {
            writeln!(out)?;
            writeln!(
                out,
                "  ⚠ Note: {} interval(s) fell outside histogram bounds and were clamped",
                stats.clamped_count()
            )?;
        }

        Ok(())
    }
}
