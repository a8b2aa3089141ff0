//! Colored scenario result output.
//!
//! One line per scenario with a color-coded status tag:
//!   [OK]      scenario matched its expected outcome (green)
//!   [FAIL]    scenario disagreed with the memory model's verdict (red)
//!   [UNKNOWN] the solver gave up (yellow)
use colored::Colorize;

/// How one scenario run turned out, relative to its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Verdict matched the expected outcome.
    Ok,
    /// Verdict contradicted the expected outcome.
    Mismatch,
    /// Solver gave up; no verdict.
    Unknown,
}

/// Result of one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub id: String,
    pub status: ScenarioStatus,
    /// `verified` / `counterexample` / `solver gave up (...)`.
    pub verdict_line: String,
    /// Rendered witness for counterexamples.
    pub witness: Option<String>,
}

/// Print one scenario result line (plus witness, when there is one).
pub fn print_result(result: &ScenarioResult) {
    let tag = match result.status {
        ScenarioStatus::Ok => "[OK]     ".green().bold(),
        ScenarioStatus::Mismatch => "[FAIL]   ".red().bold(),
        ScenarioStatus::Unknown => "[UNKNOWN]".yellow().bold(),
    };
    println!("  {}  {}: {}", tag, result.id, result.verdict_line);
    if let Some(witness) = &result.witness {
        for line in witness.lines() {
            println!("      {line}");
        }
    }
}

/// Print the summary line and return the process exit code:
/// 0 all matched, 1 any mismatch, 2 any unknown.
pub fn print_summary(results: &[ScenarioResult]) -> u8 {
    let ok = results
        .iter()
        .filter(|r| r.status == ScenarioStatus::Ok)
        .count();
    let mismatch = results
        .iter()
        .filter(|r| r.status == ScenarioStatus::Mismatch)
        .count();
    let unknown = results
        .iter()
        .filter(|r| r.status == ScenarioStatus::Unknown)
        .count();

    let mut parts = Vec::new();
    if ok > 0 {
        parts.push(format!("{} {}", ok, "matched".green()));
    }
    if mismatch > 0 {
        parts.push(format!("{} {}", mismatch, "mismatched".red()));
    }
    if unknown > 0 {
        parts.push(format!("{} {}", unknown, "unknown".yellow()));
    }
    println!();
    println!("Summary: {}", parts.join(", "));

    if unknown > 0 {
        2
    } else if mismatch > 0 {
        1
    } else {
        0
    }
}
