use crate::diagnosis::problem::DiagnosedProblem;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Outcome of diagnosing a frame that did not decode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReport {
    /// Triggered problems, most confident first
    pub problems: Vec<DiagnosedProblem>,
    /// First problem, or the undetermined sentinel
    pub primary: DiagnosedProblem,
    /// Recoverability estimate in `[0, 100]`
    pub overall_score: f64,
    /// Whether retaking the picture can plausibly help
    pub is_fixable: bool,
    /// One-line summary
    pub summary: String,
    /// Raw metrics by name; empty for an empty frame
    pub metrics: BTreeMap<String, f64>,
}

impl FailureReport {
    /// Number of triggered problems
    pub fn problem_count(&self) -> usize {
        self.problems.len()
    }

    /// Multi-line human-readable rendering
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.summary);
        let _ = writeln!(out, "Overall score: {:.1}", self.overall_score);
        let _ = writeln!(out, "Fixable: {}", if self.is_fixable { "yes" } else { "no" });

        if !self.metrics.is_empty() {
            let _ = writeln!(out, "Metrics:");
            for (name, value) in &self.metrics {
                let _ = writeln!(out, "  {}: {:.2}", name, value);
            }
        }

        for (i, p) in self.problems.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. [{}] {} ({:.1}%)",
                i + 1,
                p.kind,
                p.description,
                p.confidence
            );
            let _ = writeln!(out, "   cause: {}", p.cause);
            let _ = writeln!(out, "   fix: {}", p.recommendation);
        }
        out
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
