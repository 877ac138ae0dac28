//! Post-failure diagnosis
//!
//! When every decode strategy fails, [`FailureDiagnoser`] measures the full
//! frame and ranks the likely reasons:
//!
//! | metric | trigger | confidence |
//! |---|---|---|
//! | brightness | < 30 | (30 - b) / 30 * 100 |
//! | contrast | < 15 | (15 - c) / 15 * 100 |
//! | sharpness | < 10 | (10 - s) / 10 * 100 |
//! | noise | > 15 | n / 30 * 100 |
//!
//! Equal confidences are ordered lighting, contrast, blur, noise.

/// Quality metrics
pub mod metrics;
/// Problem kinds and records
pub mod problem;
/// Report type and rendering
pub mod report;

pub use metrics::QualityMetrics;
pub use problem::{DiagnosedProblem, ProblemKind};
pub use report::FailureReport;

use crate::models::Frame;
use std::collections::BTreeMap;
use tracing::debug;

const DARK_LEVEL: f64 = 30.0;
const LOW_CONTRAST_LEVEL: f64 = 15.0;
const BLUR_LEVEL: f64 = 10.0;
const NOISE_LEVEL: f64 = 15.0;
const NOISE_FULL_SCALE: f64 = 30.0;
const SCORE_PENALTY: f64 = 0.3;
const UNDETERMINED_SCORE: f64 = 50.0;

/// Explains why a frame did not decode
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureDiagnoser;

impl FailureDiagnoser {
    /// Diagnose a full-resolution frame
    pub fn diagnose(frame: &Frame<'_>) -> FailureReport {
        if frame.is_empty() {
            let problem = DiagnosedProblem::no_image();
            return FailureReport {
                problems: vec![problem.clone()],
                primary: problem,
                overall_score: 0.0,
                is_fixable: true,
                summary: "No image to analyse".to_string(),
                metrics: BTreeMap::new(),
            };
        }

        let metrics = QualityMetrics::measure(&frame.to_luma());
        debug!(?metrics, "failure metrics");
        Self::from_metrics(&metrics)
    }

    /// Rank the problems implied by already measured metrics
    pub fn from_metrics(metrics: &QualityMetrics) -> FailureReport {
        let mut problems = Vec::new();

        if metrics.brightness < DARK_LEVEL {
            problems.push(DiagnosedProblem::new(
                ProblemKind::Lighting,
                "Image is too dark",
                "Insufficient lighting",
                "Increase brightness or camera exposure",
                (DARK_LEVEL - metrics.brightness) / DARK_LEVEL * 100.0,
            ));
        }
        if metrics.contrast < LOW_CONTRAST_LEVEL {
            problems.push(DiagnosedProblem::new(
                ProblemKind::LowContrast,
                "Low contrast",
                "Bar edges are hard to tell apart",
                "Increase contrast",
                (LOW_CONTRAST_LEVEL - metrics.contrast) / LOW_CONTRAST_LEVEL * 100.0,
            ));
        }
        if metrics.sharpness < BLUR_LEVEL {
            problems.push(DiagnosedProblem::new(
                ProblemKind::Blur,
                "Image is blurred",
                "Camera out of focus or moving during capture",
                "Adjust focus or steady the camera",
                (BLUR_LEVEL - metrics.sharpness) / BLUR_LEVEL * 100.0,
            ));
        }
        if metrics.noise > NOISE_LEVEL {
            problems.push(DiagnosedProblem::new(
                ProblemKind::Noise,
                "High noise level",
                "High ISO or poor capture conditions",
                "Lower the ISO or filter the image",
                metrics.noise / NOISE_FULL_SCALE * 100.0,
            ));
        }

        problems.sort_by(DiagnosedProblem::rank);

        let metric_map: BTreeMap<String, f64> = [
            ("brightness", metrics.brightness),
            ("contrast", metrics.contrast),
            ("sharpness", metrics.sharpness),
            ("noise", metrics.noise),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let Some(primary) = problems.first().cloned() else {
            return FailureReport {
                problems,
                primary: DiagnosedProblem::undetermined(),
                overall_score: UNDETERMINED_SCORE,
                is_fixable: false,
                summary: "No problems detected, but decoding failed".to_string(),
                metrics: metric_map,
            };
        };

        let penalty: f64 = problems.iter().map(|p| p.confidence * SCORE_PENALTY).sum();
        FailureReport {
            summary: format!(
                "{} problem(s) detected; primary: {}",
                problems.len(),
                primary.description
            ),
            is_fixable: primary.kind != ProblemKind::DamagedBarcode,
            overall_score: (100.0 - penalty).max(0.0),
            primary,
            problems,
            metrics: metric_map,
        }
    }
}
