use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Root-cause category of a failed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProblemKind {
    /// No pixels to analyse
    NoImage,
    /// Too dark
    Lighting,
    /// Flat intensity distribution
    LowContrast,
    /// Out of focus or motion blur
    Blur,
    /// Sensor noise
    Noise,
    /// Physically damaged symbol
    DamagedBarcode,
    /// Nothing identified
    Unknown,
}

impl ProblemKind {
    /// Rank used to order problems of equal confidence; lower sorts first
    pub fn priority(&self) -> u8 {
        match self {
            ProblemKind::NoImage => 0,
            ProblemKind::Lighting => 1,
            ProblemKind::LowContrast => 2,
            ProblemKind::Blur => 3,
            ProblemKind::Noise => 4,
            ProblemKind::DamagedBarcode => 5,
            ProblemKind::Unknown => 6,
        }
    }

    /// Short human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ProblemKind::NoImage => "no image",
            ProblemKind::Lighting => "lighting",
            ProblemKind::LowContrast => "low contrast",
            ProblemKind::Blur => "blur",
            ProblemKind::Noise => "noise",
            ProblemKind::DamagedBarcode => "damaged barcode",
            ProblemKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One suspected cause with its confidence in `[0, 100]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosedProblem {
    /// Category
    pub kind: ProblemKind,
    /// What is wrong with the image
    pub description: String,
    /// Likely cause
    pub cause: String,
    /// What the user can do about it
    pub recommendation: String,
    /// Confidence, clamped to `[0, 100]`
    pub confidence: f64,
}

impl DiagnosedProblem {
    /// Create a problem; `confidence` is clamped to `[0, 100]`
    pub fn new(
        kind: ProblemKind,
        description: impl Into<String>,
        cause: impl Into<String>,
        recommendation: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            cause: cause.into(),
            recommendation: recommendation.into(),
            confidence: confidence.clamp(0.0, 100.0),
        }
    }

    /// The empty image short-circuit
    pub fn no_image() -> Self {
        Self::new(
            ProblemKind::NoImage,
            "Empty image",
            "No image was loaded or the camera delivered no data",
            "Check the image source or restart the camera",
            100.0,
        )
    }

    /// Sentinel used when no metric crossed its threshold
    pub fn undetermined() -> Self {
        Self::new(
            ProblemKind::Unknown,
            "Cause of the failure could not be determined",
            "Unknown",
            "Try a different angle or lighting",
            0.0,
        )
    }

    /// Descending confidence, then ascending kind priority
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .confidence
            .total_cmp(&self.confidence)
            .then_with(|| self.kind.priority().cmp(&other.kind.priority()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped() {
        let p = DiagnosedProblem::new(ProblemKind::Noise, "", "", "", 180.0);
        assert_eq!(p.confidence, 100.0);
        let p = DiagnosedProblem::new(ProblemKind::Noise, "", "", "", -3.0);
        assert_eq!(p.confidence, 0.0);
    }

    #[test]
    fn test_rank_ties_by_priority() {
        let blur = DiagnosedProblem::new(ProblemKind::Blur, "", "", "", 100.0);
        let contrast = DiagnosedProblem::new(ProblemKind::LowContrast, "", "", "", 100.0);
        let lighting = DiagnosedProblem::new(ProblemKind::Lighting, "", "", "", 40.0);
        let mut problems = vec![lighting.clone(), blur.clone(), contrast.clone()];
        problems.sort_by(DiagnosedProblem::rank);
        let kinds: Vec<_> = problems.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ProblemKind::LowContrast, ProblemKind::Blur, ProblemKind::Lighting]);
    }
}
