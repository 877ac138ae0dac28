use crate::config::ScanConfig;
use crate::decoder::cascade::{
    CascadeContext, CascadeOutcome, DecodeCascade, Detection, full_resolution_regions,
};
use crate::decoder::engine::{NoStructuredDetector, StructuredDetector, SymbolDecoder};
use crate::detector::RegionProposer;
use crate::diagnosis::{FailureDiagnoser, FailureReport};
use crate::error::{Result, ScanError};
use crate::models::{CandidateRegion, Frame};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Result of scanning one valid frame
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// A symbol was decoded
    Decoded(Detection),
    /// Every strategy failed; the report explains why
    NotDecoded(FailureReport),
}

impl ScanOutcome {
    /// The detection, if the scan succeeded
    pub fn detection(&self) -> Option<&Detection> {
        match self {
            ScanOutcome::Decoded(d) => Some(d),
            ScanOutcome::NotDecoded(_) => None,
        }
    }

    /// The failure report, if the scan failed
    pub fn report(&self) -> Option<&FailureReport> {
        match self {
            ScanOutcome::Decoded(_) => None,
            ScanOutcome::NotDecoded(r) => Some(r),
        }
    }
}

/// Full scanning pipeline: decode cascade, then diagnosis on failure.
///
/// A `Scanner` holds no per-scan state and can be shared between threads.
pub struct Scanner {
    decoder: Arc<dyn SymbolDecoder>,
    detector: Arc<dyn StructuredDetector>,
    config: ScanConfig,
    cascade: DecodeCascade,
}

impl Scanner {
    /// Scanner over `decoder` with no structured detector and default settings
    pub fn new(decoder: impl SymbolDecoder + 'static) -> Self {
        let detector: Arc<dyn StructuredDetector> = Arc::new(NoStructuredDetector);
        let config = ScanConfig::default();
        Self {
            decoder: Arc::new(decoder),
            cascade: DecodeCascade::standard(Arc::clone(&detector), &config),
            detector,
            config,
        }
    }

    /// Use `detector` for the structured pass
    pub fn with_structured_detector(mut self, detector: impl StructuredDetector + 'static) -> Self {
        self.detector = Arc::new(detector);
        self.rebuild();
        self
    }

    /// Replace the settings
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self.rebuild();
        self
    }

    /// Replace the strategy list
    pub fn with_cascade(mut self, cascade: DecodeCascade) -> Self {
        self.cascade = cascade;
        self
    }

    /// Current settings
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn rebuild(&mut self) {
        self.cascade = DecodeCascade::standard(Arc::clone(&self.detector), &self.config);
    }

    /// Scan one frame.
    ///
    /// An empty frame is an error; a frame without a readable symbol is an
    /// `Ok(ScanOutcome::NotDecoded)` carrying the diagnosis.
    pub fn scan(&self, frame: &Frame<'_>) -> Result<ScanOutcome> {
        if frame.is_empty() {
            return Err(ScanError::EmptyFrame {
                width: frame.width(),
                height: frame.height(),
            });
        }

        let luma = frame.to_luma();
        let ctx = CascadeContext {
            frame: *frame,
            luma: &luma,
            decoder: self.decoder.as_ref(),
            config: &self.config,
        };

        match self.cascade.run(&ctx) {
            CascadeOutcome::Success(detection) => Ok(ScanOutcome::Decoded(detection)),
            CascadeOutcome::Failure => {
                debug!(width = frame.width(), height = frame.height(), "cascade exhausted");
                Ok(ScanOutcome::NotDecoded(FailureDiagnoser::diagnose(frame)))
            }
        }
    }

    /// Scan independent frames on the rayon pool; results keep input order
    pub fn scan_batch(&self, frames: &[Frame<'_>]) -> Vec<Result<ScanOutcome>> {
        frames.par_iter().map(|frame| self.scan(frame)).collect()
    }

    /// Deduplicated candidate regions of a frame in full-resolution coordinates
    pub fn propose_regions(&self, frame: &Frame<'_>) -> Result<Vec<CandidateRegion>> {
        if frame.is_empty() {
            return Err(ScanError::EmptyFrame {
                width: frame.width(),
                height: frame.height(),
            });
        }
        Ok(full_resolution_regions(
            &RegionProposer::new(),
            &frame.to_luma(),
            &self.config,
        ))
    }
}

/// Scan a frame with default settings and no structured detector
pub fn scan(frame: &Frame<'_>, decoder: impl SymbolDecoder + 'static) -> Result<ScanOutcome> {
    Scanner::new(decoder).scan(frame)
}
