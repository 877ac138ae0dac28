//! barscan - barcode region proposal and cascading decode
//!
//! Finds 1D and 2D codes in photographs, including codes on curved or
//! crumpled surfaces, and explains failures when nothing decodes.
//!
//! The crate does not decode bars itself. Callers plug in a
//! [`SymbolDecoder`] (and optionally a [`StructuredDetector`]); barscan
//! decides *where* and *how* to ask it:
//!
//! 1. structured detector quads
//! 2. candidate regions from four binarizations, each tried raw, upscaled,
//!    locally equalized and sharpened
//! 3. the whole frame
//!
//! When every strategy fails, a [`FailureReport`] ranks the likely causes.
//!
//! ```no_run
//! use barscan::{Frame, RawDecode, ScanOutcome, Scanner};
//!
//! let pixels = vec![255u8; 640 * 480];
//! let frame = Frame::luma(&pixels, 640, 480)?;
//! let scanner = Scanner::new(|_: &[u8], _: u32, _: u32| -> Option<RawDecode> { None });
//! match scanner.scan(&frame)? {
//!     ScanOutcome::Decoded(d) => println!("{}: {}", d.symbol.kind, d.symbol.payload),
//!     ScanOutcome::NotDecoded(report) => println!("{}", report.summary),
//! }
//! # Ok::<(), barscan::ScanError>(())
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Runtime settings
pub mod config;
/// Decode strategies, engine traits and result parsing
pub mod decoder;
/// Candidate-region detection
pub mod detector;
/// Post-failure diagnosis
pub mod diagnosis;
/// Error types
pub mod error;
/// Country/manufacturer/product lookup
pub mod lookup;
/// Core data structures (Frame, Rect, BitMatrix, DecodedSymbol, ...)
pub mod models;
/// The top-level scanner
pub mod pipeline;
/// Single-flight guard
pub mod slot;
/// Frame loading and dataset helpers
pub mod tools;
/// Pixel primitives (grayscale, thresholds, filters, morphology)
pub mod utils;

pub use config::ScanConfig;
pub use decoder::{
    CascadeOutcome, DecodeCascade, DecodeStrategy, Detection, NoStructuredDetector, RawDecode,
    ResultClassifier, Stage, StructuredDetector, SymbolDecoder, Variant,
};
pub use detector::{BinarizationBank, RegionProposer, deduplicate};
pub use diagnosis::{DiagnosedProblem, FailureDiagnoser, FailureReport, ProblemKind};
pub use error::{Result, ScanError};
pub use lookup::{LookupService, ProductRecord, Resolution};
pub use models::{
    BitMatrix, CandidateRegion, DecodedSymbol, Frame, FrameBuf, Point, Quad, Rect, SymbolKind,
};
pub use pipeline::{ScanOutcome, Scanner, scan};
pub use slot::{ScanGuard, ScanSlot};
