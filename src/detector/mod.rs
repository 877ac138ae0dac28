//! Candidate-region detection
//!
//! This module turns one working-resolution luma image into a short list of
//! boxes that may hold a barcode:
//! - Binarization bank (two adaptive thresholds, Otsu, gradient magnitude)
//! - External contour extraction with polygon area
//! - Geometric and stripe-texture filtering, box expansion
//! - Cross-mask deduplication

/// Fixed set of binarizations
pub mod bank;
/// External contours and their polygon area
pub mod contour;
/// Greedy overlap deduplication
pub mod dedup;
/// Per-mask region proposal
pub mod proposer;
/// Stripe-texture classifier
pub mod texture;

pub use bank::{Binarization, BinarizationBank};
pub use dedup::deduplicate;
pub use proposer::RegionProposer;
