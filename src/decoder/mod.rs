//! Decoding policy
//!
//! This module drives the external decode engine over a frame:
//! - Engine and structured-detector traits
//! - Per-region variants and pre-decode normalization
//! - The ordered decode cascade
//! - Parsing of raw engine strings

/// Ordered decode strategies
pub mod cascade;
/// Raw engine string parsing
pub mod classifier;
/// External engine traits
pub mod engine;
/// Region variants and size normalization
pub mod variants;

pub use cascade::{
    CascadeContext, CascadeOutcome, DecodeCascade, DecodeStrategy, Detection, Stage, StageResult,
};
pub use classifier::ResultClassifier;
pub use engine::{NoStructuredDetector, RawDecode, StructuredDetector, SymbolDecoder};
pub use variants::Variant;
