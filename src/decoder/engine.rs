//! Seams to the external symbol engines
//!
//! The crate never decodes bars itself: a [`SymbolDecoder`] turns a luma crop
//! into a raw `(kind, payload)` pair and a [`StructuredDetector`] locates
//! well-formed symbols as quadrilaterals. Both are plain closures in tests.

use crate::models::{Frame, Quad};

/// Raw decode-engine output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDecode {
    /// Symbology name as the engine spells it
    pub kind: String,
    /// Decoded content
    pub payload: String,
}

impl RawDecode {
    /// Create a raw result
    pub fn new(kind: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }

    /// Render as `"<kind>: <payload>"`, the form the classifier parses
    pub fn to_raw_string(&self) -> String {
        format!("{}: {}", self.kind, self.payload)
    }
}

/// Decodes one symbol from a single-channel pixel buffer.
///
/// `None` means nothing was found; it is never an error.
pub trait SymbolDecoder: Send + Sync {
    /// Decode a row-major luma buffer of `width * height` bytes
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<RawDecode>;
}

impl<F> SymbolDecoder for F
where
    F: Fn(&[u8], u32, u32) -> Option<RawDecode> + Send + Sync,
{
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<RawDecode> {
        self(pixels, width, height)
    }
}

/// Locates well-formed symbols in a full frame
pub trait StructuredDetector: Send + Sync {
    /// Corner sets of every symbol found
    fn detect(&self, frame: &Frame<'_>) -> Vec<Quad>;
}

impl<F> StructuredDetector for F
where
    F: Fn(&Frame<'_>) -> Vec<Quad> + Send + Sync,
{
    fn detect(&self, frame: &Frame<'_>) -> Vec<Quad> {
        self(frame)
    }
}

/// Detector that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStructuredDetector;

impl StructuredDetector for NoStructuredDetector {
    fn detect(&self, _frame: &Frame<'_>) -> Vec<Quad> {
        Vec::new()
    }
}
