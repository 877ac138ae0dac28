//! Core data structures shared by every pipeline stage

/// Borrowed and owned pixel frames
pub mod frame;
/// Packed binary masks
pub mod matrix;
/// Points and detector quadrilaterals
pub mod point;
/// Boxes and candidate regions
pub mod rect;
/// Decoded symbol records
pub mod symbol;

pub use frame::{Frame, FrameBuf};
pub use matrix::BitMatrix;
pub use point::{Point, Quad};
pub use rect::{CandidateRegion, Rect};
pub use symbol::{DecodedSymbol, SymbolKind};
