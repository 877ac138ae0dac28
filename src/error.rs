use thiserror::Error;

/// Errors reported by the scanning pipeline and its I/O helpers.
///
/// "No barcode found" is never an error: it is reported through
/// [`crate::ScanOutcome::NotDecoded`].
#[derive(Error, Debug)]
pub enum ScanError {
    /// The frame has a zero dimension or no pixel data
    #[error("frame is empty ({width}x{height})")]
    EmptyFrame {
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
    },

    /// Pixel buffer length does not match `width * height * channels`
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    FrameSize {
        /// Bytes required by the declared geometry
        expected: usize,
        /// Bytes actually provided
        actual: usize,
    },

    /// Only luma (1) and RGB (3) frames are accepted
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u8),

    /// Failed to load an image from disk
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    /// Failed to read a lookup table or dataset entry
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to render a report as JSON
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lookup table line could not be parsed
    #[error("{path}:{line}: malformed lookup entry")]
    LookupFormat {
        /// Table file path
        path: String,
        /// 1-based line number
        line: usize,
    },
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ScanError>;
