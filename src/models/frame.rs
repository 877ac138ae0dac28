use crate::error::{Result, ScanError};
use crate::utils::grayscale::rgb_to_grayscale;
use image::GrayImage;

/// Immutable view of a caller-owned pixel grid.
///
/// Pixels are row-major; `channels` is 1 (luma) or 3 (RGB). The pipeline only
/// borrows the buffer for the duration of a call.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    channels: u8,
}

impl<'a> Frame<'a> {
    /// Create a frame view, validating the channel count and buffer length.
    ///
    /// Zero-sized frames are accepted here; [`crate::Scanner::scan`] rejects them.
    pub fn new(data: &'a [u8], width: u32, height: u32, channels: u8) -> Result<Self> {
        if channels != 1 && channels != 3 {
            return Err(ScanError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ScanError::FrameSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Single-channel frame
    pub fn luma(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        Self::new(data, width, height, 1)
    }

    /// Interleaved RGB frame
    pub fn rgb(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        Self::new(data, width, height, 3)
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel count (1 or 3)
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Raw pixel bytes
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// True when there is nothing to scan
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Convert to an owned luma image (copies single-channel frames as-is).
    pub fn to_luma(&self) -> GrayImage {
        let pixels = if self.channels == 1 {
            self.data.to_vec()
        } else {
            rgb_to_grayscale(self.data, self.width as usize, self.height as usize)
        };
        GrayImage::from_raw(self.width, self.height, pixels)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }
}

/// Owned pixel buffer, typically produced by a frame source such as
/// [`crate::tools::load_frame`].
#[derive(Debug, Clone)]
pub struct FrameBuf {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl FrameBuf {
    /// Take ownership of a pixel buffer after validating its geometry
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self> {
        Frame::new(&data, width, height, channels)?;
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Owned copy of a luma image
    pub fn from_luma(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            width,
            height,
            channels: 1,
        }
    }

    /// Borrow as a [`Frame`]
    pub fn as_frame(&self) -> Frame<'_> {
        Frame {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }
}
