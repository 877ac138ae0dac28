//! Pixel-level primitives the detection policy is built on
//!
//! - Luma conversion and resampling
//! - Thresholding (Otsu, Gaussian-adaptive, gradient magnitude)
//! - Linear filters (Gaussian, Sobel, Laplacian) on f32 planes
//! - Binary morphology
//! - Contrast and sharpness enhancement

/// Otsu, adaptive and gradient thresholds
pub mod binarization;
/// CLAHE and unsharp masking
pub mod enhance;
/// f32 planes and linear filters
pub mod filter;
/// Luma conversion and resizing
pub mod grayscale;
/// Binary dilate, erode, open and close
pub mod morphology;
