/// Image-quality measurements on a luma image
use crate::utils::filter::{Plane, gaussian_blur, laplacian, mean_stddev};
use image::GrayImage;

/// Side of the Gaussian kernel the noise estimate compares against
const NOISE_KERNEL: usize = 5;

/// Raw quality metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMetrics {
    /// Mean intensity
    pub brightness: f64,
    /// Intensity standard deviation
    pub contrast: f64,
    /// Standard deviation of the Laplacian response
    pub sharpness: f64,
    /// Mean absolute difference from a 5x5 Gaussian blur
    pub noise: f64,
}

impl QualityMetrics {
    /// Measure `gray`
    pub fn measure(gray: &GrayImage) -> Self {
        let plane = Plane::from_gray(gray);
        let (brightness, contrast) = plane.mean_stddev();
        let (_, sharpness) = laplacian(&plane).mean_stddev();
        Self {
            brightness,
            contrast,
            sharpness,
            noise: noise_level(&plane),
        }
    }
}

/// Mean |img - blur(img)|, with the blur rounded back to 8-bit first
fn noise_level(plane: &Plane) -> f64 {
    let blurred = gaussian_blur(plane, NOISE_KERNEL, 0.0);
    let diffs = plane
        .samples()
        .iter()
        .zip(blurred.samples())
        .map(|(&v, &b)| (v - b.round().clamp(0.0, 255.0)).abs() as f64);
    mean_stddev(diffs).0
}
