//! Thresholding primitives. Every function returns a [`BitMatrix`] where
//! `true` = ink (dark or edge) and `false` = background.

use crate::models::BitMatrix;
use crate::utils::filter::{Axis, Plane, gaussian_blur, sobel};
use image::GrayImage;

/// Convert grayscale image to binary using Otsu's thresholding method
pub fn otsu_binarize(gray: &GrayImage) -> BitMatrix {
    let threshold = calculate_otsu_threshold(gray.as_raw());
    threshold_binarize(gray, threshold)
}

/// Calculate Otsu's optimal threshold.
///
/// Pixels strictly below the returned level are the dark class. A histogram
/// with a single populated bin has no separating level and yields 128.
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    // Build histogram
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0.0f64;

    // Level `threshold` splits intensities into [0, threshold) and [threshold, 255]
    for threshold in 1..=255usize {
        class1_pixels += histogram[threshold - 1];
        class1_sum += (threshold - 1) as f64 * histogram[threshold - 1] as f64;
        let class2_pixels = gray.len() as u64 - class1_pixels;

        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum / class1_pixels as f64;
        let class2_mean = (total_sum - class1_sum) / class2_pixels as f64;

        let weight1 = class1_pixels as f64 / total_pixels;
        let weight2 = class2_pixels as f64 / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization: ink where `value < threshold`
pub fn threshold_binarize(gray: &GrayImage, threshold: u8) -> BitMatrix {
    let width = gray.width() as usize;
    let raw = gray.as_raw();
    BitMatrix::from_fn(width, gray.height() as usize, |x, y| {
        raw[y * width + x] < threshold
    })
}

/// Gaussian-weighted adaptive threshold.
///
/// A pixel is ink when it is at least `offset` darker than the Gaussian-weighted
/// mean of its `block` x `block` neighbourhood.
pub fn adaptive_binarize(gray: &GrayImage, block: usize, offset: f32) -> BitMatrix {
    let plane = Plane::from_gray(gray);
    let local_mean = gaussian_blur(&plane, block, 0.0);
    let width = plane.width();
    let values = plane.samples();
    let means = local_mean.samples();
    BitMatrix::from_fn(width, plane.height(), |x, y| {
        let i = y * width + x;
        values[i] <= means[i] - offset
    })
}

/// Edge mask: `0.5 * |gx| + 0.5 * |gy|` above `level`, with each gradient
/// saturated to 255 first.
pub fn gradient_binarize(gray: &GrayImage, level: f32) -> BitMatrix {
    let plane = Plane::from_gray(gray);
    let gx = sobel(&plane, Axis::Horizontal);
    let gy = sobel(&plane, Axis::Vertical);
    let width = plane.width();
    let (gx, gy) = (gx.samples(), gy.samples());
    BitMatrix::from_fn(width, plane.height(), |x, y| {
        let i = y * width + x;
        let magnitude = 0.5 * gx[i].abs().min(255.0) + 0.5 * gy[i].abs().min(255.0);
        magnitude.round() > level
    })
}
