/// Luma conversion and resampling helpers
///
/// Y = 0.299*R + 0.587*G + 0.114*B in 14-bit fixed point with rounding.
/// The weights sum to 1 << 14, so gray pixels map to themselves.
use image::GrayImage;
use image::imageops::{self, FilterType};

/// Y = (4899*R + 9617*G + 1868*B + 8192) >> 14
const COEF_R: u32 = 4899;
const COEF_G: u32 = 9617;
const COEF_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;
const LUMA_ROUND: u32 = 1 << (LUMA_SHIFT - 1);

/// Convert interleaved RGB bytes to luma
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = Vec::with_capacity(pixel_count);

    // Process 8 pixels at a time
    let mut chunks = rgb[..pixel_count * 3].chunks_exact(24);
    for chunk in &mut chunks {
        for px in chunk.chunks_exact(3) {
            gray.push(luma(px[0], px[1], px[2]));
        }
    }
    for px in chunks.remainder().chunks_exact(3) {
        gray.push(luma(px[0], px[1], px[2]));
    }

    gray
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32;
    let lum = (weighted + LUMA_ROUND) >> LUMA_SHIFT;
    lum.min(255) as u8
}

/// Resample to an exact size with a triangle filter (used for downscaling)
pub fn resize_to(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// Upscale by `factor` with bicubic (Catmull-Rom) interpolation
pub fn upscale(image: &GrayImage, factor: f64) -> GrayImage {
    let width = ((image.width() as f64 * factor).round() as u32).max(1);
    let height = ((image.height() as f64 * factor).round() as u32).max(1);
    imageops::resize(image, width, height, FilterType::CatmullRom)
}
