/// Luma enhancement used by the per-region decode variants
use crate::utils::filter::{Plane, gaussian_blur};
use image::GrayImage;

/// Gaussian sigma of the blur subtracted by [`unsharp_mask`]
const UNSHARP_SIGMA: f64 = 1.0;

const HIST_BINS: usize = 256;

/// Contrast-limited adaptive histogram equalization over a `grid` x `grid`
/// tile layout.
///
/// Each tile gets its own clipped-histogram lookup table; `clip_limit` is in
/// multiples of the mean bin height. Images whose sides do not divide evenly
/// are reflect-padded for the histograms only. Output pixels blend the four
/// nearest tile tables bilinearly.
pub fn clahe(image: &GrayImage, clip_limit: f64, grid: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || grid == 0 {
        return image.clone();
    }

    let tile_w = width.div_ceil(grid);
    let tile_h = height.div_ceil(grid);
    let tile_area = (tile_w * tile_h) as u64;
    let limit = ((clip_limit * tile_area as f64 / HIST_BINS as f64) as u64).max(1);
    let scale = 255.0 / tile_area as f64;

    let mut luts = Vec::with_capacity((grid * grid) as usize);
    for ty in 0..grid {
        for tx in 0..grid {
            let mut histogram = [0u64; HIST_BINS];
            for y in ty * tile_h..(ty + 1) * tile_h {
                let sy = reflect_101(y, height);
                for x in tx * tile_w..(tx + 1) * tile_w {
                    let sx = reflect_101(x, width);
                    histogram[image.get_pixel(sx, sy)[0] as usize] += 1;
                }
            }
            clip_histogram(&mut histogram, limit);

            let mut lut = [0u8; HIST_BINS];
            let mut cumulative = 0u64;
            for (level, &count) in histogram.iter().enumerate() {
                cumulative += count;
                lut[level] = (cumulative as f64 * scale).round().clamp(0.0, 255.0) as u8;
            }
            luts.push(lut);
        }
    }

    let last = grid as i64 - 1;
    let lut_at = |tx: i64, ty: i64, v: usize| -> f64 {
        luts[(ty.clamp(0, last) * grid as i64 + tx.clamp(0, last)) as usize][v] as f64
    };

    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let v = pixel[0] as usize;
        let fx = x as f64 / tile_w as f64 - 0.5;
        let fy = y as f64 / tile_h as f64 - 0.5;
        let (tx, ty) = (fx.floor() as i64, fy.floor() as i64);
        let (ax, ay) = (fx - tx as f64, fy - ty as f64);

        let top = lut_at(tx, ty, v) * (1.0 - ax) + lut_at(tx + 1, ty, v) * ax;
        let bottom = lut_at(tx, ty + 1, v) * (1.0 - ax) + lut_at(tx + 1, ty + 1, v) * ax;
        pixel[0] = (top * (1.0 - ay) + bottom * ay).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Cap every bin at `limit` and spread the excess evenly, the remainder one
/// count per bin at a fixed stride from level 0.
fn clip_histogram(histogram: &mut [u64; HIST_BINS], limit: u64) {
    let mut excess = 0u64;
    for count in histogram.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }

    let batch = excess / HIST_BINS as u64;
    let residual = (excess % HIST_BINS as u64) as usize;
    for count in histogram.iter_mut() {
        *count += batch;
    }
    if residual > 0 {
        let step = (HIST_BINS / residual).max(1);
        for level in (0..HIST_BINS).step_by(step).take(residual) {
            histogram[level] += 1;
        }
    }
}

/// Mirror an out-of-range index without repeating the edge sample
fn reflect_101(i: u32, len: u32) -> u32 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let m = i % period;
    if m < len { m } else { period - m }
}

/// Unsharp mask: `(1 + strength) * original - strength * blurred`, saturated
pub fn unsharp_mask(image: &GrayImage, strength: f32) -> GrayImage {
    let original = Plane::from_gray(image);
    let ksize = (2.0 * (3.0 * UNSHARP_SIGMA).ceil() + 1.0) as usize;
    let blurred = gaussian_blur(&original, ksize, UNSHARP_SIGMA);
    let data = original
        .samples()
        .iter()
        .zip(blurred.samples())
        .map(|(&o, &b)| (1.0 + strength) * o - strength * b)
        .collect();
    Plane::from_vec(original.width(), original.height(), data).to_gray()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Dark ramp 0..=63 on the left half, bright ramp 192..=255 on the
    /// right; every 32x32 tile holds each level of its ramp 16 times.
    fn two_lighting_halves() -> GrayImage {
        GrayImage::from_fn(256, 256, |x, y| {
            let level = (x % 32 + 32 * (y % 2)) as u8;
            if x < 128 { Luma([level]) } else { Luma([192 + level]) }
        })
    }

    #[test]
    fn test_clahe_stretches_each_tile_on_its_own() {
        let out = clahe(&two_lighting_halves(), 2.0, 8);
        // inside the dark half every tile shares one table:
        // bins of the ramp clip to 8 and gain 2, the rest hold 2
        // even rows carry the low half of a ramp, odd rows the high half
        for y in [40u32, 120] {
            let row_pair = |xs: std::ops::Range<u32>| {
                let values: Vec<u8> = (y..y + 2)
                    .flat_map(|yy| xs.clone().map(move |x| (x, yy)))
                    .map(|(x, yy)| out.get_pixel(x, yy)[0])
                    .collect();
                (*values.iter().min().unwrap(), *values.iter().max().unwrap())
            };
            assert_eq!(row_pair(32..96), (2, 159));
            assert_eq!(row_pair(160..224), (98, 255));
        }
    }

    #[test]
    fn test_clahe_same_level_maps_by_neighbourhood() {
        // the top of the dark ramp ends up brighter than the bottom of the
        // bright ramp
        let out = clahe(&two_lighting_halves(), 2.0, 8);
        let dark_top = out.get_pixel(63, 41)[0];
        let bright_bottom = out.get_pixel(192, 40)[0];
        assert_eq!(dark_top, 159);
        assert_eq!(bright_bottom, 98);
    }

    #[test]
    fn test_clahe_odd_sizes_and_tiny_crops() {
        let img = GrayImage::from_fn(37, 13, |x, y| Luma([(x * 5 + y) as u8]));
        assert_eq!(clahe(&img, 2.0, 8).dimensions(), (37, 13));
        let one = GrayImage::from_pixel(1, 1, Luma([90]));
        assert_eq!(clahe(&one, 2.0, 8).dimensions(), (1, 1));
        assert_eq!(clahe(&GrayImage::new(0, 0), 2.0, 8).dimensions(), (0, 0));
    }

    #[test]
    fn test_clip_histogram_preserves_total() {
        let mut histogram = [0u64; HIST_BINS];
        histogram[20] = 600;
        histogram[230] = 424;
        clip_histogram(&mut histogram, 8);
        assert_eq!(histogram.iter().sum::<u64>(), 1024);
        assert!(histogram.iter().all(|&c| c <= 8 + 4));
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(4, 5), 4);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(7, 5), 1);
        assert_eq!(reflect_101(3, 1), 0);
    }

    #[test]
    fn test_unsharp_flat_unchanged() {
        let img = GrayImage::from_pixel(9, 9, Luma([120]));
        assert_eq!(unsharp_mask(&img, 2.0), img);
    }

    #[test]
    fn test_unsharp_increases_edge_contrast() {
        let img = GrayImage::from_fn(20, 5, |x, _| if x < 10 { Luma([80]) } else { Luma([160]) });
        let sharp = unsharp_mask(&img, 2.0);
        assert!(sharp.get_pixel(9, 2)[0] < 80);
        assert!(sharp.get_pixel(10, 2)[0] > 160);
        assert_eq!(sharp.get_pixel(0, 2)[0], 80);
    }
}
