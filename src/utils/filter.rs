/// Floating-point image plane and the linear filters built on it
///
/// Borders are handled by clamping coordinates (replicate).
use crate::models::{BitMatrix, Rect};
use image::GrayImage;

/// Single-channel f32 image
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

/// Gradient direction for [`sobel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// d/dx, responds to vertical edges
    Horizontal,
    /// d/dy, responds to horizontal edges
    Vertical,
}

impl Plane {
    /// Wrap existing samples; `data.len()` must equal `width * height`
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Luma image as floats
    pub fn from_gray(image: &GrayImage) -> Self {
        let data = image.as_raw().iter().map(|&v| v as f32).collect();
        Self::from_vec(image.width() as usize, image.height() as usize, data)
    }

    /// Mask cells under `rect` as 255 (ink) / 0 (background)
    pub fn from_mask(mask: &BitMatrix, rect: &Rect) -> Self {
        let (x0, y0) = (rect.x as usize, rect.y as usize);
        let (w, h) = (rect.width as usize, rect.height as usize);
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(if mask.get(x0 + x, y0 + y) { 255.0 } else { 0.0 });
            }
        }
        Self::from_vec(w, h, data)
    }

    /// Plane width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Plane height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples in row-major order
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    /// Sample with replicated borders
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> f32 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.data[cy * self.width + cx]
    }

    /// Copy of the `w` x `h` window at (`x`, `y`); the window must lie inside
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> Plane {
        let mut data = Vec::with_capacity(w * h);
        for row in y..y + h {
            let start = row * self.width + x;
            data.extend_from_slice(&self.data[start..start + w]);
        }
        Plane::from_vec(w, h, data)
    }

    /// Population mean and standard deviation of all samples
    pub fn mean_stddev(&self) -> (f64, f64) {
        mean_stddev(self.data.iter().map(|&v| v as f64))
    }

    /// Round and saturate back to a luma image
    pub fn to_gray(&self) -> GrayImage {
        let pixels = self
            .data
            .iter()
            .map(|&v| v.round().clamp(0.0, 255.0) as u8)
            .collect();
        GrayImage::from_raw(self.width as u32, self.height as u32, pixels)
            .unwrap_or_else(|| GrayImage::new(self.width as u32, self.height as u32))
    }
}

/// Population mean and standard deviation; (0, 0) for an empty sequence
pub fn mean_stddev(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut n = 0usize;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for v in values {
        n += 1;
        sum += v;
        sum_sq += v * v;
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = sum / n as f64;
    let variance = (sum_sq / n as f64 - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

/// Normalized 1D Gaussian kernel.
///
/// A non-positive `sigma` is derived from the size as
/// `0.3 * ((ksize - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f32> {
    let ksize = ksize.max(1) | 1;
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let half = (ksize / 2) as f64;
    let weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let d = i as f64 - half;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / total) as f32).collect()
}

/// Separable convolution with the same kernel along both axes
pub fn convolve_separable(plane: &Plane, kernel: &[f32]) -> Plane {
    let (w, h) = (plane.width, plane.height);
    if w == 0 || h == 0 {
        return plane.clone();
    }
    let half = (kernel.len() / 2) as isize;

    let mut rows = vec![0.0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                acc += weight * plane.get_clamped(x as isize + k as isize - half, y as isize);
            }
            rows[y * w + x] = acc;
        }
    }
    let rows = Plane::from_vec(w, h, rows);

    let mut out = vec![0.0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                acc += weight * rows.get_clamped(x as isize, y as isize + k as isize - half);
            }
            out[y * w + x] = acc;
        }
    }
    Plane::from_vec(w, h, out)
}

/// Gaussian blur with a `ksize` x `ksize` kernel
pub fn gaussian_blur(plane: &Plane, ksize: usize, sigma: f64) -> Plane {
    convolve_separable(plane, &gaussian_kernel(ksize, sigma))
}

/// 3x3 Sobel derivative
pub fn sobel(plane: &Plane, axis: Axis) -> Plane {
    let (w, h) = (plane.width, plane.height);
    let mut out = vec![0.0f32; w * h];
    for y in 0..h as isize {
        for x in 0..w as isize {
            let p = |dx: isize, dy: isize| plane.get_clamped(x + dx, y + dy);
            let g = match axis {
                Axis::Horizontal => {
                    (p(1, -1) + 2.0 * p(1, 0) + p(1, 1)) - (p(-1, -1) + 2.0 * p(-1, 0) + p(-1, 1))
                }
                Axis::Vertical => {
                    (p(-1, 1) + 2.0 * p(0, 1) + p(1, 1)) - (p(-1, -1) + 2.0 * p(0, -1) + p(1, -1))
                }
            };
            out[y as usize * w + x as usize] = g;
        }
    }
    Plane::from_vec(w, h, out)
}

/// 4-neighbour Laplacian
pub fn laplacian(plane: &Plane) -> Plane {
    let (w, h) = (plane.width, plane.height);
    let mut out = vec![0.0f32; w * h];
    for y in 0..h as isize {
        for x in 0..w as isize {
            let p = |dx: isize, dy: isize| plane.get_clamped(x + dx, y + dy);
            out[y as usize * w + x as usize] =
                p(-1, 0) + p(1, 0) + p(0, -1) + p(0, 1) - 4.0 * p(0, 0);
        }
    }
    Plane::from_vec(w, h, out)
}
