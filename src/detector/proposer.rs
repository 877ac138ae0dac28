//! Candidate-region proposal over a bank of ink masks
//!
//! Per mask: close with a wide horizontal kernel so neighbouring bars fuse,
//! open with a narrow vertical kernel to drop thin horizontal noise, trace the
//! external contours, keep those with a barcode-like footprint and a
//! stripe texture in the unmorphed mask, then grow them a little.

use crate::detector::bank::BinarizationBank;
use crate::detector::contour::find_external_contours;
use crate::detector::texture;
use crate::models::{BitMatrix, CandidateRegion, Rect};
use crate::utils::morphology::{Kernel, close, open};
use image::GrayImage;
use tracing::debug;

/// Horizontal closing element
pub const CLOSE_KERNEL: Kernel = Kernel::rect(5, 1);
/// Vertical opening element
pub const OPEN_KERNEL: Kernel = Kernel::rect(1, 3);

const MIN_WIDTH: u32 = 30;
const MIN_HEIGHT: u32 = 10;
const MIN_AREA: u64 = 500;
const MAX_FRAME_FRACTION: f64 = 0.7;
const MIN_ASPECT: f64 = 1.0;
const MAX_ASPECT: f64 = 15.0;
const MIN_FILL: f64 = 0.3;

const EXPAND_X: f64 = 0.2;
const EXPAND_Y: f64 = 0.3;

/// Proposes candidate boxes on a working-resolution luma image
#[derive(Debug, Clone, Default)]
pub struct RegionProposer {
    bank: BinarizationBank,
}

impl RegionProposer {
    /// Proposer over the standard binarization bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Proposer over a custom bank
    pub fn with_bank(bank: BinarizationBank) -> Self {
        Self { bank }
    }

    /// The bank masks are drawn from
    pub fn bank(&self) -> &BinarizationBank {
        &self.bank
    }

    /// Regions from every mask, concatenated in mask order
    pub fn propose(&self, gray: &GrayImage) -> Vec<CandidateRegion> {
        let masks = self.bank.binarize(gray);
        let mut regions = Vec::new();
        for (source, mask) in masks.iter().enumerate() {
            let found = regions_from_mask(mask, source);
            debug!(source, count = found.len(), "regions from mask");
            regions.extend(found);
        }
        regions
    }
}

/// Candidate regions of a single mask, in component order
pub fn regions_from_mask(mask: &BitMatrix, source: usize) -> Vec<CandidateRegion> {
    let (width, height) = (mask.width() as u32, mask.height() as u32);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let morphed = open(&close(mask, CLOSE_KERNEL), OPEN_KERNEL);

    find_external_contours(&morphed)
        .into_iter()
        .filter(|c| passes_geometry(&c.bbox, c.area, width, height))
        .filter_map(|c| {
            let score = texture::classify(mask, &c.bbox)?;
            let rect = expand_region(&c.bbox, width, height);
            Some(CandidateRegion::new(rect, source, score))
        })
        .collect()
}

/// Size, frame-fraction, aspect and fill gates for a component's box.
///
/// Size gates run first so the ratios never see a zero dimension.
pub fn passes_geometry(
    rect: &Rect,
    contour_area: f64,
    frame_width: u32,
    frame_height: u32,
) -> bool {
    if rect.width < MIN_WIDTH || rect.height < MIN_HEIGHT {
        return false;
    }
    if rect.width as f64 > MAX_FRAME_FRACTION * frame_width as f64
        || rect.height as f64 > MAX_FRAME_FRACTION * frame_height as f64
    {
        return false;
    }
    if rect.area() < MIN_AREA {
        return false;
    }

    let aspect = rect.width as f64 / rect.height as f64;
    if aspect <= MIN_ASPECT || aspect >= MAX_ASPECT {
        return false;
    }

    contour_area / rect.area() as f64 > MIN_FILL
}

/// Grow a box by 20% of its width and 30% of its height, half on each side,
/// without leaving the frame.
pub fn expand_region(rect: &Rect, frame_width: u32, frame_height: u32) -> Rect {
    let ex = (rect.width as f64 * EXPAND_X) as u32;
    let ey = (rect.height as f64 * EXPAND_Y) as u32;
    let x = rect.x.saturating_sub(ex / 2);
    let y = rect.y.saturating_sub(ey / 2);
    Rect::new(
        x,
        y,
        (rect.width + ex).min(frame_width.saturating_sub(x)),
        (rect.height + ey).min(frame_height.saturating_sub(y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Vertical bars of `module` px alternating ink/paper inside `area`
    fn barcode_mask(width: usize, height: usize, area: Rect, module: u32) -> BitMatrix {
        BitMatrix::from_fn(width, height, |x, y| {
            let (x, y) = (x as u32, y as u32);
            x >= area.x
                && x < area.right()
                && y >= area.y
                && y < area.bottom()
                && ((x - area.x) / module) % 2 == 0
        })
    }

    #[test]
    fn test_geometry_gates() {
        let (w, h) = (320, 240);
        assert!(passes_geometry(&Rect::new(10, 10, 100, 40), 4000.0, w, h));
        // too narrow / too short
        assert!(!passes_geometry(&Rect::new(0, 0, 29, 20), 580.0, w, h));
        assert!(!passes_geometry(&Rect::new(0, 0, 60, 9), 540.0, w, h));
        // wider than 70% of the frame
        assert!(!passes_geometry(&Rect::new(0, 0, 225, 40), 9000.0, w, h));
        // square is not barcode-shaped
        assert!(!passes_geometry(&Rect::new(0, 0, 40, 40), 1600.0, w, h));
        // aspect at the upper bound
        assert!(!passes_geometry(&Rect::new(0, 0, 150, 10), 1500.0, w, h));
        // sparse outline
        assert!(!passes_geometry(&Rect::new(0, 0, 100, 40), 1000.0, w, h));
        // zero-area box never reaches a division
        assert!(!passes_geometry(&Rect::new(0, 0, 0, 0), 0.0, w, h));
    }

    #[test]
    fn test_expand_region_matches_formula() {
        let r = expand_region(&Rect::new(100, 100, 100, 40), 320, 240);
        assert_eq!(r, Rect::new(90, 94, 120, 52));
    }

    #[test]
    fn test_expand_region_clamped() {
        let r = expand_region(&Rect::new(2, 1, 100, 40), 110, 45);
        assert_eq!(r.x, 0);
        assert_eq!(r.y, 0);
        assert!(r.fits_within(110, 45));
        assert_eq!(r.width, 110);
        assert_eq!(r.height, 45);
    }

    #[test]
    fn test_bars_become_one_region() {
        let area = Rect::new(100, 90, 120, 50);
        let mask = barcode_mask(320, 240, area, 2);
        let regions = regions_from_mask(&mask, 3);
        assert_eq!(regions.len(), 1);
        let region = regions[0];
        assert_eq!(region.source, 3);
        assert!(region.texture_score > 1.8);
        assert!(region.rect.fits_within(320, 240));
        assert!(region.rect.iou(&area) > 0.6);
    }

    #[test]
    fn test_solid_block_rejected_by_texture() {
        let mask = BitMatrix::from_fn(320, 240, |x, y| {
            (100..220).contains(&x) && (90..140).contains(&y)
        });
        assert!(regions_from_mask(&mask, 0).is_empty());
    }

    #[test]
    fn test_empty_and_full_masks_yield_nothing() {
        assert!(regions_from_mask(&BitMatrix::new(320, 240), 0).is_empty());
        assert!(regions_from_mask(&BitMatrix::from_fn(320, 240, |_, _| true), 0).is_empty());
        assert!(regions_from_mask(&BitMatrix::new(0, 0), 0).is_empty());
    }

    #[test]
    fn test_propose_on_synthetic_barcode() {
        let gray = GrayImage::from_fn(320, 240, |x, y| {
            let inside = (100..220).contains(&x) && (90..150).contains(&y);
            if inside && ((x - 100) / 2) % 2 == 0 {
                Luma([15])
            } else {
                Luma([235])
            }
        });
        let regions = RegionProposer::new().propose(&gray);
        assert!(!regions.is_empty());
        let truth = Rect::new(100, 90, 120, 60);
        assert!(regions.iter().any(|r| r.rect.iou(&truth) > 0.3));
        for r in &regions {
            assert!(r.rect.fits_within(320, 240));
        }
    }

    #[test]
    fn test_uniform_frame_has_no_regions() {
        let gray = GrayImage::from_pixel(320, 240, Luma([128]));
        assert!(RegionProposer::new().propose(&gray).is_empty());
    }
}
