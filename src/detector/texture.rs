/// Stripe-texture test for candidate boxes
use crate::models::{BitMatrix, Rect};
use crate::utils::filter::{Axis, Plane, sobel};

/// Smallest crop side the texture test accepts
pub const MIN_CROP_SIDE: u32 = 5;

/// Minimum horizontal stripe score
pub const STRIPE_THRESHOLD: f64 = 1.8;

/// Required dominance of the horizontal over the vertical score
pub const STRIPE_DOMINANCE: f64 = 1.2;

const EPSILON: f64 = 1e-5;

/// Gradient-dispersion scores of a crop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripeScores {
    /// Score of the x-gradient (vertical bars)
    pub horizontal: f64,
    /// Score of the y-gradient (horizontal bars)
    pub vertical: f64,
}

impl StripeScores {
    /// True if the crop looks like a row of parallel vertical bars
    pub fn is_barcode_like(&self) -> bool {
        self.horizontal > STRIPE_THRESHOLD && self.horizontal > STRIPE_DOMINANCE * self.vertical
    }
}

/// Stripe scores of `rect` within `mask`.
///
/// The crop is read with ink as 255 and background as 0; each score is
/// `stddev / (|mean| + 1e-5)` of the Sobel derivative along that axis.
/// Kernel taps on the crop edge read the neighbouring mask cells; only the
/// mask's own border is replicated.
/// Returns `None` for crops smaller than 5x5 or reaching outside the mask.
pub fn stripe_scores(mask: &BitMatrix, rect: &Rect) -> Option<StripeScores> {
    if rect.width < MIN_CROP_SIDE || rect.height < MIN_CROP_SIDE {
        return None;
    }
    if !rect.fits_within(mask.width() as u32, mask.height() as u32) {
        return None;
    }

    let context = with_context(rect, mask.width() as u32, mask.height() as u32);
    let padded = Plane::from_mask(mask, &context);
    let (ox, oy) = ((rect.x - context.x) as usize, (rect.y - context.y) as usize);
    let (w, h) = (rect.width as usize, rect.height as usize);
    let score = |axis| {
        let (mean, stddev) = sobel(&padded, axis).crop(ox, oy, w, h).mean_stddev();
        stddev / (mean.abs() + EPSILON)
    };

    Some(StripeScores {
        horizontal: score(Axis::Horizontal),
        vertical: score(Axis::Vertical),
    })
}

/// `rect` grown by one cell on each side that the mask extends past
fn with_context(rect: &Rect, width: u32, height: u32) -> Rect {
    let x = rect.x.saturating_sub(1);
    let y = rect.y.saturating_sub(1);
    let right = (rect.right() + 1).min(width);
    let bottom = (rect.bottom() + 1).min(height);
    Rect::new(x, y, right - x, bottom - y)
}

/// Horizontal score of an accepted crop, `None` if the crop is rejected
pub fn classify(mask: &BitMatrix, rect: &Rect) -> Option<f64> {
    stripe_scores(mask, rect)
        .filter(StripeScores::is_barcode_like)
        .map(|s| s.horizontal)
}
