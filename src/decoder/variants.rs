/// Per-region image variants and the pre-decode size normalization
use crate::config::ScanConfig;
use crate::utils::enhance::{clahe, unsharp_mask};
use crate::utils::grayscale::upscale;
use image::GrayImage;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Unsharp-mask strength of [`Variant::Sharpened`]
pub const SHARPEN_STRENGTH: f32 = 2.0;

/// CLAHE clip limit of [`Variant::ContrastEnhanced`]
pub const CLAHE_CLIP_LIMIT: f64 = 2.0;
/// CLAHE tiles per side
pub const CLAHE_GRID: u32 = 8;

/// Images smaller than this on either side are enlarged before decoding
pub const MIN_DECODE_WIDTH: u32 = 100;
/// See [`MIN_DECODE_WIDTH`]
pub const MIN_DECODE_HEIGHT: u32 = 40;

const DECODE_TARGET_WIDTH: f64 = 150.0;
const DECODE_TARGET_HEIGHT: f64 = 60.0;

/// Processing applied to a region crop before it reaches the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Variant {
    /// The crop as is
    Raw,
    /// Catmull-Rom enlargement of narrow crops
    Upscaled,
    /// Locally equalized luma (CLAHE)
    ContrastEnhanced,
    /// Unsharp mask
    Sharpened,
}

impl Variant {
    /// Order the curved-region pass tries variants in
    pub const ORDER: [Variant; 4] = [
        Variant::Raw,
        Variant::Upscaled,
        Variant::ContrastEnhanced,
        Variant::Sharpened,
    ];

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Raw => "raw",
            Variant::Upscaled => "upscaled",
            Variant::ContrastEnhanced => "contrast",
            Variant::Sharpened => "sharpened",
        }
    }

    /// Whether this variant is tried on a crop `width` pixels wide
    pub fn applies_to(&self, width: u32, config: &ScanConfig) -> bool {
        match self {
            Variant::Raw => true,
            Variant::Upscaled => {
                config.upscale_variant && width > 0 && width < config.upscale_below_width
            }
            Variant::ContrastEnhanced => config.contrast_variant,
            Variant::Sharpened => config.sharpen_variant,
        }
    }

    /// Produce the variant of `crop`; `Raw` borrows, the others allocate
    pub fn render<'a>(&self, crop: &'a GrayImage, config: &ScanConfig) -> Cow<'a, GrayImage> {
        match self {
            Variant::Raw => Cow::Borrowed(crop),
            Variant::Upscaled => {
                let factor = (config.upscale_target_width / crop.width().max(1) as f64)
                    .min(config.max_upscale);
                Cow::Owned(upscale(crop, factor))
            }
            Variant::ContrastEnhanced => Cow::Owned(clahe(crop, CLAHE_CLIP_LIMIT, CLAHE_GRID)),
            Variant::Sharpened => Cow::Owned(unsharp_mask(crop, SHARPEN_STRENGTH)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Enlarge images under 100x40 by `max(150 / w, 60 / h)` so the engine has
/// enough pixels per module. Larger images are passed through.
pub fn prepare_for_decode(image: &GrayImage) -> Cow<'_, GrayImage> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || (w >= MIN_DECODE_WIDTH && h >= MIN_DECODE_HEIGHT) {
        return Cow::Borrowed(image);
    }
    let factor = (DECODE_TARGET_WIDTH / w as f64).max(DECODE_TARGET_HEIGHT / h as f64);
    Cow::Owned(upscale(image, factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_upscaled_only_for_narrow_crops() {
        let config = ScanConfig::default();
        assert!(Variant::Upscaled.applies_to(149, &config));
        assert!(!Variant::Upscaled.applies_to(150, &config));
        assert!(Variant::Raw.applies_to(1000, &config));
    }

    #[test]
    fn test_upscale_factor_capped() {
        let config = ScanConfig::default();
        let narrow = GrayImage::new(40, 20);
        let out = Variant::Upscaled.render(&narrow, &config);
        assert_eq!(out.dimensions(), (120, 60));

        let wider = GrayImage::new(100, 20);
        let out = Variant::Upscaled.render(&wider, &config);
        assert_eq!(out.dimensions(), (200, 40));
    }

    #[test]
    fn test_raw_borrows() {
        let img = GrayImage::from_pixel(10, 10, Luma([9]));
        assert!(matches!(Variant::Raw.render(&img, &ScanConfig::default()), Cow::Borrowed(_)));
    }

    #[test]
    fn test_disabled_variants_skipped() {
        let config = ScanConfig {
            contrast_variant: false,
            sharpen_variant: false,
            upscale_variant: false,
            ..ScanConfig::default()
        };
        let tried: Vec<_> = Variant::ORDER
            .iter()
            .filter(|v| v.applies_to(80, &config))
            .collect();
        assert_eq!(tried, vec![&Variant::Raw]);
    }

    #[test]
    fn test_prepare_small_image() {
        let img = GrayImage::new(50, 30);
        let out = prepare_for_decode(&img);
        // max(150/50, 60/30) = 3
        assert_eq!(out.dimensions(), (150, 90));
    }

    #[test]
    fn test_prepare_large_image_untouched() {
        let img = GrayImage::new(100, 40);
        assert!(matches!(prepare_for_decode(&img), Cow::Borrowed(_)));
    }
}
