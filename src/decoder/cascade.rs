//! Ordered decode strategies
//!
//! The cascade walks its strategies in order and stops at the first one that
//! yields a classifiable symbol. Standard order:
//!
//! 1. structured detector quads, each cropped and decoded
//! 2. curved-region proposals, each tried raw, upscaled, locally equalized and sharpened
//! 3. the whole frame
//!
//! Every image handed to the engine goes through [`prepare_for_decode`] first.

use crate::config::ScanConfig;
use crate::decoder::classifier::ResultClassifier;
use crate::decoder::engine::{StructuredDetector, SymbolDecoder};
use crate::decoder::variants::{Variant, prepare_for_decode};
use crate::detector::{RegionProposer, deduplicate};
use crate::models::{CandidateRegion, DecodedSymbol, Frame, Rect};
use crate::utils::grayscale::resize_to;
use image::{GrayImage, imageops};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Which strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    /// Structured detector quads
    Structured,
    /// Proposed regions and their variants
    CurvedRegion,
    /// The full frame
    WholeFrame,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Structured => "structured",
            Stage::CurvedRegion => "curved-region",
            Stage::WholeFrame => "whole-frame",
        };
        f.write_str(name)
    }
}

/// A successful decode and where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// The decoded symbol
    pub symbol: DecodedSymbol,
    /// Strategy that decoded it
    pub stage: Stage,
    /// Region variant, for curved-region results
    pub variant: Option<Variant>,
    /// Full-resolution box that was decoded, if not the whole frame
    pub region: Option<Rect>,
}

/// Outcome of one strategy
#[derive(Debug, Clone, PartialEq)]
pub enum StageResult {
    /// A classifiable symbol
    Found(Detection),
    /// Nothing usable; the cascade moves on
    NotFound,
}

/// Terminal state of the cascade
#[derive(Debug, Clone, PartialEq)]
pub enum CascadeOutcome {
    /// First classifiable result
    Success(Detection),
    /// Every strategy came up empty
    Failure,
}

/// Inputs shared by every strategy of one cascade run
pub struct CascadeContext<'a> {
    /// Frame being scanned
    pub frame: Frame<'a>,
    /// Full-resolution luma of `frame`
    pub luma: &'a GrayImage,
    /// Engine every strategy decodes with
    pub decoder: &'a dyn SymbolDecoder,
    /// Pipeline settings
    pub config: &'a ScanConfig,
}

impl CascadeContext<'_> {
    /// Normalize, decode and classify; `None` unless the result is classifiable
    pub fn decode_image(&self, image: &GrayImage) -> Option<DecodedSymbol> {
        if image.width() == 0 || image.height() == 0 {
            return None;
        }
        let prepared = prepare_for_decode(image);
        let raw = self
            .decoder
            .decode(prepared.as_raw(), prepared.width(), prepared.height())?;
        let symbol = ResultClassifier::classify(&raw.to_raw_string());
        symbol.is_classifiable().then_some(symbol)
    }
}

/// One step of the cascade
pub trait DecodeStrategy: Send + Sync {
    /// Stage reported for this strategy's results
    fn stage(&self) -> Stage;

    /// Attempt a decode; a miss is [`StageResult::NotFound`], never an error
    fn try_decode(&self, ctx: &CascadeContext<'_>) -> StageResult;
}

/// Decode the bounding boxes of structured-detector quads
pub struct StructuredPass {
    detector: Arc<dyn StructuredDetector>,
}

impl StructuredPass {
    /// Pass over `detector`'s quads
    pub fn new(detector: Arc<dyn StructuredDetector>) -> Self {
        Self { detector }
    }
}

impl DecodeStrategy for StructuredPass {
    fn stage(&self) -> Stage {
        Stage::Structured
    }

    fn try_decode(&self, ctx: &CascadeContext<'_>) -> StageResult {
        let quads = self.detector.detect(&ctx.frame);
        debug!(quads = quads.len(), "structured detector");
        for quad in quads {
            let Some(rect) = quad
                .bounding_rect()
                .clamp_to(ctx.luma.width(), ctx.luma.height())
            else {
                continue;
            };
            let crop = crop_luma(ctx.luma, &rect);
            if let Some(symbol) = ctx.decode_image(&crop) {
                return StageResult::Found(Detection {
                    symbol,
                    stage: Stage::Structured,
                    variant: None,
                    region: Some(rect),
                });
            }
        }
        StageResult::NotFound
    }
}

/// Propose regions on a downscaled copy and decode each one's variants
#[derive(Debug, Clone, Default)]
pub struct CurvedRegionPass {
    proposer: RegionProposer,
}

impl CurvedRegionPass {
    /// Pass over the standard proposer
    pub fn new() -> Self {
        Self::default()
    }
}

impl DecodeStrategy for CurvedRegionPass {
    fn stage(&self) -> Stage {
        Stage::CurvedRegion
    }

    fn try_decode(&self, ctx: &CascadeContext<'_>) -> StageResult {
        let regions = full_resolution_regions(&self.proposer, ctx.luma, ctx.config);
        debug!(regions = regions.len(), "curved-region candidates");

        for region in &regions {
            let crop = crop_luma(ctx.luma, &region.rect);
            for variant in Variant::ORDER {
                if !variant.applies_to(region.rect.width, ctx.config) {
                    continue;
                }
                let image = variant.render(&crop, ctx.config);
                if let Some(symbol) = ctx.decode_image(&image) {
                    return StageResult::Found(Detection {
                        symbol,
                        stage: Stage::CurvedRegion,
                        variant: Some(variant),
                        region: Some(region.rect),
                    });
                }
                debug!(rect = ?region.rect, %variant, "variant did not decode");
            }
        }
        StageResult::NotFound
    }
}

/// Decode the full frame
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeFramePass;

impl DecodeStrategy for WholeFramePass {
    fn stage(&self) -> Stage {
        Stage::WholeFrame
    }

    fn try_decode(&self, ctx: &CascadeContext<'_>) -> StageResult {
        match ctx.decode_image(ctx.luma) {
            Some(symbol) => StageResult::Found(Detection {
                symbol,
                stage: Stage::WholeFrame,
                variant: None,
                region: None,
            }),
            None => StageResult::NotFound,
        }
    }
}

/// Ordered list of strategies
pub struct DecodeCascade {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl DecodeCascade {
    /// Structured (if enabled), curved-region, whole-frame
    pub fn standard(detector: Arc<dyn StructuredDetector>, config: &ScanConfig) -> Self {
        let mut strategies: Vec<Box<dyn DecodeStrategy>> = Vec::with_capacity(3);
        if config.structured_pass {
            strategies.push(Box::new(StructuredPass::new(detector)));
        }
        strategies.push(Box::new(CurvedRegionPass::new()));
        strategies.push(Box::new(WholeFramePass));
        Self { strategies }
    }

    /// Cascade over an explicit strategy list
    pub fn with_strategies(strategies: Vec<Box<dyn DecodeStrategy>>) -> Self {
        Self { strategies }
    }

    /// Stages in the order they run
    pub fn stages(&self) -> Vec<Stage> {
        self.strategies.iter().map(|s| s.stage()).collect()
    }

    /// Run strategies until one finds a classifiable symbol
    pub fn run(&self, ctx: &CascadeContext<'_>) -> CascadeOutcome {
        for strategy in &self.strategies {
            let stage = strategy.stage();
            match strategy.try_decode(ctx) {
                StageResult::Found(detection) => {
                    info!(
                        %stage,
                        kind = %detection.symbol.kind,
                        variant = ?detection.variant,
                        "decoded"
                    );
                    return CascadeOutcome::Success(detection);
                }
                StageResult::NotFound => debug!(%stage, "stage found nothing"),
            }
        }
        CascadeOutcome::Failure
    }
}

/// Deduplicated proposals on the working-resolution copy of `luma`, mapped
/// back to `luma`'s coordinates and capped at `config.max_regions`.
pub fn full_resolution_regions(
    proposer: &RegionProposer,
    luma: &GrayImage,
    config: &ScanConfig,
) -> Vec<CandidateRegion> {
    let (width, height) = luma.dimensions();
    let (work_w, work_h) = config.working_size();
    if width == 0 || height == 0 || work_w == 0 || work_h == 0 {
        return Vec::new();
    }

    let small = resize_to(luma, work_w, work_h);
    let sx = width as f64 / work_w as f64;
    let sy = height as f64 / work_h as f64;

    deduplicate(proposer.propose(&small))
        .into_iter()
        .take(config.max_regions)
        .filter_map(|region| {
            let rect = region.rect.scale(sx, sy).clamp_to(width, height)?;
            Some(CandidateRegion { rect, ..region })
        })
        .collect()
}

fn crop_luma(luma: &GrayImage, rect: &Rect) -> GrayImage {
    imageops::crop_imm(luma, rect.x, rect.y, rect.width, rect.height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::engine::{NoStructuredDetector, RawDecode};
    use crate::models::{Point, Quad, SymbolKind};
    use image::Luma;
    use std::sync::Mutex;

    fn context<'a>(
        data: &'a [u8],
        luma: &'a GrayImage,
        decoder: &'a dyn SymbolDecoder,
        config: &'a ScanConfig,
    ) -> CascadeContext<'a> {
        CascadeContext {
            frame: Frame::luma(data, luma.width(), luma.height()).unwrap(),
            luma,
            decoder,
            config,
        }
    }

    /// Strategy that records that it ran and returns a fixed answer
    struct Scripted {
        stage: Stage,
        found: bool,
        log: Arc<Mutex<Vec<Stage>>>,
    }

    impl DecodeStrategy for Scripted {
        fn stage(&self) -> Stage {
            self.stage
        }

        fn try_decode(&self, _ctx: &CascadeContext<'_>) -> StageResult {
            self.log.lock().unwrap().push(self.stage);
            if self.found {
                StageResult::Found(Detection {
                    symbol: DecodedSymbol::new(SymbolKind::Code128, "x", "CODE128: x"),
                    stage: self.stage,
                    variant: None,
                    region: None,
                })
            } else {
                StageResult::NotFound
            }
        }
    }

    #[test]
    fn test_cascade_stops_at_first_success() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let scripted = |stage, found| -> Box<dyn DecodeStrategy> {
            Box::new(Scripted {
                stage,
                found,
                log: Arc::clone(&log),
            })
        };
        let cascade = DecodeCascade::with_strategies(vec![
            scripted(Stage::Structured, false),
            scripted(Stage::CurvedRegion, true),
            scripted(Stage::WholeFrame, true),
        ]);

        let luma = GrayImage::from_pixel(8, 8, Luma([200]));
        let data = luma.as_raw().clone();
        let decoder = |_: &[u8], _: u32, _: u32| -> Option<RawDecode> { None };
        let config = ScanConfig::default();
        let outcome = cascade.run(&context(&data, &luma, &decoder, &config));

        match outcome {
            CascadeOutcome::Success(d) => assert_eq!(d.stage, Stage::CurvedRegion),
            CascadeOutcome::Failure => panic!("expected success"),
        }
        assert_eq!(*log.lock().unwrap(), vec![Stage::Structured, Stage::CurvedRegion]);
    }

    #[test]
    fn test_unknown_kind_does_not_stop_cascade() {
        let luma = GrayImage::from_pixel(120, 60, Luma([200]));
        let data = luma.as_raw().clone();
        let decoder = |_: &[u8], _: u32, _: u32| Some(RawDecode::new("", "junk"));
        let config = ScanConfig::default();
        let ctx = context(&data, &luma, &decoder, &config);
        assert_eq!(WholeFramePass.try_decode(&ctx), StageResult::NotFound);
    }

    #[test]
    fn test_whole_frame_small_image_is_upscaled() {
        let luma = GrayImage::from_pixel(50, 20, Luma([200]));
        let data = luma.as_raw().clone();
        let seen = Mutex::new(Vec::new());
        let decoder = |_: &[u8], w: u32, h: u32| {
            seen.lock().unwrap().push((w, h));
            Some(RawDecode::new("EAN-8", "96385074"))
        };
        let config = ScanConfig::default();
        let ctx = context(&data, &luma, &decoder, &config);
        let StageResult::Found(d) = WholeFramePass.try_decode(&ctx) else {
            panic!("expected a decode");
        };
        assert_eq!(d.symbol.payload, "96385074");
        // max(150/50, 60/20) = 3
        assert_eq!(*seen.lock().unwrap(), vec![(150, 60)]);
    }

    #[test]
    fn test_structured_pass_crops_quad_bbox() {
        let luma = GrayImage::from_pixel(200, 100, Luma([200]));
        let data = luma.as_raw().clone();
        let detector: Arc<dyn StructuredDetector> = Arc::new(|_: &Frame<'_>| {
            vec![
                // entirely outside the frame
                Quad::new([Point::new(500.0, 500.0); 4]),
                Quad::new([
                    Point::new(20.5, 10.0),
                    Point::new(180.0, 12.0),
                    Point::new(179.0, 70.0),
                    Point::new(21.0, 69.2),
                ]),
            ]
        });
        let seen = Mutex::new(Vec::new());
        let decoder = |_: &[u8], w: u32, h: u32| {
            seen.lock().unwrap().push((w, h));
            Some(RawDecode::new("UPC-A", "036000291452"))
        };
        let config = ScanConfig::default();
        let ctx = context(&data, &luma, &decoder, &config);
        let StageResult::Found(d) = StructuredPass::new(detector).try_decode(&ctx) else {
            panic!("expected a decode");
        };
        assert_eq!(d.region, Some(Rect::new(20, 10, 160, 60)));
        assert_eq!(*seen.lock().unwrap(), vec![(160, 60)]);
    }

    #[test]
    fn test_standard_cascade_order() {
        let config = ScanConfig::default();
        let cascade = DecodeCascade::standard(Arc::new(NoStructuredDetector), &config);
        assert_eq!(
            cascade.stages(),
            vec![Stage::Structured, Stage::CurvedRegion, Stage::WholeFrame]
        );

        let no_structured = ScanConfig {
            structured_pass: false,
            ..ScanConfig::default()
        };
        let cascade = DecodeCascade::standard(Arc::new(NoStructuredDetector), &no_structured);
        assert_eq!(cascade.stages(), vec![Stage::CurvedRegion, Stage::WholeFrame]);
    }

    #[test]
    fn test_regions_scaled_to_full_resolution() {
        // 640x480 frame, bars at (200,180) 240x120 with 4px modules
        let luma = GrayImage::from_fn(640, 480, |x, y| {
            let inside = (200..440).contains(&x) && (180..300).contains(&y);
            if inside && ((x - 200) / 4) % 2 == 0 {
                Luma([20])
            } else {
                Luma([230])
            }
        });
        let regions =
            full_resolution_regions(&RegionProposer::new(), &luma, &ScanConfig::default());
        assert!(!regions.is_empty());
        let truth = Rect::new(200, 180, 240, 120);
        assert!(regions.iter().any(|r| r.rect.iou(&truth) > 0.3));
        for r in &regions {
            assert!(r.rect.fits_within(640, 480));
        }
    }

    fn bar_luma(width: u32, height: u32, area: Rect, module: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let inside = x >= area.x && x < area.right() && y >= area.y && y < area.bottom();
            if inside && ((x - area.x) / module) % 2 == 0 {
                Luma([20])
            } else {
                Luma([230])
            }
        })
    }

    /// Size the engine sees for an image of `w` x `h` after normalization
    fn engine_size(w: u32, h: u32) -> (u32, u32) {
        if w >= 100 && h >= 40 {
            return (w, h);
        }
        let f = (150.0 / w as f64).max(60.0 / h as f64);
        ((w as f64 * f).round() as u32, (h as f64 * f).round() as u32)
    }

    #[test]
    fn test_narrow_regions_try_every_variant_in_order() {
        let luma = bar_luma(320, 240, Rect::new(110, 100, 100, 40), 2);
        let data = luma.as_raw().clone();
        let seen = Mutex::new(Vec::new());
        let decoder = |_: &[u8], w: u32, h: u32| -> Option<RawDecode> {
            seen.lock().unwrap().push((w, h));
            None
        };
        let config = ScanConfig::default();
        let ctx = context(&data, &luma, &decoder, &config);

        let regions = full_resolution_regions(&RegionProposer::new(), &luma, &config);
        assert!(!regions.is_empty());
        assert_eq!(CurvedRegionPass::new().try_decode(&ctx), StageResult::NotFound);

        let mut expected = Vec::new();
        for region in &regions {
            let (w, h) = (region.rect.width, region.rect.height);
            assert!(w < 150);
            let raw = engine_size(w, h);
            let f = (200.0 / w as f64).min(3.0);
            let up = ((w as f64 * f).round() as u32, (h as f64 * f).round() as u32);
            // raw, upscaled, contrast, sharpened
            expected.extend([raw, engine_size(up.0, up.1), raw, raw]);
        }
        assert_eq!(*seen.lock().unwrap(), expected);
    }

    #[test]
    fn test_wide_regions_skip_upscaling() {
        let luma = bar_luma(640, 480, Rect::new(200, 180, 240, 120), 4);
        let data = luma.as_raw().clone();
        let seen = Mutex::new(Vec::new());
        let decoder = |_: &[u8], w: u32, h: u32| -> Option<RawDecode> {
            seen.lock().unwrap().push((w, h));
            None
        };
        let config = ScanConfig::default();
        let ctx = context(&data, &luma, &decoder, &config);

        let regions = full_resolution_regions(&RegionProposer::new(), &luma, &config);
        assert!(!regions.is_empty());
        assert_eq!(CurvedRegionPass::new().try_decode(&ctx), StageResult::NotFound);

        let expected: Vec<(u32, u32)> = regions
            .iter()
            .inspect(|r| assert!(r.rect.width >= 150))
            .flat_map(|r| [(r.rect.width, r.rect.height); 3])
            .collect();
        assert_eq!(*seen.lock().unwrap(), expected);
    }

    #[test]
    fn test_raw_success_skips_later_variants() {
        let luma = bar_luma(320, 240, Rect::new(110, 100, 100, 40), 2);
        let data = luma.as_raw().clone();
        let calls = Mutex::new(0usize);
        let decoder = |_: &[u8], _: u32, _: u32| {
            *calls.lock().unwrap() += 1;
            Some(RawDecode::new("EAN-13", "4006381333931"))
        };
        let config = ScanConfig::default();
        let ctx = context(&data, &luma, &decoder, &config);

        let StageResult::Found(d) = CurvedRegionPass::new().try_decode(&ctx) else {
            panic!("expected a decode");
        };
        assert_eq!(d.variant, Some(Variant::Raw));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_sharpened_crop_is_last_resort() {
        let luma = bar_luma(320, 240, Rect::new(110, 100, 100, 40), 2);
        let data = luma.as_raw().clone();
        let config = ScanConfig::default();

        let first = full_resolution_regions(&RegionProposer::new(), &luma, &config)[0].rect;
        let cropped = crop_luma(&luma, &first);
        let sharpened = Variant::Sharpened.render(&cropped, &config);
        let expected = prepare_for_decode(&sharpened).into_owned();

        let seen = Mutex::new(Vec::new());
        let decoder = |pixels: &[u8], w: u32, h: u32| {
            seen.lock().unwrap().push((w, h));
            (pixels == expected.as_raw().as_slice()).then(|| RawDecode::new("CODE39", "PART-7"))
        };
        let ctx = context(&data, &luma, &decoder, &config);

        let StageResult::Found(d) = CurvedRegionPass::new().try_decode(&ctx) else {
            panic!("expected a decode");
        };
        assert_eq!(d.variant, Some(Variant::Sharpened));
        assert_eq!(d.region, Some(first));
        assert_eq!(d.symbol.payload, "PART-7");
        // raw, upscaled and contrast of the first region were tried first
        assert_eq!(seen.lock().unwrap().len(), 4);
    }
}
