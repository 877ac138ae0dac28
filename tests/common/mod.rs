//! Synthetic frames and scripted engines shared by the integration tests

#![allow(dead_code)]

use barscan::{Point, Quad, RawDecode, Rect};

pub const INK: u8 = 20;
pub const PAPER: u8 = 230;

/// Luma frame with straight vertical bars of `module` px inside `area`
pub fn barcode_frame(width: u32, height: u32, area: Rect, module: u32) -> Vec<u8> {
    frame_from_fn(width, height, |x, y| {
        let inside = x >= area.x && x < area.right() && y >= area.y && y < area.bottom();
        if inside && ((x - area.x) / module) % 2 == 0 {
            INK
        } else {
            PAPER
        }
    })
}

/// Luma frame with a label wrapped around a cylinder: bars stay vertical but
/// narrow towards the left and right edges of `area`, as on a bottle.
pub fn cylinder_barcode_frame(width: u32, height: u32, area: Rect, module: f64) -> Vec<u8> {
    let max_angle: f64 = 0.6;
    let half = area.width as f64 / 2.0;
    let center = area.x as f64 + half;
    // label length that maps onto the visible arc
    let arc = half * max_angle / max_angle.sin();
    frame_from_fn(width, height, |x, y| {
        let inside = x >= area.x && x < area.right() && y >= area.y && y < area.bottom();
        if !inside {
            return PAPER;
        }
        let t = ((x as f64 + 0.5 - center) / half).clamp(-1.0, 1.0);
        let label = arc * (t * max_angle.sin()).asin() / max_angle + arc;
        if ((label / module).floor() as i64) % 2 == 0 {
            INK
        } else {
            PAPER
        }
    })
}

/// Constant-intensity frame
pub fn uniform_frame(width: u32, height: u32, value: u8) -> Vec<u8> {
    vec![value; (width * height) as usize]
}

/// Deterministic full-range noise
pub fn noisy_frame(width: u32, height: u32, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..width * height)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

pub fn frame_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push(f(x, y));
        }
    }
    data
}

/// Quad whose corners are those of `rect`
pub fn quad_of(rect: Rect) -> Quad {
    let (x0, y0) = (rect.x as f32, rect.y as f32);
    let (x1, y1) = (rect.right() as f32, rect.bottom() as f32);
    Quad::new([
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ])
}

/// Dark/light transitions along the middle row
pub fn middle_row_transitions(pixels: &[u8], width: u32, height: u32) -> usize {
    if width == 0 || height == 0 {
        return 0;
    }
    let row = (height / 2) as usize * width as usize;
    pixels[row..row + width as usize]
        .windows(2)
        .filter(|w| (w[0] < 128) != (w[1] < 128))
        .count()
}

/// Engine stand-in: "reads" anything with enough bars across its middle row
pub fn bar_counting_decoder(pixels: &[u8], width: u32, height: u32) -> Option<RawDecode> {
    (middle_row_transitions(pixels, width, height) >= 20)
        .then(|| RawDecode::new("EAN-13", "4006381333931"))
}
