use serde::Serialize;

/// Axis-aligned integer box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a new box
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Area in square pixels
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True if the box covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True if the box lies fully inside a `width` x `height` grid
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Overlapping part of two boxes, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Intersection area divided by the smaller of the two areas.
    ///
    /// Returns 0.0 when either box is empty.
    pub fn overlap_ratio(&self, other: &Rect) -> f64 {
        let smaller = self.area().min(other.area());
        if smaller == 0 {
            return 0.0;
        }
        let inter = self.intersection(other).map_or(0, |r| r.area());
        inter as f64 / smaller as f64
    }

    /// Standard intersection over union
    pub fn iou(&self, other: &Rect) -> f64 {
        let inter = self.intersection(other).map_or(0, |r| r.area());
        let union = self.area() + other.area() - inter;
        if union == 0 {
            return 0.0;
        }
        inter as f64 / union as f64
    }

    /// Scale coordinates and size independently per axis, truncating.
    pub fn scale(&self, sx: f64, sy: f64) -> Rect {
        Rect::new(
            (self.x as f64 * sx) as u32,
            (self.y as f64 * sy) as u32,
            (self.width as f64 * sx) as u32,
            (self.height as f64 * sy) as u32,
        )
    }

    /// Clip to a `width` x `height` grid; `None` if nothing remains.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Rect> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        let clipped = Rect::new(self.x, self.y, w, h);
        if clipped.is_empty() { None } else { Some(clipped) }
    }
}

/// Bounding box proposed as possibly containing a barcode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateRegion {
    /// Box in the coordinates of the image it was proposed on
    pub rect: Rect,
    /// Index of the binarization that produced it
    pub source: usize,
    /// Horizontal stripe score of the accepted crop
    pub texture_score: f64,
}

impl CandidateRegion {
    /// Create a new candidate
    pub fn new(rect: Rect, source: usize, texture_score: f64) -> Self {
        Self {
            rect,
            source,
            texture_score,
        }
    }
}
