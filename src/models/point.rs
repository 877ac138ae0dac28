use super::Rect;

/// 2D point with floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Four corners reported by a structured symbol detector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    /// Corner points, in detector order
    pub corners: [Point; 4],
}

impl Quad {
    /// Create a quadrilateral from its corners
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned box covering all four corners.
    ///
    /// Coordinates left of or above the origin are clipped to zero.
    pub fn bounding_rect(&self) -> Rect {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for p in &self.corners {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = max_x.ceil().max(x0);
        let y1 = max_y.ceil().max(y0);
        Rect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32)
    }
}
