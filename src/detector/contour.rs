//! External contours of a mask and the area they enclose
//!
//! Border following is done by `imageproc`; the area is that of the traced
//! polygon through the boundary cell centres, so a solid `w` x `h` block
//! encloses `(w - 1) * (h - 1)`.
use crate::models::{BitMatrix, Rect};
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};

/// Outer boundary of a top-level ink component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalContour {
    /// Bounding box of the boundary cells
    pub bbox: Rect,
    /// Polygon area inside the boundary, holes included
    pub area: f64,
}

impl ExternalContour {
    /// Contour area over bounding-box area
    pub fn fill_ratio(&self) -> f64 {
        let area = self.bbox.area();
        if area == 0 {
            return 0.0;
        }
        self.area / area as f64
    }
}

/// External (non-nested) 8-connected contours of a mask, in raster order of
/// their first cell. Components sitting inside another component's hole are
/// not reported.
pub fn find_external_contours(matrix: &BitMatrix) -> Vec<ExternalContour> {
    let (width, height) = (matrix.width(), matrix.height());
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let image = GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([if matrix.get(x as usize, y as usize) { 255 } else { 0 }])
    });

    find_contours::<i32>(&image)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| {
            let points: Vec<(i32, i32)> = c.points.iter().map(|p| (p.x, p.y)).collect();
            Some(ExternalContour {
                bbox: bounding_box(&points)?,
                area: polygon_area(&points),
            })
        })
        .collect()
}

fn bounding_box(points: &[(i32, i32)]) -> Option<Rect> {
    let x0 = points.iter().map(|p| p.0).min()?;
    let x1 = points.iter().map(|p| p.0).max()?;
    let y0 = points.iter().map(|p| p.1).min()?;
    let y1 = points.iter().map(|p| p.1).max()?;
    Some(Rect::new(
        x0 as u32,
        y0 as u32,
        (x1 - x0 + 1) as u32,
        (y1 - y0 + 1) as u32,
    ))
}

/// Shoelace area of a closed polygon
fn polygon_area(points: &[(i32, i32)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&(x0, y0), &(x1, y1))| x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64)
        .sum();
    twice.abs() as f64 / 2.0
}
