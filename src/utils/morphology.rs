/// Binary morphology with centred rectangular structuring elements.
///
/// Cells outside the matrix never contribute: they do not add ink when
/// dilating and do not remove ink when eroding.
use crate::models::BitMatrix;

/// Rectangular structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
}

impl Kernel {
    /// Create a `width` x `height` rectangle
    pub const fn rect(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    fn window(&self, x: usize, y: usize, mw: usize, mh: usize) -> (usize, usize, usize, usize) {
        let (ax, ay) = (self.width / 2, self.height / 2);
        let x0 = x.saturating_sub(ax);
        let y0 = y.saturating_sub(ay);
        let x1 = (x + (self.width - 1 - ax)).min(mw - 1);
        let y1 = (y + (self.height - 1 - ay)).min(mh - 1);
        (x0, y0, x1, y1)
    }
}

/// Ink wherever any cell under the kernel is ink
pub fn dilate(matrix: &BitMatrix, kernel: Kernel) -> BitMatrix {
    let (w, h) = (matrix.width(), matrix.height());
    BitMatrix::from_fn(w, h, |x, y| {
        let (x0, y0, x1, y1) = kernel.window(x, y, w, h);
        (y0..=y1).any(|yy| (x0..=x1).any(|xx| matrix.get(xx, yy)))
    })
}

/// Ink only where every in-bounds cell under the kernel is ink
pub fn erode(matrix: &BitMatrix, kernel: Kernel) -> BitMatrix {
    let (w, h) = (matrix.width(), matrix.height());
    BitMatrix::from_fn(w, h, |x, y| {
        let (x0, y0, x1, y1) = kernel.window(x, y, w, h);
        (y0..=y1).all(|yy| (x0..=x1).all(|xx| matrix.get(xx, yy)))
    })
}

/// Dilate then erode: fills gaps narrower than the kernel
pub fn close(matrix: &BitMatrix, kernel: Kernel) -> BitMatrix {
    erode(&dilate(matrix, kernel), kernel)
}

/// Erode then dilate: removes features narrower than the kernel
pub fn open(matrix: &BitMatrix, kernel: Kernel) -> BitMatrix {
    dilate(&erode(matrix, kernel), kernel)
}
