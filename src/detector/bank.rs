/// Fixed set of binarizations run over every working-resolution frame
use crate::models::BitMatrix;
use crate::utils::binarization::{adaptive_binarize, gradient_binarize, otsu_binarize};
use image::GrayImage;

/// One way of turning a luma image into an ink mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binarization {
    /// Gaussian-weighted local threshold
    Adaptive {
        /// Odd neighbourhood side
        block: usize,
        /// How much darker than the local mean a pixel must be
        offset: f32,
    },
    /// Global Otsu threshold
    Otsu,
    /// Sobel magnitude above `level`
    Gradient {
        /// Edge magnitude threshold
        level: f32,
    },
}

impl Binarization {
    /// Produce the mask for `gray`
    pub fn apply(&self, gray: &GrayImage) -> BitMatrix {
        match *self {
            Binarization::Adaptive { block, offset } => adaptive_binarize(gray, block, offset),
            Binarization::Otsu => otsu_binarize(gray),
            Binarization::Gradient { level } => gradient_binarize(gray, level),
        }
    }
}

/// Ordered list of binarizations; a mask's index is its position here
#[derive(Debug, Clone)]
pub struct BinarizationBank {
    methods: Vec<Binarization>,
}

impl BinarizationBank {
    /// The four standard masks: adaptive 21/5, adaptive 31/10, Otsu, gradient > 50
    pub fn standard() -> Self {
        Self {
            methods: vec![
                Binarization::Adaptive {
                    block: 21,
                    offset: 5.0,
                },
                Binarization::Adaptive {
                    block: 31,
                    offset: 10.0,
                },
                Binarization::Otsu,
                Binarization::Gradient { level: 50.0 },
            ],
        }
    }

    /// Methods in mask order
    pub fn methods(&self) -> &[Binarization] {
        &self.methods
    }

    /// Number of masks produced per frame
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True if the bank produces no masks
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// One mask per method, same size as `gray`
    pub fn binarize(&self, gray: &GrayImage) -> Vec<BitMatrix> {
        self.methods.iter().map(|m| m.apply(gray)).collect()
    }
}

impl Default for BinarizationBank {
    fn default() -> Self {
        Self::standard()
    }
}
