/// Greedy overlap filter across the regions of all masks
use crate::models::CandidateRegion;

/// Overlap (intersection over the smaller area) above which a region is a duplicate
pub const OVERLAP_THRESHOLD: f64 = 0.6;

/// Keep each region unless it overlaps an already kept one by more than
/// [`OVERLAP_THRESHOLD`]. Input order decides which of two duplicates survives;
/// boxes are never merged.
pub fn deduplicate(regions: Vec<CandidateRegion>) -> Vec<CandidateRegion> {
    let mut kept: Vec<CandidateRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        let duplicate = kept
            .iter()
            .any(|k| k.rect.overlap_ratio(&region.rect) > OVERLAP_THRESHOLD);
        if !duplicate {
            kept.push(region);
        }
    }
    kept
}
