//! Helpers for the command-line tool and the benches: frame loading,
//! quick image statistics and dataset iteration.

#![allow(clippy::items_after_test_module)]

use crate::error::Result;
use crate::models::{BitMatrix, FrameBuf};
use image::GenericImageView;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn max_dim_from_env() -> Option<u32> {
    match env::var("BARSCAN_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image file as an owned RGB frame.
///
/// When `BARSCAN_MAX_DIM` is set, images whose longer side exceeds it are
/// shrunk first.
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<FrameBuf> {
    let img = image::open(path)?;
    let rgb = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgb8(),
        _ => img.to_rgb8(),
    };
    let (width, height) = rgb.dimensions();
    FrameBuf::new(rgb.into_raw(), width, height, 3)
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for an ink mask.
#[derive(Debug, Clone, Copy)]
pub struct MaskStats {
    /// Count of ink cells.
    pub ink_pixels: usize,
    /// Total cells in the mask.
    pub total_pixels: usize,
    /// Ratio of ink cells to total cells.
    pub ink_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = if gray.is_empty() {
        0
    } else {
        (sum / gray.len() as u64) as u8
    };
    GrayStats { min, max, avg }
}

/// Compute ink stats for a mask.
pub fn mask_stats(mask: &BitMatrix) -> MaskStats {
    let ink = mask.count_ones();
    let total = mask.width() * mask.height();
    let ratio = if total == 0 {
        0.0
    } else {
        ink as f64 / total as f64
    };
    MaskStats {
        ink_pixels: ink,
        total_pixels: total,
        ink_ratio: ratio,
    }
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("BARSCAN_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/images"))
}

/// Default bench limit from environment variables.
///
/// Returns `None` (full dataset) when `BARSCAN_BENCH_LIMIT` is unset or `0`.
pub fn bench_limit_from_env() -> Option<usize> {
    match env::var("BARSCAN_BENCH_LIMIT") {
        Ok(value) => value
            .parse::<usize>()
            .ok()
            .and_then(|v| if v == 0 { None } else { Some(v) }),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("barscan_tools_{nanos}_{sequence}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn dataset_iter_finds_images_sorted_and_limited() {
        let dir = temp_dir();
        fs::create_dir_all(dir.join("nested")).unwrap();
        for name in ["b.png", "a.JPG", "nested/c.bmp", "notes.txt"] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        let all: Vec<_> = dataset_iter(&dir, None, false).collect();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0] <= w[1]));

        let limited: Vec<_> = dataset_iter(&dir, Some(2), false).collect();
        assert_eq!(limited.len(), 2);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn smoke_list_restricts_dataset() {
        let dir = temp_dir();
        for name in ["a.png", "b.png"] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        fs::write(dir.join("_smoke.txt"), "# quick\nb.png\nmissing.png\n").unwrap();
        let smoke: Vec<_> = dataset_iter(&dir, None, true).collect();
        assert_eq!(smoke, vec![dir.join("b.png")]);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn stats_of_small_inputs() {
        let stats = grayscale_stats(&[10, 20, 30]);
        assert_eq!((stats.min, stats.max, stats.avg), (10, 30, 20));

        let mask = BitMatrix::from_fn(4, 2, |x, _| x < 1);
        let stats = mask_stats(&mask);
        assert_eq!(stats.ink_pixels, 2);
        assert!((stats.ink_ratio - 0.25).abs() < 1e-12);
    }
}

/// Smoke test flag from environment variables.
pub fn smoke_from_env() -> bool {
    matches!(
        env::var("BARSCAN_SMOKE").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

/// Iterate dataset image paths with optional smoke list and limit.
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
    smoke: bool,
) -> impl Iterator<Item = PathBuf> {
    let root = root.as_ref();
    let mut images = if smoke {
        load_smoke_list(root).unwrap_or_else(|| collect_images(root))
    } else {
        collect_images(root)
    };

    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn load_smoke_list(root: &Path) -> Option<Vec<PathBuf>> {
    let contents = fs::read_to_string(root.join("_smoke.txt")).ok()?;
    let paths: Vec<PathBuf> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let candidate = Path::new(line);
            if candidate.is_absolute() {
                candidate.to_path_buf()
            } else {
                root.join(candidate)
            }
        })
        .filter(|path| path.exists())
        .collect();
    if paths.is_empty() { None } else { Some(paths) }
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let is_image = path.extension().is_some_and(|ext| {
                matches!(
                    ext.to_string_lossy().to_lowercase().as_str(),
                    "png" | "jpg" | "jpeg" | "gif" | "bmp"
                )
            });
            if is_image {
                images.push(path);
            }
        }
    }

    images
}
