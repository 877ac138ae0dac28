//! Runtime knobs for a [`crate::Scanner`]
//!
//! Defaults reproduce the standard pipeline. `ScanConfig::from_env` lets a
//! deployment override the cost-related settings without a rebuild:
//!
//! | variable | field |
//! |---|---|
//! | `BARSCAN_WORK_WIDTH` | `working_width` |
//! | `BARSCAN_WORK_HEIGHT` | `working_height` |
//! | `BARSCAN_MAX_REGIONS` | `max_regions` |
//! | `BARSCAN_STRUCTURED` | `structured_pass` (0 disables) |

/// Pipeline settings
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Width the region proposer works at
    pub working_width: u32,
    /// Height the region proposer works at
    pub working_height: u32,
    /// Upper bound on deduplicated regions tried by the curved-region pass
    pub max_regions: usize,
    /// Run the structured-detector pass
    pub structured_pass: bool,
    /// Try the upscaled variant on narrow regions
    pub upscale_variant: bool,
    /// Try the locally equalized (CLAHE) variant
    pub contrast_variant: bool,
    /// Try the unsharp-masked variant
    pub sharpen_variant: bool,
    /// Regions narrower than this get the upscaled variant
    pub upscale_below_width: u32,
    /// Width the upscaled variant aims for
    pub upscale_target_width: f64,
    /// Cap on the upscale factor
    pub max_upscale: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            working_width: 320,
            working_height: 240,
            max_regions: 32,
            structured_pass: true,
            upscale_variant: true,
            contrast_variant: true,
            sharpen_variant: true,
            upscale_below_width: 150,
            upscale_target_width: 200.0,
            max_upscale: 3.0,
        }
    }
}

impl ScanConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            working_width: parse_env_u32("BARSCAN_WORK_WIDTH", defaults.working_width).max(1),
            working_height: parse_env_u32("BARSCAN_WORK_HEIGHT", defaults.working_height).max(1),
            max_regions: parse_env_usize("BARSCAN_MAX_REGIONS", defaults.max_regions),
            structured_pass: parse_env_bool_u8("BARSCAN_STRUCTURED", defaults.structured_pass),
            ..defaults
        }
    }

    /// Working resolution as `(width, height)`
    pub fn working_size(&self) -> (u32, u32) {
        (self.working_width, self.working_height)
    }
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}
