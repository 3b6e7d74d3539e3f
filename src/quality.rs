//! Mapping of the single 1-100 quality knob onto each backend's parameter space.

use crate::constants::{MAX_LOSSLESS_LEVEL, MAX_QUALITY, MIN_LOSSLESS_LEVEL, MIN_QUALITY};
use crate::error::{CompressionError, Result};

/// A validated quality value in `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualityRequest(u8);

impl QualityRequest {
    pub fn new(quality: u8) -> Result<Self> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }
        Ok(Self(quality))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn lossless_level(&self) -> u8 {
        to_lossless_level(*self)
    }

    pub fn lossy_fraction(&self) -> f32 {
        to_lossy_quality_fraction(*self)
    }
}

impl TryFrom<u8> for QualityRequest {
    type Error = CompressionError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

/// Rescales quality onto the lossless effort level.
///
/// Level 0 is the fastest encode and level 6 the most thorough one. The mapping
/// is `round((q - 1) / 99 * 6)`, so `1 -> 0` and `100 -> 6`.
pub fn to_lossless_level(quality: QualityRequest) -> u8 {
    let span = f64::from(MAX_LOSSLESS_LEVEL - MIN_LOSSLESS_LEVEL);
    let scaled = f64::from(quality.0 - MIN_QUALITY) / f64::from(MAX_QUALITY - MIN_QUALITY) * span;
    let level = scaled.round() as u8 + MIN_LOSSLESS_LEVEL;
    level.clamp(MIN_LOSSLESS_LEVEL, MAX_LOSSLESS_LEVEL)
}

/// Quality as the lossy encoder's fraction in `(0, 1]`; `100 -> 1.0` exactly.
pub fn to_lossy_quality_fraction(quality: QualityRequest) -> f32 {
    f32::from(quality.0) / f32::from(MAX_QUALITY)
}
