//! Encoding options and process-level tuning knobs.

use crate::qrcode::{EcLevel, Mask, Version};
use std::sync::OnceLock;

/// Parameters of one encode call.
///
/// ```rust
/// use qrenc::{EcLevel, EncodeOptions, Mask, Version};
///
/// let options = EncodeOptions::new(EcLevel::High)
///     .with_version(Version::new(3))
///     .auto_extend(true)
///     .with_mask(Mask::new(4));
/// assert_eq!(options.version, Some(Version::new(3)));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncodeOptions {
    pub level: EcLevel,
    /// Fixed version, or `None` to use the smallest version that fits.
    pub version: Option<Version>,
    /// Allow growing past a fixed version that is too small.
    pub auto_extend: bool,
    /// Fixed mask, or `None` to pick the lowest-penalty mask.
    pub mask: Option<Mask>,
}

impl EncodeOptions {
    /// Automatic version and mask at `level`.
    pub fn new(level: EcLevel) -> Self {
        Self { level, version: None, auto_extend: false, mask: None }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn auto_extend(mut self, auto_extend: bool) -> Self {
        self.auto_extend = auto_extend;
        self
    }

    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new(EcLevel::Medium)
    }
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static PARALLEL_MASKS: OnceLock<bool> = OnceLock::new();

/// Whether the eight mask candidates are scored on the rayon pool (`QR_PARALLEL_MASKS`,
/// default on). Read once per process.
pub(crate) fn parallel_masks() -> bool {
    *PARALLEL_MASKS.get_or_init(|| parse_env_bool_u8("QR_PARALLEL_MASKS", true))
}
