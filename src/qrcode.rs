//! QR code symbol construction.
//!
//! This module ties the pipeline together: it selects a version, builds the data codewords,
//! adds Reed-Solomon error correction, places everything into a module grid and applies the
//! winning mask. It also holds the small value types shared by every stage.

use crate::bitstream;
use crate::config::EncodeOptions;
use crate::error::{QrError, Result};
use crate::interleave;
use crate::mask;
use crate::matrix::ModuleMatrix;
use crate::version;
use core::convert::TryFrom;
use tracing::debug;

/// A finished QR Code symbol: a square grid of dark and light modules.
///
/// Instances are immutable after creation and own their grid outright; nothing inside the
/// encoder keeps a reference to a returned symbol.
///
/// # Example
///
/// ```rust
/// use qrenc::{EcLevel, EncodeOptions, Symbol};
///
/// let options = EncodeOptions::new(EcLevel::Low);
/// let qr = Symbol::encode(b"Hello, World!", &options).unwrap();
///
/// println!("Version: {}", qr.version().value());
/// assert_eq!(qr.size(), 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Symbol {
    /// The width and height of this symbol, measured in modules, between
    /// 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: usize,
    version: Version,
    level: EcLevel,
    mask: Mask,
    /// The modules of this symbol (false = light, true = dark), row-major.
    modules: Vec<bool>,
}

impl Symbol {
    /// Encodes arbitrary bytes into a symbol.
    ///
    /// The input is split into numeric, alphanumeric, byte and Kanji runs, the version is chosen
    /// from `options` (automatically when no version is fixed), and the mask is either fixed or
    /// picked by penalty score.
    ///
    /// # Errors
    ///
    /// * [`QrError::EmptyInput`] if `data` is empty.
    /// * [`QrError::CapacityExceeded`] if no allowed version holds the data.
    pub fn encode(data: &[u8], options: &EncodeOptions) -> Result<Self> {
        if data.is_empty() {
            return Err(QrError::EmptyInput);
        }
        let level = options.level;

        let selection =
            version::select_version(data, level, options.version, options.auto_extend)?;
        let ver = selection.version;
        debug!(
            version = ver.value(),
            bits = selection.bit_length,
            segments = selection.segments.len(),
            "version selected"
        );

        let datacodewords =
            bitstream::encode_data_codewords(data, &selection.segments, ver, level)?;
        let blocks = interleave::split_into_blocks(&datacodewords, ver, level)?;
        let allcodewords = interleave::interleave(&blocks);

        let mut matrix = ModuleMatrix::with_function_patterns(ver);
        let placed = matrix.place_codewords(&allcodewords);
        if placed != allcodewords.len() * 8 {
            return Err(QrError::BitstreamOverflow {
                needed: allcodewords.len() * 8,
                capacity: placed,
            });
        }

        let (matrix, msk) = mask::apply_best_mask(matrix, level, options.mask);
        Ok(Self::from_matrix(&matrix, ver, level, msk))
    }

    /// Encodes a text string at the given level with automatic version and mask.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrenc::{EcLevel, Symbol};
    ///
    /// let qr = Symbol::encode_text("HELLO WORLD", EcLevel::Quartile).unwrap();
    /// assert_eq!(qr.version().value(), 1);
    /// ```
    pub fn encode_text(text: &str, level: EcLevel) -> Result<Self> {
        Self::encode(text.as_bytes(), &EncodeOptions::new(level))
    }

    fn from_matrix(matrix: &ModuleMatrix, version: Version, level: EcLevel, mask: Mask) -> Self {
        let size = matrix.size();
        let mut modules = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                modules.push(matrix.get(x, y));
            }
        }
        Self { size, version, level, mask, modules }
    }

    /// Returns this symbol's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this symbol's size, in the range [21, 177].
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns this symbol's error correction level.
    pub fn ec_level(&self) -> EcLevel {
        self.level
    }

    /// Returns the mask applied to this symbol, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the
    /// symbol return `false`, so a renderer can draw a quiet zone by reading past the edges.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size as i32;
        range.contains(&x)
            && range.contains(&y)
            && self.modules[y as usize * self.size + x as usize]
    }

    /// All modules in row-major order, `size * size` entries.
    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    /// Iterates over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks(self.size)
    }

    /// Reads back the 15-bit format information word from the strip around the
    /// top-left finder pattern.
    pub fn format_info(&self) -> u16 {
        let mut bits: u16 = 0;
        let mut put = |i: u16, x: i32, y: i32| {
            if self.get_module(x, y) {
                bits |= 1 << i;
            }
        };
        for i in 0..6 {
            put(i, 8, i32::from(i));
        }
        put(6, 8, 7);
        put(7, 8, 8);
        put(8, 7, 8);
        for i in 9..15 {
            put(i, 14 - i32::from(i), 8);
        }
        bits
    }
}

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EcLevel {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl EcLevel {
    /// Table index, L = 0 through H = 3.
    pub fn ordinal(self) -> usize {
        use EcLevel::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// The two level bits of the format information word.
    pub fn format_bits(self) -> u8 {
        use EcLevel::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

impl TryFrom<i32> for EcLevel {
    type Error = QrError;

    fn try_from(value: i32) -> Result<Self> {
        use EcLevel::*;
        match value {
            0 => Ok(Low),
            1 => Ok(Medium),
            2 => Ok(Quartile),
            3 => Ok(High),
            _ => Err(QrError::InvalidParameter(format!(
                "error correction level {} out of range 0..=3",
                value
            ))),
        }
    }
}

/// Size class of a version, deciding the width of character count indicators.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum VersionGroup {
    /// Versions 1 to 9.
    Small,
    /// Versions 10 to 26.
    Medium,
    /// Versions 27 to 40.
    Large,
}

impl VersionGroup {
    /// All groups, smallest first.
    pub const ALL: [VersionGroup; 3] =
        [VersionGroup::Small, VersionGroup::Medium, VersionGroup::Large];

    pub(crate) fn index(self) -> usize {
        match self {
            VersionGroup::Small => 0,
            VersionGroup::Medium => 1,
            VersionGroup::Large => 2,
        }
    }

    /// Versions belonging to this group, in ascending order.
    pub fn versions(self) -> impl Iterator<Item = Version> {
        let (lo, hi) = match self {
            VersionGroup::Small => (1, 9),
            VersionGroup::Medium => (10, 26),
            VersionGroup::Large => (27, 40),
        };
        (lo..=hi).map(Version)
    }

    /// The largest version in this group.
    pub fn last(self) -> Version {
        match self {
            VersionGroup::Small => Version(9),
            VersionGroup::Medium => Version(26),
            VersionGroup::Large => Version(40),
        }
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40]. Use `Version::try_from` for
    /// untrusted input.
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of a symbol of this version, in modules.
    pub const fn size(self) -> usize {
        (self.0 as usize) * 4 + 17
    }

    /// The group this version's count indicators are sized for.
    pub fn group(self) -> VersionGroup {
        match self.0 {
            1..=9 => VersionGroup::Small,
            10..=26 => VersionGroup::Medium,
            _ => VersionGroup::Large,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = QrError;

    fn try_from(value: u8) -> Result<Self> {
        if (Version::MIN.value()..=Version::MAX.value()).contains(&value) {
            Ok(Version(value))
        } else {
            Err(QrError::InvalidParameter(format!("version {} out of range 1..=40", value)))
        }
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mask(u8);

impl Mask {
    /// All eight patterns in ascending order.
    pub const ALL: [Mask; 8] =
        [Mask(0), Mask(1), Mask(2), Mask(3), Mask(4), Mask(5), Mask(6), Mask(7)];

    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Mask {
    type Error = QrError;

    fn try_from(value: u8) -> Result<Self> {
        if value <= 7 {
            Ok(Mask(value))
        } else {
            Err(QrError::InvalidParameter(format!("mask {} out of range 0..=7", value)))
        }
    }
}
