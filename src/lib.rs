//! # qrenc
//!
//! A QR Code Model 2 encoder: arbitrary bytes in, a square grid of dark and light modules out.
//!
//! The input is split into numeric, alphanumeric, byte and Kanji runs, serialised into data
//! codewords for the smallest version that holds them, protected with Reed-Solomon error
//! correction, laid out in the module grid and masked with the pattern that scores the lowest
//! penalty. Versions 1 to 40 and all four error correction levels are supported.
//!
//! Rendering is left to the caller: a [`Symbol`] exposes its modules as booleans.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrenc = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qrenc::{EcLevel, EncodeOptions, Symbol};
//!
//! let qr = Symbol::encode(b"https://example.com", &EncodeOptions::new(EcLevel::Medium)).unwrap();
//! for row in qr.rows() {
//!     let line: String = row.iter().map(|&dark| if dark { "##" } else { "  " }).collect();
//!     println!("{}", line);
//! }
//! ```
//!
//! The C-style boundary with integer parameters is available as [`encode_data`].
//!
//! ## Modules
//!
//! - [`qrcode`]: the finished [`Symbol`] and the value types shared by every stage.
//! - [`segment`], [`bitstream`], [`version`]: from bytes to data codewords.
//! - [`reed_solomon`], [`interleave`]: error correction and block interleaving.
//! - [`matrix`], [`mask`], [`bch`]: the module grid, masking and format/version information.

#![forbid(unsafe_code)]

pub mod bch;
pub mod bitstream;
pub mod config;
pub mod error;
pub mod interleave;
pub mod mask;
pub mod matrix;
pub mod qrcode;
pub mod reed_solomon;
pub mod segment;
pub mod tables;
pub mod version;

pub use config::EncodeOptions;
pub use error::{QrError, Result};
pub use qrcode::{EcLevel, Mask, Symbol, Version, VersionGroup};
pub use segment::Mode;

/// Encodes `source` with integer parameters.
///
/// * `level` - 0 = L, 1 = M, 2 = Q, 3 = H.
/// * `version` - 0 for automatic, else 1 to 40.
/// * `auto_extend` - allow a larger version than a fixed `version` when the data needs it.
/// * `mask` - -1 for automatic, else 0 to 7.
/// * `length` - bytes of `source` to encode; 0 reads up to the first NUL byte, or the whole
///   slice when it has none.
///
/// All parameters are checked before any encoding work starts.
///
/// # Errors
///
/// [`QrError::InvalidParameter`] for an out-of-range argument, otherwise whatever
/// [`Symbol::encode`] reports.
///
/// ```rust
/// let qr = qrenc::encode_data(1, 0, false, -1, b"01234567\0", 0).unwrap();
/// assert_eq!(qr.size(), 21);
/// assert_eq!(qr.mask().value(), 2);
/// ```
pub fn encode_data(
    level: i32,
    version: i32,
    auto_extend: bool,
    mask: i32,
    source: &[u8],
    length: usize,
) -> Result<Symbol> {
    let level = EcLevel::try_from(level)?;
    let version = match version {
        0 => None,
        v => Some(
            u8::try_from(v)
                .map_err(|_| {
                    QrError::InvalidParameter(format!("version {} out of range 1..=40", v))
                })
                .and_then(Version::try_from)?,
        ),
    };
    let mask = match mask {
        -1 => None,
        m => Some(
            u8::try_from(m)
                .map_err(|_| QrError::InvalidParameter(format!("mask {} out of range 0..=7", m)))
                .and_then(Mask::try_from)?,
        ),
    };
    let data = match length {
        0 => source.iter().position(|&b| b == 0).map_or(source, |end| &source[..end]),
        n if n <= source.len() => &source[..n],
        n => {
            return Err(QrError::InvalidParameter(format!(
                "length {} exceeds the {} source bytes",
                n,
                source.len()
            )));
        }
    };
    let options = EncodeOptions { level, version, auto_extend, mask };
    Symbol::encode(data, &options)
}

/// A reusable encoder bound to one set of options.
///
/// Each call builds its own buffers, so calls never see each other's state and one encoder
/// can be shared between threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct QrEncoder {
    options: EncodeOptions,
}

impl QrEncoder {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes `data` with this encoder's options.
    pub fn encode(&self, data: &[u8]) -> Result<Symbol> {
        Symbol::encode(data, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_data_validates_parameters() {
        let data = b"HELLO";
        let cases = [(4, 0, -1), (-1, 0, -1), (0, 41, -1), (0, -3, -1), (0, 0, 8), (0, 0, -2)];
        for (level, version, mask) in cases {
            let result = encode_data(level, version, false, mask, data, 5);
            assert!(
                matches!(result, Err(QrError::InvalidParameter(_))),
                "{} {} {}",
                level,
                version,
                mask
            );
        }
        assert!(matches!(encode_data(0, 0, false, -1, data, 6), Err(QrError::InvalidParameter(_))));
    }

    #[test]
    fn test_encode_data_length_rules() {
        let whole = encode_data(0, 0, false, -1, b"HELLO", 0).unwrap();
        let terminated = encode_data(0, 0, false, -1, b"HELLO\0garbage", 0).unwrap();
        let explicit = encode_data(0, 0, false, -1, b"HELLO WORLD", 5).unwrap();
        assert_eq!(whole, terminated);
        assert_eq!(whole, explicit);
        assert_eq!(encode_data(0, 0, false, -1, b"\0HELLO", 0), Err(QrError::EmptyInput));
    }

    #[test]
    fn test_encode_data_matches_typed_api() {
        let raw = encode_data(3, 5, false, 6, b"qrenc", 0).unwrap();
        let options = EncodeOptions::new(EcLevel::High)
            .with_version(Version::new(5))
            .with_mask(Mask::new(6));
        assert_eq!(raw, Symbol::encode(b"qrenc", &options).unwrap());
        assert_eq!(raw.version(), Version::new(5));
        assert_eq!(raw.mask(), Mask::new(6));
    }

    #[test]
    fn test_encoder_reuse_has_no_state() {
        let encoder = QrEncoder::new(EncodeOptions::new(EcLevel::Low));
        let small = encoder.encode(b"A").unwrap();
        let large = encoder.encode(&[b'x'; 500]).unwrap();
        assert!(large.size() > small.size());
        assert_eq!(encoder.encode(b"A").unwrap(), small);
        assert_eq!(encoder.options().level, EcLevel::Low);
    }
}
