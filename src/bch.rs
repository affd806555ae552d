//! Polynomial division over GF(2) for the version and format information words.

use crate::qrcode::{EcLevel, Mask};

/// Generator of the (18, 6) Golay code protecting version information.
pub const VERSION_INFO_GENERATOR: u32 = 0x1F25;

/// Generator of the (15, 5) BCH code protecting format information.
pub const FORMAT_INFO_GENERATOR: u32 = 0x0537;

/// XOR mask applied to the format information word so it is never all zero.
pub const FORMAT_INFO_MASK: u32 = 0x5412;

/// Remainder of `value · x^k` divided by `generator`, where `k` is the degree of the generator.
pub fn gf2_remainder(value: u32, generator: u32) -> u32 {
    let degree = 31 - generator.leading_zeros();
    let mut rem = value;
    for _ in 0..degree {
        rem = (rem << 1) ^ ((rem >> (degree - 1)) * generator);
    }
    rem & ((1 << degree) - 1)
}

/// The 18-bit version information word: 6 version bits then a 12-bit remainder.
pub fn version_info_bits(version: u8) -> u32 {
    let ver = u32::from(version);
    (ver << 12) | gf2_remainder(ver, VERSION_INFO_GENERATOR)
}

/// The masked 15-bit format information word for a level and mask pattern.
pub fn format_info_bits(level: EcLevel, mask: Mask) -> u32 {
    let data = u32::from((level.format_bits() << 3) | mask.value());
    ((data << 10) | gf2_remainder(data, FORMAT_INFO_GENERATOR)) ^ FORMAT_INFO_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        // Annex D: version 7 encodes as 000111 110010 010100.
        assert_eq!(version_info_bits(7), 0x07C94);
        assert_eq!(version_info_bits(7) >> 12, 7);
    }

    #[test]
    fn test_format_info() {
        assert_eq!(format_info_bits(EcLevel::Medium, Mask::new(0)), 0x5412);
        assert_eq!(format_info_bits(EcLevel::Low, Mask::new(0)), 0x77C4);
        assert_eq!(format_info_bits(EcLevel::High, Mask::new(0)), 0x1689);
    }

    // Long division of a whole codeword; zero when `generator` divides it.
    fn long_division_remainder(word: u32, generator: u32) -> u32 {
        let degree = 31 - generator.leading_zeros();
        let mut rem = word;
        for bit in (degree..32).rev() {
            if rem & (1 << bit) != 0 {
                rem ^= generator << (bit - degree);
            }
        }
        rem
    }

    #[test]
    fn test_version_info_table() {
        // Annex D, versions 7 to 40.
        let expected: [u32; 34] = [
            0x07C94, 0x085BC, 0x09A99, 0x0A4D3, 0x0BBF6, 0x0C762, 0x0D847, 0x0E60D, 0x0F928,
            0x10B78, 0x1145D, 0x12A17, 0x13532, 0x149A6, 0x15683, 0x168C9, 0x177EC, 0x18EC4,
            0x191E1, 0x1AFAB, 0x1B08E, 0x1CC1A, 0x1D33F, 0x1ED75, 0x1F250, 0x209D5, 0x216F0,
            0x228BA, 0x2379F, 0x24B0B, 0x2542E, 0x26A64, 0x27541, 0x28C69,
        ];
        for (v, &word) in (7..=40u8).zip(&expected) {
            assert_eq!(version_info_bits(v), word, "version {}", v);
        }
    }

    #[test]
    fn test_words_divide_by_generator() {
        for v in 7..=40u8 {
            let word = version_info_bits(v);
            assert!(word < 1 << 18);
            assert_eq!(long_division_remainder(word, VERSION_INFO_GENERATOR), 0);
        }
        for level in [EcLevel::Low, EcLevel::Medium, EcLevel::Quartile, EcLevel::High] {
            for mask in Mask::ALL {
                let word = format_info_bits(level, mask);
                assert!(word < 1 << 15);
                let unmasked = word ^ FORMAT_INFO_MASK;
                assert_eq!(long_division_remainder(unmasked, FORMAT_INFO_GENERATOR), 0);
                assert_eq!(unmasked >> 10, u32::from(level.format_bits() << 3 | mask.value()));
            }
        }
        assert_ne!(long_division_remainder(0x07C95, VERSION_INFO_GENERATOR), 0);
    }
}
