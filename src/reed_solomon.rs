//! Reed-Solomon error correction over GF(256).
//!
//! The field uses the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D) with
//! generator element 2. Multiplication goes through log/antilog tables computed at
//! compile time, and the generator polynomials are built once on first use.

use crate::error::{QrError, Result};
use std::sync::OnceLock;

const PRIMITIVE: u16 = 0x11D;

/// Smallest generator degree kept in the precomputed table.
pub const MIN_DEGREE: usize = 7;
/// Largest generator degree kept in the precomputed table.
pub const MAX_DEGREE: usize = 68;

const fn build_tables() -> ([u8; 255], [u8; 256]) {
    let mut exp = [0u8; 255];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 255], [u8; 256]) = build_tables();

/// Antilog table: `EXP[i]` is 2^i.
pub(crate) static EXP: [u8; 255] = TABLES.0;
/// Log table: `LOG[x]` is the exponent of `x`. `LOG[0]` is unused.
pub(crate) static LOG: [u8; 256] = TABLES.1;

/// Product of two field elements.
pub fn multiply(x: u8, y: u8) -> u8 {
    if x == 0 || y == 0 {
        return 0;
    }
    EXP[(usize::from(LOG[usize::from(x)]) + usize::from(LOG[usize::from(y)])) % 255]
}

/// Coefficients of (x - 2^0)(x - 2^1)...(x - 2^(degree-1)), highest power first with the
/// leading 1 dropped, stored as discrete logs.
fn generator_log_coefficients(degree: usize) -> Vec<u8> {
    let mut divisor = vec![0u8; degree];
    divisor[degree - 1] = 1;
    let mut root: u8 = 1;
    for _ in 0..degree {
        for j in 0..degree {
            divisor[j] = multiply(divisor[j], root);
            if j + 1 < degree {
                divisor[j] ^= divisor[j + 1];
            }
        }
        root = multiply(root, 0x02);
    }
    debug_assert!(divisor.iter().all(|&c| c != 0));
    divisor.iter().map(|&c| LOG[usize::from(c)]).collect()
}

fn generators() -> &'static [Vec<u8>] {
    static GENERATORS: OnceLock<Vec<Vec<u8>>> = OnceLock::new();
    GENERATORS.get_or_init(|| (MIN_DEGREE..=MAX_DEGREE).map(generator_log_coefficients).collect())
}

/// Computes error correction codewords for blocks of one fixed degree.
#[derive(Clone, Copy, Debug)]
pub struct ReedSolomonEncoder {
    generator: &'static [u8],
}

impl ReedSolomonEncoder {
    /// Encoder producing `degree` error correction codewords per block.
    ///
    /// # Errors
    ///
    /// [`QrError::InvalidParameter`] if `degree` is outside 7..=68.
    pub fn new(degree: usize) -> Result<Self> {
        if !(MIN_DEGREE..=MAX_DEGREE).contains(&degree) {
            return Err(QrError::InvalidParameter(format!(
                "Reed-Solomon degree {} out of range {}..={}",
                degree, MIN_DEGREE, MAX_DEGREE
            )));
        }
        Ok(Self { generator: &generators()[degree - MIN_DEGREE] })
    }

    pub fn degree(&self) -> usize {
        self.generator.len()
    }

    /// Writes the remainder of `data · x^degree` divided by the generator into `result`.
    pub fn compute_remainder(&self, data: &[u8], result: &mut [u8]) {
        assert_eq!(result.len(), self.degree());
        result.fill(0);
        for &b in data {
            let factor = b ^ result[0];
            result.copy_within(1.., 0);
            let last = result.len() - 1;
            result[last] = 0;
            if factor == 0 {
                continue;
            }
            let factor_log = usize::from(LOG[usize::from(factor)]);
            for (x, &g) in result.iter_mut().zip(self.generator) {
                *x ^= EXP[(usize::from(g) + factor_log) % 255];
            }
        }
    }

    /// The error correction codewords for one block of data codewords.
    pub fn ecc_codewords(&self, data: &[u8]) -> Vec<u8> {
        let mut ecc = vec![0u8; self.degree()];
        self.compute_remainder(data, &mut ecc);
        ecc
    }
}
