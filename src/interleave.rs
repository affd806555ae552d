//! Splitting data codewords into Reed-Solomon blocks and interleaving the result.

use crate::error::{QrError, Result};
use crate::qrcode::{EcLevel, Version};
use crate::reed_solomon::ReedSolomonEncoder;
use crate::tables::version_info;

/// One Reed-Solomon block: its slice of the data codewords and their error correction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CodewordBlock {
    pub data: Vec<u8>,
    pub ecc: Vec<u8>,
}

/// Splits `data` into the blocks of `version` at `level`, first group first, and computes
/// each block's error correction codewords.
///
/// # Errors
///
/// [`QrError::InvalidParameter`] if `data` is not exactly the version's data codeword count.
pub fn split_into_blocks(
    data: &[u8],
    version: Version,
    level: EcLevel,
) -> Result<Vec<CodewordBlock>> {
    let info = version_info(version);
    if data.len() != info.data_codewords(level) {
        return Err(QrError::InvalidParameter(format!(
            "{} data codewords given, version {} at {:?} takes {}",
            data.len(),
            version.value(),
            level,
            info.data_codewords(level)
        )));
    }
    let groups = info.blocks(level);
    let rs = ReedSolomonEncoder::new(groups[0].ecc())?;

    let mut blocks = Vec::with_capacity(info.block_count(level));
    let mut rest = data;
    for group in &groups {
        for _ in 0..group.count {
            let (dat, tail) = rest.split_at(group.data);
            blocks.push(CodewordBlock { data: dat.to_vec(), ecc: rs.ecc_codewords(dat) });
            rest = tail;
        }
    }
    debug_assert!(rest.is_empty());
    Ok(blocks)
}

/// Reads the blocks column by column: every block's first data codeword, then every block's
/// second, and so on, skipping blocks that have run out; then the error correction codewords
/// in the same order.
pub fn interleave(blocks: &[CodewordBlock]) -> Vec<u8> {
    let total = blocks.iter().map(|b| b.data.len() + b.ecc.len()).sum();
    let mut result = Vec::with_capacity(total);
    let longest = blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
    for i in 0..longest {
        result.extend(blocks.iter().filter_map(|b| b.data.get(i)));
    }
    let ecclen = blocks.first().map_or(0, |b| b.ecc.len());
    for i in 0..ecclen {
        result.extend(blocks.iter().filter_map(|b| b.ecc.get(i)));
    }
    result
}
