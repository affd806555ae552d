//! Serialisation of segments into the data codeword stream.

use crate::error::{QrError, Result};
use crate::qrcode::{EcLevel, Version, VersionGroup};
use crate::segment::{alphanumeric_value, is_kanji, is_numeric, kanji_value, Mode, Segment};
use crate::tables::version_info;

/// Pad codewords appended alternately after the terminator.
const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// An append-only sequence of bits, packed MSB-first, with a fixed capacity.
#[derive(Clone, Debug)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
    capacity: usize,
}

impl BitBuffer {
    /// Creates an empty buffer holding at most `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity((capacity + 7) / 8),
            length: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bits still free before the capacity is reached.
    pub fn remaining(&self) -> usize {
        self.capacity - self.length
    }

    /// Appends the low `len` bits of `val`, most significant first.
    ///
    /// # Errors
    ///
    /// [`QrError::BitstreamOverflow`] if the bits do not fit; the buffer is left unchanged.
    pub fn append_bits(&mut self, val: u16, len: u8) -> Result<()> {
        assert!(len <= 16 && u32::from(val) >> len == 0, "Value out of range");
        let needed = self.length + usize::from(len);
        if needed > self.capacity {
            return Err(QrError::BitstreamOverflow { needed, capacity: self.capacity });
        }
        for i in (0..len).rev() {
            let shift = 7 - (self.length & 7) as u8;
            let bit = ((val >> i) as u8) & 1;
            if shift == 7 {
                self.data.push(bit << shift);
            } else if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
        Ok(())
    }

    /// Writes one segment: mode indicator, character count and payload.
    ///
    /// The segment is checked in full before the first bit goes in, so on error the buffer is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// [`QrError::InvalidParameter`] if the segment runs past `data`, its bytes do not belong to
    /// its mode or its count does not fit the indicator of `group`;
    /// [`QrError::BitstreamOverflow`] if the segment does not fit the remaining capacity.
    pub fn write_segment(&mut self, data: &[u8], seg: &Segment, group: VersionGroup) -> Result<()> {
        let bytes = seg.bytes(data).ok_or_else(|| {
            QrError::InvalidParameter(format!(
                "segment of {} bytes at offset {} runs past the {} source bytes",
                seg.len,
                seg.offset,
                data.len()
            ))
        })?;
        if !seg.fits_count(group) {
            return Err(QrError::InvalidParameter(format!(
                "{:?} segment of {} characters overflows its count indicator",
                seg.mode,
                seg.char_count()
            )));
        }
        if let Some(byte) = first_invalid_byte(seg.mode, bytes) {
            return Err(QrError::InvalidParameter(format!(
                "byte {:#04x} cannot be encoded in {:?} mode",
                byte, seg.mode
            )));
        }
        let needed = self.length + seg.bit_length(group);
        if needed > self.capacity {
            return Err(QrError::BitstreamOverflow { needed, capacity: self.capacity });
        }

        self.append_bits(seg.mode.indicator(), 4)?;
        self.append_bits(seg.char_count() as u16, seg.mode.count_bits(group))?;
        match seg.mode {
            Mode::Numeric => {
                for chunk in bytes.chunks(3) {
                    let value = chunk.iter().fold(0, |acc, &b| acc * 10 + u16::from(b - b'0'));
                    self.append_bits(value, [0, 4, 7, 10][chunk.len()])?;
                }
            }
            Mode::Alphanumeric => {
                for chunk in bytes.chunks(2) {
                    let value = chunk
                        .iter()
                        .filter_map(|&b| alphanumeric_value(b))
                        .fold(0, |acc, code| acc * 45 + code);
                    self.append_bits(value, if chunk.len() == 2 { 11 } else { 6 })?;
                }
            }
            Mode::Byte => {
                for &b in bytes {
                    self.append_bits(u16::from(b), 8)?;
                }
            }
            Mode::Kanji => {
                for pair in bytes.chunks_exact(2) {
                    let code = u16::from(pair[0]) << 8 | u16::from(pair[1]);
                    self.append_bits(kanji_value(code), 13)?;
                }
            }
        }
        Ok(())
    }

    /// Appends the terminator, bit padding and pad codewords up to the capacity.
    ///
    /// The terminator is shortened when fewer than four bits remain.
    pub fn finish(&mut self) -> Result<()> {
        let terminator = self.remaining().min(4) as u8;
        self.append_bits(0, terminator)?;
        let fill = (8 - self.length % 8) % 8;
        self.append_bits(0, fill.min(self.remaining()) as u8)?;
        for &pad in PAD_BYTES.iter().cycle() {
            if self.remaining() < 8 {
                break;
            }
            self.append_bits(u16::from(pad), 8)?;
        }
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// The first byte of `bytes` that `mode` cannot encode. A dangling Kanji byte counts.
fn first_invalid_byte(mode: Mode, bytes: &[u8]) -> Option<u8> {
    match mode {
        Mode::Numeric => bytes.iter().copied().find(|&b| !is_numeric(b)),
        Mode::Alphanumeric => bytes.iter().copied().find(|&b| alphanumeric_value(b).is_none()),
        Mode::Byte => None,
        Mode::Kanji => bytes
            .chunks(2)
            .find(|pair| !matches!(**pair, [lead, trail] if is_kanji(lead, trail)))
            .map(|pair| pair[0]),
    }
}

/// Writes `segments` into `buf` using the count indicator widths of `group`.
pub fn write_segments(
    buf: &mut BitBuffer,
    data: &[u8],
    segments: &[Segment],
    group: VersionGroup,
) -> Result<()> {
    for seg in segments {
        buf.write_segment(data, seg, group)?;
    }
    Ok(())
}

/// Builds the padded data codewords of `segments` for a version and level.
///
/// The result always holds exactly the version's data codeword count.
pub fn encode_data_codewords(
    data: &[u8],
    segments: &[Segment],
    version: Version,
    level: EcLevel,
) -> Result<Vec<u8>> {
    let capacity = version_info(version).data_codewords(level) * 8;
    let mut buf = BitBuffer::with_capacity(capacity);
    write_segments(&mut buf, data, segments, version.group())?;
    buf.finish()?;
    debug_assert_eq!(buf.len(), capacity);
    Ok(buf.into_bytes())
}
