//! Version selection.
//!
//! The segment layout and its length depend on the count indicator widths, which
//! only change between version groups. Each group is therefore tried once with a
//! trial stream sized for the group's largest version; the first group whose
//! trial fits gives the encoded length, and the smallest version of that group
//! with enough capacity is the minimal feasible version.

use crate::bitstream::{write_segments, BitBuffer};
use crate::error::{QrError, Result};
use crate::qrcode::{EcLevel, Version, VersionGroup};
use crate::segment::{segment, Segment};
use crate::tables::version_info;
use tracing::trace;

/// Outcome of version selection: the version to build and the segments to encode in it.
#[derive(Clone, Debug)]
pub struct Selection {
    pub version: Version,
    pub segments: Vec<Segment>,
    /// Encoded length before the terminator and padding.
    pub bit_length: usize,
}

/// Data capacity of `version` at `level`, in bits.
pub fn capacity_bits(version: Version, level: EcLevel) -> usize {
    version_info(version).data_codewords(level) * 8
}

/// Chooses the version for `data` at `level`.
///
/// With `requested` unset the minimal feasible version is used. With a fixed version the
/// request wins when the data fits in it; otherwise the minimal feasible version is used
/// only when `auto_extend` is set. Scanning starts at the requested version's group.
///
/// # Errors
///
/// [`QrError::CapacityExceeded`] if no allowed version holds the data.
pub fn select_version(
    data: &[u8],
    level: EcLevel,
    requested: Option<Version>,
    auto_extend: bool,
) -> Result<Selection> {
    let start = requested.map_or(VersionGroup::Small, Version::group);
    let mut shortest = None;

    for &group in VersionGroup::ALL.iter().filter(|&&g| g >= start) {
        let segments = segment(data, group);
        if !segments.iter().all(|s| s.fits_count(group)) {
            trace!(?group, "character count overflows indicator");
            continue;
        }
        shortest = Some(segments.iter().map(|s| s.bit_length(group)).sum::<usize>());

        let Some(bit_length) = trial_length(data, &segments, group, level)? else {
            trace!(?group, bits = ?shortest, "trial stream overflowed");
            continue;
        };
        let Some(minimal) = group
            .versions()
            .find(|&v| capacity_bits(v, level) >= bit_length)
        else {
            continue;
        };

        let version = match requested {
            None => minimal,
            Some(req) if minimal <= req => req,
            Some(_) if auto_extend => minimal,
            Some(_) => {
                return Err(QrError::CapacityExceeded { bits: Some(bit_length), level });
            }
        };
        debug_assert_eq!(version.group(), group);
        return Ok(Selection { version, segments, bit_length });
    }

    Err(QrError::CapacityExceeded { bits: shortest, level })
}

/// Length of the encoded segments, or `None` when they overflow the group's largest version.
fn trial_length(
    data: &[u8],
    segments: &[Segment],
    group: VersionGroup,
    level: EcLevel,
) -> Result<Option<usize>> {
    let mut buf = BitBuffer::with_capacity(capacity_bits(group.last(), level));
    match write_segments(&mut buf, data, segments, group) {
        Ok(()) => Ok(Some(buf.len())),
        Err(QrError::BitstreamOverflow { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
