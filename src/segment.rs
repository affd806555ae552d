//! Input classification and mode-run optimisation.
//!
//! Every input byte is classified as Kanji, numeric, alphanumeric or byte, and
//! consecutive bytes of the same class form a run. Two greedy passes then merge
//! neighbouring runs whenever a single run is cheaper in bits than the pair, and
//! the passes repeat until neither changes anything.

use crate::qrcode::VersionGroup;

/// Data encoding mode of a segment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
}

impl Mode {
    /// The 4-bit mode indicator.
    pub fn indicator(self) -> u16 {
        use Mode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
        }
    }

    /// Width of the character count indicator for the given version group.
    pub fn count_bits(self, group: VersionGroup) -> u8 {
        use Mode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
        })[group.index()]
    }
}

/// A run of source bytes encoded in a single mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment {
    pub mode: Mode,
    /// Offset of the first source byte of this run.
    pub offset: usize,
    /// Number of source bytes covered. Kanji runs cover two bytes per character.
    pub len: usize,
}

impl Segment {
    /// Number of characters written to the count indicator.
    pub fn char_count(&self) -> usize {
        match self.mode {
            Mode::Kanji => self.len / 2,
            _ => self.len,
        }
    }

    /// Encoded size of this segment, header included.
    pub fn bit_length(&self, group: VersionGroup) -> usize {
        bit_cost(self.mode, self.len, group)
    }

    /// Whether the character count fits the indicator width of `group`.
    pub fn fits_count(&self, group: VersionGroup) -> bool {
        self.char_count() < 1usize << self.mode.count_bits(group)
    }

    /// The source bytes this segment covers, or `None` if it runs past the end of `data`.
    pub fn bytes<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.offset..self.offset.checked_add(self.len)?)
    }
}

/// Bits needed to encode `len` source bytes in `mode`, including the mode and
/// count indicators.
pub fn bit_cost(mode: Mode, len: usize, group: VersionGroup) -> usize {
    let header = 4 + usize::from(mode.count_bits(group));
    header
        + match mode {
            Mode::Numeric => 10 * (len / 3) + [0, 4, 7][len % 3],
            Mode::Alphanumeric => 11 * (len / 2) + 6 * (len % 2),
            Mode::Byte => 8 * len,
            Mode::Kanji => 13 * (len / 2),
        }
}

static ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

pub fn is_numeric(b: u8) -> bool {
    b.is_ascii_digit()
}

pub fn is_alphanumeric(b: u8) -> bool {
    alphanumeric_value(b).is_some()
}

/// Code of `b` in the 45-symbol alphanumeric table.
pub fn alphanumeric_value(b: u8) -> Option<u16> {
    ALPHANUMERIC_CHARSET.iter().position(|&c| c == b).map(|i| i as u16)
}

/// Whether `lead` and `trail` form a two-byte Shift JIS code in the Kanji mode range.
pub fn is_kanji(lead: u8, trail: u8) -> bool {
    let lead_ok = (0x81..=0x9f).contains(&lead) || (0xe0..=0xeb).contains(&lead);
    if !lead_ok || trail < 0x40 {
        return false;
    }
    !((lead == 0x9f && trail > 0xfc) || (lead == 0xeb && trail > 0xbf))
}

/// Compacts a big-endian Shift JIS code into its 13-bit Kanji mode value.
pub fn kanji_value(code: u16) -> u16 {
    let adjusted = if (0x8140..=0x9ffc).contains(&code) {
        code - 0x8140
    } else {
        code - 0xc140
    };
    (adjusted >> 8) * 0xc0 + (adjusted & 0xff)
}

/// Splits `data` into maximal runs of the same mode, with no merging.
pub fn classify(data: &[u8]) -> Vec<Segment> {
    let mut runs: Vec<Segment> = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let (mode, width) = if i + 1 < data.len() && is_kanji(data[i], data[i + 1]) {
            (Mode::Kanji, 2)
        } else if is_numeric(data[i]) {
            (Mode::Numeric, 1)
        } else if is_alphanumeric(data[i]) {
            (Mode::Alphanumeric, 1)
        } else {
            (Mode::Byte, 1)
        };
        match runs.last_mut() {
            Some(last) if last.mode == mode => last.len += width,
            _ => runs.push(Segment { mode, offset: i, len: width }),
        }
        i += width;
    }
    runs
}

/// Splits `data` into segments optimised for the count indicator widths of `group`.
///
/// The result covers the input exactly once, in order.
pub fn segment(data: &[u8], group: VersionGroup) -> Vec<Segment> {
    let mut runs = classify(data);
    loop {
        let fused = fuse_numeric_alphanumeric(&mut runs, group);
        let absorbed = absorb_into_bytes(&mut runs, group);
        if !fused && !absorbed {
            break;
        }
    }
    runs
}

/// Replaces `runs[first..=last]` with a single run in `mode`.
fn merge(runs: &mut Vec<Segment>, first: usize, last: usize, mode: Mode) {
    let len = runs[first..=last].iter().map(|s| s.len).sum();
    runs[first] = Segment { mode, offset: runs[first].offset, len };
    runs.drain(first + 1..=last);
}

/// Merges numeric/alphanumeric neighbours when one alphanumeric run is cheaper.
///
/// A pair worth fusing may instead be split between neighbouring byte runs when
/// that costs no more than the fused run plus the byte run left standing.
fn fuse_numeric_alphanumeric(runs: &mut Vec<Segment>, group: VersionGroup) -> bool {
    use Mode::*;
    let mut changed = false;
    let mut i = 0;
    while i + 1 < runs.len() {
        let (a, b) = (runs[i], runs[i + 1]);
        if !matches!((a.mode, b.mode), (Numeric, Alphanumeric) | (Alphanumeric, Numeric)) {
            i += 1;
            continue;
        }
        let separate = a.bit_length(group) + b.bit_length(group);
        let fused = bit_cost(Alphanumeric, a.len + b.len, group);
        if separate <= fused {
            i += 1;
            continue;
        }

        let front = if i >= 1 && runs[i - 1].mode == Byte {
            let prev = runs[i - 1];
            let cost = bit_cost(Byte, prev.len + a.len, group) + b.bit_length(group);
            (cost <= fused + prev.bit_length(group)).then_some(cost)
        } else {
            None
        };
        let behind = if i + 2 < runs.len() && runs[i + 2].mode == Byte {
            let next = runs[i + 2];
            let cost = a.bit_length(group) + bit_cost(Byte, b.len + next.len, group);
            (cost <= fused + next.bit_length(group)).then_some(cost)
        } else {
            None
        };

        match (front, behind) {
            (Some(f), Some(bh)) if f < bh => merge(runs, i - 1, i, Byte),
            (Some(_), None) => merge(runs, i - 1, i, Byte),
            (_, Some(_)) => merge(runs, i + 1, i + 2, Byte),
            (None, None) => {
                let last = if i + 2 < runs.len() && runs[i + 2].mode == Alphanumeric {
                    i + 2
                } else {
                    i + 1
                };
                let first = if i >= 1 && runs[i - 1].mode == Alphanumeric { i - 1 } else { i };
                merge(runs, first, last, Alphanumeric);
            }
        }
        // Re-examine the run now sitting at `i`.
        changed = true;
    }
    changed
}

/// Folds neighbouring runs into byte mode when that costs no more bits.
///
/// Byte runs already adjacent to the pair would merge too, so their headers are
/// discounted from the merged cost.
fn absorb_into_bytes(runs: &mut Vec<Segment>, group: VersionGroup) -> bool {
    let header = 4 + usize::from(Mode::Byte.count_bits(group));
    let mut changed = false;
    let mut i = 0;
    while i + 1 < runs.len() {
        let (a, b) = (runs[i], runs[i + 1]);
        let prev_byte = i >= 1 && runs[i - 1].mode == Mode::Byte;
        let next_byte = i + 2 < runs.len() && runs[i + 2].mode == Mode::Byte;

        let separate = a.bit_length(group) + b.bit_length(group);
        let discount = header * (usize::from(prev_byte) + usize::from(next_byte));
        let merged = bit_cost(Mode::Byte, a.len + b.len, group);

        if merged <= separate + discount {
            let first = if prev_byte { i - 1 } else { i };
            let last = if next_byte { i + 2 } else { i + 1 };
            merge(runs, first, last, Mode::Byte);
            changed = true;
            i = first.saturating_sub(1);
            continue;
        }
        i += 1;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use VersionGroup::*;

    fn modes(segs: &[Segment]) -> Vec<(Mode, usize)> {
        segs.iter().map(|s| (s.mode, s.len)).collect()
    }

    #[test]
    fn test_character_classes() {
        assert!(is_numeric(b'7'));
        assert!(!is_numeric(b'A'));
        assert!(is_alphanumeric(b'A'));
        assert!(is_alphanumeric(b' '));
        assert!(is_alphanumeric(b':'));
        assert!(!is_alphanumeric(b'a'));
        assert!(!is_alphanumeric(b'#'));
        assert_eq!(alphanumeric_value(b'0'), Some(0));
        assert_eq!(alphanumeric_value(b'Z'), Some(35));
        assert_eq!(alphanumeric_value(b' '), Some(36));
        assert_eq!(alphanumeric_value(b':'), Some(44));
    }

    #[test]
    fn test_kanji_detection() {
        assert!(is_kanji(0x93, 0x5f));
        assert!(is_kanji(0xe4, 0xaa));
        assert!(!is_kanji(0x93, 0x3f));
        assert!(!is_kanji(0x9f, 0xfd));
        assert!(!is_kanji(0xeb, 0xc0));
        assert!(!is_kanji(0x41, 0x41));
    }

    #[test]
    fn test_kanji_values() {
        // Examples from ISO/IEC 18004 section 7.4.6.
        assert_eq!(kanji_value(0x935f), 0x0d9f);
        assert_eq!(kanji_value(0xe4aa), 0x1aaa);
    }

    #[test]
    fn test_bit_costs() {
        assert_eq!(bit_cost(Mode::Numeric, 8, Small), 4 + 10 + 27);
        assert_eq!(bit_cost(Mode::Alphanumeric, 5, Small), 4 + 9 + 28);
        assert_eq!(bit_cost(Mode::Byte, 3, Medium), 4 + 16 + 24);
        assert_eq!(bit_cost(Mode::Kanji, 4, Large), 4 + 12 + 26);
    }

    #[test]
    fn test_classify_runs() {
        let data = b"123ABCdef\x93\x5f\xe4\xaa";
        assert_eq!(
            modes(&classify(data)),
            vec![(Mode::Numeric, 3), (Mode::Alphanumeric, 3), (Mode::Byte, 3), (Mode::Kanji, 4)]
        );
        let segs = classify(data);
        assert_eq!(segs[3].offset, 9);
        assert_eq!(segs[3].char_count(), 2);
    }

    #[test]
    fn test_single_mode_inputs_stay_whole() {
        assert_eq!(modes(&segment(b"0123456789", Small)), vec![(Mode::Numeric, 10)]);
        assert_eq!(modes(&segment(b"HELLO WORLD", Small)), vec![(Mode::Alphanumeric, 11)]);
        assert_eq!(modes(&segment(b"hello", Small)), vec![(Mode::Byte, 5)]);
    }

    #[test]
    fn test_short_numeric_fuses_into_alphanumeric() {
        assert_eq!(modes(&segment(b"AB1CD", Small)), vec![(Mode::Alphanumeric, 5)]);
        assert_eq!(
            modes(&segment(b"abcdefgh1AHELLO", Small)),
            vec![(Mode::Byte, 8), (Mode::Alphanumeric, 7)]
        );
    }

    #[test]
    fn test_fusion_prefers_trailing_byte_run() {
        let mut runs = classify(b"abcdefgh11Axyz");
        assert!(fuse_numeric_alphanumeric(&mut runs, Small));
        assert_eq!(modes(&runs), vec![(Mode::Byte, 8), (Mode::Numeric, 2), (Mode::Byte, 4)]);
        assert_eq!(runs[2].offset, 10);
    }

    #[test]
    fn test_long_numeric_run_is_kept() {
        let data = b"ABC123456789012345678901234567890DEF";
        let segs = segment(data, Small);
        assert_eq!(
            modes(&segs),
            vec![(Mode::Alphanumeric, 3), (Mode::Numeric, 30), (Mode::Alphanumeric, 3)]
        );
    }

    #[test]
    fn test_short_runs_fold_into_bytes() {
        assert_eq!(modes(&segment(b"a1b", Small)), vec![(Mode::Byte, 3)]);
        assert_eq!(modes(&segment(b"Hello, World!", Small)), vec![(Mode::Byte, 13)]);
    }

    #[test]
    fn test_segments_cover_input_in_order() {
        let data = b"Order #12345: 3x WIDGET-9 @ $4.50/ea, total 13.50 EUR \x93\x5f\x93\x5f ok";
        for &group in &VersionGroup::ALL {
            let segs = segment(data, group);
            let mut offset = 0;
            for seg in &segs {
                assert_eq!(seg.offset, offset);
                assert!(seg.len > 0);
                offset += seg.len;
            }
            assert_eq!(offset, data.len());
            for pair in segs.windows(2) {
                assert!(!(pair[0].mode == Mode::Byte && pair[1].mode == Mode::Byte));
            }
        }
    }

    #[test]
    fn test_count_limits() {
        let seg = Segment { mode: Mode::Byte, offset: 0, len: 256 };
        assert!(!seg.fits_count(Small));
        assert!(seg.fits_count(Medium));
        let seg = Segment { mode: Mode::Kanji, offset: 0, len: 510 };
        assert!(seg.fits_count(Small));
    }
}
