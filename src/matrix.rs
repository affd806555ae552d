//! The module grid and everything drawn into it before masking.
//!
//! Coordinates are `(x, y)` with `x` the column and `y` the row, origin at the top-left.
//! Function patterns are drawn first and marked functional; data bits then fill
//! every remaining module in the standard two-column zig-zag.

use crate::bch;
use crate::qrcode::Version;
use crate::tables::version_info;

/// One cell of the grid.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Module {
    /// Part of a function pattern. Masking never touches these.
    pub is_functional: bool,
    pub dark: bool,
}

/// Square grid of modules under construction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<Module>,
}

impl ModuleMatrix {
    /// An all-light grid with no function patterns.
    pub fn new(size: usize) -> Self {
        Self { size, modules: vec![Module::default(); size * size] }
    }

    /// A grid for `version` with finder, separator, format, version, alignment and timing
    /// patterns in place and every data module light.
    pub fn with_function_patterns(version: Version) -> Self {
        let mut matrix = Self::new(version.size());
        let size = matrix.size as i32;
        for (cx, cy) in [(3, 3), (size - 4, 3), (3, size - 4)] {
            matrix.draw_finder_pattern(cx, cy);
        }
        matrix.reserve_format_areas();
        if version.value() >= 7 {
            matrix.draw_version_info(version);
        }
        let alignment = version_info(version).alignment;
        for &cx in alignment {
            for &cy in alignment {
                let (cx, cy) = (usize::from(cx), usize::from(cy));
                if !matrix.is_functional(cx, cy) {
                    matrix.draw_alignment_pattern(cx, cy);
                }
            }
        }
        matrix.draw_timing_patterns();
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the module at `(x, y)` is dark.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x].dark
    }

    pub fn module(&self, x: usize, y: usize) -> Module {
        self.modules[y * self.size + x]
    }

    pub fn is_functional(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x].is_functional
    }

    /// Sets a data module's colour.
    pub fn set(&mut self, x: usize, y: usize, dark: bool) {
        self.modules[y * self.size + x].dark = dark;
    }

    /// Inverts the colour of the module at `(x, y)`.
    pub fn flip(&mut self, x: usize, y: usize) {
        let module = &mut self.modules[y * self.size + x];
        module.dark = !module.dark;
    }

    /// Sets a module's colour and marks it functional.
    pub fn set_function(&mut self, x: usize, y: usize, dark: bool) {
        self.modules[y * self.size + x] = Module { is_functional: true, dark };
    }

    /// Like `set_function`, ignoring coordinates outside the grid.
    fn set_function_unbounded(&mut self, x: i32, y: i32, dark: bool) {
        let range = 0..self.size as i32;
        if range.contains(&x) && range.contains(&y) {
            self.set_function(x as usize, y as usize, dark);
        }
    }

    /// Number of dark modules in the whole grid.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| m.dark).count()
    }

    /// A 7x7 finder centred on `(cx, cy)` together with its light separator ring.
    fn draw_finder_pattern(&mut self, cx: i32, cy: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist = dx.abs().max(dy.abs());
                self.set_function_unbounded(cx + dx, cy + dy, dist != 2 && dist != 4);
            }
        }
    }

    /// Marks both format strips functional and draws the always-dark module.
    fn reserve_format_areas(&mut self) {
        let size = self.size;
        for i in (0..9).filter(|&i| i != 6) {
            self.set_function(i, 8, false);
            self.set_function(8, i, false);
        }
        for i in 0..8 {
            self.set_function(size - 8 + i, 8, false);
            self.set_function(8, size - 8 + i, false);
        }
        self.set_function(8, size - 8, true);
    }

    /// The two 6x3 version blocks beside the top-right and bottom-left finders.
    fn draw_version_info(&mut self, version: Version) {
        let bits = bch::version_info_bits(version.value());
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function(a, b, bit);
            self.set_function(b, a, bit);
        }
    }

    fn draw_alignment_pattern(&mut self, cx: usize, cy: usize) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let x = cx as i32 + dx;
                let y = cy as i32 + dy;
                self.set_function_unbounded(x, y, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    fn draw_timing_patterns(&mut self) {
        for i in 8..self.size - 8 {
            if !self.is_functional(i, 6) {
                self.set_function(i, 6, i % 2 == 0);
            }
            if !self.is_functional(6, i) {
                self.set_function(6, i, i % 2 == 0);
            }
        }
    }

    /// Writes the bits of `data`, MSB first, into the non-functional modules.
    ///
    /// Columns are filled in pairs from the right, alternating upward and downward, with
    /// the timing column skipped. Returns the number of bits placed; modules left over once
    /// `data` runs out stay light.
    pub fn place_codewords(&mut self, data: &[u8]) -> usize {
        let size = self.size as i32;
        let total = data.len() * 8;
        let mut i: usize = 0;
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x = (right - j) as usize;
                    let upward = ((right + 1) & 2) == 0;
                    let y = (if upward { size - 1 - vert } else { vert }) as usize;
                    if !self.is_functional(x, y) && i < total {
                        self.set(x, y, get_bit(u32::from(data[i >> 3]), 7 - (i & 7)));
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        i
    }

    /// Builds a grid from rows of `'#'` (dark) and anything else (light), all non-functional.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let mut matrix = Self::new(rows.len());
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), rows.len());
            for (x, c) in row.bytes().enumerate() {
                matrix.set(x, y, c == b'#');
            }
        }
        matrix
    }
}

fn get_bit(x: u32, i: usize) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_data_modules(ver: usize) -> usize {
        let mut result = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let numalign = ver / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        result
    }

    fn data_module_count(m: &ModuleMatrix) -> usize {
        let n = m.size();
        (0..n)
            .flat_map(|y| (0..n).map(move |x| (x, y)))
            .filter(|&(x, y)| !m.is_functional(x, y))
            .count()
    }

    #[test]
    fn test_data_modules_match_raw_capacity() {
        for v in 1..=40u8 {
            let version = Version::new(v);
            let m = ModuleMatrix::with_function_patterns(version);
            let raw = raw_data_modules(usize::from(v));
            assert_eq!(data_module_count(&m), raw, "version {}", v);
            let remainder = raw - version_info(version).total_codewords * 8;
            assert!([0, 3, 4, 7].contains(&remainder), "version {}", v);
        }
    }

    #[test]
    fn test_finder_and_separator() {
        let m = ModuleMatrix::with_function_patterns(Version::new(1));
        assert!(m.get(0, 0));
        assert!(!m.get(1, 1));
        assert!(m.get(2, 2));
        assert!(m.get(4, 4));
        assert!(!m.get(7, 0));
        assert!(!m.get(7, 7));
        assert!(m.is_functional(7, 7));
        assert!(m.get(20, 0));
        assert!(!m.get(13, 0));
        assert!(m.get(0, 20));
    }

    #[test]
    fn test_timing_and_dark_module() {
        let m = ModuleMatrix::with_function_patterns(Version::new(1));
        assert!(m.get(8, 6));
        assert!(!m.get(9, 6));
        assert!(m.get(12, 6));
        assert!(!m.get(6, 9));
        assert!(m.get(6, 10));
        assert!(m.get(8, 13));
        assert!(m.is_functional(8, 13));
        assert!(!m.is_functional(9, 9));
    }

    #[test]
    fn test_alignment_pattern() {
        // Version 2 has one alignment pattern, centred at (18, 18).
        let m = ModuleMatrix::with_function_patterns(Version::new(2));
        assert!(m.get(18, 18));
        assert!(!m.get(17, 18));
        assert!(!m.get(19, 17));
        assert!(m.get(16, 18));
        assert!(m.get(20, 20));
        assert!(m.is_functional(16, 16));
        assert!(!m.is_functional(15, 16));
    }

    #[test]
    fn test_version_info_blocks() {
        let m = ModuleMatrix::with_function_patterns(Version::new(7));
        let n = m.size();
        let bits = bch::version_info_bits(7);
        for i in 0..18 {
            let (a, b) = (n - 11 + i % 3, i / 3);
            assert_eq!(m.get(a, b), get_bit(bits, i));
            assert_eq!(m.get(b, a), get_bit(bits, i));
        }
        let m = ModuleMatrix::with_function_patterns(Version::new(6));
        assert!(!m.is_functional(m.size() - 11, 0));
    }

    #[test]
    fn test_placement_order() {
        let mut m = ModuleMatrix::with_function_patterns(Version::new(1));
        let mut data = vec![0u8; 26];
        data[0] = 0b1010_0000;
        assert_eq!(m.place_codewords(&data), 26 * 8);
        assert!(m.get(20, 20));
        assert!(!m.get(19, 20));
        assert!(m.get(20, 19));
        assert!(!m.get(19, 19));
    }

    #[test]
    fn test_remainder_modules_stay_light() {
        // Version 2 leaves seven remainder modules.
        let mut m = ModuleMatrix::with_function_patterns(Version::new(2));
        let before = m.dark_count();
        assert_eq!(m.place_codewords(&[0xFF; 44]), 44 * 8);
        assert_eq!(m.dark_count() - before, 44 * 8);
        assert_eq!(data_module_count(&m), 44 * 8 + 7);
    }

    #[test]
    fn test_flip_and_from_rows() {
        let mut m = ModuleMatrix::from_rows(&["#.", ".#"]);
        assert!(m.get(0, 0) && m.get(1, 1) && !m.get(1, 0));
        m.flip(1, 0);
        assert!(m.get(1, 0));
        assert_eq!(m.module(1, 0), Module { is_functional: false, dark: true });
    }
}
