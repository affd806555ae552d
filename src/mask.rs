//! Mask patterns, penalty scoring and format information.

use crate::bch;
use crate::config;
use crate::matrix::ModuleMatrix;
use crate::qrcode::{EcLevel, Mask};
use rayon::prelude::*;
use tracing::{debug, trace};

const PENALTY_N1: u32 = 3;
const PENALTY_N2: u32 = 3;
const PENALTY_N3: u32 = 40;
const PENALTY_N4: u32 = 10;

/// Whether `mask` inverts the module at `row`, `col`.
pub fn mask_bit(mask: Mask, row: usize, col: usize) -> bool {
    let (i, j) = (row, col);
    match mask.value() {
        0 => (i + j) % 2 == 0,
        1 => i % 2 == 0,
        2 => j % 3 == 0,
        3 => (i + j) % 3 == 0,
        4 => (i / 2 + j / 3) % 2 == 0,
        5 => (i * j) % 2 + (i * j) % 3 == 0,
        6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
        7 => ((i * j) % 3 + (i + j) % 2) % 2 == 0,
        _ => unreachable!(),
    }
}

/// XORs `mask` into every non-functional module.
pub fn apply_mask(matrix: &mut ModuleMatrix, mask: Mask) {
    let size = matrix.size();
    for y in 0..size {
        for x in 0..size {
            if !matrix.is_functional(x, y) && mask_bit(mask, y, x) {
                matrix.flip(x, y);
            }
        }
    }
}

/// Writes the format information word into both reserved strips, plus the dark module.
pub fn draw_format_info(matrix: &mut ModuleMatrix, level: EcLevel, mask: Mask) {
    let bits = bch::format_info_bits(level, mask);
    let bit = |i: usize| (bits >> i) & 1 != 0;
    for i in 0..6 {
        matrix.set_function(8, i, bit(i));
    }
    matrix.set_function(8, 7, bit(6));
    matrix.set_function(8, 8, bit(7));
    matrix.set_function(7, 8, bit(8));
    for i in 9..15 {
        matrix.set_function(14 - i, 8, bit(i));
    }
    let size = matrix.size();
    for i in 0..8 {
        matrix.set_function(size - 1 - i, 8, bit(i));
    }
    for i in 8..15 {
        matrix.set_function(8, size - 15 + i, bit(i));
    }
    matrix.set_function(8, size - 8, true);
}

/// Penalty points of one masked grid, by rule.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Penalty {
    /// Runs of five or more same-coloured modules in a row or column.
    pub runs: u32,
    /// Uniform 2x2 blocks.
    pub blocks: u32,
    /// Finder-like 1:1:3:1:1 patterns with a light margin.
    pub finder_like: u32,
    /// Deviation of the dark proportion from one half.
    pub balance: u32,
}

impl Penalty {
    pub fn total(&self) -> u32 {
        self.runs + self.blocks + self.finder_like + self.balance
    }
}

/// Scores a fully drawn grid.
pub fn penalty(matrix: &ModuleMatrix) -> Penalty {
    let size = matrix.size();
    let mut result = Penalty::default();
    let mut line = vec![false; size];

    for y in 0..size {
        for (x, m) in line.iter_mut().enumerate() {
            *m = matrix.get(x, y);
        }
        let (runs, finder_like) = line_penalty(&line);
        result.runs += runs;
        result.finder_like += finder_like;
    }
    for x in 0..size {
        for (y, m) in line.iter_mut().enumerate() {
            *m = matrix.get(x, y);
        }
        let (runs, finder_like) = line_penalty(&line);
        result.runs += runs;
        result.finder_like += finder_like;
    }

    for y in 0..size.saturating_sub(1) {
        for x in 0..size - 1 {
            let color = matrix.get(x, y);
            if color == matrix.get(x + 1, y)
                && color == matrix.get(x, y + 1)
                && color == matrix.get(x + 1, y + 1)
            {
                result.blocks += PENALTY_N2;
            }
        }
    }

    let total = size * size;
    if total > 0 {
        let dark_percent = matrix.dark_count() * 100 / total;
        result.balance = (dark_percent.abs_diff(50) / 5) as u32 * PENALTY_N4;
    }
    result
}

/// Run and finder-like penalties of a single row or column.
fn line_penalty(line: &[bool]) -> (u32, u32) {
    let n = line.len();
    let mut runs = 0;
    let mut start = 0;
    while start < n {
        let color = line[start];
        let end = line[start..].iter().position(|&m| m != color).map_or(n, |len| start + len);
        let len = (end - start) as u32;
        if len >= 5 {
            runs += PENALTY_N1 + (len - 5);
        }
        start = end;
    }

    // Modules past either end count as light.
    let light = |k: isize| k < 0 || k >= n as isize || !line[k as usize];
    let dark = |k: isize| !light(k);
    let mut finder_like = 0;
    for j in 0..n.saturating_sub(6) as isize {
        let core = light(j - 1)
            && dark(j)
            && light(j + 1)
            && dark(j + 2)
            && dark(j + 3)
            && dark(j + 4)
            && light(j + 5)
            && dark(j + 6)
            && light(j + 7);
        if !core {
            continue;
        }
        let before = (2..=4).all(|d| light(j - d));
        let after = (8..=10).all(|d| light(j + d));
        if before || after {
            finder_like += PENALTY_N3;
        }
    }
    (runs, finder_like)
}

fn masked_penalty(matrix: &ModuleMatrix, level: EcLevel, mask: Mask) -> Penalty {
    let mut candidate = matrix.clone();
    apply_mask(&mut candidate, mask);
    draw_format_info(&mut candidate, level, mask);
    let score = penalty(&candidate);
    trace!(
        mask = mask.value(),
        runs = score.runs,
        blocks = score.blocks,
        finder_like = score.finder_like,
        balance = score.balance,
        total = score.total(),
        "mask scored"
    );
    score
}

/// Scores all eight masks on an unmasked grid, in mask order.
pub fn score_masks(matrix: &ModuleMatrix, level: EcLevel, parallel: bool) -> Vec<(Mask, Penalty)> {
    let score = |&mask: &Mask| (mask, masked_penalty(matrix, level, mask));
    if parallel {
        Mask::ALL.par_iter().map(score).collect()
    } else {
        Mask::ALL.iter().map(score).collect()
    }
}

/// The lowest total in `scored`, the earlier entry winning ties.
fn lowest(scored: &[(Mask, Penalty)]) -> Option<(Mask, Penalty)> {
    scored.iter().copied().reduce(|best, candidate| {
        if candidate.1.total() < best.1.total() {
            candidate
        } else {
            best
        }
    })
}

/// Scores all eight masks on an unmasked grid and returns the lowest, the lower index
/// winning ties.
pub fn select_mask(matrix: &ModuleMatrix, level: EcLevel) -> (Mask, Penalty) {
    let scored = score_masks(matrix, level, config::parallel_masks());
    lowest(&scored).unwrap_or((Mask::ALL[0], Penalty::default()))
}

/// Applies `fixed`, or the best-scoring mask when `None`, and draws the format information.
pub fn apply_best_mask(
    mut matrix: ModuleMatrix,
    level: EcLevel,
    fixed: Option<Mask>,
) -> (ModuleMatrix, Mask) {
    let mask = match fixed {
        Some(mask) => mask,
        None => {
            let (mask, score) = select_mask(&matrix, level);
            debug!(mask = mask.value(), penalty = score.total(), "mask selected");
            mask
        }
    };
    apply_mask(&mut matrix, mask);
    draw_format_info(&mut matrix, level, mask);
    (matrix, mask)
}
