//! Per-version capacity data for QR Code Model 2.
//!
//! One [`VersionInfo`] per version 1 to 40, indexed by error correction level in
//! L, M, Q, H order. Block layouts follow ISO/IEC 18004 Table 9: each level uses
//! at most two groups of Reed-Solomon blocks, the second group carrying one more
//! data codeword per block than the first.

use crate::qrcode::{EcLevel, Version};

/// One group of identically sized Reed-Solomon blocks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RsBlock {
    /// Number of blocks in this group (0 when the group is unused).
    pub count: usize,
    /// Codewords per block, data plus error correction.
    pub total: usize,
    /// Data codewords per block.
    pub data: usize,
}

impl RsBlock {
    /// Error correction codewords per block.
    pub const fn ecc(&self) -> usize {
        self.total - self.data
    }
}

/// Static layout information for one version.
#[derive(Debug)]
pub struct VersionInfo {
    pub number: u8,
    /// Total codewords in the symbol, data and error correction together.
    pub total_codewords: usize,
    data_codewords: [usize; 4],
    /// Alignment pattern centre coordinates, used for both axes.
    pub alignment: &'static [u8],
    blocks: [[RsBlock; 2]; 4],
}

impl VersionInfo {
    /// Data codewords available at the given level.
    pub fn data_codewords(&self, level: EcLevel) -> usize {
        self.data_codewords[level.ordinal()]
    }

    /// The two block groups used at the given level.
    pub fn blocks(&self, level: EcLevel) -> [RsBlock; 2] {
        self.blocks[level.ordinal()]
    }

    /// Total number of Reed-Solomon blocks at the given level.
    pub fn block_count(&self, level: EcLevel) -> usize {
        let [g1, g2] = self.blocks(level);
        g1.count + g2.count
    }
}

/// Looks up the table entry for a version.
pub fn version_info(version: Version) -> &'static VersionInfo {
    &VERSIONS[usize::from(version.value()) - 1]
}

const fn version(
    number: u8,
    total_codewords: usize,
    data_codewords: [usize; 4],
    alignment: &'static [u8],
    raw: [[usize; 6]; 4],
) -> VersionInfo {
    let mut blocks = [[RsBlock { count: 0, total: 0, data: 0 }; 2]; 4];
    let mut i = 0;
    while i < 4 {
        let r = raw[i];
        blocks[i] = [
            RsBlock { count: r[0], total: r[1], data: r[2] },
            RsBlock { count: r[3], total: r[4], data: r[5] },
        ];
        i += 1;
    }
    VersionInfo { number, total_codewords, data_codewords, alignment, blocks }
}

// version(number, total codewords, [data codewords L, M, Q, H], alignment centres,
//     [[group 1 count, total, data, group 2 count, total, data]; L, M, Q, H])
#[rustfmt::skip]
pub static VERSIONS: [VersionInfo; 40] = [
    version(1, 26, [19, 16, 13, 9], &[],
        [[1, 26, 19, 0, 0, 0], [1, 26, 16, 0, 0, 0], [1, 26, 13, 0, 0, 0], [1, 26, 9, 0, 0, 0]]),
    version(2, 44, [34, 28, 22, 16], &[6, 18],
        [[1, 44, 34, 0, 0, 0], [1, 44, 28, 0, 0, 0], [1, 44, 22, 0, 0, 0], [1, 44, 16, 0, 0, 0]]),
    version(3, 70, [55, 44, 34, 26], &[6, 22],
        [[1, 70, 55, 0, 0, 0], [1, 70, 44, 0, 0, 0], [2, 35, 17, 0, 0, 0], [2, 35, 13, 0, 0, 0]]),
    version(4, 100, [80, 64, 48, 36], &[6, 26],
        [[1, 100, 80, 0, 0, 0], [2, 50, 32, 0, 0, 0], [2, 50, 24, 0, 0, 0], [4, 25, 9, 0, 0, 0]]),
    version(5, 134, [108, 86, 62, 46], &[6, 30],
        [[1, 134, 108, 0, 0, 0], [2, 67, 43, 0, 0, 0], [2, 33, 15, 2, 34, 16], [2, 33, 11, 2, 34, 12]]),
    version(6, 172, [136, 108, 76, 60], &[6, 34],
        [[2, 86, 68, 0, 0, 0], [4, 43, 27, 0, 0, 0], [4, 43, 19, 0, 0, 0], [4, 43, 15, 0, 0, 0]]),
    version(7, 196, [156, 124, 88, 66], &[6, 22, 38],
        [[2, 98, 78, 0, 0, 0], [4, 49, 31, 0, 0, 0], [2, 32, 14, 4, 33, 15], [4, 39, 13, 1, 40, 14]]),
    version(8, 242, [194, 154, 110, 86], &[6, 24, 42],
        [[2, 121, 97, 0, 0, 0], [2, 60, 38, 2, 61, 39], [4, 40, 18, 2, 41, 19], [4, 40, 14, 2, 41, 15]]),
    version(9, 292, [232, 182, 132, 100], &[6, 26, 46],
        [[2, 146, 116, 0, 0, 0], [3, 58, 36, 2, 59, 37], [4, 36, 16, 4, 37, 17], [4, 36, 12, 4, 37, 13]]),
    version(10, 346, [274, 216, 154, 122], &[6, 28, 50],
        [[2, 86, 68, 2, 87, 69], [4, 69, 43, 1, 70, 44], [6, 43, 19, 2, 44, 20], [6, 43, 15, 2, 44, 16]]),
    version(11, 404, [324, 254, 180, 140], &[6, 30, 54],
        [[4, 101, 81, 0, 0, 0], [1, 80, 50, 4, 81, 51], [4, 50, 22, 4, 51, 23], [3, 36, 12, 8, 37, 13]]),
    version(12, 466, [370, 290, 206, 158], &[6, 32, 58],
        [[2, 116, 92, 2, 117, 93], [6, 58, 36, 2, 59, 37], [4, 46, 20, 6, 47, 21], [7, 42, 14, 4, 43, 15]]),
    version(13, 532, [428, 334, 244, 180], &[6, 34, 62],
        [[4, 133, 107, 0, 0, 0], [8, 59, 37, 1, 60, 38], [8, 44, 20, 4, 45, 21], [12, 33, 11, 4, 34, 12]]),
    version(14, 581, [461, 365, 261, 197], &[6, 26, 46, 66],
        [[3, 145, 115, 1, 146, 116], [4, 64, 40, 5, 65, 41], [11, 36, 16, 5, 37, 17], [11, 36, 12, 5, 37, 13]]),
    version(15, 655, [523, 415, 295, 223], &[6, 26, 48, 70],
        [[5, 109, 87, 1, 110, 88], [5, 65, 41, 5, 66, 42], [5, 54, 24, 7, 55, 25], [11, 36, 12, 7, 37, 13]]),
    version(16, 733, [589, 453, 325, 253], &[6, 26, 50, 74],
        [[5, 122, 98, 1, 123, 99], [7, 73, 45, 3, 74, 46], [15, 43, 19, 2, 44, 20], [3, 45, 15, 13, 46, 16]]),
    version(17, 815, [647, 507, 367, 283], &[6, 30, 54, 78],
        [[1, 135, 107, 5, 136, 108], [10, 74, 46, 1, 75, 47], [1, 50, 22, 15, 51, 23], [2, 42, 14, 17, 43, 15]]),
    version(18, 901, [721, 563, 397, 313], &[6, 30, 56, 82],
        [[5, 150, 120, 1, 151, 121], [9, 69, 43, 4, 70, 44], [17, 50, 22, 1, 51, 23], [2, 42, 14, 19, 43, 15]]),
    version(19, 991, [795, 627, 445, 341], &[6, 30, 58, 86],
        [[3, 141, 113, 4, 142, 114], [3, 70, 44, 11, 71, 45], [17, 47, 21, 4, 48, 22], [9, 39, 13, 16, 40, 14]]),
    version(20, 1085, [861, 669, 485, 385], &[6, 34, 62, 90],
        [[3, 135, 107, 5, 136, 108], [3, 67, 41, 13, 68, 42], [15, 54, 24, 5, 55, 25], [15, 43, 15, 10, 44, 16]]),
    version(21, 1156, [932, 714, 512, 406], &[6, 28, 50, 72, 94],
        [[4, 144, 116, 4, 145, 117], [17, 68, 42, 0, 0, 0], [17, 50, 22, 6, 51, 23], [19, 46, 16, 6, 47, 17]]),
    version(22, 1258, [1006, 782, 568, 442], &[6, 26, 50, 74, 98],
        [[2, 139, 111, 7, 140, 112], [17, 74, 46, 0, 0, 0], [7, 54, 24, 16, 55, 25], [34, 37, 13, 0, 0, 0]]),
    version(23, 1364, [1094, 860, 614, 464], &[6, 30, 54, 78, 102],
        [[4, 151, 121, 5, 152, 122], [4, 75, 47, 14, 76, 48], [11, 54, 24, 14, 55, 25], [16, 45, 15, 14, 46, 16]]),
    version(24, 1474, [1174, 914, 664, 514], &[6, 28, 54, 80, 106],
        [[6, 147, 117, 4, 148, 118], [6, 73, 45, 14, 74, 46], [11, 54, 24, 16, 55, 25], [30, 46, 16, 2, 47, 17]]),
    version(25, 1588, [1276, 1000, 718, 538], &[6, 32, 58, 84, 110],
        [[8, 132, 106, 4, 133, 107], [8, 75, 47, 13, 76, 48], [7, 54, 24, 22, 55, 25], [22, 45, 15, 13, 46, 16]]),
    version(26, 1706, [1370, 1062, 754, 596], &[6, 30, 58, 86, 114],
        [[10, 142, 114, 2, 143, 115], [19, 74, 46, 4, 75, 47], [28, 50, 22, 6, 51, 23], [33, 46, 16, 4, 47, 17]]),
    version(27, 1828, [1468, 1128, 808, 628], &[6, 34, 62, 90, 118],
        [[8, 152, 122, 4, 153, 123], [22, 73, 45, 3, 74, 46], [8, 53, 23, 26, 54, 24], [12, 45, 15, 28, 46, 16]]),
    version(28, 1921, [1531, 1193, 871, 661], &[6, 26, 50, 74, 98, 122],
        [[3, 147, 117, 10, 148, 118], [3, 73, 45, 23, 74, 46], [4, 54, 24, 31, 55, 25], [11, 45, 15, 31, 46, 16]]),
    version(29, 2051, [1631, 1267, 911, 701], &[6, 30, 54, 78, 102, 126],
        [[7, 146, 116, 7, 147, 117], [21, 73, 45, 7, 74, 46], [1, 53, 23, 37, 54, 24], [19, 45, 15, 26, 46, 16]]),
    version(30, 2185, [1735, 1373, 985, 745], &[6, 26, 52, 78, 104, 130],
        [[5, 145, 115, 10, 146, 116], [19, 75, 47, 10, 76, 48], [15, 54, 24, 25, 55, 25], [23, 45, 15, 25, 46, 16]]),
    version(31, 2323, [1843, 1455, 1033, 793], &[6, 30, 56, 82, 108, 134],
        [[13, 145, 115, 3, 146, 116], [2, 74, 46, 29, 75, 47], [42, 54, 24, 1, 55, 25], [23, 45, 15, 28, 46, 16]]),
    version(32, 2465, [1955, 1541, 1115, 845], &[6, 34, 60, 86, 112, 138],
        [[17, 145, 115, 0, 0, 0], [10, 74, 46, 23, 75, 47], [10, 54, 24, 35, 55, 25], [19, 45, 15, 35, 46, 16]]),
    version(33, 2611, [2071, 1631, 1171, 901], &[6, 30, 58, 86, 114, 142],
        [[17, 145, 115, 1, 146, 116], [14, 74, 46, 21, 75, 47], [29, 54, 24, 19, 55, 25], [11, 45, 15, 46, 46, 16]]),
    version(34, 2761, [2191, 1725, 1231, 961], &[6, 34, 62, 90, 118, 146],
        [[13, 145, 115, 6, 146, 116], [14, 74, 46, 23, 75, 47], [44, 54, 24, 7, 55, 25], [59, 46, 16, 1, 47, 17]]),
    version(35, 2876, [2306, 1812, 1286, 986], &[6, 30, 54, 78, 102, 126, 150],
        [[12, 151, 121, 7, 152, 122], [12, 75, 47, 26, 76, 48], [39, 54, 24, 14, 55, 25], [22, 45, 15, 41, 46, 16]]),
    version(36, 3034, [2434, 1914, 1354, 1054], &[6, 24, 50, 76, 102, 128, 154],
        [[6, 151, 121, 14, 152, 122], [6, 75, 47, 34, 76, 48], [46, 54, 24, 10, 55, 25], [2, 45, 15, 64, 46, 16]]),
    version(37, 3196, [2566, 1992, 1426, 1096], &[6, 28, 54, 80, 106, 132, 158],
        [[17, 152, 122, 4, 153, 123], [29, 74, 46, 14, 75, 47], [49, 54, 24, 10, 55, 25], [24, 45, 15, 46, 46, 16]]),
    version(38, 3362, [2702, 2102, 1502, 1142], &[6, 32, 58, 84, 110, 136, 162],
        [[4, 152, 122, 18, 153, 123], [13, 74, 46, 32, 75, 47], [48, 54, 24, 14, 55, 25], [42, 45, 15, 32, 46, 16]]),
    version(39, 3532, [2812, 2216, 1582, 1222], &[6, 26, 54, 82, 110, 138, 166],
        [[20, 147, 117, 4, 148, 118], [40, 75, 47, 7, 76, 48], [43, 54, 24, 22, 55, 25], [10, 45, 15, 67, 46, 16]]),
    version(40, 3706, [2956, 2334, 1666, 1276], &[6, 30, 58, 86, 114, 142, 170],
        [[19, 148, 118, 6, 149, 119], [18, 75, 47, 31, 76, 48], [34, 54, 24, 34, 55, 25], [20, 45, 15, 61, 46, 16]]),
];
