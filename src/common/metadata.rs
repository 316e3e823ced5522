use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Color of a module
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Color {
    pub fn select<T>(&self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // 2-bit level indicator embedded in format info
    pub(crate) fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl TryFrom<u8> for ECLevel {
    type Error = QRError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::L),
            1 => Ok(Self::M),
            2 => Ok(Self::Q),
            3 => Ok(Self::H),
            _ => Err(QRError::InvalidCorrectionLevel),
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub fn new(version: usize) -> Self {
        debug_assert!((1..=MAX_VERSION).contains(&version), "Invalid version");
        Self(version)
    }

    pub const fn width(self) -> usize {
        17 + self.0 * 4
    }

    pub const fn mode_bits(self) -> usize {
        4
    }

    // Bit width of the char count field, by version tier
    pub fn char_count_bits(self, mode: Mode) -> usize {
        match (self.0, mode) {
            (1..=9, Mode::Numeric) => 10,
            (1..=9, Mode::Alphanumeric) => 9,
            (1..=9, Mode::Byte) => 8,
            (10..=26, Mode::Numeric) => 12,
            (10..=26, Mode::Alphanumeric) => 11,
            (10..=26, Mode::Byte) => 16,
            (27..=40, Mode::Numeric) => 14,
            (27..=40, Mode::Alphanumeric) => 13,
            (27..=40, Mode::Byte) => 16,
            _ => unreachable!("Invalid version"),
        }
    }

    pub fn data_codewords(self, ecl: ECLevel) -> QRResult<usize> {
        table_entry(&DATA_CODEWORDS[ecl as usize], self.0)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> QRResult<usize> {
        Ok(self.data_codewords(ecl)? << 3)
    }

    pub fn block_count(self, ecl: ECLevel) -> QRResult<usize> {
        table_entry(&BLOCK_COUNT[ecl as usize], self.0)
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> QRResult<usize> {
        table_entry(&ECC_PER_BLOCK[ecl as usize], self.0)
    }

    pub fn total_codewords(self) -> QRResult<usize> {
        table_entry(&TOTAL_CODEWORDS, self.0)
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    // 18-bit version info: 6-bit version + 12-bit BCH remainder
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info only exists for version 7 and above");
        let v = self.0 as u32;
        (v << 12) | bch_remainder(v, VERSION_INFO_GEN, 6, 12)
    }
}

// Format info
//------------------------------------------------------------------------------

// 15-bit format info: level bits + mask code + 10-bit BCH remainder,
// XORed with the fixed format mask
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = (ecl.format_bits() << 3) | *mask as u32;
    (((data << 10) | bch_remainder(data, FORMAT_INFO_GEN, 5, 10)) ^ FORMAT_INFO_MASK)
        & ((1 << FORMAT_INFO_BIT_LEN) - 1)
}

const fn bch_remainder(data: u32, gen: u32, data_bits: u32, gen_degree: u32) -> u32 {
    let mut rem = data << gen_degree;
    let mut i = data_bits + gen_degree;
    while i > gen_degree {
        i -= 1;
        if rem >> i & 1 == 1 {
            rem ^= gen << (i - gen_degree);
        }
    }
    rem
}

// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Metadata {
    pub version: Option<Version>,
    pub ec_level: Option<ECLevel>,
    pub mask: Option<MaskPattern>,
}

impl Metadata {
    pub fn new(
        version: Option<Version>,
        ec_level: Option<ECLevel>,
        mask: Option<MaskPattern>,
    ) -> Self {
        Self { version, ec_level, mask }
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.version, self.ec_level, self.mask) {
            (Some(v), Some(e), Some(m)) => {
                write!(f, "{{ Version: {:?}, Ec level: {:?}, Mask: {:?} }}", *v, e, *m)
            }
            (Some(v), Some(e), None) => {
                write!(f, "{{ Version: {:?}, Ec level: {:?}, Mask: None }}", *v, e)
            }
            _ => write!(f, "{{ }}"),
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

pub const MAX_VERSION: usize = 40;

pub const MAX_QR_WIDTH: usize = 177;

pub const MAX_QR_SIZE: usize = MAX_QR_WIDTH * MAX_QR_WIDTH;

pub const FORMAT_INFO_BIT_LEN: usize = 15;

pub const VERSION_INFO_BIT_LEN: usize = 18;

const FORMAT_INFO_GEN: u32 = 0b101_0011_0111;

const FORMAT_INFO_MASK: u32 = 0b101_0100_0001_0010;

const VERSION_INFO_GEN: u32 = 0b1_1111_0010_0101;

// MSB first; main copy around the top-left finder, side copy split between
// the bottom-left and top-right finders
pub const FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub const FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

// MSB first; 6x3 block above the bottom-left finder
pub const VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

// MSB first; 3x6 block beside the top-right finder
pub const VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

fn table_entry(table: &[usize; MAX_VERSION], version: usize) -> QRResult<usize> {
    version
        .checked_sub(1)
        .and_then(|i| table.get(i))
        .copied()
        .ok_or(QRError::InternalTableLookup(version))
}

// Data codewords per version, indexed by ECLevel then version - 1
static DATA_CODEWORDS: [[usize; MAX_VERSION]; 4] = [
    [
        19, 34, 55, 80, 108, 136, 156, 194, 232, 274, 324, 370, 428, 461, 523, 589, 647, 721, 795,
        861, 932, 1006, 1094, 1174, 1276, 1370, 1468, 1531, 1631, 1735, 1843, 1955, 2071, 2191,
        2306, 2434, 2566, 2702, 2812, 2956,
    ],
    [
        16, 28, 44, 64, 86, 108, 124, 154, 182, 216, 254, 290, 334, 365, 415, 453, 507, 563, 627,
        669, 714, 782, 860, 914, 1000, 1062, 1128, 1193, 1267, 1373, 1455, 1541, 1631, 1725, 1812,
        1914, 1992, 2102, 2216, 2334,
    ],
    [
        13, 22, 34, 48, 62, 76, 88, 110, 132, 154, 180, 206, 244, 261, 295, 325, 367, 397, 445,
        485, 512, 568, 614, 664, 718, 754, 808, 871, 911, 985, 1033, 1115, 1171, 1231, 1286, 1354,
        1426, 1502, 1582, 1666,
    ],
    [
        9, 16, 26, 36, 46, 60, 66, 86, 100, 122, 140, 158, 180, 197, 223, 253, 283, 313, 341, 385,
        406, 442, 464, 514, 538, 596, 628, 661, 701, 745, 793, 845, 901, 961, 986, 1054, 1096,
        1142, 1222, 1276,
    ],
];

// Number of data blocks, indexed by ECLevel then version - 1
static BLOCK_COUNT: [[usize; MAX_VERSION]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

// Error correction codewords per block, indexed by ECLevel then version - 1
static ECC_PER_BLOCK: [[usize; MAX_VERSION]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

// Total codewords per version (data + error correction)
static TOTAL_CODEWORDS: [usize; MAX_VERSION] = [
    26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761,
    2876, 3034, 3196, 3362, 3532, 3706,
];

// Alignment pattern center coordinates per version
static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; MAX_VERSION] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

#[cfg(test)]
mod metadata_tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_table_consistency() {
        for v in 1..=MAX_VERSION {
            let ver = Version::new(v);
            let total = ver.total_codewords().unwrap();
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let data = ver.data_codewords(ecl).unwrap();
                let blocks = ver.block_count(ecl).unwrap();
                let ecc = ver.ecc_per_block(ecl).unwrap();
                assert_eq!(data + blocks * ecc, total, "v{v} {ecl:?}");
            }
        }
    }

    #[test]
    fn test_table_lookup_out_of_range() {
        assert_eq!(table_entry(&TOTAL_CODEWORDS, 0), Err(QRError::InternalTableLookup(0)));
        assert_eq!(table_entry(&TOTAL_CODEWORDS, 41), Err(QRError::InternalTableLookup(41)));
    }

    #[test]
    fn test_alignment_positions() {
        assert!(Version::new(1).alignment_pattern().is_empty());
        for v in 2..=MAX_VERSION {
            let ver = Version::new(v);
            let poses = ver.alignment_pattern();
            assert_eq!(*poses.last().unwrap() as usize, ver.width() - 7, "v{v}");
            if v > 6 {
                assert_eq!(poses[0], 6, "v{v}");
            }
        }
    }

    #[test_case(7, 0x07C94)]
    #[test_case(8, 0x085BC)]
    #[test_case(21, 0x15683)]
    #[test_case(40, 0x28C69)]
    fn test_version_info(version: usize, exp_info: u32) {
        assert_eq!(Version::new(version).info(), exp_info);
    }

    #[test_case(ECLevel::L, 0, 0b111011111000100)]
    #[test_case(ECLevel::M, 0, 0b101010000010010)]
    #[test_case(ECLevel::Q, 7, 0b010101111101101)]
    #[test_case(ECLevel::H, 3, 0b001100111010000)]
    fn test_format_info(ecl: ECLevel, mask: u8, exp_info: u32) {
        assert_eq!(format_info(ecl, MaskPattern::new(mask)), exp_info);
    }

    #[test]
    fn test_ec_level_conversion() {
        assert_eq!(ECLevel::try_from(2), Ok(ECLevel::Q));
        assert_eq!(ECLevel::try_from(4), Err(QRError::InvalidCorrectionLevel));
    }
}
