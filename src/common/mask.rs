use std::ops::Deref;

use super::error::QRError;
use super::metadata::Color;
use crate::builder::QR;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = QRError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 8 {
            Ok(Self(value))
        } else {
            Err(QRError::InvalidMaskingPattern)
        }
    }
}

// Module is flipped where the pattern function evaluates true at (row, col)
mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid masking pattern"),
        }
    }
}

// Mask evaluation
//------------------------------------------------------------------------------

// Tries all 8 patterns on a clone, commits the one with the lowest total
// penalty; ties resolve to the lowest pattern number
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let best_mask = (0..8)
        .min_by_key(|m| {
            let mut qr = qr.clone();
            qr.apply_mask(MaskPattern(*m));
            compute_total_penalty(&qr)
        })
        .expect("Should return atleast 1 mask");
    let best_mask = MaskPattern(best_mask);
    qr.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let run_pen = compute_run_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    run_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// Rule 1: each maximal same-color run of 5 or more scores length - 2,
// over all rows and all columns
fn compute_run_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        pen += line_run_penalty((0..w).map(|j| *qr.get(i, j)));
        pen += line_run_penalty((0..w).map(|j| *qr.get(j, i)));
    }
    pen
}

fn line_run_penalty(line: impl Iterator<Item = Color>) -> u32 {
    let mut pen = 0;
    let mut run_len = 0u32;
    let mut last = None;
    for clr in line {
        if last == Some(clr) {
            run_len += 1;
        } else {
            if run_len >= 5 {
                pen += run_len - 2;
            }
            last = Some(clr);
            run_len = 1;
        }
    }
    if run_len >= 5 {
        pen += run_len - 2;
    }
    pen
}

// Rule 2: every 2x2 uniform block scores 3, overlaps included
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// Rule 3: finder-like run 1011101 flanked by 4 light modules on either
// side, scanned along rows and columns, scores 40 per occurrence
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    use Color::{Dark as D, Light as L};
    static PATTERNS: [[Color; 11]; 2] =
        [[D, L, D, D, D, L, D, L, L, L, L], [L, L, L, L, D, L, D, D, D, L, D]];

    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        for j in 0..=w - 11 {
            let get: Box<dyn Fn(i16) -> Color> =
                if is_hor { Box::new(|c| *qr.get(i, c)) } else { Box::new(|r| *qr.get(r, i)) };
            for pattern in PATTERNS.iter() {
                if (j..j + 11).map(&*get).eq(pattern.iter().copied()) {
                    pen += 40;
                }
            }
        }
    }
    pen
}

// Rule 4: deviation of the dark module share from 50%, floored, doubled
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules() as u32;
    let w = qr.width() as u32;
    let tot = w * w;
    let diff = (dark_cnt * 100).abs_diff(50 * tot);
    (diff / tot) * 2
}

#[cfg(test)]
mod mask_tests {
    use test_case::test_case;

    use super::*;
    use crate::builder::QRBuilder;
    use crate::common::codec::Mode;
    use crate::common::metadata::ECLevel;

    #[test_case(0, &[(0, 0), (1, 1), (2, 0)], &[(0, 1), (1, 0)])]
    #[test_case(1, &[(0, 0), (0, 5), (2, 3)], &[(1, 0), (3, 7)])]
    #[test_case(2, &[(0, 0), (4, 3), (1, 6)], &[(0, 1), (5, 5)])]
    #[test_case(3, &[(0, 0), (1, 2), (2, 1)], &[(0, 1), (2, 2)])]
    #[test_case(4, &[(0, 0), (1, 2), (4, 6)], &[(2, 0), (0, 3)])]
    fn test_mask_functions(pattern: u8, flipped: &[(i16, i16)], kept: &[(i16, i16)]) {
        let f = MaskPattern::new(pattern).mask_function();
        for &(r, c) in flipped {
            assert!(f(r, c), "Pattern {pattern} should flip ({r}, {c})");
        }
        for &(r, c) in kept {
            assert!(!f(r, c), "Pattern {pattern} shouldn't flip ({r}, {c})");
        }
    }

    #[test]
    fn test_mask_pattern_conversion() {
        assert_eq!(MaskPattern::try_from(7), Ok(MaskPattern::new(7)));
        assert_eq!(MaskPattern::try_from(8), Err(QRError::InvalidMaskingPattern));
    }

    #[test]
    fn test_line_run_penalty() {
        use Color::{Dark as D, Light as L};
        assert_eq!(line_run_penalty([D, D, D, D].iter().copied()), 0);
        assert_eq!(line_run_penalty([D, D, D, D, D].iter().copied()), 3);
        assert_eq!(line_run_penalty([L; 7].iter().copied()), 5);
        // Two maximal runs score independently
        assert_eq!(line_run_penalty([D, D, D, D, D, L, L, L, L, L, L].iter().copied()), 3 + 4);
    }

    #[test]
    fn test_block_and_balance_penalty_on_blank_grid() {
        use crate::builder::QR;
        use crate::common::metadata::Version;

        // Fresh grid reads all light: every 2x2 window is uniform and the
        // dark share is 0%
        let qr = QR::new(Version::new(1), ECLevel::L);
        assert_eq!(compute_block_penalty(&qr), 3 * 20 * 20);
        assert_eq!(compute_balance_penalty(&qr), 100);
    }

    #[test]
    fn test_checkerboard_scores_zero() {
        use crate::builder::{Module, QR};
        use crate::common::metadata::Version;

        let mut qr = QR::new(Version::new(1), ECLevel::L);
        for r in 0..21 {
            for c in 0..21 {
                let clr = if (r + c) & 1 == 0 { Color::Dark } else { Color::Light };
                qr.set(r, c, Module::Data(clr));
            }
        }
        assert_eq!(compute_total_penalty(&qr), 0);
    }

    #[test]
    fn test_finder_pattern_penalty() {
        use crate::builder::{Module, QR};
        use crate::common::metadata::Version;

        // Row 0 carries 1011101 followed by four light modules
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        for c in [0, 2, 3, 4, 6] {
            qr.set(0, c, Module::Data(Color::Dark));
        }
        assert_eq!(compute_finder_pattern_penalty(&qr, true), 40);
        assert_eq!(compute_finder_pattern_penalty(&qr, false), 0);
    }

    #[test]
    fn test_best_mask_is_minimal_and_first() {
        let data = "HELLO WORLD";
        let auto = QRBuilder::new(data)
            .mode(Mode::Alphanumeric)
            .ec_level(ECLevel::Q)
            .build()
            .unwrap();
        let best = auto.mask().unwrap();

        let mut penalties = Vec::new();
        for m in 0..8 {
            let qr = QRBuilder::new(data)
                .mode(Mode::Alphanumeric)
                .ec_level(ECLevel::Q)
                .mask(MaskPattern::new(m))
                .build()
                .unwrap();
            penalties.push(compute_total_penalty(&qr));
        }
        let min = *penalties.iter().min().unwrap();
        assert_eq!(penalties[*best as usize], min);
        // Lowest pattern number wins ties
        let first_min = penalties.iter().position(|&p| p == min).unwrap();
        assert_eq!(*best as usize, first_min);
    }

    #[test]
    fn test_masking_is_deterministic() {
        let a = QRBuilder::new("determinism check 123").build().unwrap();
        let b = QRBuilder::new("determinism check 123").build().unwrap();
        assert_eq!(a.mask(), b.mask());
        assert_eq!(a.to_str(1), b.to_str(1));
    }
}
