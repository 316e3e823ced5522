use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks the zigzag scan order: two-module columns from the bottom right,
// alternating upward and downward, hopping over the vertical timing column
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
    vert_timing_col: i16,
}

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w, vert_timing_col: 6 }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        let adjusted_col = if self.c <= self.vert_timing_col { self.c + 1 } else { self.c };
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == self.vert_timing_col + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use std::collections::HashSet;

    use super::EncRegionIter;
    use crate::common::metadata::Version;

    #[test]
    fn test_enc_region_start_order() {
        let mut it = EncRegionIter::new(Version::new(1));
        let head = it.by_ref().take(6).collect::<Vec<_>>();
        assert_eq!(head, vec![(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19)]);
    }

    #[test]
    fn test_enc_region_covers_all_but_timing_column() {
        for v in [1, 2, 7, 14, 40] {
            let version = Version::new(v);
            let w = version.width() as i16;
            let coords = EncRegionIter::new(version).collect::<Vec<_>>();
            assert_eq!(coords.len(), (w * w - w) as usize);

            let unique = coords.iter().copied().collect::<HashSet<_>>();
            assert_eq!(unique.len(), coords.len());
            assert!(coords.iter().all(|&(r, c)| {
                (0..w).contains(&r) && (0..w).contains(&c) && c != 6
            }));
        }
    }
}
