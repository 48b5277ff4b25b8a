//! Big5 rows and the HKSCS overlay charts.
//!
//! The base rows carry the leading punctuation block, the opening
//! stroke-order kanji run, and well-known anchors (the euro at 0xA3E1,
//! 中華民國, U+FFED at 0xF9FE). The HKSCS overlay carries one BMP row
//! (0x877E, an HKSCS-2008 addition) and a supplementary-plane row in the
//! CJK Extension B block.

use crate::big5::HkscsTables;
use crate::double_byte::{DoubleByteTables, Seg};
use std::sync::LazyLock;

const BIG5_SEGMENTS: &[Seg] = &[
    // Lead 0xA1: ideographic space and punctuation.
    Seg::List {
        lead: 0xA1,
        start: 0x40,
        chars: &[
            0x3000, 0xFF0C, 0x3001, 0x3002, 0xFF0E, 0x2027, 0xFF1B, 0xFF1A,
        ],
    },
    // Euro sign.
    Seg::List { lead: 0xA3, start: 0xE1, chars: &[0x20AC] },
    // Lead 0xA4: the first stroke-count kanji run.
    Seg::List {
        lead: 0xA4,
        start: 0x40,
        chars: &[
            0x4E00, 0x4E59, 0x4E01, 0x4E03, 0x4E43, 0x4E5D, 0x4E86, 0x4E8C, 0x4EBA, 0x513F,
            0x5165, 0x516B,
        ],
    },
    Seg::List { lead: 0xA4, start: 0xA4, chars: &[0x4E2D] },
    Seg::List { lead: 0xA5, start: 0xC1, chars: &[0x6C11] },
    Seg::List { lead: 0xB0, start: 0xEA, chars: &[0x570B] },
    Seg::List { lead: 0xB5, start: 0xD8, chars: &[0x83EF] },
    Seg::List { lead: 0xF9, start: 0xFE, chars: &[0xFFED] },
];

fn ascii_sb() -> [u16; 256] {
    std::array::from_fn(|i| if i < 0x80 { i as u16 } else { 0xFFFD })
}

/// Big5 base tables (ETEN layout).
pub(crate) static BIG5: LazyLock<DoubleByteTables> =
    LazyLock::new(|| DoubleByteTables::build(ascii_sb(), BIG5_SEGMENTS, 0x40, 0xFE, true));

/// HKSCS overlay: BMP layer plus supplementary-plane layer.
pub(crate) static HKSCS: LazyLock<HkscsTables> = LazyLock::new(|| {
    HkscsTables::build(
        &[(0x87, 0x7E, &[0x3EEC])],
        &[(
            0x88,
            0x40,
            &[0x20021, 0x20024, 0x2003E, 0x20046, 0x20049],
        )],
        0x40,
        0xFE,
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_anchors() {
        assert_eq!(BIG5.decode_double(0xA1, 0x40), 0x3000);
        assert_eq!(BIG5.decode_double(0xA4, 0x40), 0x4E00);
        assert_eq!(BIG5.decode_double(0xA4, 0xA4), 0x4E2D);
        assert_eq!(BIG5.decode_double(0xA3, 0xE1), 0x20AC);
    }

    #[test]
    fn trail_gap_is_unmapped() {
        // 0x7F..0xA0 never holds a mapping in the base rows.
        assert_eq!(BIG5.decode_double(0xA4, 0x7F), 0xFFFD);
    }
}
