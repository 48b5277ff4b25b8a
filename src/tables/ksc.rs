//! KS X 1001 rows for EUC-KR.
//!
//! Row 4 carries the compatibility jamo as one contiguous Unicode run;
//! the hangul-syllable region is represented by its leading anchors.

use crate::double_byte::{DoubleByteTables, Seg};
use std::sync::LazyLock;

const KSX1001_SEGMENTS: &[Seg] = &[
    // Row 4: compatibility jamo.
    Seg::Run { lead: 0xA4, start: 0xA1, ucs: 0x3131, len: 51 },
    // Row 16: first hangul syllables.
    Seg::List {
        lead: 0xB0,
        start: 0xA1,
        chars: &[0xAC00, 0xAC01],
    },
];

fn ascii_sb() -> [u16; 256] {
    std::array::from_fn(|i| if i < 0x80 { i as u16 } else { 0xFFFD })
}

/// EUC-KR: ASCII single bytes plus KS X 1001 in the EUC layout.
pub(crate) static EUC_KR: LazyLock<DoubleByteTables> =
    LazyLock::new(|| DoubleByteTables::build(ascii_sb(), KSX1001_SEGMENTS, 0xA1, 0xFE, true));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jamo_and_hangul_anchors() {
        assert_eq!(EUC_KR.decode_double(0xA4, 0xA1), 0x3131);
        assert_eq!(EUC_KR.decode_double(0xB0, 0xA1), 0xAC00);
        assert_eq!(EUC_KR.decode_double(0xB0, 0xA2), 0xAC01);
    }
}
