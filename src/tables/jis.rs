//! JIS X0201 / X0208 / X0212 charts and their byte-layout transforms.
//!
//! The 94x94 sets are described once in raw JIS row/cell coordinates and
//! realized per byte layout: raw (the component charsets), EUC (cells
//! offset by 0x80), and Shift_JIS (two JIS rows folded per lead byte with
//! a gap at trail 0x7F). Kana and full-width alphanumeric rows map onto
//! contiguous Unicode runs; representative kanji rows are carried as
//! explicit lists.

use super::to_chars;
use crate::double_byte::{DoubleByteTables, Seg};
use crate::single_byte::SingleByteTable;
use std::sync::LazyLock;

/// JIS X0201: ASCII with yen sign and overline, plus half-width katakana
/// in the upper half.
fn x0201_chart() -> [u16; 256] {
    let mut chart = [0xFFFDu16; 256];
    for (i, cell) in chart.iter_mut().enumerate().take(0x80) {
        *cell = i as u16;
    }
    chart[0x5C] = 0x00A5;
    chart[0x7E] = 0x203E;
    for b in 0xA1..=0xDFusize {
        chart[b] = 0xFF61 + (b as u16 - 0xA1);
    }
    chart
}

/// JIS X0208 rows in raw row/cell bytes (0x21..=0x7E).
const X0208_SEGMENTS: &[Seg] = &[
    // Row 1: ideographic space and core punctuation.
    Seg::List {
        lead: 0x21,
        start: 0x21,
        chars: &[
            0x3000, 0x3001, 0x3002, 0xFF0C, 0xFF0E, 0x30FB, 0xFF1A, 0xFF1B, 0xFF1F, 0xFF01,
        ],
    },
    // Row 3: full-width digits and Latin letters.
    Seg::Run { lead: 0x23, start: 0x30, ucs: 0xFF10, len: 10 },
    Seg::Run { lead: 0x23, start: 0x41, ucs: 0xFF21, len: 26 },
    Seg::Run { lead: 0x23, start: 0x61, ucs: 0xFF41, len: 26 },
    // Row 4: hiragana, row 5: katakana.
    Seg::Run { lead: 0x24, start: 0x21, ucs: 0x3041, len: 83 },
    Seg::Run { lead: 0x25, start: 0x21, ucs: 0x30A1, len: 86 },
    // Row 16: first kanji row.
    Seg::List {
        lead: 0x30,
        start: 0x21,
        chars: &[
            0x4E9C, 0x5516, 0x5A03, 0x963F, 0x54C0, 0x611B, 0x6328, 0x59F6, 0x9022, 0x8475,
            0x831C, 0x7A50, 0x60AA, 0x63E1, 0x6E25, 0x65ED, 0x8466, 0x82A6, 0x9BF5, 0x6893,
            0x5727, 0x65A1,
        ],
    },
    // Anchors in later kanji rows.
    Seg::List { lead: 0x34, start: 0x41, chars: &[0x6F22] },
    Seg::List { lead: 0x3B, start: 0x7A, chars: &[0x5B57] },
];

/// JIS X0212 supplementary rows (raw coordinates).
const X0212_SEGMENTS: &[Seg] = &[Seg::List {
    lead: 0x30,
    start: 0x21,
    chars: &[
        0x4E02, 0x4E04, 0x4E05, 0x4E0C, 0x4E12, 0x4E1F, 0x4E23, 0x4E24, 0x4E28, 0x4E2B,
    ],
}];

/// NEC row 13 extension: circled digits and Roman numerals.
const VENDOR_SEGMENTS: &[Seg] = &[
    Seg::Run { lead: 0x2D, start: 0x21, ucs: 0x2460, len: 20 },
    Seg::Run { lead: 0x2D, start: 0x35, ucs: 0x2160, len: 10 },
];

/// Shifts raw rows into the EUC layout (both bytes offset by 0x80).
fn euc(segments: &[Seg]) -> Vec<Seg> {
    segments
        .iter()
        .map(|seg| match *seg {
            Seg::Run { lead, start, ucs, len } => Seg::Run {
                lead: lead + 0x80,
                start: start + 0x80,
                ucs,
                len,
            },
            Seg::List { lead, start, chars } => Seg::List {
                lead: lead + 0x80,
                start: start + 0x80,
                chars,
            },
        })
        .collect()
}

fn sjis_lead(jis_row: u8) -> u8 {
    let lead = (jis_row + 1) / 2 + 0x70;
    if lead >= 0xA0 { lead + 0x40 } else { lead }
}

fn sjis_trail(jis_row: u8, cell: u8) -> u8 {
    if jis_row & 1 == 1 {
        // Odd rows fill trails 0x40..=0x9E, skipping 0x7F.
        if cell >= 0x60 { cell + 0x20 } else { cell + 0x1F }
    } else {
        cell + 0x7E
    }
}

/// Folds raw rows into the Shift_JIS layout. A segment in an odd row that
/// crosses cell 0x60 splits at the trail-byte gap.
fn sjis(segments: &[Seg]) -> Vec<Seg> {
    let mut out = Vec::new();
    for seg in segments {
        match *seg {
            Seg::Run { lead, start, ucs, len } => {
                let split = lead & 1 == 1 && start < 0x60 && start as u16 + len as u16 > 0x60;
                if split {
                    let first = 0x60 - start;
                    out.push(Seg::Run {
                        lead: sjis_lead(lead),
                        start: sjis_trail(lead, start),
                        ucs,
                        len: first,
                    });
                    out.push(Seg::Run {
                        lead: sjis_lead(lead),
                        start: sjis_trail(lead, 0x60),
                        ucs: ucs + first as u16,
                        len: len - first,
                    });
                } else {
                    out.push(Seg::Run {
                        lead: sjis_lead(lead),
                        start: sjis_trail(lead, start),
                        ucs,
                        len,
                    });
                }
            }
            Seg::List { lead, start, chars } => {
                let len = chars.len() as u8;
                let split = lead & 1 == 1 && start < 0x60 && start as u16 + len as u16 > 0x60;
                if split {
                    let first = (0x60 - start) as usize;
                    out.push(Seg::List {
                        lead: sjis_lead(lead),
                        start: sjis_trail(lead, start),
                        chars: &chars[..first],
                    });
                    out.push(Seg::List {
                        lead: sjis_lead(lead),
                        start: sjis_trail(lead, 0x60),
                        chars: &chars[first..],
                    });
                } else {
                    out.push(Seg::List {
                        lead: sjis_lead(lead),
                        start: sjis_trail(lead, start),
                        chars,
                    });
                }
            }
        }
    }
    out
}

/// JIS X0201 as a single-byte charset.
pub(crate) static JIS_X0201: LazyLock<SingleByteTable> =
    LazyLock::new(|| SingleByteTable::from_b2c(to_chars(&x0201_chart()), false, false));

/// JIS X0208 in raw row/cell bytes (the component charset).
pub(crate) static X0208_JIS: LazyLock<DoubleByteTables> = LazyLock::new(|| {
    DoubleByteTables::build(
        DoubleByteTables::sb_unmappable(),
        X0208_SEGMENTS,
        0x21,
        0x7E,
        false,
    )
});

/// JIS X0208 in the EUC-JP layout.
pub(crate) static X0208_EUC: LazyLock<DoubleByteTables> = LazyLock::new(|| {
    DoubleByteTables::build(
        DoubleByteTables::sb_unmappable(),
        &euc(X0208_SEGMENTS),
        0xA1,
        0xFE,
        false,
    )
});

/// JIS X0212 in raw row/cell bytes (the component charset).
pub(crate) static X0212_JIS: LazyLock<DoubleByteTables> = LazyLock::new(|| {
    DoubleByteTables::build(
        DoubleByteTables::sb_unmappable(),
        X0212_SEGMENTS,
        0x21,
        0x7E,
        false,
    )
});

/// JIS X0212 in the EUC-JP layout (reached through SS3).
pub(crate) static X0212_EUC: LazyLock<DoubleByteTables> = LazyLock::new(|| {
    DoubleByteTables::build(
        DoubleByteTables::sb_unmappable(),
        &euc(X0212_SEGMENTS),
        0xA1,
        0xFE,
        false,
    )
});

/// Vendor extension rows in the EUC-JP layout.
pub(crate) static VENDOR_EUC: LazyLock<DoubleByteTables> = LazyLock::new(|| {
    DoubleByteTables::build(
        DoubleByteTables::sb_unmappable(),
        &euc(VENDOR_SEGMENTS),
        0xA1,
        0xFE,
        false,
    )
});

/// Shift_JIS: JIS X0201 single bytes plus the folded X0208 rows.
pub(crate) static SHIFT_JIS: LazyLock<DoubleByteTables> =
    LazyLock::new(|| DoubleByteTables::build(x0201_chart(), &sjis(X0208_SEGMENTS), 0x40, 0xFC, false));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x0201_layout() {
        let chart = x0201_chart();
        assert_eq!(chart[0x41], 0x41);
        assert_eq!(chart[0x5C], 0x00A5);
        assert_eq!(chart[0x7E], 0x203E);
        assert_eq!(chart[0xB1], 0xFF71);
        assert_eq!(chart[0x80], 0xFFFD);
    }

    #[test]
    fn sjis_lead_folding() {
        assert_eq!(sjis_lead(0x21), 0x81);
        assert_eq!(sjis_lead(0x24), 0x82);
        assert_eq!(sjis_lead(0x34), 0x8A);
        assert_eq!(sjis_lead(0x5F), 0xE0);
    }

    #[test]
    fn sjis_trail_gap() {
        // Odd row trails skip 0x7F.
        assert_eq!(sjis_trail(0x21, 0x21), 0x40);
        assert_eq!(sjis_trail(0x21, 0x5F), 0x7E);
        assert_eq!(sjis_trail(0x21, 0x60), 0x80);
        // Even row trails start at 0x9F.
        assert_eq!(sjis_trail(0x24, 0x21), 0x9F);
    }

    #[test]
    fn sjis_anchors() {
        assert_eq!(SHIFT_JIS.decode_double(0x81, 0x40), 0x3000);
        assert_eq!(SHIFT_JIS.decode_double(0x82, 0xA0), 0x3042);
        assert_eq!(SHIFT_JIS.decode_double(0x83, 0x41), 0x30A2);
        assert_eq!(SHIFT_JIS.decode_double(0x8A, 0xBF), 0x6F22);
    }

    #[test]
    fn euc_anchors() {
        assert_eq!(X0208_EUC.decode_double(0xA4, 0xA2), 0x3042);
        assert_eq!(X0208_EUC.decode_double(0xB4, 0xC1), 0x6F22);
        assert_eq!(X0208_EUC.decode_double(0xBB, 0xFA), 0x5B57);
        assert_eq!(X0212_EUC.decode_double(0xB0, 0xA1), 0x4E02);
    }
}
