//! Single-byte charts: US-ASCII, the ISO-8859 series, and IBM CP 037.
//!
//! The ISO charts are expressed as Latin-1 plus an override list for the
//! positions that differ; CP 037 is transcribed in full from the IBM
//! character data tables for CCSID 037.

use super::to_chars;
use crate::single_byte::SingleByteTable;
use std::sync::LazyLock;

const UNMAPPED: u16 = 0xFFFD;

fn latin1() -> [u16; 256] {
    std::array::from_fn(|i| i as u16)
}

fn with_overrides(mut base: [u16; 256], overrides: &[(u8, u16)]) -> [u16; 256] {
    for &(b, u) in overrides {
        base[b as usize] = u;
    }
    base
}

fn ascii() -> [u16; 256] {
    std::array::from_fn(|i| if i < 0x80 { i as u16 } else { UNMAPPED })
}

/// US-ASCII. Bytes with the high bit set are malformed, not unmappable.
pub(crate) static US_ASCII: LazyLock<SingleByteTable> =
    LazyLock::new(|| SingleByteTable::from_b2c(to_chars(&ascii()), true, true));

/// ISO-8859-1, the identity chart.
pub(crate) static ISO_8859_1: LazyLock<SingleByteTable> =
    LazyLock::new(|| SingleByteTable::from_b2c(to_chars(&latin1()), true, false));

/// ISO-8859-2 (Latin-2), Central European.
pub(crate) static ISO_8859_2: LazyLock<SingleByteTable> = LazyLock::new(|| {
    let chart = with_overrides(
        latin1(),
        &[
            (0xA1, 0x0104),
            (0xA2, 0x02D8),
            (0xA3, 0x0141),
            (0xA5, 0x013D),
            (0xA6, 0x015A),
            (0xA9, 0x0160),
            (0xAA, 0x015E),
            (0xAB, 0x0164),
            (0xAC, 0x0179),
            (0xAE, 0x017D),
            (0xAF, 0x017B),
            (0xB1, 0x0105),
            (0xB2, 0x02DB),
            (0xB3, 0x0142),
            (0xB5, 0x013E),
            (0xB6, 0x015B),
            (0xB7, 0x02C7),
            (0xB9, 0x0161),
            (0xBA, 0x015F),
            (0xBB, 0x0165),
            (0xBC, 0x017A),
            (0xBD, 0x02DD),
            (0xBE, 0x017E),
            (0xBF, 0x017C),
            (0xC0, 0x0154),
            (0xC3, 0x0102),
            (0xC5, 0x0139),
            (0xC6, 0x0106),
            (0xC8, 0x010C),
            (0xCA, 0x0118),
            (0xCC, 0x011A),
            (0xCF, 0x010E),
            (0xD0, 0x0110),
            (0xD1, 0x0143),
            (0xD2, 0x0147),
            (0xD5, 0x0150),
            (0xD8, 0x0158),
            (0xD9, 0x016E),
            (0xDB, 0x0170),
            (0xDE, 0x0162),
            (0xE0, 0x0155),
            (0xE3, 0x0103),
            (0xE5, 0x013A),
            (0xE6, 0x0107),
            (0xE8, 0x010D),
            (0xEA, 0x0119),
            (0xEC, 0x011B),
            (0xEF, 0x010F),
            (0xF0, 0x0111),
            (0xF1, 0x0144),
            (0xF2, 0x0148),
            (0xF5, 0x0151),
            (0xF8, 0x0159),
            (0xF9, 0x016F),
            (0xFB, 0x0171),
            (0xFE, 0x0163),
            (0xFF, 0x02D9),
        ],
    );
    SingleByteTable::from_b2c(to_chars(&chart), true, false)
});

/// ISO-8859-5, Cyrillic. Mostly two contiguous runs off U+0400.
pub(crate) static ISO_8859_5: LazyLock<SingleByteTable> = LazyLock::new(|| {
    let mut chart = latin1();
    for b in 0xA1..=0xACusize {
        chart[b] = 0x0401 + (b as u16 - 0xA1);
    }
    chart[0xAD] = 0x00AD;
    chart[0xAE] = 0x040E;
    chart[0xAF] = 0x040F;
    for b in 0xB0..=0xEFusize {
        chart[b] = 0x0410 + (b as u16 - 0xB0);
    }
    chart[0xF0] = 0x2116;
    for b in 0xF1..=0xFCusize {
        chart[b] = 0x0451 + (b as u16 - 0xF1);
    }
    chart[0xFD] = 0x00A7;
    chart[0xFE] = 0x045E;
    chart[0xFF] = 0x045F;
    SingleByteTable::from_b2c(to_chars(&chart), true, false)
});

/// ISO-8859-7:2003, Greek (includes the euro revision).
pub(crate) static ISO_8859_7: LazyLock<SingleByteTable> = LazyLock::new(|| {
    let mut chart = latin1();
    for b in 0xA1..=0xFFusize {
        chart[b] = UNMAPPED;
    }
    let overrides: &[(u8, u16)] = &[
        (0xA1, 0x2018),
        (0xA2, 0x2019),
        (0xA3, 0x00A3),
        (0xA4, 0x20AC),
        (0xA5, 0x20AF),
        (0xA6, 0x00A6),
        (0xA7, 0x00A7),
        (0xA8, 0x00A8),
        (0xA9, 0x00A9),
        (0xAA, 0x037A),
        (0xAB, 0x00AB),
        (0xAC, 0x00AC),
        (0xAD, 0x00AD),
        (0xAF, 0x2015),
        (0xB0, 0x00B0),
        (0xB1, 0x00B1),
        (0xB2, 0x00B2),
        (0xB3, 0x00B3),
        (0xB4, 0x0384),
        (0xB5, 0x0385),
        (0xB6, 0x0386),
        (0xB7, 0x00B7),
        (0xB8, 0x0388),
        (0xB9, 0x0389),
        (0xBA, 0x038A),
        (0xBB, 0x00BB),
        (0xBC, 0x038C),
        (0xBD, 0x00BD),
        (0xBE, 0x038E),
        (0xBF, 0x038F),
    ];
    chart = with_overrides(chart, overrides);
    for b in 0xC0..=0xD1usize {
        chart[b] = 0x0390 + (b as u16 - 0xC0);
    }
    for b in 0xD3..=0xFEusize {
        chart[b] = 0x03A3 + (b as u16 - 0xD3);
    }
    SingleByteTable::from_b2c(to_chars(&chart), true, false)
});

/// ISO-8859-15 (Latin-9): Latin-1 with the euro and eight other swaps.
pub(crate) static ISO_8859_15: LazyLock<SingleByteTable> = LazyLock::new(|| {
    let chart = with_overrides(
        latin1(),
        &[
            (0xA4, 0x20AC),
            (0xA6, 0x0160),
            (0xA8, 0x0161),
            (0xB4, 0x017D),
            (0xB8, 0x017E),
            (0xBC, 0x0152),
            (0xBD, 0x0153),
            (0xBE, 0x0178),
        ],
    );
    SingleByteTable::from_b2c(to_chars(&chart), true, false)
});

/// IBM EBCDIC CP 037 (US/Canada), from the CCSID 037 chart.
#[rustfmt::skip]
pub(crate) const CP037_CHART: [u16; 256] = [
    // 0x00
    0x0000, 0x0001, 0x0002, 0x0003, 0x009C, 0x0009, 0x0086, 0x007F,
    0x0097, 0x008D, 0x008E, 0x000B, 0x000C, 0x000D, 0x000E, 0x000F,
    // 0x10
    0x0010, 0x0011, 0x0012, 0x0013, 0x009D, 0x0085, 0x0008, 0x0087,
    0x0018, 0x0019, 0x0092, 0x008F, 0x001C, 0x001D, 0x001E, 0x001F,
    // 0x20
    0x0080, 0x0081, 0x0082, 0x0083, 0x0084, 0x000A, 0x0017, 0x001B,
    0x0088, 0x0089, 0x008A, 0x008B, 0x008C, 0x0005, 0x0006, 0x0007,
    // 0x30
    0x0090, 0x0091, 0x0016, 0x0093, 0x0094, 0x0095, 0x0096, 0x0004,
    0x0098, 0x0099, 0x009A, 0x009B, 0x0014, 0x0015, 0x009E, 0x001A,
    // 0x40
    0x0020, 0x00A0, 0x00E2, 0x00E4, 0x00E0, 0x00E1, 0x00E3, 0x00E5,
    0x00E7, 0x00F1, 0x00A2, 0x002E, 0x003C, 0x0028, 0x002B, 0x007C,
    // 0x50
    0x0026, 0x00E9, 0x00EA, 0x00EB, 0x00E8, 0x00ED, 0x00EE, 0x00EF,
    0x00EC, 0x00DF, 0x0021, 0x0024, 0x002A, 0x0029, 0x003B, 0x00AC,
    // 0x60
    0x002D, 0x002F, 0x00C2, 0x00C4, 0x00C0, 0x00C1, 0x00C3, 0x00C5,
    0x00C7, 0x00D1, 0x00A6, 0x002C, 0x0025, 0x005F, 0x003E, 0x003F,
    // 0x70
    0x00F8, 0x00C9, 0x00CA, 0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF,
    0x00CC, 0x0060, 0x003A, 0x0023, 0x0040, 0x0027, 0x003D, 0x0022,
    // 0x80
    0x00D8, 0x0061, 0x0062, 0x0063, 0x0064, 0x0065, 0x0066, 0x0067,
    0x0068, 0x0069, 0x00AB, 0x00BB, 0x00F0, 0x00FD, 0x00FE, 0x00B1,
    // 0x90
    0x00B0, 0x006A, 0x006B, 0x006C, 0x006D, 0x006E, 0x006F, 0x0070,
    0x0071, 0x0072, 0x00AA, 0x00BA, 0x00E6, 0x00B8, 0x00C6, 0x00A4,
    // 0xA0
    0x00B5, 0x007E, 0x0073, 0x0074, 0x0075, 0x0076, 0x0077, 0x0078,
    0x0079, 0x007A, 0x00A1, 0x00BF, 0x00D0, 0x00DD, 0x00DE, 0x00AE,
    // 0xB0
    0x005E, 0x00A3, 0x00A5, 0x00B7, 0x00A9, 0x00A7, 0x00B6, 0x00BC,
    0x00BD, 0x00BE, 0x005B, 0x005D, 0x00AF, 0x00A8, 0x00B4, 0x00D7,
    // 0xC0
    0x007B, 0x0041, 0x0042, 0x0043, 0x0044, 0x0045, 0x0046, 0x0047,
    0x0048, 0x0049, 0x00AD, 0x00F4, 0x00F6, 0x00F2, 0x00F3, 0x00F5,
    // 0xD0
    0x007D, 0x004A, 0x004B, 0x004C, 0x004D, 0x004E, 0x004F, 0x0050,
    0x0051, 0x0052, 0x00B9, 0x00FB, 0x00FC, 0x00F9, 0x00FA, 0x00FF,
    // 0xE0
    0x005C, 0x00F7, 0x0053, 0x0054, 0x0055, 0x0056, 0x0057, 0x0058,
    0x0059, 0x005A, 0x00B2, 0x00D4, 0x00D6, 0x00D2, 0x00D3, 0x00D5,
    // 0xF0
    0x0030, 0x0031, 0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037,
    0x0038, 0x0039, 0x00B3, 0x00DB, 0x00DC, 0x00D9, 0x00DA, 0x009F,
];

/// IBM CP 037 as a single-byte charset.
pub(crate) static IBM037: LazyLock<SingleByteTable> =
    LazyLock::new(|| SingleByteTable::from_b2c(to_chars(&CP037_CHART), false, false));
