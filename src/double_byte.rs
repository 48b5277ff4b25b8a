//! The double-byte codec family: variable-width (1 or 2 byte) charsets.
//!
//! A charset of this family carries a single-byte sub-table plus one
//! second-byte table per lead byte, bounded by the valid trail range
//! `b2_min..=b2_max`. The encoder side stores char-to-code values where a
//! code of at most 0xFF emits one byte and anything larger emits two bytes
//! big-endian, which is how the table distinguishes widths without a flag.
//!
//! Strategy variants cover the EBCDIC shift-state dialect (SO/SI framed
//! double-byte runs), the DBCS-only dialect (no single-byte repertoire at
//! all), and the "simple" EUC dialect (no SS2/SS3 sub-charsets).

use crate::buffer::{ByteBuffer, CharBuffer};
use crate::coder::CoderResult;
use crate::surrogate::{self, Parser};
use std::sync::LazyLock;

/// Char-to-code and byte-to-char sentinel for unmapped entries.
pub(crate) const UNMAPPABLE: u16 = 0xFFFD;

const SO: u8 = 0x0E;
const SI: u8 = 0x0F;
const SS2: u8 = 0x8E;
const SS3: u8 = 0x8F;

/// Conversion strategy applied over shared [`DoubleByteTables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DoubleByteKind {
    /// Mixed single/double-byte charset (Shift_JIS, Big5).
    Standard,
    /// Every byte begins a pair (JIS X0208/X0212 component charsets).
    DbcsOnly,
    /// IBM host charsets with SO/SI shift framing.
    Ebcdic,
    /// Plain EUC without SS2/SS3 sub-charsets (EUC-KR).
    EucSimple,
}

/// A contiguous run of mappings inside one lead-byte row.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Seg {
    /// Cells mapping to consecutive Unicode code units.
    Run {
        /// Lead byte of the row.
        lead: u8,
        /// First trail byte of the run.
        start: u8,
        /// Unicode code unit of the first cell.
        ucs: u16,
        /// Number of cells.
        len: u8,
    },
    /// Cells mapping to the listed code units.
    List {
        /// Lead byte of the row.
        lead: u8,
        /// First trail byte of the run.
        start: u8,
        /// Code units in trail order.
        chars: &'static [u16],
    },
}

/// Immutable lookup data for one double-byte charset.
#[derive(Debug)]
pub struct DoubleByteTables {
    b2c_sb: [u16; 256],
    b2c: Vec<Option<Box<[u16]>>>,
    b2_min: u8,
    b2_max: u8,
    c2b: Vec<u16>,
    c2b_index: [u32; 256],
    ascii_compatible: bool,
}

impl DoubleByteTables {
    /// Builds tables from a single-byte side plus row segments, deriving
    /// the char-to-code inverse.
    pub(crate) fn build(
        b2c_sb: [u16; 256],
        segments: &[Seg],
        b2_min: u8,
        b2_max: u8,
        ascii_compatible: bool,
    ) -> Self {
        let span = (b2_max - b2_min) as usize + 1;
        let mut b2c: Vec<Option<Box<[u16]>>> = std::iter::repeat_with(|| None).take(256).collect();
        for seg in segments {
            let (lead, start, cells): (u8, u8, Vec<u16>) = match *seg {
                Seg::Run { lead, start, ucs, len } => (
                    lead,
                    start,
                    (0..len as u16).map(|i| ucs + i).collect(),
                ),
                Seg::List { lead, start, chars } => (lead, start, chars.to_vec()),
            };
            let row = b2c[lead as usize]
                .get_or_insert_with(|| vec![UNMAPPABLE; span].into_boxed_slice());
            for (i, &c) in cells.iter().enumerate() {
                row[(start - b2_min) as usize + i] = c;
            }
        }
        // Invert: singles first so a shared character prefers its
        // single-byte form, then pairs.
        fn insert(c2b: &mut Vec<u16>, c2b_index: &mut [u32; 256], unit: u16, code: u16) {
            if unit == UNMAPPABLE {
                return;
            }
            let hi = (unit >> 8) as usize;
            if c2b_index[hi] == 0 {
                c2b_index[hi] = c2b.len() as u32;
                c2b.resize(c2b.len() + 256, UNMAPPABLE);
            }
            let off = c2b_index[hi] as usize + (unit & 0xFF) as usize;
            if c2b[off] == UNMAPPABLE {
                c2b[off] = code;
            }
        }
        let mut c2b = vec![UNMAPPABLE; 256];
        let mut c2b_index = [0u32; 256];
        for (b, &c) in b2c_sb.iter().enumerate() {
            insert(&mut c2b, &mut c2b_index, c, b as u16);
        }
        for (lead, row) in b2c.iter().enumerate() {
            let Some(row) = row else { continue };
            for (i, &c) in row.iter().enumerate() {
                let trail = b2_min as usize + i;
                insert(&mut c2b, &mut c2b_index, c, ((lead as u16) << 8) | trail as u16);
            }
        }
        Self {
            b2c_sb,
            b2c,
            b2_min,
            b2_max,
            c2b,
            c2b_index,
            ascii_compatible,
        }
    }

    /// All-unmappable single-byte side for DBCS-only charsets.
    pub(crate) fn sb_unmappable() -> [u16; 256] {
        [UNMAPPABLE; 256]
    }

    pub(crate) fn decode_single(&self, b: u8) -> u16 {
        self.b2c_sb[b as usize]
    }

    pub(crate) fn decode_double(&self, b1: u8, b2: u8) -> u16 {
        if b2 < self.b2_min || b2 > self.b2_max {
            return UNMAPPABLE;
        }
        match &self.b2c[b1 as usize] {
            Some(row) => row[(b2 - self.b2_min) as usize],
            None => UNMAPPABLE,
        }
    }

    pub(crate) fn has_row(&self, b1: u8) -> bool {
        self.b2c[b1 as usize].is_some()
    }

    pub(crate) fn encode_char(&self, unit: u16) -> u16 {
        let off = self.c2b_index[(unit >> 8) as usize] as usize + (unit & 0xFF) as usize;
        self.c2b[off]
    }
}

pub(crate) struct Decoder {
    tables: &'static DoubleByteTables,
    kind: DoubleByteKind,
    in_double_byte: bool,
}

impl Decoder {
    pub(crate) fn new(tables: &'static LazyLock<DoubleByteTables>, kind: DoubleByteKind) -> Self {
        Self {
            tables: &**tables,
            kind,
            in_double_byte: false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.in_double_byte = false;
    }

    pub(crate) fn decode_loop(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        match self.kind {
            DoubleByteKind::Ebcdic => self.decode_loop_ebcdic(src, dst),
            _ => self.decode_loop_plain(src, dst),
        }
    }

    fn decode_loop_plain(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        if self.tables.ascii_compatible {
            while sp < sl && dp < dl && src.at(sp) < 0x80 {
                dst.write_at(dp, src.at(sp) as u16);
                sp += 1;
                dp += 1;
            }
        }
        let cr = loop {
            if sp >= sl {
                break CoderResult::Underflow;
            }
            let b1 = src.at(sp);
            let mut c = self.tables.decode_single(b1);
            let mut in_size = 1;
            if c == UNMAPPABLE {
                if sl - sp < 2 {
                    break self.malformed_or_underflow(b1);
                }
                let b2 = src.at(sp + 1);
                c = self.tables.decode_double(b1, b2);
                if c == UNMAPPABLE {
                    break self.malformed_or_unmappable(b1, b2);
                }
                in_size = 2;
            }
            if dp >= dl {
                break CoderResult::Overflow;
            }
            dst.write_at(dp, c);
            dp += 1;
            sp += in_size;
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }

    fn decode_loop_ebcdic(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        let cr = loop {
            if sp >= sl {
                break CoderResult::Underflow;
            }
            let b1 = src.at(sp);
            if b1 == SO {
                if self.in_double_byte {
                    break CoderResult::Malformed(1);
                }
                self.in_double_byte = true;
                sp += 1;
                continue;
            }
            if b1 == SI {
                if !self.in_double_byte {
                    break CoderResult::Malformed(1);
                }
                self.in_double_byte = false;
                sp += 1;
                continue;
            }
            if !self.in_double_byte {
                let c = self.tables.decode_single(b1);
                if c == UNMAPPABLE {
                    break CoderResult::Unmappable(1);
                }
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c);
                dp += 1;
                sp += 1;
            } else {
                if sl - sp < 2 {
                    break CoderResult::Underflow;
                }
                let b2 = src.at(sp + 1);
                let c = self.tables.decode_double(b1, b2);
                if c == UNMAPPABLE {
                    break if is_ebcdic_double(b1, b2) {
                        CoderResult::Unmappable(2)
                    } else {
                        CoderResult::Malformed(2)
                    };
                }
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c);
                dp += 1;
                sp += 2;
            }
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }

    fn malformed_or_underflow(&self, b1: u8) -> CoderResult {
        if self.kind == DoubleByteKind::EucSimple && (b1 == SS2 || b1 == SS3) {
            return CoderResult::Malformed(1);
        }
        CoderResult::Underflow
    }

    /// Classifies a failed pair. The sequence is malformed when the lead
    /// owns no second-byte table at all, or when the trail byte is itself a
    /// valid single byte (resynchronizing one byte later can then succeed);
    /// otherwise the pair is well-formed but unmapped.
    fn malformed_or_unmappable(&self, b1: u8, b2: u8) -> CoderResult {
        match self.kind {
            DoubleByteKind::DbcsOnly => CoderResult::Unmappable(2),
            DoubleByteKind::EucSimple => {
                if b1 == SS2 || b1 == SS3 {
                    CoderResult::Malformed(1)
                } else {
                    CoderResult::Unmappable(2)
                }
            }
            _ => {
                if !self.tables.has_row(b1) || self.tables.decode_single(b2) != UNMAPPABLE {
                    CoderResult::Malformed(1)
                } else {
                    CoderResult::Unmappable(2)
                }
            }
        }
    }
}

/// Valid window for EBCDIC host double-byte codes, plus the DBCS space.
fn is_ebcdic_double(b1: u8, b2: u8) -> bool {
    ((0x41..=0xFE).contains(&b1) && (0x41..=0xFE).contains(&b2)) || (b1 == 0x40 && b2 == 0x40)
}

pub(crate) struct Encoder {
    tables: &'static DoubleByteTables,
    kind: DoubleByteKind,
    in_double_byte: bool,
    parser: Parser,
}

impl Encoder {
    pub(crate) fn new(tables: &'static LazyLock<DoubleByteTables>, kind: DoubleByteKind) -> Self {
        Self {
            tables: &**tables,
            kind,
            in_double_byte: false,
            parser: Parser::new(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.in_double_byte = false;
    }

    pub(crate) fn flush(&mut self, dst: &mut ByteBuffer) -> CoderResult {
        if self.kind == DoubleByteKind::Ebcdic && self.in_double_byte {
            if !dst.has_remaining() {
                return CoderResult::Overflow;
            }
            dst.put(SI);
            self.in_double_byte = false;
        }
        CoderResult::Underflow
    }

    pub(crate) fn encode_loop(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        match self.kind {
            DoubleByteKind::Ebcdic => self.encode_loop_ebcdic(src, dst),
            _ => self.encode_loop_plain(src, dst),
        }
    }

    fn encode_loop_plain(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        if self.tables.ascii_compatible {
            while sp < sl && dp < dl && src.at(sp) < 0x80 {
                dst.write_at(dp, src.at(sp) as u8);
                sp += 1;
                dp += 1;
            }
        }
        let cr = loop {
            if sp >= sl {
                break CoderResult::Underflow;
            }
            let c = src.at(sp);
            if surrogate::is_surrogate(c) {
                // No double-byte charset maps outside the BMP.
                break match self.parser.parse(c, src.units(sp + 1, sl)) {
                    Err(e) => e,
                    Ok(_) => CoderResult::Unmappable(self.parser.consumed()),
                };
            }
            let code = self.tables.encode_char(c);
            if code == UNMAPPABLE {
                break CoderResult::Unmappable(1);
            }
            if code > 0xFF {
                if dl - dp < 2 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, (code >> 8) as u8);
                dst.write_at(dp + 1, (code & 0xFF) as u8);
                dp += 2;
            } else {
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, code as u8);
                dp += 1;
            }
            sp += 1;
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }

    fn encode_loop_ebcdic(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        let cr = loop {
            if sp >= sl {
                break CoderResult::Underflow;
            }
            let c = src.at(sp);
            if surrogate::is_surrogate(c) {
                break match self.parser.parse(c, src.units(sp + 1, sl)) {
                    Err(e) => e,
                    Ok(_) => CoderResult::Unmappable(self.parser.consumed()),
                };
            }
            let code = self.tables.encode_char(c);
            if code == UNMAPPABLE {
                break CoderResult::Unmappable(1);
            }
            if code > 0xFF {
                if !self.in_double_byte {
                    if dp >= dl {
                        break CoderResult::Overflow;
                    }
                    dst.write_at(dp, SO);
                    dp += 1;
                    self.in_double_byte = true;
                }
                if dl - dp < 2 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, (code >> 8) as u8);
                dst.write_at(dp + 1, (code & 0xFF) as u8);
                dp += 2;
            } else {
                if self.in_double_byte {
                    if dp >= dl {
                        break CoderResult::Overflow;
                    }
                    dst.write_at(dp, SI);
                    dp += 1;
                    self.in_double_byte = false;
                }
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, code as u8);
                dp += 1;
            }
            sp += 1;
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }
}
