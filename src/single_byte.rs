//! The single-byte codec family: one table entry per byte value.
//!
//! Decoding is a direct 256-entry lookup; encoding goes through a two-level
//! char-to-byte index (a page table keyed by the high byte of the code
//! unit). Page offset 0 addresses a shared all-unmappable page, so a missing
//! page needs no extra branch. ASCII-compatible tables copy runs of ASCII
//! bytes before falling into the table loop.

use crate::buffer::{ByteBuffer, CharBuffer};
use crate::coder::CoderResult;
use crate::surrogate::{self, Parser};
use std::sync::LazyLock;

/// Byte-to-char sentinel for unmapped entries.
pub(crate) const UNMAPPABLE_DECODING: char = '\u{FFFD}';
/// Char-to-byte sentinel for unmapped entries.
pub(crate) const UNMAPPABLE_ENCODING: u16 = 0xFFFD;

/// Immutable lookup data for one single-byte charset.
#[derive(Debug)]
pub struct SingleByteTable {
    b2c: [char; 256],
    c2b: Vec<u16>,
    c2b_index: [u32; 256],
    ascii_compatible: bool,
    unmapped_is_malformed: bool,
}

impl SingleByteTable {
    /// Builds a table from its byte-to-char side, deriving the inverse.
    ///
    /// `unmapped_is_malformed` classifies unmapped bytes as malformed input
    /// rather than unmappable characters (US-ASCII: a byte with the high
    /// bit set is not a legal unit at all).
    pub(crate) fn from_b2c(
        b2c: [char; 256],
        ascii_compatible: bool,
        unmapped_is_malformed: bool,
    ) -> Self {
        // Page 0 is the shared all-unmappable page.
        let mut c2b = vec![UNMAPPABLE_ENCODING; 256];
        let mut c2b_index = [0u32; 256];
        for (byte, &c) in b2c.iter().enumerate() {
            if c == UNMAPPABLE_DECODING {
                continue;
            }
            let unit = c as u32 as u16;
            let hi = (unit >> 8) as usize;
            if c2b_index[hi] == 0 {
                c2b_index[hi] = c2b.len() as u32;
                c2b.resize(c2b.len() + 256, UNMAPPABLE_ENCODING);
            }
            let off = c2b_index[hi] as usize + (unit & 0xFF) as usize;
            // First mapping wins when two bytes share a character.
            if c2b[off] == UNMAPPABLE_ENCODING {
                c2b[off] = byte as u16;
            }
        }
        Self {
            b2c,
            c2b,
            c2b_index,
            ascii_compatible,
            unmapped_is_malformed,
        }
    }

    pub(crate) fn decode_byte(&self, b: u8) -> char {
        self.b2c[b as usize]
    }

    pub(crate) fn encode_char(&self, unit: u16) -> u16 {
        let off = self.c2b_index[(unit >> 8) as usize] as usize + (unit & 0xFF) as usize;
        self.c2b[off]
    }
}

pub(crate) struct Decoder {
    table: &'static SingleByteTable,
}

impl Decoder {
    pub(crate) fn new(table: &'static LazyLock<SingleByteTable>) -> Self {
        Self { table: &**table }
    }

    pub(crate) fn decode_loop(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        if self.table.ascii_compatible {
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
            let c = self.table.decode_byte(src.at(sp));
            if c == UNMAPPABLE_DECODING {
                break if self.table.unmapped_is_malformed {
                    CoderResult::Malformed(1)
                } else {
                    CoderResult::Unmappable(1)
                };
            }
            if dp >= dl {
                break CoderResult::Overflow;
            }
            dst.write_at(dp, c as u16);
            dp += 1;
            sp += 1;
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }
}

pub(crate) struct Encoder {
    table: &'static SingleByteTable,
    parser: Parser,
}

impl Encoder {
    pub(crate) fn new(table: &'static LazyLock<SingleByteTable>) -> Self {
        Self {
            table: &**table,
            parser: Parser::new(),
        }
    }

    pub(crate) fn encode_loop(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        if self.table.ascii_compatible {
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
                // No single-byte charset maps outside the BMP.
                break match self.parser.parse(c, src.units(sp + 1, sl)) {
                    Err(e) => e,
                    Ok(_) => CoderResult::Unmappable(self.parser.consumed()),
                };
            }
            let b = self.table.encode_char(c);
            if b == UNMAPPABLE_ENCODING {
                break CoderResult::Unmappable(1);
            }
            if dp >= dl {
                break CoderResult::Overflow;
            }
            dst.write_at(dp, b as u8);
            dp += 1;
            sp += 1;
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::for_name;

    #[test]
    fn latin1_decodes_high_byte() {
        let cs = for_name("ISO-8859-1").unwrap();
        assert_eq!(cs.decode(&[0xFF]), "\u{00FF}");
        assert_eq!(cs.decode(&[0x41, 0xE9]), "Aé");
    }

    #[test]
    fn latin1_encodes_round_trip() {
        let cs = for_name("ISO-8859-1").unwrap();
        let bytes = cs.encode("café");
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(cs.decode(&bytes), "café");
    }

    #[test]
    fn ascii_high_byte_is_malformed() {
        let cs = for_name("US-ASCII").unwrap();
        let mut dec = cs.new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x41, 0x80]);
        let mut dst = CharBuffer::allocate(4);
        assert_eq!(
            dec.decode(&mut src, &mut dst, true),
            CoderResult::Malformed(1)
        );
        assert_eq!(src.position(), 1);
    }

    #[test]
    fn unmappable_char_reports_length_one() {
        let cs = for_name("ISO-8859-1").unwrap();
        let mut enc = cs.new_encoder();
        let mut src = CharBuffer::wrap_str("é中");
        let mut dst = ByteBuffer::allocate(8);
        assert_eq!(
            enc.encode(&mut src, &mut dst, true),
            CoderResult::Unmappable(1)
        );
        assert_eq!(src.position(), 1);
    }

    #[test]
    fn surrogate_pair_is_unmappable_length_two() {
        let cs = for_name("ISO-8859-1").unwrap();
        let mut enc = cs.new_encoder();
        let mut src = CharBuffer::wrap_str("\u{10400}");
        let mut dst = ByteBuffer::allocate(8);
        assert_eq!(
            enc.encode(&mut src, &mut dst, true),
            CoderResult::Unmappable(2)
        );
    }

    #[test]
    fn zero_room_output_overflows_without_consuming() {
        let cs = for_name("ISO-8859-1").unwrap();
        let mut dec = cs.new_decoder();
        let mut src = ByteBuffer::wrap(vec![0xE9]);
        let mut dst = CharBuffer::allocate(0);
        assert_eq!(dec.decode(&mut src, &mut dst, false), CoderResult::Overflow);
        assert_eq!(src.position(), 0);
        let mut room = CharBuffer::allocate(1);
        assert_eq!(
            dec.decode(&mut src, &mut room, true),
            CoderResult::Underflow
        );
        assert_eq!(room.at(0), 0xE9);
    }

    #[test]
    fn ebcdic_cp037_alphabet() {
        let cs = for_name("IBM037").unwrap();
        let text = cs.decode(&[0xC8, 0xC5, 0xD3, 0xD3, 0xD6]);
        assert_eq!(text, "HELLO");
        assert_eq!(cs.encode("HELLO"), vec![0xC8, 0xC5, 0xD3, 0xD3, 0xD6]);
    }
}
