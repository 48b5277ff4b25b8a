//! UTF-32: fixed-width 4-byte groups with the same byte-order-mark rules
//! as UTF-16.
//!
//! Every group must hold a legal Unicode scalar value: surrogate range
//! values and anything above U+10FFFF are malformed with length 4.
//! Supplementary values expand to a surrogate pair on the UTF-16 side.

use crate::buffer::{ByteBuffer, CharBuffer};
use crate::coder::CoderResult;
use crate::surrogate::{self, Parser};
use crate::utf16::ByteOrder;

const BOM_BIG: u32 = 0x0000_FEFF;
const BOM_LITTLE: u32 = 0xFFFE_0000;

/// Which UTF-32 charset this coder serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Utf32Variant {
    /// "UTF-32": sniffs a BOM, defaults to big-endian, encoder emits none.
    Standard,
    /// "UTF-32BE": fixed big-endian.
    Be,
    /// "UTF-32LE": fixed little-endian.
    Le,
    /// "x-UTF-32BE-BOM": sniffs (default big), encoder emits a BOM.
    BeBom,
    /// "x-UTF-32LE-BOM": sniffs (default little), encoder emits a BOM.
    LeBom,
}

impl Utf32Variant {
    fn fixed_order(self) -> Option<ByteOrder> {
        match self {
            Utf32Variant::Be => Some(ByteOrder::Big),
            Utf32Variant::Le => Some(ByteOrder::Little),
            _ => None,
        }
    }

    fn default_order(self) -> ByteOrder {
        match self {
            Utf32Variant::Le | Utf32Variant::LeBom => ByteOrder::Little,
            _ => ByteOrder::Big,
        }
    }

    fn encoder_emits_bom(self) -> bool {
        matches!(self, Utf32Variant::BeBom | Utf32Variant::LeBom)
    }
}

fn compose(order: ByteOrder, b: [u8; 4]) -> u32 {
    match order {
        ByteOrder::Big => u32::from_be_bytes(b),
        ByteOrder::Little => u32::from_le_bytes(b),
    }
}

pub(crate) struct Decoder {
    variant: Utf32Variant,
    current: Option<ByteOrder>,
}

impl Decoder {
    pub(crate) fn new(variant: Utf32Variant) -> Self {
        Self {
            variant,
            current: variant.fixed_order(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.current = self.variant.fixed_order();
    }

    pub(crate) fn decode_loop(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        let cr = loop {
            if sl - sp < 4 {
                break CoderResult::Underflow;
            }
            let group = [src.at(sp), src.at(sp + 1), src.at(sp + 2), src.at(sp + 3)];
            if self.current.is_none() {
                match u32::from_be_bytes(group) {
                    BOM_BIG => {
                        self.current = Some(ByteOrder::Big);
                        sp += 4;
                        continue;
                    }
                    BOM_LITTLE => {
                        self.current = Some(ByteOrder::Little);
                        sp += 4;
                        continue;
                    }
                    _ => self.current = Some(self.variant.default_order()),
                }
            }
            let Some(order) = self.current else {
                unreachable!()
            };
            let cp = compose(order, group);
            if cp > 0x10FFFF || (0xD800..=0xDFFF).contains(&cp) {
                break CoderResult::Malformed(4);
            }
            match surrogate::generate(cp, 4, dst, dp) {
                Ok(written) => {
                    dp += written;
                    sp += 4;
                }
                Err(e) => break e,
            }
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }
}

pub(crate) struct Encoder {
    order: ByteOrder,
    uses_mark: bool,
    needs_mark: bool,
    parser: Parser,
}

impl Encoder {
    pub(crate) fn new(variant: Utf32Variant) -> Self {
        let uses_mark = variant.encoder_emits_bom();
        Self {
            order: variant.default_order(),
            uses_mark,
            needs_mark: uses_mark,
            parser: Parser::new(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.needs_mark = self.uses_mark;
    }

    fn put4(&self, dst: &mut ByteBuffer, dp: usize, cp: u32) {
        let bytes = match self.order {
            ByteOrder::Big => cp.to_be_bytes(),
            ByteOrder::Little => cp.to_le_bytes(),
        };
        for (i, b) in bytes.into_iter().enumerate() {
            dst.write_at(dp + i, b);
        }
    }

    pub(crate) fn encode_loop(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        if self.needs_mark && sp < sl {
            if dl - dp < 4 {
                return CoderResult::Overflow;
            }
            self.put4(dst, dp, 0xFEFF);
            dp += 4;
            self.needs_mark = false;
        }
        let cr = loop {
            if sp >= sl {
                break CoderResult::Underflow;
            }
            let c = src.at(sp);
            let (cp, consumed) = if surrogate::is_surrogate(c) {
                match self.parser.parse(c, src.units(sp + 1, sl)) {
                    Err(e) => break e,
                    Ok(cp) => (cp, self.parser.consumed()),
                }
            } else {
                (c as u32, 1)
            };
            if dl - dp < 4 {
                break CoderResult::Overflow;
            }
            self.put4(dst, dp, cp);
            sp += consumed;
            dp += 4;
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
    fn be_round_trip() {
        let cs = for_name("UTF-32BE").unwrap();
        let bytes = cs.encode("A\u{10437}");
        assert_eq!(
            bytes,
            vec![0x00, 0x00, 0x00, 0x41, 0x00, 0x01, 0x04, 0x37]
        );
        assert_eq!(cs.decode(&bytes), "A\u{10437}");
    }

    #[test]
    fn le_round_trip() {
        let cs = for_name("UTF-32LE").unwrap();
        let bytes = cs.encode("A");
        assert_eq!(bytes, vec![0x41, 0x00, 0x00, 0x00]);
        assert_eq!(cs.decode(&bytes), "A");
    }

    #[test]
    fn standard_sniffs_bom() {
        let cs = for_name("UTF-32").unwrap();
        assert_eq!(cs.decode(&[0x00, 0x00, 0xFE, 0xFF, 0x00, 0x00, 0x00, 0x41]), "A");
        assert_eq!(cs.decode(&[0xFF, 0xFE, 0x00, 0x00, 0x41, 0x00, 0x00, 0x00]), "A");
        assert_eq!(cs.decode(&[0x00, 0x00, 0x00, 0x41]), "A");
    }

    #[test]
    fn bom_variant_emits_mark() {
        let be = for_name("x-UTF-32BE-BOM").unwrap();
        assert_eq!(
            be.encode("A"),
            vec![0x00, 0x00, 0xFE, 0xFF, 0x00, 0x00, 0x00, 0x41]
        );
        let le = for_name("x-UTF-32LE-BOM").unwrap();
        assert_eq!(
            le.encode("A"),
            vec![0xFF, 0xFE, 0x00, 0x00, 0x41, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn surrogate_value_group_is_malformed_four() {
        let mut dec = for_name("UTF-32BE").unwrap().new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x00, 0x00, 0xD8, 0x00]);
        let mut dst = CharBuffer::allocate(4);
        assert_eq!(
            dec.decode(&mut src, &mut dst, true),
            CoderResult::Malformed(4)
        );
    }

    #[test]
    fn out_of_range_group_is_malformed_four() {
        let mut dec = for_name("UTF-32BE").unwrap().new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x00, 0x11, 0x00, 0x00]);
        let mut dst = CharBuffer::allocate(4);
        assert_eq!(
            dec.decode(&mut src, &mut dst, true),
            CoderResult::Malformed(4)
        );
    }

    #[test]
    fn truncated_group_reports_remaining_at_end() {
        let mut dec = for_name("UTF-32BE").unwrap().new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x00, 0x00, 0x00]);
        let mut dst = CharBuffer::allocate(4);
        assert_eq!(
            dec.decode(&mut src, &mut dst, false),
            CoderResult::Underflow
        );
        assert_eq!(
            dec.decode(&mut src, &mut dst, true),
            CoderResult::Malformed(3)
        );
    }
}
