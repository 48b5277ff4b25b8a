//! UTF-16 with fixed or BOM-sniffed byte order.
//!
//! The generic variant sniffs an initial byte-order mark and falls back to
//! big-endian; the explicit BE/LE variants use a fixed order and treat a
//! leading U+FEFF as content. A byte-swapped mark anywhere in the stream is
//! malformed. Encoders emit a mark only for the mark-bearing variants.

use crate::buffer::{ByteBuffer, CharBuffer};
use crate::coder::CoderResult;
use crate::surrogate::{self, Parser};

/// Native byte-order-mark code unit.
pub(crate) const BYTE_ORDER_MARK: u16 = 0xFEFF;
/// Byte-swapped byte-order-mark code unit.
pub(crate) const REVERSED_MARK: u16 = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    Big,
    Little,
}

/// Which UTF-16 charset this coder serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Utf16Variant {
    /// "UTF-16": sniffs a BOM, defaults to big-endian, encoder emits a BOM.
    Standard,
    /// "UTF-16BE": fixed big-endian, no BOM handling.
    Be,
    /// "UTF-16LE": fixed little-endian, no BOM handling.
    Le,
    /// "x-UTF-16LE-BOM": sniffs, defaults little-endian, encoder emits a BOM.
    LeBom,
}

impl Utf16Variant {
    fn fixed_order(self) -> Option<ByteOrder> {
        match self {
            Utf16Variant::Be => Some(ByteOrder::Big),
            Utf16Variant::Le => Some(ByteOrder::Little),
            _ => None,
        }
    }

    fn default_order(self) -> ByteOrder {
        match self {
            Utf16Variant::Le | Utf16Variant::LeBom => ByteOrder::Little,
            _ => ByteOrder::Big,
        }
    }

    fn encoder_order(self) -> ByteOrder {
        self.default_order()
    }

    fn encoder_emits_bom(self) -> bool {
        matches!(self, Utf16Variant::Standard | Utf16Variant::LeBom)
    }
}

fn compose(order: ByteOrder, b1: u8, b2: u8) -> u16 {
    match order {
        ByteOrder::Big => ((b1 as u16) << 8) | b2 as u16,
        ByteOrder::Little => ((b2 as u16) << 8) | b1 as u16,
    }
}

pub(crate) struct Decoder {
    variant: Utf16Variant,
    current: Option<ByteOrder>,
}

impl Decoder {
    pub(crate) fn new(variant: Utf16Variant) -> Self {
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
            if sl - sp < 2 {
                break CoderResult::Underflow;
            }
            let b1 = src.at(sp);
            let b2 = src.at(sp + 1);
            if self.current.is_none() {
                match ((b1 as u16) << 8) | b2 as u16 {
                    BYTE_ORDER_MARK => {
                        self.current = Some(ByteOrder::Big);
                        sp += 2;
                        continue;
                    }
                    REVERSED_MARK => {
                        self.current = Some(ByteOrder::Little);
                        sp += 2;
                        continue;
                    }
                    _ => self.current = Some(self.variant.default_order()),
                }
            }
            let Some(order) = self.current else {
                unreachable!()
            };
            let c = compose(order, b1, b2);
            if c == REVERSED_MARK {
                break CoderResult::Malformed(2);
            }
            if surrogate::is_high(c) {
                if sl - sp < 4 {
                    break CoderResult::Underflow;
                }
                let c2 = compose(order, src.at(sp + 2), src.at(sp + 3));
                if !surrogate::is_low(c2) {
                    break CoderResult::Malformed(4);
                }
                if dl - dp < 2 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c);
                dst.write_at(dp + 1, c2);
                sp += 4;
                dp += 2;
                continue;
            }
            if surrogate::is_low(c) {
                break CoderResult::Malformed(2);
            }
            if dp >= dl {
                break CoderResult::Overflow;
            }
            dst.write_at(dp, c);
            sp += 2;
            dp += 1;
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
    pub(crate) fn new(variant: Utf16Variant) -> Self {
        let uses_mark = variant.encoder_emits_bom();
        Self {
            order: variant.encoder_order(),
            uses_mark,
            needs_mark: uses_mark,
            parser: Parser::new(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.needs_mark = self.uses_mark;
    }

    fn put2(&self, dst: &mut ByteBuffer, dp: usize, unit: u16) {
        match self.order {
            ByteOrder::Big => {
                dst.write_at(dp, (unit >> 8) as u8);
                dst.write_at(dp + 1, (unit & 0xFF) as u8);
            }
            ByteOrder::Little => {
                dst.write_at(dp, (unit & 0xFF) as u8);
                dst.write_at(dp + 1, (unit >> 8) as u8);
            }
        }
    }

    pub(crate) fn encode_loop(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        if self.needs_mark && sp < sl {
            if dl - dp < 2 {
                return CoderResult::Overflow;
            }
            self.put2(dst, dp, BYTE_ORDER_MARK);
            dp += 2;
            self.needs_mark = false;
        }
        let cr = loop {
            if sp >= sl {
                break CoderResult::Underflow;
            }
            let c = src.at(sp);
            if !surrogate::is_surrogate(c) {
                if dl - dp < 2 {
                    break CoderResult::Overflow;
                }
                self.put2(dst, dp, c);
                sp += 1;
                dp += 2;
                continue;
            }
            let uc = match self.parser.parse(c, src.units(sp + 1, sl)) {
                Err(e) => break e,
                Ok(uc) => uc,
            };
            if dl - dp < 4 {
                break CoderResult::Overflow;
            }
            self.put2(dst, dp, surrogate::high_of(uc));
            self.put2(dst, dp + 2, surrogate::low_of(uc));
            sp += 2;
            dp += 4;
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }
}
