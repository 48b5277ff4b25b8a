//! UTF-8: canonical 1–4 byte sequences with full shortest-form and
//! surrogate-exclusion validation.
//!
//! Malformed lengths follow the byte-range tables of the encoding form:
//! a defect found in the second byte of a 3/4-byte sequence reports one
//! bad byte, a defect in the third reports two, and so on, so that error
//! recovery resynchronizes at the first byte that could begin a new
//! sequence.

use crate::buffer::{ByteBuffer, CharBuffer};
use crate::coder::CoderResult;
use crate::surrogate::{self, Parser};

fn not_continuation(b: u8) -> bool {
    (b & 0xC0) != 0x80
}

/// First two bytes of a 3-byte form rule out overlongs (E0 80..9F) early.
fn malformed3_2(b1: u8, b2: u8) -> bool {
    (b1 == 0xE0 && (b2 & 0xE0) == 0x80) || not_continuation(b2)
}

fn malformed3(b1: u8, b2: u8, b3: u8) -> bool {
    malformed3_2(b1, b2) || not_continuation(b3)
}

/// First two bytes of a 4-byte form rule out overlongs (F0 80..8F) and
/// values above U+10FFFF (F4 90.., F5..).
fn malformed4_2(b1: u8, b2: u8) -> bool {
    b1 > 0xF4
        || (b1 == 0xF0 && !(0x90..=0xBF).contains(&b2))
        || (b1 == 0xF4 && (b2 & 0xF0) != 0x80)
        || not_continuation(b2)
}

fn malformed4_3(b3: u8) -> bool {
    not_continuation(b3)
}

/// Malformed length for a complete 3-byte candidate.
fn malformed_len3(b1: u8, b2: u8) -> CoderResult {
    if (b1 == 0xE0 && (b2 & 0xE0) == 0x80) || not_continuation(b2) {
        CoderResult::Malformed(1)
    } else {
        CoderResult::Malformed(2)
    }
}

/// Malformed length for a complete 4-byte candidate.
fn malformed_len4(b1: u8, b2: u8, b3: u8) -> CoderResult {
    if malformed4_2(b1, b2) {
        CoderResult::Malformed(1)
    } else if malformed4_3(b3) {
        CoderResult::Malformed(2)
    } else {
        CoderResult::Malformed(3)
    }
}

pub(crate) struct Decoder;

impl Decoder {
    pub(crate) fn new() -> Self {
        Decoder
    }

    pub(crate) fn decode_loop(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        let cr = loop {
            if sp >= sl {
                break CoderResult::Underflow;
            }
            let b1 = src.at(sp);
            if b1 < 0x80 {
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, b1 as u16);
                sp += 1;
                dp += 1;
            } else if (0xC2..=0xDF).contains(&b1) {
                if sl - sp < 2 {
                    break CoderResult::Underflow;
                }
                let b2 = src.at(sp + 1);
                if not_continuation(b2) {
                    break CoderResult::Malformed(1);
                }
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, ((b1 as u16 & 0x1F) << 6) | (b2 as u16 & 0x3F));
                sp += 2;
                dp += 1;
            } else if (b1 & 0xF0) == 0xE0 {
                let rem = sl - sp;
                if rem < 3 || dp >= dl {
                    if rem > 1 && malformed3_2(b1, src.at(sp + 1)) {
                        break CoderResult::Malformed(1);
                    }
                    break if rem < 3 {
                        CoderResult::Underflow
                    } else {
                        CoderResult::Overflow
                    };
                }
                let b2 = src.at(sp + 1);
                let b3 = src.at(sp + 2);
                if malformed3(b1, b2, b3) {
                    break malformed_len3(b1, b2);
                }
                let c = ((b1 as u16 & 0x0F) << 12) | ((b2 as u16 & 0x3F) << 6) | (b3 as u16 & 0x3F);
                if surrogate::is_surrogate(c) {
                    break CoderResult::Malformed(3);
                }
                dst.write_at(dp, c);
                sp += 3;
                dp += 1;
            } else if (b1 & 0xF8) == 0xF0 {
                let rem = sl - sp;
                if rem < 4 || dl - dp < 2 {
                    if rem > 1 && malformed4_2(b1, src.at(sp + 1)) {
                        break CoderResult::Malformed(1);
                    }
                    if rem > 2 && malformed4_3(src.at(sp + 2)) {
                        break CoderResult::Malformed(2);
                    }
                    break if rem < 4 {
                        CoderResult::Underflow
                    } else {
                        CoderResult::Overflow
                    };
                }
                let b2 = src.at(sp + 1);
                let b3 = src.at(sp + 2);
                let b4 = src.at(sp + 3);
                let uc = ((b1 as u32 & 0x07) << 18)
                    | ((b2 as u32 & 0x3F) << 12)
                    | ((b3 as u32 & 0x3F) << 6)
                    | (b4 as u32 & 0x3F);
                if not_continuation(b2)
                    || not_continuation(b3)
                    || not_continuation(b4)
                    || !(0x10000..=0x10FFFF).contains(&uc)
                {
                    break malformed_len4(b1, b2, b3);
                }
                dst.write_at(dp, surrogate::high_of(uc));
                dst.write_at(dp + 1, surrogate::low_of(uc));
                sp += 4;
                dp += 2;
            } else {
                // 0x80..0xC1 and 0xF8..0xFF can never begin a sequence.
                break CoderResult::Malformed(1);
            }
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }
}

pub(crate) struct Encoder {
    parser: Parser,
}

impl Encoder {
    pub(crate) fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    pub(crate) fn encode_loop(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let sl = src.limit();
        let dl = dst.limit();
        let mut sp = src.position();
        let mut dp = dst.position();
        let cr = loop {
            if sp >= sl {
                break CoderResult::Underflow;
            }
            let c = src.at(sp);
            if c < 0x80 {
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c as u8);
                sp += 1;
                dp += 1;
            } else if c < 0x800 {
                if dl - dp < 2 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, 0xC0 | (c >> 6) as u8);
                dst.write_at(dp + 1, 0x80 | (c & 0x3F) as u8);
                sp += 1;
                dp += 2;
            } else if surrogate::is_surrogate(c) {
                let uc = match self.parser.parse(c, src.units(sp + 1, sl)) {
                    Err(e) => break e,
                    Ok(uc) => uc,
                };
                if dl - dp < 4 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, 0xF0 | (uc >> 18) as u8);
                dst.write_at(dp + 1, 0x80 | ((uc >> 12) & 0x3F) as u8);
                dst.write_at(dp + 2, 0x80 | ((uc >> 6) & 0x3F) as u8);
                dst.write_at(dp + 3, 0x80 | (uc & 0x3F) as u8);
                sp += 2;
                dp += 4;
            } else {
                if dl - dp < 3 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, 0xE0 | (c >> 12) as u8);
                dst.write_at(dp + 1, 0x80 | ((c >> 6) & 0x3F) as u8);
                dst.write_at(dp + 2, 0x80 | (c & 0x3F) as u8);
                sp += 1;
                dp += 3;
            }
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }
}
