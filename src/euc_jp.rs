//! EUC-JP: a front controller composing JIS X0201, X0208, and X0212.
//!
//! Lead-byte dispatch: bit 7 clear is ASCII; 0x8E hands the next byte to
//! the JIS X0201 upper half (half-width katakana); 0x8F hands the next two
//! bytes to JIS X0212 where the variant enables it; anything else is a JIS
//! X0208 pair. The "Open" variant layers a vendor row table behind X0208
//! misses; the "Linux" flavor drops X0212 entirely, and 0x8F then has no
//! sub-charset to delegate to, making it malformed outright.

use crate::buffer::{ByteBuffer, CharBuffer};
use crate::coder::CoderResult;
use crate::double_byte::{DoubleByteTables, UNMAPPABLE};
use crate::single_byte::{SingleByteTable, UNMAPPABLE_ENCODING};
use crate::surrogate::{self, Parser};
use crate::tables::jis;

const SS2: u8 = 0x8E;
const SS3: u8 = 0x8F;

/// Which EUC-JP charset this coder serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EucJpVariant {
    /// "EUC-JP": X0201 + X0208 + X0212.
    Full,
    /// "EUC-JP-LINUX": no X0212 plane.
    Linux,
    /// "x-eucJP-Open": X0212 plus a vendor extension row table.
    Open,
}

impl EucJpVariant {
    fn has_0212(self) -> bool {
        !matches!(self, EucJpVariant::Linux)
    }

    fn has_vendor(self) -> bool {
        matches!(self, EucJpVariant::Open)
    }
}

pub(crate) struct Decoder {
    x0201: &'static SingleByteTable,
    x0208: &'static DoubleByteTables,
    x0212: Option<&'static DoubleByteTables>,
    vendor: Option<&'static DoubleByteTables>,
}

impl Decoder {
    pub(crate) fn new(variant: EucJpVariant) -> Self {
        Self {
            x0201: &*jis::JIS_X0201,
            x0208: &*jis::X0208_EUC,
            x0212: variant.has_0212().then(|| &*jis::X0212_EUC),
            vendor: variant.has_vendor().then(|| &*jis::VENDOR_EUC),
        }
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
                continue;
            }
            if b1 == SS2 {
                if sl - sp < 2 {
                    break CoderResult::Underflow;
                }
                let c = self.x0201.decode_byte(src.at(sp + 1));
                if !('\u{FF61}'..='\u{FF9F}').contains(&c) {
                    break CoderResult::Unmappable(2);
                }
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c as u16);
                sp += 2;
                dp += 1;
                continue;
            }
            if b1 == SS3 {
                let Some(x0212) = self.x0212 else {
                    break CoderResult::Malformed(1);
                };
                if sl - sp < 3 {
                    break CoderResult::Underflow;
                }
                let c = x0212.decode_double(src.at(sp + 1), src.at(sp + 2));
                if c == UNMAPPABLE {
                    break CoderResult::Unmappable(3);
                }
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c);
                sp += 3;
                dp += 1;
                continue;
            }
            if sl - sp < 2 {
                break CoderResult::Underflow;
            }
            let b2 = src.at(sp + 1);
            let mut c = self.x0208.decode_double(b1, b2);
            if c == UNMAPPABLE {
                if let Some(vendor) = self.vendor {
                    c = vendor.decode_double(b1, b2);
                }
            }
            if c == UNMAPPABLE {
                break CoderResult::Unmappable(2);
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
    x0201: &'static SingleByteTable,
    x0208: &'static DoubleByteTables,
    x0212: Option<&'static DoubleByteTables>,
    vendor: Option<&'static DoubleByteTables>,
    parser: Parser,
}

impl Encoder {
    pub(crate) fn new(variant: EucJpVariant) -> Self {
        Self {
            x0201: &*jis::JIS_X0201,
            x0208: &*jis::X0208_EUC,
            x0212: variant.has_0212().then(|| &*jis::X0212_EUC),
            vendor: variant.has_vendor().then(|| &*jis::VENDOR_EUC),
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
            if surrogate::is_surrogate(c) {
                break match self.parser.parse(c, src.units(sp + 1, sl)) {
                    Err(e) => e,
                    Ok(_) => CoderResult::Unmappable(self.parser.consumed()),
                };
            }
            if c < 0x80 {
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c as u8);
                sp += 1;
                dp += 1;
                continue;
            }
            // Yen sign, overline, and half-width katakana via X0201.
            let b = self.x0201.encode_char(c);
            if b != UNMAPPABLE_ENCODING {
                if b < 0x80 {
                    if dp >= dl {
                        break CoderResult::Overflow;
                    }
                    dst.write_at(dp, b as u8);
                    dp += 1;
                } else {
                    if dl - dp < 2 {
                        break CoderResult::Overflow;
                    }
                    dst.write_at(dp, SS2);
                    dst.write_at(dp + 1, b as u8);
                    dp += 2;
                }
                sp += 1;
                continue;
            }
            let mut code = self.x0208.encode_char(c);
            if code == UNMAPPABLE {
                if let Some(vendor) = self.vendor {
                    code = vendor.encode_char(c);
                }
            }
            if code != UNMAPPABLE {
                if dl - dp < 2 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, (code >> 8) as u8);
                dst.write_at(dp + 1, (code & 0xFF) as u8);
                sp += 1;
                dp += 2;
                continue;
            }
            if let Some(x0212) = self.x0212 {
                let code = x0212.encode_char(c);
                if code != UNMAPPABLE {
                    if dl - dp < 3 {
                        break CoderResult::Overflow;
                    }
                    dst.write_at(dp, SS3);
                    dst.write_at(dp + 1, (code >> 8) as u8);
                    dst.write_at(dp + 2, (code & 0xFF) as u8);
                    sp += 1;
                    dp += 3;
                    continue;
                }
            }
            break CoderResult::Unmappable(1);
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
    fn ascii_and_kanji_round_trip() {
        let cs = for_name("EUC-JP").unwrap();
        let bytes = cs.encode("A漢あ");
        assert_eq!(bytes, vec![0x41, 0xB4, 0xC1, 0xA4, 0xA2]);
        assert_eq!(cs.decode(&bytes), "A漢あ");
    }

    #[test]
    fn halfwidth_katakana_uses_ss2() {
        let cs = for_name("EUC-JP").unwrap();
        assert_eq!(cs.encode("\u{FF71}"), vec![0x8E, 0xB1]);
        assert_eq!(cs.decode(&[0x8E, 0xB1]), "\u{FF71}");
    }

    #[test]
    fn x0212_plane_uses_ss3() {
        let cs = for_name("EUC-JP").unwrap();
        assert_eq!(cs.decode(&[0x8F, 0xB0, 0xA1]), "\u{4E02}");
        assert_eq!(cs.encode("\u{4E02}"), vec![0x8F, 0xB0, 0xA1]);
    }

    #[test]
    fn linux_variant_rejects_ss3() {
        let cs = for_name("EUC-JP-LINUX").unwrap();
        let mut dec = cs.new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x8F, 0xB0, 0xA1]);
        let mut dst = CharBuffer::allocate(4);
        assert_eq!(
            dec.decode(&mut src, &mut dst, true),
            CoderResult::Malformed(1)
        );
    }

    #[test]
    fn open_variant_layers_vendor_rows() {
        let cs = for_name("x-eucJP-Open").unwrap();
        // Circled digit one lives only in the vendor extension rows.
        assert_eq!(cs.encode("\u{2460}"), vec![0xAD, 0xA1]);
        assert_eq!(cs.decode(&[0xAD, 0xA1]), "\u{2460}");
        let plain = for_name("EUC-JP").unwrap();
        let mut enc = plain.new_encoder();
        assert!(!enc.can_encode_char('\u{2460}'));
    }

    #[test]
    fn yen_sign_folds_to_single_byte() {
        let cs = for_name("EUC-JP").unwrap();
        assert_eq!(cs.encode("\u{00A5}"), vec![0x5C]);
        // The byte decodes back as ASCII backslash.
        assert_eq!(cs.decode(&[0x5C]), "\\");
    }

    #[test]
    fn unmapped_pair_reports_length_two() {
        let cs = for_name("EUC-JP").unwrap();
        let mut dec = cs.new_decoder();
        let mut src = ByteBuffer::wrap(vec![0xA9, 0xA1]);
        let mut dst = CharBuffer::allocate(4);
        assert_eq!(
            dec.decode(&mut src, &mut dst, true),
            CoderResult::Unmappable(2)
        );
    }

    #[test]
    fn truncated_kana_underflows_mid_stream() {
        let cs = for_name("EUC-JP").unwrap();
        let mut dec = cs.new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x8E]);
        let mut dst = CharBuffer::allocate(4);
        assert_eq!(
            dec.decode(&mut src, &mut dst, false),
            CoderResult::Underflow
        );
        assert_eq!(src.position(), 0);
    }
}
