//! Big5-HKSCS: the Hong Kong supplementary character set layered over the
//! Big5 base tables.
//!
//! The three-tier lookup order is part of the encoding's contract and must
//! not be reordered: decoding tries the HKSCS BMP overlay, then the
//! supplementary-plane overlay (emitting a surrogate pair), then falls back
//! to the wrapped Big5 decoder. Encoding mirrors the same order.

use crate::buffer::{ByteBuffer, CharBuffer};
use crate::coder::CoderResult;
use crate::double_byte::{DoubleByteTables, UNMAPPABLE};
use crate::surrogate::{self, Parser};
use crate::tables;

/// Overlay tables for the HKSCS extension: one BMP layer and one
/// supplementary-plane layer, both sparse per-lead rows.
#[derive(Debug)]
pub struct HkscsTables {
    bmp: Vec<Option<Box<[u16]>>>,
    supp: Vec<Option<Box<[u32]>>>,
    b2_min: u8,
    b2_max: u8,
    c2b_bmp: Vec<u16>,
    c2b_bmp_index: [u32; 256],
    c2b_supp: Vec<(u32, u16)>,
}

impl HkscsTables {
    pub(crate) fn build(
        bmp_segments: &[(u8, u8, &[u16])],
        supp_segments: &[(u8, u8, &[u32])],
        b2_min: u8,
        b2_max: u8,
    ) -> Self {
        let span = (b2_max - b2_min) as usize + 1;
        let mut bmp: Vec<Option<Box<[u16]>>> = std::iter::repeat_with(|| None).take(256).collect();
        for &(lead, start, chars) in bmp_segments {
            let row =
                bmp[lead as usize].get_or_insert_with(|| vec![UNMAPPABLE; span].into_boxed_slice());
            for (i, &c) in chars.iter().enumerate() {
                row[(start - b2_min) as usize + i] = c;
            }
        }
        let mut supp: Vec<Option<Box<[u32]>>> = std::iter::repeat_with(|| None).take(256).collect();
        for &(lead, start, cps) in supp_segments {
            let row =
                supp[lead as usize].get_or_insert_with(|| vec![0u32; span].into_boxed_slice());
            for (i, &cp) in cps.iter().enumerate() {
                row[(start - b2_min) as usize + i] = cp;
            }
        }
        let mut c2b_bmp = vec![UNMAPPABLE; 256];
        let mut c2b_bmp_index = [0u32; 256];
        for (lead, row) in bmp.iter().enumerate() {
            let Some(row) = row else { continue };
            for (i, &c) in row.iter().enumerate() {
                if c == UNMAPPABLE {
                    continue;
                }
                let hi = (c >> 8) as usize;
                if c2b_bmp_index[hi] == 0 {
                    c2b_bmp_index[hi] = c2b_bmp.len() as u32;
                    c2b_bmp.resize(c2b_bmp.len() + 256, UNMAPPABLE);
                }
                let off = c2b_bmp_index[hi] as usize + (c & 0xFF) as usize;
                if c2b_bmp[off] == UNMAPPABLE {
                    c2b_bmp[off] = ((lead as u16) << 8) | (b2_min as u16 + i as u16);
                }
            }
        }
        let mut c2b_supp = Vec::new();
        for (lead, row) in supp.iter().enumerate() {
            let Some(row) = row else { continue };
            for (i, &cp) in row.iter().enumerate() {
                if cp == 0 {
                    continue;
                }
                c2b_supp.push((cp, ((lead as u16) << 8) | (b2_min as u16 + i as u16)));
            }
        }
        c2b_supp.sort_unstable_by_key(|&(cp, _)| cp);
        Self {
            bmp,
            supp,
            b2_min,
            b2_max,
            c2b_bmp,
            c2b_bmp_index,
            c2b_supp,
        }
    }

    fn decode_bmp(&self, b1: u8, b2: u8) -> u16 {
        if b2 < self.b2_min || b2 > self.b2_max {
            return UNMAPPABLE;
        }
        match &self.bmp[b1 as usize] {
            Some(row) => row[(b2 - self.b2_min) as usize],
            None => UNMAPPABLE,
        }
    }

    fn decode_supp(&self, b1: u8, b2: u8) -> Option<u32> {
        if b2 < self.b2_min || b2 > self.b2_max {
            return None;
        }
        match &self.supp[b1 as usize] {
            Some(row) => match row[(b2 - self.b2_min) as usize] {
                0 => None,
                cp => Some(cp),
            },
            None => None,
        }
    }

    fn has_row(&self, b1: u8) -> bool {
        self.bmp[b1 as usize].is_some() || self.supp[b1 as usize].is_some()
    }

    fn encode_bmp(&self, unit: u16) -> u16 {
        let off = self.c2b_bmp_index[(unit >> 8) as usize] as usize + (unit & 0xFF) as usize;
        self.c2b_bmp[off]
    }

    fn encode_supp(&self, cp: u32) -> Option<u16> {
        self.c2b_supp
            .binary_search_by_key(&cp, |&(c, _)| c)
            .ok()
            .map(|i| self.c2b_supp[i].1)
    }
}

pub(crate) struct Decoder {
    base: &'static DoubleByteTables,
    overlay: &'static HkscsTables,
}

impl Decoder {
    pub(crate) fn new() -> Self {
        Self {
            base: &*tables::big5::BIG5,
            overlay: &*tables::big5::HKSCS,
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
            let single = self.base.decode_single(b1);
            if single != UNMAPPABLE {
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, single);
                sp += 1;
                dp += 1;
                continue;
            }
            if sl - sp < 2 {
                break CoderResult::Underflow;
            }
            let b2 = src.at(sp + 1);
            let c = self.overlay.decode_bmp(b1, b2);
            if c != UNMAPPABLE {
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c);
                sp += 2;
                dp += 1;
                continue;
            }
            if let Some(cp) = self.overlay.decode_supp(b1, b2) {
                if dl - dp < 2 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, surrogate::high_of(cp));
                dst.write_at(dp + 1, surrogate::low_of(cp));
                sp += 2;
                dp += 2;
                continue;
            }
            let c = self.base.decode_double(b1, b2);
            if c != UNMAPPABLE {
                if dp >= dl {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, c);
                sp += 2;
                dp += 1;
                continue;
            }
            let no_row =
                !self.base.has_row(b1) && !self.overlay.has_row(b1);
            break if no_row || self.base.decode_single(b2) != UNMAPPABLE {
                CoderResult::Malformed(1)
            } else {
                CoderResult::Unmappable(2)
            };
        };
        src.set_position(sp);
        dst.set_position(dp);
        cr
    }
}

pub(crate) struct Encoder {
    base: &'static DoubleByteTables,
    overlay: &'static HkscsTables,
    parser: Parser,
}

impl Encoder {
    pub(crate) fn new() -> Self {
        Self {
            base: &*tables::big5::BIG5,
            overlay: &*tables::big5::HKSCS,
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
                let cp = match self.parser.parse(c, src.units(sp + 1, sl)) {
                    Err(e) => break e,
                    Ok(cp) => cp,
                };
                let Some(code) = self.overlay.encode_supp(cp) else {
                    break CoderResult::Unmappable(self.parser.consumed());
                };
                if dl - dp < 2 {
                    break CoderResult::Overflow;
                }
                dst.write_at(dp, (code >> 8) as u8);
                dst.write_at(dp + 1, (code & 0xFF) as u8);
                sp += 2;
                dp += 2;
                continue;
            }
            let mut code = self.overlay.encode_bmp(c);
            if code == UNMAPPABLE {
                code = self.base.encode_char(c);
            }
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::for_name;

    #[test]
    fn base_big5_round_trip() {
        let cs = for_name("Big5").unwrap();
        let bytes = cs.encode("中華民國");
        assert_eq!(
            bytes,
            vec![0xA4, 0xA4, 0xB5, 0xD8, 0xA5, 0xC1, 0xB0, 0xEA]
        );
        assert_eq!(cs.decode(&bytes), "中華民國");
    }

    #[test]
    fn euro_sign_anchor() {
        let cs = for_name("Big5").unwrap();
        assert_eq!(cs.encode("1\u{20AC}/m"), vec![0x31, 0xA3, 0xE1, 0x2F, 0x6D]);
    }

    #[test]
    fn hkscs_bmp_overlay_hit() {
        let cs = for_name("Big5-HKSCS").unwrap();
        assert_eq!(cs.decode(&[0x87, 0x7E]), "\u{3EEC}");
        assert_eq!(cs.encode("\u{3EEC}"), vec![0x87, 0x7E]);
        // The base charset has no such mapping.
        let mut enc = for_name("Big5").unwrap().new_encoder();
        assert!(!enc.can_encode_char('\u{3EEC}'));
    }

    #[test]
    fn hkscs_supplementary_overlay_emits_pair() {
        let cs = for_name("Big5-HKSCS").unwrap();
        let text = cs.decode(&[0x88, 0x40]);
        let cp = text.chars().next().unwrap() as u32;
        assert!((0x20000..0x30000).contains(&cp));
        assert_eq!(cs.encode(&text), vec![0x88, 0x40]);
    }

    #[test]
    fn hkscs_falls_back_to_base() {
        let cs = for_name("Big5-HKSCS").unwrap();
        assert_eq!(cs.decode(&[0xA4, 0x40]), "一");
        assert_eq!(cs.encode("一"), vec![0xA4, 0x40]);
    }

    #[test]
    fn unmapped_pair_with_ascii_trail_is_malformed() {
        let cs = for_name("Big5").unwrap();
        let mut dec = cs.new_decoder();
        let mut src = ByteBuffer::wrap(vec![0xA4, 0x30]);
        let mut dst = CharBuffer::allocate(4);
        // 0x30 is not a valid trail here but is a valid single byte.
        assert_eq!(
            dec.decode(&mut src, &mut dst, true),
            CoderResult::Malformed(1)
        );
    }
}
