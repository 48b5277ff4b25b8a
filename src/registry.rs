//! Charset descriptors, alias resolution, and the convert façade.
//!
//! Every supported charset is a `static` [`Charset`] descriptor holding its
//! canonical name, alias list, codec kind, and coder heuristics. Name
//! resolution is case-insensitive and ignores `-`/`_` punctuation.

use crate::buffer::{ByteBuffer, CharBuffer};
use crate::cache;
use crate::coder::{CharsetDecoder, CharsetEncoder, CodingErrorAction};
use crate::double_byte::{DoubleByteKind, DoubleByteTables};
use crate::euc_jp::EucJpVariant;
use crate::single_byte::SingleByteTable;
use crate::tables;
use crate::utf16::Utf16Variant;
use crate::utf32::Utf32Variant;
use std::sync::LazyLock;

/// Error returned when no charset matches a requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedCharsetError(
    /// The name that failed to resolve.
    pub String,
);

impl std::fmt::Display for UnsupportedCharsetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported charset: {}", self.0)
    }
}

impl std::error::Error for UnsupportedCharsetError {}

/// Codec family selector, bound at charset-construction time.
pub(crate) enum CodecKind {
    SingleByte(&'static LazyLock<SingleByteTable>),
    DoubleByte {
        tables: &'static LazyLock<DoubleByteTables>,
        kind: DoubleByteKind,
    },
    Utf8,
    Cesu8,
    Utf16(Utf16Variant),
    Utf32(Utf32Variant),
    EucJp(EucJpVariant),
    Big5Hkscs,
}

/// An immutable charset descriptor.
///
/// Identity is the case-insensitive canonical name. Descriptors own the
/// factory methods for decoders and encoders plus the one-shot convert
/// helpers built on the per-thread coder cache.
pub struct Charset {
    name: &'static str,
    aliases: &'static [&'static str],
    kind: CodecKind,
    ascii_compatible: bool,
    decoder_replacement: &'static str,
    encoder_replacement: &'static [u8],
    average_chars_per_byte: f32,
    max_chars_per_byte: f32,
    average_bytes_per_char: f32,
    max_bytes_per_char: f32,
}

impl Charset {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registered aliases.
    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    /// Whether bytes 0x00–0x7F coincide with ASCII.
    pub fn is_ascii_compatible(&self) -> bool {
        self.ascii_compatible
    }

    /// One-way superset check: does this charset's repertoire cover
    /// `other`'s? Unicode charsets contain every registered charset;
    /// ASCII-compatible charsets contain US-ASCII; every charset contains
    /// itself.
    pub fn contains(&self, other: &Charset) -> bool {
        if self == other {
            return true;
        }
        match self.kind {
            CodecKind::Utf8 | CodecKind::Cesu8 | CodecKind::Utf16(_) | CodecKind::Utf32(_) => true,
            _ => self.ascii_compatible && other.name == "US-ASCII",
        }
    }

    /// Manufactures a fresh decoder.
    pub fn new_decoder(&'static self) -> CharsetDecoder {
        CharsetDecoder::new(self)
    }

    /// Manufactures a fresh encoder.
    pub fn new_encoder(&'static self) -> CharsetEncoder {
        CharsetEncoder::new(self)
    }

    /// Decodes `bytes` into a string, substituting U+FFFD where the input
    /// is malformed or unmappable. Never fails.
    pub fn decode(&'static self, bytes: &[u8]) -> String {
        let mut src = ByteBuffer::wrap(bytes.to_vec());
        self.decode_buffer(&mut src)
    }

    /// Buffer-cursor form of [`decode`](Charset::decode).
    pub fn decode_buffer(&'static self, src: &mut ByteBuffer) -> String {
        cache::with_decoder_for(self, |dec| {
            dec.on_malformed_input(CodingErrorAction::Replace);
            dec.on_unmappable_character(CodingErrorAction::Replace);
            match dec.decode_all_units(src) {
                Ok(units) => String::from_utf16_lossy(&units),
                Err(e) => panic!("decoder malfunction in charset {}: {e}", self.name),
            }
        })
    }

    /// Encodes `text` into bytes, substituting the charset's replacement
    /// where a character is unmappable. Never fails.
    pub fn encode(&'static self, text: &str) -> Vec<u8> {
        let mut src = CharBuffer::wrap_str(text);
        self.encode_buffer(&mut src)
    }

    /// Buffer-cursor form of [`encode`](Charset::encode).
    pub fn encode_buffer(&'static self, src: &mut CharBuffer) -> Vec<u8> {
        cache::with_encoder_for(self, |enc| {
            enc.on_malformed_input(CodingErrorAction::Replace);
            enc.on_unmappable_character(CodingErrorAction::Replace);
            match enc.encode_all(src) {
                Ok(bytes) => bytes,
                Err(e) => panic!("encoder malfunction in charset {}: {e}", self.name),
            }
        })
    }

    pub(crate) fn kind(&self) -> &CodecKind {
        &self.kind
    }

    pub(crate) fn decoder_replacement(&self) -> &'static str {
        self.decoder_replacement
    }

    pub(crate) fn encoder_replacement(&self) -> &'static [u8] {
        self.encoder_replacement
    }

    pub(crate) fn average_chars_per_byte(&self) -> f32 {
        self.average_chars_per_byte
    }

    pub(crate) fn max_chars_per_byte(&self) -> f32 {
        self.max_chars_per_byte
    }

    pub(crate) fn average_bytes_per_char(&self) -> f32 {
        self.average_bytes_per_char
    }

    pub(crate) fn max_bytes_per_char(&self) -> f32 {
        self.max_bytes_per_char
    }
}

impl PartialEq for Charset {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Charset {}

impl std::fmt::Debug for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Charset").field("name", &self.name).finish()
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

macro_rules! charset {
    ($ident:ident, $name:literal, $aliases:expr, $kind:expr, ascii: $ascii:literal,
     dec: ($acpb:literal, $mcpb:literal), enc: ($abpc:literal, $mbpc:literal),
     repl: $repl:expr) => {
        #[doc = concat!("The ", $name, " charset.")]
        pub static $ident: Charset = Charset {
            name: $name,
            aliases: $aliases,
            kind: $kind,
            ascii_compatible: $ascii,
            decoder_replacement: "\u{FFFD}",
            encoder_replacement: $repl,
            average_chars_per_byte: $acpb,
            max_chars_per_byte: $mcpb,
            average_bytes_per_char: $abpc,
            max_bytes_per_char: $mbpc,
        };
    };
}

charset!(
    US_ASCII, "US-ASCII",
    &["ascii", "ANSI_X3.4-1968", "iso-ir-6", "646", "iso646-us", "us", "csASCII"],
    CodecKind::SingleByte(&tables::sbcs::US_ASCII),
    ascii: true, dec: (1.0, 1.0), enc: (1.0, 1.0), repl: b"?"
);

charset!(
    ISO_8859_1, "ISO-8859-1",
    &["latin1", "l1", "iso_8859-1", "8859_1", "iso-ir-100", "IBM819", "cp819", "csISOLatin1"],
    CodecKind::SingleByte(&tables::sbcs::ISO_8859_1),
    ascii: true, dec: (1.0, 1.0), enc: (1.0, 1.0), repl: b"?"
);

charset!(
    ISO_8859_2, "ISO-8859-2",
    &["latin2", "l2", "iso_8859-2", "8859_2", "iso-ir-101", "IBM912", "cp912", "csISOLatin2"],
    CodecKind::SingleByte(&tables::sbcs::ISO_8859_2),
    ascii: true, dec: (1.0, 1.0), enc: (1.0, 1.0), repl: b"?"
);

charset!(
    ISO_8859_5, "ISO-8859-5",
    &["cyrillic", "iso_8859-5", "8859_5", "iso-ir-144", "IBM915", "cp915", "csISOLatinCyrillic"],
    CodecKind::SingleByte(&tables::sbcs::ISO_8859_5),
    ascii: true, dec: (1.0, 1.0), enc: (1.0, 1.0), repl: b"?"
);

charset!(
    ISO_8859_7, "ISO-8859-7",
    &["greek", "greek8", "iso_8859-7", "8859_7", "iso-ir-126", "ELOT_928", "ECMA-118", "csISOLatinGreek"],
    CodecKind::SingleByte(&tables::sbcs::ISO_8859_7),
    ascii: true, dec: (1.0, 1.0), enc: (1.0, 1.0), repl: b"?"
);

charset!(
    ISO_8859_15, "ISO-8859-15",
    &["latin9", "l9", "latin0", "iso_8859-15", "8859_15", "csISO885915"],
    CodecKind::SingleByte(&tables::sbcs::ISO_8859_15),
    ascii: true, dec: (1.0, 1.0), enc: (1.0, 1.0), repl: b"?"
);

charset!(
    IBM037, "IBM037",
    &["cp037", "037", "ebcdic-cp-us", "ebcdic-cp-ca", "ebcdic-cp-nl", "csIBM037"],
    CodecKind::SingleByte(&tables::sbcs::IBM037),
    ascii: false, dec: (1.0, 1.0), enc: (1.0, 1.0), repl: &[0x6F]
);

charset!(
    IBM939, "IBM939",
    &["cp939", "939", "ebcdic-jp-e"],
    CodecKind::DoubleByte { tables: &tables::ibm::IBM939, kind: DoubleByteKind::Ebcdic },
    ascii: false, dec: (0.5, 1.0), enc: (4.0, 5.0), repl: &[0x6F]
);

charset!(
    UTF_8, "UTF-8",
    &["UTF8", "unicode-1-1-utf-8"],
    CodecKind::Utf8,
    ascii: true, dec: (1.0, 1.0), enc: (1.1, 3.0), repl: b"?"
);

charset!(
    CESU_8, "CESU-8",
    &["CESU8", "csCESU-8"],
    CodecKind::Cesu8,
    ascii: true, dec: (1.0, 1.0), enc: (1.1, 3.0), repl: b"?"
);

charset!(
    UTF_16, "UTF-16",
    &["UTF_16", "utf16", "unicode"],
    CodecKind::Utf16(Utf16Variant::Standard),
    ascii: false, dec: (0.5, 1.0), enc: (2.0, 4.0), repl: &[0xFF, 0xFD]
);

charset!(
    UTF_16BE, "UTF-16BE",
    &["UTF_16BE", "X-UTF-16BE", "UnicodeBigUnmarked"],
    CodecKind::Utf16(Utf16Variant::Be),
    ascii: false, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: &[0xFF, 0xFD]
);

charset!(
    UTF_16LE, "UTF-16LE",
    &["UTF_16LE", "X-UTF-16LE", "UnicodeLittleUnmarked"],
    CodecKind::Utf16(Utf16Variant::Le),
    ascii: false, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: &[0xFD, 0xFF]
);

charset!(
    UTF_16LE_BOM, "x-UTF-16LE-BOM",
    &["UnicodeLittle"],
    CodecKind::Utf16(Utf16Variant::LeBom),
    ascii: false, dec: (0.5, 1.0), enc: (2.0, 4.0), repl: &[0xFD, 0xFF]
);

charset!(
    UTF_32, "UTF-32",
    &["UTF_32", "utf32"],
    CodecKind::Utf32(Utf32Variant::Standard),
    ascii: false, dec: (0.25, 1.0), enc: (4.0, 4.0), repl: &[0x00, 0x00, 0xFF, 0xFD]
);

charset!(
    UTF_32BE, "UTF-32BE",
    &["UTF_32BE", "X-UTF-32BE"],
    CodecKind::Utf32(Utf32Variant::Be),
    ascii: false, dec: (0.25, 1.0), enc: (4.0, 4.0), repl: &[0x00, 0x00, 0xFF, 0xFD]
);

charset!(
    UTF_32LE, "UTF-32LE",
    &["UTF_32LE", "X-UTF-32LE"],
    CodecKind::Utf32(Utf32Variant::Le),
    ascii: false, dec: (0.25, 1.0), enc: (4.0, 4.0), repl: &[0xFD, 0xFF, 0x00, 0x00]
);

charset!(
    UTF_32BE_BOM, "x-UTF-32BE-BOM",
    &["UTF_32BE_BOM", "UTF-32BE-BOM"],
    CodecKind::Utf32(Utf32Variant::BeBom),
    ascii: false, dec: (0.25, 1.0), enc: (4.0, 8.0), repl: &[0x00, 0x00, 0xFF, 0xFD]
);

charset!(
    UTF_32LE_BOM, "x-UTF-32LE-BOM",
    &["UTF_32LE_BOM", "UTF-32LE-BOM"],
    CodecKind::Utf32(Utf32Variant::LeBom),
    ascii: false, dec: (0.25, 1.0), enc: (4.0, 8.0), repl: &[0xFD, 0xFF, 0x00, 0x00]
);

charset!(
    SHIFT_JIS, "Shift_JIS",
    &["sjis", "shift-jis", "shift_jis", "ms_kanji", "x-sjis", "csShiftJIS"],
    CodecKind::DoubleByte { tables: &tables::jis::SHIFT_JIS, kind: DoubleByteKind::Standard },
    ascii: false, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: b"?"
);

charset!(
    EUC_JP, "EUC-JP",
    &["eucjp", "eucjis", "x-euc-jp", "x-eucjp", "csEUCPkdFmtjapanese",
      "Extended_UNIX_Code_Packed_Format_for_Japanese"],
    CodecKind::EucJp(EucJpVariant::Full),
    ascii: true, dec: (0.5, 1.0), enc: (2.0, 3.0), repl: b"?"
);

charset!(
    EUC_JP_LINUX, "EUC-JP-LINUX",
    &["euc_jp_linux", "euc-jp-linux"],
    CodecKind::EucJp(EucJpVariant::Linux),
    ascii: true, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: b"?"
);

charset!(
    EUC_JP_OPEN, "x-eucJP-Open",
    &["eucJP-open", "EUC_JP_Solaris"],
    CodecKind::EucJp(EucJpVariant::Open),
    ascii: true, dec: (0.5, 1.0), enc: (2.0, 3.0), repl: b"?"
);

charset!(
    EUC_KR, "EUC-KR",
    &["euckr", "ksc5601", "ksc5601-1987", "ksc5601_1987", "ks_c_5601-1987", "5601", "csEUCKR"],
    CodecKind::DoubleByte { tables: &tables::ksc::EUC_KR, kind: DoubleByteKind::EucSimple },
    ascii: true, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: b"?"
);

charset!(
    BIG5, "Big5",
    &["big-5", "big_five", "bigfive", "csBig5"],
    CodecKind::DoubleByte { tables: &tables::big5::BIG5, kind: DoubleByteKind::Standard },
    ascii: true, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: b"?"
);

charset!(
    BIG5_HKSCS, "Big5-HKSCS",
    &["big5hkscs", "big5-hkscs", "big5-hkscs:unicode3.0", "Big5_HKSCS"],
    CodecKind::Big5Hkscs,
    ascii: true, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: b"?"
);

charset!(
    JIS_X0201, "JIS_X0201",
    &["JIS0201", "X0201", "csHalfWidthKatakana"],
    CodecKind::SingleByte(&tables::jis::JIS_X0201),
    ascii: false, dec: (1.0, 1.0), enc: (1.0, 1.0), repl: b"?"
);

charset!(
    JIS_X0208, "JIS_X0208",
    &["JIS0208", "X0208", "iso-ir-87", "jis_c6226-1983", "csISO87JISX0208"],
    CodecKind::DoubleByte { tables: &tables::jis::X0208_JIS, kind: DoubleByteKind::DbcsOnly },
    ascii: false, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: &[0x21, 0x29]
);

charset!(
    JIS_X0212, "JIS_X0212-1990",
    &["JIS_X0212", "JIS0212", "X0212", "iso-ir-159", "jis_x0212-1990", "csISO159JISX02121990"],
    CodecKind::DoubleByte { tables: &tables::jis::X0212_JIS, kind: DoubleByteKind::DbcsOnly },
    ascii: false, dec: (0.5, 1.0), enc: (2.0, 2.0), repl: &[0x30, 0x21]
);

static CHARSETS: &[&Charset] = &[
    &US_ASCII,
    &ISO_8859_1,
    &ISO_8859_2,
    &ISO_8859_5,
    &ISO_8859_7,
    &ISO_8859_15,
    &IBM037,
    &IBM939,
    &UTF_8,
    &CESU_8,
    &UTF_16,
    &UTF_16BE,
    &UTF_16LE,
    &UTF_16LE_BOM,
    &UTF_32,
    &UTF_32BE,
    &UTF_32LE,
    &UTF_32BE_BOM,
    &UTF_32LE_BOM,
    &SHIFT_JIS,
    &EUC_JP,
    &EUC_JP_LINUX,
    &EUC_JP_OPEN,
    &EUC_KR,
    &BIG5,
    &BIG5_HKSCS,
    &JIS_X0201,
    &JIS_X0208,
    &JIS_X0212,
];

/// Iterates over every registered charset descriptor.
pub fn charsets() -> impl Iterator<Item = &'static Charset> {
    CHARSETS.iter().copied()
}

/// Case- and punctuation-insensitive name folding: strip `-`/`_` and
/// lowercase.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolves a charset name or alias to its descriptor.
pub fn for_name(name: &str) -> Result<&'static Charset, UnsupportedCharsetError> {
    let key = normalize(name);
    charsets()
        .find(|cs| {
            normalize(cs.name) == key || cs.aliases.iter().any(|alias| normalize(alias) == key)
        })
        .ok_or_else(|| UnsupportedCharsetError(name.to_string()))
}

/// Whether a charset name or alias is registered.
pub fn is_supported(name: &str) -> bool {
    for_name(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_canonical_and_aliases() {
        assert_eq!(for_name("UTF-8").unwrap().name(), "UTF-8");
        assert_eq!(for_name("utf8").unwrap().name(), "UTF-8");
        assert_eq!(for_name("latin1").unwrap().name(), "ISO-8859-1");
        assert_eq!(for_name("ISO_8859-1").unwrap().name(), "ISO-8859-1");
        assert_eq!(for_name("sjis").unwrap().name(), "Shift_JIS");
        assert_eq!(for_name("CP037").unwrap().name(), "IBM037");
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        assert_eq!(for_name("u-t_f8").unwrap().name(), "UTF-8");
        assert_eq!(for_name("Shift-JIS").unwrap().name(), "Shift_JIS");
    }

    #[test]
    fn unknown_name_errors() {
        let err = for_name("no-such-charset").unwrap_err();
        assert_eq!(err.0, "no-such-charset");
        assert!(!is_supported("no-such-charset"));
    }

    #[test]
    fn contains_relationships() {
        let utf8 = for_name("UTF-8").unwrap();
        let ascii = for_name("US-ASCII").unwrap();
        let latin1 = for_name("ISO-8859-1").unwrap();
        let ibm037 = for_name("IBM037").unwrap();
        assert!(utf8.contains(latin1));
        assert!(utf8.contains(ascii));
        assert!(latin1.contains(ascii));
        assert!(!latin1.contains(utf8));
        assert!(!ibm037.contains(ascii));
        assert!(ibm037.contains(ibm037));
    }

    #[test]
    fn every_charset_is_resolvable_by_its_own_name() {
        for cs in charsets() {
            assert_eq!(for_name(cs.name()).unwrap(), cs);
            for alias in cs.aliases() {
                assert_eq!(for_name(alias).unwrap(), cs, "alias {alias}");
            }
        }
    }

    #[test]
    fn charset_display_and_debug() {
        let cs = for_name("UTF-8").unwrap();
        assert_eq!(cs.to_string(), "UTF-8");
        assert!(format!("{cs:?}").contains("UTF-8"));
    }
}
