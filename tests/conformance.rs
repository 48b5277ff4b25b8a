//! Cross-module conformance scenarios: round trips, the error-action
//! matrix, chunked streaming, and the documented boundary behaviors.

use textcodec::{
    ByteBuffer, CharBuffer, CoderResult, CodingError, CodingErrorAction, for_name,
};

fn round_trip(charset: &str, text: &str) {
    let cs = for_name(charset).unwrap();
    let bytes = cs.encode(text);
    assert_eq!(cs.decode(&bytes), text, "round trip through {charset}");
}

#[test]
fn round_trips_over_representable_repertoires() {
    round_trip("US-ASCII", "The quick brown fox, 0123456789!");
    round_trip("ISO-8859-1", "àéîõü ÿ £§¶");
    round_trip("ISO-8859-2", "Łódź žluťoučký");
    round_trip("ISO-8859-5", "Широкая электрификация");
    round_trip("ISO-8859-7", "Ελληνικά κείμενο");
    round_trip("ISO-8859-15", "œuvre €100 Š");
    round_trip("IBM037", "HELLO, world? 123");
    round_trip("UTF-8", "mixed ASCII, ελληνικά, 日本語, \u{10437}\u{1F600}");
    round_trip("CESU-8", "BMP text と \u{10400} pair");
    round_trip("UTF-16", "surrogates \u{10437} and BMP");
    round_trip("UTF-16BE", "plain \u{FEFF} content");
    round_trip("UTF-16LE", "little endian \u{3042}");
    round_trip("UTF-32", "四 bytes each \u{1F600}");
    round_trip("UTF-32LE", "scalar groups");
    round_trip("Shift_JIS", "カナ and 漢字: あいうえお 亜");
    round_trip("EUC-JP", "愛の漢字テキスト 字 ｱｲｳ");
    round_trip("EUC-KR", "ㄱㄴㄷ 가각 ascii");
    round_trip("Big5", "中華民國 一二人 €");
    round_trip("Big5-HKSCS", "中 \u{3EEC} \u{20021}");
    round_trip("IBM939", "Latin あと漢字 mixed");
}

#[test]
fn utf8_decode_then_encode_is_identity() {
    let cs = for_name("UTF-8").unwrap();
    let samples: [&str; 4] = ["", "ascii only", "παν語", "\u{10FFFF}\u{FFFD}"];
    for s in samples {
        let bytes = s.as_bytes().to_vec();
        assert_eq!(cs.encode(&cs.decode(&bytes)), bytes);
    }
}

#[test]
fn zero_room_output_is_overflow_not_data_loss() {
    let cs = for_name("ISO-8859-1").unwrap();
    let mut dec = cs.new_decoder();
    let mut src = ByteBuffer::wrap(vec![0xE9]);
    let mut dst = CharBuffer::allocate(0);
    assert_eq!(dec.decode(&mut src, &mut dst, true), CoderResult::Overflow);
    assert_eq!(src.position(), 0, "no input may be consumed on overflow");
    let mut dst = CharBuffer::allocate(1);
    assert_eq!(dec.decode(&mut src, &mut dst, true), CoderResult::Underflow);
    dst.flip();
    assert_eq!(dst.to_string_lossy(), "\u{00E9}");
}

#[test]
fn truncated_sequence_reports_consumed_length() {
    let cs = for_name("UTF-8").unwrap();
    let mut dec = cs.new_decoder();
    let mut src = ByteBuffer::wrap(vec![0x41, 0xE3, 0x81]);
    let mut dst = CharBuffer::allocate(8);
    let cr = dec.decode(&mut src, &mut dst, true);
    assert_eq!(cr, CoderResult::Malformed(2));
    assert_eq!(src.position(), 1);
}

#[test]
fn error_action_matrix_for_unmappable_characters() {
    let cs = for_name("US-ASCII").unwrap();

    // Report: the result surfaces as data and input stops at the error.
    let mut enc = cs.new_encoder();
    let mut src = CharBuffer::wrap_str("aébc");
    let mut dst = ByteBuffer::allocate(8);
    assert_eq!(enc.encode(&mut src, &mut dst, true), CoderResult::Unmappable(1));
    assert_eq!(src.position(), 1);

    // Replace: the configured bytes are substituted and input advances.
    let mut enc = cs.new_encoder();
    enc.on_unmappable_character(CodingErrorAction::Replace);
    let mut src = CharBuffer::wrap_str("aébc");
    let mut out = enc.encode_all(&mut src).unwrap();
    assert_eq!(out, b"a?bc".to_vec());

    // Ignore: the offending input vanishes with no output.
    let mut enc = cs.new_encoder();
    enc.on_unmappable_character(CodingErrorAction::Ignore);
    let mut src = CharBuffer::wrap_str("aébc");
    out = enc.encode_all(&mut src).unwrap();
    assert_eq!(out, b"abc".to_vec());
}

#[test]
fn error_action_matrix_for_malformed_input() {
    let cs = for_name("UTF-8").unwrap();

    let mut dec = cs.new_decoder();
    dec.on_malformed_input(CodingErrorAction::Replace);
    let mut src = ByteBuffer::wrap(vec![0x41, 0xFF, 0x42]);
    assert_eq!(dec.decode_all(&mut src).unwrap(), "A\u{FFFD}B");

    let mut dec = cs.new_decoder();
    dec.on_malformed_input(CodingErrorAction::Ignore);
    let mut src = ByteBuffer::wrap(vec![0x41, 0xFF, 0x42]);
    assert_eq!(dec.decode_all(&mut src).unwrap(), "AB");

    let mut dec = cs.new_decoder();
    let mut src = ByteBuffer::wrap(vec![0x41, 0xFF, 0x42]);
    assert_eq!(
        dec.decode_all(&mut src),
        Err(CodingError::MalformedInput { length: 1 })
    );
}

#[test]
fn custom_replacement_is_used() {
    let cs = for_name("US-ASCII").unwrap();
    let mut enc = cs.new_encoder();
    enc.on_unmappable_character(CodingErrorAction::Replace);
    enc.replace_with(b"*".to_vec());
    let mut src = CharBuffer::wrap_str("aé");
    assert_eq!(enc.encode_all(&mut src).unwrap(), b"a*".to_vec());
}

#[test]
fn chunked_streaming_matches_one_shot() {
    let cs = for_name("UTF-8").unwrap();
    let text = "chunk 境界 test \u{10437}!";
    let bytes = cs.encode(text);

    // Drive the decoder in 3-byte chunks through a 4-unit output buffer,
    // carrying bytes held back for incomplete sequences into the next
    // chunk.
    let mut dec = cs.new_decoder();
    let mut units: Vec<u16> = Vec::new();
    let mut pending: Vec<u8> = Vec::new();
    for chunk in bytes.chunks(3) {
        pending.extend_from_slice(chunk);
        let mut src = ByteBuffer::wrap(std::mem::take(&mut pending));
        loop {
            let mut dst = CharBuffer::allocate(4);
            let cr = dec.decode(&mut src, &mut dst, false);
            dst.flip();
            units.extend_from_slice(dst.as_units());
            match cr {
                CoderResult::Underflow => break,
                CoderResult::Overflow => continue,
                other => panic!("unexpected result {other:?}"),
            }
        }
        pending = src.as_slice().to_vec();
    }
    let mut src = ByteBuffer::wrap(pending);
    loop {
        let mut dst = CharBuffer::allocate(4);
        let cr = dec.decode(&mut src, &mut dst, true);
        dst.flip();
        units.extend_from_slice(dst.as_units());
        match cr {
            CoderResult::Underflow => break,
            CoderResult::Overflow => continue,
            other => panic!("unexpected result {other:?}"),
        }
    }
    let mut dst = CharBuffer::allocate(4);
    assert!(dec.flush(&mut dst).is_underflow());
    assert_eq!(String::from_utf16(&units).unwrap(), text);
}

#[test]
fn ebcdic_shift_bracketing_is_minimal() {
    let cs = for_name("IBM939").unwrap();
    // One non-Latin character surrounded by Latin characters: exactly one
    // SO before and one SI after.
    let bytes = cs.encode("AあB");
    let so_count = bytes.iter().filter(|&&b| b == 0x0E).count();
    let si_count = bytes.iter().filter(|&&b| b == 0x0F).count();
    assert_eq!(so_count, 1);
    assert_eq!(si_count, 1);
    assert_eq!(cs.decode(&bytes), "AあB");
}

#[test]
fn hkscs_supplementary_round_trip_lands_in_plane_two() {
    let cs = for_name("Big5-HKSCS").unwrap();
    let text = cs.decode(&[0x88, 0x41]);
    let cp = text.chars().next().unwrap() as u32;
    assert!((0x20000..0x30000).contains(&cp), "got U+{cp:04X}");
    assert_eq!(cs.encode(&text), vec![0x88, 0x41]);
}

#[test]
fn unsupported_name_reports_cleanly() {
    let err = for_name("martian-9").unwrap_err();
    assert_eq!(err.to_string(), "unsupported charset: martian-9");
}

#[test]
fn contains_is_one_way() {
    let utf16 = for_name("UTF-16").unwrap();
    let sjis = for_name("Shift_JIS").unwrap();
    let ascii = for_name("US-ASCII").unwrap();
    assert!(utf16.contains(sjis));
    assert!(!sjis.contains(utf16));
    // Shift_JIS redefines 0x5C/0x7E, so it does not claim ASCII.
    assert!(!sjis.contains(ascii));
    let eucjp = for_name("EUC-JP").unwrap();
    assert!(eucjp.contains(ascii));
}

#[test]
fn can_encode_probes_have_no_side_effects() {
    let cs = for_name("Big5").unwrap();
    let mut enc = cs.new_encoder();
    assert!(enc.can_encode_str("中華 ok"));
    assert!(!enc.can_encode_str("中華 and ひらがな"));
    // The probe left the encoder usable.
    let mut src = CharBuffer::wrap_str("中");
    assert_eq!(enc.encode_all(&mut src).unwrap(), vec![0xA4, 0xA4]);
}
