//! Coder results, error actions, and the decoder/encoder state machines.
//!
//! A [`CharsetDecoder`] or [`CharsetEncoder`] walks a fixed lifecycle:
//! reset → coding → end → flushed. Each `decode`/`encode` call drives the
//! charset-specific conversion loop and dispatches malformed/unmappable
//! results through the configured [`CodingErrorAction`]s, keeping buffer
//! positions exact on every exit path.

use crate::big5;
use crate::buffer::{ByteBuffer, CharBuffer};
use crate::double_byte;
use crate::euc_jp;
use crate::registry::{Charset, CodecKind};
use crate::single_byte;
use crate::utf8;
use crate::{cesu8, utf16, utf32};

/// Outcome of a conversion step.
///
/// `Underflow` and `Overflow` are capacity signals ("call again with more
/// input/room"), not errors. `Malformed` and `Unmappable` carry the length
/// in input units of the offending sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoderResult {
    /// The input was exhausted (possibly mid-sequence).
    Underflow,
    /// The output buffer ran out of room.
    Overflow,
    /// The input is not a legal unit of the source encoding.
    Malformed(usize),
    /// The input is legal but has no representation in the target encoding.
    Unmappable(usize),
}

impl CoderResult {
    /// Constructs a malformed result.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn malformed_for_length(len: usize) -> Self {
        assert!(len > 0, "malformed length must be positive");
        CoderResult::Malformed(len)
    }

    /// Constructs an unmappable result.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn unmappable_for_length(len: usize) -> Self {
        assert!(len > 0, "unmappable length must be positive");
        CoderResult::Unmappable(len)
    }

    /// Whether this is the underflow signal.
    pub fn is_underflow(&self) -> bool {
        matches!(self, CoderResult::Underflow)
    }

    /// Whether this is the overflow signal.
    pub fn is_overflow(&self) -> bool {
        matches!(self, CoderResult::Overflow)
    }

    /// Whether this is a malformed-input result.
    pub fn is_malformed(&self) -> bool {
        matches!(self, CoderResult::Malformed(_))
    }

    /// Whether this is an unmappable-character result.
    pub fn is_unmappable(&self) -> bool {
        matches!(self, CoderResult::Unmappable(_))
    }

    /// Whether this is an error result.
    pub fn is_error(&self) -> bool {
        self.is_malformed() || self.is_unmappable()
    }

    /// Length of the erroneous input sequence.
    ///
    /// # Panics
    ///
    /// Panics unless this is an error result.
    pub fn length(&self) -> usize {
        match self {
            CoderResult::Malformed(n) | CoderResult::Unmappable(n) => *n,
            other => panic!("length() on non-error coder result {other:?}"),
        }
    }

    /// Converts this result into its corresponding typed error.
    ///
    /// Underflow maps to [`CodingError::BufferUnderflow`]; raising it is
    /// itself a sign the caller lost track of the conversion state.
    pub fn into_error(self) -> CodingError {
        match self {
            CoderResult::Underflow => CodingError::BufferUnderflow,
            CoderResult::Overflow => CodingError::BufferOverflow,
            CoderResult::Malformed(n) => CodingError::MalformedInput { length: n },
            CoderResult::Unmappable(n) => CodingError::UnmappableCharacter { length: n },
        }
    }
}

/// Typed error raised by the whole-input convenience methods.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodingError {
    /// Input that is not a legal unit of the source encoding.
    MalformedInput {
        /// Length of the malformed sequence in input units.
        length: usize,
    },
    /// A legal input unit with no representation in the target encoding.
    UnmappableCharacter {
        /// Length of the unmappable sequence in input units.
        length: usize,
    },
    /// The output buffer was too small.
    BufferOverflow,
    /// More input was required than was available.
    BufferUnderflow,
}

impl std::fmt::Display for CodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodingError::MalformedInput { length } => {
                write!(f, "malformed input of length {length}")
            }
            CodingError::UnmappableCharacter { length } => {
                write!(f, "unmappable character of length {length}")
            }
            CodingError::BufferOverflow => write!(f, "output buffer overflow"),
            CodingError::BufferUnderflow => write!(f, "input buffer underflow"),
        }
    }
}

impl std::error::Error for CodingError {}

/// Policy applied when a conversion step reports an error result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodingErrorAction {
    /// Surface the error result to the caller.
    #[default]
    Report,
    /// Skip the offending input and continue.
    Ignore,
    /// Substitute the configured replacement and continue.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoderState {
    Reset,
    Coding,
    End,
    Flushed,
}

pub(crate) enum DecoderKind {
    SingleByte(single_byte::Decoder),
    DoubleByte(double_byte::Decoder),
    Utf8(utf8::Decoder),
    Cesu8(cesu8::Decoder),
    Utf16(utf16::Decoder),
    Utf32(utf32::Decoder),
    EucJp(euc_jp::Decoder),
    Big5Hkscs(big5::Decoder),
}

impl DecoderKind {
    fn new(charset: &'static Charset) -> Self {
        match charset.kind() {
            CodecKind::SingleByte(table) => {
                DecoderKind::SingleByte(single_byte::Decoder::new(*table))
            }
            CodecKind::DoubleByte { tables, kind } => {
                DecoderKind::DoubleByte(double_byte::Decoder::new(*tables, *kind))
            }
            CodecKind::Utf8 => DecoderKind::Utf8(utf8::Decoder::new()),
            CodecKind::Cesu8 => DecoderKind::Cesu8(cesu8::Decoder::new()),
            CodecKind::Utf16(variant) => DecoderKind::Utf16(utf16::Decoder::new(*variant)),
            CodecKind::Utf32(variant) => DecoderKind::Utf32(utf32::Decoder::new(*variant)),
            CodecKind::EucJp(variant) => DecoderKind::EucJp(euc_jp::Decoder::new(*variant)),
            CodecKind::Big5Hkscs => DecoderKind::Big5Hkscs(big5::Decoder::new()),
        }
    }

    fn decode_loop(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        match self {
            DecoderKind::SingleByte(d) => d.decode_loop(src, dst),
            DecoderKind::DoubleByte(d) => d.decode_loop(src, dst),
            DecoderKind::Utf8(d) => d.decode_loop(src, dst),
            DecoderKind::Cesu8(d) => d.decode_loop(src, dst),
            DecoderKind::Utf16(d) => d.decode_loop(src, dst),
            DecoderKind::Utf32(d) => d.decode_loop(src, dst),
            DecoderKind::EucJp(d) => d.decode_loop(src, dst),
            DecoderKind::Big5Hkscs(d) => d.decode_loop(src, dst),
        }
    }

    fn reset(&mut self) {
        match self {
            DecoderKind::DoubleByte(d) => d.reset(),
            DecoderKind::Utf16(d) => d.reset(),
            DecoderKind::Utf32(d) => d.reset(),
            _ => {}
        }
    }
}

pub(crate) enum EncoderKind {
    SingleByte(single_byte::Encoder),
    DoubleByte(double_byte::Encoder),
    Utf8(utf8::Encoder),
    Cesu8(cesu8::Encoder),
    Utf16(utf16::Encoder),
    Utf32(utf32::Encoder),
    EucJp(euc_jp::Encoder),
    Big5Hkscs(big5::Encoder),
}

impl EncoderKind {
    fn new(charset: &'static Charset) -> Self {
        match charset.kind() {
            CodecKind::SingleByte(table) => {
                EncoderKind::SingleByte(single_byte::Encoder::new(*table))
            }
            CodecKind::DoubleByte { tables, kind } => {
                EncoderKind::DoubleByte(double_byte::Encoder::new(*tables, *kind))
            }
            CodecKind::Utf8 => EncoderKind::Utf8(utf8::Encoder::new()),
            CodecKind::Cesu8 => EncoderKind::Cesu8(cesu8::Encoder::new()),
            CodecKind::Utf16(variant) => EncoderKind::Utf16(utf16::Encoder::new(*variant)),
            CodecKind::Utf32(variant) => EncoderKind::Utf32(utf32::Encoder::new(*variant)),
            CodecKind::EucJp(variant) => EncoderKind::EucJp(euc_jp::Encoder::new(*variant)),
            CodecKind::Big5Hkscs => EncoderKind::Big5Hkscs(big5::Encoder::new()),
        }
    }

    fn encode_loop(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        match self {
            EncoderKind::SingleByte(e) => e.encode_loop(src, dst),
            EncoderKind::DoubleByte(e) => e.encode_loop(src, dst),
            EncoderKind::Utf8(e) => e.encode_loop(src, dst),
            EncoderKind::Cesu8(e) => e.encode_loop(src, dst),
            EncoderKind::Utf16(e) => e.encode_loop(src, dst),
            EncoderKind::Utf32(e) => e.encode_loop(src, dst),
            EncoderKind::EucJp(e) => e.encode_loop(src, dst),
            EncoderKind::Big5Hkscs(e) => e.encode_loop(src, dst),
        }
    }

    fn flush(&mut self, dst: &mut ByteBuffer) -> CoderResult {
        match self {
            EncoderKind::DoubleByte(e) => e.flush(dst),
            _ => CoderResult::Underflow,
        }
    }

    fn reset(&mut self) {
        match self {
            EncoderKind::DoubleByte(e) => e.reset(),
            EncoderKind::Utf16(e) => e.reset(),
            EncoderKind::Utf32(e) => e.reset(),
            _ => {}
        }
    }
}

/// Streaming byte-to-text converter for one charset.
///
/// Not safe for concurrent use; obtain one per thread (or use the
/// per-thread cache) or synchronize externally.
pub struct CharsetDecoder {
    charset: &'static Charset,
    average_chars_per_byte: f32,
    max_chars_per_byte: f32,
    replacement: String,
    replacement_units: Vec<u16>,
    malformed_action: CodingErrorAction,
    unmappable_action: CodingErrorAction,
    state: CoderState,
    inner: DecoderKind,
}

impl CharsetDecoder {
    pub(crate) fn new(charset: &'static Charset) -> Self {
        let replacement = charset.decoder_replacement().to_owned();
        let replacement_units = replacement.encode_utf16().collect();
        Self {
            charset,
            average_chars_per_byte: charset.average_chars_per_byte(),
            max_chars_per_byte: charset.max_chars_per_byte(),
            replacement,
            replacement_units,
            malformed_action: CodingErrorAction::Report,
            unmappable_action: CodingErrorAction::Report,
            state: CoderState::Reset,
            inner: DecoderKind::new(charset),
        }
    }

    /// The charset that created this decoder.
    pub fn charset(&self) -> &'static Charset {
        self.charset
    }

    /// Expected chars produced per input byte, on average.
    pub fn average_chars_per_byte(&self) -> f32 {
        self.average_chars_per_byte
    }

    /// Maximum chars produced per input byte.
    pub fn max_chars_per_byte(&self) -> f32 {
        self.max_chars_per_byte
    }

    /// The current replacement string.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Sets the replacement string used under [`CodingErrorAction::Replace`].
    ///
    /// # Panics
    ///
    /// Panics if the replacement is empty or longer than
    /// `max_chars_per_byte` UTF-16 units.
    pub fn replace_with(&mut self, replacement: &str) -> &mut Self {
        let units: Vec<u16> = replacement.encode_utf16().collect();
        assert!(!units.is_empty(), "empty decoder replacement");
        assert!(
            units.len() as f32 <= self.max_chars_per_byte,
            "decoder replacement longer than max_chars_per_byte"
        );
        self.replacement = replacement.to_owned();
        self.replacement_units = units;
        self
    }

    /// The action applied to malformed input.
    pub fn malformed_input_action(&self) -> CodingErrorAction {
        self.malformed_action
    }

    /// The action applied to unmappable characters.
    pub fn unmappable_character_action(&self) -> CodingErrorAction {
        self.unmappable_action
    }

    /// Sets the malformed-input action.
    pub fn on_malformed_input(&mut self, action: CodingErrorAction) -> &mut Self {
        self.malformed_action = action;
        self
    }

    /// Sets the unmappable-character action.
    pub fn on_unmappable_character(&mut self, action: CodingErrorAction) -> &mut Self {
        self.unmappable_action = action;
        self
    }

    /// Decodes as many bytes as possible from `src` into `dst`.
    ///
    /// Pass `end_of_input = true` on (and only on) the final call of an
    /// operation; a trailing truncated sequence then reports as malformed
    /// instead of underflow.
    ///
    /// # Panics
    ///
    /// Panics if called out of lifecycle order (for example with
    /// `end_of_input = false` after a call that already signalled the end).
    pub fn decode(
        &mut self,
        src: &mut ByteBuffer,
        dst: &mut CharBuffer,
        end_of_input: bool,
    ) -> CoderResult {
        let legal = matches!(self.state, CoderState::Reset | CoderState::Coding)
            || (end_of_input && self.state == CoderState::End);
        if !legal {
            panic!("illegal decoder state {:?} for decode call", self.state);
        }
        self.state = if end_of_input {
            CoderState::End
        } else {
            CoderState::Coding
        };
        loop {
            let mut cr = self.inner.decode_loop(src, dst);
            if cr.is_overflow() {
                return cr;
            }
            if cr.is_underflow() {
                if end_of_input && src.has_remaining() {
                    cr = CoderResult::Malformed(src.remaining());
                } else {
                    return cr;
                }
            }
            let action = if cr.is_malformed() {
                self.malformed_action
            } else {
                self.unmappable_action
            };
            match action {
                CodingErrorAction::Report => return cr,
                CodingErrorAction::Replace => {
                    if dst.remaining() < self.replacement_units.len() {
                        return CoderResult::Overflow;
                    }
                    dst.put_units(&self.replacement_units);
                }
                CodingErrorAction::Ignore => {}
            }
            src.advance(cr.length());
        }
    }

    /// Flushes any decoder-internal state into `dst`.
    ///
    /// Legal only after a `decode` call with `end_of_input = true`.
    ///
    /// # Panics
    ///
    /// Panics if the decoder is mid-operation or has not seen end-of-input.
    pub fn flush(&mut self, _dst: &mut CharBuffer) -> CoderResult {
        match self.state {
            CoderState::End => {
                // No registered charset carries decoder state across flush;
                // shift and byte-order state clear on reset instead.
                self.state = CoderState::Flushed;
                CoderResult::Underflow
            }
            CoderState::Flushed => CoderResult::Underflow,
            state => panic!("illegal decoder state {state:?} for flush call"),
        }
    }

    /// Resets the decoder, clearing charset-specific state. Legal from any
    /// state.
    pub fn reset(&mut self) -> &mut Self {
        self.inner.reset();
        self.state = CoderState::Reset;
        self
    }

    /// Decodes all remaining bytes of `src` into a string.
    ///
    /// Resets the decoder, converts until underflow (growing the output
    /// geometrically on overflow), flushes, and returns the result. Any
    /// terminal error result is raised as a [`CodingError`].
    pub fn decode_all(&mut self, src: &mut ByteBuffer) -> Result<String, CodingError> {
        let units = self.decode_all_units(src)?;
        String::from_utf16(&units).map_err(|_| CodingError::MalformedInput { length: 1 })
    }

    pub(crate) fn decode_all_units(&mut self, src: &mut ByteBuffer) -> Result<Vec<u16>, CodingError> {
        let mut n = (src.remaining() as f32 * self.average_chars_per_byte).ceil() as usize;
        if n == 0 && src.remaining() == 0 {
            return Ok(Vec::new());
        }
        let mut out = CharBuffer::allocate(n);
        self.reset();
        loop {
            let mut cr = if src.has_remaining() {
                self.decode(src, &mut out, true)
            } else {
                CoderResult::Underflow
            };
            if cr.is_underflow() {
                cr = self.flush(&mut out);
            }
            if cr.is_underflow() {
                break;
            }
            if cr.is_overflow() {
                n = 2 * n + 1;
                let mut bigger = CharBuffer::allocate(n);
                out.flip();
                bigger.put_units(out.as_units());
                out = bigger;
                continue;
            }
            return Err(cr.into_error());
        }
        out.flip();
        Ok(out.as_units().to_vec())
    }
}

impl std::fmt::Debug for CharsetDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharsetDecoder")
            .field("charset", &self.charset.name())
            .field("state", &self.state)
            .field("malformed_action", &self.malformed_action)
            .field("unmappable_action", &self.unmappable_action)
            .finish()
    }
}

/// Streaming text-to-byte converter for one charset.
///
/// Not safe for concurrent use; see [`CharsetDecoder`].
pub struct CharsetEncoder {
    charset: &'static Charset,
    average_bytes_per_char: f32,
    max_bytes_per_char: f32,
    replacement: Vec<u8>,
    malformed_action: CodingErrorAction,
    unmappable_action: CodingErrorAction,
    state: CoderState,
    inner: EncoderKind,
    probe_decoder: Option<Box<CharsetDecoder>>,
}

impl CharsetEncoder {
    pub(crate) fn new(charset: &'static Charset) -> Self {
        Self {
            charset,
            average_bytes_per_char: charset.average_bytes_per_char(),
            max_bytes_per_char: charset.max_bytes_per_char(),
            replacement: charset.encoder_replacement().to_vec(),
            malformed_action: CodingErrorAction::Report,
            unmappable_action: CodingErrorAction::Report,
            state: CoderState::Reset,
            inner: EncoderKind::new(charset),
            probe_decoder: None,
        }
    }

    /// The charset that created this encoder.
    pub fn charset(&self) -> &'static Charset {
        self.charset
    }

    /// Expected bytes produced per input char, on average.
    pub fn average_bytes_per_char(&self) -> f32 {
        self.average_bytes_per_char
    }

    /// Maximum bytes produced per input char.
    pub fn max_bytes_per_char(&self) -> f32 {
        self.max_bytes_per_char
    }

    /// The current replacement bytes.
    pub fn replacement(&self) -> &[u8] {
        &self.replacement
    }

    /// Sets the replacement bytes used under [`CodingErrorAction::Replace`].
    ///
    /// # Panics
    ///
    /// Panics if the replacement is empty, longer than
    /// `max_bytes_per_char`, or does not decode to valid text in this
    /// charset.
    pub fn replace_with(&mut self, replacement: Vec<u8>) -> &mut Self {
        assert!(!replacement.is_empty(), "empty encoder replacement");
        assert!(
            replacement.len() as f32 <= self.max_bytes_per_char,
            "encoder replacement longer than max_bytes_per_char"
        );
        assert!(
            self.is_legal_replacement(&replacement),
            "encoder replacement is not legal in charset {}",
            self.charset.name()
        );
        self.replacement = replacement;
        self
    }

    /// Whether `replacement` decodes cleanly back through this charset.
    pub fn is_legal_replacement(&mut self, replacement: &[u8]) -> bool {
        let charset = self.charset;
        let dec = self.probe_decoder.get_or_insert_with(|| {
            let mut d = charset.new_decoder();
            d.on_malformed_input(CodingErrorAction::Report);
            d.on_unmappable_character(CodingErrorAction::Report);
            Box::new(d)
        });
        dec.reset();
        let mut src = ByteBuffer::wrap(replacement.to_vec());
        let room = (replacement.len() as f32 * dec.max_chars_per_byte()).ceil() as usize;
        let mut dst = CharBuffer::allocate(room);
        let cr = dec.decode(&mut src, &mut dst, true);
        !cr.is_error()
    }

    /// The action applied to malformed input.
    pub fn malformed_input_action(&self) -> CodingErrorAction {
        self.malformed_action
    }

    /// The action applied to unmappable characters.
    pub fn unmappable_character_action(&self) -> CodingErrorAction {
        self.unmappable_action
    }

    /// Sets the malformed-input action.
    pub fn on_malformed_input(&mut self, action: CodingErrorAction) -> &mut Self {
        self.malformed_action = action;
        self
    }

    /// Sets the unmappable-character action.
    pub fn on_unmappable_character(&mut self, action: CodingErrorAction) -> &mut Self {
        self.unmappable_action = action;
        self
    }

    /// Encodes as many code units as possible from `src` into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if called out of lifecycle order.
    pub fn encode(
        &mut self,
        src: &mut CharBuffer,
        dst: &mut ByteBuffer,
        end_of_input: bool,
    ) -> CoderResult {
        let legal = matches!(self.state, CoderState::Reset | CoderState::Coding)
            || (end_of_input && self.state == CoderState::End);
        if !legal {
            panic!("illegal encoder state {:?} for encode call", self.state);
        }
        self.state = if end_of_input {
            CoderState::End
        } else {
            CoderState::Coding
        };
        loop {
            let mut cr = self.inner.encode_loop(src, dst);
            if cr.is_overflow() {
                return cr;
            }
            if cr.is_underflow() {
                if end_of_input && src.has_remaining() {
                    cr = CoderResult::Malformed(src.remaining());
                } else {
                    return cr;
                }
            }
            let action = if cr.is_malformed() {
                self.malformed_action
            } else {
                self.unmappable_action
            };
            match action {
                CodingErrorAction::Report => return cr,
                CodingErrorAction::Replace => {
                    if dst.remaining() < self.replacement.len() {
                        return CoderResult::Overflow;
                    }
                    dst.put_slice(&self.replacement);
                }
                CodingErrorAction::Ignore => {}
            }
            src.advance(cr.length());
        }
    }

    /// Flushes encoder-internal state (for example a trailing shift-in
    /// byte) into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if the encoder is mid-operation or has not seen end-of-input.
    pub fn flush(&mut self, dst: &mut ByteBuffer) -> CoderResult {
        match self.state {
            CoderState::End => {
                let cr = self.inner.flush(dst);
                if cr.is_underflow() {
                    self.state = CoderState::Flushed;
                }
                cr
            }
            CoderState::Flushed => CoderResult::Underflow,
            state => panic!("illegal encoder state {state:?} for flush call"),
        }
    }

    /// Resets the encoder, clearing charset-specific state. Legal from any
    /// state.
    pub fn reset(&mut self) -> &mut Self {
        self.inner.reset();
        self.state = CoderState::Reset;
        self
    }

    /// Encodes all remaining code units of `src` into bytes.
    ///
    /// Resets the encoder first; any terminal error result is raised as a
    /// [`CodingError`].
    pub fn encode_all(&mut self, src: &mut CharBuffer) -> Result<Vec<u8>, CodingError> {
        let mut n = (src.remaining() as f32 * self.average_bytes_per_char).ceil() as usize;
        if n == 0 && src.remaining() == 0 {
            return Ok(Vec::new());
        }
        let mut out = ByteBuffer::allocate(n);
        self.reset();
        loop {
            let mut cr = if src.has_remaining() {
                self.encode(src, &mut out, true)
            } else {
                CoderResult::Underflow
            };
            if cr.is_underflow() {
                cr = self.flush(&mut out);
            }
            if cr.is_underflow() {
                break;
            }
            if cr.is_overflow() {
                n = 2 * n + 1;
                let mut bigger = ByteBuffer::allocate(n);
                out.flip();
                bigger.put_slice(out.as_slice());
                out = bigger;
                continue;
            }
            return Err(cr.into_error());
        }
        out.flip();
        Ok(out.as_slice().to_vec())
    }

    /// Whether this encoder can represent `c`, probed by a real conversion
    /// with both actions forced to report. Has no observable side effects.
    ///
    /// # Panics
    ///
    /// Panics if an encoding operation is in progress.
    pub fn can_encode_char(&mut self, c: char) -> bool {
        let mut buf = [0u16; 2];
        let units = c.encode_utf16(&mut buf).to_vec();
        self.can_encode_units(units)
    }

    /// Whether this encoder can represent every character of `text`.
    ///
    /// # Panics
    ///
    /// Panics if an encoding operation is in progress.
    pub fn can_encode_str(&mut self, text: &str) -> bool {
        self.can_encode_units(text.encode_utf16().collect())
    }

    fn can_encode_units(&mut self, units: Vec<u16>) -> bool {
        match self.state {
            CoderState::Flushed => {
                self.reset();
            }
            CoderState::Reset => {}
            state => panic!("can_encode probe during encoding operation (state {state:?})"),
        }
        let saved_malformed = self.malformed_action;
        let saved_unmappable = self.unmappable_action;
        self.malformed_action = CodingErrorAction::Report;
        self.unmappable_action = CodingErrorAction::Report;
        let mut src = CharBuffer::wrap_units(units);
        let ok = self.encode_all(&mut src).is_ok();
        self.malformed_action = saved_malformed;
        self.unmappable_action = saved_unmappable;
        self.reset();
        ok
    }
}

impl std::fmt::Debug for CharsetEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharsetEncoder")
            .field("charset", &self.charset.name())
            .field("state", &self.state)
            .field("malformed_action", &self.malformed_action)
            .field("unmappable_action", &self.unmappable_action)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::for_name;

    #[test]
    fn coder_result_predicates() {
        assert!(CoderResult::Underflow.is_underflow());
        assert!(CoderResult::Overflow.is_overflow());
        let m = CoderResult::malformed_for_length(2);
        assert!(m.is_malformed() && m.is_error());
        assert_eq!(m.length(), 2);
        let u = CoderResult::unmappable_for_length(1);
        assert!(u.is_unmappable() && u.is_error());
        assert_eq!(u.length(), 1);
    }

    #[test]
    #[should_panic(expected = "length() on non-error")]
    fn length_of_underflow_panics() {
        CoderResult::Underflow.length();
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn zero_length_malformed_rejected() {
        CoderResult::malformed_for_length(0);
    }

    #[test]
    fn into_error_mapping() {
        assert_eq!(
            CoderResult::Malformed(3).into_error(),
            CodingError::MalformedInput { length: 3 }
        );
        assert_eq!(
            CoderResult::Underflow.into_error(),
            CodingError::BufferUnderflow
        );
    }

    #[test]
    #[should_panic(expected = "illegal decoder state")]
    fn decode_after_end_without_reset_panics() {
        let mut dec = for_name("ISO-8859-1").unwrap().new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x41]);
        let mut dst = CharBuffer::allocate(4);
        dec.decode(&mut src, &mut dst, true);
        let mut src2 = ByteBuffer::wrap(vec![0x42]);
        dec.decode(&mut src2, &mut dst, false);
    }

    #[test]
    #[should_panic(expected = "for flush call")]
    fn flush_before_end_panics() {
        let mut dec = for_name("ISO-8859-1").unwrap().new_decoder();
        let mut dst = CharBuffer::allocate(4);
        dec.flush(&mut dst);
    }

    #[test]
    fn reset_allows_new_operation() {
        let mut dec = for_name("ISO-8859-1").unwrap().new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x41]);
        let mut dst = CharBuffer::allocate(4);
        assert_eq!(dec.decode(&mut src, &mut dst, true), CoderResult::Underflow);
        dec.reset();
        let mut src2 = ByteBuffer::wrap(vec![0x42]);
        assert_eq!(
            dec.decode(&mut src2, &mut dst, false),
            CoderResult::Underflow
        );
    }

    #[test]
    fn flush_twice_is_underflow() {
        let mut dec = for_name("ISO-8859-1").unwrap().new_decoder();
        let mut src = ByteBuffer::wrap(vec![0x41]);
        let mut dst = CharBuffer::allocate(4);
        dec.decode(&mut src, &mut dst, true);
        assert_eq!(dec.flush(&mut dst), CoderResult::Underflow);
        assert_eq!(dec.flush(&mut dst), CoderResult::Underflow);
    }

    #[test]
    fn replacement_setter_validates() {
        let mut dec = for_name("UTF-8").unwrap().new_decoder();
        dec.replace_with("?");
        assert_eq!(dec.replacement(), "?");
    }

    #[test]
    #[should_panic(expected = "empty decoder replacement")]
    fn empty_replacement_rejected() {
        let mut dec = for_name("UTF-8").unwrap().new_decoder();
        dec.replace_with("");
    }

    #[test]
    fn legal_replacement_probe() {
        let mut enc = for_name("UTF-8").unwrap().new_encoder();
        assert!(enc.is_legal_replacement(b"?"));
        assert!(enc.is_legal_replacement(b"\xEF\xBF\xBD"));
        assert!(!enc.is_legal_replacement(b"\xFF"));
    }

    #[test]
    fn can_encode_probe_restores_actions() {
        let mut enc = for_name("US-ASCII").unwrap().new_encoder();
        enc.on_unmappable_character(CodingErrorAction::Replace);
        assert!(enc.can_encode_char('A'));
        assert!(!enc.can_encode_char('é'));
        assert_eq!(
            enc.unmappable_character_action(),
            CodingErrorAction::Replace
        );
    }
}
