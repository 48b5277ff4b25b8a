//! Per-thread coder cache.
//!
//! A bounded move-to-front arena of decoder/encoder instances keyed by
//! charset canonical name, one arena per thread, no locking. The one-shot
//! convert helpers route through it so repeated conversions on the same
//! thread reuse a reset coder instead of reallocating one.

use crate::coder::{CharsetDecoder, CharsetEncoder};
use crate::registry::Charset;
use std::cell::RefCell;

const CACHE_SIZE: usize = 3;

struct Slot<T> {
    name: &'static str,
    coder: T,
}

thread_local! {
    static DECODERS: RefCell<Vec<Slot<CharsetDecoder>>> =
        RefCell::new(Vec::with_capacity(CACHE_SIZE));
    static ENCODERS: RefCell<Vec<Slot<CharsetEncoder>>> =
        RefCell::new(Vec::with_capacity(CACHE_SIZE));
}

fn with_cached<T, R>(
    slots: &mut Vec<Slot<T>>,
    charset: &'static Charset,
    create: impl FnOnce() -> T,
    reset: impl FnOnce(&mut T),
    f: impl FnOnce(&mut T) -> R,
) -> R {
    match slots.iter().position(|slot| slot.name == charset.name()) {
        Some(i) => {
            // Move-to-front on hit.
            let slot = slots.remove(i);
            slots.insert(0, slot);
        }
        None => {
            if slots.len() == CACHE_SIZE {
                slots.pop();
            }
            slots.insert(
                0,
                Slot {
                    name: charset.name(),
                    coder: create(),
                },
            );
        }
    }
    let coder = &mut slots[0].coder;
    reset(coder);
    f(coder)
}

/// Runs `f` with this thread's cached decoder for `charset`, creating or
/// evicting as needed. The decoder is reset before `f` sees it.
pub fn with_decoder_for<R>(
    charset: &'static Charset,
    f: impl FnOnce(&mut CharsetDecoder) -> R,
) -> R {
    DECODERS.with(|cell| {
        with_cached(
            &mut cell.borrow_mut(),
            charset,
            || charset.new_decoder(),
            |dec| {
                dec.reset();
            },
            f,
        )
    })
}

/// Runs `f` with this thread's cached encoder for `charset`. The encoder
/// is reset before `f` sees it.
pub fn with_encoder_for<R>(
    charset: &'static Charset,
    f: impl FnOnce(&mut CharsetEncoder) -> R,
) -> R {
    ENCODERS.with(|cell| {
        with_cached(
            &mut cell.borrow_mut(),
            charset,
            || charset.new_encoder(),
            |enc| {
                enc.reset();
            },
            f,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::for_name;

    #[test]
    fn reuses_decoder_across_calls() {
        let cs = for_name("UTF-8").unwrap();
        with_decoder_for(cs, |dec| {
            dec.replace_with("!");
        });
        // The same instance comes back: reset clears lifecycle state, not
        // configuration, so the custom replacement survives.
        let replacement = with_decoder_for(cs, |dec| dec.replacement().to_owned());
        assert_eq!(replacement, "!");
    }

    #[test]
    fn evicts_least_recently_used() {
        let a = for_name("ISO-8859-2").unwrap();
        let b = for_name("ISO-8859-5").unwrap();
        let c = for_name("ISO-8859-7").unwrap();
        let d = for_name("ISO-8859-15").unwrap();
        with_decoder_for(a, |dec| {
            dec.replace_with("@");
        });
        with_decoder_for(b, |dec| {
            dec.replace_with("#");
        });
        with_decoder_for(c, |_| ());
        // Touch `a` so `b` becomes least recently used, then overflow.
        with_decoder_for(a, |dec| assert_eq!(dec.replacement(), "@"));
        with_decoder_for(d, |_| ());
        // `a` survived the eviction; `b` did not and comes back fresh.
        with_decoder_for(a, |dec| assert_eq!(dec.replacement(), "@"));
        with_decoder_for(b, |dec| assert_eq!(dec.replacement(), "\u{FFFD}"));
    }

    #[test]
    fn cached_coder_is_reset_between_uses() {
        let cs = for_name("UTF-16").unwrap();
        // A decode that latches little-endian byte order must not leak
        // into the next cached use.
        assert_eq!(cs.decode(&[0xFF, 0xFE, 0x41, 0x00]), "A");
        assert_eq!(cs.decode(&[0x00, 0x41]), "A");
    }
}
