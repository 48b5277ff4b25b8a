//! Immutable per-charset mapping data.
//!
//! Tables are described compactly (base-plus-overrides for single-byte
//! charts, row segments for the 94x94 sets) and realized once per process
//! inside `LazyLock` initializers. Nothing here is mutated after
//! construction; every decoder and encoder of a charset shares the same
//! table instance.

pub(crate) mod big5;
pub(crate) mod ibm;
pub(crate) mod jis;
pub(crate) mod ksc;
pub(crate) mod sbcs;

/// Widens a `u16` chart row into the `char` form the single-byte family
/// consumes. All table values are valid BMP scalars or the U+FFFD
/// unmapped sentinel.
pub(crate) fn to_chars(units: &[u16; 256]) -> [char; 256] {
    std::array::from_fn(|i| char::from_u32(units[i] as u32).unwrap_or('\u{FFFD}'))
}
