use criterion::{Criterion, black_box, criterion_group, criterion_main};
use textcodec::for_name;

fn bench_decode(c: &mut Criterion) {
    let utf8 = for_name("UTF-8").unwrap();
    let ascii_bytes = "The quick brown fox jumps over the lazy dog. ".repeat(64);
    let mixed_bytes = utf8.encode(&"ascii と 漢字 mixed \u{10437} ".repeat(64));
    let latin1 = for_name("ISO-8859-1").unwrap();
    let latin1_bytes = vec![0xE9u8; 4096];

    c.bench_function("decode/utf8-ascii", |b| {
        b.iter(|| utf8.decode(black_box(ascii_bytes.as_bytes())))
    });
    c.bench_function("decode/utf8-mixed", |b| {
        b.iter(|| utf8.decode(black_box(&mixed_bytes)))
    });
    c.bench_function("decode/latin1-high", |b| {
        b.iter(|| latin1.decode(black_box(&latin1_bytes)))
    });
}

fn bench_encode(c: &mut Criterion) {
    let utf16be = for_name("UTF-16BE").unwrap();
    let sjis = for_name("Shift_JIS").unwrap();
    let text = "streaming conversion あいうえお カナ 漢".repeat(64);

    c.bench_function("encode/utf16be", |b| {
        b.iter(|| utf16be.encode(black_box(&text)))
    });
    c.bench_function("encode/shift-jis", |b| {
        b.iter(|| sjis.encode(black_box(&text)))
    });
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
