//! Benchmarks for obtext

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use obtext::{autodec, generate_key_bytes, Candidate, Encoding, Format, ObCipher, Oboron, Scheme};

fn bench_enc_dec(c: &mut Criterion) {
    let mut group = c.benchmark_group("enc_dec");
    let key = generate_key_bytes(Scheme::Ob32p);
    let plaintext = "user-4711@example.com";
    group.throughput(Throughput::Bytes(plaintext.len() as u64));

    for scheme in Scheme::ALL {
        let cipher = ObCipher::new(scheme, key.as_slice()).unwrap();
        let obtext = cipher.enc(plaintext).unwrap();

        group.bench_with_input(BenchmarkId::new("enc", scheme), &plaintext, |b, p| {
            b.iter(|| cipher.enc(p).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("dec", scheme), &obtext, |b, o| {
            b.iter(|| cipher.dec(o).unwrap())
        });
    }

    group.finish();
}

fn bench_encodings(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    let bytes = vec![0xA5u8; 256];

    for encoding in Encoding::ALL {
        let text = encoding.encode(&bytes);
        group.bench_with_input(BenchmarkId::new("encode", encoding), &bytes, |b, bytes| {
            b.iter(|| encoding.encode(bytes))
        });
        group.bench_with_input(BenchmarkId::new("decode", encoding), &text, |b, text| {
            b.iter(|| encoding.decode(text).unwrap())
        });
    }

    group.finish();
}

fn bench_autodec_rotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("autodec");

    for generations in [1usize, 4, 16] {
        let keys: Vec<Vec<u8>> = (0..generations)
            .map(|_| generate_key_bytes(Scheme::Ob32p))
            .collect();
        let candidates: Vec<Candidate> = keys
            .iter()
            .map(|k| Candidate::new(Format::default(), k.as_slice()).unwrap())
            .collect();
        // oldest key is tried last
        let obtext = ObCipher::new(Format::default(), keys[generations - 1].as_slice())
            .unwrap()
            .enc("rotated")
            .unwrap();

        group.bench_with_input(
            BenchmarkId::new("oldest_key", generations),
            &obtext,
            |b, obtext| b.iter(|| autodec(&candidates, obtext).unwrap()),
        );
    }

    let key = generate_key_bytes(Scheme::Ob32p);
    let candidates = [Candidate::new(Format::default(), key).unwrap()];
    group.bench_function("malformed_rejection", |b| {
        b.iter(|| autodec(&candidates, "zzzzzzzzzzzzzzzz").unwrap_err())
    });

    group.finish();
}

criterion_group!(benches, bench_enc_dec, bench_encodings, bench_autodec_rotation);
criterion_main!(benches);
