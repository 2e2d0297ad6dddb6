use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use edid_builder::{DtdSpec, EdidBuilder, VtbExtBuilder};
use edid_decoder::{DecoderConfig, EdidDecoder};
use edid_tests::{base_only, full_chain, noise, vtb_mixed};
use edid_wire::block::BLOCK_SIZE;

fn bench_decode_base(c: &mut Criterion) {
    let bytes = base_only();
    c.bench_function("decode_base_only", |b| {
        b.iter(|| EdidDecoder::decode(&bytes).unwrap());
    });
}

fn bench_decode_full_chain(c: &mut Criterion) {
    let bytes = full_chain();
    let mut group = c.benchmark_group("decode_full_chain");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("decode", |b| {
        b.iter(|| EdidDecoder::decode(&bytes).unwrap());
    });
    group.bench_function("decode_and_render", |b| {
        b.iter(|| EdidDecoder::decode(&bytes).unwrap().render());
    });
    group.finish();
}

fn bench_vtb_chain_length(c: &mut Criterion) {
    let mut dense = VtbExtBuilder::new();
    for _ in 0..6 {
        dense.dtd(&DtdSpec::cea_1080p60());
    }
    let mut group = c.benchmark_group("decode_vtb_chain");
    for extensions in [1usize, 16, 255] {
        let mut builder = EdidBuilder::new();
        for i in 0..extensions {
            if i % 2 == 0 {
                builder.add_vtb_ext(&dense);
            } else {
                builder.add_vtb_ext(&vtb_mixed());
            }
        }
        let bytes = builder.build().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(extensions), &bytes, |b, bytes| {
            b.iter(|| EdidDecoder::decode(bytes).unwrap());
        });
    }
    group.finish();
}

fn bench_decode_noise(c: &mut Criterion) {
    let bytes = noise(0x5EED, 4 * BLOCK_SIZE);
    let lenient = DecoderConfig {
        verify_checksums: false,
        ..DecoderConfig::default()
    };
    c.bench_function("decode_noise", |b| {
        b.iter(|| EdidDecoder::decode_with_config(&bytes, &lenient).unwrap());
    });
}

criterion_group!(
    benches,
    bench_decode_base,
    bench_decode_full_chain,
    bench_vtb_chain_length,
    bench_decode_noise
);
criterion_main!(benches);
