use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use criterion::{criterion_group, criterion_main};

use anvil::compression::{deflate, inflate, DEFAULT_LEVEL};
use anvil::nbt::{decode, encode};
use anvil::{CompressionType, Compound, List, Tag};

fn chunk_document(sections: i8) -> Tag {
    let mut list = List::new();
    for y in 0..sections {
        let section = Compound::new()
            .with("Y", y)
            .with("BlockStates", vec![0x0123_4567_89AB_CDEFi64; 256])
            .with("SkyLight", vec![-1i8; 2048])
            .with(
                "Palette",
                List::from_values(["minecraft:air", "minecraft:stone", "minecraft:dirt"])
                    .expect("palette"),
            );
        list.push(section);
    }
    Tag::new(
        "",
        Compound::new()
            .with("DataVersion", 3465i32)
            .with("xPos", 4i32)
            .with("zPos", -9i32)
            .with("Status", "minecraft:full")
            .with("sections", list),
    )
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("nbt");
    for &sections in &[1_i8, 8, 24] {
        let tag = chunk_document(sections);
        let bytes = encode(&tag).expect("encode");
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", sections), &tag, |b, tag| {
            b.iter(|| encode(black_box(tag)).expect("encode"));
        });
        group.bench_with_input(BenchmarkId::new("decode", sections), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes)).expect("decode"));
        });
    }
    group.finish();
}

fn bench_compression(c: &mut Criterion) {
    let bytes = encode(&chunk_document(8)).expect("encode");
    let mut group = c.benchmark_group("compression");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    for kind in [CompressionType::Gzip, CompressionType::Zlib] {
        let packed = deflate(&bytes, kind, DEFAULT_LEVEL).expect("deflate");
        group.bench_function(BenchmarkId::new("deflate", kind), |b| {
            b.iter(|| deflate(black_box(&bytes), kind, DEFAULT_LEVEL).expect("deflate"));
        });
        group.bench_function(BenchmarkId::new("inflate", kind), |b| {
            b.iter(|| inflate(black_box(&packed), kind).expect("inflate"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_compression);
criterion_main!(benches);
