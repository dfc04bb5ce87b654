use std::fs;
use std::path::{Path, PathBuf};

use anvil::region::{region_filename, region_path, HEADER_SIZE, SECTOR_SIZE, SLOT_COUNT};
use anvil::{CompressionType, Compound, Error, Region, RegionOptions, Tag};
use tempfile::tempdir;

fn level(x: i32, z: i32) -> Tag {
    Tag::new(
        "",
        Compound::new()
            .with("xPos", x)
            .with("zPos", z)
            .with("Heightmap", vec![64i64; 37]),
    )
}

const SLOTS: [(i32, i32); 3] = [(0, 0), (5, 2), (31, 31)];

fn write_sample(dir: &Path, kind: CompressionType) -> PathBuf {
    let mut region = Region::with_options(RegionOptions::default().with_compression(kind));
    for (x, z) in SLOTS {
        region
            .chunk_at_xz_mut(x, z)
            .expect("slot")
            .set_root_tag(level(x, z))
            .expect("root");
    }
    let path = region_path(dir, -1, 2);
    region.save_to_file(&path).expect("save");
    assert_eq!(region.xz(), (-1, 2));
    path
}

#[test]
fn save_then_load_reproduces_chunks() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Zlib);
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("r.-1.2.mca"));

    let len = fs::metadata(&path).expect("metadata").len() as usize;
    assert_eq!(len, HEADER_SIZE + SLOTS.len() * SECTOR_SIZE);

    let mut region = Region::new();
    region.load_from_file(&path).expect("load");
    assert_eq!(region.xz(), (-1, 2));
    assert_eq!(region.chunk_count(), 3);
    assert_eq!(region.location_table().expect("table").chunk_count(), 3);

    let populated: Vec<usize> = SLOTS
        .iter()
        .map(|&(x, z)| anvil::region::to_index(x, z).expect("index"))
        .collect();
    for index in 0..SLOT_COUNT {
        if populated.contains(&index) {
            assert!(region.is_chunk_loadable(index));
            assert!(region.is_chunk_loaded(index));
            assert_eq!(region.compression_at(index).expect("kind"), CompressionType::Zlib);
        } else {
            assert!(!region.is_chunk_loadable(index), "slot {index}");
            assert!(region.chunk_at(index).expect("slot").is_empty());
        }
    }
    for (x, z) in SLOTS {
        assert_eq!(
            region.chunk_at_xz(x, z).expect("slot").root_tag(),
            Some(&level(x, z))
        );
    }
}

#[test]
fn saving_a_loaded_region_is_byte_stable() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Gzip);
    let first = fs::read(&path).expect("read");

    let mut region = Region::new();
    region.load_from_file(&path).expect("load");
    let copy = dir.path().join(region_filename(7, 7));
    region.save_to_file(&copy).expect("save copy");
    assert_eq!(region.xz(), (7, 7));
    assert_eq!(region.path(), Some(copy.as_path()));
    assert_eq!(fs::read(&copy).expect("read copy"), first);
    assert!(!dir.path().join("r.7.7.mca.tmp").exists());
}

#[test]
fn partial_load_loads_chunks_on_demand() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Uncompressed);

    let mut region = Region::open(&path).expect("open");
    assert_eq!(region.chunk_count(), 0);
    assert!(region.is_chunk_loadable(69));
    assert!(!region.is_chunk_loaded(69));

    region.load_chunk_at(69).expect("load");
    assert!(region.is_chunk_loaded(69));
    assert_eq!(region.chunk_at(69).expect("slot").root_tag(), Some(&level(5, 2)));

    // Absent slots are a no-op.
    region.load_chunk_at(1).expect("absent slot");
    assert!(!region.is_chunk_loaded(1));
    assert_eq!(region.chunk_count(), 1);
}

#[test]
fn partial_region_keeps_unread_chunks_on_save() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Zlib);

    let mut region = Region::open(&path).expect("open");
    region.load_chunk_at_xz(0, 0).expect("load");
    region
        .chunk_at_xz_mut(0, 0)
        .expect("slot")
        .root_compound_mut()
        .expect("compound")
        .push(Tag::new("Status", "full"));
    region.save().expect("save");

    let mut reloaded = Region::new();
    reloaded.load_from_file(&path).expect("reload");
    assert_eq!(reloaded.chunk_count(), 3);
    let root = reloaded.chunk_at_xz(0, 0).expect("slot").root_compound().expect("root");
    assert!(root.has_child("Status"));
}

#[test]
fn save_without_preload_drops_unread_chunks() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Zlib);

    let options = RegionOptions {
        load_before_save: false,
        ..RegionOptions::default()
    };
    let mut region = Region::open_with_options(&path, options).expect("open");
    region.load_chunk_at_xz(5, 2).expect("load");
    region.save().expect("save");

    let region = {
        let mut region = Region::new();
        region.load_from_file(&path).expect("reload");
        region
    };
    assert_eq!(region.chunk_count(), 1);
    assert!(region.is_chunk_loaded(69));
}

#[test]
fn recompression_is_applied_on_save() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Uncompressed);

    let mut region = Region::new();
    region.load_from_file(&path).expect("load");
    region.set_compression_all(CompressionType::Gzip);
    region.save().expect("save");

    let bytes = fs::read(&path).expect("read");
    assert_eq!(bytes[HEADER_SIZE + 4], CompressionType::Gzip.as_u8());

    let mut region = Region::new();
    region.load_from_file(&path).expect("reload");
    assert_eq!(region.compression_at(0).expect("kind"), CompressionType::Gzip);
    assert_eq!(region.chunk_at(0).expect("slot").root_tag(), Some(&level(0, 0)));
}

#[test]
fn unknown_compression_byte_fails_the_load() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Zlib);
    let mut bytes = fs::read(&path).expect("read");
    bytes[HEADER_SIZE + 4] = 7;
    fs::write(&path, &bytes).expect("write");

    let mut region = Region::open(&path).expect("open");
    let err = region.load_chunk_at(0).expect_err("bad compression");
    assert!(matches!(err, Error::UnknownCompression(7)));
    assert!(!region.is_chunk_loaded(0));

    let err = region.load_all_chunks().expect_err("bad compression");
    assert!(matches!(err, Error::UnknownCompression(7)));
    assert!(!region.is_chunk_loaded(0));
}

#[test]
fn corrupt_payload_fails_the_load() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Zlib);
    let mut bytes = fs::read(&path).expect("read");
    for byte in &mut bytes[HEADER_SIZE + 7..HEADER_SIZE + 20] {
        *byte = 0xFF;
    }
    fs::write(&path, &bytes).expect("write");

    let mut region = Region::open(&path).expect("open");
    assert!(region.load_chunk_at(0).is_err());
    assert!(!region.is_chunk_loaded(0));
}

#[test]
fn truncated_header_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("r.0.0.mca");
    fs::write(&path, vec![0u8; 100]).expect("write");

    let err = Region::open(&path).expect_err("short header");
    assert!(matches!(err, Error::TruncatedHeader { read: 100 }));
}

#[test]
fn failed_open_leaves_region_untouched() {
    let dir = tempdir().expect("tempdir");
    let path = write_sample(dir.path(), CompressionType::Zlib);

    let mut region = Region::new();
    region.load_from_file(&path).expect("load");

    let misnamed = dir.path().join("region.3.2.mca");
    fs::copy(&path, &misnamed).expect("copy");
    let err = region.load_partially_from_file(&misnamed).expect_err("bad name");
    assert!(matches!(err, Error::InvalidRegionFilename(_)));

    let err = region
        .load_partially_from_file(dir.path().join("r.4.4.mca"))
        .expect_err("missing file");
    assert!(matches!(err, Error::Io(_)));

    assert_eq!(region.xz(), (-1, 2));
    assert_eq!(region.path(), Some(path.as_path()));
    assert_eq!(region.chunk_count(), 3);
}

#[test]
fn unencodable_chunk_fails_the_save_without_writing() {
    let dir = tempdir().expect("tempdir");
    let mut region = Region::new();
    let root = Tag::new(
        "",
        Compound::new().with("Biomes", anvil::List::from_values([1i32, 2]).expect("list")),
    );
    region.chunk_at_mut(0).expect("slot").set_root_tag(root).expect("root");
    let biomes = region
        .chunk_at_mut(0)
        .expect("slot")
        .root_compound_mut()
        .and_then(|root| root.get_mut("Biomes"))
        .and_then(anvil::Value::as_list_mut)
        .expect("biomes");
    *biomes.get_mut(1).expect("item") = anvil::Value::Long(5);

    let path = dir.path().join("r.0.0.mca");
    let err = region.save_to_file(&path).expect_err("retyped list item");
    assert!(matches!(err, Error::ListTypeMismatch { .. }));
    assert!(!path.exists());
    assert!(region.path().is_none());
}
