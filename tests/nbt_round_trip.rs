use anvil::nbt::{decode, encode, print_tag};
use anvil::{Compound, Error, List, NbtString, Tag, TagType, Value};

fn sample_level() -> Tag {
    let mut sections = List::new();
    for y in -4i8..4 {
        let section = Compound::new()
            .with("Y", y)
            .with("BlockLight", vec![0i8; 2048])
            .with(
                "Palette",
                List::from_values(["minecraft:air", "minecraft:stone"]).expect("palette"),
            );
        assert!(sections.push(section));
    }

    let level = Compound::new()
        .with("DataVersion", 3465i32)
        .with("xPos", -3i32)
        .with("zPos", 17i32)
        .with("LastUpdate", 1_234_567_890_123i64)
        .with("InhabitedTime", 0i64)
        .with("Status", "minecraft:full")
        .with("isLightOn", 1i8)
        .with("Flags", -2i16)
        .with("Temperature", 0.8f32)
        .with("Downfall", 0.4f64)
        .with("Biomes", vec![1i32, 2, 3, 4])
        .with("Heightmap", vec![i64::MIN, 0, i64::MAX])
        .with("sections", sections)
        .with("Entities", List::new())
        .with("Structures", Compound::new().with("References", Compound::new()));
    Tag::new("", level)
}

#[test]
fn full_document_round_trips() {
    let tag = sample_level();
    let bytes = encode(&tag).expect("encode");
    let decoded = decode(&bytes).expect("decode");
    assert_eq!(decoded, tag);
    assert_eq!(encode(&decoded).expect("re-encode"), bytes);

    let root = decoded.as_compound().expect("compound root");
    assert_eq!(root.get("xPos").and_then(Value::as_int), Some(-3));
    assert_eq!(root.get("Downfall").and_then(Value::as_double), Some(0.4));
    let sections = root.get("sections").and_then(Value::as_list).expect("sections");
    assert_eq!(sections.len(), 8);
    assert_eq!(sections.list_type(), TagType::Compound);
    let entities = root.get("Entities").and_then(Value::as_list).expect("entities");
    assert!(entities.is_empty());
    assert_eq!(entities.list_type(), TagType::End);
}

#[test]
fn named_root_and_raw_bytes_survive() {
    let name = NbtString::from_bytes(vec![0xC0, 0x80, b'x']);
    let tag = Tag::new(
        name.clone(),
        Compound::new().with("blob", NbtString::from_bytes(vec![0xFF, 0x00, 0xFE])),
    );
    let decoded = decode(&encode(&tag).expect("encode")).expect("decode");
    assert_eq!(decoded.name(), &name);
    let blob = decoded
        .as_compound()
        .and_then(|c| c.get("blob"))
        .and_then(Value::as_string)
        .expect("blob");
    assert_eq!(blob.as_bytes(), &[0xFF, 0x00, 0xFE]);
}

#[test]
fn floats_compare_within_ulp_tolerance() {
    let base = 1.5f32;
    let near = f32::from_bits(base.to_bits() + 2);
    let far = f32::from_bits(base.to_bits() + 100);
    assert_eq!(Value::Float(base), Value::Float(near));
    assert_ne!(Value::Float(base), Value::Float(far));

    let base = 2.25f64;
    let near = f64::from_bits(base.to_bits() + 4);
    assert_eq!(Value::Double(base), Value::Double(near));
    assert_ne!(Value::Double(f64::NAN), Value::Double(f64::NAN));
}

#[test]
fn list_push_keeps_element_type() {
    let mut list = List::new();
    assert!(list.push(1i8));
    assert!(!list.push(2i16));
    assert_eq!(list.len(), 1);
    assert_eq!(list.list_type(), TagType::Byte);

    let mut list = List::new();
    assert!(list.push(2i16));
    assert_eq!(list.list_type(), TagType::Short);

    assert!(matches!(
        List::from_values(vec![Value::Int(1), Value::Long(2)]),
        Err(Error::ListTypeMismatch { .. })
    ));
}

#[test]
fn nested_lists_round_trip() {
    let mut outer = List::new();
    for n in 0..3 {
        let inner = List::from_values((0..n).map(|v| v as i32)).expect("inner");
        assert!(outer.push(inner));
    }
    let tag = Tag::new("", Compound::new().with("matrix", outer));
    let decoded = decode(&encode(&tag).expect("encode")).expect("decode");
    assert_eq!(decoded, tag);
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(decode(&[]), Err(Error::UnexpectedEof { .. })));
    assert!(matches!(
        decode(&[0x03, 0x00, 0x00, 0, 0, 0, 1]),
        Err(Error::RootType(TagType::Int))
    ));
    assert!(matches!(
        decode(&[0x0A, 0x00, 0x00, 0x2A]),
        Err(Error::InvalidTagType(0x2A))
    ));
    // Missing the compound terminator.
    assert!(matches!(
        decode(&[0x0A, 0x00, 0x00, 0x01, 0x00, 0x01, b'b', 0x05]),
        Err(Error::UnexpectedEof { .. })
    ));
}

#[test]
fn print_names_every_tag() {
    let tag = Tag::new("", Compound::new().with("x", 42i32).with("name", "pig"));
    let text = print_tag(&tag, 2, false);
    assert!(text.starts_with("TAG_Compound(\"\"): 2 entries"));
    assert!(text.contains("TAG_Int(\"x\"): 42"));
    assert!(text.contains("TAG_String(\"name\"): pig"));
    assert_eq!(tag.to_string(), text);
}
