use super::*;

#[test]
fn asset_key_parse_and_display() {
    let k = AssetKey::parse("weapons/sword.png").unwrap();
    assert_eq!(k, AssetKey::new("weapons", "sword.png"));
    assert_eq!(k.to_string(), "weapons/sword.png");

    let nested = AssetKey::parse("ui\\icons/a.jpg").unwrap();
    assert_eq!(nested.collection_id, "ui");
    assert_eq!(nested.file_name, "icons/a.jpg");

    assert!(AssetKey::parse("no-slash").is_err());
    assert!(AssetKey::parse("/file.png").is_err());
}

#[test]
fn asset_keys_order_by_collection_then_file() {
    let mut keys = vec![
        AssetKey::new("b", "a.png"),
        AssetKey::new("a", "z.png"),
        AssetKey::new("a", "b.png"),
    ];
    keys.sort();
    assert_eq!(
        keys,
        vec![
            AssetKey::new("a", "b.png"),
            AssetKey::new("a", "z.png"),
            AssetKey::new("b", "a.png"),
        ]
    );
}

#[test]
fn media_kind_families_and_names() {
    assert_eq!(MediaKind::Jpeg.family(), MediaFamily::Raster);
    assert_eq!(MediaKind::Png.family(), MediaFamily::Raster);
    assert_eq!(MediaKind::Mp3.family(), MediaFamily::Audio);
    assert_eq!(MediaKind::from_file_name("x.JPEG"), Some(MediaKind::Jpeg));
    assert_eq!(MediaKind::from_file_name("x.tar.png"), Some(MediaKind::Png));
    assert_eq!(MediaKind::from_file_name("noext"), None);
    assert_eq!("mp3".parse::<MediaKind>().unwrap(), MediaKind::Mp3);
    assert!("wav".parse::<MediaKind>().is_err());
}

#[test]
fn media_kind_serde_uses_extensions() {
    assert_eq!(serde_json::to_string(&MediaKind::Jpeg).unwrap(), "\"jpg\"");
    let k: MediaKind = serde_json::from_str("\"jpeg\"").unwrap();
    assert_eq!(k, MediaKind::Jpeg);
}

#[test]
fn rgba_hex_parse_and_format() {
    assert_eq!(Rgba8::parse_hex("#ff8000").unwrap(), Rgba8::rgb(255, 128, 0));
    assert_eq!(
        Rgba8::parse_hex("0000ff80").unwrap(),
        Rgba8 {
            r: 0,
            g: 0,
            b: 255,
            a: 128
        }
    );
    assert_eq!(Rgba8::rgb(1, 2, 3).to_string(), "#010203ff");
    assert!(Rgba8::parse_hex("#fff").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());

    let c: Rgba8 = serde_json::from_str("\"#102030\"").unwrap();
    assert_eq!(c, Rgba8::rgb(0x10, 0x20, 0x30));
}
