use std::io::{Cursor, Read};

use super::*;

fn registry() -> AssetRegistry {
    let mut reg = AssetRegistry::new();
    reg.create(AssetKey::new("pack", "a.png"), MediaKind::Png, b"A".to_vec())
        .unwrap();
    reg.create(AssetKey::new("pack", "b.jpg"), MediaKind::Jpeg, b"B".to_vec())
        .unwrap();
    reg.create(AssetKey::new("sfx", "hit.mp3"), MediaKind::Mp3, b"C".to_vec())
        .unwrap();
    reg
}

#[test]
fn layout_normalizes_sub_path() {
    let key = AssetKey::new("pack", "a.png");
    assert_eq!(ArchiveLayout::new("textures").path_for(&key), "pack/textures/a.png");
    assert_eq!(ArchiveLayout::new("").path_for(&key), "pack/a.png");
    assert_eq!(
        ArchiveLayout::new("/assets\\./hd/").path_for(&key),
        "pack/assets/hd/a.png"
    );
    assert_eq!(
        ArchiveLayout::from_config(&EditorConfig::default()).path_for(&key),
        "pack/textures/a.png"
    );
}

#[test]
fn plan_omits_excluded_assets_and_uses_current_bytes() {
    let mut reg = registry();
    reg.set_excluded(&AssetKey::new("pack", "b.jpg"), true).unwrap();
    reg.update(&AssetKey::new("pack", "a.png"), b"A2".to_vec(), MediaKind::Png, None)
        .unwrap();

    let plan = plan_archive(&reg, &ArchiveLayout::new("textures"));
    let paths: Vec<&str> = plan.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["pack/textures/a.png", "sfx/textures/hit.mp3"]);
    assert_eq!(plan[0].bytes.as_slice(), b"A2");
    assert_eq!(plan[1].kind, MediaKind::Mp3);
}

#[test]
fn written_zip_is_readable() {
    let reg = registry();
    let plan = plan_archive(&reg, &ArchiveLayout::new("textures"));
    let cursor = write_zip(&plan, Cursor::new(Vec::new())).unwrap();

    let mut zip = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
    assert_eq!(zip.len(), 3);
    let mut content = Vec::new();
    zip.by_name("sfx/textures/hit.mp3")
        .unwrap()
        .read_to_end(&mut content)
        .unwrap();
    assert_eq!(content, b"C");
}

#[test]
fn empty_plan_still_writes_an_archive() {
    let cursor = write_zip(&[], Cursor::new(Vec::new())).unwrap();
    let zip = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
    assert_eq!(zip.len(), 0);
}
