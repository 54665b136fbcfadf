use super::*;
use crate::codec::text::bytes_to_text;

fn entry(c: &str, f: &str, kind: MediaKind, bytes: &[u8]) -> ManifestEntry {
    ManifestEntry {
        key: AssetKey::new(c, f),
        kind,
        base64: bytes_to_text(bytes),
    }
}

#[test]
fn load_creates_records_and_skips_bad_base64() {
    let mut reg = AssetRegistry::new();
    let mut bad = entry("c1", "bad.png", MediaKind::Png, b"");
    bad.base64 = "@@@".to_string();
    let report = load_manifest(
        &mut reg,
        [
            entry("c1", "a.png", MediaKind::Png, b"png bytes"),
            bad,
            entry("c2", "s.mp3", MediaKind::Mp3, b"mp3 bytes"),
        ],
    )
    .unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped, vec![AssetKey::new("c1", "bad.png")]);
    assert_eq!(
        reg.get(&AssetKey::new("c2", "s.mp3")).unwrap().original_bytes(),
        b"mp3 bytes"
    );
    assert!(!reg.contains(&AssetKey::new("c1", "bad.png")));
}

#[test]
fn duplicate_entries_stop_the_load() {
    let mut reg = AssetRegistry::new();
    let err = load_manifest(
        &mut reg,
        [
            entry("c1", "a.png", MediaKind::Png, b"1"),
            entry("c1", "a.png", MediaKind::Png, b"2"),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, ModkitError::DuplicateKey(_)));
}

#[test]
fn join_infers_kind_within_family() {
    let list: ListDocument =
        serde_json::from_str(r#"{"c1": ["a.jpg", "b.png", "odd.mp3", "missing.png"]}"#).unwrap();
    let structure: StructureDocument =
        serde_json::from_str(r#"{"c1": {"a.jpg": "AA==", "b.png": "AQ==", "odd.mp3": "Ag=="}}"#)
            .unwrap();

    let entries = join_manifest(&list, &structure, MediaKind::Png);
    let kinds: Vec<(String, MediaKind)> = entries
        .iter()
        .map(|e| (e.key.file_name.clone(), e.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("a.jpg".to_string(), MediaKind::Jpeg),
            ("b.png".to_string(), MediaKind::Png),
            ("odd.mp3".to_string(), MediaKind::Png),
        ]
    );
}

#[test]
fn parse_reports_malformed_json() {
    assert!(matches!(
        parse_manifest("{", "{}", MediaKind::Mp3),
        Err(ModkitError::Serde(_))
    ));
    let entries = parse_manifest(
        r#"{"sfx": ["hit.mp3"]}"#,
        r#"{"sfx": {"hit.mp3": "SUQz"}}"#,
        MediaKind::Mp3,
    )
    .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key.to_string(), "sfx/hit.mp3");
    assert_eq!(entries[0].kind, MediaKind::Mp3);
}
