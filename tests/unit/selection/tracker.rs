use super::*;

fn key(f: &str) -> AssetKey {
    AssetKey::new("c1", f)
}

fn display(entries: &[(&str, MediaKind, bool)]) -> Vec<DisplayEntry> {
    entries
        .iter()
        .map(|(f, kind, excluded)| DisplayEntry {
            key: key(f),
            kind: *kind,
            excluded: *excluded,
        })
        .collect()
}

#[test]
fn first_key_fixes_the_family() {
    let mut sel = SelectionTracker::new();
    sel.toggle(&key("a.png"), MediaKind::Png, false).unwrap();
    sel.toggle(&key("b.jpg"), MediaKind::Jpeg, false).unwrap();
    assert_eq!(sel.allowed_family(), Some(MediaFamily::Raster));

    let err = sel.toggle(&key("s.mp3"), MediaKind::Mp3, false).unwrap_err();
    assert!(matches!(err, ModkitError::KindMismatch(_)));
    assert_eq!(sel.selected_keys(), &[key("a.png"), key("b.jpg")]);
}

#[test]
fn toggling_off_the_last_key_releases_the_family() {
    let mut sel = SelectionTracker::new();
    sel.toggle(&key("a.png"), MediaKind::Png, false).unwrap();
    sel.toggle(&key("a.png"), MediaKind::Png, false).unwrap();
    assert!(sel.is_empty());
    assert_eq!(sel.allowed_family(), None);
    sel.toggle(&key("s.mp3"), MediaKind::Mp3, false).unwrap();
    assert_eq!(sel.allowed_family(), Some(MediaFamily::Audio));
}

#[test]
fn excluded_assets_cannot_be_selected_for_editing() {
    let mut sel = SelectionTracker::new();
    assert!(matches!(
        sel.toggle(&key("a.png"), MediaKind::Png, true),
        Err(ModkitError::ConflictingState(_))
    ));
    assert!(sel.is_empty());

    sel.set_mode(SelectionMode::Exclude);
    sel.toggle(&key("a.png"), MediaKind::Png, true).unwrap();
    assert_eq!(sel.state_of(&key("a.png")), KeyState::SelectedForExclusion);
}

#[test]
fn mode_change_clears_selection() {
    let mut sel = SelectionTracker::new();
    sel.toggle(&key("a.png"), MediaKind::Png, false).unwrap();
    assert_eq!(sel.state_of(&key("a.png")), KeyState::SelectedForEdit);

    sel.set_mode(SelectionMode::Edit);
    assert_eq!(sel.len(), 1);

    sel.set_mode(SelectionMode::Exclude);
    assert!(sel.is_empty());
    assert_eq!(sel.allowed_family(), None);
    assert_eq!(sel.state_of(&key("a.png")), KeyState::Unselected);
}

#[test]
fn range_selects_in_either_direction_and_skips_mismatches() {
    let order = display(&[
        ("a.png", MediaKind::Png, false),
        ("b.mp3", MediaKind::Mp3, false),
        ("c.jpg", MediaKind::Jpeg, true),
        ("d.png", MediaKind::Png, false),
        ("e.png", MediaKind::Png, false),
    ]);

    let mut sel = SelectionTracker::new();
    let added = sel
        .select_range(&key("d.png"), &key("a.png"), MediaKind::Png, &order)
        .unwrap();
    assert_eq!(added, 2);
    assert_eq!(sel.selected_keys(), &[key("a.png"), key("d.png")]);

    let added = sel
        .select_range(&key("a.png"), &key("e.png"), MediaKind::Png, &order)
        .unwrap();
    assert_eq!(added, 1);
    assert_eq!(sel.len(), 3);
}

#[test]
fn range_with_unknown_endpoint_is_not_found() {
    let order = display(&[("a.png", MediaKind::Png, false)]);
    let mut sel = SelectionTracker::new();
    assert!(matches!(
        sel.select_range(&key("a.png"), &key("zz.png"), MediaKind::Png, &order),
        Err(ModkitError::NotFound(_))
    ));
    assert!(sel.is_empty());
}

#[test]
fn range_of_only_mismatches_leaves_family_unset() {
    let order = display(&[("s.mp3", MediaKind::Mp3, false)]);
    let mut sel = SelectionTracker::new();
    let added = sel
        .select_range(&key("s.mp3"), &key("s.mp3"), MediaKind::Png, &order)
        .unwrap();
    assert_eq!(added, 0);
    assert_eq!(sel.allowed_family(), None);
}

#[test]
fn select_all_in_exclude_mode_takes_excluded_assets() {
    let order = display(&[
        ("a.png", MediaKind::Png, true),
        ("b.png", MediaKind::Png, false),
    ]);
    let mut sel = SelectionTracker::new();
    sel.set_mode(SelectionMode::Exclude);
    assert_eq!(sel.select_all_visible(&order, MediaKind::Png), 2);
    assert_eq!(sel.select_all_visible(&order, MediaKind::Png), 0);
    sel.clear();
    assert!(sel.is_empty());
    assert_eq!(sel.mode(), SelectionMode::Exclude);
}
