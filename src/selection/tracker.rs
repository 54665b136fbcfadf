use std::collections::HashSet;

use tracing::debug;

use crate::{
    foundation::{
        core::{AssetKey, MediaFamily, MediaKind},
        error::{ModkitError, ModkitResult},
    },
    registry::store::AssetRecord,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Which bulk action the current selection feeds.
pub enum SelectionMode {
    /// Selected assets will be transformed.
    #[default]
    Edit,
    /// Selected assets will have their exclusion flag flipped.
    Exclude,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Selection state of a single asset.
pub enum KeyState {
    Unselected,
    SelectedForEdit,
    SelectedForExclusion,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One asset as currently shown, in display order.
pub struct DisplayEntry {
    pub key: AssetKey,
    pub kind: MediaKind,
    pub excluded: bool,
}

impl From<&AssetRecord> for DisplayEntry {
    fn from(record: &AssetRecord) -> Self {
        Self {
            key: record.key().clone(),
            kind: record.current_kind(),
            excluded: record.is_excluded(),
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Keys chosen for the next bulk action.
///
/// All selected keys share one media family; the first key added fixes it and removing the last
/// key releases it.
pub struct SelectionTracker {
    mode: SelectionMode,
    order: Vec<AssetKey>,
    members: HashSet<AssetKey>,
    allowed_family: Option<MediaFamily>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch mode. Changing mode clears the selection.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "selection mode changed");
            self.mode = mode;
            self.clear();
        }
    }

    /// Family every selected key belongs to; `None` when empty.
    pub fn allowed_family(&self) -> Option<MediaFamily> {
        self.allowed_family
    }

    /// Selected keys in the order they were added.
    pub fn selected_keys(&self) -> &[AssetKey] {
        &self.order
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn state_of(&self, key: &AssetKey) -> KeyState {
        match (self.contains(key), self.mode) {
            (false, _) => KeyState::Unselected,
            (true, SelectionMode::Edit) => KeyState::SelectedForEdit,
            (true, SelectionMode::Exclude) => KeyState::SelectedForExclusion,
        }
    }

    /// Flip membership of `key`.
    ///
    /// In edit mode an excluded asset is a [`ModkitError::ConflictingState`]. A kind outside the
    /// allowed family is a [`ModkitError::KindMismatch`]; the selection is left unchanged.
    pub fn toggle(&mut self, key: &AssetKey, kind: MediaKind, excluded: bool) -> ModkitResult<()> {
        if self.contains(key) {
            self.remove(key);
            return Ok(());
        }
        self.check_admissible(key, kind, excluded)?;
        self.insert(key.clone(), kind);
        Ok(())
    }

    /// Select every entry between `from` and `to` (inclusive, either direction) in
    /// `display_order`.
    ///
    /// `kind` fixes the family when the selection is empty. Entries of another family or in a
    /// conflicting state are skipped.
    pub fn select_range(
        &mut self,
        from: &AssetKey,
        to: &AssetKey,
        kind: MediaKind,
        display_order: &[DisplayEntry],
    ) -> ModkitResult<usize> {
        let position = |k: &AssetKey| {
            display_order
                .iter()
                .position(|e| &e.key == k)
                .ok_or_else(|| ModkitError::NotFound(k.clone()))
        };
        let (a, b) = (position(from)?, position(to)?);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Ok(self.select_entries(&display_order[lo..=hi], kind))
    }

    /// Select every visible entry, see [`Self::select_range`].
    pub fn select_all_visible(&mut self, display_order: &[DisplayEntry], kind: MediaKind) -> usize {
        self.select_entries(display_order, kind)
    }

    /// Empty the selection and release the family constraint.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
        self.allowed_family = None;
    }

    fn select_entries(&mut self, entries: &[DisplayEntry], kind: MediaKind) -> usize {
        if self.is_empty() {
            self.allowed_family = Some(kind.family());
        }
        let mut added = 0usize;
        for entry in entries {
            if self.contains(&entry.key) {
                continue;
            }
            match self.check_admissible(&entry.key, entry.kind, entry.excluded) {
                Ok(()) => {
                    self.insert(entry.key.clone(), entry.kind);
                    added += 1;
                }
                Err(e) => debug!(asset = %entry.key, reason = %e, "range selection skipped asset"),
            }
        }
        if self.is_empty() {
            self.allowed_family = None;
        }
        added
    }

    fn check_admissible(
        &self,
        key: &AssetKey,
        kind: MediaKind,
        excluded: bool,
    ) -> ModkitResult<()> {
        if self.mode == SelectionMode::Edit && excluded {
            return Err(ModkitError::conflicting_state(format!(
                "{key} is excluded and cannot be selected for editing"
            )));
        }
        if let Some(family) = self.allowed_family
            && family != kind.family()
        {
            return Err(ModkitError::kind_mismatch(format!(
                "selection holds {family} assets, {key} is {}",
                kind.family()
            )));
        }
        Ok(())
    }

    fn insert(&mut self, key: AssetKey, kind: MediaKind) {
        self.allowed_family.get_or_insert(kind.family());
        self.members.insert(key.clone());
        self.order.push(key);
    }

    fn remove(&mut self, key: &AssetKey) {
        self.members.remove(key);
        self.order.retain(|k| k != key);
        if self.order.is_empty() {
            self.allowed_family = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/tracker.rs"]
mod tests;
