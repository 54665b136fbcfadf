use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::debug;

use crate::foundation::{
    core::{AssetKey, MediaKind},
    error::{ModkitError, ModkitResult},
};

#[derive(Clone, Debug)]
/// One asset's original snapshot plus its current edit state.
pub struct AssetRecord {
    key: AssetKey,
    media_kind: MediaKind,
    original_bytes: Arc<Vec<u8>>,
    current_bytes: Arc<Vec<u8>>,
    current_kind: MediaKind,
    excluded: bool,
}

impl AssetRecord {
    fn new(key: AssetKey, media_kind: MediaKind, original_bytes: Vec<u8>) -> Self {
        let original_bytes = Arc::new(original_bytes);
        Self {
            key,
            media_kind,
            current_bytes: Arc::clone(&original_bytes),
            original_bytes,
            current_kind: media_kind,
            excluded: false,
        }
    }

    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    /// Kind declared when the asset was loaded.
    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    /// Kind of [`Self::current_bytes`]. Differs from [`Self::media_kind`] only after a raster
    /// conversion.
    pub fn current_kind(&self) -> MediaKind {
        self.current_kind
    }

    pub fn original_bytes(&self) -> &[u8] {
        &self.original_bytes
    }

    pub fn current_bytes(&self) -> &[u8] {
        &self.current_bytes
    }

    /// Shared handle to the current bytes, cheap to clone into worker threads.
    pub fn current_bytes_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.current_bytes)
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// `true` when content or kind differs from the original, or the asset is excluded.
    pub fn is_edited(&self) -> bool {
        self.content_changed() || self.excluded
    }

    /// `true` when content or kind differs from the original, ignoring exclusion.
    pub fn content_changed(&self) -> bool {
        self.current_kind != self.media_kind
            || (!Arc::ptr_eq(&self.current_bytes, &self.original_bytes)
                && self.current_bytes != self.original_bytes)
    }
}

/// Receives the key of every record changed through [`AssetRegistry::update`] or
/// [`AssetRegistry::reset`].
pub trait RegistryObserver {
    fn asset_changed(&self, key: &AssetKey);
}

impl<F> RegistryObserver for F
where
    F: Fn(&AssetKey),
{
    fn asset_changed(&self, key: &AssetKey) {
        self(key)
    }
}

#[derive(Default)]
/// Single source of truth for every asset of one editing session.
///
/// Records are created once at load time and never removed; iteration is ordered by key.
pub struct AssetRegistry {
    records: BTreeMap<AssetKey, AssetRecord>,
    observers: Vec<Box<dyn RegistryObserver + Send + Sync>>,
}

impl fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("records", &self.records.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer notified after every successful update or reset.
    pub fn subscribe(&mut self, observer: impl RegistryObserver + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Create a record whose current state equals `original_bytes`.
    pub fn create(
        &mut self,
        key: AssetKey,
        media_kind: MediaKind,
        original_bytes: Vec<u8>,
    ) -> ModkitResult<&AssetRecord> {
        use std::collections::btree_map::Entry;

        match self.records.entry(key) {
            Entry::Occupied(e) => Err(ModkitError::DuplicateKey(e.key().clone())),
            Entry::Vacant(e) => {
                let record = AssetRecord::new(e.key().clone(), media_kind, original_bytes);
                Ok(e.insert(record))
            }
        }
    }

    pub fn get(&self, key: &AssetKey) -> ModkitResult<&AssetRecord> {
        self.records
            .get(key)
            .ok_or_else(|| ModkitError::NotFound(key.clone()))
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace current content and kind; optionally set the excluded flag.
    ///
    /// `new_kind` must stay in the record's media family.
    pub fn update(
        &mut self,
        key: &AssetKey,
        new_bytes: Vec<u8>,
        new_kind: MediaKind,
        excluded_override: Option<bool>,
    ) -> ModkitResult<()> {
        self.update_shared(key, Arc::new(new_bytes), new_kind, excluded_override)
    }

    /// [`Self::update`] without copying bytes already held in an `Arc`.
    pub fn update_shared(
        &mut self,
        key: &AssetKey,
        new_bytes: Arc<Vec<u8>>,
        new_kind: MediaKind,
        excluded_override: Option<bool>,
    ) -> ModkitResult<()> {
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| ModkitError::NotFound(key.clone()))?;
        if new_kind.family() != record.media_kind.family() {
            return Err(ModkitError::kind_mismatch(format!(
                "{key} is {} and cannot become {new_kind}",
                record.media_kind
            )));
        }

        record.current_bytes = if *new_bytes == *record.original_bytes {
            Arc::clone(&record.original_bytes)
        } else {
            new_bytes
        };
        record.current_kind = new_kind;
        if let Some(excluded) = excluded_override {
            record.excluded = excluded;
        }
        debug!(
            asset = %key,
            kind = %new_kind,
            bytes = record.current_bytes.len(),
            excluded = record.excluded,
            edited = record.is_edited(),
            "asset updated"
        );
        self.notify(key);
        Ok(())
    }

    /// Set only the excluded flag, keeping current content.
    pub fn set_excluded(&mut self, key: &AssetKey, excluded: bool) -> ModkitResult<()> {
        let record = self.get(key)?;
        let (bytes, kind) = (record.current_bytes_arc(), record.current_kind);
        self.update_shared(key, bytes, kind, Some(excluded))
    }

    /// Restore the original snapshot and clear the excluded flag.
    pub fn reset(&mut self, key: &AssetKey) -> ModkitResult<()> {
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| ModkitError::NotFound(key.clone()))?;
        record.current_bytes = Arc::clone(&record.original_bytes);
        record.current_kind = record.media_kind;
        record.excluded = false;
        debug!(asset = %key, "asset reset");
        self.notify(key);
        Ok(())
    }

    /// Reset every record.
    pub fn reset_all(&mut self) {
        let keys: Vec<AssetKey> = self.records.keys().cloned().collect();
        for key in &keys {
            // Keys come from the map itself.
            let _ = self.reset(key);
        }
    }

    /// Records in key order.
    pub fn list_all(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.values()
    }

    /// Records whose [`AssetRecord::is_edited`] is `true`, in key order.
    pub fn edited(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.values().filter(|r| r.is_edited())
    }

    fn notify(&self, key: &AssetKey) {
        for observer in &self.observers {
            observer.asset_changed(key);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/store.rs"]
mod tests;
