use std::io::{Seek, Write};

use tracing::debug;

use crate::{
    bulk::{
        ops::{BulkOperation, TransformSettings},
        orchestrator::{BatchReport, BulkEvent, BulkOrchestrator, CancelToken},
    },
    export::archive::{ArchiveEntry, ArchiveLayout, plan_archive, write_zip},
    foundation::{
        config::EditorConfig,
        core::{AssetKey, MediaKind},
        error::ModkitResult,
    },
    registry::{
        manifest::{LoadReport, ManifestEntry, load_manifest},
        session::{ImportReport, SessionDocument, export_session, import_session},
        store::{AssetRegistry, RegistryObserver},
    },
    selection::tracker::{DisplayEntry, SelectionMode, SelectionTracker},
};

/// One editing session: the registry, the selection and the bulk orchestrator, wired together.
///
/// Selection calls look asset kinds and exclusion flags up in the registry, so callers only pass
/// keys.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    registry: AssetRegistry,
    selection: SelectionTracker,
    orchestrator: BulkOrchestrator,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let orchestrator =
            BulkOrchestrator::new(TransformSettings::from(&config), config.threading.clone());
        Self {
            config,
            registry: AssetRegistry::new(),
            selection: SelectionTracker::new(),
            orchestrator,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn subscribe(&mut self, observer: impl RegistryObserver + Send + Sync + 'static) {
        self.registry.subscribe(observer);
    }

    pub fn load(
        &mut self,
        entries: impl IntoIterator<Item = ManifestEntry>,
    ) -> ModkitResult<LoadReport> {
        load_manifest(&mut self.registry, entries)
    }

    /// Every asset in registry order, as a display list for range selection.
    pub fn display_order(&self) -> Vec<DisplayEntry> {
        self.registry.list_all().map(DisplayEntry::from).collect()
    }

    /// Visible assets of one family, in registry order.
    pub fn display_order_for(&self, kind: MediaKind) -> Vec<DisplayEntry> {
        self.registry
            .list_all()
            .filter(|r| r.current_kind().family() == kind.family())
            .map(DisplayEntry::from)
            .collect()
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    pub fn toggle(&mut self, key: &AssetKey) -> ModkitResult<()> {
        let record = self.registry.get(key)?;
        self.selection
            .toggle(key, record.current_kind(), record.is_excluded())
    }

    pub fn select_range(&mut self, from: &AssetKey, to: &AssetKey) -> ModkitResult<usize> {
        let kind = self.registry.get(from)?.current_kind();
        let order = self.display_order();
        self.selection.select_range(from, to, kind, &order)
    }

    /// Select every asset of `kind`'s family.
    pub fn select_all(&mut self, kind: MediaKind) -> usize {
        let order = self.display_order_for(kind);
        self.selection.select_all_visible(&order, kind)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Run `op` over the current selection, discarding progress events.
    pub fn apply(&mut self, op: &BulkOperation) -> ModkitResult<BatchReport> {
        self.apply_with(op, &CancelToken::new(), &mut |event| {
            debug!(?event, "bulk progress");
        })
    }

    pub fn apply_with(
        &mut self,
        op: &BulkOperation,
        cancel: &CancelToken,
        on_event: &mut dyn FnMut(&BulkEvent),
    ) -> ModkitResult<BatchReport> {
        self.orchestrator
            .run(&mut self.registry, &mut self.selection, op, cancel, on_event)
    }

    pub fn reset(&mut self, key: &AssetKey) -> ModkitResult<()> {
        self.registry.reset(key)
    }

    pub fn reset_all(&mut self) {
        self.registry.reset_all();
    }

    pub fn export_session(&self) -> SessionDocument {
        export_session(&self.registry)
    }

    pub fn import_session(&mut self, doc: &SessionDocument) -> ImportReport {
        self.selection.clear();
        import_session(&mut self.registry, doc)
    }

    pub fn archive_layout(&self) -> ArchiveLayout {
        ArchiveLayout::from_config(&self.config)
    }

    pub fn plan_archive(&self) -> Vec<ArchiveEntry> {
        plan_archive(&self.registry, &self.archive_layout())
    }

    pub fn write_archive<W: Write + Seek>(&self, writer: W) -> ModkitResult<W> {
        write_zip(&self.plan_archive(), writer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
