use tracing::{info, warn};

use crate::{
    codec::text::{bytes_to_text, text_to_bytes},
    foundation::{
        core::{AssetKey, MediaKind},
        error::{ModkitError, ModkitResult},
    },
    registry::store::AssetRegistry,
};

/// Current session document format version.
pub const SESSION_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Snapshot of every edited or excluded asset, used to save and restore a session.
pub struct SessionDocument {
    pub version: u32,
    pub entries: Vec<SessionEntry>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Edit state of one asset.
pub struct SessionEntry {
    pub collection_id: String,
    pub file_name: String,
    /// Base64 of the current bytes.
    pub current_bytes: String,
    pub current_kind: MediaKind,
    #[serde(default)]
    pub is_excluded: bool,
}

impl SessionEntry {
    pub fn key(&self) -> AssetKey {
        AssetKey::new(self.collection_id.clone(), self.file_name.clone())
    }
}

impl SessionDocument {
    pub fn to_json(&self) -> ModkitResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ModkitError::serde(format!("serialize session: {e}")))
    }

    pub fn from_json(s: &str) -> ModkitResult<Self> {
        let doc: Self = serde_json::from_str(s)
            .map_err(|e| ModkitError::serde(format!("parse session: {e}")))?;
        if doc.version != SESSION_VERSION {
            return Err(ModkitError::serde(format!(
                "unsupported session version {} (expected {SESSION_VERSION})",
                doc.version
            )));
        }
        Ok(doc)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Outcome of [`import_session`].
pub struct ImportReport {
    /// Entries written to the registry.
    pub applied: usize,
    /// Entries ignored because their key is unknown or their content is unusable.
    pub skipped: Vec<AssetKey>,
}

/// Snapshot every record whose [`is_edited`](crate::AssetRecord::is_edited) is `true`.
pub fn export_session(registry: &AssetRegistry) -> SessionDocument {
    let entries = registry
        .edited()
        .map(|r| SessionEntry {
            collection_id: r.key().collection_id.clone(),
            file_name: r.key().file_name.clone(),
            current_bytes: bytes_to_text(r.current_bytes()),
            current_kind: r.current_kind(),
            is_excluded: r.is_excluded(),
        })
        .collect();
    SessionDocument {
        version: SESSION_VERSION,
        entries,
    }
}

/// Reset every record, then re-apply the document's entries.
///
/// Entries for unknown keys, with undecodable bytes, or whose kind leaves the record's family are
/// skipped with a warning.
pub fn import_session(registry: &mut AssetRegistry, doc: &SessionDocument) -> ImportReport {
    registry.reset_all();

    let mut report = ImportReport::default();
    for entry in &doc.entries {
        let key = entry.key();
        if !registry.contains(&key) {
            warn!(asset = %key, "session entry references unknown asset");
            report.skipped.push(key);
            continue;
        }
        let applied = text_to_bytes(&entry.current_bytes).and_then(|bytes| {
            registry.update(&key, bytes, entry.current_kind, Some(entry.is_excluded))
        });
        match applied {
            Ok(()) => report.applied += 1,
            Err(e) => {
                warn!(asset = %key, error = %e, "skipping session entry");
                report.skipped.push(key);
            }
        }
    }
    info!(
        applied = report.applied,
        skipped = report.skipped.len(),
        "session imported"
    );
    report
}

#[cfg(test)]
#[path = "../../tests/unit/registry/session.rs"]
mod tests;
