use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::{
    codec::text::text_to_bytes,
    foundation::{
        core::{AssetKey, MediaKind},
        error::{ModkitError, ModkitResult},
    },
    registry::store::AssetRegistry,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One asset as listed by the mod manifest: identity, kind and base64 content.
pub struct ManifestEntry {
    pub key: AssetKey,
    pub kind: MediaKind,
    pub base64: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Outcome of [`load_manifest`].
pub struct LoadReport {
    /// Records created.
    pub loaded: usize,
    /// Entries whose base64 payload could not be decoded.
    pub skipped: Vec<AssetKey>,
}

/// Create one registry record per entry.
///
/// Entries with undecodable base64 are skipped with a warning. A key that already exists is a
/// [`ModkitError::DuplicateKey`] and stops the load.
pub fn load_manifest(
    registry: &mut AssetRegistry,
    entries: impl IntoIterator<Item = ManifestEntry>,
) -> ModkitResult<LoadReport> {
    let mut report = LoadReport::default();
    for entry in entries {
        let bytes = match text_to_bytes(&entry.base64) {
            Ok(b) => b,
            Err(e) => {
                warn!(asset = %entry.key, error = %e, "skipping manifest entry");
                report.skipped.push(entry.key);
                continue;
            }
        };
        registry.create(entry.key, entry.kind, bytes)?;
        report.loaded += 1;
    }
    info!(
        loaded = report.loaded,
        skipped = report.skipped.len(),
        "manifest loaded"
    );
    Ok(report)
}

/// `{collection: [file, ...]}`
pub type ListDocument = BTreeMap<String, Vec<String>>;

/// `{collection: {file: base64}}`
pub type StructureDocument = BTreeMap<String, BTreeMap<String, String>>;

/// Join a list document with its structure document into load entries.
///
/// Each file's kind is inferred from its extension, falling back to `default_kind`; a kind from a
/// different family than `default_kind` is ignored. Listed files missing from the structure are
/// skipped with a warning.
pub fn join_manifest(
    list: &ListDocument,
    structure: &StructureDocument,
    default_kind: MediaKind,
) -> Vec<ManifestEntry> {
    let mut out = Vec::new();
    for (collection, files) in list {
        for file in files {
            let Some(base64) = structure.get(collection).and_then(|c| c.get(file)) else {
                warn!(
                    collection = %collection,
                    file = %file,
                    "listed asset has no content in structure document"
                );
                continue;
            };
            let kind = MediaKind::from_file_name(file)
                .filter(|k| k.family() == default_kind.family())
                .unwrap_or(default_kind);
            out.push(ManifestEntry {
                key: AssetKey::new(collection.clone(), file.clone()),
                kind,
                base64: base64.clone(),
            });
        }
    }
    out
}

/// Parse list and structure JSON text and join them, see [`join_manifest`].
pub fn parse_manifest(
    list_json: &str,
    structure_json: &str,
    default_kind: MediaKind,
) -> ModkitResult<Vec<ManifestEntry>> {
    let list: ListDocument = serde_json::from_str(list_json)
        .map_err(|e| ModkitError::serde(format!("parse list document: {e}")))?;
    let structure: StructureDocument = serde_json::from_str(structure_json)
        .map_err(|e| ModkitError::serde(format!("parse structure document: {e}")))?;
    Ok(join_manifest(&list, &structure, default_kind))
}

#[cfg(test)]
#[path = "../../tests/unit/registry/manifest.rs"]
mod tests;
