use std::{
    io::{Seek, Write},
    sync::Arc,
};

use anyhow::Context;
use tracing::info;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    foundation::{
        config::EditorConfig,
        core::{AssetKey, MediaKind},
        error::ModkitResult,
    },
    registry::store::AssetRegistry,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// On-disk layout of the exported mod: `collection/<sub_path>/file`.
pub struct ArchiveLayout {
    sub_path: Vec<String>,
}

impl ArchiveLayout {
    /// `sub_path` may be empty or contain several `/`-separated segments.
    pub fn new(sub_path: &str) -> Self {
        Self {
            sub_path: sub_path
                .replace('\\', "/")
                .split('/')
                .filter(|s| !s.is_empty() && *s != ".")
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn from_config(cfg: &EditorConfig) -> Self {
        Self::new(&cfg.archive_sub_path)
    }

    /// Archive path for `key`.
    pub fn path_for(&self, key: &AssetKey) -> String {
        let mut parts = Vec::with_capacity(self.sub_path.len() + 2);
        parts.push(key.collection_id.as_str());
        parts.extend(self.sub_path.iter().map(String::as_str));
        parts.push(key.file_name.as_str());
        parts.join("/")
    }
}

#[derive(Clone, Debug)]
/// One file of the exported archive.
pub struct ArchiveEntry {
    pub path: String,
    pub key: AssetKey,
    pub kind: MediaKind,
    pub bytes: Arc<Vec<u8>>,
}

/// List every non-excluded record with its archive path, in registry order.
pub fn plan_archive(registry: &AssetRegistry, layout: &ArchiveLayout) -> Vec<ArchiveEntry> {
    registry
        .list_all()
        .filter(|r| !r.is_excluded())
        .map(|r| ArchiveEntry {
            path: layout.path_for(r.key()),
            key: r.key().clone(),
            kind: r.current_kind(),
            bytes: r.current_bytes_arc(),
        })
        .collect()
}

/// Write `entries` as a deflate-compressed ZIP archive and return the writer.
pub fn write_zip<W: Write + Seek>(entries: &[ArchiveEntry], writer: W) -> ModkitResult<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in entries {
        zip.start_file(entry.path.as_str(), options)
            .with_context(|| format!("start zip entry '{}'", entry.path))?;
        zip.write_all(&entry.bytes)
            .with_context(|| format!("write zip entry '{}'", entry.path))?;
    }
    let writer = zip.finish().context("finish zip archive")?;
    info!(entries = entries.len(), "archive written");
    Ok(writer)
}

#[cfg(test)]
#[path = "../../tests/unit/export/archive.rs"]
mod tests;
