use std::path::Path;

use anyhow::Context;

use crate::{
    bulk::orchestrator::BulkThreading,
    codec::mp3::Mp3Settings,
    foundation::error::{ModkitError, ModkitResult},
};

/// Default JPEG quality when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Default path segment placed between collection and file name in exported archives.
pub const DEFAULT_ARCHIVE_SUB_PATH: &str = "textures";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Editing session configuration.
///
/// Every field has a default, so an empty JSON object is a valid config.
pub struct EditorConfig {
    /// Segment(s) between `collection` and `file` in archive paths. May be empty or nested
    /// (`a/b`).
    pub archive_sub_path: String,
    /// JPEG encode quality, 1..=100.
    pub jpeg_quality: u8,
    /// MP3 encoder settings.
    pub mp3: Mp3Settings,
    /// Worker settings for bulk transforms.
    pub threading: BulkThreading,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            archive_sub_path: DEFAULT_ARCHIVE_SUB_PATH.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            mp3: Mp3Settings::default(),
            threading: BulkThreading::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(s: &str) -> ModkitResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ModkitError::serde(format!("parse editor config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> ModkitResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read editor config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> ModkitResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ModkitError::config(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.archive_sub_path.contains("..") {
            return Err(ModkitError::config(
                "archive_sub_path must not contain '..'",
            ));
        }
        self.mp3.validate()?;
        if self.threading.threads == Some(0) {
            return Err(ModkitError::config("threading.threads must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
