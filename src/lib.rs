//! modkit is the editing core for game-mod asset bundles.
//!
//! It loads images (JPEG, PNG) and audio clips (MP3) from base64 manifests into an in-memory
//! [`AssetRegistry`], lets callers select assets with a [`SelectionTracker`], runs
//! [`BulkOperation`]s over the selection and exports the result as a ZIP archive laid out like the
//! original mod.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `ManifestEntry` tuples → [`AssetRegistry`] records (original snapshot kept)
//! 2. **Select**: keys → [`SelectionTracker`] (one media family at a time)
//! 3. **Apply**: [`BulkOrchestrator`] decodes, transforms and re-encodes each selected asset, then
//!    writes it back through [`AssetRegistry::update`]
//! 4. **Export**: [`plan_archive`] + [`write_zip`], or [`export_session`] for a resumable session
//!
//! [`EditorSession`] wires the four steps together for one editing session.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single writer**: only the orchestrator's calling thread mutates the registry, one batch at
//!   a time.
//! - **Partial failure**: one undecodable asset never aborts the rest of a batch.
#![forbid(unsafe_code)]

mod audio;
mod bulk;
mod codec;
mod editor;
mod export;
mod foundation;
mod imaging;
mod registry;
mod selection;

pub use audio::trim::{encode as encode_audio, sec_to_sample, trim};
pub use bulk::ops::{BulkOperation, TransformSettings};
pub use bulk::orchestrator::{
    AssetFailure, BatchReport, BulkEvent, BulkOrchestrator, BulkThreading, CancelToken,
};
pub use codec::audio::{PcmBuffer, decode_audio};
pub use codec::mp3::{
    FrameBlockEncoder, LameEncoder, MP3_FRAME_SAMPLES, Mp3Settings, encode_audio_to_target,
    encode_in_blocks, sample_to_i16,
};
pub use codec::raster::{
    MAX_DIMENSION, MAX_PIXELS, RasterImage, checked_buffer_len, decode_raster, encode_raster,
};
pub use codec::text::{bytes_to_text, text_to_bytes, to_data_url};
pub use editor::session::EditorSession;
pub use export::archive::{ArchiveEntry, ArchiveLayout, plan_archive, write_zip};
pub use foundation::config::{DEFAULT_ARCHIVE_SUB_PATH, DEFAULT_JPEG_QUALITY, EditorConfig};
pub use foundation::core::{AssetKey, MediaFamily, MediaKind, Rgba8};
pub use foundation::error::{ModkitError, ModkitResult};
pub use imaging::adjust::{ColorAdjust, apply_color_adjust, luminance};
pub use imaging::convert::{convert_format, resize_image, target_dimensions};
pub use imaging::fill::{blend_color, generate_solid_fill};
pub use registry::manifest::{
    ListDocument, LoadReport, ManifestEntry, StructureDocument, join_manifest, load_manifest,
    parse_manifest,
};
pub use registry::session::{
    ImportReport, SESSION_VERSION, SessionDocument, SessionEntry, export_session, import_session,
};
pub use registry::store::{AssetRecord, AssetRegistry, RegistryObserver};
pub use selection::tracker::{DisplayEntry, KeyState, SelectionMode, SelectionTracker};
