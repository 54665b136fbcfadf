use crate::foundation::core::AssetKey;

/// Convenience result type used across modkit.
pub type ModkitResult<T> = Result<T, ModkitError>;

/// Top-level error taxonomy used by registry, selection, codec and transform APIs.
#[derive(thiserror::Error, Debug)]
pub enum ModkitError {
    /// The registry has no record for the key.
    #[error("asset not found: {0}")]
    NotFound(AssetKey),

    /// A record with the key already exists.
    #[error("duplicate asset key: {0}")]
    DuplicateKey(AssetKey),

    /// Malformed base64, raster or audio input.
    #[error("decode error: {0}")]
    Decode(String),

    /// An encoder rejected its input or failed to produce output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Zero or otherwise unusable image dimensions.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Empty or inverted time range, or a parameter outside its domain.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// PCM with a channel count other than mono or stereo.
    #[error("unsupported channel layout: {0} channels")]
    UnsupportedChannelLayout(usize),

    /// Media kinds or families that must agree do not.
    #[error("kind mismatch: {0}")]
    KindMismatch(String),

    /// An asset was moved into a selection state that conflicts with its current state.
    #[error("conflicting state: {0}")]
    ConflictingState(String),

    /// A bulk operation is already running.
    #[error("a bulk operation is already in progress")]
    OperationInProgress,

    /// Invalid editor configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing session/manifest documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModkitError {
    /// Build a [`ModkitError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ModkitError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ModkitError::InvalidDimensions`] value.
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    /// Build a [`ModkitError::InvalidRange`] value.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Build a [`ModkitError::KindMismatch`] value.
    pub fn kind_mismatch(msg: impl Into<String>) -> Self {
        Self::KindMismatch(msg.into())
    }

    /// Build a [`ModkitError::ConflictingState`] value.
    pub fn conflicting_state(msg: impl Into<String>) -> Self {
        Self::ConflictingState(msg.into())
    }

    /// Build a [`ModkitError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ModkitError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for registry/selection misuse that aborts an action before any mutation.
    ///
    /// Everything else is a per-asset failure that a batch records and skips.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::DuplicateKey(_)
                | Self::KindMismatch(_)
                | Self::ConflictingState(_)
                | Self::OperationInProgress
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
