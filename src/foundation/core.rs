use std::fmt;

use crate::foundation::error::{ModkitError, ModkitResult};

/// Identity of one mod asset: the collection (folder) it lives in plus its file name.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct AssetKey {
    /// Collection (folder) identifier.
    pub collection_id: String,
    /// File name inside the collection.
    pub file_name: String,
}

impl AssetKey {
    /// Build a key from its two parts.
    pub fn new(collection_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            file_name: file_name.into(),
        }
    }

    /// Parse `collection/file`. The split happens at the first `/`.
    pub fn parse(s: &str) -> ModkitResult<Self> {
        let s = s.trim().replace('\\', "/");
        match s.split_once('/') {
            Some((c, f)) if !c.is_empty() && !f.is_empty() => Ok(Self::new(c, f)),
            _ => Err(ModkitError::decode(format!(
                "asset key must look like 'collection/file', got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection_id, self.file_name)
    }
}

/// Concrete media encoding of an asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MediaKind {
    /// Lossy raster image.
    #[serde(rename = "jpg", alias = "jpeg")]
    Jpeg,
    /// Lossless raster image with alpha.
    #[serde(rename = "png")]
    Png,
    /// Lossy audio clip.
    #[serde(rename = "mp3")]
    Mp3,
}

/// Coarse media family. Selections and kind changes never cross families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MediaFamily {
    /// Raster images (JPEG, PNG).
    Raster,
    /// Audio clips.
    Audio,
}

impl MediaKind {
    /// Family this kind belongs to.
    pub fn family(self) -> MediaFamily {
        match self {
            Self::Jpeg | Self::Png => MediaFamily::Raster,
            Self::Mp3 => MediaFamily::Audio,
        }
    }

    /// `true` for JPEG and PNG.
    pub fn is_raster(self) -> bool {
        self.family() == MediaFamily::Raster
    }

    /// Canonical file extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Mp3 => "mp3",
        }
    }

    /// MIME type used in data URLs.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Mp3 => "audio/mpeg",
        }
    }

    /// Parse a kind from a name or extension (`jpg`, `jpeg`, `png`, `mp3`), case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    /// Infer the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = ModkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
            .ok_or_else(|| ModkitError::kind_mismatch(format!("unknown media kind '{s}'")))
    }
}

impl fmt::Display for MediaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => f.write_str("raster"),
            Self::Audio => f.write_str("audio"),
        }
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn parse_hex(s: &str) -> ModkitResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> ModkitResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| ModkitError::decode(format!("invalid hex byte \"{pair}\"")))
        }

        if !s.is_ascii() {
            return Err(ModkitError::decode("hex color must be ASCII"));
        }
        match s.len() {
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err(ModkitError::decode(
                "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
            )),
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl std::str::FromStr for Rgba8 {
    type Err = ModkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
