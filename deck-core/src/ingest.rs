//! Image ingestion: turn dropped or picked files into image sources.
//!
//! Each file is checked for an image MIME type, decoded to learn its natural
//! size and re-encoded as a base64 data URI. Batches run on the blocking
//! thread pool; a bad file only fails its own entry.

use base64::Engine;
use thiserror::Error;
use tokio::task::JoinSet;

/// Image formats recognized by sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// GIF.
    Gif,
    /// WebP (alpha support).
    WebP,
    /// Windows bitmap.
    Bmp,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/gif" => Self::Gif,
            "image/webp" => Self::WebP,
            "image/bmp" => Self::Bmp,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        if data.starts_with(b"BM") {
            return Self::Bmp;
        }

        Self::Unknown
    }

    /// MIME type for a data URI, if known.
    #[must_use]
    pub const fn mime(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Gif => Some("image/gif"),
            Self::WebP => Some("image/webp"),
            Self::Bmp => Some("image/bmp"),
            Self::Unknown => None,
        }
    }
}

/// A file handed over by the UI.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// File name, used in logs and errors.
    pub name: String,
    /// MIME type reported by the browser or OS, if any.
    pub mime: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Create a file without a reported MIME type.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            bytes,
        }
    }

    /// Set the reported MIME type.
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// A decoded image ready to become an image element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Name of the source file.
    pub name: String,
    /// `data:` URI holding the original bytes.
    pub src: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Sniffed format.
    pub format: ImageFormat,
}

/// Why a file could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The file is empty.
    #[error("{name}: file is empty")]
    Empty {
        /// File name.
        name: String,
    },

    /// The file is not an image.
    #[error("{name}: not an image ({mime})")]
    NotAnImage {
        /// File name.
        name: String,
        /// Reported or sniffed MIME type.
        mime: String,
    },

    /// The image data could not be decoded.
    #[error("{name}: failed to decode image: {reason}")]
    Decode {
        /// File name.
        name: String,
        /// Decoder message.
        reason: String,
    },

    /// The decoding task died.
    #[error("Image decode task failed: {0}")]
    Task(String),
}

/// Decode one file.
///
/// The data URI uses the sniffed MIME type when the reported one names a
/// different format.
///
/// # Errors
///
/// Returns [`IngestError::Empty`], [`IngestError::NotAnImage`] when the
/// reported type is not `image/*` or nothing recognizable was sniffed, and
/// [`IngestError::Decode`] when the bytes do not decode.
pub fn decode(file: &ImageFile) -> Result<DecodedImage, IngestError> {
    if file.bytes.is_empty() {
        return Err(IngestError::Empty {
            name: file.name.clone(),
        });
    }

    let format = ImageFormat::from_magic_bytes(&file.bytes);
    let mime = match (&file.mime, format.mime()) {
        (Some(reported), _) if !reported.to_lowercase().starts_with("image/") => {
            return Err(IngestError::NotAnImage {
                name: file.name.clone(),
                mime: reported.clone(),
            });
        }
        (Some(reported), Some(sniffed)) if ImageFormat::from_mime(reported) != format => {
            tracing::debug!(
                name = %file.name,
                reported = %reported,
                sniffed,
                "Reported MIME type disagrees with file contents"
            );
            sniffed.to_string()
        }
        (Some(reported), _) => reported.to_lowercase(),
        (None, Some(sniffed)) => sniffed.to_string(),
        (None, None) => {
            return Err(IngestError::NotAnImage {
                name: file.name.clone(),
                mime: "unknown".to_string(),
            });
        }
    };

    let img = image::load_from_memory(&file.bytes).map_err(|e| IngestError::Decode {
        name: file.name.clone(),
        reason: e.to_string(),
    })?;

    Ok(DecodedImage {
        name: file.name.clone(),
        src: data_uri(&mime, &file.bytes),
        width: img.width(),
        height: img.height(),
        format,
    })
}

/// Decode every file on the blocking pool.
///
/// Results come back in completion order, one per file.
pub async fn ingest_all(files: Vec<ImageFile>) -> Vec<Result<DecodedImage, IngestError>> {
    let mut tasks = JoinSet::new();
    for file in files {
        tasks.spawn_blocking(move || decode(&file));
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap_or_else(|e| Err(IngestError::Task(e.to_string())));
        if let Err(e) = &result {
            tracing::debug!("Ingest failed: {e}");
        }
        results.push(result);
    }
    results
}

/// Build a base64 `data:` URI.
#[must_use]
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}
