//! Image reference resolution.
//!
//! Painting is synchronous, so every image an element sequence references is
//! fetched and decoded up front into an [`ImageSet`]. References that fail to
//! resolve are simply absent from the set; the painter draws a placeholder for
//! them instead of failing the whole render.

use crate::error::RenderError;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use pd_core::{Element, ElementKind};
use std::collections::HashMap;
use std::path::PathBuf;

/// Turns an image reference into encoded image bytes.
#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, RenderError>;
}

/// Resolves `data:` URIs only. Anything else is reported as unresolvable.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineResolver;

#[async_trait]
impl ImageResolver for InlineResolver {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, RenderError> {
        if is_data_uri(src) {
            decode_data_uri(src)
        } else {
            Err(RenderError::Fetch {
                src: src.to_string(),
                message: "only data URIs are resolved offline".to_string(),
            })
        }
    }
}

/// Resolves `data:` URIs in-process, `http(s)` over the network, and any
/// other reference as a local file path (relative to `base_dir` if set).
#[derive(Debug, Clone, Default)]
pub struct DefaultResolver {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl DefaultResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative file references against `dir`.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImageResolver for DefaultResolver {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, RenderError> {
        if is_data_uri(src) {
            return decode_data_uri(src);
        }

        if src.starts_with("http://") || src.starts_with("https://") {
            let fetch_err = |e: reqwest::Error| RenderError::Fetch {
                src: src.to_string(),
                message: e.to_string(),
            };
            let response = self
                .client
                .get(src)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(fetch_err)?;
            let bytes = response.bytes().await.map_err(fetch_err)?;
            return Ok(bytes.to_vec());
        }

        let path = match &self.base_dir {
            Some(dir) => dir.join(src.trim_start_matches('/')),
            None => PathBuf::from(src),
        };
        Ok(tokio::fs::read(path).await?)
    }
}

/// Decoded images keyed by their reference string.
#[derive(Debug, Default)]
pub struct ImageSet {
    images: HashMap<String, RgbaImage>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, src: impl Into<String>, image: RgbaImage) {
        self.images.insert(src.into(), image);
    }

    pub fn get(&self, src: &str) -> Option<&RgbaImage> {
        self.images.get(src)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Fetch and decode every distinct image reference in `elements`.
/// Failures are logged and left out of the set.
pub async fn resolve_images(elements: &[Element], resolver: &dyn ImageResolver) -> ImageSet {
    let mut set = ImageSet::new();
    let mut seen = std::collections::HashSet::new();

    for el in elements {
        let ElementKind::Image(content) = &el.kind else {
            continue;
        };
        if !seen.insert(content.src.as_str()) {
            continue;
        }
        let decoded = match resolver.fetch(&content.src).await {
            Ok(bytes) => decode_image(&bytes),
            Err(e) => Err(e),
        };
        match decoded {
            Ok(image) => set.insert(content.src.clone(), image),
            Err(e) => log::warn!(
                "image {} for {} unavailable, using placeholder: {e}",
                abbreviate(&content.src),
                el.id
            ),
        }
    }

    set
}

/// Decode any supported encoded image into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

pub fn is_data_uri(src: &str) -> bool {
    src.starts_with("data:")
}

/// Extract the payload of a `data:[<mediatype>][;base64],<data>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, RenderError> {
    let rest = uri.strip_prefix("data:").ok_or(RenderError::MalformedDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(RenderError::MalformedDataUri)?;
    if meta.ends_with(";base64") {
        Ok(STANDARD.decode(payload.trim())?)
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Data URIs can be megabytes long; keep log lines readable.
fn abbreviate(src: &str) -> &str {
    match src.char_indices().nth(64) {
        Some((i, _)) => &src[..i],
        None => src,
    }
}
