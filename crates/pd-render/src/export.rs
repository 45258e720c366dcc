//! PNG export and thumbnails.

use crate::error::RenderError;
use crate::images::{ImageResolver, ImageSet, resolve_images};
use crate::paint::paint_scene;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use pd_core::{CanvasSize, Element};
use std::io::Cursor;

/// Thumbnail width used when a design is saved.
pub const THUMBNAIL_WIDTH: u32 = 400;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// An encoded PNG along with its pixel dimensions.
#[derive(Debug, Clone)]
pub struct Exported {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Exported {
    fn encode(image: &RgbaImage) -> Result<Self, RenderError> {
        Ok(Self {
            png: encode_png(image)?,
            width: image.width(),
            height: image.height(),
        })
    }

    pub fn data_uri(&self) -> String {
        to_data_uri(&self.png)
    }
}

/// Rasterize `elements` at full canvas resolution.
pub fn render(elements: &[Element], canvas: CanvasSize, images: &ImageSet) -> RgbaImage {
    paint_scene(elements, canvas, images).into_image()
}

/// Resolve images, render, and encode at full canvas resolution.
pub async fn export_png(
    elements: &[Element],
    canvas: CanvasSize,
    resolver: &dyn ImageResolver,
) -> Result<Exported, RenderError> {
    let images = resolve_images(elements, resolver).await;
    let image = render(elements, canvas, &images);
    log::debug!(
        "exported {} elements at {canvas} ({} images resolved)",
        elements.len(),
        images.len()
    );
    Exported::encode(&image)
}

/// Like [`export_png`], scaled down to at most `max_width` pixels wide.
pub async fn export_thumbnail(
    elements: &[Element],
    canvas: CanvasSize,
    resolver: &dyn ImageResolver,
    max_width: u32,
) -> Result<Exported, RenderError> {
    let images = resolve_images(elements, resolver).await;
    let image = thumbnail(&render(elements, canvas, &images), max_width);
    Exported::encode(&image)
}

/// Downscale preserving aspect ratio. Images already narrow enough are
/// returned unchanged.
pub fn thumbnail(image: &RgbaImage, max_width: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if max_width == 0 || w <= max_width {
        return image.clone();
    }
    let scaled_h = ((h as u64 * max_width as u64) / w as u64).max(1) as u32;
    imageops::resize(image, max_width, scaled_h, FilterType::Triangle)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

pub fn to_data_uri(png: &[u8]) -> String {
    format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png))
}
