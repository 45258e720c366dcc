pub mod error;
pub mod export;
pub mod hit;
pub mod images;
pub mod paint;
pub mod raster;
pub mod text;

pub use error::RenderError;
pub use export::{Exported, THUMBNAIL_WIDTH, encode_png, export_png, export_thumbnail, render, thumbnail, to_data_uri};
pub use hit::hit_test;
pub use images::{DefaultResolver, ImageResolver, ImageSet, InlineResolver, resolve_images};
pub use paint::{BACKGROUND, paint_scene};
pub use raster::Surface;
