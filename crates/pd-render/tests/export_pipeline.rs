//! Integration tests: element sequence → PNG (pd-render).
//!
//! Covers the full export path through image resolution, painting,
//! encoding and decoding the PNG back for pixel checks.

use pd_core::*;
use pd_render::images::decode_image;
use pd_render::{BACKGROUND, InlineResolver, THUMBNAIL_WIDTH, export_png, export_thumbnail, to_data_uri};
use pretty_assertions::assert_eq;

const CANVAS: CanvasSize = CanvasSize::new(200, 300);

fn pixel(img: &image::RgbaImage, x: u32, y: u32) -> Color {
    let p = img.get_pixel(x, y);
    Color::rgba(p[0], p[1], p[2], p[3])
}

// ─── Background ─────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_sequence_is_background_only() {
    let out = export_png(&[], CANVAS, &InlineResolver).await.unwrap();
    assert_eq!((out.width, out.height), (200, 300));

    let img = decode_image(&out.png).unwrap();
    assert!(img.pixels().all(|p| p.0 == [0x1a, 0x1a, 0x1a, 0xff]));
    assert!(out.data_uri().starts_with("data:image/png;base64,"));
}

// ─── Text ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn text_ink_is_centered_on_frame() {
    let text = Element::new(
        Frame::new(20.0, 100.0, 160.0, 60.0),
        ElementKind::Text(TextContent {
            text: "HIH".into(),
            font_size: 32.0,
            ..TextContent::default()
        }),
    );
    let out = export_png(&[text], CANVAS, &InlineResolver).await.unwrap();
    let img = decode_image(&out.png).unwrap();

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (u32::MAX, 0, u32::MAX, 0);
    for (x, y, p) in img.enumerate_pixels() {
        if p.0 != [0x1a, 0x1a, 0x1a, 0xff] {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    assert!(min_x <= max_x, "no ink painted");

    // Frame center is (100, 130); bitmap glyphs leave a little side bearing.
    let cx = (min_x + max_x) as f64 / 2.0;
    let cy = (min_y + max_y) as f64 / 2.0;
    assert!((cx - 100.0).abs() <= 6.0, "ink center x {cx}");
    assert!((cy - 130.0).abs() <= 6.0, "ink center y {cy}");
}

// ─── Shapes and images ──────────────────────────────────────────────────

#[tokio::test]
async fn shapes_paint_in_sequence_order() {
    let under = Element::new(
        Frame::new(0.0, 0.0, 100.0, 100.0),
        ElementKind::Shape(ShapeContent {
            fill: Color::rgb(255, 0, 0),
            stroke_width: 0.0,
            ..ShapeContent::default()
        }),
    );
    let over = Element::new(
        Frame::new(50.0, 50.0, 100.0, 100.0),
        ElementKind::Shape(ShapeContent {
            fill: Color::rgb(0, 0, 255),
            stroke_width: 0.0,
            ..ShapeContent::default()
        }),
    );
    let out = export_png(&[under, over], CANVAS, &InlineResolver).await.unwrap();
    let img = decode_image(&out.png).unwrap();
    assert_eq!(pixel(&img, 25, 25), Color::rgb(255, 0, 0));
    assert_eq!(pixel(&img, 75, 75), Color::rgb(0, 0, 255));
    assert_eq!(pixel(&img, 175, 250), BACKGROUND);
}

#[tokio::test]
async fn inline_image_is_stretched_and_unresolved_image_is_placeholder() {
    let png = pd_render::encode_png(&image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 255]))).unwrap();
    let inline = Element::new(
        Frame::new(0.0, 0.0, 100.0, 50.0),
        ElementKind::Image(ImageContent { src: to_data_uri(&png) }),
    );
    let missing = Element::new(
        Frame::new(0.0, 150.0, 100.0, 100.0),
        ElementKind::Image(ImageContent::default()),
    );

    let out = export_png(&[inline, missing], CANVAS, &InlineResolver).await.unwrap();
    let img = decode_image(&out.png).unwrap();
    assert_eq!(pixel(&img, 90, 45), Color::rgb(0, 255, 0));
    assert_ne!(pixel(&img, 20, 210), BACKGROUND);
}

// ─── Thumbnails ─────────────────────────────────────────────────────────

#[tokio::test]
async fn thumbnail_is_capped_at_max_width() {
    let out = export_thumbnail(&[], CanvasSize::POSTER, &InlineResolver, THUMBNAIL_WIDTH)
        .await
        .unwrap();
    assert_eq!((out.width, out.height), (400, 600));
}
