//! Software pixel surface.
//!
//! Shapes are flattened to line segments with kurbo and scan-converted with
//! the non-zero winding rule. Each pixel row is sampled at four sub-scanlines,
//! which gives cheap vertical anti-aliasing while keeping fully covered
//! pixels bit-exact.

use image::{Rgba, RgbaImage};
use kurbo::{Affine, PathEl, Point, Rect, Shape};
use pd_core::Color;

/// Flattening tolerance in pixels.
pub const TOLERANCE: f64 = 0.1;

const SUBSAMPLES: usize = 4;

/// An RGBA8 drawing target.
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// A surface filled edge to edge with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, to_rgba(background)),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Color at `(x, y)`. Panics when out of bounds, like `RgbaImage`.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let p = self.pixels.get_pixel(x, y);
        Color::rgba(p[0], p[1], p[2], p[3])
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Fill `shape` (in local coordinates) after applying `transform`.
    pub fn fill<S: Shape>(&mut self, shape: &S, transform: Affine, color: Color) {
        if color.a == 0 {
            return;
        }
        let edges = flatten_edges(shape, transform);
        if !edges.is_empty() {
            self.fill_edges(&edges, color);
        }
    }

    /// Stroke the outline of `shape` with a centered pen of `width` pixels.
    pub fn stroke<S: Shape>(&mut self, shape: &S, width: f64, transform: Affine, color: Color) {
        if width <= 0.0 || color.a == 0 {
            return;
        }
        let style = kurbo::Stroke::new(width);
        let outline = kurbo::stroke(
            shape.path_elements(TOLERANCE),
            &style,
            &kurbo::StrokeOpts::default(),
            TOLERANCE,
        );
        self.fill(&outline, transform, color);
    }

    /// Draw `image` stretched over `dest`, then mapped through `transform`.
    /// Nearest-neighbour sampling; aspect ratio is not preserved.
    pub fn draw_image(&mut self, image: &RgbaImage, dest: Rect, transform: Affine) {
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let inverse = transform.inverse();
        let Some((x0, y0, x1, y1)) = self.pixel_span(transform.transform_rect_bbox(dest)) else {
            return;
        };

        for py in y0..y1 {
            for px in x0..x1 {
                let local = inverse * Point::new(px as f64 + 0.5, py as f64 + 0.5);
                if !dest.contains(local) {
                    continue;
                }
                let u = ((local.x - dest.x0) / dest.width() * iw as f64) as u32;
                let v = ((local.y - dest.y0) / dest.height() * ih as f64) as u32;
                let src = image.get_pixel(u.min(iw - 1), v.min(ih - 1));
                let color = Color::rgba(src[0], src[1], src[2], src[3]);
                blend(self.pixels.get_pixel_mut(px, py), color, 1.0);
            }
        }
    }

    /// Clip a device-space rectangle to whole pixel indices on this surface.
    fn pixel_span(&self, r: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = r.x0.floor().max(0.0);
        let y0 = r.y0.floor().max(0.0);
        let x1 = r.x1.ceil().min(self.width() as f64);
        let y1 = r.y1.ceil().min(self.height() as f64);
        (x0 < x1 && y0 < y1).then_some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn fill_edges(&mut self, edges: &[Edge], color: Color) {
        let width = self.width() as usize;
        let (min_y, max_y) = edges.iter().fold((f64::MAX, f64::MIN), |(lo, hi), e| {
            (lo.min(e.y0), hi.max(e.y1))
        });
        let Some((_, row_start, _, row_end)) =
            self.pixel_span(Rect::new(0.0, min_y, width as f64, max_y))
        else {
            return;
        };

        let step = 1.0 / SUBSAMPLES as f32;
        let mut coverage = vec![0f32; width];
        let mut crossings: Vec<(f64, i32)> = Vec::new();

        for row in row_start..row_end {
            coverage.fill(0.0);
            let mut touched = false;

            for s in 0..SUBSAMPLES {
                let sy = row as f64 + (s as f64 + 0.5) / SUBSAMPLES as f64;
                crossings.clear();
                crossings.extend(edges.iter().filter_map(|e| e.crossing(sy)));
                if crossings.len() < 2 {
                    continue;
                }
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                for pair in crossings.windows(2) {
                    winding += pair[0].1;
                    if winding == 0 {
                        continue;
                    }
                    // Pixel centers inside [xa, xb)
                    let start = (pair[0].0 - 0.5).ceil().max(0.0) as usize;
                    let end = ((pair[1].0 - 0.5).ceil().max(0.0) as usize).min(width);
                    for c in &mut coverage[start.min(end)..end] {
                        *c += step;
                        touched = true;
                    }
                }
            }

            if touched {
                for (x, &c) in coverage.iter().enumerate() {
                    if c > 0.0 {
                        blend(self.pixels.get_pixel_mut(x as u32, row), color, c);
                    }
                }
            }
        }
    }
}

/// A non-horizontal line segment, oriented top to bottom.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    /// +1 when the original segment pointed down, -1 when up.
    dir: i32,
}

impl Edge {
    fn new(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y || !a.is_finite() || !b.is_finite() {
            return None;
        }
        let (top, bottom, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        Some(Self {
            x0: top.x,
            y0: top.y,
            x1: bottom.x,
            y1: bottom.y,
            dir,
        })
    }

    fn crossing(&self, y: f64) -> Option<(f64, i32)> {
        if y < self.y0 || y >= self.y1 {
            return None;
        }
        let t = (y - self.y0) / (self.y1 - self.y0);
        Some((self.x0 + t * (self.x1 - self.x0), self.dir))
    }
}

/// Flatten a shape into device-space edges. Every subpath is implicitly
/// closed, as fills require.
fn flatten_edges<S: Shape>(shape: &S, transform: Affine) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;

    kurbo::flatten(shape.path_elements(TOLERANCE), TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            edges.extend(Edge::new(last, start));
            start = transform * p;
            last = start;
        }
        PathEl::LineTo(p) => {
            let p = transform * p;
            edges.extend(Edge::new(last, p));
            last = p;
        }
        PathEl::ClosePath => {
            edges.extend(Edge::new(last, start));
            last = start;
        }
        // flatten only emits the three variants above
        _ => {}
    });
    edges.extend(Edge::new(last, start));
    edges
}

/// Source-over composite of `src` scaled by `coverage` onto `dst`.
fn blend(dst: &mut Rgba<u8>, src: Color, coverage: f32) {
    let a = (src.a as f32 / 255.0) * coverage.min(1.0);
    if a <= 0.0 {
        return;
    }
    let inv = 1.0 - a;
    let da = dst[3] as f32 / 255.0;
    let out_a = a + da * inv;
    let channels = [src.r, src.g, src.b];
    for (i, s) in channels.into_iter().enumerate() {
        let mixed = (s as f32 * a + dst[i] as f32 * da * inv) / out_a;
        dst[i] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

fn to_rgba(c: Color) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, c.a])
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Circle;
    use pretty_assertions::assert_eq;

    const BG: Color = Color::rgb(0x1a, 0x1a, 0x1a);
    const RED: Color = Color::rgb(0xff, 0, 0);

    #[test]
    fn new_surface_is_uniform() {
        let s = Surface::new(4, 3, BG);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(s.pixel(x, y), BG);
            }
        }
    }

    #[test]
    fn rect_fill_is_pixel_exact() {
        let mut s = Surface::new(40, 40, BG);
        s.fill(&Rect::new(10.0, 10.0, 20.0, 20.0), Affine::IDENTITY, RED);
        assert_eq!(s.pixel(10, 10), RED);
        assert_eq!(s.pixel(19, 19), RED);
        assert_eq!(s.pixel(20, 20), BG);
        assert_eq!(s.pixel(9, 15), BG);
    }

    #[test]
    fn fill_clips_to_surface() {
        let mut s = Surface::new(10, 10, BG);
        s.fill(&Rect::new(-50.0, -50.0, 5.0, 5.0), Affine::IDENTITY, RED);
        assert_eq!(s.pixel(0, 0), RED);
        assert_eq!(s.pixel(4, 4), RED);
        assert_eq!(s.pixel(5, 5), BG);
    }

    #[test]
    fn circle_covers_center_not_corners() {
        let mut s = Surface::new(40, 40, BG);
        s.fill(&Circle::new((20.0, 20.0), 10.0), Affine::IDENTITY, RED);
        assert_eq!(s.pixel(20, 20), RED);
        assert_eq!(s.pixel(11, 11), BG);
    }

    #[test]
    fn rotation_moves_coverage() {
        // A thin horizontal bar rotated 90° about its center becomes vertical.
        let mut s = Surface::new(40, 40, BG);
        let bar = Rect::new(10.0, 18.0, 30.0, 22.0);
        let t = Affine::rotate_about(90f64.to_radians(), Point::new(20.0, 20.0));
        s.fill(&bar, t, RED);
        assert_eq!(s.pixel(20, 12), RED);
        assert_eq!(s.pixel(12, 20), BG);
    }

    #[test]
    fn stroke_leaves_interior_untouched() {
        let mut s = Surface::new(40, 40, BG);
        s.stroke(&Rect::new(10.0, 10.0, 30.0, 30.0), 2.0, Affine::IDENTITY, RED);
        assert_eq!(s.pixel(10, 20), RED);
        assert_eq!(s.pixel(20, 20), BG);
    }

    #[test]
    fn half_alpha_blends_over_background() {
        let mut s = Surface::new(4, 4, Color::BLACK);
        s.fill(&Rect::new(0.0, 0.0, 4.0, 4.0), Affine::IDENTITY, Color::rgba(255, 255, 255, 128));
        let p = s.pixel(1, 1);
        assert!((127..=129).contains(&p.r), "got {p:?}");
        assert_eq!(p.a, 255);
    }

    #[test]
    fn draw_image_stretches_to_dest() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let mut s = Surface::new(20, 10, BG);
        s.draw_image(&img, Rect::new(0.0, 0.0, 20.0, 10.0), Affine::IDENTITY);
        assert_eq!(s.pixel(2, 5), RED);
        assert_eq!(s.pixel(17, 5), Color::rgb(0, 0, 255));
    }
}
