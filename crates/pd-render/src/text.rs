//! Single-line text layout over an 8×8 bitmap face.
//!
//! Each glyph cell is scaled so that its height equals the font size. Ink is
//! emitted as rectangles (one per horizontal run of set bits), which the
//! surface fills like any other path. Weight changes the run width rather
//! than the face: lighter runs are inset, bold runs are widened.

use font8x8::{BASIC_FONTS, GREEK_FONTS, HIRAGANA_FONTS, LATIN_FONTS, UnicodeFonts};
use kurbo::{BezPath, Point, Rect, Shape};
use pd_core::{FontWeight, TextAlign};

/// Glyph cell edge in font units.
const CELL: usize = 8;

/// Laid-out ink for one line of text.
#[derive(Debug, Clone)]
pub struct TextLayout {
    /// Line box: advance width × font size, positioned per alignment.
    pub bounds: Rect,
    /// Ink rectangles in canvas coordinates.
    pub ink: Vec<Rect>,
}

impl TextLayout {
    /// All ink as one path, ready for a non-zero fill.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for r in &self.ink {
            path.extend(r.path_elements(0.1));
        }
        path
    }
}

/// Lay out `text` on a single line.
///
/// `anchor` is where the line attaches: the left edge, center, or right edge
/// of the line box depending on `align`, always at the vertical middle.
pub fn layout_line(
    text: &str,
    font_size: f64,
    weight: FontWeight,
    align: TextAlign,
    anchor: Point,
) -> TextLayout {
    let unit = font_size.max(0.0) / CELL as f64;
    let advance = unit * CELL as f64;
    let glyphs: Vec<char> = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let line_width = advance * glyphs.len() as f64;

    let x0 = match align {
        TextAlign::Left => anchor.x,
        TextAlign::Center => anchor.x - line_width / 2.0,
        TextAlign::Right => anchor.x - line_width,
    };
    let y0 = anchor.y - advance / 2.0;
    let bounds = Rect::new(x0, y0, x0 + line_width, y0 + advance);

    let mut ink = Vec::new();
    if unit > 0.0 {
        for (i, &c) in glyphs.iter().enumerate() {
            let origin = Point::new(x0 + advance * i as f64, y0);
            match glyph(c) {
                Some(rows) => push_glyph_runs(&mut ink, &rows, origin, unit, weight),
                None => push_missing_glyph(&mut ink, origin, unit),
            }
        }
    }

    TextLayout { bounds, ink }
}

fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| HIRAGANA_FONTS.get(c))
}

/// Bit 0 of each row byte is the leftmost column.
fn push_glyph_runs(ink: &mut Vec<Rect>, rows: &[u8; 8], origin: Point, unit: f64, weight: FontWeight) {
    let (inset, spread) = match weight {
        FontWeight::Lighter => (0.15, 0.0),
        FontWeight::Normal => (0.0, 0.0),
        FontWeight::Bold => (0.0, 0.35),
    };

    for (row, &bits) in rows.iter().enumerate() {
        let y = origin.y + row as f64 * unit;
        let mut col = 0;
        while col < CELL {
            if bits & (1 << col) == 0 {
                col += 1;
                continue;
            }
            let run_start = col;
            while col < CELL && bits & (1 << col) != 0 {
                col += 1;
            }
            let left = origin.x + (run_start as f64 + inset) * unit;
            let right = origin.x + (col as f64 - inset + spread) * unit;
            ink.push(Rect::new(left, y, right, y + unit));
        }
    }
}

/// Hollow box for characters the bitmap face does not cover.
fn push_missing_glyph(ink: &mut Vec<Rect>, origin: Point, unit: f64) {
    let (l, t) = (origin.x + unit, origin.y + unit);
    let (r, b) = (origin.x + 7.0 * unit, origin.y + 7.0 * unit);
    ink.push(Rect::new(l, t, r, t + unit));
    ink.push(Rect::new(l, b - unit, r, b));
    ink.push(Rect::new(l, t + unit, l + unit, b - unit));
    ink.push(Rect::new(r - unit, t + unit, r, b - unit));
}
