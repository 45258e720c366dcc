//! Core data model for poster designs.
//!
//! A design is a flat, ordered sequence of [`Element`]s on a fixed-size
//! canvas. Array order is paint order: later elements are drawn on top, so
//! there is no explicit z-index field. Every element shares a [`Frame`]
//! (position, size, rotation) and carries exactly one variant payload.

use crate::error::ModelError;
use crate::id::ElementId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color, 8 bits per channel. Serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xff)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let mut ch = [0xffu8; 4];
                for (slot, &digit) in ch.iter_mut().zip(bytes) {
                    *slot = hex_val(digit)? * 17;
                }
                Some(Self::rgba(ch[0], ch[1], ch[2], ch[3]))
            }
            6 | 8 => {
                let mut ch = [0xffu8; 4];
                for (slot, pair) in ch.iter_mut().zip(bytes.chunks(2)) {
                    *slot = hex_val(pair[0])? << 4 | hex_val(pair[1])?;
                }
                Some(Self::rgba(ch[0], ch[1], ch[2], ch[3]))
            }
            _ => None,
        }
    }

    /// Emit as lowercase hex; the alpha pair is omitted when opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// The same color with its alpha scaled by `factor` (0.0 ..= 1.0).
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl FromStr for Color {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s).ok_or_else(|| ModelError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────

/// Fixed drawing surface size in pixels. Serialized as `"WIDTHxHEIGHT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Portrait poster, the size every new design starts with.
    pub const POSTER: CanvasSize = CanvasSize {
        width: 800,
        height: 1200,
    };

    /// Largest accepted width or height when parsing.
    pub const MAX_EXTENT: u32 = 16384;

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::POSTER
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for CanvasSize {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidCanvasSize(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        let extent = 1..=Self::MAX_EXTENT;
        if !extent.contains(&width) || !extent.contains(&height) {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl Serialize for CanvasSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanvasSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Geometry shared by every element variant.
///
/// `x`/`y` is the unrotated top-left corner in canvas pixels. Rotation is in
/// degrees, clockwise, about the frame center.
///
/// Deserialized frames are [normalized](Frame::normalized).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredFrame")]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

#[derive(Deserialize)]
struct StoredFrame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    rotation: f64,
}

impl From<StoredFrame> for Frame {
    fn from(f: StoredFrame) -> Self {
        Frame {
            x: f.x,
            y: f.y,
            width: f.width,
            height: f.height,
            rotation: f.rotation,
        }
        .normalized()
    }
}

/// Smallest width/height an edit may leave an element with.
pub const MIN_EXTENT: f64 = 1.0;

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Clamp size to [`MIN_EXTENT`] and fold rotation into `[0, 360)`.
    pub fn normalized(mut self) -> Self {
        self.width = self.width.max(MIN_EXTENT);
        self.height = self.height.max(MIN_EXTENT);
        self.rotation = normalize_rotation(self.rotation);
        self
    }
}

/// Fold an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

// ─── Text ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Lighter,
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    Serif,
    Monospace,
    Cursive,
    /// Also absorbs families this version does not know.
    #[default]
    #[serde(other)]
    SansSerif,
}

/// Horizontal text alignment relative to the element center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

pub const DEFAULT_TEXT: &str = "Double-click to edit text";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextContent {
    pub text: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_family: FontFamily,
    pub color: Color,
    pub text_align: TextAlign,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_size: 24.0,
            font_weight: FontWeight::Normal,
            font_family: FontFamily::SansSerif,
            color: Color::WHITE,
            text_align: TextAlign::Center,
        }
    }
}

// ─── Image ───────────────────────────────────────────────────────────────

/// Reference used for freshly added image elements until the user picks one.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=400&width=400";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    /// URL, local path, or `data:` URI.
    pub src: String,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            src: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeContent {
    pub shape: ShapeKind,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl Default for ShapeContent {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Rectangle,
            fill: Color::rgb(0x8b, 0x5c, 0xf6),
            stroke: Color::WHITE,
            stroke_width: 2.0,
        }
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Variant tag of an element, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Text,
    Image,
    Shape,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Shape => "shape",
        })
    }
}

/// Variant payload. Serialized inline with a `"type"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextContent),
    Image(ImageContent),
    Shape(ShapeContent),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Shape(_) => ElementType::Shape,
        }
    }
}

/// A placed object on the canvas.
///
/// JSON form is flat: `{"id", "type", "x", "y", "width", "height",
/// "rotation", ...variant fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create an element with a freshly generated id.
    pub fn new(frame: Frame, kind: ElementKind) -> Self {
        Self::with_id(ElementId::generate(), frame, kind)
    }

    pub fn with_id(id: ElementId, frame: Frame, kind: ElementKind) -> Self {
        Self {
            id,
            frame: frame.normalized(),
            kind,
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Clone under a new id, shifted by `(dx, dy)`.
    pub fn duplicate(&self, dx: f64, dy: f64) -> Self {
        let mut frame = self.frame;
        frame.x += dx;
        frame.y += dy;
        Self::new(frame, self.kind.clone())
    }
}

/// Ordered element list; index order is paint order.
pub type ElementSequence = Vec<Element>;

/// Find an element by id.
pub fn find(elements: &[Element], id: ElementId) -> Option<&Element> {
    elements.iter().find(|el| el.id == id)
}

/// Index of an element by id.
pub fn position(elements: &[Element], id: ElementId) -> Option<usize> {
    elements.iter().position(|el| el.id == id)
}
