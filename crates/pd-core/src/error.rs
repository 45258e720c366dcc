use thiserror::Error;

/// Errors raised while parsing model values from their string forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid color {0:?}: expected #RGB, #RGBA, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("invalid canvas size {0:?}: expected WIDTHxHEIGHT with both in 1..=16384")]
    InvalidCanvasSize(String),
}
