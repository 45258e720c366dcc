use thiserror::Error;

/// Failures of an image generation request. Display strings are meant to be
/// shown to the user as-is.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("please describe the image you want")]
    EmptyPrompt,

    #[error("unsupported aspect ratio `{0}` (expected 1:1, 16:9, 9:16 or 4:3)")]
    UnsupportedAspectRatio(String),

    #[error("image service API key is not configured")]
    MissingCredential,

    #[error("image generation failed (status {status}), please try again later")]
    Upstream { status: u16, body: String },

    #[error("no image was generated, please try again")]
    EmptyResult,

    #[error("image service returned an unreadable response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("could not reach the image service: {0}")]
    Transport(#[from] reqwest::Error),
}
