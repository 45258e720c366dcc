use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed data URI")]
    MalformedDataUri,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to fetch image {src}: {message}")]
    Fetch { src: String, message: String },

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
