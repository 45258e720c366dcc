use crate::error::GenerateError;
use crate::request::{GenerateRequest, GeneratedImage};
use async_trait::async_trait;

/// Turns a text prompt into an image reference.
///
/// Implementations validate the request before any network traffic, so an
/// empty prompt never costs a round trip.
#[async_trait]
pub trait ImageGateway: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedImage, GenerateError>;
}
