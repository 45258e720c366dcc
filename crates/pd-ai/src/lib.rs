pub mod config;
pub mod error;
pub mod gateway;
pub mod openrouter;
pub mod request;

pub use config::GatewayConfig;
pub use error::GenerateError;
pub use gateway::ImageGateway;
pub use openrouter::OpenRouterGateway;
pub use request::{AspectRatio, GenerateRequest, GeneratedImage};
