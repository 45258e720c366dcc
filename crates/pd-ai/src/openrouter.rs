//! OpenRouter image generation client.
//!
//! OpenRouter exposes an OpenAI-style `POST /images/generations` endpoint.
//! Besides bearer auth it expects `HTTP-Referer` and `X-Title` identifying
//! the calling app. The generated image comes back at `data[0].url`.

use crate::config::GatewayConfig;
use crate::error::GenerateError;
use crate::gateway::ImageGateway;
use crate::request::{GenerateRequest, GeneratedImage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const X_TITLE: &str = "Poster Draft";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ImageGenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

pub struct OpenRouterGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl OpenRouterGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn require_key(&self) -> Result<&str, GenerateError> {
        self.config.api_key.as_deref().ok_or(GenerateError::MissingCredential)
    }

    fn build_body<'a>(&'a self, request: &'a GenerateRequest) -> ImageGenerationBody<'a> {
        ImageGenerationBody {
            model: &self.config.model,
            prompt: &request.prompt,
            n: 1,
            size: request.aspect_ratio.size(),
        }
    }
}

/// Pull the first image URL out of a generations response body.
fn extract_image_url(body: &str) -> Result<String, GenerateError> {
    let response: ImageGenerationResponse = serde_json::from_str(body)?;
    response
        .data
        .into_iter()
        .next()
        .and_then(|datum| datum.url)
        .filter(|url| !url.is_empty())
        .ok_or(GenerateError::EmptyResult)
}

#[async_trait]
impl ImageGateway for OpenRouterGateway {
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedImage, GenerateError> {
        request.validate()?;
        let key = self.require_key()?;
        let url = format!("{}/images/generations", self.config.base_url);
        log::info!(
            "generating {} image with {}",
            request.aspect_ratio.size(),
            self.config.model
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(key)
            .header("HTTP-Referer", &self.config.site_url)
            .header("X-Title", X_TITLE)
            .json(&self.build_body(request))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            log::warn!("image generation failed with {status}: {body}");
            return Err(GenerateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let image_url = extract_image_url(&body)?;
        log::debug!("generated image at {image_url}");
        Ok(GeneratedImage { image_url })
    }
}
