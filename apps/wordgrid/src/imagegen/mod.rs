/// Image backend client: the single point of entry for all Stable Diffusion
/// WebUI calls.
///
/// No other module talks to the WebUI directly; the generator goes through
/// the `ImageBackend` trait so tests can substitute a fake.
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

pub mod generator;
pub mod prompts;

const TXT2IMG_PATH: &str = "/sdapi/v1/txt2img";
const MODELS_PATH: &str = "/sdapi/v1/sd-models";
const REQUEST_TIMEOUT_SECS: u64 = 600;

pub const WIDTH: u32 = 1024;
pub const HEIGHT: u32 = 1024;
pub const STEPS: u32 = 7;
pub const CFG_SCALE: f32 = 2.0;
pub const SAMPLER_NAME: &str = "DPM++ 2M SDE";

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid base64 image payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Backend returned no images")]
    EmptyResponse,
}

/// Text-to-image request body, as accepted by `/sdapi/v1/txt2img`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Txt2ImgRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f32,
    pub sampler_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl Txt2ImgRequest {
    /// Builds a request with the fixed square generation parameters.
    pub fn new(prompt: String, seed: Option<u32>) -> Self {
        Self {
            prompt,
            negative_prompt: prompts::NEGATIVE_PROMPT.to_string(),
            width: WIDTH,
            height: HEIGHT,
            steps: STEPS,
            cfg_scale: CFG_SCALE,
            sampler_name: SAMPLER_NAME.to_string(),
            seed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Txt2ImgResponse {
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WebUiError {
    #[serde(alias = "detail", alias = "error")]
    message: String,
}

/// A text-to-image backend. Implement this to swap the generation service
/// without touching the generator.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Generates one image and returns its encoded bytes (PNG).
    async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Bytes, ImageGenError>;
}

/// Client for AUTOMATIC1111's Stable Diffusion WebUI (started with `--api`).
#[derive(Clone)]
pub struct SdClient {
    client: Client,
    base_url: String,
}

impl SdClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes the WebUI so an unreachable backend fails the run up front.
    pub async fn connect(&self) -> Result<(), AppError> {
        let url = format!("{}{MODELS_PATH}", self.base_url);
        let unavailable = |reason: String| AppError::BackendUnavailable {
            backend: format!("Stable Diffusion WebUI at {}", self.base_url),
            reason,
            hint: "Start AUTOMATIC1111's WebUI with the API enabled: python launch.py --api"
                .to_string(),
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("{url} returned {}", response.status())));
        }

        debug!("Connected to Stable Diffusion WebUI at {}", self.base_url);
        Ok(())
    }
}

#[async_trait]
impl ImageBackend for SdClient {
    async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Bytes, ImageGenError> {
        let url = format!("{}{TXT2IMG_PATH}", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<WebUiError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let image = decode_first_image(&body)?;
        debug!("txt2img succeeded: {} bytes, seed={:?}", image.len(), request.seed);
        Ok(image)
    }
}

/// Decodes the first base64 image of a txt2img response body.
///
/// The WebUI may prefix payloads with a `data:image/png;base64,` header.
fn decode_first_image(body: &str) -> Result<Bytes, ImageGenError> {
    let parsed: Txt2ImgResponse = serde_json::from_str(body)?;
    let first = parsed.images.first().ok_or(ImageGenError::EmptyResponse)?;
    let payload = match first.split_once(";base64,") {
        Some((_, data)) => data,
        None => first.as_str(),
    };
    let raw = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
    Ok(Bytes::from(raw))
}
