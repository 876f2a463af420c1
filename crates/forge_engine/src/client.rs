use std::time::Duration;

use forge_core::{GeneratedCode, ScrapingRequest};
use forge_logging::{forge_debug, forge_error, forge_info, redact};
use reqwest::header::CONTENT_TYPE;

use crate::decode::decode_generated_code;
use crate::gemini::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GoogleSearch, Tool,
};
use crate::prompt::{build_generation_prompt, build_regeneration_prompt};
use crate::schema::generation_config;
use crate::{GenerationError, GenerationFailure, GenerationKind};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Lets the model search the web for the target site's real markup.
    pub google_search: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            google_search: true,
        }
    }
}

#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &ScrapingRequest) -> Result<GeneratedCode, GenerationError>;

    async fn regenerate(
        &self,
        request: &ScrapingRequest,
        previous_code: &str,
        feedback: &str,
    ) -> Result<GeneratedCode, GenerationError>;
}

/// [`GenerationClient`] backed by the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    settings: GenerationSettings,
}

impl GeminiClient {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, GenerationError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| GenerationError::new(GenerationFailure::Network, err.to_string()))
    }

    fn endpoint(&self) -> Result<reqwest::Url, GenerationError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        );
        reqwest::Url::parse(&raw)
            .map_err(|err| GenerationError::new(GenerationFailure::InvalidEndpoint, err.to_string()))
    }

    fn request_body(&self, prompt: String) -> GenerateContentRequest {
        let tools = if self.settings.google_search {
            vec![Tool {
                google_search: GoogleSearch::default(),
            }]
        } else {
            Vec::new()
        };
        GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            generation_config: generation_config(),
            tools,
        }
    }

    async fn call(
        &self,
        operation: GenerationKind,
        prompt: String,
    ) -> Result<GeneratedCode, GenerationError> {
        let result = self.send(prompt).await.map_err(|err| err.or_fallback(operation));
        match &result {
            Ok(code) => forge_info!(
                "{} succeeded: {} bytes of code, {} libraries",
                operation,
                code.code.len(),
                code.libraries.len()
            ),
            Err(err) => forge_error!("{} failed ({}): {}", operation, err.kind, err.message),
        }
        result
    }

    async fn send(&self, prompt: String) -> Result<GeneratedCode, GenerationError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::new(
                    GenerationFailure::MissingApiKey,
                    "no API key configured; set GEMINI_API_KEY",
                )
            })?;
        let endpoint = self.endpoint()?;
        let body = serde_json::to_string(&self.request_body(prompt))
            .map_err(|err| GenerationError::new(GenerationFailure::InvalidEndpoint, err.to_string()))?;
        forge_debug!(
            "POST {} model={} key={} body_len={}",
            endpoint,
            self.settings.model,
            redact(api_key),
            body.len()
        );

        let client = self.build_client()?;
        let response = client
            .post(endpoint)
            .header("x-goog-api-key", api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(GenerationError::new(
                GenerationFailure::HttpStatus(status.as_u16()),
                provider_error_message(status, &text),
            ));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|err| {
            GenerationError::new(
                GenerationFailure::MalformedResponse,
                format!("unexpected response from the model API: {err}"),
            )
        })?;

        let Some(answer) = parsed.text() else {
            let mut message = "the model returned no content".to_string();
            if let Some(reason) = parsed.block_reason().or(parsed.finish_reason()) {
                message.push_str(&format!(" ({reason})"));
            }
            return Err(GenerationError::new(GenerationFailure::EmptyResponse, message));
        };

        decode_generated_code(&answer)
            .map_err(|err| GenerationError::new(GenerationFailure::MalformedResponse, err.to_string()))
    }
}

#[async_trait::async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: &ScrapingRequest) -> Result<GeneratedCode, GenerationError> {
        self.call(GenerationKind::Generate, build_generation_prompt(request))
            .await
    }

    async fn regenerate(
        &self,
        request: &ScrapingRequest,
        previous_code: &str,
        feedback: &str,
    ) -> Result<GeneratedCode, GenerationError> {
        self.call(
            GenerationKind::Regenerate,
            build_regeneration_prompt(request, previous_code, feedback),
        )
        .await
    }
}

fn provider_error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !envelope.error.message.trim().is_empty() {
            return envelope.error.message;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {}", truncate(body, 300))
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        return GenerationError::new(GenerationFailure::Timeout, err.to_string());
    }
    GenerationError::new(GenerationFailure::Network, err.to_string())
}
