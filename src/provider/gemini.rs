use super::{ContentProvider, ProviderRequest};
use crate::error::ProviderError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    cfg: GeminiConfig,
}

impl GeminiClient {
    pub fn new(cfg: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()
            .context("build http client")?;
        Ok(Self { http, cfg })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.cfg.base_url.trim_end_matches('/'),
            self.cfg.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn build_body(request: &ProviderRequest) -> GenerateBody<'_> {
    let mut parts = vec![Part::Text {
        text: &request.instruction_text,
    }];
    if let Some(inline) = request.inline_binary.as_ref() {
        parts.push(Part::Inline {
            inline_data: InlineData {
                mime_type: &inline.mime_type,
                data: &inline.data,
            },
        });
    }
    GenerateBody {
        contents: vec![Content { parts }],
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(resp: GenerateResponse) -> Result<String, ProviderError> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ProviderError::EmptyOutput);
    }
    Ok(text)
}

#[async_trait]
impl ContentProvider for GeminiClient {
    async fn generate(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        let url = self.endpoint();
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.cfg.api_key)
            .json(&build_body(request))
            .send()
            .await?;

        let status = resp.status();
        tracing::info!(model = %self.cfg.model, status = status.as_u16(), "provider responded");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        tracing::debug!(bytes = bytes.len(), "provider body received");
        let parsed: GenerateResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode(e.to_string()))?;
        extract_text(parsed)
    }
}
