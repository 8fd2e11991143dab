//! HTTP client for the hosted generative-text API.
//!
//! Wraps `reqwest` around the `generateContent` call shape: one POST per
//! weekday, with the critical sector's retained comments folded into a short
//! Spanish prompt. Use [`SummaryClient::new`] in production or
//! [`SummaryClient::with_base_url`] to point at a mock server in tests.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::SummarizerError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Tunables for the summary client. The binaries fill these from
/// `AppConfig`; defaults match the config defaults.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub model: String,
    pub timeout_secs: u64,
    /// Upper bound on comments folded into one prompt.
    pub max_comments: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 20,
            max_comments: 40,
        }
    }
}

/// Client for the `generateContent` endpoint.
pub struct SummaryClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    max_comments: usize,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl SummaryClient {
    /// Creates a client pointed at the hosted API.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, options: &SummaryOptions) -> Result<Self, SummarizerError> {
        Self::with_base_url(api_key, options, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SummarizerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SummarizerError::Api`] if `base_url` or
    /// the model name does not form a valid URL.
    pub fn with_base_url(
        api_key: &str,
        options: &SummaryOptions,
        base_url: &str,
    ) -> Result<Self, SummarizerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pulso/0.1 (survey-reporting)")
            .build()?;

        // Normalize: exactly one trailing slash so the join below appends to
        // the root path instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised)
            .map_err(|e| SummarizerError::Api(format!("invalid base URL '{base_url}': {e}")))?;
        let endpoint = base
            .join(&format!("v1beta/models/{}:generateContent", options.model))
            .map_err(|e| {
                SummarizerError::Api(format!("invalid model name '{}': {e}", options.model))
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            max_comments: options.max_comments,
        })
    }

    /// Asks the model for a short Spanish summary of one sector's comments.
    ///
    /// # Errors
    ///
    /// - [`SummarizerError::Api`] if the API answers with an error status.
    /// - [`SummarizerError::Http`] on network failure or timeout.
    /// - [`SummarizerError::Deserialize`] if the response body is not the
    ///   expected shape.
    /// - [`SummarizerError::EmptyResponse`] if the response carries no text.
    pub async fn summarize(
        &self,
        sector: &str,
        comments: &[String],
    ) -> Result<String, SummarizerError> {
        let prompt = build_prompt(sector, comments, self.max_comments);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SummarizerError::Api(api_error_message(status, &body)));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| SummarizerError::Deserialize {
                context: format!("generateContent(sector={sector})"),
                source: e,
            })?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(SummarizerError::EmptyResponse)
    }
}

fn build_prompt(sector: &str, comments: &[String], max_comments: usize) -> String {
    let mut prompt = format!(
        "Eres un analista de experiencia del cliente. Resume en un párrafo \
         breve (máximo 60 palabras) los siguientes comentarios de clientes \
         sobre el sector \"{sector}\". Menciona los problemas recurrentes y \
         el tono general. Responde únicamente con el resumen, en español.\n\nComentarios:\n"
    );
    for comment in comments.iter().take(max_comments) {
        prompt.push_str("- ");
        prompt.push_str(comment);
        prompt.push('\n');
    }
    prompt
}

/// Pulls the server's message out of an error body, falling back to the
/// bare HTTP status when the body is not the documented error envelope.
fn api_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}
