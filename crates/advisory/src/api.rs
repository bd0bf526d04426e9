//! HTTP client for the generative-language REST API (PRD-17).
//!
//! One client instance serves every advisory feature; the feature endpoints
//! differ only in the prompt they build, so the surface here is just
//! [`AdvisoryApi::generate_text`] and [`AdvisoryApi::generate_vision`].
//! Requests that come back non-2xx keep the response body for debugging.
//! There are no retries -- the advisory endpoints are interactive and the
//! user can simply ask again.

use serde_json::{json, Value};

/// Client for the hosted `generateContent` endpoint.
///
/// Cheap to clone; the inner `reqwest::Client` is already reference-counted.
#[derive(Debug, Clone)]
pub struct AdvisoryApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AdvisoryApi {
    /// Creates a client with default `reqwest` settings.
    ///
    /// `api_url` is the service base, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    /// Creates a client on a preconfigured `reqwest::Client` (timeouts,
    /// proxies). Used by the API server so upstream calls share its client.
    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    /// Model identifier this client targets, for logging.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a text-only prompt and returns the reply text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, AdvisoryApiError> {
        self.generate(json!([{ "text": prompt }])).await
    }

    /// Sends a prompt plus one inline image and returns the reply text.
    ///
    /// `image_base64` must already be validated by the caller; this method
    /// forwards it verbatim.
    pub async fn generate_vision(
        &self,
        prompt: &str,
        mime_type: &str,
        image_base64: &str,
    ) -> Result<String, AdvisoryApiError> {
        self.generate(json!([
            { "text": prompt },
            { "inline_data": { "mime_type": mime_type, "data": image_base64 } },
        ]))
        .await
    }

    // ---- private helpers ----

    /// Posts a `generateContent` request carrying `parts` and extracts the
    /// first candidate's text.
    async fn generate(&self, parts: Value) -> Result<String, AdvisoryApiError> {
        let body = json!({ "contents": [{ "parts": parts }] });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.api_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let reply: Value = Self::parse_response(response).await?;
        Self::extract_text(&reply)
    }

    /// Returns the response if it is 2xx, otherwise captures the body in the
    /// error so upstream failures are debuggable.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AdvisoryApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(AdvisoryApiError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Checks the status and deserializes the JSON body.
    async fn parse_response(response: reqwest::Response) -> Result<Value, AdvisoryApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Value>().await?)
    }

    /// Pulls the concatenated text parts out of the first candidate.
    ///
    /// The service returns a candidate list; feature prompts only ever ask
    /// for one completion, so anything past the first is ignored.
    fn extract_text(reply: &Value) -> Result<String, AdvisoryApiError> {
        let parts = reply
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AdvisoryApiError::MalformedResponse("reply carried no candidates".to_string())
            })?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            return Err(AdvisoryApiError::MalformedResponse(
                "candidate carried no text parts".to_string(),
            ));
        }
        Ok(text)
    }
}

/// Errors from the generative-language client.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryApiError {
    /// Network-level failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("advisory API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The service answered 2xx but the payload was not the expected shape.
    #[error("malformed advisory reply: {0}")]
    MalformedResponse(String),
}
