//! The HTTP client for the hosted vision model.

use std::time::Duration;

use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use super::{ExtractedBillData, ExtractionError, parse_model_response};

/// The chat-completions endpoint the extractor talks to by default.
pub const DEFAULT_INVOKE_URL: &str = "https://integrate.api.nvidia.com/v1/chat/completions";

/// The vision model asked to read bills by default.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-large-3-675b-instruct-2512";

/// How long to wait for the model before giving up and falling back to
/// manual entry.
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

const PROMPT: &str = "You are a bill analysis assistant. Analyze the bill image and return ONLY a \
    valid JSON object with no extra text, no markdown, no code blocks, using this exact structure: \
    {\"vendor_name\": string, \"category\": one of [food, travel, utilities, shopping, healthcare, \
    entertainment, other], \"date\": \"YYYY-MM-DD or null\", \"total_amount\": number or null}. \
    Return ONLY the JSON object, nothing else. \
    Please analyze this bill image and extract the vendor name, category, date, and total amount.";

/// A client for an OpenAI-compatible chat-completions API with a vision
/// model behind it.
///
/// The request is a single synchronous round trip bounded by
/// [EXTRACTION_TIMEOUT]; there are no retries. A hung or failed call is
/// reported as an [ExtractionError] and the caller falls back to manual
/// entry.
#[derive(Debug, Clone)]
pub struct VisionExtractor {
    client: reqwest::Client,
    invoke_url: String,
    model: String,
    api_key: String,
}

impl VisionExtractor {
    /// Create an extractor for the given API key, talking to the default
    /// endpoint and model.
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoint(api_key, DEFAULT_INVOKE_URL, DEFAULT_MODEL)
    }

    /// Create an extractor against a specific endpoint and model.
    pub fn with_endpoint(api_key: &str, invoke_url: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(EXTRACTION_TIMEOUT)
            .build()
            .expect("could not build HTTP client");

        Self {
            client,
            invoke_url: invoke_url.to_owned(),
            model: model.to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    /// Ask the vision model to read a bill image.
    ///
    /// `media_type` is the image's MIME type, e.g. "image/jpeg". The image is
    /// sent inline as a base64 data URL.
    ///
    /// # Errors
    /// Returns an [ExtractionError] for transport failures, timeouts,
    /// non-success statuses, and answers that cannot be parsed as bill
    /// fields.
    pub async fn extract(
        &self,
        image: &[u8],
        media_type: &str,
    ) -> Result<ExtractedBillData, ExtractionError> {
        let encoded_image = base64::engine::general_purpose::STANDARD.encode(image);
        tracing::debug!(
            model = %self.model,
            image_size = encoded_image.len(),
            "sending bill image to vision model"
        );

        let payload = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:{media_type};base64,{encoded_image}")
                            }
                        },
                        {
                            "type": "text",
                            "text": PROMPT
                        }
                    ]
                }
            ],
            "max_tokens": 2048,
            "temperature": 0.1,
            "stream": false
        });

        let response = self
            .client
            .post(&self.invoke_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ExtractionError::Request(format!(
                        "timed out after {}s",
                        EXTRACTION_TIMEOUT.as_secs()
                    ))
                } else {
                    ExtractionError::Request(error.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("vision model API returned status {status}");
            return Err(ExtractionError::Api(status.as_u16()));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|error| ExtractionError::Request(error.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ExtractionError::EmptyResponse);
        }

        tracing::debug!(answer = %content, "vision model answered");

        parse_model_response(&content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}
