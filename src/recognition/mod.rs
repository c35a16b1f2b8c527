//! Recognition Client
//!
//! Sends rasterized stroke regions to a remote vision endpoint
//! (Gemini `generateContent` wire format) and returns cleaned-up text.
//! One request per completed stroke, no retries.

pub mod cleanup;
pub mod worker;

pub use worker::{RecognitionJob, RecognitionOutcome, RecognitionWorker};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::RecognitionSettings;

/// Instruction prompt sent with every recognition request
const PROMPT: &str = "You are a handwriting recognition expert. The image contains handwritten \
text. Extract and return ONLY the text content, exactly as written. Do not include any \
explanations or additional text in your response. If you see no text or the image is blank, \
respond with an empty string. Return ONLY the text or character drawn in the image. For \
example, if you see the letter 'A', respond with just 'A'.";

/// Failure modes of a recognition request.
///
/// An empty response is not an error; it comes back as `Ok("")`.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Network failure reaching the endpoint
    #[error("recognition request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success status from the endpoint
    #[error("recognition service error ({status}): {message}")]
    Service { status: u16, message: String },
}

/// Client for the remote recognition endpoint
#[derive(Debug, Clone)]
pub struct RecognitionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    max_output_tokens: u32,
}

impl RecognitionClient {
    pub fn new(settings: &RecognitionSettings, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
            max_output_tokens: settings.max_output_tokens,
        })
    }

    /// Recognize the content of a PNG-encoded stroke region.
    ///
    /// Issues one request and awaits the full response. Returns the cleaned
    /// text, or an empty string when the service reports no discernible
    /// content.
    pub async fn recognize(&self, png: &[u8]) -> Result<String, RecognitionError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest::for_image(png, self.max_output_tokens);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_service_message(&body)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(RecognitionError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let raw = payload.first_text().unwrap_or_default();
        let cleaned = cleanup::clean_response(&raw);
        debug!(raw = %raw, cleaned = %cleaned, "recognition response");

        Ok(cleaned)
    }
}

/// Request body for the generateContent endpoint
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: u32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

impl GenerateContentRequest {
    /// Build the deterministic single-image request: the fixed prompt, the
    /// inline PNG, temperature 0, and all safety filters disabled.
    fn for_image(png: &[u8], max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: PROMPT.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png",
                            data: BASE64.encode(png),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                top_k: 1,
                top_p: 1,
                max_output_tokens,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        }
    }
}

/// Success response from the generateContent endpoint
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate's first part, if any
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .clone()
    }
}

/// Pull the message out of a `{"error": {"message": ...}}` failure body
fn extract_service_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<ErrorDetail>,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()?
        .error?
        .message
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest::for_image(b"not-a-real-png", 256);
        let value = serde_json::to_value(&request).unwrap();

        // Prompt first, inline PNG second
        assert_eq!(value["contents"][0]["parts"][0]["text"], PROMPT);
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["data"],
            BASE64.encode(b"not-a-real-png")
        );

        // Deterministic generation parameters
        assert_eq!(value["generationConfig"]["temperature"], 0.0);
        assert_eq!(value["generationConfig"]["topK"], 1);
        assert_eq!(value["generationConfig"]["topP"], 1);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 256);

        // All four safety categories disabled
        let settings = value["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        for setting in settings {
            assert_eq!(setting["threshold"], "BLOCK_NONE");
        }
    }

    #[test]
    fn test_first_text_from_response() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "The letter A"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.first_text(), Some("The letter A".to_string()));
    }

    #[test]
    fn test_missing_candidates_is_empty_result() {
        let payload: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(payload.first_text(), None);

        let payload: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": null}]}"#).unwrap();
        assert_eq!(payload.first_text(), None);
    }

    #[test]
    fn test_extract_service_message() {
        assert_eq!(
            extract_service_message(r#"{"error": {"message": "API key not valid"}}"#),
            Some("API key not valid".to_string())
        );
        assert_eq!(extract_service_message(r#"{"error": {}}"#), None);
        assert_eq!(extract_service_message("not json"), None);
        assert_eq!(extract_service_message(r#"{"error": {"message": "  "}}"#), None);
    }
}
