use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::error::ApiError;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Client for the Hugging Face Inference API. Holds the configuration for
/// the lifetime of the process; one reqwest client is reused for all calls.
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    config: ServiceConfig,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f64,
    top_p: f64,
    return_full_text: bool,
}

#[derive(Debug, Serialize)]
struct GenerationPayload<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: String,
}

impl InferenceClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            config,
        }
    }

    /// Points the client at a different provider endpoint. Used by tests to
    /// target a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    /// Forwards a single text-generation call to the provider. Sampling
    /// parameters are passed through verbatim; the provider decides whether
    /// out-of-range values are legal. No retry: one failed attempt is a
    /// failed call.
    pub async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
        top_p: f64,
    ) -> Result<String, ApiError> {
        let url = format!("{}/models/{}", self.base_url, self.config.model_name);
        let payload = GenerationPayload {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: max_tokens,
                temperature,
                top_p,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(provider_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ProviderErrorBody>(&body) {
                Ok(parsed) => parsed.error,
                Err(_) => format!("HTTP {status}"),
            };
            return Err(ApiError::Provider(format!(
                "Error calling Hugging Face API: {message}"
            )));
        }

        // The text-generation task returns one candidate per input.
        let candidates: Vec<GeneratedText> =
            response.json().await.map_err(provider_error)?;
        match candidates.into_iter().next() {
            Some(candidate) => Ok(candidate.generated_text),
            None => Err(ApiError::Provider(
                "Error calling Hugging Face API: empty response".to_string(),
            )),
        }
    }
}

fn provider_error(err: reqwest::Error) -> ApiError {
    ApiError::Provider(format!("Error calling Hugging Face API: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> InferenceClient {
        let config = ServiceConfig {
            model_name: "gpt2".to_string(),
            api_key: "test-token".to_string(),
        };
        InferenceClient::new(config).with_base_url(base_url)
    }

    #[tokio::test]
    async fn generate_returns_provider_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gpt2")
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "inputs": "Hello",
                "parameters": {
                    "max_new_tokens": 100,
                    "temperature": 0.7,
                    "top_p": 0.95,
                    "return_full_text": false
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"generated_text": " world"}]"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let text = client.generate("Hello", 100, 0.7, 0.95).await.unwrap();

        assert_eq!(text, " world");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn provider_rejection_maps_to_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gpt2")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Rate limit reached"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.generate("Hello", 100, 0.7, 0.95).await.unwrap_err();

        match err {
            ApiError::Provider(msg) => {
                assert_eq!(msg, "Error calling Hugging Face API: Rate limit reached")
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gpt2")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.generate("Hello", 50, 0.5, 0.9).await.unwrap_err();

        match err {
            ApiError::Provider(msg) => {
                assert!(msg.starts_with("Error calling Hugging Face API: HTTP 503"))
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_candidate_list_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gpt2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.generate("Hello", 100, 0.7, 0.95).await.unwrap_err();
        assert!(matches!(err, ApiError::Provider(_)));
    }
}
