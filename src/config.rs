use crate::error::ApiError;

pub const DEFAULT_MODEL: &str = "gpt2";

/// Immutable service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub model_name: String,
    pub api_key: String,
}

impl ServiceConfig {
    /// Reads `API_CREDENTIAL` (required) and `MODEL_NAME` (default `gpt2`)
    /// from the process environment. A missing or empty credential is fatal.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_vars(
            std::env::var("API_CREDENTIAL").ok(),
            std::env::var("MODEL_NAME").ok(),
        )
    }

    fn from_vars(api_key: Option<String>, model_name: Option<String>) -> Result<Self, ApiError> {
        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(ApiError::Config(
                    "API_CREDENTIAL is not set in environment variables".to_string(),
                ))
            }
        };

        Ok(Self {
            model_name: model_name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
        })
    }
}
