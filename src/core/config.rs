use std::env;
use std::time::Duration;

use crate::core::stream::DEFAULT_TIMEOUT;

pub const DEFAULT_WS_URL: &str = "wss://dev.bridge.wassel.ai/api/v2/ws";
pub const DEFAULT_APP_ID: &str = "932032423a2e11f08815320489d79279";
pub const DEFAULT_MODEL: &str = "GPT 4o";
pub const DEFAULT_PERSONA: &str = "general";
pub const DEFAULT_ASSISTANT_TYPE: &str = "Others";
pub const DEFAULT_TOP_K: u32 = 3;

/// Model settings carried in every request's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSettings {
    pub persona: String,
    pub model_name: String,
    pub assistant_type: String,
    pub streaming: bool,
    pub temperature: f32,
    pub top_k: u32,
    pub app_id: String,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            assistant_type: DEFAULT_ASSISTANT_TYPE.to_string(),
            streaming: true,
            temperature: 0.0,
            top_k: DEFAULT_TOP_K,
            app_id: DEFAULT_APP_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ws_url: String,
    token: Option<String>,
    pub request: RequestSettings,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DOC_ASSISTANT_TOKEN is not set")]
    MissingToken,
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl Config {
    /// Access token for the answer service. Required only for live requests.
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.token.as_deref().ok_or(ConfigError::MissingToken)
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match value {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: v }),
    }
}

/// Load configuration from the environment.
pub fn load() -> Result<Config, ConfigError> {
    load_from(|name| env::var(name).ok())
}

/// Load configuration through `lookup` (environment in production, a map in tests).
pub fn load_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let defaults = RequestSettings::default();

    let temperature = parse_var::<f32>("DOC_ASSISTANT_TEMPERATURE", get("DOC_ASSISTANT_TEMPERATURE"))?
        .unwrap_or(defaults.temperature);
    let top_k =
        parse_var::<u32>("DOC_ASSISTANT_TOP_K", get("DOC_ASSISTANT_TOP_K"))?.unwrap_or(defaults.top_k);
    let timeout = parse_var::<u64>("DOC_ASSISTANT_TIMEOUT_SECS", get("DOC_ASSISTANT_TIMEOUT_SECS"))?
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);
    if timeout.is_zero() {
        return Err(ConfigError::Invalid {
            var: "DOC_ASSISTANT_TIMEOUT_SECS",
            value: "0".to_string(),
        });
    }

    Ok(Config {
        ws_url: get("DOC_ASSISTANT_WS_URL").unwrap_or_else(|| DEFAULT_WS_URL.to_string()),
        token: get("DOC_ASSISTANT_TOKEN").map(|t| t.trim().to_string()),
        request: RequestSettings {
            persona: get("DOC_ASSISTANT_PERSONA").unwrap_or(defaults.persona),
            model_name: get("DOC_ASSISTANT_MODEL").unwrap_or(defaults.model_name),
            assistant_type: defaults.assistant_type,
            streaming: true,
            temperature,
            top_k,
            app_id: get("DOC_ASSISTANT_APP_ID").unwrap_or(defaults.app_id),
        },
        timeout,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load_with(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_from(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.request, RequestSettings::default());
        assert!(matches!(config.token(), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn overrides_from_environment() {
        let config = load_with(&[
            ("DOC_ASSISTANT_TOKEN", " abc "),
            ("DOC_ASSISTANT_MODEL", "GPT 4.1"),
            ("DOC_ASSISTANT_TEMPERATURE", "0.4"),
            ("DOC_ASSISTANT_TOP_K", "5"),
            ("DOC_ASSISTANT_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(config.token().unwrap(), "abc");
        assert_eq!(config.request.model_name, "GPT 4.1");
        assert_eq!(config.request.temperature, 0.4);
        assert_eq!(config.request.top_k, 5);
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load_with(&[("DOC_ASSISTANT_TOKEN", "  "), ("DOC_ASSISTANT_TOP_K", "")]).unwrap();
        assert!(!config.has_token());
        assert_eq!(config.request.top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = load_with(&[("DOC_ASSISTANT_TOP_K", "many")]).unwrap_err();
        assert!(err.to_string().contains("DOC_ASSISTANT_TOP_K"));
        assert!(load_with(&[("DOC_ASSISTANT_TIMEOUT_SECS", "0")]).is_err());
    }
}
