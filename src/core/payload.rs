//! Request payload sent over the transport.

use serde::Serialize;
use serde_json::Value;

use crate::core::config::RequestSettings;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMetadata {
    pub persona: String,
    pub model_name: String,
    pub streaming: bool,
    pub assistant_type: String,
    pub temperature: f32,
    /// Retrieval depth (`topK`).
    pub k: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPayload {
    pub metadata: RequestMetadata,
    pub message_text: String,
    /// Earlier conversation turns; always empty for document requests.
    pub messages: Vec<Value>,
    pub app_id: String,
}

impl RequestPayload {
    pub fn new(settings: &RequestSettings, message_text: impl Into<String>) -> Self {
        Self {
            metadata: RequestMetadata {
                persona: settings.persona.clone(),
                model_name: settings.model_name.clone(),
                streaming: settings.streaming,
                assistant_type: settings.assistant_type.clone(),
                temperature: settings.temperature,
                k: settings.top_k,
            },
            message_text: message_text.into(),
            messages: Vec::new(),
            app_id: settings.app_id.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_service() {
        let payload = RequestPayload::new(&RequestSettings::default(), "hello");
        let value: Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(value["metadata"]["persona"], "general");
        assert_eq!(value["metadata"]["model_name"], "GPT 4o");
        assert_eq!(value["metadata"]["streaming"], true);
        assert_eq!(value["metadata"]["assistant_type"], "Others");
        assert_eq!(value["metadata"]["temperature"], 0.0);
        assert_eq!(value["metadata"]["k"], 3);
        assert_eq!(value["message_text"], "hello");
        assert_eq!(value["messages"], serde_json::json!([]));
        assert_eq!(value["app_id"], "932032423a2e11f08815320489d79279");
    }
}
