use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CHAT_PATH: &str = "api/chat/chat";
pub const ANALYZE_PATH: &str = "api/insurance/analyze";
pub const HEALTH_PATH: &str = "health";

/// Multipart field name carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub extracted_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analyze_response_keeps_unknown_fields() {
        let body: AnalyzeResponse = serde_json::from_value(json!({
            "extracted_data": {"insurer": "Acme"},
            "pages": 2
        }))
        .expect("deserialize");

        assert_eq!(body.extracted_data, Some(json!({"insurer": "Acme"})));
        assert_eq!(body.extra.get("pages"), Some(&json!(2)));
    }

    #[test]
    fn analyze_response_tolerates_missing_data() {
        let body: AnalyzeResponse = serde_json::from_value(json!({})).expect("deserialize");
        assert!(body.extracted_data.is_none());
    }
}
