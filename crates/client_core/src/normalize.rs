//! Endpoint bodies to [`Response`] values.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::{
    domain::{Response, Submission, EXTRACTED_DATA_ANSWER},
    protocol::AnalyzeResponse,
};
use tracing::debug;

use crate::error::ClientError;

pub fn normalize(submission: &Submission, body: Value) -> Result<Response, ClientError> {
    match submission {
        Submission::Text { .. } => chat_response(body),
        Submission::File(_) => document_response(body),
    }
}

/// The chat body is the response, taken field by field. A recognized key whose
/// value has an unexpected type is left in `extra` instead of failing the turn.
pub fn chat_response(body: Value) -> Result<Response, ClientError> {
    let mut fields = match body {
        Value::Object(fields) => fields,
        other => {
            return Err(ClientError::MalformedBody {
                endpoint: "chat endpoint",
                reason: format!("expected a JSON object, got {}", json_type(&other)),
            })
        }
    };

    let extracted_fields =
        take_field(&mut fields, "extractedFields").or_else(|| take_field(&mut fields, "extracted_fields"));

    Ok(Response {
        answer: take_field(&mut fields, "answer"),
        confidence: take_field(&mut fields, "confidence"),
        entities: take_field(&mut fields, "entities"),
        recommendations: take_field(&mut fields, "recommendations"),
        coverage: take_field(&mut fields, "coverage"),
        extracted_fields,
        extracted_text: take_field(&mut fields, "extracted_text"),
        extra: fields,
    })
}

/// `null` reads as absent and is dropped; a wrong-typed value stays in `fields`.
fn take_field<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.remove(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            debug!(field = key, error = %err, "keeping unexpected field type as extra");
            fields.insert(key.to_string(), value);
            None
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn document_response(body: Value) -> Result<Response, ClientError> {
    let malformed = |err: serde_json::Error| ClientError::MalformedBody {
        endpoint: "document-analysis endpoint",
        reason: err.to_string(),
    };

    let AnalyzeResponse {
        extracted_data,
        extra,
    } = serde_json::from_value(body).map_err(malformed)?;

    let extracted_text = extracted_data
        .as_ref()
        .map(serde_json::to_string_pretty)
        .transpose()
        .map_err(malformed)?;

    Ok(Response {
        answer: Some(EXTRACTED_DATA_ANSWER.to_string()),
        extracted_fields: extracted_data,
        extracted_text,
        extra,
        ..Response::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::domain::FileHandle;

    #[test]
    fn extracted_text_round_trips_to_extracted_fields() {
        let response = document_response(json!({
            "extracted_data": {"name": "Jane Doe", "plan": "Gold"}
        }))
        .expect("normalize");

        assert_eq!(response.answer.as_deref(), Some("Extracted Data:"));
        assert_eq!(
            response.extracted_fields,
            Some(json!({"name": "Jane Doe", "plan": "Gold"}))
        );
        let raw = response.extracted_text.expect("raw text");
        let reparsed: Value = serde_json::from_str(&raw).expect("raw text is json");
        assert_eq!(reparsed, json!({"name": "Jane Doe", "plan": "Gold"}));
        assert!(raw.contains('\n'), "raw text should be pretty printed");
    }

    #[test]
    fn missing_extracted_data_leaves_fields_absent() {
        let response = document_response(json!({"extracted_data": null})).expect("normalize");
        assert_eq!(response.answer.as_deref(), Some("Extracted Data:"));
        assert!(response.extracted_fields.is_none());
        assert!(response.extracted_text.is_none());
    }

    #[test]
    fn document_extras_pass_through() {
        let response = document_response(json!({
            "extracted_data": {"insurer": "Acme"},
            "ocr_engine": "tesseract"
        }))
        .expect("normalize");
        assert_eq!(response.extra.get("ocr_engine"), Some(&json!("tesseract")));
        assert!(response.extra.get("extracted_data").is_none());
    }

    #[test]
    fn wrong_typed_fields_are_kept_as_extras() {
        let response = chat_response(json!({
            "answer": "Your plan covers dental.",
            "coverage": {"dental": true},
            "confidence": "high",
            "recommendations": "take a nap"
        }))
        .expect("normalize");

        assert_eq!(response.answer.as_deref(), Some("Your plan covers dental."));
        assert!(response.coverage.is_none());
        assert!(response.confidence.is_none());
        assert!(response.recommendations.is_none());
        assert_eq!(response.extra.get("coverage"), Some(&json!({"dental": true})));
        assert_eq!(response.extra.get("confidence"), Some(&json!("high")));
    }

    #[test]
    fn chat_fields_map_one_to_one() {
        let response = chat_response(json!({
            "answer": "ibuprofen",
            "confidence": 0.87,
            "entities": {"drug": "ibuprofen"},
            "recommendations": ["rest"],
            "coverage": [{"plan": "Gold"}],
            "extracted_fields": {"insurer": "Acme"},
            "extracted_text": "raw",
            "model": "v2",
            "answer_id": null
        }))
        .expect("normalize");

        assert_eq!(response.confidence.map(|c| c.to_string()).as_deref(), Some("0.87"));
        assert_eq!(response.entities.map(|e| e.len()), Some(1));
        assert_eq!(response.recommendations, Some(vec![json!("rest")]));
        assert_eq!(response.coverage, Some(vec![json!({"plan": "Gold"})]));
        assert_eq!(response.extracted_fields, Some(json!({"insurer": "Acme"})));
        assert_eq!(response.extracted_text.as_deref(), Some("raw"));
        assert_eq!(response.extra.get("model"), Some(&json!("v2")));
        assert!(response.extra.get("answer_id").is_none());
    }

    #[test]
    fn non_object_chat_body_is_malformed() {
        let err = chat_response(json!(["not", "an", "object"])).expect_err("should fail");
        assert!(matches!(err, ClientError::MalformedBody { .. }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn normalize_dispatches_on_submission_kind() {
        let file = FileHandle::from_path("card.png").expect("file name");
        let body = json!({"extracted_data": {"group_no": "12345"}});

        let from_file = normalize(&Submission::File(file), body.clone()).expect("file");
        let from_text = normalize(&Submission::text("hi"), body).expect("text");

        assert_eq!(from_file.answer.as_deref(), Some("Extracted Data:"));
        assert!(from_text.answer.is_none());
        assert!(from_text.extra.contains_key("extracted_data"));
    }
}
