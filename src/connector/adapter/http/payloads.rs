use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Missing messages deserialize as empty and are rejected as invalid input.
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_accepts_camel_case_session_id() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message":"Hi","sessionId":"abc"}"#).unwrap();
        assert_eq!(request.message, "Hi");
        assert_eq!(request.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_chat_request_tolerates_null_session_id() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message":"Hi","sessionId":null}"#).unwrap();
        assert!(request.session_id.is_none());
    }

    #[test]
    fn test_chat_response_serializes_session_id_in_camel_case() {
        let response = ChatResponse {
            message: "Hello".to_string(),
            session_id: "abc".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Hello", "sessionId": "abc"}));
    }
}
