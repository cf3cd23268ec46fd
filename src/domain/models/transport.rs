#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub const UNAUTHORIZED_TEXT: &str = "Please sign in to continue our conversation.";
pub const RATE_LIMITED_TEXT: &str =
    "I'm getting a lot of requests! Please wait a moment and try again.";
pub const GENERIC_ERROR_TEXT: &str = "I'm having trouble connecting right now. Please try again!";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub context: Option<serde_json::Value>,
    pub conversation_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub response_time: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSuggestionRequest {
    pub category: String,
    pub niche: Option<String>,
    pub platform: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("chatbot API responded with status {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("chatbot API is unreachable: {0}")]
    Network(String),
    #[error("chatbot API returned an unreadable body: {0}")]
    Decode(String),
    #[error("request was aborted before it settled")]
    Aborted,
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        if let TransportError::Status { status, .. } = self {
            return Some(*status);
        }

        return None;
    }

    /// Text shown to the user in the conversation log for a failed request.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Status { status: 401, .. } => return UNAUTHORIZED_TEXT.to_string(),
            TransportError::Status { status: 429, .. } => return RATE_LIMITED_TEXT.to_string(),
            TransportError::Status {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => return detail.to_string(),
            _ => return GENERIC_ERROR_TEXT.to_string(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> TransportError {
        if err.is_decode() {
            return TransportError::Decode(err.to_string());
        }

        return TransportError::Network(err.to_string());
    }
}

#[async_trait]
pub trait ChatTransport {
    /// Sends a single user query to the chatbot. The conversation id, when
    /// known, lets the remote side keep multi-turn context.
    async fn send(&self, req: ChatRequest) -> Result<ChatResponse, TransportError>;

    /// Fetches category scoped suggestions. The payload shape is owned by the
    /// remote side and passed through untouched.
    async fn quick_suggestions(
        &self,
        req: QuickSuggestionRequest,
    ) -> Result<serde_json::Value, TransportError>;
}

pub type TransportBox = Box<dyn ChatTransport + Send + Sync>;
