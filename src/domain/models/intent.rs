use super::ChatResponse;
use super::TransportError;

/// Everything that can move a conversation forward, whether typed by the user
/// or produced by a settled request.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    SendMessage {
        text: String,
        context: Option<serde_json::Value>,
    },
    ChatSucceeded(ChatResponse),
    ChatFailed(TransportError),
    QuickSuggestion {
        category: String,
        niche: Option<String>,
        platform: Option<String>,
    },
    QuickSuggestionsFetched {
        category: String,
    },
    QuickSuggestionsFailed(TransportError),
    ClickSuggestion(String),
    CopyToClipboard(String),
    Back,
    SetInput(String),
}

impl Intent {
    pub fn send(text: &str) -> Intent {
        return Intent::SendMessage {
            text: text.to_string(),
            context: None,
        };
    }
}
