use super::ChatRequest;
use super::Notification;
use super::QuickSuggestionRequest;

/// Side effects requested by a conversation transition. Transitions never
/// perform them directly.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SendChat(ChatRequest),
    FetchQuickSuggestions(QuickSuggestionRequest),
    CopyToClipboard(String),
    Notify(Notification),
}
