#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;

use super::format_timestamp;
use super::Action;
use super::Author;
use super::ChatRequest;
use super::ChatResponse;
use super::Intent;
use super::Message;
use super::Notification;
use super::QuickSuggestionRequest;
use super::TransportError;

pub const SEND_FAILED_TEXT: &str = "Failed to get response. Please try again.";
pub const QUICK_SUGGESTIONS_TEXT: &str = "Getting quick suggestions for you!";
pub const QUICK_SUGGESTIONS_FAILED_TEXT: &str =
    "Failed to get quick suggestions. Try asking directly!";
pub const COPIED_TEXT: &str = "Copied to clipboard!";

const DEFAULT_NOTIFICATION_MILLIS: u64 = 3000;

/// Whether the landing page or the full chat log is on screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Idle,
    Active,
}

/// In-memory state of a single chat session. It is only changed through
/// `apply`, which hands back the next state together with the side effects
/// the caller has to run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversationState {
    messages: Vec<Message>,
    conversation_id: Option<String>,
    pub input: String,
    loading: bool,
    view: View,
    show_suggestions: bool,
    next_id: u64,
    quick_notice_pending: bool,
}

impl Default for ConversationState {
    fn default() -> ConversationState {
        return ConversationState {
            messages: vec![],
            conversation_id: None,
            input: "".to_string(),
            loading: false,
            view: View::Idle,
            show_suggestions: true,
            next_id: 1,
            quick_notice_pending: false,
        };
    }
}

fn strip_quotes(suggestion: &str) -> &str {
    if suggestion.starts_with('"') && suggestion.ends_with('"') {
        if suggestion.len() < 2 {
            return "";
        }
        return &suggestion[1..suggestion.len() - 1];
    }

    return suggestion;
}

fn format_latency(response_time: Option<f64>) -> String {
    match response_time {
        Some(secs) if secs != 0.0 => return format!("{secs:.1}"),
        _ => return "~".to_string(),
    }
}

impl ConversationState {
    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn conversation_id(&self) -> Option<&str> {
        return self.conversation_id.as_deref();
    }

    pub fn loading(&self) -> bool {
        return self.loading;
    }

    pub fn view(&self) -> View {
        return self.view;
    }

    pub fn chat_active(&self) -> bool {
        return self.view == View::Active;
    }

    pub fn show_suggestions(&self) -> bool {
        return self.show_suggestions;
    }

    pub fn last_bot_message(&self) -> Option<&Message> {
        return self
            .messages
            .iter()
            .rev()
            .find(|msg| return msg.author == Author::Bot);
    }

    pub fn apply(mut self, intent: Intent, now: DateTime<Utc>) -> (ConversationState, Vec<Action>) {
        let mut actions = vec![];

        match intent {
            Intent::SendMessage { text, context } => {
                self.send_message(&text, context, now, &mut actions);
            }
            Intent::ChatSucceeded(res) => {
                self.chat_succeeded(res, now, &mut actions);
            }
            Intent::ChatFailed(err) => {
                self.chat_failed(&err, now, &mut actions);
            }
            Intent::QuickSuggestion {
                category,
                niche,
                platform,
            } => {
                self.loading = true;
                actions.push(Action::FetchQuickSuggestions(QuickSuggestionRequest {
                    category,
                    niche,
                    platform,
                }));
            }
            Intent::QuickSuggestionsFetched { category } => {
                let prompt = format!("Quick {} suggestions:", category.replacen('_', " ", 1));
                self.send_message(&prompt, None, now, &mut actions);
                // Announced once the synthesized prompt has been answered.
                self.quick_notice_pending = true;
            }
            Intent::QuickSuggestionsFailed(_) => {
                self.loading = false;
                actions.push(Action::Notify(Notification::error(
                    QUICK_SUGGESTIONS_FAILED_TEXT,
                    DEFAULT_NOTIFICATION_MILLIS,
                )));
            }
            Intent::ClickSuggestion(suggestion) => {
                self.send_message(strip_quotes(&suggestion), None, now, &mut actions);
            }
            Intent::CopyToClipboard(text) => {
                actions.push(Action::CopyToClipboard(text));
                actions.push(Action::Notify(Notification::info(COPIED_TEXT, 1500)));
            }
            Intent::Back => {
                self.view = View::Idle;
            }
            Intent::SetInput(text) => {
                self.input = text;
            }
        }

        return (self, actions);
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        return id;
    }

    fn send_message(
        &mut self,
        text: &str,
        context: Option<serde_json::Value>,
        now: DateTime<Utc>,
        actions: &mut Vec<Action>,
    ) {
        if text.trim().is_empty() {
            return;
        }

        self.view = View::Active;
        self.show_suggestions = false;

        let id = self.take_id();
        self.messages
            .push(Message::new(id, Author::User, text, &format_timestamp(now)));
        self.input = "".to_string();
        self.loading = true;

        actions.push(Action::SendChat(ChatRequest {
            query: text.to_string(),
            context,
            conversation_id: self.conversation_id.clone(),
        }));
    }

    fn chat_succeeded(&mut self, res: ChatResponse, now: DateTime<Utc>, actions: &mut Vec<Action>) {
        // First non-empty id wins for the rest of the session.
        if self.conversation_id.is_none() {
            self.conversation_id = res.conversation_id.filter(|id| return !id.is_empty());
        }

        let timestamp = res
            .timestamp
            .filter(|ts| return !ts.is_empty())
            .unwrap_or_else(|| return format_timestamp(now));

        let id = self.take_id();
        let msg = Message::new(id, Author::Bot, &res.response, &timestamp)
            .with_suggestions(res.suggestions.unwrap_or_default())
            .with_response_time(res.response_time);
        self.messages.push(msg);
        self.loading = false;

        actions.push(Action::Notify(Notification::success(
            &format!(
                "Response generated in {}s!",
                format_latency(res.response_time)
            ),
            2000,
        )));
        self.push_quick_notice(actions);
    }

    fn chat_failed(&mut self, err: &TransportError, now: DateTime<Utc>, actions: &mut Vec<Action>) {
        let id = self.take_id();
        self.messages.push(Message::new_error(
            id,
            &err.user_message(),
            &format_timestamp(now),
        ));
        self.loading = false;

        actions.push(Action::Notify(Notification::error(
            SEND_FAILED_TEXT,
            DEFAULT_NOTIFICATION_MILLIS,
        )));
        self.push_quick_notice(actions);
    }

    fn push_quick_notice(&mut self, actions: &mut Vec<Action>) {
        if !self.quick_notice_pending {
            return;
        }

        self.quick_notice_pending = false;
        actions.push(Action::Notify(Notification::info(
            QUICK_SUGGESTIONS_TEXT,
            DEFAULT_NOTIFICATION_MILLIS,
        )));
    }
}
