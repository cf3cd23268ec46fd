#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::time::Instant;

use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::BubbleList;
use super::Scroll;
use crate::domain::models::starter_prompt;
use crate::domain::models::Action;
use crate::domain::models::ConversationState;
use crate::domain::models::Intent;
use crate::domain::models::Notification;
use crate::domain::models::SlashCommand;

const COMMAND_ERROR_MILLIS: u64 = 3000;

struct Toast {
    notification: Notification,
    expires_at: Instant,
}

/// Everything the chat view needs between frames. Conversation changes go
/// through `dispatch`, which keeps the rendered bubbles in sync and hands the
/// remaining side effects to the actions worker.
#[derive(Default)]
pub struct AppState {
    pub conversation: ConversationState,
    pub bubble_list: BubbleList,
    pub scroll: Scroll,
    pub show_help: bool,
    pub last_known_height: usize,
    pub last_known_width: usize,
    toast: Option<Toast>,
}

impl AppState {
    /// Applies an intent and returns the actions the worker has to run.
    /// Notifications are kept here and never reach the worker.
    pub fn apply(&mut self, intent: Intent, now: DateTime<Utc>) -> Vec<Action> {
        let message_count = self.conversation.messages().len();
        let state = std::mem::take(&mut self.conversation);
        let (next, actions) = state.apply(intent, now);
        self.conversation = next;

        let worker_actions = actions
            .into_iter()
            .filter_map(|action| {
                if let Action::Notify(notification) = action {
                    self.notify(notification);
                    return None;
                }
                return Some(action);
            })
            .collect();

        self.sync_dependants();
        if self.conversation.messages().len() != message_count {
            self.scroll.last();
        }

        return worker_actions;
    }

    pub fn dispatch(&mut self, intent: Intent, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        for action in self.apply(intent, Utc::now()) {
            tx.send(action)?;
        }

        return Ok(());
    }

    pub fn notify(&mut self, notification: Notification) {
        let expires_at = Instant::now() + notification.duration;
        self.toast = Some(Toast {
            notification,
            expires_at,
        });
    }

    pub fn notification(&self) -> Option<&Notification> {
        return self.toast.as_ref().map(|toast| return &toast.notification);
    }

    pub fn expire_notification(&mut self, now: Instant) {
        if let Some(toast) = &self.toast {
            if toast.expires_at <= now {
                self.toast = None;
            }
        }
    }

    /// Returns `(should_break, handled)`.
    pub fn handle_slash_commands(
        &mut self,
        input: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, false));
        }

        if command.is_help() {
            self.show_help = true;
        } else if command.is_back() {
            self.dispatch(Intent::Back, tx)?;
        } else if command.is_copy() {
            let message = match command.index_arg() {
                Some(idx) => self
                    .conversation
                    .messages()
                    .iter()
                    .find(|message| return message.id == idx as u64),
                None => self.conversation.last_bot_message(),
            };

            if let Some(text) = message.map(|message| return message.text.to_string()) {
                self.dispatch(Intent::CopyToClipboard(text), tx)?;
            } else {
                self.notify(Notification::error(
                    "There is no message to copy.",
                    COMMAND_ERROR_MILLIS,
                ));
            }
        } else if command.is_suggest() {
            let suggestion = command.index_arg().and_then(|idx| {
                return self
                    .conversation
                    .last_bot_message()
                    .and_then(|message| return message.visible_suggestions().get(idx - 1))
                    .cloned();
            });

            if let Some(suggestion) = suggestion {
                if !self.conversation.loading() {
                    self.dispatch(Intent::ClickSuggestion(suggestion), tx)?;
                }
            } else {
                self.notify(Notification::error(
                    "Pick a follow-up suggestion by its number, for example `/suggest 1`.",
                    COMMAND_ERROR_MILLIS,
                ));
            }
        } else if command.is_quick() {
            if let Some(category) = command.args.first() {
                if !self.conversation.loading() {
                    let intent = Intent::QuickSuggestion {
                        category: category.to_string(),
                        niche: command.args.get(1).cloned(),
                        platform: command.args.get(2).cloned(),
                    };
                    self.dispatch(intent, tx)?;
                }
            } else {
                self.notify(Notification::error(
                    "Quick suggestions need a category, for example `/quick content_ideas`.",
                    COMMAND_ERROR_MILLIS,
                ));
            }
        }

        return Ok((false, true));
    }

    /// Handles a submitted prompt. Returns true when the app should exit.
    pub fn submit(&mut self, input: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        self.show_help = false;

        let (should_break, handled) = self.handle_slash_commands(input, tx)?;
        if should_break {
            return Ok(true);
        }
        if handled {
            self.dispatch(Intent::SetInput(String::new()), tx)?;
            return Ok(false);
        }
        if self.conversation.loading() {
            return Ok(false);
        }

        let mut text = input.trim().to_string();
        if !self.conversation.chat_active() {
            if let Some(prompt) = text.parse::<usize>().ok().and_then(starter_prompt) {
                text = prompt.to_string();
            }
        }

        self.dispatch(Intent::send(&text), tx)?;
        return Ok(false);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width.into();
        self.last_known_height = rect.height.into();
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(self.conversation.messages(), self.last_known_width);

        self.scroll
            .set_state(self.bubble_list.len(), self.last_known_height);
    }
}
