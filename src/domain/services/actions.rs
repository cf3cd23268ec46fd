#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::clipboard::ClipboardService;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Intent;
use crate::domain::models::TransportBox;
use crate::domain::models::TransportError;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /back (/b) - Return to the landing page. The conversation is kept.
- /copy (/c) [MESSAGE_NUMBER?] - Copies a message to your clipboard. Defaults to the latest reply.
- /suggest (/s) [SUGGESTION_NUMBER] - Sends one of the follow-up suggestions listed under the latest reply.
- /quick (/k) [CATEGORY] [NICHE?] [PLATFORM?] - Asks for quick suggestions, for example `/quick content_ideas fitness instagram`.
- /quit /exit (/q) - Exit SocialSync.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- Esc - Back to the landing page
- CTRL+C - Exit.

On the landing page, type the number of a starter prompt and press enter to send it.
        "#;

    return text.trim().to_string();
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs a single side effect to completion. Requests run in their own task
    /// so a panicking transport still settles into a failure intent.
    pub async fn execute(transport: Arc<TransportBox>, action: Action) -> Option<Intent> {
        match action {
            Action::SendChat(req) => {
                let worker = tokio::spawn(async move {
                    return transport.send(req).await;
                });

                match worker.await {
                    Ok(Ok(res)) => return Some(Intent::ChatSucceeded(res)),
                    Ok(Err(err)) => {
                        tracing::error!(error = ?err, status = err.status(), "Chat request failed");
                        return Some(Intent::ChatFailed(err));
                    }
                    Err(err) => {
                        tracing::error!(error = ?err, "Chat request did not settle");
                        return Some(Intent::ChatFailed(TransportError::Aborted));
                    }
                }
            }
            Action::FetchQuickSuggestions(req) => {
                let category = req.category.to_string();
                let worker = tokio::spawn(async move {
                    return transport.quick_suggestions(req).await;
                });

                match worker.await {
                    Ok(Ok(_)) => return Some(Intent::QuickSuggestionsFetched { category }),
                    Ok(Err(err)) => {
                        tracing::warn!(error = ?err, category, "Quick suggestions failed");
                        return Some(Intent::QuickSuggestionsFailed(err));
                    }
                    Err(err) => {
                        tracing::warn!(error = ?err, category, "Quick suggestions did not settle");
                        return Some(Intent::QuickSuggestionsFailed(TransportError::Aborted));
                    }
                }
            }
            Action::CopyToClipboard(text) => {
                if let Err(err) = ClipboardService::set(text) {
                    tracing::warn!(error = ?err, "Failed to copy to clipboard");
                }
                return None;
            }
            Action::Notify(_) => {
                return None;
            }
        }
    }

    pub async fn start(
        transport: TransportBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let transport = Arc::new(transport);

        while let Some(action) = rx.recv().await {
            let worker_tx = tx.clone();
            let worker_transport = transport.clone();

            tokio::spawn(async move {
                if let Some(intent) = ActionsService::execute(worker_transport, action).await {
                    if worker_tx.send(Event::Intent(intent)).is_err() {
                        tracing::debug!("UI is gone, dropping settled intent");
                    }
                }
            });
        }

        return Ok(());
    }
}
