use std::time::Duration;
use std::time::Instant;

use anyhow::bail;
use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use test_utils::chat_response_fixture;
use tokio::sync::mpsc;

use super::AppState;
use crate::domain::models::Action;
use crate::domain::models::ChatResponse;
use crate::domain::models::Intent;
use crate::domain::models::QuickSuggestionRequest;
use crate::domain::models::TransportError;
use crate::domain::models::View;
use crate::domain::models::COPIED_TEXT;
use crate::domain::models::SEND_FAILED_TEXT;

fn now() -> DateTime<Utc> {
    return DateTime::parse_from_rfc3339("2024-03-01T10:15:00Z")
        .unwrap()
        .with_timezone(&Utc);
}

fn app_state() -> AppState {
    let mut app_state = AppState {
        last_known_width: 100,
        last_known_height: 300,
        ..AppState::default()
    };
    app_state.sync_dependants();
    return app_state;
}

/// An app state with one settled exchange in the log.
fn chatting(tx: &mpsc::UnboundedSender<Action>) -> Result<AppState> {
    let mut app_state = app_state();
    app_state.submit("Generate 5 viral Instagram Reel ideas", tx)?;
    let res: ChatResponse = serde_json::from_str(chat_response_fixture())?;
    app_state.apply(Intent::ChatSucceeded(res), now());
    return Ok(app_state);
}

mod submit {
    use super::*;

    #[test]
    fn it_breaks_on_quit() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        assert!(app_state.submit("/q", &tx)?);
        assert!(app_state.conversation.messages().is_empty());

        return Ok(());
    }

    #[test]
    fn it_sends_starter_prompts_by_number() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        assert!(!app_state.submit("1", &tx)?);

        match rx.try_recv()? {
            Action::SendChat(req) => {
                assert_eq!(
                    req.query,
                    "Generate 5 viral Instagram Reel ideas for a fitness coach targeting busy professionals"
                );
            }
            _ => bail!("Wrong action"),
        }
        assert_eq!(app_state.conversation.view(), View::Active);
        assert!(app_state.conversation.loading());

        return Ok(());
    }

    #[test]
    fn it_sends_numbers_verbatim_once_chatting() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = chatting(&tx)?;
        rx.try_recv()?;

        app_state.submit("3", &tx)?;

        match rx.try_recv()? {
            Action::SendChat(req) => {
                assert_eq!(req.query, "3");
                assert_eq!(req.conversation_id, Some("abc123".to_string()));
            }
            _ => bail!("Wrong action"),
        }

        return Ok(());
    }

    #[test]
    fn it_holds_sends_while_loading() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        app_state.submit("First question", &tx)?;
        app_state.submit("Second question", &tx)?;

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
        assert_eq!(app_state.conversation.messages().len(), 1);

        return Ok(());
    }

    #[test]
    fn it_ignores_blank_input() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        app_state.submit("   ", &tx)?;

        assert!(rx.try_recv().is_err());
        assert_eq!(app_state.conversation.view(), View::Idle);

        return Ok(());
    }

    #[test]
    fn it_clears_the_draft_after_a_command() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = chatting(&tx)?;
        app_state.dispatch(Intent::SetInput("/copy".to_string()), &tx)?;

        assert!(!app_state.submit("/copy", &tx)?);
        assert_eq!(app_state.conversation.input, "");

        return Ok(());
    }

    #[test]
    fn it_hides_help_on_the_next_submit() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        app_state.submit("/help", &tx)?;
        assert!(app_state.show_help);

        app_state.submit("/back", &tx)?;
        assert!(!app_state.show_help);

        return Ok(());
    }
}

mod handle_slash_commands {
    use super::*;

    #[test]
    fn it_ignores_plain_text() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        assert_eq!(
            app_state.handle_slash_commands("hello there", &tx)?,
            (false, false)
        );

        return Ok(());
    }

    #[test]
    fn it_goes_back_keeping_the_log() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = chatting(&tx)?;

        assert_eq!(app_state.handle_slash_commands("/b", &tx)?, (false, true));
        assert_eq!(app_state.conversation.view(), View::Idle);
        assert_eq!(app_state.conversation.messages().len(), 2);

        return Ok(());
    }

    #[test]
    fn it_copies_the_last_reply() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = chatting(&tx)?;
        rx.try_recv()?;

        app_state.handle_slash_commands("/copy", &tx)?;

        match rx.try_recv()? {
            Action::CopyToClipboard(text) => {
                assert!(text.starts_with("Here are 5 ideas"));
            }
            _ => bail!("Wrong action"),
        }
        assert_eq!(app_state.notification().unwrap().text, COPIED_TEXT);

        return Ok(());
    }

    #[test]
    fn it_copies_a_message_by_number() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = chatting(&tx)?;
        rx.try_recv()?;

        app_state.handle_slash_commands("/c 1", &tx)?;

        assert_eq!(
            rx.try_recv()?,
            Action::CopyToClipboard("Generate 5 viral Instagram Reel ideas".to_string())
        );

        return Ok(());
    }

    #[test]
    fn it_reports_nothing_to_copy() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        app_state.handle_slash_commands("/copy", &tx)?;

        assert!(rx.try_recv().is_err());
        assert_eq!(
            app_state.notification().unwrap().text,
            "There is no message to copy."
        );

        return Ok(());
    }

    #[test]
    fn it_sends_a_follow_up_suggestion() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = chatting(&tx)?;
        rx.try_recv()?;

        app_state.handle_slash_commands("/suggest 1", &tx)?;

        match rx.try_recv()? {
            Action::SendChat(req) => {
                assert_eq!(req.query, "Write captions for idea 1");
            }
            _ => bail!("Wrong action"),
        }
        assert_eq!(app_state.conversation.messages().len(), 3);

        return Ok(());
    }

    #[test]
    fn it_rejects_hidden_suggestions() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = chatting(&tx)?;
        rx.try_recv()?;

        // The fixture carries four suggestions, only three are shown.
        app_state.handle_slash_commands("/s 4", &tx)?;

        assert!(rx.try_recv().is_err());
        assert!(app_state.notification().is_some());

        return Ok(());
    }

    #[test]
    fn it_requests_quick_suggestions() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        app_state.handle_slash_commands("/quick content_ideas fitness", &tx)?;

        assert_eq!(
            rx.try_recv()?,
            Action::FetchQuickSuggestions(QuickSuggestionRequest {
                category: "content_ideas".to_string(),
                niche: Some("fitness".to_string()),
                platform: None,
            })
        );
        assert!(app_state.conversation.loading());

        return Ok(());
    }

    #[test]
    fn it_requires_a_quick_suggestion_category() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = app_state();

        app_state.handle_slash_commands("/k", &tx)?;

        assert!(rx.try_recv().is_err());
        assert!(!app_state.conversation.loading());

        return Ok(());
    }
}

mod notifications {
    use super::*;

    #[test]
    fn it_keeps_notifications_from_the_worker() {
        let mut app_state = app_state();
        app_state.apply(Intent::send("Hello"), now());

        let actions = app_state.apply(Intent::ChatFailed(TransportError::Aborted), now());

        assert!(actions.is_empty());
        assert_eq!(app_state.notification().unwrap().text, SEND_FAILED_TEXT);
    }

    #[test]
    fn it_expires_notifications() {
        let mut app_state = app_state();
        app_state.apply(Intent::send("Hello"), now());
        app_state.apply(Intent::ChatFailed(TransportError::Aborted), now());

        app_state.expire_notification(Instant::now());
        assert!(app_state.notification().is_some());

        app_state.expire_notification(Instant::now() + Duration::from_secs(4));
        assert!(app_state.notification().is_none());
    }
}

mod layout {
    use super::*;

    #[test]
    fn it_renders_every_message() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let app_state = chatting(&tx)?;

        assert!(app_state.bubble_list.len() > 0);
        assert_eq!(app_state.scroll.position, 0);

        return Ok(());
    }

    #[test]
    fn it_keeps_the_scroll_position_while_typing() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = chatting(&tx)?;
        app_state.set_rect(ratatui::prelude::Rect::new(0, 0, 100, 5));
        app_state.scroll.last();
        app_state.scroll.up();
        let scrolled_to = app_state.scroll.position;
        assert!(scrolled_to > 0);

        app_state.dispatch(Intent::SetInput("Write".to_string()), &tx)?;
        assert_eq!(app_state.scroll.position, scrolled_to);

        app_state.submit("Write captions", &tx)?;
        assert_eq!(
            app_state.scroll.position,
            app_state.bubble_list.len() - app_state.last_known_height
        );

        return Ok(());
    }
}
