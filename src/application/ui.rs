use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Intent;
use crate::domain::models::Loading;
use crate::domain::models::NotificationLevel;
use crate::domain::models::SlashCommand;
use crate::domain::models::TextArea;
use crate::domain::models::STARTER_CATEGORIES;
use crate::domain::services::actions::help_text;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;

fn landing_lines(has_history: bool) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "SocialSync",
            Style::default().fg(Color::Rgb(99, 102, 241)).bold(),
        )),
        Line::from("Your AI-powered social media marketing assistant."),
        Line::from(""),
    ];

    let mut number = 0;
    for category in STARTER_CATEGORIES {
        lines.push(Line::from(vec![
            Span::styled(category.title, Style::default().bold()),
            Span::styled(
                format!(" - {}", category.description),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        for prompt in category.prompts {
            number += 1;
            lines.push(Line::from(format!("  ({number}) {prompt}")));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Type a number to send a starter prompt, or ask anything. /help lists all commands.",
        Style::default().fg(Color::DarkGray),
    )));

    if has_history {
        lines.push(Line::from(Span::styled(
            "Your conversation is still here, send a message to pick it back up.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    return lines;
}

fn notification_line(app_state: &AppState) -> Line<'static> {
    if let Some(notification) = app_state.notification() {
        let colour = match notification.level {
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Info => Color::Cyan,
            NotificationLevel::Error => Color::Red,
        };

        return Line::from(Span::styled(
            notification.text.to_string(),
            Style::default().fg(colour),
        ));
    }

    return Line::from("");
}

fn render(
    frame: &mut Frame,
    app_state: &mut AppState,
    textarea: &tui_textarea::TextArea,
    loading: &Loading,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Max(4),
        ])
        .split(frame.size());

    if usize::from(layout[0].width) != app_state.last_known_width
        || usize::from(layout[0].height) != app_state.last_known_height
    {
        app_state.set_rect(layout[0]);
    }

    if app_state.show_help {
        frame.render_widget(
            Paragraph::new(help_text()).wrap(Wrap { trim: false }),
            layout[0],
        );
    } else if app_state.conversation.chat_active() {
        app_state
            .bubble_list
            .render(frame, layout[0], app_state.scroll.position);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            layout[0].inner(&Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app_state.scroll.scrollbar_state,
        );
    } else {
        let has_history = !app_state.conversation.show_suggestions();
        frame.render_widget(
            Paragraph::new(landing_lines(has_history)).wrap(Wrap { trim: false }),
            layout[0],
        );
    }

    frame.render_widget(Paragraph::new(notification_line(app_state)), layout[1]);

    if app_state.conversation.loading() {
        loading.render(frame, layout[2]);
    } else {
        frame.render_widget(textarea.widget(), layout[2]);
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut textarea = TextArea::default();
    let loading = Loading::default();
    let mut events = EventsService::new(rx);

    loop {
        terminal.draw(|frame| {
            render(frame, app_state, &textarea, &loading);
        })?;

        match events.next().await? {
            Event::Intent(intent) => {
                app_state.dispatch(intent, &tx)?;
            }
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
                app_state.dispatch(Intent::SetInput(textarea.lines().join("\n")), &tx)?;
            }
            Event::KeyboardPaste(text) => {
                textarea.insert_str(text);
                app_state.dispatch(Intent::SetInput(textarea.lines().join("\n")), &tx)?;
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardEsc() => {
                app_state.show_help = false;
                app_state.dispatch(Intent::Back, &tx)?;
            }
            Event::KeyboardEnter() => {
                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() {
                    continue;
                }

                // Keep the draft around until the pending reply settles.
                if app_state.conversation.loading() && SlashCommand::parse(&input_str).is_none() {
                    continue;
                }

                textarea = TextArea::default();
                if app_state.submit(&input_str, &tx)? {
                    break;
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => {
                app_state.expire_notification(Instant::now());
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    // Best effort, the process is already going down.
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    let mut app_state = AppState::default();

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
