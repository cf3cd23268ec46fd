use std::collections::HashMap;

use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Author;
use crate::domain::models::Message;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

/// Rendered lines for every message of the log. Messages never change once
/// appended, so entries are only rebuilt when the terminal width changes.
#[derive(Default)]
pub struct BubbleList {
    cache: HashMap<u64, Vec<Line<'static>>>,
    order: Vec<u64>,
    line_width: usize,
    lines_len: usize,
}

impl BubbleList {
    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.order = messages.iter().map(|message| return message.id).collect();
        self.cache.retain(|id, _| return self.order.contains(id));

        self.lines_len = messages
            .iter()
            .map(|message| {
                if let Some(lines) = self.cache.get(&message.id) {
                    return lines.len();
                }

                let mut align = BubbleAlignment::Left;
                if message.author == Author::User {
                    align = BubbleAlignment::Right;
                }

                let bubble_lines = Bubble::new(message, align, line_width).as_lines();
                let bubble_line_len = bubble_lines.len();
                self.cache.insert(message.id, bubble_lines);

                return bubble_line_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect, scroll: usize) {
        let lines: Vec<Line> = self
            .order
            .iter()
            .filter_map(|id| return self.cache.get(id))
            .flat_map(|lines| return lines.iter().cloned())
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
            rect,
        );
    }
}
