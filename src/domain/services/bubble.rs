#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::wrap_text;
use crate::domain::models::Author;
use crate::domain::models::Message;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

fn text_width(text: &str) -> usize {
    return text.chars().count();
}

fn fill(total: usize, used: usize) -> String {
    return " ".repeat(total.saturating_sub(used));
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a Message, alignment: BubbleAlignment, window_max_width: usize) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    /// Bubble title, numbered so messages can be picked with `/copy N`.
    fn title(&self) -> String {
        return format!("{} ({})", self.message.author.to_string(), self.message.id);
    }

    fn suggestion_lines(&self, max_line_length: usize) -> Vec<String> {
        return self
            .message
            .visible_suggestions()
            .iter()
            .enumerate()
            .flat_map(|(idx, suggestion)| {
                return wrap_text(&format!("({}) {suggestion}", idx + 1), max_line_length);
            })
            .collect();
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_length = self.get_max_line_length();
        let mut lines: Vec<Line> = self
            .message
            .as_string_lines(max_line_length)
            .into_iter()
            .map(|line| {
                return self.spans_to_line(vec![Span::from(line)], max_line_length);
            })
            .collect();

        let suggestions = self.suggestion_lines(max_line_length);
        if !suggestions.is_empty() {
            lines.push(self.spans_to_line(vec![], max_line_length));
            for suggestion in suggestions {
                lines.push(self.spans_to_line(
                    vec![Span::styled(
                        suggestion,
                        Style {
                            fg: Some(Color::Cyan),
                            ..Style::default()
                        },
                    )],
                    max_line_length,
                ));
            }
        }

        lines.push(self.spans_to_line(
            vec![Span::styled(
                self.message.footer(),
                Style {
                    fg: Some(Color::DarkGray),
                    ..Style::default()
                },
            )],
            max_line_length,
        ));

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn spans_to_line(&self, mut spans: Vec<Span<'static>>, max_line_length: usize) -> Line<'static> {
        let line_str_len: usize = spans.iter().map(|e| return text_width(&e.content)).sum();
        let line_fill = fill(max_line_length, line_str_len);
        let formatted_line_length =
            line_str_len + line_fill.len() + Bubble::style_config().bubble_padding;

        let mut wrapped_spans = vec![self.highlight_span("│ ".to_string())];
        wrapped_spans.append(&mut spans);
        wrapped_spans.push(self.highlight_span(format!("{line_fill} │")));

        let outer_bubble_padding = fill(self.window_max_width, formatted_line_length);

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::from(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::from(outer_bubble_padding)];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_line_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let max_allowed = self.window_max_width.saturating_sub(line_border_width);

        let suggestions_width = self
            .message
            .visible_suggestions()
            .iter()
            .map(|suggestion| return text_width(suggestion) + 4)
            .max()
            .unwrap_or(0);

        let mut max_line_length = self
            .message
            .text
            .lines()
            .map(text_width)
            .chain([suggestions_width, text_width(&self.message.footer())])
            .max()
            .unwrap_or(0);

        if max_line_length > max_allowed {
            max_line_length = max_allowed;
        }

        let title_width = text_width(&self.title());
        if max_line_length < title_width {
            max_line_length = title_width;
        }

        return max_line_length;
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        let title = self.title();
        // Add 2 for the padding on either side of the text.
        let top_bar = format!(
            "╭{title}{}╮",
            "─".repeat((max_line_length + 2).saturating_sub(text_width(&title)))
        );
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_length + 2));
        let bar_bubble_padding = fill(
            self.window_max_width,
            max_line_length + Bubble::style_config().bubble_padding,
        );

        if self.alignment == BubbleAlignment::Left {
            let mut res = vec![self.highlight_line(format!("{top_bar}{bar_bubble_padding}"))];
            res.extend(lines);
            res.push(self.highlight_line(format!("{bottom_bar}{bar_bubble_padding}")));
            return res;
        }

        let mut res = vec![self.highlight_line(format!("{bar_bubble_padding}{top_bar}"))];
        res.extend(lines);
        res.push(self.highlight_line(format!("{bar_bubble_padding}{bottom_bar}")));
        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'static> {
        if self.message.is_error {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Red),
                    ..Style::default()
                },
            );
        } else if self.message.author == Author::Bot {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Rgb(99, 102, 241)), // Indigo
                    ..Style::default()
                },
            );
        }

        return Span::from(text);
    }

    fn highlight_line(&self, text: String) -> Line<'static> {
        return Line::from(self.highlight_span(text));
    }
}
