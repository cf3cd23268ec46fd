#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;
use chrono::SecondsFormat;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Author;

/// Follow-up suggestions shown under a bot message are capped to this many.
pub const VISIBLE_SUGGESTIONS: usize = 3;

pub fn format_timestamp(now: DateTime<Utc>) -> String {
    return now.to_rfc3339_opts(SecondsFormat::Millis, true);
}

/// Word wraps text to `line_max_width`. Blank lines are kept as a single
/// space so they still take up a row.
pub fn wrap_text(text: &str, line_max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for full_line in text.split('\n') {
        if full_line.trim().is_empty() {
            lines.push(" ".to_string());
            continue;
        }

        let mut char_count = 0;
        let mut current_lines: Vec<&str> = vec![];

        for word in full_line.split(' ') {
            let word_len = word.chars().count();
            if !current_lines.is_empty() && word_len + char_count > line_max_width {
                lines.push(current_lines.join(" ").trim_end().to_string());
                current_lines = vec![word];
                char_count = word_len + 1;
            } else {
                current_lines.push(word);
                char_count += word_len + 1;
            }
        }
        if !current_lines.is_empty() {
            lines.push(current_lines.join(" ").trim_end().to_string());
        }
    }

    return lines;
}

/// A single entry of the conversation log. Messages are never mutated once
/// appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub author: Author,
    pub text: String,
    pub timestamp: String,
    pub is_error: bool,
    pub suggestions: Vec<String>,
    pub response_time: Option<f64>,
}

impl Message {
    pub fn new(id: u64, author: Author, text: &str, timestamp: &str) -> Message {
        return Message {
            id,
            author,
            text: text.to_string().replace('\t', "  "),
            timestamp: timestamp.to_string(),
            is_error: false,
            suggestions: vec![],
            response_time: None,
        };
    }

    pub fn new_error(id: u64, text: &str, timestamp: &str) -> Message {
        let mut msg = Message::new(id, Author::Bot, text, timestamp);
        msg.is_error = true;
        return msg;
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Message {
        self.suggestions = suggestions;
        return self;
    }

    pub fn with_response_time(mut self, response_time: Option<f64>) -> Message {
        self.response_time = response_time;
        return self;
    }

    pub fn visible_suggestions(&self) -> &[String] {
        let end = self.suggestions.len().min(VISIBLE_SUGGESTIONS);
        return &self.suggestions[..end];
    }

    /// Footer rendered under a bubble, local wall clock time plus the
    /// response latency when the backend reported one.
    pub fn footer(&self) -> String {
        let mut res = match DateTime::parse_from_rfc3339(&self.timestamp) {
            Ok(parsed) => parsed.with_timezone(&Local).format("%H:%M").to_string(),
            Err(_) => self.timestamp.to_string(),
        };

        if let Some(response_time) = self.response_time {
            res = format!("{res} • {response_time:.1}s");
        }

        return res;
    }

    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        return wrap_text(&self.text, line_max_width);
    }
}
