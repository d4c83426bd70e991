use serde::{Deserialize, Serialize};

use crate::entity::{Color, palette};

/// A single player-facing message with its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The message text.
    pub text: String,
    /// Display color.
    pub color: Color,
}

impl Message {
    /// A white message.
    pub fn new(text: impl Into<String>) -> Self {
        Self::colored(text, palette::WHITE)
    }

    /// A message with an explicit color.
    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// A bounded log of player-facing messages.
///
/// Long messages are wrapped to the configured width; once the log holds
/// `height` lines the oldest lines are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
    width: usize,
    height: usize,
}

impl MessageLog {
    /// Create an empty log wrapping at `width` columns and keeping at most
    /// `height` lines.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            messages: Vec::new(),
            width,
            height,
        }
    }

    /// Append a message, wrapping it into as many lines as needed.
    pub fn add(&mut self, message: Message) {
        for line in wrap(&message.text, self.width) {
            if self.messages.len() == self.height {
                self.messages.remove(0);
            }
            self.messages.push(Message::colored(line, message.color));
        }
    }

    /// All retained lines, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_one_line() {
        let mut log = MessageLog::new(40, 5);
        log.add(Message::new("You died!"));
        assert_eq!(log.messages().len(), 1);
    }

    #[test]
    fn long_message_wraps_to_width() {
        let mut log = MessageLog::new(20, 10);
        log.add(Message::new(
            "A very long message that certainly cannot fit on one line.",
        ));
        assert!(log.messages().len() > 1);
        assert!(log.messages().iter().all(|m| m.text.len() <= 20));
    }

    #[test]
    fn oldest_lines_are_evicted() {
        let mut log = MessageLog::new(40, 2);
        log.add(Message::new("first"));
        log.add(Message::new("second"));
        log.add(Message::new("third"));
        assert_eq!(log.messages().len(), 2);
        assert_eq!(log.messages()[0].text, "second");
        assert_eq!(log.messages()[1].text, "third");
    }

    #[test]
    fn wrapped_lines_share_the_message_color() {
        let mut log = MessageLog::new(10, 10);
        log.add(Message::colored(
            "some words spread over lines",
            palette::YELLOW,
        ));
        assert!(log.messages().iter().all(|m| m.color == palette::YELLOW));
    }
}
