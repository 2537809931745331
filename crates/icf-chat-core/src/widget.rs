//! The chat widget itself, minus any rendering or I/O.
//!
//! A surface feeds key presses and toggles into [`ChatWidget`], sends the
//! [`AskRequest`] that [`ChatWidget::submit`] hands back, and reports the
//! outcome through [`ChatWidget::complete`]. Keeping the network call outside
//! means every transition can be exercised without a terminal or a server.

use crate::client::{AskRequest, AskResponse};
use crate::error::ChatError;
use crate::history::ConversationHistory;
use crate::recall::InputRecall;
use crate::state::{Message, Transcript};

/// Tallest the input box may grow before it starts scrolling
pub const MAX_INPUT_ROWS: u16 = 4;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelSize {
    #[default]
    Compact,
    Large,
}

impl PanelSize {
    /// Panel (width, height) in terminal cells
    pub fn dimensions(&self) -> (u16, u16) {
        match self {
            PanelSize::Compact => (60, 20),
            PanelSize::Large => (90, 30),
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            PanelSize::Compact => PanelSize::Large,
            PanelSize::Large => PanelSize::Compact,
        }
    }
}

#[derive(Debug, Default)]
pub struct ChatWidget {
    input: String,
    cursor: usize, // cursor position in input, in chars
    transcript: Transcript,
    history: ConversationHistory,
    recall: InputRecall,
    loading: bool,
    expanded: bool,
    size: PanelSize,
}

impl ChatWidget {
    pub fn new() -> Self {
        Self::default()
    }

    // Accessors
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn size(&self) -> PanelSize {
        self.size
    }

    // Open / close / resize
    pub fn expand(&mut self) {
        self.expanded = true;
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn toggle_large(&mut self) {
        self.size = self.size.toggled();
    }

    pub fn set_size(&mut self, size: PanelSize) {
        self.size = size;
    }

    /// Send whatever is in the input box.
    ///
    /// Returns the request to put on the wire, or `None` when the input is
    /// blank or an earlier request is still outstanding.
    pub fn submit(&mut self) -> Option<AskRequest> {
        let question = self.input.trim();
        if question.is_empty() || self.loading {
            return None;
        }
        let question = question.to_string();

        self.recall.record(question.clone());
        self.transcript.push(Message::user(question.clone()));
        self.input.clear();
        self.cursor = 0;
        self.loading = true;

        Some(AskRequest {
            question,
            history: self.history.clone(),
        })
    }

    /// Fold the outcome of the outstanding request back into the widget.
    pub fn complete(&mut self, result: Result<AskResponse, ChatError>) {
        self.loading = false;
        match result {
            Ok(reply) => {
                self.transcript.push(Message::bot(reply.answer));
                self.history.replace(reply.history);
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                self.transcript.push(Message::error());
            }
        }
    }

    // Input editing. The input box is disabled while a request is in flight.
    pub fn insert_char(&mut self, c: char) {
        if self.loading {
            return;
        }
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.loading || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.remove(byte_pos);
    }

    pub fn delete(&mut self) {
        if self.loading {
            return;
        }
        let char_count = self.input.chars().count();
        if self.cursor < char_count {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    pub fn set_input(&mut self, text: &str) {
        if self.loading {
            return;
        }
        self.input = text.to_string();
        self.cursor = self.input.chars().count();
    }

    /// Up arrow: pull an older sent message into the input box.
    /// Returns whether the input changed.
    pub fn recall_previous(&mut self) -> bool {
        if self.loading {
            return false;
        }
        match self.recall.older().map(str::to_string) {
            Some(text) => {
                self.set_input(&text);
                true
            }
            None => false,
        }
    }

    /// Down arrow: walk back toward the newest message, then clear.
    pub fn recall_next(&mut self) -> bool {
        if self.loading {
            return false;
        }
        match self.recall.newer().map(str::to_string) {
            Some(text) => {
                self.set_input(&text);
                true
            }
            None => false,
        }
    }

    /// Rows the input box needs to show its text wrapped at `width` columns
    pub fn input_rows(&self, width: u16) -> u16 {
        let width = width.max(1) as usize;
        let rows: usize = self
            .input
            .split('\n')
            // A line that exactly fills the width puts the cursor on a
            // fresh row below it
            .map(|line| line.chars().count() / width + 1)
            .sum();
        rows.clamp(1, MAX_INPUT_ROWS as usize) as u16
    }
}
