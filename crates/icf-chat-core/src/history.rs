//! Conversation history exchanged with the server
//!
//! The server owns the shape of each entry. The client stores whatever
//! array came back on the last successful round trip and replays it on the
//! next request, without looking inside.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory(Vec<Value>);

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in the server's latest history wholesale.
    pub fn replace(&mut self, latest: ConversationHistory) {
        *self = latest;
    }

    pub fn entries(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for ConversationHistory {
    fn from(entries: Vec<Value>) -> Self {
        Self(entries)
    }
}
