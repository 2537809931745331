/// Sent-message recall buffer behind the Up/Down keys in the input box.
///
/// The cursor counts back from the newest sent message: `None` means the
/// user is not recalling anything, `Some(0)` is the newest entry.
#[derive(Debug, Clone, Default)]
pub struct InputRecall {
    sent: Vec<String>,
    cursor: Option<usize>,
}

impl InputRecall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a sent message and leave recall mode
    pub fn record(&mut self, text: impl Into<String>) {
        self.sent.push(text.into());
        self.cursor = None;
    }

    /// Step to the next older message, clamping at the oldest one.
    pub fn older(&mut self) -> Option<&str> {
        if self.sent.is_empty() {
            return None;
        }
        let last = self.sent.len() - 1;
        let next = match self.cursor {
            Some(i) if i < last => i + 1,
            Some(_) => last,
            None => 0,
        };
        self.cursor = Some(next);
        self.entry(next)
    }

    /// Step to the next newer message. Stepping past the newest one leaves
    /// recall mode and yields an empty string so the input gets cleared.
    pub fn newer(&mut self) -> Option<&str> {
        match self.cursor {
            Some(0) => {
                self.cursor = None;
                Some("")
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                self.entry(i - 1)
            }
            None => None,
        }
    }

    pub fn is_recalling(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    fn entry(&self, back: usize) -> Option<&str> {
        self.sent
            .len()
            .checked_sub(back + 1)
            .and_then(|idx| self.sent.get(idx))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recall_with(sent: &[&str]) -> InputRecall {
        let mut recall = InputRecall::new();
        for s in sent {
            recall.record(*s);
        }
        recall
    }

    #[test]
    fn test_older_walks_newest_to_oldest() {
        let mut recall = recall_with(&["a", "b", "c"]);
        assert_eq!(recall.older(), Some("c"));
        assert_eq!(recall.older(), Some("b"));
        assert_eq!(recall.older(), Some("a"));
        // Clamps at the oldest entry
        assert_eq!(recall.older(), Some("a"));
    }

    #[test]
    fn test_newer_walks_back_then_clears() {
        let mut recall = recall_with(&["a", "b", "c"]);
        recall.older();
        recall.older();
        recall.older();
        assert_eq!(recall.newer(), Some("b"));
        assert_eq!(recall.newer(), Some("c"));
        assert_eq!(recall.newer(), Some(""));
        assert!(!recall.is_recalling());
        assert_eq!(recall.newer(), None);
    }

    #[test]
    fn test_empty_buffer_recalls_nothing() {
        let mut recall = InputRecall::new();
        assert_eq!(recall.older(), None);
        assert_eq!(recall.newer(), None);
        assert!(!recall.is_recalling());
    }

    #[test]
    fn test_record_resets_cursor() {
        let mut recall = recall_with(&["a", "b"]);
        recall.older();
        recall.older();
        recall.record("c");
        assert!(!recall.is_recalling());
        assert_eq!(recall.older(), Some("c"));
    }
}
