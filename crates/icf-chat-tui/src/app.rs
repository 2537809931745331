use ratatui::layout::Rect;
use tokio::task::JoinHandle;
use icf_chat_core::{AskClient, AskResponse, ChatError, ChatWidget, Config, PanelSize};

pub type PendingAnswer = JoinHandle<Result<AskResponse, ChatError>>;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub widget: ChatWidget,
    pub greeting: String,

    // Outstanding /ask request, if any
    pub client: AskClient,
    pub pending: Option<PendingAnswer>,

    // Transcript scroll state
    pub chat_scroll: u16,
    pub chat_height: u16,     // Height of transcript area for scroll calculations
    pub transcript_rows: u16, // Wrapped rows at the last render
    pub stick_to_bottom: bool, // Pin to the newest bubble on the next render

    // Animation state
    pub animation_frame: u8, // 0-2 for typing dots

    // Areas for mouse hit-testing (updated during render)
    pub launcher_area: Option<Rect>,
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = AskClient::with_timeout(&config.endpoint, config.request_timeout())?;

        let mut widget = ChatWidget::new();
        if config.start_expanded {
            widget.expand();
        }
        if config.start_large {
            widget.set_size(PanelSize::Large);
        }

        Ok(Self {
            should_quit: false,
            widget,
            greeting: config.greeting.clone(),

            client,
            pending: None,

            chat_scroll: 0,
            chat_height: 0,
            transcript_rows: 0,
            stick_to_bottom: true,

            animation_frame: 0,

            launcher_area: None,
            chat_area: None,
        })
    }

    /// Submit the input box and put the request on a background task
    pub fn send(&mut self) {
        let Some(request) = self.widget.submit() else {
            return;
        };

        tracing::info!(history_len = request.history.len(), "question submitted");

        let client = self.client.clone();
        self.pending = Some(tokio::spawn(async move { client.ask(&request).await }));
        self.animation_frame = 0;

        // Scroll to bottom so the typing dots are visible
        self.scroll_to_bottom();
    }

    /// Collect the answer once the background request has finished
    pub async fn poll_pending(&mut self) {
        let finished = self.pending.as_ref().is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.pending.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(join_err) => Err(ChatError::Task(join_err.to_string())),
            };
            self.widget.complete(result);
            self.scroll_to_bottom();
        }
    }

    pub fn toggle_large(&mut self) {
        self.widget.toggle_large();
        self.scroll_to_bottom();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.widget.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        if lines > 0 {
            self.stick_to_bottom = false;
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
        if self.chat_scroll == max {
            self.stick_to_bottom = true;
        }
    }

    pub fn half_page(&self) -> u16 {
        (self.visible_height() / 2).max(1)
    }

    /// Scroll the transcript so the newest bubble is visible. The offset is
    /// resolved by the next render, once the wrapped height is known.
    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
    }

    /// Record the wrapped transcript size from a render and settle the
    /// scroll offset against it
    pub fn fit_transcript(&mut self, rows: u16, height: u16) {
        self.transcript_rows = rows;
        self.chat_height = height;

        let max = self.max_scroll();
        self.chat_scroll = if self.stick_to_bottom {
            max
        } else {
            self.chat_scroll.min(max)
        };
    }

    fn max_scroll(&self) -> u16 {
        self.transcript_rows.saturating_sub(self.chat_height)
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icf_chat_core::{Sender, ERROR_TEXT};

    fn offline_app() -> App {
        let mut config = Config::new();
        // Nothing listens on port 1
        config.endpoint = "http://127.0.0.1:1".to_string();
        App::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_send_spawns_one_request() {
        let mut app = offline_app();
        app.widget.set_input("Assalamu alaikum");
        app.send();

        assert!(app.pending.is_some());
        assert!(app.widget.is_loading());
        assert_eq!(app.widget.transcript().last().unwrap().sender, Sender::User);

        // A second send while waiting changes nothing
        app.send();
        assert_eq!(app.widget.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_send_spawns_nothing() {
        let mut app = offline_app();
        app.widget.set_input("   ");
        app.send();
        assert!(app.pending.is_none());
        assert!(app.widget.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_shows_error() {
        let mut app = offline_app();
        app.widget.set_input("hi");
        app.send();

        while app.pending.is_some() {
            app.poll_pending().await;
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        let last = app.widget.transcript().last().unwrap();
        assert_eq!(last.text, ERROR_TEXT);
        assert_eq!(last.sender, Sender::Bot);
        assert!(app.widget.history().is_empty());
        assert!(!app.widget.is_loading());
    }

    #[tokio::test]
    async fn test_aborted_request_shows_error() {
        let mut app = offline_app();
        app.widget.set_input("hi");
        app.send();

        if let Some(task) = &app.pending {
            task.abort();
        }
        while app.pending.is_some() {
            app.poll_pending().await;
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(app.widget.transcript().last().unwrap().text, ERROR_TEXT);
    }

    #[test]
    fn test_config_sets_initial_panel() {
        let mut config = Config::new();
        config.start_expanded = true;
        config.start_large = true;
        let app = App::new(&config).unwrap();

        assert!(app.widget.is_expanded());
        assert_eq!(app.widget.size(), PanelSize::Large);
    }

    #[test]
    fn test_scroll_follows_transcript_until_user_scrolls() {
        let mut app = offline_app();

        // Everything fits
        app.fit_transcript(3, 4);
        assert_eq!(app.chat_scroll, 0);

        // Pinned to the bottom as rows are added
        app.fit_transcript(10, 4);
        assert_eq!(app.chat_scroll, 6);

        // Scrolling up unpins, and later growth keeps the offset
        app.scroll_up(2);
        assert_eq!(app.chat_scroll, 4);
        app.fit_transcript(12, 4);
        assert_eq!(app.chat_scroll, 4);

        // Reaching the bottom again pins it
        app.scroll_down(50);
        assert_eq!(app.chat_scroll, 8);
        assert!(app.stick_to_bottom);
        app.fit_transcript(15, 4);
        assert_eq!(app.chat_scroll, 11);
    }

    #[test]
    fn test_scroll_to_bottom_resolves_on_next_fit() {
        let mut app = offline_app();
        app.fit_transcript(20, 5);
        app.scroll_up(10);
        assert_eq!(app.chat_scroll, 5);

        app.scroll_to_bottom();
        // A taller panel after resize has a smaller max offset
        app.fit_transcript(20, 12);
        assert_eq!(app.chat_scroll, 8);
    }

    #[test]
    fn test_shrinking_transcript_clamps_offset() {
        let mut app = offline_app();
        app.fit_transcript(30, 5);
        app.scroll_up(3);
        assert_eq!(app.chat_scroll, 22);

        app.fit_transcript(30, 28);
        assert_eq!(app.chat_scroll, 2);
    }

    #[test]
    fn test_tick_only_animates_while_loading() {
        let mut app = offline_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
    }
}
