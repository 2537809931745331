use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::tui::AppEvent;

/// Lines moved per mouse wheel notch
const WHEEL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize(width, height) => {
            // The next render re-fits the transcript to the new size
            tracing::debug!(width, height, "terminal resized");
        }
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.widget.is_expanded() {
        handle_expanded(app, key);
    } else {
        handle_collapsed(app, key);
    }
}

fn handle_collapsed(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') => {
            app.widget.expand();
            app.scroll_to_bottom();
        }
        _ => {}
    }
}

fn handle_expanded(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Minimize
        KeyCode::Esc => app.widget.collapse(),

        // Resize
        KeyCode::Char('l') if ctrl => app.toggle_large(),

        // Enter sends, Alt/Shift+Enter starts a new line
        KeyCode::Enter
            if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
        {
            app.widget.insert_newline();
        }
        KeyCode::Enter => app.send(),

        // Sent-message recall
        KeyCode::Up => {
            app.widget.recall_previous();
        }
        KeyCode::Down => {
            app.widget.recall_next();
        }

        // Transcript scrolling
        KeyCode::PageUp => app.scroll_up(app.half_page()),
        KeyCode::PageDown => app.scroll_down(app.half_page()),

        // Editing
        KeyCode::Backspace => app.widget.backspace(),
        KeyCode::Delete => app.widget.delete(),
        KeyCode::Left => app.widget.cursor_left(),
        KeyCode::Right => app.widget.cursor_right(),
        KeyCode::Home => app.widget.cursor_home(),
        KeyCode::End => app.widget.cursor_end(),
        KeyCode::Char(c) if !ctrl => app.widget.insert_char(c),

        _ => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if !app.widget.is_expanded() {
        return;
    }
    for c in text.replace("\r\n", "\n").chars() {
        if c == '\n' {
            app.widget.insert_newline();
        } else if !c.is_control() {
            app.widget.insert_char(c);
        }
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_chat = app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_launcher = app.launcher_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if app.widget.is_expanded() && in_chat => {
            app.scroll_down(WHEEL_LINES);
        }
        MouseEventKind::ScrollUp if app.widget.is_expanded() && in_chat => {
            app.scroll_up(WHEEL_LINES);
        }
        MouseEventKind::Down(MouseButton::Left) if !app.widget.is_expanded() && in_launcher => {
            app.widget.expand();
            app.scroll_to_bottom();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use icf_chat_core::{Config, PanelSize, ERROR_TEXT};

    fn offline_app() -> App {
        let mut config = Config::new();
        config.endpoint = "http://127.0.0.1:1".to_string();
        App::new(&config).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        press_with(app, code, KeyModifiers::NONE);
    }

    fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        let mut key = KeyEvent::new(code, modifiers);
        key.kind = KeyEventKind::Press;
        handle_event(app, AppEvent::Key(key));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn wait_for_answer(app: &mut App) {
        while app.pending.is_some() {
            app.poll_pending().await;
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    #[test]
    fn test_launcher_opens_and_escape_minimizes() {
        let mut app = offline_app();
        assert!(!app.widget.is_expanded());

        press(&mut app, KeyCode::Enter);
        assert!(app.widget.is_expanded());

        press(&mut app, KeyCode::Esc);
        assert!(!app.widget.is_expanded());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = offline_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        // 'q' is just a letter once the panel is open
        let mut app = offline_app();
        app.widget.expand();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.widget.input(), "q");

        press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_l_toggles_size() {
        let mut app = offline_app();
        app.widget.expand();
        press_with(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(app.widget.size(), PanelSize::Large);
        press_with(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(app.widget.size(), PanelSize::Compact);
        assert_eq!(app.widget.input(), "");
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut app = offline_app();
        app.widget.expand();
        type_text(&mut app, "line one");
        press_with(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        type_text(&mut app, "two");

        assert_eq!(app.widget.input(), "line one\ntwo");
        assert!(app.widget.transcript().is_empty());
    }

    #[test]
    fn test_enter_on_blank_input_sends_nothing() {
        let mut app = offline_app();
        app.widget.expand();
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert!(app.pending.is_none());
        assert!(app.widget.transcript().is_empty());
    }

    #[test]
    fn test_paste_inserts_text() {
        let mut app = offline_app();
        app.widget.expand();
        handle_event(&mut app, AppEvent::Paste("first\r\nsecond".to_string()));
        assert_eq!(app.widget.input(), "first\nsecond");
    }

    #[tokio::test]
    async fn test_arrow_keys_recall_sent_messages() {
        let mut app = offline_app();
        app.widget.expand();

        for text in ["a", "b", "c"] {
            type_text(&mut app, text);
            press(&mut app, KeyCode::Enter);
            wait_for_answer(&mut app).await;
        }
        assert_eq!(app.widget.transcript().len(), 6);
        assert_eq!(app.widget.transcript().last().unwrap().text, ERROR_TEXT);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.widget.input(), "c");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.widget.input(), "b");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.widget.input(), "a");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.widget.input(), "c");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.widget.input(), "");

        // Recall never sends anything on its own
        assert_eq!(app.widget.transcript().len(), 6);
        assert!(app.pending.is_none());
    }

    #[tokio::test]
    async fn test_typing_ignored_while_waiting() {
        let mut app = offline_app();
        app.widget.expand();
        type_text(&mut app, "question");
        press(&mut app, KeyCode::Enter);
        assert!(app.widget.is_loading());

        type_text(&mut app, "more");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.widget.input(), "");
        assert_eq!(app.widget.transcript().len(), 1);

        wait_for_answer(&mut app).await;
        assert_eq!(app.widget.transcript().len(), 2);
    }

    #[test]
    fn test_launcher_click_opens_panel() {
        let mut app = offline_app();
        app.launcher_area = Some(Rect::new(10, 10, 12, 3));

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 11,
            modifiers: KeyModifiers::NONE,
        };
        handle_event(&mut app, AppEvent::Mouse(click));
        assert!(app.widget.is_expanded());
    }
}
