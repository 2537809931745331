use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use icf_chat_core::{PanelSize, Sender, MAX_INPUT_ROWS};
use crate::app::App;

const LAUNCHER_LABEL: &str = " 💬 Chat ";
const INPUT_PLACEHOLDER: &str = "Type your message...";

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) if end > 0 => {
                if start > 0 {
                    spans.push(Span::raw(rest[..start].to_string()));
                }
                spans.push(Span::styled(
                    after[..end].to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                rest = &after[end + 2..];
            }
            // No closing **, treat as literal
            _ => break,
        }
    }

    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    Line::from(spans)
}

/// Hard-wrap the input text at `width` columns, honoring explicit newlines
fn wrap_input(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            rows.push(chunk.iter().collect());
        }
        // Row for the cursor after a line that fills the width
        if chars.len() % width == 0 {
            rows.push(String::new());
        }
    }

    rows
}

/// (column, row) of the char cursor inside the wrapped input
fn input_cursor_position(text: &str, cursor: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let mut row = 0;
    let mut col = 0;

    for c in text.chars().take(cursor) {
        if c == '\n' {
            row += 1;
            col = 0;
        } else if col + 1 == width {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    (col, row)
}

/// Rectangle of `width` x `height` anchored to the bottom-right of `area`
fn anchor_bottom_right(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + area.width - width,
        area.y + area.height - height,
        width,
        height,
    )
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_backdrop(frame, body_area);

    if app.widget.is_expanded() {
        app.launcher_area = None;
        render_panel(app, frame, body_area);
    } else {
        app.chat_area = None;
        render_launcher(app, frame, body_area);
    }

    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Islamic Center of Frisco ", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_backdrop(frame: &mut Frame, area: Rect) {
    let backdrop = Paragraph::new(Text::from(vec![
        Line::default(),
        Line::from(Span::styled(
            "Questions about prayer times, programs, or services?",
            Style::default().fg(Color::DarkGray),
        )),
    ]))
    .alignment(Alignment::Center);

    frame.render_widget(backdrop, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = if !app.widget.is_expanded() {
        (" CLOSED ", Style::default().bg(Color::Blue).fg(Color::White))
    } else if app.widget.is_loading() {
        (" WAITING ", Style::default().bg(Color::Magenta).fg(Color::White))
    } else {
        (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black))
    };

    let hints = if app.widget.is_expanded() {
        " Enter send | Alt+Enter newline | ↑↓ recall | PgUp/PgDn scroll | ^L resize | Esc minimize | ^C quit"
    } else {
        " Enter open chat | q quit"
    };

    let footer = Line::from(vec![
        Span::styled(mode_text, mode_style.add_modifier(Modifier::BOLD)),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}

fn render_launcher(app: &mut App, frame: &mut Frame, area: Rect) {
    let width = LAUNCHER_LABEL.chars().count() as u16 + 3;
    let launcher_area = anchor_bottom_right(area, width, 3);
    app.launcher_area = Some(launcher_area);

    let button = Paragraph::new(LAUNCHER_LABEL)
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(Clear, launcher_area);
    frame.render_widget(button, launcher_area);
}

fn render_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let (width, height) = app.widget.size().dimensions();
    let panel_area = anchor_bottom_right(area, width, height);

    let resize_hint = match app.widget.size() {
        PanelSize::Compact => "+",
        PanelSize::Large => "-",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title_top(Line::from(" ICF Assistant ").bold())
        .title_top(
            Line::from(format!(" [^L {}] [Esc ✕] ", resize_hint)).alignment(Alignment::Right),
        )
        .title_bottom(
            Line::from(Span::styled(
                format!(" {} ", app.client.base_url()),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Left),
        );

    let inner = block.inner(panel_area);
    frame.render_widget(Clear, panel_area);
    frame.render_widget(block, panel_area);

    // The input grows with its content and the transcript gives up the space
    let input_width = inner.width.saturating_sub(2);
    let input_rows = app.widget.input_rows(input_width);
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(input_rows + 2),
    ])
    .areas(inner);

    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area for mouse hit-testing
    app.chat_area = Some(area);

    let user_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let bot_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    let bubbles = std::iter::once((Sender::Bot, app.greeting.as_str())).chain(
        app.widget
            .transcript()
            .messages()
            .iter()
            .map(|msg| (msg.sender, msg.text.as_str())),
    );

    for (sender, text) in bubbles {
        match sender {
            Sender::User => {
                lines.push(Line::from(Span::styled("You:", user_style)).alignment(Alignment::Right));
                for line in text.lines() {
                    lines.push(Line::from(line.to_string()).alignment(Alignment::Right));
                }
            }
            Sender::Bot => {
                lines.push(Line::from(Span::styled("Bot:", bot_style)));
                for line in text.lines() {
                    lines.push(parse_markdown_line(line));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.widget.is_loading() {
        lines.push(Line::from(Span::styled("Bot:", bot_style)));
        // Typing dots: one more lit dot per frame
        let lit = (app.animation_frame as usize) + 1;
        let dots: String = (0..3)
            .map(|i| if i < lit { '●' } else { '○' })
            .flat_map(|c| [c, ' '])
            .collect();
        lines.push(Line::from(Span::styled(
            dots,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let chat = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });

    // Word wrapping decides the real row count, so the scroll offset is
    // settled here against the current area rather than estimated ahead
    let rows = u16::try_from(chat.line_count(area.width)).unwrap_or(u16::MAX);
    app.fit_transcript(rows, area.height);

    frame.render_widget(chat.scroll((app.chat_scroll, 0)), area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let loading = app.widget.is_loading();
    let border_color = if loading { Color::DarkGray } else { Color::Yellow };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(if loading { " Waiting for reply " } else { " Message " });

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_rows = area.height.saturating_sub(2).max(1) as usize;

    let (cursor_col, cursor_row) =
        input_cursor_position(app.widget.input(), app.widget.cursor(), inner_width);

    // Scroll vertically to keep the cursor row visible
    let row_offset = (cursor_row + 1).saturating_sub(visible_rows);

    let input = if app.widget.input().is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let rows: Vec<Line> = wrap_input(app.widget.input(), inner_width)
            .into_iter()
            .skip(row_offset)
            .take(MAX_INPUT_ROWS as usize)
            .map(Line::from)
            .collect();
        // Use cyan text to match the "You:" style - visible in both light and dark terminals
        Paragraph::new(rows).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(input.block(input_block), area);

    if !loading {
        frame.set_cursor_position((
            area.x + 1 + cursor_col as u16,
            area.y + 1 + (cursor_row - row_offset) as u16,
        ));
    }
}
