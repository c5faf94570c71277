// ABOUTME: Text field with a label above it
// Re-publishes every text change to subscribers

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use tokio::sync::mpsc;

use super::theme::{DARK_BG, GOLD, MUTED_GRAY, SOFT_WHITE, SUBDUED_BORDER};

/// Label plus single-line text input
#[derive(Debug, Default)]
pub struct LabeledTextInput {
    label: String,
    text: String,
    /// Cursor position in chars, not bytes
    cursor: usize,
    masked: bool,
    focused: bool,
    listeners: Vec<mpsc::UnboundedSender<String>>,
}

impl LabeledTextInput {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            label: label.into(),
            text,
            cursor,
            ..Self::default()
        }
    }

    /// Render contents as bullets
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current field contents
    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn is_masked(&self) -> bool {
        self.masked
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Receive the new text after every change
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
        self.notify();
    }

    pub fn input_char(&mut self, c: char) {
        let at = self.byte_index();
        self.text.insert(at, c);
        self.cursor += 1;
        self.notify();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.text.remove(at);
        self.notify();
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let at = self.byte_index();
        self.text.remove(at);
        self.notify();
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(idx, _)| idx)
    }

    fn notify(&mut self) {
        let text = &self.text;
        self.listeners.retain(|tx| tx.send(text.clone()).is_ok());
    }

    fn display_text(&self) -> String {
        let shown: String = if self.masked {
            "•".repeat(self.text.chars().count())
        } else {
            self.text.clone()
        };

        if !self.focused {
            return shown;
        }
        let (before, after): (String, String) = {
            let chars: Vec<char> = shown.chars().collect();
            let split = self.cursor.min(chars.len());
            (chars[..split].iter().collect(), chars[split..].iter().collect())
        };
        format!("{before}│{after}")
    }
}

impl Widget for &LabeledTextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let label_style = if self.focused {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(SOFT_WHITE)
        };
        Paragraph::new(Line::from(Span::styled(self.label.as_str(), label_style)))
            .render(Rect { height: 1, ..area }, buf);

        if area.height < 2 {
            return;
        }
        let field = Rect {
            y: area.y + 1,
            height: (area.height - 1).min(3),
            ..area
        };
        let border = if self.focused { GOLD } else { SUBDUED_BORDER };
        let text_style = if self.text.is_empty() && !self.focused {
            Style::default().fg(MUTED_GRAY)
        } else {
            Style::default().fg(SOFT_WHITE)
        };

        Paragraph::new(self.display_text())
            .style(text_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border))
                    .style(Style::default().bg(DARK_BG)),
            )
            .render(field, buf);
    }
}
