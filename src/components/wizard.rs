// ABOUTME: Welcome wizard screen
// Header with progress, the sliding pages and a key hint footer

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use super::slider_view::SliderView;
use super::theme::{
    CORNFLOWER_BLUE, DARK_BG, ERROR_RED, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE,
    SUBDUED_BORDER, WARNING_YELLOW,
};
use crate::app::state::{AppState, InputField, KeyGenStatus, RequestStatus, WizardPage};
use crate::slider::{Direction, Page, PageId};

const HEADER_HEIGHT: u16 = 5;
const FOOTER_HEIGHT: u16 = 3;

const MASCOT: &[&str] = &[
    "╭───────╮",
    "│ ◉   ◉ │",
    "│   ▽   │",
    "╰───────╯",
];

pub struct WizardComponent;

impl WizardComponent {
    pub fn new() -> Self {
        Self
    }

    fn layout(area: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(6),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area)
    }

    /// Region the pages slide within, for sizing the slider container
    pub fn slider_area(area: Rect) -> Rect {
        Self::layout(area)[1]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

        let layout = Self::layout(area);
        self.render_header(frame, layout[0], state);

        SliderView::render(&state.slider, layout[1], frame.buffer_mut(), |id, page, rect, buf| {
            render_page(state, id, page, rect, buf);
        });

        self.render_navigation(frame, layout[2], state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(LayoutDirection::Vertical)
            .margin(1)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let reset_indicator = if state.is_reset { " (Reset)" } else { "" };
        let title = Paragraph::new(Line::from(vec![
            Span::styled("AMDR Setup Wizard", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(reset_indicator, Style::default().fg(WARNING_YELLOW)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, rows[0]);

        self.render_progress(frame, rows[1], state);
    }

    /// Step dots, one per page in the chain
    fn render_progress(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chain = state.slider.chain();
        let current_idx = state.step_index();

        let mut spans = Vec::new();
        for (idx, id) in chain.iter().enumerate() {
            let (icon, style) = if idx < current_idx {
                ("●", Style::default().fg(SELECTION_GREEN))
            } else if idx == current_idx {
                ("◉", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            } else {
                ("○", Style::default().fg(MUTED_GRAY))
            };

            spans.push(Span::styled(icon, style));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                state.page_at(*id).title(),
                if idx == current_idx {
                    Style::default().fg(SOFT_WHITE)
                } else {
                    Style::default().fg(MUTED_GRAY)
                },
            ));
            if idx + 1 < chain.len() {
                spans.push(Span::styled(" → ", Style::default().fg(SUBDUED_BORDER)));
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
    }

    fn render_navigation(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SUBDUED_BORDER))
            .style(Style::default().bg(DARK_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut spans = Vec::new();
        if state.can_go_back() {
            hint(&mut spans, "←", "Back", true);
        }
        let next = if state.is_final_step() { "Finish" } else { "Next" };
        hint(&mut spans, "Enter", next, state.can_advance());

        match state.current_page() {
            WizardPage::KeyPair => {
                hint(&mut spans, "Tab", "Field", true);
                let running = state.keygen_status == KeyGenStatus::Running;
                hint(&mut spans, "Ctrl+G", "Generate", !running);
            }
            WizardPage::Connectivity => {
                let running = state.request_status == RequestStatus::Running;
                hint(&mut spans, "Ctrl+R", "Test", !running);
            }
            WizardPage::Welcome | WizardPage::Summary => {}
        }
        hint(&mut spans, "Esc", "Quit", true);

        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), inner);
    }
}

fn hint(spans: &mut Vec<Span<'static>>, key: &'static str, action: &str, active: bool) {
    if !spans.is_empty() {
        spans.push(Span::styled("  |  ", Style::default().fg(SUBDUED_BORDER)));
    }
    let (key_style, text_style) = if active {
        (Style::default().fg(GOLD), Style::default().fg(SOFT_WHITE))
    } else {
        (Style::default().fg(MUTED_GRAY), Style::default().fg(MUTED_GRAY))
    };
    spans.push(Span::styled("[", Style::default().fg(SUBDUED_BORDER)));
    spans.push(Span::styled(key, key_style));
    spans.push(Span::styled("]", Style::default().fg(SUBDUED_BORDER)));
    spans.push(Span::styled(format!(" {action}"), text_style));
}

impl Default for WizardComponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame, content and button row of one page
fn render_page(state: &AppState, id: PageId, page: &Page<WizardPage>, area: Rect, buf: &mut Buffer) {
    let kind = *page.content();
    let is_current = id == state.slider.current();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if is_current { CORNFLOWER_BLUE } else { SUBDUED_BORDER }))
        .style(Style::default().bg(PANEL_BG))
        .title(format!(" {} ", kind.title()))
        .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    match kind {
        WizardPage::Welcome => render_welcome(rows[0], buf),
        WizardPage::KeyPair => render_key_pair(state, rows[0], buf),
        WizardPage::Connectivity => render_connectivity(state, rows[0], buf),
        WizardPage::Summary => render_summary(state, rows[0], buf),
    }

    render_buttons(page, rows[1], buf);
}

fn button_span(label: &str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED_GRAY)
    };
    Span::styled(format!("[ {label} ]"), style)
}

fn render_buttons(page: &Page<WizardPage>, area: Rect, buf: &mut Buffer) {
    let previous = page.button(Direction::Previous);
    if previous.visible {
        Paragraph::new(Line::from(button_span(&previous.label, previous.enabled)))
            .alignment(Alignment::Left)
            .render(area, buf);
    }

    let next = page.button(Direction::Next);
    let right = if next.visible {
        Some(button_span(&next.label, next.enabled))
    } else if *page.content() == WizardPage::Summary {
        Some(button_span("Finish", true))
    } else {
        None
    };
    if let Some(span) = right {
        Paragraph::new(Line::from(span))
            .alignment(Alignment::Right)
            .render(area, buf);
    }
}

fn render_welcome(area: Rect, buf: &mut Buffer) {
    let mut lines: Vec<Line> = MASCOT
        .iter()
        .map(|line| Line::from(Span::styled(*line, Style::default().fg(GOLD))))
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Welcome to ", Style::default().fg(SOFT_WHITE)),
        Span::styled("AMDR", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::styled("!", Style::default().fg(SOFT_WHITE)),
    ]));
    lines.push(Line::from(""));
    for item in [
        "Generate an RSA key pair for the robot",
        "Check that the robot answers over HTTP",
    ] {
        lines.push(Line::from(vec![
            Span::styled("• ", Style::default().fg(CORNFLOWER_BLUE)),
            Span::styled(item, Style::default().fg(MUTED_GRAY)),
        ]));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_key_pair(state: &AppState, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(LayoutDirection::Vertical)
        .horizontal_margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(1),
        ])
        .split(area);

    for (field, row) in WizardPage::KeyPair.inputs().iter().zip(rows.iter()) {
        state.input(*field).render(*row, buf);
    }

    let options = state.config.key.options();
    let status = match &state.keygen_status {
        KeyGenStatus::Idle => Line::from(vec![
            Span::styled(
                format!("{}-bit RSA, e = {}. ", options.key_size, options.public_exponent),
                Style::default().fg(MUTED_GRAY),
            ),
            Span::styled("Ctrl+G", Style::default().fg(GOLD)),
            Span::styled(" to generate", Style::default().fg(MUTED_GRAY)),
        ]),
        KeyGenStatus::Running => Line::from(Span::styled(
            "⟳ Generating key pair...",
            Style::default().fg(WARNING_YELLOW),
        )),
        KeyGenStatus::Done { encrypted, .. } => Line::from(vec![
            Span::styled("✓ ", Style::default().fg(SELECTION_GREEN)),
            Span::styled("Key pair written", Style::default().fg(SOFT_WHITE)),
            Span::styled(
                if *encrypted { " (encrypted)" } else { " (unencrypted)" },
                Style::default().fg(MUTED_GRAY),
            ),
        ]),
        KeyGenStatus::Failed(reason) => Line::from(vec![
            Span::styled("✗ ", Style::default().fg(ERROR_RED)),
            Span::styled(reason.clone(), Style::default().fg(ERROR_RED)),
        ]),
    };

    let mut lines = vec![status];
    if let Some(message) = &state.error_message {
        lines.push(Line::from(Span::styled(message.clone(), Style::default().fg(WARNING_YELLOW))));
    }
    Paragraph::new(lines).wrap(Wrap { trim: true }).render(rows[3], buf);
}

fn render_connectivity(state: &AppState, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(LayoutDirection::Vertical)
        .horizontal_margin(1)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    state.input(InputField::Url).render(rows[0], buf);

    let lines = match &state.request_status {
        RequestStatus::Idle => vec![Line::from(vec![
            Span::styled("Ctrl+R", Style::default().fg(GOLD)),
            Span::styled(" to send a test request (optional)", Style::default().fg(MUTED_GRAY)),
        ])],
        RequestStatus::Running => vec![Line::from(Span::styled(
            "⟳ Contacting robot...",
            Style::default().fg(WARNING_YELLOW),
        ))],
        RequestStatus::Done(response) => {
            let (icon, color) = if response.is_success() {
                ("✓ ", SELECTION_GREEN)
            } else {
                ("! ", WARNING_YELLOW)
            };
            vec![
                Line::from(vec![
                    Span::styled(icon, Style::default().fg(color)),
                    Span::styled(format!("HTTP {}", response.status), Style::default().fg(SOFT_WHITE)),
                    Span::styled(format!(" from {}", response.url), Style::default().fg(MUTED_GRAY)),
                ]),
                Line::from(Span::styled(
                    response.body.lines().next().unwrap_or_default().to_string(),
                    Style::default().fg(MUTED_GRAY),
                )),
            ]
        }
        RequestStatus::Failed(error) => vec![Line::from(vec![
            Span::styled("✗ ", Style::default().fg(ERROR_RED)),
            Span::styled(error.to_string(), Style::default().fg(ERROR_RED)),
        ])],
    };

    Paragraph::new(lines).wrap(Wrap { trim: true }).render(rows[1], buf);
}

fn render_summary(state: &AppState, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "You're all set!",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let check = |done: bool| {
        if done {
            Span::styled("  ✓ ", Style::default().fg(SELECTION_GREEN))
        } else {
            Span::styled("  - ", Style::default().fg(MUTED_GRAY))
        }
    };

    let keys = match &state.keygen_status {
        KeyGenStatus::Done { private_file, .. } => private_file
            .as_ref()
            .map_or_else(|| "generated".to_string(), |p| p.display().to_string()),
        _ => "not generated".to_string(),
    };
    lines.push(Line::from(vec![
        check(matches!(state.keygen_status, KeyGenStatus::Done { .. })),
        Span::styled("Key pair: ", Style::default().fg(SOFT_WHITE)),
        Span::styled(keys, Style::default().fg(MUTED_GRAY)),
    ]));

    let connectivity = match &state.request_status {
        RequestStatus::Done(response) => format!("HTTP {}", response.status),
        RequestStatus::Failed(_) => "failed".to_string(),
        RequestStatus::Idle | RequestStatus::Running => "not tested".to_string(),
    };
    lines.push(Line::from(vec![
        check(matches!(&state.request_status, RequestStatus::Done(r) if r.is_success())),
        Span::styled("Robot: ", Style::default().fg(SOFT_WHITE)),
        Span::styled(connectivity, Style::default().fg(MUTED_GRAY)),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(MUTED_GRAY)),
        Span::styled("Enter", Style::default().fg(GOLD)),
        Span::styled(" to finish", Style::default().fg(MUTED_GRAY)),
    ]));

    Paragraph::new(lines).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_area_excludes_header_and_footer() {
        let area = Rect::new(0, 0, 80, 24);
        let slider = WizardComponent::slider_area(area);
        assert_eq!(slider.y, HEADER_HEIGHT);
        assert_eq!(slider.height, 24 - HEADER_HEIGHT - FOOTER_HEIGHT);
        assert_eq!(slider.width, 80);
    }
}
