// ABOUTME: Event handling system for keyboard input and wizard actions

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::app::state::{AppState, AsyncAction, WizardPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    NextPage,
    PreviousPage,
    FocusNext,
    FocusPrevious,
    GenerateKeys,
    SendRequest,
    // Editing the focused input
    InputChar(char),
    InputBackspace,
    InputDelete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key_event.kind == KeyEventKind::Release {
            return None;
        }

        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        let editing = state.focus.is_some();

        match key_event.code {
            KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('c') if ctrl => Some(AppEvent::Quit),
            KeyCode::Char('g') if ctrl => {
                (state.current_page() == WizardPage::KeyPair).then_some(AppEvent::GenerateKeys)
            }
            KeyCode::Char('r') if ctrl => {
                (state.current_page() == WizardPage::Connectivity).then_some(AppEvent::SendRequest)
            }
            KeyCode::Enter => Some(AppEvent::NextPage),
            KeyCode::Tab => Some(AppEvent::FocusNext),
            KeyCode::BackTab => Some(AppEvent::PreviousPage),

            // Arrows move the cursor while typing, otherwise they page
            KeyCode::Left if editing => Some(AppEvent::CursorLeft),
            KeyCode::Right if editing => Some(AppEvent::CursorRight),
            KeyCode::Left => Some(AppEvent::PreviousPage),
            KeyCode::Right => Some(AppEvent::NextPage),
            KeyCode::Up if editing => Some(AppEvent::FocusPrevious),
            KeyCode::Down if editing => Some(AppEvent::FocusNext),

            KeyCode::Home if editing => Some(AppEvent::CursorHome),
            KeyCode::End if editing => Some(AppEvent::CursorEnd),
            KeyCode::Backspace if editing => Some(AppEvent::InputBackspace),
            KeyCode::Delete if editing => Some(AppEvent::InputDelete),
            KeyCode::Char(c) if editing && !ctrl => Some(AppEvent::InputChar(c)),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => {
                info!("Quit requested from {} page", state.current_page().title());
                state.should_quit = true;
            }
            AppEvent::NextPage => {
                let outcome = state.go_next();
                debug!("Next: {:?}", outcome);
            }
            AppEvent::PreviousPage => {
                let outcome = state.go_previous();
                debug!("Previous: {:?}", outcome);
            }
            AppEvent::FocusNext => state.focus_next(),
            AppEvent::FocusPrevious => state.focus_previous(),
            AppEvent::GenerateKeys => {
                // Mark for async processing
                state.pending_async_action = Some(AsyncAction::GenerateKeys);
            }
            AppEvent::SendRequest => {
                state.pending_async_action = Some(AsyncAction::SendRequest);
            }
            AppEvent::InputChar(c) => {
                if let Some(input) = state.focused_input_mut() {
                    input.input_char(c);
                }
            }
            AppEvent::InputBackspace => {
                if let Some(input) = state.focused_input_mut() {
                    input.backspace();
                }
            }
            AppEvent::InputDelete => {
                if let Some(input) = state.focused_input_mut() {
                    input.delete();
                }
            }
            AppEvent::CursorLeft => {
                if let Some(input) = state.focused_input_mut() {
                    input.cursor_left();
                }
            }
            AppEvent::CursorRight => {
                if let Some(input) = state.focused_input_mut() {
                    input.cursor_right();
                }
            }
            AppEvent::CursorHome => {
                if let Some(input) = state.focused_input_mut() {
                    input.cursor_home();
                }
            }
            AppEvent::CursorEnd => {
                if let Some(input) = state.focused_input_mut() {
                    input.cursor_end();
                }
            }
        }
    }
}
