// ABOUTME: UI tests for the wizard screen using headless rendering

use std::path::PathBuf;
use std::time::Duration;

use amdr_welcome::app::state::{KeyGenStatus, WizardPage};
use amdr_welcome::app::AppState;
use amdr_welcome::components::WizardComponent;
use amdr_welcome::slider::{Direction, Size};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

struct UITestFramework {
    state: AppState,
    terminal: Terminal<TestBackend>,
    wizard: WizardComponent,
}

impl UITestFramework {
    fn new(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).unwrap();
        let slider = WizardComponent::slider_area(Rect::new(0, 0, width, height));
        let state = AppState::new(
            Default::default(),
            Size::new(slider.width, slider.height),
        );

        Self {
            state,
            terminal,
            wizard: WizardComponent::new(),
        }
    }

    fn render(&mut self) -> String {
        buffer_text(&self.render_buffer())
    }

    fn render_buffer(&mut self) -> Buffer {
        let state = &self.state;
        let wizard = &self.wizard;
        self.terminal
            .draw(|frame| wizard.render(frame, frame.size(), state))
            .unwrap();
        self.terminal.backend().buffer().clone()
    }

    /// Only the rows the pages slide in
    fn render_pages(&mut self) -> String {
        let area = self.terminal.size().unwrap();
        let slider = WizardComponent::slider_area(area);
        self.render()
            .lines()
            .skip(slider.y as usize)
            .take(slider.height as usize)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn slide(&mut self, direction: Direction, elapsed: Duration) {
        match direction {
            Direction::Next => self.state.go_next(),
            Direction::Previous => self.state.go_previous(),
        };
        for event in self.state.slider.tick(elapsed) {
            self.state.on_slider_event(event);
        }
    }
}

fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            text.push_str(buf.get(x, y).symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn test_welcome_page_renders() {
    let mut ui = UITestFramework::new(80, 24);
    let screen = ui.render();
    assert!(screen.contains("AMDR Setup Wizard"));
    assert!(screen.contains("Esc"));

    let pages = ui.render_pages();
    assert!(pages.contains(" Welcome "));
    assert!(pages.contains("[ Next ]"));
    assert!(!pages.contains("[ Previous ]"));
    // Other pages are parked off-screen
    assert!(!pages.contains("Key Pair"));
}

#[test]
fn test_key_pair_page_renders_inputs() {
    let mut ui = UITestFramework::new(80, 30);
    ui.slide(Direction::Next, Duration::from_secs(5));
    assert_eq!(ui.state.current_page(), WizardPage::KeyPair);

    ui.state.password.set_text("abc");
    let screen = ui.render();

    assert!(screen.contains(" Key Pair "));
    assert!(screen.contains("[ Previous ]"));
    assert!(screen.contains("Private key file"));
    assert!(screen.contains("•••"));
    assert!(!screen.contains("abc"));
    assert!(screen.contains("Ctrl+G"));
}

#[test]
fn test_both_pages_visible_mid_slide() {
    let mut ui = UITestFramework::new(80, 24);
    ui.slide(Direction::Next, Duration::from_millis(500));
    assert!(ui.state.slider.is_transitioning());

    // 68-wide pages in an 80-wide container, both halfway across
    let buf = ui.render_buffer();
    let top = WizardComponent::slider_area(buf.area).y;
    assert_eq!(buf.get(33, top).symbol(), "╮");
    assert_eq!(buf.get(46, top).symbol(), "╭");

    let pages = ui.render_pages();
    assert!(pages.contains(" Key Pair "));
    assert!(!pages.contains(" Welcome "));
}

#[test]
fn test_tiny_terminal_does_not_panic() {
    let mut ui = UITestFramework::new(20, 8);
    ui.render();
    ui.slide(Direction::Next, Duration::from_millis(300));
    ui.render();
}

#[test]
fn test_summary_lists_generated_key_file() {
    let mut ui = UITestFramework::new(80, 30);
    ui.state
        .slider
        .set_navigation_enabled(ui.state.pages.key_pair, Direction::Next, true)
        .unwrap();
    for _ in 0..3 {
        ui.slide(Direction::Next, Duration::from_secs(5));
    }
    assert_eq!(ui.state.current_page(), WizardPage::Summary);

    ui.state.keygen_status = KeyGenStatus::Done {
        private_file: Some(PathBuf::from("robot.pem")),
        public_file: None,
        encrypted: false,
    };
    let pages = ui.render_pages();
    assert!(pages.contains("Key pair: robot.pem"));
    assert!(pages.contains("Robot: not tested"));
    assert!(pages.contains("[ Finish ]"));

    ui.state.keygen_status = KeyGenStatus::Done {
        private_file: None,
        public_file: None,
        encrypted: false,
    };
    assert!(ui.render_pages().contains("Key pair: generated"));
}
