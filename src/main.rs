// ABOUTME: Main entry point for the AMDR welcome wizard with TUI and CLI support
//
// Binary: amdr-welcome
// Usage: amdr-welcome [COMMAND]
// - No command: launches the wizard if it has not been completed
// - tui: launch the wizard (--reset to run it again)
// - keygen: generate an RSA key pair
// - request: send an HTTP request

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use std::{
    io::{self, IsTerminal},
    time::{Duration, Instant},
};
use tracing::{error, info, warn};

use amdr_welcome::app::{App, EventHandler};
use amdr_welcome::cli::{self, Commands, TuiArgs};
use amdr_welcome::components::WizardComponent;
use amdr_welcome::config::{OnboardingConfig, WelcomeConfig};
use amdr_welcome::slider::Size;

/// Redraw interval while a page is sliding
const ANIMATION_TICK: Duration = Duration::from_millis(16);
/// Redraw interval when idle
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Unified terminal cleanup that works with a terminal instance
fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = cli::Cli::parse();

    let result = match args.command {
        Some(Commands::Keygen(keygen_args)) => cli::keygen::execute(keygen_args, args.format).await,
        Some(Commands::Request(request_args)) => {
            cli::request::execute(request_args, args.format).await
        }

        // TUI mode (explicit or default)
        Some(Commands::Tui(tui_args)) => run_wizard(tui_args).await,
        None => run_wizard(TuiArgs::default()).await,
    };

    // Ensure terminal is cleaned up on any error
    if result.is_err() {
        cleanup_terminal();
    }

    result
}

async fn run_wizard(args: TuiArgs) -> Result<()> {
    let config = WelcomeConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {:#}", e);
        WelcomeConfig::default()
    });

    let onboarding_path = OnboardingConfig::config_path()?;
    let onboarding = OnboardingConfig::load_from(&onboarding_path)?;

    if !args.reset && !onboarding.needs_welcome() {
        info!("Welcome wizard already completed");
        println!("Setup already completed. Run `amdr-welcome tui --reset` to go through it again.");
        return Ok(());
    }

    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    let container = slider_container(Rect::new(0, 0, width, height));
    let mut app = App::new(config, onboarding, onboarding_path, container);

    info!("Starting welcome wizard (reset: {})", args.reset);
    run_tui(&mut app).await
}

/// Slider container for a frame of `area`
fn slider_container(area: Rect) -> Size {
    let slider = WizardComponent::slider_area(area);
    Size::new(slider.width, slider.height)
}

async fn run_tui(app: &mut App) -> Result<()> {
    // Check if we have a proper TTY
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Try running directly in a terminal instead of redirecting output."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Ensure terminal cleanup happens even if there's an error
    let result = run_tui_loop(app, &mut terminal).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    if app.state.finished {
        println!("Setup complete.");
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let wizard = WizardComponent::new();
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        app.animate(now - last_frame);
        last_frame = now;

        terminal.draw(|frame| {
            let area = frame.size();
            app.state.sync_container(slider_container(area));
            wizard.render(frame, area, &app.state);
        })?;

        let tick_rate = if app.state.slider.is_transitioning() {
            ANIMATION_TICK
        } else {
            IDLE_TICK
        };

        if event::poll(tick_rate)? {
            if let Event::Key(key_event) = event::read()? {
                if let Some(app_event) = EventHandler::handle_key_event(key_event, &mut app.state) {
                    EventHandler::process_event(app_event, &mut app.state);
                }
            }
        }

        app.tick().await.context("Failed to process wizard action")?;

        if app.state.should_quit {
            break;
        }
    }

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::prelude::*;

    // Create log directory if it doesn't exist
    let log_dir = std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".amdr-welcome").join("logs"))
        .unwrap_or_else(|_| PathBuf::from(".amdr-welcome/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    // Create JSONL log file with timestamp
    let log_file = log_dir.join(format!(
        "amdr-welcome-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        eprintln!("Failed to create log file {}, logging disabled", log_file.display());
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amdr_welcome=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
