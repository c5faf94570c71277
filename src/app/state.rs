// ABOUTME: Application state for the welcome wizard
// Wires the page slider, text inputs and background tasks together

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::components::LabeledTextInput;
use crate::config::{OnboardingConfig, WelcomeConfig};
use crate::http::{self, HttpError, HttpEvent, HttpRequester, HttpResponse, RequestOptions};
use crate::keygen::{KeyGenEvent, KeyGenOverrides, KeyPairGenerator};
use crate::slider::{
    AppendOptions, Direction, NavOutcome, PageId, ResizeEvent, Size, SliderController,
    SliderEvent, SliderOptions,
};

/// Timeout applied to the connectivity probe
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Pages of the wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPage {
    Welcome,
    KeyPair,
    Connectivity,
    Summary,
}

impl WizardPage {
    pub const fn all() -> &'static [Self] {
        &[Self::Welcome, Self::KeyPair, Self::Connectivity, Self::Summary]
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::KeyPair => "Key Pair",
            Self::Connectivity => "Connectivity",
            Self::Summary => "Summary",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Welcome => "Let's get your robot set up",
            Self::KeyPair => "Generate an RSA key pair",
            Self::Connectivity => "Check that the robot is reachable",
            Self::Summary => "You're all set!",
        }
    }

    /// Size the page would like, clamped to the container when drawn
    pub const fn preferred_size(self) -> Size {
        match self {
            Self::KeyPair => Size::new(68, 22),
            Self::Connectivity => Size::new(68, 16),
            Self::Welcome | Self::Summary => Size::new(68, 18),
        }
    }

    /// Inputs on this page, in focus order
    pub const fn inputs(self) -> &'static [InputField] {
        match self {
            Self::KeyPair => &[InputField::Password, InputField::PrivateFile, InputField::PublicFile],
            Self::Connectivity => &[InputField::Url],
            Self::Welcome | Self::Summary => &[],
        }
    }
}

/// Text inputs owned by the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Password,
    PrivateFile,
    PublicFile,
    Url,
}

/// Progress of the key pair page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyGenStatus {
    #[default]
    Idle,
    Running,
    Done {
        private_file: Option<PathBuf>,
        public_file: Option<PathBuf>,
        encrypted: bool,
    },
    Failed(String),
}

/// Progress of the connectivity page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Running,
    Done(HttpResponse),
    Failed(HttpError),
}

/// Work the UI loop hands to `App::tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncAction {
    GenerateKeys,
    SendRequest,
    Finish,
}

/// Slider ids of the wizard pages
#[derive(Debug, Clone, Copy)]
pub struct PageIds {
    pub welcome: PageId,
    pub key_pair: PageId,
    pub connectivity: PageId,
    pub summary: PageId,
}

#[derive(Debug)]
pub struct AppState {
    pub slider: SliderController<WizardPage>,
    pub pages: PageIds,
    pub password: LabeledTextInput,
    pub private_file: LabeledTextInput,
    pub public_file: LabeledTextInput,
    pub url: LabeledTextInput,
    pub focus: Option<InputField>,
    pub keygen_status: KeyGenStatus,
    pub request_status: RequestStatus,
    pub pending_async_action: Option<AsyncAction>,
    pub error_message: Option<String>,
    pub config: WelcomeConfig,
    /// Re-running an already completed wizard
    pub is_reset: bool,
    pub should_quit: bool,
    pub finished: bool,
    url_changes: mpsc::UnboundedReceiver<String>,
    key_field_changes: Vec<mpsc::UnboundedReceiver<String>>,
}

impl AppState {
    pub fn new(config: WelcomeConfig, container: Size) -> Self {
        let duration = config.slide_duration();
        let page_options = |page: WizardPage| {
            AppendOptions::default()
                .with_size(page.preferred_size().clamp_to(container))
                .with_duration(duration)
        };

        let mut slider = SliderController::new(
            WizardPage::Welcome,
            container,
            SliderOptions {
                slide_duration: duration,
                size: WizardPage::Welcome.preferred_size().clamp_to(container),
                ..SliderOptions::default()
            },
        );
        let welcome = slider.head();
        let pages = Self::build_chain(&mut slider, welcome, page_options);

        let mut password = LabeledTextInput::new("Password (leave empty for no encryption)", "").masked();
        let mut private_file = LabeledTextInput::new(
            "Private key file",
            config.key.private_file.display().to_string(),
        );
        let mut public_file = LabeledTextInput::new(
            "Public key file",
            config.key.public_file.display().to_string(),
        );
        let mut url = LabeledTextInput::new("Robot URL", config.connectivity_url.clone());

        let key_field_changes = vec![
            password.subscribe(),
            private_file.subscribe(),
            public_file.subscribe(),
        ];
        let url_changes = url.subscribe();

        Self {
            slider,
            pages,
            password,
            private_file,
            public_file,
            url,
            focus: None,
            keygen_status: KeyGenStatus::Idle,
            request_status: RequestStatus::Idle,
            pending_async_action: None,
            error_message: None,
            config,
            is_reset: false,
            should_quit: false,
            finished: false,
            url_changes,
            key_field_changes,
        }
    }

    fn build_chain(
        slider: &mut SliderController<WizardPage>,
        welcome: PageId,
        options: impl Fn(WizardPage) -> AppendOptions,
    ) -> PageIds {
        let mut push = |page: WizardPage| slider.push(page, options(page));
        let key_pair = push(WizardPage::KeyPair);
        let connectivity = push(WizardPage::Connectivity);
        let summary = push(WizardPage::Summary);

        // Keys must exist before leaving the key pair page
        if let Err(e) = slider.set_navigation_enabled(key_pair, Direction::Next, false) {
            error!("Failed to lock key pair page: {}", e);
        }

        PageIds {
            welcome,
            key_pair,
            connectivity,
            summary,
        }
    }

    /// Page at rest in the centre
    pub fn current_page(&self) -> WizardPage {
        self.page_at(self.slider.current())
    }

    pub fn page_at(&self, id: PageId) -> WizardPage {
        self.slider
            .page(id)
            .map_or(WizardPage::Welcome, |page| *page.content())
    }

    /// 0-based position of the current page in the chain
    pub fn step_index(&self) -> usize {
        let current = self.slider.current();
        self.slider
            .chain()
            .iter()
            .position(|id| *id == current)
            .unwrap_or(0)
    }

    pub fn is_final_step(&self) -> bool {
        self.current_page() == WizardPage::Summary
    }

    pub fn can_go_back(&self) -> bool {
        self.slider
            .page(self.slider.current())
            .is_ok_and(|page| page.button(Direction::Previous).is_clickable())
    }

    pub fn can_advance(&self) -> bool {
        self.is_final_step()
            || self
                .slider
                .page(self.slider.current())
                .is_ok_and(|page| page.button(Direction::Next).is_clickable())
    }

    pub const fn input(&self, field: InputField) -> &LabeledTextInput {
        match field {
            InputField::Password => &self.password,
            InputField::PrivateFile => &self.private_file,
            InputField::PublicFile => &self.public_file,
            InputField::Url => &self.url,
        }
    }

    pub fn input_mut(&mut self, field: InputField) -> &mut LabeledTextInput {
        match field {
            InputField::Password => &mut self.password,
            InputField::PrivateFile => &mut self.private_file,
            InputField::PublicFile => &mut self.public_file,
            InputField::Url => &mut self.url,
        }
    }

    pub fn focused_input_mut(&mut self) -> Option<&mut LabeledTextInput> {
        let field = self.focus?;
        Some(self.input_mut(field))
    }

    fn set_focus(&mut self, focus: Option<InputField>) {
        for field in [
            InputField::Password,
            InputField::PrivateFile,
            InputField::PublicFile,
            InputField::Url,
        ] {
            self.input_mut(field).set_focused(Some(field) == focus);
        }
        self.focus = focus;
    }

    /// Cycle focus through the current page's inputs
    pub fn focus_next(&mut self) {
        self.cycle_focus(true);
    }

    pub fn focus_previous(&mut self) {
        self.cycle_focus(false);
    }

    fn cycle_focus(&mut self, forward: bool) {
        let inputs = self.current_page().inputs();
        if inputs.is_empty() {
            self.set_focus(None);
            return;
        }

        let len = inputs.len();
        let next = match self.focus.and_then(|f| inputs.iter().position(|i| *i == f)) {
            Some(idx) if forward => (idx + 1) % len,
            Some(idx) => (idx + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.set_focus(Some(inputs[next]));
    }

    /// Next button; on the last page this finishes the wizard
    pub fn go_next(&mut self) -> NavOutcome {
        if self.slider.is_transitioning() {
            return NavOutcome::Busy;
        }
        if self.is_final_step() {
            self.pending_async_action = Some(AsyncAction::Finish);
            return NavOutcome::NoNeighbour;
        }

        let outcome = self.click(Direction::Next);
        if outcome == NavOutcome::Blocked && self.current_page() == WizardPage::KeyPair {
            self.error_message = Some("Generate a key pair first (Ctrl+G)".to_string());
        }
        outcome
    }

    pub fn go_previous(&mut self) -> NavOutcome {
        self.click(Direction::Previous)
    }

    fn click(&mut self, direction: Direction) -> NavOutcome {
        let current = self.slider.current();
        match self.slider.click(current, direction) {
            Ok(outcome) => {
                if matches!(outcome, NavOutcome::Started { .. }) {
                    self.set_focus(None);
                    self.error_message = None;
                }
                outcome
            }
            Err(e) => {
                error!("Navigation failed: {}", e);
                NavOutcome::Blocked
            }
        }
    }

    /// A slide finished; focus the first input of the page that arrived
    pub fn on_slider_event(&mut self, event: SliderEvent) {
        if let SliderEvent::TransitionFinished { to, .. } = event {
            let page = self.page_at(to);
            info!("Now showing {} page", page.title());
            self.set_focus(page.inputs().first().copied());
        }
    }

    /// Keep the slider container in step with the drawable area
    pub fn sync_container(&mut self, size: Size) {
        let old = self.slider.container();
        if old == size {
            return;
        }

        self.slider.resize(ResizeEvent::new(size, old));
        for id in self.slider.chain() {
            let preferred = self.page_at(id).preferred_size().clamp_to(size);
            if let Err(e) = self.slider.set_content_size(id, preferred) {
                warn!("Failed to resize page {:?}: {}", id, e);
            }
        }
    }

    /// React to edits made since the last call
    pub fn drain_input_changes(&mut self) {
        while let Ok(url) = self.url_changes.try_recv() {
            debug!("Robot URL changed to {}", url);
            if self.request_status != RequestStatus::Running {
                self.request_status = RequestStatus::Idle;
            }
        }

        for rx in &mut self.key_field_changes {
            while rx.try_recv().is_ok() {
                self.error_message = None;
            }
        }
    }

    /// Values typed on the key pair page
    pub fn keygen_overrides(&self) -> KeyGenOverrides {
        let path = |input: &LabeledTextInput| {
            let text = input.text().trim();
            (!text.is_empty()).then(|| PathBuf::from(text))
        };

        KeyGenOverrides {
            password: Some(self.password.text().to_string()),
            options: Some(self.config.key.options()),
            private_file: path(&self.private_file),
            public_file: path(&self.public_file),
        }
    }

    pub fn apply_keygen_event(&mut self, event: KeyGenEvent) {
        match event {
            KeyGenEvent::Completed { request, .. } => {
                self.keygen_status = KeyGenStatus::Done {
                    encrypted: request.encryption_password().is_some(),
                    private_file: request.private_file,
                    public_file: request.public_file,
                };
                self.error_message = None;
                if let Err(e) =
                    self.slider
                        .set_navigation_enabled(self.pages.key_pair, Direction::Next, true)
                {
                    error!("Failed to unlock key pair page: {}", e);
                }
            }
            KeyGenEvent::Failed(e) => {
                self.keygen_status = KeyGenStatus::Failed(e.to_string());
            }
        }
    }

    pub fn apply_http_event(&mut self, event: HttpEvent) {
        self.request_status = match event {
            HttpEvent::Completed(response) => RequestStatus::Done(response),
            HttpEvent::Failed(e) => RequestStatus::Failed(e),
        };
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(WelcomeConfig::default(), Size::new(80, 24))
    }
}

/// State plus the background workers feeding it
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    generator: KeyPairGenerator,
    keygen_events: mpsc::UnboundedReceiver<KeyGenEvent>,
    requester: HttpRequester,
    http_events: mpsc::UnboundedReceiver<HttpEvent>,
    slider_events: mpsc::UnboundedReceiver<SliderEvent>,
    onboarding: OnboardingConfig,
    onboarding_path: PathBuf,
}

impl App {
    pub fn new(
        config: WelcomeConfig,
        onboarding: OnboardingConfig,
        onboarding_path: PathBuf,
        container: Size,
    ) -> Self {
        let method = http::parse_method(&config.connectivity_method).unwrap_or_else(|e| {
            warn!("{}, falling back to GET", e);
            reqwest::Method::GET
        });
        let (requester, http_events) = HttpRequester::from_url(config.connectivity_url.clone(), method);
        let (generator, keygen_events) = KeyPairGenerator::new(config.key.request());

        let mut state = AppState::new(config, container);
        state.is_reset = onboarding.completed;
        let slider_events = state.slider.subscribe();

        Self {
            state,
            generator,
            keygen_events,
            requester,
            http_events,
            slider_events,
            onboarding,
            onboarding_path,
        }
    }

    /// Advance page animations by `dt`
    pub fn animate(&mut self, dt: Duration) {
        self.state.slider.tick(dt);
    }

    /// Run queued actions and fold finished background work into the state
    pub async fn tick(&mut self) -> Result<()> {
        if let Some(action) = self.state.pending_async_action.take() {
            self.run_action(action)?;
        }

        while let Ok(event) = self.slider_events.try_recv() {
            self.state.on_slider_event(event);
        }
        while let Ok(event) = self.keygen_events.try_recv() {
            self.state.apply_keygen_event(event);
        }
        while let Ok(event) = self.http_events.try_recv() {
            self.state.apply_http_event(event);
        }
        self.state.drain_input_changes();

        Ok(())
    }

    fn run_action(&mut self, action: AsyncAction) -> Result<()> {
        match action {
            AsyncAction::GenerateKeys => {
                if self.state.keygen_status == KeyGenStatus::Running {
                    debug!("Key generation already running");
                    return Ok(());
                }
                self.state.keygen_status = KeyGenStatus::Running;
                let generator = self.generator.clone();
                let overrides = self.state.keygen_overrides();
                tokio::spawn(async move {
                    generator.gen_key(overrides).await;
                });
            }
            AsyncAction::SendRequest => {
                if self.state.request_status == RequestStatus::Running {
                    debug!("Request already in flight");
                    return Ok(());
                }
                self.state.request_status = RequestStatus::Running;
                let requester = self.requester.clone();
                let url = self.state.url.text().to_string();
                tokio::spawn(async move {
                    let options = RequestOptions {
                        timeout: Some(REQUEST_TIMEOUT),
                        ..RequestOptions::default()
                    };
                    requester.make_request(Some(&url), None, options).await;
                });
            }
            AsyncAction::Finish => {
                self.onboarding.mark_completed();
                self.onboarding.generated_keys =
                    matches!(self.state.keygen_status, KeyGenStatus::Done { .. });
                self.onboarding.last_connectivity_status = match &self.state.request_status {
                    RequestStatus::Done(response) => Some(response.status),
                    _ => None,
                };
                self.onboarding.save_to(&self.onboarding_path)?;
                info!("Welcome wizard completed");
                self.state.finished = true;
                self.state.should_quit = true;
            }
        }
        Ok(())
    }

    pub const fn onboarding(&self) -> &OnboardingConfig {
        &self.onboarding
    }
}
