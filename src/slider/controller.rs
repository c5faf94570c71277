// ABOUTME: Slider controller owning the page arena
// Drives page transitions and keeps pages centred when the container resizes

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::animation::{ParallelGroup, PositionAnimation};
use super::page::{Direction, NavButton, Page, PageId, Position, Size};

/// Errors raised by slider operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SliderError {
    /// The id does not belong to this controller
    #[error("Unknown page: {0:?}")]
    UnknownPage(PageId),
}

/// Result type for slider operations
pub type SliderResult<T> = Result<T, SliderError>;

/// What a navigation request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// A transition is now running
    Started { from: PageId, to: PageId },
    /// No page in that direction, nothing happened
    NoNeighbour,
    /// Another transition is still running, request ignored
    Busy,
    /// Button hidden or disabled, click ignored
    Blocked,
}

/// Notifications published to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderEvent {
    TransitionStarted { from: PageId, to: PageId },
    TransitionFinished { from: PageId, to: PageId },
}

/// Container geometry change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    pub width: u16,
    pub height: u16,
    pub old_width: u16,
    pub old_height: u16,
}

impl ResizeEvent {
    pub const fn new(size: Size, old: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            old_width: old.width,
            old_height: old.height,
        }
    }

    /// Horizontal scale factor, 1.0 when the old width gives no usable ratio
    pub fn ratio(&self) -> f64 {
        if self.old_width == 0 {
            return 1.0;
        }
        let ratio = f64::from(self.width) / f64::from(self.old_width);
        if ratio.is_finite() && ratio >= 0.0 {
            ratio
        } else {
            1.0
        }
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Settings for the first page and defaults for later ones
#[derive(Debug, Clone)]
pub struct SliderOptions {
    pub slide_duration: Duration,
    pub next_label: String,
    pub previous_label: String,
    pub size: Size,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            slide_duration: Duration::from_millis(1000),
            next_label: "Next".to_string(),
            previous_label: "Previous".to_string(),
            size: Size::new(60, 16),
        }
    }
}

/// Settings for a page created by `append`
#[derive(Debug, Clone)]
pub struct AppendOptions {
    /// Show the previous button on the new page
    pub allow_previous: bool,
    /// Replace the successor of the given page instead of appending at the tail
    pub override_existing: bool,
    /// Falls back to the controller default
    pub slide_duration: Option<Duration>,
    pub next_label: String,
    pub previous_label: String,
    /// Falls back to the controller's page size
    pub size: Option<Size>,
}

impl Default for AppendOptions {
    fn default() -> Self {
        let base = SliderOptions::default();
        Self {
            allow_previous: true,
            override_existing: false,
            slide_duration: None,
            next_label: base.next_label,
            previous_label: base.previous_label,
            size: None,
        }
    }
}

impl AppendOptions {
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn without_previous(mut self) -> Self {
        self.allow_previous = false;
        self
    }

    pub fn overriding(mut self) -> Self {
        self.override_existing = true;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.slide_duration = Some(duration);
        self
    }
}

#[derive(Debug)]
struct Transition {
    from: PageId,
    to: PageId,
    group: ParallelGroup,
}

/// Owns every page of one wizard and the transition between them
#[derive(Debug)]
pub struct SliderController<C> {
    pages: Vec<Page<C>>,
    head: PageId,
    current: PageId,
    /// Most recently appended page; resize propagation walks back from here
    anchor: PageId,
    container: Size,
    default_duration: Duration,
    default_size: Size,
    transition: Option<Transition>,
    listeners: Vec<mpsc::UnboundedSender<SliderEvent>>,
}

impl<C> SliderController<C> {
    /// Create a slider showing `content` centred in `container`
    pub fn new(content: C, container: Size, options: SliderOptions) -> Self {
        let head = PageId(0);
        let mut page = Page {
            content,
            size: options.size,
            next: None,
            previous: None,
            offset: 0.0,
            display_offset: 0.0,
            position: Position::default(),
            next_button: NavButton::new(options.next_label, false),
            previous_button: NavButton::new(options.previous_label, false),
            slide_duration: options.slide_duration,
        };
        page.recenter(container);

        Self {
            pages: vec![page],
            head,
            current: head,
            anchor: head,
            container,
            default_duration: options.slide_duration,
            default_size: options.size,
            transition: None,
            listeners: Vec::new(),
        }
    }

    pub fn page(&self, id: PageId) -> SliderResult<&Page<C>> {
        self.pages.get(id.0).ok_or(SliderError::UnknownPage(id))
    }

    pub fn page_mut(&mut self, id: PageId) -> SliderResult<&mut Page<C>> {
        self.pages.get_mut(id.0).ok_or(SliderError::UnknownPage(id))
    }

    pub const fn head(&self) -> PageId {
        self.head
    }

    /// Page currently at rest in the centre
    pub const fn current(&self) -> PageId {
        self.current
    }

    pub const fn container(&self) -> Size {
        self.container
    }

    pub const fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Number of pages ever created, detached ones included
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Ids of the linked chain starting at the head
    pub fn chain(&self) -> Vec<PageId> {
        let mut ids = Vec::new();
        let mut cursor = Some(self.head);
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.pages[id.0].next;
        }
        ids
    }

    /// Last page of the chain reachable from `from`
    pub fn tail_of(&self, from: PageId) -> SliderResult<PageId> {
        let mut id = from;
        while let Some(next) = self.page(id)?.next {
            id = next;
        }
        Ok(id)
    }

    /// Every page in the arena with its id
    pub fn iter(&self) -> impl Iterator<Item = (PageId, &Page<C>)> {
        self.pages.iter().enumerate().map(|(idx, page)| (PageId(idx), page))
    }

    /// Register an observer for transition notifications
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SliderEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    /// Add a page after `from`, or after the tail of its chain unless `override_existing`
    pub fn append(&mut self, from: PageId, content: C, options: AppendOptions) -> SliderResult<PageId> {
        let parent = if options.override_existing {
            self.page(from)?;
            from
        } else {
            self.tail_of(from)?
        };
        Ok(self.link(parent, content, options))
    }

    /// Add a page at the tail of the head's chain
    pub fn push(&mut self, content: C, options: AppendOptions) -> PageId {
        let tail = self.chain().last().copied().unwrap_or(self.head);
        self.link(tail, content, options)
    }

    fn link(&mut self, parent: PageId, content: C, options: AppendOptions) -> PageId {
        // A replaced successor is cut loose; it keeps its slot in the arena
        if let Some(orphan) = self.pages[parent.0].next.take() {
            debug!("Detaching page {:?} from {:?}", orphan, parent);
            let orphan = &mut self.pages[orphan.0];
            orphan.previous = None;
            orphan.previous_button.visible = false;
        }

        let id = PageId(self.pages.len());
        let offset = f64::from(self.container.width);
        let mut page = Page {
            content,
            size: options.size.unwrap_or(self.default_size),
            next: None,
            previous: Some(parent),
            offset,
            display_offset: offset,
            position: Position::default(),
            next_button: NavButton::new(options.next_label, false),
            previous_button: NavButton::new(options.previous_label, options.allow_previous),
            slide_duration: options.slide_duration.unwrap_or(self.default_duration),
        };
        page.recenter(self.container);
        self.pages.push(page);

        let parent_page = &mut self.pages[parent.0];
        parent_page.next = Some(id);
        parent_page.next_button.visible = true;
        self.anchor = id;

        debug!("Appended page {:?} after {:?} at offset {}", id, parent, offset);
        id
    }

    /// Slide `page` out to the left and its successor into the centre
    pub fn advance(&mut self, page: PageId) -> SliderResult<NavOutcome> {
        self.start_transition(page, Direction::Next)
    }

    /// Slide `page` out to the right and its predecessor into the centre
    pub fn retreat(&mut self, page: PageId) -> SliderResult<NavOutcome> {
        self.start_transition(page, Direction::Previous)
    }

    /// Button click on `page`; hidden or disabled buttons do nothing
    pub fn click(&mut self, page: PageId, direction: Direction) -> SliderResult<NavOutcome> {
        if !self.page(page)?.button(direction).is_clickable() {
            debug!("Ignoring click on inactive {:?} button of {:?}", direction, page);
            return Ok(NavOutcome::Blocked);
        }
        self.start_transition(page, direction)
    }

    fn start_transition(&mut self, from: PageId, direction: Direction) -> SliderResult<NavOutcome> {
        let Some(to) = self.page(from)?.neighbour(direction) else {
            return Ok(NavOutcome::NoNeighbour);
        };

        if let Some(running) = &self.transition {
            warn!(
                "Transition {:?} -> {:?} still running, ignoring {:?} from {:?}",
                running.from, running.to, direction, from
            );
            return Ok(NavOutcome::Busy);
        }

        let width = f64::from(self.container.width);
        let shift = match direction {
            Direction::Next => -width,
            Direction::Previous => width,
        };
        let duration = self.pages[from.0].slide_duration;

        let leaving = &mut self.pages[from.0];
        let leaving_start = leaving.display_offset;
        leaving.offset += shift;
        let leaving_end = leaving.offset;

        let arriving = &mut self.pages[to.0];
        let arriving_start = arriving.display_offset;
        arriving.offset = 0.0;

        let mut group = ParallelGroup::new();
        group.add(PositionAnimation::new(from, leaving_start, leaving_end, duration));
        group.add(PositionAnimation::new(to, arriving_start, 0.0, duration));
        self.transition = Some(Transition { from, to, group });

        info!("Sliding {:?} -> {:?} over {:?}", from, to, duration);
        self.emit(SliderEvent::TransitionStarted { from, to });
        Ok(NavOutcome::Started { from, to })
    }

    /// Step the running transition; returns the notifications it produced
    pub fn tick(&mut self, dt: Duration) -> Vec<SliderEvent> {
        let Some(transition) = self.transition.as_mut() else {
            return Vec::new();
        };

        transition.group.step(dt);
        for animation in transition.group.animations() {
            let page = &mut self.pages[animation.target().0];
            page.display_offset = animation.value();
            page.recenter(self.container);
        }

        if !transition.group.is_finished() {
            return Vec::new();
        }

        let (from, to) = (transition.from, transition.to);
        self.transition = None;
        self.current = to;
        debug!("Transition {:?} -> {:?} finished", from, to);

        let event = SliderEvent::TransitionFinished { from, to };
        self.emit(event);
        vec![event]
    }

    pub fn set_navigation_enabled(
        &mut self,
        page: PageId,
        direction: Direction,
        enabled: bool,
    ) -> SliderResult<()> {
        self.page_mut(page)?.button_mut(direction).enabled = enabled;
        Ok(())
    }

    /// Flip a button's enabled state and return the new one
    pub fn toggle_navigation(&mut self, page: PageId, direction: Direction) -> SliderResult<bool> {
        let button = self.page_mut(page)?.button_mut(direction);
        button.enabled = !button.enabled;
        Ok(button.enabled)
    }

    /// Content of `page` changed size; recentre it immediately
    pub fn set_content_size(&mut self, page: PageId, size: Size) -> SliderResult<()> {
        let container = self.container;
        let page = self.page_mut(page)?;
        page.size = size;
        page.recenter(container);
        Ok(())
    }

    /// Container geometry changed: rescale offsets along the anchor chain and recentre
    pub fn resize(&mut self, event: ResizeEvent) {
        let ratio = event.ratio();
        self.container = event.size();
        debug!(
            "Container resized {}x{} -> {}x{} (ratio {})",
            event.old_width, event.old_height, event.width, event.height, ratio
        );

        let mut cursor = Some(self.anchor);
        while let Some(id) = cursor {
            let page = &mut self.pages[id.0];
            page.offset *= ratio;
            page.display_offset *= ratio;
            cursor = page.previous;
        }

        if let Some(transition) = self.transition.as_mut() {
            transition.group.scale(ratio);
        }

        for page in &mut self.pages {
            page.recenter(self.container);
        }
    }

    fn emit(&mut self, event: SliderEvent) {
        self.listeners.retain(|tx| tx.send(event).is_ok());
    }
}
