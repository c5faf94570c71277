// ABOUTME: Page nodes for the sliding wizard
// Each page lives in the controller's arena and links to its neighbours by index

use std::time::Duration;

/// Index of a page inside a `SliderController` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub(crate) usize);

impl PageId {
    /// Position of the page in the arena (creation order)
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Navigation direction, one per page button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Width/height in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Shrink to fit inside `bounds`
    pub fn clamp_to(self, bounds: Self) -> Self {
        Self {
            width: self.width.min(bounds.width),
            height: self.height.min(bounds.height),
        }
    }
}

/// Top-left corner of a page relative to the container, may be negative when off-screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// State of a page's next/previous button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavButton {
    pub label: String,
    pub visible: bool,
    pub enabled: bool,
}

impl NavButton {
    pub(crate) fn new(label: impl Into<String>, visible: bool) -> Self {
        Self {
            label: label.into(),
            visible,
            enabled: true,
        }
    }

    /// Only visible and enabled buttons react to clicks
    pub const fn is_clickable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// One page of the wizard
#[derive(Debug)]
pub struct Page<C> {
    pub(crate) content: C,
    pub(crate) size: Size,
    pub(crate) next: Option<PageId>,
    pub(crate) previous: Option<PageId>,
    /// Resting horizontal displacement from the centred position
    pub(crate) offset: f64,
    /// Displacement currently shown, differs from `offset` while animating
    pub(crate) display_offset: f64,
    pub(crate) position: Position,
    pub(crate) next_button: NavButton,
    pub(crate) previous_button: NavButton,
    pub(crate) slide_duration: Duration,
}

impl<C> Page<C> {
    pub const fn content(&self) -> &C {
        &self.content
    }

    pub const fn size(&self) -> Size {
        self.size
    }

    pub const fn next(&self) -> Option<PageId> {
        self.next
    }

    pub const fn previous(&self) -> Option<PageId> {
        self.previous
    }

    pub const fn neighbour(&self, direction: Direction) -> Option<PageId> {
        match direction {
            Direction::Next => self.next,
            Direction::Previous => self.previous,
        }
    }

    pub const fn offset(&self) -> f64 {
        self.offset
    }

    pub const fn display_offset(&self) -> f64 {
        self.display_offset
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn slide_duration(&self) -> Duration {
        self.slide_duration
    }

    pub const fn button(&self, direction: Direction) -> &NavButton {
        match direction {
            Direction::Next => &self.next_button,
            Direction::Previous => &self.previous_button,
        }
    }

    pub(crate) fn button_mut(&mut self, direction: Direction) -> &mut NavButton {
        match direction {
            Direction::Next => &mut self.next_button,
            Direction::Previous => &mut self.previous_button,
        }
    }

    /// Place the page centred in `container`, shifted by its displayed offset
    pub(crate) fn recenter(&mut self, container: Size) {
        let x = f64::from(container.width) / 2.0 - f64::from(self.size.width) / 2.0
            + self.display_offset;
        let y = f64::from(container.height) / 2.0 - f64::from(self.size.height) / 2.0;
        // Positions go negative off the left edge, floor rather than truncate
        self.position = Position {
            x: x.floor() as i32,
            y: y.floor() as i32,
        };
    }
}
