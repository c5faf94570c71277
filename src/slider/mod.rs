// ABOUTME: Animated page slider used by the welcome wizard
// Pages form a linked chain in an arena; transitions tween horizontal offsets

//! Page slider
//!
//! ```text
//!            container
//!   ┌────────────────────────┐
//!   │      ┌──────────┐      │  ┌──────────┐
//!   │      │ current  │      │  │   next   │   offset = +width
//!   │      │ offset=0 │      │  │          │
//!   │      └──────────┘      │  └──────────┘
//!   └────────────────────────┘
//! ```
//!
//! `advance` shifts the current page by `-width` and brings its successor to
//! offset 0. Both tweens run in one `ParallelGroup` stepped by `tick`.

pub mod animation;
pub mod controller;
pub mod page;

pub use animation::{ParallelGroup, PositionAnimation};
pub use controller::{
    AppendOptions, NavOutcome, ResizeEvent, SliderController, SliderError, SliderEvent,
    SliderOptions, SliderResult,
};
pub use page::{Direction, NavButton, Page, PageId, Position, Size};
