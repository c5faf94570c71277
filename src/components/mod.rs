// ABOUTME: UI components for the welcome wizard: text inputs, the page slider view and the wizard screen

pub mod labeled_input;
pub mod slider_view;
pub mod theme;
pub mod wizard;

pub use labeled_input::LabeledTextInput;
pub use slider_view::SliderView;
pub use wizard::WizardComponent;
