//! Controller layer: UI events, page/form state machines, and command orchestration.

pub mod code_input;
pub mod events;
pub mod orchestration;
pub mod page;
pub mod submission;
