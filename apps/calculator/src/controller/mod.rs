//! Controller layer: command parsing, form state and orchestration against the wallet session.

pub mod events;
pub mod form;
pub mod orchestration;
