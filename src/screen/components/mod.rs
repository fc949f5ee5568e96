//! Reusable UI components

pub mod action_button;
pub mod progress_ring;

pub use action_button::action_button;
pub use progress_ring::ProgressRing;
