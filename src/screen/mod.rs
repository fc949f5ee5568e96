//! Screen UI Module
//!
//! The single application window. Views are pure functions of the session
//! snapshot and return the [`ScreenCommand`] the user triggered, which the
//! app turns into a workflow operation on the async runtime.

pub mod app;
pub mod components;
pub mod theme;
pub mod views;

pub use app::run_app;

/// User action coming out of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenCommand {
    Camera,
    Gallery,
    Back,
    EnterAnyway,
    RetryAuthentication,
    CancelAuthentication,
}
