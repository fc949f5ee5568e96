//! Screen views, one per presentation branch

pub mod fallback;
pub mod gate;
pub mod menu;
pub mod result;

pub use fallback::{render_fallback_view, render_unsupported_view};
pub use gate::render_gate_view;
pub use menu::render_menu_view;
pub use result::render_result_view;
