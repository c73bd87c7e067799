pub mod controls;
pub mod hud;
pub mod panel;

pub use controls::controls_panel;
pub use hud::hud_overlay;
pub use panel::side_panel;
