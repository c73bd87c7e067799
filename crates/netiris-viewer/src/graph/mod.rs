pub mod particles;
pub mod state;
pub mod view;

pub use state::{SimState, ViewMode};
