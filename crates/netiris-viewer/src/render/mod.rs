pub mod camera;
pub mod picking;
pub mod scene;

pub use camera::{handle_resize, setup_scene};
pub use picking::{apply_picked, hover_detection, picking_click};
pub use scene::{
    animate_particles, draw_highlights, draw_link_layer, rebuild_scene, update_labels,
};
