use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::graph::SimState;

pub fn setup_scene(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

/// Canvas space (origin top-left, y down — the space all topology geometry
/// lives in) to world space (origin center, y up).
pub fn canvas_to_world(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(x - width / 2.0, height / 2.0 - y)
}

/// The y flip mirrors polar angles.
pub fn canvas_angle_to_world(theta: f32) -> f32 {
    -theta
}

/// Resize is the only structural event: the whole topology is rebuilt for
/// the new surface and all fault/view state is discarded.
pub fn handle_resize(mut events: EventReader<WindowResized>, mut st: ResMut<SimState>) {
    let Some(e) = events.read().last() else {
        return;
    };
    st.resize(e.width, e.height);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_world_mapping_centers_and_flips() {
        assert_eq!(canvas_to_world(640.0, 360.0, 1280.0, 720.0), Vec2::ZERO);
        assert_eq!(
            canvas_to_world(0.0, 0.0, 1280.0, 720.0),
            Vec2::new(-640.0, 360.0)
        );
        assert_eq!(canvas_angle_to_world(0.5), -0.5);
    }
}
