use bevy::prelude::*;

use crate::graph::SimState;
use crate::render::scene::COLOR_BG;
use crate::util::config;

pub mod events;

pub struct NetirisViewerPlugin;

impl Plugin for NetirisViewerPlugin {
    fn build(&self, app: &mut App) {
        let cfg = config::load_or_default();
        app.add_event::<events::Picked>()
            .insert_resource(ClearColor(COLOR_BG))
            .insert_resource(SimState::new(cfg))
            .add_systems(Startup, crate::render::setup_scene)
            .add_systems(
                Update,
                (
                    crate::render::handle_resize,
                    crate::ui::controls_panel,
                    crate::ui::side_panel,
                    crate::ui::hud_overlay,
                    crate::render::hover_detection,
                    crate::render::picking_click,
                    crate::render::apply_picked,
                    crate::render::rebuild_scene,
                    crate::render::draw_link_layer,
                    crate::render::animate_particles,
                    crate::render::update_labels,
                    crate::render::draw_highlights,
                )
                    .chain(),
            );
    }
}
