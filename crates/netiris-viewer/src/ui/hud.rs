use bevy::prelude::{Res, Time};
use bevy_egui::{egui, EguiContexts};

use crate::graph::{SimState, ViewMode};

pub fn hud_overlay(mut contexts: EguiContexts, time: Res<Time>, st: Res<SimState>) {
    let ctx = contexts.ctx_mut();
    egui::Area::new(egui::Id::new("hud"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(12.0, 12.0))
        .show(ctx, |ui| {
            ui.group(|ui| {
                let dt = time.delta_seconds().max(0.0001);
                ui.label(format!("FPS: {:.0}", 1.0 / dt));
                ui.label(format!("Visible: {} nodes", st.visible_count()));
                ui.label(format!(
                    "Mode: {}",
                    match st.ui.view_mode {
                        ViewMode::Global => "Global",
                        ViewMode::Focused => "Focused",
                    }
                ));
            });
        });
}
