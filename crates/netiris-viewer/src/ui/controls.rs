use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use netiris_core::Scenario;

use crate::graph::{SimState, ViewMode};

pub fn controls_panel(mut contexts: EguiContexts, mut st: ResMut<SimState>) {
    egui::TopBottomPanel::bottom("controls").show(contexts.ctx_mut(), |ui| {
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            if st.ui.view_mode == ViewMode::Focused {
                if ui.button("< Back to Global Topology").clicked() {
                    st.exit_focus();
                }
                ui.separator();
            }
            ui.label("Scenario:");
            for s in Scenario::ALL {
                // Clicking the active scenario re-applies it: a fresh
                // reset plus a re-roll of its randomness.
                if ui.selectable_label(st.ui.scenario == s, s.label()).clicked() {
                    st.set_scenario(s);
                }
            }
        });
        ui.label(egui::RichText::new(st.ui.scenario.description()).small().weak());
        ui.add_space(4.0);
    });
}
