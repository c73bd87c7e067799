use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use netiris_core::{NetworkNode, Status};

use crate::graph::SimState;
use crate::util::config;

fn status_color(s: Status) -> egui::Color32 {
    match s {
        Status::Normal => egui::Color32::from_rgb(52, 211, 153),
        Status::Warning => egui::Color32::from_rgb(251, 191, 36),
        Status::Critical => egui::Color32::from_rgb(239, 68, 68),
    }
}

pub fn side_panel(mut contexts: EguiContexts, mut st: ResMut<SimState>) {
    egui::SidePanel::right("sidebar")
        .min_width(260.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Netiris");
            ui.label(egui::RichText::new("Topology Visualizer").small().weak());
            ui.separator();

            ui.heading("System Status");
            ui.label(format!("nodes active: {}", st.displayed.len()));
            ui.horizontal(|ui| {
                ui.label("current state:");
                let color = if st.ui.scenario.is_failure() {
                    egui::Color32::from_rgb(248, 113, 113)
                } else {
                    egui::Color32::from_rgb(52, 211, 153)
                };
                ui.colored_label(color, st.ui.scenario.tag().replace('_', " "));
            });
            if st.ui.scenario.is_failure() {
                ui.colored_label(
                    egui::Color32::from_rgb(254, 202, 202),
                    "Active anomaly detected. Select red nodes for RCA.",
                );
            }
            if let Some(f) = &st.ui.focused {
                ui.label(format!("focus: {f}"));
            }
            ui.separator();

            match st.detail_node() {
                Some(node) => node_detail(ui, node),
                None => {
                    ui.label(egui::RichText::new("Hover or select a node for details.").weak());
                }
            }

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Display");
            ui.add(
                egui::Slider::new(&mut st.cfg.hover_radius_px, 5.0..=60.0).text("hover radius"),
            );
            ui.add(
                egui::Slider::new(&mut st.cfg.particle_alpha, 0.05..=1.0).text("particle alpha"),
            );
            let before = st.cfg.cone_angle_pad;
            ui.add(
                egui::Slider::new(&mut st.cfg.cone_angle_pad, 0.0..=0.3).text("cone pad (rad)"),
            );
            if st.cfg.cone_angle_pad != before {
                st.mark_redraw();
            }
            if ui.button("Save settings").clicked() {
                if let Err(e) = config::save(&st.cfg) {
                    bevy::log::warn!("failed to save viewer config: {e:#}");
                }
            }
        });
}

fn node_detail(ui: &mut egui::Ui, node: &NetworkNode) {
    ui.heading(node.id.to_string());
    ui.horizontal(|ui| {
        ui.label(node.kind.as_str());
        ui.colored_label(status_color(node.status), node.status.as_str());
    });
    ui.add_space(6.0);

    egui::Grid::new("node_props").num_columns(2).show(ui, |ui| {
        ui.label("ip address");
        ui.monospace(node.ip.as_str());
        ui.end_row();
        ui.label("rack position");
        ui.monospace(node.rack_position.as_str());
        ui.end_row();
        ui.label("port capacity");
        ui.monospace(node.capacity.as_str());
        ui.end_row();
        ui.label("uplink");
        ui.monospace(
            node.parent_id
                .as_ref()
                .map(|p| p.as_str())
                .unwrap_or("(root)"),
        );
        ui.end_row();
    });
    ui.add_space(6.0);

    ui.label("throughput load");
    ui.add(egui::ProgressBar::new(node.traffic / 100.0).text(format!("{:.1}%", node.traffic)));
    ui.label("packet loss");
    ui.add(
        egui::ProgressBar::new(node.packet_loss / 100.0)
            .text(format!("{:.2}%", node.packet_loss)),
    );

    if !node.children.is_empty() {
        ui.add_space(6.0);
        ui.label(format!("downstream nodes: {}", node.children.len()));
    }
}
