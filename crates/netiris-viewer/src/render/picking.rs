use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::app::events::Picked;
use crate::graph::{view, SimState};

/// Pointer-move hit test against the currently visible node set. Losing the
/// cursor (left the window) clears hover.
pub fn hover_detection(
    windows: Query<&Window>,
    mut contexts: EguiContexts,
    mut st: ResMut<SimState>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        st.ui.hovered = None;
        return;
    };
    if contexts.ctx_mut().wants_pointer_input() {
        return;
    }

    let hit = view::hit_test(
        &st.displayed,
        st.ui.view_mode,
        st.ui.focused.as_ref(),
        cursor.x,
        cursor.y,
        st.cfg.hover_radius_px,
    );
    st.ui.hovered = hit;
}

pub fn picking_click(
    buttons: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    st: Res<SimState>,
    mut out: EventWriter<Picked>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if contexts.ctx_mut().wants_pointer_input() {
        return;
    }
    out.send(Picked(st.ui.hovered.clone()));
}

pub fn apply_picked(mut st: ResMut<SimState>, mut ev: EventReader<Picked>) {
    for Picked(id) in ev.read() {
        match id {
            Some(id) => st.handle_pick(id.clone()),
            None => st.clear_selection(),
        }
    }
}
