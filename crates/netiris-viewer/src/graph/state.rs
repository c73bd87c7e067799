use bevy::prelude::Resource;
use netiris_core::{scenario, topology, NetworkNode, NodeId, NodeKind, Scenario, Topology};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::graph::particles::ParticleArena;
use crate::graph::view;
use crate::util::config::ViewerConfig;

// Used until the first WindowResized event reports the real surface.
const DEFAULT_W: f32 = 1280.0;
const DEFAULT_H: f32 = 720.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Global,
    Focused,
}

pub struct UiState {
    pub hovered: Option<NodeId>,
    pub selected: Option<NodeId>,
    /// Non-null exactly while `view_mode == Focused`.
    pub focused: Option<NodeId>,
    pub view_mode: ViewMode,
    pub scenario: Scenario,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            hovered: None,
            selected: None,
            focused: None,
            view_mode: ViewMode::Global,
            scenario: Scenario::Normal,
        }
    }
}

/// The whole simulation. This resource is the only owner of the canonical
/// base topology; everything that reaches the screen is a projection
/// recomputed on each transition, never a reference into the base.
#[derive(Resource)]
pub struct SimState {
    base: Topology,
    pub displayed: BTreeMap<NodeId, NetworkNode>,
    pub ui: UiState,
    pub cfg: ViewerConfig,
    pub particles: ParticleArena,
    rng: StdRng,

    pub needs_redraw: AtomicBool,
}

impl SimState {
    pub fn new(cfg: ViewerConfig) -> Self {
        let mut rng = StdRng::from_entropy();
        let base = topology::generate(DEFAULT_W, DEFAULT_H, &cfg.layout, &mut rng);
        let particles = ParticleArena::new(
            cfg.particle_count,
            base.center(),
            cfg.particle_speed_base,
            &mut rng,
        );
        let mut st = Self {
            base,
            displayed: BTreeMap::new(),
            ui: UiState::default(),
            cfg,
            particles,
            rng,
            needs_redraw: AtomicBool::new(true),
        };
        st.reproject();
        st
    }

    pub fn base(&self) -> &Topology {
        &self.base
    }

    pub fn canvas(&self) -> (f32, f32) {
        (self.base.width, self.base.height)
    }

    /// Structural event: rebuild the topology for the new surface and drop
    /// every prior fault/view decision.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.base = topology::generate(width, height, &self.cfg.layout, &mut self.rng);
        self.ui = UiState::default();
        self.particles = ParticleArena::new(
            self.cfg.particle_count,
            self.base.center(),
            self.cfg.particle_speed_base,
            &mut self.rng,
        );
        self.reproject();
        self.mark_redraw();
    }

    pub fn set_scenario(&mut self, s: Scenario) {
        scenario::apply(&mut self.base, s, &mut self.rng);
        self.ui.scenario = s;
        self.reproject();
        self.mark_redraw();
    }

    /// Click resolution: an agg node clicked in GLOBAL mode opens the
    /// focused view; anything else only moves the selection.
    pub fn handle_pick(&mut self, id: NodeId) {
        let kind = self.displayed.get(&id).map(|n| n.kind);
        if self.ui.view_mode == ViewMode::Global && kind == Some(NodeKind::Agg) {
            self.enter_focus(id);
        } else {
            self.ui.selected = Some(id);
            self.mark_redraw();
        }
    }

    pub fn enter_focus(&mut self, id: NodeId) {
        self.ui.view_mode = ViewMode::Focused;
        self.ui.focused = Some(id.clone());
        self.ui.selected = Some(id);
        self.reproject();
        self.mark_redraw();
    }

    pub fn exit_focus(&mut self) {
        self.ui.view_mode = ViewMode::Global;
        self.ui.focused = None;
        self.ui.selected = None;
        self.reproject();
        self.mark_redraw();
    }

    pub fn clear_selection(&mut self) {
        if self.ui.selected.take().is_some() {
            self.mark_redraw();
        }
    }

    fn reproject(&mut self) {
        self.displayed = view::project(
            &self.base,
            self.ui.view_mode,
            self.ui.focused.as_ref(),
            self.cfg.focused_tor_radius,
        );
    }

    /// Sidebar projection: the selected node, falling back to the hovered
    /// one.
    pub fn detail_node(&self) -> Option<&NetworkNode> {
        self.ui
            .selected
            .as_ref()
            .or(self.ui.hovered.as_ref())
            .and_then(|id| self.displayed.get(id))
    }

    pub fn visible_count(&self) -> usize {
        view::visible(&self.displayed, self.ui.view_mode, self.ui.focused.as_ref()).count()
    }

    /// Advance the particle pool one frame: finished slots restart at
    /// canvas center aimed at a random visible tor (GLOBAL) or a random
    /// visible child of the focused node (FOCUSED).
    pub fn step_particles(&mut self) {
        let targets: Vec<(f32, f32)> = match self.ui.view_mode {
            ViewMode::Global => {
                view::visible(&self.displayed, self.ui.view_mode, self.ui.focused.as_ref())
                    .filter(|n| n.kind == NodeKind::Tor)
                    .map(|n| (n.x, n.y))
                    .collect()
            }
            ViewMode::Focused => {
                view::visible(&self.displayed, self.ui.view_mode, self.ui.focused.as_ref())
                    .filter(|n| n.parent_id.as_ref() == self.ui.focused.as_ref())
                    .map(|n| (n.x, n.y))
                    .collect()
            }
        };
        let center = self.base.center();
        self.particles.step(center, &targets, &mut self.rng);
    }

    pub fn mark_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Relaxed);
    }

    pub fn take_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Relaxed)
    }
}
