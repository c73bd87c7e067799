use bevy::prelude::*;
use bevy::sprite::{Anchor, MaterialMesh2dBundle};
use netiris_core::{NetworkNode, NodeId, NodeKind, Scenario, Status};
use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use crate::graph::{view, SimState, ViewMode};
use crate::render::camera::{canvas_angle_to_world, canvas_to_world};

pub const COLOR_BG: Color = Color::srgb(0.02, 0.02, 0.02);

const COLOR_CORE_NORMAL: Color = Color::srgb(0.231, 0.510, 0.965);
const COLOR_CORE_CRITICAL: Color = Color::srgb(0.937, 0.267, 0.267);
const COLOR_AGG_NORMAL: Color = Color::srgb(0.024, 0.714, 0.831);
const COLOR_AGG_CRITICAL: Color = Color::srgb(0.863, 0.149, 0.149);
const COLOR_TOR_NORMAL: Color = Color::srgb(0.063, 0.725, 0.506);
const COLOR_TOR_WARNING: Color = Color::srgb(0.961, 0.620, 0.043);
const COLOR_TOR_CRITICAL: Color = Color::srgb(0.937, 0.267, 0.267);

const SHADOW_CONE_FILL: Color = Color::srgba(0.937, 0.267, 0.267, 0.15);
const SHADOW_CONE_STROKE: Color = Color::srgba(0.937, 0.267, 0.267, 0.4);

const LINK_FOCUSED: Color = Color::srgba(1.0, 1.0, 1.0, 0.1);
const LINK_CRITICAL: Color = Color::srgba(0.937, 0.267, 0.267, 0.4);
const LINK_RELATED: Color = Color::srgba(0.024, 0.714, 0.831, 0.3);

const COLOR_PARTICLE: Color = Color::srgb(1.0, 1.0, 1.0);
const COLOR_PARTICLE_HOT: Color = Color::srgb(0.961, 0.620, 0.043);

const COLOR_LABEL: Color = Color::srgb(0.898, 0.898, 0.898);
const COLOR_RING: Color = Color::srgb(1.0, 1.0, 1.0);

// Fill layers are ordered by z; gizmo strokes (links, rings, cone outlines)
// share one overlay pass.
const Z_CONE: f32 = -1.0;
const Z_PARTICLE: f32 = 1.0;
const Z_HALO: f32 = 1.9;
const Z_NODE: f32 = 2.0;
const Z_LABEL: f32 = 3.0;

#[derive(Component)]
pub struct NodeMarker;

#[derive(Component)]
pub struct ConeMarker;

#[derive(Component)]
pub struct LabelMarker {
    pub id: NodeId,
    pub default_on: bool,
}

#[derive(Component)]
pub struct ParticleMarker(pub usize);

struct NodeVisual {
    radius: f32,
    color: Color,
    glow: bool,
    label: bool,
}

fn node_visual(node: &NetworkNode, mode: ViewMode) -> NodeVisual {
    match node.kind {
        NodeKind::Core => NodeVisual {
            radius: if mode == ViewMode::Global { 12.0 } else { 0.0 },
            color: if node.status == Status::Critical {
                COLOR_CORE_CRITICAL
            } else {
                COLOR_CORE_NORMAL
            },
            glow: true,
            label: false,
        },
        NodeKind::Agg => NodeVisual {
            radius: if mode == ViewMode::Focused { 15.0 } else { 5.0 },
            color: if node.status == Status::Critical {
                COLOR_AGG_CRITICAL
            } else {
                COLOR_AGG_NORMAL
            },
            glow: node.status == Status::Critical || mode == ViewMode::Focused,
            label: mode == ViewMode::Global,
        },
        NodeKind::Tor => {
            let critical = node.status == Status::Critical;
            NodeVisual {
                radius: if critical { 4.0 } else { 2.0 },
                color: match node.status {
                    Status::Critical => COLOR_TOR_CRITICAL,
                    Status::Warning => COLOR_TOR_WARNING,
                    Status::Normal => COLOR_TOR_NORMAL,
                },
                glow: critical,
                label: mode == ViewMode::Focused,
            }
        }
    }
}

/// Angular footprint of a failed agg's children: [min-pad, max+pad] in
/// canvas angles plus the outer radius.
fn cone_extent(
    agg: &NetworkNode,
    displayed: &std::collections::BTreeMap<NodeId, NetworkNode>,
    angle_pad: f32,
    radius_pad: f32,
) -> Option<(f32, f32, f32)> {
    let children: Vec<&NetworkNode> = agg
        .children
        .iter()
        .filter_map(|id| displayed.get(id))
        .collect();
    if children.is_empty() {
        return None;
    }
    let mut min_a = f32::INFINITY;
    let mut max_a = f32::NEG_INFINITY;
    let mut max_r = f32::NEG_INFINITY;
    for c in &children {
        min_a = min_a.min(c.angle);
        max_a = max_a.max(c.angle);
        max_r = max_r.max(c.radius);
    }
    Some((min_a - angle_pad, max_a + angle_pad, max_r + radius_pad))
}

/// Rebuild the retained part of the frame (cones, node discs, labels) when
/// the simulation flags a redraw, and keep the particle pool entities in
/// sync with the arena.
pub fn rebuild_scene(
    mut commands: Commands,
    st: Res<SimState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<ColorMaterial>>,
    stale: Query<Entity, Or<(With<NodeMarker>, With<ConeMarker>, With<LabelMarker>)>>,
    pool: Query<Entity, With<ParticleMarker>>,
) {
    if pool.iter().count() != st.particles.len() {
        for e in pool.iter() {
            commands.entity(e).despawn();
        }
        let unit = meshes.add(Circle::new(1.0));
        for (i, p) in st.particles.slots().iter().enumerate() {
            commands.spawn((
                MaterialMesh2dBundle {
                    mesh: unit.clone().into(),
                    material: mats.add(ColorMaterial::from(COLOR_PARTICLE)),
                    transform: Transform::from_translation(Vec3::new(0.0, 0.0, Z_PARTICLE))
                        .with_scale(Vec3::splat(p.size)),
                    visibility: Visibility::Hidden,
                    ..default()
                },
                ParticleMarker(i),
            ));
        }
    }

    if !st.take_redraw() {
        return;
    }

    for e in stale.iter() {
        commands.entity(e).despawn();
    }

    let (w, h) = st.canvas();
    let mode = st.ui.view_mode;
    let focused = st.ui.focused.clone();
    let unit = meshes.add(Circle::new(1.0));

    // Shadow cones sit under everything else and only exist in the global
    // view.
    if mode == ViewMode::Global {
        if let Some(core) = st.displayed.values().find(|n| n.kind == NodeKind::Core) {
            let core_pos = canvas_to_world(core.x, core.y, w, h);
            for agg in view::visible(&st.displayed, mode, focused.as_ref())
                .filter(|n| n.kind == NodeKind::Agg && n.status == Status::Critical)
            {
                let Some((lo, hi, outer)) =
                    cone_extent(agg, &st.displayed, st.cfg.cone_angle_pad, st.cfg.cone_radius_pad)
                else {
                    continue;
                };
                let span = hi - lo;
                let world_mid = canvas_angle_to_world((lo + hi) / 2.0);
                commands.spawn((
                    MaterialMesh2dBundle {
                        mesh: meshes.add(CircularSector::new(outer, span / 2.0)).into(),
                        material: mats.add(ColorMaterial::from(SHADOW_CONE_FILL)),
                        transform: Transform::from_translation(core_pos.extend(Z_CONE))
                            .with_rotation(Quat::from_rotation_z(world_mid - FRAC_PI_2)),
                        ..default()
                    },
                    ConeMarker,
                ));
            }
        }
    }

    for node in view::visible(&st.displayed, mode, focused.as_ref()) {
        let v = node_visual(node, mode);
        if v.radius <= 0.0 {
            continue;
        }
        let pos = canvas_to_world(node.x, node.y, w, h);

        if v.glow {
            commands.spawn((
                MaterialMesh2dBundle {
                    mesh: unit.clone().into(),
                    material: mats.add(ColorMaterial::from(v.color.with_alpha(0.2))),
                    transform: Transform::from_translation(pos.extend(Z_HALO))
                        .with_scale(Vec3::splat(v.radius * 2.0)),
                    ..default()
                },
                NodeMarker,
            ));
        }

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: unit.clone().into(),
                material: mats.add(ColorMaterial::from(v.color)),
                transform: Transform::from_translation(pos.extend(Z_NODE))
                    .with_scale(Vec3::splat(v.radius)),
                ..default()
            },
            NodeMarker,
        ));

        let label_pos = canvas_to_world(node.x + v.radius + 4.0, node.y, w, h);
        commands.spawn((
            Text2dBundle {
                text: Text::from_section(
                    node.id.to_string(),
                    TextStyle {
                        font_size: 10.0,
                        color: COLOR_LABEL,
                        ..default()
                    },
                ),
                text_anchor: Anchor::CenterLeft,
                transform: Transform::from_translation(label_pos.extend(Z_LABEL)),
                visibility: Visibility::Hidden,
                ..default()
            },
            LabelMarker {
                id: node.id.clone(),
                default_on: v.label,
            },
        ));
    }
}

/// Per-frame stroke pass: cone outlines and the culled link layer. Links
/// only exist between nodes that are both visible; GLOBAL mode draws just
/// the interesting ones (critical, hovered, selected), FOCUSED draws all.
pub fn draw_link_layer(st: Res<SimState>, mut gizmos: Gizmos) {
    let (w, h) = st.canvas();
    let mode = st.ui.view_mode;
    let focused = st.ui.focused.clone();

    let vis: HashSet<&NodeId> = view::visible(&st.displayed, mode, focused.as_ref())
        .map(|n| &n.id)
        .collect();

    if mode == ViewMode::Global {
        if let Some(core) = st.displayed.values().find(|n| n.kind == NodeKind::Core) {
            let center = canvas_to_world(core.x, core.y, w, h);
            for agg in view::visible(&st.displayed, mode, focused.as_ref())
                .filter(|n| n.kind == NodeKind::Agg && n.status == Status::Critical)
            {
                let Some((lo, hi, outer)) =
                    cone_extent(agg, &st.displayed, st.cfg.cone_angle_pad, st.cfg.cone_radius_pad)
                else {
                    continue;
                };
                // Canvas angles mirror into world space, so the arc runs
                // from -hi to -lo.
                let span = hi - lo;
                let world_mid = canvas_angle_to_world((lo + hi) / 2.0);
                gizmos.arc_2d(
                    center,
                    FRAC_PI_2 - world_mid,
                    span,
                    outer,
                    SHADOW_CONE_STROKE,
                );
                for edge in [lo, hi] {
                    let dir = Vec2::from_angle(canvas_angle_to_world(edge));
                    gizmos.line_2d(center, center + dir * outer, SHADOW_CONE_STROKE);
                }
            }
        }
    }

    for node in view::visible(&st.displayed, mode, focused.as_ref()) {
        let Some(parent_id) = node.parent_id.as_ref() else {
            continue;
        };
        if !vis.contains(parent_id) {
            continue;
        }
        let Some(parent) = st.displayed.get(parent_id) else {
            continue;
        };

        let critical =
            node.status == Status::Critical || parent.status == Status::Critical;
        let related = st.ui.hovered.as_ref() == Some(&node.id)
            || st.ui.hovered.as_ref() == Some(parent_id)
            || st.ui.selected.as_ref() == Some(&node.id);

        let a = canvas_to_world(parent.x, parent.y, w, h);
        let b = canvas_to_world(node.x, node.y, w, h);

        if mode == ViewMode::Focused {
            gizmos.line_2d(a, b, LINK_FOCUSED);
        } else if critical {
            // Drawn twice: alpha stacking stands in for a thicker stroke.
            gizmos.line_2d(a, b, LINK_CRITICAL);
            gizmos.line_2d(a, b, LINK_CRITICAL);
        } else if related {
            gizmos.line_2d(a, b, LINK_RELATED);
        }
    }
}

/// Advance the pool and mirror it onto the pooled entities. The particle
/// layer vanishes entirely while the core is down.
pub fn animate_particles(
    mut st: ResMut<SimState>,
    mut mats: ResMut<Assets<ColorMaterial>>,
    mut pool: Query<(
        &ParticleMarker,
        &mut Transform,
        &mut Visibility,
        &Handle<ColorMaterial>,
    )>,
) {
    if st.ui.scenario == Scenario::CoreFailure {
        for (_, _, mut vis, _) in pool.iter_mut() {
            *vis = Visibility::Hidden;
        }
        return;
    }

    st.step_particles();

    let (w, h) = st.canvas();
    let base_color = if st.ui.scenario == Scenario::HighLoad {
        COLOR_PARTICLE_HOT
    } else {
        COLOR_PARTICLE
    };

    for (marker, mut tf, mut vis, mat) in pool.iter_mut() {
        let Some(p) = st.particles.slots().get(marker.0) else {
            *vis = Visibility::Hidden;
            continue;
        };
        let (x, y) = p.position();
        tf.translation = canvas_to_world(x, y, w, h).extend(Z_PARTICLE);
        tf.scale = Vec3::splat(p.size);
        if let Some(m) = mats.get_mut(mat) {
            m.color = base_color.with_alpha(p.alpha(st.cfg.particle_alpha));
        }
        *vis = Visibility::Visible;
    }
}

/// Label visibility: tier defaults plus forced-on for the hovered/selected
/// node.
pub fn update_labels(st: Res<SimState>, mut labels: Query<(&LabelMarker, &mut Visibility)>) {
    for (marker, mut vis) in labels.iter_mut() {
        let on = marker.default_on
            || st.ui.hovered.as_ref() == Some(&marker.id)
            || st.ui.selected.as_ref() == Some(&marker.id);
        *vis = if on {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

/// Outline ring around the hovered and selected nodes.
pub fn draw_highlights(st: Res<SimState>, mut gizmos: Gizmos) {
    let (w, h) = st.canvas();
    let mode = st.ui.view_mode;
    for id in [st.ui.hovered.as_ref(), st.ui.selected.as_ref()]
        .into_iter()
        .flatten()
    {
        if !view::visible(&st.displayed, mode, st.ui.focused.as_ref()).any(|n| &n.id == id) {
            continue;
        }
        let Some(node) = st.displayed.get(id) else {
            continue;
        };
        let v = node_visual(node, mode);
        gizmos.circle_2d(
            canvas_to_world(node.x, node.y, w, h),
            v.radius + 4.0,
            COLOR_RING,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netiris_core::topology::{generate, LayoutConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn cone_extent_spans_the_children_with_padding() {
        let mut rng = StdRng::seed_from_u64(21);
        let topo = generate(1600.0, 1200.0, &LayoutConfig::default(), &mut rng);
        let agg = topo.get(&NodeId::from("AGG-01")).unwrap();

        let (lo, hi, outer) = cone_extent(agg, &topo.nodes, 0.05, 20.0).expect("cone");
        for child in topo.children_of(&agg.id) {
            assert!(child.angle >= lo + 0.05 - 1e-4);
            assert!(child.angle <= hi - 0.05 + 1e-4);
            assert!(child.radius <= outer - 20.0 + 1e-4);
        }
        assert!(hi > lo);
    }

    #[test]
    fn cone_extent_needs_at_least_one_visible_child() {
        let mut rng = StdRng::seed_from_u64(22);
        let topo = generate(1600.0, 1200.0, &LayoutConfig::default(), &mut rng);
        let agg = topo.get(&NodeId::from("AGG-01")).unwrap();

        // A displayed map without the children (focused elsewhere) yields
        // no cone.
        let empty = std::collections::BTreeMap::new();
        assert!(cone_extent(agg, &empty, 0.05, 20.0).is_none());
    }

    #[test]
    fn node_visuals_follow_tier_and_mode() {
        let mut rng = StdRng::seed_from_u64(23);
        let topo = generate(1600.0, 1200.0, &LayoutConfig::default(), &mut rng);

        let core = topo.get(&NodeId::from("CORE-01")).unwrap();
        assert_eq!(node_visual(core, ViewMode::Global).radius, 12.0);

        let agg = topo.get(&NodeId::from("AGG-01")).unwrap();
        assert_eq!(node_visual(agg, ViewMode::Global).radius, 5.0);
        assert_eq!(node_visual(agg, ViewMode::Focused).radius, 15.0);
        assert!(node_visual(agg, ViewMode::Focused).glow);
        assert!(node_visual(agg, ViewMode::Global).label);

        let mut tor = topo.get(&NodeId::from("TOR-001")).unwrap().clone();
        assert_eq!(node_visual(&tor, ViewMode::Global).radius, 2.0);
        tor.status = Status::Critical;
        let v = node_visual(&tor, ViewMode::Global);
        assert_eq!(v.radius, 4.0);
        assert!(v.glow);
    }
}
