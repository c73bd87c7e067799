use netiris_core::{NetworkNode, NodeId, Topology};
use std::collections::BTreeMap;
use std::f32::consts::TAU;

use crate::graph::state::ViewMode;

/// The single visibility rule. The projector, the renderer and the hit
/// tester all go through here so they can never disagree about what is on
/// screen: GLOBAL shows everything, FOCUSED shows only the focused node and
/// its direct children.
pub fn visible<'a>(
    displayed: &'a BTreeMap<NodeId, NetworkNode>,
    mode: ViewMode,
    focused: Option<&'a NodeId>,
) -> impl Iterator<Item = &'a NetworkNode> {
    displayed.values().filter(move |n| match mode {
        ViewMode::Global => true,
        ViewMode::Focused => match focused {
            Some(f) => n.id == *f || n.parent_id.as_ref() == Some(f),
            None => false,
        },
    })
}

/// Derive the displayed node set from the base topology. GLOBAL is a plain
/// copy at base coordinates. FOCUSED re-seats the focused node at canvas
/// center and fans its children out on a circle of `focused_radius`,
/// angularly spaced by their position in `children`; every other node is
/// absent from the result, not merely hidden.
pub fn project(
    base: &Topology,
    mode: ViewMode,
    focused: Option<&NodeId>,
    focused_radius: f32,
) -> BTreeMap<NodeId, NetworkNode> {
    let (ViewMode::Focused, Some(focus_id)) = (mode, focused) else {
        return base.nodes.clone();
    };

    let mut out = BTreeMap::new();
    let Some(target) = base.get(focus_id) else {
        return out;
    };
    let (cx, cy) = base.center();

    let mut center_node = target.clone();
    center_node.x = cx;
    center_node.y = cy;
    out.insert(center_node.id.clone(), center_node);

    let count = target.children.len() as f32;
    for (idx, child_id) in target.children.iter().enumerate() {
        let Some(child) = base.get(child_id) else {
            continue;
        };
        let angle = idx as f32 / count * TAU;
        let mut c = child.clone();
        c.x = cx + focused_radius * angle.cos();
        c.y = cy + focused_radius * angle.sin();
        out.insert(c.id.clone(), c);
    }

    out
}

/// Nearest visible node within `threshold` pixels of the pointer; strictly
/// closer wins, so the first node encountered keeps an exact tie.
pub fn hit_test(
    displayed: &BTreeMap<NodeId, NetworkNode>,
    mode: ViewMode,
    focused: Option<&NodeId>,
    x: f32,
    y: f32,
    threshold: f32,
) -> Option<NodeId> {
    let mut best: Option<(f32, &NodeId)> = None;
    for node in visible(displayed, mode, focused) {
        let d = ((node.x - x).powi(2) + (node.y - y).powi(2)).sqrt();
        if d < threshold && best.map(|(bd, _)| d < bd).unwrap_or(true) {
            best = Some((d, &node.id));
        }
    }
    best.map(|(_, id)| id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netiris_core::topology::{generate, LayoutConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FOCUSED_RADIUS: f32 = 250.0;

    fn base() -> Topology {
        let mut rng = StdRng::seed_from_u64(11);
        generate(1600.0, 1200.0, &LayoutConfig::default(), &mut rng)
    }

    #[test]
    fn global_projection_preserves_base_coordinates() {
        let t = base();
        let displayed = project(&t, ViewMode::Global, None, FOCUSED_RADIUS);
        assert_eq!(displayed.len(), t.len());
        for (id, node) in &displayed {
            let b = t.get(id).unwrap();
            assert_eq!((node.x, node.y), (b.x, b.y));
        }
    }

    #[test]
    fn focused_projection_contains_exactly_focus_and_children() {
        let t = base();
        let focus = NodeId::from("AGG-01");
        let displayed = project(&t, ViewMode::Focused, Some(&focus), FOCUSED_RADIUS);

        let children = &t.get(&focus).unwrap().children;
        assert_eq!(displayed.len(), children.len() + 1);

        let (cx, cy) = t.center();
        let center = displayed.get(&focus).unwrap();
        assert_eq!((center.x, center.y), (cx, cy));

        for child_id in children {
            let c = displayed.get(child_id).expect("child projected");
            let d = ((c.x - cx).powi(2) + (c.y - cy).powi(2)).sqrt();
            assert!((d - FOCUSED_RADIUS).abs() < 0.001);
        }
    }

    #[test]
    fn focused_children_are_spaced_by_sibling_index() {
        let t = base();
        let focus = NodeId::from("AGG-03");
        let displayed = project(&t, ViewMode::Focused, Some(&focus), FOCUSED_RADIUS);
        let children = &t.get(&focus).unwrap().children;
        let (cx, cy) = t.center();

        let first = displayed.get(&children[0]).unwrap();
        assert!((first.x - (cx + FOCUSED_RADIUS)).abs() < 0.001);
        assert!((first.y - cy).abs() < 0.001);

        let step = TAU / children.len() as f32;
        let second = displayed.get(&children[1]).unwrap();
        assert!((second.x - (cx + FOCUSED_RADIUS * step.cos())).abs() < 0.01);
        assert!((second.y - (cy + FOCUSED_RADIUS * step.sin())).abs() < 0.01);
    }

    #[test]
    fn missing_focus_projects_nothing() {
        let t = base();
        let ghost = NodeId::from("AGG-99");
        let displayed = project(&t, ViewMode::Focused, Some(&ghost), FOCUSED_RADIUS);
        assert!(displayed.is_empty());
    }

    #[test]
    fn visible_filter_matches_projection_rule() {
        let t = base();
        let focus = NodeId::from("AGG-02");
        let displayed = project(&t, ViewMode::Focused, Some(&focus), FOCUSED_RADIUS);
        let vis: Vec<_> = visible(&displayed, ViewMode::Focused, Some(&focus)).collect();
        assert_eq!(vis.len(), displayed.len());

        let all = project(&t, ViewMode::Global, None, FOCUSED_RADIUS);
        let vis: Vec<_> = visible(&all, ViewMode::Global, None).collect();
        assert_eq!(vis.len(), all.len());
    }

    #[test]
    fn hit_test_resolves_exact_position_and_threshold() {
        let t = base();
        let displayed = project(&t, ViewMode::Global, None, FOCUSED_RADIUS);
        let probe = displayed.get(&NodeId::from("AGG-01")).unwrap().clone();

        let hit = hit_test(&displayed, ViewMode::Global, None, probe.x, probe.y, 20.0);
        assert_eq!(hit, Some(probe.id.clone()));

        // Far off any node: no hover.
        let miss = hit_test(&displayed, ViewMode::Global, None, -500.0, -500.0, 20.0);
        assert_eq!(miss, None);
    }

    #[test]
    fn hit_test_ignores_nodes_hidden_by_focus() {
        let t = base();
        let focus = NodeId::from("AGG-01");
        let displayed = project(&t, ViewMode::Focused, Some(&focus), FOCUSED_RADIUS);

        // A node outside the focus family is absent, so even its exact base
        // position cannot hover it.
        let outsider = t.get(&NodeId::from("AGG-09")).unwrap();
        let hit = hit_test(
            &displayed,
            ViewMode::Focused,
            Some(&focus),
            outsider.x,
            outsider.y,
            5.0,
        );
        assert_eq!(hit, None);
    }
}
