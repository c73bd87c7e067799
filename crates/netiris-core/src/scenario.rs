use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{NodeId, NodeKind, Scenario, Status};
use crate::topology::Topology;

/// Rejected fault-injection request. The topology is left untouched when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultError {
    UnknownTarget(NodeId),
    WrongTier { target: NodeId, expected: NodeKind },
}

impl std::fmt::Display for FaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTarget(id) => write!(f, "unknown target node {id}"),
            Self::WrongTier { target, expected } => {
                write!(f, "target {target} is not a {} node", expected.as_str())
            }
        }
    }
}

impl std::error::Error for FaultError {}

/// Apply a scenario to the base topology. Every invocation starts from a
/// fresh reset, so re-selecting the same scenario re-rolls its randomness
/// instead of compounding.
pub fn apply(topo: &mut Topology, scenario: Scenario, rng: &mut impl Rng) {
    // The untargeted path cannot fail: targets are picked from the graph.
    let _ = apply_targeted(topo, scenario, None, rng);
}

/// Scenario application with an optional explicit target (fault-injection
/// path). Only TOR_FAILURE and AGG_FAILURE accept a target; a target that
/// does not exist or sits on the wrong tier is rejected before any
/// mutation happens.
pub fn apply_targeted(
    topo: &mut Topology,
    scenario: Scenario,
    target: Option<&NodeId>,
    rng: &mut impl Rng,
) -> Result<(), FaultError> {
    let picked = match scenario {
        Scenario::TorFailure => Some(resolve_target(topo, target, NodeKind::Tor, rng)?),
        Scenario::AggFailure => Some(resolve_target(topo, target, NodeKind::Agg, rng)?),
        _ => None,
    };

    reset(topo, rng);

    match scenario {
        Scenario::Normal => {}
        Scenario::TorFailure => {
            if let Some(node) = picked.and_then(|id| topo.nodes.get_mut(&id)) {
                node.status = Status::Critical;
                node.packet_loss = 100.0;
                node.traffic = 0.0;
            }
        }
        Scenario::AggFailure => {
            let Some(agg_id) = picked else { return Ok(()) };
            let children = match topo.nodes.get_mut(&agg_id) {
                Some(agg) => {
                    agg.status = Status::Critical;
                    agg.packet_loss = 85.0;
                    agg.children.clone()
                }
                None => Vec::new(),
            };
            for child_id in children {
                if let Some(child) = topo.nodes.get_mut(&child_id) {
                    child.status = Status::Warning;
                    child.packet_loss = rng.gen_range(40.0..60.0);
                }
            }
        }
        Scenario::CoreFailure => {
            let core_id = topo.ids_of_kind(NodeKind::Core).into_iter().next();
            for node in topo.nodes.values_mut() {
                if Some(&node.id) == core_id.as_ref() {
                    node.status = Status::Critical;
                    node.packet_loss = 50.0;
                } else {
                    node.status = Status::Warning;
                }
            }
        }
        Scenario::HighLoad => {
            for node in topo.nodes.values_mut() {
                node.traffic = rng.gen_range(85.0..100.0);
                if node.traffic > 95.0 {
                    node.status = Status::Warning;
                }
            }
        }
    }

    Ok(())
}

fn reset(topo: &mut Topology, rng: &mut impl Rng) {
    for node in topo.nodes.values_mut() {
        node.status = Status::Normal;
        node.packet_loss = 0.0;
        node.traffic = rng.gen_range(20.0..50.0);
    }
}

fn resolve_target(
    topo: &Topology,
    target: Option<&NodeId>,
    expected: NodeKind,
    rng: &mut impl Rng,
) -> Result<NodeId, FaultError> {
    if let Some(id) = target {
        let node = topo
            .get(id)
            .ok_or_else(|| FaultError::UnknownTarget(id.clone()))?;
        if node.kind != expected {
            return Err(FaultError::WrongTier {
                target: id.clone(),
                expected,
            });
        }
        return Ok(id.clone());
    }

    let candidates = topo.ids_of_kind(expected);
    let picked = match expected {
        // AGG_FAILURE hits a fixed target: the second agg if present.
        NodeKind::Agg => candidates.get(1).or_else(|| candidates.first()).cloned(),
        _ => candidates.choose(rng).cloned(),
    };
    // Candidates are drawn from the graph itself, so this only fires on an
    // empty tier.
    picked.ok_or_else(|| FaultError::UnknownTarget(NodeId::from("<none>")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{generate, LayoutConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn topo() -> (Topology, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let t = generate(1600.0, 1200.0, &LayoutConfig::default(), &mut rng);
        (t, rng)
    }

    fn status_counts(t: &Topology) -> (usize, usize, usize) {
        let mut n = 0;
        let mut w = 0;
        let mut c = 0;
        for node in t.nodes.values() {
            match node.status {
                Status::Normal => n += 1,
                Status::Warning => w += 1,
                Status::Critical => c += 1,
            }
        }
        (n, w, c)
    }

    #[test]
    fn telemetry_stays_in_bounds_after_every_scenario() {
        for scenario in Scenario::ALL {
            let (mut t, mut rng) = topo();
            apply(&mut t, scenario, &mut rng);
            for node in t.nodes.values() {
                assert!((0.0..=100.0).contains(&node.traffic), "{scenario:?}");
                assert!((0.0..=100.0).contains(&node.packet_loss), "{scenario:?}");
            }
        }
    }

    #[test]
    fn normal_after_failure_clears_everything() {
        let (mut t, mut rng) = topo();
        apply(&mut t, Scenario::CoreFailure, &mut rng);
        apply(&mut t, Scenario::Normal, &mut rng);
        for node in t.nodes.values() {
            assert_eq!(node.status, Status::Normal);
            assert_eq!(node.packet_loss, 0.0);
            assert!((20.0..50.0).contains(&node.traffic));
        }
    }

    #[test]
    fn tor_failure_downs_exactly_one_tor() {
        let (mut t, mut rng) = topo();
        apply(&mut t, Scenario::TorFailure, &mut rng);
        let (_, w, c) = status_counts(&t);
        assert_eq!(w, 0);
        assert_eq!(c, 1);
        let failed = t
            .nodes
            .values()
            .find(|n| n.status == Status::Critical)
            .unwrap();
        assert_eq!(failed.kind, NodeKind::Tor);
        assert_eq!(failed.packet_loss, 100.0);
        assert_eq!(failed.traffic, 0.0);
    }

    #[test]
    fn agg_failure_marks_second_agg_and_only_its_children() {
        let (mut t, mut rng) = topo();
        apply(&mut t, Scenario::AggFailure, &mut rng);

        let failed = NodeId::from("AGG-02");
        let agg = t.get(&failed).unwrap();
        assert_eq!(agg.status, Status::Critical);
        assert_eq!(agg.packet_loss, 85.0);

        let children: Vec<NodeId> = agg.children.clone();
        for node in t.nodes.values() {
            if node.id == failed {
                continue;
            }
            if children.contains(&node.id) {
                assert_eq!(node.status, Status::Warning);
                assert!((40.0..60.0).contains(&node.packet_loss));
            } else {
                assert_eq!(node.status, Status::Normal);
            }
        }
    }

    #[test]
    fn core_failure_degrades_the_whole_tree() {
        let (mut t, mut rng) = topo();
        apply(&mut t, Scenario::CoreFailure, &mut rng);
        let core = t.get(&NodeId::from("CORE-01")).unwrap();
        assert_eq!(core.status, Status::Critical);
        assert_eq!(core.packet_loss, 50.0);
        let (n, w, c) = status_counts(&t);
        assert_eq!(n, 0);
        assert_eq!(c, 1);
        assert_eq!(w, t.len() - 1);
    }

    #[test]
    fn high_load_flags_only_hot_nodes() {
        let (mut t, mut rng) = topo();
        apply(&mut t, Scenario::HighLoad, &mut rng);
        for node in t.nodes.values() {
            assert!((85.0..100.0).contains(&node.traffic));
            if node.traffic > 95.0 {
                assert_eq!(node.status, Status::Warning);
            } else {
                assert_eq!(node.status, Status::Normal);
            }
        }
    }

    #[test]
    fn reapplying_a_scenario_rerolls_from_a_fresh_reset() {
        let (mut t, mut rng) = topo();
        apply(&mut t, Scenario::TorFailure, &mut rng);
        apply(&mut t, Scenario::TorFailure, &mut rng);
        // Still exactly one critical node; failures never accumulate.
        let (_, _, c) = status_counts(&t);
        assert_eq!(c, 1);
    }

    #[test]
    fn targeted_injection_hits_the_requested_node() {
        let (mut t, mut rng) = topo();
        let target = NodeId::from("TOR-100");
        apply_targeted(&mut t, Scenario::TorFailure, Some(&target), &mut rng).unwrap();
        assert_eq!(t.get(&target).unwrap().status, Status::Critical);
    }

    #[test]
    fn bad_targets_are_rejected_without_mutation() {
        let (mut t, mut rng) = topo();
        apply(&mut t, Scenario::HighLoad, &mut rng);
        let before: Vec<(NodeId, Status)> = t
            .nodes
            .values()
            .map(|n| (n.id.clone(), n.status))
            .collect();

        let missing = NodeId::from("TOR-999");
        let err =
            apply_targeted(&mut t, Scenario::TorFailure, Some(&missing), &mut rng).unwrap_err();
        assert_eq!(err, FaultError::UnknownTarget(missing));

        let core = NodeId::from("CORE-01");
        let err =
            apply_targeted(&mut t, Scenario::AggFailure, Some(&core), &mut rng).unwrap_err();
        assert!(matches!(err, FaultError::WrongTier { .. }));

        let after: Vec<(NodeId, Status)> = t
            .nodes
            .values()
            .map(|n| (n.id.clone(), n.status))
            .collect();
        assert_eq!(before, after);
    }
}
