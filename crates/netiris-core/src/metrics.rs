use serde::{Deserialize, Serialize};

use crate::model::{NodeId, Status};
use crate::topology::Topology;

const ALERT_CAP: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    HighPacketLoss,
    HighTraffic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub node_id: NodeId,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Status,
    pub message: String,
}

/// Aggregate view over the whole topology, consumed by the sidebar and the
/// mock backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub total_nodes: usize,
    pub total_traffic: f32,
    pub total_packet_loss: f32,
    pub alerts: Vec<Alert>,
}

pub fn summarize(topo: &Topology) -> NetworkMetrics {
    let mut traffic_sum = 0.0f32;
    let mut loss_sum = 0.0f32;
    let mut alerts = Vec::new();

    for node in topo.nodes.values() {
        traffic_sum += node.traffic;
        loss_sum += node.packet_loss;

        if node.packet_loss > 10.0 {
            alerts.push(Alert {
                node_id: node.id.clone(),
                kind: AlertKind::HighPacketLoss,
                severity: if node.packet_loss > 50.0 {
                    Status::Critical
                } else {
                    Status::Warning
                },
                message: format!(
                    "{} experiencing high packet loss: {:.0}%",
                    node.id, node.packet_loss
                ),
            });
        }
        if node.traffic > 90.0 {
            alerts.push(Alert {
                node_id: node.id.clone(),
                kind: AlertKind::HighTraffic,
                severity: Status::Warning,
                message: format!("{} traffic overload: {:.0}%", node.id, node.traffic),
            });
        }
    }

    if alerts.len() > ALERT_CAP {
        alerts.drain(..alerts.len() - ALERT_CAP);
    }

    let count = topo.len().max(1) as f32;
    NetworkMetrics {
        total_nodes: topo.len(),
        total_traffic: (traffic_sum / count).round(),
        total_packet_loss: (loss_sum / count).round(),
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scenario;
    use crate::scenario;
    use crate::topology::{generate, LayoutConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn quiet_network_raises_no_alerts() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = generate(800.0, 600.0, &LayoutConfig::default(), &mut rng);
        scenario::apply(&mut t, Scenario::Normal, &mut rng);

        let m = summarize(&t);
        assert_eq!(m.total_nodes, t.len());
        assert!(m.alerts.is_empty());
        assert!((0.0..=100.0).contains(&m.total_traffic));
    }

    #[test]
    fn tor_failure_surfaces_a_critical_loss_alert() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut t = generate(800.0, 600.0, &LayoutConfig::default(), &mut rng);
        scenario::apply(&mut t, Scenario::TorFailure, &mut rng);

        let m = summarize(&t);
        assert!(m
            .alerts
            .iter()
            .any(|a| a.kind == AlertKind::HighPacketLoss && a.severity == Status::Critical));
    }

    #[test]
    fn alert_list_is_capped_at_the_most_recent_ten() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut t = generate(800.0, 600.0, &LayoutConfig::default(), &mut rng);
        scenario::apply(&mut t, Scenario::HighLoad, &mut rng);

        let m = summarize(&t);
        assert!(m.alerts.len() <= ALERT_CAP);
    }
}
