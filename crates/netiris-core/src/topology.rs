use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f32::consts::TAU;

use crate::model::{NetworkNode, NodeId, NodeKind, Status};

/// Tuning knobs for the radial layout. Defaults reproduce the stock
/// 1 core / 16 agg / 384 tor arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub sector_count: usize,
    pub agg_per_sector: usize,
    pub tor_per_agg: usize,
    pub agg_radius: f32,
    pub tor_radius_start: f32,
    pub tor_radius_width: f32,
    /// Angular margin reserved at both ends of each sector, radians.
    pub sector_padding: f32,
    /// ToR fan width relative to the owning agg slice; >1 overlaps neighbors.
    pub tor_span_factor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sector_count: 4,
            agg_per_sector: 4,
            tor_per_agg: 24,
            agg_radius: 130.0,
            tor_radius_start: 260.0,
            tor_radius_width: 60.0,
            sector_padding: 0.15,
            tor_span_factor: 1.2,
        }
    }
}

/// The canonical node graph. Geometry is fixed at generation time; the
/// scenario engine mutates status/telemetry in place. Everything shown on
/// screen is derived from this, never the other way around.
#[derive(Debug, Clone)]
pub struct Topology {
    pub nodes: BTreeMap<NodeId, NetworkNode>,
    pub width: f32,
    pub height: f32,
}

impl Topology {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn get(&self, id: &NodeId) -> Option<&NetworkNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.kind == kind)
            .map(|n| n.id.clone())
            .collect()
    }

    /// Direct children, skipping ids that resolve to nothing.
    pub fn children_of(&self, id: &NodeId) -> Vec<&NetworkNode> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .collect()
    }
}

fn to_cartesian(r: f32, theta: f32) -> (f32, f32) {
    (r * theta.cos(), r * theta.sin())
}

fn rack_position(kind: NodeKind, sector: usize, index: usize) -> String {
    match kind {
        NodeKind::Core => "MDF-01-R01".to_string(),
        NodeKind::Agg => format!("IDF-0{}-R{}", sector + 1, index / 2 + 1),
        NodeKind::Tor => format!("CAB-{}-{}-U{}", sector + 1, index / 10 + 1, index % 42 + 1),
    }
}

/// Build the full three-tier topology for the given canvas size. The graph
/// shape is a pure function of `cfg`; only the telemetry seeds draw from
/// `rng`.
pub fn generate(width: f32, height: f32, cfg: &LayoutConfig, rng: &mut impl Rng) -> Topology {
    let mut nodes: BTreeMap<NodeId, NetworkNode> = BTreeMap::new();
    let center_x = width / 2.0;
    let center_y = height / 2.0;

    let core_id = NodeId::from("CORE-01");
    let mut core = NetworkNode {
        id: core_id.clone(),
        kind: NodeKind::Core,
        status: Status::Normal,
        parent_id: None,
        children: Vec::new(),
        x: center_x,
        y: center_y,
        angle: 0.0,
        radius: 0.0,
        ip: "10.0.0.1".to_string(),
        traffic: 45.0,
        packet_loss: 0.0,
        rack_position: rack_position(NodeKind::Core, 0, 0),
        capacity: "10 Tbps".to_string(),
    };

    let mut agg_counter = 0usize;
    let mut tor_counter = 0usize;

    for s in 0..cfg.sector_count {
        let sector_span = TAU / cfg.sector_count as f32;
        let sector_start = s as f32 * sector_span;
        let usable_span = sector_span - cfg.sector_padding * 2.0;
        let angle_step = usable_span / cfg.agg_per_sector as f32;

        for a in 0..cfg.agg_per_sector {
            let agg_id = NodeId(format!("AGG-{:02}", agg_counter + 1));
            let angle =
                sector_start + cfg.sector_padding + angle_step * a as f32 + angle_step / 2.0;
            let (dx, dy) = to_cartesian(cfg.agg_radius, angle);

            let mut agg = NetworkNode {
                id: agg_id.clone(),
                kind: NodeKind::Agg,
                status: Status::Normal,
                parent_id: Some(core_id.clone()),
                children: Vec::new(),
                x: center_x + dx,
                y: center_y + dy,
                angle,
                radius: cfg.agg_radius,
                ip: format!("10.1.{}.{}", s + 1, a + 1),
                traffic: rng.gen_range(30.0..50.0),
                packet_loss: 0.0,
                rack_position: rack_position(NodeKind::Agg, s, a),
                capacity: "1 Tbps".to_string(),
            };
            core.children.push(agg_id.clone());
            agg_counter += 1;

            // ToR fan: 3 radial rows, columns spread over a slightly
            // widened copy of the agg slice.
            let tor_span = angle_step * cfg.tor_span_factor;
            let tor_start = angle - tor_span / 2.0;
            let rows = 3usize;
            let tors_per_row = cfg.tor_per_agg / rows;
            let tor_angle_step = tor_span / tors_per_row as f32;

            for t in 0..cfg.tor_per_agg {
                let tor_id = NodeId(format!("TOR-{:03}", tor_counter + 1));
                let row = t % rows;
                let col = t / rows;

                let radius =
                    cfg.tor_radius_start + row as f32 * (cfg.tor_radius_width / rows as f32);
                let tor_angle = tor_start + col as f32 * tor_angle_step + tor_angle_step / 2.0;
                let (tx, ty) = to_cartesian(radius, tor_angle);

                let tor = NetworkNode {
                    id: tor_id.clone(),
                    kind: NodeKind::Tor,
                    status: Status::Normal,
                    parent_id: Some(agg_id.clone()),
                    children: Vec::new(),
                    x: center_x + tx,
                    y: center_y + ty,
                    angle: tor_angle,
                    radius,
                    ip: format!("10.2.{}.{}", agg_counter, t + 1),
                    traffic: rng.gen_range(10.0..25.0),
                    packet_loss: 0.0,
                    rack_position: rack_position(NodeKind::Tor, s, tor_counter),
                    capacity: "100 Gbps".to_string(),
                };
                agg.children.push(tor_id.clone());
                nodes.insert(tor_id, tor);
                tor_counter += 1;
            }

            nodes.insert(agg_id, agg);
        }
    }

    nodes.insert(core_id, core);

    Topology {
        nodes,
        width,
        height,
    }
}
