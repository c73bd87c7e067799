use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::server::SharedBackend;

const TICK: Duration = Duration::from_secs(2);

/// Background drift so the exposed telemetry looks alive between fault
/// injections: every tick a handful of nodes wander in traffic and
/// packet loss, clamped to their legal ranges.
pub fn spawn(backend: SharedBackend) {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut interval = tokio::time::interval(TICK);
        loop {
            interval.tick().await;

            let mut b = backend.write().await;
            let ids: Vec<_> = b.topo.nodes.keys().cloned().collect();
            let updates = rng.gen_range(1..=5);
            for id in ids.choose_multiple(&mut rng, updates) {
                let Some(node) = b.topo.nodes.get_mut(id) else {
                    continue;
                };
                node.traffic =
                    (node.traffic + (rng.gen::<f32>() - 0.5) * 10.0).clamp(5.0, 100.0);
                if rng.gen::<f32>() < 0.1 {
                    node.packet_loss = (node.packet_loss + rng.gen::<f32>() * 5.0).min(100.0);
                } else {
                    node.packet_loss = (node.packet_loss - rng.gen::<f32>() * 2.0).max(0.0);
                }
            }
            b.touch();
            tracing::debug!(updates, "telemetry drift applied");
        }
    });
}
