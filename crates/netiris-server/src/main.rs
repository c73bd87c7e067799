mod jitter;
mod server;

use anyhow::Result;
use netiris_core::{topology, LayoutConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::RwLock;

use server::Backend;

// Matches the default canvas the viewer opens with; geometry only matters
// to clients that render the returned coordinates.
const CANVAS_W: f32 = 1600.0;
const CANVAS_H: f32 = 1200.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn bind_addr() -> String {
    std::env::var("NETIRIS_ADDR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "127.0.0.1:3001".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let addr = bind_addr();

    let mut rng = StdRng::from_entropy();
    let topo = topology::generate(CANVAS_W, CANVAS_H, &LayoutConfig::default(), &mut rng);
    tracing::info!(nodes = topo.len(), "topology generated");

    let backend = Arc::new(RwLock::new(Backend::new(topo)));

    jitter::spawn(Arc::clone(&backend));

    server::run(&addr, backend).await
}
