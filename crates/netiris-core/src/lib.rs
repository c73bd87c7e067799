pub mod metrics;
pub mod model;
pub mod scenario;
pub mod topology;

pub use metrics::{Alert, AlertKind, NetworkMetrics};
pub use model::{NetworkNode, NodeId, NodeKind, Scenario, Status};
pub use scenario::FaultError;
pub use topology::{LayoutConfig, Topology};
