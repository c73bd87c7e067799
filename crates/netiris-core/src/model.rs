use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Core,
    Agg,
    Tor,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "CORE",
            Self::Agg => "AGG",
            Self::Tor => "TOR",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Normal,
    Warning,
    Critical,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

/// One switch in the three-tier hierarchy. Geometry (`x`, `y`, `angle`,
/// `radius`) is fixed at generation time; only `status` and telemetry are
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub status: Status,
    pub parent_id: Option<NodeId>,
    #[serde(rename = "childrenIds")]
    pub children: Vec<NodeId>,

    pub x: f32,
    pub y: f32,
    /// Polar angle from canvas center, radians.
    pub angle: f32,
    /// Polar distance from canvas center.
    pub radius: f32,

    pub ip: String,
    /// 0-100%.
    pub traffic: f32,
    /// 0-100%.
    pub packet_loss: f32,
    pub rack_position: String,
    pub capacity: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    Normal,
    TorFailure,
    AggFailure,
    CoreFailure,
    HighLoad,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Normal,
        Scenario::TorFailure,
        Scenario::AggFailure,
        Scenario::CoreFailure,
        Scenario::HighLoad,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::TorFailure => "TOR_FAILURE",
            Self::AggFailure => "AGG_FAILURE",
            Self::CoreFailure => "CORE_FAILURE",
            Self::HighLoad => "HIGH_LOAD",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::TorFailure => "ToR Failure",
            Self::AggFailure => "Agg Failure",
            Self::CoreFailure => "Core Failure",
            Self::HighLoad => "High Load",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Normal => "Optimal network performance. Traffic flowing smoothly.",
            Self::TorFailure => {
                "Single Point of Failure. Access switch unreachability detected."
            }
            Self::AggFailure => "Aggregation Failure. Downstream impact analysis active.",
            Self::CoreFailure => "CRITICAL: Core switch instability. Network-wide outage risk.",
            Self::HighLoad => "Traffic Surge. Buffer capacities nearing threshold.",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::TorFailure | Self::AggFailure | Self::CoreFailure)
    }
}
