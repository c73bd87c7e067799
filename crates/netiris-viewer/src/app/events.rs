use bevy::prelude::Event;
use netiris_core::NodeId;

/// Click resolution from the interaction layer. `None` means the click
/// landed on empty canvas and clears the selection.
#[derive(Event)]
pub struct Picked(pub Option<NodeId>);
