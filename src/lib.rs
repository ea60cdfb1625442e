pub use cgmath;
pub use editor::{Editor, Tool, NODE_HIT_RADIUS};
pub use graph::{Node, Road, RoadGraph, Route};
pub use sandbox::{Mode, Sandbox};
pub use simulation::{Simulation, StartError, INITIAL_VEHICLES};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use util::{Colour, Interval, CAR_BLUE, CAR_RED, ROUTE_COLOURS};
pub use vehicle::{
    Direction, Motion, Vehicle, VehicleAttributes, WrapBounds, FIXED_SIZE, FOLLOWER_SIZE,
    WRAP_MARGIN,
};

mod conflict;
mod debug;
mod editor;
mod graph;
pub mod math;
mod sandbox;
mod simulation;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Node].
    pub struct NodeId;
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type NodeSet = SlotMap<NodeId, Node>;
type VehicleSet = SlotMap<VehicleId, Vehicle>;
