use crate::math::Point2d;
use crate::util::{Colour, ROUTE_COLOURS};
use crate::{NodeId, NodeSet};
use cgmath::MetricSpace;
use itertools::Itertools;
use smallvec::SmallVec;

/// A junction or waypoint in the road network.
#[derive(Clone, Debug)]
pub struct Node {
    /// The node ID.
    id: NodeId,
    /// The position of the node in px.
    pos: Point2d,
    /// The nodes this one is directly connected to by a road.
    neighbours: SmallVec<[NodeId; 4]>,
}

impl Node {
    /// Gets the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The position of the node in px.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The nodes directly connected to this one.
    pub fn neighbours(&self) -> &[NodeId] {
        &self.neighbours
    }

    /// Whether a road connects this node to `other`.
    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.neighbours.contains(&other)
    }
}

/// An undirected road between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Road {
    a: NodeId,
    b: NodeId,
}

impl Road {
    /// The two nodes the road connects, in creation order.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    /// Whether the road connects the given unordered pair of nodes.
    pub fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }
}

/// A committed ordered path over connected nodes.
#[derive(Clone, Debug)]
pub struct Route {
    /// The nodes along the route. Consecutive nodes are always connected.
    nodes: Vec<NodeId>,
    /// The display colour assigned when the route was committed.
    colour: Colour,
}

impl Route {
    /// The nodes along the route, in order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The route's display colour.
    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// The number of nodes along the route. Always at least two.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// The editable road network: nodes, roads and committed routes.
///
/// Nodes and roads are only ever added, never removed, so node iteration
/// order is insertion order.
#[derive(Default)]
pub struct RoadGraph {
    /// The nodes in the network.
    nodes: NodeSet,
    /// The roads in the network. At most one per unordered node pair.
    roads: Vec<Road>,
    /// The committed routes.
    routes: Vec<Route>,
}

impl RoadGraph {
    /// Creates an empty road network.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a node at the given position and returns its ID.
    /// Coincident nodes are permitted.
    pub fn add_node(&mut self, pos: Point2d) -> NodeId {
        let id = self.nodes.insert_with_key(|id| Node {
            id,
            pos,
            neighbours: SmallVec::new(),
        });
        log::debug!("placed node {:?} at ({:.1}, {:.1})", id, pos.x, pos.y);
        id
    }

    /// Finds the first node within `tolerance` px of `pos`,
    /// scanning nodes in insertion order.
    pub fn find_node_near(&self, pos: Point2d, tolerance: f64) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.pos.distance(pos) < tolerance)
            .map(|node| node.id)
    }

    /// Connects two nodes with a road, updating both neighbour lists.
    ///
    /// Connecting a node to itself, an unknown node, or a pair that already
    /// has a road is a no-op. Returns `true` iff a road was added.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || !self.nodes.contains_key(a) || !self.nodes.contains_key(b) {
            return false;
        }
        if self.roads.iter().any(|road| road.joins(a, b)) {
            return false;
        }
        self.roads.push(Road { a, b });
        self.nodes[a].neighbours.push(b);
        self.nodes[b].neighbours.push(a);
        log::debug!("connected {:?} and {:?}", a, b);
        true
    }

    /// Whether a road exists between the unordered pair of nodes.
    pub fn are_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.roads.iter().any(|road| road.joins(a, b))
    }

    /// Stores a committed route, assigning it the next palette colour.
    ///
    /// Callers must have validated the sequence: at least two nodes, each
    /// consecutive pair connected, no node visited twice.
    pub(crate) fn add_route(&mut self, nodes: Vec<NodeId>) {
        debug_assert!(nodes.len() >= 2);
        debug_assert!(nodes
            .iter()
            .tuple_windows()
            .all(|(a, b)| self.are_connected(*a, *b)));
        let colour = ROUTE_COLOURS[self.routes.len() % ROUTE_COLOURS.len()];
        log::debug!("committed route of {} nodes", nodes.len());
        self.routes.push(Route { nodes, colour });
    }

    /// Gets a reference to the node with the given ID.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Whether the network contains the given node.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns an iterator over all the nodes in the network, in insertion order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns an iterator over all the roads in the network.
    pub fn iter_roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.iter()
    }

    /// Returns an iterator over all the committed routes.
    pub fn iter_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// The number of nodes in the network.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The number of roads in the network.
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    /// The number of committed routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// The underlying node set, for the motion model.
    pub(crate) fn nodes(&self) -> &NodeSet {
        &self.nodes
    }
}
