use crate::graph::RoadGraph;
use crate::math::Point2d;
use crate::NodeId;

/// Radius in px within which a click selects an existing node.
pub const NODE_HIT_RADIUS: f64 = 15.0;

/// The active editing tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    /// Clicks place new nodes.
    PlaceNode,
    /// Clicks select two nodes in turn and connect them with a road.
    CreateRoad,
    /// Clicks extend the route under construction.
    CreateRoute,
}

/// The road network editor.
///
/// Owns the graph plus the transient editing state: the node selected while
/// building a road, and the ordered node sequence of a route under
/// construction. Invalid clicks are policy no-ops, never errors.
pub struct Editor {
    /// The network being edited.
    graph: RoadGraph,
    /// The active tool.
    tool: Tool,
    /// The first node of a road being built, if one is selected.
    selected: Option<NodeId>,
    /// The route under construction. Only non-empty in route mode.
    current_route: Vec<NodeId>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Creates an editor over an empty network, with the node tool active.
    pub fn new() -> Self {
        Self {
            graph: RoadGraph::new(),
            tool: Tool::PlaceNode,
            selected: None,
            current_route: vec![],
        }
    }

    /// The network being edited.
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// Mutable access to the network, for programmatic construction.
    pub fn graph_mut(&mut self) -> &mut RoadGraph {
        &mut self.graph
    }

    /// The active tool.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// The node currently selected as the start of a road.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The route under construction, in order.
    pub fn route_in_progress(&self) -> &[NodeId] {
        &self.current_route
    }

    /// Switches the active tool.
    ///
    /// The road-building selection never survives a tool change, and any
    /// route under construction is discarded without being committed.
    /// Selecting [Tool::CreateRoute] always starts a fresh route.
    pub fn set_tool(&mut self, tool: Tool) {
        if !self.current_route.is_empty() {
            log::debug!(
                "discarded in-progress route of {} nodes",
                self.current_route.len()
            );
        }
        self.selected = None;
        self.current_route.clear();
        self.tool = tool;
        log::debug!("tool changed to {:?}", tool);
    }

    /// Handles a canvas click at `pos` with the active tool.
    pub fn click(&mut self, pos: Point2d) {
        match self.tool {
            Tool::PlaceNode => {
                self.graph.add_node(pos);
            }
            Tool::CreateRoad => self.click_road(pos),
            Tool::CreateRoute => self.click_route(pos),
        }
    }

    /// Two-click road creation: first click selects, second connects.
    fn click_road(&mut self, pos: Point2d) {
        let hit = self.graph.find_node_near(pos, NODE_HIT_RADIUS);
        let Some(hit) = hit else {
            // Clicking empty canvas resets the selection.
            self.selected = None;
            return;
        };
        match self.selected.take() {
            None => self.selected = Some(hit),
            Some(first) => {
                if first != hit {
                    self.graph.connect(first, hit);
                }
            }
        }
    }

    fn click_route(&mut self, pos: Point2d) {
        if let Some(hit) = self.graph.find_node_near(pos, NODE_HIT_RADIUS) {
            self.extend_route(hit);
        }
    }

    /// Activates route mode and starts a new, empty route.
    pub fn begin_route(&mut self) {
        self.set_tool(Tool::CreateRoute);
    }

    /// Appends a node to the route under construction.
    ///
    /// Accepted only when the route is empty, or when `node` is a neighbour
    /// of the last node and not already part of the route (routes are simple
    /// paths). Anything else is silently ignored.
    pub fn extend_route(&mut self, node: NodeId) {
        if !self.graph.contains_node(node) {
            return;
        }
        match self.current_route.last() {
            None => self.current_route.push(node),
            Some(&last) => {
                if self.graph.node(last).is_connected_to(node)
                    && !self.current_route.contains(&node)
                {
                    self.current_route.push(node);
                }
            }
        }
    }

    /// Commits the route under construction.
    ///
    /// Routes shorter than two nodes are discarded rather than stored.
    /// Returns `true` iff a route was committed.
    pub fn commit_route(&mut self) -> bool {
        let route = std::mem::take(&mut self.current_route);
        if route.len() >= 2 {
            self.graph.add_route(route);
            true
        } else {
            false
        }
    }
}
