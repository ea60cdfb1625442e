use crate::conflict;
use crate::graph::RoadGraph;
use crate::math::Point2d;
use crate::util::{CAR_BLUE, CAR_RED};
use crate::vehicle::{Direction, Vehicle, VehicleAttributes, WrapBounds};
use crate::{NodeId, VehicleId, VehicleSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use thiserror::Error;

/// Number of vehicles seeded when a simulation starts.
pub const INITIAL_VEHICLES: usize = 5;

/// Base vehicle speed in px per tick.
const BASE_SPEED: f64 = 2.0;

/// Upper bound of the uniform jitter added to [BASE_SPEED].
const SPEED_JITTER: f64 = 1.5;

/// Why a simulation could not be started.
///
/// This is the only surfaced validation failure in the crate; every other
/// invalid operation is a silent policy no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// The network needs at least two nodes before vehicles can drive it.
    #[error("at least two nodes are required to start the simulation (have {0})")]
    NotEnoughNodes(usize),
    /// The network has nodes but nothing connecting them.
    #[error("at least one road is required to start the simulation")]
    NoRoads,
}

/// A vehicle simulation over a road network.
///
/// The simulation owns the vehicles and reads the network by reference each
/// step; the network itself remains owned by the editor.
pub struct Simulation {
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// Whether [step](Self::step) advances the vehicles.
    running: bool,
    /// The current frame of simulation.
    frame: usize,
    /// Source of randomness for spawning and target choice.
    rng: StdRng,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates a new, paused simulation.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a simulation with a fixed RNG seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            vehicles: VehicleSet::default(),
            running: false,
            frame: 0,
            rng,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Checks that the network can sustain a simulation:
    /// at least two nodes and at least one road.
    pub fn validate(graph: &RoadGraph) -> Result<(), StartError> {
        if graph.node_count() < 2 {
            return Err(StartError::NotEnoughNodes(graph.node_count()));
        }
        if graph.road_count() == 0 {
            return Err(StartError::NoRoads);
        }
        Ok(())
    }

    /// Starts the simulation clock.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            log::info!("simulation started");
        }
    }

    /// Pauses the simulation clock. Vehicles keep their state.
    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            log::info!("simulation paused");
        }
    }

    /// Whether the simulation clock is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Seeds up to `count` graph-following vehicles at random nodes.
    ///
    /// Picks that land on a node with no neighbours are skipped, so a fully
    /// connected network yields exactly `count` vehicles.
    pub fn spawn_followers(&mut self, graph: &RoadGraph, count: usize) {
        for _ in 0..count {
            self.add_follower(graph);
        }
        log::debug!("spawned {} vehicles", self.vehicles.len());
    }

    /// Adds a single graph-following vehicle at a random node.
    ///
    /// Returns the new vehicle's ID, or `None` if the network is empty or
    /// the picked node has no neighbours.
    pub fn add_follower(&mut self, graph: &RoadGraph) -> Option<VehicleId> {
        let nodes = graph.nodes();
        if nodes.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..nodes.len());
        let start = nodes.keys().nth(pick)?;
        if nodes[start].neighbours().is_empty() {
            log::debug!("skipped spawn at isolated node {:?}", start);
            return None;
        }
        self.add_follower_at(graph, start)
    }

    /// Adds a graph-following vehicle at the given node.
    ///
    /// A vehicle placed at a node with no neighbours stays put until the
    /// editor connects the node to the network. Returns `None` only for an
    /// unknown node.
    pub fn add_follower_at(&mut self, graph: &RoadGraph, start: NodeId) -> Option<VehicleId> {
        let nodes = graph.nodes();
        if !nodes.contains_key(start) {
            return None;
        }
        let attributes = VehicleAttributes {
            speed: BASE_SPEED + self.rng.gen::<f64>() * SPEED_JITTER,
            colour: if self.rng.gen::<bool>() {
                CAR_BLUE
            } else {
                CAR_RED
            },
        };
        let rng = &mut self.rng;
        let id = self
            .vehicles
            .insert_with_key(|id| Vehicle::follower(id, &attributes, start, nodes, rng));
        Some(id)
    }

    /// Adds a fixed-direction vehicle with explicit attributes.
    pub fn add_fixed(
        &mut self,
        attributes: &VehicleAttributes,
        direction: Direction,
        pos: Point2d,
        bounds: WrapBounds,
    ) -> VehicleId {
        self.vehicles
            .insert_with_key(|id| Vehicle::fixed(id, attributes, direction, pos, bounds))
    }

    /// Adds a fixed-direction vehicle with a randomised speed and the
    /// conventional colour for its axis.
    pub fn spawn_fixed(
        &mut self,
        direction: Direction,
        pos: Point2d,
        bounds: WrapBounds,
    ) -> VehicleId {
        let attributes = VehicleAttributes {
            speed: BASE_SPEED + self.rng.gen::<f64>() * SPEED_JITTER,
            colour: if direction.is_vertical() {
                CAR_BLUE
            } else {
                CAR_RED
            },
        };
        self.add_fixed(&attributes, direction, pos, bounds)
    }

    /// Randomly scales each vehicle's speed by a factor sampled from a
    /// normal distribution with a mean of 1 (no adjustment) and standard
    /// deviation of `stddev`, clamped to [0.75, 1.25].
    pub fn randomise_speeds(&mut self, stddev: f64) {
        let distr = rand_distr::Normal::new(1.0, stddev).expect("Invalid standard deviation");
        for (_, vehicle) in &mut self.vehicles {
            let factor = distr.sample(&mut self.rng).clamp(0.75, 1.25);
            vehicle.scale_speed(factor);
        }
    }

    /// Removes every vehicle and rewinds the frame counter.
    pub fn clear(&mut self) {
        if !self.vehicles.is_empty() {
            log::debug!("destroyed {} vehicles", self.vehicles.len());
        }
        self.vehicles.clear();
        self.frame = 0;
    }

    /// Advances the simulation by one tick.
    ///
    /// Does nothing while the simulation is paused. Otherwise runs the
    /// right-of-way pass, then moves every vehicle.
    pub fn step(&mut self, graph: &RoadGraph) {
        if !self.running {
            return;
        }

        conflict::apply_right_of_way(&self.vehicles);

        let nodes = graph.nodes();
        let rng = &mut self.rng;
        for (_, vehicle) in &mut self.vehicles {
            vehicle.step(nodes, rng);
        }
        self.frame += 1;

        #[cfg(feature = "debug")]
        {
            self.debug = crate::debug::take_debug_frame();
        }
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    /// The number of live vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the simulation has no vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Gets the debugging information for the previously simulated frame.
    #[cfg(feature = "debug")]
    pub fn debug(&self) -> serde_json::Value {
        self.debug.clone()
    }
}
