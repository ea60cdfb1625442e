use crate::math::{Point2d, Vector2d};
use crate::util::Colour;
use crate::{NodeId, NodeSet, VehicleId};
use cgmath::prelude::*;
use rand::Rng;
use smallvec::SmallVec;
use std::cell::Cell;
use std::f64::consts::FRAC_PI_2;

/// Distance past the canvas edge at which a fixed-direction vehicle wraps, in px.
pub const WRAP_MARGIN: f64 = 50.0;

/// Body size of a graph-following vehicle in px (across, along).
pub const FOLLOWER_SIZE: (f64, f64) = (15.0, 30.0);

/// Body size of a fixed-direction vehicle in px (across, along the travel axis).
pub const FIXED_SIZE: (f64, f64) = (25.0, 50.0);

/// A compass direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// A unit vector along the direction of travel.
    /// The y axis points down, matching canvas coordinates.
    pub fn unit(self) -> Vector2d {
        match self {
            Direction::Up => Vector2d::new(0.0, -1.0),
            Direction::Down => Vector2d::new(0.0, 1.0),
            Direction::Left => Vector2d::new(-1.0, 0.0),
            Direction::Right => Vector2d::new(1.0, 0.0),
        }
    }

    /// Whether the direction runs along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// The bounds that fixed-direction vehicles wrap around, in px.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WrapBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for WrapBounds {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// How a vehicle decides where to move each tick.
#[derive(Clone, Debug)]
pub enum Motion {
    /// Travels along a compass direction and wraps around the canvas bounds.
    Fixed {
        direction: Direction,
        bounds: WrapBounds,
    },
    /// Walks the road graph node to node, choosing each next target at random.
    Follower {
        /// The node the vehicle last departed from or arrived at.
        current: NodeId,
        /// The node the vehicle is moving towards, if it has one.
        target: Option<NodeId>,
        /// The node the vehicle most recently arrived from.
        came_from: Option<NodeId>,
    },
}

/// The attributes of a simulated vehicle.
#[derive(Clone, Copy)]
pub struct VehicleAttributes {
    /// Nominal speed in px per tick.
    pub speed: f64,
    /// The body colour.
    pub colour: Colour,
}

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID.
    id: VehicleId,
    /// The world position of the centre of the vehicle, in px.
    pos: Point2d,
    /// Nominal speed in px per tick.
    speed: f64,
    /// Unit vector along the vehicle's heading.
    heading: Vector2d,
    /// Half the vehicle's extent across the travel axis, in px.
    half_across: f64,
    /// Half the vehicle's extent along the travel axis, in px.
    half_along: f64,
    /// The body colour.
    colour: Colour,
    /// The motion model.
    motion: Motion,
    /// Set during the conflict pass when the vehicle must give way this tick.
    yielding: Cell<bool>,
}

impl Vehicle {
    /// Creates a fixed-direction vehicle.
    pub(crate) fn fixed(
        id: VehicleId,
        attributes: &VehicleAttributes,
        direction: Direction,
        pos: Point2d,
        bounds: WrapBounds,
    ) -> Self {
        let (across, along) = FIXED_SIZE;
        Self {
            id,
            pos,
            speed: attributes.speed,
            heading: direction.unit(),
            half_across: 0.5 * across,
            half_along: 0.5 * along,
            colour: attributes.colour,
            motion: Motion::Fixed { direction, bounds },
            yielding: Cell::new(false),
        }
    }

    /// Creates a graph-following vehicle at the given node
    /// and picks its first target.
    pub(crate) fn follower(
        id: VehicleId,
        attributes: &VehicleAttributes,
        start: NodeId,
        nodes: &NodeSet,
        rng: &mut impl Rng,
    ) -> Self {
        let (across, along) = FOLLOWER_SIZE;
        Self {
            id,
            pos: nodes[start].position(),
            speed: attributes.speed,
            heading: Vector2d::new(0.0, -1.0),
            half_across: 0.5 * across,
            half_along: 0.5 * along,
            colour: attributes.colour,
            motion: Motion::Follower {
                current: start,
                target: next_target(nodes, start, None, rng),
                came_from: None,
            },
            yielding: Cell::new(false),
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The world position of the centre of the vehicle, in px.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The vehicle's nominal speed in px per tick.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The body colour.
    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// The vehicle's extent across the travel axis, in px.
    pub fn width(&self) -> f64 {
        2.0 * self.half_across
    }

    /// The vehicle's extent along the travel axis, in px.
    pub fn length(&self) -> f64 {
        2.0 * self.half_along
    }

    /// The render rotation in radians: the heading angle
    /// plus a quarter turn so the body sits across the travel axis.
    pub fn orientation(&self) -> f64 {
        self.heading.y.atan2(self.heading.x) + FRAC_PI_2
    }

    /// The motion model.
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// The compass direction, for fixed-direction vehicles.
    pub fn direction(&self) -> Option<Direction> {
        match &self.motion {
            Motion::Fixed { direction, .. } => Some(*direction),
            Motion::Follower { .. } => None,
        }
    }

    /// The position the vehicle would reach this tick at nominal speed.
    pub(crate) fn predicted_position(&self) -> Point2d {
        match &self.motion {
            Motion::Fixed { direction, .. } => self.pos + self.speed * direction.unit(),
            Motion::Follower { .. } => self.pos,
        }
    }

    /// Half extents of the vehicle's axis-aligned bounding box, as (x, y).
    /// The long side runs along the travel axis.
    pub(crate) fn box_half_extents(&self) -> (f64, f64) {
        match self.direction() {
            Some(d) if d.is_vertical() => (self.half_across, self.half_along),
            Some(_) => (self.half_along, self.half_across),
            None => (self.half_across, self.half_along),
        }
    }

    /// Flags the vehicle to give way this tick.
    pub(crate) fn give_way(&self) {
        self.yielding.set(true);
    }

    /// Scales the vehicle's nominal speed by `factor`.
    pub(crate) fn scale_speed(&mut self, factor: f64) {
        self.speed *= factor;
    }

    /// Advances the vehicle by one tick.
    pub(crate) fn step(&mut self, nodes: &NodeSet, rng: &mut impl Rng) {
        // A vehicle flagged during the conflict pass stays put for the tick.
        let speed = if self.yielding.take() { 0.0 } else { self.speed };
        match self.motion {
            Motion::Fixed { direction, bounds } => self.step_fixed(direction, bounds, speed),
            Motion::Follower { .. } => self.step_follower(nodes, speed, rng),
        }
    }

    /// Moves along the compass axis, teleporting to the opposite edge
    /// once the vehicle is more than [WRAP_MARGIN] past a canvas bound.
    fn step_fixed(&mut self, direction: Direction, bounds: WrapBounds, speed: f64) {
        match direction {
            Direction::Down => {
                self.pos.y += speed;
                if self.pos.y > bounds.height + WRAP_MARGIN {
                    self.pos.y = -WRAP_MARGIN;
                }
            }
            Direction::Right => {
                self.pos.x += speed;
                if self.pos.x > bounds.width + WRAP_MARGIN {
                    self.pos.x = -WRAP_MARGIN;
                }
            }
            Direction::Up => {
                self.pos.y -= speed;
                if self.pos.y < -WRAP_MARGIN {
                    self.pos.y = bounds.height + WRAP_MARGIN;
                }
            }
            Direction::Left => {
                self.pos.x -= speed;
                if self.pos.x < -WRAP_MARGIN {
                    self.pos.x = bounds.width + WRAP_MARGIN;
                }
            }
        }
    }

    fn step_follower(&mut self, nodes: &NodeSet, speed: f64, rng: &mut impl Rng) {
        let Motion::Follower {
            current,
            target,
            came_from,
        } = &mut self.motion
        else {
            unreachable!()
        };

        let Some(tgt) = *target else {
            // Stranded. Re-check the node so an edge added later revives it.
            *target = next_target(nodes, *current, *came_from, rng);
            return;
        };

        let to_target = nodes[tgt].position() - self.pos;
        let dist = to_target.magnitude();

        if dist < speed {
            // Arrived at the target node.
            self.pos = nodes[tgt].position();
            let from = *current;
            *current = tgt;
            *came_from = Some(from);
            *target = next_target(nodes, tgt, Some(from), rng);
            return;
        }

        let dir = to_target / dist;
        self.pos += speed * dir;
        self.heading = dir;
    }
}

/// Picks the next node for a follower at `node`: a uniform choice among its
/// neighbours, excluding `arrived_from` whenever another option exists.
/// Returns `None` for a node with no neighbours.
fn next_target(
    nodes: &NodeSet,
    node: NodeId,
    arrived_from: Option<NodeId>,
    rng: &mut impl Rng,
) -> Option<NodeId> {
    let neighbours = nodes[node].neighbours();
    if neighbours.is_empty() {
        return None;
    }
    let candidates: SmallVec<[NodeId; 4]> = neighbours
        .iter()
        .copied()
        .filter(|id| Some(*id) != arrived_from)
        .collect();
    let pool: &[NodeId] = if candidates.is_empty() {
        neighbours
    } else {
        &candidates
    };
    Some(pool[rng.gen_range(0..pool.len())])
}
