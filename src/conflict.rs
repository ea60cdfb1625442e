use crate::math::Point2d;
use crate::util::Interval;
use crate::vehicle::{Direction, Vehicle};
use crate::VehicleSet;
use cgmath::prelude::*;
use itertools::iproduct;

/// Clearance added to every side of a vehicle's bounding box, in px.
const BOX_BUFFER: f64 = 5.0;

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug)]
struct Box2d {
    x: Interval<f64>,
    y: Interval<f64>,
}

impl Box2d {
    /// The vehicle's box centred at `centre`, inflated by [BOX_BUFFER].
    fn around(vehicle: &Vehicle, centre: Point2d) -> Self {
        let (half_x, half_y) = vehicle.box_half_extents();
        Self {
            x: Interval::disc(centre.x, half_x + BOX_BUFFER),
            y: Interval::disc(centre.y, half_y + BOX_BUFFER),
        }
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y)
    }
}

/// Flags every fixed-direction vehicle that must give way this tick.
///
/// Each vehicle's box is predicted one step ahead at nominal speed and
/// compared against every other fixed-direction vehicle's box at its current
/// position. The check holds no state between frames, so a blocked vehicle
/// re-evaluates from scratch each tick and moves again as soon as the
/// conflict clears. Two vehicles yielding to each other simply both wait;
/// no deadlock resolution is attempted.
pub(crate) fn apply_right_of_way(vehicles: &VehicleSet) {
    let movers: Vec<_> = vehicles
        .iter()
        .filter(|(_, vehicle)| vehicle.direction().is_some())
        .collect();

    for (&(id, vehicle), &(other_id, other)) in iproduct!(movers.iter(), movers.iter()) {
        if id == other_id {
            continue;
        }
        let own = Box2d::around(vehicle, vehicle.predicted_position());
        let their = Box2d::around(other, other.position());
        if own.overlaps(&their) && yields_to(vehicle, other) {
            crate::debug::debug_yield(id, other_id);
            log::trace!("vehicle {:?} gives way to {:?}", id, other_id);
            vehicle.give_way();
        }
    }
}

/// Right of way between two conflicting movers: vertical traffic always
/// beats horizontal, and within the same axis class the vehicle further
/// along its own direction of travel goes first.
fn yields_to(vehicle: &Vehicle, other: &Vehicle) -> bool {
    let (dir, other_dir) = match (vehicle.direction(), other.direction()) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    match (dir.is_vertical(), other_dir.is_vertical()) {
        (false, true) => true,
        (true, false) => false,
        _ => progress(vehicle, dir) < progress(other, other_dir),
    }
}

/// How far a vehicle has travelled along its own direction of travel.
fn progress(vehicle: &Vehicle, dir: Direction) -> f64 {
    vehicle.position().to_vec().dot(dir.unit())
}
