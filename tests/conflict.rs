//! Tests of the right-of-way rule between fixed-direction vehicles.

use assert_approx_eq::assert_approx_eq;
use traffic_sketch::math::Point2d;
use traffic_sketch::{Direction, RoadGraph, Simulation, VehicleAttributes, WrapBounds, CAR_BLUE};

const ATTRS: VehicleAttributes = VehicleAttributes {
    speed: 2.0,
    colour: CAR_BLUE,
};

fn sim() -> (Simulation, RoadGraph) {
    let mut sim = Simulation::seeded(1);
    sim.start();
    (sim, RoadGraph::new())
}

#[test]
fn horizontal_mover_yields_to_vertical() {
    let (mut sim, graph) = sim();
    let bounds = WrapBounds::default();
    let vertical = sim.add_fixed(&ATTRS, Direction::Down, Point2d::new(400.0, 300.0), bounds);
    let horizontal = sim.add_fixed(&ATTRS, Direction::Right, Point2d::new(360.0, 300.0), bounds);

    sim.step(&graph);

    // Vertical traffic keeps its nominal speed; the horizontal mover waits.
    assert_approx_eq!(sim.get_vehicle(vertical).position().y, 302.0);
    assert_approx_eq!(sim.get_vehicle(horizontal).position().x, 360.0);
}

#[test]
fn trailing_vehicle_yields_on_a_shared_axis() {
    let (mut sim, graph) = sim();
    let bounds = WrapBounds::default();
    let leader = sim.add_fixed(&ATTRS, Direction::Down, Point2d::new(400.0, 300.0), bounds);
    let trailing = sim.add_fixed(&ATTRS, Direction::Down, Point2d::new(400.0, 260.0), bounds);

    sim.step(&graph);

    assert_approx_eq!(sim.get_vehicle(leader).position().y, 302.0);
    assert_approx_eq!(sim.get_vehicle(trailing).position().y, 260.0);
}

#[test]
fn distant_vehicles_do_not_interact() {
    let (mut sim, graph) = sim();
    let bounds = WrapBounds::default();
    let a = sim.add_fixed(&ATTRS, Direction::Down, Point2d::new(100.0, 100.0), bounds);
    let b = sim.add_fixed(&ATTRS, Direction::Right, Point2d::new(600.0, 500.0), bounds);

    sim.step(&graph);

    assert_approx_eq!(sim.get_vehicle(a).position().y, 102.0);
    assert_approx_eq!(sim.get_vehicle(b).position().x, 602.0);
}

#[test]
fn yielding_is_reactive_not_sticky() {
    let (mut sim, graph) = sim();
    let bounds = WrapBounds::default();
    let fast = VehicleAttributes {
        speed: 3.0,
        ..ATTRS
    };
    let leader = sim.add_fixed(&fast, Direction::Down, Point2d::new(400.0, 300.0), bounds);
    let trailing = sim.add_fixed(&ATTRS, Direction::Down, Point2d::new(400.0, 260.0), bounds);

    // The faster leader pulls away; once the predicted boxes stop
    // overlapping, the trailing vehicle is released the very same tick.
    for _ in 0..20 {
        sim.step(&graph);
    }
    let leader_y = sim.get_vehicle(leader).position().y;
    let trailing_y = sim.get_vehicle(trailing).position().y;
    assert_approx_eq!(leader_y, 360.0);
    assert!(trailing_y > 260.0, "trailing vehicle should be released");
    assert!(trailing_y < leader_y);
}

#[test]
fn followers_are_ignored_by_the_conflict_pass() {
    let mut graph = RoadGraph::new();
    let a = graph.add_node(Point2d::new(400.0, 320.0));
    let b = graph.add_node(Point2d::new(400.0, 600.0));
    graph.connect(a, b);

    let mut sim = Simulation::seeded(1);
    sim.start();
    let bounds = WrapBounds::default();
    // A follower sits right in the path of a fixed-direction mover.
    sim.add_follower_at(&graph, a).unwrap();
    let mover = sim.add_fixed(&ATTRS, Direction::Down, Point2d::new(400.0, 300.0), bounds);

    sim.step(&graph);

    assert_approx_eq!(sim.get_vehicle(mover).position().y, 302.0);
}
