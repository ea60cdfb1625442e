use std::time::Instant;

use traffic_sketch::math::Point2d;
use traffic_sketch::{Direction, Sandbox, WrapBounds};

fn main() {
    env_logger::init();

    let bounds = WrapBounds::default();
    let mut sandbox = Sandbox::new(bounds);

    // A small ring of connected nodes for the followers to wander.
    let ring = [
        Point2d::new(150.0, 150.0),
        Point2d::new(650.0, 120.0),
        Point2d::new(680.0, 460.0),
        Point2d::new(400.0, 520.0),
        Point2d::new(130.0, 430.0),
    ];
    let graph = sandbox.editor_mut().graph_mut();
    let ids: Vec<_> = ring.iter().map(|pos| graph.add_node(*pos)).collect();
    for i in 0..ids.len() {
        graph.connect(ids[i], ids[(i + 1) % ids.len()]);
    }

    sandbox.start_simulation().expect("network should be valid");

    // The crossroad scene: four lanes of wrapping traffic.
    let sim = sandbox.simulation_mut();
    for i in 0..4 {
        let offset = -100.0 - 100.0 * i as f64;
        sim.spawn_fixed(Direction::Down, Point2d::new(370.0, offset), bounds);
        sim.spawn_fixed(Direction::Right, Point2d::new(offset, 270.0), bounds);
    }

    println!("Simulating...");
    const NUM_FRAMES: u32 = 10_000;
    loop {
        let start = Instant::now();
        for _ in 0..NUM_FRAMES {
            sandbox.tick();
        }
        let frame = start.elapsed() / NUM_FRAMES;
        println!(
            "Avg. frame: {:?} ({} vehicles, frame {})",
            frame,
            sandbox.simulation().len(),
            sandbox.simulation().frame(),
        );
    }
}
