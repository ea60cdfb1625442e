use crate::editor::{Editor, Tool};
use crate::simulation::{Simulation, StartError, INITIAL_VEHICLES};
use crate::vehicle::WrapBounds;

/// Which half of the sandbox is in control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Clicks edit the network; no vehicles exist.
    Editor,
    /// The network is frozen and vehicles drive it.
    Simulation,
}

/// An editing session and its simulation, switched between as a unit.
///
/// All state lives here: the editor owns the network, the simulation owns
/// the vehicles, and the sandbox owns both plus the mode flag. Everything
/// is in-memory and rebuilt per session.
pub struct Sandbox {
    editor: Editor,
    simulation: Simulation,
    mode: Mode,
    bounds: WrapBounds,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(WrapBounds::default())
    }
}

impl Sandbox {
    /// Creates a sandbox in editor mode with the given canvas bounds.
    pub fn new(bounds: WrapBounds) -> Self {
        Self {
            editor: Editor::new(),
            simulation: Simulation::new(),
            mode: Mode::Editor,
            bounds,
        }
    }

    /// As [new](Self::new), but with a fixed RNG seed for reproducible runs.
    pub fn seeded(bounds: WrapBounds, seed: u64) -> Self {
        Self {
            editor: Editor::new(),
            simulation: Simulation::seeded(seed),
            mode: Mode::Editor,
            bounds,
        }
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The canvas bounds fixed-direction vehicles wrap around.
    pub fn bounds(&self) -> WrapBounds {
        self.bounds
    }

    /// The editor and its network.
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Mutable access to the editor. Edits made during simulation mode are
    /// picked up by vehicles on their next tick.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// The simulation and its vehicles.
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Mutable access to the simulation.
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Validates the network and enters simulation mode.
    ///
    /// Seeds the initial vehicles and starts the clock. Fails if the
    /// network has fewer than two nodes or no roads, in which case the
    /// sandbox stays in editor mode with no vehicles spawned.
    pub fn start_simulation(&mut self) -> Result<(), StartError> {
        Simulation::validate(self.editor.graph())?;
        self.mode = Mode::Simulation;
        self.simulation.clear();
        self.simulation
            .spawn_followers(self.editor.graph(), INITIAL_VEHICLES);
        self.simulation.start();
        log::info!(
            "entered simulation mode with {} vehicles",
            self.simulation.len()
        );
        Ok(())
    }

    /// Returns to editor mode: pauses the clock, destroys all vehicles and
    /// reselects the node tool.
    pub fn reset(&mut self) {
        self.simulation.pause();
        self.simulation.clear();
        self.mode = Mode::Editor;
        self.editor.set_tool(Tool::PlaceNode);
        log::info!("returned to editor mode");
    }

    /// Pauses the simulation clock.
    pub fn pause(&mut self) {
        self.simulation.pause();
    }

    /// Resumes the simulation clock. Has no effect in editor mode.
    pub fn resume(&mut self) {
        if self.mode == Mode::Simulation {
            self.simulation.start();
        }
    }

    /// Advances the simulation one frame. Has no effect in editor mode.
    pub fn tick(&mut self) {
        if self.mode == Mode::Simulation {
            self.simulation.step(self.editor.graph());
        }
    }

    /// Handles the "add more cars" command: one new vehicle at a random
    /// connected node. Returns `false` in editor mode or when the picked
    /// node was isolated.
    pub fn add_vehicle(&mut self) -> bool {
        if self.mode != Mode::Simulation {
            return false;
        }
        self.simulation.add_follower(self.editor.graph()).is_some()
    }
}
