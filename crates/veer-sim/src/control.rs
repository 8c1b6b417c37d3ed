//! The fixed-tick cooperative control loop.
//!
//! External controllers (a renderer's event loop, a CLI) deliver
//! [`ControlEvent`]s over a channel; the loop drains pending events
//! between ticks (the only cancellation points) and otherwise steps
//! the simulator at the current tick rate. Pausing keeps the loop
//! polling for events at a reduced rate.

use crate::error::SimError;
use crate::simulator::{SimReport, Simulator};
use crossbeam_channel::{Receiver, TryRecvError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use veer_core::TickId;

/// Initial ticks-per-second of a fresh loop.
pub const DEFAULT_TICK_RATE: u32 = 10;

/// Polling rate while paused.
const PAUSED_POLL_RATE: u32 = 3;

/// External control requests, consumed between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    /// Advance a single tick (meaningful while paused).
    Step,
    /// Toggle the paused state.
    TogglePause,
    /// Return the cursor to `(0, 0)` unconditionally.
    Reset,
    /// Increase the tick rate by one tick per second.
    SpeedUp,
    /// Decrease the tick rate by one tick per second (floor 1).
    SlowDown,
    /// Leave the loop.
    Quit,
}

/// Drives a [`Simulator`] on a fixed-tick loop under external control.
///
/// The random source is a reseedable [`ChaCha8Rng`]: identical seeds
/// replay identical successor sequences.
pub struct SimLoop<'a> {
    sim: Simulator<'a>,
    rng: ChaCha8Rng,
    events: Receiver<ControlEvent>,
    paused: bool,
    ticks_per_second: u32,
    ticks: u64,
}

impl<'a> SimLoop<'a> {
    /// Build a loop around a simulator with a deterministic seed.
    pub fn new(sim: Simulator<'a>, seed: u64, events: Receiver<ControlEvent>) -> Self {
        Self {
            sim,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events,
            paused: false,
            ticks_per_second: DEFAULT_TICK_RATE,
            ticks: 0,
        }
    }

    /// Current tick rate in ticks per second.
    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// `true` while the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The wrapped simulator.
    pub fn simulator(&self) -> &Simulator<'a> {
        &self.sim
    }

    /// Drain pending control events.
    ///
    /// Returns `(quit, step)`: whether a quit was requested and whether
    /// a single-step request is pending.
    fn drain_events(&mut self) -> (bool, bool) {
        let mut step = false;
        loop {
            match self.events.try_recv() {
                Ok(ControlEvent::Quit) => return (true, step),
                Ok(ControlEvent::TogglePause) => self.paused = !self.paused,
                Ok(ControlEvent::Reset) => self.sim.reset(),
                Ok(ControlEvent::SpeedUp) => self.ticks_per_second += 1,
                Ok(ControlEvent::SlowDown) => {
                    self.ticks_per_second = self.ticks_per_second.saturating_sub(1).max(1);
                }
                Ok(ControlEvent::Step) => step = true,
                Err(TryRecvError::Empty) => return (false, step),
                // A dropped sender means the controller is gone.
                Err(TryRecvError::Disconnected) => return (true, step),
            }
        }
    }

    /// Process pending events and, unless paused without a step
    /// request, advance one tick.
    ///
    /// Returns `None` when a quit was requested, otherwise the report
    /// of this iteration (the unchanged current report when paused).
    pub fn tick(&mut self) -> Option<Result<(TickId, SimReport), SimError>> {
        let (quit, step) = self.drain_events();
        if quit {
            return None;
        }
        if self.paused && !step {
            return Some(Ok((TickId(self.ticks), self.sim.report())));
        }
        match self.sim.step(&mut self.rng) {
            Ok(report) => {
                self.ticks += 1;
                Some(Ok((TickId(self.ticks), report)))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Run until a quit request (or controller disconnect), invoking
    /// `on_frame` with every frame.
    ///
    /// Blocks the calling thread, sleeping between ticks to hold the
    /// tick rate. Fatal simulator inconsistencies abort the loop.
    pub fn run<F>(mut self, mut on_frame: F) -> Result<(), SimError>
    where
        F: FnMut(TickId, &SimReport, u32),
    {
        loop {
            let rate = if self.paused {
                PAUSED_POLL_RATE
            } else {
                self.ticks_per_second
            };
            match self.tick() {
                None => return Ok(()),
                Some(Ok((tick, report))) => on_frame(tick, &report, self.ticks_per_second),
                Some(Err(e)) => return Err(e),
            }
            std::thread::sleep(Duration::from_secs_f64(1.0 / f64::from(rate)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use veer_mdp::{StateSpace, TransitionTable, TwoRobotModel};
    use veer_policy::PolicyAutomaton;
    use veer_scene::{ParamFile, ScenarioConfig};
    use veer_test_utils::open_scene;

    fn fixture() -> (StateSpace, TransitionTable, PolicyAutomaton) {
        // A self-contained 3x1 two-robot world driven by a stay-stay
        // policy: the automaton loops on one state forever.
        let grid = open_scene(3, 1);
        let pf = ParamFile::parse(
            "initXA = 0\ninitYA = 0\ninitXB = 2\ninitYB = 0\npositionUpdateNoise = 0.0\n",
        )
        .unwrap();
        let config = ScenarioConfig::from_params(&pf).unwrap();
        let model = TwoRobotModel::new(grid, &config).unwrap();
        let states = StateSpace::build(&model).unwrap();
        let table = TransitionTable::build(&model, &states).unwrap();

        let init = states.initial_state(&model).unwrap();
        // Action 24 = both robots stay: deterministic self-loop.
        let artifact = format!("1\n0 0 {init} 24\n-> {init} 0 0\n");
        let automaton = PolicyAutomaton::parse(artifact.as_bytes()).unwrap();
        automaton.check_against(&table).unwrap();
        (states, table, automaton)
    }

    #[test]
    fn quit_event_ends_the_loop() {
        let (states, table, automaton) = fixture();
        let sim = Simulator::new(&table, &automaton).with_state_space(&states);
        let (tx, rx) = unbounded();
        let mut looped = SimLoop::new(sim, 7, rx);
        tx.send(ControlEvent::Quit).unwrap();
        assert!(looped.tick().is_none());
    }

    #[test]
    fn pause_holds_the_cursor_and_step_advances_once() {
        let (states, table, automaton) = fixture();
        let sim = Simulator::new(&table, &automaton).with_state_space(&states);
        let (tx, rx) = unbounded();
        let mut looped = SimLoop::new(sim, 7, rx);

        tx.send(ControlEvent::TogglePause).unwrap();
        let (tick, _) = looped.tick().unwrap().unwrap();
        assert_eq!(tick, TickId(0), "paused tick must not advance");
        assert!(looped.is_paused());

        tx.send(ControlEvent::Step).unwrap();
        let (tick, report) = looped.tick().unwrap().unwrap();
        assert_eq!(tick, TickId(1), "step request advances exactly once");
        assert!(!report.crashed);
    }

    #[test]
    fn speed_adjustments_clamp_at_one() {
        let (states, table, automaton) = fixture();
        let sim = Simulator::new(&table, &automaton).with_state_space(&states);
        let (tx, rx) = unbounded();
        let mut looped = SimLoop::new(sim, 7, rx);

        for _ in 0..(DEFAULT_TICK_RATE + 5) {
            tx.send(ControlEvent::SlowDown).unwrap();
        }
        tx.send(ControlEvent::SpeedUp).unwrap();
        looped.tick().unwrap().unwrap();
        assert_eq!(looped.ticks_per_second(), 2);
    }

    #[test]
    fn reset_event_reaches_the_simulator() {
        let (states, table, automaton) = fixture();
        let sim = Simulator::new(&table, &automaton).with_state_space(&states);
        let (tx, rx) = unbounded();
        let mut looped = SimLoop::new(sim, 7, rx);
        looped.tick().unwrap().unwrap();
        tx.send(ControlEvent::Reset).unwrap();
        looped.tick().unwrap().unwrap();
        assert_eq!(
            looped.simulator().cursor(),
            veer_policy::Cursor { control: 0, memory: 0 }
        );
    }

    #[test]
    fn model_reports_realized_initial_configuration() {
        let (states, table, automaton) = fixture();
        let mut sim = Simulator::new(&table, &automaton).with_state_space(&states);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = sim.step(&mut rng).unwrap();
        let model_init: Vec<i32> = vec![0, 0, 2, 0, 0, 0];
        assert_eq!(report.config.unwrap().as_slice(), model_init.as_slice());
    }
}
