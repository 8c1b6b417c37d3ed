//! Execute a synthesized always-straight policy on a unicycle scene.
//!
//! Builds the MDP in memory, generates a strategy artifact whose memory
//! component tracks the current MDP state, and walks it on the control
//! loop until the agent crashes into the boundary or 40 ticks elapse.
//! Exits 1 on any validation failure, 0 on quit.

use crossbeam_channel::unbounded;
use std::fmt::Write as _;
use std::process;
use veer_core::{ActionId, StateId};
use veer_mdp::{StateSpace, TransitionTable, UnicycleModel};
use veer_policy::PolicyAutomaton;
use veer_scene::{ParamFile, SceneGrid, ScenarioConfig};
use veer_sim::{ControlEvent, SimLoop, Simulator};

/// Strategy text for "always drive straight": one automaton state per
/// MDP state with memory tracking the observed state. Memory 0 is
/// swapped with the initial state's id so the automaton start `(0, 0)`
/// observes the initial state. Error outcomes route to an absent
/// coordinate, which the simulator treats as crashed.
fn straight_policy(states: &StateSpace, table: &TransitionTable, init: StateId) -> String {
    let memory_of = |s: StateId| -> u32 {
        if s == init {
            0
        } else if s.0 == 0 {
            init.0
        } else {
            s.0
        }
    };

    let mut body = String::new();
    let mut count = 0usize;
    for (id, _) in states.iter() {
        let successors = table
            .successor_list(id, ActionId(0))
            .expect("every state has a straight action");
        let _ = writeln!(body, "0 {} {id} 0", memory_of(id));
        for &(dest, _) in successors {
            if dest == states.error_state() {
                let _ = writeln!(body, "-> {dest} 1 0");
            } else {
                let _ = writeln!(body, "-> {dest} 0 {}", memory_of(dest));
            }
        }
        count += 1;
    }
    format!("{count}\n{body}")
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let grid = SceneGrid::filled(5, 5, 0)?;
    let params = ParamFile::parse(
        "nofDirections = 4\n\
         initX = 2\n\
         initY = 2\n\
         initDir = 0\n\
         positionUpdateNoise = 0.2\n\
         unicycleSpeed = 1.0\n",
    )?;
    let config = ScenarioConfig::from_params(&params)?;
    let model = UnicycleModel::new(grid, &config)?;
    let states = StateSpace::build(&model)?;
    let table = TransitionTable::build(&model, &states)?;
    let init = states.initial_state(&model)?;

    let artifact = straight_policy(&states, &table, init);
    let automaton = PolicyAutomaton::parse(artifact.as_bytes())?;
    automaton.check_against(&table)?;

    let sim = Simulator::new(&table, &automaton).with_state_space(&states);
    let (tx, rx) = unbounded();
    let mut looped = SimLoop::new(sim, 42, rx);

    let mut frames = 0u32;
    while let Some(frame) = looped.tick() {
        let (tick, report) = frame?;
        frames += 1;
        match &report.config {
            Some(config) => println!(
                "tick {tick}: at ({}, {}) heading {}",
                config[0], config[1], config[2]
            ),
            None => {
                println!("tick {tick}: crashed");
                break;
            }
        }
        if frames >= 40 {
            tx.send(ControlEvent::Quit)?;
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
