//! Build a two-robot MDP and export the solver-facing files.
//!
//! Usage: `export_mdp [output-dir]` (defaults to the system temp dir).
//! Exits 1 on any validation failure, 0 on success.

use std::path::PathBuf;
use std::process;
use veer_mdp::{io, StateSpace, TransitionTable, TwoRobotModel};
use veer_scene::{ParamFile, SceneGrid, ScenarioConfig};

fn run(out_dir: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    // A 5x3 scene: free cells except a pickup at (1, 1) and a delivery
    // at (3, 1). An external asset loader would normally supply this.
    let mut rows = vec![vec![0u8; 5]; 3];
    rows[1][1] = 2;
    rows[1][3] = 3;
    let grid = SceneGrid::from_rows(&rows)?;

    let params = ParamFile::parse(
        "initXA = 0\n\
         initYA = 1\n\
         initXB = 2\n\
         initYB = 1\n\
         positionUpdateNoise = 0.3\n",
    )?;
    let config = ScenarioConfig::from_params(&params)?;

    let model = TwoRobotModel::new(grid, &config)?;
    let states = StateSpace::build(&model)?;
    let table = TransitionTable::build(&model, &states)?;
    let initial = states.initial_state(&model)?;

    io::commit_states(&out_dir.join("two-robots.sta"), &model, &states)?;
    io::commit_labels(&out_dir.join("two-robots.lab"), initial)?;
    io::commit_transitions(&out_dir.join("two-robots.tra"), &table)?;

    let summary = table.summary();
    println!(
        "exported {} states, {} records (size hint {}) to {}",
        summary.num_states,
        summary.num_records,
        summary.size_hint,
        out_dir.display()
    );
    Ok(())
}

fn main() {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    if let Err(e) = run(&out_dir) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
