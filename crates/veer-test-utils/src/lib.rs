//! Test fixtures for veer development.
//!
//! Small scenes and scenario configurations shared across the
//! workspace's test suites, using the conventional category codes
//! (0 free, 1 obstacle, 2 pickup, 3 delivery).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use veer_scene::{ParamFile, SceneGrid, ScenarioConfig};

pub const FREE: u8 = 0;
pub const OBSTACLE: u8 = 1;
pub const PICKUP: u8 = 2;
pub const DELIVERY: u8 = 3;

/// An obstacle-free scene.
pub fn open_scene(width: u32, height: u32) -> SceneGrid {
    SceneGrid::filled(width, height, FREE).expect("fixture grid dimensions are valid")
}

/// An open scene with one obstacle cell.
pub fn scene_with_obstacle(width: u32, height: u32, ox: u32, oy: u32) -> SceneGrid {
    let mut rows = vec![vec![FREE; width as usize]; height as usize];
    rows[oy as usize][ox as usize] = OBSTACLE;
    SceneGrid::from_rows(&rows).expect("fixture grid dimensions are valid")
}

/// A 5x3 scene with a pickup cell at (1, 1) and a delivery cell at
/// (3, 1), suitable for exercising the two-robot carry interaction.
pub fn carry_scene() -> SceneGrid {
    let mut rows = vec![vec![FREE; 5]; 3];
    rows[1][1] = PICKUP;
    rows[1][3] = DELIVERY;
    SceneGrid::from_rows(&rows).expect("fixture grid dimensions are valid")
}

/// A unicycle scenario over an open scene.
///
/// `noise` is the positional-noise margin; heading count is 4 and the
/// agent starts at (1, 1) heading 0.
pub fn unicycle_config(speed: f64, noise: f64, turn_fail: f64) -> ScenarioConfig {
    let text = format!(
        "nofDirections = 4\n\
         initX = 1\n\
         initY = 1\n\
         initDir = 0\n\
         positionUpdateNoise = {noise}\n\
         unicycleSpeed = {speed}\n\
         probabilityDirectionChangeFail = {turn_fail}\n"
    );
    let pf = ParamFile::parse(&text).expect("fixture parameters parse");
    ScenarioConfig::from_params(&pf).expect("fixture parameters are complete")
}

/// A two-robot scenario with A at (0, 1) and B at (2, 1).
pub fn two_robot_config(noise: f64) -> ScenarioConfig {
    let text = format!(
        "initXA = 0\n\
         initYA = 1\n\
         initXB = 2\n\
         initYB = 1\n\
         positionUpdateNoise = {noise}\n"
    );
    let pf = ParamFile::parse(&text).expect("fixture parameters parse");
    ScenarioConfig::from_params(&pf).expect("fixture parameters are complete")
}
