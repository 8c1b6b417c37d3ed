//! Benchmark profiles for the veer MDP toolkit.
//!
//! Pre-built models at benchmark scale:
//!
//! - [`unicycle_profile`]: open square scene, 8 headings, moderate noise
//! - [`two_robot_profile`]: open scene with two robots, 0.3 noise

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use veer_mdp::{TwoRobotModel, UnicycleModel};
use veer_scene::{SceneGrid, ScenarioConfig, ScenarioParams};

/// Build a unicycle model over an open `size` x `size` scene.
///
/// 8 headings, speed 1, noise margin 0.3, no turn failures.
pub fn unicycle_profile(size: u32) -> UnicycleModel {
    let grid = SceneGrid::filled(size, size, 0).expect("benchmark grid dimensions are valid");
    let config = ScenarioConfig {
        params: ScenarioParams::Unicycle {
            init_x: 0,
            init_y: 0,
            init_dir: 0,
            nof_directions: 8,
            speed: 1.0,
            position_update_noise: 0.3,
            turn_fail_probability: 0.1,
        },
        obstacle_code: 1,
        pickup_code: 2,
        delivery_code: 3,
    };
    UnicycleModel::new(grid, &config).expect("benchmark scenario is valid")
}

/// Build a two-robot model over an open `width` x `height` scene.
pub fn two_robot_profile(width: u32, height: u32) -> TwoRobotModel {
    let grid = SceneGrid::filled(width, height, 0).expect("benchmark grid dimensions are valid");
    let config = ScenarioConfig {
        params: ScenarioParams::TwoRobot {
            init_ax: 0,
            init_ay: 0,
            init_bx: 2,
            init_by: 0,
            position_update_noise: 0.3,
        },
        obstacle_code: 1,
        pickup_code: 2,
        delivery_code: 3,
    };
    TwoRobotModel::new(grid, &config).expect("benchmark scenario is valid")
}
