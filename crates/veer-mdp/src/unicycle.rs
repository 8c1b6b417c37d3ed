//! Continuous-image overlap dynamics for a heading-based agent.
//!
//! One step translates the agent's unit cell by a fixed distance in the
//! direction of its discretized heading. The translated cell, expanded
//! by the positional-noise margin, is the motion image; each grid cell
//! receives probability proportional to its area of overlap with that
//! image. Heading changes are commanded by the action and may fail with
//! a configured probability, mixing two weighted images into one
//! distribution.

use crate::dynamics::Dynamics;
use crate::error::MdpError;
use crate::state_space::StateSpace;
use smallvec::{smallvec, SmallVec};
use std::f64::consts::TAU;
use veer_core::{ActionId, Config, MassAccumulator, ERROR_SENTINEL};
use veer_scene::{SceneGrid, ScenarioConfig, ScenarioParams};

/// Heading command selected by a unicycle action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum HeadingCommand {
    /// Keep the current heading.
    Straight = 0,
    /// Increment the heading index (modulo the direction count).
    TurnLeft = 1,
    /// Decrement the heading index (modulo the direction count).
    TurnRight = 2,
}

impl HeadingCommand {
    /// Decode an action id, or `None` for out-of-range ids.
    pub fn from_action(action: ActionId) -> Option<Self> {
        match action.0 {
            0 => Some(Self::Straight),
            1 => Some(Self::TurnLeft),
            2 => Some(Self::TurnRight),
            _ => None,
        }
    }
}

/// Single-agent unicycle-style dynamics over `(x, y, heading)` states.
pub struct UnicycleModel {
    grid: SceneGrid,
    nof_directions: u32,
    speed: f64,
    noise: f64,
    turn_fail: f64,
    init: (u32, u32, u32),
    obstacle_code: u8,
}

impl UnicycleModel {
    /// Build the model, validating the scenario against the scene.
    pub fn new(grid: SceneGrid, config: &ScenarioConfig) -> Result<Self, MdpError> {
        config
            .validate(&grid)
            .map_err(|e| MdpError::InvalidScenario {
                reason: e.to_string(),
            })?;
        match config.params {
            ScenarioParams::Unicycle {
                init_x,
                init_y,
                init_dir,
                nof_directions,
                speed,
                position_update_noise,
                turn_fail_probability,
            } => Ok(Self {
                grid,
                nof_directions,
                speed,
                noise: position_update_noise,
                turn_fail: turn_fail_probability,
                init: (init_x, init_y, init_dir),
                obstacle_code: config.obstacle_code,
            }),
            _ => Err(MdpError::InvalidScenario {
                reason: "UnicycleModel requires unicycle scenario parameters".to_string(),
            }),
        }
    }

    /// Per-step displacement of a heading index.
    ///
    /// Heading convention: `dx = sin(2π·h/n)·speed`,
    /// `dy = cos(2π·h/n)·speed` (sin on x, cos on y). Heading 0 moves
    /// along +y. The convention is load-bearing for artifact
    /// reproducibility; do not swap the pair.
    pub fn displacement(&self, heading: u32) -> (f64, f64) {
        let angle = TAU * f64::from(heading) / f64::from(self.nof_directions);
        (angle.sin() * self.speed, angle.cos() * self.speed)
    }

    /// Accumulate one weighted motion image into `acc`.
    ///
    /// The unit cell at `(x, y)` translates by the displacement of
    /// `motion_heading`; the bounding box of its four corners expands by
    /// the noise margin on all sides. Overlapping cells receive
    /// `weight * overlap / image_area` on the state
    /// `(cell, dest_heading)`; off-grid and obstacle cells feed the
    /// error bucket. A degenerate zero-area image leaves the whole
    /// weight on the current cell.
    fn accumulate_image(
        &self,
        x: i32,
        y: i32,
        motion_heading: u32,
        dest_heading: u32,
        weight: f64,
        states: &StateSpace,
        acc: &mut MassAccumulator,
    ) {
        let (dx, dy) = self.displacement(motion_heading);
        let min_x = f64::from(x) + dx - self.noise;
        let max_x = f64::from(x) + 1.0 + dx + self.noise;
        let min_y = f64::from(y) + dy - self.noise;
        let max_y = f64::from(y) + 1.0 + dy + self.noise;
        let area = (max_x - min_x) * (max_y - min_y);

        if area <= 0.0 {
            // Degenerate image: the whole mass stays put.
            match states.state_of(&smallvec![x, y, dest_heading as i32]) {
                Some(dest) => acc.add(dest, weight),
                None => acc.add_error(weight),
            }
            return;
        }

        for cx in (min_x.floor() as i32)..(max_x.ceil() as i32) {
            let overlap_x = (f64::from(cx) + 1.0).min(max_x) - f64::from(cx).max(min_x);
            if overlap_x <= 0.0 {
                continue;
            }
            for cy in (min_y.floor() as i32)..(max_y.ceil() as i32) {
                let overlap_y = (f64::from(cy) + 1.0).min(max_y) - f64::from(cy).max(min_y);
                if overlap_y <= 0.0 {
                    continue;
                }
                let mass = weight * overlap_x * overlap_y / area;
                if mass <= 0.0 {
                    continue;
                }
                if self.grid.is_code_or_oob(cx, cy, self.obstacle_code) {
                    acc.add_error(mass);
                } else {
                    match states.state_of(&smallvec![cx, cy, dest_heading as i32]) {
                        Some(dest) => acc.add(dest, mass),
                        None => acc.add_error(mass),
                    }
                }
            }
        }
    }
}

impl Dynamics for UnicycleModel {
    fn field_names(&self) -> Vec<&'static str> {
        vec![
            "xpos", "ypos", "direction", "color2", "color3", "color4", "color5", "color6",
            "color7", "color8",
        ]
    }

    fn enumerate(&self) -> Vec<Config> {
        let mut out = Vec::new();
        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                if self.grid.code_at(x, y) == self.obstacle_code {
                    continue;
                }
                for d in 0..self.nof_directions {
                    out.push(smallvec![x as i32, y as i32, d as i32]);
                }
            }
        }
        out
    }

    fn initial_config(&self) -> Config {
        let (x, y, d) = self.init;
        smallvec![x as i32, y as i32, d as i32]
    }

    fn actions(&self, _config: &Config) -> SmallVec<[ActionId; 32]> {
        smallvec![ActionId(0), ActionId(1), ActionId(2)]
    }

    fn successors(
        &self,
        config: &Config,
        action: ActionId,
        states: &StateSpace,
    ) -> MassAccumulator {
        let (x, y, dir) = (config[0], config[1], config[2] as u32);
        let n = self.nof_directions;
        let mut acc = MassAccumulator::new();

        let Some(command) = HeadingCommand::from_action(action) else {
            return acc;
        };
        let commanded = match command {
            HeadingCommand::Straight => dir,
            HeadingCommand::TurnLeft => (dir + 1) % n,
            HeadingCommand::TurnRight => (dir + n - 1) % n,
        };

        if commanded == dir || self.turn_fail == 0.0 {
            self.accumulate_image(x, y, commanded, commanded, 1.0, states, &mut acc);
        } else {
            // Commanded image plus the no-heading-change image of the
            // failed turn, weighted into one distribution.
            self.accumulate_image(
                x,
                y,
                commanded,
                commanded,
                1.0 - self.turn_fail,
                states,
                &mut acc,
            );
            self.accumulate_image(x, y, dir, dir, self.turn_fail, states, &mut acc);
        }
        acc
    }

    fn encode_fields(&self, config: &Config) -> Vec<i32> {
        let (x, y) = (config[0], config[1]);
        let mut out = vec![x, y, config[2]];
        let color = self.grid.code_at(x as u32, y as u32);
        for c in 2..=8u8 {
            out.push(i32::from(color == c));
        }
        out
    }

    fn sentinel_fields(&self) -> Vec<i32> {
        let mut out = vec![ERROR_SENTINEL; 3];
        out.extend(std::iter::repeat(0).take(7));
        out
    }
}
