//! Noised-cardinal dynamics and the two-robot carry scenario.
//!
//! Motion is over the 4-neighbourhood plus "stay": the intended
//! direction is realized with probability `1 - noise`, each of the other
//! three cardinals with `noise / 3`. Outcomes that would leave the grid
//! or enter an obstacle cell fold into the error bucket. The two-robot
//! model composes two independent single-agent distributions by product
//! measure and then applies the joint carry rules.

use crate::dynamics::Dynamics;
use crate::error::MdpError;
use crate::state_space::StateSpace;
use smallvec::{smallvec, SmallVec};
use veer_core::{ActionId, Config, MassAccumulator, ERROR_SENTINEL};
use veer_scene::{SceneGrid, ScenarioConfig, ScenarioParams};

/// Direction index for the deterministic "stay" move.
pub const STAY_DIRECTION: u32 = 4;

/// Joint action id of the pickup/drop interaction.
///
/// Motion actions occupy `0..25` (`dir_a * 5 + dir_b`); the interaction
/// is the single action beyond them.
pub const INTERACT_ACTION: ActionId = ActionId(25);

/// `(dx, dy)` offsets of the four cardinal directions, in direction-id
/// order: west, east, north, south.
const CARDINAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Single-agent noised-cardinal step distribution over cells.
///
/// Returns `(x, y, probability)` outcomes in fixed direction order,
/// with one final `(-1, -1, p)` entry holding the mass of invalid
/// outcomes (off-grid or obstacle), if any. `dir` 0–3 selects a
/// cardinal; [`STAY_DIRECTION`] stays put with probability 1.
pub fn noised_cardinal_step(
    grid: &SceneGrid,
    obstacle_code: u8,
    noise: f64,
    x: u32,
    y: u32,
    dir: u32,
) -> SmallVec<[(i32, i32, f64); 5]> {
    if dir == STAY_DIRECTION {
        return smallvec![(x as i32, y as i32, 1.0)];
    }

    let mut probs = [noise / 3.0; 4];
    probs[dir as usize] = 1.0 - noise;

    let mut out: SmallVec<[(i32, i32, f64); 5]> = SmallVec::new();
    let mut error_prob = 0.0;
    for (i, (dx, dy)) in CARDINAL_OFFSETS.iter().enumerate() {
        let tx = x as i32 + dx;
        let ty = y as i32 + dy;
        if grid.is_code_or_oob(tx, ty, obstacle_code) {
            error_prob += probs[i];
        } else {
            out.push((tx, ty, probs[i]));
        }
    }
    if error_prob > 0.0 {
        out.push((ERROR_SENTINEL, ERROR_SENTINEL, error_prob));
    }
    out
}

/// Two robots on one grid: noised-cardinal motion, joint actions, and a
/// carry interaction over designated feature cells.
///
/// Configurations are `(xA, yA, xB, yB, carry, carry_success)`. The
/// carry relationship requires B two cells east of A; the cell between
/// them is the interaction site (pickup to set `carry`, delivery to
/// trade it for `carry_success`).
pub struct TwoRobotModel {
    grid: SceneGrid,
    noise: f64,
    init: (u32, u32, u32, u32),
    obstacle_code: u8,
    pickup_code: u8,
    delivery_code: u8,
}

impl TwoRobotModel {
    /// Build the model, validating the scenario against the scene.
    pub fn new(grid: SceneGrid, config: &ScenarioConfig) -> Result<Self, MdpError> {
        config
            .validate(&grid)
            .map_err(|e| MdpError::InvalidScenario {
                reason: e.to_string(),
            })?;
        match config.params {
            ScenarioParams::TwoRobot {
                init_ax,
                init_ay,
                init_bx,
                init_by,
                position_update_noise,
            } => Ok(Self {
                grid,
                noise: position_update_noise,
                init: (init_ax, init_ay, init_bx, init_by),
                obstacle_code: config.obstacle_code,
                pickup_code: config.pickup_code,
                delivery_code: config.delivery_code,
            }),
            _ => Err(MdpError::InvalidScenario {
                reason: "TwoRobotModel requires two-robot scenario parameters".to_string(),
            }),
        }
    }

    /// Joint motion action id for a pair of direction indices (0–4 each).
    pub fn motion_action(dir_a: u32, dir_b: u32) -> ActionId {
        ActionId(dir_a * 5 + dir_b)
    }

    fn is_free(&self, x: u32, y: u32) -> bool {
        self.grid.code_at(x, y) != self.obstacle_code
    }

    /// B exactly two cells east of A, same row.
    fn carry_adjacent(xa: i32, ya: i32, xb: i32, yb: i32) -> bool {
        xb == xa + 2 && ya == yb
    }

    fn gap_code(&self, xa: i32, ya: i32) -> Option<u8> {
        self.grid.get(xa + 1, ya)
    }
}

impl Dynamics for TwoRobotModel {
    fn field_names(&self) -> Vec<&'static str> {
        vec![
            "xposA", "yposA", "xposB", "yposB", "color2A", "color3A", "color4A", "color5A",
            "color6A", "color7A", "color8A", "color2B", "color3B", "color4B", "color5B",
            "color6B", "color7B", "color8B", "carry", "carrySuccess",
        ]
    }

    fn enumerate(&self) -> Vec<Config> {
        let mut out = Vec::new();
        for xa in 0..self.grid.width() {
            for ya in 0..self.grid.height() {
                for xb in 0..self.grid.width() {
                    for yb in 0..self.grid.height() {
                        if (xa, ya) == (xb, yb) {
                            continue;
                        }
                        if !self.is_free(xa, ya) || !self.is_free(xb, yb) {
                            continue;
                        }
                        let (xa, ya, xb, yb) = (xa as i32, ya as i32, xb as i32, yb as i32);
                        out.push(smallvec![xa, ya, xb, yb, 0, 0]);
                        if Self::carry_adjacent(xa, ya, xb, yb) {
                            out.push(smallvec![xa, ya, xb, yb, 1, 0]);
                            if self.gap_code(xa, ya) == Some(self.delivery_code) {
                                out.push(smallvec![xa, ya, xb, yb, 0, 1]);
                            }
                        }
                    }
                }
            }
        }
        out
    }

    fn initial_config(&self) -> Config {
        let (ax, ay, bx, by) = self.init;
        smallvec![ax as i32, ay as i32, bx as i32, by as i32, 0, 0]
    }

    fn actions(&self, config: &Config) -> SmallVec<[ActionId; 32]> {
        let (xa, ya, xb, yb) = (config[0], config[1], config[2], config[3]);
        let carry = config[4];
        let carry_success = config[5];

        // A completed delivery admits only the recovery action.
        if carry_success == 1 {
            return smallvec![ActionId(0)];
        }

        let mut out: SmallVec<[ActionId; 32]> = (0..25).map(ActionId).collect();
        if Self::carry_adjacent(xa, ya, xb, yb) {
            let gap = self.gap_code(xa, ya);
            let pickup = carry == 0 && gap == Some(self.pickup_code);
            let drop = carry == 1 && gap == Some(self.delivery_code);
            if pickup || drop {
                out.push(INTERACT_ACTION);
            }
        }
        out
    }

    fn successors(
        &self,
        config: &Config,
        action: ActionId,
        states: &StateSpace,
    ) -> MassAccumulator {
        let (xa, ya, xb, yb) = (config[0], config[1], config[2], config[3]);
        let carry = config[4];
        let carry_success = config[5];
        let mut acc = MassAccumulator::new();

        // Recovery after a completed delivery: deterministic flag clear.
        if carry_success == 1 {
            match states.state_of(&smallvec![xa, ya, xb, yb, 0, 0]) {
                Some(dest) => acc.add(dest, 1.0),
                None => acc.add_error(1.0),
            }
            return acc;
        }

        // Pickup/drop: deterministic carry-flag transition in place.
        if action == INTERACT_ACTION {
            let dest_config: Config = if carry == 0 {
                smallvec![xa, ya, xb, yb, 1, 0]
            } else {
                smallvec![xa, ya, xb, yb, 0, 1]
            };
            match states.state_of(&dest_config) {
                Some(dest) => acc.add(dest, 1.0),
                None => acc.add_error(1.0),
            }
            return acc;
        }

        let dir_a = action.0 / 5;
        let dir_b = action.0 % 5;
        let succ_a = noised_cardinal_step(
            &self.grid,
            self.obstacle_code,
            self.noise,
            xa as u32,
            ya as u32,
            dir_a,
        );
        let succ_b = noised_cardinal_step(
            &self.grid,
            self.obstacle_code,
            self.noise,
            xb as u32,
            yb as u32,
            dir_b,
        );
        let source = states.state_of(config);

        for &(dxa, dya, pa) in &succ_a {
            for &(dxb, dyb, pb) in &succ_b {
                let p = pa * pb;
                if dxa == ERROR_SENTINEL || dxb == ERROR_SENTINEL {
                    acc.add_error(p);
                } else if (dxa, dya) == (dxb, dyb) {
                    // A carried pair collapsing onto one cell stalls in
                    // place; independent robots colliding is an error.
                    if carry == 1 {
                        match source {
                            Some(src) => acc.add(src, p),
                            None => acc.add_error(p),
                        }
                    } else {
                        acc.add_error(p);
                    }
                } else {
                    let dest_carry = if Self::carry_adjacent(dxa, dya, dxb, dyb) {
                        carry
                    } else {
                        0
                    };
                    match states.state_of(&smallvec![dxa, dya, dxb, dyb, dest_carry, 0]) {
                        Some(dest) => acc.add(dest, p),
                        None => acc.add_error(p),
                    }
                }
            }
        }
        acc
    }

    fn encode_fields(&self, config: &Config) -> Vec<i32> {
        let (xa, ya, xb, yb) = (config[0], config[1], config[2], config[3]);
        let mut out = vec![xa, ya, xb, yb];
        let color_a = self.grid.code_at(xa as u32, ya as u32);
        let color_b = self.grid.code_at(xb as u32, yb as u32);
        for c in 2..=8u8 {
            out.push(i32::from(color_a == c));
        }
        for c in 2..=8u8 {
            out.push(i32::from(color_b == c));
        }
        out.push(config[4]);
        out.push(config[5]);
        out
    }

    fn sentinel_fields(&self) -> Vec<i32> {
        let mut out = vec![ERROR_SENTINEL; 4];
        out.extend(std::iter::repeat(0).take(16));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(w: u32, h: u32) -> SceneGrid {
        SceneGrid::filled(w, h, 0).unwrap()
    }

    #[test]
    fn stay_is_deterministic() {
        let grid = open_grid(3, 3);
        let succ = noised_cardinal_step(&grid, 1, 0.3, 1, 1, STAY_DIRECTION);
        assert_eq!(succ.as_slice(), &[(1, 1, 1.0)]);
    }

    #[test]
    fn intended_direction_takes_bulk_of_the_mass() {
        let grid = open_grid(3, 3);
        // East from the center: all four neighbours valid, no error mass.
        let succ = noised_cardinal_step(&grid, 1, 0.3, 1, 1, 1);
        assert_eq!(succ.len(), 4);
        let east = succ.iter().find(|&&(x, y, _)| (x, y) == (2, 1)).unwrap();
        assert!((east.2 - 0.7).abs() < 1e-12);
        for &(x, y, p) in &succ {
            if (x, y) != (2, 1) {
                assert!((p - 0.1).abs() < 1e-12, "unintended share was {p}");
            }
        }
    }

    #[test]
    fn off_grid_mass_folds_into_error_entry() {
        let grid = open_grid(3, 3);
        // East from the rightmost column's middle cell.
        let succ = noised_cardinal_step(&grid, 1, 0.3, 2, 1, 1);
        let error = succ.last().unwrap();
        assert_eq!((error.0, error.1), (ERROR_SENTINEL, ERROR_SENTINEL));
        assert!((error.2 - 0.7).abs() < 1e-12);
        let total: f64 = succ.iter().map(|&(_, _, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn obstacle_mass_folds_into_error_entry() {
        let mut rows = vec![vec![0u8; 3]; 3];
        rows[1][2] = 1; // obstacle east of center
        let grid = SceneGrid::from_rows(&rows).unwrap();
        let succ = noised_cardinal_step(&grid, 1, 0.3, 1, 1, 1);
        let error = succ.last().unwrap();
        assert_eq!((error.0, error.1), (ERROR_SENTINEL, ERROR_SENTINEL));
        assert!((error.2 - 0.7).abs() < 1e-12);
    }
}
