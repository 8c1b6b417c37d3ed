//! Scenario configuration: motion parameters and cell-code assignments.

use crate::error::SceneError;
use crate::grid::SceneGrid;
use crate::params::ParamFile;

/// Category code conventionally used for static obstacles.
pub const DEFAULT_OBSTACLE_CODE: u8 = 1;
/// Category code conventionally used for the pickup feature cell.
pub const DEFAULT_PICKUP_CODE: u8 = 2;
/// Category code conventionally used for the delivery feature cell.
pub const DEFAULT_DELIVERY_CODE: u8 = 3;

/// Model-specific scenario parameters.
///
/// Selects the dynamics class and carries the fields that class needs.
#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioParams {
    /// Single agent with a discretized heading and continuous-image
    /// overlap dynamics.
    Unicycle {
        /// Initial x position.
        init_x: u32,
        /// Initial y position.
        init_y: u32,
        /// Initial heading index.
        init_dir: u32,
        /// Number of discrete heading values.
        nof_directions: u32,
        /// Distance travelled per step.
        speed: f64,
        /// Positional-noise margin added around the motion image.
        position_update_noise: f64,
        /// Probability that a commanded heading change does not happen.
        turn_fail_probability: f64,
    },
    /// Two agents under noised-cardinal dynamics with a carry
    /// interaction.
    TwoRobot {
        /// Initial x position of robot A.
        init_ax: u32,
        /// Initial y position of robot A.
        init_ay: u32,
        /// Initial x position of robot B.
        init_bx: u32,
        /// Initial y position of robot B.
        init_by: u32,
        /// Fraction of motion probability diverted to the three
        /// unintended cardinal directions.
        position_update_noise: f64,
    },
}

/// Immutable per-scenario configuration.
///
/// Built once from a [`ParamFile`], validated against the scene, and
/// passed by reference into every component constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioConfig {
    /// Dynamics class and its parameters.
    pub params: ScenarioParams,
    /// Category code marking static obstacles.
    pub obstacle_code: u8,
    /// Category code marking the pickup feature cell.
    pub pickup_code: u8,
    /// Category code marking the delivery feature cell.
    pub delivery_code: u8,
}

impl ScenarioConfig {
    /// Build a unicycle scenario from a parameter file.
    ///
    /// Required keys: `nofDirections`, `initX`, `initY`, `initDir`,
    /// `positionUpdateNoise`, `unicycleSpeed`. Optional:
    /// `probabilityDirectionChangeFail` (default 0).
    pub fn unicycle_from_params(file: &ParamFile) -> Result<Self, SceneError> {
        Ok(Self {
            params: ScenarioParams::Unicycle {
                init_x: file.get_u32("initX")?,
                init_y: file.get_u32("initY")?,
                init_dir: file.get_u32("initDir")?,
                nof_directions: file.get_u32("nofDirections")?,
                speed: file.get_f64("unicycleSpeed")?,
                position_update_noise: file.get_f64("positionUpdateNoise")?,
                turn_fail_probability: file.get_f64_or("probabilityDirectionChangeFail", 0.0)?,
            },
            obstacle_code: DEFAULT_OBSTACLE_CODE,
            pickup_code: DEFAULT_PICKUP_CODE,
            delivery_code: DEFAULT_DELIVERY_CODE,
        })
    }

    /// Build a two-robot scenario from a parameter file.
    ///
    /// Required keys: `initXA`, `initYA`, `initXB`, `initYB`,
    /// `positionUpdateNoise`.
    pub fn two_robot_from_params(file: &ParamFile) -> Result<Self, SceneError> {
        Ok(Self {
            params: ScenarioParams::TwoRobot {
                init_ax: file.get_u32("initXA")?,
                init_ay: file.get_u32("initYA")?,
                init_bx: file.get_u32("initXB")?,
                init_by: file.get_u32("initYB")?,
                position_update_noise: file.get_f64("positionUpdateNoise")?,
            },
            obstacle_code: DEFAULT_OBSTACLE_CODE,
            pickup_code: DEFAULT_PICKUP_CODE,
            delivery_code: DEFAULT_DELIVERY_CODE,
        })
    }

    /// Build a scenario from a parameter file, selecting the dynamics
    /// class by the keys present (`initXA` selects two-robot).
    pub fn from_params(file: &ParamFile) -> Result<Self, SceneError> {
        if file.contains("initXA") {
            Self::two_robot_from_params(file)
        } else {
            Self::unicycle_from_params(file)
        }
    }

    /// Validate all structural invariants against the scene grid.
    ///
    /// Checks parameter ranges and that every initial position lies on
    /// a free in-bounds cell.
    pub fn validate(&self, grid: &SceneGrid) -> Result<(), SceneError> {
        let check_position = |x: u32, y: u32, who: &str| -> Result<(), SceneError> {
            if !grid.in_bounds(x as i32, y as i32) {
                return Err(SceneError::InvalidScenario {
                    reason: format!("{who} initial position ({x}, {y}) is outside the grid"),
                });
            }
            if grid.code_at(x, y) == self.obstacle_code {
                return Err(SceneError::InvalidScenario {
                    reason: format!("{who} initial position ({x}, {y}) is an obstacle cell"),
                });
            }
            Ok(())
        };

        let check_noise = |noise: f64| -> Result<(), SceneError> {
            if !noise.is_finite() || noise < 0.0 {
                return Err(SceneError::InvalidScenario {
                    reason: format!("positionUpdateNoise must be finite and >= 0, got {noise}"),
                });
            }
            Ok(())
        };

        match &self.params {
            ScenarioParams::Unicycle {
                init_x,
                init_y,
                init_dir,
                nof_directions,
                speed,
                position_update_noise,
                turn_fail_probability,
            } => {
                if *nof_directions == 0 {
                    return Err(SceneError::InvalidScenario {
                        reason: "nofDirections must be at least 1".to_string(),
                    });
                }
                if init_dir >= nof_directions {
                    return Err(SceneError::InvalidScenario {
                        reason: format!(
                            "initDir {init_dir} out of range for {nof_directions} directions"
                        ),
                    });
                }
                if !speed.is_finite() || *speed < 0.0 {
                    return Err(SceneError::InvalidScenario {
                        reason: format!("unicycleSpeed must be finite and >= 0, got {speed}"),
                    });
                }
                check_noise(*position_update_noise)?;
                if !turn_fail_probability.is_finite()
                    || !(0.0..=1.0).contains(turn_fail_probability)
                {
                    return Err(SceneError::InvalidScenario {
                        reason: format!(
                            "probabilityDirectionChangeFail must be in [0, 1], got {turn_fail_probability}"
                        ),
                    });
                }
                check_position(*init_x, *init_y, "agent")
            }
            ScenarioParams::TwoRobot {
                init_ax,
                init_ay,
                init_bx,
                init_by,
                position_update_noise,
            } => {
                if !(0.0..=1.0).contains(position_update_noise)
                    || !position_update_noise.is_finite()
                {
                    return Err(SceneError::InvalidScenario {
                        reason: format!(
                            "positionUpdateNoise must be in [0, 1], got {position_update_noise}"
                        ),
                    });
                }
                check_position(*init_ax, *init_ay, "robot A")?;
                check_position(*init_bx, *init_by, "robot B")?;
                if init_ax == init_bx && init_ay == init_by {
                    return Err(SceneError::InvalidScenario {
                        reason: "robots A and B share an initial cell".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unicycle_text() -> &'static str {
        "nofDirections = 8\n\
         initX = 1\n\
         initY = 1\n\
         initDir = 0\n\
         positionUpdateNoise = 0.1\n\
         unicycleSpeed = 1.0\n"
    }

    #[test]
    fn unicycle_params_round_trip() {
        let pf = ParamFile::parse(unicycle_text()).unwrap();
        let cfg = ScenarioConfig::from_params(&pf).unwrap();
        match cfg.params {
            ScenarioParams::Unicycle {
                nof_directions,
                turn_fail_probability,
                ..
            } => {
                assert_eq!(nof_directions, 8);
                assert_eq!(turn_fail_probability, 0.0);
            }
            other => panic!("expected unicycle params, got {other:?}"),
        }
    }

    #[test]
    fn two_robot_is_selected_by_key_presence() {
        let pf = ParamFile::parse(
            "initXA = 0\ninitYA = 0\ninitXB = 2\ninitYB = 0\npositionUpdateNoise = 0.3\n",
        )
        .unwrap();
        let cfg = ScenarioConfig::from_params(&pf).unwrap();
        assert!(matches!(cfg.params, ScenarioParams::TwoRobot { .. }));
    }

    #[test]
    fn validate_rejects_obstacle_start() {
        let pf = ParamFile::parse(unicycle_text()).unwrap();
        let cfg = ScenarioConfig::from_params(&pf).unwrap();
        let mut rows = vec![vec![0u8; 3]; 3];
        rows[1][1] = DEFAULT_OBSTACLE_CODE;
        let grid = SceneGrid::from_rows(&rows).unwrap();
        match cfg.validate(&grid) {
            Err(SceneError::InvalidScenario { reason }) => {
                assert!(reason.contains("obstacle"));
            }
            other => panic!("expected InvalidScenario, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_out_of_range_heading() {
        let pf = ParamFile::parse(
            "nofDirections = 4\ninitX = 0\ninitY = 0\ninitDir = 4\n\
             positionUpdateNoise = 0.1\nunicycleSpeed = 1.0\n",
        )
        .unwrap();
        let cfg = ScenarioConfig::from_params(&pf).unwrap();
        let grid = SceneGrid::filled(3, 3, 0).unwrap();
        assert!(cfg.validate(&grid).is_err());
    }

    #[test]
    fn validate_rejects_shared_start_cell() {
        let pf = ParamFile::parse(
            "initXA = 1\ninitYA = 1\ninitXB = 1\ninitYB = 1\npositionUpdateNoise = 0.3\n",
        )
        .unwrap();
        let cfg = ScenarioConfig::from_params(&pf).unwrap();
        let grid = SceneGrid::filled(3, 3, 0).unwrap();
        assert!(cfg.validate(&grid).is_err());
    }

    #[test]
    fn validate_accepts_well_formed_scenarios() {
        let pf = ParamFile::parse(unicycle_text()).unwrap();
        let cfg = ScenarioConfig::from_params(&pf).unwrap();
        let grid = SceneGrid::filled(3, 3, 0).unwrap();
        assert!(cfg.validate(&grid).is_ok());
    }
}
