//! Two-robot model: joint distributions, carry rules, and interactions.

use proptest::prelude::*;
use veer_core::{ActionId, Config, StateId};
use veer_mdp::{Dynamics, StateSpace, TransitionTable, TwoRobotModel, INTERACT_ACTION};
use veer_scene::{ParamFile, ScenarioConfig};
use veer_test_utils::{carry_scene, open_scene, two_robot_config};

fn build(noise: f64) -> (TwoRobotModel, StateSpace, TransitionTable) {
    let model = TwoRobotModel::new(carry_scene(), &two_robot_config(noise)).unwrap();
    let states = StateSpace::build(&model).unwrap();
    let table = TransitionTable::build(&model, &states).unwrap();
    (model, states, table)
}

fn state_id(states: &StateSpace, fields: [i32; 6]) -> StateId {
    states
        .state_of(&Config::from_slice(&fields))
        .expect("fixture state exists")
}

#[test]
fn pickup_sets_the_carry_flag_deterministically() {
    let (_, states, table) = build(0.3);
    let source = state_id(&states, [0, 1, 2, 1, 0, 0]);
    let dest = state_id(&states, [0, 1, 2, 1, 1, 0]);
    let list = table.successor_list(source, INTERACT_ACTION).unwrap();
    assert_eq!(list, &[(dest, 1.0)]);
}

#[test]
fn drop_trades_carry_for_carry_success() {
    let (_, states, table) = build(0.3);
    let source = state_id(&states, [2, 1, 4, 1, 1, 0]);
    let dest = state_id(&states, [2, 1, 4, 1, 0, 1]);
    let list = table.successor_list(source, INTERACT_ACTION).unwrap();
    assert_eq!(list, &[(dest, 1.0)]);
}

#[test]
fn completed_delivery_recovers_through_a_single_action() {
    let (model, states, table) = build(0.3);
    let delivered: Config = Config::from_slice(&[2, 1, 4, 1, 0, 1]);
    assert_eq!(model.actions(&delivered).as_slice(), &[ActionId(0)]);

    let source = state_id(&states, [2, 1, 4, 1, 0, 1]);
    let dest = state_id(&states, [2, 1, 4, 1, 0, 0]);
    let list = table.successor_list(source, ActionId(0)).unwrap();
    assert_eq!(list, &[(dest, 1.0)]);
}

#[test]
fn interact_is_not_offered_away_from_feature_cells() {
    let (model, _, _) = build(0.3);
    // A at (0,0), B at (2,0): the gap cell (1,0) is free.
    let config: Config = Config::from_slice(&[0, 0, 2, 0, 0, 0]);
    assert!(!model.actions(&config).contains(&INTERACT_ACTION));
}

#[test]
fn carry_survives_only_while_the_pair_stays_adjacent() {
    let (_, states, table) = build(0.0);
    // Carrying pair: A moves west, B stays. Adjacency breaks, carry drops.
    let source = state_id(&states, [2, 1, 4, 1, 1, 0]);
    let dest = state_id(&states, [1, 1, 4, 1, 0, 0]);
    let action = TwoRobotModel::motion_action(0, 4);
    let list = table.successor_list(source, action).unwrap();
    assert_eq!(list, &[(dest, 1.0)]);
}

#[test]
fn carrying_pair_collapsing_onto_one_cell_stalls_in_place() {
    let (_, states, table) = build(0.0);
    // A east and B west both land on (3, 1): the carried pair self-loops.
    let source = state_id(&states, [2, 1, 4, 1, 1, 0]);
    let action = TwoRobotModel::motion_action(1, 0);
    let list = table.successor_list(source, action).unwrap();
    assert_eq!(list, &[(source, 1.0)]);
}

#[test]
fn independent_robots_colliding_is_an_error() {
    let (_, states, table) = build(0.0);
    let source = state_id(&states, [0, 0, 2, 0, 0, 0]);
    let action = TwoRobotModel::motion_action(1, 0);
    let list = table.successor_list(source, action).unwrap();
    assert_eq!(list, &[(table.error_state(), 1.0)]);
}

#[test]
fn driving_off_grid_redirects_all_mass_to_the_error_state() {
    let (_, states, table) = build(0.0);
    // A west from the west edge, B stays.
    let source = state_id(&states, [0, 1, 2, 1, 0, 0]);
    let action = TwoRobotModel::motion_action(0, 4);
    let list = table.successor_list(source, action).unwrap();
    assert_eq!(list, &[(table.error_state(), 1.0)]);
}

#[test]
fn error_state_is_reachable_from_every_state_on_a_narrow_scene() {
    // On a 3x1 corridor every motion action leaks mass north/south off
    // the grid, so each state reaches the error state somewhere.
    let grid = open_scene(3, 1);
    let pf = ParamFile::parse(
        "initXA = 0\ninitYA = 0\ninitXB = 2\ninitYB = 0\npositionUpdateNoise = 0.3\n",
    )
    .unwrap();
    let config = ScenarioConfig::from_params(&pf).unwrap();
    let model = TwoRobotModel::new(grid, &config).unwrap();
    let states = StateSpace::build(&model).unwrap();
    let table = TransitionTable::build(&model, &states).unwrap();
    let error = table.error_state();

    for (id, config) in states.iter() {
        let reaches_error = model.actions(config).iter().any(|&action| {
            table
                .successor_list(id, action)
                .is_some_and(|list| list.iter().any(|&(dest, p)| dest == error && p > 0.0))
        });
        assert!(reaches_error, "state {id} never reaches the error state");
    }
}

#[test]
fn stay_stay_is_a_deterministic_self_loop() {
    let (_, states, table) = build(0.3);
    let source = state_id(&states, [0, 0, 2, 0, 0, 0]);
    let action = TwoRobotModel::motion_action(4, 4);
    let list = table.successor_list(source, action).unwrap();
    assert_eq!(list, &[(source, 1.0)]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // Every (state, action) distribution sums to 1.0 within tolerance,
    // for arbitrary noise levels: TransitionTable::build re-checks this
    // and fails construction otherwise.
    #[test]
    fn distributions_sum_to_one_for_any_noise(
        w in 3u32..=4,
        h in 2u32..=3,
        noise in 0.0f64..=1.0,
    ) {
        let grid = open_scene(w, h);
        let text = format!(
            "initXA = 0\ninitYA = 0\ninitXB = 2\ninitYB = 0\npositionUpdateNoise = {noise}\n"
        );
        let pf = ParamFile::parse(&text).unwrap();
        let config = ScenarioConfig::from_params(&pf).unwrap();
        let model = TwoRobotModel::new(grid, &config).unwrap();
        let states = StateSpace::build(&model).unwrap();
        prop_assert!(TransitionTable::build(&model, &states).is_ok());
    }
}
