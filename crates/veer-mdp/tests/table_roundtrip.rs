//! Serialization round-trips for the solver-facing artifacts.

use std::fs;
use std::path::PathBuf;
use veer_mdp::{io, StateSpace, TransitionTable, TwoRobotModel, UnicycleModel};
use veer_test_utils::{carry_scene, open_scene, two_robot_config, unicycle_config};

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("veer-mdp-{tag}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn transition_file_round_trips_exactly() {
    let model = TwoRobotModel::new(carry_scene(), &two_robot_config(0.3)).unwrap();
    let states = StateSpace::build(&model).unwrap();
    let table = TransitionTable::build(&model, &states).unwrap();

    let path = temp_dir("tra").join("scenario.tra");
    io::commit_transitions(&path, &table).unwrap();
    let reread = io::read_transitions_file(&path).unwrap();

    assert_eq!(reread.records(), table.records());
    assert_eq!(reread.num_states(), table.num_states());
    assert_eq!(reread.size_hint(), table.size_hint());
    assert!(!path.with_extension("tra.tmp").exists());
}

#[test]
fn transition_file_layout_matches_the_contract() {
    let model = UnicycleModel::new(open_scene(2, 2), &unicycle_config(1.0, 0.0, 0.0)).unwrap();
    let states = StateSpace::build(&model).unwrap();
    let table = TransitionTable::build(&model, &states).unwrap();

    let mut buf = Vec::new();
    io::write_transitions(&mut buf, &table).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();

    let header: Vec<&str> = lines.next().unwrap().split_whitespace().collect();
    assert_eq!(header.len(), 3);
    assert_eq!(header[0], table.num_states().to_string());

    // Final line is always the error self-loop.
    let last = text.lines().last().unwrap();
    let error = table.error_state();
    assert_eq!(last, format!("{error} 0 {error} 1"));
}

#[test]
fn state_file_lists_every_state_and_ends_with_the_sentinel() {
    let model = UnicycleModel::new(open_scene(2, 2), &unicycle_config(1.0, 0.0, 0.0)).unwrap();
    let states = StateSpace::build(&model).unwrap();

    let mut buf = Vec::new();
    io::write_states(&mut buf, &model, &states).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "(xpos,ypos,direction,color2,color3,color4,color5,color6,color7,color8)"
    );
    // 4 free cells x 4 headings, plus the error state.
    assert_eq!(lines.len(), 1 + 16 + 1);
    assert_eq!(lines[1], "0:(0,0,0,0,0,0,0,0,0,0)");
    assert_eq!(lines.last().unwrap(), &"16:(-1,-1,-1,0,0,0,0,0,0,0)");
}

#[test]
fn label_file_marks_the_initial_state() {
    let model = TwoRobotModel::new(carry_scene(), &two_robot_config(0.3)).unwrap();
    let states = StateSpace::build(&model).unwrap();
    let init = states.initial_state(&model).unwrap();

    let path = temp_dir("lab").join("scenario.lab");
    io::commit_labels(&path, init).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, format!("0=\"init\" 1=\"deadlock\"\n{init}: 0\n"));
}

#[test]
fn two_robot_state_file_header_names_all_twenty_fields() {
    let model = TwoRobotModel::new(carry_scene(), &two_robot_config(0.3)).unwrap();
    let states = StateSpace::build(&model).unwrap();

    let mut buf = Vec::new();
    io::write_states(&mut buf, &model, &states).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header.matches(',').count(), 19);
    assert!(header.starts_with("(xposA,yposA,xposB,yposB,"));
    assert!(header.ends_with("carry,carrySuccess)"));

    let sentinel = text.lines().last().unwrap();
    let error = states.error_state();
    assert!(sentinel.starts_with(&format!("{error}:(-1,-1,-1,-1,")));
}

#[test]
fn table_ids_are_stable_across_identical_builds() {
    let build = || {
        let model = TwoRobotModel::new(carry_scene(), &two_robot_config(0.3)).unwrap();
        let states = StateSpace::build(&model).unwrap();
        let table = TransitionTable::build(&model, &states).unwrap();
        let mut buf = Vec::new();
        io::write_transitions(&mut buf, &table).unwrap();
        buf
    };
    assert_eq!(build(), build(), "identical scenes must serialize identically");
}
