//! End-to-end scenarios for the engine and the tool session.

use vam::builder::{ConfigViolation, HookRegistry, MachineConfig, StateMachineBuilder, TransitionBuilder};
use vam::machine::{HookContext, HookError, HookPhase, TransitionError};
use vam::tool::{
    AxisConstraint, Command, CoordinateBase, KeyDispatch, Keymap, TransformKind, VamSession,
    VamState,
};

fn s(name: &str) -> String {
    name.to_string()
}

#[test]
fn normal_and_moving_round_trip() {
    let mut machine = StateMachineBuilder::new()
        .states([s("normal"), s("moving")])
        .initial(s("normal"))
        .transition(TransitionBuilder::new().trigger("to_moving").from(s("normal")).to(s("moving")))
        .unwrap()
        .transition(TransitionBuilder::new().trigger("to_normal").from(s("moving")).to(s("normal")))
        .unwrap()
        .build(())
        .unwrap();

    machine.execute("to_moving").unwrap();
    assert_eq!(machine.current_state(), "moving");

    let err = machine.execute("to_moving").unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { .. }));
    assert_eq!(machine.current_state(), "moving");

    machine.execute("to_normal").unwrap();
    assert_eq!(machine.current_state(), "normal");
}

#[test]
fn to_normal_works_from_every_listed_source() {
    for start in ["moving", "register_picking"] {
        let mut machine = StateMachineBuilder::new()
            .states([s("normal"), s("moving"), s("register_picking")])
            .initial(s(start))
            .transition(
                TransitionBuilder::new()
                    .trigger("to_normal")
                    .from_any([s("moving"), s("register_picking")])
                    .to(s("normal")),
            )
            .unwrap()
            .build(())
            .unwrap();

        assert_eq!(machine.execute("to_normal").unwrap(), "normal");
    }
}

#[test]
fn axis_constraint_while_moving_keeps_state() {
    let mut session = VamSession::new().unwrap();
    session.run_command(Command::ToMoving).unwrap();

    session.set_axis_constraint(AxisConstraint::X);

    assert_eq!(session.current_state(), VamState::Moving);
    assert_eq!(session.axis_constraint(), AxisConstraint::X);
}

#[test]
fn construction_rejects_inconsistent_tables() {
    let missing_initial = StateMachineBuilder::<String, ()>::new()
        .states([s("normal")])
        .initial(s("moving"))
        .build(())
        .unwrap_err();
    assert!(missing_initial.contains(|v| matches!(v, ConfigViolation::UnknownInitialState { .. })));

    let bad_dest = StateMachineBuilder::<String, ()>::new()
        .states([s("normal")])
        .initial(s("normal"))
        .transition(TransitionBuilder::new().trigger("to_moving").from(s("normal")).to(s("moving")))
        .unwrap()
        .build(())
        .unwrap_err();
    assert!(bad_dest.contains(|v| matches!(v, ConfigViolation::UnknownDestState { .. })));

    let duplicate = StateMachineBuilder::<String, ()>::new()
        .states([s("normal"), s("moving")])
        .initial(s("normal"))
        .transition(TransitionBuilder::new().trigger("go").from(s("normal")).to(s("moving")))
        .unwrap()
        .transition(TransitionBuilder::new().trigger("go").from(s("normal")).to(s("normal")))
        .unwrap()
        .build(())
        .unwrap_err();
    assert!(duplicate.contains(|v| matches!(v, ConfigViolation::DuplicateTransition { .. })));
}

#[test]
fn failing_after_hook_keeps_new_state_and_propagates() {
    let mut machine = StateMachineBuilder::new()
        .states([s("normal"), s("moving")])
        .initial(s("normal"))
        .transition(
            TransitionBuilder::new()
                .trigger("to_moving")
                .from(s("normal"))
                .to(s("moving"))
                .after(|_: &mut (), _: &HookContext<String>| Err(HookError::new("no viewport"))),
        )
        .unwrap()
        .build(())
        .unwrap();

    let err = machine.execute("to_moving").unwrap_err();

    match err {
        TransitionError::Hook { phase, state, source, .. } => {
            assert_eq!(phase, HookPhase::After);
            assert_eq!(state, "moving");
            assert_eq!(source.message(), "no viewport");
        }
        other => panic!("Expected hook failure, got {other:?}"),
    }
    assert_eq!(machine.current_state(), "moving");
}

#[test]
fn declarative_table_drives_the_tool_states() {
    let config: MachineConfig<VamState> = MachineConfig::from_json(
        r#"{
            "states": ["normal", "moving", "register_picking"],
            "initial": "normal",
            "transitions": [
                {"trigger": "to_moving", "source": "normal", "dest": "moving", "before": "count"},
                {"trigger": "to_normal", "source": ["moving", "register_picking"], "dest": "normal"}
            ]
        }"#,
    )
    .unwrap();
    let hooks = HookRegistry::new().register("count", |count: &mut u32, _: &HookContext<VamState>| {
        *count += 1;
        Ok(())
    });

    let mut machine = StateMachineBuilder::from_config(config, &hooks).build(0).unwrap();
    machine.execute("to_moving").unwrap();
    machine.execute("to_normal").unwrap();
    machine.execute("to_moving").unwrap();

    assert_eq!(machine.current_state(), &VamState::Moving);
    assert_eq!(*machine.model(), 2);
}

#[test]
fn blender_style_key_sequence() {
    let mut session = VamSession::new().unwrap();
    session.activate().unwrap();

    session.press_key("g").unwrap();
    session.press_key("r").unwrap();
    session.press_key("z").unwrap();
    session.press_key("Tab").unwrap();

    assert_eq!(session.current_state(), VamState::Moving);
    assert_eq!(session.transform_kind(), TransformKind::Rotate);
    assert_eq!(session.axis_constraint(), AxisConstraint::Z);
    assert_eq!(session.coordinate_base(), CoordinateBase::Local);

    session.press_key("Escape").unwrap();
    assert_eq!(session.current_state(), VamState::Normal);
    // flags survive the return to normal
    assert_eq!(session.transform_kind(), TransformKind::Rotate);

    let dispatch = session.press_key("Escape").unwrap();
    assert_eq!(dispatch, KeyDispatch::Commands(Vec::new()));
}

#[test]
fn custom_keymap_replaces_defaults() {
    let keymap = Keymap::empty().bind("m", Command::ToMoving);
    let mut session = VamSession::with_keymap(keymap).unwrap();
    session.activate().unwrap();

    assert_eq!(session.press_key("g").unwrap(), KeyDispatch::Ignored);
    session.press_key("m").unwrap();
    assert_eq!(session.current_state(), VamState::Moving);
}
