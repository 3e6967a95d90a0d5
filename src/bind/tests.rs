//! Integration tests for the bind system

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::config::EngineConfig;

fn test_manager(input: &InputState) -> BindManager {
    let mut controls = ControlRegistry::new();
    for name in ["Ctrl1", "Ctrl2", "Ctrl3"] {
        controls.register(name, false, input.poller(name));
    }
    controls.register("Stick", true, input.poller("Stick"));
    BindManager::with_controls(EngineConfig::default(), controls)
}

#[test]
fn test_embedded_binds_apply_cleanly() {
    let input = InputState::new();
    let mut manager = BindManager::with_controls(EngineConfig::default(), default_controls(&input));

    let file = parse_binds_yaml(get_default_binds_yaml())
        .expect("Embedded binds.yaml should parse successfully");
    let reports = file.apply(&mut manager);

    for group in &reports {
        assert!(
            group.report.is_clean(),
            "group {} rejected entries: {:?}",
            group.group,
            group.report.errors
        );
    }
    let main = manager.group("Main").unwrap();
    assert_eq!(main.bind("Open").unwrap().index().index(), 0);
    assert!(main.bind("ScrollUp").unwrap().is_analog());
}

#[test]
fn test_conflict_scenario() {
    let input = InputState::new();
    let mut manager = test_manager(&input);
    let (group, controls) = manager.group_with_controls("Test");

    assert!(group
        .register_bind_with_names("A", &["Ctrl1"], controls, false)
        .is_ok());
    assert_eq!(
        group.register_bind_with_names("B", &["Ctrl1", "Ctrl2"], controls, false),
        Err(BindError::ComboConflict {
            existing: "A".into()
        })
    );
    assert!(group
        .register_bind_with_names("C", &["Ctrl3"], controls, false)
        .is_ok());

    let names: Vec<_> = group.iter().map(|b| b.name()).collect();
    assert_eq!(names, vec!["A", "C"]);
    assert_eq!(group.bind("C").unwrap().index().index(), 1);
}

#[test]
fn test_load_skips_unknown_bind() {
    let input = InputState::new();
    let mut manager = test_manager(&input);
    let (group, controls) = manager.group_with_controls("Test");
    group
        .register_bind_with_names("A", &["Ctrl1"], controls, false)
        .unwrap();

    let report = group.load_bind_data(
        &[
            BindDefinition::new("A", &["Ctrl2"]),
            BindDefinition::new("X", &["Ctrl1"]),
        ],
        controls,
    );

    let a = group.id_of("A").unwrap();
    assert_eq!(report.updated, vec![a]);
    assert_eq!(
        report.errors,
        vec![("X".to_string(), BindError::UnknownBindName("X".into()))]
    );
    assert_eq!(
        encode_combo(controls, group.get(a).unwrap().combo()).unwrap(),
        vec!["Ctrl2"]
    );
}

#[test]
fn test_load_continues_after_conflict() {
    let input = InputState::new();
    let mut manager = test_manager(&input);
    let (group, controls) = manager.group_with_controls("Test");
    group
        .register_definitions(
            &[
                BindDefinition::new("A", &["Ctrl1"]),
                BindDefinition::new("B", &["Ctrl2"]),
                BindDefinition::new("C", &["Ctrl3"]),
            ],
            controls,
        )
        .unwrap();

    let report = group.load_bind_data(
        &[
            BindDefinition::new("A", &["Ctrl2", "Ctrl1"]),
            BindDefinition::new("C", &["Ctrl3", "Stick"]),
        ],
        controls,
    );

    assert_eq!(report.updated, vec![group.id_of("C").unwrap()]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].0, "A");
    // A keeps its old combo
    assert_eq!(
        group.dump_bind_data(controls)[0],
        BindDefinition::new("A", &["Ctrl1"])
    );
}

#[test]
fn test_invariant_holds_after_random_edits() {
    let input = InputState::new();
    let mut manager = test_manager(&input);
    let (group, controls) = manager.group_with_controls("Test");
    let all: Vec<ControlId> = controls.iter().map(|c| c.index()).collect();

    // Every non-empty subset of the four controls, in a fixed order
    let subsets: Vec<Vec<ControlId>> = (1u32..16)
        .map(|mask| {
            all.iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, id)| *id)
                .collect()
        })
        .collect();

    for (i, subset) in subsets.iter().enumerate() {
        let _ = group.register_bind(&format!("Bind{i}"), subset, controls, true);
    }
    let ids: Vec<BindId> = group.iter().map(|b| b.index()).collect();
    for (n, subset) in subsets.iter().rev().enumerate() {
        let id = ids[n % ids.len()];
        let before = group.get(id).unwrap().combo().to_vec();
        if group.try_set_combo(id, subset, controls, true).is_err() {
            assert_eq!(group.get(id).unwrap().combo(), before.as_slice());
        }
    }

    let binds: Vec<&Bind> = group.iter().collect();
    for (i, a) in binds.iter().enumerate() {
        for b in &binds[i + 1..] {
            assert!(
                !combos_conflict(a.combo(), b.combo()),
                "{} and {} conflict",
                a.name(),
                b.name()
            );
        }
    }
}

#[test]
fn test_digital_timing_through_manager() {
    let input = InputState::new();
    let mut manager = test_manager(&input);
    let hold = manager.config().hold_threshold_ticks();
    {
        let (group, controls) = manager.group_with_controls("Test");
        group
            .register_bind_with_names("A", &["Ctrl1"], controls, true)
            .unwrap();
    }
    let read = |m: &BindManager| {
        let b = m.group("Test").unwrap().bind("A").unwrap();
        (
            b.is_pressed(),
            b.is_new_pressed(),
            b.is_pressed_and_held(),
            b.is_released(),
        )
    };

    // Tick 0: untouched
    manager.update();
    assert_eq!(read(&manager), (false, false, false, false));

    let n = hold + 5;
    input.press("Ctrl1");
    for tick in 1..=n {
        manager.update();
        let (pressed, new, held, released) = read(&manager);
        assert!(pressed);
        assert_eq!(new, tick == 1, "tick {tick}");
        assert_eq!(held, tick == 1 || tick > hold, "tick {tick}");
        assert!(!released);
    }

    input.release("Ctrl1");
    manager.update();
    assert_eq!(read(&manager), (false, false, false, true));
}

#[test]
fn test_analog_combo_fires_every_tick() {
    let input = InputState::new();
    let mut manager = test_manager(&input);
    let fired = Rc::new(RefCell::new(0));
    {
        let (group, controls) = manager.group_with_controls("Test");
        let id = group
            .register_bind_with_names("Aim", &["Ctrl2", "Stick"], controls, true)
            .unwrap();
        let counter = Rc::clone(&fired);
        group
            .get_mut(id)
            .unwrap()
            .on_new_press(move || *counter.borrow_mut() += 1);
    }

    manager.update();
    input.hold_only(&["Ctrl2", "Stick"]);
    for _ in 0..10 {
        manager.update();
        let bind = manager.group("Test").unwrap().bind("Aim").unwrap();
        assert!(bind.is_analog());
        assert_eq!(bind.is_new_pressed(), bind.is_pressed());
    }
    assert_eq!(*fired.borrow(), 10);
}

#[test]
fn test_panicking_subscriber_does_not_stop_other_binds() {
    let input = InputState::new();
    let mut manager = test_manager(&input);
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let (group, controls) = manager.group_with_controls("Test");
        let a = group
            .register_bind_with_names("A", &["Ctrl1"], controls, true)
            .unwrap();
        let b = group
            .register_bind_with_names("B", &["Ctrl2"], controls, true)
            .unwrap();

        group
            .get_mut(a)
            .unwrap()
            .on_new_press(|| panic!("subscriber failure"));
        let a_log = Rc::clone(&log);
        group
            .get_mut(a)
            .unwrap()
            .on_new_press(move || a_log.borrow_mut().push("A"));
        let b_log = Rc::clone(&log);
        group
            .get_mut(b)
            .unwrap()
            .on_new_press(move || b_log.borrow_mut().push("B"));
    }

    input.hold_only(&["Ctrl1", "Ctrl2"]);
    manager.update();
    assert_eq!(*log.borrow(), vec!["A", "B"]);
}

#[test]
fn test_combo_edit_fires_no_events() {
    let input = InputState::new();
    let mut manager = test_manager(&input);
    let log = Rc::new(RefCell::new(Vec::new()));
    let (group, controls) = manager.group_with_controls("Test");
    let id = group
        .register_bind_with_names("A", &["Ctrl1"], controls, true)
        .unwrap();
    for event in BindEvent::ALL {
        let log = Rc::clone(&log);
        group
            .get_mut(id)
            .unwrap()
            .subscribe(event, move || log.borrow_mut().push(event));
    }

    input.press("Ctrl2");
    group
        .try_set_combo_names(id, &["Ctrl2"], controls, true)
        .unwrap();
    group.clear_combo(id);
    assert!(log.borrow().is_empty());
}
