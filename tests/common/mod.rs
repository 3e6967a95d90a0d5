//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use bindkit::bind::{default_controls, BindDefinition, BindManager, ControlRegistry, InputState};
use bindkit::config::EngineConfig;

/// Digital test controls `Ctrl1`..`Ctrl5`
pub const DIGITAL: [&str; 5] = ["Ctrl1", "Ctrl2", "Ctrl3", "Ctrl4", "Ctrl5"];

/// A registry with the digital test controls and one analog `Stick`
pub fn test_controls(input: &InputState) -> ControlRegistry {
    let mut controls = ControlRegistry::new();
    for name in DIGITAL {
        controls.register(name, false, input.poller(name));
    }
    controls.register("Stick", true, input.poller("Stick"));
    controls
}

/// A manager over [`test_controls`] with default timing (30 hold ticks)
pub fn test_manager(input: &InputState) -> BindManager {
    BindManager::with_controls(EngineConfig::default(), test_controls(input))
}

/// A manager over the stock control catalog
pub fn catalog_manager(input: &InputState) -> BindManager {
    BindManager::with_controls(EngineConfig::default(), default_controls(input))
}

/// Register `defs` into `group`, panicking on the first rejection
pub fn register(manager: &mut BindManager, group: &str, defs: &[(&str, &[&str])]) {
    let defs: Vec<BindDefinition> = defs
        .iter()
        .map(|(name, combo)| BindDefinition::new(*name, *combo))
        .collect();
    let (group, controls) = manager.group_with_controls(group);
    group
        .register_definitions(&defs, controls)
        .expect("test binds should register");
}

/// (pressed, new_pressed, pressed_and_held, released) for one bind
pub fn flags(manager: &BindManager, group: &str, bind: &str) -> (bool, bool, bool, bool) {
    let bind = manager
        .group(group)
        .and_then(|g| g.bind(bind))
        .expect("bind should exist");
    (
        bind.is_pressed(),
        bind.is_new_pressed(),
        bind.is_pressed_and_held(),
        bind.is_released(),
    )
}
