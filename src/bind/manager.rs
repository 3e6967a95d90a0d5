//! BindManager: the owned registry of bind groups and the tick entry point
//!
//! One manager exists per host session. Session code creates it, passes it by
//! reference to the tick driver and to anything that needs bind access, and
//! calls [`BindManager::close`] when the session ends.

use std::collections::HashMap;

use super::control::ControlRegistry;
use super::group::BindGroup;
use crate::config::EngineConfig;

#[derive(Debug)]
pub struct BindManager {
    config: EngineConfig,
    controls: ControlRegistry,
    /// Groups in creation order
    groups: Vec<BindGroup>,
    /// Lowercased group name -> position in `groups`
    lookup: HashMap<String, usize>,
}

impl BindManager {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_controls(config, ControlRegistry::new())
    }

    pub fn with_controls(config: EngineConfig, controls: ControlRegistry) -> Self {
        tracing::debug!(
            tick_rate = config.tick_rate,
            hold_ticks = config.hold_threshold_ticks(),
            controls = controls.len(),
            "bind manager created"
        );
        Self {
            config,
            controls,
            groups: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlRegistry {
        &mut self.controls
    }

    /// Look up a group by name (case-insensitive), creating an empty one on
    /// first reference
    pub fn get_or_create_group(&mut self, name: &str) -> &mut BindGroup {
        let pos = self.group_position(name);
        &mut self.groups[pos]
    }

    /// Same as [`get_or_create_group`](Self::get_or_create_group), also
    /// lending out the control registry for registration and edits
    pub fn group_with_controls(&mut self, name: &str) -> (&mut BindGroup, &ControlRegistry) {
        let pos = self.group_position(name);
        (&mut self.groups[pos], &self.controls)
    }

    fn group_position(&mut self, name: &str) -> usize {
        let key = name.to_lowercase();
        if let Some(&pos) = self.lookup.get(&key) {
            return pos;
        }

        let pos = self.groups.len();
        self.groups
            .push(BindGroup::new(name, self.config.hold_threshold_ticks()));
        self.lookup.insert(key, pos);
        tracing::debug!(group = name, "created bind group");
        pos
    }

    pub fn group(&self, name: &str) -> Option<&BindGroup> {
        let &pos = self.lookup.get(&name.to_lowercase())?;
        self.groups.get(pos)
    }

    pub fn groups(&self) -> impl Iterator<Item = &BindGroup> {
        self.groups.iter()
    }

    /// Tick entry: update every group in creation order.
    ///
    /// Call exactly once per simulation tick.
    pub fn update(&mut self) {
        for group in &mut self.groups {
            group.handle_input(&self.controls);
        }
    }

    /// Tear down at session end: clear every combo and subscription, then
    /// drop all groups
    pub fn close(&mut self) {
        for group in &mut self.groups {
            group.clear_subscribers();
            group.clear_combos();
        }
        tracing::debug!(groups = self.groups.len(), "bind manager closed");
        self.groups.clear();
        self.lookup.clear();
    }
}

impl Default for BindManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::control::InputState;
    use crate::bind::event::BindEvent;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut manager = BindManager::default();
        manager.get_or_create_group("Main");
        manager.get_or_create_group("MAIN");
        manager.get_or_create_group("Other");

        let names: Vec<_> = manager.groups().map(|g| g.name().to_string()).collect();
        assert_eq!(names, vec!["Main", "Other"]);
        assert!(manager.group("main").is_some());
        assert!(manager.group("missing").is_none());
    }

    #[test]
    fn test_group_inherits_hold_threshold() {
        let config = EngineConfig {
            tick_rate: 20,
            hold_threshold_ms: 500,
            ..EngineConfig::default()
        };
        let mut manager = BindManager::new(config);
        assert_eq!(manager.get_or_create_group("Main").hold_ticks(), 10);
    }

    #[test]
    fn test_update_fans_out_to_every_group() {
        let input = InputState::new();
        let mut manager = BindManager::default();
        manager
            .controls_mut()
            .register("Jump", false, input.poller("Jump"));

        for name in ["First", "Second"] {
            let (group, controls) = manager.group_with_controls(name);
            group
                .register_bind_with_names("Go", &["Jump"], controls, true)
                .unwrap();
        }

        input.press("Jump");
        manager.update();
        for group in manager.groups() {
            assert_eq!(group.tick(), 1);
            assert!(group.bind("Go").unwrap().is_new_pressed());
        }
    }

    #[test]
    fn test_close_drops_subscriptions() {
        let input = InputState::new();
        let mut manager = BindManager::default();
        manager
            .controls_mut()
            .register("Jump", false, input.poller("Jump"));

        let hits = Rc::new(Cell::new(0));
        let (group, controls) = manager.group_with_controls("Main");
        let id = group
            .register_bind_with_names("Go", &["Jump"], controls, true)
            .unwrap();
        let counter = Rc::clone(&hits);
        let handle = group
            .get_mut(id)
            .unwrap()
            .subscribe(BindEvent::NewPress, move || counter.set(counter.get() + 1));

        manager.close();
        assert!(!handle.is_active());
        assert_eq!(manager.groups().count(), 0);

        input.press("Jump");
        manager.update();
        assert_eq!(hits.get(), 0);
    }
}
