//! Control registry: the catalog of physical controls binds can be built from
//!
//! Controls are registered once and addressed by [`ControlId`] afterwards.
//! The registry never reads hardware itself; each control carries a poll
//! closure supplied by the host's raw-input layer.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use super::error::{BindError, Result};
use super::types::{ControlId, KeyCode};

/// Zero-argument provider for a control's current activity
pub type Poll = Box<dyn Fn() -> bool>;

/// One physical input source
pub struct Control {
    name: String,
    index: ControlId,
    analog: bool,
    poll: Poll,
}

impl Control {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> ControlId {
        self.index
    }

    /// Analog controls report continuous activity and disable edge suppression
    pub fn is_analog(&self) -> bool {
        self.analog
    }

    /// Poll the raw-input layer for this control's current state
    #[inline]
    pub fn is_pressed(&self) -> bool {
        (self.poll)()
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("analog", &self.analog)
            .finish_non_exhaustive()
    }
}

/// Catalog of every control known to the engine
#[derive(Debug, Default)]
pub struct ControlRegistry {
    controls: Vec<Control>,
    /// Lowercased name -> index
    lookup: HashMap<String, ControlId>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control, or return the existing one registered under `name`.
    ///
    /// Names are matched case-insensitively. Re-registering keeps the original
    /// control and drops the new poll closure.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        analog: bool,
        poll: impl Fn() -> bool + 'static,
    ) -> ControlId {
        let name = name.into();
        let key = name.to_lowercase();

        if let Some(&existing) = self.lookup.get(&key) {
            return existing;
        }

        let index = ControlId(self.controls.len());
        tracing::trace!(control = %name, %index, analog, "registered control");

        self.controls.push(Control {
            name,
            index,
            analog,
            poll: Box::new(poll),
        });
        self.lookup.insert(key, index);
        index
    }

    /// Look up a control by its exact registered name (case-insensitive)
    pub fn lookup(&self, name: &str) -> Result<&Control> {
        self.lookup
            .get(&name.to_lowercase())
            .map(|&id| &self.controls[id.0])
            .ok_or_else(|| BindError::UnknownControlName(name.to_string()))
    }

    /// Look up a control by name, also accepting the stock key aliases
    /// (`esc`, `ctrl`, `pgup`, ...)
    pub fn resolve(&self, name: &str) -> Result<&Control> {
        self.lookup(name).or_else(|err| {
            let key: KeyCode = name.parse().map_err(|_| err.clone())?;
            self.lookup(&key.to_string()).map_err(|_| err)
        })
    }

    /// Look up a control by index
    pub fn get(&self, id: ControlId) -> Result<&Control> {
        self.controls
            .get(id.0)
            .ok_or(BindError::UnknownControl(id))
    }

    pub fn contains(&self, id: ControlId) -> bool {
        id.0 < self.controls.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Evaluate a combo against the current control states.
    ///
    /// Returns `(active, analog)`. An empty combo is never active. Unknown
    /// indices read as inactive.
    pub(crate) fn poll_combo(&self, combo: &[ControlId]) -> (bool, bool) {
        if combo.is_empty() {
            return (false, false);
        }

        let mut active = true;
        let mut analog = false;
        for id in combo {
            match self.controls.get(id.0) {
                Some(control) => {
                    analog |= control.analog;
                    active = active && control.is_pressed();
                }
                None => active = false,
            }
        }
        (active, analog)
    }
}

/// Host-fed snapshot of which controls are currently active.
///
/// The host updates it from its window or device events; pollers created with
/// [`InputState::poller`] read it every tick. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    active: Rc<RefCell<HashSet<String>>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a control as active or inactive by name (case-insensitive)
    pub fn set(&self, name: &str, active: bool) {
        let key = name.to_lowercase();
        let mut set = self.active.borrow_mut();
        if active {
            set.insert(key);
        } else {
            set.remove(&key);
        }
    }

    pub fn press(&self, name: &str) {
        self.set(name, true);
    }

    pub fn release(&self, name: &str) {
        self.set(name, false);
    }

    /// Replace the whole active set
    pub fn hold_only<S: AsRef<str>>(&self, names: &[S]) {
        let mut set = self.active.borrow_mut();
        set.clear();
        set.extend(names.iter().map(|n| n.as_ref().to_lowercase()));
    }

    pub fn release_all(&self) {
        self.active.borrow_mut().clear();
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.borrow().contains(&name.to_lowercase())
    }

    /// Build a poll closure reading this snapshot for `name`
    pub fn poller(&self, name: &str) -> impl Fn() -> bool + 'static {
        let active = Rc::clone(&self.active);
        let key = name.to_lowercase();
        move || active.borrow().contains(key.as_str())
    }
}
