//! Press scripts for exercising a bind group without a real input device
//!
//! A script names a group and a list of steps. Each step holds a set of
//! controls for a number of ticks; every event the group's binds fire along
//! the way is recorded with the tick it happened on.
//!
//! ```yaml
//! group: Main
//! steps:
//!   - hold: [Control]
//!     ticks: 2
//!   - hold: [Control, MiddleButton]
//!     ticks: 40
//!   - hold: []
//! ```

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

use crate::bind::{BindError, BindEvent, BindManager, InputState};
use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("script refers to unknown group '{0}'")]
    UnknownGroup(String),

    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: BindError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    pub group: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Hold exactly `hold` for `ticks` ticks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub hold: Vec<String>,
    #[serde(default = "default_ticks")]
    pub ticks: u32,
}

fn default_ticks() -> u32 {
    1
}

/// One event observed while running a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEvent {
    /// 1-based tick, counted from the start of the script
    pub tick: u64,
    pub bind: String,
    pub event: BindEvent,
}

impl fmt::Display for ScriptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {:>4}  {:<20} {}", self.tick, self.bind, self.event)
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ScriptError> {
        serde_yaml::from_str(yaml).map_err(|e| ScriptError::Config(e.into()))
    }

    /// Total number of ticks the script runs for
    pub fn len_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }

    /// Drive `manager` through every step, feeding `input`, and collect the
    /// events fired by the script's group.
    ///
    /// Control names are resolved up front so a typo fails before any tick
    /// runs. Subscriptions added for recording are cancelled afterwards.
    pub fn run(
        &self,
        manager: &mut BindManager,
        input: &InputState,
    ) -> Result<Vec<ScriptEvent>, ScriptError> {
        let steps = self.resolve_steps(manager)?;
        if manager.group(&self.group).is_none() {
            return Err(ScriptError::UnknownGroup(self.group.clone()));
        }

        let fired: Rc<RefCell<Vec<(String, BindEvent)>>> = Rc::default();
        let mut subscriptions = Vec::new();
        {
            let group = manager.get_or_create_group(&self.group);
            let ids: Vec<_> = group.iter().map(|b| b.index()).collect();
            for id in ids {
                let Some(bind) = group.get_mut(id) else {
                    continue;
                };
                let name = bind.name().to_string();
                for event in BindEvent::ALL {
                    let fired = Rc::clone(&fired);
                    let name = name.clone();
                    subscriptions.push(
                        bind.subscribe(event, move || fired.borrow_mut().push((name.clone(), event))),
                    );
                }
            }
        }

        let mut events = Vec::new();
        let mut tick = 0;
        for (hold, ticks) in steps {
            input.hold_only(&hold);
            for _ in 0..ticks {
                tick += 1;
                manager.update();
                events.extend(fired.borrow_mut().drain(..).map(|(bind, event)| ScriptEvent {
                    tick,
                    bind,
                    event,
                }));
            }
        }
        input.release_all();

        for subscription in &subscriptions {
            subscription.cancel();
        }
        tracing::debug!(
            group = %self.group,
            ticks = tick,
            events = events.len(),
            "script finished"
        );
        Ok(events)
    }

    /// Canonical control names and tick count for every step
    fn resolve_steps(&self, manager: &BindManager) -> Result<Vec<(Vec<String>, u32)>, ScriptError> {
        let controls = manager.controls();
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let hold = step
                    .hold
                    .iter()
                    .map(|name| controls.resolve(name).map(|c| c.name().to_string()))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| ScriptError::Step { step: i + 1, source })?;
                Ok((hold, step.ticks))
            })
            .collect()
    }
}
