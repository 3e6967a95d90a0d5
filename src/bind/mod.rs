//! Tick-driven input binding engine
//!
//! This module maps physical controls into named, persistent binds:
//! - Controls are registered once in a [`ControlRegistry`] with a poll closure
//! - Binds pair a name with a combo of up to four controls
//! - Groups reject ambiguous combos (one a subset of another) at edit time
//! - Every tick each bind derives press / new press / held / released flags
//!   and fires subscribed callbacks
//!
//! # Architecture
//!
//! ```text
//! host tick → BindManager::update() → BindGroup::handle_input() → Bind::update()
//!                                                                   ↳ poll controls
//!                                                                   ↳ NewPress / PressAndHeld / Release
//! ```
//!
//! # Setting Up
//!
//! ```ignore
//! let input = InputState::new();
//! let mut manager = BindManager::with_controls(EngineConfig::load(), default_controls(&input));
//! load_default_binds().apply(&mut manager);
//!
//! // Each frame
//! input.hold_only(&pressed_control_names);
//! manager.update();
//! ```

#[allow(clippy::module_inception)]
mod bind;
mod combo;
mod config;
mod control;
mod defaults;
mod error;
mod event;
mod group;
mod manager;
mod types;

pub use bind::Bind;
pub use combo::{decode as decode_combo, display_string as combo_display, encode as encode_combo};
pub use config::{
    load_binds_file, merge_binds, parse_binds_yaml, save_binds_file, BindsFile, GroupConfig,
    GroupReport,
};
pub use control::{Control, ControlRegistry, InputState, Poll};
pub use defaults::{
    default_binds, default_controls, get_default_binds_yaml, load_default_binds,
    register_default_controls,
};
pub use error::{BindError, Result};
pub use event::{BindEvent, Subscription};
pub use group::{BindDefinition, BindGroup, LoadReport};
pub use manager::BindManager;
pub use types::{combos_conflict, BindId, Combo, ControlId, KeyCode, UnknownKey, MAX_COMBO_LEN};

#[cfg(test)]
mod tests;
