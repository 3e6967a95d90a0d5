//! bindkit - tick-driven input binding engine
//!
//! This crate maps physical controls into named, rebindable binds with
//! per-tick press / new press / held / released state and event callbacks,
//! plus YAML persistence and a small CLI host.

pub mod bind;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod script;
pub mod tracing;

// Re-export commonly used types
pub use bind::{BindError, BindEvent, BindGroup, BindManager, ControlRegistry, InputState};
pub use config::{ConfigError, EngineConfig};
pub use script::Script;
