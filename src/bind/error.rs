//! Error types for bind registration, editing and loading
//!
//! Every variant is a local, recoverable condition. Operations that return one
//! leave the registry and groups exactly as they were before the call.

use thiserror::Error;

use super::types::{ControlId, MAX_COMBO_LEN};

/// Errors produced by the bind engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A bind with this name (case-insensitive) already exists in the group
    #[error("a bind named `{0}` already exists")]
    NameConflict(String),

    /// The combo is a subset or superset of another bind's combo
    #[error("combo conflicts with bind `{existing}`")]
    ComboConflict { existing: String },

    /// The combo has more controls than a bind can hold
    #[error("combo has {len} controls, at most {max} are allowed", max = MAX_COMBO_LEN)]
    ComboTooLong { len: usize },

    /// The same control appears twice in one combo
    #[error("control {0} appears more than once in the combo")]
    DuplicateControl(ControlId),

    /// No control is registered under this index
    #[error("no control registered with index {0}")]
    UnknownControl(ControlId),

    /// No control is registered under this name
    #[error("unknown control `{0}`")]
    UnknownControlName(String),

    /// No bind is registered under this name
    #[error("unknown bind `{0}`")]
    UnknownBindName(String),
}

/// Result alias for bind operations
pub type Result<T> = std::result::Result<T, BindError>;
