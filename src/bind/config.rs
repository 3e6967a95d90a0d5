//! YAML bind files
//!
//! The persistence side of the engine: bind files hold, per group, an ordered
//! list of `{name, combo}` records using control names.
//!
//! ```yaml
//! groups:
//!   - name: Main
//!     binds:
//!       - name: Open
//!         combo: [Control, MiddleButton]
//!       - name: Select
//!         combo: [LeftButton]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::group::{BindDefinition, LoadReport};
use super::manager::BindManager;
use crate::config::ConfigError;

/// Root structure of a bind file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindsFile {
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// One group's binds, in registration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub binds: Vec<BindDefinition>,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>, binds: Vec<BindDefinition>) -> Self {
        Self {
            name: name.into(),
            binds,
        }
    }
}

/// Outcome of applying one group of a bind file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub group: String,
    pub report: LoadReport,
}

/// Load a bind file from disk
pub fn load_binds_file(path: &Path) -> Result<BindsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    parse_binds_yaml(&content)
}

/// Parse a bind file from a YAML string
pub fn parse_binds_yaml(yaml: &str) -> Result<BindsFile, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Write a bind file, creating parent directories as needed
pub fn save_binds_file(path: &Path, file: &BindsFile) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }
    std::fs::write(path, file.to_yaml()?).map_err(|e| ConfigError::io(path, e))?;
    tracing::info!("Saved binds to {}", path.display());
    Ok(())
}

impl BindsFile {
    /// Snapshot every group of a manager
    pub fn capture(manager: &BindManager) -> Self {
        let controls = manager.controls();
        Self {
            groups: manager
                .groups()
                .map(|group| GroupConfig::new(group.name(), group.dump_bind_data(controls)))
                .collect(),
        }
    }

    /// Apply the file to a manager, best effort.
    ///
    /// Groups are created on demand and binds the group doesn't have yet are
    /// registered unbound. Each group's entries then go through
    /// [`BindGroup::load_bind_data`](super::BindGroup::load_bind_data) as one
    /// batch, so a captured file applies cleanly whatever the binds hold now.
    /// Entries that fail are recorded and skipped.
    pub fn apply(&self, manager: &mut BindManager) -> Vec<GroupReport> {
        self.groups
            .iter()
            .map(|cfg| {
                let (group, controls) = manager.group_with_controls(&cfg.name);
                for def in &cfg.binds {
                    if !group.does_bind_exist(&def.name) {
                        // Only fails on a name clash, ruled out just above
                        let _ = group.register_bind(&def.name, &[], controls, true);
                    }
                }
                let report = group.load_bind_data(&cfg.binds, controls);

                GroupReport {
                    group: group.name().to_string(),
                    report,
                }
            })
            .collect()
    }

    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    fn group_mut(&mut self, name: &str) -> Option<&mut GroupConfig> {
        self.groups
            .iter_mut()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Merge user bind definitions into base definitions
///
/// User entries override or extend base entries:
/// - Same group and bind name (case-insensitive) → combo replaced
/// - Empty combo → the bind stays registered but unbound
/// - Otherwise → the bind (or whole group) is appended
pub fn merge_binds(base: BindsFile, user: BindsFile) -> BindsFile {
    let mut result = base;

    for user_group in user.groups {
        let Some(group) = result.group_mut(&user_group.name) else {
            result.groups.push(user_group);
            continue;
        };

        for user_bind in user_group.binds {
            let existing = group
                .binds
                .iter_mut()
                .find(|b| b.name.eq_ignore_ascii_case(&user_bind.name));

            match existing {
                Some(bind) => bind.combo = user_bind.combo,
                None => group.binds.push(user_bind),
            }
        }
    }

    result
}
