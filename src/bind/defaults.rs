//! Default controls and binds
//!
//! The stock control catalog is registered against an [`InputState`] the host
//! feeds. Default binds ship as `binds.yaml` at the project root and are
//! layered with project-local and user overrides.

use std::path::Path;

use super::config::{load_binds_file, merge_binds, parse_binds_yaml, BindsFile, GroupConfig};
use super::control::{ControlRegistry, InputState};
use super::group::BindDefinition;
use super::types::{ControlId, KeyCode};

/// Default bind file embedded at compile time
const DEFAULT_BINDS_YAML: &str = include_str!("../../binds.yaml");

/// Get the embedded default bind file as a string
pub fn get_default_binds_yaml() -> &'static str {
    DEFAULT_BINDS_YAML
}

/// Register every control in the default catalog, polling `input`
pub fn register_default_controls(
    registry: &mut ControlRegistry,
    input: &InputState,
) -> Vec<ControlId> {
    KeyCode::catalog()
        .into_iter()
        .map(|key| {
            let name = key.to_string();
            let poll = input.poller(&name);
            registry.register(name, key.is_analog(), poll)
        })
        .collect()
}

/// A registry holding just the default catalog
pub fn default_controls(input: &InputState) -> ControlRegistry {
    let mut registry = ControlRegistry::new();
    register_default_controls(&mut registry, input);
    registry
}

/// Load and merge bind files: defaults + overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default binds (compiled into binary)
/// 2. binds.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/bindkit/binds.yaml
pub fn load_default_binds() -> BindsFile {
    // Load base defaults from embedded YAML
    let mut binds = match parse_binds_yaml(DEFAULT_BINDS_YAML) {
        Ok(b) => {
            tracing::info!("Loaded embedded default binds ({} groups)", b.groups.len());
            b
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded binds: {}, using hardcoded defaults",
                e
            );
            default_binds()
        }
    };

    // Try loading project-local binds.yaml
    if let Ok(local) = load_binds_file(Path::new("binds.yaml")) {
        tracing::info!("Merging project binds.yaml ({} groups)", local.groups.len());
        binds = merge_binds(binds, local);
    }

    // Try loading user config
    if let Some(user_path) = crate::config_paths::binds_file() {
        if user_path.exists() {
            match load_binds_file(&user_path) {
                Ok(user) => {
                    tracing::info!(
                        "Merging user binds from {} ({} groups)",
                        user_path.display(),
                        user.groups.len()
                    );
                    binds = merge_binds(binds, user);
                }
                Err(e) => {
                    tracing::warn!("Failed to load user binds from {}: {}", user_path.display(), e);
                }
            }
        }
    }

    binds
}

/// Hardcoded default binds, used if the embedded file fails to parse
pub fn default_binds() -> BindsFile {
    let main: &[(&str, &[&str])] = &[
        ("Open", &["Control", "MiddleButton"]),
        ("Hide", &["Shift", "MiddleButton"]),
        ("Select", &["LeftButton"]),
        ("ScrollUp", &["MouseWheelUp"]),
        ("ScrollDown", &["MouseWheelDown"]),
    ];

    BindsFile {
        groups: vec![GroupConfig::new(
            "Main",
            main.iter()
                .map(|(name, combo)| BindDefinition::new(*name, *combo))
                .collect(),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_registration_is_idempotent() {
        let input = InputState::new();
        let mut registry = ControlRegistry::new();
        let first = register_default_controls(&mut registry, &input);
        let second = register_default_controls(&mut registry, &input);

        assert_eq!(first, second);
        assert_eq!(registry.len(), KeyCode::catalog().len());
    }

    #[test]
    fn test_catalog_polls_input_state() {
        let input = InputState::new();
        let registry = default_controls(&input);
        let wheel = registry.lookup("MouseWheelUp").unwrap();

        assert!(wheel.is_analog());
        assert!(!wheel.is_pressed());
        input.press("mousewheelup");
        assert!(wheel.is_pressed());
    }

    #[test]
    fn test_hardcoded_defaults_agree_with_embedded() {
        let embedded = parse_binds_yaml(DEFAULT_BINDS_YAML).unwrap();
        let main = embedded.group("Main").unwrap();

        for def in &default_binds().groups[0].binds {
            assert!(main.binds.contains(def), "{} missing from binds.yaml", def.name);
        }
    }
}
