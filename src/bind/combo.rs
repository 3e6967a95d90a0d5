//! Combo codec: converts combos to and from control names for persistence

use super::control::ControlRegistry;
use super::error::{BindError, Result};
use super::types::{Combo, ControlId, MAX_COMBO_LEN};

/// Encode a combo as the ordered names of its controls
pub fn encode(controls: &ControlRegistry, combo: &[ControlId]) -> Result<Vec<String>> {
    combo
        .iter()
        .map(|&id| controls.get(id).map(|c| c.name().to_string()))
        .collect()
}

/// Decode control names into a combo, preserving order.
///
/// All-or-nothing: the first unresolved name fails the whole decode. Names
/// are matched case-insensitively and may use the stock key aliases.
pub fn decode<S: AsRef<str>>(controls: &ControlRegistry, names: &[S]) -> Result<Combo> {
    names
        .iter()
        .map(|name| controls.resolve(name.as_ref()).map(|c| c.index()))
        .collect()
}

/// Check the shape of a combo: length and duplicates, plus that every control
/// is registered
pub fn validate(controls: &ControlRegistry, combo: &[ControlId]) -> Result<()> {
    if combo.len() > MAX_COMBO_LEN {
        return Err(BindError::ComboTooLong { len: combo.len() });
    }

    for (i, id) in combo.iter().enumerate() {
        if !controls.contains(*id) {
            return Err(BindError::UnknownControl(*id));
        }
        if combo[..i].contains(id) {
            return Err(BindError::DuplicateControl(*id));
        }
    }

    Ok(())
}

/// Display string for a combo, e.g. `Control+MiddleButton`
pub fn display_string(controls: &ControlRegistry, combo: &[ControlId]) -> String {
    combo
        .iter()
        .map(|&id| match controls.get(id) {
            Ok(control) => control.name().to_string(),
            Err(_) => id.to_string(),
        })
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ControlRegistry {
        let mut controls = ControlRegistry::new();
        for name in ["Control", "Shift", "A", "B", "Escape"] {
            controls.register(name, false, || false);
        }
        controls
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let controls = registry();
        let combo: Combo = [ControlId(3), ControlId(0), ControlId(1)].into_iter().collect();

        let names = encode(&controls, &combo).unwrap();
        assert_eq!(names, vec!["B", "Control", "Shift"]);
        assert_eq!(decode(&controls, &names).unwrap(), combo);
    }

    #[test]
    fn test_decode_is_all_or_nothing() {
        let controls = registry();
        let err = decode(&controls, &["Control", "Hyper", "A"]).unwrap_err();
        assert_eq!(err, BindError::UnknownControlName("Hyper".into()));
    }

    #[test]
    fn test_decode_accepts_aliases_and_case() {
        let controls = registry();
        let combo = decode(&controls, &["ctrl", "esc", "a"]).unwrap();
        assert_eq!(combo.as_slice(), &[ControlId(0), ControlId(4), ControlId(2)]);
    }

    #[test]
    fn test_encode_unknown_index() {
        let controls = registry();
        assert_eq!(
            encode(&controls, &[ControlId(42)]).unwrap_err(),
            BindError::UnknownControl(ControlId(42))
        );
    }

    #[test]
    fn test_validate() {
        let controls = registry();
        let ids: Vec<ControlId> = (0..5).map(ControlId).collect();

        assert!(validate(&controls, &[]).is_ok());
        assert!(validate(&controls, &ids[..4]).is_ok());
        assert_eq!(
            validate(&controls, &ids).unwrap_err(),
            BindError::ComboTooLong { len: 5 }
        );
        assert_eq!(
            validate(&controls, &[ids[1], ids[2], ids[1]]).unwrap_err(),
            BindError::DuplicateControl(ids[1])
        );
        assert_eq!(
            validate(&controls, &[ControlId(7)]).unwrap_err(),
            BindError::UnknownControl(ControlId(7))
        );
    }

    #[test]
    fn test_display_string() {
        let controls = registry();
        assert_eq!(
            display_string(&controls, &[ControlId(0), ControlId(2)]),
            "Control+A"
        );
        assert_eq!(display_string(&controls, &[]), "");
    }
}
