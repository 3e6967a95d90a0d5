//! Core types for the bind system: ControlId, BindId, Combo, KeyCode

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

/// Maximum number of controls in a single combo
pub const MAX_COMBO_LEN: usize = 4;

/// Stable index of a registered control, assigned once and never reused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub(crate) usize);

impl ControlId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of a bind inside its group, fixed at registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindId(pub(crate) usize);

impl BindId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An ordered set of controls that must all be active at once.
///
/// Inline storage covers every valid combo, so combos never touch the heap.
pub type Combo = SmallVec<[ControlId; MAX_COMBO_LEN]>;

/// Check whether two combos are ambiguous with respect to each other.
///
/// Treating both as unordered sets, they conflict when one is a subset of the
/// other (equal sets included). An empty combo is never active and so never
/// conflicts with anything.
pub fn combos_conflict(a: &[ControlId], b: &[ControlId]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().all(|id| large.contains(id))
}

/// The stock controls shipped with the default catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A letter or digit key (normalized to uppercase)
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    // Function keys
    F(u8), // F1-F12

    // Numpad (physical keys)
    Numpad(u8), // Num0-Num9
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadEnter,
    NumpadDecimal,

    // Modifier keys are ordinary controls in a combo
    Control,
    Shift,
    Alt,
    Meta,

    // Mouse
    LeftButton,
    RightButton,
    MiddleButton,
    MouseWheelUp,
    MouseWheelDown,
}

impl KeyCode {
    /// Every control in the default catalog, in registration order
    pub fn catalog() -> Vec<KeyCode> {
        let mut keys = Vec::with_capacity(96);
        keys.extend(('A'..='Z').map(KeyCode::Char));
        keys.extend(('0'..='9').map(KeyCode::Char));
        keys.extend([
            KeyCode::Enter,
            KeyCode::Escape,
            KeyCode::Tab,
            KeyCode::Backspace,
            KeyCode::Delete,
            KeyCode::Space,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::PageUp,
            KeyCode::PageDown,
            KeyCode::Insert,
        ]);
        keys.extend((1..=12).map(KeyCode::F));
        keys.extend((0..=9).map(KeyCode::Numpad));
        keys.extend([
            KeyCode::NumpadAdd,
            KeyCode::NumpadSubtract,
            KeyCode::NumpadMultiply,
            KeyCode::NumpadDivide,
            KeyCode::NumpadEnter,
            KeyCode::NumpadDecimal,
            KeyCode::Control,
            KeyCode::Shift,
            KeyCode::Alt,
            KeyCode::Meta,
            KeyCode::LeftButton,
            KeyCode::RightButton,
            KeyCode::MiddleButton,
            KeyCode::MouseWheelUp,
            KeyCode::MouseWheelDown,
        ]);
        keys
    }

    /// Analog controls report continuous activity rather than discrete presses
    pub const fn is_analog(self) -> bool {
        matches!(self, KeyCode::MouseWheelUp | KeyCode::MouseWheelDown)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            KeyCode::Insert => write!(f, "Insert"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Numpad(n) => write!(f, "Num{}", n),
            KeyCode::NumpadAdd => write!(f, "NumAdd"),
            KeyCode::NumpadSubtract => write!(f, "NumSubtract"),
            KeyCode::NumpadMultiply => write!(f, "NumMultiply"),
            KeyCode::NumpadDivide => write!(f, "NumDivide"),
            KeyCode::NumpadEnter => write!(f, "NumEnter"),
            KeyCode::NumpadDecimal => write!(f, "NumDecimal"),
            KeyCode::Control => write!(f, "Control"),
            KeyCode::Shift => write!(f, "Shift"),
            KeyCode::Alt => write!(f, "Alt"),
            KeyCode::Meta => write!(f, "Meta"),
            KeyCode::LeftButton => write!(f, "LeftButton"),
            KeyCode::RightButton => write!(f, "RightButton"),
            KeyCode::MiddleButton => write!(f, "MiddleButton"),
            KeyCode::MouseWheelUp => write!(f, "MouseWheelUp"),
            KeyCode::MouseWheelDown => write!(f, "MouseWheelDown"),
        }
    }
}

/// Error returned when a key name matches nothing in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown key: {}", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for KeyCode {
    type Err = UnknownKey;

    /// Parse a canonical name or one of its aliases, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();

        // Single letter or digit
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphanumeric() {
                return Ok(KeyCode::Char(c.to_ascii_uppercase()));
            }
            return Err(UnknownKey(s.to_string()));
        }

        // Function keys and numpad digits
        if let Some(n) = key.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(KeyCode::F(n));
            }
        }
        if let Some(n) = key
            .strip_prefix("numpad")
            .or_else(|| key.strip_prefix("num"))
            .and_then(|n| n.parse::<u8>().ok())
        {
            if n <= 9 {
                return Ok(KeyCode::Numpad(n));
            }
        }

        match key.as_str() {
            "enter" | "return" => Ok(KeyCode::Enter),
            "escape" | "esc" => Ok(KeyCode::Escape),
            "tab" => Ok(KeyCode::Tab),
            "backspace" | "back" => Ok(KeyCode::Backspace),
            "delete" | "del" => Ok(KeyCode::Delete),
            "space" => Ok(KeyCode::Space),

            "up" | "arrowup" => Ok(KeyCode::Up),
            "down" | "arrowdown" => Ok(KeyCode::Down),
            "left" | "arrowleft" => Ok(KeyCode::Left),
            "right" | "arrowright" => Ok(KeyCode::Right),

            "home" => Ok(KeyCode::Home),
            "end" => Ok(KeyCode::End),
            "pageup" | "pgup" => Ok(KeyCode::PageUp),
            "pagedown" | "pgdown" | "pgdn" => Ok(KeyCode::PageDown),
            "insert" | "ins" => Ok(KeyCode::Insert),

            "numpad_add" | "numadd" | "numplus" => Ok(KeyCode::NumpadAdd),
            "numpad_subtract" | "numsubtract" | "numsub" | "numminus" => {
                Ok(KeyCode::NumpadSubtract)
            }
            "numpad_multiply" | "nummultiply" | "nummul" => Ok(KeyCode::NumpadMultiply),
            "numpad_divide" | "numdivide" | "numdiv" => Ok(KeyCode::NumpadDivide),
            "numpad_enter" | "numenter" => Ok(KeyCode::NumpadEnter),
            "numpad_decimal" | "numdecimal" | "numdot" => Ok(KeyCode::NumpadDecimal),

            "control" | "ctrl" => Ok(KeyCode::Control),
            "shift" => Ok(KeyCode::Shift),
            "alt" | "option" | "opt" => Ok(KeyCode::Alt),
            "meta" | "super" | "win" | "cmd" => Ok(KeyCode::Meta),

            "leftbutton" | "lmb" | "mouse1" => Ok(KeyCode::LeftButton),
            "rightbutton" | "rmb" | "mouse2" => Ok(KeyCode::RightButton),
            "middlebutton" | "mmb" | "mouse3" => Ok(KeyCode::MiddleButton),
            "mousewheelup" | "wheelup" | "scrollup" => Ok(KeyCode::MouseWheelUp),
            "mousewheeldown" | "wheeldown" | "scrolldown" => Ok(KeyCode::MouseWheelDown),

            _ => Err(UnknownKey(s.to_string())),
        }
    }
}
