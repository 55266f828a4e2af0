use crossterm::style::Color;

/// Design tokens for the ruledeck CLI.
///
/// Only 5 semantic colors (`colors::*`); every icon comes from this module.
pub mod colors {
    use super::Color;

    /// #22C55E
    pub const SUCCESS: Color = Color::Green;
    /// #EF4444
    pub const ERROR: Color = Color::Red;
    /// #F59E0B
    pub const WARNING: Color = Color::Yellow;
    /// #06B6D4
    pub const INFO: Color = Color::Cyan;
    /// #6B7280
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const HINT: &str = "💡";
    pub const ARROW: &str = "↳";
    pub const FILE: &str = "•";
    pub const ADDED: &str = "+";
    pub const REMOVED: &str = "-";
    pub const CHANGED: &str = "~";

    // Command identifiers (used in headers).
    pub const WATCH: &str = "⟳";
    pub const SERVE: &str = "▶";
    pub const INIT: &str = "📁";
    pub const CHECK: &str = "🔍";
    pub const LIST: &str = "📋";
    pub const CONFIG: &str = "⚙";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const HINT: &str = "[HINT]";
    pub const ARROW: &str = "[>]";
    pub const FILE: &str = "-";
    pub const ADDED: &str = "[+]";
    pub const REMOVED: &str = "[-]";
    pub const CHANGED: &str = "[~]";

    pub const WATCH: &str = "[~]";
    pub const SERVE: &str = "[SERVE]";
    pub const INIT: &str = "[INIT]";
    pub const CHECK: &str = "[CHECK]";
    pub const LIST: &str = "[LIST]";
    pub const CONFIG: &str = "[CONFIG]";
}
