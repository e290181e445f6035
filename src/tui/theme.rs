//! Theme support for the TUI.

use ratatui::style::Color;

/// A color theme for the TUI.
///
/// Themes are runtime-only - the config file names one of the built-ins
/// which is resolved into a Theme at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name for display and configuration
    pub name: String,
    /// Primary accent color (headers, selected elements)
    pub primary: Color,
    /// Main text color
    pub text: Color,
    /// Dimmed text color (hints, secondary info)
    pub text_dim: Color,
    /// Border color
    pub border: Color,
    /// Success indicator color
    pub success: Color,
    /// Error indicator color
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// The default dark-terminal palette.
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            primary: Color::Cyan,
            text: Color::Reset,
            text_dim: Color::DarkGray,
            border: Color::DarkGray,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// A palette for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            primary: Color::Blue,
            text: Color::Black,
            text_dim: Color::Gray,
            border: Color::Gray,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Resolve a configured theme name, falling back to the default.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::default_theme(),
        }
    }
}
