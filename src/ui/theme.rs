//! Theme color definitions for the UI
//!
//! Provides dark and light color palettes that can be switched at runtime.

use crate::config::Theme;
use ratatui::style::Color;

/// Complete color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Main background
    pub bg: Color,
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (panel titles, device names)
    pub accent: Color,
    /// High polling rate
    pub good: Color,
    /// Middling polling rate
    pub fair: Color,
    /// Low rate / lost device
    pub bad: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Dark theme - default color scheme
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(24, 24, 32),
            fg: Color::Rgb(205, 205, 215),
            dim: Color::Rgb(95, 95, 115),
            accent: Color::Rgb(85, 195, 225),
            good: Color::Rgb(85, 200, 125),
            fair: Color::Rgb(235, 185, 85),
            bad: Color::Rgb(235, 95, 105),
        }
    }

    /// Light theme - high contrast for bright terminals
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(246, 246, 249),
            fg: Color::Rgb(32, 32, 42),
            dim: Color::Rgb(135, 135, 155),
            accent: Color::Rgb(0, 125, 155),
            good: Color::Rgb(28, 145, 72),
            fair: Color::Rgb(175, 120, 0),
            bad: Color::Rgb(195, 55, 65),
        }
    }
}
