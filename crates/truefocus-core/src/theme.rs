//! Light/dark color tables for the renderer.
//!
//! The timer and stats cores have no dependency on theming; only the
//! rendering layer resolves colors. Values come with the application and
//! are not user-editable beyond the light/dark switch.

use serde::{Deserialize, Serialize};

use crate::timer::WarningLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph for the theme toggle button when no icon asset is available.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Dark => "\u{2600}",  // sun
            Theme::Light => "\u{1F319}", // moon
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }
}

/// Color roles referenced by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeKey {
    MainBg,
    SettingsBg,
    FrameBg,
    ButtonInactive,
    ButtonActive,
    ButtonStop,
    ButtonReset,
    WarningMedium,
    WarningCritical,
    TextLight,
    TextDark,
    TextMuted,
}

/// One theme's color table.
#[derive(Debug, Clone)]
pub struct Palette {
    pub main_bg: &'static str,
    pub settings_bg: &'static str,
    pub frame_bg: &'static str,
    pub button_inactive: &'static str,
    pub button_active: &'static str,
    pub button_stop: &'static str,
    pub button_reset: &'static str,
    pub warning_medium: &'static str,
    pub warning_critical: &'static str,
    pub text_light: &'static str,
    pub text_dark: &'static str,
    pub text_muted: &'static str,
}

impl Palette {
    pub fn color(&self, key: ThemeKey) -> &'static str {
        match key {
            ThemeKey::MainBg => self.main_bg,
            ThemeKey::SettingsBg => self.settings_bg,
            ThemeKey::FrameBg => self.frame_bg,
            ThemeKey::ButtonInactive => self.button_inactive,
            ThemeKey::ButtonActive => self.button_active,
            ThemeKey::ButtonStop => self.button_stop,
            ThemeKey::ButtonReset => self.button_reset,
            ThemeKey::WarningMedium => self.warning_medium,
            ThemeKey::WarningCritical => self.warning_critical,
            ThemeKey::TextLight => self.text_light,
            ThemeKey::TextDark => self.text_dark,
            ThemeKey::TextMuted => self.text_muted,
        }
    }

    /// Frame color for a focus warning level; `None` means the normal frame.
    pub fn warning_color(&self, level: WarningLevel) -> Option<&'static str> {
        match level {
            WarningLevel::None => None,
            WarningLevel::Medium => Some(self.warning_medium),
            WarningLevel::Critical => Some(self.warning_critical),
        }
    }
}

static LIGHT: Palette = Palette {
    main_bg: "#2c3e50",
    settings_bg: "#34495e",
    frame_bg: "#ecf0f1",
    button_inactive: "#3498db",
    button_active: "#2ecc71",
    button_stop: "#e74c3c",
    button_reset: "#95a5a6",
    warning_medium: "#f39c12",
    warning_critical: "#e74c3c",
    text_light: "white",
    text_dark: "black",
    text_muted: "#7f8c8d",
};

static DARK: Palette = Palette {
    main_bg: "#1a1a1a",
    settings_bg: "#252525",
    frame_bg: "#2d2d2d",
    button_inactive: "#1e88e5",
    button_active: "#4caf50",
    button_stop: "#d32f2f",
    button_reset: "#616161",
    warning_medium: "#ff6f00",
    warning_critical: "#d32f2f",
    text_light: "white",
    text_dark: "#e0e0e0",
    text_muted: "#9e9e9e",
};
