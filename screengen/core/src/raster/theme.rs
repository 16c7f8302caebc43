//! Theme and Colors
//!
//! Flat color palettes for the two desktop appearances. Skins never pick raw
//! colors themselves; they ask the palette of the current appearance.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// RGBA color
pub type Color = Rgba<u8>;

/// Build a color from its channels
#[must_use]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    Rgba([r, g, b, a])
}

// ============================================================================
// Shared Colors
// ============================================================================

/// Debug overlay outlines and labels
pub const DEBUG_RED: Color = rgba(255, 0, 0, 255);

/// Mac close button
pub const CLOSE_RED: Color = rgba(255, 95, 87, 255);

/// Mac minimize button
pub const MINIMIZE_YELLOW: Color = rgba(254, 188, 46, 255);

/// Mac maximize button
pub const MAXIMIZE_GREEN: Color = rgba(40, 200, 64, 255);

/// Windows taskbar activity underline
pub const ACTIVITY_BLUE: Color = rgba(118, 185, 237, 255);

/// Desktop file name text
pub const FILE_LABEL: Color = rgba(255, 255, 255, 255);

/// Drop shadow behind windows and popups
pub const SHADOW: Color = rgba(0, 0, 0, 60);

// ============================================================================
// Appearance
// ============================================================================

/// Light or dark desktop appearance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Dark mode
    Dark,
    /// Light mode
    Light,
}

impl Appearance {
    /// Both appearances
    pub const ALL: [Appearance; 2] = [Appearance::Dark, Appearance::Light];

    /// Parse `dark` or `light`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any other value.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(ConfigError::Invalid {
                key: "appearance",
                value: other.to_string(),
            }),
        }
    }

    /// Color palette for this appearance
    #[must_use]
    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => DARK,
            Self::Light => LIGHT,
        }
    }
}

/// Colors used by the skins
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Flat desktop fill when no background image is available
    pub desktop: Color,
    /// Dock, taskbar and menu bar fill (translucent)
    pub panel: Color,
    /// Dock border
    pub panel_border: Color,
    /// Primary text
    pub text: Color,
    /// Window border
    pub frame: Color,
    /// Title bar of the focused window
    pub handle: Color,
    /// Title bar of an unfocused window, and unfocused control buttons
    pub handle_inactive: Color,
    /// Window content area
    pub content: Color,
    /// Browser navigation bar and active tab
    pub navbar: Color,
    /// Browser address field
    pub field: Color,
    /// Notification card
    pub card: Color,
    /// Dock activity dots
    pub activity: Color,
}

const DARK: Palette = Palette {
    desktop: rgba(28, 36, 52, 255),
    panel: rgba(40, 40, 40, 200),
    panel_border: rgba(90, 90, 90, 255),
    text: rgba(235, 235, 235, 255),
    frame: rgba(70, 70, 70, 255),
    handle: rgba(56, 56, 56, 255),
    handle_inactive: rgba(44, 44, 44, 255),
    content: rgba(30, 30, 30, 255),
    navbar: rgba(48, 48, 48, 255),
    field: rgba(0, 0, 0, 64),
    card: rgba(50, 50, 50, 235),
    activity: rgba(220, 220, 220, 255),
};

const LIGHT: Palette = Palette {
    desktop: rgba(120, 160, 210, 255),
    panel: rgba(245, 245, 245, 190),
    panel_border: rgba(200, 200, 200, 255),
    text: rgba(20, 20, 20, 255),
    frame: rgba(180, 180, 180, 255),
    handle: rgba(230, 230, 230, 255),
    handle_inactive: rgba(246, 246, 246, 255),
    content: rgba(255, 255, 255, 255),
    navbar: rgba(255, 255, 255, 255),
    field: rgba(0, 0, 0, 24),
    card: rgba(240, 240, 240, 235),
    activity: rgba(40, 40, 40, 255),
};
