//! Annotations
//!
//! Candidate label rectangles produced during the layout pass. Each one is
//! tagged with the compositing layer of the component that produced it, so
//! the occlusion resolver can tell which labels end up painted over.
//!
//! # Module Overview
//!
//! - [`occlusion`]: clip + occlusion filtering of candidate annotations
//! - [`classes`]: batch-wide class name to id table

pub mod classes;
pub mod occlusion;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::geometry::Rect;

pub use classes::{ClassPolicy, ClassTable};
pub use occlusion::{OcclusionResolver, DEFAULT_SLIVER_EPSILON};

// ============================================================================
// Layers
// ============================================================================

/// Compositing layers (higher paints later and can occlude lower layers)
pub mod layers {
    /// Desktop background
    pub const SCREEN: i32 = 0;
    /// Desktop file icons
    pub const FILE: i32 = 10;
    /// Application window and its chrome
    pub const APPLICATION: i32 = 20;
    /// Dock (mac) or taskbar (windows)
    pub const DOCK: i32 = 30;
    /// Top menu bar (mac)
    pub const MENU_BAR: i32 = 40;
    /// Notification toast
    pub const NOTIFICATION: i32 = 50;
}

// ============================================================================
// Classes
// ============================================================================

/// Detector label classes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiClass {
    /// Any application window
    Application,
    /// Browser address-bar suggestion dropdown
    Autocomplete,
    /// Mac dock
    Dock,
    /// Browser favorites/bookmarks bar
    #[serde(rename = "favoritebar")]
    FavoriteBar,
    /// Desktop file or folder icon with its name
    File,
    /// File explorer window (Finder, Explorer)
    #[serde(rename = "fileexplorer")]
    FileExplorer,
    /// Mac menu bar
    #[serde(rename = "menubar")]
    MenuBar,
    /// Browser navigation bar
    #[serde(rename = "navbar")]
    NavBar,
    /// Notification toast
    Notification,
    /// Browser tab strip
    #[serde(rename = "tabbar")]
    TabBar,
    /// Windows taskbar
    #[serde(rename = "taskbar")]
    TaskBar,
}

impl UiClass {
    /// Every class, in declaration order
    pub const ALL: [UiClass; 11] = [
        UiClass::Application,
        UiClass::Autocomplete,
        UiClass::Dock,
        UiClass::FavoriteBar,
        UiClass::File,
        UiClass::FileExplorer,
        UiClass::MenuBar,
        UiClass::NavBar,
        UiClass::Notification,
        UiClass::TabBar,
        UiClass::TaskBar,
    ];

    /// Stable lowercase name used in label files and `classes.json`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Autocomplete => "autocomplete",
            Self::Dock => "dock",
            Self::FavoriteBar => "favoritebar",
            Self::File => "file",
            Self::FileExplorer => "fileexplorer",
            Self::MenuBar => "menubar",
            Self::NavBar => "navbar",
            Self::Notification => "notification",
            Self::TabBar => "tabbar",
            Self::TaskBar => "taskbar",
        }
    }

    /// Parse a lowercase class name
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unknown names.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == value)
            .ok_or_else(|| ConfigError::Invalid {
                key: "class",
                value: value.to_string(),
            })
    }
}

impl std::fmt::Display for UiClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Annotation
// ============================================================================

/// A labeled rectangle on a compositing layer
///
/// Serialized flat, matching the raw label format:
/// `{"layer":20,"class":"application","x":..,"y":..,"width":..,"height":..}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Compositing layer of the owning component
    pub layer: i32,
    /// Label class
    pub class: UiClass,
    /// Region covered by the element
    #[serde(flatten)]
    pub rect: Rect,
}

impl Annotation {
    /// Create a new annotation
    #[must_use]
    pub const fn new(layer: i32, class: UiClass, rect: Rect) -> Self {
        Self { layer, class, rect }
    }
}
