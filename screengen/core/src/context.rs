//! Layout Context
//!
//! Per-image state threaded top-down through the component tree during the
//! layout pass. Each component writes its own section before its children run
//! (the traversal is pre-order), so a child can read any ancestor's section.
//! Reading a section that no ancestor wrote is a [`ContextError`] and aborts
//! only the image being generated.
//!
//! The context also owns the single list of candidate annotations that every
//! component appends to.

use thiserror::Error;

use crate::annotation::{Annotation, UiClass};
use crate::geometry::{Edge, Rect, Size};
use crate::raster::Appearance;
use crate::scene::UiFamily;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while reading the layout context
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// A component needed a section no ancestor has written
    #[error("{requested_by} requires the {section} section, which no ancestor provided")]
    MissingSection {
        /// Name of the missing section
        section: &'static str,
        /// Component that asked for it
        requested_by: &'static str,
    },
}

// ============================================================================
// Sections
// ============================================================================

/// Written by the scene root
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenSection {
    /// Canvas size in pixels
    pub size: Size,
    /// Desktop appearance
    pub appearance: Appearance,
    /// UI family being rendered
    pub family: UiFamily,
}

/// Written by the mac dock
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockSection {
    /// Dock panel bounds
    pub bounds: Rect,
    /// Screen edge the dock sits on
    pub orientation: Edge,
    /// Side of one icon cell after shrinking to fit
    pub item_size: f64,
}

/// Written by the windows taskbar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaskbarSection {
    /// Taskbar bounds
    pub bounds: Rect,
    /// Screen edge the taskbar occupies
    pub orientation: Edge,
}

/// Written by the mac menu bar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuBarSection {
    /// Menu bar bounds
    pub bounds: Rect,
}

/// Written by the application window
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApplicationSection {
    /// Whole window including chrome
    pub bounds: Rect,
    /// Area below the title bar available to the content
    pub content: Rect,
    /// Free part of the title bar beside the window controls
    pub title_bar: Rect,
    /// Whether the window has focus
    pub active: bool,
    /// Appearance used for the window
    pub appearance: Appearance,
}

/// Written by browser content
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrowserSection {
    /// Navigation bar bounds
    pub navbar: Rect,
    /// Web page area
    pub page: Rect,
}

/// Written by the notification when one is shown
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NotificationSection {
    /// Notification card bounds
    pub bounds: Rect,
}

// ============================================================================
// Context
// ============================================================================

/// Mutable per-image layout state
#[derive(Clone, Debug, Default)]
pub struct LayoutContext {
    /// Screen section
    pub screen: Option<ScreenSection>,
    /// Dock section (mac)
    pub dock: Option<DockSection>,
    /// Taskbar section (windows)
    pub taskbar: Option<TaskbarSection>,
    /// Menu bar section (mac)
    pub menu_bar: Option<MenuBarSection>,
    /// Application window section
    pub application: Option<ApplicationSection>,
    /// Browser section
    pub browser: Option<BrowserSection>,
    /// Notification section
    pub notification: Option<NotificationSection>,
    annotations: Vec<Annotation>,
}

macro_rules! section_accessor {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $label:literal) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns [`ContextError::MissingSection`] when no ancestor wrote it.
        pub fn $name(&self, requested_by: &'static str) -> Result<&$ty, ContextError> {
            self.$name.as_ref().ok_or(ContextError::MissingSection {
                section: $label,
                requested_by,
            })
        }
    };
}

impl LayoutContext {
    /// Empty context for a new image
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    section_accessor!(
        /// Screen section, required by every skin
        screen, ScreenSection, "screen"
    );
    section_accessor!(
        /// Dock section
        dock, DockSection, "dock"
    );
    section_accessor!(
        /// Taskbar section
        taskbar, TaskbarSection, "taskbar"
    );
    section_accessor!(
        /// Menu bar section
        menu_bar, MenuBarSection, "menu_bar"
    );
    section_accessor!(
        /// Application window section
        application, ApplicationSection, "application"
    );
    section_accessor!(
        /// Browser section
        browser, BrowserSection, "browser"
    );

    /// Append a candidate annotation
    pub fn annotate(&mut self, layer: i32, class: UiClass, rect: Rect) {
        self.annotations.push(Annotation::new(layer, class, rect));
    }

    /// Candidate annotations collected so far, in emission order
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Take the collected annotations
    #[must_use]
    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }
}
