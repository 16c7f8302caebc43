//! Scene Root
//!
//! The [`Screen`] component is the root of every scene tree. It picks the
//! canvas size, the appearance and a background, writes the screen section
//! and owns the family's standard set of children.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::annotation::{layers, UiClass};
use crate::assets::{load_category, ResourceProvider, Sprite};
use crate::component::{load_children, Component, DrawOp, Paint};
use crate::config::ConfigError;
use crate::context::{ContextError, LayoutContext, ScreenSection};
use crate::geometry::{Rect, Size};
use crate::random::SceneRng;
use crate::raster::{Appearance, Palette, Surface};
use crate::skins::{DesktopFiles, Dock, MenuBar, Notification, RandomApplication, Taskbar};

// ============================================================================
// UI Family
// ============================================================================

/// Desktop look being synthesized
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiFamily {
    /// Dock, menu bar, traffic-light windows
    #[default]
    Mac,
    /// Taskbar, caption-button windows
    Windows,
}

const MAC_CLASSES: [UiClass; 10] = [
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
];

const WINDOWS_CLASSES: [UiClass; 9] = [
    UiClass::Application,
    UiClass::Autocomplete,
    UiClass::FavoriteBar,
    UiClass::File,
    UiClass::FileExplorer,
    UiClass::NavBar,
    UiClass::Notification,
    UiClass::TabBar,
    UiClass::TaskBar,
];

impl UiFamily {
    /// All families
    pub const ALL: [UiFamily; 2] = [UiFamily::Mac, UiFamily::Windows];

    /// Parse `mac` or `windows` (`win` accepted)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any other value.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mac" | "macos" => Ok(Self::Mac),
            "windows" | "win" => Ok(Self::Windows),
            other => Err(ConfigError::Invalid {
                key: "family",
                value: other.to_string(),
            }),
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mac => "mac",
            Self::Windows => "windows",
        }
    }

    /// Asset directory prefix (`mac/...`, `win/...`)
    #[must_use]
    pub fn asset_root(self) -> &'static str {
        match self {
            Self::Mac => "mac",
            Self::Windows => "win",
        }
    }

    /// Label classes this family can emit, in class-table order
    #[must_use]
    pub fn classes(self) -> &'static [UiClass] {
        match self {
            Self::Mac => &MAC_CLASSES,
            Self::Windows => &WINDOWS_CLASSES,
        }
    }
}

impl fmt::Display for UiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Screen
// ============================================================================

/// Canvas sizes a scene is drawn at
pub const SCREEN_SIZES: [Size; 7] = [
    Size::new(1366.0, 768.0),
    Size::new(1920.0, 1080.0),
    Size::new(2560.0, 1080.0),
    Size::new(1680.0, 1050.0),
    Size::new(1536.0, 864.0),
    Size::new(1440.0, 900.0),
    Size::new(1280.0, 720.0),
];

/// Root component of a scene
pub struct Screen {
    family: UiFamily,
    size: Option<Size>,
    appearance: Option<Appearance>,
    backgrounds: Vec<Sprite>,
    children: Vec<Box<dyn Component>>,
}

impl Screen {
    /// Screen with the standard children of `family`
    ///
    /// Mac: desktop files, dock, menu bar, notification, application.
    /// Windows: desktop files, taskbar, notification, application.
    #[must_use]
    pub fn new(family: UiFamily) -> Self {
        let children: Vec<Box<dyn Component>> = match family {
            UiFamily::Mac => vec![
                Box::new(DesktopFiles::for_family(family)),
                Box::new(Dock::new()),
                Box::new(MenuBar::new()),
                Box::new(Notification::new()),
                Box::new(RandomApplication::new(family)),
            ],
            UiFamily::Windows => vec![
                Box::new(DesktopFiles::for_family(family)),
                Box::new(Taskbar::new()),
                Box::new(Notification::new().with_appearance(Appearance::Dark)),
                Box::new(RandomApplication::new(family)),
            ],
        };
        Self {
            family,
            size: None,
            appearance: None,
            backgrounds: Vec::new(),
            children,
        }
    }

    /// Background-only screen: no children, no labels
    #[must_use]
    pub fn background_only(family: UiFamily) -> Self {
        Self::new(family).with_children(Vec::new())
    }

    /// Fix the canvas size
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Fix the appearance
    #[must_use]
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    /// Replace the children
    #[must_use]
    pub fn with_children(mut self, children: Vec<Box<dyn Component>>) -> Self {
        self.children = children;
        self
    }

    /// UI family of this scene
    #[must_use]
    pub fn family(&self) -> UiFamily {
        self.family
    }
}

#[async_trait]
impl Component for Screen {
    fn name(&self) -> &'static str {
        "screen"
    }

    fn children(&self) -> &[Box<dyn Component>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Component>] {
        &mut self.children
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Option<DrawOp>, ContextError> {
        let size = match self.size {
            Some(size) => size,
            None => *rng.pick(&SCREEN_SIZES).unwrap_or(&SCREEN_SIZES[0]),
        };
        let appearance = match self.appearance {
            Some(appearance) => appearance,
            None => *rng.pick(&Appearance::ALL).unwrap_or(&Appearance::Light),
        };
        let background = rng.pick(&self.backgrounds).cloned();

        ctx.screen = Some(ScreenSection {
            size,
            appearance,
            family: self.family,
        });

        Ok(Some(DrawOp::new(
            layers::SCREEN,
            self.name(),
            BackgroundPaint {
                bounds: Rect::new(0.0, 0.0, size.width, size.height),
                background,
                palette: appearance.palette(),
            },
        )))
    }

    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        let category = format!("{}/backgrounds", self.family.asset_root());
        let (backgrounds, ()) = futures::join!(
            load_category(provider, &category),
            load_children(&mut self.children, provider),
        );
        if backgrounds.is_empty() {
            tracing::warn!(category = %category, "No backgrounds available, using a flat desktop color");
        }
        self.backgrounds = backgrounds;
    }
}

#[derive(Debug)]
struct BackgroundPaint {
    bounds: Rect,
    background: Option<Sprite>,
    palette: Palette,
}

impl Paint for BackgroundPaint {
    fn paint(&self, surface: &mut Surface) {
        match &self.background {
            Some(sprite) => surface.blit_cover(sprite, &self.bounds),
            None => surface.fill_rect(&self.bounds, self.palette.desktop),
        }
    }
}
