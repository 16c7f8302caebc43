//! Application Windows
//!
//! One [`ApplicationWindow`] component composes a family [`WindowChrome`]
//! with a pluggable [`WindowContent`]. The window decides placement and
//! focus, writes the application section and the `application` label; the
//! content then lays itself out inside that section.
//!
//! [`RandomApplication`] holds one window per [`AppVariant`] of a family and
//! delegates each image to one of them, chosen with the scene RNG.

pub mod browser;
pub mod chrome;
pub mod content;

pub use browser::{BrowserContent, Website};
pub use chrome::{chrome_for, Frame, MacChrome, WinChrome, WindowChrome};
pub use content::{BlankContent, ScreenshotContent, WindowContent};

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::annotation::{layers, UiClass};
use crate::assets::ResourceProvider;
use crate::component::{Component, DrawOp, Paint};
use crate::context::{ApplicationSection, ContextError, LayoutContext};
use crate::geometry::Rect;
use crate::layout::{place_window, PlacementRules};
use crate::random::SceneRng;
use crate::raster::{Appearance, Surface};
use crate::scene::UiFamily;

const ACTIVE_PROBABILITY: f64 = 0.5;

// ============================================================================
// Application Window
// ============================================================================

/// Window component: chrome + content
#[derive(Debug)]
pub struct ApplicationWindow {
    chrome: Arc<dyn WindowChrome>,
    content: Box<dyn WindowContent>,
    rules: PlacementRules,
    appearance: Option<Appearance>,
}

impl ApplicationWindow {
    /// Window with default placement rules for the chrome's family
    #[must_use]
    pub fn new(chrome: Arc<dyn WindowChrome>, content: Box<dyn WindowContent>) -> Self {
        let rules = PlacementRules {
            top_limit: chrome.top_limit(),
            ..PlacementRules::default()
        };
        Self {
            chrome,
            content,
            rules,
            appearance: None,
        }
    }

    /// Override the chance of a maximized window
    #[must_use]
    pub fn with_fullscreen_probability(mut self, probability: f64) -> Self {
        self.rules.fullscreen_probability = probability;
        self
    }

    /// Force an appearance regardless of the screen
    #[must_use]
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    /// Content shown in this window
    #[must_use]
    pub fn content(&self) -> &dyn WindowContent {
        self.content.as_ref()
    }
}

#[async_trait]
impl Component for ApplicationWindow {
    fn name(&self) -> &'static str {
        "application"
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Option<DrawOp>, ContextError> {
        let screen = *ctx.screen(self.name())?;
        let reserved = self.chrome.reserved_space(ctx, self.name())?;

        let placement = place_window(rng, screen.size, reserved, &self.rules);
        let bounds = placement.bounds;
        let active = rng.chance(ACTIVE_PROBABILITY);
        let appearance = self.appearance.unwrap_or(screen.appearance);

        let title_bar = self.content.title_bar();
        let handle = if title_bar {
            self.chrome.handle_height().min(bounds.height)
        } else {
            0.0
        };
        let content = Rect::new(bounds.x, bounds.y + handle, bounds.width, bounds.height - handle);
        let mut title_area = self.chrome.title_area(&bounds);
        title_area.height = handle;

        ctx.application = Some(ApplicationSection {
            bounds,
            content,
            title_bar: title_area,
            active,
            appearance,
        });
        ctx.annotate(layers::APPLICATION, UiClass::Application, bounds);
        if let Some(label) = self.content.label() {
            ctx.annotate(layers::APPLICATION, label, bounds);
        }

        tracing::trace!(
            content = self.content.name(),
            fullscreen = placement.fullscreen,
            active,
            "Placed application window"
        );

        let content_paint = self.content.layout(ctx, rng)?;
        Ok(Some(DrawOp::new(
            layers::APPLICATION,
            self.name(),
            WindowPaint {
                chrome: Arc::clone(&self.chrome),
                frame: Frame {
                    bounds,
                    active,
                    palette: appearance.palette(),
                    title_bar,
                },
                content: content_paint,
            },
        )))
    }

    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        self.content.load_resources(provider).await;
    }
}

#[derive(Debug)]
struct WindowPaint {
    chrome: Arc<dyn WindowChrome>,
    frame: Frame,
    content: Box<dyn Paint>,
}

impl Paint for WindowPaint {
    fn paint(&self, surface: &mut Surface) {
        self.chrome.paint_frame(surface, &self.frame);
        self.content.paint(surface);
        surface.stroke_rect(&self.frame.bounds, self.frame.palette.frame, 1);
    }
}

// ============================================================================
// Variant Registry
// ============================================================================

/// Kinds of application a scene can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppVariant {
    /// Empty window
    Generic,
    /// Notes app with a sidebar
    Notes,
    /// Word processor screenshot
    Word,
    /// Spreadsheet screenshot
    Excel,
    /// Slides screenshot
    PowerPoint,
    /// File manager screenshot, labeled `fileexplorer`
    FileExplorer,
    /// Browser with tabs and navigation bars
    Browser,
}

const MAC_VARIANTS: [AppVariant; 6] = [
    AppVariant::Browser,
    AppVariant::Notes,
    AppVariant::Word,
    AppVariant::Excel,
    AppVariant::PowerPoint,
    AppVariant::FileExplorer,
];

const WINDOWS_VARIANTS: [AppVariant; 5] = [
    AppVariant::Word,
    AppVariant::Excel,
    AppVariant::PowerPoint,
    AppVariant::FileExplorer,
    AppVariant::Browser,
];

impl AppVariant {
    /// Variants shown in random scenes of `family`
    #[must_use]
    pub fn for_family(family: UiFamily) -> &'static [AppVariant] {
        match family {
            UiFamily::Mac => &MAC_VARIANTS,
            UiFamily::Windows => &WINDOWS_VARIANTS,
        }
    }

    /// Fresh, unloaded content for this variant
    #[must_use]
    pub fn content(self, family: UiFamily) -> Box<dyn WindowContent> {
        match self {
            Self::Generic => Box::new(BlankContent::new()),
            Self::Notes => Box::new(BlankContent::notes()),
            Self::Word => Box::new(ScreenshotContent::new("word", None)),
            Self::Excel => Box::new(ScreenshotContent::new("excel", None)),
            Self::PowerPoint => Box::new(ScreenshotContent::new("powerpoint", None)),
            Self::FileExplorer => {
                let folder = match family {
                    UiFamily::Mac => "finder",
                    UiFamily::Windows => "explorer",
                };
                Box::new(ScreenshotContent::new(folder, Some(UiClass::FileExplorer)))
            }
            Self::Browser => Box::new(BrowserContent::new()),
        }
    }
}

/// One window per variant; each image shows a randomly chosen one
#[derive(Debug)]
pub struct RandomApplication {
    windows: Vec<ApplicationWindow>,
}

impl RandomApplication {
    /// All variants of `family` with the family's chrome
    #[must_use]
    pub fn new(family: UiFamily) -> Self {
        Self::with_variants(family, AppVariant::for_family(family))
    }

    /// A chosen set of variants with the family's chrome
    #[must_use]
    pub fn with_variants(family: UiFamily, variants: &[AppVariant]) -> Self {
        let chrome = chrome_for(family);
        let windows = variants
            .iter()
            .map(|variant| ApplicationWindow::new(Arc::clone(&chrome), variant.content(family)))
            .collect();
        Self { windows }
    }

    /// Number of candidate windows
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether there are no candidate windows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[async_trait]
impl Component for RandomApplication {
    fn name(&self) -> &'static str {
        "application"
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Option<DrawOp>, ContextError> {
        match rng.pick(&self.windows) {
            Some(window) => window.layout(ctx, rng),
            None => Ok(None),
        }
    }

    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        join_all(
            self.windows
                .iter_mut()
                .map(|window| window.load_resources(provider)),
        )
        .await;
    }
}
