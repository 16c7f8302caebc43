//! Window Content
//!
//! What fills an application window below (or instead of) its title bar.
//! Content reads the application section written by its window and returns a
//! paint struct; browser content lives in its own module.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::annotation::UiClass;
use crate::assets::{load_category, ResourceProvider, Sprite};
use crate::component::Paint;
use crate::context::{ContextError, LayoutContext};
use crate::geometry::{Point, Rect};
use crate::random::SceneRng;
use crate::raster::{Palette, Surface};
use crate::skins::LOREM;

/// Pluggable content of an [`ApplicationWindow`](super::ApplicationWindow)
#[async_trait]
pub trait WindowContent: Send + Sync + Debug {
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    /// Extra label emitted with the window bounds
    fn label(&self) -> Option<UiClass> {
        None
    }

    /// Whether the chrome draws a title bar above this content
    fn title_bar(&self) -> bool {
        true
    }

    /// Lay out the content inside the application section
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingSection`] when no window wrote the
    /// application section.
    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Box<dyn Paint>, ContextError>;

    /// Load sprites used by this content
    async fn load_resources(&mut self, _provider: &dyn ResourceProvider) {}
}

// ============================================================================
// Blank / Notes
// ============================================================================

const MIN_SIDEBAR_WIDTH: f64 = 200.0;
const MAX_SIDEBAR_WIDTH: f64 = 500.0;
const ENTRY_HEIGHT: f64 = 60.0;
const TEXT_PADDING: f64 = 10.0;

/// Plain window, optionally with a notes-style sidebar of entries
#[derive(Debug, Default)]
pub struct BlankContent {
    notes: bool,
}

impl BlankContent {
    /// Empty generic window
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes app: sidebar of entries and the active entry's text
    #[must_use]
    pub fn notes() -> Self {
        Self { notes: true }
    }
}

#[async_trait]
impl WindowContent for BlankContent {
    fn name(&self) -> &'static str {
        if self.notes {
            "notes"
        } else {
            "generic"
        }
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Box<dyn Paint>, ContextError> {
        let app = *ctx.application(self.name())?;
        let palette = app.appearance.palette();

        let notes = self.notes.then(|| {
            let width = rng
                .between(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)
                .min(app.content.width / 2.0);
            let count = rng.int_between(1, 10);
            let entries = rng.pick_many(&LOREM, count);
            let active = rng.int_between(0, entries.len());
            NotesLayout {
                sidebar: Rect::new(app.content.x, app.content.y, width, app.content.height),
                entries: entries.into_iter().map(str::to_string).collect(),
                active,
            }
        });

        Ok(Box::new(BlankPaint {
            content: app.content,
            palette,
            notes,
        }))
    }
}

#[derive(Debug)]
struct NotesLayout {
    sidebar: Rect,
    entries: Vec<String>,
    active: usize,
}

#[derive(Debug)]
struct BlankPaint {
    content: Rect,
    palette: Palette,
    notes: Option<NotesLayout>,
}

impl Paint for BlankPaint {
    #[allow(clippy::cast_precision_loss)]
    fn paint(&self, surface: &mut Surface) {
        surface.fill_rect(&self.content, self.palette.content);
        let Some(notes) = &self.notes else {
            return;
        };

        surface.fill_rect(&notes.sidebar, self.palette.navbar);
        let chars = ((notes.sidebar.width - 2.0 * TEXT_PADDING) / Surface::text_width("m", 1)).max(0.0);
        for (index, entry) in notes.entries.iter().enumerate() {
            let row = Rect::new(
                notes.sidebar.x,
                notes.sidebar.y + index as f64 * ENTRY_HEIGHT,
                notes.sidebar.width,
                ENTRY_HEIGHT,
            );
            if index == notes.active {
                surface.fill_rect(&row.inset(4.0), self.palette.field);
            }
            surface.draw_text(
                &truncate(entry, chars),
                Point::new(row.x + TEXT_PADDING, row.y + TEXT_PADDING),
                self.palette.text,
                1,
            );
        }

        // Active entry's text in the editor
        if let Some(entry) = notes.entries.get(notes.active) {
            let editor_x = notes.sidebar.right() + 2.0 * TEXT_PADDING;
            let chars = ((self.content.right() - editor_x - TEXT_PADDING) / Surface::text_width("m", 1)).max(0.0);
            surface.draw_text(
                &truncate(entry, chars),
                Point::new(editor_x, self.content.y + 2.0 * TEXT_PADDING),
                self.palette.text,
                1,
            );
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate(text: &str, max_chars: f64) -> String {
    text.chars().take(max_chars as usize).collect()
}

// ============================================================================
// Screenshot
// ============================================================================

/// Screenshots whose aspect ratio is within this delta of the window's are
/// all candidates
const ASPECT_RATIO_TOLERANCE: f64 = 0.75;

/// Window filled with a real application screenshot
///
/// The screenshot includes its own title bar, so no chrome title bar is
/// drawn. Sprites come from `applications/<folder>`.
#[derive(Debug)]
pub struct ScreenshotContent {
    folder: &'static str,
    label: Option<UiClass>,
    screenshots: Vec<Sprite>,
}

impl ScreenshotContent {
    /// Screenshot window for `folder`, emitting `label` as an extra class
    #[must_use]
    pub fn new(folder: &'static str, label: Option<UiClass>) -> Self {
        Self {
            folder,
            label,
            screenshots: Vec::new(),
        }
    }

    /// Pick a screenshot with an aspect ratio close to `target`
    ///
    /// Random among those within the tolerance, otherwise the closest.
    fn choose(&self, target: f64, rng: &mut SceneRng) -> Option<Sprite> {
        let delta = |sprite: &Sprite| {
            let ratio = f64::from(sprite.width()) / f64::from(sprite.height().max(1));
            (target - ratio).abs()
        };

        let close: Vec<Sprite> = self
            .screenshots
            .iter()
            .filter(|sprite| delta(*sprite) < ASPECT_RATIO_TOLERANCE)
            .cloned()
            .collect();
        if let Some(sprite) = rng.pick(&close) {
            return Some(sprite.clone());
        }

        self.screenshots
            .iter()
            .min_by(|a, b| delta(*a).total_cmp(&delta(*b)))
            .cloned()
    }
}

#[async_trait]
impl WindowContent for ScreenshotContent {
    fn name(&self) -> &'static str {
        self.folder
    }

    fn label(&self) -> Option<UiClass> {
        self.label
    }

    fn title_bar(&self) -> bool {
        false
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Box<dyn Paint>, ContextError> {
        let app = *ctx.application(self.name())?;
        let target = app.bounds.width / app.bounds.height.max(1.0);

        Ok(Box::new(ScreenshotPaint {
            bounds: app.bounds,
            screenshot: self.choose(target, rng),
            palette: app.appearance.palette(),
        }))
    }

    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        let category = format!("applications/{}", self.folder);
        self.screenshots = load_category(provider, &category).await;
        if self.screenshots.is_empty() {
            tracing::warn!(category = %category, "No screenshots available, window will be blank");
        }
    }
}

#[derive(Debug)]
struct ScreenshotPaint {
    bounds: Rect,
    screenshot: Option<Sprite>,
    palette: Palette,
}

impl Paint for ScreenshotPaint {
    fn paint(&self, surface: &mut Surface) {
        match &self.screenshot {
            Some(sprite) => surface.blit(sprite, &self.bounds),
            None => surface.fill_rect(&self.bounds, self.palette.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::RgbaImage;

    use super::*;
    use crate::context::ApplicationSection;
    use crate::raster::Appearance;

    fn context(bounds: Rect) -> LayoutContext {
        let mut ctx = LayoutContext::new();
        ctx.application = Some(ApplicationSection {
            bounds,
            content: bounds,
            title_bar: Rect::new(bounds.x, bounds.y, bounds.width, 0.0),
            active: true,
            appearance: Appearance::Light,
        });
        ctx
    }

    #[test]
    fn test_screenshot_prefers_close_aspect_ratio() {
        let mut content = ScreenshotContent::new("word", None);
        content.screenshots = vec![
            Arc::new(RgbaImage::new(400, 100)),
            Arc::new(RgbaImage::new(160, 100)),
        ];
        let mut rng = SceneRng::seed_from_u64(1);

        for _ in 0..20 {
            let picked = content.choose(1.5, &mut rng).unwrap();
            assert_eq!(picked.width(), 160);
        }
        // Nothing within tolerance: closest wins
        let picked = content.choose(8.0, &mut rng).unwrap();
        assert_eq!(picked.width(), 400);
    }

    #[test]
    fn test_screenshot_without_sprites_paints_blank() {
        let content = ScreenshotContent::new("finder", Some(UiClass::FileExplorer));
        let mut ctx = context(Rect::new(10.0, 10.0, 200.0, 100.0));
        let mut rng = SceneRng::seed_from_u64(2);

        let paint = content.layout(&mut ctx, &mut rng).unwrap();
        let mut surface = Surface::new(300, 200);
        paint.paint(&mut surface);

        assert_eq!(content.label(), Some(UiClass::FileExplorer));
        assert!(!content.title_bar());
    }

    #[test]
    fn test_content_requires_application_section() {
        let mut ctx = LayoutContext::new();
        let mut rng = SceneRng::seed_from_u64(0);
        let err = BlankContent::notes().layout(&mut ctx, &mut rng).unwrap_err();
        assert_eq!(
            err,
            ContextError::MissingSection {
                section: "application",
                requested_by: "notes",
            }
        );
    }
}
