//! Desktop Files
//!
//! Scatters file and folder icons with a name label over the desktop. Each
//! icon is labeled `file` with a box covering the icon and its caption.

use async_trait::async_trait;

use crate::annotation::{layers, UiClass};
use crate::assets::{load_category, ResourceProvider, Sprite};
use crate::component::{Component, DrawOp, Paint};
use crate::context::{ContextError, LayoutContext};
use crate::geometry::{Point, Rect};
use crate::random::SceneRng;
use crate::raster::theme::FILE_LABEL;
use crate::raster::{rgba, Color, Surface};
use crate::scene::UiFamily;

const MIN_FILE_COUNT: usize = 5;
const MAX_FILE_COUNT: usize = 30;
const FILE_ICON_HEIGHT: f64 = 60.0;
const LABEL_GAP: f64 = 4.0;
const LABEL_SCALE: u32 = 1;
const FOLDER_PROBABILITY: f64 = 0.5;

const SELECTION_BORDER: Color = rgba(100, 100, 100, 255);
const ACTIVE_SELECTION: Color = rgba(30, 90, 200, 255);
const INACTIVE_SELECTION: Color = rgba(208, 208, 208, 255);
const INACTIVE_LABEL: Color = rgba(112, 112, 112, 255);

const FILE_NAMES: [&str; 12] = [
    "Report", "Invoice", "Budget 2023", "Notes", "Untitled", "Screenshot",
    "Holiday", "Draft", "Archive", "Backup", "Presentation", "Todo",
];
const FILE_EXTENSIONS: [&str; 8] = [".pdf", ".docx", ".xlsx", ".png", ".txt", ".zip", ".pptx", ".mp4"];

/// Selection state of one desktop icon
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Highlight {
    None,
    Active,
    Inactive,
}

/// Desktop icon component
#[derive(Debug, Default)]
pub struct DesktopFiles {
    files: Vec<Sprite>,
    folders: Vec<Sprite>,
    family: UiFamily,
    file_count: Option<usize>,
}

impl DesktopFiles {
    /// Desktop files with the mac icon set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Desktop files with the icon set of `family`
    #[must_use]
    pub fn for_family(family: UiFamily) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    /// Fix the number of icons placed
    #[must_use]
    pub fn with_file_count(mut self, count: usize) -> Self {
        self.file_count = Some(count);
        self
    }

    fn file_name(rng: &mut SceneRng, is_folder: bool) -> String {
        let mut name = rng.pick(&FILE_NAMES).copied().unwrap_or("Untitled").to_string();
        if !is_folder {
            name.push_str(rng.pick(&FILE_EXTENSIONS).copied().unwrap_or(".txt"));
        }
        name
    }
}

#[async_trait]
impl Component for DesktopFiles {
    fn name(&self) -> &'static str {
        "desktop_files"
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Option<DrawOp>, ContextError> {
        let screen = *ctx.screen(self.name())?;
        let count = self
            .file_count
            .unwrap_or_else(|| rng.int_between(MIN_FILE_COUNT, MAX_FILE_COUNT));

        let mut icons = Vec::with_capacity(count);
        for _ in 0..count {
            let is_folder = rng.chance(FOLDER_PROBABILITY);
            let set = if is_folder { &self.folders } else { &self.files };
            // No icons of this kind were loaded
            let Some(sprite) = rng.pick(set).cloned() else {
                continue;
            };

            let x = rng.between(0.0, screen.size.width);
            let y = rng.between(0.0, screen.size.height);
            let icon_width = FILE_ICON_HEIGHT / f64::from(sprite.height().max(1)) * f64::from(sprite.width());
            let icon = Rect::new(x, y, icon_width, FILE_ICON_HEIGHT);

            let label = Self::file_name(rng, is_folder);
            let text_width = Surface::text_width(&label, LABEL_SCALE);
            let text_height = Surface::text_height(LABEL_SCALE);
            let full_width = icon_width.max(text_width);
            let bounds = Rect::new(
                x + (icon_width - full_width) / 2.0,
                y,
                full_width,
                FILE_ICON_HEIGHT + LABEL_GAP + text_height,
            );

            let highlight = match rng.int_between(0, 3) {
                1 => Highlight::Active,
                2 => Highlight::Inactive,
                _ => Highlight::None,
            };

            ctx.annotate(layers::FILE, UiClass::File, bounds);
            icons.push(DesktopIcon {
                sprite,
                icon,
                bounds,
                label,
                highlight,
            });
        }

        Ok(Some(DrawOp::new(layers::FILE, self.name(), DesktopFilesPaint { icons })))
    }

    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        let root = self.family.asset_root();
        let files_category = format!("{root}/fileicons/files");
        let folders_category = format!("{root}/fileicons/folders");
        let (files, folders) = futures::join!(
            load_category(provider, &files_category),
            load_category(provider, &folders_category),
        );
        if files.is_empty() && folders.is_empty() {
            tracing::warn!(family = root, "No file icons available, desktop will have no files");
        }
        self.files = files;
        self.folders = folders;
    }
}

#[derive(Debug)]
struct DesktopIcon {
    sprite: Sprite,
    icon: Rect,
    bounds: Rect,
    label: String,
    highlight: Highlight,
}

#[derive(Debug)]
struct DesktopFilesPaint {
    icons: Vec<DesktopIcon>,
}

impl Paint for DesktopFilesPaint {
    fn paint(&self, surface: &mut Surface) {
        for file in &self.icons {
            surface.blit(&file.sprite, &file.icon);

            let text_width = Surface::text_width(&file.label, LABEL_SCALE);
            let text = Point::new(
                file.bounds.x + (file.bounds.width - text_width) / 2.0,
                file.icon.bottom() + LABEL_GAP,
            );
            let caption = Rect::new(
                text.x - 2.0,
                text.y - 1.0,
                text_width + 4.0,
                Surface::text_height(LABEL_SCALE) + 2.0,
            );

            let label_color = match file.highlight {
                Highlight::None => FILE_LABEL,
                Highlight::Active => {
                    surface.stroke_rect(&file.icon.inset(-2.0), SELECTION_BORDER, 2);
                    surface.fill_rect(&caption, ACTIVE_SELECTION);
                    FILE_LABEL
                }
                Highlight::Inactive => {
                    surface.stroke_rect(&file.icon.inset(-2.0), SELECTION_BORDER, 2);
                    surface.fill_rect(&caption, INACTIVE_SELECTION);
                    INACTIVE_LABEL
                }
            };
            surface.draw_text(&file.label, text, label_color, LABEL_SCALE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ProceduralProvider;
    use crate::context::ScreenSection;
    use crate::geometry::Size;
    use crate::raster::Appearance;

    fn context() -> LayoutContext {
        let mut ctx = LayoutContext::new();
        ctx.screen = Some(ScreenSection {
            size: Size::new(1280.0, 720.0),
            appearance: Appearance::Dark,
            family: UiFamily::Mac,
        });
        ctx
    }

    #[test]
    fn test_no_icons_means_no_files() {
        let mut ctx = context();
        let mut rng = SceneRng::seed_from_u64(2);
        DesktopFiles::new()
            .with_file_count(10)
            .layout(&mut ctx, &mut rng)
            .unwrap();
        assert!(ctx.annotations().is_empty());
    }

    #[tokio::test]
    async fn test_file_boxes_cover_icon_and_label() {
        let mut files = DesktopFiles::for_family(UiFamily::Mac).with_file_count(12);
        files.load_resources(&ProceduralProvider::default()).await;

        let mut ctx = context();
        let mut rng = SceneRng::seed_from_u64(9);
        files.layout(&mut ctx, &mut rng).unwrap();

        assert_eq!(ctx.annotations().len(), 12);
        for annotation in ctx.annotations() {
            assert_eq!(annotation.class, UiClass::File);
            assert_eq!(annotation.layer, layers::FILE);
            assert_eq!(annotation.rect.height, FILE_ICON_HEIGHT + LABEL_GAP + 8.0);
        }
    }
}
