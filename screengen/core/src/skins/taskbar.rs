//! Windows Taskbar
//!
//! Fixed-thickness bar along one full screen edge with a start button, an
//! optional search box (horizontal bars only) and a row of pinned app icons.

use async_trait::async_trait;

use crate::annotation::{layers, UiClass};
use crate::assets::{load_category, ResourceProvider, Sprite};
use crate::component::{Component, DrawOp, Paint};
use crate::context::{ContextError, LayoutContext, TaskbarSection};
use crate::geometry::{Edge, Point, Rect};
use crate::layout::edge_bar;
use crate::random::SceneRng;
use crate::raster::theme::ACTIVITY_BLUE;
use crate::raster::{rgba, Color, Surface};

use super::{fit_in, paint_icon};

const SEARCH_BAR_WIDTH: f64 = 350.0;
const SEARCH_BAR_PROBABILITY: f64 = 0.5;
const ICON_SIZE: f64 = 24.0;
const CELL_SIZE: f64 = 50.0;
const ACTIVITY_SIZE: f64 = 3.0;
const MIN_APP_COUNT: usize = 5;
const MAX_APP_COUNT: usize = 8;
const ACTIVITY_PROBABILITY: f64 = 0.1;
const TASKBAR_FILL: Color = rgba(0, 0, 0, 192);
const SEARCH_FILL: Color = rgba(255, 255, 255, 40);
const ICON_TEXT: Color = rgba(230, 230, 230, 255);

/// Windows taskbar component
#[derive(Debug, Default)]
pub struct Taskbar {
    icons: Vec<Sprite>,
    orientation: Option<Edge>,
    app_count: Option<usize>,
}

impl Taskbar {
    /// Taskbar on a random edge with a random app count
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the taskbar to one edge
    #[must_use]
    pub fn with_orientation(mut self, orientation: Edge) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Fix the number of pinned apps
    #[must_use]
    pub fn with_app_count(mut self, count: usize) -> Self {
        self.app_count = Some(count);
        self
    }
}

#[async_trait]
impl Component for Taskbar {
    fn name(&self) -> &'static str {
        "taskbar"
    }

    #[allow(clippy::cast_precision_loss)]
    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Option<DrawOp>, ContextError> {
        let screen = *ctx.screen(self.name())?;
        let orientation = match self.orientation {
            Some(edge) => edge,
            None => *rng.pick(&Edge::ALL).unwrap_or(&Edge::Bottom),
        };
        let count = self
            .app_count
            .unwrap_or_else(|| rng.int_between(MIN_APP_COUNT, MAX_APP_COUNT));
        let bounds = edge_bar(screen.size, orientation);
        let vertical = orientation.is_vertical();

        // Start button occupies the first cell
        let cell = |index: f64| {
            if vertical {
                Rect::new(bounds.x, bounds.y + index * CELL_SIZE, bounds.width, CELL_SIZE)
            } else {
                Rect::new(bounds.x + index * CELL_SIZE, bounds.y, CELL_SIZE, bounds.height)
            }
        };
        let start = cell(0.0);

        let search = (!vertical && rng.chance(SEARCH_BAR_PROBABILITY)).then(|| {
            Rect::new(
                start.right(),
                bounds.y + 4.0,
                SEARCH_BAR_WIDTH,
                bounds.height - 8.0,
            )
        });
        let first_icon_offset = match search {
            Some(search) => (search.right() - bounds.x) / CELL_SIZE,
            None => 1.0,
        };

        let sprites = rng.pick_many(&self.icons, count);
        let icons = (0..count)
            .map(|i| {
                let slot = cell(first_icon_offset + i as f64);
                let center = slot.center();
                let icon_cell = Rect::new(
                    center.x - ICON_SIZE / 2.0,
                    center.y - ICON_SIZE / 2.0,
                    ICON_SIZE,
                    ICON_SIZE,
                );
                let active = rng.chance(ACTIVITY_PROBABILITY);
                let activity = active.then(|| {
                    if vertical {
                        Rect::new(slot.x, slot.y + 8.0, ACTIVITY_SIZE, slot.height - 16.0)
                    } else {
                        Rect::new(slot.x + 8.0, slot.bottom() - ACTIVITY_SIZE, slot.width - 16.0, ACTIVITY_SIZE)
                    }
                });
                let sprite = sprites.get(i).cloned();
                TaskbarIcon {
                    rect: fit_in(sprite.as_ref(), &icon_cell),
                    sprite,
                    activity,
                }
            })
            .filter(|icon| bounds.contains_rect(&icon.rect))
            .collect();

        ctx.taskbar = Some(TaskbarSection {
            bounds,
            orientation,
        });
        ctx.annotate(layers::DOCK, UiClass::TaskBar, bounds);

        Ok(Some(DrawOp::new(
            layers::DOCK,
            self.name(),
            TaskbarPaint {
                bounds,
                start,
                search,
                icons,
            },
        )))
    }

    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        self.icons = load_category(provider, "win/appicons").await;
        if self.icons.is_empty() {
            tracing::warn!("No windows app icons available, taskbar will use placeholder tiles");
        }
    }
}

#[derive(Debug)]
struct TaskbarIcon {
    rect: Rect,
    sprite: Option<Sprite>,
    activity: Option<Rect>,
}

#[derive(Debug)]
struct TaskbarPaint {
    bounds: Rect,
    start: Rect,
    search: Option<Rect>,
    icons: Vec<TaskbarIcon>,
}

impl Paint for TaskbarPaint {
    fn paint(&self, surface: &mut Surface) {
        surface.fill_rect(&self.bounds, TASKBAR_FILL);

        // Four-pane start logo
        let c = self.start.center();
        for (dx, dy) in [(-9.0, -9.0), (1.0, -9.0), (-9.0, 1.0), (1.0, 1.0)] {
            surface.fill_rect(&Rect::new(c.x + dx, c.y + dy, 8.0, 8.0), ICON_TEXT);
        }

        if let Some(search) = &self.search {
            surface.fill_rect(search, SEARCH_FILL);
            surface.draw_text(
                "Type here to search",
                Point::new(search.x + 12.0, search.center().y - 4.0),
                ICON_TEXT,
                1,
            );
        }

        for (index, icon) in self.icons.iter().enumerate() {
            paint_icon(surface, icon.sprite.as_ref(), &icon.rect, index);
            if let Some(activity) = &icon.activity {
                surface.fill_rect(activity, ACTIVITY_BLUE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScreenSection;
    use crate::geometry::Size;
    use crate::raster::Appearance;
    use crate::scene::UiFamily;

    fn context() -> LayoutContext {
        let mut ctx = LayoutContext::new();
        ctx.screen = Some(ScreenSection {
            size: Size::new(1366.0, 768.0),
            appearance: Appearance::Dark,
            family: UiFamily::Windows,
        });
        ctx
    }

    #[test]
    fn test_taskbar_occupies_full_edge() {
        for edge in Edge::ALL {
            let mut ctx = context();
            let mut rng = SceneRng::seed_from_u64(12);
            Taskbar::new()
                .with_orientation(edge)
                .layout(&mut ctx, &mut rng)
                .unwrap();

            let section = ctx.taskbar.unwrap();
            let expected = edge_bar(Size::new(1366.0, 768.0), edge);
            assert_eq!(section.bounds, expected);
            assert_eq!(ctx.annotations()[0].class, UiClass::TaskBar);
            assert_eq!(ctx.annotations()[0].layer, layers::DOCK);
        }
    }
}
