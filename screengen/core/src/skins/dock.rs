//! Mac Dock
//!
//! A translucent panel of app icons centered on the left, right or bottom
//! edge. The icon cell starts at a random scale of the full-size dock and
//! shrinks when the icons would not fit the edge minus a margin.

use async_trait::async_trait;

use crate::annotation::{layers, UiClass};
use crate::assets::{load_category, ResourceProvider, Sprite};
use crate::component::{Component, DrawOp, Paint};
use crate::context::{ContextError, DockSection, LayoutContext};
use crate::geometry::{Edge, Point, Rect, Size};
use crate::layout::size_linear_bar;
use crate::random::SceneRng;
use crate::raster::{Palette, Surface};

use super::{fit_in, paint_icon};

/// Short side of a full-size dock (128px icon plus spacing)
const FULL_SHORT_SIDE: f64 = 128.0 + 5.0 + 10.0;
/// Free space kept above and below a side dock
const MIN_MARGIN_Y: f64 = 60.0;
/// Free space kept left and right of a bottom dock
const MIN_MARGIN_X: f64 = 150.0;
const MIN_APP_COUNT: usize = 5;
const MAX_APP_COUNT: usize = 20;
const MIN_SCALE: f64 = 0.25;
const MAX_SCALE: f64 = 1.0;
const ICON_MARGIN: f64 = 10.0;
const ACTIVITY_PROBABILITY: f64 = 0.1;
const ACTIVITY_RADIUS: f64 = 3.0;

/// Edges the dock can sit on
pub const DOCK_ORIENTATIONS: [Edge; 3] = [Edge::Left, Edge::Right, Edge::Bottom];

/// Mac dock component
#[derive(Debug, Default)]
pub struct Dock {
    icons: Vec<Sprite>,
    orientation: Option<Edge>,
    app_count: Option<usize>,
}

impl Dock {
    /// Dock with random orientation and app count
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the dock to one edge
    #[must_use]
    pub fn with_orientation(mut self, orientation: Edge) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Fix the number of app icons
    #[must_use]
    pub fn with_app_count(mut self, count: usize) -> Self {
        self.app_count = Some(count.max(1));
        self
    }

    /// Dock panel bounds for `count` icons of `cell` size
    fn panel_bounds(orientation: Edge, cell: f64, count: usize, screen: Size) -> (Rect, f64) {
        let vertical = orientation.is_vertical();
        let (available, margin) = if vertical {
            (screen.height, MIN_MARGIN_Y)
        } else {
            (screen.width, MIN_MARGIN_X)
        };
        let bar = size_linear_bar(count, cell, available, margin);
        let short = bar.item_size;

        let bounds = match orientation {
            Edge::Left => Rect::new(0.0, (screen.height - bar.length) / 2.0, short, bar.length),
            Edge::Right => Rect::new(
                screen.width - short,
                (screen.height - bar.length) / 2.0,
                short,
                bar.length,
            ),
            Edge::Top => Rect::new((screen.width - bar.length) / 2.0, 0.0, bar.length, short),
            Edge::Bottom => Rect::new(
                (screen.width - bar.length) / 2.0,
                screen.height - short,
                bar.length,
                short,
            ),
        };
        (bounds, short)
    }
}

#[async_trait]
impl Component for Dock {
    fn name(&self) -> &'static str {
        "dock"
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
            None => *rng.pick(&DOCK_ORIENTATIONS).unwrap_or(&Edge::Bottom),
        };
        let scale = rng.between(MIN_SCALE, MAX_SCALE);
        let count = self
            .app_count
            .unwrap_or_else(|| rng.int_between(MIN_APP_COUNT, MAX_APP_COUNT));

        let (bounds, cell) = Self::panel_bounds(orientation, FULL_SHORT_SIDE * scale, count, screen.size);

        let long = if orientation.is_vertical() {
            bounds.height
        } else {
            bounds.width
        };
        let step = long / count as f64;
        let icon_side = (step - 2.0 * ICON_MARGIN).max(1.0);
        let sprites = rng.pick_many(&self.icons, count);

        let icons = (0..count)
            .map(|i| {
                let along = i as f64 * step + (step - icon_side) / 2.0;
                let across = (cell - icon_side) / 2.0;
                let slot = if orientation.is_vertical() {
                    Rect::new(bounds.x + across, bounds.y + along, icon_side, icon_side)
                } else {
                    Rect::new(bounds.x + along, bounds.y + across, icon_side, icon_side)
                };
                let center = slot.center();
                let activity = rng.chance(ACTIVITY_PROBABILITY).then(|| match orientation {
                    Edge::Left => Point::new(bounds.x + ICON_MARGIN / 2.0, center.y),
                    Edge::Right => Point::new(bounds.right() - ICON_MARGIN / 2.0, center.y),
                    Edge::Top => Point::new(center.x, bounds.y + ICON_MARGIN / 2.0),
                    Edge::Bottom => Point::new(center.x, bounds.bottom() - ICON_MARGIN / 2.0),
                });
                let sprite = sprites.get(i).cloned();
                DockIcon {
                    rect: fit_in(sprite.as_ref(), &slot),
                    sprite,
                    activity,
                }
            })
            .collect();

        ctx.dock = Some(DockSection {
            bounds,
            orientation,
            item_size: cell,
        });
        ctx.annotate(layers::DOCK, UiClass::Dock, bounds);

        Ok(Some(DrawOp::new(
            layers::DOCK,
            self.name(),
            DockPaint {
                bounds,
                icons,
                palette: screen.appearance.palette(),
            },
        )))
    }

    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        self.icons = load_category(provider, "mac/appicons").await;
        if self.icons.is_empty() {
            tracing::warn!("No mac app icons available, dock will use placeholder tiles");
        }
    }
}

#[derive(Debug)]
struct DockIcon {
    rect: Rect,
    sprite: Option<Sprite>,
    activity: Option<Point>,
}

#[derive(Debug)]
struct DockPaint {
    bounds: Rect,
    icons: Vec<DockIcon>,
    palette: Palette,
}

impl Paint for DockPaint {
    fn paint(&self, surface: &mut Surface) {
        surface.fill_rect(&self.bounds, self.palette.panel);
        surface.stroke_rect(&self.bounds, self.palette.panel_border, 1);

        for (index, icon) in self.icons.iter().enumerate() {
            paint_icon(surface, icon.sprite.as_ref(), &icon.rect, index);
            if let Some(dot) = icon.activity {
                surface.fill_disc(dot, ACTIVITY_RADIUS, self.palette.activity);
            }
        }
    }
}
