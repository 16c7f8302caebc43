//! Mac Menu Bar
//!
//! Full-width strip at the top of the screen: an app menu on the left and a
//! random set of status items plus a clock on the right.

use crate::annotation::{layers, UiClass};
use crate::component::{Component, DrawOp, Paint};
use crate::context::{ContextError, LayoutContext, MenuBarSection};
use crate::geometry::{Point, Rect};
use crate::random::SceneRng;
use crate::raster::{Palette, Surface};

/// Menu bar height in pixels
pub const MENU_BAR_HEIGHT: f64 = 24.0;

const MENU_PADDING: f64 = 20.0;
const STATUS_ITEM_SIZE: f64 = MENU_BAR_HEIGHT - 8.0;
const STATUS_ITEM_PADDING: f64 = 10.0;
const STATUS_ITEM_PROBABILITY: f64 = 0.75;
const MAX_STATUS_ITEMS: usize = 7;

const APP_NAMES: [&str; 8] = [
    "Finder", "Safari", "Notes", "Mail", "Preview", "Music", "Terminal", "Calendar",
];
const MENUS: [&str; 7] = ["File", "Edit", "View", "Go", "Window", "Format", "Help"];
const CLOCKS: [&str; 6] = [
    "Mon 09:41",
    "Tue 13:05",
    "Wed 18:22",
    "Thu 07:58",
    "Fri 23:14",
    "Sat 11:30",
];

/// Mac menu bar component
#[derive(Debug, Default)]
pub struct MenuBar;

impl MenuBar {
    /// New menu bar
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Component for MenuBar {
    fn name(&self) -> &'static str {
        "menubar"
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Option<DrawOp>, ContextError> {
        let screen = *ctx.screen(self.name())?;
        let bounds = Rect::new(0.0, 0.0, screen.size.width, MENU_BAR_HEIGHT);

        let app = rng.pick(&APP_NAMES).copied().unwrap_or("Finder");
        let menu_count = rng.int_between(3, MENUS.len() + 1);
        let mut items = vec![app.to_string()];
        items.extend(MENUS[..menu_count].iter().map(|m| (*m).to_string()));

        let status_items = (0..MAX_STATUS_ITEMS)
            .filter(|_| rng.chance(STATUS_ITEM_PROBABILITY))
            .count();
        let clock = rng
            .chance(STATUS_ITEM_PROBABILITY)
            .then(|| rng.pick(&CLOCKS).copied().unwrap_or(CLOCKS[0]).to_string());

        ctx.menu_bar = Some(MenuBarSection { bounds });
        ctx.annotate(layers::MENU_BAR, UiClass::MenuBar, bounds);

        Ok(Some(DrawOp::new(
            layers::MENU_BAR,
            self.name(),
            MenuBarPaint {
                bounds,
                items,
                status_items,
                clock,
                palette: screen.appearance.palette(),
            },
        )))
    }
}

#[derive(Debug)]
struct MenuBarPaint {
    bounds: Rect,
    items: Vec<String>,
    status_items: usize,
    clock: Option<String>,
    palette: Palette,
}

impl Paint for MenuBarPaint {
    #[allow(clippy::cast_precision_loss)]
    fn paint(&self, surface: &mut Surface) {
        surface.fill_rect(&self.bounds, self.palette.panel);

        let text_y = self.bounds.y + (self.bounds.height - Surface::text_height(1)) / 2.0;
        let center_y = self.bounds.y + self.bounds.height / 2.0;

        // Logo, then the menus
        surface.fill_disc(
            Point::new(self.bounds.x + MENU_PADDING, center_y),
            STATUS_ITEM_SIZE / 3.0,
            self.palette.text,
        );
        let mut x = self.bounds.x + 2.0 * MENU_PADDING;
        for item in &self.items {
            surface.draw_text(item, Point::new(x, text_y), self.palette.text, 1);
            x += Surface::text_width(item, 1) + MENU_PADDING;
        }

        let mut right = self.bounds.right() - STATUS_ITEM_PADDING;
        if let Some(clock) = &self.clock {
            right -= Surface::text_width(clock, 1);
            surface.draw_text(clock, Point::new(right, text_y), self.palette.text, 1);
            right -= STATUS_ITEM_PADDING;
        }
        for _ in 0..self.status_items {
            right -= STATUS_ITEM_SIZE;
            surface.stroke_rect(
                &Rect::new(right, self.bounds.y + 4.0, STATUS_ITEM_SIZE, STATUS_ITEM_SIZE),
                self.palette.text,
                1,
            );
            right -= STATUS_ITEM_PADDING;
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

    #[test]
    fn test_menu_bar_spans_top_edge() {
        let mut ctx = LayoutContext::new();
        ctx.screen = Some(ScreenSection {
            size: Size::new(1440.0, 900.0),
            appearance: Appearance::Dark,
            family: UiFamily::Mac,
        });
        let mut rng = SceneRng::seed_from_u64(4);

        let op = MenuBar::new().layout(&mut ctx, &mut rng).unwrap().unwrap();

        assert_eq!(op.layer, layers::MENU_BAR);
        assert_eq!(ctx.menu_bar.unwrap().bounds, Rect::new(0.0, 0.0, 1440.0, 24.0));
        assert_eq!(ctx.annotations()[0].class, UiClass::MenuBar);

        let mut surface = Surface::new(1440, 900);
        op.paint.paint(&mut surface);
    }
}
