//! Notification Toast
//!
//! Shown with a small probability. The card slides in from the right edge, so
//! a random share of it is off-screen. On mac it hangs below the menu bar, on
//! windows it sits above the bottom edge.

use crate::annotation::{layers, UiClass};
use crate::component::{Component, DrawOp, Paint};
use crate::context::{ContextError, LayoutContext, NotificationSection};
use crate::geometry::{Point, Rect};
use crate::random::SceneRng;
use crate::raster::{Appearance, Palette, Surface};
use crate::scene::UiFamily;

use super::LOREM;

/// Default probability of showing a notification
pub const DEFAULT_NOTIFICATION_PROBABILITY: f64 = 0.15;

const NOTIFICATION_WIDTH: f64 = 400.0;
const NOTIFICATION_HEIGHT: f64 = 100.0;
const NOTIFICATION_MARGIN: f64 = 20.0;
const TEXT_PADDING: f64 = 10.0;
const BUTTON_WIDTH: f64 = 100.0;
const HEADING_SCALE: u32 = 2;

/// Notification component
#[derive(Debug)]
pub struct Notification {
    probability: f64,
    appearance: Option<Appearance>,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            probability: DEFAULT_NOTIFICATION_PROBABILITY,
            appearance: None,
        }
    }
}

impl Notification {
    /// Notification shown with the default probability in the screen's appearance
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the display probability
    #[must_use]
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Force an appearance regardless of the screen
    #[must_use]
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }
}

impl Component for Notification {
    fn name(&self) -> &'static str {
        "notification"
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Option<DrawOp>, ContextError> {
        let screen = *ctx.screen(self.name())?;
        if !rng.chance(self.probability) {
            return Ok(None);
        }

        let visible = rng.between(0.0, NOTIFICATION_WIDTH + NOTIFICATION_MARGIN);
        let y = match screen.family {
            UiFamily::Mac => {
                let menu_bottom = ctx.menu_bar.map_or(0.0, |menu| menu.bounds.bottom());
                menu_bottom + NOTIFICATION_MARGIN
            }
            UiFamily::Windows => screen.size.height - NOTIFICATION_MARGIN - NOTIFICATION_HEIGHT,
        };
        let bounds = Rect::new(
            screen.size.width - visible,
            y,
            NOTIFICATION_WIDTH,
            NOTIFICATION_HEIGHT,
        );

        let sentence = rng.pick(&LOREM).copied().unwrap_or(LOREM[0]);
        let mut words = sentence.split(' ');
        let heading: Vec<&str> = words.by_ref().take(2).collect();
        let body: Vec<&str> = words.collect();

        ctx.notification = Some(NotificationSection { bounds });
        ctx.annotate(layers::NOTIFICATION, UiClass::Notification, bounds);

        Ok(Some(DrawOp::new(
            layers::NOTIFICATION,
            self.name(),
            NotificationPaint {
                bounds,
                heading: heading.join(" "),
                body: body.join(" "),
                palette: self.appearance.unwrap_or(screen.appearance).palette(),
            },
        )))
    }
}

#[derive(Debug)]
struct NotificationPaint {
    bounds: Rect,
    heading: String,
    body: String,
    palette: Palette,
}

impl Paint for NotificationPaint {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn paint(&self, surface: &mut Surface) {
        surface.fill_rect(&self.bounds, self.palette.card);
        surface.stroke_rect(&self.bounds, self.palette.panel_border, 1);

        let x = self.bounds.x + TEXT_PADDING;
        let mut y = self.bounds.y + TEXT_PADDING;
        surface.draw_text(&self.heading, Point::new(x, y), self.palette.text, HEADING_SCALE);
        y += Surface::text_height(HEADING_SCALE) + TEXT_PADDING;

        // Wrap the body into the space left of the button
        let text_width = NOTIFICATION_WIDTH - BUTTON_WIDTH - 2.0 * TEXT_PADDING;
        let per_line = (text_width / Surface::text_width("m", 1)).floor().max(1.0) as usize;
        let mut line = String::new();
        for word in self.body.split(' ') {
            if !line.is_empty() && line.len() + 1 + word.len() > per_line {
                surface.draw_text(&line, Point::new(x, y), self.palette.text, 1);
                y += Surface::text_height(1) + 4.0;
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            surface.draw_text(&line, Point::new(x, y), self.palette.text, 1);
        }

        // Chevron button
        let arrow_x = self.bounds.right() - 30.0;
        let arrow_y = self.bounds.y + 20.0;
        for step in 0..10 {
            let offset = f64::from(step);
            surface.fill_rect(&Rect::new(arrow_x + offset, arrow_y + offset, 2.0, 2.0), self.palette.text);
            surface.fill_rect(&Rect::new(arrow_x + offset, arrow_y + 20.0 - offset, 2.0, 2.0), self.palette.text);
        }
    }
}
