//! Window Chrome
//!
//! Family-specific window decoration: title bar height, where the window may
//! be placed, which bars it has to avoid when maximized, and how the frame
//! and its control buttons are drawn.

use std::fmt::Debug;
use std::sync::Arc;

use crate::context::{ContextError, LayoutContext};
use crate::geometry::{Point, Rect};
use crate::layout::{Insets, TopLimit};
use crate::raster::theme::{CLOSE_RED, MAXIMIZE_GREEN, MINIMIZE_YELLOW, SHADOW};
use crate::raster::{Palette, Surface};
use crate::scene::UiFamily;

const SHADOW_WIDTH: f64 = 6.0;

/// Everything the chrome needs to draw one window frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Whole window
    pub bounds: Rect,
    /// Focused window
    pub active: bool,
    /// Colors for the window's appearance
    pub palette: Palette,
    /// Whether a title bar is drawn (screenshot windows bring their own)
    pub title_bar: bool,
}

/// Decoration and placement rules of one UI family
pub trait WindowChrome: Send + Sync + Debug {
    /// Family this chrome belongs to
    fn family(&self) -> UiFamily;

    /// Title bar height
    fn handle_height(&self) -> f64;

    /// How far a floating window may reach above the screen
    fn top_limit(&self) -> TopLimit;

    /// Space a maximized window must leave to the family's bars
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingSection`] when a bar this family
    /// always has was not laid out by an ancestor.
    fn reserved_space(
        &self,
        ctx: &LayoutContext,
        requested_by: &'static str,
    ) -> Result<Insets, ContextError>;

    /// Part of the title bar not taken by the window controls
    fn title_area(&self, bounds: &Rect) -> Rect;

    /// Draw shadow, title bar and controls
    fn paint_frame(&self, surface: &mut Surface, frame: &Frame);
}

/// Chrome for `family`
#[must_use]
pub fn chrome_for(family: UiFamily) -> Arc<dyn WindowChrome> {
    match family {
        UiFamily::Mac => Arc::new(MacChrome),
        UiFamily::Windows => Arc::new(WinChrome),
    }
}

fn paint_shadow(surface: &mut Surface, bounds: &Rect) {
    surface.fill_rect(&bounds.inset(-SHADOW_WIDTH).translate(0.0, SHADOW_WIDTH / 2.0), SHADOW);
}

// ============================================================================
// Mac
// ============================================================================

const MAC_HANDLE_HEIGHT: f64 = 30.0;
const MAC_BUTTON_RADIUS: f64 = 7.0;
const MAC_CONTROLS_LEFT: f64 = 20.0;

/// Traffic-light chrome, windows stay below the menu bar
#[derive(Clone, Copy, Debug, Default)]
pub struct MacChrome;

impl WindowChrome for MacChrome {
    fn family(&self) -> UiFamily {
        UiFamily::Mac
    }

    fn handle_height(&self) -> f64 {
        MAC_HANDLE_HEIGHT
    }

    fn top_limit(&self) -> TopLimit {
        TopLimit::Reserved
    }

    fn reserved_space(
        &self,
        ctx: &LayoutContext,
        requested_by: &'static str,
    ) -> Result<Insets, ContextError> {
        ctx.menu_bar(requested_by)?;
        ctx.dock(requested_by)?;
        Ok(Insets::from_context(ctx))
    }

    fn title_area(&self, bounds: &Rect) -> Rect {
        // Three buttons spaced 3 radii apart, plus a gap
        let controls = MAC_CONTROLS_LEFT + 9.0 * MAC_BUTTON_RADIUS + 10.0;
        Rect::new(
            bounds.x + controls,
            bounds.y,
            bounds.width - controls,
            MAC_HANDLE_HEIGHT,
        )
    }

    fn paint_frame(&self, surface: &mut Surface, frame: &Frame) {
        paint_shadow(surface, &frame.bounds);
        if !frame.title_bar {
            return;
        }

        let bar = Rect::new(
            frame.bounds.x,
            frame.bounds.y,
            frame.bounds.width,
            MAC_HANDLE_HEIGHT.min(frame.bounds.height),
        );
        let fill = if frame.active {
            frame.palette.handle
        } else {
            frame.palette.handle_inactive
        };
        surface.fill_rect(&bar, fill);

        let center_y = bar.y + MAC_HANDLE_HEIGHT / 2.0;
        let mut x = bar.x + MAC_CONTROLS_LEFT;
        for color in [CLOSE_RED, MINIMIZE_YELLOW, MAXIMIZE_GREEN] {
            let color = if frame.active { color } else { frame.palette.frame };
            surface.fill_disc(Point::new(x, center_y), MAC_BUTTON_RADIUS, color);
            x += 3.0 * MAC_BUTTON_RADIUS;
        }
    }
}

// ============================================================================
// Windows
// ============================================================================

const WIN_HANDLE_HEIGHT: f64 = 34.0;
const WIN_BUTTON_WIDTH: f64 = 40.0;
const WIN_GLYPH: f64 = 10.0;

/// Caption-button chrome, windows may hang off the top edge
#[derive(Clone, Copy, Debug, Default)]
pub struct WinChrome;

impl WindowChrome for WinChrome {
    fn family(&self) -> UiFamily {
        UiFamily::Windows
    }

    fn handle_height(&self) -> f64 {
        WIN_HANDLE_HEIGHT
    }

    fn top_limit(&self) -> TopLimit {
        TopLimit::Offscreen
    }

    fn reserved_space(
        &self,
        ctx: &LayoutContext,
        requested_by: &'static str,
    ) -> Result<Insets, ContextError> {
        ctx.taskbar(requested_by)?;
        Ok(Insets::from_context(ctx))
    }

    fn title_area(&self, bounds: &Rect) -> Rect {
        Rect::new(
            bounds.x,
            bounds.y,
            bounds.width - 3.0 * WIN_BUTTON_WIDTH,
            WIN_HANDLE_HEIGHT,
        )
    }

    fn paint_frame(&self, surface: &mut Surface, frame: &Frame) {
        paint_shadow(surface, &frame.bounds);
        if !frame.title_bar {
            return;
        }

        let bar = Rect::new(
            frame.bounds.x,
            frame.bounds.y,
            frame.bounds.width,
            WIN_HANDLE_HEIGHT.min(frame.bounds.height),
        );
        let fill = if frame.active {
            frame.palette.handle
        } else {
            frame.palette.handle_inactive
        };
        surface.fill_rect(&bar, fill);

        // Minimize, maximize, close from left to right
        let glyph = frame.palette.text;
        let center_y = bar.y + WIN_HANDLE_HEIGHT / 2.0;
        let first = bar.right() - 3.0 * WIN_BUTTON_WIDTH + (WIN_BUTTON_WIDTH - WIN_GLYPH) / 2.0;

        surface.fill_rect(&Rect::new(first, center_y, WIN_GLYPH, 1.0), glyph);

        let maximize = Rect::new(first + WIN_BUTTON_WIDTH, center_y - WIN_GLYPH / 2.0, WIN_GLYPH, WIN_GLYPH);
        surface.stroke_rect(&maximize, glyph, 1);

        let close = first + 2.0 * WIN_BUTTON_WIDTH;
        for step in 0..10 {
            let offset = f64::from(step);
            let top = center_y - WIN_GLYPH / 2.0;
            surface.fill_rect(&Rect::new(close + offset, top + offset, 1.0, 1.0), glyph);
            surface.fill_rect(&Rect::new(close + WIN_GLYPH - 1.0 - offset, top + offset, 1.0, 1.0), glyph);
        }
    }
}
