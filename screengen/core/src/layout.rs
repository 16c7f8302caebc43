//! Randomized Layout Generators
//!
//! Geometry decisions shared by the skins: where the application window goes,
//! how long a docked bar of icons can be, and which strip of the screen a
//! full-edge bar occupies. All randomness comes from the injected
//! [`SceneRng`].

use crate::context::LayoutContext;
use crate::geometry::{Edge, Rect, Size};
use crate::random::SceneRng;

/// Smallest floating window side
pub const MIN_WINDOW_SIZE: f64 = 100.0;

/// Largest share of a floating window's own size that may hang off-canvas
pub const MAX_OFFSCREEN_FRACTION: f64 = 0.25;

/// Chance that the application window is maximized
pub const DEFAULT_FULLSCREEN_PROBABILITY: f64 = 0.5;

/// Thickness of a bar on the top or bottom edge (windows taskbar)
pub const EDGE_BAR_HEIGHT: f64 = 40.0;

/// Thickness of a bar on the left or right edge (windows taskbar)
pub const EDGE_BAR_WIDTH: f64 = 80.0;

// ============================================================================
// Reserved Space
// ============================================================================

/// Space along each screen edge claimed by docked bars
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    /// Reserved width on the left
    pub left: f64,
    /// Reserved width on the right
    pub right: f64,
    /// Reserved height at the top
    pub top: f64,
    /// Reserved height at the bottom
    pub bottom: f64,
}

impl Insets {
    /// Reserve the thickness of a bar docked to `edge`
    ///
    /// Left/right bars reserve their width, top/bottom bars their height.
    pub fn reserve(&mut self, edge: Edge, bar: &Rect) {
        match edge {
            Edge::Left => self.left = self.left.max(bar.width),
            Edge::Right => self.right = self.right.max(bar.width),
            Edge::Top => self.top = self.top.max(bar.height),
            Edge::Bottom => self.bottom = self.bottom.max(bar.height),
        }
    }

    /// Space reserved by whatever bars the context currently holds
    #[must_use]
    pub fn from_context(ctx: &LayoutContext) -> Self {
        let mut insets = Self::default();
        if let Some(menu_bar) = &ctx.menu_bar {
            insets.reserve(Edge::Top, &menu_bar.bounds);
        }
        if let Some(dock) = &ctx.dock {
            insets.reserve(dock.orientation, &dock.bounds);
        }
        if let Some(taskbar) = &ctx.taskbar {
            insets.reserve(taskbar.orientation, &taskbar.bounds);
        }
        insets
    }

    /// Screen area left free by the reserved space
    #[must_use]
    pub fn free_area(&self, screen: Size) -> Rect {
        Rect::from_edges(
            self.left,
            self.top,
            screen.width - self.right,
            screen.height - self.bottom,
        )
    }
}

// ============================================================================
// Window Placement
// ============================================================================

/// How far a floating window may reach above the screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopLimit {
    /// Never above the reserved top space (mac: below the menu bar)
    Reserved,
    /// Up to [`MAX_OFFSCREEN_FRACTION`] of the window height off the top
    Offscreen,
}

/// Window placement parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRules {
    /// Chance of a maximized window
    pub fullscreen_probability: f64,
    /// Smallest floating width and height
    pub min_size: f64,
    /// Upper bound of floating window positions
    pub top_limit: TopLimit,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            fullscreen_probability: DEFAULT_FULLSCREEN_PROBABILITY,
            min_size: MIN_WINDOW_SIZE,
            top_limit: TopLimit::Reserved,
        }
    }
}

/// Result of [`place_window`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowPlacement {
    /// Window bounds, possibly partly off-canvas
    pub bounds: Rect,
    /// Whether the window fills the free area
    pub fullscreen: bool,
}

/// Choose the application window rectangle
///
/// Maximized windows fill the area not reserved by docked bars. Floating
/// windows get a uniform size in `[min_size, screen]` and a uniform position
/// that lets at most [`MAX_OFFSCREEN_FRACTION`] of the window hang off the
/// left, right or bottom edge.
pub fn place_window(
    rng: &mut SceneRng,
    screen: Size,
    reserved: Insets,
    rules: &PlacementRules,
) -> WindowPlacement {
    if rng.chance(rules.fullscreen_probability) {
        return WindowPlacement {
            bounds: reserved.free_area(screen),
            fullscreen: true,
        };
    }

    let width = rng.between(rules.min_size.min(screen.width), screen.width);
    let height = rng.between(rules.min_size.min(screen.height), screen.height);

    let min_x = -MAX_OFFSCREEN_FRACTION * width;
    let max_x = screen.width - (1.0 - MAX_OFFSCREEN_FRACTION) * width;
    let min_y = match rules.top_limit {
        TopLimit::Reserved => reserved.top,
        TopLimit::Offscreen => -MAX_OFFSCREEN_FRACTION * height,
    };
    let max_y = screen.height - (1.0 - MAX_OFFSCREEN_FRACTION) * height;

    let x = rng.between(min_x, max_x);
    let y = rng.between(min_y, max_y);

    WindowPlacement {
        bounds: Rect::new(x, y, width, height),
        fullscreen: false,
    }
}

// ============================================================================
// Bars
// ============================================================================

/// Long-axis sizing of a bar of equally sized items
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearBar {
    /// Length along the long axis
    pub length: f64,
    /// Size of one item after shrinking
    pub item_size: f64,
    /// Whether the bar hit the cap and items were shrunk
    pub capped: bool,
}

/// Fit `item_count` items of `item_size` into `available - margin`
///
/// When the natural length exceeds the cap, the length becomes the cap and the
/// item size shrinks to `min(item_size, cap / item_count)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn size_linear_bar(item_count: usize, item_size: f64, available: f64, margin: f64) -> LinearBar {
    let count = item_count.max(1) as f64;
    let natural = count * item_size;
    let cap = (available - margin).max(0.0);

    if natural > cap {
        LinearBar {
            length: cap,
            item_size: item_size.min(cap / count),
            capped: true,
        }
    } else {
        LinearBar {
            length: natural,
            item_size,
            capped: false,
        }
    }
}

/// Full-edge bar rectangle with the default taskbar thickness
#[must_use]
pub fn edge_bar(screen: Size, edge: Edge) -> Rect {
    edge_bar_with(screen, edge, EDGE_BAR_WIDTH, EDGE_BAR_HEIGHT)
}

/// Full-edge bar rectangle: `vertical` wide on the sides, `horizontal` high
/// on the top or bottom
#[must_use]
pub fn edge_bar_with(screen: Size, edge: Edge, vertical: f64, horizontal: f64) -> Rect {
    match edge {
        Edge::Left => Rect::new(0.0, 0.0, vertical, screen.height),
        Edge::Right => Rect::new(screen.width - vertical, 0.0, vertical, screen.height),
        Edge::Top => Rect::new(0.0, 0.0, screen.width, horizontal),
        Edge::Bottom => Rect::new(0.0, screen.height - horizontal, screen.width, horizontal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DockSection, MenuBarSection};

    const SCREEN: Size = Size::new(1920.0, 1080.0);

    #[test]
    fn test_fullscreen_respects_reserved_space() {
        let mut ctx = LayoutContext::new();
        ctx.menu_bar = Some(MenuBarSection {
            bounds: Rect::new(0.0, 0.0, 1920.0, 24.0),
        });
        ctx.dock = Some(DockSection {
            bounds: Rect::new(0.0, 300.0, 70.0, 480.0),
            orientation: Edge::Left,
            item_size: 70.0,
        });
        let rules = PlacementRules {
            fullscreen_probability: 1.0,
            ..PlacementRules::default()
        };

        let mut rng = SceneRng::seed_from_u64(1);
        let placement = place_window(&mut rng, SCREEN, Insets::from_context(&ctx), &rules);

        assert!(placement.fullscreen);
        assert_eq!(placement.bounds, Rect::new(70.0, 24.0, 1850.0, 1056.0));
    }

    #[test]
    fn test_floating_window_bounds() {
        let rules = PlacementRules {
            fullscreen_probability: 0.0,
            ..PlacementRules::default()
        };
        let reserved = Insets {
            top: 24.0,
            ..Insets::default()
        };
        let mut rng = SceneRng::seed_from_u64(99);

        for _ in 0..500 {
            let placement = place_window(&mut rng, SCREEN, reserved, &rules);
            let b = placement.bounds;
            assert!(!placement.fullscreen);
            assert!(b.width >= MIN_WINDOW_SIZE && b.width <= SCREEN.width);
            assert!(b.height >= MIN_WINDOW_SIZE && b.height <= SCREEN.height);
            assert!(b.x >= -0.25 * b.width - 1e-9);
            assert!(b.right() <= SCREEN.width + 0.25 * b.width + 1e-9);
            assert!(b.bottom() <= SCREEN.height + 0.25 * b.height + 1e-9);
            assert!(b.y >= 24.0);
        }
    }

    #[test]
    fn test_offscreen_top_limit() {
        let rules = PlacementRules {
            fullscreen_probability: 0.0,
            top_limit: TopLimit::Offscreen,
            ..PlacementRules::default()
        };
        let mut rng = SceneRng::seed_from_u64(5);
        let above = (0..500)
            .map(|_| place_window(&mut rng, SCREEN, Insets::default(), &rules).bounds)
            .filter(|b| b.y < 0.0)
            .count();
        assert!(above > 0);
    }

    #[test]
    fn test_linear_bar_uncapped() {
        let bar = size_linear_bar(5, 100.0, 1080.0, 60.0);
        assert_eq!(bar.length, 500.0);
        assert_eq!(bar.item_size, 100.0);
        assert!(!bar.capped);
    }

    #[test]
    fn test_linear_bar_shrinks_items_when_capped() {
        let bar = size_linear_bar(20, 143.0, 1080.0, 60.0);
        assert!(bar.capped);
        assert_eq!(bar.length, 1020.0);
        assert_eq!(bar.item_size, 51.0);
    }

    #[test]
    fn test_edge_bar_rects() {
        let size = Size::new(1000.0, 800.0);
        assert_eq!(edge_bar(size, Edge::Bottom), Rect::new(0.0, 760.0, 1000.0, 40.0));
        assert_eq!(edge_bar(size, Edge::Right), Rect::new(920.0, 0.0, 80.0, 800.0));
        assert_eq!(edge_bar(size, Edge::Top).height, 40.0);
        assert_eq!(edge_bar(size, Edge::Left).width, 80.0);
    }
}
