//! Desktop Skins
//!
//! Flat-shaded components that populate a scene. Each one follows the same
//! contract: read ancestor sections from the context, make its random
//! choices, write its own section, append its annotations and return a
//! [`DrawOp`](crate::component::DrawOp) holding a plain paint struct.
//!
//! # Module Overview
//!
//! - [`dock`]: mac dock with app icons
//! - [`menubar`]: mac menu bar
//! - [`taskbar`]: windows taskbar
//! - [`desktop_files`]: file and folder icons on the desktop
//! - [`notification`]: notification toast
//! - [`window`]: application windows (chrome + content, variant registry)

pub mod desktop_files;
pub mod dock;
pub mod menubar;
pub mod notification;
pub mod taskbar;
pub mod window;

pub use desktop_files::DesktopFiles;
pub use dock::Dock;
pub use menubar::MenuBar;
pub use notification::Notification;
pub use taskbar::Taskbar;
pub use window::{AppVariant, ApplicationWindow, RandomApplication};

use crate::assets::Sprite;
use crate::geometry::Rect;
use crate::raster::{rgba, Color, Surface};

/// Fill colors for icons drawn without a sprite
const PLACEHOLDER_COLORS: [Color; 6] = [
    rgba(231, 76, 60, 255),
    rgba(52, 152, 219, 255),
    rgba(46, 204, 113, 255),
    rgba(155, 89, 182, 255),
    rgba(241, 196, 15, 255),
    rgba(26, 188, 156, 255),
];

/// Filler sentences for notifications and text documents
pub(crate) const LOREM: [&str; 6] = [
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor.",
    "Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip.",
    "Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore.",
    "Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt.",
    "Sed ut perspiciatis unde omnis iste natus error sit voluptatem accusantium.",
    "Nemo enim ipsam voluptatem quia voluptas sit aspernatur aut odit aut fugit.",
];

/// Largest rectangle with the sprite's aspect ratio centered in `cell`
#[must_use]
pub(crate) fn fit_in(sprite: Option<&Sprite>, cell: &Rect) -> Rect {
    let Some(sprite) = sprite else {
        return *cell;
    };
    let (w, h) = (f64::from(sprite.width()), f64::from(sprite.height()));
    if w <= 0.0 || h <= 0.0 || cell.is_degenerate() {
        return *cell;
    }
    let scale = (cell.width / w).min(cell.height / h);
    let (fit_w, fit_h) = (w * scale, h * scale);
    Rect::new(
        cell.x + (cell.width - fit_w) / 2.0,
        cell.y + (cell.height - fit_h) / 2.0,
        fit_w,
        fit_h,
    )
}

/// Draw a sprite, or a flat placeholder tile when there is none
pub(crate) fn paint_icon(surface: &mut Surface, sprite: Option<&Sprite>, rect: &Rect, index: usize) {
    match sprite {
        Some(sprite) => surface.blit(sprite, rect),
        None => surface.fill_rect(rect, PLACEHOLDER_COLORS[index % PLACEHOLDER_COLORS.len()]),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::RgbaImage;

    use super::*;

    #[test]
    fn test_fit_in_keeps_aspect_ratio() {
        let sprite: Sprite = Arc::new(RgbaImage::new(200, 100));
        let fitted = fit_in(Some(&sprite), &Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(fitted, Rect::new(0.0, 12.5, 50.0, 25.0));
        assert_eq!(fit_in(None, &Rect::new(1.0, 1.0, 5.0, 5.0)), Rect::new(1.0, 1.0, 5.0, 5.0));
    }
}
