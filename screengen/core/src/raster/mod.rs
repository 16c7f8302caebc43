//! Raster Surface
//!
//! A thin drawing layer over [`image::RgbaImage`]. All primitives take canvas
//! coordinates in `f64`, round to whole pixels, clip silently at the image
//! border and alpha-blend onto what is already there. Text uses the 8x8
//! bitmap glyphs from `font8x8`.
//!
//! # Module Overview
//!
//! - [`theme`]: appearance palettes and shared colors

pub mod theme;

use std::io::Cursor;

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};

use crate::geometry::{Point, Rect, Size};

pub use theme::{rgba, Appearance, Color, Palette};

/// Width and height of one glyph cell at scale 1
pub const GLYPH_SIZE: u32 = 8;

/// Drawing target for one generated image
#[derive(Clone, Debug)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Opaque black surface of the given pixel size
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, rgba(0, 0, 0, 255)),
        }
    }

    /// Wrap an existing image
    #[must_use]
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Canvas size
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Underlying pixels
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take the underlying pixels
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Fill a rectangle, blending with the existing pixels
    pub fn fill_rect(&mut self, rect: &Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    /// Outline a rectangle with lines `thickness` pixels wide, drawn inward
    pub fn stroke_rect(&mut self, rect: &Rect, color: Color, thickness: u32) {
        let t = f64::from(thickness.max(1));
        if rect.is_degenerate() {
            return;
        }
        let t_h = t.min(rect.height);
        let t_w = t.min(rect.width);
        self.fill_rect(&Rect::new(rect.x, rect.y, rect.width, t_h), color);
        self.fill_rect(
            &Rect::new(rect.x, rect.bottom() - t_h, rect.width, t_h),
            color,
        );
        self.fill_rect(&Rect::new(rect.x, rect.y + t_h, t_w, rect.height - 2.0 * t_h), color);
        self.fill_rect(
            &Rect::new(rect.right() - t_w, rect.y + t_h, t_w, rect.height - 2.0 * t_h),
            color,
        );
    }

    /// Fill a disc
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fill_disc(&mut self, center: Point, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let bounds = Rect::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        );
        let Some((x0, y0, x1, y1)) = self.pixel_span(&bounds) else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = f64::from(x) + 0.5 - center.x;
                let dy = f64::from(y) + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Draw a sprite scaled to `dest`, honoring the sprite's alpha
    pub fn blit(&mut self, sprite: &RgbaImage, dest: &Rect) {
        let (left, top, right, bottom) = dest.pixel_edges();
        let (Ok(width), Ok(height)) = (u32::try_from(right - left), u32::try_from(bottom - top))
        else {
            return;
        };
        if width == 0 || height == 0 || sprite.width() == 0 || sprite.height() == 0 {
            return;
        }

        let scaled = if sprite.dimensions() == (width, height) {
            sprite.clone()
        } else {
            imageops::resize(sprite, width, height, FilterType::Triangle)
        };
        self.composite(&scaled, left, top);
    }

    /// Fill `dest` with the sprite, scaled to cover and center-cropped
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn blit_cover(&mut self, sprite: &RgbaImage, dest: &Rect) {
        if dest.is_degenerate() || sprite.width() == 0 || sprite.height() == 0 {
            return;
        }
        let source_w = f64::from(sprite.width());
        let source_h = f64::from(sprite.height());
        let scale = (dest.width / source_w).max(dest.height / source_h);

        let crop_w = (dest.width / scale).round().clamp(1.0, source_w) as u32;
        let crop_h = (dest.height / scale).round().clamp(1.0, source_h) as u32;
        let crop_x = (sprite.width() - crop_w) / 2;
        let crop_y = (sprite.height() - crop_h) / 2;

        let cropped = imageops::crop_imm(sprite, crop_x, crop_y, crop_w, crop_h).to_image();
        self.blit(&cropped, dest);
    }

    /// Draw single-line text with its top-left corner at `origin`
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn draw_text(&mut self, text: &str, origin: Point, color: Color, scale: u32) {
        let scale = i64::from(scale.max(1));
        let cell = i64::from(GLYPH_SIZE) * scale;
        let (mut cursor_x, top) = (origin.x.round() as i64, origin.y.round() as i64);

        for ch in text.chars() {
            let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
                cursor_x += cell;
                continue;
            };
            for (row_index, row) in glyph.iter().enumerate() {
                for col in 0..8_i64 {
                    if (row >> col) & 1 == 0 {
                        continue;
                    }
                    let px = cursor_x + col * scale;
                    let py = top + row_index as i64 * scale;
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.blend_checked(px + sx, py + sy, color);
                        }
                    }
                }
            }
            cursor_x += cell;
        }
    }

    /// Width in pixels of `text` drawn at `scale`
    #[must_use]
    pub fn text_width(text: &str, scale: u32) -> f64 {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        f64::from(chars.saturating_mul(GLYPH_SIZE * scale.max(1)))
    }

    /// Height in pixels of a line of text drawn at `scale`
    #[must_use]
    pub fn text_height(scale: u32) -> f64 {
        f64::from(GLYPH_SIZE * scale.max(1))
    }

    /// Square copy of `side` x `side` pixels (triangle filter)
    #[must_use]
    pub fn resized(&self, side: u32) -> RgbaImage {
        imageops::resize(&self.image, side, side, FilterType::Triangle)
    }

    /// PNG encoding of the current pixels
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        encode_png(&self.image)
    }

    // ------------------------------------------------------------------------
    // Pixel helpers
    // ------------------------------------------------------------------------

    /// Rounded pixel span of `rect` clipped to the image, as half-open bounds
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn pixel_span(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        if rect.is_degenerate() {
            return None;
        }
        let (left, top, right, bottom) = rect.pixel_edges();
        let x0 = left.clamp(0, i64::from(self.width())) as u32;
        let y0 = top.clamp(0, i64::from(self.height())) as u32;
        let x1 = right.clamp(0, i64::from(self.width())) as u32;
        let y1 = bottom.clamp(0, i64::from(self.height())) as u32;
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let dst = *self.image.get_pixel(x, y);
        self.image.put_pixel(x, y, blend_pixel(dst, color));
    }

    fn blend_checked(&mut self, x: i64, y: i64, color: Color) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            if x < self.width() && y < self.height() {
                self.blend(x, y, color);
            }
        }
    }

    fn composite(&mut self, sprite: &RgbaImage, left: i64, top: i64) {
        for (sx, sy, pixel) in sprite.enumerate_pixels() {
            self.blend_checked(left + i64::from(sx), top + i64::from(sy), *pixel);
        }
    }
}

/// PNG encoding of an image
///
/// # Errors
///
/// Propagates encoder failures.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Source-over blend of `src` onto `dst`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_pixel(dst: Color, src: Color) -> Color {
    let a = f64::from(src[3]) / 255.0;
    if a <= 0.0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    let inv = 1.0 - a;
    let mix = |d: u8, s: u8| (f64::from(d) * inv + f64::from(s) * a).round().clamp(0.0, 255.0) as u8;
    let out_a = (f64::from(src[3]) + f64::from(dst[3]) * inv)
        .round()
        .clamp(0.0, 255.0) as u8;
    rgba(mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), out_a)
}
