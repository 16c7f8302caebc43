//! Browser Content
//!
//! Tabs in the title bar, a navigation bar below it, an optional favorites
//! bar and an optional autocomplete dropdown over the page. Websites are
//! screenshots from `websites/` paired with icons from `favicons/` by file
//! stem (`docs_rs.jpg` + `docs_rs.png` -> `docs.rs`).
//!
//! Every browser region is labeled at the application layer.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::annotation::{layers, UiClass};
use crate::assets::{asset_stem, load_category_with_ids, ResourceProvider, Sprite};
use crate::component::Paint;
use crate::context::{BrowserSection, ContextError, LayoutContext};
use crate::geometry::{Point, Rect};
use crate::random::SceneRng;
use crate::raster::{Palette, Surface};

use super::content::WindowContent;

const NAVBAR_HEIGHT: f64 = 30.0;
const NAVBAR_CONTROLS_WIDTH: f64 = 125.0;
const FAVORITES_HEIGHT: f64 = 30.0;
const AUTOCOMPLETE_ROW_HEIGHT: f64 = 30.0;
const TABBAR_OFFSET_X: f64 = 10.0;
const TABBAR_MARGIN_X: f64 = 30.0;
const MAX_TAB_WIDTH: f64 = 240.0;
const MIN_TABS: usize = 1;
const MAX_TABS: usize = 10;
const MIN_FAVORITES: usize = 2;
const MAX_FAVORITES: usize = 20;
const OVERLAY_PROBABILITY: f64 = 0.5;
const ICON_PADDING: f64 = 5.0;

/// A website screenshot with its favicon
#[derive(Clone, Debug)]
pub struct Website {
    /// Domain shown in tabs and the address field
    pub domain: String,
    /// Page screenshot
    pub page: Sprite,
    /// Site icon
    pub favicon: Sprite,
}

/// Browser window content
#[derive(Debug, Default)]
pub struct BrowserContent {
    sites: Vec<Website>,
}

impl BrowserContent {
    /// Browser without loaded websites
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Browser over a fixed set of websites
    #[must_use]
    pub fn with_sites(sites: Vec<Website>) -> Self {
        Self { sites }
    }

    /// Loaded websites
    #[must_use]
    pub fn sites(&self) -> &[Website] {
        &self.sites
    }
}

/// Pair pages and favicons by stem; sites missing either half are dropped
fn pair_sites(pages: Vec<(String, Sprite)>, favicons: Vec<(String, Sprite)>) -> Vec<Website> {
    let mut favicons: HashMap<String, Sprite> = favicons
        .into_iter()
        .map(|(id, sprite)| (asset_stem(&id).to_string(), sprite))
        .collect();

    pages
        .into_iter()
        .filter_map(|(id, page)| {
            let stem = asset_stem(&id);
            let favicon = favicons.remove(stem)?;
            Some(Website {
                domain: stem.replace('_', "."),
                page,
                favicon,
            })
        })
        .collect()
}

#[async_trait]
impl WindowContent for BrowserContent {
    fn name(&self) -> &'static str {
        "browser"
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Box<dyn Paint>, ContextError> {
        let app = *ctx.application(self.name())?;
        let bounds = app.bounds;

        // Tabs share the free part of the title bar
        let tab_count = rng.int_between(MIN_TABS, MAX_TABS);
        let tabs = rng.pick_many(&self.sites, tab_count);
        let active_tab = rng.int_between(0, tabs.len());
        let tab_width = if tabs.is_empty() {
            0.0
        } else {
            ((app.title_bar.width - TABBAR_MARGIN_X) / tabs.len() as f64).min(MAX_TAB_WIDTH)
        };
        let tabbar = Rect::new(
            app.title_bar.x + TABBAR_OFFSET_X,
            app.title_bar.y,
            tab_width * tabs.len() as f64,
            app.title_bar.height,
        );

        let navbar = Rect::new(bounds.x, app.content.y, bounds.width, NAVBAR_HEIGHT);
        let has_favorites = rng.chance(OVERLAY_PROBABILITY);
        let has_autocomplete = rng.chance(OVERLAY_PROBABILITY);

        let page_offset = NAVBAR_HEIGHT + if has_favorites { FAVORITES_HEIGHT } else { 0.0 };
        let page = Rect::new(
            bounds.x,
            app.content.y + page_offset,
            bounds.width,
            app.content.height - page_offset,
        );

        let favorites = if has_favorites {
            let rect = Rect::new(bounds.x, navbar.bottom(), bounds.width, FAVORITES_HEIGHT);
            if rect.is_degenerate() {
                None
            } else {
                let count = rng.int_between(MIN_FAVORITES, MAX_FAVORITES);
                ctx.annotate(layers::APPLICATION, UiClass::FavoriteBar, rect);
                Some(Overlay {
                    rect,
                    sites: rng.pick_many(&self.sites, count),
                })
            }
        } else {
            None
        };

        let autocomplete = if has_autocomplete {
            let max_rows = (page.height / AUTOCOMPLETE_ROW_HEIGHT).floor().max(0.0) as usize;
            if max_rows == 0 {
                None
            } else {
                let rows = rng.int_between(1, max_rows);
                let rect = Rect::new(
                    bounds.x + NAVBAR_CONTROLS_WIDTH,
                    navbar.bottom(),
                    navbar.width - NAVBAR_CONTROLS_WIDTH - 10.0,
                    rows as f64 * AUTOCOMPLETE_ROW_HEIGHT,
                );
                if rect.is_degenerate() {
                    None
                } else {
                    ctx.annotate(layers::APPLICATION, UiClass::Autocomplete, rect);
                    Some(Overlay {
                        rect,
                        sites: rng.pick_many(&self.sites, rows),
                    })
                }
            }
        } else {
            None
        };

        if !tabbar.is_degenerate() {
            ctx.annotate(layers::APPLICATION, UiClass::TabBar, tabbar);
        }
        ctx.annotate(layers::APPLICATION, UiClass::NavBar, navbar);
        ctx.browser = Some(BrowserSection { navbar, page });

        let url = tabs
            .get(active_tab)
            .map_or_else(String::new, |site| format!("https://{}", site.domain));

        Ok(Box::new(BrowserPaint {
            palette: app.appearance.palette(),
            tabbar,
            tab_width,
            tabs,
            active_tab,
            navbar,
            url,
            page,
            favorites,
            autocomplete,
        }))
    }

    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        let (pages, favicons) = futures::join!(
            load_category_with_ids(provider, "websites"),
            load_category_with_ids(provider, "favicons"),
        );
        self.sites = pair_sites(pages, favicons);
        if self.sites.is_empty() {
            tracing::warn!("No websites available, browser tabs will be empty");
        }
    }
}

#[derive(Debug)]
struct Overlay {
    rect: Rect,
    sites: Vec<Website>,
}

#[derive(Debug)]
struct BrowserPaint {
    palette: Palette,
    tabbar: Rect,
    tab_width: f64,
    tabs: Vec<Website>,
    active_tab: usize,
    navbar: Rect,
    url: String,
    page: Rect,
    favorites: Option<Overlay>,
    autocomplete: Option<Overlay>,
}

impl BrowserPaint {
    fn paint_tabs(&self, surface: &mut Surface) {
        let mut x = self.tabbar.x;
        for (index, site) in self.tabs.iter().enumerate() {
            let tab = Rect::new(x, self.tabbar.y + ICON_PADDING, self.tab_width, self.tabbar.height - ICON_PADDING);
            if index == self.active_tab {
                surface.fill_rect(&tab, self.palette.navbar);
            }
            let icon_side = (tab.height - 2.0 * ICON_PADDING).max(0.0);
            let icon = Rect::new(tab.x + ICON_PADDING, tab.y + ICON_PADDING, icon_side, icon_side);
            surface.blit(&site.favicon, &icon);
            surface.draw_text(
                &clip_text(&site.domain, tab.width - icon_side - 3.0 * ICON_PADDING),
                Point::new(icon.right() + ICON_PADDING, tab.center().y - 4.0),
                self.palette.text,
                1,
            );
            x += self.tab_width;
        }
    }

    fn paint_navbar(&self, surface: &mut Surface) {
        surface.fill_rect(&self.navbar, self.palette.navbar);

        // Back, forward, reload
        let center_y = self.navbar.center().y;
        for index in 0..3 {
            let x = self.navbar.x + 20.0 + f64::from(index) * 30.0;
            surface.fill_disc(Point::new(x, center_y), 4.0, self.palette.text);
        }

        let field = Rect::new(
            self.navbar.x + NAVBAR_CONTROLS_WIDTH,
            self.navbar.y + 4.0,
            (self.navbar.width - NAVBAR_CONTROLS_WIDTH - 10.0).max(0.0),
            self.navbar.height - 8.0,
        );
        surface.fill_rect(&field, self.palette.field);
        surface.draw_text(
            &clip_text(&self.url, field.width - 16.0),
            Point::new(field.x + 8.0, field.center().y - 4.0),
            self.palette.text,
            1,
        );
    }

    fn paint_favorites(&self, surface: &mut Surface, favorites: &Overlay) {
        surface.fill_rect(&favorites.rect, self.palette.navbar);
        let icon_side = favorites.rect.height - 8.0;
        let mut x = favorites.rect.x + ICON_PADDING;
        for site in &favorites.sites {
            let name = site.domain.rsplit_once('.').map_or(site.domain.as_str(), |(name, _)| name);
            let width = icon_side + ICON_PADDING + Surface::text_width(name, 1);
            if x + width > favorites.rect.right() {
                break;
            }
            surface.blit(&site.favicon, &Rect::new(x, favorites.rect.y + 4.0, icon_side, icon_side));
            surface.draw_text(
                name,
                Point::new(x + icon_side + ICON_PADDING, favorites.rect.center().y - 4.0),
                self.palette.text,
                1,
            );
            x += width + 2.0 * ICON_PADDING;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn paint_autocomplete(&self, surface: &mut Surface, autocomplete: &Overlay) {
        surface.fill_rect(&autocomplete.rect, self.palette.card);
        surface.stroke_rect(&autocomplete.rect, self.palette.frame, 1);
        let icon_side = AUTOCOMPLETE_ROW_HEIGHT - 10.0;
        for (row, site) in autocomplete.sites.iter().enumerate() {
            let y = autocomplete.rect.y + row as f64 * AUTOCOMPLETE_ROW_HEIGHT;
            let icon = Rect::new(autocomplete.rect.x + ICON_PADDING, y + 5.0, icon_side, icon_side);
            surface.blit(&site.favicon, &icon);
            surface.draw_text(
                &clip_text(&site.domain, autocomplete.rect.width - icon_side - 3.0 * ICON_PADDING),
                Point::new(icon.right() + ICON_PADDING, y + AUTOCOMPLETE_ROW_HEIGHT / 2.0 - 4.0),
                self.palette.text,
                1,
            );
        }
    }
}

impl Paint for BrowserPaint {
    fn paint(&self, surface: &mut Surface) {
        match self.tabs.get(self.active_tab) {
            Some(site) if !self.page.is_degenerate() => surface.blit_cover(&site.page, &self.page),
            _ => surface.fill_rect(&self.page, self.palette.content),
        }

        self.paint_navbar(surface);
        if let Some(favorites) = &self.favorites {
            self.paint_favorites(surface, favorites);
        }
        if let Some(autocomplete) = &self.autocomplete {
            self.paint_autocomplete(surface, autocomplete);
        }
        self.paint_tabs(surface);
    }
}

/// Longest prefix of `text` that fits in `width` pixels at scale 1
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clip_text(text: &str, width: f64) -> String {
    let chars = (width / Surface::text_width("m", 1)).floor().max(0.0) as usize;
    text.chars().take(chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ProceduralProvider;
    use crate::context::ApplicationSection;
    use crate::raster::Appearance;

    fn context(bounds: Rect, handle: f64) -> LayoutContext {
        let mut ctx = LayoutContext::new();
        ctx.application = Some(ApplicationSection {
            bounds,
            content: Rect::new(bounds.x, bounds.y + handle, bounds.width, bounds.height - handle),
            title_bar: Rect::new(bounds.x, bounds.y, bounds.width - 120.0, handle),
            active: true,
            appearance: Appearance::Dark,
        });
        ctx
    }

    #[test]
    fn test_pair_sites_by_stem() {
        let sprite: Sprite = std::sync::Arc::new(image::RgbaImage::new(1, 1));
        let pages = vec![
            ("websites/docs_rs.jpg".to_string(), sprite.clone()),
            ("websites/lonely_org.jpg".to_string(), sprite.clone()),
        ];
        let favicons = vec![("favicons/docs_rs.png".to_string(), sprite)];

        let sites = pair_sites(pages, favicons);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].domain, "docs.rs");
    }

    #[tokio::test]
    async fn test_browser_labels_navigation_regions() {
        let mut browser = BrowserContent::new();
        browser.load_resources(&ProceduralProvider::default()).await;
        assert_eq!(browser.sites().len(), 6);

        let bounds = Rect::new(50.0, 40.0, 1200.0, 800.0);
        for seed in 0..16 {
            let mut ctx = context(bounds, 34.0);
            let mut rng = SceneRng::seed_from_u64(seed);
            let paint = browser.layout(&mut ctx, &mut rng).unwrap();

            let section = ctx.browser.unwrap();
            assert_eq!(section.navbar, Rect::new(50.0, 74.0, 1200.0, NAVBAR_HEIGHT));
            assert!(section.page.y >= section.navbar.bottom());

            let classes: Vec<UiClass> = ctx.annotations().iter().map(|a| a.class).collect();
            assert!(classes.contains(&UiClass::NavBar));
            assert!(classes.contains(&UiClass::TabBar));
            assert!(ctx.annotations().iter().all(|a| a.layer == layers::APPLICATION));

            if let Some(tabbar) = ctx.annotations().iter().find(|a| a.class == UiClass::TabBar) {
                assert!(tabbar.rect.right() <= bounds.right() - 120.0);
            }

            let mut surface = Surface::new(1300, 900);
            paint.paint(&mut surface);
        }
    }

    #[test]
    fn test_tiny_window_skips_autocomplete() {
        let browser = BrowserContent::new();
        let bounds = Rect::new(0.0, 0.0, 100.0, 60.0);
        for seed in 0..16 {
            let mut ctx = context(bounds, 34.0);
            let mut rng = SceneRng::seed_from_u64(seed);
            browser.layout(&mut ctx, &mut rng).unwrap();
            assert!(ctx.annotations().iter().all(|a| a.class != UiClass::Autocomplete));
            // No sites loaded: no tabs either
            assert!(ctx.annotations().iter().all(|a| a.class != UiClass::TabBar));
        }
    }
}
