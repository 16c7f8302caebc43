//! Resource Loading
//!
//! Sprites (backgrounds, icons, application screenshots, web pages) come from
//! a [`ResourceProvider`]. Loading happens once, asynchronously, before any
//! image is laid out:
//!
//! - [`DirectoryProvider`] reads `<root>/<category>/*` with `tokio::fs` and
//!   decodes on the blocking pool.
//! - [`ProceduralProvider`] synthesizes deterministic placeholder sprites, for
//!   runs without a resource directory and for tests.
//!
//! [`load_category`] loads a whole category concurrently with all-settled
//! semantics: a sprite that fails to load is logged and skipped, the rest
//! still arrive, in listing order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use image::RgbaImage;
use thiserror::Error;

use crate::raster::{rgba, Color};

/// Shared decoded image
pub type Sprite = Arc<RgbaImage>;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading a sprite
#[derive(Debug, Error)]
pub enum AssetError {
    /// Reading the file or directory failed
    #[error("Failed to read asset at {path}: {source}")]
    Read {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The bytes are not a decodable image
    #[error("Failed to decode asset {id}: {source}")]
    Decode {
        /// Asset id
        id: String,
        /// The underlying decoder error
        source: image::ImageError,
    },

    /// The id does not name an asset this provider knows
    #[error("Unknown asset: {0}")]
    NotFound(String),

    /// The blocking decode task panicked or was cancelled
    #[error("Asset decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Source of sprites, organized in categories such as `mac/backgrounds`
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Asset ids in a category, sorted; an unknown category is empty
    async fn list(&self, category: &str) -> Result<Vec<String>, AssetError>;

    /// Load and decode one asset
    async fn load(&self, id: &str) -> Result<Sprite, AssetError>;
}

/// Load every sprite of a category concurrently
///
/// Failures are logged at `warn` and skipped. The result keeps listing order,
/// so two loads of the same directory give the same sprite sequence.
pub async fn load_category(provider: &dyn ResourceProvider, category: &str) -> Vec<Sprite> {
    load_category_with_ids(provider, category)
        .await
        .into_iter()
        .map(|(_, sprite)| sprite)
        .collect()
}

/// Like [`load_category`], keeping each sprite's id
pub async fn load_category_with_ids(
    provider: &dyn ResourceProvider,
    category: &str,
) -> Vec<(String, Sprite)> {
    let ids = match provider.list(category).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(category, error = %e, "Failed to list asset category");
            return Vec::new();
        }
    };

    let results = join_all(ids.iter().map(|id| provider.load(id))).await;

    ids.into_iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(sprite) => Some((id, sprite)),
            Err(e) => {
                tracing::warn!(asset = %id, error = %e, "Skipping asset that failed to load");
                None
            }
        })
        .collect()
}

/// File name of an asset id without its extension (`websites/docs_rs.jpg` -> `docs_rs`)
#[must_use]
pub fn asset_stem(id: &str) -> &str {
    Path::new(id)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(id)
}

// ============================================================================
// Directory Provider
// ============================================================================

/// Reads sprites from `<root>/<category>/*`
#[derive(Clone, Debug)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    /// Provider rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resource root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ResourceProvider for DirectoryProvider {
    async fn list(&self, category: &str) -> Result<Vec<String>, AssetError> {
        let dir = self.root.join(category);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %dir.display(), "Asset category directory not found");
                return Ok(Vec::new());
            }
            Err(source) => return Err(AssetError::Read { path: dir, source }),
        };

        let mut ids = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|source| AssetError::Read {
                path: dir.clone(),
                source,
            })?;
            let Some(entry) = entry else { break };

            let file_type = entry.file_type().await.map_err(|source| AssetError::Read {
                path: entry.path(),
                source,
            })?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    ids.push(format!("{category}/{name}"));
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    async fn load(&self, id: &str) -> Result<Sprite, AssetError> {
        let path = self.root.join(id);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| AssetError::Read { path, source })?;

        let id = id.to_string();
        let image = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes)
                .map(|decoded| decoded.to_rgba8())
                .map_err(|source| AssetError::Decode { id, source })
        })
        .await??;

        Ok(Arc::new(image))
    }
}

// ============================================================================
// Procedural Provider
// ============================================================================

/// Names used for procedural asset ids; browser assets turn them into domains
const PROCEDURAL_NAMES: [&str; 8] = [
    "atlas_io",
    "bluebird_com",
    "canopy_org",
    "driftwood_net",
    "ember_dev",
    "fjord_app",
    "granite_co",
    "harbor_info",
];

/// Generates deterministic flat sprites instead of reading files
///
/// Each listed category holds `per_category` assets; the pixels of an asset
/// depend only on its id.
#[derive(Clone, Debug)]
pub struct ProceduralProvider {
    per_category: usize,
}

impl Default for ProceduralProvider {
    fn default() -> Self {
        Self { per_category: 6 }
    }
}

impl ProceduralProvider {
    /// Provider with `per_category` assets in every category (at most 8)
    #[must_use]
    pub fn new(per_category: usize) -> Self {
        Self {
            per_category: per_category.min(PROCEDURAL_NAMES.len()),
        }
    }

    fn sprite_for(id: &str) -> RgbaImage {
        let hash = fnv1a(id.as_bytes());
        let base = hash_color(hash);
        let accent = hash_color(hash.rotate_left(17));
        let category = id.rsplit_once('/').map_or("", |(category, _)| category);

        if category.ends_with("backgrounds") {
            gradient(320, 180, base, accent)
        } else if category.ends_with("appicons") || category.ends_with("favicons") {
            badge(64, 64, base, accent)
        } else if category.contains("fileicons") {
            badge(48, 60, base, accent)
        } else {
            // Application screenshots and web pages
            let (w, h) = if hash % 2 == 0 { (400, 300) } else { (480, 270) };
            gradient(w, h, accent, base)
        }
    }
}

#[async_trait]
impl ResourceProvider for ProceduralProvider {
    async fn list(&self, category: &str) -> Result<Vec<String>, AssetError> {
        Ok(PROCEDURAL_NAMES[..self.per_category]
            .iter()
            .map(|name| format!("{category}/{name}"))
            .collect())
    }

    async fn load(&self, id: &str) -> Result<Sprite, AssetError> {
        let known = id
            .rsplit_once('/')
            .is_some_and(|(_, name)| PROCEDURAL_NAMES[..self.per_category].contains(&name));
        if !known {
            return Err(AssetError::NotFound(id.to_string()));
        }
        Ok(Arc::new(Self::sprite_for(id)))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[allow(clippy::cast_possible_truncation)]
fn hash_color(hash: u64) -> Color {
    rgba(hash as u8, (hash >> 8) as u8, (hash >> 16) as u8, 255)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gradient(width: u32, height: u32, top: Color, bottom: Color) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let t = f64::from(y) / f64::from(height.max(1));
        let mix = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8;
        rgba(mix(top[0], bottom[0]), mix(top[1], bottom[1]), mix(top[2], bottom[2]), 255)
    })
}

fn badge(width: u32, height: u32, fill: Color, mark: Color) -> RgbaImage {
    let inset = width.min(height) / 4;
    RgbaImage::from_fn(width, height, |x, y| {
        let inside = x >= inset && x < width - inset && y >= inset && y < height - inset;
        if inside {
            mark
        } else {
            fill
        }
    })
}
