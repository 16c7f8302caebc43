//! Screengen Core - Synthetic Desktop Screenshots with Exact Labels
//!
//! This crate composes fake desktop scenes (background, dock or taskbar, menu
//! bar, desktop files, a notification and one application window), rasterizes
//! them and emits a bounding box for every synthesized UI element, for
//! training object detectors.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          BatchRunner                             │
//! │   Arc<Screen> (full)   Arc<Screen> (background only)   Semaphore │
//! └──────────────┬───────────────────────────────────────────────────┘
//!                │ one blocking job per image, SceneRng::for_image
//! ┌──────────────┴───────────────────────────────────────────────────┐
//! │                          pipeline                                │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────┐  │
//! │  │ layout_pass  │──▶│ render_pass  │   │ OcclusionResolver    │  │
//! │  │ (pre-order)  │   │ (by layer)   │   │ clip, split, keep    │  │
//! │  └──────┬───────┘   └──────────────┘   └──────────┬───────────┘  │
//! │         └─────────── candidate annotations ───────┘              │
//! └──────────────┬───────────────────────────────────────────────────┘
//!                │ Surface + surviving annotations
//! ┌──────────────┴───────────────────────────────────────────────────┐
//! │                           export                                 │
//! │     raw: png + json + overlay     normalized: square png + ids   │
//! │                  classes.json (one per batch)                    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Component`]: a scene node; writes its context section, annotates and
//!   returns a layer-tagged [`DrawOp`]
//! - [`LayoutContext`]: typed per-image blackboard shared down the tree
//! - [`Screen`]: scene root for a [`UiFamily`]
//! - [`OcclusionResolver`]: removes labels of fully hidden elements
//! - [`BatchRunner`]: concurrent dataset generation
//!
//! # Module Overview
//!
//! - [`geometry`]: rectangles, sizes, screen edges
//! - [`annotation`]: label classes, layers, occlusion, class tables
//! - [`component`]: the component and draw-op protocol
//! - [`context`]: per-image layout sections
//! - [`layout`]: randomized placement and bar sizing
//! - [`random`]: injected, seeded randomness
//! - [`raster`]: RGBA surface and flat theme colors
//! - [`assets`]: sprite providers (directory or procedural)
//! - [`skins`]: dock, menu bar, taskbar, files, notification, windows
//! - [`scene`]: scene root and UI families
//! - [`pipeline`]: layout, render and resolve one image
//! - [`export`]: raw and normalized output files
//! - [`batch`]: run presets and the batch runner
//! - [`config`]: TOML, environment and CLI configuration

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod annotation;
pub mod assets;
pub mod batch;
pub mod component;
pub mod config;
pub mod context;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod pipeline;
pub mod random;
pub mod raster;
pub mod scene;
pub mod skins;

// Re-exports for convenience
pub use annotation::{
    layers, Annotation, ClassPolicy, ClassTable, OcclusionResolver, UiClass,
    DEFAULT_SLIVER_EPSILON,
};
pub use assets::{AssetError, DirectoryProvider, ProceduralProvider, ResourceProvider, Sprite};
pub use batch::{
    BatchError, BatchPlan, BatchReport, BatchRunner, BatchSettings, Job, RunMode, Split,
};
pub use component::{collect, Component, DrawOp, Paint};
pub use context::{ContextError, LayoutContext};
pub use export::{ExportError, ExportMode};
pub use geometry::{Edge, Point, Rect, Size};
pub use pipeline::{generate_image, layout_pass, render_pass, GeneratedImage, LayoutOutput};
pub use random::SceneRng;
pub use raster::{Appearance, Surface};
pub use scene::{Screen, UiFamily, SCREEN_SIZES};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env,
    ConfigError, ConfigOverrides, ConfigSource, GeneratorConfig, ScreengenToml,
};
