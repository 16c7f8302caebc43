//! Generation Pipeline
//!
//! Turns a loaded scene tree into one labeled image:
//!
//! ```text
//! layout_pass ──▶ draw ops + candidate annotations
//!      │                        │
//!      ▼                        ▼
//! render_pass (by layer)   OcclusionResolver
//!      │                        │
//!      └──────▶ GeneratedImage ◀┘
//! ```
//!
//! Both passes are synchronous and single-threaded; parallelism happens one
//! level up, across images.

use crate::annotation::{Annotation, OcclusionResolver};
use crate::component::{collect, Component, DrawOp};
use crate::context::{ContextError, LayoutContext};
use crate::geometry::Size;
use crate::random::SceneRng;
use crate::raster::Surface;

/// Output of the layout pass
#[derive(Debug)]
pub struct LayoutOutput {
    /// Canvas size chosen by the scene root
    pub canvas: Size,
    /// Draw ops in traversal order
    pub ops: Vec<DrawOp>,
    /// Candidate annotations in emission order
    pub annotations: Vec<Annotation>,
}

/// One generated, labeled image
#[derive(Debug)]
pub struct GeneratedImage {
    /// Rendered pixels
    pub surface: Surface,
    /// Annotations that survived clipping and occlusion
    pub annotations: Vec<Annotation>,
    /// Number of candidate annotations before resolution
    pub candidates: usize,
}

impl GeneratedImage {
    /// Canvas size the annotations are expressed in
    #[must_use]
    pub fn canvas(&self) -> Size {
        self.surface.size()
    }
}

/// Walk the scene tree once
///
/// # Errors
///
/// Returns the first [`ContextError`] raised by a component, or a missing
/// screen section when the root did not write one.
pub fn layout_pass(root: &dyn Component, rng: &mut SceneRng) -> Result<LayoutOutput, ContextError> {
    let mut ctx = LayoutContext::new();
    let ops = collect(root, &mut ctx, rng)?;
    let canvas = ctx.screen("pipeline")?.size;
    Ok(LayoutOutput {
        canvas,
        ops,
        annotations: ctx.into_annotations(),
    })
}

/// Paint draw ops onto a fresh canvas in ascending layer order
///
/// The sort is stable: ops sharing a layer keep traversal order.
#[must_use]
pub fn render_pass(canvas: Size, mut ops: Vec<DrawOp>) -> Surface {
    ops.sort_by_key(|op| op.layer);
    let (width, height) = canvas.pixels();
    let mut surface = Surface::new(width, height);
    for op in &ops {
        op.paint.paint(&mut surface);
    }
    surface
}

/// Lay out, render and resolve one image
///
/// # Errors
///
/// Returns a [`ContextError`] when the layout pass fails; nothing is
/// rendered in that case.
pub fn generate_image(
    root: &dyn Component,
    rng: &mut SceneRng,
    resolver: &OcclusionResolver,
) -> Result<GeneratedImage, ContextError> {
    let LayoutOutput {
        canvas,
        ops,
        annotations,
    } = layout_pass(root, rng)?;

    let candidates = annotations.len();
    let ops_count = ops.len();
    let surface = render_pass(canvas, ops);
    let annotations = resolver.resolve(&annotations, canvas);

    tracing::debug!(
        width = canvas.width,
        height = canvas.height,
        ops = ops_count,
        candidates,
        survivors = annotations.len(),
        "Generated image"
    );

    Ok(GeneratedImage {
        surface,
        annotations,
        candidates,
    })
}
