//! Component / Draw-Op Protocol
//!
//! A scene is a tree of [`Component`]s. One pre-order walk ([`collect`])
//! lets every node write its section of the [`LayoutContext`], append its
//! candidate annotations and hand back a layer-tagged [`DrawOp`]. Nothing is
//! painted during the walk; the render pass executes the collected ops
//! afterwards in ascending layer order.
//!
//! ```text
//! Screen ──layout──▶ DrawOp(layer 0)
//!   ├─ DesktopFiles ─▶ DrawOp(layer 10) + file annotations
//!   ├─ Dock ─────────▶ DrawOp(layer 30) + dock annotation
//!   ├─ MenuBar ──────▶ DrawOp(layer 40) + menubar annotation
//!   ├─ Notification ─▶ maybe DrawOp(layer 50)
//!   └─ Application ──▶ DrawOp(layer 20) + window/browser annotations
//! ```

use async_trait::async_trait;
use futures::future::join_all;

use crate::assets::ResourceProvider;
use crate::context::{ContextError, LayoutContext};
use crate::random::SceneRng;
use crate::raster::Surface;

// ============================================================================
// Draw Operations
// ============================================================================

/// Deferred drawing of one component
///
/// Implemented by plain data structs that hold everything the component
/// decided during layout (bounds, colors, chosen sprites).
pub trait Paint: Send + Sync + std::fmt::Debug {
    /// Draw onto the surface
    fn paint(&self, surface: &mut Surface);
}

/// A layer-tagged paint produced by the layout pass
#[derive(Debug)]
pub struct DrawOp {
    /// Compositing layer (ascending paint order)
    pub layer: i32,
    /// Name of the component that produced it
    pub node: &'static str,
    /// What to draw
    pub paint: Box<dyn Paint>,
}

impl DrawOp {
    /// Create a draw op
    #[must_use]
    pub fn new(layer: i32, node: &'static str, paint: impl Paint + 'static) -> Self {
        Self {
            layer,
            node,
            paint: Box::new(paint),
        }
    }
}

// ============================================================================
// Component Trait
// ============================================================================

/// A node of the scene tree
#[async_trait]
pub trait Component: Send + Sync {
    /// Stable name used in logs and context errors
    fn name(&self) -> &'static str;

    /// Child nodes, laid out after this one in order
    fn children(&self) -> &[Box<dyn Component>] {
        &[]
    }

    /// Mutable child nodes, for resource loading
    fn children_mut(&mut self) -> &mut [Box<dyn Component>] {
        &mut []
    }

    /// Write this node's context section, append its annotations and return
    /// its own draw op (children are handled by [`collect`])
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingSection`] when a required ancestor
    /// section is absent.
    fn layout(
        &self,
        ctx: &mut LayoutContext,
        rng: &mut SceneRng,
    ) -> Result<Option<DrawOp>, ContextError>;

    /// Load assets for this node and its subtree
    ///
    /// The default loads the children concurrently. Load failures never
    /// propagate: they are logged and the affected asset is skipped.
    async fn load_resources(&mut self, provider: &dyn ResourceProvider) {
        load_children(self.children_mut(), provider).await;
    }
}

/// Lay out `node` and its subtree in pre-order
///
/// The node's own layout runs before any child, so children can read the
/// sections it wrote. The returned ops are in traversal order; sorting by
/// layer is the render pass's job.
///
/// # Errors
///
/// Stops at the first [`ContextError`]; the image being generated is lost.
pub fn collect(
    node: &dyn Component,
    ctx: &mut LayoutContext,
    rng: &mut SceneRng,
) -> Result<Vec<DrawOp>, ContextError> {
    let mut ops = Vec::new();
    if let Some(op) = node.layout(ctx, rng)? {
        ops.push(op);
    }
    for child in node.children() {
        ops.extend(collect(child.as_ref(), ctx, rng)?);
    }
    Ok(ops)
}

/// Load every child's resources concurrently, waiting for all of them
pub async fn load_children(children: &mut [Box<dyn Component>], provider: &dyn ResourceProvider) {
    join_all(
        children
            .iter_mut()
            .map(|child| child.load_resources(provider)),
    )
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{layers, UiClass};
    use crate::context::ScreenSection;
    use crate::geometry::{Rect, Size};
    use crate::raster::Appearance;
    use crate::scene::UiFamily;

    #[derive(Debug)]
    struct NoPaint;

    impl Paint for NoPaint {
        fn paint(&self, _surface: &mut Surface) {}
    }

    struct Root {
        children: Vec<Box<dyn Component>>,
    }

    impl Component for Root {
        fn name(&self) -> &'static str {
            "root"
        }

        fn children(&self) -> &[Box<dyn Component>] {
            &self.children
        }

        fn layout(
            &self,
            ctx: &mut LayoutContext,
            _rng: &mut SceneRng,
        ) -> Result<Option<DrawOp>, ContextError> {
            ctx.screen = Some(ScreenSection {
                size: Size::new(100.0, 100.0),
                appearance: Appearance::Dark,
                family: UiFamily::Mac,
            });
            Ok(Some(DrawOp::new(layers::SCREEN, self.name(), NoPaint)))
        }
    }

    struct Leaf;

    impl Component for Leaf {
        fn name(&self) -> &'static str {
            "leaf"
        }

        fn layout(
            &self,
            ctx: &mut LayoutContext,
            _rng: &mut SceneRng,
        ) -> Result<Option<DrawOp>, ContextError> {
            let width = ctx.screen(self.name())?.size.width;
            ctx.annotate(layers::FILE, UiClass::File, Rect::new(0.0, 0.0, width, 10.0));
            Ok(Some(DrawOp::new(layers::FILE, self.name(), NoPaint)))
        }
    }

    #[test]
    fn test_collect_is_pre_order() {
        let root = Root {
            children: vec![Box::new(Leaf), Box::new(Leaf)],
        };
        let mut ctx = LayoutContext::new();
        let mut rng = SceneRng::seed_from_u64(0);

        let ops = collect(&root, &mut ctx, &mut rng).unwrap();

        let nodes: Vec<&str> = ops.iter().map(|op| op.node).collect();
        assert_eq!(nodes, vec!["root", "leaf", "leaf"]);
        assert_eq!(ctx.annotations().len(), 2);
        assert_eq!(ctx.annotations()[0].rect.width, 100.0);
    }

    #[test]
    fn test_missing_ancestor_section_aborts() {
        let mut ctx = LayoutContext::new();
        let mut rng = SceneRng::seed_from_u64(0);

        let err = collect(&Leaf, &mut ctx, &mut rng).unwrap_err();
        assert_eq!(
            err,
            ContextError::MissingSection {
                section: "screen",
                requested_by: "leaf",
            }
        );
    }
}
