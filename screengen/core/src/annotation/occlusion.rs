//! Occlusion Resolution
//!
//! Turns raw candidate annotations into training labels that describe what is
//! actually visible in the final image:
//!
//! 1. Every rectangle is clipped to the canvas; rectangles with no area left
//!    are discarded.
//! 2. For each annotation, the annotations on strictly higher layers that
//!    overlap it are its occluders. Equal or lower layers never occlude.
//! 3. The annotation is cut into "still uncovered" fragments, one occluder at
//!    a time. A fragment hit by an occluder is replaced by at most four
//!    residual pieces around it.
//! 4. The annotation survives if no occluder touches it, or if the uncovered
//!    region still holds an `epsilon x epsilon` square. Survivors keep their
//!    whole (clipped) rectangle; the fragments only decide keep or drop.
//!
//! The square test runs as an exact split: the candidate top-left corners of
//! the square are `A` shrunk by epsilon on the right and bottom, and each
//! occluder blocks the corners in itself grown by epsilon on the left and
//! top. Exact splitting leaves `A` minus the union of its occluders, so the
//! keep/drop outcome does not depend on the order occluders are applied in.
//! The tests below check that with shuffled occluder orders.

use crate::annotation::Annotation;
use crate::geometry::{Rect, Size};

/// Side of the smallest uncovered square (in pixels) that keeps an occluded label
pub const DEFAULT_SLIVER_EPSILON: f64 = 2.0;

/// Clip + occlusion filter for one image's annotations
#[derive(Clone, Copy, Debug)]
pub struct OcclusionResolver {
    /// Side of the uncovered square an occluded annotation needs to survive
    pub sliver_epsilon: f64,
}

impl Default for OcclusionResolver {
    fn default() -> Self {
        Self {
            sliver_epsilon: DEFAULT_SLIVER_EPSILON,
        }
    }
}

impl OcclusionResolver {
    /// Create a resolver with a custom sliver epsilon
    #[must_use]
    pub fn with_epsilon(sliver_epsilon: f64) -> Self {
        Self {
            sliver_epsilon: sliver_epsilon.max(0.0),
        }
    }

    /// Clip and filter the annotations of one image
    ///
    /// Returns the annotations that remain at least partially visible, in
    /// their original order, each carrying its clipped rectangle.
    #[must_use]
    pub fn resolve(&self, annotations: &[Annotation], canvas: Size) -> Vec<Annotation> {
        let clipped = clip_annotations(annotations, canvas);

        clipped
            .iter()
            .enumerate()
            .filter(|(index, annotation)| {
                let occluders: Vec<Rect> = clipped
                    .iter()
                    .enumerate()
                    .filter(|(other_index, other)| {
                        other_index != index
                            && other.layer > annotation.layer
                            && other.rect.intersects(&annotation.rect)
                    })
                    .map(|(_, other)| other.rect)
                    .collect();

                self.is_visible(&annotation.rect, &occluders)
            })
            .map(|(_, annotation)| *annotation)
            .collect()
    }

    /// True when an `epsilon x epsilon` square of `target` stays uncovered
    ///
    /// A target no occluder overlaps is always visible, however thin.
    #[must_use]
    pub fn is_visible(&self, target: &Rect, occluders: &[Rect]) -> bool {
        let eps = self.sliver_epsilon;
        let blocking: Vec<Rect> = occluders
            .iter()
            .filter(|occluder| occluder.intersects(target))
            .map(|occluder| {
                Rect::new(
                    occluder.x - eps,
                    occluder.y - eps,
                    occluder.width + eps,
                    occluder.height + eps,
                )
            })
            .collect();

        if blocking.is_empty() {
            return true;
        }

        let corners = Rect::new(target.x, target.y, target.width - eps, target.height - eps);
        if corners.is_degenerate() {
            return false;
        }

        !visible_fragments(&corners, &blocking).is_empty()
    }
}

/// Uncovered fragments of `target` after applying `occluders` in order
///
/// Fragments are pairwise disjoint and none of them overlaps an occluder.
/// Their union is `target` minus the union of the occluders.
#[must_use]
pub fn visible_fragments(target: &Rect, occluders: &[Rect]) -> Vec<Rect> {
    let mut fragments = vec![*target];

    for occluder in occluders {
        if fragments.is_empty() {
            break;
        }
        fragments = fragments
            .into_iter()
            .flat_map(|fragment| {
                if fragment.intersects(occluder) {
                    split(&fragment, occluder)
                } else {
                    vec![fragment]
                }
            })
            .collect();
    }

    fragments
}

/// Pieces of `fragment` not covered by `occluder`
///
/// Cuts along the occluder edges that fall strictly inside the fragment:
/// a full-width band above, a full-width band below, and the left/right
/// pieces of the middle row. Returns nothing when no edge falls inside,
/// i.e. the occluder covers the whole fragment.
fn split(fragment: &Rect, occluder: &Rect) -> Vec<Rect> {
    let cut_left = occluder.x > fragment.x && occluder.x < fragment.right();
    let cut_right = occluder.right() > fragment.x && occluder.right() < fragment.right();
    let cut_top = occluder.y > fragment.y && occluder.y < fragment.bottom();
    let cut_bottom = occluder.bottom() > fragment.y && occluder.bottom() < fragment.bottom();

    if !(cut_left || cut_right || cut_top || cut_bottom) {
        return Vec::new();
    }

    let middle_top = if cut_top { occluder.y } else { fragment.y };
    let middle_bottom = if cut_bottom {
        occluder.bottom()
    } else {
        fragment.bottom()
    };

    let mut pieces = Vec::with_capacity(4);
    if cut_top {
        pieces.push(Rect::from_edges(
            fragment.x,
            fragment.y,
            fragment.right(),
            occluder.y,
        ));
    }
    if cut_bottom {
        pieces.push(Rect::from_edges(
            fragment.x,
            occluder.bottom(),
            fragment.right(),
            fragment.bottom(),
        ));
    }
    if cut_left {
        pieces.push(Rect::from_edges(
            fragment.x,
            middle_top,
            occluder.x,
            middle_bottom,
        ));
    }
    if cut_right {
        pieces.push(Rect::from_edges(
            occluder.right(),
            middle_top,
            fragment.right(),
            middle_bottom,
        ));
    }

    pieces.retain(|piece| !piece.is_degenerate() && !piece.intersects(occluder));
    pieces
}

/// Clip every annotation to the canvas, dropping the ones with no area left
#[must_use]
pub fn clip_annotations(annotations: &[Annotation], canvas: Size) -> Vec<Annotation> {
    annotations
        .iter()
        .filter_map(|annotation| {
            let rect = annotation.rect.clip_to(canvas);
            (!rect.is_degenerate()).then_some(Annotation { rect, ..*annotation })
        })
        .collect()
}

/// Resolve with the default sliver epsilon
#[must_use]
pub fn resolve_annotations(annotations: &[Annotation], canvas: Size) -> Vec<Annotation> {
    OcclusionResolver::default().resolve(annotations, canvas)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::annotation::UiClass;

    const CANVAS: Size = Size::new(1000.0, 800.0);

    fn ann(layer: i32, class: UiClass, x: f64, y: f64, w: f64, h: f64) -> Annotation {
        Annotation::new(layer, class, Rect::new(x, y, w, h))
    }

    fn total_area(fragments: &[Rect]) -> f64 {
        fragments.iter().map(Rect::area).sum()
    }

    #[test]
    fn test_partial_occlusion_keeps_original_box() {
        let a = ann(1, UiClass::Application, 100.0, 100.0, 200.0, 200.0);
        let b = ann(2, UiClass::NavBar, 150.0, 150.0, 50.0, 50.0);

        let resolved = resolve_annotations(&[a, b], CANVAS);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].rect, Rect::new(100.0, 100.0, 200.0, 200.0));
        assert_eq!(resolved[1], b);
    }

    #[test]
    fn test_full_occlusion_drops_lower_annotation() {
        let a = ann(1, UiClass::Application, 100.0, 100.0, 200.0, 200.0);
        let b = ann(2, UiClass::NavBar, 90.0, 90.0, 220.0, 220.0);

        let resolved = resolve_annotations(&[a, b], CANVAS);

        assert_eq!(resolved, vec![b]);
    }

    #[test]
    fn test_equal_layers_never_occlude() {
        let a = ann(3, UiClass::File, 100.0, 100.0, 50.0, 50.0);
        let b = ann(3, UiClass::File, 0.0, 0.0, 500.0, 500.0);

        let resolved = resolve_annotations(&[a, b], CANVAS);
        assert_eq!(resolved, vec![a, b]);
    }

    #[test]
    fn test_lower_layer_never_occludes_higher() {
        let top = ann(5, UiClass::Notification, 100.0, 100.0, 50.0, 50.0);
        let below = ann(1, UiClass::Application, 0.0, 0.0, 500.0, 500.0);

        let resolved = resolve_annotations(&[top, below], CANVAS);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_joint_occlusion_by_two_halves() {
        let a = ann(1, UiClass::Application, 100.0, 100.0, 200.0, 200.0);
        let left = ann(2, UiClass::Dock, 0.0, 0.0, 200.0, 800.0);
        let right = ann(2, UiClass::Dock, 200.0, 0.0, 300.0, 800.0);

        let resolved = resolve_annotations(&[a, left, right], CANVAS);
        assert_eq!(resolved, vec![left, right]);
    }

    #[test]
    fn test_sliver_remainder_counts_as_hidden() {
        let a = ann(1, UiClass::Application, 100.0, 100.0, 200.0, 200.0);
        // Leaves a 1px strip along the right edge of `a`
        let b = ann(2, UiClass::Notification, 50.0, 50.0, 249.0, 300.0);

        let resolved = resolve_annotations(&[a, b], CANVAS);
        assert_eq!(resolved, vec![b]);

        // Without the epsilon the strip keeps `a` alive
        let exact = OcclusionResolver::with_epsilon(0.0).resolve(&[a, b], CANVAS);
        assert_eq!(exact.len(), 2);
    }

    #[test]
    fn test_clipping_invariant_holds_for_survivors() {
        let annotations = [
            ann(1, UiClass::Application, -250.0, -10.0, 800.0, 600.0),
            ann(2, UiClass::Notification, 900.0, 30.0, 350.0, 80.0),
            ann(3, UiClass::Dock, 400.0, 760.0, 300.0, 90.0),
            ann(4, UiClass::MenuBar, 1200.0, 0.0, 100.0, 24.0),
        ];

        let resolved = resolve_annotations(&annotations, CANVAS);

        // The menu bar is entirely off-canvas
        assert_eq!(resolved.len(), 3);
        for survivor in &resolved {
            let r = survivor.rect;
            assert!(r.x >= 0.0 && r.y >= 0.0, "{r:?}");
            assert!(r.right() <= CANVAS.width, "{r:?}");
            assert!(r.bottom() <= CANVAS.height, "{r:?}");
        }
        assert_eq!(resolved[0].rect, Rect::new(0.0, 0.0, 550.0, 590.0));
    }

    #[test]
    fn test_degenerate_input_is_discarded() {
        let negative = ann(1, UiClass::FavoriteBar, 100.0, 100.0, -20.0, 30.0);
        let flat = ann(1, UiClass::Autocomplete, 100.0, 100.0, 20.0, 0.0);
        assert!(resolve_annotations(&[negative, flat], CANVAS).is_empty());
    }

    #[test]
    fn test_visible_corner_square_survives_any_occluder_order() {
        let canvas = Size::new(100.0, 100.0);
        let a = ann(1, UiClass::Application, 10.0, 10.0, 10.0, 10.0);
        // Together these leave exactly the 3x3 corner (10..13, 10..13) of `a`
        let thin = ann(2, UiClass::Notification, 15.0, 11.0, 2.0, 1.5);
        let wide = ann(2, UiClass::Notification, 13.0, 9.0, 20.0, 20.0);
        let tall = ann(2, UiClass::Notification, 9.0, 13.0, 4.0, 20.0);

        for order in [
            [a, thin, wide, tall],
            [a, wide, tall, thin],
            [a, tall, thin, wide],
            [a, wide, thin, tall],
        ] {
            let resolved = resolve_annotations(&order, canvas);
            assert!(resolved.contains(&a), "{order:?} hid the visible corner");
        }
    }

    #[test]
    fn test_thin_target_hidden_once_touched() {
        let line = ann(1, UiClass::File, 100.0, 100.0, 1.5, 80.0);
        let cover = ann(2, UiClass::Dock, 90.0, 150.0, 40.0, 10.0);

        assert_eq!(resolve_annotations(&[line], CANVAS), vec![line]);
        assert_eq!(resolve_annotations(&[line, cover], CANVAS), vec![cover]);
    }

    #[test]
    fn test_split_produces_disjoint_uncovered_pieces() {
        let target = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hole = Rect::new(3.0, 4.0, 2.0, 2.0);

        let fragments = visible_fragments(&target, &[hole]);

        assert_eq!(fragments.len(), 4);
        assert!((total_area(&fragments) - 96.0).abs() < 1e-9);
        for (i, a) in fragments.iter().enumerate() {
            assert!(!a.intersects(&hole));
            for b in &fragments[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    /// Random occluders on a quarter-pixel grid: exact full coverage happens
    /// regularly, and cuts thinner than the default epsilon are common.
    /// Quarter steps keep every edge exact in binary floating point.
    fn random_occluders(rng: &mut StdRng, count: usize) -> Vec<Rect> {
        (0..count)
            .map(|_| {
                let x = f64::from(rng.gen_range(0..80_i32)) * 0.25;
                let y = f64::from(rng.gen_range(0..80_i32)) * 0.25;
                let w = f64::from(rng.gen_range(1..80_i32)) * 0.25;
                let h = f64::from(rng.gen_range(1..80_i32)) * 0.25;
                Rect::new(x, y, w, h)
            })
            .collect()
    }

    #[test]
    fn test_fragment_area_does_not_depend_on_order() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let target = Rect::new(5.0, 5.0, 10.0, 10.0);
        let mut hidden_cases = 0;

        for _ in 0..500 {
            let count = rng.gen_range(1..8);
            let mut occluders = random_occluders(&mut rng, count);
            let baseline = visible_fragments(&target, &occluders);
            let baseline_area = total_area(&baseline);
            if baseline.is_empty() {
                hidden_cases += 1;
            }

            for _ in 0..10 {
                occluders.shuffle(&mut rng);
                let shuffled = visible_fragments(&target, &occluders);
                assert_eq!(
                    shuffled.is_empty(),
                    baseline.is_empty(),
                    "order changed visibility for {occluders:?}"
                );
                assert!((total_area(&shuffled) - baseline_area).abs() < 1e-6);
            }
        }

        assert!(hidden_cases > 0, "grid never produced a fully hidden target");
    }

    #[test]
    fn test_occluder_order_does_not_change_outcome() {
        let mut rng = StdRng::seed_from_u64(0xface);
        let target = Rect::new(5.0, 5.0, 10.0, 10.0);

        for resolver in [OcclusionResolver::default(), OcclusionResolver::with_epsilon(0.0)] {
            let (mut kept, mut dropped) = (0, 0);

            for _ in 0..500 {
                let count = rng.gen_range(1..8);
                let mut occluders = random_occluders(&mut rng, count);
                let baseline = resolver.is_visible(&target, &occluders);
                if baseline {
                    kept += 1;
                } else {
                    dropped += 1;
                }

                for _ in 0..10 {
                    occluders.shuffle(&mut rng);
                    assert_eq!(
                        resolver.is_visible(&target, &occluders),
                        baseline,
                        "order changed visibility for {occluders:?} at {resolver:?}"
                    );
                }
            }

            assert!(kept > 0 && dropped > 0, "{resolver:?}: {kept} kept, {dropped} dropped");
        }
    }

    fn sorted(mut annotations: Vec<Annotation>) -> Vec<Annotation> {
        annotations.sort_by(|a, b| {
            a.layer
                .cmp(&b.layer)
                .then(a.rect.x.total_cmp(&b.rect.x))
                .then(a.rect.y.total_cmp(&b.rect.y))
                .then(a.rect.width.total_cmp(&b.rect.width))
                .then(a.rect.height.total_cmp(&b.rect.height))
        });
        annotations
    }

    #[test]
    fn test_resolve_is_order_independent_for_annotation_lists() {
        let mut rng = StdRng::seed_from_u64(42);
        let canvas = Size::new(30.0, 30.0);

        for resolver in [OcclusionResolver::default(), OcclusionResolver::with_epsilon(0.0)] {
            for _ in 0..200 {
                let rects = random_occluders(&mut rng, 8);
                let mut annotations: Vec<Annotation> = rects
                    .into_iter()
                    .map(|rect| Annotation::new(rng.gen_range(0..4), UiClass::File, rect))
                    .collect();

                let baseline = sorted(resolver.resolve(&annotations, canvas));
                for _ in 0..5 {
                    annotations.shuffle(&mut rng);
                    let shuffled = sorted(resolver.resolve(&annotations, canvas));
                    assert_eq!(baseline, shuffled);
                }
            }
        }
    }
}
