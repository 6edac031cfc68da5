use std::collections::HashMap;

use crate::error::Result;
use crate::math::intersect_2d::try_intersect;
use crate::math::{Point2, EPSILON};
use crate::store::{GeometryStore, PointId, ShapeId};

/// Options for [`slice_shape`].
#[derive(Debug, Clone, Copy)]
pub struct SliceOptions {
    /// Reuse the parent shape's point handles in the two result shapes.
    /// When `false`, every vertex is cloned into a fresh arena point, so
    /// later mutation of the parent cannot alias into the results.
    pub share_points: bool,
    /// Tolerance for intersection and deduplication tests.
    pub epsilon: f64,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            share_points: true,
            epsilon: EPSILON,
        }
    }
}

/// The two shapes produced by a successful slice.
#[derive(Debug, Clone, Copy)]
pub struct SliceResult {
    pub a: ShapeId,
    pub b: ShapeId,
}

/// A vertex of the enhanced ring: an existing stored point, or an
/// interior intersection point not yet materialized in the arena.
#[derive(Clone, Copy)]
struct RingVertex {
    id: Option<PointId>,
    pos: Point2,
}

/// Attempts to split a polygon into exactly two simple polygons along a
/// cutter segment.
///
/// The cutter endpoints need not be shape vertices. The slice succeeds
/// only when the cutter meets the boundary in exactly two distinct points
/// and both resulting rings keep at least three vertices; every ambiguous
/// configuration (0, 1 or 3+ intersections, coincident hits, degenerate
/// output) yields `Ok(None)` with the store untouched. The closing edge of
/// each result ring is the cut itself.
///
/// # Errors
///
/// Returns an error if `shape` is not present in the store.
pub fn slice_shape(
    store: &mut GeometryStore,
    shape: ShapeId,
    cutter_from: Point2,
    cutter_to: Point2,
    options: SliceOptions,
) -> Result<Option<SliceResult>> {
    let eps = options.epsilon;
    let ring: Vec<PointId> = store.shape(shape)?.points().to_vec();
    let n = ring.len();
    if n < 3 {
        return Ok(None);
    }
    let pos: Vec<Point2> = ring.iter().map(|&id| store.position(id)).collect();

    // Intersect the cutter with every edge. `t` is the parameter along the
    // edge, snapped to 0/1 so near-vertex hits become vertex hits.
    let mut hits: Vec<(usize, f64, Point2)> = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        let (a1, a2) = (pos[i], pos[j]);

        let Some(mut inter) = try_intersect(&a1, &a2, &cutter_from, &cutter_to, eps) else {
            continue;
        };

        let e = a2 - a1;
        let elen2 = e.dot(&e);
        let mut t = if elen2 > eps {
            (inter - a1).dot(&e) / elen2
        } else {
            0.0
        };

        if t.abs() <= eps {
            inter = a1;
            t = 0.0;
        } else if (t - 1.0).abs() <= eps {
            inter = a2;
            t = 1.0;
        }

        hits.push((i, t.clamp(0.0, 1.0), inter));
    }

    if hits.len() < 2 {
        return Ok(None);
    }

    // Deduplicate by position; collinear-overlap hits collapse here.
    let mut unique: Vec<(usize, f64, Point2)> = Vec::new();
    for hit in hits {
        let dup = unique.iter().any(|u| approx_pos(&u.2, &hit.2, eps));
        if !dup {
            unique.push(hit);
        }
    }

    // The slice is rejected, never approximated.
    if unique.len() != 2 {
        return Ok(None);
    }

    // Insert in increasing (edge index, t) order while walking the ring.
    unique.sort_by(|x, y| {
        x.0.cmp(&y.0)
            .then_with(|| x.1.partial_cmp(&y.1).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut enhanced: Vec<RingVertex> = Vec::with_capacity(n + 2);
    let mut idx_p: Option<usize> = None;
    let mut idx_q: Option<usize> = None;

    let mut next = 0;
    for i in 0..n {
        enhanced.push(RingVertex {
            id: Some(ring[i]),
            pos: pos[i],
        });

        while next < unique.len() && unique[next].0 == i {
            let (_, t, inter) = unique[next];

            if t > eps && t < 1.0 - eps {
                // Interior hit: a brand new ring vertex.
                record(&mut idx_p, &mut idx_q, enhanced.len());
                enhanced.push(RingVertex {
                    id: None,
                    pos: inter,
                });
            } else {
                // Vertex hit: map to the existing vertex's ring index. For
                // t == 1 the target vertex is pushed on the next loop turn,
                // so its index is the current length (or 0 on wrap-around).
                let vidx = if t <= eps {
                    enhanced.len() - 1
                } else if (i + 1) % n == 0 {
                    0
                } else {
                    enhanced.len()
                };
                record(&mut idx_p, &mut idx_q, vidx);
            }

            next += 1;
        }
    }

    let (Some(p), Some(q)) = (idx_p, idx_q) else {
        return Ok(None);
    };
    if p == q {
        return Ok(None);
    }

    // Walk forward P->Q inclusive and Q->P inclusive. Each constructor
    // closes the loop back to its first point, which becomes the cut edge.
    let path_a = collect_path(&enhanced, p, q, eps);
    let path_b = collect_path(&enhanced, q, p, eps);

    if path_a.len() < 3 || path_b.len() < 3 {
        return Ok(None);
    }

    // Materialize only after the slice is known to succeed, so rejected
    // slices never leave orphan points behind. One interior intersection
    // point is shared by both halves when sharing is on.
    let mut memo: HashMap<usize, PointId> = HashMap::new();
    let mut resolve = |store: &mut GeometryStore, k: usize| -> PointId {
        match enhanced[k].id {
            Some(id) if options.share_points => id,
            _ if options.share_points => *memo
                .entry(k)
                .or_insert_with(|| store.add_point(enhanced[k].pos)),
            _ => store.add_point(enhanced[k].pos),
        }
    };

    let ids_a: Vec<PointId> = path_a.iter().map(|&k| resolve(store, k)).collect();
    let ids_b: Vec<PointId> = path_b.iter().map(|&k| resolve(store, k)).collect();

    Ok(Some(SliceResult {
        a: store.add_shape(ids_a),
        b: store.add_shape(ids_b),
    }))
}

/// Records an enhanced-ring index into the first free of the two slots.
fn record(slot_p: &mut Option<usize>, slot_q: &mut Option<usize>, idx: usize) {
    if slot_p.is_none() {
        *slot_p = Some(idx);
    } else if slot_q.is_none() {
        *slot_q = Some(idx);
    }
}

fn approx_pos(a: &Point2, b: &Point2, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

/// Forward walk of the enhanced ring from `start` to `end` inclusive,
/// returning ring indices with consecutive epsilon-duplicates removed.
fn collect_path(ring: &[RingVertex], start: usize, end: usize, epsilon: f64) -> Vec<usize> {
    let n = ring.len();
    let mut res = vec![start];
    let mut i = start;
    while i != end {
        i = (i + 1) % n;
        res.push(i);
    }

    let mut k = res.len();
    while k >= 2 {
        k -= 1;
        if approx_pos(&ring[res[k - 1]].pos, &ring[res[k]].pos, epsilon) {
            res.remove(k);
        }
    }
    res
}
