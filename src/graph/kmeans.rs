//! Weighted k-means and silhouette scoring over 2D points.
//!
//! Every phase is a free function taking its arrays explicitly, so each
//! one (seeding, assignment, center update, empty-cluster repair) can be
//! exercised in isolation. All phases are deterministic: ties break to
//! the first occurrence or the lower index, never on external state.

use crate::math::{Point2, Vector2};

/// Deterministic farthest-first seeding.
///
/// The first center is the heaviest point (first occurrence on ties);
/// each subsequent center is the point with the largest squared distance
/// to its nearest already-chosen center.
pub fn seed_farthest_first(points: &[Point2], weights: &[f64], centers: &mut [Point2]) {
    let n = points.len();
    if n == 0 || centers.is_empty() {
        return;
    }

    let mut first = 0;
    let mut best_w = -1.0;
    for (i, &w) in weights.iter().enumerate() {
        if w > best_w {
            best_w = w;
            first = i;
        }
    }
    centers[0] = points[first];

    let mut min_dist2: Vec<f64> = points
        .iter()
        .map(|p| (p - centers[0]).norm_squared())
        .collect();

    for m in 1..centers.len() {
        let mut idx = 0;
        let mut best = -1.0;
        for (i, &d2) in min_dist2.iter().enumerate() {
            if d2 > best {
                best = d2;
                idx = i;
            }
        }
        centers[m] = points[idx];

        for (i, p) in points.iter().enumerate() {
            let d2 = (p - centers[m]).norm_squared();
            if d2 < min_dist2[i] {
                min_dist2[i] = d2;
            }
        }
    }
}

/// Assigns every point to its nearest center by squared distance, ties to
/// the lower-indexed center. Returns whether any assignment changed.
pub fn assign_all(points: &[Point2], centers: &[Point2], assign: &mut [usize]) -> bool {
    let mut any = false;

    for (i, p) in points.iter().enumerate() {
        let mut best_idx = 0;
        let mut best_d2 = (p - centers[0]).norm_squared();

        for (m, c) in centers.iter().enumerate().skip(1) {
            let d2 = (p - c).norm_squared();
            if d2 < best_d2 {
                best_d2 = d2;
                best_idx = m;
            }
        }

        if assign[i] != best_idx {
            assign[i] = best_idx;
            any = true;
        }
    }

    any
}

/// Moves each center to the weighted centroid of its assigned points.
/// Centers of zero-weight clusters stay put. Returns whether any center
/// moved by more than `1e-12` squared.
pub fn update_centers(
    points: &[Point2],
    weights: &[f64],
    centers: &mut [Point2],
    assign: &[usize],
) -> bool {
    let k = centers.len();
    let mut sum = vec![Vector2::zeros(); k];
    let mut sw = vec![0.0; k];

    for (i, p) in points.iter().enumerate() {
        let g = assign[i];
        let w = weights[i];
        sum[g] += p.coords * w;
        sw[g] += w;
    }

    let mut changed = false;
    for m in 0..k {
        if sw[m] <= 0.0 {
            continue;
        }
        let new_c = Point2::from(sum[m] / sw[m]);
        if (new_c - centers[m]).norm_squared() > 1e-12 {
            centers[m] = new_c;
            changed = true;
        }
    }

    changed
}

/// Reseeds every zero-weight cluster to the point farthest from its
/// nearest *other* center, and force-assigns that point so the cluster
/// has mass again.
pub fn repair_empty_clusters(
    points: &[Point2],
    weights: &[f64],
    centers: &mut [Point2],
    assign: &mut [usize],
) {
    let k = centers.len();
    let mut sw = vec![0.0; k];
    for (i, &g) in assign.iter().enumerate() {
        sw[g] += weights[i];
    }

    for m in 0..k {
        if sw[m] > 0.0 {
            continue;
        }

        let mut idx = 0;
        let mut best = -1.0;
        for (i, p) in points.iter().enumerate() {
            let mut d2 = f64::INFINITY;
            for (j, c) in centers.iter().enumerate() {
                if j != m {
                    d2 = d2.min((p - c).norm_squared());
                }
            }
            if d2 > best {
                best = d2;
                idx = i;
            }
        }

        centers[m] = points[idx];
        assign[idx] = m;
    }
}

/// Runs weighted k-means: farthest-first seeding, then up to `max_iters`
/// rounds of centroid update and reassignment, stopping early once
/// neither changes. Empty clusters are repaired after every round.
pub fn kmeans_weighted(
    points: &[Point2],
    weights: &[f64],
    max_iters: usize,
    centers: &mut [Point2],
    assign: &mut [usize],
) {
    seed_farthest_first(points, weights, centers);
    assign_all(points, centers, assign);

    for _ in 0..max_iters {
        let moved = update_centers(points, weights, centers, assign);
        let reassigned = assign_all(points, centers, assign);

        if !moved && !reassigned {
            break;
        }

        repair_empty_clusters(points, weights, centers, assign);
    }
}

/// Weighted silhouette coefficient of a partition into `k` clusters.
///
/// `a(i)` is the weighted mean distance to the other members of `i`'s own
/// cluster, `b(i)` the minimum over other clusters of the weighted mean
/// distance to that cluster, `s(i) = (b - a) / max(a, b)` (0 when both
/// vanish). The overall score is the weight-weighted mean of `s(i)`; any
/// empty cluster scores the partition at -1.
#[must_use]
pub fn weighted_silhouette(points: &[Point2], weights: &[f64], k: usize, assign: &[usize]) -> f64 {
    let n = points.len();
    let mut clusters: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (i, &g) in assign.iter().enumerate() {
        clusters[g].push(i);
    }

    if clusters.iter().any(Vec::is_empty) {
        return -1.0;
    }

    let mut total_w: f64 = weights.iter().sum();
    if total_w <= 0.0 {
        total_w = 1.0;
    }

    let mut acc = 0.0;

    for i in 0..n {
        let gi = assign[i];

        let mut sw_own = 0.0;
        let mut sum_own = 0.0;
        for &j in &clusters[gi] {
            if j == i {
                continue;
            }
            let wj = weights[j];
            sum_own += (points[i] - points[j]).norm() * wj;
            sw_own += wj;
        }
        let a = if sw_own > 0.0 { sum_own / sw_own } else { 0.0 };

        let mut b = f64::INFINITY;
        for (m, cluster) in clusters.iter().enumerate() {
            if m == gi {
                continue;
            }
            let mut sw = 0.0;
            let mut sum = 0.0;
            for &j in cluster {
                let wj = weights[j];
                sum += (points[i] - points[j]).norm() * wj;
                sw += wj;
            }
            if sw > 0.0 {
                b = b.min(sum / sw);
            }
        }
        if b.is_infinite() {
            b = 0.0;
        }

        let denom = a.max(b);
        let s = if denom > 0.0 { (b - a) / denom } else { 0.0 };

        acc += s * weights[i];
    }

    acc / total_w
}
