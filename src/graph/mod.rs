pub mod kmeans;
pub mod union_find;

use std::collections::{HashMap, HashSet};

use crate::math::Point2;
use crate::store::{GeometryStore, PointId, ShapeId};

use kmeans::{kmeans_weighted, weighted_silhouette};
use union_find::UnionFind;

/// A closeness-merge representative: a stored point plus the number of
/// original points it absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// The representative point.
    pub point: PointId,
    /// How many merged points this node stands for.
    pub volume: u32,
}

/// An unordered bag of nodes produced by [`Graph::group_nodes`].
#[derive(Debug, Clone, Default)]
pub struct NodeGroup {
    nodes: Vec<Node>,
}

impl NodeGroup {
    /// Read-only view of the member nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// Orchestrates a collection of shapes: merges spatially close vertices
/// into representative [`Node`]s and groups those nodes into
/// [`NodeGroup`]s.
///
/// Both operations mutate the graph in place and return `&mut Self`, so
/// they chain: `graph.combine_closeness(&mut store, 1.0).group_nodes(&store)`.
/// Grouping operates on the nodes produced by the most recent merge, so
/// [`Graph::combine_closeness`] must run first.
#[derive(Debug, Default)]
pub struct Graph {
    shapes: Vec<ShapeId>,
    nodes: Vec<Node>,
    groups: Vec<NodeGroup>,
}

impl Graph {
    /// Creates a graph over the given shapes.
    #[must_use]
    pub fn new(shapes: Vec<ShapeId>) -> Self {
        Self {
            shapes,
            nodes: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Read-only ordered view of the member shapes.
    #[must_use]
    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    /// Read-only view of the merge representatives.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Read-only view of the node groups.
    #[must_use]
    pub fn groups(&self) -> &[NodeGroup] {
        &self.groups
    }

    /// Merges vertices that sit within `epsilon` of each other into
    /// representative nodes, and rewires every member shape onto the
    /// representatives.
    ///
    /// Uniqueness is by handle: two coordinate-equal but distinct arena
    /// points are separate entries here, and only the epsilon union-find
    /// pass may merge them. Closeness is transitive — a chain of points
    /// each within `epsilon` of the next collapses into one component even
    /// when its ends are far apart. The component representative is the
    /// earliest member in first-appearance order, so geometry never moves.
    ///
    /// A representative produced by an earlier merge carries its volume
    /// into the next one, which makes re-running the merge on an unchanged
    /// graph a no-op. Dangling shape ids are skipped.
    pub fn combine_closeness(&mut self, store: &mut GeometryStore, epsilon: f64) -> &mut Self {
        // Unique point handles across all shapes, in first-appearance order.
        let mut unique: Vec<PointId> = Vec::new();
        let mut seen: HashSet<PointId> = HashSet::new();

        for &shape_id in &self.shapes {
            let Ok(shape) = store.shape(shape_id) else {
                continue;
            };
            for &pid in shape.points() {
                if seen.insert(pid) {
                    unique.push(pid);
                }
            }
        }

        let n = unique.len();
        if n == 0 {
            self.nodes.clear();
            return self;
        }

        let prior: HashMap<PointId, u32> = self
            .nodes
            .iter()
            .map(|node| (node.point, node.volume))
            .collect();

        let positions: Vec<Point2> = unique.iter().map(|&id| store.position(id)).collect();

        let mut uf = UnionFind::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if (positions[i] - positions[j]).norm() < epsilon {
                    uf.union(i, j);
                }
            }
        }

        // Components in first-appearance order of their earliest member.
        let mut component_of_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for i in 0..n {
            let root = uf.find(i);
            let c = *component_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[c].push(i);
        }

        self.nodes.clear();
        let mut rep_map: HashMap<PointId, PointId> = HashMap::new();

        for members in &components {
            // The earliest member is the representative; it carries its
            // prior volume forward, fresh points count once.
            let rep = unique[members[0]];
            let volume: u32 = members
                .iter()
                .map(|&i| prior.get(&unique[i]).copied().unwrap_or(1))
                .sum();

            for &i in members {
                rep_map.insert(unique[i], rep);
            }

            self.nodes.push(Node { point: rep, volume });
        }

        // Rewire every member shape; arena entries of unrelated shapes are
        // untouched. Consecutive duplicates after the remap are kept.
        for &shape_id in &self.shapes {
            if let Ok(shape) = store.shape_mut(shape_id) {
                shape.remap_points(&rep_map);
            }
        }

        self
    }

    /// Partitions the current nodes into groups with weighted k-means,
    /// selecting the cluster count by weighted silhouette score.
    ///
    /// Tiny inputs shortcut the search: no nodes means no groups, one node
    /// (or all nodes coincident) a single group, two separated nodes two
    /// singleton groups. Otherwise `k` is searched in `2..=min(8, n)` and
    /// near-tied scores go to the smaller `k`. Deterministic for unchanged
    /// nodes.
    pub fn group_nodes(&mut self, store: &GeometryStore) -> &mut Self {
        let n = self.nodes.len();

        if n == 0 {
            self.groups.clear();
            return self;
        }
        if n == 1 {
            self.groups = vec![NodeGroup {
                nodes: vec![self.nodes[0]],
            }];
            return self;
        }

        let pts: Vec<Point2> = self
            .nodes
            .iter()
            .map(|node| store.position(node.point))
            .collect();
        let wts: Vec<f64> = self
            .nodes
            .iter()
            .map(|node| f64::from(node.volume.max(1)))
            .collect();

        let k = if n == 2 {
            if (pts[0] - pts[1]).norm() <= 1e-5 {
                1
            } else {
                2
            }
        } else if pts[1..]
            .iter()
            .all(|p| (p - pts[0]).norm_squared() <= 1e-12)
        {
            1
        } else {
            let max_k = 8.min(n);
            let mut best_score = f64::NEG_INFINITY;
            let mut best_k = 1;

            for kk in 2..=max_k {
                let mut centers = vec![Point2::origin(); kk];
                let mut assign = vec![0; n];
                kmeans_weighted(&pts, &wts, 50, &mut centers, &mut assign);
                let score = weighted_silhouette(&pts, &wts, kk, &assign);

                if score > best_score + 1e-6
                    || ((score - best_score).abs() <= 1e-6 && kk < best_k)
                {
                    best_score = score;
                    best_k = kk;
                }
            }

            best_k
        };

        // Definitive run at the chosen k.
        let mut centers = vec![Point2::origin(); k];
        let mut assign = vec![0; n];
        kmeans_weighted(&pts, &wts, 50, &mut centers, &mut assign);

        let mut buckets: Vec<Vec<Node>> = vec![Vec::new(); k];
        for (i, node) in self.nodes.iter().enumerate() {
            // Out-of-range assignments fall back to the first group.
            let g = if assign[i] < k { assign[i] } else { 0 };
            buckets[g].push(*node);
        }

        self.groups = buckets
            .into_iter()
            .map(|nodes| NodeGroup { nodes })
            .collect();

        self
    }
}
