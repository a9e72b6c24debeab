//! Static octree over an immutable triangle array.
//!
//! The tree only stores indices; the triangles stay with the owning polygon
//! shape. Once built it is never mutated, and queries write into a
//! caller-owned [`QueryBuffer`], so any number of threads can query one tree
//! concurrently as long as each brings its own buffer.
//!
//! A triangle is stored in every leaf whose volume it touches, either by the
//! separating-axis test or by having a vertex inside the leaf. Query results
//! can therefore contain the same index more than once.

use serde::{Deserialize, Serialize};

use super::sat::tri_aabb_overlap;
use crate::{
    config::{OctreeConfig, SCRATCH_CAPACITY_FACTOR},
    core::{
        bounds::Aabb,
        triangle::Triangle,
        types::{Ray, Sphere},
    },
};

/// Growable output buffer for octree queries.
///
/// Each query clears it first. Growing past the nominal budget
/// (`SCRATCH_CAPACITY_FACTOR` × triangle count of the queried tree) is allowed
/// but reported once per buffer, since it points at pathological geometry.
#[derive(Debug, Clone, Default)]
pub struct QueryBuffer {
    indices: Vec<u32>,
    budget: usize,
    overflow_reported: bool,
}

impl QueryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Whether the last query went past the nominal budget of its tree.
    pub fn over_budget(&self) -> bool {
        self.indices.len() > self.budget
    }

    fn begin(&mut self, budget: usize) {
        self.indices.clear();
        self.budget = budget;
    }

    fn extend(&mut self, leaf: &[u32]) {
        self.indices.extend_from_slice(leaf);
        if self.indices.len() > self.budget && !self.overflow_reported {
            self.overflow_reported = true;
            log::warn!(
                "octree query produced {} indices, above the nominal budget of {}",
                self.indices.len(),
                self.budget
            );
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf(Vec<u32>),
    /// The eight children are stored contiguously from `first_child`.
    Branch { first_child: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OctreeNode {
    pub bounds: Aabb,
    pub kind: NodeKind,
}

impl OctreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
    triangle_count: usize,
    depth: u32,
}

struct BuildStats {
    depth: u32,
    leaf_entries: usize,
    forced_leaves: usize,
}

impl Octree {
    pub fn build(triangles: &[Triangle], config: &OctreeConfig) -> Self {
        let bounds = Aabb::from_triangles(triangles);
        let mut tree = Self {
            nodes: vec![OctreeNode {
                bounds,
                kind: NodeKind::Leaf(Vec::new()),
            }],
            triangle_count: triangles.len(),
            depth: 0,
        };

        let mut stats = BuildStats {
            depth: 0,
            leaf_entries: 0,
            forced_leaves: 0,
        };
        let all: Vec<u32> = (0..triangles.len() as u32).collect();
        tree.build_node(0, triangles, all, 0, config, &mut stats);
        tree.depth = stats.depth;

        if stats.forced_leaves > 0 {
            log::warn!(
                "octree depth limit {} reached: {} leaves hold more than {} triangles",
                config.max_depth,
                stats.forced_leaves,
                config.max_triangles_per_node
            );
        }
        log::debug!(
            "octree built: {} triangles, {} nodes, depth {}, {} leaf entries",
            tree.triangle_count,
            tree.nodes.len(),
            tree.depth,
            stats.leaf_entries
        );

        tree
    }

    fn build_node(
        &mut self,
        node: usize,
        triangles: &[Triangle],
        indices: Vec<u32>,
        depth: u32,
        config: &OctreeConfig,
        stats: &mut BuildStats,
    ) {
        stats.depth = stats.depth.max(depth);

        let over_capacity = indices.len() > config.max_triangles_per_node;
        if !over_capacity || depth >= config.max_depth {
            if over_capacity {
                stats.forced_leaves += 1;
            }
            stats.leaf_entries += indices.len();
            self.nodes[node].kind = NodeKind::Leaf(indices);
            return;
        }

        let parent_bounds = self.nodes[node].bounds;
        let first_child = self.nodes.len();
        self.nodes.extend((0..8).map(|octant| OctreeNode {
            bounds: parent_bounds.octant(octant),
            kind: NodeKind::Leaf(Vec::new()),
        }));
        self.nodes[node].kind = NodeKind::Branch {
            first_child: first_child as u32,
        };

        for child in first_child..first_child + 8 {
            let child_bounds = self.nodes[child].bounds;
            let child_indices: Vec<u32> = indices
                .iter()
                .copied()
                .filter(|&index| {
                    let vertices = triangles[index as usize].vertices();
                    tri_aabb_overlap(&child_bounds, vertices)
                        || vertices.iter().any(|&v| child_bounds.contains_point(v))
                })
                .collect();
            self.build_node(child, triangles, child_indices, depth + 1, config, stats);
        }
    }

    /// Collects the indices of every leaf the parametric range `[0, 1]` of
    /// `ray` passes through.
    pub fn trace_ray(&self, ray: &Ray, out: &mut QueryBuffer) {
        out.begin(self.scratch_budget());
        self.visit(0, &|bounds: &Aabb| bounds.intersects_ray(ray), out);
    }

    /// Collects the indices of every leaf the sphere reaches.
    pub fn sphere_candidates(&self, sphere: &Sphere, out: &mut QueryBuffer) {
        out.begin(self.scratch_budget());
        let radius_sq = sphere.radius * sphere.radius;
        self.visit(
            0,
            &|bounds: &Aabb| bounds.distance_squared(sphere.center) <= radius_sq,
            out,
        );
    }

    fn visit(&self, node: usize, accepts: &dyn Fn(&Aabb) -> bool, out: &mut QueryBuffer) {
        let current = &self.nodes[node];
        if !accepts(&current.bounds) {
            return;
        }
        match &current.kind {
            NodeKind::Leaf(indices) => out.extend(indices),
            NodeKind::Branch { first_child } => {
                let first = *first_child as usize;
                for child in first..first + 8 {
                    self.visit(child, accepts, out);
                }
            }
        }
    }

    pub fn scratch_budget(&self) -> usize {
        self.triangle_count * SCRATCH_CAPACITY_FACTOR
    }

    pub fn root(&self) -> &OctreeNode {
        &self.nodes[0]
    }

    pub fn bounds(&self) -> Aabb {
        self.nodes[0].bounds
    }

    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    pub fn children(&self, node: &OctreeNode) -> &[OctreeNode] {
        match node.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Branch { first_child } => {
                let first = first_child as usize;
                &self.nodes[first..first + 8]
            }
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = (&Aabb, &[u32])> + '_ {
        self.nodes.iter().filter_map(|node| match &node.kind {
            NodeKind::Leaf(indices) => Some((&node.bounds, indices.as_slice())),
            NodeKind::Branch { .. } => None,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }
}
