//! Axis-aligned bounding volumes and subtree framing.

use glam::Vec3;

use super::SceneTree;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning the two corners (in any order).
    #[must_use]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box from a centre point and per-axis half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Zero-volume box at a point.
    #[must_use]
    pub fn point(at: Vec3) -> Self {
        Self { min: at, max: at }
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the size along each axis.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Whether the point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Compute the bounding volume of every renderable node under `root`
/// (inclusive).
///
/// The walk is iterative. Only nodes that report renderable geometry
/// contribute: the first mesh initializes the volume and every later one is
/// unioned in. A subtree without geometry frames to a zero-extent volume at
/// the root's world position.
pub fn frame_subtree<T: SceneTree + ?Sized>(tree: &T, root: T::Node) -> Aabb {
    let mut stack = vec![root];
    let mut bounds: Option<Aabb> = None;
    let mut meshes = 0usize;

    while let Some(node) = stack.pop() {
        for mesh in tree.mesh_bounds(node) {
            bounds = Some(bounds.map_or(*mesh, |acc| acc.union(mesh)));
            meshes += 1;
        }
        stack.extend(tree.children(node).iter().rev().copied());
    }

    bounds.map_or_else(
        || {
            log::debug!("subtree has no renderable geometry");
            Aabb::point(tree.world_position(root))
        },
        |aabb| {
            log::debug!(
                "framed {meshes} meshes: center {:?}, half extents {:?}",
                aabb.center(),
                aabb.half_extents()
            );
            aabb
        },
    )
}
