//! Scene contracts consumed by the camera.
//!
//! The viewer does not own a scene graph; it only needs to walk a subtree
//! and read the world-space bounds of renderable meshes. [`SceneTree`] is
//! that contract. [`SceneGraph`] is a minimal arena implementation used by
//! the standalone viewer and the tests.

/// Axis-aligned bounds and subtree framing.
pub mod bounds;

use glam::Vec3;

pub use self::bounds::{frame_subtree, Aabb};

/// Read-only view of a hierarchy with renderable geometry.
pub trait SceneTree {
    /// Node handle.
    type Node: Copy;

    /// Direct children of `node`.
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// World-space bounds of the meshes attached to `node`. Empty when the
    /// node has no renderable geometry.
    fn mesh_bounds(&self, node: Self::Node) -> &[Aabb];

    /// World-space position of `node`.
    fn world_position(&self, node: Self::Node) -> Vec3;
}

/// Handle into a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

#[derive(Debug, Clone)]
struct Node {
    name: String,
    position: Vec3,
    children: Vec<NodeId>,
    meshes: Vec<Aabb>,
}

/// Arena-backed scene hierarchy with a single root at the origin.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a scene containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "root".into(),
                position: Vec3::ZERO,
                children: Vec::new(),
                meshes: Vec::new(),
            }],
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a child node at a world position.
    pub fn add_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        position: Vec3,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.into(),
            position,
            children: Vec::new(),
            meshes: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Attach a mesh with the given world-space bounds to `node`.
    pub fn add_mesh(&mut self, node: NodeId, bounds: Aabb) {
        self.nodes[node.0 as usize].meshes.push(bounds);
    }

    /// Node name.
    #[must_use]
    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0 as usize].name
    }

    /// Find the first node with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    /// Every mesh bound in the scene, in insertion order per node.
    pub fn meshes(&self) -> impl Iterator<Item = &Aabb> {
        self.nodes.iter().flat_map(|n| n.meshes.iter())
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root always exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SceneTree for SceneGraph {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0 as usize].children
    }

    fn mesh_bounds(&self, node: NodeId) -> &[Aabb] {
        &self.nodes[node.0 as usize].meshes
    }

    fn world_position(&self, node: NodeId) -> Vec3 {
        self.nodes[node.0 as usize].position
    }
}
