use bevy_ecs::resource::Resource;
use glam::Vec3;
use vitrine_core::transform::{GlobalTransform, Transform};

use crate::geometry::{GeometryHandle, GeometryStore};
use crate::material::MaterialId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: Option<&'static str>,
    pub transform: Transform,
    pub global: GlobalTransform,
    pub geometry: Option<GeometryHandle>,
    pub material: Option<MaterialId>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SceneNode {
    pub fn empty(transform: Transform) -> Self {
        Self {
            name: None,
            transform,
            global: GlobalTransform::default(),
            geometry: None,
            material: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(transform: Transform, geometry: GeometryHandle, material: MaterialId) -> Self {
        Self {
            geometry: Some(geometry),
            material: Some(material),
            ..Self::empty(transform)
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }
}

/// Arena-backed transform tree. Children are always spawned after
/// their parent, so indices increase strictly from root to leaf: the
/// structure is a tree by construction and propagation is one forward
/// pass, no recursion, no cycle checks at runtime.
#[derive(Resource)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        let root = SceneNode::empty(Transform::default()).named("root");
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }
}

impl SceneGraph {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn spawn(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "parent must exist");
        node.parent = Some(parent);
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == Some(name))
            .map(NodeId)
    }

    /// Recomputes every cached world matrix, parents before children.
    /// Spawn order guarantees parent index < child index, so a single
    /// forward pass is enough.
    pub fn propagate_transforms(&mut self) {
        for i in 0..self.nodes.len() {
            let local = self.nodes[i].transform.compute_matrix();
            let global = match self.nodes[i].parent {
                Some(parent) => self.nodes[parent.0].global.0 * local,
                None => local,
            };
            self.nodes[i].global = GlobalTransform(global);
        }
    }

    /// Preorder walk of one subtree.
    pub fn visit(&self, from: NodeId, f: &mut impl FnMut(NodeId, &SceneNode)) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            f(id, node);
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
    }

    /// World-space bounding box of a subtree's geometry. Requires a
    /// prior `propagate_transforms`; used to register hover regions.
    pub fn subtree_bounds(
        &self,
        from: NodeId,
        geometries: &GeometryStore,
    ) -> Option<(Vec3, Vec3)> {
        let mut merged: Option<(Vec3, Vec3)> = None;
        self.visit(from, &mut |_, node| {
            let Some(handle) = node.geometry else { return };
            let Some((lmin, lmax)) = geometries.get(handle).bounds() else {
                return;
            };
            // Transform all eight corners; axis-aligned again in world.
            for ix in 0..8 {
                let corner = Vec3::new(
                    if ix & 1 == 0 { lmin.x } else { lmax.x },
                    if ix & 2 == 0 { lmin.y } else { lmax.y },
                    if ix & 4 == 0 { lmin.z } else { lmax.z },
                );
                let world = node.global.transform_point(corner);
                merged = Some(match merged {
                    Some((min, max)) => (min.min(world), max.max(world)),
                    None => (world, world),
                });
            }
        });
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cuboid;
    use std::collections::HashSet;

    #[test]
    fn propagation_composes_parent_then_child() {
        let mut graph = SceneGraph::default();
        let parent = graph.spawn(
            graph.root(),
            SceneNode::empty(Transform::from_xyz(1.0, 0.0, 0.0).with_scale(2.0)),
        );
        let child = graph.spawn(parent, SceneNode::empty(Transform::from_xyz(1.0, 0.0, 0.0)));
        graph.propagate_transforms();

        // Child local x=1 is scaled by the parent's 2 and offset by 1.
        let world = graph.node(child).global.translation();
        assert!((world - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn visit_reaches_every_node_exactly_once() {
        let mut graph = SceneGraph::default();
        let a = graph.spawn(graph.root(), SceneNode::empty(Transform::default()));
        let b = graph.spawn(a, SceneNode::empty(Transform::default()));
        graph.spawn(b, SceneNode::empty(Transform::default()));
        graph.spawn(a, SceneNode::empty(Transform::default()));

        let mut seen = HashSet::new();
        graph.visit(graph.root(), &mut |id, _| {
            assert!(seen.insert(id), "node visited twice");
        });
        assert_eq!(seen.len(), graph.len());
    }

    #[test]
    fn subtree_bounds_follow_the_world_transform() {
        let mut graph = SceneGraph::default();
        let mut store = GeometryStore::default();
        let unit = store.add(cuboid(1.0, 1.0, 1.0));

        let part = graph.spawn(
            graph.root(),
            SceneNode::empty(Transform::from_xyz(10.0, 0.0, 0.0)),
        );
        graph.spawn(part, SceneNode::mesh(Transform::default(), unit, MaterialId(0)));
        graph.propagate_transforms();

        let (min, max) = graph.subtree_bounds(part, &store).unwrap();
        assert!((min - Vec3::new(9.5, -0.5, -0.5)).length() < 1e-6);
        assert!((max - Vec3::new(10.5, 0.5, 0.5)).length() < 1e-6);
    }
}
