//! Scene graph of skeletal nodes.
//!
//! Nodes live in a generational arena and refer to each other by [`NodeId`]. Every node keeps
//! its local transform and a cached world transform. Writing a node's world pose rewrites its
//! local transform and carries all descendants along, the way a host scene graph behaves when
//! the animation system, the physics system, or this crate moves a bone.

use glam::{Quat, Vec3};

use super::types::{Pose, Transform};
use crate::utils::allocator::{Arena, NodeId};

/// A single bone of a skinned skeleton.
#[derive(Debug, Clone)]
pub struct SkeletalNode {
    pub name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Transform,
    world: Transform,
}

impl SkeletalNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn local(&self) -> &Transform {
        &self.local
    }

    pub fn world(&self) -> &Transform {
        &self.world
    }
}

/// Arena-backed node hierarchy shared by the host and the rig components.
#[derive(Clone, Default)]
pub struct Skeleton {
    nodes: Arena<SkeletalNode, NodeId>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under `parent` (or as a scene root) with the given local transform.
    ///
    /// A stale parent handle makes the node a scene root.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Transform,
    ) -> NodeId {
        let parent = parent.filter(|id| self.nodes.contains(*id));
        let world = match parent.and_then(|id| self.nodes.get(id)) {
            Some(parent_node) => parent_node.world.combine(&local),
            None => local,
        };

        let id = self.nodes.insert(SkeletalNode {
            name: name.into(),
            parent,
            children: Vec::new(),
            local,
            world,
        });

        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent_node.children.push(id);
        }
        id
    }

    /// Removes a node and its whole subtree. Handles into the subtree become stale.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes.get(id).map(|node| node.parent) else {
            return false;
        };
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.nodes.remove(current) {
                stack.extend(removed.children);
            }
        }
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&SkeletalNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn world(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(id).map(|node| node.world)
    }

    pub fn local(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(id).map(|node| node.local)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id).map(|node| node.world.position)
    }

    pub fn world_pose(&self, id: NodeId) -> Option<Pose> {
        self.nodes.get(id).map(|node| node.world.pose())
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.ids()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replaces the local transform and refreshes the world transforms of the subtree.
    pub fn set_local(&mut self, id: NodeId, local: Transform) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.local = local;
        self.refresh_subtree(id);
        true
    }

    /// Moves a node to `position` in world space, keeping its world orientation.
    pub fn set_world_position(&mut self, id: NodeId, position: Vec3) -> bool {
        let Some(mut world) = self.world(id) else {
            return false;
        };
        world.position = position;
        self.set_world(id, world)
    }

    /// Writes a world pose (position and orientation), keeping the node's world scale.
    pub fn set_world_pose(&mut self, id: NodeId, pose: Pose) -> bool {
        let Some(mut world) = self.world(id) else {
            return false;
        };
        world.position = pose.position;
        world.rotation = pose.rotation;
        self.set_world(id, world)
    }

    pub fn set_world_rotation(&mut self, id: NodeId, rotation: Quat) -> bool {
        let Some(mut world) = self.world(id) else {
            return false;
        };
        world.rotation = rotation;
        self.set_world(id, world)
    }

    /// Writes a full world transform. Descendants keep their local transforms and move along.
    pub fn set_world(&mut self, id: NodeId, world: Transform) -> bool {
        let parent_world = match self.parent(id) {
            Some(parent) => self.world(parent),
            None => None,
        };
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.local = match parent_world {
            Some(parent_world) => parent_world.relative(&world),
            None => world,
        };
        node.world = world;

        let children = node.children.clone();
        for child in children {
            self.refresh_subtree(child);
        }
        true
    }

    fn refresh_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let parent_world = self
                .parent(id)
                .and_then(|parent| self.world(parent));
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.world = match parent_world {
                Some(parent_world) => parent_world.combine(&node.local),
                None => node.local,
            };
            stack.extend(node.children.iter().copied());
        }
    }
}
