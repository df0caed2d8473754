//! Builds simulation chains from the unordered bone set of a skinned skeleton.

use std::collections::HashSet;

use crate::{
    core::{
        particle::{Chain, Particle},
        skeleton::Skeleton,
    },
    error::{Result, SetupError},
    utils::allocator::NodeId,
};

/// Discovers one linear chain per root of `nodes`.
///
/// A member is a root when its parent is missing or not a member. From each root the walk
/// follows the first member child until none is left; sibling members are not visited. Chains
/// shorter than [`Chain::MIN_LEN`] are dropped. Stale handles are ignored.
pub fn discover_chains(skeleton: &Skeleton, nodes: &[NodeId]) -> Result<Vec<Chain>> {
    let members: HashSet<NodeId> = nodes
        .iter()
        .copied()
        .filter(|id| skeleton.contains(*id))
        .collect();
    if members.is_empty() {
        return Err(SetupError::NoNodes);
    }

    let mut visited_roots = HashSet::new();
    let mut chains = Vec::new();
    for &node in nodes {
        if !members.contains(&node) || !visited_roots.insert(node) {
            continue;
        }
        let is_root = skeleton
            .parent(node)
            .map_or(true, |parent| !members.contains(&parent));
        if !is_root {
            continue;
        }
        if let Some(chain) = walk_chain(skeleton, &members, node) {
            chains.push(chain);
        }
    }

    if chains.is_empty() {
        return Err(SetupError::NoValidChains);
    }
    log::debug!(
        "discovered {} chain(s) from {} member node(s)",
        chains.len(),
        members.len()
    );
    Ok(chains)
}

fn walk_chain(skeleton: &Skeleton, members: &HashSet<NodeId>, root: NodeId) -> Option<Chain> {
    let mut particles = Vec::new();
    let mut current = Some(root);

    while let Some(id) = current {
        let node = skeleton.node(id)?;
        let position = node.world().position;
        particles.push(if particles.is_empty() {
            Particle::root(id, position)
        } else {
            Particle::link(id, position, node.local().position)
        });

        current = node
            .children()
            .iter()
            .copied()
            .find(|child| members.contains(child));
    }

    Chain::new(particles)
}
