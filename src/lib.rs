//! Rig Dynamics – runtime spring chains and animation/physics blending for skeletal rigs.
//!
//! The crate post-processes a skeleton after the host's animation and physics systems have
//! written it for the frame: spring chains give secondary motion to terminal bone chains such
//! as hair, and blend controllers cross-fade a body between animated and rigid-body pose.

pub mod blend;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::{Quat, Vec3};

pub use blend::{
    authority::{AnimationAuthority, NoopAnimation, NoopPhysics, PhysicsAuthority, TriggerId},
    controller::{BlendController, BlendState},
    pose::{interpolate, BoneSnapshot},
};
pub use config::{BlendConfig, SpringChainConfig};
pub use crate::core::{
    particle::{Chain, Particle},
    skeleton::{SkeletalNode, Skeleton},
    types::{Pose, Transform},
};
pub use dynamics::{discovery::discover_chains, spring_chain::SpringChainSimulator};
pub use error::SetupError;
pub use utils::allocator::{Arena, EntityId, NodeId};
pub use world::{Rig, RigWorld};
