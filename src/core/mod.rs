//! Core types describing skeletal nodes, transforms, and simulation particles.

pub mod particle;
pub mod skeleton;
pub mod types;

pub use particle::{Chain, Particle};
pub use skeleton::{SkeletalNode, Skeleton};
pub use types::{Pose, Transform};
