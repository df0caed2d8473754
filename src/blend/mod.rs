//! Animation/physics blending: authority seams, pose snapshots, and the blend state machine.

pub mod authority;
pub mod controller;
pub mod pose;

pub use authority::{AnimationAuthority, NoopAnimation, NoopPhysics, PhysicsAuthority, TriggerId};
pub use controller::{BlendController, BlendState};
pub use pose::{interpolate, BoneSnapshot};
