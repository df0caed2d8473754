//! Utility helpers: generational handles and logging.

pub mod allocator;
pub mod logging;

pub use allocator::{Arena, ArenaKey, EntityId, GenerationalId, NodeId};
pub use logging::{Diagnostics, ScopedTimer};
