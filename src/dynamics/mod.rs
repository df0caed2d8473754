//! Spring chain dynamics: hierarchy discovery and per-frame Verlet integration.

pub mod discovery;
pub mod spring_chain;

pub use discovery::discover_chains;
pub use spring_chain::SpringChainSimulator;
