//! Recombining binomial lattice: node (i, j) is the state after `i` moves,
//! `j` of them down. Paths with equal move counts share a node.

pub mod builder;
pub mod params;
pub mod summary;

pub use builder::{build_lattice, Lattice, LatticeLevel, Node, TerminalDistribution};
pub use params::{ModelParameters, MoveSpec, MAX_STEPS};
pub use summary::{describe_lattice, LatticeOutput};
