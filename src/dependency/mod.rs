mod graph;
mod strategy;
mod weights;

pub use graph::*;
pub use strategy::*;
pub use weights::*;
