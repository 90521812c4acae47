//! Ordering Layer
//!
//! Fractional position keys for siblings inside a container:
//! - engine: key arithmetic and the too-close check
//! - reindex: evenly spaced renumbering of one container
//! - coordinator: create / reorder / move / copy entry points

mod coordinator;
mod engine;
mod reindex;


pub use coordinator::{Destination, MoveCoordinator};
pub use engine::PositionEngine;
pub use reindex::Reindexer;
