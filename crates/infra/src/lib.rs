//! Infrastructure layer: dispatch routing, projections, replay.

pub mod projections;
pub mod read_model;
pub mod replay;
pub mod router;


pub use read_model::{InMemoryReadModelStore, ReadModelStore};
pub use replay::{Replayer, ReplayReport};
pub use router::Router;
