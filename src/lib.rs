pub mod error;
pub mod graph;
pub mod math;
pub mod operations;
pub mod store;

pub use error::{PolygraphError, Result};
