pub mod slice;

pub use slice::{slice_shape, SliceOptions, SliceResult};
