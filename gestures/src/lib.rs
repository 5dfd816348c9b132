mod classifier;
mod landmarks;
mod snapshot;

pub use classifier::*;
pub use landmarks::*;
pub use snapshot::*;
