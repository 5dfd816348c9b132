mod replay;
mod scene;

pub use replay::*;
pub use scene::*;
