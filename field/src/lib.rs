mod forces;
mod shapes;
mod simulation;
mod theme;

pub use forces::*;
pub use shapes::*;
pub use simulation::*;
pub use theme::*;
