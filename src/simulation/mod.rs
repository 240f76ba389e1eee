mod collision;
mod geometry;
mod particles;
mod physics;
mod session;
mod settings;
mod terrain;

pub use collision::*;
pub use geometry::*;
pub use particles::*;
pub use physics::*;
pub use session::*;
pub use settings::*;
pub use terrain::*;
