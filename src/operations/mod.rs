mod build_level;
mod extrude_prism;
mod wall_ribbon;

pub use build_level::{BuildLevel, LevelParams};
pub use extrude_prism::ExtrudePrism;
pub use wall_ribbon::WallRibbon;
