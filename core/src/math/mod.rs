pub mod delaunay;
pub mod geometry;

pub use delaunay::{Triangle, Triangulation};
pub use geometry::Vec2;
