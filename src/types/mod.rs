//! Geometric, color and version primitives shared by the DXF and PDF paths

pub mod bounds;
pub mod color;
pub mod vector;
pub mod version;

pub use bounds::{BoundingBox2D, BoundsAccumulator};
pub use color::{ColorCategory, Rgb};
pub use vector::{Vector2, Vector3};
pub use version::DxfVersion;
