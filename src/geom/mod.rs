mod core;

pub use core::{BBox, Tolerance, Vec3};
