pub mod affine;
pub mod vector;

pub use affine::{invert_rotation, rotate_affine_int, rotate_bbox_int, rotate_pos, AffineMat2};
pub use vector::{BoundingBox, Vec2};
