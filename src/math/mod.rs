//! Small fixed-size linear algebra used by the projection pipeline.
//!
//! Everything here is a `Copy` value type. Matrices are row-major and act on
//! column vectors on the right: `m * v`.

pub mod mat3;
pub mod vec2;
pub mod vec3;

pub use mat3::Mat3;
pub use vec2::Vec2;
pub use vec3::Vec3;
