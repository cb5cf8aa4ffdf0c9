//! Object space to screen space projection.
//!
//! The projector rotates every mesh vertex by the view rotation, scales it by
//! `scale_factor / depth`, offsets it by the mesh's camera-relative position
//! and drops `z`.
//!
//! With the default [`DepthStrategy::SinglePoint`] the depth divisor is the
//! camera-relative depth of the mesh origin, shared by every vertex of the
//! instance. This is a single-point perspective approximation: a mesh shrinks
//! as it moves away, but its own vertices are not foreshortened relative to
//! each other. [`DepthStrategy::PerVertex`] divides each vertex by its own
//! depth instead.

use thiserror::Error;

use crate::math::{Mat3, Vec2, Vec3};
use crate::mesh::Mesh;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    #[error("camera-relative depth is {0}; the camera lies on the mesh depth plane")]
    ZeroDepth(f32),
    #[error("vertex {index} has camera-relative depth 0")]
    ZeroVertexDepth { index: usize },
}

/// A vertex position in screen space, valid for one frame.
pub type ProjectedVertex = Vec2;

/// How the perspective divisor is chosen for each vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthStrategy {
    /// Every vertex is divided by the depth of the mesh origin.
    #[default]
    SinglePoint,
    /// Every vertex is divided by its own depth, `relative.z + rotated.z`.
    PerVertex,
}

/// Combined view rotation, `Rx * Ry * Rz`.
pub fn rotation_matrix(rotation: Vec3) -> Mat3 {
    Mat3::rotation(rotation)
}

/// Shear-based divide-by-depth matrix.
///
/// ```text
/// | 1  0  dx/dz |
/// | 0  1  dy/dz |
/// | 0  0  1/dz  |
/// ```
///
/// An approximation, not an off-axis camera projection. The main projection
/// path performs the equivalent division inline.
pub fn projection_matrix(distance: Vec3) -> Result<Mat3, ProjectionError> {
    let dz = checked_depth(distance.z)?;
    Ok(Mat3::from_rows(
        Vec3::new(1.0, 0.0, distance.x / dz),
        Vec3::new(0.0, 1.0, distance.y / dz),
        Vec3::new(0.0, 0.0, 1.0 / dz),
    ))
}

fn checked_depth(z: f32) -> Result<f32, ProjectionError> {
    if z == 0.0 || z.is_nan() {
        return Err(ProjectionError::ZeroDepth(z));
    }
    Ok(z)
}

/// Projects mesh vertices with a configurable depth strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Projector {
    strategy: DepthStrategy,
}

impl Projector {
    pub fn new(strategy: DepthStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> DepthStrategy {
        self.strategy
    }

    /// Projects every vertex of `mesh` to screen space.
    ///
    /// `relative_position` is the mesh origin relative to the camera and
    /// `view_rotation` the combined mesh + camera rotation. The output is
    /// index-aligned with `mesh.vertices()`.
    pub fn project(
        &self,
        mesh: &Mesh,
        relative_position: Vec3,
        view_rotation: Vec3,
    ) -> Result<Vec<ProjectedVertex>, ProjectionError> {
        let depth = checked_depth(relative_position.z)?;
        let rotation = rotation_matrix(view_rotation);
        let scale = mesh.scale_factor();

        mesh.vertices()
            .iter()
            .enumerate()
            .map(|(index, &vertex)| {
                let mut rotated = rotation * vertex;
                let divisor = match self.strategy {
                    DepthStrategy::SinglePoint => depth,
                    DepthStrategy::PerVertex => {
                        let own = depth + rotated.z;
                        if own == 0.0 {
                            return Err(ProjectionError::ZeroVertexDepth { index });
                        }
                        own
                    }
                };
                rotated *= scale / divisor;
                rotated += relative_position;
                Ok(Vec2::new(rotated.x, rotated.y))
            })
            .collect()
    }
}

/// Projects with the default single-point strategy.
pub fn project(
    mesh: &Mesh,
    relative_position: Vec3,
    view_rotation: Vec3,
) -> Result<Vec<ProjectedVertex>, ProjectionError> {
    Projector::default().project(mesh, relative_position, view_rotation)
}
