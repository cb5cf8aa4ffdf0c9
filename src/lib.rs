//! A small perspective-projection pipeline for OBJ meshes.
//!
//! Meshes are rotated, scaled by `scale / depth` and offset into screen
//! space, then culled against a viewport and emitted as 2D primitives:
//! vertex points, edge polylines and translucent face polygons. A software
//! [`Canvas`] rasterizes those primitives; SDL2 is used only to show the
//! result, behind the `window` feature.
//!
//! # Quick Start
//!
//! ```ignore
//! use meshcast::prelude::*;
//!
//! let mut scene = Scene::new();
//! let camera = scene.add_camera(Camera::default());
//! let mesh = Mesh::from_obj("assets/cube.obj")?.with_scale_factor(50.0);
//! scene.add_mesh_entity(MeshEntity::new("cube", mesh, Vec3::new(640.0, 480.0, 1.0), camera))?;
//!
//! let batches = scene.render(&Viewport::from_size(1280, 960), &Projector::default(), &Style::default())?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod canvas;
pub mod colors;
pub mod config;
pub mod extract;
pub mod input;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod resources;
pub mod scene;
pub mod texture;
#[cfg(feature = "window")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::{AnglePolicy, Camera};
pub use canvas::Canvas;
pub use config::{Config, ConfigError};
pub use extract::{ExtractError, RenderBatch, Style, Viewport};
pub use mesh::{LoadError, Mesh};
pub use projection::{DepthStrategy, ProjectionError, Projector};
pub use resources::Resources;
pub use scene::{CameraId, MeshEntity, RenderError, Scene, SceneError};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use meshcast::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{AnglePolicy, Camera};

    // Math
    pub use crate::math::{Mat3, Vec2, Vec3};

    // Mesh
    pub use crate::mesh::{Face, FaceVertex, Mesh};

    // Pipeline
    pub use crate::extract::{Polygon, Polyline, PointPrimitive, RenderBatch, Style, Viewport};
    pub use crate::projection::{DepthStrategy, Projector};
    pub use crate::scene::{CameraId, MeshEntity, Scene};

    // Rendering
    pub use crate::canvas::Canvas;
    pub use crate::resources::Resources;

    // Input & config
    pub use crate::config::Config;
    pub use crate::input::{CameraController, InputEvent, Key};

    // Window
    #[cfg(feature = "window")]
    pub use crate::window::{FrameLimiter, Window};
}
