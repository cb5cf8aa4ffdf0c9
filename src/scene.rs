//! Scene container: named mesh entities and the cameras they view through.
//!
//! Entities never own their camera. Each one stores a [`CameraId`] into the
//! scene's camera table, so any number of entities can share a camera and the
//! camera outlives them all.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use crate::camera::{AnglePolicy, Camera};
use crate::extract::{self, ExtractError, RenderBatch, Style, Viewport};
use crate::math::Vec3;
use crate::mesh::Mesh;
use crate::projection::{ProjectionError, Projector};

/// Stable handle to a camera owned by a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraId(usize);

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("an entity named {0:?} already exists")]
    DuplicateEntity(String),
    #[error("unknown camera {0:?}")]
    UnknownCamera(CameraId),
}

/// Failure to produce a frame for one entity.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("entity {entity:?}: {source}")]
    Projection {
        entity: String,
        #[source]
        source: ProjectionError,
    },
    #[error("entity {entity:?}: {source}")]
    Extract {
        entity: String,
        #[source]
        source: ExtractError,
    },
    #[error("entity {entity:?} views through unknown camera {camera:?}")]
    UnknownCamera { entity: String, camera: CameraId },
}

/// A mesh placed in the world and viewed through a scene camera.
#[derive(Debug, Clone)]
pub struct MeshEntity {
    name: String,
    mesh: Mesh,
    position: Vec3,
    rotation: Vec3,
    spin: Vec3,
    camera: CameraId,
    angle_policy: AnglePolicy,
    visible: bool,
}

impl MeshEntity {
    pub fn new(name: impl Into<String>, mesh: Mesh, position: Vec3, camera: CameraId) -> Self {
        Self {
            name: name.into(),
            mesh,
            position,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            camera,
            angle_policy: AnglePolicy::default(),
            visible: true,
        }
    }

    pub fn with_angle_policy(mut self, policy: AnglePolicy) -> Self {
        self.angle_policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn camera(&self) -> CameraId {
        self.camera
    }

    /// Adds `delta` to the entity's rotation offset.
    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation = self.angle_policy.accumulate(self.rotation, delta);
    }

    /// Rotation applied on every [`MeshEntity::update`].
    pub fn set_spin(&mut self, spin: Vec3) {
        self.spin = spin;
    }

    pub fn spin(&self) -> Vec3 {
        self.spin
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn update(&mut self) {
        if self.spin != Vec3::ZERO {
            self.rotate(self.spin);
        }
    }

    /// Projects and extracts this entity as seen from `camera`.
    pub fn render_batch(
        &self,
        camera: &Camera,
        viewport: &Viewport,
        projector: &Projector,
        style: &Style,
    ) -> Result<RenderBatch, RenderError> {
        let relative = self.position - camera.position();
        let view_rotation = self.rotation + camera.orientation();
        let projected = projector
            .project(&self.mesh, relative, view_rotation)
            .map_err(|source| RenderError::Projection {
                entity: self.name.clone(),
                source,
            })?;
        extract::extract(self.mesh.faces(), &projected, viewport, style).map_err(|source| {
            RenderError::Extract {
                entity: self.name.clone(),
                source,
            }
        })
    }
}

/// Owns cameras and mesh entities, renders entities in insertion order.
#[derive(Debug, Default)]
pub struct Scene {
    cameras: Vec<Camera>,
    entities: Vec<MeshEntity>,
    entity_names: HashMap<String, usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Cameras ============

    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        self.cameras.push(camera);
        CameraId(self.cameras.len() - 1)
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id.0)
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(id.0)
    }

    // ============ Entities ============

    /// Adds an entity. Names are unique and the camera must already exist.
    pub fn add_mesh_entity(&mut self, entity: MeshEntity) -> Result<(), SceneError> {
        if self.entity_names.contains_key(entity.name()) {
            return Err(SceneError::DuplicateEntity(entity.name.clone()));
        }
        if self.camera(entity.camera).is_none() {
            return Err(SceneError::UnknownCamera(entity.camera));
        }
        debug!("adding mesh entity {:?}", entity.name());
        self.entity_names
            .insert(entity.name.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    pub fn entity(&self, name: &str) -> Option<&MeshEntity> {
        self.entity_names.get(name).map(|&i| &self.entities[i])
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut MeshEntity> {
        self.entity_names
            .get(name)
            .copied()
            .map(move |i| &mut self.entities[i])
    }

    /// Removes an entity, keeping the order of the remaining ones.
    pub fn remove_entity(&mut self, name: &str) -> Option<MeshEntity> {
        let index = self.entity_names.remove(name)?;
        let entity = self.entities.remove(index);
        for slot in self.entity_names.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        Some(entity)
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> &[MeshEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // ============ Frame ============

    /// Advances every entity by one update step.
    pub fn update(&mut self) {
        for entity in &mut self.entities {
            entity.update();
        }
    }

    /// Produces one batch per visible entity, in insertion order.
    pub fn render(
        &self,
        viewport: &Viewport,
        projector: &Projector,
        style: &Style,
    ) -> Result<Vec<RenderBatch>, RenderError> {
        self.entities
            .iter()
            .filter(|e| e.is_visible())
            .map(|entity| {
                let camera = self
                    .camera(entity.camera)
                    .ok_or_else(|| RenderError::UnknownCamera {
                        entity: entity.name.clone(),
                        camera: entity.camera,
                    })?;
                entity.render_batch(camera, viewport, projector, style)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use approx::assert_relative_eq;

    const SQUARE: &str = "v -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\nf 1 2 3 4\n";

    fn scene_with_square() -> (Scene, CameraId) {
        let mut scene = Scene::new();
        let camera = scene.add_camera(Camera::default());
        let mesh = Mesh::parse(SQUARE).with_scale_factor(10.0);
        scene
            .add_mesh_entity(MeshEntity::new("square", mesh, Vec3::new(50.0, 50.0, 1.0), camera))
            .unwrap();
        (scene, camera)
    }

    fn render(scene: &Scene) -> Result<Vec<RenderBatch>, RenderError> {
        scene.render(
            &Viewport::new(0.0, 0.0, 100.0, 100.0),
            &Projector::default(),
            &Style::default(),
        )
    }

    #[test]
    fn renders_entity_relative_to_camera() {
        let (scene, _) = scene_with_square();
        let batches = render(&scene).unwrap();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.points.len(), 4);
        assert_eq!(batch.edges.len(), 1);
        assert_eq!(batch.faces.len(), 1);
        assert_relative_eq!(batch.points[0].center, Vec2::new(40.0, 40.0));
        assert_relative_eq!(batch.points[2].center, Vec2::new(60.0, 60.0));
    }

    #[test]
    fn camera_motion_shifts_the_projection() {
        let (mut scene, camera) = scene_with_square();
        scene
            .camera_mut(camera)
            .unwrap()
            .move_camera(Vec3::new(1000.0, 0.0, 0.0));
        let batches = render(&scene).unwrap();
        assert!(batches[0].is_empty());
    }

    #[test]
    fn camera_on_mesh_plane_fails_the_frame() {
        let (mut scene, camera) = scene_with_square();
        scene.camera_mut(camera).unwrap().move_camera(Vec3::Z);
        assert!(matches!(
            render(&scene),
            Err(RenderError::Projection {
                source: ProjectionError::ZeroDepth(_),
                ..
            })
        ));
    }

    #[test]
    fn corrupt_face_fails_the_frame() {
        let mut scene = Scene::new();
        let camera = scene.add_camera(Camera::default());
        let mesh = Mesh::parse("v 0 0 0\nf 1 2 3\n");
        scene
            .add_mesh_entity(MeshEntity::new("broken", mesh, Vec3::Z, camera))
            .unwrap();
        let err = render(&scene).unwrap_err();
        assert!(matches!(err, RenderError::Extract { ref entity, .. } if entity == "broken"));
    }

    #[test]
    fn duplicate_names_and_unknown_cameras_are_rejected() {
        let (mut scene, camera) = scene_with_square();
        let dup = MeshEntity::new("square", Mesh::default(), Vec3::Z, camera);
        assert!(matches!(
            scene.add_mesh_entity(dup),
            Err(SceneError::DuplicateEntity(_))
        ));

        let orphan = MeshEntity::new("orphan", Mesh::default(), Vec3::Z, CameraId(7));
        assert!(matches!(
            scene.add_mesh_entity(orphan),
            Err(SceneError::UnknownCamera(CameraId(7)))
        ));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn entity_rotation_is_additive_and_spins_on_update() {
        let (mut scene, _) = scene_with_square();
        let entity = scene.entity_mut("square").unwrap();
        entity.rotate(Vec3::new(0.0, 0.5, 0.0));
        entity.set_spin(Vec3::new(0.0, 0.25, 0.0));
        scene.update();
        scene.update();
        assert_relative_eq!(scene.entity("square").unwrap().rotation(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn hidden_entities_are_skipped() {
        let (mut scene, _) = scene_with_square();
        scene.entity_mut("square").unwrap().set_visible(false);
        assert!(render(&scene).unwrap().is_empty());
    }

    #[test]
    fn removal_keeps_remaining_lookups_valid() {
        let (mut scene, camera) = scene_with_square();
        for name in ["a", "b"] {
            scene
                .add_mesh_entity(MeshEntity::new(name, Mesh::default(), Vec3::Z, camera))
                .unwrap();
        }
        let removed = scene.remove_entity("square").unwrap();
        assert_eq!(removed.name(), "square");
        assert!(scene.remove_entity("square").is_none());
        assert_eq!(scene.entity("b").unwrap().name(), "b");
        let names: Vec<_> = scene.entities().iter().map(MeshEntity::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn entities_share_one_camera() {
        let (mut scene, camera) = scene_with_square();
        let mesh = Mesh::parse(SQUARE).with_scale_factor(10.0);
        scene
            .add_mesh_entity(MeshEntity::new("twin", mesh, Vec3::new(50.0, 50.0, 1.0), camera))
            .unwrap();
        let batches = render(&scene).unwrap();
        assert_eq!(batches[0], batches[1]);
    }
}
