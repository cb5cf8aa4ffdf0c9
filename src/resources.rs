//! Named resources shared across a scene.
//!
//! A [`Resources`] value is built once at startup and handed to whatever
//! needs it. Meshes in the registry are templates: entities clone the mesh
//! they are created from, so scaling one entity never affects another.

use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::colors;
use crate::mesh::{LoadError, Mesh};
use crate::texture::{Texture, TextureError};

#[derive(Debug, Default)]
pub struct Resources {
    meshes: HashMap<String, Mesh>,
    colors: HashMap<String, u32>,
    textures: HashMap<String, Texture>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the standard UI and mesh palette.
    pub fn with_default_colors() -> Self {
        let mut resources = Self::new();
        for (key, color) in [
            ("BACKGROUND", colors::BACKGROUND),
            ("TEXT", colors::TEXT),
            ("VERTICES", colors::VERTEX),
            ("EDGES", colors::EDGE),
            ("FACES", colors::FACE_FILL),
            ("ERROR", colors::ERROR),
        ] {
            resources.insert_color(key, color);
        }
        resources
    }

    // ============ Meshes ============

    pub fn insert_mesh(&mut self, key: impl Into<String>, mesh: Mesh) {
        self.meshes.insert(key.into(), mesh);
    }

    /// Loads an OBJ file under `key`. The registry is unchanged on failure.
    pub fn load_mesh(&mut self, key: impl Into<String>, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let key = key.into();
        let mesh = Mesh::from_obj(path)?;
        info!(
            "mesh {key:?}: {} vertices, {} faces",
            mesh.vertices().len(),
            mesh.faces().len()
        );
        self.meshes.insert(key, mesh);
        Ok(())
    }

    pub fn mesh(&self, key: &str) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    // ============ Colors ============

    pub fn insert_color(&mut self, key: impl Into<String>, color: u32) {
        self.colors.insert(key.into(), color);
    }

    pub fn color(&self, key: &str) -> Option<u32> {
        self.colors.get(key).copied()
    }

    // ============ Textures ============

    pub fn insert_texture(&mut self, key: impl Into<String>, texture: Texture) {
        self.textures.insert(key.into(), texture);
    }

    pub fn load_texture(&mut self, key: impl Into<String>, path: impl AsRef<Path>) -> Result<(), TextureError> {
        let texture = Texture::from_file(path)?;
        self.textures.insert(key.into(), texture);
        Ok(())
    }

    pub fn texture(&self, key: &str) -> Option<&Texture> {
        self.textures.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_is_seeded() {
        let resources = Resources::with_default_colors();
        assert_eq!(resources.color("FACES"), Some(colors::FACE_FILL));
        assert_eq!(resources.color("missing"), None);
    }

    #[test]
    fn registries_are_independent() {
        let mut first = Resources::new();
        first.insert_mesh("cube", Mesh::parse("v 1 1 1\n"));
        let second = Resources::new();
        assert!(first.mesh("cube").is_some());
        assert!(second.mesh("cube").is_none());
    }

    #[test]
    fn failed_mesh_load_leaves_registry_unchanged() {
        let mut resources = Resources::new();
        resources.insert_mesh("cube", Mesh::parse("v 1 1 1\n"));
        let result = resources.load_mesh("cube", "/nonexistent/cube.obj");
        assert!(result.is_err());
        assert_eq!(resources.mesh("cube").unwrap().vertices().len(), 1);
    }

    #[test]
    fn textures_are_stored_by_key() {
        let mut resources = Resources::new();
        let texture = Texture::from_pixels(1, 1, vec![colors::TEXT]).unwrap();
        resources.insert_texture("BUTTON", texture);
        assert_eq!(resources.texture("BUTTON").unwrap().sample(0.5, 0.5), colors::TEXT);
        assert!(resources.load_texture("MISSING", "/nonexistent/x.png").is_err());
        assert!(resources.texture("MISSING").is_none());
    }
}
