//! Polygon mesh loaded from an OBJ-style text description.
//!
//! Only the directives the projection pipeline needs are understood:
//!
//! ```text
//! v  x y z [w]        vertex position
//! vt u [v [w]]        texture coordinate
//! vn x y z            normal
//! f  v/t/n v/t/n ...  polygon, 1-based indices, at least three corners
//! ```
//!
//! Every other line (comments, groups, materials, smoothing) is skipped so
//! files exported by modelling tools load without preprocessing. Face indices
//! are kept exactly as written; range checking happens when the faces are
//! turned into primitives.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, error, warn};
use thiserror::Error;

use crate::extract::ExtractError;
use crate::math::Vec3;

/// One corner of a face: 1-based `(vertex, texture, normal)` indices.
///
/// A sub-index missing from the source (`1//3`, `1`) is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceVertex {
    pub vertex: Option<u32>,
    pub texture: Option<u32>,
    pub normal: Option<u32>,
}

impl FaceVertex {
    pub const fn new(vertex: u32, texture: u32, normal: u32) -> Self {
        Self {
            vertex: Some(vertex),
            texture: Some(texture),
            normal: Some(normal),
        }
    }
}

/// An ordered polygon of face corners.
pub type Face = Vec<FaceVertex>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read mesh file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A recoverable problem found on one line of a mesh source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// 1-based line number.
    pub line: usize,
    pub kind: ParseIssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssueKind {
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("expected {expected} coordinates, found {found}")]
    MissingCoordinate { expected: usize, found: usize },
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error("face has no vertex references")]
    EmptyFace,
    #[error("face has {0} vertex references, need at least 3")]
    DegenerateFace(usize),
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Mesh geometry plus the uniform scale applied when projecting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    texture_coords: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
    scale_factor: f32,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            texture_coords: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            scale_factor: 1.0,
        }
    }
}

impl Mesh {
    /// Builds a mesh directly from vertices and faces.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::default()
        }
    }

    /// Parses mesh text, logging and skipping malformed lines.
    pub fn parse(source: &str) -> Self {
        let (mesh, issues) = Self::parse_with_issues(source);
        for issue in &issues {
            warn!("skipped mesh line: {issue}");
        }
        mesh
    }

    /// Parses mesh text and returns the skipped-line diagnostics alongside.
    pub fn parse_with_issues(source: &str) -> (Self, Vec<ParseIssue>) {
        let mut parser = Parser::default();
        for (index, line) in source.lines().enumerate() {
            parser.line(index + 1, line);
        }
        parser.finish()
    }

    /// Parses an already opened source.
    ///
    /// Lines are read as bytes, so text in a legacy encoding only costs the
    /// lines it appears on.
    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut parser = Parser::default();
        let mut buf = Vec::new();
        let mut number = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            number += 1;
            parser.raw_line(number, &buf);
        }
        let (mesh, issues) = parser.finish();
        for issue in &issues {
            warn!("skipped mesh line: {issue}");
        }
        Ok(mesh)
    }

    /// Loads a mesh from an OBJ file.
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let mesh = Self::from_reader(BufReader::new(file)).map_err(io_err)?;
        debug!(
            "loaded {}: {} vertices, {} faces",
            path.display(),
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    /// Loads a mesh, falling back to an empty mesh when the file can't be read.
    ///
    /// The failure is logged; an empty mesh renders nothing.
    pub fn from_obj_or_empty(path: impl AsRef<Path>) -> Self {
        Self::from_obj(path).unwrap_or_else(|err| {
            error!("{err}");
            Self::default()
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn texture_coords(&self) -> &[Vec3] {
        &self.texture_coords
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn set_scale_factor(&mut self, scale: f32) {
        self.scale_factor = scale;
    }

    /// Builder form of [`Mesh::set_scale_factor`].
    pub fn with_scale_factor(mut self, scale: f32) -> Self {
        self.scale_factor = scale;
        self
    }

    /// Multiplies the current scale factor.
    pub fn scale_by(&mut self, factor: f32) {
        self.scale_factor *= factor;
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Checks every face vertex index against the vertex list.
    ///
    /// Extraction performs the same check lazily; this lets scene setup reject
    /// a corrupt mesh before the first frame.
    pub fn validate(&self) -> Result<(), ExtractError> {
        let len = self.vertices.len();
        for (face, corners) in self.faces.iter().enumerate() {
            for corner in corners {
                crate::extract::vertex_slot(face, corner, len)?;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct Parser {
    mesh: Mesh,
    issues: Vec<ParseIssue>,
}

impl Parser {
    fn line(&mut self, number: usize, line: &str) {
        let mut tokens = line.split_whitespace();
        let result = match tokens.next() {
            Some("v") => read_point(tokens, 3).map(|p| self.mesh.vertices.push(p)),
            Some("vt") => read_point(tokens, 1).map(|p| self.mesh.texture_coords.push(p)),
            Some("vn") => read_point(tokens, 3).map(|p| self.mesh.normals.push(p)),
            Some("f") => read_face(tokens).map(|f| self.mesh.faces.push(f)),
            _ => Ok(()),
        };
        if let Err(kind) = result {
            self.issues.push(ParseIssue { line: number, kind });
        }
    }

    /// Non-UTF-8 lines are ignored unless they start with a directive.
    fn raw_line(&mut self, number: usize, bytes: &[u8]) {
        match std::str::from_utf8(bytes) {
            Ok(line) => self.line(number, line),
            Err(_) => {
                let line = String::from_utf8_lossy(bytes);
                if matches!(line.split_whitespace().next(), Some("v" | "vt" | "vn" | "f")) {
                    self.issues.push(ParseIssue {
                        line: number,
                        kind: ParseIssueKind::InvalidUtf8,
                    });
                }
            }
        }
    }

    fn finish(self) -> (Mesh, Vec<ParseIssue>) {
        (self.mesh, self.issues)
    }
}

/// Reads up to three coordinates, requiring at least `required`.
/// Missing optional coordinates are zero; extra ones (`w`) are ignored.
fn read_point<'a>(
    tokens: impl Iterator<Item = &'a str>,
    required: usize,
) -> Result<Vec3, ParseIssueKind> {
    let mut coords = [0.0f32; 3];
    let mut found = 0;
    for token in tokens.take(3) {
        coords[found] = token
            .parse()
            .map_err(|_| ParseIssueKind::InvalidNumber(token.to_string()))?;
        found += 1;
    }
    if found < required {
        return Err(ParseIssueKind::MissingCoordinate {
            expected: required,
            found,
        });
    }
    Ok(Vec3::from(coords))
}

fn read_face<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Face, ParseIssueKind> {
    let face = tokens.map(read_face_vertex).collect::<Result<Face, _>>()?;
    match face.len() {
        0 => Err(ParseIssueKind::EmptyFace),
        n if n < 3 => Err(ParseIssueKind::DegenerateFace(n)),
        _ => Ok(face),
    }
}

fn read_face_vertex(token: &str) -> Result<FaceVertex, ParseIssueKind> {
    let mut fields = token.split('/');
    let mut next = || -> Result<Option<u32>, ParseIssueKind> {
        match fields.next() {
            None | Some("") => Ok(None),
            Some(field) => field
                .parse()
                .map(Some)
                .map_err(|_| ParseIssueKind::InvalidNumber(field.to_string())),
        }
    };
    Ok(FaceVertex {
        vertex: next()?,
        texture: next()?,
        normal: next()?,
    })
}
