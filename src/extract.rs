//! Turns projected vertices into drawable 2D primitives.
//!
//! Three independent passes run over the same projected vertex list:
//!
//! - **points**: one disc per vertex inside the viewport
//! - **edges**: one open polyline per face, visiting its corners in order
//! - **faces**: one convex polygon per face, translucent fill plus outline
//!
//! Edges and faces are culled coarsely: a face is kept whenever its
//! axis-aligned bounding box touches the viewport, and dropped whole
//! otherwise. Faces come out in file order; nothing is depth sorted.
//!
//! Corners are looked up as `vertex - 1` into the projected list. A corner
//! that is missing its vertex index or points past the list means the mesh is
//! corrupt, and the pass fails instead of skipping it.

use thiserror::Error;

use crate::colors;
use crate::math::Vec2;
use crate::mesh::{Face, FaceVertex};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("face {face} has a corner without a vertex index")]
    MissingVertexIndex { face: usize },
    #[error("face {face} references vertex {index}, but only {len} vertices exist")]
    VertexIndexOutOfRange { face: usize, index: u32, len: usize },
}

/// Resolves a face corner to a 0-based slot in a vertex list of length `len`.
pub(crate) fn vertex_slot(face: usize, corner: &FaceVertex, len: usize) -> Result<usize, ExtractError> {
    let index = corner
        .vertex
        .ok_or(ExtractError::MissingVertexIndex { face })?;
    let slot = index as usize;
    if slot == 0 || slot > len {
        return Err(ExtractError::VertexIndexOutOfRange { face, index, len });
    }
    Ok(slot - 1)
}

/// Screen-space rectangle that primitives are culled against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Viewport covering a `width` x `height` surface from the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive containment test on all four edges.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True when `bounds` overlaps or touches the viewport.
    pub fn intersects(&self, bounds: &Bounds) -> bool {
        bounds.min.x <= self.right()
            && bounds.max.x >= self.x
            && bounds.min.y <= self.bottom()
            && bounds.max.y >= self.y
    }
}

/// Axis-aligned bounding box of a set of 2D points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Returns `None` for an empty point set.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(
            Bounds {
                min: *first,
                max: *first,
            },
            |b, p| Bounds {
                min: Vec2::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Vec2::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            },
        ))
    }
}

/// Sizes and colors used for the emitted primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub point_radius: f32,
    pub point_color: u32,
    pub edge_color: u32,
    pub face_fill: u32,
    pub face_outline: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            point_radius: 2.0,
            point_color: colors::VERTEX,
            edge_color: colors::EDGE,
            face_fill: colors::FACE_FILL,
            face_outline: colors::FACE_OUTLINE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPrimitive {
    pub center: Vec2,
    pub radius: f32,
    pub color: u32,
}

/// Open line strip through `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub color: u32,
}

/// Closed convex polygon with a fill and an outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec2>,
    pub fill: u32,
    pub outline: u32,
}

/// Everything one mesh instance contributes to a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBatch {
    pub points: Vec<PointPrimitive>,
    pub edges: Vec<Polyline>,
    pub faces: Vec<Polygon>,
}

impl RenderBatch {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }
}

/// Emits a point for every projected vertex inside the viewport.
pub fn extract_points(projected: &[Vec2], viewport: &Viewport, style: &Style) -> Vec<PointPrimitive> {
    projected
        .iter()
        .filter(|p| viewport.contains(**p))
        .map(|&center| PointPrimitive {
            center,
            radius: style.point_radius,
            color: style.point_color,
        })
        .collect()
}

/// Emits one open polyline per face whose bounds touch the viewport.
pub fn extract_edges(
    faces: &[Face],
    projected: &[Vec2],
    viewport: &Viewport,
    style: &Style,
) -> Result<Vec<Polyline>, ExtractError> {
    visible_outlines(faces, projected, viewport)
        .map(|points| {
            points.map(|points| Polyline {
                points,
                color: style.edge_color,
            })
        })
        .collect()
}

/// Emits one filled polygon per face whose bounds touch the viewport.
pub fn extract_faces(
    faces: &[Face],
    projected: &[Vec2],
    viewport: &Viewport,
    style: &Style,
) -> Result<Vec<Polygon>, ExtractError> {
    visible_outlines(faces, projected, viewport)
        .map(|points| {
            points.map(|points| Polygon {
                points,
                fill: style.face_fill,
                outline: style.face_outline,
            })
        })
        .collect()
}

/// Runs all three passes.
pub fn extract(
    faces: &[Face],
    projected: &[Vec2],
    viewport: &Viewport,
    style: &Style,
) -> Result<RenderBatch, ExtractError> {
    Ok(RenderBatch {
        points: extract_points(projected, viewport, style),
        edges: extract_edges(faces, projected, viewport, style)?,
        faces: extract_faces(faces, projected, viewport, style)?,
    })
}

/// Screen positions of each face's corners, for faces not culled.
fn visible_outlines<'a>(
    faces: &'a [Face],
    projected: &'a [Vec2],
    viewport: &'a Viewport,
) -> impl Iterator<Item = Result<Vec<Vec2>, ExtractError>> + 'a {
    faces
        .iter()
        .enumerate()
        .filter_map(move |(index, face)| {
            let points = match face_points(index, face, projected) {
                Ok(points) => points,
                Err(err) => return Some(Err(err)),
            };
            let bounds = Bounds::from_points(&points)?;
            viewport.intersects(&bounds).then_some(Ok(points))
        })
}

fn face_points(index: usize, face: &Face, projected: &[Vec2]) -> Result<Vec<Vec2>, ExtractError> {
    face.iter()
        .map(|corner| vertex_slot(index, corner, projected.len()).map(|slot| projected[slot]))
        .collect()
}
