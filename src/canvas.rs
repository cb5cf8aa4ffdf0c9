//! Software canvas that draws [`RenderBatch`] primitives.
//!
//! Owns an ARGB8888 color buffer and implements the few drawing operations the
//! primitive batches need: discs for vertices, Bresenham lines for edges and
//! an edge-function fill for convex faces. All writes are clipped to the
//! buffer; nothing here is depth tested.

use crate::colors;
use crate::extract::{Bounds, PointPrimitive, Polygon, Polyline, RenderBatch};
use crate::math::Vec2;

pub struct Canvas {
    color_buffer: Vec<u32>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color_buffer: vec![colors::BACKGROUND; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.color_buffer = vec![colors::BACKGROUND; (width * height) as usize];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32)
            .then(|| (y as u32 * self.width + x as u32) as usize)
    }

    /// Get the color at (x, y), or None if out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.color_buffer[i])
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.color_buffer[i] = color;
        }
    }

    /// Composites `color` over the existing pixel using its alpha channel.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.color_buffer[i] = colors::blend_over(self.color_buffer[i], color);
        }
    }

    pub fn draw_grid(&mut self, spacing: i32, color: u32) {
        if spacing <= 0 {
            return;
        }
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if x % spacing == 0 || y % spacing == 0 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Draws a line using Bresenham's algorithm.
    ///
    /// The segment is clipped to the buffer first, so endpoints far outside
    /// it cost nothing extra.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        self.draw_segment(
            (f64::from(x0), f64::from(y0)),
            (f64::from(x1), f64::from(y1)),
            color,
        );
    }

    fn draw_segment(&mut self, a: (f64, f64), b: (f64, f64), color: u32) {
        let Some(((x0, y0), (x1, y1))) = clip_segment(a, b, self.width, self.height) else {
            return;
        };
        self.bresenham(x0 as i32, y0 as i32, x1 as i32, y1 as i32, color);
    }

    /// The error term tracks the distance between the ideal line and the
    /// current pixel; whenever it crosses a threshold the minor axis steps too.
    /// Endpoints must already lie within one pixel of the buffer.
    fn bresenham(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let x_step = if x0 < x1 { 1 } else { -1 };
        let y_step = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.blend_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_step;
            }
            if e2 < dx {
                err += dx;
                y += y_step;
            }
        }
    }

    /// Draws consecutive segments through `points`, without closing the loop.
    pub fn draw_polyline(&mut self, points: &[Vec2], color: u32) {
        for pair in points.windows(2) {
            self.draw_segment(widen(pair[0]), widen(pair[1]), color);
        }
    }

    /// Draws the closed outline of a polygon.
    pub fn draw_polygon_outline(&mut self, points: &[Vec2], color: u32) {
        self.draw_polyline(points, color);
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if points.len() > 2 {
                self.draw_segment(widen(last), widen(first), color);
            }
        }
    }

    /// Fills a disc of `radius` centered on `center`, clipped to the buffer.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: u32) {
        if !(center.x.is_finite() && center.y.is_finite() && radius.is_finite()) {
            return;
        }
        let r2 = radius * radius;
        let min_x = ((center.x - radius).floor() as i32).max(0);
        let min_y = ((center.y - radius).floor() as i32).max(0);
        let max_x = ((center.x + radius).ceil() as i32).min(self.width as i32 - 1);
        let max_y = ((center.y + radius).ceil() as i32).min(self.height as i32 - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Fills a convex polygon of either winding.
    ///
    /// Every pixel center inside the clipped bounding box is tested against
    /// each edge function `E(P) = (P - A) x (B - A)`; a pixel is covered when
    /// all edges agree in sign with the polygon's signed area.
    pub fn fill_convex_polygon(&mut self, points: &[Vec2], color: u32) {
        if points.len() < 3 {
            return;
        }
        let Some(bounds) = Bounds::from_points(points) else {
            return;
        };
        let area = signed_area(points);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        let sign = area.signum();

        let min_x = (bounds.min.x.floor() as i32).max(0);
        let min_y = (bounds.min.y.floor() as i32).max(0);
        let max_x = (bounds.max.x.ceil() as i32).min(self.width as i32 - 1);
        let max_y = (bounds.max.y.ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                let inside = points
                    .iter()
                    .zip(points.iter().cycle().skip(1))
                    .all(|(&a, &b)| edge_function(a, b, p) * sign >= 0.0);
                if inside {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    pub fn draw_point(&mut self, point: &PointPrimitive) {
        self.fill_circle(point.center, point.radius, point.color);
    }

    pub fn draw_edge(&mut self, edge: &Polyline) {
        self.draw_polyline(&edge.points, edge.color);
    }

    pub fn draw_face(&mut self, face: &Polygon) {
        self.fill_convex_polygon(&face.points, face.fill);
        self.draw_polygon_outline(&face.points, face.outline);
    }

    /// Draws faces, then edges, then points, each in batch order.
    pub fn draw_batch(&mut self, batch: &RenderBatch) {
        for face in &batch.faces {
            self.draw_face(face);
        }
        for edge in &batch.edges {
            self.draw_edge(edge);
        }
        for point in &batch.points {
            self.draw_point(point);
        }
    }

    /// The color buffer as raw ARGB8888 bytes, ready for a streaming texture.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and a stricter alignment than u8; the
        // byte slice covers exactly the buffer's initialized memory.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }
}

#[inline]
fn widen(p: Vec2) -> (f64, f64) {
    (f64::from(p.x), f64::from(p.y))
}

/// Liang-Barsky clip of segment AB against `[0, width] x [0, height]`.
///
/// Returns `None` when no part of the segment is inside. Projected corners
/// can sit ~1e10 pixels off screen, so the parametric math runs in f64.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    width: u32,
    height: u32,
) -> Option<((f64, f64), (f64, f64))> {
    let (w, h) = (f64::from(width), f64::from(height));
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    if !(a.0.is_finite() && a.1.is_finite() && dx.is_finite() && dy.is_finite()) {
        return None;
    }

    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, a.0), (dx, w - a.0), (-dy, a.1), (dy, h - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64, end: (f64, f64)| {
        let (x, y) = if t == 0.0 {
            a
        } else if t == 1.0 {
            end
        } else {
            (a.0 + dx * t, a.1 + dy * t)
        };
        (x.clamp(0.0, w), y.clamp(0.0, h))
    };
    Some((at(t0, b), at(t1, b)))
}

/// `(P - A) x (B - A)`: positive on one side of edge AB, negative on the other.
#[inline]
fn edge_function(a: Vec2, b: Vec2, p: (f64, f64)) -> f64 {
    let (a, b) = (widen(a), widen(b));
    (p.0 - a.0) * (b.1 - a.1) - (p.1 - a.1) * (b.0 - a.0)
}

/// Shoelace sum with the same orientation as [`edge_function`].
fn signed_area(points: &[Vec2]) -> f64 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&a, &b)| {
            let (a, b) = (widen(a), widen(b));
            a.1 * b.0 - a.0 * b.1
        })
        .sum::<f64>()
        / 2.0
}
