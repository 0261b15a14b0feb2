//! Geometric utility functions for vectors, ray casting and rectangles.
//!
//! 2D vectors are `Array1<f32>` of length 2. Obstacles and world bounds are
//! axis-aligned `geo::Rect`s.

use geo::{Coord, Line, Rect};
use ndarray::{Array1, array};

/// Builds a 2D vector.
#[inline]
pub fn vec2(x: f32, y: f32) -> Array1<f32> {
    array![x, y]
}

/// The zero vector.
#[inline]
pub fn zero() -> Array1<f32> {
    Array1::zeros(2)
}

/// Euclidean length of a vector.
#[inline]
pub fn magnitude(v: &Array1<f32>) -> f32 {
    v.dot(v).sqrt()
}

/// Distance between two points.
#[inline]
pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Caps the magnitude of `v` at `max` in place.
pub fn limit(v: &mut Array1<f32>, max: f32) {
    let mag = magnitude(v);
    if mag > max && mag > 0.0 {
        *v *= max / mag;
    }
}

/// Rescales `v` to length `mag` in place. The zero vector stays zero.
pub fn set_magnitude(v: &mut Array1<f32>, mag: f32) {
    let current = magnitude(v);
    if current > 0.0 {
        *v *= mag / current;
    }
}

/// Unit vector in the direction of `v`, or zero.
pub fn normalized(v: &Array1<f32>) -> Array1<f32> {
    let mut unit = v.clone();
    set_magnitude(&mut unit, 1.0);
    unit
}

/// Angle of `v` in radians, measured from the +x axis.
#[inline]
pub fn heading(v: &Array1<f32>) -> f32 {
    v[1].atan2(v[0])
}

/// Vector of length `len` pointing at `angle`.
#[inline]
pub fn from_angle(angle: f32, len: f32) -> Array1<f32> {
    vec2(angle.cos() * len, angle.sin() * len)
}

/// Wraps an angle into [-PI, PI).
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Converts a vector into a `geo` coordinate.
#[inline]
pub fn to_coord(v: &Array1<f32>) -> Coord<f32> {
    Coord { x: v[0], y: v[1] }
}

/// Converts a `geo` coordinate into a vector.
#[inline]
pub fn from_coord(c: Coord<f32>) -> Array1<f32> {
    vec2(c.x, c.y)
}

/// Builds an obstacle rectangle from its top-left corner and size.
pub fn obstacle(x: f32, y: f32, width: f32, height: f32) -> Rect<f32> {
    Rect::new(
        Coord { x, y },
        Coord {
            x: x + width,
            y: y + height,
        },
    )
}

/// Intersection point of two segments.
///
/// Uses the parametric form: the hit is accepted only when both segment
/// parameters lie in [0, 1]. Parallel or degenerate segments never intersect.
pub fn segment_intersection(a: &Line<f32>, b: &Line<f32>) -> Option<Coord<f32>> {
    let (x1, y1, x2, y2) = (a.start.x, a.start.y, a.end.x, a.end.y);
    let (x3, y3, x4, y4) = (b.start.x, b.start.y, b.end.x, b.end.y);

    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    if denom.abs() <= f32::EPSILON {
        return None;
    }

    let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denom;
    let ub = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denom;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(Coord {
            x: x1 + ua * (x2 - x1),
            y: y1 + ua * (y2 - y1),
        })
    } else {
        None
    }
}

/// Closest point where `ray` crosses any of the four edges of `rect`.
pub fn ray_rect_intersection(ray: &Line<f32>, rect: &Rect<f32>) -> Option<Coord<f32>> {
    let start = ray.start;
    let dist_sq = |c: &Coord<f32>| (c.x - start.x).powi(2) + (c.y - start.y).powi(2);

    rect.to_lines()
        .iter()
        .filter_map(|edge| segment_intersection(ray, edge))
        .min_by(|a, b| dist_sq(a).total_cmp(&dist_sq(b)))
}

/// Whether `pos` lies strictly inside `rect`.
pub fn rect_contains(rect: &Rect<f32>, pos: &Array1<f32>) -> bool {
    let (min, max) = (rect.min(), rect.max());
    pos[0] > min.x && pos[0] < max.x && pos[1] > min.y && pos[1] < max.y
}

/// Whether a circle overlaps a rectangle.
pub fn rect_circle_overlap(rect: &Rect<f32>, center: &Array1<f32>, radius: f32) -> bool {
    let (min, max) = (rect.min(), rect.max());
    let closest_x = center[0].clamp(min.x, max.x);
    let closest_y = center[1].clamp(min.y, max.y);
    let dx = center[0] - closest_x;
    let dy = center[1] - closest_y;
    dx * dx + dy * dy < radius * radius
}

/// Wraps a position that has left `bounds` by more than `margin` to the
/// opposite side.
pub fn wrap_around_mut(v: &mut Array1<f32>, bounds: &Rect<f32>, margin: f32) {
    let (min, max) = (bounds.min(), bounds.max());
    if v[0] > max.x + margin {
        v[0] = min.x - margin;
    } else if v[0] < min.x - margin {
        v[0] = max.x + margin;
    }
    if v[1] > max.y + margin {
        v[1] = min.y - margin;
    } else if v[1] < min.y - margin {
        v[1] = max.y + margin;
    }
}

/// Rotates `v` counter-clockwise by `angle` radians.
pub fn rotate(v: &Array1<f32>, angle: f32) -> Array1<f32> {
    let (sin, cos) = angle.sin_cos();
    vec2(v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos)
}
