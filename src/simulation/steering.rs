//! Stateless steering behaviors.
//!
//! Every function reads a [`Body`] and returns a force capped at the body's
//! `max_force`. Nothing here mutates the body; callers weight, sum and apply
//! the results.

use std::f32::consts::PI;

use geo::{Line, Rect};
use ndarray::Array1;
use rand::Rng;

use super::agent::Body;
use super::geometric_utils::{
    distance, from_angle, limit, normalized, ray_rect_intersection, set_magnitude, to_coord, vec2,
    zero,
};

/// Distance inside which `arrive` starts braking.
pub const ARRIVE_RADIUS: f32 = 100.0;
/// Distance from the body to the wander circle centre.
pub const WANDER_DISTANCE: f32 = 100.0;
/// Radius of the wander circle.
pub const WANDER_RADIUS: f32 = 50.0;
/// Maximum change of the wander angle per tick.
pub const WANDER_DISPLACEMENT: f32 = 0.3;
/// Length of the avoidance feelers.
pub const AVOID_RAY_LENGTH: f32 = 100.0;
/// Feeler angles relative to the heading.
pub const AVOID_RAY_ANGLES: [f32; 3] = [0.0, 25.0 * PI / 180.0, -25.0 * PI / 180.0];

/// Turns a desired velocity into a force capped at `max`.
fn steer(body: &Body, desired: &Array1<f32>, max: f32) -> Array1<f32> {
    let mut force = desired - &body.vel;
    limit(&mut force, max);
    force
}

/// Steers toward `target` at full speed.
///
/// A target on top of the body yields the zero force.
pub fn seek(body: &Body, target: &Array1<f32>) -> Array1<f32> {
    seek_limited(body, target, body.max_force)
}

/// [`seek`] with an explicit force cap.
pub fn seek_limited(body: &Body, target: &Array1<f32>, max: f32) -> Array1<f32> {
    if distance(&body.pos, target) < f32::EPSILON {
        return zero();
    }
    let desired = normalized(&(target - &body.pos)) * body.max_speed;
    steer(body, &desired, max)
}

/// The opposite of [`seek`].
pub fn flee(body: &Body, target: &Array1<f32>) -> Array1<f32> {
    -seek(body, target)
}

/// Seeks, slowing linearly inside [`ARRIVE_RADIUS`].
pub fn arrive(body: &Body, target: &Array1<f32>) -> Array1<f32> {
    let d = distance(&body.pos, target);
    if d < f32::EPSILON {
        return zero();
    }
    let speed = body.max_speed * (d / ARRIVE_RADIUS).clamp(0.0, 1.0);
    let desired = normalized(&(target - &body.pos)) * speed;
    steer(body, &desired, body.max_force)
}

/// Seeks where the target will be if it keeps its velocity for as many ticks
/// as the body needs to cover the current distance.
pub fn pursue(body: &Body, target_pos: &Array1<f32>, target_vel: &Array1<f32>) -> Array1<f32> {
    let d = distance(&body.pos, target_pos);
    let prediction = target_pos + &(target_vel * (d / body.max_speed));
    seek(body, &prediction)
}

/// Smooth random drift.
///
/// `theta` is the agent's persistent wander angle; it takes a random step
/// after the force is computed.
pub fn wander<R: Rng + ?Sized>(body: &Body, theta: &mut f32, rng: &mut R) -> Array1<f32> {
    let anchor = &body.pos + &(normalized(&body.vel) * WANDER_DISTANCE);
    let angle = *theta + body.heading();
    let target = anchor + from_angle(angle, WANDER_RADIUS);
    let force = seek(body, &target);
    *theta += rng.random_range(-WANDER_DISPLACEMENT..WANDER_DISPLACEMENT);
    force
}

/// Pushes away from walls crossed by the feelers.
///
/// Every feeler that crosses a wall adds a push of twice `max_force` away
/// from its hit point, so a wall seen by two feelers pushes twice. The sum is
/// capped at `max_force`.
pub fn avoid_obstacles(body: &Body, obstacles: &[Rect<f32>]) -> Array1<f32> {
    let start = to_coord(&body.pos);
    let heading = body.heading();
    let mut force = zero();
    let mut hit_any = false;

    for offset in AVOID_RAY_ANGLES {
        let tip = &body.pos + &from_angle(heading + offset, AVOID_RAY_LENGTH);
        let feeler = Line::new(start, to_coord(&tip));
        for wall in obstacles {
            if let Some(hit) = ray_rect_intersection(&feeler, wall) {
                let away = normalized(&(&body.pos - &vec2(hit.x, hit.y)));
                force += &(away * (2.0 * body.max_force));
                hit_any = true;
            }
        }
    }

    if hit_any {
        limit(&mut force, body.max_force);
    }
    force
}

/// Steers back inside `bounds` once within `margin` of an edge.
///
/// The vertical correction overrides the horizontal one.
pub fn boundaries(body: &Body, bounds: &Rect<f32>, margin: f32) -> Array1<f32> {
    let (min, max) = (bounds.min(), bounds.max());
    let (x, y) = (body.pos[0], body.pos[1]);
    let mut desired = None;

    if x < min.x + margin {
        desired = Some(vec2(body.max_speed, body.vel[1]));
    } else if x > max.x - margin {
        desired = Some(vec2(-body.max_speed, body.vel[1]));
    }
    if y < min.y + margin {
        desired = Some(vec2(body.vel[0], body.max_speed));
    } else if y > max.y - margin {
        desired = Some(vec2(body.vel[0], -body.max_speed));
    }

    match desired {
        Some(mut desired) => {
            set_magnitude(&mut desired, body.max_speed);
            steer(body, &desired, body.max_force)
        }
        None => zero(),
    }
}

/// Steers away from `neighbours` closer than `desired_separation`.
///
/// Closer neighbours push harder (inverse distance weighting).
pub fn separation(body: &Body, neighbours: &[Array1<f32>], desired_separation: f32) -> Array1<f32> {
    let mut sum = zero();
    let mut count = 0usize;
    for other in neighbours {
        let d = distance(&body.pos, other);
        if d > 0.0 && d < desired_separation {
            sum += &(normalized(&(&body.pos - other)) / d);
            count += 1;
        }
    }
    if count == 0 {
        return zero();
    }
    sum /= count as f32;
    set_magnitude(&mut sum, body.max_speed);
    steer(body, &sum, body.max_force)
}
