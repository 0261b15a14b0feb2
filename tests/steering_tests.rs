#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use globys_escape::simulation::agent::Body;
use globys_escape::simulation::geometric_utils::{magnitude, obstacle, vec2};
use globys_escape::simulation::steering;
use geo::{Coord, Rect};

const EPS: f32 = 1e-5;

fn body_at(x: f32, y: f32) -> Body {
    Body::new(vec2(x, y), 4.0, 0.1, 20.0)
}

fn world() -> Rect<f32> {
    Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 800.0, y: 600.0 })
}

#[test]
fn test_seek_at_own_position_is_zero() {
    let body = body_at(10.0, 10.0);
    let force = steering::seek(&body, &vec2(10.0, 10.0));
    assert_eq!(force[0], 0.0);
    assert_eq!(force[1], 0.0);
}

#[test]
fn test_seek_along_positive_x() {
    let body = body_at(0.0, 0.0);
    let force = steering::seek(&body, &vec2(100.0, 0.0));

    // desired (4, 0) minus zero velocity, limited to max_force
    assert!((force[0] - 0.1).abs() < EPS);
    assert!(force[1].abs() < EPS);
}

#[test]
fn test_flee_is_opposite_of_seek() {
    let mut body = body_at(50.0, 50.0);
    body.vel = vec2(1.0, -0.5);
    let target = vec2(200.0, 120.0);

    let seek = steering::seek(&body, &target);
    let flee = steering::flee(&body, &target);
    assert!((seek[0] + flee[0]).abs() < EPS);
    assert!((seek[1] + flee[1]).abs() < EPS);
}

#[test]
fn test_arrive_slows_inside_radius() {
    let mut body = body_at(0.0, 0.0);
    body.max_force = 100.0;

    // Half the arrival radius away: desired speed is half of max_speed
    let near = steering::arrive(&body, &vec2(50.0, 0.0));
    assert!((near[0] - 2.0).abs() < EPS);

    let far = steering::arrive(&body, &vec2(500.0, 0.0));
    assert!((far[0] - 4.0).abs() < EPS);
}

#[test]
fn test_pursue_leads_a_moving_target() {
    let mut body = Body::new(vec2(0.0, 0.0), 2.0, 100.0, 20.0);
    body.vel = vec2(0.0, 0.0);

    // Target 100 away moving up: predicted 50 ticks ahead at (100, 50)
    let force = steering::pursue(&body, &vec2(100.0, 0.0), &vec2(0.0, 1.0));
    let expected_y = 2.0 * 50.0 / (100.0f32.powi(2) + 50.0f32.powi(2)).sqrt();
    assert!(force[1] > 0.0);
    assert!((force[1] - expected_y).abs() < 1e-4);
}

#[test]
fn test_wander_steps_theta_and_respects_force_cap() {
    let mut body = body_at(300.0, 300.0);
    body.vel = vec2(1.0, 0.0);
    let mut theta = 0.0;
    let mut rng = rand::rng();

    for _ in 0..50 {
        let before = theta;
        let force = steering::wander(&body, &mut theta, &mut rng);
        assert!(magnitude(&force) <= body.max_force + EPS);
        assert!((theta - before).abs() <= 0.3 + EPS);
    }
}

#[test]
fn test_avoid_obstacles_steers_away_from_wall_ahead() {
    let mut body = body_at(0.0, 50.0);
    body.vel = vec2(1.0, 0.0);
    let walls = vec![obstacle(50.0, 0.0, 20.0, 100.0)];

    let force = steering::avoid_obstacles(&body, &walls);
    assert!(force[0] < 0.0);
    assert!(force[1].abs() < 1e-4);
    assert!((magnitude(&force) - body.max_force).abs() < 1e-4);
}

#[test]
fn test_avoid_obstacles_counts_every_feeler_that_hits() {
    // Only the centre and +25° feelers reach the wall's left edge
    let mut body = body_at(0.0, 0.0);
    body.vel = vec2(1.0, 0.0);
    let walls = vec![obstacle(50.0, -10.0, 100.0, 110.0)];

    let force = steering::avoid_obstacles(&body, &walls);
    assert!((force[0] + 0.0976).abs() < 1e-3);
    assert!((force[1] + 0.0216).abs() < 1e-3);
    assert!((magnitude(&force) - body.max_force).abs() < 1e-4);
}

#[test]
fn test_avoid_obstacles_without_hits_is_zero() {
    let mut body = body_at(0.0, 50.0);
    body.vel = vec2(1.0, 0.0);
    let walls = vec![obstacle(500.0, 500.0, 20.0, 20.0)];

    let force = steering::avoid_obstacles(&body, &walls);
    assert_eq!(magnitude(&force), 0.0);
}

#[test]
fn test_boundaries_push_inward() {
    let left = body_at(10.0, 300.0);
    let force = steering::boundaries(&left, &world(), 50.0);
    assert!((force[0] - 0.1).abs() < EPS);
    assert!(force[1].abs() < EPS);

    let centre = body_at(400.0, 300.0);
    let force = steering::boundaries(&centre, &world(), 50.0);
    assert_eq!(magnitude(&force), 0.0);
}

#[test]
fn test_boundaries_vertical_overrides_horizontal() {
    let corner = body_at(10.0, 10.0);
    let force = steering::boundaries(&corner, &world(), 50.0);

    // Desired keeps the current x velocity (zero) and points down
    assert!(force[0].abs() < EPS);
    assert!((force[1] - 0.1).abs() < EPS);
}

#[test]
fn test_separation_pushes_apart() {
    let body = body_at(0.0, 0.0);
    let force = steering::separation(&body, &[vec2(10.0, 0.0)], 100.0);
    assert!(force[0] < 0.0);
    assert!(magnitude(&force) <= body.max_force + EPS);

    let alone = steering::separation(&body, &[vec2(500.0, 0.0)], 100.0);
    assert_eq!(magnitude(&alone), 0.0);
}

#[test]
fn test_update_caps_speed_and_clears_acceleration() {
    let mut body = body_at(0.0, 0.0);
    body.apply_force(&vec2(30.0, 40.0));
    body.update();

    assert!(body.speed() <= body.max_speed + EPS);
    assert_eq!(body.acc[0], 0.0);
    assert_eq!(body.acc[1], 0.0);
    assert!((body.pos[0] - 2.4).abs() < EPS);
    assert!((body.pos[1] - 3.2).abs() < EPS);
}

#[test]
fn test_push_out_of_moves_away_from_wall_centre() {
    let mut body = Body::new(vec2(120.0, 50.0), 3.0, 0.2, 50.0);
    let walls = vec![obstacle(0.0, 0.0, 100.0, 100.0)];

    assert!(body.push_out_of(&walls));
    assert!((body.pos[0] - 125.0).abs() < EPS);
    assert!((body.pos[1] - 50.0).abs() < EPS);

    let mut clear = Body::new(vec2(400.0, 400.0), 3.0, 0.2, 50.0);
    assert!(!clear.push_out_of(&walls));
}

#[test]
fn test_edges_wrap_around() {
    let mut body = body_at(825.0, 300.0);
    body.edges(&world());
    assert_eq!(body.pos[0], -20.0);
}
