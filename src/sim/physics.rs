//! Boundary laws for the rectangular arena

use glam::Vec2;

use crate::settings::BoundaryPolicy;

/// Keep a square fully inside the arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, size: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (width - size).max(0.0)),
        pos.y.clamp(0.0, (height - size).max(0.0)),
    )
}

/// Bounce a square off the arena walls
///
/// The outward velocity component is negated and the square is pushed back
/// inside, so the position is always within `[0, W-size] x [0, H-size]`.
pub fn reflect(pos: Vec2, vel: Vec2, size: f32, width: f32, height: f32) -> (Vec2, Vec2) {
    let mut vel = vel;
    if pos.x < 0.0 {
        vel.x = vel.x.abs();
    } else if pos.x + size > width {
        vel.x = -vel.x.abs();
    }
    if pos.y < 0.0 {
        vel.y = vel.y.abs();
    } else if pos.y + size > height {
        vel.y = -vel.y.abs();
    }
    (clamp_to_arena(pos, size, width, height), vel)
}

/// Wrap a coordinate into [0, extent)
#[inline]
fn wrap_axis(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Teleport a square's origin to the opposite edge once it leaves the arena
pub fn wrap(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(wrap_axis(pos.x, width), wrap_axis(pos.y, height))
}

/// Shift that moves `target` onto its periodic copy nearest `from`
///
/// Both points are centers. On a wrapping arena an entity near the right
/// edge is also next to anything near the left edge.
pub fn nearest_image_shift(from: Vec2, target: Vec2, width: f32, height: f32) -> Vec2 {
    let axis = |d: f32, extent: f32| {
        if d > extent / 2.0 {
            -extent
        } else if d < -extent / 2.0 {
            extent
        } else {
            0.0
        }
    };
    let d = target - from;
    Vec2::new(axis(d.x, width), axis(d.y, height))
}

/// Origins at which a wrapped square shows up on screen
///
/// The square itself, plus the copies poking in from the left and top edges
/// while it straddles the right or bottom edge.
pub fn wrap_images(pos: Vec2, size: f32, width: f32, height: f32) -> Vec<Vec2> {
    let over_x = pos.x + size > width;
    let over_y = pos.y + size > height;
    let mut images = vec![pos];
    if over_x {
        images.push(pos - Vec2::new(width, 0.0));
    }
    if over_y {
        images.push(pos - Vec2::new(0.0, height));
    }
    if over_x && over_y {
        images.push(pos - Vec2::new(width, height));
    }
    images
}

/// Apply the boundary policy to a moved square
pub fn confine(
    policy: BoundaryPolicy,
    pos: Vec2,
    vel: Vec2,
    size: f32,
    width: f32,
    height: f32,
) -> (Vec2, Vec2) {
    match policy {
        BoundaryPolicy::Reflect => reflect(pos, vel, size, width, height),
        BoundaryPolicy::Wrap => (wrap(pos, width, height), vel),
    }
}
