//! Collision detection and response
//!
//! Every entity is a square described by its top-left corner and side
//! length. The same square is tested either as an axis-aligned box or as the
//! circle inscribed in it, depending on `CollisionShape`.

use glam::Vec2;

use super::physics::nearest_image_shift;
use super::state::{Asteroid, Bullet, Player};
use crate::box_center;
use crate::settings::{BoundaryPolicy, CollisionShape, Settings, SplitRules};

/// Anything that occupies a square of the arena
pub trait Hitbox {
    /// Top-left corner
    fn origin(&self) -> Vec2;
    fn size(&self) -> f32;

    fn center(&self) -> Vec2 {
        box_center(self.origin(), self.size())
    }
}

impl Hitbox for Player {
    fn origin(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

impl Hitbox for Asteroid {
    fn origin(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

impl Hitbox for Bullet {
    fn origin(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

/// Strict box overlap (touching edges do not collide)
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: f32, b_pos: Vec2, b_size: f32) -> bool {
    a_pos.x < b_pos.x + b_size
        && a_pos.x + a_size > b_pos.x
        && a_pos.y < b_pos.y + b_size
        && a_pos.y + a_size > b_pos.y
}

/// Strict overlap of the circles inscribed in two squares
#[inline]
pub fn circle_overlap(a_pos: Vec2, a_size: f32, b_pos: Vec2, b_size: f32) -> bool {
    let reach = (a_size + b_size) / 2.0;
    box_center(a_pos, a_size).distance_squared(box_center(b_pos, b_size)) < reach * reach
}

fn shape_overlap(
    shape: CollisionShape,
    a_pos: Vec2,
    a_size: f32,
    b_pos: Vec2,
    b_size: f32,
) -> bool {
    match shape {
        CollisionShape::Aabb => aabb_overlap(a_pos, a_size, b_pos, b_size),
        CollisionShape::Circle => circle_overlap(a_pos, a_size, b_pos, b_size),
    }
}

/// Overlap test for two hitboxes under the configured shape
pub fn overlaps(shape: CollisionShape, a: &impl Hitbox, b: &impl Hitbox) -> bool {
    shape_overlap(shape, a.origin(), a.size(), b.origin(), b.size())
}

/// Offset from `b` to the copy of `b` that `a` actually meets
///
/// Zero on a walled arena. On a wrapping arena this is the nearest periodic
/// copy, so contact carries across the edges.
pub fn image_shift(settings: &Settings, a: &impl Hitbox, b: &impl Hitbox) -> Vec2 {
    match settings.boundary {
        BoundaryPolicy::Reflect => Vec2::ZERO,
        BoundaryPolicy::Wrap => nearest_image_shift(
            a.center(),
            b.center(),
            settings.arena_width,
            settings.arena_height,
        ),
    }
}

/// Overlap test under the arena's shape and boundary rules
pub fn touching(settings: &Settings, a: &impl Hitbox, b: &impl Hitbox) -> bool {
    let b_pos = b.origin() + image_shift(settings, a, b);
    shape_overlap(settings.collision_shape, a.origin(), a.size(), b_pos, b.size())
}

/// Which member of a colliding pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    First,
    Second,
}

/// A piece of a split asteroid, before it gets an ID
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

/// How an overlapping asteroid pair resolves
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    /// Already moving apart; nothing to do
    Separating,
    /// Exchange velocities; `push` moves the first asteroid and `-push` the
    /// second so their circles no longer overlap
    Bounce {
        first_vel: Vec2,
        second_vel: Vec2,
        push: Vec2,
    },
    /// Replace the slower asteroid with two fragments
    Split {
        slower: PairSide,
        fragments: [Fragment; 2],
    },
}

/// Resolve a collision between two overlapping asteroids
///
/// The slower asteroid splits when the relative speed exceeds the threshold
/// and it is still larger than the minimum size; the faster one is left
/// untouched. Otherwise the pair swaps velocities and is pushed apart.
/// Pairs whose centers are already moving apart are left alone so
/// overlapping asteroids cannot re-trigger every tick.
pub fn resolve_asteroid_pair(a: &Asteroid, b: &Asteroid, rules: &SplitRules) -> PairOutcome {
    let rel_vel = a.vel - b.vel;
    let offset = b.center() - a.center();
    if rel_vel.dot(offset) <= 0.0 {
        return PairOutcome::Separating;
    }

    let rel_speed = rel_vel.length();
    let (slower, faster, side) = if a.vel.length_squared() < b.vel.length_squared() {
        (a, b, PairSide::First)
    } else {
        (b, a, PairSide::Second)
    };

    if rel_speed > rules.speed_threshold && slower.size > rules.min_size {
        return PairOutcome::Split {
            slower: side,
            fragments: split_fragments(slower, faster, rel_speed, rules),
        };
    }

    let overlap = ((a.size + b.size) / 2.0 - offset.length()).max(0.0);
    PairOutcome::Bounce {
        first_vel: b.vel,
        second_vel: a.vel,
        push: -offset.normalize_or(Vec2::X) * (overlap / 2.0),
    }
}

/// Two half-size fragments drifting apart perpendicular to the impact
fn split_fragments(
    slower: &Asteroid,
    faster: &Asteroid,
    rel_speed: f32,
    rules: &SplitRules,
) -> [Fragment; 2] {
    let impact = (slower.center() - faster.center()).normalize_or(Vec2::X);
    let side = impact.perp();
    let size = slower.size / 2.0;
    let spread = side * rel_speed * rules.spread;
    // Far enough apart that the fragments do not overlap each other as boxes
    let gap = side * size * 0.75;
    let center = slower.center();

    [
        Fragment {
            pos: center + gap - Vec2::splat(size / 2.0),
            vel: slower.vel + spread,
            size,
        },
        Fragment {
            pos: center - gap - Vec2::splat(size / 2.0),
            vel: slower.vel - spread,
            size,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asteroid(id: u32, pos: (f32, f32), vel: (f32, f32), size: f32) -> Asteroid {
        Asteroid {
            id,
            pos: Vec2::new(pos.0, pos.1),
            vel: Vec2::new(vel.0, vel.1),
            size,
        }
    }

    #[test]
    fn test_aabb_overlap() {
        assert!(aabb_overlap(Vec2::ZERO, 10.0, Vec2::new(5.0, 5.0), 10.0));
        // Touching edges do not count
        assert!(!aabb_overlap(Vec2::ZERO, 10.0, Vec2::new(10.0, 0.0), 10.0));
        assert!(!aabb_overlap(Vec2::ZERO, 10.0, Vec2::new(0.0, 30.0), 10.0));
    }

    #[test]
    fn test_circle_overlap_misses_box_corners() {
        // Boxes overlap at the corners, the inscribed circles do not
        let a = Vec2::ZERO;
        let b = Vec2::new(8.0, 8.0);
        assert!(aabb_overlap(a, 10.0, b, 10.0));
        assert!(!circle_overlap(a, 10.0, b, 10.0));
        assert!(circle_overlap(a, 10.0, Vec2::new(9.0, 0.0), 10.0));
    }

    #[test]
    fn test_overlaps_dispatches_on_shape() {
        let a = asteroid(1, (0.0, 0.0), (1.0, 0.0), 10.0);
        let b = asteroid(2, (8.0, 8.0), (1.0, 0.0), 10.0);
        assert!(overlaps(CollisionShape::Aabb, &a, &b));
        assert!(!overlaps(CollisionShape::Circle, &a, &b));
    }

    #[test]
    fn test_touching_across_wrapped_edge() {
        let ship = Player {
            pos: Vec2::new(5.0, 300.0),
            vel: Vec2::ZERO,
            size: 20.0,
            firing: false,
        };
        let rock = asteroid(1, (790.0, 295.0), (1.0, 0.0), 30.0);

        let walled = Settings::default();
        assert!(!touching(&walled, &ship, &rock));

        let wrapping = Settings {
            boundary: BoundaryPolicy::Wrap,
            ..Settings::default()
        };
        assert!(touching(&wrapping, &ship, &rock));
        assert_eq!(image_shift(&wrapping, &ship, &rock), Vec2::new(-800.0, 0.0));

        // Far side of the arena is still far away
        let distant = asteroid(2, (400.0, 295.0), (1.0, 0.0), 30.0);
        assert!(!touching(&wrapping, &ship, &distant));
    }

    #[test]
    fn test_fast_impact_splits_slower() {
        let rules = SplitRules::default();
        let fast = asteroid(1, (100.0, 100.0), (200.0, 0.0), 30.0);
        let slow = asteroid(2, (120.0, 100.0), (-10.0, 5.0), 30.0);

        let PairOutcome::Split { slower, fragments } = resolve_asteroid_pair(&fast, &slow, &rules)
        else {
            panic!("expected a split");
        };
        assert_eq!(slower, PairSide::Second);
        for f in &fragments {
            assert_eq!(f.size, 15.0);
        }
        // Fragments diverge from each other
        let closing = (fragments[1].vel - fragments[0].vel)
            .dot(box_center(fragments[1].pos, 15.0) - box_center(fragments[0].pos, 15.0));
        assert!(closing > 0.0);
        assert!(!aabb_overlap(fragments[0].pos, 15.0, fragments[1].pos, 15.0));
    }

    #[test]
    fn test_slow_impact_bounces() {
        let rules = SplitRules::default();
        let a = asteroid(1, (100.0, 100.0), (30.0, 0.0), 30.0);
        let b = asteroid(2, (120.0, 100.0), (-20.0, 0.0), 30.0);
        assert_eq!(
            resolve_asteroid_pair(&a, &b, &rules),
            PairOutcome::Bounce {
                first_vel: Vec2::new(-20.0, 0.0),
                second_vel: Vec2::new(30.0, 0.0),
                push: Vec2::new(-5.0, 0.0),
            }
        );
    }

    #[test]
    fn test_small_asteroids_never_split() {
        let rules = SplitRules::default();
        let fast = asteroid(1, (100.0, 100.0), (300.0, 0.0), 10.0);
        let slow = asteroid(2, (105.0, 100.0), (0.0, 1.0), 10.0);
        assert!(matches!(
            resolve_asteroid_pair(&fast, &slow, &rules),
            PairOutcome::Bounce { .. }
        ));
    }

    #[test]
    fn test_separating_pair_is_left_alone() {
        let rules = SplitRules::default();
        let a = asteroid(1, (100.0, 100.0), (-300.0, 0.0), 30.0);
        let b = asteroid(2, (120.0, 100.0), (300.0, 0.0), 30.0);
        assert_eq!(resolve_asteroid_pair(&a, &b, &rules), PairOutcome::Separating);
    }
}
