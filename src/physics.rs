use crate::config::{
    GRAVITY, MAX_FALL_SPEED, PLAYER_CLIMB_SPEED, PLAYER_JUMP_SPEED, PLAYER_MOVE_SPEED,
};
use crate::geometry::Aabb;
use crate::level::{Level, Tile};
use ggez::glam::Vec2;

/// Direction of vertical movement requested while on a ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Climb {
    Up,
    Down,
    #[default]
    Hold,
}

/// Something moving through a level and colliding with its ground tiles
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Hitbox in world pixels
    pub bounds: Aabb,

    /// Pixels per second, y grows downwards
    pub velocity: Vec2,

    /// Requested ladder movement, ignored when not on a ladder
    pub climb: Climb,

    /// Whether the last step ended resting on ground
    pub on_ground: bool,

    /// Whether the body currently overlaps a ladder
    pub on_ladder: bool,
}

impl Body {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            velocity: Vec2::ZERO,
            climb: Climb::Hold,
            on_ground: false,
            on_ladder: false,
        }
    }

    #[inline]
    pub fn move_left(&mut self) {
        self.velocity.x = -PLAYER_MOVE_SPEED;
    }

    #[inline]
    pub fn move_right(&mut self) {
        self.velocity.x = PLAYER_MOVE_SPEED;
    }

    #[inline]
    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.;
    }

    #[inline]
    pub fn stop_vertical(&mut self) {
        self.climb = Climb::Hold;
        if self.on_ladder {
            self.velocity.y = 0.;
        }
    }

    /// Jump if standing on something. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.can_jump() {
            return false;
        }
        self.velocity.y = -PLAYER_JUMP_SPEED;
        self.on_ground = false;
        true
    }

    #[inline]
    pub fn can_jump(&self) -> bool {
        self.on_ground
    }
}

/// Advance `body` by `delta` seconds through `level`.
///
/// Movement is resolved one axis at a time, horizontal first. Ground tiles are
/// solid from every side. On a ladder gravity is off and the climb request sets
/// the vertical speed.
pub fn step(body: &mut Body, level: &Level, delta: f32) {
    body.on_ladder = level.touches(body.bounds, Tile::Ladder);

    if body.on_ladder {
        body.velocity.y = match body.climb {
            Climb::Up => -PLAYER_CLIMB_SPEED,
            Climb::Down => PLAYER_CLIMB_SPEED,
            Climb::Hold => 0.,
        };
    } else {
        body.velocity.y = (body.velocity.y + GRAVITY * delta).min(MAX_FALL_SPEED);
    }

    // Horizontal
    body.bounds.x += body.velocity.x * delta;
    let hits: Vec<Aabb> = level.overlapping(body.bounds, Tile::Ground).collect();
    for tile in hits {
        if body.velocity.x > 0. {
            body.bounds.x = body.bounds.x.min(tile.x - body.bounds.w);
        } else if body.velocity.x < 0. {
            body.bounds.x = body.bounds.x.max(tile.right());
        }
    }

    // Vertical
    body.bounds.y += body.velocity.y * delta;
    body.on_ground = false;
    let mut blocked = false;
    let hits: Vec<Aabb> = level.overlapping(body.bounds, Tile::Ground).collect();
    for tile in hits {
        if body.velocity.y > 0. {
            body.bounds.y = body.bounds.y.min(tile.y - body.bounds.h);
            body.on_ground = true;
        } else if body.velocity.y < 0. {
            body.bounds.y = body.bounds.y.max(tile.bottom());
        }
        blocked = true;
    }

    if blocked {
        body.velocity.y = 0.;
    }

    // Resting on ground is only detected while falling into it, so probe
    // right below the feet as well
    if !body.on_ground && body.velocity.y >= 0. {
        let feet = Aabb::new(body.bounds.x, body.bounds.bottom(), body.bounds.w, 1.);
        body.on_ground = level.touches(feet, Tile::Ground);
    }
}

/// A walker patrolling back and forth, turning around at walls and map edges
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub bounds: Aabb,

    /// Pixels per second, negative is left
    pub speed: f32,
}

impl Enemy {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            speed: -PLAYER_MOVE_SPEED * 0.5,
        }
    }

    pub fn walk(&mut self, level: &Level, delta: f32) {
        let before = self.bounds;
        self.bounds.x += self.speed * delta;

        let off_map = self.bounds.x < 0. || self.bounds.right() > level.pixel_width();
        if off_map || level.touches(self.bounds, Tile::Ground) {
            self.bounds = before;
            self.speed = -self.speed;
        }
    }
}
