use ggez::glam::Vec2;
use ggez::graphics::Rect;
use ggez::mint::Point2;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;

/// Axis aligned box in world pixels. `x`/`y` is the top left corner, y grows
/// downwards like the screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// The box covering the tile at `col`/`row`
    pub fn tile(col: usize, row: usize, size: f32) -> Self {
        Self::new(col as f32 * size, row as f32 * size, size, size)
    }

    /// A `w`x`h` box standing on the bottom of the tile at `col`/`row`,
    /// centered horizontally.
    pub fn standing_in(col: usize, row: usize, size: f32, (w, h): (f32, f32)) -> Self {
        let tile = Self::tile(col, row, size);
        Self::new(tile.x + (size - w) * 0.5, tile.bottom() - h, w, h)
    }

    /// A `w`x`h` box centered in the tile at `col`/`row`
    pub fn centered_in(col: usize, row: usize, size: f32, (w, h): (f32, f32)) -> Self {
        let tile = Self::tile(col, row, size);
        Self::new(tile.x + (size - w) * 0.5, tile.y + (size - h) * 0.5, w, h)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap, boxes merely touching do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

impl From<Aabb> for Rect {
    fn from(value: Aabb) -> Self {
        Rect::new(value.x, value.y, value.w, value.h)
    }
}

/// Random point within the given bounds. Empty ranges collapse to their start.
#[inline]
pub fn random_pos<T>(bounds_x: (T, T), bounds_y: (T, T)) -> Point2<T>
where
    T: SampleUniform + PartialOrd + Copy,
{
    let mut rng = rand::thread_rng();
    let mut pick = |(min, max): (T, T)| {
        if min < max {
            rng.gen_range(min..max)
        } else {
            min
        }
    };

    Point2 {
        x: pick(bounds_x),
        y: pick(bounds_y),
    }
}
