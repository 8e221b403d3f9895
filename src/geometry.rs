//! Cell-space geometry shared by every generation stage
//!
//! Cells are addressed by integer coordinates with `x` growing east and
//! `y` growing south, so `North` is `(0, -1)`.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Integer 2D cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean length when treated as a vector.
    pub fn length(self) -> f32 {
        ((self.x * self.x + self.y * self.y) as f32).sqrt()
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (other - self).length()
    }

    /// Squared distance, exact in integer arithmetic.
    pub fn distance_sq(self, other: Point) -> i64 {
        let dx = (other.x - self.x) as i64;
        let dy = (other.y - self.y) as i64;
        dx * dx + dy * dy
    }

    pub fn step(self, dir: Direction) -> Point {
        self + dir.offset()
    }

    /// Offset by `distance` cells along `angle` (radians), truncating toward zero.
    pub fn offset_polar(self, distance: f32, angle: f32) -> Point {
        let dx = distance * angle.cos();
        let dy = distance * angle.sin();
        Point::new(self.x + dx as i32, self.y + dy as i32)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight single-cell steps used by random walks.
pub const NEIGHBOURS_8: [Point; 8] = [
    Point::new(-1, -1),
    Point::new(0, -1),
    Point::new(1, -1),
    Point::new(-1, 0),
    Point::new(1, 0),
    Point::new(-1, 1),
    Point::new(0, 1),
    Point::new(1, 1),
];

/// Cardinal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn offset(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::East => Point::new(1, 0),
            Direction::South => Point::new(0, 1),
            Direction::West => Point::new(-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn rotate_cw(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn rotate_ccw(self) -> Direction {
        self.rotate_cw().opposite()
    }

    /// Direction of the dominant axis from `from` toward `to`.
    /// Returns `None` when both points coincide.
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        let d = to - from;
        if d.x == 0 && d.y == 0 {
            return None;
        }
        Some(if d.x.abs() >= d.y.abs() {
            if d.x > 0 { Direction::East } else { Direction::West }
        } else if d.y > 0 {
            Direction::South
        } else {
            Direction::North
        })
    }

    /// Single-letter name used in tileset connection keys.
    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }

    pub fn from_letter(c: char) -> Option<Direction> {
        match c {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }
}

/// Axis-aligned cell rectangle, `left`/`top` inclusive, `right`/`bottom` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub const fn from_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// Shrink by `margin` on every side. May produce an empty rectangle.
    pub fn inset(&self, margin: i32) -> Rect {
        Rect::from_ltrb(self.left + margin, self.top + margin, self.right - margin, self.bottom - margin)
    }

    /// Geometric center, as floating point cell coordinates.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) as f32 / 2.0,
            (self.top + self.bottom) as f32 / 2.0,
        )
    }

    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (self.top..self.bottom).flat_map(move |y| (self.left..self.right).map(move |x| Point::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_rotation_cycles() {
        for dir in Direction::ALL {
            assert_eq!(dir.rotate_cw().rotate_cw().rotate_cw().rotate_cw(), dir);
            assert_eq!(dir.rotate_cw().rotate_ccw(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.rotate_cw(), dir.opposite());
        }
    }

    #[test]
    fn test_direction_between_neighbours() {
        let p = Point::new(5, 5);
        for dir in Direction::ALL {
            assert_eq!(Direction::between(p, p.step(dir)), Some(dir));
        }
        assert_eq!(Direction::between(p, p), None);
    }

    #[test]
    fn test_rect_inset_and_contains() {
        let r = Rect::from_ltrb(1, 1, 11, 21);
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 20);
        assert!(r.contains(Point::new(1, 1)));
        assert!(!r.contains(Point::new(11, 5)));

        let inner = r.inset(5);
        assert!(inner.is_empty());
        assert!(!r.inset(4).is_empty());
        assert_eq!(r.cells().count(), 200);
    }
}
