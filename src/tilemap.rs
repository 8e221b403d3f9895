//! Dense 2D grid used for every map layer.
//!
//! Unlike a world map, a skirmish map does not wrap: lookups outside the
//! grid return `None` and writes outside it are dropped.

use crate::geometry::Point;

#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some(p.y as usize * self.width + p.x as usize)
        } else {
            None
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    pub fn get(&self, p: Point) -> Option<&T> {
        self.index(p).map(|i| &self.data[i])
    }

    pub fn get_mut(&mut self, p: Point) -> Option<&mut T> {
        self.index(p).map(move |i| &mut self.data[i])
    }

    /// Returns `false` when `p` lies outside the grid.
    pub fn set(&mut self, p: Point, value: T) -> bool {
        match self.index(p) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Iterate over all cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = (idx % width) as i32;
            let y = (idx / width) as i32;
            (Point::new(x, y), val)
        })
    }

    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.data.iter().filter(|v| pred(v)).count()
    }
}
