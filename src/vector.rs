use std::{fmt, ops::Add};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const fn new(x: i32, y: i32) -> Self {
        Vector { x, y }
    }

    pub fn scale(self, k: i32) -> Self {
        Vector::new(self.x * k, self.y * k)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Size of the toroidal playground. Both sides are positive once the
/// config that produced them has been validated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Bounds { width, height }
    }

    pub fn center(&self) -> Vector {
        Vector::new(self.width / 2, self.height / 2)
    }

    /// Maps any coordinate back onto the playground, re-entering on the
    /// opposite edge. Uses euclidean remainder so negatives wrap too.
    pub fn wrap(&self, v: Vector) -> Vector {
        Vector::new(v.x.rem_euclid(self.width), v.y.rem_euclid(self.height))
    }

    pub fn contains(&self, v: Vector) -> bool {
        (0..self.width).contains(&v.x) && (0..self.height).contains(&v.y)
    }
}
