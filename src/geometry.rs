use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A location on the fixed-pitch fabrication grid, in grid units.
///
/// All routing math is exact-integer; there is no floating-point drift
/// anywhere on the coordinate path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// A displacement between two grid points.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Point {
        Point { x, y }
    }

    pub fn to_vector(self) -> Vector {
        Vector {
            x: self.x,
            y: self.y,
        }
    }
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Vector {
        Vector { x, y }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Manhattan length. Segment lengths in this crate are always measured
    /// this way since every segment is axis-aligned.
    pub fn manhattan_len(self) -> i64 {
        self.x.abs() + self.y.abs()
    }

    pub fn to_point(self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, rhs: Vector) -> Point {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Mul<i64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: i64) -> Vector {
        Vector {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rigid transform on the grid: a counterclockwise rotation in 90-degree
/// increments, an optional mirror at the x axis (applied before the
/// rotation), and an integer displacement (applied after).
///
/// Applying a transform to the origin yields its displacement, and the
/// angle of a transform is invariant under translation. Composition via
/// `Mul` is associative but not commutative, and `(a * b).apply(p)` equals
/// `a.apply(b.apply(p))`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trans {
    /// Rotation in quarter turns, 0..=3.
    pub angle: u8,
    /// Mirror at the x axis, applied before the rotation.
    pub mirror: bool,
    pub disp: Vector,
}

impl Trans {
    pub const IDENTITY: Trans = Trans {
        angle: 0,
        mirror: false,
        disp: Vector::ZERO,
    };

    pub fn new(angle: u8, mirror: bool, x: i64, y: i64) -> Trans {
        Trans {
            angle: angle % 4,
            mirror,
            disp: Vector::new(x, y),
        }
    }

    /// A pure translation.
    pub fn shift(x: i64, y: i64) -> Trans {
        Trans::new(0, false, x, y)
    }

    /// A pure rotation by `angle` quarter turns.
    pub fn rotation(angle: u8) -> Trans {
        Trans::new(angle, false, 0, 0)
    }

    /// The linear part only: mirror, then rotate. Displacements between
    /// frames transform this way since they carry no translation.
    pub fn apply_vector(&self, v: Vector) -> Vector {
        let v = if self.mirror {
            Vector::new(v.x, -v.y)
        } else {
            v
        };
        match self.angle % 4 {
            0 => v,
            1 => Vector::new(-v.y, v.x),
            2 => Vector::new(-v.x, -v.y),
            _ => Vector::new(v.y, -v.x),
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        (self.apply_vector(p.to_vector()) + self.disp).to_point()
    }

    pub fn inverted(&self) -> Trans {
        // A mirrored linear part is its own inverse; a plain rotation
        // inverts to the complementary quarter turn.
        let angle = if self.mirror {
            self.angle
        } else {
            (4 - self.angle) % 4
        };
        let linear = Trans::new(angle, self.mirror, 0, 0);
        let disp = -linear.apply_vector(self.disp);
        Trans {
            angle,
            mirror: self.mirror,
            disp,
        }
    }

    /// This transform expressed in `frame`'s local coordinates.
    pub fn relative_to(&self, frame: &Trans) -> Trans {
        frame.inverted() * *self
    }
}

impl Mul for Trans {
    type Output = Trans;

    fn mul(self, rhs: Trans) -> Trans {
        let angle = if self.mirror {
            (self.angle as i32 - rhs.angle as i32).rem_euclid(4) as u8
        } else {
            (self.angle + rhs.angle) % 4
        };
        Trans {
            angle,
            mirror: self.mirror ^ rhs.mirror,
            disp: self.disp + self.apply_vector(rhs.disp),
        }
    }
}

impl fmt::Display for Trans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r{}{} {}",
            self.angle as u32 * 90,
            if self.mirror { "m" } else { "" },
            self.disp
        )
    }
}
