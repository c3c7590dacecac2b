use num::traits::{Float, Num};
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// A 3D vector generic over any numeric type.
///
/// Used for body and vessel positions in world space as well as for the unit
/// directions describing surface patches.
///
/// # Type Parameters
/// * `T` - The functionality for the vector depends on traits implemented by `T`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Vec3D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
    /// The z-component of the vector.
    z: T,
}

impl<T: Copy> Vec3D<T> {
    /// Creates a new vector with the given components.
    pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }

    /// Returns the z-component of the vector.
    pub const fn z(&self) -> T { self.z }
}

impl<T: Num + Copy> Vec3D<T> {
    /// Creates a zero vector (x = 0, y = 0, z = 0).
    pub fn zero() -> Self { Self::new(T::zero(), T::zero(), T::zero()) }

    /// Computes the dot product of the current vector with another vector.
    ///
    /// ```text
    /// dot_product = (x1 * x2) + (y1 * y2) + (z1 * z2)
    /// ```
    pub fn dot(self, other: Vec3D<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Creates a vector pointing from the current vector (`self`) to another vector (`other`).
    pub fn to(&self, other: &Vec3D<T>) -> Vec3D<T> {
        Vec3D::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }
}

impl<T: Float> Vec3D<T> {
    /// Computes the magnitude (absolute value) of the vector.
    pub fn abs(&self) -> T { self.dot(*self).sqrt() }

    /// Returns `true` if no component is `NaN` or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Normalizes the vector to a magnitude of 1.
    ///
    /// # Returns
    /// `None` if the vector has zero length or non-finite components, since no
    /// direction can be derived from it.
    pub fn try_normalize(self) -> Option<Self> {
        if !self.is_finite() {
            return None;
        }
        let magnitude = self.abs();
        if magnitude <= T::epsilon() {
            None
        } else {
            Some(Self::new(self.x / magnitude, self.y / magnitude, self.z / magnitude))
        }
    }
}

impl<T: Num> Add for Vec3D<T> {
    type Output = Vec3D<T>;

    fn add(self, rhs: Self) -> Self::Output {
        Self::Output { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<T: Num> Sub for Vec3D<T> {
    type Output = Vec3D<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::Output { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<T: Num + Copy> Mul<T> for Vec3D<T> {
    type Output = Vec3D<T>;

    /// Implements the `*` operator for a `Vec3D` and a scalar.
    fn mul(self, rhs: T) -> Self::Output {
        Self::Output { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
    }
}

impl<T: Neg<Output = T>> Neg for Vec3D<T> {
    type Output = Vec3D<T>;

    fn neg(self) -> Self::Output { Self::Output { x: -self.x, y: -self.y, z: -self.z } }
}

impl<T: Display> Display for Vec3D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}
