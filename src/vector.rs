//! 2D vector value type used for every position in the simulation
//!
//! Thin wrapper over `glam::DVec2` that refuses division by zero instead of
//! producing infinities.

use std::ops::{Add, Deref, DerefMut, Div, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("division of a vector by zero")]
    DivideByZero,
}

/// A point or displacement in play-area pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D(DVec2);

impl Vector2D {
    pub const ZERO: Self = Self(DVec2::ZERO);

    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Euclidean length
    #[inline]
    pub fn norm(&self) -> f64 {
        self.0.length()
    }

    /// Division that reports a zero divisor instead of panicking
    pub fn checked_div(self, divisor: f64) -> Result<Self, VectorError> {
        if divisor == 0.0 {
            return Err(VectorError::DivideByZero);
        }
        Ok(Self(self.0 / divisor))
    }
}

impl From<DVec2> for Vector2D {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl Deref for Vector2D {
    type Target = DVec2;

    fn deref(&self) -> &DVec2 {
        &self.0
    }
}

impl DerefMut for Vector2D {
    fn deref_mut(&mut self) -> &mut DVec2 {
        &mut self.0
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;

    fn mul(self, rhs: Vector2D) -> Vector2D {
        Vector2D(self * rhs.0)
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;

    /// # Panics
    /// Panics when `rhs` is zero. Use [`Vector2D::checked_div`] to handle it.
    fn div(self, rhs: f64) -> Self {
        match self.checked_div(rhs) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}
