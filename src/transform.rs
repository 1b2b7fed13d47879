//! 4x4 node transforms.
//!
//! Matrices are row-major and act on column vectors, so the translation lives
//! in the last column (`data[3]`, `data[7]`). Only the 2D affine part
//! (`a b tx / c d ty`) participates in point and size mapping; the z row and
//! the perspective row are carried along for callers that need a full
//! 3D transform but are ignored when flattening to the plane.

use crate::geometry::{Point, Size};

/// A 4x4 transformation matrix stored in row-major order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Matrix data in row-major order: [row0, row1, row2, row3]
    pub data: [f32; 16],
}

impl Transform {
    /// Identity matrix (no transformation)
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
        ],
    };

    /// Build a planar affine transform from its six coefficients.
    ///
    /// Maps `(x, y)` to `(a*x + b*y + tx, c*x + d*y + ty)`.
    pub fn from_affine(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self {
            data: [
                a, b, 0.0, tx, //
                c, d, 0.0, ty, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, //
            ],
        }
    }

    /// Create a translation transform
    pub fn translate(x: f32, y: f32) -> Self {
        Self::from_affine(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Create a rotation transform around the Z axis (2D rotation)
    pub fn rotate(angle_radians: f32) -> Self {
        let (sin, cos) = angle_radians.sin_cos();
        Self::from_affine(cos, -sin, sin, cos, 0.0, 0.0)
    }

    /// Create a rotation transform from degrees
    pub fn rotate_degrees(angle_degrees: f32) -> Self {
        Self::rotate(angle_degrees.to_radians())
    }

    /// Create a uniform scale transform
    pub fn scale(s: f32) -> Self {
        Self::scale_xy(s, s)
    }

    /// Create a non-uniform scale transform
    pub fn scale_xy(sx: f32, sy: f32) -> Self {
        Self::from_affine(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Compose this transform with another: `self * other`.
    /// Applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let a = &self.data;
        let b = &other.data;
        let mut result = [0.0f32; 16];

        for row in 0..4 {
            for col in 0..4 {
                result[row * 4 + col] = (0..4).map(|k| a[row * 4 + k] * b[k * 4 + col]).sum();
            }
        }

        Transform { data: result }
    }

    /// Re-express this transform so it pivots around `(cx, cy)` instead of
    /// the local origin.
    pub fn center_at(&self, cx: f32, cy: f32) -> Transform {
        Transform::translate(cx, cy)
            .then(self)
            .then(&Transform::translate(-cx, -cy))
    }

    /// Map a point, including translation.
    pub fn transform_point(&self, point: Point) -> Point {
        Point::new(
            self.a() * point.x + self.b() * point.y + self.tx(),
            self.c() * point.x + self.d() * point.y + self.ty(),
        )
    }

    /// Map an extent through the linear part only (scale, rotation, skew).
    ///
    /// The result can have negative components under flips or rotations;
    /// it is the image of the size vector, not a bounding box.
    pub fn transform_size(&self, size: Size) -> Size {
        Size::new(
            self.a() * size.width + self.b() * size.height,
            self.c() * size.width + self.d() * size.height,
        )
    }

    /// Drop the z and perspective components, keeping only the planar affine part.
    pub fn affine_part(&self) -> Transform {
        Transform::from_affine(self.a(), self.b(), self.c(), self.d(), self.tx(), self.ty())
    }

    /// Coefficients of the planar part, `(a b tx / c d ty)`.
    pub fn a(&self) -> f32 {
        self.data[0]
    }

    pub fn b(&self) -> f32 {
        self.data[1]
    }

    pub fn c(&self) -> f32 {
        self.data[4]
    }

    pub fn d(&self) -> f32 {
        self.data[5]
    }

    pub fn tx(&self) -> f32 {
        self.data[3]
    }

    pub fn ty(&self) -> f32 {
        self.data[7]
    }

    /// Rotation of the x basis vector, in degrees.
    pub fn rotation_degrees(&self) -> f32 {
        self.c().atan2(self.a()).to_degrees()
    }

    /// Length of the x basis vector.
    pub fn scale_x(&self) -> f32 {
        (self.a() * self.a() + self.c() * self.c()).sqrt()
    }

    /// Length of the y basis vector.
    pub fn scale_y(&self) -> f32 {
        (self.b() * self.b() + self.d() * self.d()).sqrt()
    }

    /// Check if this is the identity transform
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// False if any coefficient is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
