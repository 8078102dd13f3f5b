use std::ops::{Add, Mul, Neg, Sub};

/// 3-D vector in the simulation frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.,
        y: 0.,
        z: 0.,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn norm_squared(&self) -> f64 {
        self.dot(*self)
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Unit vector along `self`, or the zero vector for degenerate input.
    pub fn normalized(&self) -> Vec3 {
        let norm = self.norm();
        if norm == 0. {
            return Vec3::ZERO;
        }

        *self * (1. / norm)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, scalar: f64) -> Vec3 {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        self * -1.
    }
}

/// Row-major 3×3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(pub [[f64; 3]; 3]);

impl Mat3 {
    pub const ZERO: Mat3 = Mat3([[0.; 3]; 3]);

    pub fn diagonal(xx: f64, yy: f64, zz: f64) -> Self {
        Mat3([[xx, 0., 0.], [0., yy, 0.], [0., 0., zz]])
    }

    /// Rotation by `angle` radians around the x axis.
    pub fn rotation_x(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();

        Mat3([[1., 0., 0.], [0., cos, -sin], [0., sin, cos]])
    }

    /// Matrix with the given vectors as columns.
    pub fn from_columns(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Mat3([[a.x, b.x, c.x], [a.y, b.y, c.y], [a.z, b.z, c.z]])
    }

    pub fn transpose(&self) -> Mat3 {
        let mut out = [[0.; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.0[c][r];
            }
        }

        Mat3(out)
    }

    pub fn mul_mat(&self, other: &Mat3) -> Mat3 {
        let mut out = [[0.; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.0[r][k] * other.0[k][c]).sum();
            }
        }

        Mat3(out)
    }

    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        Vec3 {
            x: self.0[0][0] * v.x + self.0[0][1] * v.y + self.0[0][2] * v.z,
            y: self.0[1][0] * v.x + self.0[1][1] * v.y + self.0[1][2] * v.z,
            z: self.0[2][0] * v.x + self.0[2][1] * v.y + self.0[2][2] * v.z,
        }
    }

    /// Similarity rotation R·A·Rᵀ.
    pub fn rotated_by(&self, rotation: &Mat3) -> Mat3 {
        rotation.mul_mat(self).mul_mat(&rotation.transpose())
    }

    /// Column-major flattening, index = 3·column + row.
    ///
    /// This ordering is shared with the χ⁽²⁾ construction and must not be
    /// swapped for row-major.
    pub fn flatten(&self) -> [f64; 9] {
        let mut out = [0.; 9];
        for c in 0..3 {
            for r in 0..3 {
                out[3 * c + r] = self.0[r][c];
            }
        }

        out
    }
}
