use serde::{Deserialize, Serialize};

use crate::mesh::Point3;

/// A 4x4 homogeneous transform stored in column-major order, f32 precision.
///
/// Translation occupies elements 12..15, which is the last row when the
/// matrix is read in row-vector convention. This is the layout glTF expects
/// for `node.matrix`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Mat4 {
    #[rustfmt::skip]
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_translation(dx: f32, dy: f32, dz: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[12] = dx;
        out.m[13] = dy;
        out.m[14] = dz;
        out
    }

    pub fn translation(&self) -> [f32; 3] {
        [self.m[12], self.m[13], self.m[14]]
    }

    /// Upper-left 3x3 block; row `i` is the image of basis axis `i`.
    pub fn rotation_block(&self) -> [[f32; 3]; 3] {
        let m = &self.m;
        [[m[0], m[1], m[2]], [m[4], m[5], m[6]], [m[8], m[9], m[10]]]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn transform_point(&self, p: Point3) -> Point3 {
        let m = &self.m;
        [
            m[0] * p[0] + m[4] * p[1] + m[8] * p[2] + m[12],
            m[1] * p[0] + m[5] * p[1] + m[9] * p[2] + m[13],
            m[2] * p[0] + m[6] * p[1] + m[10] * p[2] + m[14],
        ]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
