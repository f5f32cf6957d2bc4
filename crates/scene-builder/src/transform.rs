//! Host affine arrays -> homogeneous 4x4 matrices.
//!
//! The host packs a transform into 16 doubles:
//! slots 0..9 hold the 3x3 rotation block in row-vector form (row `i` is the
//! image of basis axis `i`), slots 9..12 the translation, slot 12 a uniform
//! scale, and slots 13..16 are unused.

use scene_types::Mat4;

/// Rotation block, slots 0..9.
pub const HOST_ROTATION: std::ops::Range<usize> = 0..9;
/// Translation, slots 9..12.
pub const HOST_TRANSLATION: std::ops::Range<usize> = 9..12;
/// Uniform scale factor.
pub const HOST_SCALE: usize = 12;

/// Double-precision affine transform, column-major like [`Mat4`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m: [f64; 16],
}

impl Affine {
    #[rustfmt::skip]
    pub const IDENTITY: Affine = Affine {
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

    /// Unpack a host array. A zero or non-finite scale counts as 1.
    pub fn from_host_array(data: &[f64; 16]) -> Self {
        let scale = match data[HOST_SCALE] {
            s if s.is_finite() && s != 0.0 => s,
            _ => 1.0,
        };
        let r = &data[HOST_ROTATION];
        let t = &data[HOST_TRANSLATION];
        #[rustfmt::skip]
        let m = [
            r[0] * scale, r[1] * scale, r[2] * scale, 0.0,
            r[3] * scale, r[4] * scale, r[5] * scale, 0.0,
            r[6] * scale, r[7] * scale, r[8] * scale, 0.0,
            t[0],         t[1],         t[2],         1.0,
        ];
        Self { m }
    }

    /// `None` (no transform reported) is the identity.
    pub fn from_host(data: Option<[f64; 16]>) -> Self {
        data.map(|d| Self::from_host_array(&d))
            .unwrap_or(Self::IDENTITY)
    }

    /// Apply `self` first, then `parent`.
    pub fn then(&self, parent: &Affine) -> Affine {
        multiply(parent, self)
    }

    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let m = &self.m;
        [
            m[0] * p[0] + m[4] * p[1] + m[8] * p[2] + m[12],
            m[1] * p[0] + m[5] * p[1] + m[9] * p[2] + m[13],
            m[2] * p[0] + m[6] * p[1] + m[10] * p[2] + m[14],
        ]
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4 {
            m: self.m.map(|v| v as f32),
        }
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Column-major product `a * b`.
fn multiply(a: &Affine, b: &Affine) -> Affine {
    let mut m = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            m[col * 4 + row] = (0..4).map(|k| a.m[k * 4 + row] * b.m[col * 4 + k]).sum();
        }
    }
    Affine { m }
}

/// Convert a host affine array into the stored single-precision matrix.
pub fn to_world_transform(local: [f64; 16]) -> Mat4 {
    Affine::from_host_array(&local).to_mat4()
}

/// Host array for a pure translation with unit scale.
pub fn host_translation(dx: f64, dy: f64, dz: f64) -> [f64; 16] {
    let mut data = [0.0; 16];
    data[0] = 1.0;
    data[4] = 1.0;
    data[8] = 1.0;
    data[9] = dx;
    data[10] = dy;
    data[11] = dz;
    data[HOST_SCALE] = 1.0;
    data
}
