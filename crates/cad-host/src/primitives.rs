//! Fixture bodies for the mock host.
//!
//! Planar faces are triangulated the way a host tessellator would: each
//! face owns its own triangles, and corners shared between faces repeat.

use crate::mock_host::{MockBody, MockFace, MockTriangle};

/// One right triangle in the XY plane with legs of length `size`.
pub fn make_triangle(name: &str, size: f64) -> MockBody {
    MockBody::new(name).with_face(MockFace::new(vec![[
        [0.0, 0.0, 0.0],
        [size, 0.0, 0.0],
        [0.0, size, 0.0],
    ]]))
}

/// A square in the XY plane split into two triangles along its diagonal.
pub fn make_quad(name: &str, size: f64) -> MockBody {
    let s = size;
    MockBody::new(name).with_face(MockFace::new(vec![
        [[0.0, 0.0, 0.0], [s, 0.0, 0.0], [s, s, 0.0]],
        [[0.0, 0.0, 0.0], [s, s, 0.0], [0.0, s, 0.0]],
    ]))
}

/// Axis-aligned box from the origin to `(w, h, d)`: 6 faces, 2 triangles each.
pub fn make_cuboid(name: &str, w: f64, h: f64, d: f64) -> MockBody {
    let p = [
        [0.0, 0.0, 0.0],
        [w, 0.0, 0.0],
        [w, h, 0.0],
        [0.0, h, 0.0],
        [0.0, 0.0, d],
        [w, 0.0, d],
        [w, h, d],
        [0.0, h, d],
    ];
    // Outward-wound quads: bottom, top, front, back, left, right.
    let quads = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [2, 3, 7, 6],
        [0, 4, 7, 3],
        [1, 2, 6, 5],
    ];

    quads.iter().fold(MockBody::new(name), |body, q| {
        let tris: Vec<MockTriangle> = vec![
            [p[q[0]], p[q[1]], p[q[2]]],
            [p[q[0]], p[q[2]], p[q[3]]],
        ];
        body.with_face(MockFace::new(tris))
    })
}
