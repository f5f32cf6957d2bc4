//! Tessellation adapter: host facet/fin/vertex tables -> raw triangles.
//!
//! Each facet is rebuilt from its three fins. The distinct fin endpoints,
//! in first-seen order, are the triangle corners. Facets that do not yield
//! three distinct points are skipped.

use cad_host::{CadBody, FacetId, MatchType, Tessellation, TessellationRequest};
use scene_types::RawTriangle;
use tracing::debug;

use crate::types::{Quality, TessellationError};

/// Tolerance for treating two fin endpoints of one facet as the same corner.
pub const FACET_POINT_TOLERANCE: f64 = 1e-5;

/// Triangles produced by one face, tagged with the face's index in the body.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceTriangles {
    pub face_index: usize,
    pub triangles: Vec<RawTriangle>,
}

/// Face-grouped output of one body tessellation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyTessellation {
    pub faces: Vec<FaceTriangles>,
    /// Facets that could not be turned into a triangle.
    pub degenerate_facets: usize,
}

impl BodyTessellation {
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.triangles.len()).sum()
    }

    pub fn into_triangles(self) -> Vec<RawTriangle> {
        self.faces.into_iter().flat_map(|f| f.triangles).collect()
    }
}

/// The request sent to the host for a given quality.
pub fn tessellation_request(quality: Quality) -> TessellationRequest {
    TessellationRequest {
        need_face_facet_map: true,
        need_vertex_normals: true,
        need_vertex_params: true,
        improved_quality: quality == Quality::Improved,
        match_type: MatchType::FacetTopology,
    }
}

/// Tessellate a body into a flat triangle list in body-local coordinates.
pub fn tessellate(
    body: &dyn CadBody,
    quality: Quality,
) -> Result<Vec<RawTriangle>, TessellationError> {
    tessellate_faces(body, quality).map(BodyTessellation::into_triangles)
}

/// Tessellate a body, keeping triangles grouped by face in body order.
pub fn tessellate_faces(
    body: &dyn CadBody,
    quality: Quality,
) -> Result<BodyTessellation, TessellationError> {
    let tess = body
        .tessellate(&tessellation_request(quality))
        .map_err(|e| TessellationError::EngineUnavailable {
            body: body.name(),
            reason: e.to_string(),
        })?;

    let mut out = BodyTessellation::default();
    for (face_index, face) in body.faces().into_iter().enumerate() {
        let mut triangles = Vec::new();
        for facet in tess.face_facets(face.id()) {
            match facet_triangle(tess.as_ref(), facet) {
                Some(tri) => triangles.push(tri),
                None => out.degenerate_facets += 1,
            }
        }
        out.faces.push(FaceTriangles {
            face_index,
            triangles,
        });
    }

    if out.degenerate_facets > 0 {
        debug!(
            body = %body.name(),
            skipped = out.degenerate_facets,
            "skipped degenerate facets"
        );
    }
    Ok(out)
}

/// Rebuild one facet's triangle from its first three fins.
fn facet_triangle(tess: &dyn Tessellation, facet: FacetId) -> Option<RawTriangle> {
    let mut points: Vec<[f64; 3]> = Vec::with_capacity(3);
    for fin in tess.facet_fins(facet).into_iter().take(3) {
        let [a, b] = tess.fin_vertices(fin)?;
        for vertex in [a, b] {
            let p = tess.vertex_point(vertex)?;
            if !points.iter().any(|q| l1_distance(q, &p) < FACET_POINT_TOLERANCE) {
                points.push(p);
            }
        }
    }

    if points.len() != 3 {
        return None;
    }
    Some(RawTriangle::new(
        to_f32(points[0]),
        to_f32(points[1]),
        to_f32(points[2]),
    ))
}

fn l1_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).abs() + (a[1] - b[1]).abs() + (a[2] - b[2]).abs()
}

fn to_f32(p: [f64; 3]) -> [f32; 3] {
    [p[0] as f32, p[1] as f32, p[2] as f32]
}
