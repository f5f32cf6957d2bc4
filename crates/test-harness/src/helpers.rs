//! Helper functions: error type, fixture documents, progress recorders, mesh math.

use cad_host::primitives::{make_cuboid, make_quad, make_triangle};
use cad_host::{MockBody, MockComponent, MockDocument, MockFace, SuppressionState};
use scene_builder::transform::host_translation;
use scene_builder::weld::l1_distance;
use scene_types::{Point3, ProgressSink};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assembly failed: {0}")]
    Assembly(#[from] scene_builder::SceneError),

    #[error("export failed: {0}")]
    Export(#[from] scene_export::PipelineError),

    #[error("node not found: {name}")]
    NodeNotFound { name: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("fixture error: {reason}")]
    Fixture { reason: String },
}

// ── Material Arrays ─────────────────────────────────────────────────────────

/// Full 9-slot host material array for an RGB color and transparency.
pub fn host_material(r: f64, g: f64, b: f64, transparency: f64) -> Vec<f64> {
    vec![r, g, b, 1.0, 1.0, 0.5, 0.4, transparency, 0.0]
}

/// Opaque host material.
pub fn opaque(r: f64, g: f64, b: f64) -> Vec<f64> {
    host_material(r, g, b, 0.0)
}

// ── Fixture Documents ───────────────────────────────────────────────────────

/// Part with one square face of side `size`; welds to 4 vertices, 2 triangles.
pub fn quad_part(title: &str, size: f64) -> MockDocument {
    MockDocument::part(title).with_body(make_quad("plate", size))
}

/// Part with a unit cube whose faces each repeat their corners.
pub fn cube_part(title: &str) -> MockDocument {
    MockDocument::part(title).with_body(make_cuboid("cube", 1.0, 1.0, 1.0))
}

/// Part whose single body has a red face and a blue face, plus a green body color.
pub fn two_tone_part(title: &str) -> MockDocument {
    let body = MockBody::new("two-tone")
        .with_material(opaque(0.0, 1.0, 0.0))
        .with_face(
            MockFace::new(vec![[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]])
                .with_material(opaque(1.0, 0.0, 0.0)),
        )
        .with_face(
            MockFace::new(vec![[[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]])
                .with_material(opaque(0.0, 0.0, 1.0)),
        );
    MockDocument::part(title).with_body(body)
}

/// Assembly `Rig`:
///
/// ```text
/// base      (translated 0,0,0)  -> slab
/// arm       (translated 0,0,10) -> link, with nested wrist (translated 5,0,0) -> tip
/// spare     (suppressed)        -> ghost
/// ```
pub fn rig_assembly(title: &str) -> MockDocument {
    let wrist = MockComponent::new("wrist")
        .with_transform(host_translation(5.0, 0.0, 0.0))
        .with_body(make_triangle("tip", 1.0));
    let arm = MockComponent::new("arm")
        .with_transform(host_translation(0.0, 0.0, 10.0))
        .with_material(opaque(0.2, 0.4, 0.6))
        .with_body(make_quad("link", 2.0))
        .with_child(wrist);
    let spare = MockComponent::new("spare")
        .with_suppression(SuppressionState::Suppressed)
        .with_body(make_quad("ghost", 1.0));
    MockDocument::assembly(title)
        .with_component(
            MockComponent::new("base")
                .with_transform(host_translation(0.0, 0.0, 0.0))
                .with_body(make_cuboid("slab", 4.0, 4.0, 1.0)),
        )
        .with_component(arm)
        .with_component(spare)
}

/// Load a document fixture from its JSON form.
pub fn document_from_json(json: &str) -> Result<MockDocument, HarnessError> {
    MockDocument::from_json(json).map_err(|e| HarnessError::Fixture {
        reason: e.to_string(),
    })
}

// ── Progress Recording ──────────────────────────────────────────────────────

/// Progress sink that keeps every update for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordedProgress {
    pub events: Vec<(f32, String)>,
}

impl RecordedProgress {
    pub fn percents(&self) -> Vec<f32> {
        self.events.iter().map(|(p, _)| *p).collect()
    }

    pub fn last(&self) -> Option<&(f32, String)> {
        self.events.last()
    }

    pub fn is_monotonic(&self) -> bool {
        self.events.windows(2).all(|w| w[0].0 <= w[1].0)
    }
}

impl ProgressSink for RecordedProgress {
    fn report(&mut self, percent: f32, message: &str) {
        self.events.push((percent, message.to_string()));
    }
}

// ── Mesh Math ───────────────────────────────────────────────────────────────

/// Smallest pairwise L1 distance among `points`, or `None` with fewer than two.
pub fn min_pairwise_distance(points: &[Point3]) -> Option<f32> {
    let mut best: Option<f32> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = l1_distance(*a, *b);
            best = Some(best.map_or(d, |m| m.min(d)));
        }
    }
    best
}

/// Total area of an indexed triangle list.
pub fn surface_area(vertices: &[Point3], triangles: &[[u32; 3]]) -> f64 {
    triangles
        .iter()
        .map(|&[a, b, c]| {
            let p = vertices[a as usize].map(f64::from);
            let q = vertices[b as usize].map(f64::from);
            let r = vertices[c as usize].map(f64::from);
            let u = [q[0] - p[0], q[1] - p[1], q[2] - p[2]];
            let v = [r[0] - p[0], r[1] - p[1], r[2] - p[2]];
            let cross = [
                u[1] * v[2] - u[2] * v[1],
                u[2] * v[0] - u[0] * v[2],
                u[0] * v[1] - u[1] * v[0],
            ];
            0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
        })
        .sum()
}
