//! MockDocument: in-memory host document implementing the `cad-host` traits.
//!
//! Geometry is stored as per-face triangle lists and turned into
//! facet/fin/vertex tables on every `tessellate` call, the way a real host
//! tessellator would. Documents can be built in code or loaded from JSON.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::traits::*;
use crate::types::*;

/// A triangle as three corner positions.
pub type MockTriangle = [[f64; 3]; 3];

/// Root document of the mock host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockDocument {
    pub title: String,
    pub kind: DocumentKind,
    #[serde(default)]
    pub material: Option<Vec<f64>>,
    #[serde(default)]
    pub material_name: Option<String>,
    #[serde(default)]
    pub transform_convention: TransformConvention,
    /// Bodies of a part document.
    #[serde(default)]
    pub bodies: Vec<MockBody>,
    /// Top-level components of an assembly document.
    #[serde(default)]
    pub components: Vec<MockComponent>,
}

/// Assembly component instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockComponent {
    pub name: String,
    #[serde(default)]
    pub suppression: SuppressionState,
    #[serde(default)]
    pub transform: Option<[f64; 16]>,
    #[serde(default)]
    pub material: Option<Vec<f64>>,
    #[serde(default)]
    pub model_material: Option<Vec<f64>>,
    #[serde(default)]
    pub material_name: Option<String>,
    #[serde(default)]
    pub bodies: Vec<MockBody>,
    #[serde(default)]
    pub children: Vec<MockComponent>,
}

/// Solid body with per-face triangles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockBody {
    pub name: String,
    #[serde(default)]
    pub material: Option<Vec<f64>>,
    #[serde(default)]
    pub material_name: Option<String>,
    #[serde(default)]
    pub faces: Vec<MockFace>,
    /// Simulates a host that cannot produce a tessellation object.
    #[serde(default)]
    pub tessellation_unavailable: bool,
    /// Requests received by `tessellate`, in call order.
    #[serde(skip)]
    requests: RefCell<Vec<TessellationRequest>>,
}

/// Face with its triangulation and optional material override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockFace {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub material: Option<Vec<f64>>,
    #[serde(default)]
    pub material_name: Option<String>,
    #[serde(default)]
    pub triangles: Vec<MockTriangle>,
}

impl MockDocument {
    pub fn part(title: impl Into<String>) -> Self {
        Self::with_kind(title, DocumentKind::Part)
    }

    pub fn assembly(title: impl Into<String>) -> Self {
        Self::with_kind(title, DocumentKind::Assembly)
    }

    pub fn with_kind(title: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            title: title.into(),
            kind,
            material: None,
            material_name: None,
            transform_convention: TransformConvention::Cumulative,
            bodies: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Parse a JSON document description. Face ids are renumbered per body.
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        let mut doc: MockDocument =
            serde_json::from_str(json).map_err(|e| HostError::Parse(e.to_string()))?;
        for body in &mut doc.bodies {
            body.renumber_faces();
        }
        for comp in &mut doc.components {
            comp.renumber_faces();
        }
        tracing::debug!(title = %doc.title, kind = %doc.kind, "loaded mock document");
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, HostError> {
        serde_json::to_string_pretty(self).map_err(|e| HostError::Parse(e.to_string()))
    }

    pub fn with_body(mut self, body: MockBody) -> Self {
        self.bodies.push(body);
        self
    }

    pub fn with_component(mut self, component: MockComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_material(mut self, values: Vec<f64>) -> Self {
        self.material = Some(values);
        self
    }

    pub fn with_convention(mut self, convention: TransformConvention) -> Self {
        self.transform_convention = convention;
        self
    }
}

impl MockComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            suppression: SuppressionState::Resolved,
            transform: None,
            material: None,
            model_material: None,
            material_name: None,
            bodies: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_suppression(mut self, state: SuppressionState) -> Self {
        self.suppression = state;
        self
    }

    pub fn with_transform(mut self, transform: [f64; 16]) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_material(mut self, values: Vec<f64>) -> Self {
        self.material = Some(values);
        self
    }

    pub fn with_model_material(mut self, values: Vec<f64>) -> Self {
        self.model_material = Some(values);
        self
    }

    pub fn with_body(mut self, body: MockBody) -> Self {
        self.bodies.push(body);
        self
    }

    pub fn with_child(mut self, child: MockComponent) -> Self {
        self.children.push(child);
        self
    }

    fn renumber_faces(&mut self) {
        for body in &mut self.bodies {
            body.renumber_faces();
        }
        for child in &mut self.children {
            child.renumber_faces();
        }
    }
}

impl MockBody {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: None,
            material_name: None,
            faces: Vec::new(),
            tessellation_unavailable: false,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Append a face; its id becomes its position in the body.
    pub fn with_face(mut self, mut face: MockFace) -> Self {
        face.id = self.faces.len() as u32;
        self.faces.push(face);
        self
    }

    pub fn with_material(mut self, values: Vec<f64>) -> Self {
        self.material = Some(values);
        self
    }

    pub fn with_material_name(mut self, name: impl Into<String>) -> Self {
        self.material_name = Some(name.into());
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.tessellation_unavailable = true;
        self
    }

    /// Tessellation requests received so far.
    pub fn requests(&self) -> Vec<TessellationRequest> {
        self.requests.borrow().clone()
    }

    fn renumber_faces(&mut self) {
        for (i, face) in self.faces.iter_mut().enumerate() {
            face.id = i as u32;
        }
    }
}

impl MockFace {
    pub fn new(triangles: Vec<MockTriangle>) -> Self {
        Self {
            id: 0,
            material: None,
            material_name: None,
            triangles,
        }
    }

    pub fn with_material(mut self, values: Vec<f64>) -> Self {
        self.material = Some(values);
        self
    }

    pub fn with_material_name(mut self, name: impl Into<String>) -> Self {
        self.material_name = Some(name.into());
        self
    }
}

impl CadDocument for MockDocument {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn root(&self) -> DocumentRoot<'_> {
        match self.kind {
            DocumentKind::Part => DocumentRoot::Part {
                bodies: self.bodies.iter().map(|b| b as &dyn CadBody).collect(),
            },
            DocumentKind::Assembly => DocumentRoot::Assembly {
                components: self
                    .components
                    .iter()
                    .map(|c| c as &dyn CadComponent)
                    .collect(),
            },
            DocumentKind::Drawing => DocumentRoot::Drawing,
            DocumentKind::Layout => DocumentRoot::Layout,
        }
    }

    fn material_values(&self) -> Option<Vec<f64>> {
        self.material.clone()
    }

    fn material_name(&self) -> Option<String> {
        self.material_name.clone()
    }

    fn transform_convention(&self) -> TransformConvention {
        self.transform_convention
    }
}

impl CadComponent for MockComponent {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn suppression(&self) -> SuppressionState {
        self.suppression
    }

    fn transform(&self) -> Option<[f64; 16]> {
        self.transform
    }

    fn material_values(&self) -> Option<Vec<f64>> {
        self.material.clone()
    }

    fn model_material_values(&self) -> Option<Vec<f64>> {
        self.model_material.clone()
    }

    fn material_name(&self) -> Option<String> {
        self.material_name.clone()
    }

    fn bodies(&self) -> Vec<&dyn CadBody> {
        self.bodies.iter().map(|b| b as &dyn CadBody).collect()
    }

    fn children(&self) -> Vec<&dyn CadComponent> {
        self.children
            .iter()
            .map(|c| c as &dyn CadComponent)
            .collect()
    }
}

impl CadBody for MockBody {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn material_values(&self) -> Option<Vec<f64>> {
        self.material.clone()
    }

    fn material_name(&self) -> Option<String> {
        self.material_name.clone()
    }

    fn faces(&self) -> Vec<&dyn CadFace> {
        self.faces.iter().map(|f| f as &dyn CadFace).collect()
    }

    fn tessellate(
        &self,
        request: &TessellationRequest,
    ) -> Result<Box<dyn Tessellation + '_>, HostError> {
        self.requests.borrow_mut().push(*request);
        if self.tessellation_unavailable {
            return Err(HostError::TessellationUnavailable {
                reason: format!("no tessellation object for body '{}'", self.name),
            });
        }
        Ok(Box::new(MockTessellation::build(&self.faces)))
    }
}

impl CadFace for MockFace {
    fn id(&self) -> FaceId {
        FaceId(self.id)
    }

    fn material_values(&self) -> Option<Vec<f64>> {
        self.material.clone()
    }

    fn material_name(&self) -> Option<String> {
        self.material_name.clone()
    }
}

/// Facet/fin/vertex tables for one tessellation run.
///
/// Every facet gets its own three vertices, so coincident corners of
/// neighbouring facets are distinct vertex ids with equal positions.
#[derive(Debug, Clone, Default)]
pub struct MockTessellation {
    face_facets: Vec<(FaceId, Vec<FacetId>)>,
    facets: Vec<[FinId; 3]>,
    fins: Vec<[VertexId; 2]>,
    vertices: Vec<[f64; 3]>,
}

impl MockTessellation {
    pub fn build(faces: &[MockFace]) -> Self {
        let mut tess = Self::default();
        for face in faces {
            let mut facet_ids = Vec::with_capacity(face.triangles.len());
            for tri in &face.triangles {
                let base = tess.vertices.len() as u32;
                tess.vertices.extend_from_slice(tri);
                let corners = [VertexId(base), VertexId(base + 1), VertexId(base + 2)];

                let mut fins = [FinId(0); 3];
                for (k, fin) in fins.iter_mut().enumerate() {
                    *fin = FinId(tess.fins.len() as u32);
                    tess.fins.push([corners[k], corners[(k + 1) % 3]]);
                }

                facet_ids.push(FacetId(tess.facets.len() as u32));
                tess.facets.push(fins);
            }
            tess.face_facets.push((FaceId(face.id), facet_ids));
        }
        tess
    }

    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }
}

impl Tessellation for MockTessellation {
    fn face_facets(&self, face: FaceId) -> Vec<FacetId> {
        self.face_facets
            .iter()
            .find(|(id, _)| *id == face)
            .map(|(_, facets)| facets.clone())
            .unwrap_or_default()
    }

    fn facet_fins(&self, facet: FacetId) -> Vec<FinId> {
        self.facets
            .get(facet.0 as usize)
            .map(|fins| fins.to_vec())
            .unwrap_or_default()
    }

    fn fin_vertices(&self, fin: FinId) -> Option<[VertexId; 2]> {
        self.fins.get(fin.0 as usize).copied()
    }

    fn vertex_point(&self, vertex: VertexId) -> Option<[f64; 3]> {
        self.vertices.get(vertex.0 as usize).copied()
    }
}
