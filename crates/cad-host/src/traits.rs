use crate::types::*;

/// Top of a document, split by kind. Only parts and assemblies carry geometry.
pub enum DocumentRoot<'a> {
    Part { bodies: Vec<&'a dyn CadBody> },
    Assembly { components: Vec<&'a dyn CadComponent> },
    Drawing,
    Layout,
}

impl DocumentRoot<'_> {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentRoot::Part { .. } => DocumentKind::Part,
            DocumentRoot::Assembly { .. } => DocumentKind::Assembly,
            DocumentRoot::Drawing => DocumentKind::Drawing,
            DocumentRoot::Layout => DocumentKind::Layout,
        }
    }
}

/// A document open in the CAD host. Read-only for the duration of an export.
pub trait CadDocument {
    /// Document title, used as the default output base name.
    fn title(&self) -> String;

    /// Top-level contents of the document.
    fn root(&self) -> DocumentRoot<'_>;

    /// Document-level material values, in host slot layout.
    fn material_values(&self) -> Option<Vec<f64>>;

    fn material_name(&self) -> Option<String> {
        None
    }

    /// Whether component transforms are already composed up to the root.
    fn transform_convention(&self) -> TransformConvention {
        TransformConvention::Cumulative
    }
}

/// An assembly-tree node: an instance of a part or sub-assembly.
pub trait CadComponent {
    fn name(&self) -> String;

    fn suppression(&self) -> SuppressionState;

    /// Native 16-slot affine array, `None` for the identity.
    fn transform(&self) -> Option<[f64; 16]>;

    /// Material applied on the component instance.
    fn material_values(&self) -> Option<Vec<f64>>;

    /// Material of the model document the component references.
    fn model_material_values(&self) -> Option<Vec<f64>> {
        None
    }

    fn material_name(&self) -> Option<String> {
        None
    }

    /// Bodies owned directly by this component.
    fn bodies(&self) -> Vec<&dyn CadBody>;

    /// Nested sub-components.
    fn children(&self) -> Vec<&dyn CadComponent>;
}

/// A solid body.
pub trait CadBody {
    fn name(&self) -> String;

    fn material_values(&self) -> Option<Vec<f64>>;

    fn material_name(&self) -> Option<String> {
        None
    }

    /// Faces in host order.
    fn faces(&self) -> Vec<&dyn CadFace>;

    /// Run the host tessellator on this body. Never cached across calls.
    fn tessellate(
        &self,
        request: &TessellationRequest,
    ) -> Result<Box<dyn Tessellation + '_>, HostError>;
}

/// A trimmed surface region of a body.
pub trait CadFace {
    fn id(&self) -> FaceId;

    fn material_values(&self) -> Option<Vec<f64>>;

    fn material_name(&self) -> Option<String> {
        None
    }
}

/// Facet/fin/vertex tables produced by one tessellation run.
pub trait Tessellation {
    /// Facets belonging to a face.
    fn face_facets(&self, face: FaceId) -> Vec<FacetId>;

    /// Fins of a facet; three for a well-formed facet.
    fn facet_fins(&self, facet: FacetId) -> Vec<FinId>;

    /// The two end vertices of a fin.
    fn fin_vertices(&self, fin: FinId) -> Option<[VertexId; 2]>;

    fn vertex_point(&self, vertex: VertexId) -> Option<[f64; 3]>;
}
