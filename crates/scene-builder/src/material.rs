//! Material override resolution.
//!
//! Precedence, highest first: face, body, component (instance value, then
//! the referenced model's value), document, hard-coded fallback. A level
//! whose value array is missing or too short is skipped.

use cad_host::material_slot as slot;
use cad_host::{CadBody, CadComponent, CadDocument, CadFace};
use scene_types::Appearance;

use crate::types::MaterialPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialResolver {
    policy: MaterialPolicy,
}

impl MaterialResolver {
    pub fn new(policy: MaterialPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MaterialPolicy {
        self.policy
    }

    /// Effective appearance for the most specific level given.
    pub fn resolve_appearance(
        &self,
        face: Option<&dyn CadFace>,
        body: Option<&dyn CadBody>,
        component: Option<&dyn CadComponent>,
        document: Option<&dyn CadDocument>,
    ) -> Appearance {
        face.and_then(|f| self.face_override(f))
            .or_else(|| body.and_then(|b| self.body_override(b)))
            .or_else(|| component.and_then(|c| self.component_override(c)))
            .or_else(|| document.and_then(|d| self.document_override(d)))
            .unwrap_or_else(Appearance::fallback)
    }

    pub fn face_override(&self, face: &dyn CadFace) -> Option<Appearance> {
        self.appearance_from_values(face.material_values().as_deref(), face.material_name())
    }

    pub fn body_override(&self, body: &dyn CadBody) -> Option<Appearance> {
        self.appearance_from_values(body.material_values().as_deref(), body.material_name())
    }

    pub fn component_override(&self, component: &dyn CadComponent) -> Option<Appearance> {
        self.appearance_from_values(
            component.material_values().as_deref(),
            component.material_name(),
        )
        .or_else(|| {
            self.appearance_from_values(
                component.model_material_values().as_deref(),
                component.material_name(),
            )
        })
    }

    pub fn document_override(&self, document: &dyn CadDocument) -> Option<Appearance> {
        self.appearance_from_values(
            document.material_values().as_deref(),
            document.material_name(),
        )
    }

    /// Convert a host value array, or `None` if it does not qualify as an
    /// override under the active policy.
    pub fn appearance_from_values(
        &self,
        values: Option<&[f64]>,
        name: Option<String>,
    ) -> Option<Appearance> {
        let values = values?;
        if values.len() < self.policy.min_channels() {
            return None;
        }

        let alpha = if values.len() >= slot::COUNT {
            1.0 - values[slot::TRANSPARENCY]
        } else {
            values[slot::ALPHA]
        };
        let mut appearance = Appearance::from_rgba([
            values[slot::RED] as f32,
            values[slot::GREEN] as f32,
            values[slot::BLUE] as f32,
            alpha as f32,
        ]);
        appearance.name = name;
        Some(appearance)
    }
}
