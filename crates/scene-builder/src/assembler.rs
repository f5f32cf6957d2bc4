//! Scene assembler state machine.
//!
//! `Start -> WalkingTree -> PerBodyExtraction -> Assembled -> Finished`,
//! with any fatal error moving to `Failed`.

use cad_host::{CadBody, CadComponent, CadDocument, DocumentRoot, TransformConvention};
use scene_types::{Appearance, CancelToken, FaceGroup, Progress, Scene, SceneNode};
use tracing::{debug, info, instrument, warn};

use crate::material::MaterialResolver;
use crate::tessellate::tessellate_faces;
use crate::transform::Affine;
use crate::types::{
    AssembledScene, AssemblyOptions, AssemblyState, SceneError, SkipReason, SkippedBody,
};
use crate::weld::Welder;

/// Share of the whole export run covered by assembly.
pub const ASSEMBLY_SHARE: f64 = 0.9;
const WALK_START: f64 = 0.02;
const EXTRACTION_START: f64 = 0.10;

/// A body found during the tree walk, with everything extraction needs.
struct BodyJob<'a> {
    name: String,
    body: &'a dyn CadBody,
    component: Option<&'a dyn CadComponent>,
    world: Affine,
}

#[derive(Debug)]
pub struct SceneAssembler {
    options: AssemblyOptions,
    resolver: MaterialResolver,
    state: AssemblyState,
}

impl SceneAssembler {
    pub fn new(options: AssemblyOptions) -> Self {
        Self {
            options,
            resolver: MaterialResolver::new(options.material_policy),
            state: AssemblyState::Start,
        }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// Walk `document` and build the flattened scene.
    #[instrument(skip_all, fields(document = %document.title()))]
    pub fn assemble(
        &mut self,
        document: &dyn CadDocument,
        progress: &mut Progress<'_>,
        cancel: &CancelToken,
    ) -> Result<AssembledScene, SceneError> {
        self.state = AssemblyState::Start;
        match self.run(document, progress, cancel) {
            Ok(assembled) => {
                self.state = AssemblyState::Finished;
                info!(
                    nodes = assembled.scene.len(),
                    skipped = assembled.skipped.len(),
                    triangles = assembled.scene.triangle_count(),
                    "scene assembled"
                );
                Ok(assembled)
            }
            Err(e) => {
                self.state = AssemblyState::Failed;
                Err(e)
            }
        }
    }

    fn run(
        &mut self,
        document: &dyn CadDocument,
        progress: &mut Progress<'_>,
        cancel: &CancelToken,
    ) -> Result<AssembledScene, SceneError> {
        progress.fraction(0.0, "Preparing export");
        let eps = self.options.weld_epsilon;
        if !(eps.is_finite() && eps > 0.0) {
            return Err(SceneError::InvalidOptions {
                reason: format!("weld epsilon must be finite and positive, got {eps}"),
            });
        }

        let root = document.root();
        self.state = AssemblyState::WalkingTree;
        progress.fraction(WALK_START, "Walking document tree");
        let mut jobs = Vec::new();
        match root {
            DocumentRoot::Part { bodies } => {
                for body in bodies {
                    let name = body_name(body, jobs.len());
                    jobs.push(BodyJob {
                        name,
                        body,
                        component: None,
                        world: Affine::IDENTITY,
                    });
                }
            }
            DocumentRoot::Assembly { components } => {
                collect_components(
                    components,
                    "",
                    &Affine::IDENTITY,
                    document.transform_convention(),
                    &mut jobs,
                );
            }
            root @ (DocumentRoot::Drawing | DocumentRoot::Layout) => {
                return Err(SceneError::UnsupportedDocumentKind(root.kind()));
            }
        }

        let total = jobs.len();
        self.state = AssemblyState::PerBodyExtraction;
        progress.fraction(EXTRACTION_START, &format!("Found {total} bodies"));
        debug!(bodies = total, "tree walk complete");

        let mut scene = Scene::new();
        let mut skipped = Vec::new();
        for (i, job) in jobs.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(done = i, total, "export cancelled");
                return Err(SceneError::Cancelled);
            }

            match self.extract(job, document) {
                Ok(node) => scene.push(node),
                Err(reason) => {
                    warn!(body = %job.name, %reason, "skipping body");
                    skipped.push(SkippedBody {
                        name: job.name.clone(),
                        reason,
                    });
                }
            }

            let done = (i + 1) as f64 / total as f64;
            progress.fraction(
                EXTRACTION_START + (ASSEMBLY_SHARE - EXTRACTION_START) * done,
                &format!("Processed body {} of {total}", i + 1),
            );
        }

        self.state = AssemblyState::Assembled;
        if scene.is_empty() {
            return Err(SceneError::EmptyScene);
        }
        progress.fraction(ASSEMBLY_SHARE, "Scene assembled");

        Ok(AssembledScene {
            scene,
            skipped,
            bodies_total: total,
        })
    }

    /// tessellate -> weld -> resolve -> compose for one body.
    fn extract(
        &self,
        job: &BodyJob<'_>,
        document: &dyn CadDocument,
    ) -> Result<SceneNode, SkipReason> {
        let tess = tessellate_faces(job.body, self.options.quality)?;
        let faces = job.body.faces();
        let body_appearance =
            self.resolver
                .resolve_appearance(None, Some(job.body), job.component, Some(document));

        let mut welder = Welder::new(self.options.weld_epsilon);
        let mut groups: Vec<FaceGroup> = Vec::new();
        for face_tris in &tess.faces {
            let appearance = faces
                .get(face_tris.face_index)
                .and_then(|face| self.resolver.face_override(*face))
                .unwrap_or_else(|| body_appearance.clone());

            let first = welder.triangle_count();
            for tri in &face_tris.triangles {
                welder.push(tri);
            }
            let count = welder.triangle_count() - first;
            if count > 0 {
                push_group(&mut groups, appearance, first, count);
            }
        }

        let mesh = welder.finish();
        if mesh.is_empty() {
            return Err(SkipReason::NoTriangles);
        }
        debug!(
            body = %job.name,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            groups = groups.len(),
            "body extracted"
        );

        Ok(SceneNode {
            name: job.name.clone(),
            mesh,
            appearance: body_appearance,
            face_groups: groups,
            world_transform: job.world.to_mat4(),
        })
    }
}

impl Default for SceneAssembler {
    fn default() -> Self {
        Self::new(AssemblyOptions::default())
    }
}

/// Extend the previous group when the appearance repeats, else start a new one.
fn push_group(groups: &mut Vec<FaceGroup>, appearance: Appearance, first: usize, count: usize) {
    if let Some(last) = groups.last_mut() {
        if last.appearance == appearance && last.end_triangle() == first {
            last.triangle_count += count;
            return;
        }
    }
    groups.push(FaceGroup {
        appearance,
        first_triangle: first,
        triangle_count: count,
    });
}

fn collect_components<'a>(
    components: Vec<&'a dyn CadComponent>,
    prefix: &str,
    parent: &Affine,
    convention: TransformConvention,
    jobs: &mut Vec<BodyJob<'a>>,
) {
    for (index, component) in components.into_iter().enumerate() {
        let mut name = component.name();
        if name.is_empty() {
            name = format!("component{index}");
        }
        let state = component.suppression();
        if !state.is_exportable() {
            debug!(component = %name, ?state, "skipping suppressed component");
            continue;
        }

        let local = Affine::from_host(component.transform());
        let world = match convention {
            TransformConvention::Cumulative => local,
            TransformConvention::ParentRelative => local.then(parent),
        };
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };

        for body in component.bodies() {
            let body_name = body_name(body, jobs.len());
            jobs.push(BodyJob {
                name: format!("{path}/{body_name}"),
                body,
                component: Some(component),
                world,
            });
        }
        collect_components(component.children(), &path, &world, convention, jobs);
    }
}

fn body_name(body: &dyn CadBody, ordinal: usize) -> String {
    let name = body.name();
    if name.is_empty() {
        format!("body{ordinal}")
    } else {
        name
    }
}
