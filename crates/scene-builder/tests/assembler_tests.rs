use cad_host::primitives::{make_cuboid, make_quad, make_triangle};
use cad_host::*;
use scene_builder::transform::host_translation;
use scene_builder::*;
use scene_types::*;

fn extended(r: f64, g: f64, b: f64) -> Vec<f64> {
    vec![r, g, b, 1.0, 1.0, 0.5, 0.3, 0.0, 0.0]
}

fn assemble(doc: &MockDocument) -> Result<AssembledScene, SceneError> {
    let mut assembler = SceneAssembler::default();
    let mut sink = NoProgress;
    let mut progress = Progress::new(&mut sink);
    assembler.assemble(doc, &mut progress, &CancelToken::new())
}

fn node_names(assembled: &AssembledScene) -> Vec<String> {
    assembled.scene.iter().map(|n| n.name.clone()).collect()
}

#[test]
fn suppressed_component_contributes_nothing() {
    let doc = MockDocument::assembly("asm")
        .with_component(MockComponent::new("kept").with_body(make_quad("plate", 1.0)))
        .with_component(
            MockComponent::new("hidden")
                .with_suppression(SuppressionState::Suppressed)
                .with_body(make_quad("plate", 1.0))
                .with_child(MockComponent::new("inner").with_body(make_triangle("tri", 1.0))),
        )
        .with_component(
            MockComponent::new("light")
                .with_suppression(SuppressionState::LightweightSuppressed)
                .with_body(make_triangle("tri", 1.0)),
        )
        .with_component(
            MockComponent::new("full")
                .with_suppression(SuppressionState::FullyResolved)
                .with_body(make_triangle("tri", 1.0)),
        );

    let assembled = assemble(&doc).unwrap();
    assert_eq!(node_names(&assembled), vec!["kept/plate", "full/tri"]);
    assert_eq!(assembled.bodies_total, 2);
    assert!(assembled.skipped.is_empty());
}

#[test]
fn nested_components_produce_path_names_in_walk_order() {
    let doc = MockDocument::assembly("asm").with_component(
        MockComponent::new("frame")
            .with_body(make_cuboid("rail", 1.0, 1.0, 10.0))
            .with_child(MockComponent::new("bracket").with_body(make_quad("plate", 2.0)))
            .with_child(MockComponent::new("").with_body(make_triangle("", 1.0))),
    );

    let assembled = assemble(&doc).unwrap();
    assert_eq!(
        node_names(&assembled),
        vec!["frame/rail", "frame/bracket/plate", "frame/component1/body2"]
    );
}

#[test]
fn material_precedence_covers_every_combination() {
    let face_color = extended(0.1, 0.0, 0.0);
    let body_color = extended(0.2, 0.0, 0.0);
    let comp_color = extended(0.3, 0.0, 0.0);
    let doc_color = extended(0.4, 0.0, 0.0);

    for mask in 0u8..16 {
        let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let mut face = MockFace::new(vec![tri]);
        if mask & 1 != 0 {
            face = face.with_material(face_color.clone());
        }
        let mut body = MockBody::new("b").with_face(face);
        if mask & 2 != 0 {
            body = body.with_material(body_color.clone());
        }
        let mut comp = MockComponent::new("c").with_body(body);
        if mask & 4 != 0 {
            comp = comp.with_material(comp_color.clone());
        }
        let mut doc = MockDocument::assembly("a").with_component(comp);
        if mask & 8 != 0 {
            doc = doc.with_material(doc_color.clone());
        }

        let expected = if mask & 1 != 0 {
            [0.1, 0.0, 0.0, 1.0]
        } else if mask & 2 != 0 {
            [0.2, 0.0, 0.0, 1.0]
        } else if mask & 4 != 0 {
            [0.3, 0.0, 0.0, 1.0]
        } else if mask & 8 != 0 {
            [0.4, 0.0, 0.0, 1.0]
        } else {
            Appearance::fallback().base_color
        };

        let assembled = assemble(&doc).unwrap();
        let node = &assembled.scene.nodes[0];
        assert_eq!(
            node.face_groups[0].appearance.base_color, expected,
            "presence mask {mask:04b}"
        );
        assert!(node.face_groups[0].appearance.double_sided);
    }
}

#[test]
fn body_appearance_ignores_face_overrides() {
    let body = MockBody::new("b")
        .with_material(extended(0.0, 1.0, 0.0))
        .with_material_name("green")
        .with_face(MockFace::new(vec![[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]))
        .with_face(
            MockFace::new(vec![[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]])
                .with_material(extended(0.0, 0.0, 1.0)),
        );
    let doc = MockDocument::part("p").with_body(body);

    let assembled = assemble(&doc).unwrap();
    let node = &assembled.scene.nodes[0];
    assert_eq!(node.appearance.base_color, [0.0, 1.0, 0.0, 1.0]);
    assert_eq!(node.appearance.name.as_deref(), Some("green"));
    assert_eq!(node.face_groups.len(), 2);
    assert_eq!(node.face_groups[1].appearance.base_color, [0.0, 0.0, 1.0, 1.0]);
    assert!(node.groups_cover_mesh());
}

#[test]
fn empty_part_is_an_empty_scene() {
    let doc = MockDocument::part("nothing");
    assert_eq!(assemble(&doc).unwrap_err(), SceneError::EmptyScene);
}

#[test]
fn all_suppressed_assembly_is_an_empty_scene() {
    let doc = MockDocument::assembly("asm").with_component(
        MockComponent::new("gone")
            .with_suppression(SuppressionState::Suppressed)
            .with_body(make_quad("q", 1.0)),
    );
    assert_eq!(assemble(&doc).unwrap_err(), SceneError::EmptyScene);
}

#[test]
fn drawings_and_layouts_are_rejected() {
    for kind in [DocumentKind::Drawing, DocumentKind::Layout] {
        let doc = MockDocument::with_kind("sheet", kind);
        let mut assembler = SceneAssembler::default();
        let mut sink = NoProgress;
        let mut progress = Progress::new(&mut sink);
        let err = assembler
            .assemble(&doc, &mut progress, &CancelToken::new())
            .unwrap_err();
        assert_eq!(err, SceneError::UnsupportedDocumentKind(kind));
        assert_eq!(assembler.state(), AssemblyState::Failed);
    }
}

#[test]
fn failing_and_degenerate_bodies_are_skipped() {
    let flat = MockBody::new("flat").with_face(MockFace::new(vec![[
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
    ]]));
    let doc = MockDocument::part("p")
        .with_body(MockBody::new("ghost").unavailable())
        .with_body(make_quad("good", 1.0))
        .with_body(flat);

    let assembled = assemble(&doc).unwrap();
    assert_eq!(node_names(&assembled), vec!["good"]);
    assert_eq!(assembled.bodies_total, 3);
    assert_eq!(assembled.bodies_exported(), 1);
    assert_eq!(assembled.skipped.len(), 2);
    assert_eq!(assembled.skipped[0].name, "ghost");
    assert!(matches!(
        assembled.skipped[0].reason,
        SkipReason::Tessellation(TessellationError::EngineUnavailable { .. })
    ));
    assert_eq!(assembled.skipped[1].name, "flat");
    assert_eq!(assembled.skipped[1].reason, SkipReason::NoTriangles);
}

#[test]
fn cumulative_transforms_are_taken_as_is() {
    let doc = MockDocument::assembly("asm").with_component(
        MockComponent::new("parent")
            .with_transform(host_translation(100.0, 0.0, 0.0))
            .with_child(
                MockComponent::new("child")
                    .with_transform(host_translation(0.0, 5.0, 0.0))
                    .with_body(make_quad("q", 1.0)),
            ),
    );

    let assembled = assemble(&doc).unwrap();
    assert_eq!(
        assembled.scene.nodes[0].world_transform.translation(),
        [0.0, 5.0, 0.0]
    );
}

#[test]
fn parent_relative_transforms_compose_down_the_tree() {
    let doc = MockDocument::assembly("asm")
        .with_convention(TransformConvention::ParentRelative)
        .with_component(
            MockComponent::new("parent")
                .with_transform(host_translation(100.0, 0.0, 0.0))
                .with_child(
                    MockComponent::new("child")
                        .with_transform(host_translation(0.0, 5.0, 0.0))
                        .with_body(make_quad("q", 1.0)),
                ),
        );

    let assembled = assemble(&doc).unwrap();
    assert_eq!(
        assembled.scene.nodes[0].world_transform.translation(),
        [100.0, 5.0, 0.0]
    );
}

#[test]
fn progress_is_monotonic_and_stops_at_ninety() {
    let doc = MockDocument::part("p")
        .with_body(make_quad("a", 1.0))
        .with_body(make_cuboid("b", 1.0, 2.0, 3.0))
        .with_body(make_triangle("c", 1.0));

    let mut events: Vec<(f32, String)> = Vec::new();
    {
        let mut sink = |p: f32, m: &str| events.push((p, m.to_string()));
        let mut progress = Progress::new(&mut sink);
        SceneAssembler::default()
            .assemble(&doc, &mut progress, &CancelToken::new())
            .unwrap();
    }

    assert!(events.len() >= 6);
    assert!(events.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(events[0].0, 0.0);
    let (last, message) = events.last().unwrap();
    assert!((last - 90.0).abs() < 1e-3);
    assert_eq!(message, "Scene assembled");
}

#[test]
fn cancellation_is_checked_between_bodies() {
    let doc = MockDocument::part("p")
        .with_body(make_quad("a", 1.0))
        .with_body(make_quad("b", 1.0))
        .with_body(make_quad("c", 1.0));
    let cancel = CancelToken::new();
    let trigger = cancel.clone();

    let mut assembler = SceneAssembler::default();
    let mut sink = move |_p: f32, m: &str| {
        if m.starts_with("Processed body 1") {
            trigger.cancel();
        }
    };
    let mut progress = Progress::new(&mut sink);
    let err = assembler.assemble(&doc, &mut progress, &cancel).unwrap_err();
    assert_eq!(err, SceneError::Cancelled);
    assert_eq!(assembler.state(), AssemblyState::Failed);
}

#[test]
fn quality_option_reaches_every_body() {
    let doc = MockDocument::part("p").with_body(make_quad("a", 1.0));
    let mut assembler = SceneAssembler::new(AssemblyOptions {
        quality: Quality::Improved,
        ..AssemblyOptions::default()
    });
    let mut sink = NoProgress;
    let mut progress = Progress::new(&mut sink);
    assembler
        .assemble(&doc, &mut progress, &CancelToken::new())
        .unwrap();

    let requests = doc.bodies[0].requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].improved_quality);
}
