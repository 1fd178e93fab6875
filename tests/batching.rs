use iridium_ui::{
    BatchRenderer, ContainerKind, FixedAdvanceFont, RecordingBackend, Scene, Widget,
};
use winit::dpi::PhysicalSize;

fn renderer() -> BatchRenderer<RecordingBackend> {
    BatchRenderer::new(
        RecordingBackend::default(),
        600,
        PhysicalSize::new(800, 600),
    )
}

#[test]
fn a_tree_of_plain_boxes_flushes_once() {
    let mut scene = Scene::new(renderer().canvas_size());
    let panel = scene.register(
        Widget::container(ContainerKind::Panel)
            .size_px(400, 400)
            .colored([0.1, 0.1, 0.1, 1.0]),
    );
    for i in 0..10 {
        scene.add_child(
            panel,
            Widget::leaf()
                .size_px(40, 40)
                .offset_px(10, i * 40)
                .colored([0.3, 0.3, 0.3, 1.0]),
        );
    }

    let mut r = renderer();
    scene.frame(0.016, &mut r, &FixedAdvanceFont::new(8, 16));

    let subs = &r.backend().submissions;
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].quad_count, 11);
    assert_eq!(subs[0].texture, None);
}

#[test]
fn a_text_run_in_the_middle_splits_the_batch_in_order() {
    let fonts = FixedAdvanceFont::new(8, 16);
    let mut scene = Scene::new(renderer().canvas_size());
    scene.register(
        Widget::leaf()
            .size_px(100, 30)
            .z_order(0)
            .colored([0.2, 0.2, 0.2, 1.0]),
    );
    scene.register(
        Widget::leaf()
            .size_px(100, 30)
            .z_order(1)
            .offset_px(0, 40)
            .with_text("abc", "any", [1.0; 4]),
    );
    scene.register(
        Widget::leaf()
            .size_px(100, 30)
            .z_order(2)
            .offset_px(0, 80)
            .colored([0.2, 0.2, 0.2, 1.0]),
    );

    let mut r = renderer();
    scene.frame(0.016, &mut r, &fonts);

    let subs = &r.backend().submissions;
    // box, glyphs (atlas-bound), box — strict queue order preserved
    assert_eq!(subs.len(), 3);
    assert_eq!(subs[0].texture, None);
    assert_eq!(subs[1].texture, Some(fonts.atlas));
    assert_eq!(subs[1].quad_count, 3);
    assert_eq!(subs[2].texture, None);
}

#[test]
fn glyph_vertices_carry_the_zero_size_stamp() {
    let fonts = FixedAdvanceFont::new(8, 16);
    let mut scene = Scene::new(renderer().canvas_size());
    scene.register(Widget::leaf().size_px(100, 30).with_text("hi", "any", [1.0; 4]));

    let mut r = renderer();
    scene.frame(0.016, &mut r, &fonts);

    let glyph_sub = r
        .backend()
        .submissions
        .iter()
        .find(|s| s.texture.is_some())
        .expect("glyph submission");
    assert!(glyph_sub.vertices.iter().all(|v| v.size == [0.0, 0.0]));
}
