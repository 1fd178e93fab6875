//! Boxes, nesting, scrolling, and pointer dispatch in one window.
//! Run with `cargo run --example showcase`.

use iridium_ui::{
    Anchor, Button, ContainerKind, CursorKind, Panel, Pivot, ScrollAxis, ScrollPane, UiApp,
    Widget, WindowConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = UiApp::new(WindowConfig::default(), |_scene, _ctx| {});
    let scene = app.scene_mut();

    // backdrop panel with a few nested boxes
    let panel = scene.register(
        Panel::widget()
            .size_px(360, 400)
            .offset_px(40, 40)
            .rounded(8.0)
            .bordered(1.0, [0.3, 0.3, 0.35, 1.0]),
    );
    for i in 0..3 {
        scene.add_child(
            panel,
            Widget::leaf()
                .size_px(320, 60)
                .offset_px(20, 20 + i * 80)
                .colored([0.22, 0.24 + i as f32 * 0.04, 0.3, 1.0])
                .rounded(6.0)
                .with_cursor(CursorKind::Hand)
                .with_tip("a hoverable box"),
        );
    }

    // centered rotating accent
    scene.add_child(
        panel,
        Widget::leaf()
            .size_px(40, 40)
            .anchored(Anchor::new(0.5, 1.0))
            .pivoted(Pivot::new(0.5, 1.0))
            .offset_px(0, -20)
            .colored([0.8, 0.6, 0.2, 1.0])
            .rotated(45.0),
    );

    // toggle strategy on the same base widget
    let toggle = Button::create_toggle(
        scene,
        64,
        28,
        [0.25, 0.55, 0.35, 1.0],
        [0.25, 0.27, 0.32, 1.0],
        |_, _, on| log::info!("toggled {on}"),
    );
    scene.widget_mut(toggle).offset = iridium_ui::Offset::new(40, 460);

    // overflowing list behind a scissor with a draggable handle
    let pane = ScrollPane::create(scene, ScrollAxis::Vertical, 220, 400);
    scene.widget_mut(pane).offset = iridium_ui::Offset::new(440, 40);
    for i in 0..24 {
        scene.add_child(
            pane,
            Widget::leaf()
                .size_px(196, 24)
                .offset_px(4, 4 + i * 30)
                .colored([0.2, 0.2, 0.26, 1.0])
                .rounded(4.0),
        );
    }

    // plain container next to it
    let column = scene.register(
        Widget::container(ContainerKind::Panel)
            .size_px(100, 400)
            .offset_px(680, 40)
            .colored([0.14, 0.14, 0.18, 1.0]),
    );
    scene.add_child(
        column,
        Widget::leaf()
            .size_px(80, 80)
            .anchored(Anchor::CENTER)
            .pivoted(Pivot::CENTER)
            .colored([0.5, 0.3, 0.3, 1.0])
            .rounded(40.0),
    );

    app.run()
}
