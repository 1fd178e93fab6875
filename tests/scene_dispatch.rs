use std::sync::{Arc, Mutex};

use iridium_ui::{
    Anchor, BatchRenderer, ContainerKind, CursorKind, FixedAdvanceFont, Position, RecordingBackend,
    Scene, Widget, WidgetBehavior,
};
use uuid::Uuid;
use winit::dpi::PhysicalSize;

fn renderer() -> BatchRenderer<RecordingBackend> {
    BatchRenderer::new(
        RecordingBackend::default(),
        600,
        PhysicalSize::new(800, 600),
    )
}

fn fonts() -> FixedAdvanceFont {
    FixedAdvanceFont::new(8, 16)
}

/// Records which widgets received which callbacks.
#[derive(Clone, Default)]
struct Probe {
    clicks: Arc<Mutex<Vec<Uuid>>>,
    hovers: Arc<Mutex<Vec<Uuid>>>,
    hover_ends: Arc<Mutex<Vec<Uuid>>>,
}

impl Probe {
    fn behavior(&self) -> Box<dyn WidgetBehavior> {
        Box::new(ProbeBehavior(self.clone()))
    }

    fn clicks(&self) -> Vec<Uuid> {
        self.clicks.lock().unwrap().clone()
    }

    fn hovers(&self) -> Vec<Uuid> {
        self.hovers.lock().unwrap().clone()
    }

    fn hover_ends(&self) -> Vec<Uuid> {
        self.hover_ends.lock().unwrap().clone()
    }
}

struct ProbeBehavior(Probe);

impl WidgetBehavior for ProbeBehavior {
    fn on_mouse_clicked(&mut self, _scene: &mut Scene, id: Uuid, _pointer: Position) {
        self.0.clicks.lock().unwrap().push(id);
    }

    fn on_mouse_hover(&mut self, _scene: &mut Scene, id: Uuid) {
        self.0.hovers.lock().unwrap().push(id);
    }

    fn on_mouse_hover_ended(&mut self, _scene: &mut Scene, id: Uuid) {
        self.0.hover_ends.lock().unwrap().push(id);
    }
}

fn frame(scene: &mut Scene, r: &mut BatchRenderer<RecordingBackend>, dt: f32) {
    scene.frame(dt, r, &fonts());
}

#[test]
fn click_routes_to_child_before_container() {
    let mut scene = Scene::new(renderer().canvas_size());
    let probe = Probe::default();
    let container = scene.register(
        Widget::container(ContainerKind::Panel)
            .size_px(200, 200)
            .colored([0.1, 0.1, 0.1, 1.0])
            .with_behavior(probe.behavior()),
    );
    let child = scene.add_child(
        container,
        Widget::leaf()
            .size_px(50, 50)
            .offset_px(10, 10)
            .colored([0.3, 0.3, 0.3, 1.0])
            .with_behavior(probe.behavior()),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);

    // inside the child
    assert!(scene.dispatch_click(Position::new(30, 30)));
    assert_eq!(probe.clicks(), vec![child]);

    // inside the container but outside any child
    assert!(scene.dispatch_click(Position::new(150, 150)));
    assert_eq!(probe.clicks(), vec![child, container]);
}

#[test]
fn click_outside_everything_is_dropped() {
    let mut scene = Scene::new(renderer().canvas_size());
    let probe = Probe::default();
    scene.register(
        Widget::leaf()
            .size_px(50, 50)
            .colored([1.0; 4])
            .with_behavior(probe.behavior()),
    );
    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);

    assert!(!scene.dispatch_click(Position::new(400, 400)));
    assert!(probe.clicks().is_empty());
}

#[test]
fn hover_is_front_to_back_exclusive() {
    let mut scene = Scene::new(renderer().canvas_size());
    let probe = Probe::default();
    let behind = scene.register(
        Widget::leaf()
            .size_px(100, 100)
            .z_order(1)
            .colored([1.0; 4])
            .with_behavior(probe.behavior()),
    );
    let front = scene.register(
        Widget::leaf()
            .size_px(100, 100)
            .z_order(2)
            .colored([1.0; 4])
            .with_behavior(probe.behavior()),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    scene.pointer_moved(Some(Position::new(50, 50)));
    frame(&mut scene, &mut r, 0.016);

    assert_eq!(probe.hovers(), vec![front]);
    assert!(scene.widget(front).is_hovered());
    assert!(!scene.widget(behind).is_hovered());
}

#[test]
fn hover_does_not_fall_through_a_claiming_container() {
    let mut scene = Scene::new(renderer().canvas_size());
    let probe = Probe::default();
    let behind = scene.register(
        Widget::leaf()
            .size_px(300, 300)
            .z_order(1)
            .colored([1.0; 4])
            .with_behavior(probe.behavior()),
    );
    let container = scene.register(
        Widget::container(ContainerKind::Panel)
            .size_px(200, 200)
            .z_order(2)
            .colored([1.0; 4])
            .with_behavior(probe.behavior()),
    );
    // child far away from the probe point
    scene.add_child(
        container,
        Widget::leaf().size_px(10, 10).offset_px(150, 150).colored([1.0; 4]),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    scene.pointer_moved(Some(Position::new(50, 50)));
    frame(&mut scene, &mut r, 0.016);

    // the container claims the hover; the widget behind it never sees it
    assert_eq!(probe.hovers(), vec![container]);
    assert!(!scene.widget(behind).is_hovered());
}

#[test]
fn hover_enter_and_leave_are_edge_triggered() {
    let mut scene = Scene::new(renderer().canvas_size());
    let probe = Probe::default();
    let id = scene.register(
        Widget::leaf()
            .size_px(50, 50)
            .colored([1.0; 4])
            .with_cursor(CursorKind::Hand)
            .with_behavior(probe.behavior()),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    scene.pointer_moved(Some(Position::new(25, 25)));
    frame(&mut scene, &mut r, 0.016);
    assert_eq!(scene.cursor_update(), Some(CursorKind::Hand));

    // staying hovered re-fires nothing
    frame(&mut scene, &mut r, 0.016);
    frame(&mut scene, &mut r, 0.016);
    assert_eq!(probe.hovers(), vec![id]);
    assert_eq!(scene.cursor_update(), None);

    // leaving fires the end callback and resets the cursor
    scene.pointer_moved(Some(Position::new(400, 400)));
    frame(&mut scene, &mut r, 0.016);
    assert_eq!(probe.hover_ends(), vec![id]);
    assert_eq!(scene.cursor_update(), Some(CursorKind::Arrow));
}

#[test]
fn tooltip_arms_after_one_second_of_dwell() {
    let mut scene = Scene::new(renderer().canvas_size());
    scene.register(
        Widget::leaf()
            .size_px(50, 50)
            .colored([1.0; 4])
            .with_tip("save the file"),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    scene.pointer_moved(Some(Position::new(25, 25)));
    frame(&mut scene, &mut r, 0.016); // hover begins, pointer counted as moved
    assert!(!scene.tooltip_active());

    frame(&mut scene, &mut r, 0.6);
    assert!(!scene.tooltip_active());
    frame(&mut scene, &mut r, 0.6);
    assert!(scene.tooltip_active());

    // tooltip sits to the right of the pointer
    let pos = scene.tooltip_position().unwrap();
    assert_eq!(pos.x, 25 + 16);

    // pointer movement clears it and resets the accumulator
    scene.pointer_moved(Some(Position::new(26, 25)));
    frame(&mut scene, &mut r, 0.016);
    assert!(!scene.tooltip_active());
    frame(&mut scene, &mut r, 0.6);
    assert!(!scene.tooltip_active());
}

#[test]
fn tooltip_flips_left_at_the_right_edge() {
    let mut scene = Scene::new(renderer().canvas_size());
    scene.register(
        Widget::leaf()
            .size_px(800, 600)
            .colored([1.0; 4])
            .with_tip("hi"),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    scene.pointer_moved(Some(Position::new(790, 100)));
    frame(&mut scene, &mut r, 0.016);
    frame(&mut scene, &mut r, 1.2);
    assert!(scene.tooltip_active());
    // "hi" at 8 px/char + 2 * 6 padding = 28 wide; 790 + 16 + 28 > 800
    let pos = scene.tooltip_position().unwrap();
    assert_eq!(pos.x, 790 - 16 - 28);
}

#[test]
fn keypress_resets_tooltip_dwell() {
    let mut scene = Scene::new(renderer().canvas_size());
    scene.register(
        Widget::leaf()
            .size_px(50, 50)
            .colored([1.0; 4])
            .with_tip("tip"),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    scene.pointer_moved(Some(Position::new(25, 25)));
    frame(&mut scene, &mut r, 0.016);
    frame(&mut scene, &mut r, 0.9);
    scene.dispatch_key("Character(\"a\")");
    frame(&mut scene, &mut r, 0.2);
    // the accumulator restarted at the keypress
    assert!(!scene.tooltip_active());
}

#[test]
fn registration_mailbox_accepts_background_threads() {
    let mut scene = Scene::new(renderer().canvas_size());
    let registrar = scene.registrar();
    let handle = std::thread::spawn(move || {
        registrar.register(Widget::leaf().size_px(10, 10).colored([1.0; 4]))
    });
    let id = handle.join().unwrap();

    assert!(!scene.contains(id));
    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    assert!(scene.contains(id));
    assert!(scene.roots().contains(&id));
}

#[test]
fn deferred_work_drains_fifo_after_draw() {
    let mut scene = Scene::new(renderer().canvas_size());
    let order = Arc::new(Mutex::new(Vec::new()));
    let a = Arc::clone(&order);
    let b = Arc::clone(&order);
    scene.run_later(move |_| a.lock().unwrap().push("first"));
    scene.run_later(move |_| b.lock().unwrap().push("second"));

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn behavior_can_schedule_its_own_close() {
    struct CloseOnClick;
    impl WidgetBehavior for CloseOnClick {
        fn on_mouse_clicked(&mut self, scene: &mut Scene, id: Uuid, _pointer: Position) {
            scene.run_later(move |s| s.close(id));
        }
    }

    let mut scene = Scene::new(renderer().canvas_size());
    let id = scene.register(
        Widget::leaf()
            .size_px(50, 50)
            .colored([1.0; 4])
            .with_behavior(Box::new(CloseOnClick)),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    assert!(scene.dispatch_click(Position::new(25, 25)));
    assert!(scene.contains(id));
    frame(&mut scene, &mut r, 0.016);
    assert!(!scene.contains(id));
}

#[test]
fn close_cascades_into_components_and_children() {
    let mut scene = Scene::new(renderer().canvas_size());
    let panel = scene.register(Widget::container(ContainerKind::Panel).size_px(100, 100));
    let child = scene.add_child(panel, Widget::leaf().size_px(10, 10));
    let badge = scene.add_component(panel, "badge", Widget::leaf().size_px(5, 5));

    scene.close(panel);
    assert!(!scene.contains(panel));
    assert!(!scene.contains(child));
    assert!(!scene.contains(badge));
    assert!(scene.roots().is_empty());
}

#[test]
fn anchor_pivot_layout_matches_algebra() {
    let mut scene = Scene::new(renderer().canvas_size());
    let parent = scene.register(
        Widget::container(ContainerKind::Panel)
            .size_px(200, 100)
            .offset_px(20, 30),
    );
    let child = scene.add_child(
        parent,
        Widget::leaf()
            .size_px(50, 20)
            .anchored(Anchor::new(0.5, 1.0))
            .pivoted(iridium_ui::Pivot::new(0.5, 1.0))
            .offset_px(3, -7),
    );

    // Pp + Ps*A + size*(-P) + O, truncated at each step
    let pos = scene.resolve_position(child);
    assert_eq!(pos, Position::new(20 + 100 - 25 + 3, 30 + 100 - 20 - 7));
    // idempotent
    assert_eq!(scene.resolve_position(child), pos);
}

#[test]
fn hidden_widgets_are_skipped_by_hover_and_draw() {
    let mut scene = Scene::new(renderer().canvas_size());
    let probe = Probe::default();
    let id = scene.register(
        Widget::leaf()
            .size_px(50, 50)
            .colored([1.0; 4])
            .with_behavior(probe.behavior()),
    );

    let mut r = renderer();
    frame(&mut scene, &mut r, 0.016);
    scene.widget_mut(id).hidden = true;
    frame(&mut scene, &mut r, 0.016);

    scene.pointer_moved(Some(Position::new(25, 25)));
    frame(&mut scene, &mut r, 0.016);
    assert!(probe.hovers().is_empty());
    assert!(!scene.dispatch_click(Position::new(25, 25)));
}
