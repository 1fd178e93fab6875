use std::sync::{Arc, Mutex};

use iridium_ui::{
    BatchRenderer, FixedAdvanceFont, FrameInputRecord, InputState, Position, RecordingBackend,
    ReplayScript, Scene, Widget, WidgetBehavior,
};
use uuid::Uuid;
use winit::dpi::PhysicalSize;

struct CountClicks(Arc<Mutex<usize>>);

impl WidgetBehavior for CountClicks {
    fn on_mouse_clicked(&mut self, _scene: &mut Scene, _id: Uuid, _pointer: Position) {
        *self.0.lock().unwrap() += 1;
    }
}

fn build_scene(clicks: &Arc<Mutex<usize>>) -> Scene {
    let mut scene = Scene::new(iridium_ui::CanvasSize::new(800, 600));
    scene.register(
        Widget::leaf()
            .size_px(100, 40)
            .offset_px(50, 50)
            .colored([0.3, 0.3, 0.3, 1.0])
            .with_behavior(Box::new(CountClicks(Arc::clone(clicks)))),
    );
    scene
}

fn run_script(scene: &mut Scene, script: &ReplayScript) {
    let mut renderer = BatchRenderer::new(
        RecordingBackend::default(),
        600,
        PhysicalSize::new(800, 600),
    );
    let fonts = FixedAdvanceFont::new(8, 16);
    let mut input = InputState::default();
    for record in &script.frames {
        record.apply_to(&mut input);
        scene.apply_input(&input);
        scene.frame(1.0 / 60.0, &mut renderer, &fonts);
        input.end_frame();
    }
}

#[test]
fn recorded_input_reproduces_dispatch() {
    // frame 0: draw only; frame 1: move over the button; frame 2: press
    let script = ReplayScript {
        frames: vec![
            FrameInputRecord::default(),
            FrameInputRecord {
                pointer: Some((100, 70)),
                ..Default::default()
            },
            FrameInputRecord {
                pointer: Some((100, 70)),
                lmb_down: true,
                ..Default::default()
            },
        ],
    };

    let json = script.to_json();
    let parsed = ReplayScript::from_json(&json).expect("script parses back");

    let live_clicks = Arc::new(Mutex::new(0));
    let mut live = build_scene(&live_clicks);
    run_script(&mut live, &script);

    let replayed_clicks = Arc::new(Mutex::new(0));
    let mut replayed = build_scene(&replayed_clicks);
    run_script(&mut replayed, &parsed);

    assert_eq!(*live_clicks.lock().unwrap(), 1);
    assert_eq!(*replayed_clicks.lock().unwrap(), 1);
}

#[test]
fn press_without_pointer_over_widget_clicks_nothing() {
    let script = ReplayScript {
        frames: vec![
            FrameInputRecord::default(),
            FrameInputRecord {
                pointer: Some((400, 400)),
                lmb_down: true,
                ..Default::default()
            },
        ],
    };
    let clicks = Arc::new(Mutex::new(0));
    let mut scene = build_scene(&clicks);
    run_script(&mut scene, &script);
    assert_eq!(*clicks.lock().unwrap(), 0);
}
