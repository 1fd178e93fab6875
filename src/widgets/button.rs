//! Buttons: a leaf widget plus a click-handler strategy and a hover tint.
//! The label rides in the component map so it can never steal the click.

use log::warn;
use uuid::Uuid;

use crate::layout::{Anchor, Pivot};
use crate::scene::Scene;
use crate::text::FontSource;
use crate::utils::{Position, Rgba};
use crate::widget::{CursorKind, Widget, WidgetBehavior};

pub struct ButtonStyle {
    pub base_fill_rgba: Rgba,
    pub hover_fill_rgba: Rgba,
    pub border_rgba: Rgba,
    pub border_thickness_px: f32,
    pub corner_radius_px: f32,
    pub text_rgba: Rgba,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            base_fill_rgba: [0.20, 0.22, 0.28, 1.0],
            hover_fill_rgba: [0.26, 0.28, 0.34, 1.0],
            border_rgba: [0.14, 0.16, 0.20, 1.0],
            border_thickness_px: 1.0,
            corner_radius_px: 10.0,
            text_rgba: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

type ClickFn = Box<dyn FnMut(&mut Scene, Uuid) + Send>;

/// Click handler plus hover tint.
pub struct ButtonBehavior {
    on_click: ClickFn,
    base_fill: Rgba,
    hover_fill: Rgba,
}

impl WidgetBehavior for ButtonBehavior {
    fn on_mouse_clicked(&mut self, scene: &mut Scene, id: Uuid, _pointer: Position) {
        (self.on_click)(scene, id);
    }

    fn on_mouse_hover(&mut self, scene: &mut Scene, id: Uuid) {
        scene.widget_mut(id).background = self.hover_fill;
    }

    fn on_mouse_hover_ended(&mut self, scene: &mut Scene, id: Uuid) {
        scene.widget_mut(id).background = self.base_fill;
    }
}

/// Toggle-state strategy: flips on click and swaps the fill.
pub struct ToggleBehavior {
    on: bool,
    on_fill: Rgba,
    off_fill: Rgba,
    on_toggle: Box<dyn FnMut(&mut Scene, Uuid, bool) + Send>,
}

impl ToggleBehavior {
    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl WidgetBehavior for ToggleBehavior {
    fn on_mouse_clicked(&mut self, scene: &mut Scene, id: Uuid, _pointer: Position) {
        self.on = !self.on;
        scene.widget_mut(id).background = if self.on { self.on_fill } else { self.off_fill };
        (self.on_toggle)(scene, id, self.on);
    }
}

pub struct Button;

impl Button {
    pub const LABEL: &'static str = "label";

    #[allow(clippy::too_many_arguments)]
    pub fn create(
        scene: &mut Scene,
        fonts: &dyn FontSource,
        text: &str,
        font: &str,
        width: i32,
        height: i32,
        style: ButtonStyle,
        on_click: impl FnMut(&mut Scene, Uuid) + Send + 'static,
    ) -> Uuid {
        let button = Widget::leaf()
            .size_px(width, height)
            .colored(style.base_fill_rgba)
            .rounded(style.corner_radius_px)
            .bordered(style.border_thickness_px, style.border_rgba)
            .with_cursor(CursorKind::Hand)
            .with_behavior(Box::new(ButtonBehavior {
                on_click: Box::new(on_click),
                base_fill: style.base_fill_rgba,
                hover_fill: style.hover_fill_rgba,
            }));
        let id = scene.register(button);

        let (label_w, label_h) = match (fonts.measure(font, text), fonts.line_height(font)) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                warn!("font '{font}' unavailable; button label will not render");
                (0, 0)
            }
        };
        let label = Widget::leaf()
            .size_px(label_w, label_h)
            .anchored(Anchor::CENTER)
            .pivoted(Pivot::CENTER)
            .z_order(1)
            .with_text(text, font, style.text_rgba);
        scene.add_component(id, Self::LABEL, label);
        id
    }

    /// A toggle variant of the same base widget, differing only in the
    /// behavior strategy plugged in.
    pub fn create_toggle(
        scene: &mut Scene,
        width: i32,
        height: i32,
        on_fill: Rgba,
        off_fill: Rgba,
        on_toggle: impl FnMut(&mut Scene, Uuid, bool) + Send + 'static,
    ) -> Uuid {
        let toggle = Widget::leaf()
            .size_px(width, height)
            .colored(off_fill)
            .rounded(height as f32 * 0.5)
            .with_cursor(CursorKind::Hand)
            .with_behavior(Box::new(ToggleBehavior {
                on: false,
                on_fill,
                off_fill,
                on_toggle: Box::new(on_toggle),
            }));
        scene.register(toggle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CanvasSize;
    use crate::text::FixedAdvanceFont;

    #[test]
    fn button_label_is_a_component_not_a_child() {
        let mut scene = Scene::new(CanvasSize::new(800, 600));
        let fonts = FixedAdvanceFont::new(8, 16);
        let id = Button::create(
            &mut scene,
            &fonts,
            "Go",
            "default",
            100,
            32,
            ButtonStyle::default(),
            |_, _| {},
        );
        let button = scene.widget(id);
        assert!(!button.is_container());
        let label = button.component(Button::LABEL).expect("label component");
        assert_eq!(scene.widget(label).width, 16);
    }
}
