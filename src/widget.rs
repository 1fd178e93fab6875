//! Widget tree nodes.
//!
//! A widget is plain data: box geometry, paint attributes, anchor/pivot
//! placement, and an optional behavior strategy for pointer callbacks.
//! Container-ness is an explicit tagged kind rather than a runtime cast,
//! and parent links are non-owning ids into the scene's arena so teardown
//! never has to break a reference cycle.

use std::collections::HashMap;

use uuid::Uuid;

use crate::layout::{Anchor, Offset, Pivot};
use crate::scene::Scene;
use crate::scroll::ScrollState;
use crate::utils::{Position, Rectangle, Rgba, Size, TRANSPARENT};
use crate::widgets::grid::GridSpec;
use crate::widgets::tabs::TabStrip;

/// System cursor shape a widget requests while hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Arrow,
    Hand,
    Text,
    Move,
}

/// Absolute bounds captured at the moment a widget was drawn this frame.
/// Hit-testing always runs against this, never against a live re-resolve:
/// scrolling and animation mutate positions mid-frame, and input must agree
/// with what was actually painted.
#[derive(Debug, Clone, Copy)]
pub struct DrawSnapshot {
    pub position: Position,
    pub end: Position,
}

impl DrawSnapshot {
    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.position.x && p.x <= self.end.x && p.y >= self.position.y && p.y <= self.end.y
    }

    pub fn rect(&self) -> Rectangle {
        Rectangle::new(
            self.position.x,
            self.position.y,
            self.end.x - self.position.x,
            self.end.y - self.position.y,
        )
    }
}

/// Pointer callbacks a widget variant plugs in. Strategies are `Send` so
/// fully built widgets can be registered from background work.
#[allow(unused_variables)]
pub trait WidgetBehavior: Send {
    fn on_mouse_clicked(&mut self, scene: &mut Scene, id: Uuid, pointer: Position) {}
    fn on_mouse_hover(&mut self, scene: &mut Scene, id: Uuid) {}
    fn on_mouse_hover_ended(&mut self, scene: &mut Scene, id: Uuid) {}
}

/// Layout/draw discipline of a container.
pub enum ContainerKind {
    /// Children drawn back-to-front, nothing else.
    Panel,
    /// Overflowing children behind a scissor, with track/handle components.
    Scroll(ScrollState),
    /// Tab strip mapping tab ids onto content widgets.
    Tabs(TabStrip),
    /// Fixed-column placement grid.
    Grid(GridSpec),
}

/// Leaf-vs-container capability, matched on explicitly by dispatch code.
pub enum WidgetKind {
    Leaf,
    Container {
        children: Vec<Uuid>,
        layout: ContainerKind,
    },
}

/// A text run painted inside the widget, resolved through the font source
/// at draw time. A missing font logs and renders nothing.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub content: String,
    pub font: String,
    pub color: Rgba,
}

pub struct Widget {
    id: Uuid,
    pub width: i32,
    pub height: i32,
    pub z: i32,
    angle: f32,
    pub corner_radius: f32,
    pub border_thickness: f32,
    pub border_color: Rgba,
    pub background: Rgba,
    pub hidden: bool,
    pub cursor: CursorKind,
    pub tip: Option<String>,
    pub anchor: Anchor,
    pub pivot: Pivot,
    pub offset: Offset,
    pub(crate) hovered: bool,
    pub(crate) parent: Option<Uuid>,
    pub(crate) kind: WidgetKind,
    pub(crate) components: HashMap<String, Uuid>,
    pub(crate) behavior: Option<Box<dyn WidgetBehavior>>,
    pub(crate) text: Option<TextRun>,
    pub(crate) snapshot: Option<DrawSnapshot>,
}

impl Widget {
    pub fn leaf() -> Self {
        Self::with_kind(WidgetKind::Leaf)
    }

    pub fn container(layout: ContainerKind) -> Self {
        Self::with_kind(WidgetKind::Container {
            children: Vec::new(),
            layout,
        })
    }

    fn with_kind(kind: WidgetKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            width: 0,
            height: 0,
            z: 0,
            angle: 0.0,
            corner_radius: 0.0,
            border_thickness: 0.0,
            border_color: TRANSPARENT,
            background: TRANSPARENT,
            hidden: false,
            cursor: CursorKind::Arrow,
            tip: None,
            anchor: Anchor::TOP_LEFT,
            pivot: Pivot::TOP_LEFT,
            offset: Offset::default(),
            hovered: false,
            parent: None,
            kind,
            components: HashMap::new(),
            behavior: None,
            text: None,
            snapshot: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Angle in degrees, always in `0.0..360.0`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, degrees: f32) {
        self.angle = degrees.rem_euclid(360.0);
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, WidgetKind::Container { .. })
    }

    pub fn children(&self) -> &[Uuid] {
        match &self.kind {
            WidgetKind::Leaf => &[],
            WidgetKind::Container { children, .. } => children,
        }
    }

    pub fn component(&self, name: &str) -> Option<Uuid> {
        self.components.get(name).copied()
    }

    /// Bounds painted most recently, if the widget has been drawn at all.
    pub fn last_draw(&self) -> Option<DrawSnapshot> {
        self.snapshot
    }

    pub(crate) fn scroll(&self) -> Option<&ScrollState> {
        match &self.kind {
            WidgetKind::Container {
                layout: ContainerKind::Scroll(state),
                ..
            } => Some(state),
            _ => None,
        }
    }

    pub(crate) fn scroll_mut(&mut self) -> Option<&mut ScrollState> {
        match &mut self.kind {
            WidgetKind::Container {
                layout: ContainerKind::Scroll(state),
                ..
            } => Some(state),
            _ => None,
        }
    }

    // Chainable configuration, applied before registration.

    pub fn size_px(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn z_order(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn pivoted(mut self, pivot: Pivot) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn offset_px(mut self, x: i32, y: i32) -> Self {
        self.offset = Offset::new(x, y);
        self
    }

    pub fn colored(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn rounded(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn bordered(mut self, thickness: f32, color: Rgba) -> Self {
        self.border_thickness = thickness;
        self.border_color = color;
        self
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.set_angle(degrees);
        self
    }

    pub fn with_cursor(mut self, cursor: CursorKind) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    pub fn with_text(mut self, content: impl Into<String>, font: impl Into<String>, color: Rgba) -> Self {
        self.text = Some(TextRun {
            content: content.into(),
            font: font.into(),
            color,
        });
        self
    }

    pub fn with_behavior(mut self, behavior: Box<dyn WidgetBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn set_text_content(&mut self, content: impl Into<String>) {
        if let Some(run) = &mut self.text {
            run.content = content.into();
        }
    }
}

/// Id-keyed widget storage. A lookup miss is a desynchronized tree, which
/// is a logic error, so the non-`try` accessors fail hard.
#[derive(Default)]
pub struct Arena {
    map: HashMap<Uuid, Widget>,
}

impl Arena {
    pub fn insert(&mut self, widget: Widget) -> Uuid {
        let id = widget.id();
        self.map.insert(id, widget);
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Widget> {
        self.map.remove(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.map.contains_key(&id)
    }

    pub fn get(&self, id: Uuid) -> &Widget {
        match self.map.get(&id) {
            Some(w) => w,
            None => panic!("widget {id} is not registered; the tree is out of sync"),
        }
    }

    pub fn get_mut(&mut self, id: Uuid) -> &mut Widget {
        match self.map.get_mut(&id) {
            Some(w) => w,
            None => panic!("widget {id} is not registered; the tree is out of sync"),
        }
    }

    pub fn try_get(&self, id: Uuid) -> Option<&Widget> {
        self.map.get(&id)
    }

    pub fn try_get_mut(&mut self, id: Uuid) -> Option<&mut Widget> {
        self.map.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.map.keys().copied()
    }
}
