//! Scene: tree ownership, the frame loop, and pointer dispatch.
//!
//! One thread owns the scene and advances it once per frame. The frame
//! order is fixed: drain registrations, resolve hover, advance animation,
//! draw (capturing per-widget snapshots), tooltip, flush, then drain the
//! deferred-work queue. Hit-testing always runs against the snapshots the
//! last draw produced, so input agrees with what was painted.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use log::warn;
use uuid::Uuid;

use crate::backend::GpuBackend;
use crate::batch::{BatchRenderer, QuadInstance};
use crate::layout::{self, CanvasSize, ParentFrame};
use crate::scroll::{ScrollAxis, ScrollPane, WHEEL_STEP};
use crate::text::FontSource;
use crate::utils::{Position, Rectangle, Rgba, Size};
use crate::widget::{Arena, ContainerKind, CursorKind, DrawSnapshot, Widget, WidgetKind};

/// Stationary-hover time before a tip string becomes an active tooltip.
const TOOLTIP_DWELL_SECS: f32 = 1.0;
/// Gap between the pointer and the tooltip box.
const TOOLTIP_GAP: i32 = 16;
const TOOLTIP_PADDING: i32 = 6;
const TOOLTIP_BACKGROUND: Rgba = [0.08, 0.08, 0.1, 0.95];
const TOOLTIP_BORDER: Rgba = [0.35, 0.37, 0.42, 1.0];
const TOOLTIP_TEXT: Rgba = [0.92, 0.92, 0.95, 1.0];

#[derive(Debug, Clone, Copy)]
struct Tooltip {
    widget: Uuid,
    position: Position,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    pane: Uuid,
}

type Deferred = Box<dyn FnOnce(&mut Scene)>;

/// Cross-thread handle for registering fully built widgets as roots. The
/// mailbox is the only piece of scene state another thread may touch.
#[derive(Clone)]
pub struct Registrar {
    mailbox: Arc<Mutex<Vec<Widget>>>,
}

impl Registrar {
    pub fn register(&self, widget: Widget) -> Uuid {
        let id = widget.id();
        self.mailbox
            .lock()
            .expect("registration mailbox poisoned")
            .push(widget);
        id
    }
}

pub struct Scene {
    arena: Arena,
    roots: Vec<Uuid>,
    canvas: CanvasSize,
    tooltip_font: String,
    pointer: Option<Position>,
    last_pointer: Option<Position>,
    hovered: Option<Uuid>,
    cursor: CursorKind,
    cursor_changed: bool,
    dwell: f32,
    tooltip: Option<Tooltip>,
    drag: Option<DragState>,
    scissor_stack: Vec<Rectangle>,
    deferred: VecDeque<Deferred>,
    mailbox: Arc<Mutex<Vec<Widget>>>,
}

impl Scene {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            arena: Arena::default(),
            roots: Vec::new(),
            canvas,
            tooltip_font: "default".to_string(),
            pointer: None,
            last_pointer: None,
            hovered: None,
            cursor: CursorKind::Arrow,
            cursor_changed: false,
            dwell: 0.0,
            tooltip: None,
            drag: None,
            scissor_stack: Vec::new(),
            deferred: VecDeque::new(),
            mailbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Single writer: the resize path.
    pub fn set_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    pub fn set_tooltip_font(&mut self, font: impl Into<String>) {
        self.tooltip_font = font.into();
    }

    // ---- tree management ----------------------------------------------

    /// Register a widget as a root. Z-order ties break by insertion order.
    pub fn register(&mut self, widget: Widget) -> Uuid {
        let id = self.arena.insert(widget);
        self.roots.push(id);
        id
    }

    /// Register a widget as a child of `parent`. Panics when `parent` is a
    /// leaf: attaching children to a leaf is structural misuse.
    pub fn add_child(&mut self, parent: Uuid, widget: Widget) -> Uuid {
        let id = self.arena.insert(widget);
        self.arena.get_mut(id).parent = Some(parent);
        match &mut self.arena.get_mut(parent).kind {
            WidgetKind::Container { children, .. } => children.push(id),
            WidgetKind::Leaf => panic!("widget {parent} is a leaf and cannot own children"),
        }
        id
    }

    /// Attach a named bookkeeping component. Components are owned and
    /// closed with their widget but never enter the generic child list.
    pub fn add_component(&mut self, owner: Uuid, name: &str, widget: Widget) -> Uuid {
        let id = self.arena.insert(widget);
        self.arena.get_mut(id).parent = Some(owner);
        self.arena
            .get_mut(owner)
            .components
            .insert(name.to_string(), id);
        id
    }

    pub fn registrar(&self) -> Registrar {
        Registrar {
            mailbox: Arc::clone(&self.mailbox),
        }
    }

    pub fn widget(&self, id: Uuid) -> &Widget {
        self.arena.get(id)
    }

    pub fn widget_mut(&mut self, id: Uuid) -> &mut Widget {
        self.arena.get_mut(id)
    }

    pub fn try_widget(&self, id: Uuid) -> Option<&Widget> {
        self.arena.try_get(id)
    }

    pub fn try_widget_mut(&mut self, id: Uuid) -> Option<&mut Widget> {
        self.arena.try_get_mut(id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.arena.contains(id)
    }

    pub fn roots(&self) -> &[Uuid] {
        &self.roots
    }

    pub fn scroll_state(&self, id: Uuid) -> Option<&crate::scroll::ScrollState> {
        self.arena.get(id).scroll()
    }

    pub fn scroll_state_mut(&mut self, id: Uuid) -> Option<&mut crate::scroll::ScrollState> {
        self.arena.get_mut(id).scroll_mut()
    }

    /// Close a widget: cascade into owned components and children, then
    /// de-register everything from the scene.
    pub fn close(&mut self, id: Uuid) {
        let parent = self.arena.try_get(id).and_then(|w| w.parent);
        if let Some(pid) = parent {
            if let Some(p) = self.arena.try_get_mut(pid) {
                if let WidgetKind::Container { children, .. } = &mut p.kind {
                    children.retain(|c| *c != id);
                }
                p.components.retain(|_, c| *c != id);
            }
        }
        self.roots.retain(|r| *r != id);
        self.close_subtree(id);
    }

    fn close_subtree(&mut self, id: Uuid) {
        let Some(widget) = self.arena.remove(id) else {
            return;
        };
        for (_, component) in widget.components {
            self.close_subtree(component);
        }
        if let WidgetKind::Container { children, .. } = widget.kind {
            for child in children {
                self.close_subtree(child);
            }
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.tooltip.map(|t| t.widget) == Some(id) {
            self.tooltip = None;
        }
        if self.drag.map(|d| d.pane) == Some(id) {
            self.drag = None;
        }
    }

    /// Queue work for after this frame's draw; input callbacks use this to
    /// schedule tree mutations safely. Drained FIFO, once per frame.
    pub fn run_later(&mut self, f: impl FnOnce(&mut Scene) + 'static) {
        self.deferred.push_back(Box::new(f));
    }

    // ---- layout --------------------------------------------------------

    /// Absolute position, re-derived from the anchor/pivot/offset chain.
    /// Never cached: parent chains can be rearranged between frames.
    pub fn resolve_position(&self, id: Uuid) -> Position {
        let w = self.arena.get(id);
        let parent = w.parent.map(|pid| ParentFrame {
            position: self.resolve_position(pid),
            size: self.arena.get(pid).size(),
        });
        layout::resolve(w.anchor, w.pivot, w.offset, w.size(), parent, self.canvas)
    }

    // ---- input ---------------------------------------------------------

    pub fn pointer_moved(&mut self, pointer: Option<Position>) {
        self.pointer = pointer;
        let Some(p) = pointer else {
            return;
        };
        if let Some(drag) = self.drag {
            let Some(w) = self.arena.try_get(drag.pane) else {
                self.drag = None;
                return;
            };
            let (Some(snap), Some(state)) = (w.snapshot, w.scroll()) else {
                return;
            };
            let along = match state.axis() {
                ScrollAxis::Vertical => p.y - snap.position.y,
                ScrollAxis::Horizontal => p.x - snap.position.x,
            };
            if let Some(state) = self.arena.get_mut(drag.pane).scroll_mut() {
                state.drag_to(along);
            }
        }
    }

    /// A held drag ends only on an explicit release.
    pub fn pointer_released(&mut self) {
        if let Some(drag) = self.drag.take() {
            if let Some(state) = self
                .arena
                .try_get_mut(drag.pane)
                .and_then(|w| w.scroll_mut())
            {
                state.end_drag();
            }
        }
    }

    /// Front-to-back click dispatch. Children get first refusal; only when
    /// no child consumes the click does the container receive it. A click
    /// outside every widget is dropped silently and mutates nothing.
    pub fn dispatch_click(&mut self, p: Position) -> bool {
        let Some(target) = self.hit_test(p) else {
            return false;
        };

        // scroll handles are bookkeeping components: a press starts a drag
        if let Some(pane) = self.scroll_pane_of_handle(target) {
            let snap = self.arena.get(pane).snapshot;
            if let (Some(snap), Some(state)) =
                (snap, self.arena.get_mut(pane).scroll_mut())
            {
                let along = match state.axis() {
                    ScrollAxis::Vertical => p.y - snap.position.y,
                    ScrollAxis::Horizontal => p.x - snap.position.x,
                };
                state.begin_drag(along);
                self.drag = Some(DragState { pane });
            }
            self.dwell = 0.0;
            self.tooltip = None;
            return true;
        }

        self.dwell = 0.0;
        self.tooltip = None;
        self.fire_clicked(target, p);
        true
    }

    /// Wheel input animates the innermost scrollable container under the
    /// pointer toward a new target offset.
    pub fn dispatch_wheel(&mut self, p: Position, detents: f32) {
        let Some(pane) = self.wheel_target(p) else {
            return;
        };
        let state = self
            .arena
            .get_mut(pane)
            .scroll_mut()
            .expect("wheel target is scrollable");
        let delta = match state.axis() {
            ScrollAxis::Vertical => detents * WHEEL_STEP,
            ScrollAxis::Horizontal => -detents * WHEEL_STEP,
        };
        state.scroll_by(delta);
    }

    /// Any keypress resets tooltip dwell.
    pub fn dispatch_key(&mut self, _key: &str) {
        self.dwell = 0.0;
        self.tooltip = None;
    }

    /// Dispatch one frame's edge-detected input. The window layer and the
    /// replay path both funnel through here so recorded frames reproduce
    /// live dispatch exactly.
    pub fn apply_input(&mut self, input: &crate::input::InputState) {
        self.pointer_moved(input.pointer);
        if input.lmb_just_pressed {
            if let Some(p) = input.pointer {
                self.dispatch_click(p);
            }
        }
        if input.lmb_just_released {
            self.pointer_released();
        }
        if input.wheel != 0.0 {
            if let Some(p) = input.pointer {
                self.dispatch_wheel(p, input.wheel);
            }
        }
        for key in &input.just_pressed {
            self.dispatch_key(key);
        }
    }

    /// Cursor change since the last poll, edge-triggered.
    pub fn cursor_update(&mut self) -> Option<CursorKind> {
        if self.cursor_changed {
            self.cursor_changed = false;
            Some(self.cursor)
        } else {
            None
        }
    }

    pub fn hovered(&self) -> Option<Uuid> {
        self.hovered
    }

    pub fn tooltip_active(&self) -> bool {
        self.tooltip.is_some()
    }

    pub fn tooltip_position(&self) -> Option<Position> {
        self.tooltip.map(|t| t.position)
    }

    // ---- hit testing ---------------------------------------------------

    fn sorted_by_z(&self, ids: &[Uuid]) -> Vec<Uuid> {
        let mut sorted: Vec<Uuid> = ids.to_vec();
        sorted.sort_by_key(|id| self.arena.get(*id).z);
        sorted
    }

    fn hit_test(&self, p: Position) -> Option<Uuid> {
        for id in self.sorted_by_z(&self.roots).into_iter().rev() {
            if let Some(hit) = self.hit_widget(id, p) {
                return Some(hit);
            }
        }
        None
    }

    fn hit_widget(&self, id: Uuid, p: Position) -> Option<Uuid> {
        let w = self.arena.get(id);
        if w.hidden {
            return None;
        }
        let snap = w.snapshot?;
        if !snap.contains(p) {
            return None;
        }
        if let WidgetKind::Container { children, layout } = &w.kind {
            // the scroll handle rides above the content and is hit first
            if matches!(layout, ContainerKind::Scroll(_)) {
                if let Some(handle) = w.component(ScrollPane::HANDLE) {
                    if let Some(hw) = self.arena.try_get(handle) {
                        if !hw.hidden && hw.snapshot.map(|s| s.contains(p)).unwrap_or(false) {
                            return Some(handle);
                        }
                    }
                }
            }
            for child in self.sorted_by_z(children).into_iter().rev() {
                if let Some(hit) = self.hit_widget(child, p) {
                    return Some(hit);
                }
            }
        }
        // no child claimed it; the container itself is the claimant and
        // nothing behind it may receive the event
        Some(id)
    }

    fn scroll_pane_of_handle(&self, id: Uuid) -> Option<Uuid> {
        let parent = self.arena.try_get(id)?.parent?;
        let pw = self.arena.try_get(parent)?;
        (pw.scroll().is_some() && pw.component(ScrollPane::HANDLE) == Some(id)).then_some(parent)
    }

    fn wheel_target(&self, p: Position) -> Option<Uuid> {
        for id in self.sorted_by_z(&self.roots).into_iter().rev() {
            if let Some(pane) = self.find_scrollable(id, p) {
                return Some(pane);
            }
        }
        None
    }

    fn find_scrollable(&self, id: Uuid, p: Position) -> Option<Uuid> {
        let w = self.arena.get(id);
        if w.hidden {
            return None;
        }
        let snap = w.snapshot?;
        if !snap.contains(p) {
            return None;
        }
        if let WidgetKind::Container { children, .. } = &w.kind {
            for child in self.sorted_by_z(children).into_iter().rev() {
                if let Some(pane) = self.find_scrollable(child, p) {
                    return Some(pane);
                }
            }
        }
        w.scroll().map(|_| id)
    }

    // ---- hover ---------------------------------------------------------

    fn resolve_hover(&mut self) {
        let target = self.pointer.and_then(|p| self.hit_test(p));
        if target == self.hovered {
            return;
        }
        if let Some(old) = self.hovered {
            if let Some(w) = self.arena.try_get_mut(old) {
                w.hovered = false;
            }
            self.fire_hover_ended(old);
        }
        self.hovered = target;
        match target {
            Some(new) => {
                self.arena.get_mut(new).hovered = true;
                self.fire_hover(new);
                let kind = self.arena.get(new).cursor;
                self.set_cursor(kind);
            }
            None => self.set_cursor(CursorKind::Arrow),
        }
        self.dwell = 0.0;
        self.tooltip = None;
    }

    fn set_cursor(&mut self, kind: CursorKind) {
        if kind != self.cursor {
            self.cursor = kind;
            self.cursor_changed = true;
        }
    }

    // ---- behavior invocation -------------------------------------------

    fn fire_clicked(&mut self, id: Uuid, p: Position) {
        let Some(mut behavior) = self
            .arena
            .try_get_mut(id)
            .and_then(|w| w.behavior.take())
        else {
            return;
        };
        behavior.on_mouse_clicked(self, id, p);
        self.restore_behavior(id, behavior);
    }

    fn fire_hover(&mut self, id: Uuid) {
        let Some(mut behavior) = self
            .arena
            .try_get_mut(id)
            .and_then(|w| w.behavior.take())
        else {
            return;
        };
        behavior.on_mouse_hover(self, id);
        self.restore_behavior(id, behavior);
    }

    fn fire_hover_ended(&mut self, id: Uuid) {
        let Some(mut behavior) = self
            .arena
            .try_get_mut(id)
            .and_then(|w| w.behavior.take())
        else {
            return;
        };
        behavior.on_mouse_hover_ended(self, id);
        self.restore_behavior(id, behavior);
    }

    fn restore_behavior(&mut self, id: Uuid, behavior: Box<dyn crate::widget::WidgetBehavior>) {
        // the widget may have closed itself inside the callback
        if let Some(w) = self.arena.try_get_mut(id) {
            if w.behavior.is_none() {
                w.behavior = Some(behavior);
            }
        }
    }

    // ---- frame loop ----------------------------------------------------

    pub fn frame<B: GpuBackend>(
        &mut self,
        dt: f32,
        renderer: &mut BatchRenderer<B>,
        fonts: &dyn FontSource,
    ) {
        self.canvas = renderer.canvas_size();
        self.drain_mailbox();
        self.resolve_hover();
        self.update(dt);
        renderer.begin_frame();
        self.draw(renderer, fonts);
        self.update_tooltip(dt, renderer, fonts);
        renderer.end_frame();
        self.drain_deferred();
        self.last_pointer = self.pointer;
    }

    fn drain_mailbox(&mut self) {
        let pending: Vec<Widget> = {
            let mut mailbox = self.mailbox.lock().expect("registration mailbox poisoned");
            mailbox.drain(..).collect()
        };
        for widget in pending {
            self.register(widget);
        }
    }

    fn drain_deferred(&mut self) {
        // only what was queued up to this point; new work waits a frame
        let queued = self.deferred.len();
        for _ in 0..queued {
            let Some(f) = self.deferred.pop_front() else {
                break;
            };
            f(self);
        }
    }

    fn update(&mut self, dt: f32) {
        let panes: Vec<Uuid> = self
            .arena
            .ids()
            .filter(|id| self.arena.get(*id).scroll().is_some())
            .collect();
        for pane in panes {
            self.update_scroll_pane(pane, dt);
        }
    }

    fn update_scroll_pane(&mut self, pane: Uuid, dt: f32) {
        let w = self.arena.get(pane);
        let axis = w.scroll().expect("pane is scrollable").axis();
        let pane_size = w.size();
        let padding = w.scroll().expect("pane is scrollable").padding();
        let children: Vec<Uuid> = w.children().to_vec();

        // content extent: farthest child edge relative to the pane, plus
        // padding; independent of the current scroll offset
        let origin = self.resolve_position(pane);
        let mut far_edge = 0;
        for child in &children {
            let cw = self.arena.get(*child);
            if cw.hidden {
                continue;
            }
            let rel = self.resolve_position(*child) - origin;
            let edge = match axis {
                ScrollAxis::Vertical => rel.y + cw.height,
                ScrollAxis::Horizontal => rel.x + cw.width,
            };
            far_edge = far_edge.max(edge);
        }
        let content = if far_edge > 0 { far_edge + padding } else { 0 };
        let viewport = match axis {
            ScrollAxis::Vertical => pane_size.height,
            ScrollAxis::Horizontal => pane_size.width,
        };

        let state = self.arena.get_mut(pane).scroll_mut().expect("pane is scrollable");
        state.set_extents(viewport, content);
        state.animate(dt);
        let visible = state.handle_visible();
        let extent = state.handle_extent();
        let handle_pos = state.handle_position();

        self.sync_scroll_chrome(pane, axis, pane_size, visible, extent, handle_pos);
    }

    fn sync_scroll_chrome(
        &mut self,
        pane: Uuid,
        axis: ScrollAxis,
        pane_size: Size,
        visible: bool,
        extent: i32,
        handle_pos: i32,
    ) {
        let track = self.arena.get(pane).component(ScrollPane::TRACK);
        let handle = self.arena.get(pane).component(ScrollPane::HANDLE);
        if let Some(track) = track.and_then(|id| self.arena.try_get_mut(id)) {
            track.hidden = !visible;
            match axis {
                ScrollAxis::Vertical => track.height = pane_size.height,
                ScrollAxis::Horizontal => track.width = pane_size.width,
            }
        }
        if let Some(handle) = handle.and_then(|id| self.arena.try_get_mut(id)) {
            handle.hidden = !visible;
            match axis {
                ScrollAxis::Vertical => {
                    handle.height = extent;
                    handle.offset.y = handle_pos;
                }
                ScrollAxis::Horizontal => {
                    handle.width = extent;
                    handle.offset.x = handle_pos;
                }
            }
        }
    }

    // ---- drawing -------------------------------------------------------

    fn draw<B: GpuBackend>(&mut self, renderer: &mut BatchRenderer<B>, fonts: &dyn FontSource) {
        for id in self.sorted_by_z(&self.roots.clone()) {
            self.draw_widget(id, renderer, fonts);
        }
    }

    fn draw_widget<B: GpuBackend>(
        &mut self,
        id: Uuid,
        renderer: &mut BatchRenderer<B>,
        fonts: &dyn FontSource,
    ) {
        let w = self.arena.get(id);
        if w.hidden {
            return;
        }
        let size = w.size();
        let background = w.background;
        let angle = w.angle();
        let corner_radius = w.corner_radius;
        let border_thickness = w.border_thickness;
        let border_color = w.border_color;
        let text = w.text.clone();

        let pos = self.resolve_position(id);
        let snapshot = DrawSnapshot {
            position: pos,
            end: Position::new(pos.x + size.width, pos.y + size.height),
        };
        self.arena.get_mut(id).snapshot = Some(snapshot);

        if background[3] > 0.0 || border_thickness > 0.0 {
            renderer.queue(&QuadInstance {
                position: pos,
                size,
                color: background,
                angle,
                corner_radius,
                border_thickness,
                border_color,
            });
        }

        if let Some(run) = text {
            match fonts.layout(&run.font, &run.content, pos) {
                Some(layout) => {
                    for glyph in &layout.glyphs {
                        renderer.queue_glyph(glyph, layout.atlas, run.color);
                    }
                }
                None => warn!("font '{}' unavailable; text on widget {id} skipped", run.font),
            }
        }

        let is_scroll = self.arena.get(id).scroll().is_some();
        let children: Option<Vec<Uuid>> = match &self.arena.get(id).kind {
            WidgetKind::Leaf => None,
            WidgetKind::Container { children, .. } => Some(children.clone()),
        };
        if let Some(children) = children {
            if is_scroll {
                self.draw_scrolled_children(id, &children, snapshot, renderer, fonts);
            } else {
                for child in self.sorted_by_z(&children) {
                    self.draw_widget(child, renderer, fonts);
                }
            }
        }

        self.draw_components(id, renderer, fonts);
    }

    fn draw_scrolled_children<B: GpuBackend>(
        &mut self,
        pane: Uuid,
        children: &[Uuid],
        snapshot: DrawSnapshot,
        renderer: &mut BatchRenderer<B>,
        fonts: &dyn FontSource,
    ) {
        let (axis, applied) = {
            let state = self.arena.get(pane).scroll().expect("pane is scrollable");
            (state.axis(), state.applied_offset())
        };

        self.push_scissor(snapshot.rect(), renderer);

        // apply, draw, un-apply: the snapshot each child captures already
        // includes the scroll offset, so hit-testing needs no special case.
        // Vertical offsets are negative and add; horizontal offsets are
        // positive and shift content left.
        for child in children {
            let c = self.arena.get_mut(*child);
            match axis {
                ScrollAxis::Vertical => c.offset.y += applied,
                ScrollAxis::Horizontal => c.offset.x -= applied,
            }
        }
        for child in self.sorted_by_z(children) {
            self.draw_widget(child, renderer, fonts);
        }
        for child in children {
            let c = self.arena.get_mut(*child);
            match axis {
                ScrollAxis::Vertical => c.offset.y -= applied,
                ScrollAxis::Horizontal => c.offset.x += applied,
            }
        }

        self.pop_scissor(renderer);
    }

    fn draw_components<B: GpuBackend>(
        &mut self,
        id: Uuid,
        renderer: &mut BatchRenderer<B>,
        fonts: &dyn FontSource,
    ) {
        let mut components: Vec<(String, Uuid)> = self
            .arena
            .get(id)
            .components
            .iter()
            .map(|(name, cid)| (name.clone(), *cid))
            .collect();
        components.sort_by(|a, b| {
            let za = self.arena.get(a.1).z;
            let zb = self.arena.get(b.1).z;
            za.cmp(&zb).then_with(|| a.0.cmp(&b.0))
        });
        for (_, cid) in components {
            self.draw_widget(cid, renderer, fonts);
        }
    }

    fn push_scissor<B: GpuBackend>(&mut self, rect: Rectangle, renderer: &mut BatchRenderer<B>) {
        let clipped = match self.scissor_stack.last() {
            Some(outer) => intersect(*outer, rect),
            None => rect,
        };
        self.scissor_stack.push(clipped);
        renderer.enable_scissor(clipped);
    }

    fn pop_scissor<B: GpuBackend>(&mut self, renderer: &mut BatchRenderer<B>) {
        self.scissor_stack.pop();
        match self.scissor_stack.last() {
            Some(outer) => renderer.enable_scissor(*outer),
            None => renderer.disable_scissor(),
        }
    }

    // ---- tooltip -------------------------------------------------------

    fn update_tooltip<B: GpuBackend>(
        &mut self,
        dt: f32,
        renderer: &mut BatchRenderer<B>,
        fonts: &dyn FontSource,
    ) {
        let moved = self.pointer != self.last_pointer;
        if moved {
            self.dwell = 0.0;
            self.tooltip = None;
        } else if let (Some(p), Some(hovered)) = (self.pointer, self.hovered) {
            self.dwell += dt;
            if self.tooltip.is_none() && self.dwell >= TOOLTIP_DWELL_SECS {
                self.arm_tooltip(hovered, p, fonts);
            }
        }

        let Some(tooltip) = self.tooltip else {
            return;
        };
        let Some(tip) = self
            .arena
            .try_get(tooltip.widget)
            .and_then(|w| w.tip.clone())
        else {
            self.tooltip = None;
            return;
        };
        self.draw_tooltip(&tip, tooltip.position, renderer, fonts);
    }

    fn arm_tooltip(&mut self, hovered: Uuid, pointer: Position, fonts: &dyn FontSource) {
        let Some(tip) = self.arena.get(hovered).tip.clone() else {
            return;
        };
        let Some(text_width) = fonts.measure(&self.tooltip_font, &tip) else {
            warn!("tooltip font '{}' unavailable", self.tooltip_font);
            return;
        };
        let width = text_width + TOOLTIP_PADDING * 2;
        // to the right of the pointer, flipped left on right-edge overflow
        let mut x = pointer.x + TOOLTIP_GAP;
        if x + width > self.canvas.width {
            x = pointer.x - TOOLTIP_GAP - width;
        }
        self.tooltip = Some(Tooltip {
            widget: hovered,
            position: Position::new(x, pointer.y),
        });
    }

    fn draw_tooltip<B: GpuBackend>(
        &mut self,
        tip: &str,
        position: Position,
        renderer: &mut BatchRenderer<B>,
        fonts: &dyn FontSource,
    ) {
        let Some(text_width) = fonts.measure(&self.tooltip_font, tip) else {
            return;
        };
        let line_height = fonts.line_height(&self.tooltip_font).unwrap_or(14);
        let size = Size::new(
            text_width + TOOLTIP_PADDING * 2,
            line_height + TOOLTIP_PADDING * 2,
        );
        renderer.queue(&QuadInstance {
            position,
            size,
            color: TOOLTIP_BACKGROUND,
            angle: 0.0,
            corner_radius: 4.0,
            border_thickness: 1.0,
            border_color: TOOLTIP_BORDER,
        });
        let origin = Position::new(position.x + TOOLTIP_PADDING, position.y + TOOLTIP_PADDING);
        if let Some(layout) = fonts.layout(&self.tooltip_font, tip, origin) {
            for glyph in &layout.glyphs {
                renderer.queue_glyph(glyph, layout.atlas, TOOLTIP_TEXT);
            }
        }
    }
}

fn intersect(a: Rectangle, b: Rectangle) -> Rectangle {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);
    Rectangle::new(x1, y1, (x2 - x1).max(0), (y2 - y1).max(0))
}
