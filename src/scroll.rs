//! Scroll state and scroll panes.
//!
//! Both orientations share one contract: track how far content overflows
//! the viewport, clamp the offset into the valid range, and map it onto a
//! draggable handle. Wheel input animates toward a target; handle drags and
//! explicit sets apply immediately.

use uuid::Uuid;

use crate::layout::{Anchor, Pivot};
use crate::scene::Scene;
use crate::utils::Rgba;
use crate::widget::{ContainerKind, CursorKind, Widget};

/// Thickness of the track/handle strip, virtual px.
pub const SCROLLBAR_THICKNESS: i32 = 8;
/// Smallest handle still comfortably draggable.
pub const MIN_HANDLE_EXTENT: i32 = 16;
/// Extra space added past the farthest child edge.
pub const DEFAULT_CONTENT_PADDING: i32 = 4;
/// Wheel scroll distance per detent, virtual px.
pub const WHEEL_STEP: f32 = 48.0;

/// Per-second approach rate of the animated offset toward its target.
const APPROACH_RATE: f32 = 12.0;
/// Once within this distance of the target the offset snaps and stops.
const APPROACH_EPSILON: f32 = 0.5;

const TRACK_COLOR: Rgba = [0.15, 0.17, 0.22, 1.0];
const HANDLE_COLOR: Rgba = [0.45, 0.47, 0.52, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

/// Offset/extent bookkeeping for one scrollable container.
///
/// Vertical offsets live in `[-(content - viewport), 0]`, horizontal in
/// `[0, content - viewport]`. Clamping never errors; out-of-range requests
/// are pulled back into range.
#[derive(Debug, Clone)]
pub struct ScrollState {
    axis: ScrollAxis,
    offset: f32,
    target: f32,
    content_extent: i32,
    viewport_extent: i32,
    padding: i32,
    pub(crate) dragging: Option<i32>,
}

impl ScrollState {
    pub fn new(axis: ScrollAxis, padding: i32) -> Self {
        Self {
            axis,
            offset: 0.0,
            target: 0.0,
            content_extent: 0,
            viewport_extent: 0,
            padding,
            dragging: None,
        }
    }

    pub fn axis(&self) -> ScrollAxis {
        self.axis
    }

    pub fn padding(&self) -> i32 {
        self.padding
    }

    pub fn content_extent(&self) -> i32 {
        self.content_extent
    }

    pub fn viewport_extent(&self) -> i32 {
        self.viewport_extent
    }

    /// Scroll offset as applied to children, whole pixels.
    pub fn applied_offset(&self) -> i32 {
        self.offset as i32
    }

    pub fn target_offset(&self) -> f32 {
        self.target
    }

    fn scrollable(&self) -> i32 {
        (self.content_extent - self.viewport_extent).max(0)
    }

    fn clamp(&self, value: f32) -> f32 {
        let scrollable = self.scrollable() as f32;
        match self.axis {
            ScrollAxis::Vertical => value.clamp(-scrollable, 0.0),
            ScrollAxis::Horizontal => value.clamp(0.0, scrollable),
        }
    }

    /// Update extents from layout; re-clamps both offset and target so a
    /// shrinking content region can never leave the view out of range.
    pub fn set_extents(&mut self, viewport: i32, content: i32) {
        self.viewport_extent = viewport.max(0);
        self.content_extent = content.max(0);
        self.offset = self.clamp(self.offset);
        self.target = self.clamp(self.target);
    }

    /// Direct path: offset changes immediately, no interpolation.
    pub fn set_offset(&mut self, value: f32) {
        let clamped = self.clamp(value);
        self.offset = clamped;
        self.target = clamped;
    }

    /// Animated path: only the target moves; `animate` closes the gap.
    pub fn set_target(&mut self, value: f32) {
        self.target = self.clamp(value);
    }

    /// Wheel input, in virtual pixels along the axis.
    pub fn scroll_by(&mut self, delta: f32) {
        self.set_target(self.target + delta);
    }

    /// Advance the animated offset toward the target. Stops correcting once
    /// within an epsilon so the handle doesn't jitter forever.
    pub fn animate(&mut self, dt: f32) {
        let gap = self.target - self.offset;
        if gap.abs() <= APPROACH_EPSILON {
            self.offset = self.target;
            return;
        }
        let step = (APPROACH_RATE * dt).min(1.0);
        self.offset += gap * step;
    }

    pub fn handle_visible(&self) -> bool {
        self.content_extent > self.viewport_extent
    }

    /// Handle length along the axis: proportional to the visible fraction,
    /// floored at the minimum draggable size.
    pub fn handle_extent(&self) -> i32 {
        if !self.handle_visible() {
            return 0;
        }
        let proportional = (self.viewport_extent as f32
            * (self.viewport_extent as f32 / self.content_extent as f32))
            as i32;
        proportional.max(MIN_HANDLE_EXTENT).min(self.viewport_extent)
    }

    /// Fraction of the travel range consumed by the current offset.
    pub fn travel_ratio(&self) -> f32 {
        let scrollable = self.scrollable();
        if scrollable == 0 {
            return 0.0;
        }
        (self.offset.abs() / scrollable as f32).clamp(0.0, 1.0)
    }

    /// Handle position along the track, whole pixels from the track start.
    pub fn handle_position(&self) -> i32 {
        let travel = self.viewport_extent - self.handle_extent();
        (travel as f32 * self.travel_ratio()) as i32
    }

    /// Begin a handle drag; `pointer_along` is the pointer coordinate along
    /// the axis, relative to the viewport start.
    pub fn begin_drag(&mut self, pointer_along: i32) {
        self.dragging = Some(pointer_along - self.handle_position());
    }

    /// Continue a drag: maps the handle position back onto the offset and
    /// applies it through the direct path.
    pub fn drag_to(&mut self, pointer_along: i32) {
        let Some(grab) = self.dragging else {
            return;
        };
        let travel = self.viewport_extent - self.handle_extent();
        if travel <= 0 {
            return;
        }
        let ratio = ((pointer_along - grab) as f32 / travel as f32).clamp(0.0, 1.0);
        let magnitude = ratio * self.scrollable() as f32;
        let signed = match self.axis {
            ScrollAxis::Vertical => -magnitude,
            ScrollAxis::Horizontal => magnitude,
        };
        self.set_offset(signed);
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }
}

/// A scrollable container widget plus its track/handle bookkeeping
/// components. The track and handle are owned through the component map,
/// not the child list: they are drawn on top of the clipped content and
/// hit-tested ahead of it.
pub struct ScrollPane;

impl ScrollPane {
    pub const TRACK: &'static str = "track";
    pub const HANDLE: &'static str = "handle";

    pub fn create(scene: &mut Scene, axis: ScrollAxis, width: i32, height: i32) -> Uuid {
        let pane = Widget::container(ContainerKind::Scroll(ScrollState::new(
            axis,
            DEFAULT_CONTENT_PADDING,
        )))
        .size_px(width, height);
        let id = scene.register(pane);

        let (track, handle) = match axis {
            ScrollAxis::Vertical => (
                Widget::leaf()
                    .size_px(SCROLLBAR_THICKNESS, height)
                    .anchored(Anchor::TOP_RIGHT)
                    .pivoted(Pivot::new(1.0, 0.0))
                    .colored(TRACK_COLOR)
                    .rounded(SCROLLBAR_THICKNESS as f32 * 0.5),
                Widget::leaf()
                    .size_px(SCROLLBAR_THICKNESS, MIN_HANDLE_EXTENT)
                    .anchored(Anchor::TOP_RIGHT)
                    .pivoted(Pivot::new(1.0, 0.0))
                    .z_order(1)
                    .colored(HANDLE_COLOR)
                    .rounded(SCROLLBAR_THICKNESS as f32 * 0.5)
                    .with_cursor(CursorKind::Hand),
            ),
            ScrollAxis::Horizontal => (
                Widget::leaf()
                    .size_px(width, SCROLLBAR_THICKNESS)
                    .anchored(Anchor::BOTTOM_LEFT)
                    .pivoted(Pivot::new(0.0, 1.0))
                    .colored(TRACK_COLOR)
                    .rounded(SCROLLBAR_THICKNESS as f32 * 0.5),
                Widget::leaf()
                    .size_px(MIN_HANDLE_EXTENT, SCROLLBAR_THICKNESS)
                    .anchored(Anchor::BOTTOM_LEFT)
                    .pivoted(Pivot::new(0.0, 1.0))
                    .z_order(1)
                    .colored(HANDLE_COLOR)
                    .rounded(SCROLLBAR_THICKNESS as f32 * 0.5)
                    .with_cursor(CursorKind::Hand),
            ),
        };
        scene.add_component(id, Self::TRACK, track);
        scene.add_component(id, Self::HANDLE, handle);
        id
    }
}
