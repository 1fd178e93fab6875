//! Anchor/pivot position resolution.
//!
//! Every widget's absolute position is a pure function of its own
//! anchor/pivot/offset plus its parent chain. Nothing here caches: callers
//! re-resolve every query so reparenting or resizing between frames can
//! never leave stale coordinates behind.

use crate::utils::{Position, Size};

/// Fractional reference point inside the parent's bounds. (0, 0) is the
/// parent's top-left corner, (1, 1) the bottom-right. Values outside the
/// unit range are valid and place the anchor point outside the parent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor { x: 0.0, y: 0.0 };
    pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };
    pub const TOP_RIGHT: Anchor = Anchor { x: 1.0, y: 0.0 };
    pub const BOTTOM_LEFT: Anchor = Anchor { x: 0.0, y: 1.0 };
    pub const BOTTOM_RIGHT: Anchor = Anchor { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which point of the widget's own box lands on the anchor point. Stored
/// negated so resolution is a plain multiply-add: `Pivot::new(0.5, 0.5)`
/// centers the widget, `Pivot::new(0.0, 0.0)` aligns its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pivot {
    nx: f32,
    ny: f32,
}

impl Pivot {
    pub const TOP_LEFT: Pivot = Pivot { nx: 0.0, ny: 0.0 };
    pub const CENTER: Pivot = Pivot { nx: -0.5, ny: -0.5 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { nx: -x, ny: -y }
    }

    /// The negated factors applied against the widget's own size.
    pub fn factors(&self) -> (f32, f32) {
        (self.nx, self.ny)
    }
}

/// Whole-pixel displacement applied after anchor/pivot resolution, in the
/// parent's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The virtual canvas the root widgets anchor against. Owned by the scene;
/// the single writer is the resize path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: i32,
    pub height: i32,
}

impl CanvasSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Resolved position and size of a parent, fed into a child's resolution.
#[derive(Debug, Clone, Copy)]
pub struct ParentFrame {
    pub position: Position,
    pub size: Size,
}

/// Resolve the absolute top-left corner of a box.
///
/// Truncation to whole pixels happens at each multiplication step, not once
/// at the end. Downstream hit-testing depends on pixel-identical bounds, so
/// the intermediate rounding is part of the contract.
pub fn resolve(
    anchor: Anchor,
    pivot: Pivot,
    offset: Offset,
    own_size: Size,
    parent: Option<ParentFrame>,
    canvas: CanvasSize,
) -> Position {
    let base = match parent {
        None => Position {
            x: (canvas.width as f32 * anchor.x) as i32,
            y: (canvas.height as f32 * anchor.y) as i32,
        },
        Some(p) => Position {
            x: p.position.x + (p.size.width as f32 * anchor.x) as i32,
            y: p.position.y + (p.size.height as f32 * anchor.y) as i32,
        },
    };
    let (px, py) = pivot.factors();
    Position {
        x: base.x + (own_size.width as f32 * px) as i32 + offset.x,
        y: base.y + (own_size.height as f32 * py) as i32 + offset.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasSize = CanvasSize {
        width: 800,
        height: 600,
    };

    #[test]
    fn rootless_anchor_scales_canvas() {
        let pos = resolve(
            Anchor::new(0.5, 0.5),
            Pivot::TOP_LEFT,
            Offset::default(),
            Size::new(100, 40),
            None,
            CANVAS,
        );
        assert_eq!(pos, Position::new(400, 300));
    }

    #[test]
    fn pivot_centers_on_anchor_point() {
        let pos = resolve(
            Anchor::CENTER,
            Pivot::new(0.5, 0.5),
            Offset::default(),
            Size::new(100, 40),
            None,
            CANVAS,
        );
        assert_eq!(pos, Position::new(350, 280));
    }

    #[test]
    fn child_resolves_against_parent_frame() {
        let parent = ParentFrame {
            position: Position::new(20, 30),
            size: Size::new(200, 100),
        };
        let pos = resolve(
            Anchor::new(1.0, 0.0),
            Pivot::new(1.0, 0.0),
            Offset::new(-5, 5),
            Size::new(50, 20),
            Some(parent),
            CANVAS,
        );
        // anchor puts base at parent right edge, pivot pulls back own width
        assert_eq!(pos, Position::new(20 + 200 - 50 - 5, 30 + 5));
    }

    #[test]
    fn truncates_each_multiplication_step() {
        // 0.4 * 48 = 19.2 -> 19 and -(0.7 * 14) = -9.8 -> -9, so per-step
        // truncation lands on 10. Truncating once at the end would give
        // trunc(19.2 - 9.8) = 9. The per-step behavior is the contract.
        let parent = ParentFrame {
            position: Position::new(0, 0),
            size: Size::new(48, 48),
        };
        let pos = resolve(
            Anchor::new(0.4, 0.4),
            Pivot::new(0.7, 0.7),
            Offset::default(),
            Size::new(14, 14),
            Some(parent),
            CANVAS,
        );
        assert_eq!(pos, Position::new(10, 10));
    }

    #[test]
    fn resolve_is_idempotent() {
        let parent = ParentFrame {
            position: Position::new(7, 11),
            size: Size::new(123, 77),
        };
        let args = (
            Anchor::new(0.37, 0.91),
            Pivot::new(0.25, 0.75),
            Offset::new(3, -9),
            Size::new(41, 17),
        );
        let first = resolve(args.0, args.1, args.2, args.3, Some(parent), CANVAS);
        for _ in 0..10 {
            assert_eq!(
                resolve(args.0, args.1, args.2, args.3, Some(parent), CANVAS),
                first
            );
        }
    }

    #[test]
    fn anchor_outside_unit_range_is_meaningful() {
        let parent = ParentFrame {
            position: Position::new(0, 0),
            size: Size::new(100, 100),
        };
        let pos = resolve(
            Anchor::new(-0.5, 1.5),
            Pivot::TOP_LEFT,
            Offset::default(),
            Size::new(10, 10),
            Some(parent),
            CANVAS,
        );
        assert_eq!(pos, Position::new(-50, 150));
    }
}
