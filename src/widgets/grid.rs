//! Fixed-column grid containers. Cells are placed by index; a placement
//! that doesn't fit the column budget is a programming error and fails
//! immediately rather than being clamped.

use uuid::Uuid;

use crate::scene::Scene;
use crate::widget::{ContainerKind, Widget, WidgetKind};

#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    pub cols: usize,
    pub col_width: i32,
    pub row_height: i32,
    pub col_gap: i32,
    pub row_gap: i32,
}

pub struct Grid;

impl Grid {
    pub fn create(scene: &mut Scene, spec: GridSpec) -> Uuid {
        assert!(spec.cols > 0, "grid needs at least one column");
        scene.register(Widget::container(ContainerKind::Grid(spec)))
    }

    fn spec(scene: &Scene, grid: Uuid) -> GridSpec {
        match &scene.widget(grid).kind {
            WidgetKind::Container {
                layout: ContainerKind::Grid(spec),
                ..
            } => *spec,
            _ => panic!("widget {grid} is not a grid"),
        }
    }

    /// Place a widget into the cell at (`col`, `row`), spanning `col_span`
    /// columns. The widget is resized to the spanned cell width.
    ///
    /// Panics when the column index is out of range or the span exceeds
    /// the remaining column budget.
    pub fn place(
        scene: &mut Scene,
        grid: Uuid,
        widget: Widget,
        col: usize,
        row: usize,
        col_span: usize,
    ) -> Uuid {
        let spec = Self::spec(scene, grid);
        assert!(
            col < spec.cols,
            "column {col} is out of range for a {}-column grid",
            spec.cols
        );
        assert!(col_span >= 1, "a cell must span at least one column");
        assert!(
            col + col_span <= spec.cols,
            "a span of {col_span} columns starting at {col} exceeds the {}-column budget",
            spec.cols
        );

        let width = spec.col_width * col_span as i32 + spec.col_gap * (col_span as i32 - 1);
        let x = col as i32 * (spec.col_width + spec.col_gap);
        let y = row as i32 * (spec.row_height + spec.row_gap);
        let widget = widget.size_px(width, spec.row_height).offset_px(x, y);
        scene.add_child(grid, widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CanvasSize;

    fn spec() -> GridSpec {
        GridSpec {
            cols: 4,
            col_width: 50,
            row_height: 20,
            col_gap: 4,
            row_gap: 4,
        }
    }

    #[test]
    fn cells_place_by_index() {
        let mut scene = Scene::new(CanvasSize::new(800, 600));
        let grid = Grid::create(&mut scene, spec());
        let cell = Grid::place(&mut scene, grid, Widget::leaf(), 2, 1, 1);
        let w = scene.widget(cell);
        assert_eq!(w.offset.x, 2 * 54);
        assert_eq!(w.offset.y, 24);
        assert_eq!(w.width, 50);
    }

    #[test]
    fn spans_widen_across_gaps() {
        let mut scene = Scene::new(CanvasSize::new(800, 600));
        let grid = Grid::create(&mut scene, spec());
        let cell = Grid::place(&mut scene, grid, Widget::leaf(), 1, 0, 3);
        assert_eq!(scene.widget(cell).width, 50 * 3 + 4 * 2);
    }

    #[test]
    #[should_panic(expected = "exceeds the 4-column budget")]
    fn over_budget_span_panics() {
        let mut scene = Scene::new(CanvasSize::new(800, 600));
        let grid = Grid::create(&mut scene, spec());
        Grid::place(&mut scene, grid, Widget::leaf(), 2, 0, 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_column_panics() {
        let mut scene = Scene::new(CanvasSize::new(800, 600));
        let grid = Grid::create(&mut scene, spec());
        Grid::place(&mut scene, grid, Widget::leaf(), 4, 0, 1);
    }
}
