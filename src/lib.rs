//! iridium_ui: a retained-mode UI engine.
//!
//! A scene owns a tree of anchored, pivoted widgets. Each frame the tree
//! is resolved to absolute virtual-pixel coordinates, painted into batched
//! quads, and hit-tested against pointer input front-to-back. The GPU and
//! font layers sit behind trait seams so everything above them runs
//! headless in tests.

pub mod app;
pub mod backend;
pub mod batch;
pub mod bus;
pub mod input;
pub mod layout;
pub mod scene;
pub mod scroll;
pub mod text;
pub mod utils;
pub mod widget;
pub mod widgets;

pub use app::{run_app, FrameContext, UiApp, WindowConfig};
pub use backend::{GpuBackend, RecordingBackend, ScissorRect, WgpuBackend};
pub use batch::{BatchRenderer, QuadInstance, UvRegion, Vertex, MAX_QUADS};
pub use bus::{EventBus, Notification};
pub use input::{FrameInputRecord, InputState, ReplayScript};
pub use layout::{Anchor, CanvasSize, Offset, Pivot};
pub use scene::{Registrar, Scene};
pub use scroll::{ScrollAxis, ScrollPane, ScrollState};
pub use text::{FixedAdvanceFont, FontLibrary, FontSource, GlyphQuad, TextLayout};
pub use utils::{Position, Rectangle, Rgba, Size};
pub use widget::{ContainerKind, CursorKind, DrawSnapshot, Widget, WidgetBehavior, WidgetKind};
pub use widgets::button::{Button, ButtonStyle};
pub use widgets::grid::{Grid, GridSpec};
pub use widgets::label::Label;
pub use widgets::panel::Panel;
pub use widgets::tabs::Tabs;
