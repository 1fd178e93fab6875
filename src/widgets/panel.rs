use crate::utils::Rgba;
use crate::widget::{ContainerKind, Widget};

pub const PANEL_BACKGROUND: Rgba = [0.12, 0.12, 0.15, 1.0];

/// Plain container: a background box whose children draw back-to-front.
pub struct Panel;

impl Panel {
    pub fn widget() -> Widget {
        Widget::container(ContainerKind::Panel).colored(PANEL_BACKGROUND)
    }
}
