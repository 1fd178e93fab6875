use log::warn;

use crate::text::FontSource;
use crate::utils::Rgba;
use crate::widget::Widget;

/// Leaf widget painting a single text run. Sized from the font metrics at
/// construction; an unknown font logs and yields a zero-sized widget.
pub struct Label;

impl Label {
    pub fn widget(fonts: &dyn FontSource, text: &str, font: &str, color: Rgba) -> Widget {
        let (width, height) = match (fonts.measure(font, text), fonts.line_height(font)) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                warn!("font '{font}' unavailable; label '{text}' will not render");
                (0, 0)
            }
        };
        Widget::leaf()
            .size_px(width, height)
            .with_text(text, font, color)
    }
}
