//! Font metrics boundary.
//!
//! Atlas baking lives outside this crate: a provider is handed an already
//! baked atlas texture id plus per-character UV regions, and only resolves
//! metrics and glyph geometry. Widgets reference fonts by name; a missing
//! font is recoverable (callers log and render nothing).

use std::collections::HashMap;

use rusttype::{Font, Scale};
use uuid::Uuid;

use crate::utils::Position;

/// Screen-space geometry plus atlas window for one glyph.
#[derive(Debug, Clone, Copy)]
pub struct GlyphQuad {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// A laid-out text run, ready for the renderer's glyph path.
#[derive(Debug, Clone)]
pub struct TextLayout {
    pub atlas: Uuid,
    pub glyphs: Vec<GlyphQuad>,
}

#[derive(Debug)]
pub enum FontError {
    InvalidFontData,
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::InvalidFontData => write!(f, "font data could not be parsed"),
        }
    }
}

impl std::error::Error for FontError {}

/// Per-character atlas placement supplied by the external baker.
#[derive(Debug, Clone, Copy)]
pub struct GlyphRegion {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub size: (f32, f32),
    pub bearing: (f32, f32),
}

/// What the engine needs from a font provider.
pub trait FontSource {
    /// Rendered pixel width of `text`, or `None` for an unknown font.
    fn measure(&self, font: &str, text: &str) -> Option<i32>;
    fn line_height(&self, font: &str) -> Option<i32>;
    /// Glyph geometry for `text` starting at `origin` (top-left).
    fn layout(&self, font: &str, text: &str, origin: Position) -> Option<TextLayout>;
}

struct BakedFont {
    font: Font<'static>,
    scale: Scale,
    ascent: f32,
    atlas: Uuid,
    regions: HashMap<char, GlyphRegion>,
}

/// Named fonts with rusttype-backed metrics over externally baked atlases.
#[derive(Default)]
pub struct FontLibrary {
    fonts: HashMap<String, BakedFont>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_font(
        &mut self,
        name: impl Into<String>,
        data: Vec<u8>,
        size_px: f32,
        atlas: Uuid,
        regions: HashMap<char, GlyphRegion>,
    ) -> Result<(), FontError> {
        let font = Font::try_from_vec(data).ok_or(FontError::InvalidFontData)?;
        let scale = Scale::uniform(size_px);
        let ascent = font.v_metrics(scale).ascent;
        self.fonts.insert(
            name.into(),
            BakedFont {
                font,
                scale,
                ascent,
                atlas,
                regions,
            },
        );
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }
}

impl FontSource for FontLibrary {
    fn measure(&self, font: &str, text: &str) -> Option<i32> {
        let baked = self.fonts.get(font)?;
        let width: f32 = text
            .chars()
            .map(|ch| {
                baked
                    .font
                    .glyph(ch)
                    .scaled(baked.scale)
                    .h_metrics()
                    .advance_width
            })
            .sum();
        Some(width as i32)
    }

    fn line_height(&self, font: &str) -> Option<i32> {
        let baked = self.fonts.get(font)?;
        let vm = baked.font.v_metrics(baked.scale);
        Some((vm.ascent - vm.descent + vm.line_gap) as i32)
    }

    fn layout(&self, font: &str, text: &str, origin: Position) -> Option<TextLayout> {
        let baked = self.fonts.get(font)?;
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen_x = origin.x as f32;
        let baseline = origin.y as f32 + baked.ascent;
        for ch in text.chars() {
            let advance = baked
                .font
                .glyph(ch)
                .scaled(baked.scale)
                .h_metrics()
                .advance_width;
            // characters missing from the baked atlas advance but paint nothing
            if let Some(region) = baked.regions.get(&ch) {
                glyphs.push(GlyphQuad {
                    x: pen_x + region.bearing.0,
                    y: baseline - region.bearing.1,
                    width: region.size.0,
                    height: region.size.1,
                    uv_min: region.uv_min,
                    uv_max: region.uv_max,
                });
            }
            pen_x += advance;
        }
        Some(TextLayout {
            atlas: baked.atlas,
            glyphs,
        })
    }
}

/// Fixed-advance provider. Useful as a debug font and as the metrics stub
/// in headless tests, where no font binary is available.
#[derive(Debug, Clone)]
pub struct FixedAdvanceFont {
    pub advance: i32,
    pub line_height: i32,
    pub atlas: Uuid,
}

impl FixedAdvanceFont {
    pub fn new(advance: i32, line_height: i32) -> Self {
        Self {
            advance,
            line_height,
            atlas: Uuid::new_v4(),
        }
    }
}

impl FontSource for FixedAdvanceFont {
    fn measure(&self, _font: &str, text: &str) -> Option<i32> {
        Some(self.advance * text.chars().count() as i32)
    }

    fn line_height(&self, _font: &str) -> Option<i32> {
        Some(self.line_height)
    }

    fn layout(&self, _font: &str, text: &str, origin: Position) -> Option<TextLayout> {
        let glyphs = text
            .chars()
            .enumerate()
            .map(|(i, _)| GlyphQuad {
                x: (origin.x + self.advance * i as i32) as f32,
                y: origin.y as f32,
                width: self.advance as f32,
                height: self.line_height as f32,
                uv_min: [0.0, 0.0],
                uv_max: [1.0, 1.0],
            })
            .collect();
        Some(TextLayout {
            atlas: self.atlas,
            glyphs,
        })
    }
}
