//! Text quad builder
//!
//! Lays out one quad per character against a fixed-grid glyph atlas. Glyph
//! UVs come from the atlas metrics (pixels per character over atlas pixel
//! size); placement is screen-space and feeds [`build_quad`].

use crate::foundation::math::{Vec2, Vec3, Vec4};

use super::geometry::{build_quad, Quad, QuadParams, ViewportConfig};
use super::{UiError, UiResult};

/// Metrics of a fixed-grid glyph atlas
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Atlas texture width in pixels
    pub texture_width: f32,
    /// Atlas texture height in pixels
    pub texture_height: f32,
    /// Width of one glyph cell in pixels
    pub glyph_width: f32,
    /// Height of one glyph cell in pixels
    pub glyph_height: f32,
    /// First character in the atlas (cells run in code-point order)
    pub first_char: char,
    /// Number of glyph cells per atlas row
    pub glyphs_per_row: u32,
}

impl FontMetrics {
    /// Number of glyph cells the atlas holds
    pub fn glyph_count(&self) -> u32 {
        let rows = (self.texture_height / self.glyph_height) as u32;
        rows * self.glyphs_per_row
    }
}

/// A glyph atlas resource, possibly not yet loaded
///
/// Building text against an unloaded atlas is a precondition violation and
/// fails hard; blank glyphs are never rendered silently.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    name: String,
    metrics: Option<FontMetrics>,
}

impl FontAtlas {
    /// Atlas with loaded glyph metrics
    pub fn loaded(name: &str, metrics: FontMetrics) -> Self {
        Self {
            name: name.to_string(),
            metrics: Some(metrics),
        }
    }

    /// Atlas placeholder whose glyph data has not been loaded
    pub fn unloaded(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metrics: None,
        }
    }

    /// Resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether glyph data is available
    pub fn is_loaded(&self) -> bool {
        self.metrics.is_some()
    }
}

/// On-screen styling for a run of text
#[derive(Debug, Clone)]
pub struct TextStyle {
    /// Rendered size of one character in pixels
    pub char_size: Vec2,
    /// Text color
    pub color: Vec4,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            char_size: Vec2::new(16.0, 24.0),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

/// Build one quad per character of `text`
///
/// `origin` is the screen-space position of the left edge of the run, at the
/// vertical center of the character row; z is carried through for depth.
///
/// Characters outside the atlas range fall back to the atlas' first cell.
pub fn build_text(
    font: &FontAtlas,
    text: &str,
    origin: Vec3,
    style: &TextStyle,
    viewport: ViewportConfig,
) -> UiResult<Vec<Quad>> {
    let metrics = font
        .metrics
        .as_ref()
        .ok_or_else(|| UiError::FontNotLoaded(font.name.clone()))?;

    let uv_cell = Vec2::new(
        metrics.glyph_width / metrics.texture_width,
        metrics.glyph_height / metrics.texture_height,
    );

    let mut quads = Vec::with_capacity(text.chars().count());
    for (i, ch) in text.chars().enumerate() {
        let index = glyph_index(metrics, ch);
        let col = index % metrics.glyphs_per_row;
        let row = index / metrics.glyphs_per_row;

        let uv_min = Vec2::new(col as f32 * uv_cell.x, row as f32 * uv_cell.y);
        let uv_max = uv_min + uv_cell;

        let center = Vec3::new(
            origin.x + (i as f32 + 0.5) * style.char_size.x,
            origin.y,
            origin.z,
        );
        let params = QuadParams::screen(center, style.char_size)
            .with_uv(uv_min, uv_max)
            .with_color(style.color);
        quads.push(build_quad(&params, viewport));
    }
    Ok(quads)
}

/// Cell index of `ch`, clamped into the atlas range
fn glyph_index(metrics: &FontMetrics, ch: char) -> u32 {
    let first = metrics.first_char as u32;
    match (ch as u32).checked_sub(first) {
        Some(index) if index < metrics.glyph_count() => index,
        _ => 0,
    }
}
