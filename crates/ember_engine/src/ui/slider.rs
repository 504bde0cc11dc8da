//! Slider quad builder
//!
//! Composes a slider from two quads: the full-width track and a fill whose
//! width and UV extent come from the slider's value fraction.

use crate::foundation::math::{Vec2, Vec3, Vec4};

use super::geometry::{build_quad, Quad, QuadParams, ViewportConfig};

/// Placement and style of a slider
#[derive(Debug, Clone)]
pub struct SliderParams {
    /// Center of the track in screen-space pixels; z carried for depth
    pub center: Vec3,
    /// Track width and height in pixels
    pub size: Vec2,
    /// Fill fraction, clamped to [0, 1]
    pub value: f32,
    /// Track color
    pub track_color: Vec4,
    /// Fill color
    pub fill_color: Vec4,
}

impl Default for SliderParams {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            size: Vec2::new(200.0, 16.0),
            value: 0.0,
            track_color: Vec4::new(0.2, 0.2, 0.2, 0.9),
            fill_color: Vec4::new(0.8, 0.6, 0.1, 1.0),
        }
    }
}

/// Build the track and fill quads for a slider
///
/// Returns the track first so the fill draws on top under painter's-algorithm
/// ordering. A zero-value slider still returns both quads; the fill is
/// zero-width.
pub fn build_slider(params: &SliderParams, viewport: ViewportConfig) -> Vec<Quad> {
    let value = params.value.clamp(0.0, 1.0);

    let track = build_quad(
        &QuadParams::screen(params.center, params.size).with_color(params.track_color),
        viewport,
    );

    let fill_width = params.size.x * value;
    let fill_center = Vec3::new(
        params.center.x - params.size.x * 0.5 + fill_width * 0.5,
        params.center.y,
        params.center.z,
    );
    let fill = build_quad(
        &QuadParams::screen(fill_center, Vec2::new(fill_width, params.size.y))
            .with_color(params.fill_color)
            .with_uv(Vec2::new(0.0, 0.0), Vec2::new(value, 1.0)),
        viewport,
    );

    vec![track, fill]
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: ViewportConfig = ViewportConfig {
        width: 1000.0,
        height: 500.0,
    };

    #[test]
    fn test_track_then_fill() {
        let quads = build_slider(&SliderParams::default(), VIEWPORT);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0][0].color, [0.2, 0.2, 0.2, 0.9]);
        assert_eq!(quads[1][0].color, [0.8, 0.6, 0.1, 1.0]);
    }

    #[test]
    fn test_fill_width_follows_value() {
        let params = SliderParams {
            center: Vec3::new(500.0, 250.0, 0.0),
            size: Vec2::new(200.0, 20.0),
            value: 0.25,
            ..Default::default()
        };
        let quads = build_slider(&params, VIEWPORT);
        let fill = &quads[1];

        // Fill spans [left edge, left edge + 25% of track width] in pixels.
        let left = fill[0].position[0] * VIEWPORT.width;
        let right = fill[2].position[0] * VIEWPORT.width;
        assert!((left - 400.0).abs() < 1e-3);
        assert!((right - 450.0).abs() < 1e-3);

        // UV extent matches the fraction so the fill texture is cropped, not
        // squashed.
        assert_eq!(fill[2].uv[0], 0.25);
    }

    #[test]
    fn test_value_is_clamped() {
        let over = SliderParams {
            value: 1.7,
            ..Default::default()
        };
        let quads = build_slider(&over, VIEWPORT);
        // Fill equals the full track extent when clamped to 1.
        assert_eq!(quads[1][0].position[0], quads[0][0].position[0]);
        assert_eq!(quads[1][2].position[0], quads[0][2].position[0]);

        let under = SliderParams {
            value: -0.3,
            ..Default::default()
        };
        let quads = build_slider(&under, VIEWPORT);
        // Zero-width fill collapses to the track's left edge.
        assert_eq!(quads[1][0].position[0], quads[1][2].position[0]);
    }
}
