//! UI quad geometry
//!
//! Pure CPU-side construction of the four-vertex quads every UI element is
//! made of. Placement is either in screen-space pixels or directly in
//! normalized device coordinates; screen space is a convenience transform
//! feeding the NDC path. No GPU dependency.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Vec2, Vec3, Vec4};

/// Index pattern for one quad: two triangles over vertices 0..4
///
/// Paired with the fixed per-corner UV assignment of [`build_quad`], this
/// produces a correctly wound, non-degenerate pair of triangles.
pub const QUAD_INDEX_PATTERN: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Number of vertices per quad
pub const VERTICES_PER_QUAD: usize = 4;

/// Number of indices per quad
pub const INDICES_PER_QUAD: usize = QUAD_INDEX_PATTERN.len();

/// One UI vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct UiVertex {
    /// Position in NDC; z is used for depth/sorting only
    pub position: [f32; 3],
    /// Face normal, informational for UI
    pub normal: [f32; 3],
    /// RGBA color
    pub color: [f32; 4],
    /// Texture coordinate
    pub uv: [f32; 2],
}

impl UiVertex {
    /// Zero-area vertex used to erase previously written quads
    ///
    /// All-zero position and normal, opaque white color.
    pub fn degenerate() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0; 3],
            color: [1.0, 1.0, 1.0, 1.0],
            uv: [0.0; 2],
        }
    }
}

/// Four vertices forming one quad
pub type Quad = [UiVertex; VERTICES_PER_QUAD];

/// Coordinate space a quad placement is given in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadSpace {
    /// Center and size in pixels; normalized by the viewport dimensions
    Screen,
    /// Center and size already in the [-1, 1] y-up NDC range
    Ndc,
}

/// Current viewport dimensions, passed explicitly to every resize-sensitive
/// conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ViewportConfig {
    /// Create a viewport description
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Screen position a UI element is placed relative to
///
/// Screen space spans `[-width, width]` by `[-height, height]`, y-up, so the
/// anchors sit on the NDC square's corners, edge midpoints and center.
/// [`resolve`](Self::resolve) turns an anchor plus a pixel offset into an
/// absolute screen-space position for [`QuadParams::screen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Top-left corner
    TopLeft,
    /// Middle of the top edge
    TopCenter,
    /// Top-right corner
    TopRight,
    /// Middle of the left edge
    CenterLeft,
    /// Screen center
    Center,
    /// Middle of the right edge
    CenterRight,
    /// Bottom-left corner
    BottomLeft,
    /// Middle of the bottom edge
    BottomCenter,
    /// Bottom-right corner
    BottomRight,
}

impl Anchor {
    /// Absolute screen-space position of this anchor plus `offset`
    pub fn resolve(self, offset: Vec2, viewport: ViewportConfig) -> Vec2 {
        let x = match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => -viewport.width,
            Self::TopCenter | Self::Center | Self::BottomCenter => 0.0,
            Self::TopRight | Self::CenterRight | Self::BottomRight => viewport.width,
        };
        let y = match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => viewport.height,
            Self::CenterLeft | Self::Center | Self::CenterRight => 0.0,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => -viewport.height,
        };
        Vec2::new(x + offset.x, y + offset.y)
    }
}

/// Placement and style of one quad
#[derive(Debug, Clone)]
pub struct QuadParams {
    /// Coordinate space of `center` and `size`
    pub space: QuadSpace,
    /// Quad center; z carried through unchanged for depth
    pub center: Vec3,
    /// Width and height
    pub size: Vec2,
    /// UV of the left/bottom texture edge
    pub uv_min: Vec2,
    /// UV of the right/top texture edge
    pub uv_max: Vec2,
    /// RGBA color applied to all four vertices
    pub color: Vec4,
    /// In-plane rotation in radians
    pub rotation: f32,
}

impl Default for QuadParams {
    fn default() -> Self {
        Self {
            space: QuadSpace::Ndc,
            center: Vec3::zeros(),
            size: Vec2::new(1.0, 1.0),
            uv_min: Vec2::new(0.0, 0.0),
            uv_max: Vec2::new(1.0, 1.0),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl QuadParams {
    /// Quad placed in screen-space pixels
    pub fn screen(center: Vec3, size: Vec2) -> Self {
        Self {
            space: QuadSpace::Screen,
            center,
            size,
            ..Default::default()
        }
    }

    /// Quad placed directly in NDC
    pub fn ndc(center: Vec3, size: Vec2) -> Self {
        Self {
            space: QuadSpace::Ndc,
            center,
            size,
            ..Default::default()
        }
    }

    /// Set the vertex color
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Set the UV rectangle
    pub fn with_uv(mut self, uv_min: Vec2, uv_max: Vec2) -> Self {
        self.uv_min = uv_min;
        self.uv_max = uv_max;
        self
    }

    /// Set the in-plane rotation in radians
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Build the four vertices of one quad
///
/// Screen-space placements are normalized by the viewport dimensions and then
/// follow the NDC path. Corners are the rotated half-extent offsets around
/// the center; z is unchanged across all four. The per-corner UV assignment
/// is fixed and pairs with [`QUAD_INDEX_PATTERN`].
pub fn build_quad(params: &QuadParams, viewport: ViewportConfig) -> Quad {
    let (center, size) = match params.space {
        QuadSpace::Screen => (
            Vec3::new(
                params.center.x / viewport.width,
                params.center.y / viewport.height,
                params.center.z,
            ),
            Vec2::new(params.size.x / viewport.width, params.size.y / viewport.height),
        ),
        QuadSpace::Ndc => (params.center, params.size),
    };

    let w2 = size.x * 0.5;
    let h2 = size.y * 0.5;
    let (sin, cos) = params.rotation.sin_cos();

    let corners = [
        Vec3::new(center.x - w2 * cos - h2 * sin, center.y + w2 * sin - h2 * cos, center.z),
        Vec3::new(center.x - w2 * cos + h2 * sin, center.y + w2 * sin + h2 * cos, center.z),
        Vec3::new(center.x + w2 * cos + h2 * sin, center.y - w2 * sin + h2 * cos, center.z),
        Vec3::new(center.x + w2 * cos - h2 * sin, center.y - w2 * sin - h2 * cos, center.z),
    ];

    let cross = (corners[3] - corners[0]).cross(&(corners[1] - corners[0]));
    let normal = if cross.norm() > 0.0 {
        cross.normalize()
    } else {
        // Zero-size quads have no face; keep the conventional UI-facing normal.
        Vec3::new(0.0, 0.0, 1.0)
    };

    let uvs = [
        [params.uv_min.x, params.uv_max.y],
        [params.uv_min.x, params.uv_min.y],
        [params.uv_max.x, params.uv_min.y],
        [params.uv_max.x, params.uv_max.y],
    ];

    let mut quad = [UiVertex::degenerate(); VERTICES_PER_QUAD];
    for (i, vertex) in quad.iter_mut().enumerate() {
        *vertex = UiVertex {
            position: [corners[i].x, corners[i].y, corners[i].z],
            normal: [normal.x, normal.y, normal.z],
            color: [params.color.x, params.color.y, params.color.z, params.color.w],
            uv: uvs[i],
        };
    }
    quad
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};

    const VIEWPORT: ViewportConfig = ViewportConfig {
        width: 1280.0,
        height: 720.0,
    };

    /// Shoelace area over the quad's corners in submission order
    fn quad_area(quad: &Quad) -> f32 {
        let mut area = 0.0;
        for i in 0..4 {
            let a = quad[i].position;
            let b = quad[(i + 1) % 4].position;
            area += a[0] * b[1] - b[0] * a[1];
        }
        (area * 0.5).abs()
    }

    #[test]
    fn test_unrotated_quad_is_axis_aligned() {
        let params = QuadParams::ndc(Vec3::new(0.25, -0.5, 0.1), Vec2::new(0.5, 0.25));
        let quad = build_quad(&params, VIEWPORT);

        assert_eq!(quad[0].position, [0.0, -0.625, 0.1]);
        assert_eq!(quad[1].position, [0.0, -0.375, 0.1]);
        assert_eq!(quad[2].position, [0.5, -0.375, 0.1]);
        assert_eq!(quad[3].position, [0.5, -0.625, 0.1]);
    }

    #[test]
    fn test_uv_corner_assignment() {
        let params = QuadParams::ndc(Vec3::zeros(), Vec2::new(1.0, 1.0))
            .with_uv(Vec2::new(0.25, 0.5), Vec2::new(0.75, 1.0));
        let quad = build_quad(&params, VIEWPORT);

        assert_eq!(quad[0].uv, [0.25, 1.0]);
        assert_eq!(quad[1].uv, [0.25, 0.5]);
        assert_eq!(quad[2].uv, [0.75, 0.5]);
        assert_eq!(quad[3].uv, [0.75, 1.0]);
    }

    #[test]
    fn test_face_normal_points_out_of_screen() {
        let quad = build_quad(
            &QuadParams::ndc(Vec3::zeros(), Vec2::new(0.4, 0.4)),
            VIEWPORT,
        );
        for vertex in &quad {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_rotation_preserves_area() {
        let size = Vec2::new(0.6, 0.3);
        for step in 0..16 {
            let rotation = step as f32 * std::f32::consts::TAU / 16.0;
            let params = QuadParams::ndc(Vec3::new(0.1, 0.2, 0.0), size).with_rotation(rotation);
            let quad = build_quad(&params, VIEWPORT);
            assert_relative_eq!(quad_area(&quad), size.x * size.y, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_z_constant_across_rotated_corners() {
        let params = QuadParams::ndc(Vec3::new(0.0, 0.0, 0.75), Vec2::new(0.5, 0.5))
            .with_rotation(1.1);
        let quad = build_quad(&params, VIEWPORT);
        for vertex in &quad {
            assert_eq!(vertex.position[2], 0.75);
        }
    }

    #[test]
    fn test_screen_space_matches_prenormalized_ndc() {
        let center = Vec3::new(320.0, 180.0, 0.0);
        let size = Vec2::new(64.0, 32.0);

        let screen = build_quad(
            &QuadParams::screen(center, size).with_rotation(0.35),
            VIEWPORT,
        );
        let ndc = build_quad(
            &QuadParams::ndc(
                Vec3::new(center.x / VIEWPORT.width, center.y / VIEWPORT.height, center.z),
                Vec2::new(size.x / VIEWPORT.width, size.y / VIEWPORT.height),
            )
            .with_rotation(0.35),
            VIEWPORT,
        );

        for (a, b) in screen.iter().zip(ndc.iter()) {
            for axis in 0..3 {
                assert!(relative_eq!(
                    a.position[axis],
                    b.position[axis],
                    epsilon = 1e-6
                ));
            }
        }
    }

    #[test]
    fn test_anchor_resolves_against_viewport_extents() {
        assert_eq!(
            Anchor::Center.resolve(Vec2::new(10.0, -20.0), VIEWPORT),
            Vec2::new(10.0, -20.0)
        );
        assert_eq!(
            Anchor::TopRight.resolve(Vec2::new(-60.0, -40.0), VIEWPORT),
            Vec2::new(1220.0, 680.0)
        );
        assert_eq!(
            Anchor::BottomLeft.resolve(Vec2::zeros(), VIEWPORT),
            Vec2::new(-1280.0, -720.0)
        );
    }

    #[test]
    fn test_anchored_quad_lands_on_ndc_edge() {
        let center = Anchor::TopCenter.resolve(Vec2::new(0.0, 0.0), VIEWPORT);
        let quad = build_quad(
            &QuadParams::screen(
                Vec3::new(center.x, center.y, 0.0),
                Vec2::new(100.0, 50.0),
            ),
            VIEWPORT,
        );
        // Quad center sits on the top NDC edge.
        let mid_y = (quad[0].position[1] + quad[1].position[1]) * 0.5;
        assert!((mid_y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_vertex_is_white_at_origin() {
        let vertex = UiVertex::degenerate();
        assert_eq!(vertex.position, [0.0; 3]);
        assert_eq!(vertex.color, [1.0, 1.0, 1.0, 1.0]);
    }
}
