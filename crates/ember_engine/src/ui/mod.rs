//! UI batching subsystem
//!
//! Architecture:
//! - `geometry`: pure quad construction (screen-space or NDC placement)
//! - `text`, `slider`: derived builders composing quads from font metrics and
//!   slider fractions
//! - `button`: interactive widget state and hit testing
//! - `renderer`: per-frame batch accumulation over ring-buffered GPU storage
//!   and grouped draw emission

pub mod button;
pub mod geometry;
pub mod renderer;
pub mod slider;
pub mod text;

pub use button::{Button, ButtonState};
pub use geometry::{
    build_quad, Anchor, Quad, QuadParams, QuadSpace, UiVertex, ViewportConfig, INDICES_PER_QUAD,
    QUAD_INDEX_PATTERN, VERTICES_PER_QUAD,
};
pub use renderer::{DrawGroup, UiRenderer};
pub use slider::{build_slider, SliderParams};
pub use text::{build_text, FontAtlas, FontMetrics, TextStyle};

use thiserror::Error;

use crate::gfx::GfxError;

/// Result type for UI operations
pub type UiResult<T> = Result<T, UiError>;

/// Errors raised by the UI subsystem
#[derive(Debug, Error)]
pub enum UiError {
    /// A submission would push the frame's cumulative quad count past the
    /// configured maximum
    #[error(
        "UI quad capacity exceeded: submitting {submitted} with {queued} already queued \
         (capacity {capacity}); check that draw() ran for the previous frame before \
         submitting more"
    )]
    CapacityExceeded {
        /// Quads in the rejected submission
        submitted: usize,
        /// Quads already queued this frame
        queued: usize,
        /// Configured per-frame maximum
        capacity: usize,
    },

    /// Text was built against a font atlas with no glyph data
    #[error("font atlas '{0}' has no glyph data loaded")]
    FontNotLoaded(String),

    /// GPU collaborator failure
    #[error(transparent)]
    Gfx(#[from] GfxError),
}
