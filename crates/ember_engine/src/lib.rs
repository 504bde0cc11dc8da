//! # Ember Engine
//!
//! Rendering-adjacent subsystems for a real-time engine: a batched UI
//! renderer over ring-buffered per-frame GPU storage, post-processing effect
//! collaborators, and the GPU contracts both are written against.
//!
//! The GPU itself is an opaque collaborator: everything talks to the traits
//! in [`gfx`], and the crate ships a headless backend that records command
//! streams for tests and tools.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use ember_engine::gfx::headless::{HeadlessCommandList, HeadlessEngine};
//! use ember_engine::ui::{build_quad, QuadParams, UiRenderer, ViewportConfig};
//! use ember_engine::foundation::math::{Vec2, Vec3};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = HeadlessEngine::new(2);
//! let mut ui = UiRenderer::with_default_capacity(&engine, "hud")?;
//! let atlas = engine.headless_device().create_texture_view("hud_atlas");
//!
//! let viewport = ViewportConfig::new(1280.0, 720.0);
//! let quad = build_quad(
//!     &QuadParams::screen(Vec3::new(640.0, 360.0, 0.0), Vec2::new(128.0, 64.0)),
//!     viewport,
//! );
//!
//! ui.begin_frame(0)?;
//! ui.submit(&[quad], atlas)?;
//!
//! let mut cmd = HeadlessCommandList::new();
//! ui.draw(&mut cmd);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod foundation;
pub mod gfx;
pub mod render;
pub mod ui;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{Config, RenderSettings};
    pub use crate::foundation::math::{Vec2, Vec3, Vec4};
    pub use crate::gfx::{CommandList, EngineContext, GpuBuffer, RenderDevice, ResourceView};
    pub use crate::render::{Effect, PostEffect};
    pub use crate::ui::{
        build_quad, build_slider, build_text, Anchor, Button, Quad, QuadParams, QuadSpace,
        UiError, UiRenderer, UiResult, UiVertex, ViewportConfig,
    };
}
