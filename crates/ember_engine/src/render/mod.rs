//! Rendering-adjacent subsystems
//!
//! Currently the post-processing effect collaborators; the UI batching
//! pipeline lives in [`crate::ui`].

pub mod effects;

pub use effects::{Effect, PostEffect};
