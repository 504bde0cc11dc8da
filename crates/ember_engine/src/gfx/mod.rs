//! GPU collaborator contracts and the headless backend
//!
//! The engine consumes GPU objects (device, buffers, pipelines, command
//! lists, resource views) as opaque collaborators. This module defines those
//! contracts and ships one complete implementation, the headless backend,
//! which records command streams in process.

pub mod device;
pub mod headless;
pub mod types;

pub use device::{
    CommandList, EngineContext, GfxError, GfxResult, GpuBuffer, MappedBuffer, RenderDevice,
    ResourceView,
};
pub use types::{
    AddressMode, BindingKind, BlendMode, BufferDesc, BufferUsage, FilterMode, HeapKind,
    PipelineDesc, PipelineId, ResourceBinding, ResourceLayoutDesc, ResourceLayoutId, SamplerDesc,
    SamplerId, ShaderVisibility,
};
