//! GPU collaborator traits
//!
//! The contracts the engine consumes from a rendering backend: a device that
//! creates resources, buffers with scoped CPU write access, resource views
//! that bind texture descriptors, and a command list that records draws.
//! Backends implement these; the engine never reaches below them.

use std::sync::Arc;

use thiserror::Error;

use super::types::{
    BufferDesc, HeapKind, PipelineDesc, PipelineId, ResourceLayoutDesc, ResourceLayoutId,
    SamplerDesc, SamplerId,
};

/// Result type for GPU resource operations
pub type GfxResult<T> = Result<T, GfxError>;

/// Errors raised by GPU collaborator implementations
#[derive(Debug, Error)]
pub enum GfxError {
    /// Buffer or heap allocation failed
    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    /// Pipeline or layout creation failed
    #[error("pipeline creation failed: {0}")]
    PipelineCreation(String),

    /// Attempted to map a buffer that is not CPU-writable
    #[error("buffer '{name}' in heap {heap:?} is not CPU-writable")]
    NotMappable {
        /// Debug name of the buffer
        name: String,
        /// Heap the buffer lives in
        heap: HeapKind,
    },

    /// A write would run past the end of the buffer
    #[error("write of {len} bytes at offset {offset} exceeds buffer size {size}")]
    WriteOutOfBounds {
        /// Length of the attempted write
        len: u64,
        /// Byte offset of the attempted write
        offset: u64,
        /// Total buffer size
        size: u64,
    },
}

/// Scoped CPU access to a mapped buffer
///
/// Returned by [`GpuBuffer::map_write`]; dropping the guard releases the
/// mapping on every path, including early returns.
pub trait MappedBuffer {
    /// Mutable view of the mapped byte range
    fn bytes_mut(&mut self) -> &mut [u8];
}

/// A GPU buffer created by a [`RenderDevice`]
pub trait GpuBuffer: Send + Sync {
    /// Backend-unique identity, stable for the lifetime of the buffer
    fn id(&self) -> u64;

    /// Attach a debug name
    fn set_name(&self, name: &str);

    /// Size in bytes
    fn size(&self) -> u64;

    /// Heap the buffer was allocated from
    fn heap(&self) -> HeapKind;

    /// Copy `data` into the buffer at `offset`
    ///
    /// Works for any heap; device-local buffers go through a backend-managed
    /// staging transfer.
    fn upload_bytes(&self, data: &[u8], offset: u64) -> GfxResult<()>;

    /// Map the whole buffer for writing
    ///
    /// Only valid for [`HeapKind::Upload`] buffers.
    fn map_write(&self) -> GfxResult<Box<dyn MappedBuffer + '_>>;
}

/// A shader-visible texture descriptor (SRV / sampled-image view)
pub trait ResourceView: Send + Sync {
    /// Backend-unique identity of the view
    fn id(&self) -> u64;

    /// Debug label of the view
    fn label(&self) -> &str;

    /// Bind the view's descriptor at `slot` on the command list
    fn bind(&self, cmd: &mut dyn CommandList, slot: u32);
}

/// A command list that records graphics commands for one frame
pub trait CommandList {
    /// Bind a resource layout
    fn set_resource_layout(&mut self, layout: ResourceLayoutId);

    /// Bind a graphics pipeline
    fn set_graphics_pipeline(&mut self, pipeline: PipelineId);

    /// Bind a vertex buffer with the given per-vertex stride
    fn set_vertex_buffer(&mut self, buffer: &Arc<dyn GpuBuffer>, stride: u32);

    /// Bind an index buffer of 32-bit indices
    fn set_index_buffer(&mut self, buffer: &Arc<dyn GpuBuffer>);

    /// Bind a resource view's descriptor at `slot`
    fn set_resource_view(&mut self, slot: u32, view: u64);

    /// Record an indexed, instanced draw
    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    );

    /// Record a non-indexed, instanced draw
    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32);
}

/// The device that creates GPU resources
pub trait RenderDevice: Send + Sync {
    /// Create a buffer
    fn create_buffer(&self, desc: &BufferDesc) -> GfxResult<Arc<dyn GpuBuffer>>;

    /// Create a resource layout
    fn create_resource_layout(&self, desc: &ResourceLayoutDesc) -> GfxResult<ResourceLayoutId>;

    /// Create a graphics pipeline
    fn create_graphics_pipeline(&self, desc: &PipelineDesc) -> GfxResult<PipelineId>;

    /// Create a sampler
    fn create_sampler(&self, desc: &SamplerDesc) -> GfxResult<SamplerId>;
}

/// Frame-pacing context owned by the engine
///
/// Supplies the device and the ring position of the frame currently being
/// recorded. The engine guarantees externally (via its fence mechanism) that
/// the GPU is no longer reading a frame slot before the CPU rewrites it.
pub trait EngineContext {
    /// Device used to create resources
    fn device(&self) -> &Arc<dyn RenderDevice>;

    /// Index of the frame currently being recorded, in `[0, frame_buffer_count)`
    fn current_frame_index(&self) -> usize;

    /// Number of in-flight frame slots
    fn frame_buffer_count(&self) -> usize;
}
