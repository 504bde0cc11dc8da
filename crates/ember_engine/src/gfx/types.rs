//! Descriptor types for GPU resource creation
//!
//! Plain-data descriptions consumed by [`RenderDevice`](super::RenderDevice)
//! implementations. The engine never talks to a graphics API directly; it
//! describes what it needs and lets the backend realize it.

use bitflags::bitflags;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a resource layout owned by the device
    pub struct ResourceLayoutId;

    /// Handle to a graphics pipeline owned by the device
    pub struct PipelineId;

    /// Handle to a sampler owned by the device
    pub struct SamplerId;
}

bitflags! {
    /// Allowed usages for a GPU buffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BufferUsage: u32 {
        /// Bindable as a vertex buffer
        const VERTEX = 1 << 0;
        /// Bindable as an index buffer
        const INDEX = 1 << 1;
        /// Bindable as a uniform/constant buffer
        const UNIFORM = 1 << 2;
        /// Source of a transfer/copy operation
        const TRANSFER_SRC = 1 << 3;
        /// Destination of a transfer/copy operation
        const TRANSFER_DST = 1 << 4;
    }
}

/// Memory heap a buffer lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapKind {
    /// GPU-only memory; contents are set once via `upload_bytes`
    DeviceLocal,
    /// CPU-writable memory that can be rewritten every frame
    Upload,
}

/// Description of a GPU buffer to create
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Debug name attached to the buffer
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Allowed usages
    pub usage: BufferUsage,
    /// Heap the buffer is allocated from
    pub heap: HeapKind,
}

/// Kind of resource bound at a layout slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Sampled texture (bound through a resource view)
    Texture,
    /// Uniform/constant buffer
    UniformBuffer,
    /// Standalone sampler
    Sampler,
}

/// Shader stages a binding is visible to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderVisibility {
    /// Vertex stage only
    Vertex,
    /// Fragment stage only
    Fragment,
    /// All graphics stages
    All,
}

/// One binding slot in a resource layout
#[derive(Debug, Clone)]
pub struct ResourceBinding {
    /// Slot index the resource is bound at
    pub slot: u32,
    /// Kind of resource expected at the slot
    pub kind: BindingKind,
    /// Stages that can read the binding
    pub visibility: ShaderVisibility,
}

/// Texture filtering mode for a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Nearest-neighbor sampling
    Nearest,
    /// Bilinear sampling
    Linear,
}

/// Texture addressing mode for a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    /// Clamp coordinates to the texture edge
    Clamp,
    /// Wrap coordinates
    Repeat,
}

/// Description of a sampler to create
#[derive(Debug, Clone)]
pub struct SamplerDesc {
    /// Debug name attached to the sampler
    pub name: String,
    /// Filtering mode
    pub filter: FilterMode,
    /// Addressing mode for all axes
    pub address: AddressMode,
}

impl SamplerDesc {
    /// Linear-filtered, edge-clamped sampler (the usual choice for UI and
    /// post-processing)
    pub fn linear_clamp(name: &str) -> Self {
        Self {
            name: name.to_string(),
            filter: FilterMode::Linear,
            address: AddressMode::Clamp,
        }
    }
}

/// Description of a resource layout (descriptor set layout / root signature)
#[derive(Debug, Clone)]
pub struct ResourceLayoutDesc {
    /// Debug name attached to the layout
    pub name: String,
    /// Binding slots in the layout
    pub bindings: Vec<ResourceBinding>,
    /// Samplers baked into the layout
    pub static_samplers: Vec<SamplerDesc>,
}

/// Alpha blending configuration for a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// No blending
    Opaque,
    /// Standard source-alpha blending (UI, effects compositing)
    Alpha,
}

/// Description of a graphics pipeline to create
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    /// Debug name attached to the pipeline
    pub name: String,
    /// Layout the pipeline binds resources through
    pub layout: ResourceLayoutId,
    /// Stride in bytes of one vertex, 0 for vertex-less pipelines
    pub vertex_stride: u32,
    /// Blend state
    pub blend: BlendMode,
}
