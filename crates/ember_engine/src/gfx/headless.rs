//! Headless rendering backend
//!
//! A complete in-process implementation of the GPU collaborator traits.
//! Buffers are backed by plain memory and command lists record their command
//! stream instead of submitting it. Used by the headless demo and by tests
//! that need to inspect emitted draws or read buffer contents back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use slotmap::SlotMap;

use super::device::{
    CommandList, EngineContext, GfxError, GfxResult, GpuBuffer, MappedBuffer, RenderDevice,
    ResourceView,
};
use super::types::{
    BufferDesc, BufferUsage, HeapKind, PipelineDesc, PipelineId, ResourceLayoutDesc,
    ResourceLayoutId, SamplerDesc, SamplerId,
};

/// Recover a mutex guard even if a previous holder panicked
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Memory-backed buffer
pub struct HeadlessBuffer {
    id: u64,
    name: Mutex<String>,
    usage: BufferUsage,
    heap: HeapKind,
    data: Mutex<Vec<u8>>,
}

impl HeadlessBuffer {
    /// Allowed usages declared at creation
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Copy of the current contents, for verification
    pub fn contents(&self) -> Vec<u8> {
        lock_unpoisoned(&self.data).clone()
    }
}

struct HeadlessMapping<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl MappedBuffer for HeadlessMapping<'_> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.guard[..]
    }
}

impl GpuBuffer for HeadlessBuffer {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_name(&self, name: &str) {
        *lock_unpoisoned(&self.name) = name.to_string();
    }

    fn size(&self) -> u64 {
        lock_unpoisoned(&self.data).len() as u64
    }

    fn heap(&self) -> HeapKind {
        self.heap
    }

    fn upload_bytes(&self, data: &[u8], offset: u64) -> GfxResult<()> {
        let mut bytes = lock_unpoisoned(&self.data);
        let end = offset + data.len() as u64;
        if end > bytes.len() as u64 {
            return Err(GfxError::WriteOutOfBounds {
                len: data.len() as u64,
                offset,
                size: bytes.len() as u64,
            });
        }
        let offset = offset as usize;
        bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn map_write(&self) -> GfxResult<Box<dyn MappedBuffer + '_>> {
        if self.heap != HeapKind::Upload {
            return Err(GfxError::NotMappable {
                name: lock_unpoisoned(&self.name).clone(),
                heap: self.heap,
            });
        }
        Ok(Box::new(HeadlessMapping {
            guard: lock_unpoisoned(&self.data),
        }))
    }
}

/// Texture descriptor view with a recorded identity
pub struct HeadlessResourceView {
    id: u64,
    label: String,
}

impl ResourceView for HeadlessResourceView {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn bind(&self, cmd: &mut dyn CommandList, slot: u32) {
        cmd.set_resource_view(slot, self.id);
    }
}

/// One recorded graphics command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuCommand {
    /// Resource layout bound
    SetResourceLayout(ResourceLayoutId),
    /// Graphics pipeline bound
    SetGraphicsPipeline(PipelineId),
    /// Vertex buffer bound
    SetVertexBuffer {
        /// Buffer identity
        buffer: u64,
        /// Per-vertex stride in bytes
        stride: u32,
    },
    /// Index buffer bound
    SetIndexBuffer {
        /// Buffer identity
        buffer: u64,
    },
    /// Resource view descriptor bound
    SetResourceView {
        /// Binding slot
        slot: u32,
        /// View identity
        view: u64,
    },
    /// Indexed instanced draw
    DrawIndexed {
        /// Number of indices
        index_count: u32,
        /// Number of instances
        instance_count: u32,
        /// First index in the bound index buffer
        first_index: u32,
        /// Value added to each index before vertex lookup
        base_vertex: i32,
        /// First instance id
        first_instance: u32,
    },
    /// Non-indexed instanced draw
    Draw {
        /// Number of vertices
        vertex_count: u32,
        /// Number of instances
        instance_count: u32,
        /// First vertex
        first_vertex: u32,
        /// First instance id
        first_instance: u32,
    },
}

/// Command list that records its command stream
#[derive(Default)]
pub struct HeadlessCommandList {
    commands: Vec<GpuCommand>,
}

impl HeadlessCommandList {
    /// Create an empty command list
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in order
    pub fn commands(&self) -> &[GpuCommand] {
        &self.commands
    }

    /// Recorded draw commands only (indexed and non-indexed)
    pub fn draw_commands(&self) -> Vec<&GpuCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, GpuCommand::DrawIndexed { .. } | GpuCommand::Draw { .. }))
            .collect()
    }

    /// Discard all recorded commands
    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl CommandList for HeadlessCommandList {
    fn set_resource_layout(&mut self, layout: ResourceLayoutId) {
        self.commands.push(GpuCommand::SetResourceLayout(layout));
    }

    fn set_graphics_pipeline(&mut self, pipeline: PipelineId) {
        self.commands.push(GpuCommand::SetGraphicsPipeline(pipeline));
    }

    fn set_vertex_buffer(&mut self, buffer: &Arc<dyn GpuBuffer>, stride: u32) {
        self.commands.push(GpuCommand::SetVertexBuffer {
            buffer: buffer.id(),
            stride,
        });
    }

    fn set_index_buffer(&mut self, buffer: &Arc<dyn GpuBuffer>) {
        self.commands.push(GpuCommand::SetIndexBuffer { buffer: buffer.id() });
    }

    fn set_resource_view(&mut self, slot: u32, view: u64) {
        self.commands.push(GpuCommand::SetResourceView { slot, view });
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    ) {
        self.commands.push(GpuCommand::DrawIndexed {
            index_count,
            instance_count,
            first_index,
            base_vertex,
            first_instance,
        });
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        self.commands.push(GpuCommand::Draw {
            vertex_count,
            instance_count,
            first_vertex,
            first_instance,
        });
    }
}

#[derive(Default)]
struct DeviceState {
    layouts: SlotMap<ResourceLayoutId, ResourceLayoutDesc>,
    pipelines: SlotMap<PipelineId, PipelineDesc>,
    samplers: SlotMap<SamplerId, SamplerDesc>,
}

/// Device that realizes resources in host memory
#[derive(Default)]
pub struct HeadlessDevice {
    state: Mutex<DeviceState>,
    next_resource_id: AtomicU64,
}

impl HeadlessDevice {
    /// Create an empty device
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.next_resource_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Create a texture descriptor view with the given label
    ///
    /// Texture storage itself is out of scope for the headless backend; the
    /// view carries only the identity the draw emitter binds.
    pub fn create_texture_view(&self, label: &str) -> Arc<dyn ResourceView> {
        Arc::new(HeadlessResourceView {
            id: self.next_id(),
            label: label.to_string(),
        })
    }

    /// Number of live pipelines
    pub fn pipeline_count(&self) -> usize {
        lock_unpoisoned(&self.state).pipelines.len()
    }

    /// Description a pipeline was created with
    pub fn pipeline_desc(&self, id: PipelineId) -> Option<PipelineDesc> {
        lock_unpoisoned(&self.state).pipelines.get(id).cloned()
    }

    /// Description a layout was created with
    pub fn layout_desc(&self, id: ResourceLayoutId) -> Option<ResourceLayoutDesc> {
        lock_unpoisoned(&self.state).layouts.get(id).cloned()
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_buffer(&self, desc: &BufferDesc) -> GfxResult<Arc<dyn GpuBuffer>> {
        if desc.size == 0 {
            return Err(GfxError::AllocationFailed(format!(
                "buffer '{}' requested zero size",
                desc.name
            )));
        }
        log::debug!(
            "headless: buffer '{}' ({} bytes, {:?})",
            desc.name,
            desc.size,
            desc.heap
        );
        Ok(Arc::new(HeadlessBuffer {
            id: self.next_id(),
            name: Mutex::new(desc.name.clone()),
            usage: desc.usage,
            heap: desc.heap,
            data: Mutex::new(vec![0; desc.size as usize]),
        }))
    }

    fn create_resource_layout(&self, desc: &ResourceLayoutDesc) -> GfxResult<ResourceLayoutId> {
        let mut state = lock_unpoisoned(&self.state);
        Ok(state.layouts.insert(desc.clone()))
    }

    fn create_graphics_pipeline(&self, desc: &PipelineDesc) -> GfxResult<PipelineId> {
        let mut state = lock_unpoisoned(&self.state);
        if !state.layouts.contains_key(desc.layout) {
            return Err(GfxError::PipelineCreation(format!(
                "pipeline '{}' references an unknown resource layout",
                desc.name
            )));
        }
        Ok(state.pipelines.insert(desc.clone()))
    }

    fn create_sampler(&self, desc: &SamplerDesc) -> GfxResult<SamplerId> {
        let mut state = lock_unpoisoned(&self.state);
        Ok(state.samplers.insert(desc.clone()))
    }
}

/// Frame-pacing context driving the headless device
pub struct HeadlessEngine {
    device: Arc<HeadlessDevice>,
    device_obj: Arc<dyn RenderDevice>,
    frame_count: usize,
    frame_index: std::cell::Cell<usize>,
}

impl HeadlessEngine {
    /// Create a context with `frame_count` in-flight frame slots
    pub fn new(frame_count: usize) -> Self {
        let device = Arc::new(HeadlessDevice::new());
        let device_obj: Arc<dyn RenderDevice> = device.clone();
        Self {
            device,
            device_obj,
            frame_count,
            frame_index: std::cell::Cell::new(0),
        }
    }

    /// Concrete device, for headless-only operations such as view creation
    pub fn headless_device(&self) -> &Arc<HeadlessDevice> {
        &self.device
    }

    /// Advance to the next frame slot and return its index
    pub fn advance_frame(&self) -> usize {
        let next = (self.frame_index.get() + 1) % self.frame_count;
        self.frame_index.set(next);
        next
    }
}

impl EngineContext for HeadlessEngine {
    fn device(&self) -> &Arc<dyn RenderDevice> {
        &self.device_obj
    }

    fn current_frame_index(&self) -> usize {
        self.frame_index.get()
    }

    fn frame_buffer_count(&self) -> usize {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::BlendMode;

    fn upload_buffer(device: &HeadlessDevice, size: u64) -> Arc<dyn GpuBuffer> {
        device
            .create_buffer(&BufferDesc {
                name: "test_upload".to_string(),
                size,
                usage: BufferUsage::VERTEX,
                heap: HeapKind::Upload,
            })
            .expect("buffer creation")
    }

    #[test]
    fn test_mapped_write_round_trip() {
        let device = HeadlessDevice::new();
        let buffer = upload_buffer(&device, 8);
        {
            let mut mapping = buffer.map_write().expect("map");
            mapping.bytes_mut()[0..4].copy_from_slice(&[1, 2, 3, 4]);
        }
        let mut readback = buffer.map_write().expect("remap");
        assert_eq!(&readback.bytes_mut()[0..4], &[1, 2, 3, 4]);
        assert_eq!(&readback.bytes_mut()[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_device_local_buffers_reject_mapping() {
        let device = HeadlessDevice::new();
        let buffer = device
            .create_buffer(&BufferDesc {
                name: "static_indices".to_string(),
                size: 16,
                usage: BufferUsage::INDEX | BufferUsage::TRANSFER_DST,
                heap: HeapKind::DeviceLocal,
            })
            .expect("buffer creation");
        assert!(matches!(
            buffer.map_write(),
            Err(GfxError::NotMappable { .. })
        ));
        // Upload still works for device-local memory.
        buffer.upload_bytes(&[9; 16], 0).expect("upload");
    }

    #[test]
    fn test_upload_bounds_are_checked() {
        let device = HeadlessDevice::new();
        let buffer = upload_buffer(&device, 4);
        assert!(matches!(
            buffer.upload_bytes(&[0; 8], 2),
            Err(GfxError::WriteOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_pipeline_requires_known_layout() {
        let device = HeadlessDevice::new();
        let layout = device
            .create_resource_layout(&ResourceLayoutDesc {
                name: "layout".to_string(),
                bindings: vec![],
                static_samplers: vec![],
            })
            .expect("layout");
        assert!(device
            .create_graphics_pipeline(&PipelineDesc {
                name: "ok".to_string(),
                layout,
                vertex_stride: 0,
                blend: BlendMode::Opaque,
            })
            .is_ok());
        assert!(device
            .create_graphics_pipeline(&PipelineDesc {
                name: "bad".to_string(),
                layout: ResourceLayoutId::default(),
                vertex_stride: 0,
                blend: BlendMode::Opaque,
            })
            .is_err());
    }

    #[test]
    fn test_command_list_records_in_order() {
        let device = HeadlessDevice::new();
        let buffer = upload_buffer(&device, 64);
        let mut cmd = HeadlessCommandList::new();
        cmd.set_vertex_buffer(&buffer, 48);
        cmd.draw_indexed(6, 1, 0, 0, 0);
        assert_eq!(
            cmd.commands(),
            &[
                GpuCommand::SetVertexBuffer {
                    buffer: buffer.id(),
                    stride: 48
                },
                GpuCommand::DrawIndexed {
                    index_count: 6,
                    instance_count: 1,
                    first_index: 0,
                    base_vertex: 0,
                    first_instance: 0
                },
            ]
        );
    }

    #[test]
    fn test_engine_frame_ring_wraps() {
        let engine = HeadlessEngine::new(3);
        assert_eq!(engine.current_frame_index(), 0);
        assert_eq!(engine.advance_frame(), 1);
        assert_eq!(engine.advance_frame(), 2);
        assert_eq!(engine.advance_frame(), 0);
    }
}
