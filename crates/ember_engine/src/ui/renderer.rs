//! UI batch renderer
//!
//! Accumulates quad submissions for the current frame into ring-buffered
//! GPU-visible vertex storage, then emits one indexed draw per texture
//! binding in submission order.
//!
//! Storage layout: one CPU-writable vertex buffer per in-flight frame slot,
//! plus a single static index buffer shared across slots (the per-quad index
//! pattern never changes; only each draw's count and offset vary). The
//! engine's frame pacing guarantees a slot is not read by the GPU while it is
//! being rewritten; no fencing happens here.

use std::mem;
use std::sync::Arc;

use crate::gfx::{
    BindingKind, BlendMode, BufferDesc, BufferUsage, CommandList, EngineContext, GpuBuffer,
    HeapKind, PipelineDesc, PipelineId, ResourceBinding, ResourceLayoutDesc, ResourceLayoutId,
    ResourceView, SamplerDesc, ShaderVisibility,
};

use super::geometry::{Quad, UiVertex, INDICES_PER_QUAD, QUAD_INDEX_PATTERN, VERTICES_PER_QUAD};
use super::{UiError, UiResult};

/// Binding slot the draw emitter binds each group's texture view at
const TEXTURE_SLOT: u32 = 0;

/// Default per-frame quad capacity
pub const DEFAULT_MAX_QUAD_COUNT: usize = 1024;

/// A contiguous run of quads sharing one texture binding, emitted as one
/// indexed draw call
pub struct DrawGroup {
    /// Number of quads in the run
    pub quad_count: usize,
    /// Texture binding shared by the run
    pub view: Arc<dyn ResourceView>,
}

/// One in-flight frame's share of the ring buffer
struct FrameSlot {
    /// CPU-writable vertex storage for this slot
    vertex_buffer: Arc<dyn GpuBuffer>,
    /// Quads written the last time this slot was used; bounds the clear on
    /// the slot's next use so a shrinking UI never leaves stale geometry
    prev_quad_count: usize,
}

/// Per-frame UI batch accumulator and draw emitter
pub struct UiRenderer {
    frame_slots: Vec<FrameSlot>,
    index_buffer: Arc<dyn GpuBuffer>,
    layout: ResourceLayoutId,
    pipeline: PipelineId,
    max_quad_count: usize,
    current_frame: usize,
    total_quad_count: usize,
    draw_groups: Vec<DrawGroup>,
}

impl UiRenderer {
    /// Create the renderer with its frame ring buffer and pipeline
    ///
    /// Allocates `frame_buffer_count` vertex buffers of `max_quad_count * 4`
    /// vertices in upload memory, uploads the static index pattern once to a
    /// device-local buffer, and builds the shared UI pipeline. Allocation
    /// failure here is fatal and propagates.
    pub fn new(
        ctx: &dyn EngineContext,
        debug_name_prefix: &str,
        max_quad_count: usize,
    ) -> UiResult<Self> {
        let device = ctx.device();
        let frame_count = ctx.frame_buffer_count();

        let indices = build_index_data(max_quad_count);
        let index_buffer = device.create_buffer(&BufferDesc {
            name: format!("{debug_name_prefix}_ui_indices"),
            size: (indices.len() * mem::size_of::<u32>()) as u64,
            usage: BufferUsage::INDEX | BufferUsage::TRANSFER_DST,
            heap: HeapKind::DeviceLocal,
        })?;
        index_buffer.upload_bytes(bytemuck::cast_slice(&indices), 0)?;

        let vertex_bytes = max_quad_count * VERTICES_PER_QUAD * mem::size_of::<UiVertex>();
        let mut frame_slots = Vec::with_capacity(frame_count);
        for slot_index in 0..frame_count {
            let vertex_buffer = device.create_buffer(&BufferDesc {
                name: format!("{debug_name_prefix}_ui_vertices_{slot_index}"),
                size: vertex_bytes as u64,
                usage: BufferUsage::VERTEX,
                heap: HeapKind::Upload,
            })?;
            frame_slots.push(FrameSlot {
                vertex_buffer,
                prev_quad_count: 0,
            });
        }

        let layout = device.create_resource_layout(&ResourceLayoutDesc {
            name: format!("{debug_name_prefix}_ui_layout"),
            bindings: vec![ResourceBinding {
                slot: TEXTURE_SLOT,
                kind: BindingKind::Texture,
                visibility: ShaderVisibility::Fragment,
            }],
            static_samplers: vec![SamplerDesc::linear_clamp(&format!(
                "{debug_name_prefix}_ui_sampler"
            ))],
        })?;
        let pipeline = device.create_graphics_pipeline(&PipelineDesc {
            name: format!("{debug_name_prefix}_ui_pipeline"),
            layout,
            vertex_stride: mem::size_of::<UiVertex>() as u32,
            blend: BlendMode::Alpha,
        })?;

        log::info!(
            "UI renderer '{}': {} frame slots, {} quad capacity",
            debug_name_prefix,
            frame_count,
            max_quad_count
        );

        Ok(Self {
            frame_slots,
            index_buffer,
            layout,
            pipeline,
            max_quad_count,
            current_frame: 0,
            total_quad_count: 0,
            draw_groups: Vec::new(),
        })
    }

    /// Convenience constructor with the default quad capacity
    pub fn with_default_capacity(
        ctx: &dyn EngineContext,
        debug_name_prefix: &str,
    ) -> UiResult<Self> {
        Self::new(ctx, debug_name_prefix, DEFAULT_MAX_QUAD_COUNT)
    }

    /// Start accumulating for frame slot `frame_index`
    ///
    /// Erases the slot's previous occupant (bounded to the range it actually
    /// wrote) and resets the accumulator state.
    pub fn begin_frame(&mut self, frame_index: usize) -> UiResult<()> {
        self.current_frame = frame_index;
        self.clear(frame_index)?;
        self.total_quad_count = 0;
        self.draw_groups.clear();
        Ok(())
    }

    /// Zero-fill the vertex range a slot's previous occupant wrote
    ///
    /// Callable independently of [`begin_frame`](Self::begin_frame) when the
    /// engine drives the frame lifecycle differently. Vertices beyond the
    /// previously written range are not touched.
    pub fn clear(&mut self, frame_index: usize) -> UiResult<()> {
        let prev = self.frame_slots[frame_index].prev_quad_count;
        if prev == 0 {
            return Ok(());
        }
        {
            let slot = &self.frame_slots[frame_index];
            let mut mapping = slot.vertex_buffer.map_write()?;
            let vertices: &mut [UiVertex] = bytemuck::cast_slice_mut(mapping.bytes_mut());
            for vertex in &mut vertices[..prev * VERTICES_PER_QUAD] {
                *vertex = UiVertex::degenerate();
            }
        }
        self.frame_slots[frame_index].prev_quad_count = 0;
        Ok(())
    }

    /// Queue a batch of quads sharing one texture binding
    ///
    /// Writes the vertices into the current frame slot's buffer and records a
    /// draw group; no GPU command is issued yet. An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// [`UiError::CapacityExceeded`] when the cumulative quad count for this
    /// frame would pass the configured maximum. Previously written quads stay
    /// intact; nothing from the rejected batch is written.
    pub fn submit(&mut self, quads: &[Quad], view: Arc<dyn ResourceView>) -> UiResult<()> {
        if self.total_quad_count + quads.len() > self.max_quad_count {
            return Err(UiError::CapacityExceeded {
                submitted: quads.len(),
                queued: self.total_quad_count,
                capacity: self.max_quad_count,
            });
        }
        if quads.is_empty() {
            return Ok(());
        }

        let slot = &self.frame_slots[self.current_frame];
        {
            let mut mapping = slot.vertex_buffer.map_write()?;
            let src = bytemuck::cast_slice::<Quad, u8>(quads);
            let offset = self.total_quad_count * VERTICES_PER_QUAD * mem::size_of::<UiVertex>();
            mapping.bytes_mut()[offset..offset + src.len()].copy_from_slice(src);
        }

        log::trace!(
            "UI submit: {} quads for '{}' at quad offset {}",
            quads.len(),
            view.label(),
            self.total_quad_count
        );
        self.draw_groups.push(DrawGroup {
            quad_count: quads.len(),
            view,
        });
        self.total_quad_count += quads.len();
        Ok(())
    }

    /// Emit the accumulated draw groups for the current frame
    ///
    /// Binds the shared layout, pipeline and this slot's buffers once, then
    /// issues one indexed draw per group in submission order (later
    /// submissions draw on top). Consumes the accumulator state; with nothing
    /// queued this records no commands at all.
    pub fn draw(&mut self, cmd: &mut dyn CommandList) {
        // Captured before the early return so the next begin_frame on this
        // slot knows how much to erase.
        self.frame_slots[self.current_frame].prev_quad_count = self.total_quad_count;

        if self.total_quad_count == 0 {
            return;
        }

        cmd.set_resource_layout(self.layout);
        cmd.set_graphics_pipeline(self.pipeline);
        cmd.set_vertex_buffer(
            &self.frame_slots[self.current_frame].vertex_buffer,
            mem::size_of::<UiVertex>() as u32,
        );
        cmd.set_index_buffer(&self.index_buffer);

        let mut index_offset: u32 = 0;
        for group in &self.draw_groups {
            group.view.bind(cmd, TEXTURE_SLOT);
            let index_count = (group.quad_count * INDICES_PER_QUAD) as u32;
            cmd.draw_indexed(index_count, 1, index_offset, 0, 0);
            index_offset += index_count;
        }

        log::debug!(
            "UI draw: {} quads in {} groups on frame slot {}",
            self.total_quad_count,
            self.draw_groups.len(),
            self.current_frame
        );
        self.total_quad_count = 0;
        self.draw_groups.clear();
    }

    /// Configured per-frame quad capacity
    pub fn max_quad_count(&self) -> usize {
        self.max_quad_count
    }

    /// Quads queued so far this frame
    pub fn queued_quad_count(&self) -> usize {
        self.total_quad_count
    }

    /// Draw groups recorded so far this frame, in submission order
    pub fn draw_groups(&self) -> &[DrawGroup] {
        &self.draw_groups
    }
}

/// Index data for `max_quad_count` quad slots: the fixed per-quad pattern
/// offset by four vertices per slot
fn build_index_data(max_quad_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(max_quad_count * INDICES_PER_QUAD);
    for slot in 0..max_quad_count {
        let base = (slot * VERTICES_PER_QUAD) as u32;
        indices.extend(QUAD_INDEX_PATTERN.iter().map(|&i| base + i));
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Vec2, Vec3};
    use crate::gfx::headless::{GpuCommand, HeadlessCommandList, HeadlessEngine};
    use crate::ui::geometry::{build_quad, QuadParams, ViewportConfig};

    const VIEWPORT: ViewportConfig = ViewportConfig {
        width: 1920.0,
        height: 1080.0,
    };

    fn quads(count: usize) -> Vec<Quad> {
        (0..count)
            .map(|i| {
                build_quad(
                    &QuadParams::ndc(
                        Vec3::new(i as f32 * 0.1 - 0.5, 0.0, 0.0),
                        Vec2::new(0.05, 0.05),
                    ),
                    VIEWPORT,
                )
            })
            .collect()
    }

    fn renderer(engine: &HeadlessEngine, capacity: usize) -> UiRenderer {
        UiRenderer::new(engine, "test", capacity).expect("renderer construction")
    }

    fn slot_vertices(renderer: &UiRenderer, frame_index: usize) -> Vec<UiVertex> {
        let slot = &renderer.frame_slots[frame_index];
        let mut mapping = slot.vertex_buffer.map_write().expect("map for readback");
        bytemuck::cast_slice::<u8, UiVertex>(mapping.bytes_mut()).to_vec()
    }

    #[test]
    fn test_index_pattern_repeats_with_vertex_offset() {
        let indices = build_index_data(3);
        assert_eq!(indices.len(), 18);
        assert_eq!(&indices[0..6], &[0, 1, 3, 1, 2, 3]);
        assert_eq!(&indices[6..12], &[4, 5, 7, 5, 6, 7]);
        assert_eq!(&indices[12..18], &[8, 9, 11, 9, 10, 11]);
    }

    #[test]
    fn test_submissions_accumulate_exact_sum() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 16);
        let view = engine.headless_device().create_texture_view("atlas");

        ui.begin_frame(0).expect("begin");
        ui.submit(&quads(3), view.clone()).expect("submit");
        ui.submit(&quads(2), view.clone()).expect("submit");
        ui.submit(&quads(11), view).expect("submit");
        assert_eq!(ui.queued_quad_count(), 16);
        assert_eq!(ui.draw_groups().len(), 3);
    }

    #[test]
    fn test_empty_submission_is_a_noop() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 8);
        let view = engine.headless_device().create_texture_view("atlas");

        ui.begin_frame(0).expect("begin");
        ui.submit(&[], view).expect("submit");
        assert_eq!(ui.queued_quad_count(), 0);
        assert!(ui.draw_groups().is_empty());
    }

    #[test]
    fn test_over_capacity_rejects_without_corrupting_written_data() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 4);
        let view = engine.headless_device().create_texture_view("atlas");

        ui.begin_frame(0).expect("begin");
        let first = quads(3);
        ui.submit(&first, view.clone()).expect("submit");

        let result = ui.submit(&quads(2), view);
        assert!(matches!(
            result,
            Err(UiError::CapacityExceeded {
                submitted: 2,
                queued: 3,
                capacity: 4,
            })
        ));

        // Previously written vertex data is intact and bookkeeping unchanged.
        assert_eq!(ui.queued_quad_count(), 3);
        assert_eq!(ui.draw_groups().len(), 1);
        let written = slot_vertices(&ui, 0);
        for (quad_index, quad) in first.iter().enumerate() {
            for (corner, vertex) in quad.iter().enumerate() {
                assert_eq!(written[quad_index * 4 + corner], *vertex);
            }
        }
    }

    #[test]
    fn test_submission_at_exact_capacity_is_accepted() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 4);
        let view = engine.headless_device().create_texture_view("atlas");

        ui.begin_frame(0).expect("begin");
        ui.submit(&quads(4), view).expect("submit");
        assert_eq!(ui.queued_quad_count(), 4);
    }

    #[test]
    fn test_draw_emits_groups_in_submission_order() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 16);
        let view_x = engine.headless_device().create_texture_view("x");
        let view_y = engine.headless_device().create_texture_view("y");

        ui.begin_frame(0).expect("begin");
        ui.submit(&quads(3), view_x.clone()).expect("submit");
        ui.submit(&quads(2), view_y.clone()).expect("submit");

        let mut cmd = HeadlessCommandList::new();
        ui.draw(&mut cmd);

        let expected_tail = [
            GpuCommand::SetResourceView {
                slot: 0,
                view: view_x.id(),
            },
            GpuCommand::DrawIndexed {
                index_count: 18,
                instance_count: 1,
                first_index: 0,
                base_vertex: 0,
                first_instance: 0,
            },
            GpuCommand::SetResourceView {
                slot: 0,
                view: view_y.id(),
            },
            GpuCommand::DrawIndexed {
                index_count: 12,
                instance_count: 1,
                first_index: 18,
                base_vertex: 0,
                first_instance: 0,
            },
        ];
        let commands = cmd.commands();
        // Layout, pipeline, vertex buffer, index buffer, then the groups.
        assert_eq!(commands.len(), 8);
        assert_eq!(&commands[4..], &expected_tail);

        // Accumulator state is consumed.
        assert_eq!(ui.queued_quad_count(), 0);
        assert!(ui.draw_groups().is_empty());
    }

    #[test]
    fn test_empty_frame_draw_records_nothing() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 8);

        ui.begin_frame(0).expect("begin");
        let mut cmd = HeadlessCommandList::new();
        ui.draw(&mut cmd);
        assert!(cmd.commands().is_empty());
        assert_eq!(ui.queued_quad_count(), 0);
    }

    #[test]
    fn test_next_begin_frame_clears_exactly_previous_range() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 8);
        let view = engine.headless_device().create_texture_view("atlas");

        ui.begin_frame(0).expect("begin");
        ui.submit(&quads(2), view).expect("submit");
        let mut cmd = HeadlessCommandList::new();
        ui.draw(&mut cmd);

        // Plant a sentinel just past the previously written range to prove
        // the clear is bounded.
        let sentinel = UiVertex {
            position: [9.0, 9.0, 9.0],
            normal: [0.0, 0.0, 1.0],
            color: [0.5; 4],
            uv: [0.5, 0.5],
        };
        {
            let slot = &ui.frame_slots[0];
            let mut mapping = slot.vertex_buffer.map_write().expect("map");
            let vertices: &mut [UiVertex] = bytemuck::cast_slice_mut(mapping.bytes_mut());
            vertices[8] = sentinel;
        }

        ui.begin_frame(0).expect("begin");
        let vertices = slot_vertices(&ui, 0);
        for vertex in &vertices[..8] {
            assert_eq!(*vertex, UiVertex::degenerate());
        }
        assert_eq!(vertices[8], sentinel);
    }

    #[test]
    fn test_frame_slots_are_independent() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 8);
        let view = engine.headless_device().create_texture_view("atlas");

        ui.begin_frame(0).expect("begin");
        ui.submit(&quads(3), view.clone()).expect("submit");
        let mut cmd = HeadlessCommandList::new();
        ui.draw(&mut cmd);

        // Writing frame 1 must not disturb frame 0's storage.
        ui.begin_frame(1).expect("begin");
        ui.submit(&quads(1), view).expect("submit");
        let slot0 = slot_vertices(&ui, 0);
        assert_ne!(slot0[0], UiVertex::degenerate());
        assert_eq!(ui.frame_slots[0].prev_quad_count, 3);
        assert_eq!(ui.frame_slots[1].prev_quad_count, 0);
    }

    #[test]
    fn test_explicit_clear_is_idempotent() {
        let engine = HeadlessEngine::new(2);
        let mut ui = renderer(&engine, 8);
        let view = engine.headless_device().create_texture_view("atlas");

        ui.begin_frame(0).expect("begin");
        ui.submit(&quads(2), view).expect("submit");
        let mut cmd = HeadlessCommandList::new();
        ui.draw(&mut cmd);

        ui.clear(0).expect("clear");
        assert_eq!(ui.frame_slots[0].prev_quad_count, 0);
        // Second clear has nothing to erase.
        ui.clear(0).expect("clear");
        let vertices = slot_vertices(&ui, 0);
        for vertex in &vertices[..8] {
            assert_eq!(*vertex, UiVertex::degenerate());
        }
    }
}
