//! Post-processing effects
//!
//! Shallow collaborators over the GPU contracts: each effect owns its params
//! buffer and pipeline privately and exposes the `{resize, draw}` capability,
//! dispatched through the [`PostEffect`] tagged variants. Every variant
//! follows the same pattern: allocate params buffer, build pipeline, bind,
//! dispatch a fullscreen triangle over the scene input.

use std::mem;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::gfx::{
    BindingKind, BlendMode, BufferDesc, BufferUsage, CommandList, GfxResult, GpuBuffer, HeapKind,
    PipelineDesc, PipelineId, RenderDevice, ResourceBinding, ResourceLayoutDesc, ResourceLayoutId,
    ResourceView, SamplerDesc, SamplerId, ShaderVisibility,
};

/// Binding slot for the scene color input
const SCENE_SLOT: u32 = 0;

/// Binding slot for the effect's params buffer
const PARAMS_SLOT: u32 = 1;

/// Capability shared by all post-processing effects
pub trait Effect {
    /// Effect name, for diagnostics
    fn name(&self) -> &str;

    /// React to a framebuffer resize
    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()>;

    /// Record the effect's draw over the scene input
    ///
    /// A missing scene view drops this effect for the frame with a
    /// diagnostic log instead of failing the frame loop.
    fn draw(
        &mut self,
        cmd: &mut dyn CommandList,
        scene: Option<&Arc<dyn ResourceView>>,
    ) -> GfxResult<()>;
}

/// GPU resources every effect owns: params buffer, layout, pipeline, sampler
struct EffectCore {
    name: String,
    layout: ResourceLayoutId,
    pipeline: PipelineId,
    // Kept alive with the pipeline; bound by the backend, not per draw.
    #[allow(dead_code)]
    sampler: SamplerId,
    params_buffer: Arc<dyn GpuBuffer>,
    width: u32,
    height: u32,
}

impl EffectCore {
    fn new(
        device: &Arc<dyn RenderDevice>,
        name: &str,
        params_size: u64,
        width: u32,
        height: u32,
    ) -> GfxResult<Self> {
        let params_buffer = device.create_buffer(&BufferDesc {
            name: format!("{name}_params"),
            size: params_size,
            usage: BufferUsage::UNIFORM,
            heap: HeapKind::Upload,
        })?;
        let layout = device.create_resource_layout(&ResourceLayoutDesc {
            name: format!("{name}_layout"),
            bindings: vec![
                ResourceBinding {
                    slot: SCENE_SLOT,
                    kind: BindingKind::Texture,
                    visibility: ShaderVisibility::Fragment,
                },
                ResourceBinding {
                    slot: PARAMS_SLOT,
                    kind: BindingKind::UniformBuffer,
                    visibility: ShaderVisibility::Fragment,
                },
            ],
            static_samplers: vec![],
        })?;
        let pipeline = device.create_graphics_pipeline(&PipelineDesc {
            name: format!("{name}_pipeline"),
            layout,
            // Fullscreen triangle is generated in the vertex stage.
            vertex_stride: 0,
            blend: BlendMode::Opaque,
        })?;
        let sampler = device.create_sampler(&SamplerDesc::linear_clamp(&format!("{name}_sampler")))?;

        Ok(Self {
            name: name.to_string(),
            layout,
            pipeline,
            sampler,
            params_buffer,
            width,
            height,
        })
    }

    fn upload_params<P: Pod>(&self, params: &P) -> GfxResult<()> {
        self.params_buffer.upload_bytes(bytemuck::bytes_of(params), 0)
    }

    fn texel_size(&self) -> [f32; 2] {
        [1.0 / self.width as f32, 1.0 / self.height as f32]
    }

    fn draw(&self, cmd: &mut dyn CommandList, scene: Option<&Arc<dyn ResourceView>>) {
        let Some(view) = scene else {
            log::warn!("{}: no scene input bound, skipping this frame", self.name);
            return;
        };
        cmd.set_resource_layout(self.layout);
        cmd.set_graphics_pipeline(self.pipeline);
        view.bind(cmd, SCENE_SLOT);
        cmd.draw(3, 1, 0, 0);
    }
}

/// Bright-pass bloom parameters
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct BloomParams {
    /// Luminance threshold for the bright pass
    pub threshold: f32,
    /// Strength of the bloom contribution
    pub intensity: f32,
    /// Size of one texel, updated on resize
    pub texel_size: [f32; 2],
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            intensity: 0.6,
            texel_size: [0.0; 2],
        }
    }
}

/// Bright-pass bloom
pub struct Bloom {
    core: EffectCore,
    params: BloomParams,
}

impl Bloom {
    /// Create the effect for the given framebuffer extent
    pub fn new(device: &Arc<dyn RenderDevice>, width: u32, height: u32) -> GfxResult<Self> {
        let core = EffectCore::new(device, "bloom", mem::size_of::<BloomParams>() as u64, width, height)?;
        let params = BloomParams {
            texel_size: core.texel_size(),
            ..Default::default()
        };
        core.upload_params(&params)?;
        Ok(Self { core, params })
    }
}

impl Effect for Bloom {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()> {
        self.core.width = width;
        self.core.height = height;
        self.params.texel_size = self.core.texel_size();
        self.core.upload_params(&self.params)
    }

    fn draw(&mut self, cmd: &mut dyn CommandList, scene: Option<&Arc<dyn ResourceView>>) -> GfxResult<()> {
        self.core.draw(cmd, scene);
        Ok(())
    }
}

/// Screen-space ambient occlusion parameters
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SsaoParams {
    /// Sample hemisphere radius in view space
    pub radius: f32,
    /// Depth bias against self-occlusion
    pub bias: f32,
    /// Occlusion strength
    pub strength: f32,
    /// Padding to a 16-byte multiple
    pub _pad: f32,
}

impl Default for SsaoParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            bias: 0.025,
            strength: 1.0,
            _pad: 0.0,
        }
    }
}

/// Screen-space ambient occlusion
pub struct Ssao {
    core: EffectCore,
    params: SsaoParams,
}

impl Ssao {
    /// Create the effect for the given framebuffer extent
    pub fn new(device: &Arc<dyn RenderDevice>, width: u32, height: u32) -> GfxResult<Self> {
        let core = EffectCore::new(device, "ssao", mem::size_of::<SsaoParams>() as u64, width, height)?;
        let params = SsaoParams::default();
        core.upload_params(&params)?;
        Ok(Self { core, params })
    }
}

impl Effect for Ssao {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()> {
        self.core.width = width;
        self.core.height = height;
        self.core.upload_params(&self.params)
    }

    fn draw(&mut self, cmd: &mut dyn CommandList, scene: Option<&Arc<dyn ResourceView>>) -> GfxResult<()> {
        self.core.draw(cmd, scene);
        Ok(())
    }
}

/// Depth-of-field parameters
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DepthOfFieldParams {
    /// Distance of the focal plane
    pub focus_distance: f32,
    /// Depth range that stays sharp
    pub focus_range: f32,
    /// Maximum blur amount
    pub blur_strength: f32,
    /// Padding to a 16-byte multiple
    pub _pad: f32,
}

impl Default for DepthOfFieldParams {
    fn default() -> Self {
        Self {
            focus_distance: 10.0,
            focus_range: 5.0,
            blur_strength: 1.0,
            _pad: 0.0,
        }
    }
}

/// Depth of field
pub struct DepthOfField {
    core: EffectCore,
    params: DepthOfFieldParams,
}

impl DepthOfField {
    /// Create the effect for the given framebuffer extent
    pub fn new(device: &Arc<dyn RenderDevice>, width: u32, height: u32) -> GfxResult<Self> {
        let core = EffectCore::new(
            device,
            "depth_of_field",
            mem::size_of::<DepthOfFieldParams>() as u64,
            width,
            height,
        )?;
        let params = DepthOfFieldParams::default();
        core.upload_params(&params)?;
        Ok(Self { core, params })
    }
}

impl Effect for DepthOfField {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()> {
        self.core.width = width;
        self.core.height = height;
        self.core.upload_params(&self.params)
    }

    fn draw(&mut self, cmd: &mut dyn CommandList, scene: Option<&Arc<dyn ResourceView>>) -> GfxResult<()> {
        self.core.draw(cmd, scene);
        Ok(())
    }
}

/// Screen-space reflection parameters
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SsrParams {
    /// Maximum ray distance in view space
    pub max_distance: f32,
    /// Ray march step size
    pub step_size: f32,
    /// Depth thickness accepted as a hit
    pub thickness: f32,
    /// Padding to a 16-byte multiple
    pub _pad: f32,
}

impl Default for SsrParams {
    fn default() -> Self {
        Self {
            max_distance: 50.0,
            step_size: 0.1,
            thickness: 0.5,
            _pad: 0.0,
        }
    }
}

/// Screen-space reflections
pub struct Ssr {
    core: EffectCore,
    params: SsrParams,
}

impl Ssr {
    /// Create the effect for the given framebuffer extent
    pub fn new(device: &Arc<dyn RenderDevice>, width: u32, height: u32) -> GfxResult<Self> {
        let core = EffectCore::new(device, "ssr", mem::size_of::<SsrParams>() as u64, width, height)?;
        let params = SsrParams::default();
        core.upload_params(&params)?;
        Ok(Self { core, params })
    }
}

impl Effect for Ssr {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()> {
        self.core.width = width;
        self.core.height = height;
        self.core.upload_params(&self.params)
    }

    fn draw(&mut self, cmd: &mut dyn CommandList, scene: Option<&Arc<dyn ResourceView>>) -> GfxResult<()> {
        self.core.draw(cmd, scene);
        Ok(())
    }
}

/// Sobel edge detection parameters
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SobelParams {
    /// Size of one texel, updated on resize
    pub texel_size: [f32; 2],
    /// Gradient magnitude treated as an edge
    pub edge_threshold: f32,
    /// Padding to a 16-byte multiple
    pub _pad: f32,
}

impl Default for SobelParams {
    fn default() -> Self {
        Self {
            texel_size: [0.0; 2],
            edge_threshold: 0.2,
            _pad: 0.0,
        }
    }
}

/// Sobel edge detection
pub struct Sobel {
    core: EffectCore,
    params: SobelParams,
}

impl Sobel {
    /// Create the effect for the given framebuffer extent
    pub fn new(device: &Arc<dyn RenderDevice>, width: u32, height: u32) -> GfxResult<Self> {
        let core = EffectCore::new(device, "sobel", mem::size_of::<SobelParams>() as u64, width, height)?;
        let params = SobelParams {
            texel_size: core.texel_size(),
            ..Default::default()
        };
        core.upload_params(&params)?;
        Ok(Self { core, params })
    }
}

impl Effect for Sobel {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()> {
        self.core.width = width;
        self.core.height = height;
        self.params.texel_size = self.core.texel_size();
        self.core.upload_params(&self.params)
    }

    fn draw(&mut self, cmd: &mut dyn CommandList, scene: Option<&Arc<dyn ResourceView>>) -> GfxResult<()> {
        self.core.draw(cmd, scene);
        Ok(())
    }
}

/// Gaussian blur parameters
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GaussianBlurParams {
    /// Size of one texel, updated on resize
    pub texel_size: [f32; 2],
    /// Blur kernel sigma
    pub sigma: f32,
    /// Padding to a 16-byte multiple
    pub _pad: f32,
}

impl Default for GaussianBlurParams {
    fn default() -> Self {
        Self {
            texel_size: [0.0; 2],
            sigma: 2.0,
            _pad: 0.0,
        }
    }
}

/// Separable gaussian blur
pub struct GaussianBlur {
    core: EffectCore,
    params: GaussianBlurParams,
}

impl GaussianBlur {
    /// Create the effect for the given framebuffer extent
    pub fn new(device: &Arc<dyn RenderDevice>, width: u32, height: u32) -> GfxResult<Self> {
        let core = EffectCore::new(
            device,
            "gaussian_blur",
            mem::size_of::<GaussianBlurParams>() as u64,
            width,
            height,
        )?;
        let params = GaussianBlurParams {
            texel_size: core.texel_size(),
            ..Default::default()
        };
        core.upload_params(&params)?;
        Ok(Self { core, params })
    }
}

impl Effect for GaussianBlur {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()> {
        self.core.width = width;
        self.core.height = height;
        self.params.texel_size = self.core.texel_size();
        self.core.upload_params(&self.params)
    }

    fn draw(&mut self, cmd: &mut dyn CommandList, scene: Option<&Arc<dyn ResourceView>>) -> GfxResult<()> {
        self.core.draw(cmd, scene);
        Ok(())
    }
}

/// Color grading parameters
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ColorGradeParams {
    /// Exposure multiplier in stops
    pub exposure: f32,
    /// Contrast around middle gray
    pub contrast: f32,
    /// Saturation multiplier
    pub saturation: f32,
    /// Padding to a 16-byte multiple
    pub _pad: f32,
}

impl Default for ColorGradeParams {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            _pad: 0.0,
        }
    }
}

/// Color grading
pub struct ColorGrade {
    core: EffectCore,
    params: ColorGradeParams,
}

impl ColorGrade {
    /// Create the effect for the given framebuffer extent
    pub fn new(device: &Arc<dyn RenderDevice>, width: u32, height: u32) -> GfxResult<Self> {
        let core = EffectCore::new(
            device,
            "color_grade",
            mem::size_of::<ColorGradeParams>() as u64,
            width,
            height,
        )?;
        let params = ColorGradeParams::default();
        core.upload_params(&params)?;
        Ok(Self { core, params })
    }
}

impl Effect for ColorGrade {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()> {
        self.core.width = width;
        self.core.height = height;
        self.core.upload_params(&self.params)
    }

    fn draw(&mut self, cmd: &mut dyn CommandList, scene: Option<&Arc<dyn ResourceView>>) -> GfxResult<()> {
        self.core.draw(cmd, scene);
        Ok(())
    }
}

/// Tagged post-processing effect variants
///
/// Each variant owns its GPU resources privately; the only shared contract is
/// the `{resize, draw}` capability.
pub enum PostEffect {
    /// Bright-pass bloom
    Bloom(Bloom),
    /// Screen-space ambient occlusion
    Ssao(Ssao),
    /// Depth of field
    DepthOfField(DepthOfField),
    /// Screen-space reflections
    Ssr(Ssr),
    /// Sobel edge detection
    Sobel(Sobel),
    /// Separable gaussian blur
    GaussianBlur(GaussianBlur),
    /// Color grading
    ColorGrade(ColorGrade),
}

impl Effect for PostEffect {
    fn name(&self) -> &str {
        match self {
            Self::Bloom(e) => e.name(),
            Self::Ssao(e) => e.name(),
            Self::DepthOfField(e) => e.name(),
            Self::Ssr(e) => e.name(),
            Self::Sobel(e) => e.name(),
            Self::GaussianBlur(e) => e.name(),
            Self::ColorGrade(e) => e.name(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> GfxResult<()> {
        match self {
            Self::Bloom(e) => e.resize(width, height),
            Self::Ssao(e) => e.resize(width, height),
            Self::DepthOfField(e) => e.resize(width, height),
            Self::Ssr(e) => e.resize(width, height),
            Self::Sobel(e) => e.resize(width, height),
            Self::GaussianBlur(e) => e.resize(width, height),
            Self::ColorGrade(e) => e.resize(width, height),
        }
    }

    fn draw(
        &mut self,
        cmd: &mut dyn CommandList,
        scene: Option<&Arc<dyn ResourceView>>,
    ) -> GfxResult<()> {
        match self {
            Self::Bloom(e) => e.draw(cmd, scene),
            Self::Ssao(e) => e.draw(cmd, scene),
            Self::DepthOfField(e) => e.draw(cmd, scene),
            Self::Ssr(e) => e.draw(cmd, scene),
            Self::Sobel(e) => e.draw(cmd, scene),
            Self::GaussianBlur(e) => e.draw(cmd, scene),
            Self::ColorGrade(e) => e.draw(cmd, scene),
        }
    }
}
