//! wgpu renderer shared by the web and native front-ends.
//!
//! Tubes and pulse rings are drawn additively into an HDR target, then a
//! bright pass, a separable blur and a tone-mapped composite produce the
//! bloom on the swapchain.

mod helpers;
mod post;
mod targets;
mod trail;

use post::{PostBindGroups, PostPass, PostResources, PostUniforms};
use targets::RenderTargets;
use trail::{SceneUniforms, TrailPasses};
use trail_core::{Camera, FrameResources};

pub use trail::{GpuTube, MeshFactory, RingInstance};

pub const BLOOM_STRENGTH: f32 = 0.9;
pub const BLOOM_THRESHOLD: f32 = 0.6;
pub const EXPOSURE: f32 = 1.0;
/// Scales fragment color before bloom so the tube core exceeds the threshold.
pub const HDR_GAIN: f32 = 1.6;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    config: wgpu::SurfaceConfiguration,
    factory: MeshFactory,
    passes: TrailPasses,
    targets: RenderTargets,
    post: PostResources,
    post_bgs: PostBindGroups,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'a>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits so older WebGPU implementations accept the request
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {:?} {}x{}", format, width, height);

        let targets = RenderTargets::new(&device, width, height);
        let post = post::create_post_resources(&device, format);
        let post_bgs = post.bind_groups(&device, &targets);
        let factory = MeshFactory::new(device, queue);
        let passes = TrailPasses::new(&factory);

        Ok(Self {
            surface,
            config,
            factory,
            passes,
            targets,
            post,
            post_bgs,
            width,
            height,
        })
    }

    /// Backend to hand to the session each frame.
    pub fn factory_mut(&mut self) -> &mut MeshFactory {
        &mut self.factory
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            let device = self.factory.device();
            self.surface.configure(device, &self.config);
            self.targets.recreate(device, width, height);
            self.post_bgs = self.post.bind_groups(device, &self.targets);
            log::debug!("[gpu] resized {}x{}", width, height);
        }
    }

    /// Reconfigure the surface at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(self.factory.device(), &self.config);
    }

    pub fn render(
        &mut self,
        resources: &FrameResources<MeshFactory>,
        camera: &Camera,
        time_sec: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let scene = SceneUniforms::new(
            camera.view_proj(),
            self.factory.palette(),
            HDR_GAIN,
            time_sec,
        );
        self.passes.write_scene(self.factory.queue(), &scene);
        self.passes.write_rings(&self.factory, resources.rings());

        let res = self.targets.bloom_size();
        let uniforms = |blur_dir: [f32; 2]| PostUniforms {
            resolution: res,
            time: time_sec,
            exposure: EXPOSURE,
            blur_dir,
            bloom_strength: BLOOM_STRENGTH,
            threshold: BLOOM_THRESHOLD,
        };
        let queue = self.factory.queue();
        self.post.write(queue, PostPass::Bright, &uniforms([0.0, 0.0]));
        self.post.write(queue, PostPass::BlurH, &uniforms([1.0, 0.0]));
        self.post.write(queue, PostPass::BlurV, &uniforms([0.0, 1.0]));
        self.post
            .write(queue, PostPass::Composite, &uniforms([0.0, 0.0]));

        let mut encoder =
            self.factory
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("encoder"),
                });

        // Pass 1: tubes and rings → hdr
        self.passes.draw(
            &mut encoder,
            &self.targets.hdr_view,
            CLEAR_COLOR,
            resources.tubes(),
            resources.rings().len(),
        );

        // Pass 2: bright pass → bloom_a
        post::blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.post_bgs.bright,
            None,
        );

        // Pass 3: blur horizontal bloom_a → bloom_b
        post::blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.post_bgs.blur_h,
            None,
        );

        // Pass 4: blur vertical bloom_b → bloom_a
        post::blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.post_bgs.blur_v,
            None,
        );

        // Pass 5: composite to swapchain
        post::blit(
            &mut encoder,
            "composite",
            &view,
            CLEAR_COLOR,
            &self.post.composite_pipeline,
            &self.post_bgs.composite,
            Some(&self.post_bgs.bloom_a_only),
        );

        self.factory.queue().submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
