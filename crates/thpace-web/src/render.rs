use crate::constants::{MAX_FRAME_LATENCY, PARTICLE_QUAD_VERTICES};
use thpace_core::{RenderError, Renderer, Scene, Uniform};
use web_sys as web;
use wgpu::util::DeviceExt;

pub(crate) mod packing;
mod pipelines;

use packing::{FrameClock, FrameUniforms};

static BACKGROUND_WGSL: &str = include_str!("../shaders/background.wgsl");

struct InFlight {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

struct Upload {
    buffer: wgpu::Buffer,
    count: u32,
}

pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    mesh_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    uniforms: FrameUniforms,
    clock: FrameClock,
    mesh: Option<Upload>,
    particles: Option<Upload>,
    in_flight: Option<InFlight>,
}

impl GpuRenderer {
    pub async fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        // Colors are sRGB-encoded CSS values already; write them untouched.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: MAX_FRAME_LATENCY,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background_shader"),
            source: wgpu::ShaderSource::Wgsl(BACKGROUND_WGSL.into()),
        });
        let frame = pipelines::create_frame_resources(&device);
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("background_pl"),
            bind_group_layouts: &[&frame.layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = pipelines::make_pipeline(
            &device,
            "mesh_pipeline",
            &layout,
            &shader,
            ("vs_mesh", "fs_mesh"),
            &[pipelines::mesh_layout()],
            format,
        );
        let particle_pipeline = pipelines::make_pipeline(
            &device,
            "particle_pipeline",
            &layout,
            &shader,
            ("vs_particle", "fs_particle"),
            &[pipelines::particle_layout()],
            format,
        );

        log::info!("webgpu renderer ready ({:?}, {}x{})", format, width, height);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            mesh_pipeline,
            particle_pipeline,
            frame_buffer: frame.buffer,
            frame_bind_group: frame.bind_group,
            uniforms: FrameUniforms {
                resolution: [width as f32, height as f32],
                ..FrameUniforms::default()
            },
            clock: FrameClock::default(),
            mesh: None,
            particles: None,
            in_flight: None,
        })
    }

    fn upload<T: bytemuck::Pod>(&self, label: &str, data: &[T]) -> Option<Upload> {
        if data.is_empty() {
            return None;
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        Some(Upload {
            buffer,
            count: data.len() as u32,
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

fn pass<'e>(
    frame: &'e mut InFlight,
    label: &str,
    load: wgpu::LoadOp<wgpu::Color>,
) -> wgpu::RenderPass<'e> {
    frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &frame.view,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

impl Renderer for GpuRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.reconfigure();
        }
        self.uniforms.resolution = [width as f32, height as f32];
    }

    fn upload_mesh(&mut self, scene: &Scene<'_>) {
        let vertices = packing::mesh_vertices(scene.points, scene.mesh);
        self.mesh = self.upload("mesh_vertices", &vertices);
    }

    fn upload_colors(&mut self, scene: &Scene<'_>) {
        let vertices = packing::mesh_vertices(scene.points, scene.mesh);
        match &self.mesh {
            Some(m) if m.count as usize == vertices.len() => {
                self.queue
                    .write_buffer(&m.buffer, 0, bytemuck::cast_slice(&vertices));
            }
            _ => self.mesh = self.upload("mesh_vertices", &vertices),
        }
    }

    fn upload_particles(&mut self, scene: &Scene<'_>) {
        let instances = packing::particle_instances(scene.particles);
        match &self.particles {
            Some(p) if p.count as usize == instances.len() => {
                self.queue
                    .write_buffer(&p.buffer, 0, bytemuck::cast_slice(&instances));
            }
            _ => self.particles = self.upload("particle_instances", &instances),
        }
    }

    fn set_uniform(&mut self, uniform: Uniform, value: f64) {
        self.uniforms.set(uniform, value);
    }

    fn cpu_motion(&self) -> bool {
        false
    }

    fn begin_frame(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        self.uniforms.time = self.clock.elapsed(scene.now_ms);
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&self.uniforms));
        let texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                return Err(RenderError::Surface("surface lost, reconfigured".into()));
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        self.in_flight = Some(InFlight {
            texture,
            view,
            encoder,
        });
        Ok(())
    }

    fn draw_mesh(&mut self, _scene: &Scene<'_>) -> Result<(), RenderError> {
        let frame = self
            .in_flight
            .as_mut()
            .ok_or_else(|| RenderError::Backend("no frame in flight".into()))?;
        let mut rpass = pass(frame, "mesh_pass", wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT));
        if let Some(mesh) = &self.mesh {
            rpass.set_pipeline(&self.mesh_pipeline);
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.buffer.slice(..));
            rpass.draw(0..mesh.count, 0..1);
        }
        Ok(())
    }

    fn draw_particles(&mut self, _scene: &Scene<'_>) -> Result<(), RenderError> {
        let frame = self
            .in_flight
            .as_mut()
            .ok_or_else(|| RenderError::Backend("no frame in flight".into()))?;
        let mut rpass = pass(frame, "particle_pass", wgpu::LoadOp::Load);
        if let Some(particles) = &self.particles {
            rpass.set_pipeline(&self.particle_pipeline);
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            rpass.set_vertex_buffer(0, particles.buffer.slice(..));
            rpass.draw(0..PARTICLE_QUAD_VERTICES, 0..particles.count);
        }
        Ok(())
    }

    fn end_frame(&mut self, _scene: &Scene<'_>) -> Result<(), RenderError> {
        let frame = self
            .in_flight
            .take()
            .ok_or_else(|| RenderError::Backend("no frame in flight".into()))?;
        self.queue.submit(Some(frame.encoder.finish()));
        frame.texture.present();
        Ok(())
    }
}
