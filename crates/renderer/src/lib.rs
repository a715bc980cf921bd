//! Renderer: wgpu init + depth + Phong-lit triangle meshes.
//! wgpu = 26.x, winit = 0.30.x

use std::sync::Arc;

use asset::{MeshData, MeshVertex};
use bytemuck::{Pod, Zeroable};
use corelib::{
    camera::OrbitCamera,
    light::PointLight,
    scene::{MeshHandle, Renderable, Scene},
};
use glam::{Mat4, Vec3};
use thiserror::Error;
use wgpu::{
    util::DeviceExt,
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, CompositeAlphaMode, DepthBiasState, DepthStencilState, Device,
    DeviceDescriptor, Extent3d, Features, FragmentState, Instance, InstanceDescriptor, Limits,
    LoadOp, Operations, PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    ShaderModuleDescriptor, ShaderSource, ShaderStages, StoreOp, Surface, SurfaceConfiguration,
    SurfaceError, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor, VertexBufferLayout, VertexState, VertexStepMode,
};
use winit::{dpi::PhysicalSize, window::Window};

/// Interleaved position/normal layout, 24-byte stride.
pub const MESH_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: MeshVertex::STRIDE,
    step_mode: VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
};

/// Per-frame UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    light_pos: [f32; 4],
    light_color: [f32; 4],
    view_pos: [f32; 4],
}

impl FrameUniform {
    fn new(camera: &OrbitCamera, aspect: f32, light: &PointLight) -> Self {
        Self {
            view_proj: camera.proj_view(aspect).to_cols_array_2d(),
            light_pos: light.position.extend(1.0).to_array(),
            light_color: light.color.extend(1.0).to_array(),
            view_pos: camera.position().extend(1.0).to_array(),
        }
    }
}

/// Per-object UBO.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
}

impl ObjectUniform {
    fn new(model: Mat4, color: Vec3) -> Self {
        // Inverse-transpose keeps normals perpendicular under non-uniform scale.
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            model
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
        }
    }
}

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
    #[error("mesh handle space exhausted (more than u32::MAX meshes)")]
    TooManyMeshes,
}

/// Uploaded mesh. Empty meshes have no buffer and are never drawn.
struct GpuMesh {
    vertex_buf: Option<Buffer>,
    vertex_count: u32,
}

/// Uniform buffer + bind group for one draw.
struct ObjectSlot {
    buf: Buffer,
    bg: BindGroup,
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    pipeline: RenderPipeline,
    meshes: Vec<GpuMesh>,

    // Uniforms
    frame_buf: Buffer,
    frame_bg: BindGroup,
    object_bgl: BindGroupLayout,
    object_slots: Vec<ObjectSlot>,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window>.
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends) -> Result<Self, RendererError> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("GPU adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RendererError::NoSurfaceFormat)?;

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Shaders ====
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Lit WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/lit.wgsl").into()),
        });

        // ==== Uniform layouts ====
        let frame_bgl = uniform_bgl(&device, "Frame BGL", ShaderStages::VERTEX_FRAGMENT);
        let object_bgl = uniform_bgl(&device, "Object BGL", ShaderStages::VERTEX_FRAGMENT);

        let frame_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame UBO"),
            contents: bytemuck::bytes_of(&FrameUniform::zeroed()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BG"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        // ==== Pipeline ====
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Lit PipelineLayout"),
            bind_group_layouts: &[&frame_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Lit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MESH_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            // OBJ faces wind counter-clockwise.
            primitive: wgpu::PrimitiveState {
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline,
            meshes: Vec::new(),
            frame_buf,
            frame_bg,
            object_bgl,
            object_slots: Vec::new(),
            depth_view,
            width,
            height,
        })
    }

    /// Upload a triangle list as a vertex buffer. Empty or oversized meshes
    /// get a handle but are never drawn.
    pub fn upload_mesh(&mut self, label: &str, mesh: &MeshData) -> Result<MeshHandle, RendererError> {
        let handle = u32::try_from(self.meshes.len())
            .map(MeshHandle)
            .map_err(|_| RendererError::TooManyMeshes)?;

        let vertex_count = drawable_vertex_count(mesh.vertex_count());
        match vertex_count {
            None if mesh.is_empty() => {
                log::warn!("Mesh '{}' has no triangles; it will not be drawn", label);
            }
            None => log::warn!(
                "Mesh '{}' has {} vertices (max {}); it will not be drawn",
                label,
                mesh.vertex_count(),
                u32::MAX
            ),
            Some(_) => {}
        }

        let vertex_buf = vertex_count.map(|_| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: mesh.as_bytes(),
                    usage: BufferUsages::VERTEX,
                })
        });
        self.meshes.push(GpuMesh {
            vertex_buf,
            vertex_count: vertex_count.unwrap_or(0),
        });
        Ok(handle)
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one frame: update uniforms + clear + draw every renderable.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &OrbitCamera,
        light: &PointLight,
    ) -> Result<(), SurfaceError> {
        let frame_uniform = FrameUniform::new(camera, self.aspect(), light);
        self.queue
            .write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(&frame_uniform));

        let draws: Vec<(Mat4, Renderable)> = scene
            .iter_renderables()
            .map(|(model, r)| (model, *r))
            .collect();
        self.ensure_object_slots(draws.len());
        for ((model, r), slot) in draws.iter().zip(&self.object_slots) {
            let uniform = ObjectUniform::new(*model, r.color);
            self.queue
                .write_buffer(&slot.buf, 0, bytemuck::bytes_of(&uniform));
        }

        // --- frame & pass
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.08,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.frame_bg, &[]);
            for ((_, r), slot) in draws.iter().zip(&self.object_slots) {
                let Some(mesh) = self.meshes.get(r.mesh.0 as usize) else {
                    continue;
                };
                let Some(vertex_buf) = mesh.vertex_buf.as_ref() else {
                    continue;
                };
                rpass.set_bind_group(1, &slot.bg, &[]);
                rpass.set_vertex_buffer(0, vertex_buf.slice(..));
                rpass.draw(0..mesh.vertex_count, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }

    /// Grow the per-object uniform pool; slots are reused across frames.
    fn ensure_object_slots(&mut self, count: usize) {
        while self.object_slots.len() < count {
            let buf = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Object UBO"),
                size: std::mem::size_of::<ObjectUniform>() as u64,
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Object BG"),
                layout: &self.object_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buf.as_entire_binding(),
                }],
            });
            self.object_slots.push(ObjectSlot { buf, bg });
        }
    }
}

/// Vertex count for a draw call; `None` for empty meshes and for meshes
/// whose count does not fit the `u32` draw range.
fn drawable_vertex_count(len: usize) -> Option<u32> {
    u32::try_from(len).ok().filter(|&n| n > 0)
}

fn uniform_bgl(device: &Device, label: &str, visibility: ShaderStages) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}
