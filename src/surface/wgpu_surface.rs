//! wgpu forward renderer
//!
//! Draws every visible [`Mesh`](crate::Mesh) in the scene with a single
//! Blinn-Phong pipeline lit by the scene's ambient and main directional
//! light. GPU buffers are cached per node and per geometry and pruned as soon
//! as their owner leaves the scene.

use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;
use wgpu::util::DeviceExt;

use crate::errors::{Result, VizError};
use crate::resources::geometry::Geometry;
use crate::scene::NodeKey;
use crate::settings::EngineSettings;
use crate::surface::{FrameView, RenderSurface};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GlobalsUniform {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    /// Direction the light travels, xyz.
    light_dir: [f32; 4],
    light_color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuObject {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Device, queue, surface and the cached scene resources.
struct GpuState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,

    geometries: FxHashMap<Uuid, GpuGeometry>,
    objects: FxHashMap<NodeKey, GpuObject>,
}

/// GPU surface bound to a window.
pub struct WgpuSurface {
    gpu: Option<GpuState>,
    width: u32,
    height: u32,
}

impl WgpuSurface {
    /// Creates the device and configures the window surface.
    pub async fn new<W>(window: W, width: u32, height: u32, settings: &EngineSettings) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| VizError::Initialization(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| VizError::Initialization(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("myth-viz device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or_else(|| {
                VizError::Initialization("surface not supported by adapter".to_string())
            })?;
        config.present_mode = if settings.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let globals_layout = uniform_layout(&device, "Globals Layout");
        let object_layout = uniform_layout(&device, "Object Layout");

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Uniform"),
            size: std::mem::size_of::<GlobalsUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline = create_pipeline(&device, config.format, &globals_layout, &object_layout);

        log::info!(
            "GPU surface ready: {}x{} {:?} ({:?})",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            gpu: Some(GpuState {
                device,
                queue,
                surface,
                config,
                depth_view,
                pipeline,
                globals_buffer,
                globals_bind_group,
                object_layout,
                geometries: FxHashMap::default(),
                objects: FxHashMap::default(),
            }),
            width,
            height,
        })
    }

    /// Blocking variant of [`new`](Self::new) for native hosts.
    pub fn new_blocking<W>(
        window: W,
        width: u32,
        height: u32,
        settings: &EngineSettings,
    ) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        pollster::block_on(Self::new(window, width, height, settings))
    }

    /// Number of cached (geometry, object) GPU resources.
    #[must_use]
    pub fn cache_sizes(&self) -> (usize, usize) {
        self.gpu
            .as_ref()
            .map_or((0, 0), |gpu| (gpu.geometries.len(), gpu.objects.len()))
    }
}

impl RenderSurface for WgpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        // A zero-sized surface cannot be configured; keep the last one.
        if width > 0 && height > 0 {
            gpu.config.width = width;
            gpu.config.height = height;
            gpu.surface.configure(&gpu.device, &gpu.config);
            gpu.depth_view = create_depth_view(&gpu.device, &gpu.config);
        }
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Err(VizError::Surface("surface already released".to_string()));
        };
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(e) => return Err(VizError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.write_globals(frame);
        let draws = gpu.prepare_objects(frame);

        let clear = frame.scene.background.unwrap_or(Vec4::ONE);
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear.x),
                            g: f64::from(clear.y),
                            b: f64::from(clear.z),
                            a: f64::from(clear.w),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&gpu.pipeline);
            pass.set_bind_group(0, &gpu.globals_bind_group, &[]);

            for (key, geometry_id) in &draws {
                let (Some(object), Some(geometry)) =
                    (gpu.objects.get(key), gpu.geometries.get(geometry_id))
                else {
                    continue;
                };
                pass.set_bind_group(1, &object.bind_group, &[]);
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..geometry.index_count, 0, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            log::debug!(
                "Releasing GPU surface ({} geometries, {} objects)",
                gpu.geometries.len(),
                gpu.objects.len()
            );
        }
    }
}

impl GpuState {
    fn write_globals(&self, frame: &FrameView<'_>) {
        let scene = frame.scene;
        let camera = frame.camera;

        let (light_dir, light_color) = scene
            .main_directional_light()
            .map_or((Vec4::ZERO, Vec4::ZERO), |light| {
                ((-light.direction()).extend(0.0), light.radiance().extend(1.0))
            });

        let globals = GlobalsUniform {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position().extend(1.0).to_array(),
            ambient: scene.ambient_radiance().extend(1.0).to_array(),
            light_dir: light_dir.to_array(),
            light_color: light_color.to_array(),
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    /// Uploads per-object data, creates missing buffers and prunes stale ones.
    fn prepare_objects(&mut self, frame: &FrameView<'_>) -> Vec<(NodeKey, Uuid)> {
        let mut draws = Vec::new();
        let mut live_geometries = FxHashSet::default();

        for (key, node) in frame.scene.iter() {
            let Some(mesh) = node.as_mesh() else {
                continue;
            };
            if !node.visible() || mesh.geometry.indices().is_empty() {
                continue;
            }

            let geometry = &mesh.geometry;
            live_geometries.insert(geometry.uuid);
            if !self.geometries.contains_key(&geometry.uuid) {
                let gpu_geometry = upload_geometry(&self.device, geometry);
                self.geometries.insert(geometry.uuid, gpu_geometry);
            }

            let model = node.transform().world_matrix_as_mat4();
            let normal_matrix = model.inverse().transpose();
            let material = &mesh.material;
            let uniform = ObjectUniform {
                model: model.to_cols_array_2d(),
                normal_matrix: normal_matrix.to_cols_array_2d(),
                color: material.color.to_array(),
                params: [material.metalness, material.roughness, 0.0, 0.0],
            };

            let device = &self.device;
            let layout = &self.object_layout;
            let object = self
                .objects
                .entry(key)
                .or_insert_with(|| create_object(device, layout));
            self.queue
                .write_buffer(&object.buffer, 0, bytemuck::bytes_of(&uniform));

            draws.push((key, geometry.uuid));
        }

        let live_nodes: FxHashSet<NodeKey> = draws.iter().map(|(key, _)| *key).collect();
        self.objects.retain(|key, _| live_nodes.contains(key));
        self.geometries.retain(|id, _| live_geometries.contains(id));

        draws
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    globals_layout: &wgpu::BindGroupLayout,
    object_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Mesh Pipeline Layout"),
        bind_group_layouts: &[globals_layout, object_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Mesh Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_geometry(device: &wgpu::Device, geometry: &Geometry) -> GpuGeometry {
    let vertices: Vec<Vertex> = geometry
        .positions()
        .iter()
        .zip(geometry.normals())
        .map(|(&position, &normal)| Vertex { position, normal })
        .collect();

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Geometry Vertices"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Geometry Indices"),
        contents: bytemuck::cast_slice(geometry.indices()),
        usage: wgpu::BufferUsages::INDEX,
    });

    GpuGeometry {
        vertex_buffer,
        index_buffer,
        index_count: geometry.indices().len() as u32,
    }
}

fn create_object(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> GpuObject {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Uniform"),
        size: std::mem::size_of::<ObjectUniform>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    GpuObject { buffer, bind_group }
}

impl std::fmt::Debug for WgpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("released", &self.gpu.is_none())
            .finish()
    }
}
