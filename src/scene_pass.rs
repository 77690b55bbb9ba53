//! Forward renderer for an assembled [`Scene`].
//!
//! # Architecture
//!
//! The pass uses two bind groups:
//! - **Group 0**: Scene uniforms (view-projection, camera position, sun,
//!   hemisphere light, and up to [`MAX_POINT_LIGHTS`] lamp lights)
//! - **Group 1**: Model uniforms (model matrix, normal matrix, material
//!   colours) at a dynamic offset into one buffer holding every draw
//!
//! Each distinct [`GeometryDescriptor`](crate::GeometryDescriptor) is
//! tessellated and uploaded once, then shared by every node using it.
//!
//! # Draw order
//!
//! Opaque meshes draw first, then blended ones back to front. Within each
//! group, lower `render_order` draws first, so window glass (order 1) lands
//! on top of its frame.
//!
//! # Pipelines
//!
//! One pipeline per combination of blending, face culling, depth writes,
//! and depth bias. Double-sided materials disable culling and the shader
//! flips back-face normals; materials with a depth offset use the biased
//! variants.
//!
//! Shadow maps are not rasterised. Cast/receive flags travel with the scene
//! and the selected shadow settings are logged at startup.

use std::collections::HashMap;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::geometry::GeometryKey;
use crate::gpu::GpuContext;
use crate::material::Material;
use crate::mesh::{Mesh, Vertex3d};
use crate::quality::QualitySettings;
use crate::scene::Scene;
use crate::scheduler::Renderer;

/// Lamp lights uploaded per frame; the nearest ones win.
pub const MAX_POINT_LIGHTS: usize = 64;

/// Model uniforms are padded to this stride for dynamic offsets.
const MODEL_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PointLightUniform {
    /// xyz world position, w range.
    position_range: [f32; 4],
    /// rgb linear colour, w intensity.
    color_intensity: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    /// xyz toward the sun, w intensity.
    sun_direction: [f32; 4],
    sun_color: [f32; 4],
    /// rgb sky colour, w hemisphere intensity.
    sky_color: [f32; 4],
    ground_color: [f32; 4],
    light_count: [u32; 4],
    lights: [PointLightUniform; MAX_POINT_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for non-uniform scales.
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
    /// x roughness, y metalness.
    surface: [f32; 4],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    blend: bool,
    double_sided: bool,
    depth_write: bool,
    depth_bias: bool,
}

impl PipelineKey {
    fn for_material(material: &Material) -> Self {
        Self {
            blend: material.transparent,
            double_sided: material.double_sided,
            depth_write: material.depth_write,
            depth_bias: material.depth_offset.is_some(),
        }
    }

    fn all() -> impl Iterator<Item = Self> {
        (0..16u8).map(|bits| Self {
            blend: bits & 1 != 0,
            double_sided: bits & 2 != 0,
            depth_write: bits & 4 != 0,
            depth_bias: bits & 8 != 0,
        })
    }
}

struct DrawItem {
    mesh: GeometryKey,
    material: Rc<Material>,
    world: Mat4,
    render_order: i32,
    distance: f32,
}

/// Draws a [`Scene`] to the window surface.
pub struct ScenePass {
    gpu: GpuContext,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    meshes: HashMap<GeometryKey, Mesh>,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_capacity: u64,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    default_material: Rc<Material>,
    frame_lost: bool,
}

impl ScenePass {
    pub fn new(gpu: GpuContext, quality: &QualitySettings) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let model_capacity = 1024;
        let (model_buffer, model_bind_group) =
            Self::create_model_buffer(device, &model_layout, model_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &model_layout],
            push_constant_ranges: &[],
        });

        let pipelines = PipelineKey::all()
            .map(|key| {
                let pipeline =
                    Self::create_pipeline(device, &pipeline_layout, &shader, gpu.config.format, key);
                (key, pipeline)
            })
            .collect();

        let depth_view = Self::create_depth_view(&gpu);
        let depth_size = (gpu.width(), gpu.height());

        log::info!(
            "scene pass ready ({}x{}); shadow maps not rasterised (tier asks for {}px {:?})",
            gpu.width(),
            gpu.height(),
            quality.shadow_map_size,
            quality.shadow_filter,
        );

        Self {
            gpu,
            pipelines,
            meshes: HashMap::new(),
            scene_buffer,
            scene_bind_group,
            model_layout,
            model_buffer,
            model_bind_group,
            model_capacity,
            depth_view,
            depth_size,
            default_material: Material::default().shared(),
            frame_lost: false,
        }
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut GpuContext {
        &mut self.gpu
    }

    /// Returns `true` once if the last render could not acquire a frame.
    pub fn take_frame_lost(&mut self) -> bool {
        std::mem::take(&mut self.frame_lost)
    }

    /// Number of distinct meshes uploaded so far.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn create_model_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: capacity * MODEL_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        key: PipelineKey,
    ) -> wgpu::RenderPipeline {
        let bias = if key.depth_bias {
            wgpu::DepthBiasState {
                constant: -1,
                slope_scale: -1.0,
                clamp: 0.0,
            }
        } else {
            wgpu::DepthBiasState::default()
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(if key.blend {
                        wgpu::BlendState::ALPHA_BLENDING
                    } else {
                        wgpu::BlendState::REPLACE
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: if key.double_sided {
                    None
                } else {
                    Some(wgpu::Face::Back)
                },
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: key.depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias,
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Ensures the depth buffer matches the current surface size.
    fn ensure_depth_size(&mut self) {
        let size = (self.gpu.width(), self.gpu.height());
        if self.depth_size != size {
            self.depth_view = Self::create_depth_view(&self.gpu);
            self.depth_size = size;
        }
    }

    fn ensure_model_capacity(&mut self, draws: usize) {
        let needed = draws as u64;
        if needed <= self.model_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        let (buffer, bind_group) =
            Self::create_model_buffer(&self.gpu.device, &self.model_layout, capacity);
        self.model_buffer = buffer;
        self.model_bind_group = bind_group;
        self.model_capacity = capacity;
        log::debug!("model uniform buffer grown to {capacity} draws");
    }

    /// Gathers drawable nodes, uploading any geometry not seen before.
    fn collect_draws(&mut self, scene: &Scene, eye: Vec3) -> Vec<DrawItem> {
        let mut draws = Vec::new();
        scene.for_each_drawable(|node| {
            let Some(geometry) = &node.geometry else {
                return;
            };
            let key = geometry.key();
            if !self.meshes.contains_key(&key) {
                let mesh = Mesh::from_raw(&self.gpu, &geometry.tessellate());
                self.meshes.insert(key.clone(), mesh);
            }
            let world = node.world_matrix();
            draws.push(DrawItem {
                mesh: key,
                material: node
                    .material
                    .clone()
                    .unwrap_or_else(|| self.default_material.clone()),
                world,
                render_order: node.render_order,
                distance: world.w_axis.truncate().distance_squared(eye),
            });
        });

        draws.sort_by(|a, b| {
            a.material
                .transparent
                .cmp(&b.material.transparent)
                .then(a.render_order.cmp(&b.render_order))
                .then_with(|| {
                    if a.material.transparent {
                        b.distance.total_cmp(&a.distance)
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
        });
        draws
    }

    fn scene_uniforms(scene: &Scene, camera: &Camera) -> SceneUniforms {
        let env = scene.environment();
        let eye = camera.position;

        let mut lamps = scene.point_lights();
        lamps.sort_by(|(a, _), (b, _)| {
            a.distance_squared(eye).total_cmp(&b.distance_squared(eye))
        });
        let mut lights = [PointLightUniform {
            position_range: [0.0; 4],
            color_intensity: [0.0; 4],
        }; MAX_POINT_LIGHTS];
        let count = lamps.len().min(MAX_POINT_LIGHTS);
        for (slot, (position, light)) in lights.iter_mut().zip(lamps) {
            let [r, g, b, _] = light.color.to_linear();
            *slot = PointLightUniform {
                position_range: [position.x, position.y, position.z, light.range],
                color_intensity: [r, g, b, light.intensity],
            };
        }

        let sun = env.sun.direction();
        let [sr, sg, sb, _] = env.sun.color.to_linear();
        let [kr, kg, kb, _] = env.hemisphere.sky.to_linear();

        SceneUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
            sun_direction: [sun.x, sun.y, sun.z, env.sun.intensity],
            sun_color: [sr, sg, sb, 1.0],
            sky_color: [kr, kg, kb, env.hemisphere.intensity],
            ground_color: env.hemisphere.ground.to_linear(),
            light_count: [count as u32, 0, 0, 0],
            lights,
        }
    }

    fn model_uniforms(draw: &DrawItem) -> ModelUniforms {
        let material = &draw.material;
        let [r, g, b, _] = material.color.to_linear();
        let [er, eg, eb, _] = material.emissive.to_linear();
        let intensity = material.emissive_intensity;
        let alpha = material.opacity * (1.0 - 0.5 * material.transmission);

        ModelUniforms {
            model: draw.world.to_cols_array_2d(),
            normal_matrix: draw.world.inverse().transpose().to_cols_array_2d(),
            color: [r, g, b, alpha],
            emissive: [er * intensity, eg * intensity, eb * intensity, 0.0],
            surface: [material.roughness, material.metalness, 0.0, 0.0],
        }
    }

    fn draw(&mut self, scene: &Scene, camera: &Camera) {
        self.ensure_depth_size();
        let draws = self.collect_draws(scene, camera.position);
        self.ensure_model_capacity(draws.len());

        let mut models = vec![0u8; draws.len() * MODEL_STRIDE as usize];
        for (i, draw) in draws.iter().enumerate() {
            let uniforms = Self::model_uniforms(draw);
            let bytes = bytemuck::bytes_of(&uniforms);
            let start = i * MODEL_STRIDE as usize;
            models[start..start + bytes.len()].copy_from_slice(bytes);
        }
        let queue = &self.gpu.queue;
        queue.write_buffer(&self.model_buffer, 0, &models);
        queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&Self::scene_uniforms(scene, camera)),
        );

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.gpu.reconfigure();
                self.frame_lost = true;
                return;
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                self.frame_lost = true;
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let [sky_r, sky_g, sky_b, _] = scene.environment().sky.to_linear();
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: sky_r as f64,
                            g: sky_g as f64,
                            b: sky_b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            let mut bound = None;
            for (i, draw) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.mesh) else {
                    continue;
                };
                let key = PipelineKey::for_material(&draw.material);
                if bound != Some(key) {
                    if let Some(pipeline) = self.pipelines.get(&key) {
                        pass.set_pipeline(pipeline);
                    }
                    bound = Some(key);
                }
                let offset = (i as u64 * MODEL_STRIDE) as u32;
                pass.set_bind_group(1, &self.model_bind_group, &[offset]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl Renderer for ScenePass {
    fn render(&mut self, scene: &Scene, camera: &Camera) {
        self.draw(scene, camera);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }
}
