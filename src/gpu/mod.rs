mod mesh;
mod texture;

use std::sync::Arc;

use glam::{Mat4, Vec2};
use wgpu::util::DeviceExt;
use winit::window::{CursorIcon, Window};

use crate::assets::SceneAssets;
use crate::camera::Camera;
use crate::config::{CardConfig, LanyardConfig, LightConfig};
use crate::error::GpuError;
use crate::interaction::CursorHint;
use crate::material::{BandMaterial, BandTexture};
use crate::render::RenderSink;
use crate::shader::{FRAGMENT_ENTRY, MESH_SHADER, VERTEX_ENTRY};
use crate::textures::TextureConfig;
use crate::tube::TubeMesh;
use crate::uniforms::{ObjectUniforms, SceneUniforms};

use mesh::GpuMesh;
use texture::GpuTexture;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// wgpu renderer for the card and band.
///
/// Holds the last state pushed through [`RenderSink`] and draws it on
/// [`present`](RenderSink::present): the card first, then the translucent
/// band.
pub struct GpuState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    depth_texture: wgpu::TextureView,

    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    camera: Camera,
    lights: LightConfig,

    band_buffer: wgpu::Buffer,
    band_lanyard_bind_group: Option<wgpu::BindGroup>,
    band_gradient_bind_group: wgpu::BindGroup,
    band_mesh: Option<GpuMesh>,
    band_material: BandMaterial,
    uv_repeat: Vec2,

    card_buffer: wgpu::Buffer,
    card_bind_group: wgpu::BindGroup,
    card_mesh: Option<GpuMesh>,
    card_transform: Mat4,
    card_config: CardConfig,

    cursor: CursorHint,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, scene: &LanyardConfig, assets: &SceneAssets) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        // Group 0: camera and lights
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

        // Group 1: object uniforms, base map, sampler
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let camera = Camera::new(&scene.camera, config.width as f32 / config.height as f32);
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::new(&camera, &scene.lights)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let band_material = scene.band.base_material;
        let band_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Band Uniform Buffer"),
            contents: bytemuck::bytes_of(&ObjectUniforms::band(&band_material, scene.band.uv_repeat)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let gradient = GpuTexture::upload(&device, &queue, &assets.gradient, "Band Gradient");
        let band_gradient_bind_group = create_object_bind_group(&device, &object_layout, &band_buffer, &gradient, "Band Gradient");
        let band_lanyard_bind_group = assets.band_texture.as_ref().map(|tex| {
            let lanyard = GpuTexture::upload(&device, &queue, tex, "Band Lanyard");
            create_object_bind_group(&device, &object_layout, &band_buffer, &lanyard, "Band Lanyard")
        });

        let card_transform = assets.card.transform();
        let card_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Card Uniform Buffer"),
            contents: bytemuck::bytes_of(&ObjectUniforms::card(card_transform, &scene.card)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let white = GpuTexture::upload(&device, &queue, &TextureConfig::solid(255, 255, 255, 255), "Card White");
        let card_bind_group = create_object_bind_group(&device, &object_layout, &card_buffer, &white, "Card");
        let card_mesh = GpuMesh::new(&device, &assets.card.mesh.vertices, &assets.card.mesh.indices, "Card Mesh");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(MESH_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[mesh::vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The band is seen from both sides.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            depth_texture,
            scene_buffer,
            scene_bind_group,
            camera,
            lights: scene.lights.clone(),
            band_buffer,
            band_lanyard_bind_group,
            band_gradient_bind_group,
            band_mesh: None,
            band_material,
            uv_repeat: scene.band.uv_repeat,
            card_buffer,
            card_bind_group,
            card_mesh,
            card_transform,
            card_config: scene.card.clone(),
            cursor: CursorHint::Default,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
            self.camera.set_viewport(new_size.width, new_size.height);
        }
    }

    /// Reconfigure the surface at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn band_bind_group(&self) -> &wgpu::BindGroup {
        match self.band_material.map {
            BandTexture::Lanyard => self
                .band_lanyard_bind_group
                .as_ref()
                .unwrap_or(&self.band_gradient_bind_group),
            BandTexture::Gradient => &self.band_gradient_bind_group,
        }
    }

    fn write_uniforms(&self) {
        self.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms::new(&self.camera, &self.lights)),
        );
        self.queue.write_buffer(
            &self.band_buffer,
            0,
            bytemuck::bytes_of(&ObjectUniforms::band(&self.band_material, self.uv_repeat)),
        );
        self.queue.write_buffer(
            &self.card_buffer,
            0,
            bytemuck::bytes_of(&ObjectUniforms::card(self.card_transform, &self.card_config)),
        );
    }
}

impl RenderSink for GpuState {
    type Error = wgpu::SurfaceError;

    fn replace_band_mesh(&mut self, mesh: &TubeMesh) {
        self.band_mesh = GpuMesh::new(&self.device, &mesh.vertices, &mesh.indices, "Band Mesh");
    }

    fn set_card_transform(&mut self, transform: Mat4) {
        self.card_transform = transform;
    }

    fn set_band_material(&mut self, material: &BandMaterial) {
        self.band_material = *material;
    }

    fn set_cursor(&mut self, cursor: CursorHint) {
        if cursor == self.cursor {
            return;
        }
        self.cursor = cursor;
        let icon = match cursor {
            CursorHint::Default => CursorIcon::Default,
            CursorHint::Grab => CursorIcon::Grab,
            CursorHint::Grabbing => CursorIcon::Grabbing,
        };
        self.window.set_cursor(icon);
    }

    fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.write_uniforms();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

            if let Some(card) = &self.card_mesh {
                render_pass.set_bind_group(1, &self.card_bind_group, &[]);
                card.draw(&mut render_pass);
            }
            if let Some(band) = &self.band_mesh {
                render_pass.set_bind_group(1, self.band_bind_group(), &[]);
                band.draw(&mut render_pass);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniforms: &wgpu::Buffer,
    texture: &GpuTexture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

fn create_depth_texture(
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
