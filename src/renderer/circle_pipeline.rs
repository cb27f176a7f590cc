//! SDF-based WebGPU render pipeline
//!
//! Draws the whole frame in the fragment shader: background fill plus a short
//! list of anti-aliased discs. The logical surface is letterboxed into the
//! physical target so dots keep their shape at any canvas size.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::sim::Bounds;

/// Maximum number of circles per frame (must match shader)
pub const MAX_CIRCLES: usize = 8;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    background: [f32; 4],   // offset 0
    resolution: [f32; 2],   // offset 16
    surface_size: [f32; 2], // offset 24
    circle_count: u32,      // offset 32
    _pad: [u32; 3],         // pad to 48 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CircleData {
    color: [f32; 4],  // offset 0
    center: [f32; 2], // offset 16
    radius: f32,      // offset 24
    _pad: f32,        // pad to 32 bytes (uniform array stride)
}

/// A disc to draw, in logical surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone)]
pub struct CircleFrame {
    pub bounds: Bounds,
    pub background: Color,
    pub circles: Vec<CircleShape>,
}

impl CircleFrame {
    fn globals(&self, resolution: (u32, u32)) -> Globals {
        Globals {
            background: self.background.to_linear_rgba(),
            resolution: [resolution.0 as f32, resolution.1 as f32],
            surface_size: [self.bounds.width, self.bounds.height],
            circle_count: self.circles.len().min(MAX_CIRCLES) as u32,
            _pad: [0; 3],
        }
    }

    fn circle_data(&self) -> [CircleData; MAX_CIRCLES] {
        let mut data = [CircleData::zeroed(); MAX_CIRCLES];
        for (slot, circle) in data.iter_mut().zip(&self.circles) {
            *slot = CircleData {
                color: circle.color.to_linear_rgba(),
                center: [circle.center.x, circle.center.y],
                radius: circle.radius,
                _pad: 0.0,
            };
        }
        data
    }
}

// ============================================================================
// RENDER STATE
// ============================================================================

pub struct CircleRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    circles_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl CircleRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("circle-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| Error::Surface(format!("failed to create device: {e}")))?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| Error::Surface("surface reports no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{}", width, height);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("circle_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("circle_shader.wgsl").into()),
        });

        let empty = CircleFrame {
            bounds: Bounds::new(width as f32, height as f32),
            background: Color::BLACK,
            circles: Vec::new(),
        };

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&empty.globals((width, height))),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let circles_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("circles"),
            contents: bytemuck::cast_slice(&empty.circle_data()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("circle_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("circle_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: circles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("circle_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("circle_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            circles_buffer,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn render(&mut self, frame: &CircleFrame) -> std::result::Result<(), wgpu::SurfaceError> {
        if frame.circles.len() > MAX_CIRCLES {
            log::warn!(
                "Dropping {} circles over the per-frame limit",
                frame.circles.len() - MAX_CIRCLES
            );
        }

        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&frame.globals(self.size)),
        );
        self.queue.write_buffer(
            &self.circles_buffer,
            0,
            bytemuck::cast_slice(&frame.circle_data()),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("circle_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("circle_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
