//! Star backdrop: a fullscreen triangle at the far plane that reconstructs
//! the view direction per pixel and scatters procedural stars over it.
//!
//! Only the camera's rotation reaches the shader, so the stars stay put
//! while the observer flies around.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::depth::DepthBuffer;
use crate::draw::{ShaderParams, param};

/// Star scatter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarfieldParams {
    /// Grid cells per unit of view direction; higher means smaller, denser stars.
    pub density: f32,
    /// Chance that a cell holds a star.
    pub probability: f32,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            density: 220.0,
            probability: 0.004,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SkyboxUniform {
    /// Inverse of projection times rotation-only view.
    pub inv_view_proj: [[f32; 4]; 4],
    /// x density, y probability.
    pub params: [f32; 4],
}

impl SkyboxUniform {
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<Self>() as wgpu::BufferAddress;

    /// Build from a skybox draw's view and projection. Any translation in
    /// the view matrix is dropped.
    pub fn from_params(params: &ShaderParams, starfield: StarfieldParams) -> Self {
        let mut view = params.get_mat4(param::VIEW).unwrap_or(Mat4::IDENTITY);
        view.w_axis = Vec4::W;
        let projection = params.get_mat4(param::PROJECTION).unwrap_or(Mat4::IDENTITY);
        Self {
            inv_view_proj: (projection * view).inverse().to_cols_array_2d(),
            params: [starfield.density, starfield.probability, 0.0, 0.0],
        }
    }
}

pub const SKYBOX_SHADER_SOURCE: &str = r#"
struct SkyboxUniform {
    inv_view_proj: mat4x4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> skybox: SkyboxUniform;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_skybox(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    let ndc = uv * 2.0 - 1.0;

    var out: VertexOutput;
    // z = 1 sits exactly on the cleared depth, behind every body.
    out.position = vec4<f32>(ndc.x, ndc.y, 1.0, 1.0);
    out.ndc = ndc;
    return out;
}

fn hash3(p: vec3<f32>) -> f32 {
    let q = fract(p * vec3<f32>(0.1031, 0.1030, 0.0973));
    let r = q + dot(q, q.yxz + 33.33);
    return fract((r.x + r.y) * r.z);
}

@fragment
fn fs_skybox(in: VertexOutput) -> @location(0) vec4<f32> {
    let world = skybox.inv_view_proj * vec4<f32>(in.ndc, 1.0, 1.0);
    let dir = normalize(world.xyz / world.w);

    let density = skybox.params.x;
    let probability = skybox.params.y;
    let p = dir * density;
    let cell = floor(p);

    if (hash3(cell) >= probability) {
        return vec4<f32>(0.0);
    }

    let center = cell + 0.5;
    let falloff = 1.0 - smoothstep(0.05, 0.35, length(p - center));
    let brightness = 0.5 + 0.5 * hash3(cell + 17.0);
    let tint = mix(vec3<f32>(0.8, 0.85, 1.0), vec3<f32>(1.0, 0.9, 0.75), hash3(cell + 41.0));
    return vec4<f32>(tint * brightness, falloff);
}
"#;

pub struct SkyboxPipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    starfield: StarfieldParams,
}

impl SkyboxPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        starfield: StarfieldParams,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("skybox-shader"),
            source: wgpu::ShaderSource::Wgsl(SKYBOX_SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(SkyboxUniform::SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("skybox-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("skybox-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_skybox"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::read_only_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_skybox"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // Stars blend over the clear color.
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let uniform = SkyboxUniform::from_params(&ShaderParams::new(), starfield);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skybox-uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skybox-uniform-bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::info!(
            "Skybox initialized: star density {}, probability {}",
            starfield.density,
            starfield.probability
        );

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            starfield,
        }
    }

    pub fn starfield(&self) -> StarfieldParams {
        self.starfield
    }

    /// Upload the camera for this frame's skybox draw.
    pub fn update(&self, queue: &wgpu::Queue, params: &ShaderParams) {
        let uniform = SkyboxUniform::from_params(params, self.starfield);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
