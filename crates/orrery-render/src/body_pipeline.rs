//! Pipelines for sphere bodies: opaque (emissive or point-lit) and
//! translucent shells.
//!
//! Every body draw gets its own slot in one uniform buffer, selected with a
//! dynamic offset, so a whole frame uploads with a single `write_buffer`.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::buffer::{BufferAllocator, VertexPositionNormalUv};
use crate::depth::DepthBuffer;
use crate::draw::{Pass, ShaderParams, param};

/// Per-draw uniform block. Scalars ride in the `w` lanes of the vectors.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// rgb tint, a alpha
    pub color: [f32; 4],
    /// xyz camera position, w shininess
    pub view_position: [f32; 4],
    /// xyz position, w constant attenuation
    pub light_position: [f32; 4],
    /// xyz ambient, w linear attenuation
    pub light_ambient: [f32; 4],
    /// xyz diffuse, w quadratic attenuation
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub dir_light_direction: [f32; 4],
    pub dir_light_ambient: [f32; 4],
    pub dir_light_diffuse: [f32; 4],
    /// x emissive, y blinn
    pub flags: [u32; 4],
}

impl BodyUniform {
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<Self>() as wgpu::BufferAddress;

    /// Pack draw parameters. Missing values fall back to identity matrices,
    /// white, opaque, and a light with no attenuation.
    pub fn from_params(pass: Pass, params: &ShaderParams) -> Self {
        let mat = |name| params.get_mat4(name).unwrap_or(Mat4::IDENTITY).to_cols_array_2d();
        let vec = |name, default: Vec3| params.get_vec3(name).unwrap_or(default);
        let float = |name, default: f32| params.get_float(name).unwrap_or(default);
        let lane = |v: Vec3, w: f32| [v.x, v.y, v.z, w];

        Self {
            model: mat(param::MODEL),
            view: mat(param::VIEW),
            projection: mat(param::PROJECTION),
            color: lane(vec(param::COLOR, Vec3::ONE), float(param::ALPHA, 1.0)),
            view_position: lane(
                vec(param::VIEW_POSITION, Vec3::ZERO),
                float(param::SHININESS, 32.0),
            ),
            light_position: lane(
                vec(param::LIGHT_POSITION, Vec3::ZERO),
                float(param::LIGHT_CONSTANT, 1.0),
            ),
            light_ambient: lane(
                vec(param::LIGHT_AMBIENT, Vec3::ZERO),
                float(param::LIGHT_LINEAR, 0.0),
            ),
            light_diffuse: lane(
                vec(param::LIGHT_DIFFUSE, Vec3::ONE),
                float(param::LIGHT_QUADRATIC, 0.0),
            ),
            light_specular: lane(vec(param::LIGHT_SPECULAR, Vec3::ZERO), 0.0),
            dir_light_direction: lane(vec(param::DIR_LIGHT_DIRECTION, Vec3::ZERO), 0.0),
            dir_light_ambient: lane(vec(param::DIR_LIGHT_AMBIENT, Vec3::ZERO), 0.0),
            dir_light_diffuse: lane(vec(param::DIR_LIGHT_DIFFUSE, Vec3::ZERO), 0.0),
            flags: [
                u32::from(pass == Pass::Emissive),
                u32::from(params.get_bool(param::BLINN).unwrap_or(false)),
                0,
                0,
            ],
        }
    }
}

/// Distance between consecutive uniform slots for the given device alignment.
pub fn uniform_stride(min_alignment: u32) -> wgpu::BufferAddress {
    let align = wgpu::BufferAddress::from(min_alignment.max(1));
    BodyUniform::SIZE.div_ceil(align) * align
}

pub struct BodyPipeline {
    pub opaque: wgpu::RenderPipeline,
    pub translucent: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: wgpu::BufferAddress,
    capacity: usize,
}

impl BodyPipeline {
    /// Initial number of per-draw uniform slots.
    const INITIAL_CAPACITY: usize = 16;

    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("body-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(BodyUniform::SIZE),
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let opaque = create_body_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            "body-opaque-pipeline",
            DepthBuffer::opaque_state(),
            None,
        );
        let translucent = create_body_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            "body-translucent-pipeline",
            DepthBuffer::read_only_state(),
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );

        let stride = uniform_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (uniform_buffer, bind_group) =
            create_slots(device, &bind_group_layout, stride, Self::INITIAL_CAPACITY);

        Self {
            opaque,
            translucent,
            bind_group_layout,
            uniform_buffer,
            bind_group,
            stride,
            capacity: Self::INITIAL_CAPACITY,
        }
    }

    /// Upload one uniform per draw, growing the slot buffer when needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, uniforms: &[BodyUniform]) {
        if uniforms.is_empty() {
            return;
        }
        if uniforms.len() > self.capacity {
            let capacity = uniforms.len().next_power_of_two();
            log::debug!("Growing body uniform slots {} -> {capacity}", self.capacity);
            let (buffer, bind_group) =
                create_slots(device, &self.bind_group_layout, self.stride, capacity);
            self.uniform_buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = capacity;
        }

        let stride = self.stride as usize;
        let mut bytes = vec![0u8; stride * uniforms.len()];
        for (slot, uniform) in bytes.chunks_exact_mut(stride).zip(uniforms) {
            slot[..BodyUniform::SIZE as usize].copy_from_slice(bytemuck::bytes_of(uniform));
        }
        queue.write_buffer(&self.uniform_buffer, 0, &bytes);
    }

    /// Bind the uniform slot for draw number `slot`.
    pub fn bind_slot(&self, render_pass: &mut wgpu::RenderPass<'_>, slot: usize) {
        let offset = (slot as wgpu::BufferAddress * self.stride) as wgpu::DynamicOffset;
        render_pass.set_bind_group(0, &self.bind_group, &[offset]);
    }
}

fn create_slots(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: wgpu::BufferAddress,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = BufferAllocator::new(device)
        .create_uniform_buffer("body-uniforms", stride * capacity as wgpu::BufferAddress);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("body-bind-group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(BodyUniform::SIZE),
            }),
        }],
    });
    (buffer, bind_group)
}

fn create_body_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    label: &'static str,
    depth_stencil: wgpu::DepthStencilState,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[VertexPositionNormalUv::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(depth_stencil),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// WGSL for all body variants.
pub const BODY_SHADER_SOURCE: &str = r#"
struct Body {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    color: vec4<f32>,
    view_position: vec4<f32>,
    light_position: vec4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
    dir_light_direction: vec4<f32>,
    dir_light_ambient: vec4<f32>,
    dir_light_diffuse: vec4<f32>,
    flags: vec4<u32>,
};

@group(0) @binding(0)
var<uniform> body: Body;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = body.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = body.projection * body.view * world;
    out.world_position = world.xyz;
    // Uniform scale only, so the model matrix also transforms normals.
    out.normal = (body.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

// Latitude bands stand in for surface textures.
fn surface_color(uv: vec2<f32>) -> vec3<f32> {
    let band = 0.88 + 0.12 * sin(uv.y * 40.0);
    return body.color.rgb * band;
}

fn point_light(base: vec3<f32>, normal: vec3<f32>, frag: vec3<f32>, view_dir: vec3<f32>) -> vec3<f32> {
    let to_light = body.light_position.xyz - frag;
    let distance = length(to_light);
    let light_dir = to_light / max(distance, 1e-5);
    let shininess = body.view_position.w;

    let diff = max(dot(normal, light_dir), 0.0);
    var spec = 0.0;
    if (body.flags.y != 0u) {
        let halfway = normalize(light_dir + view_dir);
        spec = pow(max(dot(normal, halfway), 0.0), shininess);
    } else {
        let reflected = reflect(-light_dir, normal);
        spec = pow(max(dot(view_dir, reflected), 0.0), shininess);
    }

    let constant = body.light_position.w;
    let linear = body.light_ambient.w;
    let quadratic = body.light_diffuse.w;
    let attenuation = 1.0 / (constant + linear * distance + quadratic * distance * distance);

    let ambient = body.light_ambient.xyz * base;
    let diffuse = body.light_diffuse.xyz * diff * base;
    let specular = body.light_specular.xyz * spec * base;
    return (ambient + diffuse + specular) * attenuation;
}

fn directional_light(base: vec3<f32>, normal: vec3<f32>) -> vec3<f32> {
    let ambient = body.dir_light_ambient.xyz * base;
    let direction = body.dir_light_direction.xyz;
    if (dot(direction, direction) < 1e-10) {
        return ambient;
    }
    let diff = max(dot(normal, normalize(-direction)), 0.0);
    return ambient + body.dir_light_diffuse.xyz * diff * base;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = surface_color(in.uv);
    if (body.flags.x != 0u) {
        return vec4<f32>(base, body.color.a);
    }
    let normal = normalize(in.normal);
    let view_dir = normalize(body.view_position.xyz - in.world_position);
    let lit = point_light(base, normal, in.world_position, view_dir)
        + directional_light(base, normal);
    return vec4<f32>(lit, body.color.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::create_test_device;

    #[test]
    fn test_uniform_size_is_vec4_aligned() {
        assert_eq!(BodyUniform::SIZE, 352);
        assert_eq!(BodyUniform::SIZE % 16, 0);
    }

    #[test]
    fn test_stride_rounds_up_to_alignment() {
        assert_eq!(uniform_stride(256), 512);
        assert_eq!(uniform_stride(64), 384);
        assert_eq!(uniform_stride(0), 352);
    }

    #[test]
    fn test_from_params_packs_lanes() {
        let mut params = ShaderParams::new();
        params
            .set_vec3(param::COLOR, Vec3::new(0.5, 0.6, 0.7))
            .set_float(param::ALPHA, 0.1)
            .set_float(param::SHININESS, 128.0)
            .set_float(param::LIGHT_LINEAR, 0.09)
            .set_float(param::LIGHT_QUADRATIC, 0.001)
            .set_bool(param::BLINN, true);
        let u = BodyUniform::from_params(Pass::Translucent, &params);
        assert_eq!(u.color, [0.5, 0.6, 0.7, 0.1]);
        assert_eq!(u.view_position[3], 128.0);
        assert_eq!(u.light_ambient[3], 0.09);
        assert_eq!(u.light_diffuse[3], 0.001);
        assert_eq!(u.flags, [0, 1, 0, 0]);
    }

    #[test]
    fn test_from_params_defaults() {
        let u = BodyUniform::from_params(Pass::Emissive, &ShaderParams::new());
        assert_eq!(u.model, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(u.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(u.light_position[3], 1.0);
        assert_eq!(u.flags[0], 1);
    }

    #[test]
    fn test_pipeline_creation_succeeds() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut pipeline = BodyPipeline::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb);
        let uniforms = vec![BodyUniform::from_params(Pass::Lit, &ShaderParams::new()); 40];
        pipeline.upload(&device, &queue, &uniforms);
        assert_eq!(pipeline.capacity, 64);
    }
}
