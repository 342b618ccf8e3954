//! The wgpu [`MeshDrawer`]: collects a frame of draw calls, then encodes
//! them into a single render pass in pass order.

use crate::body_pipeline::{BodyPipeline, BodyUniform};
use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::depth::DepthBuffer;
use crate::draw::{DrawCall, MeshDrawer, MeshKind, Pass};
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder, clear_color_from_rgb};
use crate::skybox::{SkyboxPipeline, StarfieldParams};
use crate::sphere::uv_sphere;

pub struct GpuDrawer {
    sphere: MeshBuffer,
    bodies: BodyPipeline,
    skybox: SkyboxPipeline,
    depth: DepthBuffer,
    clear_color: [f32; 3],
    calls: Vec<DrawCall>,
}

impl GpuDrawer {
    pub fn new(
        ctx: &RenderContext,
        sphere_segments: u32,
        sphere_rings: u32,
        starfield: StarfieldParams,
    ) -> Self {
        let mesh = uv_sphere(sphere_segments, sphere_rings);
        let sphere =
            BufferAllocator::new(&ctx.device).create_mesh("sphere", &mesh.vertices, &mesh.indices);
        log::info!(
            "Sphere mesh uploaded: {} vertices, {} indices",
            mesh.vertices.len(),
            mesh.indices.len()
        );

        Self {
            sphere,
            bodies: BodyPipeline::new(&ctx.device, ctx.surface_format),
            skybox: SkyboxPipeline::new(&ctx.device, ctx.surface_format, starfield),
            depth: DepthBuffer::new(
                &ctx.device,
                ctx.surface_config.width,
                ctx.surface_config.height,
            ),
            clear_color: [0.0; 3],
            calls: Vec::new(),
        }
    }

    /// Match the depth buffer to a resized surface.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Draw everything recorded since `begin_frame` and present it.
    ///
    /// Opaque bodies go first with depth writes, then translucent shells,
    /// then the sky at the far plane.
    pub fn present(&mut self, ctx: &RenderContext) -> Result<(), SurfaceError> {
        order_calls(&mut self.calls);

        let uniforms: Vec<BodyUniform> = self
            .calls
            .iter()
            .filter(|call| is_body(call))
            .map(|call| BodyUniform::from_params(call.pass, &call.params))
            .collect();
        self.bodies.upload(&ctx.device, &ctx.queue, &uniforms);
        if let Some(sky) = self.calls.iter().find(|call| call.pass == Pass::Skybox) {
            self.skybox.update(&ctx.queue, &sky.params);
        }

        let surface_texture = ctx.get_current_texture()?;
        let mut frame = FrameEncoder::new(&ctx.device, surface_texture);
        let builder = RenderPassBuilder::new()
            .clear_color(clear_color_from_rgb(self.clear_color))
            .depth(DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");

        {
            let mut pass = frame.begin_render_pass(&builder, Some(&self.depth.view));
            self.sphere.bind(&mut pass);
            let mut slot = 0;
            for call in &self.calls {
                if !is_body(call) {
                    self.skybox.render(&mut pass);
                    continue;
                }
                let pipeline = if call.pass.is_opaque() {
                    &self.bodies.opaque
                } else {
                    &self.bodies.translucent
                };
                pass.set_pipeline(pipeline);
                self.bodies.bind_slot(&mut pass, slot);
                self.sphere.draw(&mut pass);
                slot += 1;
            }
        }

        frame.submit(&ctx.queue);
        Ok(())
    }
}

impl MeshDrawer for GpuDrawer {
    fn begin_frame(&mut self, clear_color: [f32; 3]) {
        self.clear_color = clear_color;
        self.calls.clear();
    }

    fn draw(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

fn is_body(call: &DrawCall) -> bool {
    call.mesh == MeshKind::Sphere && call.pass != Pass::Skybox
}

/// Stable sort by pass, keeping submission order within a pass.
fn order_calls(calls: &mut [DrawCall]) {
    calls.sort_by_key(|call| call.pass);
}
