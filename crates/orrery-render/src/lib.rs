//! Drawing for Orrery: the [`MeshDrawer`] seam the scene talks to, an
//! in-memory recorder, and the wgpu backend that puts frames on screen.

pub mod body_pipeline;
pub mod buffer;
pub mod depth;
pub mod draw;
pub mod gpu;
pub mod pass;
pub mod renderer;
pub mod skybox;
pub mod sphere;

pub use body_pipeline::{BODY_SHADER_SOURCE, BodyPipeline, BodyUniform};
pub use buffer::{BufferAllocator, MeshBuffer, VertexPositionNormalUv};
pub use depth::DepthBuffer;
pub use draw::{DrawCall, DrawRecorder, MeshDrawer, MeshKind, ParamValue, Pass, ShaderParams, param};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use renderer::GpuDrawer;
pub use skybox::{SKYBOX_SHADER_SOURCE, SkyboxPipeline, SkyboxUniform, StarfieldParams};
pub use sphere::{SphereMesh, uv_sphere};
