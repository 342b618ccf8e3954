//! Turns one frame of transforms into draw calls.
//!
//! Submission order is clear, emissive sun, lit planets, translucent
//! shells, skybox. The drawer only sees transforms and parameter values.

use glam::{Mat4, Vec3};
use orrery_orbit::FrameTransforms;
use orrery_render::{DrawCall, MeshDrawer, MeshKind, Pass, ShaderParams, param};

use crate::context::AppContext;

/// Point light at the sun.
const LIGHT_AMBIENT: f32 = 1.0;
const LIGHT_DIFFUSE: f32 = 0.8;
const LIGHT_SPECULAR: f32 = 0.05;

/// Faint fill so the night side is not pure black.
const DIR_LIGHT_AMBIENT: f32 = 0.01;
const DIR_LIGHT_DIFFUSE: f32 = 0.02;

/// Parameters shared by every draw that goes through the lit path.
fn lit_params(ctx: &AppContext, view: Mat4, projection: Mat4) -> ShaderParams {
    let render = ctx.render_config();
    let mut params = ShaderParams::new();
    params
        .set_mat4(param::VIEW, view)
        .set_mat4(param::PROJECTION, projection)
        .set_vec3(param::VIEW_POSITION, ctx.observer().state().position)
        .set_float(param::SHININESS, render.shininess)
        .set_bool(param::BLINN, ctx.blinn())
        .set_vec3(param::LIGHT_POSITION, Vec3::ZERO)
        .set_vec3(param::LIGHT_AMBIENT, Vec3::splat(LIGHT_AMBIENT))
        .set_vec3(param::LIGHT_DIFFUSE, Vec3::splat(LIGHT_DIFFUSE))
        .set_vec3(param::LIGHT_SPECULAR, Vec3::splat(LIGHT_SPECULAR))
        .set_float(param::LIGHT_CONSTANT, render.light_constant)
        .set_float(param::LIGHT_LINEAR, render.light_linear)
        .set_float(param::LIGHT_QUADRATIC, render.light_quadratic)
        .set_vec3(param::DIR_LIGHT_DIRECTION, Vec3::ZERO)
        .set_vec3(param::DIR_LIGHT_AMBIENT, Vec3::splat(DIR_LIGHT_AMBIENT))
        .set_vec3(param::DIR_LIGHT_DIFFUSE, Vec3::splat(DIR_LIGHT_DIFFUSE));
    params
}

/// Issue every draw for one frame.
pub fn compose_frame(
    ctx: &AppContext,
    transforms: &FrameTransforms,
    aspect: f32,
    drawer: &mut impl MeshDrawer,
) {
    let observer = ctx.observer();
    let view = observer.view_matrix();
    let projection = observer.projection_matrix(aspect);
    let scene = ctx.scene();

    drawer.begin_frame(ctx.settings().background_color);

    let lit = lit_params(ctx, view, projection);
    let mut bodies: Vec<DrawCall> = transforms
        .bodies()
        .filter_map(|(id, transform)| {
            let appearance = scene.appearance(id)?;
            let (pass, mut params) = if appearance.emissive {
                let mut params = ShaderParams::new();
                params
                    .set_mat4(param::VIEW, view)
                    .set_mat4(param::PROJECTION, projection);
                (Pass::Emissive, params)
            } else {
                (Pass::Lit, lit.clone())
            };
            params
                .set_mat4(param::MODEL, transform.model)
                .set_vec3(param::COLOR, appearance.tint)
                .set_float(param::ALPHA, 1.0);
            Some(DrawCall {
                mesh: MeshKind::Sphere,
                pass,
                params,
            })
        })
        .collect();
    // Emissive first; insertion order otherwise.
    bodies.sort_by_key(|call| call.pass);
    for call in bodies {
        drawer.draw(call);
    }

    for (shell, model) in scene.system.shells().iter().zip(transforms.shells()) {
        let mut params = lit.clone();
        params
            .set_mat4(param::MODEL, *model)
            .set_vec3(param::COLOR, Vec3::from_array(shell.color))
            .set_float(param::ALPHA, shell.alpha);
        drawer.draw(DrawCall {
            mesh: MeshKind::Sphere,
            pass: Pass::Translucent,
            params,
        });
    }

    let mut sky = ShaderParams::new();
    sky.set_mat4(param::VIEW, observer.skybox_view_matrix())
        .set_mat4(param::PROJECTION, projection);
    drawer.draw(DrawCall {
        mesh: MeshKind::FullscreenTriangle,
        pass: Pass::Skybox,
        params: sky,
    });
}
