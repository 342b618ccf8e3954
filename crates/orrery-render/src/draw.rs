//! Backend-neutral draw submission.
//!
//! The scene describes each draw as a mesh, a pass and a bag of named
//! shader parameters. Backends decide how those become GPU state.

use glam::{Mat4, Vec3};

/// Well-known parameter names understood by the wgpu backend.
pub mod param {
    pub const MODEL: &str = "model";
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "projection";
    pub const VIEW_POSITION: &str = "view_position";
    pub const COLOR: &str = "color";
    pub const ALPHA: &str = "alpha";
    pub const SHININESS: &str = "material.shininess";
    pub const BLINN: &str = "blinn";

    pub const LIGHT_POSITION: &str = "point_light.position";
    pub const LIGHT_AMBIENT: &str = "point_light.ambient";
    pub const LIGHT_DIFFUSE: &str = "point_light.diffuse";
    pub const LIGHT_SPECULAR: &str = "point_light.specular";
    pub const LIGHT_CONSTANT: &str = "point_light.constant";
    pub const LIGHT_LINEAR: &str = "point_light.linear";
    pub const LIGHT_QUADRATIC: &str = "point_light.quadratic";

    pub const DIR_LIGHT_DIRECTION: &str = "dir_light.direction";
    pub const DIR_LIGHT_AMBIENT: &str = "dir_light.ambient";
    pub const DIR_LIGHT_DIFFUSE: &str = "dir_light.diffuse";
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Vec3(Vec3),
    Float(f32),
    Bool(bool),
    Mat4(Mat4),
}

/// Named shader parameters in the order they were first set.
///
/// Setting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderParams {
    entries: Vec<(String, ParamValue)>,
}

impl ShaderParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: ParamValue) -> &mut Self {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> &mut Self {
        self.set(name, ParamValue::Vec3(value))
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> &mut Self {
        self.set(name, ParamValue::Float(value))
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> &mut Self {
        self.set(name, ParamValue::Bool(value))
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) -> &mut Self {
        self.set(name, ParamValue::Mat4(value))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// `None` if missing or not a `Vec3`.
    #[must_use]
    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        match self.get(name)? {
            ParamValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_mat4(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            ParamValue::Mat4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Unit sphere centred on the origin.
    Sphere,
    /// Screen-covering triangle, used for the sky backdrop.
    FullscreenTriangle,
}

/// Render stage of a draw. Declared in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pass {
    /// Self-lit, opaque (the sun).
    Emissive,
    /// Point-lit, opaque.
    Lit,
    /// Alpha-blended, no depth writes.
    Translucent,
    /// Drawn last at the far plane.
    Skybox,
}

impl Pass {
    #[must_use]
    pub fn is_opaque(self) -> bool {
        matches!(self, Self::Emissive | Self::Lit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshKind,
    pub pass: Pass,
    pub params: ShaderParams,
}

/// Anything that can take a frame's worth of draw calls.
pub trait MeshDrawer {
    /// Start a frame cleared to `clear_color` (linear RGB, opaque).
    fn begin_frame(&mut self, clear_color: [f32; 3]);

    fn draw(&mut self, call: DrawCall);
}

/// A [`MeshDrawer`] that keeps the last frame in memory.
#[derive(Debug, Clone, Default)]
pub struct DrawRecorder {
    frames_begun: usize,
    clear_color: Option<[f32; 3]>,
    calls: Vec<DrawCall>,
}

impl DrawRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frames_begun(&self) -> usize {
        self.frames_begun
    }

    /// Clear color of the current frame, `None` before the first frame.
    #[must_use]
    pub fn clear_color(&self) -> Option<[f32; 3]> {
        self.clear_color
    }

    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn calls_in(&self, pass: Pass) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(move |call| call.pass == pass)
    }
}

impl MeshDrawer for DrawRecorder {
    fn begin_frame(&mut self, clear_color: [f32; 3]) {
        self.frames_begun += 1;
        self.clear_color = Some(clear_color);
        self.calls.clear();
    }

    fn draw(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_keep_first_set_order() {
        let mut p = ShaderParams::new();
        p.set_float("b", 1.0).set_vec3("a", Vec3::ONE).set_float("b", 2.0);
        let names: Vec<&str> = p.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(p.get_float("b"), Some(2.0));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_typed_getters_reject_wrong_type() {
        let mut p = ShaderParams::new();
        p.set_bool(param::BLINN, true)
            .set_mat4(param::MODEL, Mat4::IDENTITY);
        assert_eq!(p.get_bool(param::BLINN), Some(true));
        assert_eq!(p.get_float(param::BLINN), None);
        assert_eq!(p.get_mat4(param::MODEL), Some(Mat4::IDENTITY));
        assert_eq!(p.get_vec3("missing"), None);
    }

    #[test]
    fn test_pass_order_and_opacity() {
        assert!(Pass::Emissive < Pass::Lit);
        assert!(Pass::Lit < Pass::Translucent);
        assert!(Pass::Translucent < Pass::Skybox);
        assert!(Pass::Lit.is_opaque());
        assert!(!Pass::Translucent.is_opaque());
    }

    #[test]
    fn test_recorder_resets_per_frame() {
        let mut rec = DrawRecorder::new();
        assert_eq!(rec.clear_color(), None);
        rec.begin_frame([0.1, 0.2, 0.3]);
        rec.draw(DrawCall {
            mesh: MeshKind::Sphere,
            pass: Pass::Lit,
            params: ShaderParams::new(),
        });
        assert_eq!(rec.calls().len(), 1);
        rec.begin_frame([0.0; 3]);
        assert!(rec.calls().is_empty());
        assert_eq!(rec.frames_begun(), 2);
        assert_eq!(rec.clear_color(), Some([0.0; 3]));
    }
}
