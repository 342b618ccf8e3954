//! Procedural UV sphere, the one mesh every body is drawn with.

use crate::buffer::VertexPositionNormalUv;

/// CPU-side sphere geometry.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<VertexPositionNormalUv>,
    pub indices: Vec<u32>,
}

/// Unit sphere with `segments` slices around Y and `rings` stacks pole to
/// pole. Triangles wind counter-clockwise seen from outside.
///
/// Inputs below 3 segments or 2 rings are raised to that minimum.
pub fn uv_sphere(segments: u32, rings: u32) -> SphereMesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let stride = segments + 1;

    let mut vertices = Vec::with_capacity(((rings + 1) * stride) as usize);
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * std::f32::consts::PI;
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let theta = u * std::f32::consts::TAU;
            let normal = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
            vertices.push(VertexPositionNormalUv {
                position: normal,
                normal,
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    SphereMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_counts() {
        let mesh = uv_sphere(8, 4);
        assert_eq!(mesh.vertices.len(), 9 * 5);
        assert_eq!(mesh.indices.len(), 8 * 4 * 6);
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn test_minimum_detail_is_enforced() {
        let mesh = uv_sphere(0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        for v in uv_sphere(16, 8).vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.position, v.normal);
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = uv_sphere(12, 6);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            if normal.length() < 1e-6 {
                continue; // collapsed at a pole
            }
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }
}
