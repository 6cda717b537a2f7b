//! Math types
//!
//! Vector aliases shared by the parsers and the mesh container.

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D vector type (texture coordinates)
pub type Vec2 = Vector2<f32>;

/// 3D vector type (positions and normals)
pub type Vec3 = Vector3<f32>;

/// 4D vector type (RGBA colors)
pub type Vec4 = Vector4<f32>;

/// Flat normal of the triangle `(a, b, c)`
///
/// Computed as the normalized cross product of the edges `b - a` and `c - a`,
/// so counter-clockwise winding faces the viewer. Degenerate triangles yield
/// the zero vector.
pub fn face_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    let d1 = b - a;
    let d2 = c - a;
    d1.cross(&d2)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::zeros)
}
