//! Triangle mesh container
//!
//! Plain data holder filled by the mesh builder and consumed by rendering or
//! processing stages. Attributes are stored per vertex in parallel arrays;
//! `faces` holds index triples into those arrays.

use crate::foundation::math::{Vec2, Vec3};

/// Indexed triangle mesh with optional per-vertex attributes
///
/// `vertex_normals` and `vertex_texcoords` are either empty or exactly as long
/// as `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,

    /// Triangles as index triples into the vertex arrays
    pub faces: Vec<[u32; 3]>,

    /// Per-vertex normals
    pub vertex_normals: Vec<Vec3>,

    /// Per-vertex texture coordinates
    pub vertex_texcoords: Vec<Vec2>,
}

impl TriangleMesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with room for `triangles` non-indexed triangles
    pub fn with_triangle_capacity(triangles: usize, with_texcoords: bool) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
            faces: Vec::with_capacity(triangles),
            vertex_normals: Vec::with_capacity(triangles * 3),
            vertex_texcoords: if with_texcoords {
                Vec::with_capacity(triangles * 3)
            } else {
                Vec::new()
            },
        }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Whether per-vertex normals are present
    pub fn has_normals(&self) -> bool {
        !self.vertex_normals.is_empty()
    }

    /// Whether per-vertex texture coordinates are present
    pub fn has_texcoords(&self) -> bool {
        !self.vertex_texcoords.is_empty()
    }

    /// Whether the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Index buffer as raw bytes, ready for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.faces)
    }

    /// Flat index list (three entries per triangle)
    pub fn flat_indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.faces)
    }

    /// Check that the attribute arrays agree with each other and with `faces`
    pub fn is_consistent(&self) -> bool {
        let n = self.vertices.len();
        let attributes_ok = (self.vertex_normals.is_empty() || self.vertex_normals.len() == n)
            && (self.vertex_texcoords.is_empty() || self.vertex_texcoords.len() == n);
        attributes_ok && self.flat_indices().iter().all(|&i| (i as usize) < n)
    }
}

/// A mesh paired with the diffuse texture path of its material
///
/// The path is taken verbatim from the material library and may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TexturedMesh {
    /// Geometry of one material group
    pub mesh: TriangleMesh,

    /// Diffuse texture path (`map_Kd`), empty if the material has none
    pub texture_path: String,
}

/// Meshes of one import, in file order
pub type TexturedMeshList = Vec<TexturedMesh>;

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![Vec3::zeros(), Vec3::x(), Vec3::y()],
            faces: vec![[0, 1, 2]],
            vertex_normals: vec![Vec3::z(); 3],
            vertex_texcoords: Vec::new(),
        }
    }

    #[test]
    fn test_counts() {
        let mesh = single_triangle();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.has_normals());
        assert!(!mesh.has_texcoords());
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_index_views() {
        let mesh = single_triangle();
        assert_eq!(mesh.flat_indices(), &[0, 1, 2]);
        assert_eq!(mesh.index_bytes().len(), 3 * std::mem::size_of::<u32>());
    }

    #[test]
    fn test_consistency_detects_bad_index() {
        let mut mesh = single_triangle();
        assert!(mesh.is_consistent());

        mesh.faces.push([0, 1, 3]);
        assert!(!mesh.is_consistent());
    }

    #[test]
    fn test_consistency_detects_short_normals() {
        let mut mesh = single_triangle();
        mesh.vertex_normals.pop();
        assert!(!mesh.is_consistent());
    }
}
