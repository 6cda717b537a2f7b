//! Expansion of material groups into renderable meshes
//!
//! # Output contract
//!
//! Meshes produced here are **non-indexed**: every triangle gets three fresh
//! vertices, even when the source file shares a position between faces.
//! Triangle `k` always uses vertices `3k`, `3k + 1` and `3k + 2`, and callers
//! must not assume that equal positions are the same vertex.
//!
//! Normals are always present. Corners without a complete set of normal
//! indices receive the flat normal of their triangle.
//!
//! Texture coordinates are emitted for a whole group or not at all. The
//! decision is made once per group: the file must define exactly as many
//! texture coordinates as positions, and the group's first triangle must
//! reference one at every corner. Later triangles of a textured group that
//! lack indices get `(0, 0)`.

use log::warn;

use super::obj_loader::{Group, ModelFace, ObjModel, NO_INDEX};
use super::materials::MaterialLibrary;
use super::{ImportError, IndexKind, Result};
use crate::foundation::math::{face_normal, Vec2};
use crate::render::{TexturedMesh, TexturedMeshList, TriangleMesh};

/// Turns the groups of an [`ObjModel`] into [`TexturedMesh`]es
pub struct MeshBuilder<'a> {
    model: &'a ObjModel,
    mtl_lib: &'a MaterialLibrary,
}

impl<'a> MeshBuilder<'a> {
    /// Builder reading from `model` and its material library
    pub fn new(model: &'a ObjModel, mtl_lib: &'a MaterialLibrary) -> Self {
        Self { model, mtl_lib }
    }

    /// One mesh per group, in file order
    pub fn build_all(&self) -> Result<TexturedMeshList> {
        (0..self.model.num_groups())
            .map(|idx| self.build_group(idx))
            .collect()
    }

    /// Build the mesh of group `idx` and pair it with its diffuse texture
    pub fn build_group(&self, idx: usize) -> Result<TexturedMesh> {
        let group = self.model.groups().get(idx).ok_or(ImportError::IndexOutOfRange {
            kind: IndexKind::Group,
            index: i64::try_from(idx).unwrap_or(i64::MAX),
            len: self.model.num_groups(),
        })?;

        let faces = &self.model.faces()[group.range()];
        let add_tex_coords = self.uses_tex_coords(faces);
        let mut mesh = TriangleMesh::with_triangle_capacity(faces.len(), add_tex_coords);

        for face in faces {
            self.push_face(&mut mesh, face, add_tex_coords)?;
        }

        Ok(TexturedMesh {
            mesh,
            texture_path: self.texture_path(group),
        })
    }

    /// Group-level texture coordinate check, decided by the first face
    fn uses_tex_coords(&self, faces: &[ModelFace]) -> bool {
        self.model.tex_coords().len() == self.model.vertices().len()
            && faces.first().is_some_and(ModelFace::has_tex_coords)
    }

    fn push_face(&self, mesh: &mut TriangleMesh, face: &ModelFace, add_tex_coords: bool) -> Result<()> {
        let positions = [
            resolve(self.model.vertices(), face.vertices[0], IndexKind::Position)?,
            resolve(self.model.vertices(), face.vertices[1], IndexKind::Position)?,
            resolve(self.model.vertices(), face.vertices[2], IndexKind::Position)?,
        ];

        if face.has_normals() {
            for &index in &face.normals {
                mesh.vertex_normals.push(resolve(self.model.normals(), index, IndexKind::Normal)?);
            }
        } else {
            // no normal available, use the face normal
            let normal = face_normal(&positions[0], &positions[1], &positions[2]);
            mesh.vertex_normals.extend([normal; 3]);
        }

        if add_tex_coords {
            for &index in &face.tex_coords {
                let tex_coord = if index == NO_INDEX {
                    Vec2::zeros()
                } else {
                    resolve(self.model.tex_coords(), index, IndexKind::TexCoord)?
                };
                mesh.vertex_texcoords.push(tex_coord);
            }
        }

        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend(positions);
        mesh.faces.push([base, base + 1, base + 2]);
        Ok(())
    }

    fn texture_path(&self, group: &Group) -> String {
        if let Some(material) = self.mtl_lib.get(group.material_id) {
            material.diffuse_texture.clone()
        } else {
            warn!(
                "MeshBuilder: material {} missing from library, using no texture",
                group.material_id
            );
            String::new()
        }
    }
}

/// Look up a 1-based file index
fn resolve<T: Copy>(items: &[T], index: i32, kind: IndexKind) -> Result<T> {
    let index = i64::from(index);
    usize::try_from(index - 1)
        .ok()
        .and_then(|i| items.get(i))
        .copied()
        .ok_or(ImportError::IndexOutOfRange {
            kind,
            index,
            len: items.len(),
        })
}
