//! OBJ file loader for 3D models
//!
//! [`ObjModel`] holds the raw attribute arrays of one `.obj` file, its
//! triangulated faces and the material groups that partition them. Face
//! indices stay 1-based as written; they are only resolved when a group is
//! turned into a mesh (see [`MeshBuilder`](super::MeshBuilder)).

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::directive::Directive;
use super::face_reader::{read_face, FaceCorner};
use super::line_reader::LineReader;
use super::materials::{MaterialLibrary, MtlParser};
use super::{ImportError, Result};
use crate::foundation::math::{Vec2, Vec3};
use crate::render::TexturedMesh;

/// Marker for an absent texture coordinate or normal index
pub const NO_INDEX: i32 = -1;

/// A single triangle of the model, indices as written in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelFace {
    /// Position indices (1-based)
    pub vertices: [i32; 3],
    /// Texture coordinate indices, [`NO_INDEX`] where absent
    pub tex_coords: [i32; 3],
    /// Normal indices, [`NO_INDEX`] where absent
    pub normals: [i32; 3],
}

impl ModelFace {
    /// Triangle through three face corners
    pub fn from_corners(a: &FaceCorner, b: &FaceCorner, c: &FaceCorner) -> Self {
        Self {
            vertices: [a.vertex, b.vertex, c.vertex],
            tex_coords: [a.tex_coord, b.tex_coord, c.tex_coord],
            normals: [a.normal, b.normal, c.normal],
        }
    }

    /// All three corners carry a texture coordinate index
    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.iter().all(|&i| i != NO_INDEX)
    }

    /// All three corners carry a normal index
    pub fn has_normals(&self) -> bool {
        self.normals.iter().all(|&i| i != NO_INDEX)
    }
}

/// A run of faces sharing one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    /// Inclusive start index in the face array
    pub start: usize,
    /// Exclusive end index in the face array
    pub end: usize,
    /// Index of the material in the [`MaterialLibrary`]
    pub material_id: usize,
}

impl Group {
    /// Face index range
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of faces
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the group has no faces
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Parser state for one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjState {
    Start,
    HaveV,
    ReadVt,
    ReadVn,
    ReadF,
    ReadUsemtl,
    ReadMtllib,
}

/// Raw contents of an `.obj` file
#[derive(Debug, Clone, Default)]
pub struct ObjModel {
    vertices: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    faces: Vec<ModelFace>,
    groups: Vec<Group>,
    material_lib_names: Vec<PathBuf>,
    lines_read: usize,
}

/// Load-time context shared by the line handlers
struct ParseContext<'a> {
    source: &'a str,
    /// Directory for `mtllib` paths; `None` skips material libraries
    mtl_lib_prefix: Option<&'a Path>,
    mtl_lib: &'a mut MaterialLibrary,
}

impl ObjModel {
    /// Load an `.obj` file
    ///
    /// `mtllib` paths are resolved against `mtl_lib_prefix` and loaded into
    /// `mtl_lib`; pass `None` to ignore material libraries.
    pub fn load(
        path: impl AsRef<Path>,
        mtl_lib_prefix: Option<&Path>,
        mtl_lib: &mut MaterialLibrary,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ImportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("ObjModel: loading {}", path.display());

        Self::parse(BufReader::new(file), &path.display().to_string(), mtl_lib_prefix, mtl_lib)
    }

    /// Parse in-memory `.obj` text
    pub fn parse_str(
        contents: &str,
        mtl_lib_prefix: Option<&Path>,
        mtl_lib: &mut MaterialLibrary,
    ) -> Result<Self> {
        Self::parse(Cursor::new(contents.as_bytes()), "<memory>", mtl_lib_prefix, mtl_lib)
    }

    /// Parse `.obj` data from any buffered reader
    ///
    /// `source` names the input in diagnostics.
    pub fn parse<R: BufRead>(
        reader: R,
        source: &str,
        mtl_lib_prefix: Option<&Path>,
        mtl_lib: &mut MaterialLibrary,
    ) -> Result<Self> {
        let mut model = Self::default();
        let mut ctx = ParseContext {
            source,
            mtl_lib_prefix,
            mtl_lib,
        };

        let mut lines = LineReader::new(reader);
        while let Some(line) = lines.next_line()? {
            let line_no = lines.lines_read();
            if let Some(directive) = Directive::parse(&line) {
                model.apply(&directive, &mut ctx, line_no)?;
            }
        }
        model.lines_read = lines.lines_read();
        model.finish(ctx.mtl_lib);

        info!(
            "ObjModel: finished loading {}: {} faces, {} groups from {} vertices ({} lines)",
            source,
            model.faces.len(),
            model.groups.len(),
            model.vertices.len(),
            model.lines_read
        );
        Ok(model)
    }

    /// Run one directive through the state machine, ending back at `Start`
    fn apply(&mut self, directive: &Directive<'_>, ctx: &mut ParseContext<'_>, line_no: usize) -> Result<()> {
        let mut state = ObjState::Start;
        loop {
            state = match state {
                ObjState::Start => match directive.lead() {
                    'v' => ObjState::HaveV,
                    'f' => ObjState::ReadF,
                    'u' => ObjState::ReadUsemtl,
                    'm' => ObjState::ReadMtllib,
                    // object and group names, smoothing groups, comments
                    _ => return Ok(()),
                },
                ObjState::HaveV => match directive.keyword {
                    "v" => {
                        let [x, y, z] = directive.floats::<3>(ctx.source, line_no);
                        self.vertices.push(Vec3::new(x, y, z));
                        return Ok(());
                    }
                    "vt" => ObjState::ReadVt,
                    "vn" => ObjState::ReadVn,
                    _ => return Ok(()),
                },
                ObjState::ReadVt => {
                    let [u, v] = directive.floats::<2>(ctx.source, line_no);
                    self.tex_coords.push(Vec2::new(u, v));
                    return Ok(());
                }
                ObjState::ReadVn => {
                    let [x, y, z] = directive.floats::<3>(ctx.source, line_no);
                    self.normals.push(Vec3::new(x, y, z));
                    return Ok(());
                }
                ObjState::ReadF => {
                    if directive.keyword == "f" {
                        read_face(directive.fields(), line_no, &mut self.faces)?;
                    }
                    return Ok(());
                }
                ObjState::ReadUsemtl => {
                    return match (directive.keyword, directive.argument()) {
                        ("usemtl", Some(name)) => {
                            self.use_material(name, ctx, line_no);
                            Ok(())
                        }
                        _ => Err(ImportError::Parse {
                            line: line_no,
                            message: format!(
                                "error while parsing usemtl, got: {}{}",
                                directive.keyword, directive.rest
                            ),
                        }),
                    };
                }
                ObjState::ReadMtllib => {
                    return match (directive.keyword, directive.argument()) {
                        ("mtllib", Some(name)) => self.read_material_lib(name, ctx),
                        _ => {
                            warn!(
                                "{}:{}: expected mtllib NAME, but got: {}{}",
                                ctx.source, line_no, directive.keyword, directive.rest
                            );
                            Ok(())
                        }
                    };
                }
            };
        }
    }

    /// Close the open group and start a new one using material `name`
    fn use_material(&mut self, name: &str, ctx: &ParseContext<'_>, line_no: usize) {
        let face_count = self.faces.len();
        if let Some(open) = self.groups.last_mut() {
            open.end = face_count;
        } else if face_count > 0 {
            // faces before the first usemtl keep the default material
            self.groups.push(Group {
                start: 0,
                end: face_count,
                material_id: 0,
            });
        }

        let material_id = ctx.mtl_lib.index_of(name).unwrap_or_else(|| {
            if ctx.mtl_lib_prefix.is_some() {
                warn!("{}:{}: material not found: {}", ctx.source, line_no, name);
            } else {
                debug!("{}:{}: material libraries disabled, '{}' uses the default", ctx.source, line_no, name);
            }
            0
        });

        self.groups.push(Group {
            start: face_count,
            end: face_count,
            material_id,
        });
    }

    /// Load the material library `name` relative to the configured directory
    fn read_material_lib(&mut self, name: &str, ctx: &mut ParseContext<'_>) -> Result<()> {
        let Some(prefix) = ctx.mtl_lib_prefix else {
            debug!("{}: skipping material library {}", ctx.source, name);
            return Ok(());
        };

        let path = prefix.join(name);
        MtlParser::load(&path, ctx.mtl_lib).map_err(|source| ImportError::MaterialLibrary {
            path: path.clone(),
            source: Box::new(source),
        })?;
        self.material_lib_names.push(path);
        Ok(())
    }

    /// Close the last group, or create the implicit one if there is none
    fn finish(&mut self, mtl_lib: &mut MaterialLibrary) {
        let face_count = self.faces.len();
        if let Some(open) = self.groups.last_mut() {
            open.end = face_count;
        } else {
            self.groups.push(Group {
                start: 0,
                end: face_count,
                material_id: 0,
            });
        }

        // material 0 must exist for every group that fell back to it
        mtl_lib.ensure_default();
    }

    /// Position array in file order
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Texture coordinate array in file order
    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    /// Normal array in file order
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// All triangles in file order
    pub fn faces(&self) -> &[ModelFace] {
        &self.faces
    }

    /// Material groups in file order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of groups, one mesh each
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Number of triangles after triangulation
    pub fn num_triangles(&self) -> usize {
        self.faces.len()
    }

    /// Resolved paths of the material libraries that were loaded
    pub fn material_lib_names(&self) -> &[PathBuf] {
        &self.material_lib_names
    }

    /// Number of lines in the source file
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Build the non-indexed mesh of group `idx` with its texture path
    pub fn triangle_mesh_from_group(&self, idx: usize, mtl_lib: &MaterialLibrary) -> Result<TexturedMesh> {
        super::MeshBuilder::new(self, mtl_lib).build_group(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::materials::Material;

    fn parse(contents: &str) -> (ObjModel, MaterialLibrary) {
        let mut library = MaterialLibrary::new();
        let model = ObjModel::parse_str(contents, None, &mut library).unwrap();
        (model, library)
    }

    #[test]
    fn test_attributes_in_file_order() {
        let (model, _) = parse(
            r#"
# cube corner
o Corner
v 1.0 2.0 3.0
vt 0.25 0.75
vn 0.0 1.0 0.0
v -1 -2 -3
s off
"#,
        );
        assert_eq!(model.vertices(), &[Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, -2.0, -3.0)]);
        assert_eq!(model.tex_coords(), &[Vec2::new(0.25, 0.75)]);
        assert_eq!(model.normals(), &[Vec3::new(0.0, 1.0, 0.0)]);
        assert_eq!(model.lines_read(), 8);
    }

    #[test]
    fn test_unknown_v_keywords_skipped() {
        let (model, _) = parse("v 0 0 0\nvp 0.5 0.5\nv 1 1 1\n");
        assert_eq!(model.vertices().len(), 2);
    }

    #[test]
    fn test_malformed_vertex_keeps_index_space() {
        let (model, _) = parse("v 1 2\nv 4 5 6\n");
        assert_eq!(model.vertices(), &[Vec3::new(1.0, 2.0, 0.0), Vec3::new(4.0, 5.0, 6.0)]);
    }

    #[test]
    fn test_absent_indices_are_marked() {
        let (model, _) = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1 2 3\nf 1/1 2/2 3/3\nf 1//1 2//2 3//3\n",
        );
        let faces = model.faces();
        assert_eq!(faces.len(), 3);

        assert_eq!(faces[0].tex_coords, [NO_INDEX; 3]);
        assert_eq!(faces[0].normals, [NO_INDEX; 3]);

        assert_eq!(faces[1].tex_coords, [1, 2, 3]);
        assert_eq!(faces[1].normals, [NO_INDEX; 3]);

        assert_eq!(faces[2].tex_coords, [NO_INDEX; 3]);
        assert_eq!(faces[2].normals, [1, 2, 3]);
    }

    #[test]
    fn test_implicit_group_without_usemtl() {
        let (model, library) = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 2 4 3\n");
        assert_eq!(
            model.groups(),
            &[Group { start: 0, end: 2, material_id: 0 }]
        );
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_empty_file_has_one_empty_group() {
        let (model, library) = parse("");
        assert_eq!(model.num_groups(), 1);
        assert!(model.groups()[0].is_empty());
        assert_eq!(model.num_triangles(), 0);
        assert!(!library.is_empty());
    }

    #[test]
    fn test_groups_partition_faces() {
        let mut library = MaterialLibrary::new();
        library.ensure_default();
        library.add(Material::named("red"));
        library.add(Material::named("blue"));

        let model = ObjModel::parse_str(
            r#"
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
usemtl red
f 1 2 3
f 1 2 4 3
usemtl blue
usemtl red
f 2 4 3
"#,
            None,
            &mut library,
        )
        .unwrap();

        assert_eq!(
            model.groups(),
            &[
                Group { start: 0, end: 3, material_id: 1 },
                Group { start: 3, end: 3, material_id: 2 },
                Group { start: 3, end: 4, material_id: 1 },
            ]
        );
        assert_eq!(model.groups().last().unwrap().end, model.num_triangles());
    }

    #[test]
    fn test_faces_before_first_usemtl_get_default_group() {
        let mut library = MaterialLibrary::new();
        library.ensure_default();
        library.add(Material::named("red"));
        let model = ObjModel::parse_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 1 2 3\nusemtl red\nf 1 2 3\n",
            None,
            &mut library,
        )
        .unwrap();
        assert_eq!(
            model.groups(),
            &[
                Group { start: 0, end: 2, material_id: 0 },
                Group { start: 2, end: 3, material_id: 1 },
            ]
        );
        let grouped: usize = model.groups().iter().map(Group::len).sum();
        assert_eq!(grouped, model.num_triangles());
    }

    #[test]
    fn test_usemtl_at_start_opens_no_empty_leading_group() {
        let mut library = MaterialLibrary::new();
        library.ensure_default();
        library.add(Material::named("red"));
        let model = ObjModel::parse_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n",
            None,
            &mut library,
        )
        .unwrap();
        assert_eq!(model.groups(), &[Group { start: 0, end: 1, material_id: 1 }]);
    }

    #[test]
    fn test_unknown_material_falls_back_to_default() {
        let (model, library) = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl nowhere\nf 1 2 3\n");
        assert_eq!(model.groups()[0].material_id, 0);
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_bare_usemtl_aborts_load() {
        let mut library = MaterialLibrary::new();
        let result = ObjModel::parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl\nf 1 2 3\n", None, &mut library);
        assert!(matches!(result, Err(ImportError::Parse { line: 4, .. })));

        let result = ObjModel::parse_str("usemat red\n", None, &mut library);
        assert!(matches!(result, Err(ImportError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_short_face_aborts_load() {
        let mut library = MaterialLibrary::new();
        let result = ObjModel::parse_str("v 0 0 0\nv 1 0 0\nf 1 2\n", None, &mut library);
        assert!(matches!(result, Err(ImportError::InvalidFace { line: 3, corners: 2 })));
    }

    #[test]
    fn test_mtllib_skipped_without_prefix() {
        let (model, library) = parse("mtllib missing.mtl\n");
        assert!(model.material_lib_names().is_empty());
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_missing_material_library_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = MaterialLibrary::new();
        let result = ObjModel::parse_str("mtllib missing.mtl\n", Some(dir.path()), &mut library);
        assert!(matches!(result, Err(ImportError::MaterialLibrary { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = MaterialLibrary::new();
        let result = ObjModel::load(dir.path().join("missing.obj"), None, &mut library);
        assert!(matches!(result, Err(ImportError::Open { .. })));
    }
}
