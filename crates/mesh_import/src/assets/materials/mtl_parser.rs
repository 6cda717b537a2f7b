//! MTL (Material Template Library) file parser
//!
//! Reads Wavefront `.mtl` files into a [`MaterialLibrary`]. Only the color
//! (`Ka`, `Kd`, `Ks`, `Ke`), shininess (`Ns`) and diffuse texture (`map_Kd`)
//! directives are interpreted; every other line is skipped.
//!
//! The library always holds the default material at index 0 before the
//! first parsed material is appended. Attributes that appear before the
//! first `newmtl` are read but never stored.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use log::{debug, warn};

use super::material::{Material, MaterialLibrary};
use crate::assets::directive::Directive;
use crate::assets::line_reader::LineReader;
use crate::assets::{ImportError, Result};
use crate::foundation::math::Vec4;

/// Parser state for one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MtlState {
    Start,
    HaveK,
    ReadKa,
    ReadKd,
    ReadKs,
    ReadKe,
    ReadNs,
    ReadMap,
    ReadNewmtl,
}

/// Material being accumulated between `newmtl` directives
struct Accumulator {
    material: Material,
    /// False until the first `newmtl`, while the default is still untouched
    named: bool,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            material: Material::default(),
            named: false,
        }
    }

    /// Hand the accumulated material to the library unless it is the default
    fn flush_into(&mut self, library: &mut MaterialLibrary) {
        if self.named {
            let material = std::mem::take(&mut self.material);
            debug!("MtlParser: adding material '{}'", material.identifier);
            library.add(material);
        }
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Load a material library file into `library`
    ///
    /// Fails if the file cannot be opened or read. Malformed lines only
    /// produce warnings.
    pub fn load(path: impl AsRef<Path>, library: &mut MaterialLibrary) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ImportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("MtlParser: loading {}", path.display());

        Self::parse(BufReader::new(file), &path.display().to_string(), library)
    }

    /// Parse material definitions from in-memory text
    pub fn parse_str(contents: &str, library: &mut MaterialLibrary) -> Result<()> {
        Self::parse(Cursor::new(contents.as_bytes()), "<memory>", library)
    }

    /// Parse material definitions from any buffered reader
    ///
    /// `source` names the input in diagnostics.
    pub fn parse<R: BufRead>(reader: R, source: &str, library: &mut MaterialLibrary) -> Result<()> {
        library.ensure_default();

        let mut lines = LineReader::new(reader);
        let mut current = Accumulator::new();

        while let Some(line) = lines.next_line()? {
            let line_no = lines.lines_read();
            if let Some(directive) = Directive::parse(&line) {
                Self::apply(&directive, &mut current, library, source, line_no);
            }
        }

        // push back the last material
        current.flush_into(library);
        Ok(())
    }

    /// Run one directive through the state machine, ending back at `Start`
    fn apply(
        directive: &Directive<'_>,
        current: &mut Accumulator,
        library: &mut MaterialLibrary,
        source: &str,
        line_no: usize,
    ) {
        let mut state = MtlState::Start;
        loop {
            state = match state {
                MtlState::Start => match directive.lead() {
                    'K' => MtlState::HaveK,
                    'N' => MtlState::ReadNs,
                    'm' => MtlState::ReadMap,
                    'n' => MtlState::ReadNewmtl,
                    _ => return,
                },
                MtlState::HaveK => match directive.keyword {
                    "Ka" => MtlState::ReadKa,
                    "Kd" => MtlState::ReadKd,
                    "Ks" => MtlState::ReadKs,
                    "Ke" => MtlState::ReadKe,
                    _ => return,
                },
                MtlState::ReadKa => {
                    current.material.ambient = Self::read_color(directive, source, line_no);
                    return;
                }
                MtlState::ReadKd => {
                    current.material.diffuse = Self::read_color(directive, source, line_no);
                    return;
                }
                MtlState::ReadKs => {
                    current.material.specular = Self::read_color(directive, source, line_no);
                    return;
                }
                MtlState::ReadKe => {
                    current.material.emissive = Self::read_color(directive, source, line_no);
                    return;
                }
                MtlState::ReadNs => {
                    if directive.keyword == "Ns" {
                        let [shininess] = directive.floats::<1>(source, line_no);
                        current.material.shininess = shininess;
                    }
                    return;
                }
                MtlState::ReadMap => {
                    match (directive.keyword, directive.argument()) {
                        ("map_Kd", Some(texture)) => {
                            current.material.diffuse_texture = texture.to_string();
                        }
                        _ => warn!(
                            "{}:{}: error parsing texture type, expected map_Kd but got: {}{}",
                            source, line_no, directive.keyword, directive.rest
                        ),
                    }
                    return;
                }
                MtlState::ReadNewmtl => {
                    match (directive.keyword, directive.argument()) {
                        ("newmtl", Some(name)) => {
                            current.flush_into(library);
                            current.material = Material::named(name);
                            current.named = true;
                        }
                        _ => warn!(
                            "{}:{}: invalid expression: {}{}",
                            source, line_no, directive.keyword, directive.rest
                        ),
                    }
                    return;
                }
            };
        }
    }

    /// Read an RGB triple; alpha is always 1.0
    fn read_color(directive: &Directive<'_>, source: &str, line_no: usize) -> Vec4 {
        let [r, g, b] = directive.floats::<3>(source, line_no);
        Vec4::new(r, g, b, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::materials::DEFAULT_MATERIAL_NAME;
    use approx::assert_relative_eq;

    fn parse(contents: &str) -> MaterialLibrary {
        let mut library = MaterialLibrary::new();
        MtlParser::parse_str(contents, &mut library).unwrap();
        library
    }

    #[test]
    fn test_parse_simple_material() {
        let library = parse(
            r#"
# Simple material
newmtl TestMaterial
Ka 1.0 1.0 1.0
Kd 0.8 0.2 0.2
Ks 0.5 0.5 0.5
Ke 0.0 0.1 0.0
Ns 250.0
d 1.0
illum 2
"#,
        );
        assert_eq!(library.len(), 2);

        let mat = library.by_name("TestMaterial").unwrap();
        assert_eq!(library.index_of("TestMaterial"), Some(1));
        assert_eq!(mat.ambient, Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(mat.diffuse, Vec4::new(0.8, 0.2, 0.2, 1.0));
        assert_eq!(mat.specular, Vec4::new(0.5, 0.5, 0.5, 1.0));
        assert!(mat.is_emitting());
        assert_relative_eq!(mat.shininess, 250.0);
        assert!(mat.diffuse_texture.is_empty());
    }

    #[test]
    fn test_diffuse_alpha_forced_to_one() {
        let library = parse("newmtl paint\nKd 0.2 0.4 0.6 0.1\n");
        let mat = library.by_name("paint").unwrap();
        assert_relative_eq!(mat.diffuse, Vec4::new(0.2, 0.4, 0.6, 1.0));
    }

    #[test]
    fn test_default_material_at_index_zero() {
        let library = parse("");
        assert_eq!(library.len(), 1);
        assert_eq!(library.get(0).unwrap().identifier, DEFAULT_MATERIAL_NAME);
        assert_eq!(*library.get(0).unwrap(), Material::named(DEFAULT_MATERIAL_NAME));
    }

    #[test]
    fn test_parse_multiple_materials_in_order() {
        let library = parse(
            r#"
newmtl Material1
Kd 1.0 0.0 0.0

newmtl Material2
Kd 0.0 1.0 0.0
"#,
        );
        assert_eq!(library.len(), 3);
        assert_eq!(library.get(1).unwrap().identifier, "Material1");
        assert_eq!(library.get(2).unwrap().identifier, "Material2");
        assert_eq!(library.get(1).unwrap().diffuse, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(library.get(2).unwrap().diffuse, Vec4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_new_material_starts_from_reset_state() {
        let library = parse("newmtl a\nKd 1 1 1\nNs 20\nmap_Kd a.png\nnewmtl b\n");
        let b = library.by_name("b").unwrap();
        assert_eq!(b.diffuse, Vec4::zeros());
        assert_relative_eq!(b.shininess, 1.0);
        assert!(b.diffuse_texture.is_empty());
    }

    #[test]
    fn test_texture_path_keeps_everything_after_one_separator() {
        let library = parse("newmtl hull\nmap_Kd textures/hull diffuse.png\n");
        assert_eq!(
            library.by_name("hull").unwrap().diffuse_texture,
            "textures/hull diffuse.png"
        );
    }

    #[test]
    fn test_other_texture_maps_leave_diffuse_unset() {
        let library = parse("newmtl hull\nmap_Ks spec.png\nmap_Bump normal.png\n");
        assert!(library.by_name("hull").unwrap().diffuse_texture.is_empty());
    }

    #[test]
    fn test_attributes_before_newmtl_are_dropped() {
        let library = parse("Kd 1 0 0\nnewmtl only\n");
        assert_eq!(library.len(), 2);
        assert_eq!(library.get(0).unwrap().diffuse, Vec4::zeros());
        assert_eq!(library.by_name("only").unwrap().diffuse, Vec4::zeros());
    }

    #[test]
    fn test_malformed_lines_do_not_abort() {
        let library = parse("newmtl broken\nKd 0.5 x\nNs\nnewmtl\nKa 0.1 0.2 0.3\n");
        let mat = library.by_name("broken").unwrap();
        assert_eq!(mat.diffuse, Vec4::new(0.5, 0.0, 0.0, 1.0));
        assert_relative_eq!(mat.shininess, 0.0);
        // the bare `newmtl` is skipped, so Ka still lands on "broken"
        assert_eq!(mat.ambient, Vec4::new(0.1, 0.2, 0.3, 1.0));
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_other_n_keywords_ignored() {
        let library = parse("newmtl glass\nNs 10\nNi 1.5\n");
        assert_relative_eq!(library.by_name("glass").unwrap().shininess, 10.0);
    }

    #[test]
    fn test_duplicate_names_resolve_to_latest() {
        let library = parse("newmtl dup\nKd 1 0 0\nnewmtl dup\nKd 0 0 1\n");
        assert_eq!(library.len(), 3);
        assert_eq!(library.index_of("dup"), Some(2));
    }

    #[test]
    fn test_crlf_and_cr_line_endings() {
        let library = parse("newmtl a\r\nKd 1 0 0\rnewmtl b\r\nKs 0 1 0\r\n");
        assert_eq!(library.by_name("a").unwrap().diffuse, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(library.by_name("b").unwrap().specular, Vec4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_default_not_added_twice() {
        let mut library = MaterialLibrary::new();
        MtlParser::parse_str("newmtl a\n", &mut library).unwrap();
        MtlParser::parse_str("newmtl b\n", &mut library).unwrap();
        assert_eq!(library.len(), 3);
        assert_eq!(library.index_of("b"), Some(2));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = MaterialLibrary::new();
        let result = MtlParser::load(dir.path().join("missing.mtl"), &mut library);
        assert!(matches!(result, Err(ImportError::Open { .. })));
    }
}
