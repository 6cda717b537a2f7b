//! Mesh inspection tool
//!
//! Loads a Wavefront OBJ file with its material libraries and prints one line
//! per material group.
//!
//! Usage: mesh_inspect model.obj [import.toml | import.ron]

use std::env;
use std::process::ExitCode;

use mesh_import::assets::MeshBuilder;
use mesh_import::{Config, ConfigError, ImportConfig, ImportError, ObjImporter};
use thiserror::Error;

#[derive(Error, Debug)]
enum InspectError {
    #[error("usage: {0} model.obj [import.toml | import.ron]")]
    Usage(String),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("import: {0}")]
    Import(#[from] ImportError),
}

fn run(args: &[String]) -> Result<(), InspectError> {
    let program = args.first().map_or("mesh_inspect", String::as_str);
    let (model_path, config) = match args {
        [_, model] => (model, ImportConfig::default()),
        [_, model, config_path] => (model, ImportConfig::load_from_file(config_path)?),
        _ => return Err(InspectError::Usage(program.to_string())),
    };

    let importer = ObjImporter::new(config);
    let (model, library) = importer.load_model(model_path)?;
    let meshes = MeshBuilder::new(&model, &library).build_all()?;

    println!("{model_path}");
    println!(
        "  {} vertices, {} texcoords, {} normals, {} triangles, {} lines",
        model.vertices().len(),
        model.tex_coords().len(),
        model.normals().len(),
        model.num_triangles(),
        model.lines_read()
    );
    for lib in model.material_lib_names() {
        println!("  material library {}", lib.display());
    }

    for (group, textured) in model.groups().iter().zip(&meshes) {
        let material = library
            .get(group.material_id)
            .map_or("?", |m| m.identifier.as_str());
        let texture = if textured.texture_path.is_empty() {
            "-"
        } else {
            textured.texture_path.as_str()
        };
        println!(
            "  [{:>6}, {:>6})  material {:<20} {:>6} triangles  texcoords {:<3}  texture {}",
            group.start,
            group.end,
            material,
            textured.mesh.triangle_count(),
            if textured.mesh.has_texcoords() { "yes" } else { "no" },
            texture
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    mesh_import::foundation::logging::init();

    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
