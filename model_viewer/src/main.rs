//! Headless model viewer demo
//!
//! Demonstrates the model pipeline end to end without a window: load an
//! OBJ model, compile it into the recording backend, replay it for two
//! simulated frames, then derive a handful of randomized variants the way
//! an asteroid field would.

use std::path::PathBuf;
use std::process::ExitCode;

use model_engine::prelude::*;
use rand::thread_rng;

/// Display list capacity for the demo backend
const MAX_LISTS: usize = 64;

struct ViewerArgs {
    model: PathBuf,
    variants: usize,
}

fn parse_args() -> Option<ViewerArgs> {
    let mut args = std::env::args().skip(1);
    let model = PathBuf::from(args.next()?);
    let variants = match args.next() {
        Some(count) => count.parse().ok()?,
        None => 4,
    };
    Some(ViewerArgs { model, variants })
}

fn main() -> ExitCode {
    model_engine::foundation::logging::init();

    let Some(args) = parse_args() else {
        eprintln!("usage: model_viewer <model.obj> [variant-count]");
        return ExitCode::FAILURE;
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &ViewerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = ObjLoader::load_obj(&args.model)?;
    for group in mesh.groups() {
        log::info!(
            "Group {}: {} triangle(s), {} quad(s), {} polygon(s)",
            group.name.as_deref().unwrap_or("<no material>"),
            group.batch.triangles.len(),
            group.batch.quads.len(),
            group.batch.polygons.len()
        );
    }

    let mut backend = RecordingBackend::new(MAX_LISTS);
    let model = CompiledModel::compile(&mesh, &mut backend)?;

    // Two frames of replay from one compilation
    backend.make_current();
    model.draw(&mut backend)?;
    model.draw(&mut backend)?;
    log::info!(
        "Replayed {} command(s) over two frames",
        backend.replayed().len()
    );

    // Derive independent variants from the same base mesh
    let mut jitter = UniformJitter::new(thread_rng());
    let mut variant_models = Vec::with_capacity(args.variants);
    for index in 0..args.variants {
        let variant = perturb(&mesh, &mut jitter);
        let compiled = CompiledModel::compile(&variant, &mut backend)?;
        compiled.draw(&mut backend)?;
        log::info!(
            "Variant {}: first vertex {:?}",
            index,
            variant.vertices().first()
        );
        variant_models.push(compiled);
    }

    // Entity teardown: give every cache slot back to the backend
    for mut compiled in variant_models {
        compiled.release(&mut backend)?;
    }
    log::info!("{} cached list(s) remain", backend.cached_lists());

    Ok(())
}
