use std::path::PathBuf;
use std::process::ExitCode;

use phong_view::prelude::*;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ViewerConfig::default();
    if let Some(path) = std::env::args_os().nth(1) {
        config.mesh_path = PathBuf::from(path);
    }

    let scene = match Scene::setup(&config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let options = RunOptions::from(&config);
    let mut viewer = Viewer::new(scene, config, RandomJitter::new(rand::rng()));
    if let Err(e) = run_game(&mut viewer, &options) {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
