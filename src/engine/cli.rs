//! Command-line interface for mandelbox-explorer.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glam::Vec2;
use log::info;

use crate::engine::camera::Camera;
use crate::engine::config::ExplorerConfig;
use crate::engine::fractal::reference::render_reference;
use crate::engine::fractal::{MarchResult, distance_estimate, march, ray_direction};
use crate::engine::graphics::Renderer;
use crate::engine::user_input::UserInput;
use crate::engine::{EngineResult, Windowing};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Interactive 3D Mandelbox raymarcher")]
pub struct Args {
    /// JSON config file; missing fields keep their defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Open the explorer window (default).
    Run,
    /// March the centre ray of the starting camera and print the result.
    Probe,
    /// Render one frame on the CPU and save it as a PNG.
    Snapshot {
        /// Output image path
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Image width in pixels (defaults to the window width)
        #[arg(long, short = 'W', value_parser = clap::value_parser!(u32).range(1..))]
        width: Option<u32>,

        /// Image height in pixels (defaults to the window height)
        #[arg(long, short = 'H', value_parser = clap::value_parser!(u32).range(1..))]
        height: Option<u32>,
    },
}

impl Args {
    pub fn command(&self) -> CliCommand {
        self.command.clone().unwrap_or(CliCommand::Run)
    }
}

/// Marches the ray through the centre of the screen from the configured starting camera.
pub fn probe(config: &ExplorerConfig) -> MarchResult {
    let camera = Camera::new(&config.camera, config.window.aspect());
    let view = camera.viewpoint();
    let dir = ray_direction(view.front, view.up, &view.inverse_projection, Vec2::ZERO);
    march(view.position, dir, &config.fractal)
}

pub fn execute(command: CliCommand, config: ExplorerConfig) -> EngineResult<()> {
    match command {
        CliCommand::Run => Windowing::run_app(config, Renderer::new(), UserInput::new()),
        CliCommand::Probe => {
            let result = probe(&config);
            info!("probe: {result:?}");
            println!(
                "de(camera)={:.6}",
                distance_estimate(config.camera.position, &config.fractal)
            );
            println!(
                "hit={} iterations={} traveled={:.6} point=({:.6}, {:.6}, {:.6})",
                result.hit,
                result.iterations,
                result.traveled,
                result.point.x,
                result.point.y,
                result.point.z
            );
            Ok(())
        }
        CliCommand::Snapshot {
            output,
            width,
            height,
        } => {
            let width = width.unwrap_or(config.window.width.max(1));
            let height = height.unwrap_or(config.window.height.max(1));
            let camera = Camera::new(&config.camera, width as f32 / height as f32);

            info!("rendering {}x{} snapshot", width, height);
            let img = render_reference(&camera.viewpoint(), &config.fractal, width, height);
            if let Some(dir) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            img.save(&output)?;
            info!("wrote {}", output.display());
            Ok(())
        }
    }
}
