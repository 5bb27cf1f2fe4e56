//! lumen CLI - render scenes to image files
//!
//! Loads a TOML render configuration, builds one of the built-in scenes and
//! writes the result as PNG or plain PPM.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::time::Instant;

mod config;
mod demo;
mod output;

use config::RenderConfig;
use demo::DemoScene;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Offline recursive ray tracer", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a built-in scene
    Render {
        /// TOML render configuration (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Scene to render
        #[arg(short, long, value_enum, default_value_t = DemoScene::Showcase)]
        scene: DemoScene,
        /// Output file, overriding the configuration (.png or .ppm)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overlay bounding-box wireframes and an axis gizmo
        #[arg(long)]
        debug_geometry: bool,
    },
    /// Print the effective configuration as TOML
    Config {
        /// TOML render configuration
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    match cli.command {
        Commands::Render {
            config,
            scene,
            output,
            debug_geometry,
        } => {
            let mut config = RenderConfig::load(config.as_deref())?;
            if let Some(output) = output {
                config.output = output;
            }
            render(&config, scene, debug_geometry)?;
        }
        Commands::Config { config } => {
            let config = RenderConfig::load(config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn render(config: &RenderConfig, scene: DemoScene, debug_geometry: bool) -> Result<()> {
    let mut world = demo::build(scene, config)?;
    if debug_geometry {
        demo::add_debug_geometry(world.scene_mut())?;
    }
    let camera = config.camera()?;

    info!(
        "rendering {:?} at {}x{}",
        scene, config.width, config.height
    );
    let started = Instant::now();
    let canvas = world.render(&camera);
    info!("rendered in {:.2?}", started.elapsed());

    output::write(&canvas, &config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;
    info!("wrote {}", config.output.display());
    Ok(())
}
