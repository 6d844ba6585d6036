//! Headless scene viewer
//!
//! Loads a scene, runs a number of update/paint frames into the software
//! framebuffer and writes the last frame to a PNG file.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use soft_render::foundation::logging;
use soft_render::prelude::*;
use std::path::PathBuf;

const DEFAULT_SCENE: &str = "resources/demo.xml";
const DEFAULT_OUTPUT: &str = "frame.png";

#[derive(Debug)]
struct ViewerOptions {
    scene: PathBuf,
    config: Option<String>,
    frames: u32,
    output: PathBuf,
    size: Option<(u32, u32)>,
    verbose: bool,
}

fn parse_args() -> ViewerOptions {
    let matches = Command::new("scene_viewer")
        .about("Renders a scene description into a PNG with the software pipeline")
        .arg(
            Arg::new("scene")
                .value_name("SCENE")
                .help("Scene description file")
                .default_value(DEFAULT_SCENE),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (.toml or .ron)"),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_name("COUNT")
                .help("Number of frames to run before saving")
                .value_parser(value_parser!(u32).range(1..))
                .default_value("1"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PNG")
                .help("Where to write the final frame")
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .value_parser(value_parser!(u32).range(1..))
                .requires("height")
                .help("Override the configured viewport width"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .value_parser(value_parser!(u32).range(1..))
                .requires("width")
                .help("Override the configured viewport height"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log per-frame statistics")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let width = matches.get_one::<u32>("width").copied();
    let height = matches.get_one::<u32>("height").copied();

    ViewerOptions {
        scene: matches.get_one::<String>("scene").map_or_else(|| PathBuf::from(DEFAULT_SCENE), PathBuf::from),
        config: matches.get_one::<String>("config").cloned(),
        frames: matches.get_one::<u32>("frames").copied().unwrap_or(1),
        output: matches.get_one::<String>("output").map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from),
        size: width.zip(height),
        verbose: matches.get_flag("verbose"),
    }
}

fn main() -> Result<()> {
    let options = parse_args();

    let mut config = match &options.config {
        Some(path) => ApplicationConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => ApplicationConfig::default(),
    };
    if let Some((width, height)) = options.size {
        config.viewport.width = width;
        config.viewport.height = height;
    }

    let level = if options.verbose { "debug" } else { config.engine.log_level.as_str() };
    logging::init_with_level(level);

    run(&options, config)
}

fn run(options: &ViewerOptions, config: ApplicationConfig) -> Result<()> {
    let mut framebuffer = FrameBuffer::new(config.viewport.width, config.viewport.height)
        .with_clear_color(Color::from(config.viewport.clear_color));

    let mut view = View::from_scene_file(config, &options.scene)
        .with_context(|| format!("Failed to build scene from {}", options.scene.display()))?;

    log::info!(
        "Rendering {} frame(s) at {}x{}",
        options.frames,
        framebuffer.viewport().0,
        framebuffer.viewport().1
    );

    let mut totals = FrameStats::default();
    for _ in 0..options.frames {
        totals += view.render_frame(&mut framebuffer);
    }

    framebuffer
        .save(&options.output)
        .with_context(|| format!("Failed to write {}", options.output.display()))?;

    log::info!(
        "Wrote {} after {} frame(s): {} polygons submitted, {} culled, {} clipped away",
        options.output.display(),
        view.frame_count(),
        totals.submitted,
        totals.culled,
        totals.clipped_away
    );
    Ok(())
}
