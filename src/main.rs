use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use waysketch::backend;
use waysketch::config::{Config, CANVAS_SIZES};

#[derive(Parser, Debug)]
#[command(name = "waysketch")]
#[command(version, about = "Building silhouette sketcher for Wayland compositors")]
struct Cli {
    /// Print the configuration file path and exit
    #[arg(long, action = ArgAction::SetTrue)]
    print_config_path: bool,

    /// Canvas size override as WIDTHxHEIGHT (each side 512 or 768)
    #[arg(long, short = 'c', value_name = "WxH")]
    canvas: Option<String>,
}

fn parse_canvas(spec: &str) -> Result<(u32, u32)> {
    let (w, h) = spec
        .split_once(['x', 'X'])
        .with_context(|| format!("Invalid canvas spec '{spec}', expected WIDTHxHEIGHT"))?;
    let width: u32 = w
        .trim()
        .parse()
        .with_context(|| format!("Invalid canvas width '{w}'"))?;
    let height: u32 = h
        .trim()
        .parse()
        .with_context(|| format!("Invalid canvas height '{h}'"))?;

    for side in [width, height] {
        if !CANVAS_SIZES.contains(&side) {
            anyhow::bail!("Unsupported canvas size {side}, supported sizes: {CANVAS_SIZES:?}");
        }
    }
    Ok((width, height))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.print_config_path {
        println!("{}", Config::get_config_path()?.display());
        return Ok(());
    }

    let canvas_override = cli.canvas.as_deref().map(parse_canvas).transpose()?;

    // Check for Wayland environment
    if std::env::var("WAYLAND_DISPLAY").is_err() {
        log::error!("WAYLAND_DISPLAY not set - this application requires Wayland.");
        log::error!("Please run on a Wayland compositor (Hyprland, Sway, etc.).");
        return Err(anyhow::anyhow!("Wayland environment required"));
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        Config::default()
    });

    if let Some((width, height)) = canvas_override {
        config.canvas.width = width;
        config.canvas.height = height;
    }

    log::info!("Starting silhouette editor");
    log::info!("Controls:");
    log::info!("  - Place shape: Left click on empty canvas");
    log::info!("  - Move shape: Left drag");
    log::info!("  - Delete shape: Right click");
    log::info!("  - Shape types: 1 (rectangle), 2 (circle), 3 (triangle)");
    log::info!("  - Size: Scroll (width), Shift+Scroll (height)");
    log::info!("  - Building padding: + / -   Ground height: [ / ]");
    log::info!("  - Palettes: D (shapes), F (building), G (ground)");
    log::info!("  - Clear all: E    Export PNG: Ctrl+S");
    log::info!("  - Help: F10    Exit: Escape or Ctrl+Q");

    backend::run_wayland(config)?;

    log::info!("Editor closed.");
    Ok(())
}
