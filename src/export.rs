//! PNG export of the current frame.
//!
//! Exporting renders the scene onto an offscreen cairo surface (the same
//! four-layer pass the live window uses) and writes it to the configured
//! directory with a timestamped filename.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::config::ExportConfig;
use crate::draw::render::{render_scene, SceneColors};
use crate::input::InputState;

/// Errors produced while exporting an image.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating the directory or the output file failed.
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Cairo could not provide the offscreen surface.
    #[error("cairo surface error: {0}")]
    Cairo(#[from] cairo::Error),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),
}

/// Generate a filename from the template and current time.
///
/// The template supports chrono format specifiers; the `.png` extension is
/// appended.
pub fn generate_filename(template: &str) -> String {
    let now = Local::now();
    format!("{}.png", now.format(template))
}

/// Resolves the export directory, defaulting to `~/Pictures/Waysketch` and
/// expanding a leading `~`.
pub fn resolve_directory(config: &ExportConfig) -> PathBuf {
    if config.directory.is_empty() {
        return dirs::picture_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Waysketch");
    }
    expand_tilde(&config.directory)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Renders the current frame offscreen and writes it as a PNG.
///
/// Returns the path of the written file.
pub fn export_frame(
    state: &InputState,
    colors: &SceneColors,
    config: &ExportConfig,
) -> Result<PathBuf, ExportError> {
    let directory = resolve_directory(config);
    export_frame_to(state, colors, &directory, &config.filename_template)
}

/// Export into an explicit directory (separated out for tests).
pub fn export_frame_to(
    state: &InputState,
    colors: &SceneColors,
    directory: &Path,
    template: &str,
) -> Result<PathBuf, ExportError> {
    let surface = cairo::ImageSurface::create(
        cairo::Format::ARgb32,
        state.settings.canvas_width as i32,
        state.settings.canvas_height as i32,
    )?;
    let ctx = cairo::Context::new(&surface)?;
    render_scene(&ctx, state, colors);
    drop(ctx);

    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let path = directory.join(generate_filename(template));
    let mut file = fs::File::create(&path)?;
    surface.write_to_png(&mut file)?;

    log::info!("Exported frame to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draw::render::ColorCache;
    use crate::input::MouseButton;

    #[test]
    fn filename_applies_template_and_extension() {
        let name = generate_filename("building_%Y");
        assert!(name.starts_with("building_2"));
        assert!(name.ends_with(".png"));
        assert!(!name.contains('%'));
    }

    #[test]
    fn static_template_passes_through() {
        assert_eq!(generate_filename("snapshot"), "snapshot.png");
    }

    #[test]
    fn export_writes_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = InputState::from_config(&Config::default());
        state.on_mouse_press(MouseButton::Left, 100.0, 100.0);
        state.on_mouse_release(MouseButton::Left, 100.0, 100.0);
        let cache = ColorCache::new(&state.settings);

        let path =
            export_frame_to(&state, cache.colors(), dir.path(), "test_export").unwrap();
        assert!(path.exists());

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn export_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let state = InputState::from_config(&Config::default());
        let cache = ColorCache::new(&state.settings);

        let path = export_frame_to(&state, cache.colors(), &nested, "empty_scene").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn tilde_expansion_only_rewrites_prefixed_paths() {
        let plain = expand_tilde("/tmp/waysketch");
        assert_eq!(plain, PathBuf::from("/tmp/waysketch"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/captures"), home.join("captures"));
        }
    }
}
