use anyhow::Result;

pub mod wayland;

use crate::config::Config;

/// Run the Wayland backend with the full event loop.
///
/// # Arguments
/// * `config` - Loaded and validated configuration
pub fn run_wayland(config: Config) -> Result<()> {
    let mut backend = wayland::WaylandBackend::new(config);
    backend.run()
}
