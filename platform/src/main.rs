//! Everyday Hero
//!
//! Opens a 640x480 window showing a scrolling gradient with a sine tone.
//!
//! # Controls
//!
//! - WASD / arrows: directions
//! - Q / E: shoulders
//! - Enter / Backspace: start / back
//! - ESC: Quit

use everyday_core::config;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::load();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = everyday_platform::run(config) {
        tracing::error!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}
