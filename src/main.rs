//! # ROV Bridge
//!
//! Drive a remotely operated vehicle with a PS5 DualSense controller over UDP.
//!
//! # Usage
//!
//! ```bash
//! rov-bridge                  # compiled-in defaults
//! rov-bridge rov-bridge.toml  # override defaults from a file
//! ```
//!
//! Push Options to start transmitting, push it again to exit. Ctrl+C also
//! exits. The per-tick diagnostic line is logged at INFO under the
//! `rov_bridge::tick` target; silence it with
//! `RUST_LOG=rov_bridge::tick=warn`.

use anyhow::{Context, Result};
use tracing::info;

use rov_bridge::config::Config;
use rov_bridge::controller::ps5::DualSensePad;
use rov_bridge::session::Session;
use rov_bridge::transport::UdpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("ROV Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args_os().nth(1) {
        Some(path) => {
            let config = Config::load(&path)
                .with_context(|| format!("loading {}", path.to_string_lossy()))?;
            info!("Loaded configuration from {}", path.to_string_lossy());
            config
        }
        None => {
            let config = Config::default();
            config.validate()?;
            config
        }
    };

    let transport = UdpTransport::open(&config.link).await?;

    let pad = if config.controller.device_path.is_empty() {
        DualSensePad::open()?
    } else {
        DualSensePad::open_path(&config.controller.device_path)?
    };
    info!(
        "Controller: {} ({})",
        pad.name().unwrap_or("unknown"),
        pad.device_path()
    );

    let mut session = Session::new(&config, pad, transport)?;
    let summary = session.run_until(tokio::signal::ctrl_c()).await?;

    info!("Exiting ({:?})", summary.end);
    Ok(())
}
