//! # Control Session
//!
//! Runs the fixed-rate control loop between a controller and the vehicle link.
//!
//! ## Control Flow
//!
//! 1. **Start gate**: poll the controller until the start/exit button is
//!    pushed. Nothing is sent before that.
//! 2. **Tick**: update input, derive the command packet, log the diagnostic
//!    line, send the packet, then end the session if the start/exit button was
//!    pushed this tick.
//! 3. **End**: controller disconnect, exit button, or the shutdown future
//!    (Ctrl+C in the binary) ends the session cleanly.
//!
//! Send failures are logged and counted, never retried.

use std::future::Future;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{Config, TimingConfig};
use crate::control::CommandDeriver;
use crate::controller::bindings::ControlBindings;
use crate::controller::input::InputSource;
use crate::error::Result;
use crate::transport::PacketSink;

/// Tracing target of the per-tick diagnostic line.
pub const TICK_TARGET: &str = "rov_bridge::tick";

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Start/exit button pushed during the control loop.
    ExitRequested,
    /// Controller went away.
    Disconnected,
    /// Shutdown future completed.
    Interrupted,
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    pub ticks: u64,
    pub packets_sent: u64,
    pub send_failures: u64,
}

/// A controller, a packet sink and the command state between them.
pub struct Session<I, S> {
    input: I,
    sink: S,
    deriver: CommandDeriver,
    bindings: ControlBindings,
    timing: TimingConfig,
}

impl<I: InputSource, S: PacketSink> Session<I, S> {
    /// # Errors
    ///
    /// Returns `Config` error if `config` fails [`Config::validate`]; the
    /// loop relies on a non-zero tick interval and in-range servo bounds.
    pub fn new(config: &Config, input: I, sink: S) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            input,
            sink,
            deriver: CommandDeriver::new(config),
            bindings: ControlBindings::default(),
            timing: config.timing.clone(),
        })
    }

    /// Replace the default button layout.
    #[must_use]
    pub fn with_bindings(mut self, bindings: ControlBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Command state, for inspection after a run.
    pub fn deriver(&self) -> &CommandDeriver {
        &self.deriver
    }

    /// Hands back the controller and sink.
    pub fn into_parts(self) -> (I, S) {
        (self.input, self.sink)
    }

    /// Run the start gate and control loop until the session ends.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`InputSource::update`]. Send failures are not
    /// errors.
    pub async fn run_until<F: Future>(&mut self, shutdown: F) -> Result<SessionSummary> {
        let period = Duration::from_micros(self.timing.tick_interval_us);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut summary = SessionSummary {
            end: SessionEnd::Interrupted,
            ticks: 0,
            packets_sent: 0,
            send_failures: 0,
        };

        info!("Waiting for {:?} to start", self.bindings.start_exit);

        loop {
            if !Self::wait_tick(&mut ticker, shutdown.as_mut()).await {
                info!("Shutdown requested before start");
                return Ok(summary);
            }

            self.input.update()?;

            if !self.input.is_connected() {
                summary.end = SessionEnd::Disconnected;
                return Ok(summary);
            }

            if self.bindings.start_exit_pushed(&self.input) {
                break;
            }
        }

        info!(
            "Control loop started ({}us tick, ~{}Hz)",
            self.timing.tick_interval_us,
            1_000_000 / self.timing.tick_interval_us
        );

        let mut last_status = 0u64;

        loop {
            if !Self::wait_tick(&mut ticker, shutdown.as_mut()).await {
                info!("Shutdown requested, leaving control loop");
                summary.end = SessionEnd::Interrupted;
                break;
            }

            self.input.update()?;

            if !self.input.is_connected() {
                warn!("Controller disconnected, leaving control loop");
                summary.end = SessionEnd::Disconnected;
                break;
            }

            let inputs = self.bindings.read_inputs(&self.input);
            let report = self.deriver.tick(&inputs);
            info!(target: TICK_TARGET, "{}", report);

            match self.sink.send_packet(&report.packet.to_bytes()).await {
                Ok(()) => summary.packets_sent += 1,
                Err(e) => {
                    debug!("Failed to send packet: {}", e);
                    summary.send_failures += 1;
                }
            }

            summary.ticks += 1;

            if summary.ticks - last_status >= self.timing.status_interval_ticks {
                info!(
                    "Sent {} packets ({} failed) over {} ticks",
                    summary.packets_sent, summary.send_failures, summary.ticks
                );
                last_status = summary.ticks;
            }

            if self.bindings.start_exit_pushed(&self.input) {
                info!("Exit requested");
                summary.end = SessionEnd::ExitRequested;
                break;
            }
        }

        info!(
            "Session ended ({:?}): {} ticks, {} packets sent, {} failed",
            summary.end, summary.ticks, summary.packets_sent, summary.send_failures
        );
        Ok(summary)
    }

    /// Waits for the next tick. `false` if shutdown won the race.
    async fn wait_tick<F: Future>(ticker: &mut Interval, shutdown: std::pin::Pin<&mut F>) -> bool {
        tokio::select! {
            biased;
            _ = shutdown => false,
            _ = ticker.tick() => true,
        }
    }
}
