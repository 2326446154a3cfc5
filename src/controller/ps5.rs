//! # PS5 DualSense Controller Module
//!
//! Detects and reads a PS5 DualSense controller through the Linux evdev
//! interface.
//!
//! ## Controller Detection
//!
//! The DualSense controller is identified by:
//! - Vendor ID: 0x054c (Sony)
//! - Product ID: 0x0ce6 (DualSense, both wired and Bluetooth)
//!
//! ## Reading Model
//!
//! `evdev` reads block, so a dedicated reader thread forwards events over a
//! channel. [`DualSensePad::update`] drains whatever arrived since the last
//! tick without waiting. When the device goes away the reader thread exits,
//! the channel closes and the pad reports itself disconnected.

use evdev::{Device, InputEvent};
use std::path::Path;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::input::{Axis, Button, InputSnapshot, InputSource};
use super::mapper::EventMapper;
use crate::error::{BridgeError, Result};

/// PS5 DualSense vendor ID (Sony)
const DUALSENSE_VENDOR_ID: u16 = 0x054c;

/// PS5 DualSense product ID (wired and Bluetooth)
const DUALSENSE_PRODUCT_ID: u16 = 0x0ce6;

/// PS5 DualSense controller handle
pub struct DualSensePad {
    device_path: String,
    name: Option<String>,
    events: mpsc::UnboundedReceiver<InputEvent>,
    mapper: EventMapper,
    snapshot: InputSnapshot,
    connected: bool,
}

impl std::fmt::Debug for DualSensePad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualSensePad")
            .field("device_path", &self.device_path)
            .field("name", &self.name)
            .field("connected", &self.connected)
            .finish_non_exhaustive()
    }
}

impl DualSensePad {
    /// Detect and open the first available PS5 DualSense controller
    ///
    /// Scans all `/dev/input/event*` devices to find a connected DualSense controller
    /// by matching vendor and product IDs.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No DualSense controller found on the system
    /// - `Controller`: `/dev/input` unreadable or the reader thread failed to start
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rov_bridge::controller::ps5::DualSensePad;
    ///
    /// let pad = DualSensePad::open()?;
    /// println!("Connected to controller at: {}", pad.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(BridgeError::Controller(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| BridgeError::Controller(format!("Failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BridgeError::Controller(format!("Failed to read directory entry: {}", e)))?;

        // Deterministic pick when several controllers are connected
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            match path.file_name() {
                Some(filename) if filename.to_string_lossy().starts_with("event") => {}
                _ => continue,
            }

            match Device::open(&path) {
                Ok(device) => {
                    let id = device.input_id();
                    debug!(
                        "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                        path.display(),
                        id.vendor(),
                        id.product()
                    );

                    if id.vendor() == DUALSENSE_VENDOR_ID
                        && id.product() == DUALSENSE_PRODUCT_ID
                    {
                        let device_path = path.to_string_lossy().to_string();
                        info!("Found PS5 DualSense controller at: {}", device_path);
                        return Self::start(device, device_path);
                    }
                }
                Err(e) => {
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(BridgeError::ControllerNotFound)
    }

    /// Open a specific evdev node without vendor/product matching.
    ///
    /// # Errors
    ///
    /// Returns `Controller` error if the device cannot be opened.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::open(path).map_err(|e| {
            BridgeError::Controller(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let device_path = path.to_string_lossy().to_string();
        info!("Opened controller at: {}", device_path);
        Self::start(device, device_path)
    }

    fn start(mut device: Device, device_path: String) -> Result<Self> {
        let name = device.name().map(str::to_string);
        let (tx, rx) = mpsc::unbounded_channel();
        let thread_path = device_path.clone();

        std::thread::Builder::new()
            .name("dualsense-reader".to_string())
            .spawn(move || loop {
                match device.fetch_events() {
                    Ok(events) => {
                        for event in events {
                            if tx.send(event).is_err() {
                                // Pad dropped
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Controller {} stopped delivering events: {}", thread_path, e);
                        return;
                    }
                }
            })
            .map_err(|e| BridgeError::Controller(format!("Failed to start reader thread: {}", e)))?;

        Ok(Self {
            device_path,
            name,
            events: rx,
            mapper: EventMapper::new(),
            snapshot: InputSnapshot::new(),
            connected: true,
        })
    }

    /// Get the device path of this controller
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Controller name reported by evdev, typically "DualSense Wireless Controller".
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl InputSource for DualSensePad {
    fn update(&mut self) -> Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.mapper.process_event(&event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.connected {
                        warn!("Controller {} disconnected", self.device_path);
                    }
                    self.connected = false;
                    break;
                }
            }
        }

        let pushes = self.mapper.take_pushes();
        self.snapshot.advance_latched(self.mapper.state_snapshot(), pushes);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn pressed(&self, button: Button) -> bool {
        self.snapshot.pressed(button)
    }

    fn pushed(&self, button: Button) -> bool {
        self.snapshot.pushed(button)
    }

    fn axis(&self, axis: Axis) -> i16 {
        self.snapshot.axis(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dualsense_vendor_id() {
        assert_eq!(DUALSENSE_VENDOR_ID, 0x054c, "Sony vendor ID should be 0x054c");
    }

    #[test]
    fn test_dualsense_product_id() {
        assert_eq!(
            DUALSENSE_PRODUCT_ID, 0x0ce6,
            "DualSense product ID should be 0x0ce6"
        );
    }

    #[test]
    fn test_open_path_missing_device() {
        let result = DualSensePad::open_path("/dev/input/nonexistent_event_12345");
        match result {
            Err(BridgeError::Controller(msg)) => {
                assert!(msg.contains("nonexistent_event_12345"));
            }
            other => panic!("Expected Controller error, got: {:?}", other),
        }
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_open_with_real_hardware() {
        let pad = DualSensePad::open().expect("Controller not found");
        assert!(pad.device_path().starts_with("/dev/input/event"));
        assert!(pad.is_connected());
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_update_with_real_hardware() {
        let mut pad = DualSensePad::open().expect("Controller not found");

        println!("Push the Cross button within 5 seconds...");

        for _ in 0..100 {
            pad.update().unwrap();
            if pad.pushed(Button::Cross) {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        panic!("Cross button push not observed");
    }
}
