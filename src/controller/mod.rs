//! # Controller Module
//!
//! PS5 DualSense controller input handling.
//!
//! This module handles:
//! - PS5 controller detection and connection via evdev
//! - Tracking button levels and rising edges between ticks
//! - Converting stick positions to signed 16-bit readings
//! - Mapping buttons and sticks to control roles

pub mod bindings;
pub mod input;
pub mod mapper;
pub mod ps5;
