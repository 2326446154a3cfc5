//! # ROV Bridge Library
//!
//! Drive a remotely operated vehicle with a PS5 DualSense controller over UDP.
//!
//! Each tick the controller is read, a small motor/servo command packet is
//! derived from it and sent to the vehicle as one datagram.

pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod session;
pub mod transport;
