//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules of the bridge: LED-window
//! resolution, state publication, command sequencing, and snapshot
//! persistence.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod ports;
pub mod service;
