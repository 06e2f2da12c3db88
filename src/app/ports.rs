//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FanService (domain)
//! ```
//!
//! Driven adapters (panel sense lines, IR emitter, state observers,
//! storage) implement these traits.  The
//! [`FanService`](super::service::FanService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::fan::FanStateSnapshot;
use crate::ir::IrFrame;
use crate::panel::SenseLine;

// ───────────────────────────────────────────────────────────────
// Panel sense port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: raw logic level of one panel sense line.
///
/// Levels are returned as wired; the active-low interpretation of the
/// fan's status lines is the scanner's business, not the adapter's.
pub trait LineSensePort {
    fn read_line(&mut self, line: SenseLine) -> bool;
}

// ───────────────────────────────────────────────────────────────
// IR transmit port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: emit one encoded frame.
///
/// Fire-and-forget — the emitter offers no delivery confirmation, and
/// the caller never blocks on completion.
pub trait IrTransmitPort {
    fn transmit(&mut self, frame: &IrFrame);
}

// ───────────────────────────────────────────────────────────────
// Publication ports (driven adapters: domain → observers)
// ───────────────────────────────────────────────────────────────

/// Receives the full published state whenever it changes.  Adapters
/// decide where it goes (serial log, network bridge, display, …).
pub trait StateSink {
    fn publish(&mut self, snapshot: &FanStateSnapshot);
}

/// Receives the formatted shutdown-timer label ("---", "1.0h", …)
/// whenever the timer position changes, independent of the main publish.
pub trait TimerDisplayPort {
    fn publish_label(&mut self, label: &'static str);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for the state snapshot and config.
///
/// - Keys are namespaced to prevent collisions between subsystems.
/// - Write operations MUST be atomic — no partial writes on power loss.
///   The ESP-IDF NVS API guarantees this natively; in-memory simulation
///   achieves it trivially.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges should be rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns the defaults if no stored config exists.
    fn load(&self) -> Result<crate::config::SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &crate::config::SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
